use glam::{DQuat, DVec3};
use serde::{Deserialize, Serialize};
use std::ops::{BitAnd, BitOr};

/// Rigid transform published for spatial elements.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Pose {
    pub translation: DVec3,
    pub rotation: DQuat,
}

impl Pose {
    pub const IDENTITY: Pose = Pose {
        translation: DVec3::ZERO,
        rotation: DQuat::IDENTITY,
    };

    pub fn from_translation(translation: DVec3) -> Self {
        Self {
            translation,
            rotation: DQuat::IDENTITY,
        }
    }

    pub fn from_rotation(rotation: DQuat) -> Self {
        Self {
            translation: DVec3::ZERO,
            rotation,
        }
    }
}

impl Default for Pose {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// Which degrees of freedom a 3-D marker lets the operator drag.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ControlAxis(u8);

impl ControlAxis {
    pub const NONE: ControlAxis = ControlAxis(0);
    pub const TX: ControlAxis = ControlAxis(1 << 0);
    pub const TY: ControlAxis = ControlAxis(1 << 1);
    pub const TZ: ControlAxis = ControlAxis(1 << 2);
    pub const RX: ControlAxis = ControlAxis(1 << 3);
    pub const RY: ControlAxis = ControlAxis(1 << 4);
    pub const RZ: ControlAxis = ControlAxis(1 << 5);
    pub const TRANSLATION: ControlAxis = ControlAxis(0b000_111);
    pub const ROTATION: ControlAxis = ControlAxis(0b111_000);
    pub const XYTHETA: ControlAxis = ControlAxis(0b100_011);
    pub const XYZTHETA: ControlAxis = ControlAxis(0b100_111);
    pub const ALL: ControlAxis = ControlAxis(0b111_111);

    pub fn contains(self, other: ControlAxis) -> bool {
        self.0 & other.0 == other.0
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }
}

impl BitOr for ControlAxis {
    type Output = ControlAxis;

    fn bitor(self, rhs: ControlAxis) -> ControlAxis {
        ControlAxis(self.0 | rhs.0)
    }
}

impl BitAnd for ControlAxis {
    type Output = ControlAxis;

    fn bitand(self, rhs: ControlAxis) -> ControlAxis {
        ControlAxis(self.0 & rhs.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn composite_masks_cover_their_axes() {
        assert!(ControlAxis::TRANSLATION.contains(ControlAxis::TX));
        assert!(ControlAxis::ALL.contains(ControlAxis::TRANSLATION | ControlAxis::ROTATION));
        assert!(!ControlAxis::ROTATION.contains(ControlAxis::TZ));
        assert_eq!(
            ControlAxis::XYTHETA,
            ControlAxis::TX | ControlAxis::TY | ControlAxis::RZ
        );
        assert!(ControlAxis::NONE.is_empty());
    }
}
