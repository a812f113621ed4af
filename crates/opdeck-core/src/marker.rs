use crate::pose::{ControlAxis, Pose};

/// 3-D manipulation handle supplied by the embedder.
///
/// The core keeps the marker's pose synchronized with the owning element's
/// draft and asks once per tick whether the operator dragged it.
pub trait Marker {
    fn pose(&self) -> Pose;

    fn set_pose(&mut self, pose: Pose);

    fn set_mask(&mut self, mask: ControlAxis);

    /// Draws the marker. Returns true when the operator moved it this frame,
    /// in which case [`Marker::pose`] reports the new pose.
    fn draw(&mut self) -> bool;
}

pub trait MarkerFactory {
    fn make_marker(&mut self, pose: Pose, mask: ControlAxis) -> Box<dyn Marker>;
}

/// Factory for embedders without a 3-D view; its markers never move.
#[derive(Debug, Default)]
pub struct NullMarkerFactory;

struct NullMarker {
    pose: Pose,
}

impl Marker for NullMarker {
    fn pose(&self) -> Pose {
        self.pose
    }

    fn set_pose(&mut self, pose: Pose) {
        self.pose = pose;
    }

    fn set_mask(&mut self, _mask: ControlAxis) {}

    fn draw(&mut self) -> bool {
        false
    }
}

impl MarkerFactory for NullMarkerFactory {
    fn make_marker(&mut self, pose: Pose, _mask: ControlAxis) -> Box<dyn Marker> {
        Box::new(NullMarker { pose })
    }
}
