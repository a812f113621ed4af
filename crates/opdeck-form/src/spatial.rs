use crate::ctx::FormCtx;
use glam::{DQuat, DVec3};
use opdeck_core::{ControlAxis, EditState, Marker, Pose, Surface, Value, ValueError, ValueKind};

/// Which slice of a pose a spatial leaf edits, and therefore which axis mask
/// its marker is created with.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SpatialKind {
    /// Translation only; collects as a 3-vector.
    Point3d,
    /// Rotation only; collects as an x/y/z/w quaternion 4-vector.
    Rotation,
    /// Full pose; collects as the explicit pose variant.
    Transform,
}

impl SpatialKind {
    fn mask(self) -> ControlAxis {
        match self {
            SpatialKind::Point3d => ControlAxis::TRANSLATION,
            SpatialKind::Rotation => ControlAxis::ROTATION,
            SpatialKind::Transform => ControlAxis::ALL,
        }
    }
}

/// Pose-valued form leaf composed with a 3-D marker.
///
/// Two input paths write the same draft: the numeric component fields drawn
/// on the 2-D surface, and the marker's once-per-tick drag report. Both enter
/// the edit session; commit semantics are the surrounding form's. The
/// marker's displayed pose follows the draft every tick, and toggling its
/// visibility is not a state transition.
pub struct SpatialLeaf {
    kind: SpatialKind,
    state: EditState<Pose>,
    interactive: bool,
    visible: bool,
    marker: Option<Box<dyn Marker>>,
}

impl SpatialLeaf {
    pub fn new(
        kind: SpatialKind,
        default: Option<Pose>,
        interactive: bool,
        ctx: &mut FormCtx<'_>,
    ) -> Self {
        let state = EditState::seeded(default, Pose::IDENTITY);
        let marker = interactive
            .then(|| ctx.markers.make_marker(*state.draft(), kind.mask()));
        Self {
            kind,
            state,
            interactive,
            visible: false,
            marker,
        }
    }

    pub fn kind(&self) -> SpatialKind {
        self.kind
    }

    pub fn is_editing(&self) -> bool {
        self.state.is_editing()
    }

    pub fn end_edit(&mut self) {
        self.state.end_edit();
    }

    pub fn reset(&mut self) {
        self.state.reset();
        self.sync_marker();
    }

    pub fn ready(&self) -> bool {
        self.state.has_value()
    }

    pub fn collect_value(&self) -> Value {
        let pose = *self.state.committed().unwrap_or(self.state.draft());
        match self.kind {
            SpatialKind::Point3d => {
                let t = pose.translation;
                Value::Vector(vec![t.x, t.y, t.z])
            }
            SpatialKind::Rotation => {
                let q = pose.rotation;
                Value::Vector(vec![q.x, q.y, q.z, q.w])
            }
            SpatialKind::Transform => Value::Pose(pose),
        }
    }

    pub fn update_value(&mut self, value: &Value) -> Result<(), ValueError> {
        let pose = match self.kind {
            SpatialKind::Point3d => {
                let v = value.as_vector()?;
                if v.len() != 3 {
                    return Err(ValueError::Length {
                        expected: 3,
                        found: v.len(),
                    });
                }
                Pose::from_translation(DVec3::new(v[0], v[1], v[2]))
            }
            SpatialKind::Rotation => match value {
                Value::Pose(pose) => *pose,
                Value::Vector(v) if v.len() == 4 => {
                    Pose::from_rotation(DQuat::from_xyzw(v[0], v[1], v[2], v[3]))
                }
                Value::Vector(v) => {
                    return Err(ValueError::Length {
                        expected: 4,
                        found: v.len(),
                    })
                }
                other => {
                    return Err(ValueError::TypeMismatch {
                        expected: ValueKind::Pose,
                        found: other.kind(),
                    })
                }
            },
            SpatialKind::Transform => value.as_pose()?,
        };
        self.state.apply_remote(pose);
        self.sync_marker();
        Ok(())
    }

    /// Re-applies the per-tick declaration: published default + interactivity.
    pub fn apply_decl(
        &mut self,
        default: Option<Pose>,
        interactive: bool,
        ctx: &mut FormCtx<'_>,
    ) {
        if let Some(pose) = default {
            self.state.apply_remote(pose);
        }
        self.interactive = interactive;
        if self.interactive && self.marker.is_none() {
            self.marker = Some(
                ctx.markers
                    .make_marker(*self.state.draft(), self.kind.mask()),
            );
        }
        self.sync_marker();
    }

    pub fn clone_fresh(&self, ctx: &mut FormCtx<'_>) -> SpatialLeaf {
        SpatialLeaf::new(
            self.kind,
            self.state.committed().copied(),
            self.interactive,
            ctx,
        )
    }

    fn sync_marker(&mut self) {
        if let Some(marker) = &mut self.marker {
            marker.set_pose(*self.state.draft());
        }
    }

    pub fn draw(&mut self, surface: &mut dyn Surface, key: &str) {
        if self.interactive {
            surface.same_line();
            let label = if self.visible { "Hide" } else { "Show" };
            if surface.button(&format!("{key}/marker"), label) {
                self.visible = !self.visible;
            }
        }
        match self.kind {
            SpatialKind::Point3d => self.draw_translation(surface, key),
            SpatialKind::Rotation => self.draw_quaternion(surface, key),
            SpatialKind::Transform => {
                self.draw_translation(surface, key);
                self.draw_quaternion(surface, key);
            }
        }
        self.sync_marker();
    }

    fn draw_translation(&mut self, surface: &mut dyn Surface, key: &str) {
        surface.columns_row(
            &format!("{key}/t/labels"),
            &["x".to_owned(), "y".to_owned(), "z".to_owned()],
        );
        let mut pose = *self.state.draft();
        let mut components = pose.translation.to_array();
        let mut changed = false;
        for (i, component) in components.iter_mut().enumerate() {
            changed |= surface
                .input_number(&format!("{key}/t/{i}"), component, true)
                .changed;
        }
        if changed {
            pose.translation = DVec3::from_array(components);
            self.state.edit(pose);
        }
    }

    fn draw_quaternion(&mut self, surface: &mut dyn Surface, key: &str) {
        surface.columns_row(
            &format!("{key}/q/labels"),
            &[
                "w".to_owned(),
                "x".to_owned(),
                "y".to_owned(),
                "z".to_owned(),
            ],
        );
        let mut pose = *self.state.draft();
        let q = pose.rotation;
        let mut components = [q.w, q.x, q.y, q.z];
        let mut changed = false;
        for (i, component) in components.iter_mut().enumerate() {
            changed |= surface
                .input_number(&format!("{key}/q/{i}"), component, true)
                .changed;
        }
        if changed {
            let q = DQuat::from_xyzw(components[1], components[2], components[3], components[0]);
            pose.rotation = if q.length_squared() > 0.0 {
                q.normalize()
            } else {
                DQuat::IDENTITY
            };
            self.state.edit(pose);
        }
    }

    pub fn draw_3d(&mut self) {
        if !self.interactive || !self.visible {
            return;
        }
        let Some(marker) = &mut self.marker else {
            return;
        };
        if marker.draw() {
            let reported = marker.pose();
            let mut draft = *self.state.draft();
            match self.kind {
                SpatialKind::Point3d => draft.translation = reported.translation,
                SpatialKind::Rotation | SpatialKind::Transform => draft = reported,
            }
            self.state.edit(draft);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ctx::IdAlloc;
    use opdeck_core::NullMarkerFactory;

    fn ctx<'a>(ids: &'a mut IdAlloc, markers: &'a mut NullMarkerFactory) -> FormCtx<'a> {
        FormCtx { ids, markers }
    }

    #[test]
    fn point_collects_translation_as_vector() {
        let mut ids = IdAlloc::default();
        let mut markers = NullMarkerFactory;
        let mut ctx = ctx(&mut ids, &mut markers);
        let pose = Pose::from_translation(DVec3::new(1.0, 2.0, 3.0));
        let leaf = SpatialLeaf::new(SpatialKind::Point3d, Some(pose), true, &mut ctx);
        assert!(leaf.ready());
        assert_eq!(leaf.collect_value(), Value::Vector(vec![1.0, 2.0, 3.0]));
    }

    #[test]
    fn update_rejects_wrong_arity() {
        let mut ids = IdAlloc::default();
        let mut markers = NullMarkerFactory;
        let mut ctx = ctx(&mut ids, &mut markers);
        let mut leaf = SpatialLeaf::new(SpatialKind::Point3d, None, false, &mut ctx);
        let err = leaf.update_value(&Value::Vector(vec![1.0])).unwrap_err();
        assert_eq!(
            err,
            ValueError::Length {
                expected: 3,
                found: 1
            }
        );
    }

    #[test]
    fn rotation_accepts_quaternion_vector() {
        let mut ids = IdAlloc::default();
        let mut markers = NullMarkerFactory;
        let mut ctx = ctx(&mut ids, &mut markers);
        let mut leaf = SpatialLeaf::new(SpatialKind::Rotation, None, false, &mut ctx);
        leaf.update_value(&Value::Vector(vec![0.0, 0.0, 0.0, 1.0]))
            .unwrap();
        assert!(leaf.ready());
        assert_eq!(
            leaf.collect_value(),
            Value::Vector(vec![0.0, 0.0, 0.0, 1.0])
        );
    }

    #[test]
    fn clone_starts_from_committed_value_unedited() {
        let mut ids = IdAlloc::default();
        let mut markers = NullMarkerFactory;
        let mut ctx = ctx(&mut ids, &mut markers);
        let mut leaf = SpatialLeaf::new(SpatialKind::Transform, Some(Pose::IDENTITY), true, &mut ctx);
        let edited = Pose::from_translation(DVec3::splat(5.0));
        leaf.state.edit(edited);

        let copy = leaf.clone_fresh(&mut ctx);
        assert!(!copy.is_editing());
        // The clone keeps the committed value, not the edit-session draft.
        assert_eq!(copy.state.committed(), Some(&edited));
    }
}
