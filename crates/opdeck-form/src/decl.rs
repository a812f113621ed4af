use crate::ctx::FormCtx;
use crate::leaf::{ComboLeaf, FormLeaf, VectorLeaf};
use crate::node::{ArrayNode, FormNode, NodeKind, ObjectNode, OneOfNode};
use crate::spatial::{SpatialKind, SpatialLeaf};
use glam::DVec3;
use opdeck_core::{EditState, Pose, Value};

/// One per-tick field declaration from the authority.
///
/// Declarations both create fields on first sight and refresh existing ones;
/// a refresh whose kind no longer matches the live field rebuilds it from
/// scratch, mirroring the widget tree's type-replace rule.
pub enum FieldDecl {
    Checkbox {
        default: Option<bool>,
    },
    Integer {
        default: Option<i64>,
    },
    Number {
        default: Option<f64>,
    },
    Text {
        default: Option<String>,
    },
    Vector {
        labels: Vec<String>,
        default: Option<Vec<f64>>,
        fixed_size: bool,
    },
    Combo {
        values: Vec<String>,
        send_index: bool,
    },
    /// Like [`FieldDecl::Combo`], but the option list was resolved from the
    /// authority's published data map rather than carried inline.
    DataCombo {
        values: Vec<String>,
        send_index: bool,
    },
    Point3d {
        default: Option<DVec3>,
        interactive: bool,
    },
    Rotation {
        default: Option<Pose>,
        interactive: bool,
    },
    Transform {
        default: Option<Pose>,
        interactive: bool,
    },
    Object,
    ObjectArray,
    GenericArray {
        data: Option<Vec<Value>>,
    },
    OneOf {
        data: Option<(usize, Value)>,
    },
}

impl FieldDecl {
    pub(crate) fn matches(&self, node: &FormNode) -> bool {
        match (self, node.kind()) {
            (FieldDecl::Checkbox { .. }, NodeKind::Leaf(FormLeaf::Checkbox(_)))
            | (FieldDecl::Integer { .. }, NodeKind::Leaf(FormLeaf::Integer(_)))
            | (FieldDecl::Number { .. }, NodeKind::Leaf(FormLeaf::Number(_)))
            | (FieldDecl::Text { .. }, NodeKind::Leaf(FormLeaf::Text(_)))
            | (FieldDecl::Vector { .. }, NodeKind::Leaf(FormLeaf::Vector(_)))
            | (FieldDecl::Combo { .. }, NodeKind::Leaf(FormLeaf::Combo(_)))
            | (FieldDecl::DataCombo { .. }, NodeKind::Leaf(FormLeaf::DataCombo(_)))
            | (FieldDecl::Object, NodeKind::Object(_))
            | (FieldDecl::ObjectArray, NodeKind::ObjectArray(_))
            | (FieldDecl::GenericArray { .. }, NodeKind::GenericArray(_))
            | (FieldDecl::OneOf { .. }, NodeKind::OneOf(_)) => true,
            (FieldDecl::Point3d { .. }, NodeKind::Leaf(FormLeaf::Spatial(leaf))) => {
                leaf.kind() == SpatialKind::Point3d
            }
            (FieldDecl::Rotation { .. }, NodeKind::Leaf(FormLeaf::Spatial(leaf))) => {
                leaf.kind() == SpatialKind::Rotation
            }
            (FieldDecl::Transform { .. }, NodeKind::Leaf(FormLeaf::Spatial(leaf))) => {
                leaf.kind() == SpatialKind::Transform
            }
            _ => false,
        }
    }

    /// Builds a fresh node from this declaration.
    pub(crate) fn instantiate(
        self,
        name: &str,
        required: bool,
        ctx: &mut FormCtx<'_>,
    ) -> FormNode {
        let kind = match self {
            FieldDecl::Checkbox { default } => {
                NodeKind::Leaf(FormLeaf::Checkbox(EditState::seeded(default, false)))
            }
            FieldDecl::Integer { default } => {
                NodeKind::Leaf(FormLeaf::Integer(EditState::seeded(default, 0)))
            }
            FieldDecl::Number { default } => {
                NodeKind::Leaf(FormLeaf::Number(EditState::seeded(default, 0.0)))
            }
            FieldDecl::Text { default } => {
                NodeKind::Leaf(FormLeaf::Text(EditState::seeded(default, String::new())))
            }
            FieldDecl::Vector {
                labels,
                default,
                fixed_size,
            } => NodeKind::Leaf(FormLeaf::Vector(VectorLeaf::new(labels, default, fixed_size))),
            FieldDecl::Combo { values, send_index } => {
                NodeKind::Leaf(FormLeaf::Combo(ComboLeaf::new(values, send_index)))
            }
            FieldDecl::DataCombo { values, send_index } => {
                NodeKind::Leaf(FormLeaf::DataCombo(ComboLeaf::new(values, send_index)))
            }
            FieldDecl::Point3d {
                default,
                interactive,
            } => NodeKind::Leaf(FormLeaf::Spatial(SpatialLeaf::new(
                SpatialKind::Point3d,
                default.map(Pose::from_translation),
                interactive,
                ctx,
            ))),
            FieldDecl::Rotation {
                default,
                interactive,
            } => NodeKind::Leaf(FormLeaf::Spatial(SpatialLeaf::new(
                SpatialKind::Rotation,
                default,
                interactive,
                ctx,
            ))),
            FieldDecl::Transform {
                default,
                interactive,
            } => NodeKind::Leaf(FormLeaf::Spatial(SpatialLeaf::new(
                SpatialKind::Transform,
                default,
                interactive,
                ctx,
            ))),
            FieldDecl::Object => NodeKind::Object(ObjectNode::new(false)),
            FieldDecl::ObjectArray => {
                let template =
                    FormNode::new(name, required, NodeKind::Object(ObjectNode::new(false)), ctx);
                NodeKind::ObjectArray(ArrayNode::new(template))
            }
            FieldDecl::GenericArray { data } => {
                let template =
                    FormNode::new(name, true, NodeKind::Object(ObjectNode::new(true)), ctx);
                let mut array = ArrayNode::new(template);
                if let Some(list) = &data {
                    if let Err(err) = array.update_scalars(list, ctx) {
                        log::warn!("generic array `{name}`: bad initial data: {err}");
                    }
                }
                NodeKind::GenericArray(array)
            }
            FieldDecl::OneOf { data } => {
                let candidates =
                    FormNode::new(name, true, NodeKind::Object(ObjectNode::new(true)), ctx);
                let mut one_of = OneOfNode::new(candidates);
                if let Some((index, payload)) = &data {
                    if let Err(err) = one_of.apply_selection(*index, payload, ctx) {
                        log::warn!("one-of `{name}`: bad initial data: {err}");
                    }
                }
                NodeKind::OneOf(one_of)
            }
        };
        FormNode::new(name, required, kind, ctx)
    }

    /// Refreshes an existing, kind-matching node from this tick's
    /// declaration. A locked node keeps the operator's state untouched.
    pub(crate) fn apply(self, node: &mut FormNode, ctx: &mut FormCtx<'_>) {
        if node.locked() {
            return;
        }
        let name = node.display_name().to_owned();
        match (self, node.kind_mut()) {
            (FieldDecl::Checkbox { default }, NodeKind::Leaf(FormLeaf::Checkbox(state))) => {
                if let Some(value) = default {
                    state.apply_remote(value);
                }
            }
            (FieldDecl::Integer { default }, NodeKind::Leaf(FormLeaf::Integer(state))) => {
                if let Some(value) = default {
                    state.apply_remote(value);
                }
            }
            (FieldDecl::Number { default }, NodeKind::Leaf(FormLeaf::Number(state))) => {
                if let Some(value) = default {
                    state.apply_remote(value);
                }
            }
            (FieldDecl::Text { default }, NodeKind::Leaf(FormLeaf::Text(state))) => {
                if let Some(value) = default {
                    state.apply_remote(value);
                }
            }
            (
                FieldDecl::Vector {
                    labels,
                    default,
                    fixed_size,
                },
                NodeKind::Leaf(FormLeaf::Vector(leaf)),
            ) => {
                leaf.labels = labels;
                leaf.fixed = fixed_size;
                if let Some(value) = default {
                    leaf.state.apply_remote(value);
                }
            }
            (
                FieldDecl::Combo { values, send_index },
                NodeKind::Leaf(FormLeaf::Combo(leaf)),
            )
            | (
                FieldDecl::DataCombo { values, send_index },
                NodeKind::Leaf(FormLeaf::DataCombo(leaf)),
            ) => {
                leaf.values = values;
                leaf.send_index = send_index;
                leaf.index = leaf
                    .state
                    .committed()
                    .and_then(|current| leaf.values.iter().position(|v| v == current));
            }
            (
                FieldDecl::Point3d {
                    default,
                    interactive,
                },
                NodeKind::Leaf(FormLeaf::Spatial(leaf)),
            ) => leaf.apply_decl(default.map(Pose::from_translation), interactive, ctx),
            (
                FieldDecl::Rotation {
                    default,
                    interactive,
                },
                NodeKind::Leaf(FormLeaf::Spatial(leaf)),
            )
            | (
                FieldDecl::Transform {
                    default,
                    interactive,
                },
                NodeKind::Leaf(FormLeaf::Spatial(leaf)),
            ) => leaf.apply_decl(default, interactive, ctx),
            (FieldDecl::Object, NodeKind::Object(_))
            | (FieldDecl::ObjectArray, NodeKind::ObjectArray(_)) => {}
            (FieldDecl::GenericArray { data }, NodeKind::GenericArray(array)) => {
                if let Some(list) = data {
                    if let Err(err) = array.update_scalars(&list, ctx) {
                        log::warn!("generic array `{name}`: bad data: {err}");
                    }
                }
            }
            (FieldDecl::OneOf { data }, NodeKind::OneOf(one_of)) => {
                if let Some((index, payload)) = data {
                    if let Err(err) = one_of.apply_selection(index, &payload, ctx) {
                        log::warn!("one-of `{name}`: bad data: {err}");
                    }
                }
            }
            _ => unreachable!("declaration kind verified by matches() before apply"),
        }
    }
}
