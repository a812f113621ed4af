//! Recursive form composition for the opdeck client.
//!
//! A form is a tree of named nodes: scalar and spatial leaves, object
//! containers with required/optional partitions, homogeneous arrays cloned
//! from a primary template, and tagged one-of variant selectors. The tree is
//! declared field by field from the authority's publish stream, re-applied
//! every tick, and collected into a single [`opdeck_core::Value`] map when
//! the operator submits.

mod ctx;
mod decl;
mod error;
mod form;
mod leaf;
mod node;
mod spatial;

pub use ctx::{FormCtx, IdAlloc};
pub use decl::FieldDecl;
pub use error::FormError;
pub use form::Form;
pub use leaf::{ComboLeaf, FormLeaf, VectorLeaf};
pub use node::{ArrayNode, FormNode, NodeKind, ObjectNode, OneOfNode};
pub use spatial::{SpatialKind, SpatialLeaf};
