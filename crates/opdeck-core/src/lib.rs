//! Core vocabulary of the opdeck client.
//!
//! This crate defines what every other opdeck crate speaks: element
//! identities, the tagged [`Value`] carried on the wire, the edit-lock state
//! machine shared by every stateful element, and the capability traits the
//! embedder supplies (rendering surface, transport link, 3-D markers).

mod edit;
mod id;
mod link;
mod marker;
mod pose;
mod surface;
mod value;

pub use edit::EditState;
pub use id::ElementId;
pub use link::{Link, Outbox, Request};
pub use marker::{Marker, MarkerFactory, NullMarkerFactory};
pub use pose::{ControlAxis, Pose};
pub use surface::{InputEvent, Surface};
pub use value::{Value, ValueError, ValueKind};
