//! Client façade of the opdeck panel.
//!
//! [`Client`] receives the authority's typed publish stream, reconciles it
//! into the identity-addressed category/widget tree (create, reuse, or
//! replace on kind mismatch), and exposes the single outbound commit
//! primitive every editable widget funnels into. Rendering walks the tree
//! once per tick against the embedder's [`opdeck_core::Surface`].

mod category;
mod client;
mod message;
mod widget;
pub mod widgets;

pub use category::Category;
pub use client::Client;
pub use message::ServerMessage;
pub use widget::{DrawCtx, Widget, WidgetKind};
