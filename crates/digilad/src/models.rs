//! Message types exchanged between the assistant widget, the relay and the
//! upstream provider.
//!
//! `ChatMessage`/`ChatRequest` travel over the wire and are forwarded to the
//! model verbatim. `DisplayMessage` exists only on the rendering side: its
//! `content` is overwritten with the full accumulator on every stream
//! increment and is never sent anywhere.

pub mod display;
pub mod message;
pub mod role;

pub use display::DisplayMessage;
pub use message::{ChatMessage, ChatRequest};
pub use role::Role;
