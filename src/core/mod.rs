//! Core value types shared by machines and state units.
//!
//! - State discriminants via the `State` trait
//! - The opaque `Payload` carried from a transition request into `on_enter`

mod payload;
mod state;

pub use payload::Payload;
pub use state::State;
