//! Controller layer: UI events, the action handlers, the trigger dispatcher and
//! reducer-like state transitions.

pub mod events;
pub mod handlers;
pub mod orchestration;
pub mod reducer;

pub use handlers::Controller;
