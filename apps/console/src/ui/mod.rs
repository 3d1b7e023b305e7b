//! Terminal view: page state and text rendering.

pub mod view;

pub use view::UiState;
