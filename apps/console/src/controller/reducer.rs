//! Applies handler events to the page state.

use crate::{
    controller::events::{UiErrorCategory, UiEvent},
    ui::UiState,
};

pub fn apply(state: &mut UiState, event: &UiEvent) {
    match event {
        UiEvent::Render { region, text } => state.set_region(*region, text.clone()),
        UiEvent::QueryInputChanged(value) => state.query_input = value.clone(),
        UiEvent::TableDiscovered(table) => state.remember_table(table.clone()),
        UiEvent::Error(err) => match (err.category(), err.context().region()) {
            (UiErrorCategory::Request, Some(region)) => {
                state.set_region(region, err.display_text());
            }
            _ => state.alert = Some(err.display_text()),
        },
        UiEvent::Reload => state.reload(),
    }
}
