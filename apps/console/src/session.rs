//! Interactive prompt: reads triggers line by line and prints view updates as
//! handler events arrive.

use std::{io::Write, sync::Arc};

use anyhow::Result;
use tokio::{
    io::{AsyncBufRead, AsyncBufReadExt},
    sync::mpsc::UnboundedReceiver,
    task::JoinSet,
};

use crate::{
    controller::{
        events::UiEvent,
        orchestration::{dispatch_trigger, parse_trigger, Outcome},
        reducer, Controller,
    },
    ui::{view, UiState},
};

/// Runs until `quit` or end of input. Actions still in flight at that point
/// are awaited so their results get printed; a pending reload is dropped.
pub async fn run<R, W>(
    controller: Arc<Controller>,
    mut state: UiState,
    mut ui_rx: UnboundedReceiver<UiEvent>,
    input: R,
    out: &mut W,
) -> Result<UiState>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    let mut lines = input.lines();
    let mut tasks = JoinSet::new();

    writeln!(out, "{}", view::render_page(&state))?;
    writeln!(out, "type 'help' for commands")?;

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else {
                    break;
                };
                let trigger = match parse_trigger(&line) {
                    Ok(Some(trigger)) => trigger,
                    Ok(None) => continue,
                    Err(err) => {
                        show(out, &mut state, UiEvent::Error(err))?;
                        continue;
                    }
                };
                match dispatch_trigger(&controller, &mut state, &mut tasks, trigger) {
                    Outcome::Continue(Some(text)) => writeln!(out, "{text}")?,
                    Outcome::Continue(None) => {}
                    Outcome::Quit => break,
                }
            }
            Some(event) = ui_rx.recv() => show(out, &mut state, event)?,
            Some(joined) = tasks.join_next(), if !tasks.is_empty() => {
                if let Err(err) = joined {
                    tracing::error!("ui action task failed: {err}");
                }
            }
        }
    }

    while let Some(joined) = tasks.join_next().await {
        if let Err(err) = joined {
            tracing::error!("ui action task failed: {err}");
        }
    }
    while let Ok(event) = ui_rx.try_recv() {
        if event != UiEvent::Reload {
            show(out, &mut state, event)?;
        }
    }
    out.flush()?;
    Ok(state)
}

fn show<W: Write>(out: &mut W, state: &mut UiState, event: UiEvent) -> Result<()> {
    reducer::apply(state, &event);
    if let Some(text) = view::describe(state, &event) {
        writeln!(out, "{text}")?;
    }
    Ok(())
}

#[cfg(test)]
#[path = "tests/session_tests.rs"]
mod tests;
