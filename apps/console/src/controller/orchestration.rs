//! Action dispatcher: maps named triggers typed at the prompt onto handlers.

use std::{path::PathBuf, sync::Arc};

use shared::{
    domain::{ColumnFilter, QueryOptions},
    error::InputError,
};
use tokio::task::JoinSet;

use crate::{
    controller::{
        events::{UiError, UiErrorContext, UiEvent},
        reducer, Controller,
    },
    ui::{view, UiState},
};

pub const HELP_TEXT: &str = "\
commands:
  upload <path>         submit a file (alias: submit)
  table <name>          put a table name into the query field
  get                   query the table in the query field
  query <name>          table <name> + get
  view <n>              activate generated link n
  limit [n]             set or clear the row limit
  search [text]         set or clear the search term
  filter [col=value]    set or clear the column filter
  clear                 clear limit, search and filter
  links | show | help | quit";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Trigger {
    Upload(Option<PathBuf>),
    SetTable(String),
    Get,
    Query(String),
    View(usize),
    Limit(Option<u32>),
    Search(Option<String>),
    Filter(Option<ColumnFilter>),
    ClearOptions,
    Links,
    Show,
    Help,
    Quit,
}

/// `Ok(None)` for a blank line.
pub fn parse_trigger(line: &str) -> Result<Option<Trigger>, UiError> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }
    let (name, rest) = match line.split_once(char::is_whitespace) {
        Some((name, rest)) => (name, rest.trim()),
        None => (line, ""),
    };
    let input = |err: InputError| UiError::input(UiErrorContext::Dispatch, &err);

    let trigger = match name.to_ascii_lowercase().as_str() {
        "upload" | "submit" => Trigger::Upload((!rest.is_empty()).then(|| PathBuf::from(rest))),
        "table" => Trigger::SetTable(rest.to_string()),
        "get" => Trigger::Get,
        "query" => Trigger::Query(rest.to_string()),
        "view" => {
            let number = rest.parse::<usize>().map_err(|_| {
                UiError::alert(
                    UiErrorContext::Dispatch,
                    format!("view needs a link number, got '{rest}'"),
                )
            })?;
            Trigger::View(number)
        }
        "limit" if rest.is_empty() => Trigger::Limit(None),
        "limit" => Trigger::Limit(Some(QueryOptions::parse_limit(rest).map_err(input)?)),
        "search" => Trigger::Search((!rest.is_empty()).then(|| rest.to_string())),
        "filter" if rest.is_empty() => Trigger::Filter(None),
        "filter" => Trigger::Filter(Some(parse_filter(rest).map_err(input)?)),
        "clear" => Trigger::ClearOptions,
        "links" => Trigger::Links,
        "show" => Trigger::Show,
        "help" | "?" => Trigger::Help,
        "quit" | "exit" => Trigger::Quit,
        other => {
            return Err(UiError::alert(
                UiErrorContext::Dispatch,
                format!("unknown command '{other}' (try help)"),
            ))
        }
    };
    Ok(Some(trigger))
}

/// Accepts `col=value` as well as `col value`.
fn parse_filter(raw: &str) -> Result<ColumnFilter, InputError> {
    if raw.contains('=') {
        return raw.parse();
    }
    match raw.split_once(char::is_whitespace) {
        Some((column, value)) => format!("{column}={value}").parse(),
        None => Err(InputError::InvalidFilter(raw.to_string())),
    }
}

pub enum Outcome {
    Continue(Option<String>),
    Quit,
}

/// Handlers run as detached tasks in `tasks`; the prompt never waits on them.
pub fn dispatch_trigger(
    controller: &Arc<Controller>,
    state: &mut UiState,
    tasks: &mut JoinSet<()>,
    trigger: Trigger,
) -> Outcome {
    let trigger_name = trigger_name(&trigger);
    tracing::debug!(trigger = trigger_name, "dispatching trigger");

    let output = match trigger {
        Trigger::Upload(path) => {
            let controller = Arc::clone(controller);
            tasks.spawn(async move { controller.submit_upload(path.as_deref()).await });
            None
        }
        Trigger::SetTable(name) => {
            state.query_input = name;
            Some(format!("query field: {}", state.query_input))
        }
        Trigger::Get => {
            spawn_query(controller, tasks, state.query_input.clone(), state.options.clone());
            None
        }
        Trigger::Query(name) => {
            state.query_input = name.clone();
            spawn_query(controller, tasks, name, state.options.clone());
            None
        }
        Trigger::View(number) => match state.link(number).cloned() {
            Some(link) => {
                let controller = Arc::clone(controller);
                let options = state.options.clone();
                tasks.spawn(async move { controller.activate_link(&link, options).await });
                None
            }
            None => {
                let event = UiEvent::Error(UiError::alert(
                    UiErrorContext::Dispatch,
                    format!("no link numbered {number}"),
                ));
                reducer::apply(state, &event);
                view::describe(state, &event)
            }
        },
        Trigger::Limit(limit) => {
            state.options.limit = limit;
            Some(view::render_page(state))
        }
        Trigger::Search(search) => {
            state.options.search = search;
            Some(view::render_page(state))
        }
        Trigger::Filter(filter) => {
            state.options.filter = filter;
            Some(view::render_page(state))
        }
        Trigger::ClearOptions => {
            state.options = QueryOptions::default();
            Some(view::render_page(state))
        }
        Trigger::Links => Some(view::render_links(state)),
        Trigger::Show => Some(view::render_page(state)),
        Trigger::Help => Some(HELP_TEXT.to_string()),
        Trigger::Quit => return Outcome::Quit,
    };
    Outcome::Continue(output)
}

fn spawn_query(
    controller: &Arc<Controller>,
    tasks: &mut JoinSet<()>,
    name: String,
    options: QueryOptions,
) {
    let controller = Arc::clone(controller);
    tasks.spawn(async move { controller.query_table(&name, options).await });
}

fn trigger_name(trigger: &Trigger) -> &'static str {
    match trigger {
        Trigger::Upload(_) => "upload",
        Trigger::SetTable(_) => "table",
        Trigger::Get => "get",
        Trigger::Query(_) => "query",
        Trigger::View(_) => "view",
        Trigger::Limit(_) => "limit",
        Trigger::Search(_) => "search",
        Trigger::Filter(_) => "filter",
        Trigger::ClearOptions => "clear",
        Trigger::Links => "links",
        Trigger::Show => "show",
        Trigger::Help => "help",
        Trigger::Quit => "quit",
    }
}
