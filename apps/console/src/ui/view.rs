use std::fmt::Write as _;

use shared::domain::{QueryOptions, RenderRegion, TableLink, TableName};

use crate::controller::events::{UiErrorCategory, UiEvent};

/// Everything the page shows. Known tables outlive a reload; the rest is
/// rebuilt from scratch.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UiState {
    pub upload_result: String,
    pub api_result: String,
    pub query_input: String,
    pub options: QueryOptions,
    pub links: Vec<TableLink>,
    pub alert: Option<String>,
    known_tables: Vec<TableName>,
}

impl UiState {
    pub fn new(tables: impl IntoIterator<Item = TableName>) -> Self {
        let mut state = Self::default();
        for table in tables {
            state.remember_table(table);
        }
        state.links = state.generate_links();
        state
    }

    pub fn region(&self, region: RenderRegion) -> &str {
        match region {
            RenderRegion::UploadResult => &self.upload_result,
            RenderRegion::ApiResult => &self.api_result,
        }
    }

    pub fn set_region(&mut self, region: RenderRegion, text: String) {
        match region {
            RenderRegion::UploadResult => self.upload_result = text,
            RenderRegion::ApiResult => self.api_result = text,
        }
    }

    pub fn remember_table(&mut self, table: TableName) {
        if !self.known_tables.contains(&table) {
            self.known_tables.push(table);
        }
    }

    #[cfg(test)]
    pub fn known_tables(&self) -> &[TableName] {
        &self.known_tables
    }

    /// Links are numbered from 1 on screen.
    pub fn link(&self, number: usize) -> Option<&TableLink> {
        number.checked_sub(1).and_then(|index| self.links.get(index))
    }

    pub fn reload(&mut self) {
        let known_tables = std::mem::take(&mut self.known_tables);
        *self = Self {
            known_tables,
            ..Self::default()
        };
        self.links = self.generate_links();
    }

    fn generate_links(&self) -> Vec<TableLink> {
        self.known_tables.iter().cloned().map(TableLink::new).collect()
    }
}

pub fn render_page(state: &UiState) -> String {
    let mut page = String::new();
    let _ = writeln!(page, "== sheet2api ==");
    let _ = writeln!(page, "{}", render_links(state));
    let _ = writeln!(page, "query field: {}", render_query_field(state));
    let _ = writeln!(page, "{}", render_region(state, RenderRegion::UploadResult));
    let _ = write!(page, "{}", render_region(state, RenderRegion::ApiResult));
    page
}

pub fn render_links(state: &UiState) -> String {
    if state.links.is_empty() {
        return "tables: (none yet, upload a file)".to_string();
    }
    let mut out = String::from("tables:");
    for (index, link) in state.links.iter().enumerate() {
        let _ = write!(out, "\n  [{}] {} (view {})", index + 1, link.table, index + 1);
    }
    out
}

pub fn render_region(state: &UiState, region: RenderRegion) -> String {
    format!("[{}]\n{}", region.label(), state.region(region))
}

fn render_query_field(state: &UiState) -> String {
    let mut field = if state.query_input.is_empty() {
        "(empty)".to_string()
    } else {
        state.query_input.clone()
    };
    let pairs = state.options.query_pairs();
    if !pairs.is_empty() {
        let options: Vec<String> = pairs.iter().map(|(k, v)| format!("{k}={v}")).collect();
        let _ = write!(field, " [{}]", options.join(", "));
    }
    field
}

/// What to print after `event` has been applied to `state`.
pub fn describe(state: &UiState, event: &UiEvent) -> Option<String> {
    match event {
        UiEvent::Render { region, .. } => Some(render_region(state, *region)),
        UiEvent::QueryInputChanged(value) => Some(format!("query field: {value}")),
        UiEvent::TableDiscovered(_) => None,
        UiEvent::Error(err) => match (err.category(), err.context().region()) {
            (UiErrorCategory::Request, Some(region)) => Some(render_region(state, region)),
            _ => Some(format!("alert: {}", err.display_text())),
        },
        UiEvent::Reload => Some(render_page(state)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(name: &str) -> TableName {
        TableName::parse(name).expect("table name")
    }

    #[test]
    fn new_state_links_configured_tables_once() {
        let state = UiState::new([table("orders"), table("users"), table("orders")]);
        assert_eq!(state.links.len(), 2);
        assert_eq!(state.link(1).map(|l| l.table.as_str()), Some("orders"));
        assert_eq!(state.link(2).map(|l| l.table.as_str()), Some("users"));
        assert!(state.link(0).is_none());
        assert!(state.link(3).is_none());
    }

    #[test]
    fn reload_clears_page_but_keeps_known_tables() {
        let mut state = UiState::new([table("orders")]);
        state.upload_result = "{}".to_string();
        state.api_result = "[]".to_string();
        state.query_input = "orders".to_string();
        state.options.limit = Some(3);
        state.alert = Some("hi".to_string());
        state.remember_table(table("sales"));
        assert_eq!(state.links.len(), 1, "links only regenerate on reload");

        state.reload();

        assert_eq!(state.upload_result, "");
        assert_eq!(state.api_result, "");
        assert_eq!(state.query_input, "");
        assert_eq!(state.options, QueryOptions::default());
        assert_eq!(state.alert, None);
        assert_eq!(state.known_tables().len(), 2);
        let links: Vec<&str> = state.links.iter().map(|l| l.table.as_str()).collect();
        assert_eq!(links, vec!["orders", "sales"]);
    }

    #[test]
    fn page_shows_links_query_field_and_regions() {
        let mut state = UiState::new([table("orders")]);
        state.query_input = "orders".to_string();
        state.options.search = Some("red".to_string());
        state.api_result = "[]".to_string();

        let page = render_page(&state);
        assert!(page.contains("[1] orders (view 1)"));
        assert!(page.contains("query field: orders [search=red]"));
        assert!(page.contains("[upload]\n"));
        assert!(page.ends_with("[api]\n[]"));
    }

    #[test]
    fn empty_page_hints_at_upload() {
        let page = render_page(&UiState::default());
        assert!(page.contains("tables: (none yet, upload a file)"));
        assert!(page.contains("query field: (empty)"));
    }
}
