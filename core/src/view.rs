//! Render models derived from the store's slots.
//!
//! Pure functions from view-state to what a screen draws. Hosts that render
//! natively can use these to keep the list and detail screens consistent
//! across platforms. Nothing here performs I/O.

use crate::state::ViewState;
use crate::store::{DetailState, ListState};

/// Rows drawn while the listing is loading.
pub const PLACEHOLDER_ROWS: usize = 20;

pub const LIST_ERROR_NOTICE: &str = "Error loading list. Please try again later.";

const NOT_AVAILABLE: &str = "N/A";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListRow {
    /// Navigation key passed to `load_detail`. Empty for placeholders.
    pub key: String,
    pub label: String,
    pub placeholder: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListView {
    Rows(Vec<ListRow>),
    Notice(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetailView {
    pub sprite: Option<String>,
    pub lines: Vec<String>,
}

/// Project the list slot. `None` (never triggered) renders as no rows.
pub fn list_view(state: Option<&ListState>) -> ListView {
    match state {
        None => ListView::Rows(Vec::new()),
        Some(ViewState::Loading) => ListView::Rows(
            (0..PLACEHOLDER_ROWS)
                .map(|_| ListRow {
                    key: String::new(),
                    label: String::new(),
                    placeholder: true,
                })
                .collect(),
        ),
        Some(ViewState::Ready { data }) => ListView::Rows(
            data.iter()
                .map(|summary| ListRow {
                    key: summary.name.clone(),
                    label: capitalize(&summary.name),
                    placeholder: false,
                })
                .collect(),
        ),
        Some(ViewState::Error { .. }) => ListView::Notice(LIST_ERROR_NOTICE.to_string()),
    }
}

/// Project the detail slot. Only `Ready` has anything to draw; a failed
/// detail fetch renders the same neutral blank as one still loading.
pub fn detail_view(state: Option<&DetailState>) -> Option<DetailView> {
    let detail = state?.data()?;
    let types: Vec<&str> = detail.types.iter().map(|t| t.name.as_str()).collect();
    let stats = match detail.stats.first() {
        Some(stat) => format!("Stats: {} / {} / {}", stat.base_value, stat.effort, stat.name),
        None => format!("Stats: {NOT_AVAILABLE} / {NOT_AVAILABLE} / {NOT_AVAILABLE}"),
    };
    Some(DetailView {
        sprite: detail.sprite.clone(),
        lines: vec![
            format!("Name: {}", detail.name),
            format!("Height: {}", detail.height),
            format!("Weight: {}", detail.weight),
            format!("Types: [{}]", types.join(", ")),
            stats,
        ],
    })
}

fn capitalize(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
