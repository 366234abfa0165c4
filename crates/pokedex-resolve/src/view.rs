//! Client view state for the browse screen.
//!
//! The screen offers either a search box or the filter checkboxes, never both
//! at once. That choice lives here, on the client side: whichever mode is
//! active decides which inputs go into the one combined [`ListQuery`].

use pokedex_store::Filters;
use serde::{Deserialize, Serialize};

use crate::types::ListQuery;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ControlMode {
    #[default]
    Search,
    Filter,
}

/// Which filter set a checkbox belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FilterKind {
    Type,
    Weakness,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewState {
    pub mode: ControlMode,
    pub search_text: String,
    pub selected: Filters,
}

impl ViewState {
    pub fn new(mode: ControlMode) -> Self {
        Self {
            mode,
            ..Self::default()
        }
    }

    /// Switch mode. Inputs of the inactive mode are kept but not sent.
    pub fn set_mode(&mut self, mode: ControlMode) {
        self.mode = mode;
    }

    pub fn set_search_text(&mut self, text: impl Into<String>) {
        self.search_text = text.into();
    }

    /// Checkbox change: add the value when checked, remove it when unchecked.
    pub fn toggle(&mut self, kind: FilterKind, value: &str, checked: bool) {
        let set = match kind {
            FilterKind::Type => &mut self.selected.types,
            FilterKind::Weakness => &mut self.selected.weaknesses,
        };
        let present = set.iter().any(|v| v == value);
        if checked && !present {
            set.push(value.to_string());
        } else if !checked && present {
            set.retain(|v| v != value);
        }
    }

    /// The combined list query for the current mode.
    pub fn to_query(&self) -> ListQuery {
        match self.mode {
            ControlMode::Search => {
                let query = ListQuery::new();
                if self.search_text.trim().is_empty() {
                    query
                } else {
                    query.search_term(self.search_text.clone())
                }
            }
            ControlMode::Filter => ListQuery::new().filters(self.selected.clone()),
        }
    }
}
