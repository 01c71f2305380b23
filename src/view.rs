//! Pure view-state controller: query/sort/pagination and the derivation of
//! the visible slice from the immutable catalogue.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::format::format_id;
use crate::state::CatalogueEntry;

/// Page size for the card grid.
pub const DISPLAY_STEP: usize = 10;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub enum SortKey {
    #[default]
    Id,
    Name,
}

impl SortKey {
    pub fn as_param(self) -> &'static str {
        match self {
            SortKey::Id => "id",
            SortKey::Name => "name",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "id" => Some(SortKey::Id),
            "name" => Some(SortKey::Name),
            _ => None,
        }
    }

    pub fn toggle(self) -> Self {
        match self {
            SortKey::Id => SortKey::Name,
            SortKey::Name => SortKey::Id,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            SortKey::Id => "ID",
            SortKey::Name => "Name",
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    pub fn as_param(self) -> &'static str {
        match self {
            SortDirection::Asc => "asc",
            SortDirection::Desc => "desc",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "asc" => Some(SortDirection::Asc),
            "desc" => Some(SortDirection::Desc),
            _ => None,
        }
    }

    pub fn toggle(self) -> Self {
        match self {
            SortDirection::Asc => SortDirection::Desc,
            SortDirection::Desc => SortDirection::Asc,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            SortDirection::Asc => "Asc",
            SortDirection::Desc => "Desc",
        }
    }
}

/// What the user is looking at: search query, sort settings, how many cards
/// are shown, and whether a hydration batch is pending.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct ViewState {
    pub query: String,
    pub sort_key: SortKey,
    pub sort_direction: SortDirection,
    pub display_count: usize,
    pub is_loading: bool,
}

impl Default for ViewState {
    fn default() -> Self {
        Self {
            query: String::new(),
            sort_key: SortKey::default(),
            sort_direction: SortDirection::default(),
            display_count: DISPLAY_STEP,
            is_loading: false,
        }
    }
}

impl ViewState {
    /// Changing the query restarts pagination.
    pub fn set_query(&mut self, query: String) {
        self.query = query;
        self.display_count = DISPLAY_STEP;
    }

    pub fn set_sort_key(&mut self, sort_key: SortKey) {
        self.sort_key = sort_key;
        self.display_count = DISPLAY_STEP;
    }

    pub fn set_sort_direction(&mut self, sort_direction: SortDirection) {
        self.sort_direction = sort_direction;
        self.display_count = DISPLAY_STEP;
    }

    pub fn load_more(&mut self) {
        self.display_count += DISPLAY_STEP;
    }
}

/// Query match: case-insensitive name substring, exact decimal id, or a
/// substring of the zero-padded dex number ("001" finds bulbasaur).
pub fn matches_query(entry: &CatalogueEntry, query: &str) -> bool {
    let query = query.to_lowercase();
    entry.name.to_lowercase().contains(&query)
        || entry.id.to_string() == query
        || format_id(entry.id).contains(&query)
}

/// Filter, stable-sort, and paginate the catalogue. With an active query the
/// whole match set is returned; otherwise the first `display_count` entries.
pub fn derive_display(catalogue: &[CatalogueEntry], view: &ViewState) -> Vec<CatalogueEntry> {
    let mut entries: Vec<CatalogueEntry> = catalogue
        .iter()
        .filter(|entry| view.query.is_empty() || matches_query(entry, &view.query))
        .cloned()
        .collect();

    entries.sort_by(|a, b| {
        let ordering = match view.sort_key {
            SortKey::Id => a.id.cmp(&b.id),
            SortKey::Name => a.name.cmp(&b.name),
        };
        match view.sort_direction {
            SortDirection::Asc => ordering,
            SortDirection::Desc => ordering.reverse(),
        }
    });

    if view.query.is_empty() {
        entries.truncate(view.display_count);
    }
    entries
}
