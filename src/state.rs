//! Application state.

use std::collections::{HashMap, HashSet};

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tui_dispatch::DataResource;

use crate::params;
use crate::view::ViewState;

/// Tick subscription interval.
pub const TICK_MS: u64 = 100;
/// Overlay navigation guard length in ticks (~300 ms).
pub const NAV_GUARD_TICKS: u8 = 3;

/// Card geometry for the grid layout.
pub const CARD_WIDTH: u16 = 22;
pub const CARD_HEIGHT: u16 = 7;

/// Cards per row for a given terminal width, never below one.
pub fn grid_columns(width: u16) -> usize {
    ((width / CARD_WIDTH) as usize).max(1)
}

/// One entry of the immutable catalogue index.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct CatalogueEntry {
    pub id: u16,
    pub name: String,
}

/// A catalogue entry hydrated with its types, enough to draw a card.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct DetailedEntity {
    pub id: u16,
    pub name: String,
    pub types: Vec<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct EntityStat {
    pub name: String,
    pub value: u16,
}

/// Everything the overlay's about/stats tabs need from `/pokemon/{id}`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct FullDetail {
    pub id: u16,
    pub name: String,
    pub types: Vec<String>,
    /// Decimetres, shown as metres.
    pub height: u16,
    /// Hectograms, shown as kilograms.
    pub weight: u16,
    pub stats: Vec<EntityStat>,
    pub sprite: Option<String>,
}

/// Flavour data from `/pokemon-species/{id}`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct SpeciesInfo {
    /// English genus, e.g. "Mouse Pokémon".
    pub genus: Option<String>,
    pub generation: String,
    pub gender_rate: i8,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub enum OverlayTab {
    #[default]
    About,
    Stats,
}

impl OverlayTab {
    pub fn toggle(self) -> Self {
        match self {
            OverlayTab::About => OverlayTab::Stats,
            OverlayTab::Stats => OverlayTab::About,
        }
    }
}

/// The open detail overlay. Both resources restart from `Loading` on every
/// open and on every prev/next step; the tab survives navigation.
#[derive(Clone, Debug, Serialize, Deserialize, JsonSchema)]
pub struct OverlayState {
    pub id: u16,
    pub name: String,
    pub tab: OverlayTab,
    pub detail: DataResource<FullDetail>,
    pub species: DataResource<SpeciesInfo>,
    /// While non-zero, prev/next presses are dropped.
    pub nav_guard_ticks: u8,
}

impl OverlayState {
    pub fn open(id: u16, name: String) -> Self {
        Self {
            id,
            name,
            tab: OverlayTab::default(),
            detail: DataResource::Loading,
            species: DataResource::Loading,
            nav_guard_ticks: 0,
        }
    }

    /// Point the overlay at a different entity, keeping the active tab.
    pub fn retarget(&mut self, id: u16, name: String) {
        self.id = id;
        self.name = name;
        self.detail = DataResource::Loading;
        self.species = DataResource::Loading;
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct SearchState {
    pub active: bool,
    pub input: String,
}

#[derive(Clone, Debug, tui_dispatch::DebugState, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct AppState {
    /// Full catalogue index, fetched once at start-up.
    #[debug(skip)]
    pub catalogue: DataResource<Vec<CatalogueEntry>>,
    #[debug(section = "view", label = "view", debug_fmt)]
    pub view: ViewState,
    /// The hydrated batch currently on screen.
    #[debug(skip)]
    pub displayed: Vec<DetailedEntity>,
    /// Sequence number of the most recently issued hydration batch; results
    /// carrying an older number are discarded.
    #[debug(section = "view", label = "batch seq", debug_fmt)]
    pub batch_seq: u64,
    #[debug(section = "view", label = "selected", debug_fmt)]
    pub selected_index: usize,
    #[debug(skip)]
    pub terminal_size: (u16, u16),
    #[debug(skip)]
    pub search: SearchState,
    /// Per-entity type cache backing the lazy card fetches.
    #[debug(skip)]
    pub types_cache: HashMap<u16, Vec<String>>,
    #[debug(skip)]
    pub types_inflight: HashSet<u16>,
    #[debug(skip)]
    pub overlay: Option<OverlayState>,
    /// Overlay id restored from `--view`, applied once the catalogue loads.
    #[debug(skip)]
    pub pending_overlay: Option<u16>,
    /// Encoded share-params string, the single rendering of the view state.
    #[debug(section = "view", label = "params")]
    pub params: String,
    #[debug(section = "status", label = "message", debug_fmt)]
    pub message: Option<String>,
    #[debug(skip)]
    pub tick: u64,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            catalogue: DataResource::Empty,
            view: ViewState::default(),
            displayed: Vec::new(),
            batch_seq: 0,
            selected_index: 0,
            terminal_size: (80, 24),
            search: SearchState::default(),
            types_cache: HashMap::new(),
            types_inflight: HashSet::new(),
            overlay: None,
            pending_overlay: None,
            params: String::new(),
            message: None,
            tick: 0,
        }
    }
}

impl AppState {
    pub fn selected_entity(&self) -> Option<&DetailedEntity> {
        self.displayed.get(self.selected_index)
    }

    /// Move the selection to `index`, clamped to the displayed list. Returns
    /// whether the selection actually moved.
    pub fn set_selected_index(&mut self, index: usize) -> bool {
        if self.displayed.is_empty() {
            return false;
        }
        let clamped = index.min(self.displayed.len() - 1);
        if clamped == self.selected_index {
            return false;
        }
        self.selected_index = clamped;
        true
    }

    /// Keep the selection inside the displayed list after it changes.
    pub fn clamp_selection(&mut self) {
        if self.displayed.is_empty() {
            self.selected_index = 0;
        } else {
            self.selected_index = self.selected_index.min(self.displayed.len() - 1);
        }
    }

    /// Re-encode the share params from the view and the open overlay.
    pub fn sync_params(&mut self) {
        self.params = params::encode(
            &self.view.query,
            self.view.sort_key,
            self.view.sort_direction,
            self.overlay.as_ref().map(|overlay| overlay.id),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn displayed(ids: &[u16]) -> Vec<DetailedEntity> {
        ids.iter()
            .map(|&id| DetailedEntity {
                id,
                name: format!("mon{id}"),
                types: Vec::new(),
            })
            .collect()
    }

    #[test]
    fn test_set_selected_index_clamps() {
        let mut state = AppState::default();
        state.displayed = displayed(&[1, 2, 3]);
        assert!(state.set_selected_index(99));
        assert_eq!(state.selected_index, 2);
        assert!(!state.set_selected_index(5));
    }

    #[test]
    fn test_set_selected_index_empty_list() {
        let mut state = AppState::default();
        assert!(!state.set_selected_index(0));
        assert_eq!(state.selected_index, 0);
    }

    #[test]
    fn test_sync_params_includes_overlay() {
        let mut state = AppState::default();
        state.view.set_query("pika".into());
        state.overlay = Some(OverlayState::open(25, "pikachu".into()));
        state.sync_params();
        assert_eq!(state.params, "query=pika&pokemonId=25");
        state.overlay = None;
        state.sync_params();
        assert_eq!(state.params, "query=pika");
    }

    #[test]
    fn test_grid_columns_minimum_one() {
        assert_eq!(grid_columns(10), 1);
        assert_eq!(grid_columns(80), 3);
    }

    #[test]
    fn test_overlay_retarget_keeps_tab() {
        let mut overlay = OverlayState::open(1, "bulbasaur".into());
        overlay.tab = OverlayTab::Stats;
        overlay.detail = DataResource::Failed("boom".into());
        overlay.retarget(2, "ivysaur".into());
        assert_eq!(overlay.id, 2);
        assert_eq!(overlay.tab, OverlayTab::Stats);
        assert!(overlay.detail.is_loading());
        assert!(overlay.species.is_loading());
    }
}
