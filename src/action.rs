//! Every state transition in the app, dispatched through the store.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::state::{CatalogueEntry, DetailedEntity, FullDetail, OverlayTab, SpeciesInfo};
use crate::view::{SortDirection, SortKey};

#[derive(tui_dispatch::Action, Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
#[action(infer_categories)]
pub enum Action {
    /// Kick off the catalogue fetch.
    Init,
    CatalogueDidLoad(Vec<CatalogueEntry>),
    CatalogueDidError(String),

    // Search input (submit-driven; the query only applies on Enter)
    SearchStart,
    SearchInputChange(String),
    SearchCancel,
    SearchSubmit(String),

    // View controls
    SortKeySet(SortKey),
    OrderSet(SortDirection),
    LoadMore,

    // Hydration of the visible batch
    BatchDidLoad { seq: u64, entities: Vec<DetailedEntity> },
    BatchDidError { seq: u64, error: String },

    // Lazy per-card type fetches (search mode)
    CardTypesDidLoad { id: u16, types: Vec<String> },
    CardTypesDidError { id: u16, error: String },

    // Grid selection
    SelectionMove(i16),
    GridSelect(usize),

    // Detail overlay
    OverlayOpen,
    OverlayClose,
    OverlayNext,
    OverlayPrev,
    OverlayTabSet(OverlayTab),
    DetailDidLoad { id: u16, detail: FullDetail },
    DetailDidError { id: u16, error: String },
    SpeciesDidLoad { id: u16, species: SpeciesInfo },
    SpeciesDidError { id: u16, error: String },

    UiTerminalResize(u16, u16),
    /// Re-render only (cursor moves and the like).
    Render,
    Tick,
    Quit,
}
