//! Side effects the reducer requests; `main.rs` turns them into keyed tasks.

use crate::state::CatalogueEntry;

#[derive(Clone, Debug, PartialEq)]
pub enum Effect {
    /// Fetch the full catalogue index.
    LoadCatalogue,
    /// Hydrate the visible entries with their types, all-or-nothing.
    HydrateBatch { seq: u64, entries: Vec<CatalogueEntry> },
    /// Fetch types for one card while a search is active.
    LoadCardTypes { id: u16 },
    /// Overlay fetches, issued together on open and on every nav step.
    LoadDetail { id: u16 },
    LoadSpecies { id: u16 },
}
