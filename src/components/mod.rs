pub mod card_grid;
pub mod detail_overlay;
pub mod search_bar;

// Re-export core Component trait
pub use tui_dispatch::Component;

pub use card_grid::{CardGrid, CardGridProps};
pub use detail_overlay::{DetailOverlay, DetailOverlayProps};
pub use search_bar::{SearchBar, SearchBarProps};
