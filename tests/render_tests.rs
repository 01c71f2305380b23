//! Render snapshot tests for the grid, search bar, and detail overlay.

use pokedex::{
    action::Action,
    components::{
        CardGrid, CardGridProps, Component, DetailOverlay, DetailOverlayProps, SearchBar,
        SearchBarProps,
    },
    reducer::reducer,
    state::{
        AppState, CatalogueEntry, DetailedEntity, EntityStat, FullDetail, OverlayState,
        SpeciesInfo,
    },
};
use tui_dispatch::testing::*;
use tui_dispatch::DataResource;

fn displayed_state() -> AppState {
    let mut state = AppState::default();
    state.catalogue = DataResource::Loaded(vec![
        CatalogueEntry {
            id: 1,
            name: "bulbasaur".into(),
        },
        CatalogueEntry {
            id: 25,
            name: "pikachu".into(),
        },
    ]);
    state.displayed = vec![
        DetailedEntity {
            id: 1,
            name: "bulbasaur".into(),
            types: vec!["grass".into(), "poison".into()],
        },
        DetailedEntity {
            id: 25,
            name: "pikachu".into(),
            types: vec!["electric".into()],
        },
    ];
    state
}

#[test]
fn test_grid_shows_cards_and_hints() {
    let mut render = RenderHarness::new(80, 24);
    let mut component = CardGrid;
    let state = displayed_state();

    let output = render.render_to_string_plain(|frame| {
        component.render(
            frame,
            frame.area(),
            CardGridProps {
                state: &state,
                is_focused: true,
            },
        );
    });

    assert!(output.contains("POKEDEX"));
    assert!(output.contains("#001"));
    assert!(output.contains("Bulbasaur"));
    assert!(output.contains("#025"));
    assert!(output.contains("Pikachu"));
    assert!(output.contains("grass"));
}

#[test]
fn test_grid_shows_params_line() {
    let mut render = RenderHarness::new(80, 24);
    let mut component = CardGrid;
    let mut state = displayed_state();
    state.view.set_query("pika".into());
    state.sync_params();

    let output = render.render_to_string_plain(|frame| {
        component.render(
            frame,
            frame.area(),
            CardGridProps {
                state: &state,
                is_focused: true,
            },
        );
    });

    assert!(output.contains("query=pika"));
}

#[test]
fn test_search_bar_shows_input() {
    let mut render = RenderHarness::new(60, 1);
    let mut component = SearchBar::new();

    let output = render.render_to_string_plain(|frame| {
        component.render(
            frame,
            frame.area(),
            SearchBarProps {
                value: "charmander",
                is_focused: true,
            },
        );
    });

    assert!(output.contains("charmander"));
}

#[test]
fn test_overlay_about_and_stats_tabs() {
    let mut overlay = OverlayState::open(25, "pikachu".into());
    overlay.detail = DataResource::Loaded(FullDetail {
        id: 25,
        name: "pikachu".into(),
        types: vec!["electric".into()],
        height: 4,
        weight: 60,
        stats: vec![EntityStat {
            name: "speed".into(),
            value: 90,
        }],
        sprite: Some("http://img/25.png".into()),
    });
    overlay.species = DataResource::Loaded(SpeciesInfo {
        genus: Some("Mouse Pokémon".into()),
        generation: "generation-i".into(),
        gender_rate: 4,
    });

    let mut render = RenderHarness::new(80, 24);
    let mut component = DetailOverlay::new();

    let about = render.render_to_string_plain(|frame| {
        component.render(
            frame,
            frame.area(),
            DetailOverlayProps {
                overlay: &overlay,
                is_focused: true,
            },
        );
    });
    assert!(about.contains("Pikachu"));
    assert!(about.contains("Mouse Pokémon"));
    assert!(about.contains("Generation"));
    assert!(about.contains("Male/Female"));

    overlay.tab = overlay.tab.toggle();
    let stats = render.render_to_string_plain(|frame| {
        component.render(
            frame,
            frame.area(),
            DetailOverlayProps {
                overlay: &overlay,
                is_focused: true,
            },
        );
    });
    assert!(stats.contains("SPD"));
    assert!(stats.contains("90"));
}

#[test]
fn test_full_flow_render_with_store_harness() {
    let mut harness = EffectStoreTestHarness::new(AppState::default(), reducer);
    let mut component = CardGrid;

    harness.dispatch_collect(Action::Init);
    let loading = harness.render_plain(80, 24, |frame, area, state| {
        component.render(
            frame,
            area,
            CardGridProps {
                state,
                is_focused: true,
            },
        );
    });
    assert!(loading.contains("Loading Pokemon..."));

    harness.dispatch_collect(Action::CatalogueDidLoad(vec![CatalogueEntry {
        id: 7,
        name: "squirtle".into(),
    }]));
    harness.dispatch_collect(Action::BatchDidLoad {
        seq: 1,
        entities: vec![DetailedEntity {
            id: 7,
            name: "squirtle".into(),
            types: vec!["water".into()],
        }],
    });

    let loaded = harness.render_plain(80, 24, |frame, area, state| {
        component.render(
            frame,
            area,
            CardGridProps {
                state,
                is_focused: true,
            },
        );
    });
    assert!(loaded.contains("#007"));
    assert!(loaded.contains("Squirtle"));
}
