//! Reducer - pure function: (state, action) -> DispatchResult

use tui_dispatch::{DataResource, DispatchResult};

use crate::action::Action;
use crate::effect::Effect;
use crate::state::{AppState, OverlayState, NAV_GUARD_TICKS};
use crate::view::derive_display;

/// The reducer handles all state transitions.
pub fn reducer(state: &mut AppState, action: Action) -> DispatchResult<Effect> {
    match action {
        // ===== Catalogue =====
        Action::Init => {
            state.catalogue = DataResource::Loading;
            state.view.is_loading = true;
            state.sync_params();
            DispatchResult::changed_with(Effect::LoadCatalogue)
        }

        Action::CatalogueDidLoad(entries) => {
            state.catalogue = DataResource::Loaded(entries);
            let mut effects = rehydrate(state);
            if let Some(id) = state.pending_overlay.take() {
                if let Some(effect_pair) = open_overlay_for_id(state, id) {
                    effects.extend(effect_pair);
                }
            }
            DispatchResult::changed_with_many(effects)
        }

        Action::CatalogueDidError(error) => {
            state.catalogue = DataResource::Failed(error.clone());
            state.message = Some(error);
            // No catalogue means nothing to show; the grid stays on its
            // loading screen.
            DispatchResult::changed()
        }

        // ===== Search input =====
        Action::SearchStart => {
            state.search.active = true;
            state.search.input = state.view.query.clone();
            DispatchResult::changed()
        }

        Action::SearchInputChange(input) => {
            if !state.search.active {
                return DispatchResult::unchanged();
            }
            state.search.input = input;
            DispatchResult::changed()
        }

        Action::SearchCancel => {
            if !state.search.active {
                return DispatchResult::unchanged();
            }
            state.search.active = false;
            state.search.input.clear();
            DispatchResult::changed()
        }

        Action::SearchSubmit(input) => {
            if !state.search.active {
                return DispatchResult::unchanged();
            }
            state.search.active = false;
            let query = input.trim().to_string();
            if query == state.view.query {
                return DispatchResult::changed();
            }
            state.view.set_query(query);
            state.selected_index = 0;
            DispatchResult::changed_with_many(rehydrate(state))
        }

        // ===== View controls =====
        Action::SortKeySet(sort_key) => {
            if state.view.sort_key == sort_key {
                return DispatchResult::unchanged();
            }
            state.view.set_sort_key(sort_key);
            state.selected_index = 0;
            DispatchResult::changed_with_many(rehydrate(state))
        }

        Action::OrderSet(direction) => {
            if state.view.sort_direction == direction {
                return DispatchResult::unchanged();
            }
            state.view.set_sort_direction(direction);
            state.selected_index = 0;
            DispatchResult::changed_with_many(rehydrate(state))
        }

        Action::LoadMore => {
            let Some(catalogue) = state.catalogue.data() else {
                return DispatchResult::unchanged();
            };
            // Load-more only applies to the unfiltered, paginated view.
            if !state.view.query.is_empty() || state.view.display_count >= catalogue.len() {
                return DispatchResult::unchanged();
            }
            state.view.load_more();
            DispatchResult::changed_with_many(rehydrate(state))
        }

        // ===== Hydration results =====
        Action::BatchDidLoad { seq, entities } => {
            if seq != state.batch_seq {
                // A newer batch was issued while this one was in flight.
                return DispatchResult::unchanged();
            }
            for entity in &entities {
                if !entity.types.is_empty() {
                    state.types_cache.insert(entity.id, entity.types.clone());
                }
            }
            state.displayed = entities;
            state.view.is_loading = false;
            state.clamp_selection();
            DispatchResult::changed_with_many(card_type_effects(state))
        }

        Action::BatchDidError { seq, error } => {
            if seq != state.batch_seq {
                return DispatchResult::unchanged();
            }
            // Previous cards stay on screen.
            state.view.is_loading = false;
            state.message = Some(error);
            DispatchResult::changed_with_many(card_type_effects(state))
        }

        // ===== Per-card type fetches =====
        Action::CardTypesDidLoad { id, types } => {
            state.types_inflight.remove(&id);
            state.types_cache.insert(id, types.clone());
            let Some(entity) = state.displayed.iter_mut().find(|entity| entity.id == id)
            else {
                return DispatchResult::unchanged();
            };
            entity.types = types;
            DispatchResult::changed()
        }

        Action::CardTypesDidError { id, error } => {
            state.types_inflight.remove(&id);
            state.message = Some(error);
            DispatchResult::changed()
        }

        // ===== Grid selection =====
        Action::SelectionMove(delta) => {
            let target = state.selected_index.saturating_add_signed(delta as isize);
            if state.set_selected_index(target) {
                DispatchResult::changed()
            } else {
                DispatchResult::unchanged()
            }
        }

        Action::GridSelect(index) => {
            if state.set_selected_index(index) {
                DispatchResult::changed()
            } else {
                DispatchResult::unchanged()
            }
        }

        // ===== Detail overlay =====
        Action::OverlayOpen => {
            let Some(entity) = state.selected_entity() else {
                return DispatchResult::unchanged();
            };
            let (id, name) = (entity.id, entity.name.clone());
            state.overlay = Some(OverlayState::open(id, name));
            state.sync_params();
            DispatchResult::changed_with_many(vec![
                Effect::LoadDetail { id },
                Effect::LoadSpecies { id },
            ])
        }

        Action::OverlayClose => {
            if state.overlay.take().is_none() {
                return DispatchResult::unchanged();
            }
            state.sync_params();
            DispatchResult::changed()
        }

        Action::OverlayNext => navigate_overlay(state, 1),
        Action::OverlayPrev => navigate_overlay(state, -1),

        Action::OverlayTabSet(tab) => {
            let Some(overlay) = state.overlay.as_mut() else {
                return DispatchResult::unchanged();
            };
            if overlay.tab == tab {
                return DispatchResult::unchanged();
            }
            overlay.tab = tab;
            DispatchResult::changed()
        }

        Action::DetailDidLoad { id, detail } => {
            let Some(overlay) = state.overlay.as_mut().filter(|overlay| overlay.id == id)
            else {
                return DispatchResult::unchanged();
            };
            overlay.detail = DataResource::Loaded(detail);
            DispatchResult::changed()
        }

        Action::DetailDidError { id, error } => {
            if !state.overlay.as_ref().is_some_and(|overlay| overlay.id == id) {
                return DispatchResult::unchanged();
            }
            state.message = Some(error);
            DispatchResult::changed()
        }

        Action::SpeciesDidLoad { id, species } => {
            let Some(overlay) = state.overlay.as_mut().filter(|overlay| overlay.id == id)
            else {
                return DispatchResult::unchanged();
            };
            overlay.species = DataResource::Loaded(species);
            DispatchResult::changed()
        }

        Action::SpeciesDidError { id, error } => {
            if !state.overlay.as_ref().is_some_and(|overlay| overlay.id == id) {
                return DispatchResult::unchanged();
            }
            state.message = Some(error);
            DispatchResult::changed()
        }

        // ===== Shell =====
        Action::UiTerminalResize(width, height) => {
            if state.terminal_size == (width, height) {
                return DispatchResult::unchanged();
            }
            state.terminal_size = (width, height);
            DispatchResult::changed()
        }

        Action::Render => DispatchResult::changed(),

        Action::Tick => {
            state.tick = state.tick.wrapping_add(1);
            let mut active = state.view.is_loading;
            if let Some(overlay) = state.overlay.as_mut() {
                if overlay.nav_guard_ticks > 0 {
                    overlay.nav_guard_ticks -= 1;
                    active = true;
                }
                if overlay.detail.is_loading() || overlay.species.is_loading() {
                    active = true;
                }
            }
            if active {
                DispatchResult::changed()
            } else {
                DispatchResult::unchanged()
            }
        }

        Action::Quit => DispatchResult::unchanged(),
    }
}

/// Re-derive the visible slice, stamp a fresh batch sequence, and request
/// hydration. Also refreshes the share-params string.
fn rehydrate(state: &mut AppState) -> Vec<Effect> {
    state.sync_params();
    let Some(catalogue) = state.catalogue.data() else {
        return Vec::new();
    };
    let entries = derive_display(catalogue, &state.view);
    state.view.is_loading = true;
    state.batch_seq = state.batch_seq.wrapping_add(1);
    vec![Effect::HydrateBatch {
        seq: state.batch_seq,
        entries,
    }]
}

/// Per-card type fetches for displayed entities still missing types. Cached
/// ids are patched in place; in-flight ids are skipped.
fn card_type_effects(state: &mut AppState) -> Vec<Effect> {
    if state.view.query.is_empty() {
        return Vec::new();
    }
    let mut effects = Vec::new();
    let missing: Vec<u16> = state
        .displayed
        .iter()
        .filter(|entity| entity.types.is_empty())
        .map(|entity| entity.id)
        .collect();
    for id in missing {
        if let Some(types) = state.types_cache.get(&id).cloned() {
            if let Some(entity) = state.displayed.iter_mut().find(|entity| entity.id == id) {
                entity.types = types;
            }
            continue;
        }
        if state.types_inflight.insert(id) {
            effects.push(Effect::LoadCardTypes { id });
        }
    }
    effects
}

/// Open the overlay for a catalogue id. Used when restoring a shared view
/// with a `pokemonId`; the hydration batch has not landed yet, so the lookup
/// goes against the catalogue itself.
fn open_overlay_for_id(state: &mut AppState, id: u16) -> Option<Vec<Effect>> {
    let name = state
        .catalogue
        .data()?
        .iter()
        .find(|entry| entry.id == id)?
        .name
        .clone();
    state.overlay = Some(OverlayState::open(id, name));
    state.sync_params();
    Some(vec![Effect::LoadDetail { id }, Effect::LoadSpecies { id }])
}

/// Step the overlay to the adjacent entity in the displayed list, wrapping at
/// both ends. Re-entrant presses inside the guard window are dropped.
fn navigate_overlay(state: &mut AppState, step: i64) -> DispatchResult<Effect> {
    let Some(overlay) = state.overlay.as_ref() else {
        return DispatchResult::unchanged();
    };
    if overlay.nav_guard_ticks > 0 {
        return DispatchResult::unchanged();
    }
    let Some(current) = state
        .displayed
        .iter()
        .position(|entity| entity.id == overlay.id)
    else {
        return DispatchResult::unchanged();
    };
    let len = state.displayed.len() as i64;
    let next = (current as i64 + step).rem_euclid(len) as usize;
    let (id, name) = (state.displayed[next].id, state.displayed[next].name.clone());
    let Some(overlay) = state.overlay.as_mut() else {
        return DispatchResult::unchanged();
    };
    overlay.retarget(id, name);
    overlay.nav_guard_ticks = NAV_GUARD_TICKS;
    state.selected_index = next;
    state.sync_params();
    DispatchResult::changed_with_many(vec![
        Effect::LoadDetail { id },
        Effect::LoadSpecies { id },
    ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::{CatalogueEntry, DetailedEntity};

    fn entry(id: u16, name: &str) -> CatalogueEntry {
        CatalogueEntry {
            id,
            name: name.to_string(),
        }
    }

    fn loaded_state() -> AppState {
        let mut state = AppState::default();
        let result = reducer(&mut state, Action::Init);
        assert!(matches!(result.effects[0], Effect::LoadCatalogue));
        reducer(
            &mut state,
            Action::CatalogueDidLoad(vec![
                entry(1, "bulbasaur"),
                entry(25, "pikachu"),
                entry(150, "mewtwo"),
            ]),
        );
        state
    }

    fn complete_batch(state: &mut AppState) {
        let entities: Vec<DetailedEntity> = state
            .catalogue
            .data()
            .map(|catalogue| {
                derive_display(catalogue, &state.view)
                    .into_iter()
                    .map(|entry| DetailedEntity {
                        id: entry.id,
                        name: entry.name,
                        types: vec!["normal".to_string()],
                    })
                    .collect()
            })
            .unwrap_or_default();
        reducer(
            state,
            Action::BatchDidLoad {
                seq: state.batch_seq,
                entities,
            },
        );
    }

    #[test]
    fn test_catalogue_load_issues_hydration() {
        let state = loaded_state();
        assert!(state.catalogue.is_loaded());
        assert!(state.view.is_loading);
        assert_eq!(state.batch_seq, 1);
    }

    #[test]
    fn test_stale_batch_discarded() {
        let mut state = loaded_state();
        // A sort change bumps the sequence before the first batch lands.
        reducer(&mut state, Action::SortKeySet(crate::view::SortKey::Name));
        assert_eq!(state.batch_seq, 2);

        let result = reducer(
            &mut state,
            Action::BatchDidLoad {
                seq: 1,
                entities: vec![DetailedEntity {
                    id: 1,
                    name: "bulbasaur".into(),
                    types: vec![],
                }],
            },
        );
        assert!(!result.changed);
        assert!(state.displayed.is_empty());
        assert!(state.view.is_loading);
    }

    #[test]
    fn test_batch_error_keeps_previous_cards() {
        let mut state = loaded_state();
        complete_batch(&mut state);
        assert_eq!(state.displayed.len(), 3);

        reducer(&mut state, Action::SortKeySet(crate::view::SortKey::Name));
        let seq = state.batch_seq;
        let result = reducer(
            &mut state,
            Action::BatchDidError {
                seq,
                error: "timeout".into(),
            },
        );
        assert!(result.changed);
        assert_eq!(state.displayed.len(), 3);
        assert!(!state.view.is_loading);
        assert_eq!(state.message.as_deref(), Some("timeout"));
    }

    #[test]
    fn test_search_submit_resets_pagination() {
        let mut state = loaded_state();
        state.view.load_more();
        reducer(&mut state, Action::SearchStart);
        reducer(&mut state, Action::SearchInputChange("pika".into()));
        let result = reducer(&mut state, Action::SearchSubmit("pika".into()));
        assert!(result.changed);
        assert_eq!(state.view.query, "pika");
        assert_eq!(state.view.display_count, crate::view::DISPLAY_STEP);
        assert_eq!(state.params, "query=pika");
        assert!(matches!(
            result.effects[0],
            Effect::HydrateBatch { seq: 2, .. }
        ));
    }

    #[test]
    fn test_search_submit_same_query_is_quiet() {
        let mut state = loaded_state();
        reducer(&mut state, Action::SearchStart);
        let result = reducer(&mut state, Action::SearchSubmit(String::new()));
        assert!(result.changed);
        assert!(result.effects.is_empty());
        assert_eq!(state.batch_seq, 1);
    }

    #[test]
    fn test_load_more_guards() {
        let mut state = loaded_state();
        // Catalogue of 3 with display_count 10: nothing more to load.
        let result = reducer(&mut state, Action::LoadMore);
        assert!(!result.changed);

        state.view.query = "pika".into();
        let result = reducer(&mut state, Action::LoadMore);
        assert!(!result.changed);
    }

    #[test]
    fn test_card_type_dedup() {
        let mut state = loaded_state();
        reducer(&mut state, Action::SearchStart);
        reducer(&mut state, Action::SearchSubmit("a".into()));

        // Batch came back without types (simulating partial hydration data).
        let seq = state.batch_seq;
        let result = reducer(
            &mut state,
            Action::BatchDidLoad {
                seq,
                entities: vec![DetailedEntity {
                    id: 25,
                    name: "pikachu".into(),
                    types: vec![],
                }],
            },
        );
        assert_eq!(result.effects, vec![Effect::LoadCardTypes { id: 25 }]);

        // Same situation again while the fetch is in flight: no second effect.
        let seq = state.batch_seq;
        let result = reducer(
            &mut state,
            Action::BatchDidError {
                seq,
                error: "x".into(),
            },
        );
        assert!(result.effects.is_empty());

        reducer(
            &mut state,
            Action::CardTypesDidLoad {
                id: 25,
                types: vec!["electric".into()],
            },
        );
        assert_eq!(state.displayed[0].types, vec!["electric".to_string()]);
        // Cached now: a later batch missing types patches from the cache.
        let seq = state.batch_seq;
        let result = reducer(
            &mut state,
            Action::BatchDidLoad {
                seq,
                entities: vec![DetailedEntity {
                    id: 25,
                    name: "pikachu".into(),
                    types: vec![],
                }],
            },
        );
        assert!(result.effects.is_empty());
        assert_eq!(state.displayed[0].types, vec!["electric".to_string()]);
    }

    #[test]
    fn test_overlay_open_and_params() {
        let mut state = loaded_state();
        complete_batch(&mut state);
        state.set_selected_index(1);

        let result = reducer(&mut state, Action::OverlayOpen);
        assert!(result.changed);
        assert_eq!(result.effects.len(), 2);
        let overlay = state.overlay.as_ref().unwrap();
        assert_eq!(overlay.id, 25);
        assert!(overlay.detail.is_loading());
        assert_eq!(state.params, "pokemonId=25");

        reducer(&mut state, Action::OverlayClose);
        assert!(state.overlay.is_none());
        assert_eq!(state.params, "");
    }

    #[test]
    fn test_overlay_nav_wraps() {
        let mut state = loaded_state();
        complete_batch(&mut state);
        state.set_selected_index(2);
        reducer(&mut state, Action::OverlayOpen);

        // Wrap from last to first.
        let result = reducer(&mut state, Action::OverlayNext);
        assert!(result.changed);
        assert_eq!(state.overlay.as_ref().unwrap().id, 1);

        // Guard is armed: the immediate follow-up press is dropped.
        let result = reducer(&mut state, Action::OverlayPrev);
        assert!(!result.changed);

        for _ in 0..NAV_GUARD_TICKS {
            reducer(&mut state, Action::Tick);
        }
        // Wrap from first back to last.
        let result = reducer(&mut state, Action::OverlayPrev);
        assert!(result.changed);
        assert_eq!(state.overlay.as_ref().unwrap().id, 150);
    }

    #[test]
    fn test_overlay_nav_noop_when_id_absent() {
        let mut state = loaded_state();
        complete_batch(&mut state);
        reducer(&mut state, Action::OverlayOpen);
        state.displayed.retain(|entity| entity.id != 1);

        let result = reducer(&mut state, Action::OverlayNext);
        assert!(!result.changed);
        assert_eq!(state.overlay.as_ref().unwrap().id, 1);
    }

    #[test]
    fn test_overlay_results_for_other_id_ignored() {
        let mut state = loaded_state();
        complete_batch(&mut state);
        reducer(&mut state, Action::OverlayOpen);

        let result = reducer(
            &mut state,
            Action::SpeciesDidLoad {
                id: 999,
                species: crate::state::SpeciesInfo {
                    genus: None,
                    generation: "generation-i".into(),
                    gender_rate: 4,
                },
            },
        );
        assert!(!result.changed);
        assert!(state.overlay.as_ref().unwrap().species.is_loading());
    }

    #[test]
    fn test_overlay_fetch_error_keeps_loading() {
        let mut state = loaded_state();
        complete_batch(&mut state);
        reducer(&mut state, Action::OverlayOpen);

        let result = reducer(
            &mut state,
            Action::DetailDidError {
                id: 1,
                error: "boom".into(),
            },
        );
        assert!(result.changed);
        assert_eq!(state.message.as_deref(), Some("boom"));
        assert!(state.overlay.as_ref().unwrap().detail.is_loading());
    }

    #[test]
    fn test_pending_overlay_opens_after_catalogue() {
        let mut state = AppState::default();
        state.pending_overlay = Some(25);
        reducer(&mut state, Action::Init);
        let result = reducer(
            &mut state,
            Action::CatalogueDidLoad(vec![entry(1, "bulbasaur"), entry(25, "pikachu")]),
        );
        assert!(result.changed);
        assert!(state.pending_overlay.is_none());
        let overlay = state.overlay.as_ref().unwrap();
        assert_eq!(overlay.id, 25);
        assert_eq!(overlay.name, "pikachu");
        assert!(result
            .effects
            .iter()
            .any(|effect| matches!(effect, Effect::LoadDetail { id: 25 })));
        assert_eq!(state.params, "pokemonId=25");
    }

    #[test]
    fn test_pending_overlay_unknown_id_dropped() {
        let mut state = AppState::default();
        state.pending_overlay = Some(9999);
        reducer(&mut state, Action::Init);
        reducer(&mut state, Action::CatalogueDidLoad(vec![entry(1, "bulbasaur")]));
        assert!(state.overlay.is_none());
        assert!(state.pending_overlay.is_none());
    }

    #[test]
    fn test_selection_clamped_after_smaller_batch() {
        let mut state = loaded_state();
        complete_batch(&mut state);
        state.set_selected_index(2);

        reducer(&mut state, Action::SortKeySet(crate::view::SortKey::Name));
        let seq = state.batch_seq;
        reducer(
            &mut state,
            Action::BatchDidLoad {
                seq,
                entities: vec![DetailedEntity {
                    id: 1,
                    name: "bulbasaur".into(),
                    types: vec!["grass".into()],
                }],
            },
        );
        assert_eq!(state.selected_index, 0);
    }
}
