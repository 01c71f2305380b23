//! Pokedex TUI - a PokeAPI catalogue browser

use std::cell::RefCell;
use std::io;
use std::rc::Rc;
use std::time::Duration;

use clap::Parser;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, layout::Rect, Frame, Terminal};
use tui_dispatch::{
    EffectContext, EffectStoreLike, EffectStoreWithMiddleware, EventBus, EventContext, EventKind,
    EventRoutingState, HandlerResponse, Keybindings, RenderContext, TaskKey,
};
use tui_dispatch_components::centered_rect;
use tui_dispatch_debug::debug::DebugLayer;
use tui_dispatch_debug::{
    DebugCliArgs, DebugRunOutput, DebugSession, DebugSessionError, ReplayItem,
};

use pokedex::action::Action;
use pokedex::api;
use pokedex::components::{
    CardGrid, CardGridProps, Component, DetailOverlay, DetailOverlayProps, SearchBar,
    SearchBarProps,
};
use pokedex::effect::Effect;
use pokedex::params;
use pokedex::reducer::reducer;
use pokedex::state::{AppState, TICK_MS};

/// Pokedex TUI - browse the PokeAPI catalogue
#[derive(Parser, Debug)]
#[command(name = "pokedex")]
#[command(about = "A PokeAPI catalogue browser")]
struct Args {
    /// Restore a shared view, e.g. "query=pika&sort=name&pokemonId=25"
    #[arg(long)]
    view: Option<String>,

    #[command(flatten)]
    debug: DebugCliArgs,
}

#[derive(tui_dispatch::ComponentId, Clone, Copy, PartialEq, Eq, Hash, Debug)]
enum PokedexComponentId {
    Grid,
    Search,
    Overlay,
}

#[derive(tui_dispatch::BindingContext, Clone, Copy, PartialEq, Eq, Hash)]
enum PokedexContext {
    Main,
    Search,
    Overlay,
}

impl EventRoutingState<PokedexComponentId, PokedexContext> for AppState {
    fn focused(&self) -> Option<PokedexComponentId> {
        if self.overlay.is_some() {
            Some(PokedexComponentId::Overlay)
        } else if self.search.active {
            Some(PokedexComponentId::Search)
        } else {
            Some(PokedexComponentId::Grid)
        }
    }

    fn modal(&self) -> Option<PokedexComponentId> {
        if self.overlay.is_some() {
            Some(PokedexComponentId::Overlay)
        } else if self.search.active {
            Some(PokedexComponentId::Search)
        } else {
            None
        }
    }

    fn binding_context(&self, id: PokedexComponentId) -> PokedexContext {
        match id {
            PokedexComponentId::Grid => PokedexContext::Main,
            PokedexComponentId::Search => PokedexContext::Search,
            PokedexComponentId::Overlay => PokedexContext::Overlay,
        }
    }

    fn default_context(&self) -> PokedexContext {
        PokedexContext::Main
    }
}

#[tokio::main]
async fn main() -> io::Result<()> {
    let Args {
        view,
        debug: debug_args,
    } = Args::parse();

    let debug = DebugSession::new(debug_args);

    // Export JSON schemas if requested
    debug.save_state_schema::<AppState>().map_err(debug_error)?;
    debug.save_actions_schema::<Action>().map_err(debug_error)?;

    let state = debug
        .load_state_or_else_async(move || async move {
            Ok::<AppState, io::Error>(initial_state(view.as_deref()))
        })
        .await
        .map_err(debug_error)?;

    let replay_actions = debug.load_replay_items().map_err(debug_error)?;

    let (middleware, action_recorder) = debug.middleware_with_recorder();
    let store = EffectStoreWithMiddleware::new(state, reducer, middleware);

    // ===== Terminal setup =====
    let use_alt_screen = debug.use_alt_screen();
    let mut stdout = io::stdout();
    if use_alt_screen {
        enable_raw_mode()?;
        execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    }
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_app(&mut terminal, &debug, store, replay_actions).await;

    // ===== Cleanup =====
    if use_alt_screen {
        disable_raw_mode()?;
        execute!(
            terminal.backend_mut(),
            LeaveAlternateScreen,
            DisableMouseCapture
        )?;
        terminal.show_cursor()?;
    }

    let run_output = result?;
    run_output.write_render_output()?;
    debug
        .save_actions(action_recorder.as_ref())
        .map_err(debug_error)?;

    Ok(())
}

/// Build the start-up state, restoring a shared view string when given.
fn initial_state(view: Option<&str>) -> AppState {
    let mut state = AppState::default();
    if let Some(view) = view {
        let restored = params::parse(view);
        state.view.set_query(restored.query);
        state.view.sort_key = restored.sort_key;
        state.view.sort_direction = restored.sort_direction;
        state.pending_overlay = restored.pokemon_id;
    }
    state.sync_params();
    state
}

struct PokedexUi {
    grid: CardGrid,
    search: SearchBar,
    overlay: DetailOverlay,
}

impl PokedexUi {
    fn new() -> Self {
        Self {
            grid: CardGrid,
            search: SearchBar::new(),
            overlay: DetailOverlay::new(),
        }
    }

    fn render(
        &mut self,
        frame: &mut Frame,
        area: Rect,
        state: &AppState,
        render_ctx: RenderContext,
        event_ctx: &mut EventContext<PokedexComponentId>,
    ) {
        event_ctx.set_component_area(PokedexComponentId::Grid, area);

        let grid_focused =
            render_ctx.is_focused() && !state.search.active && state.overlay.is_none();
        self.grid.render(
            frame,
            area,
            CardGridProps {
                state,
                is_focused: grid_focused,
            },
        );

        self.search.set_open(state.search.active);
        if state.search.active {
            // One-line input strip over the header.
            let bar_area = Rect {
                height: 1,
                ..area
            };
            event_ctx.set_component_area(PokedexComponentId::Search, bar_area);
            self.search.render(
                frame,
                bar_area,
                SearchBarProps {
                    value: &state.search.input,
                    is_focused: render_ctx.is_focused() && state.overlay.is_none(),
                },
            );
        } else {
            event_ctx
                .component_areas
                .remove(&PokedexComponentId::Search);
        }

        if let Some(overlay) = &state.overlay {
            let modal_area = centered_rect(52, 18, area);
            event_ctx.set_component_area(PokedexComponentId::Overlay, modal_area);
            self.overlay.render(
                frame,
                area,
                DetailOverlayProps {
                    overlay,
                    is_focused: render_ctx.is_focused(),
                },
            );
        } else {
            event_ctx
                .component_areas
                .remove(&PokedexComponentId::Overlay);
        }
    }

    fn handle_grid_event(&mut self, event: &EventKind, state: &AppState) -> HandlerResponse<Action> {
        let actions: Vec<_> = self
            .grid
            .handle_event(
                event,
                CardGridProps {
                    state,
                    is_focused: true,
                },
            )
            .into_iter()
            .collect();
        handler_response(actions)
    }

    fn handle_search_event(
        &mut self,
        event: &EventKind,
        state: &AppState,
    ) -> HandlerResponse<Action> {
        self.search.set_open(state.search.active);
        let actions: Vec<_> = self
            .search
            .handle_event(
                event,
                SearchBarProps {
                    value: &state.search.input,
                    is_focused: true,
                },
            )
            .into_iter()
            .collect();
        HandlerResponse {
            actions,
            consumed: true,
            needs_render: false,
        }
    }

    fn handle_overlay_event(
        &mut self,
        event: &EventKind,
        state: &AppState,
    ) -> HandlerResponse<Action> {
        let Some(overlay) = &state.overlay else {
            return HandlerResponse::ignored();
        };
        let actions: Vec<_> = self
            .overlay
            .handle_event(
                event,
                DetailOverlayProps {
                    overlay,
                    is_focused: true,
                },
            )
            .into_iter()
            .collect();
        HandlerResponse {
            actions,
            consumed: true,
            needs_render: false,
        }
    }
}

fn handler_response(actions: Vec<Action>) -> HandlerResponse<Action> {
    if actions.is_empty() {
        HandlerResponse::ignored()
    } else {
        HandlerResponse {
            actions,
            consumed: true,
            needs_render: false,
        }
    }
}

fn debug_error(error: DebugSessionError) -> io::Error {
    io::Error::other(format!("debug session error: {error}"))
}

async fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    debug: &DebugSession,
    store: impl EffectStoreLike<AppState, Action, Effect>,
    replay_actions: Vec<ReplayItem<Action>>,
) -> io::Result<DebugRunOutput<AppState>> {
    let ui = Rc::new(RefCell::new(PokedexUi::new()));
    let mut bus: EventBus<AppState, Action, PokedexComponentId, PokedexContext> = EventBus::new();
    let keybindings: Keybindings<PokedexContext> = Keybindings::new();

    let ui_grid = Rc::clone(&ui);
    bus.register(PokedexComponentId::Grid, move |event, state| {
        ui_grid.borrow_mut().handle_grid_event(&event.kind, state)
    });

    let ui_search = Rc::clone(&ui);
    bus.register(PokedexComponentId::Search, move |event, state| {
        ui_search
            .borrow_mut()
            .handle_search_event(&event.kind, state)
    });

    let ui_overlay = Rc::clone(&ui);
    bus.register(PokedexComponentId::Overlay, move |event, state| {
        ui_overlay
            .borrow_mut()
            .handle_overlay_event(&event.kind, state)
    });

    // Track the terminal size for grid column math.
    bus.register_global(|event, _state| match event.kind {
        EventKind::Resize(width, height) => HandlerResponse::action(Action::UiTerminalResize(
            width, height,
        ))
        .with_render(),
        _ => HandlerResponse::ignored(),
    });

    debug
        .run_effect_app_with_bus(
            terminal,
            store,
            DebugLayer::simple(),
            replay_actions,
            Some(Action::Init),
            Some(Action::Quit),
            |runtime| {
                if debug.render_once() {
                    return;
                }

                runtime
                    .subscriptions()
                    .interval("tick", Duration::from_millis(TICK_MS), || Action::Tick);
            },
            &mut bus,
            &keybindings,
            |frame, area, state, render_ctx, event_ctx| {
                ui.borrow_mut()
                    .render(frame, area, state, render_ctx, event_ctx);
            },
            |action| matches!(action, Action::Quit),
            handle_effect,
        )
        .await
}

/// Handle effects by spawning tasks
fn handle_effect(effect: Effect, ctx: &mut EffectContext<Action>) {
    match effect {
        Effect::LoadCatalogue => {
            ctx.tasks().spawn("catalogue", async move {
                match api::fetch_catalogue().await {
                    Ok(entries) => Action::CatalogueDidLoad(entries),
                    Err(e) => Action::CatalogueDidError(e),
                }
            });
        }
        Effect::HydrateBatch { seq, entries } => {
            ctx.tasks()
                .spawn(TaskKey::new(format!("batch_{seq}")), async move {
                    match api::hydrate_batch(&entries).await {
                        Ok(entities) => Action::BatchDidLoad { seq, entities },
                        Err(e) => Action::BatchDidError { seq, error: e },
                    }
                });
        }
        Effect::LoadCardTypes { id } => {
            ctx.tasks()
                .spawn(TaskKey::new(format!("types_{id}")), async move {
                    match api::fetch_entity_types(id).await {
                        Ok(types) => Action::CardTypesDidLoad { id, types },
                        Err(e) => Action::CardTypesDidError { id, error: e },
                    }
                });
        }
        Effect::LoadDetail { id } => {
            ctx.tasks()
                .spawn(TaskKey::new(format!("detail_{id}")), async move {
                    match api::fetch_full_detail(id).await {
                        Ok(detail) => Action::DetailDidLoad { id, detail },
                        Err(e) => Action::DetailDidError { id, error: e },
                    }
                });
        }
        Effect::LoadSpecies { id } => {
            ctx.tasks()
                .spawn(TaskKey::new(format!("species_{id}")), async move {
                    match api::fetch_species(id).await {
                        Ok(species) => Action::SpeciesDidLoad { id, species },
                        Err(e) => Action::SpeciesDidError { id, error: e },
                    }
                });
        }
    }
}
