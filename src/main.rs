//! Pokegrid TUI - paginated Pokedex browser

use std::cell::RefCell;
use std::io;
use std::rc::Rc;

use clap::Parser;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Frame, Terminal};
use ratatui::layout::Rect;
use tui_dispatch::{
    EffectContext, EffectStoreLike, EffectStoreWithMiddleware, EventBus, EventContext, EventKind,
    EventRoutingState, HandlerResponse, Keybindings, RenderContext, TaskKey,
};
use tui_dispatch_debug::debug::DebugLayer;
use tui_dispatch_debug::{
    DebugCliArgs, DebugRunOutput, DebugSession, DebugSessionError, ReplayItem,
};

use pokegrid::action::Action;
use pokegrid::api;
use pokegrid::components::{CatalogView, CatalogViewProps, Component, DetailView, DetailViewProps};
use pokegrid::effect::Effect;
use pokegrid::reducer::reducer;
use pokegrid::state::{AppState, SortKey, View};

/// Pokegrid - browse the Pokedex one page at a time
#[derive(Parser, Debug)]
#[command(name = "pokegrid")]
#[command(about = "A paginated Pokedex browser TUI")]
struct Args {
    /// Initial sort order: id-asc, id-desc, name-asc or name-desc
    #[arg(long, default_value = "id-asc")]
    sort: String,

    #[command(flatten)]
    debug: DebugCliArgs,
}

#[derive(tui_dispatch::ComponentId, Clone, Copy, PartialEq, Eq, Hash, Debug)]
enum GridComponentId {
    Catalog,
    Detail,
}

#[derive(tui_dispatch::BindingContext, Clone, Copy, PartialEq, Eq, Hash)]
enum GridContext {
    Catalog,
    Detail,
}

impl EventRoutingState<GridComponentId, GridContext> for AppState {
    fn focused(&self) -> Option<GridComponentId> {
        match self.view {
            View::Catalog => Some(GridComponentId::Catalog),
            View::Detail => Some(GridComponentId::Detail),
        }
    }

    fn modal(&self) -> Option<GridComponentId> {
        None
    }

    fn binding_context(&self, id: GridComponentId) -> GridContext {
        match id {
            GridComponentId::Catalog => GridContext::Catalog,
            GridComponentId::Detail => GridContext::Detail,
        }
    }

    fn default_context(&self) -> GridContext {
        GridContext::Catalog
    }
}

#[tokio::main]
async fn main() -> io::Result<()> {
    let args = Args::parse();
    let debug = DebugSession::new(args.debug);

    debug.save_state_schema::<AppState>().map_err(debug_error)?;
    debug.save_actions_schema::<Action>().map_err(debug_error)?;

    let sort = SortKey::parse(&args.sort).unwrap_or_default();
    let state = debug
        .load_state_or_else_async(move || async move {
            Ok::<AppState, io::Error>(AppState {
                sort,
                ..Default::default()
            })
        })
        .await
        .map_err(debug_error)?;
    let replay_actions = debug.load_replay_items().map_err(debug_error)?;
    let (middleware, action_recorder) = debug.middleware_with_recorder();
    let store = EffectStoreWithMiddleware::new(state, reducer, middleware);

    let use_alt_screen = debug.use_alt_screen();
    let mut stdout = io::stdout();
    if use_alt_screen {
        enable_raw_mode()?;
        execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    }
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_app(&mut terminal, &debug, store, replay_actions).await;

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

fn debug_error(error: DebugSessionError) -> io::Error {
    io::Error::other(format!("debug session error: {error}"))
}

struct GridUi {
    catalog: CatalogView,
    detail: DetailView,
}

impl GridUi {
    fn new() -> Self {
        Self {
            catalog: CatalogView,
            detail: DetailView,
        }
    }

    fn render(
        &mut self,
        frame: &mut Frame,
        area: Rect,
        state: &AppState,
        render_ctx: RenderContext,
        event_ctx: &mut EventContext<GridComponentId>,
    ) {
        match state.view {
            View::Catalog => {
                event_ctx.set_component_area(GridComponentId::Catalog, area);
                event_ctx.component_areas.remove(&GridComponentId::Detail);
                self.catalog.render(
                    frame,
                    area,
                    CatalogViewProps {
                        state,
                        is_focused: render_ctx.is_focused(),
                    },
                );
            }
            View::Detail => {
                event_ctx.set_component_area(GridComponentId::Detail, area);
                event_ctx.component_areas.remove(&GridComponentId::Catalog);
                self.detail.render(
                    frame,
                    area,
                    DetailViewProps {
                        state,
                        is_focused: render_ctx.is_focused(),
                    },
                );
            }
        }
    }

    fn handle_catalog_event(
        &mut self,
        event: &EventKind,
        state: &AppState,
    ) -> HandlerResponse<Action> {
        let actions: Vec<_> = self
            .catalog
            .handle_event(
                event,
                CatalogViewProps {
                    state,
                    is_focused: true,
                },
            )
            .into_iter()
            .collect();
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

    fn handle_detail_event(
        &mut self,
        event: &EventKind,
        state: &AppState,
    ) -> HandlerResponse<Action> {
        let actions: Vec<_> = self
            .detail
            .handle_event(
                event,
                DetailViewProps {
                    state,
                    is_focused: true,
                },
            )
            .into_iter()
            .collect();
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
}

async fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    debug: &DebugSession,
    store: impl EffectStoreLike<AppState, Action, Effect>,
    replay_actions: Vec<ReplayItem<Action>>,
) -> io::Result<DebugRunOutput<AppState>> {
    let ui = Rc::new(RefCell::new(GridUi::new()));
    let mut bus: EventBus<AppState, Action, GridComponentId, GridContext> = EventBus::new();
    let keybindings: Keybindings<GridContext> = Keybindings::new();

    let ui_catalog = Rc::clone(&ui);
    bus.register(GridComponentId::Catalog, move |event, state| {
        ui_catalog
            .borrow_mut()
            .handle_catalog_event(&event.kind, state)
    });

    let ui_detail = Rc::clone(&ui);
    bus.register(GridComponentId::Detail, move |event, state| {
        ui_detail
            .borrow_mut()
            .handle_detail_event(&event.kind, state)
    });

    // Re-render on terminal resize (no action needed, just redraw)
    bus.register_global(|event, _state| match event.kind {
        EventKind::Resize(_, _) => HandlerResponse::ignored().with_render(),
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
            |_runtime| {},
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

/// Handle effects by spawning tasks. Keys are per request, never per slot:
/// a newer page or id never cancels an older in-flight read, so responses
/// land in arrival order.
fn handle_effect(effect: Effect, ctx: &mut EffectContext<Action>) {
    match effect {
        Effect::LoadPage { page_index } => {
            let key = format!("page_{page_index}");
            ctx.tasks().spawn(TaskKey::new(key), async move {
                match api::fetch_catalog_page(page_index).await {
                    Ok(page) => Action::PageDidLoad(page),
                    Err(error) => Action::PageDidError(error),
                }
            });
        }
        Effect::LoadDetail { id } => {
            let key = format!("detail_{id}");
            ctx.tasks().spawn(TaskKey::new(key), async move {
                match api::fetch_detail(id).await {
                    Ok(record) => Action::DetailDidLoad(record),
                    Err(error) => Action::DetailDidError { id, error },
                }
            });
        }
        Effect::LoadSpecies { id } => {
            let key = format!("species_{id}");
            ctx.tasks().spawn(TaskKey::new(key), async move {
                match api::fetch_flavor_text(id).await {
                    Ok(text) => Action::SpeciesDidLoad(text),
                    Err(error) => Action::SpeciesDidError(error),
                }
            });
        }
    }
}
