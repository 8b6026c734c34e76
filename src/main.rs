use std::cell::RefCell;
use std::fs::OpenOptions;
use std::io;
use std::path::PathBuf;
use std::rc::Rc;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use clap::Parser;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;
use tui_dispatch::{
    EffectContext, EffectStoreLike, EffectStoreWithMiddleware, EventBus, Keybindings, TaskKey,
};
use tui_dispatch_debug::debug::DebugLayer;
use tui_dispatch_debug::{
    DebugCliArgs, DebugRunOutput, DebugSession, DebugSessionError, ReplayItem,
};

use pokegrid::action::Action;
use pokegrid::api::DEFAULT_API_BASE;
use pokegrid::catalog::{Catalog, CatalogConfig};
use pokegrid::effect::Effect;
use pokegrid::reducer::reducer;
use pokegrid::state::AppState;
use pokegrid::ui::{self, PokeComponentId, PokeContext, PokeUi};

const TICK_MS: u64 = 120;

#[derive(Parser, Debug)]
#[command(name = "pokegrid")]
#[command(about = "Browse, search and inspect the original 151 Pokemon")]
struct Args {
    /// PokeAPI base url
    #[arg(long, default_value = DEFAULT_API_BASE)]
    api_base: String,

    /// Append logs to this file (RUST_LOG overrides the `info` default)
    #[arg(long)]
    log_file: Option<PathBuf>,

    #[command(flatten)]
    debug: DebugCliArgs,
}

#[tokio::main]
async fn main() -> io::Result<()> {
    let args = Args::parse();
    init_tracing(args.log_file.as_ref())?;

    let config = CatalogConfig {
        api_base: args.api_base,
    };
    info!(api_base = %config.api_base, "starting");
    let catalog = Arc::new(Catalog::new(&config));
    let debug = DebugSession::new(args.debug);

    let state = debug
        .load_state_or_else_async(|| async { Ok::<AppState, io::Error>(AppState::default()) })
        .await
        .map_err(debug_error)?;
    let replay_actions = debug.load_replay_items().map_err(debug_error)?;
    let (middleware, recorder) = debug.middleware_with_recorder();
    let store = EffectStoreWithMiddleware::new(state, reducer, middleware);

    let use_alt_screen = debug.use_alt_screen();
    let mut stdout = io::stdout();
    if use_alt_screen {
        enable_raw_mode()?;
        execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    }
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_app(&mut terminal, &debug, store, replay_actions, catalog).await;

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
    debug.save_actions(recorder.as_ref()).map_err(debug_error)?;
    Ok(())
}

/// Logging goes to a file or nowhere; the terminal belongs to the UI.
fn init_tracing(path: Option<&PathBuf>) -> io::Result<()> {
    let Some(path) = path else {
        return Ok(());
    };
    let file = OpenOptions::new().create(true).append(true).open(path)?;
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .init();
    Ok(())
}

fn debug_error(error: DebugSessionError) -> io::Error {
    io::Error::other(format!("debug session error: {error}"))
}

async fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    debug: &DebugSession,
    store: impl EffectStoreLike<AppState, Action, Effect>,
    replay_actions: Vec<ReplayItem<Action>>,
    catalog: Arc<Catalog>,
) -> io::Result<DebugRunOutput<AppState>> {
    let ui = Rc::new(RefCell::new(PokeUi::new()));
    let mut bus: EventBus<AppState, Action, PokeComponentId, PokeContext> = EventBus::new();
    let keybindings: Keybindings<PokeContext> = Keybindings::new();

    let ui_grid = Rc::clone(&ui);
    bus.register(PokeComponentId::Grid, move |event, state| {
        ui_grid.borrow_mut().handle_grid_event(&event.kind, state)
    });

    let ui_search = Rc::clone(&ui);
    bus.register(PokeComponentId::Search, move |event, state| {
        ui_search
            .borrow_mut()
            .handle_search_event(&event.kind, state)
    });

    let ui_overlay = Rc::clone(&ui);
    bus.register(PokeComponentId::Overlay, move |event, state| {
        ui_overlay
            .borrow_mut()
            .handle_overlay_event(&event.kind, state)
    });

    bus.register_global(|event, state| ui::handle_global_event(&event.kind, state));

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
            move |effect, ctx| handle_effect(&catalog, effect, ctx),
        )
        .await
}

fn handle_effect(catalog: &Arc<Catalog>, effect: Effect, ctx: &mut EffectContext<Action>) {
    match effect {
        Effect::LoadRoster => {
            let catalog = Arc::clone(catalog);
            ctx.tasks().spawn(TaskKey::new("roster"), async move {
                match catalog.roster().await {
                    Ok(roster) => Action::RosterDidLoad(roster),
                    Err(error) => {
                        warn!(%error, "roster fetch failed");
                        Action::RosterDidError(error.into())
                    }
                }
            });
        }
        Effect::LoadPage {
            generation,
            start,
            ids,
        } => {
            let catalog = Arc::clone(catalog);
            let key = format!("page_{generation}_{}", ids.first().copied().unwrap_or_default());
            ctx.tasks().spawn(TaskKey::new(key), async move {
                match catalog.page(&ids).await {
                    Ok(details) => Action::PageDidLoad {
                        generation,
                        details,
                    },
                    Err(error) => {
                        warn!(%error, ?ids, "page fetch failed");
                        Action::PageDidError {
                            generation,
                            start,
                            failure: error.into(),
                        }
                    }
                }
            });
        }
        Effect::LoadDetail { id } => {
            let catalog = Arc::clone(catalog);
            ctx.tasks().spawn(TaskKey::new(format!("detail_{id}")), async move {
                match catalog.detail(&id.to_string()).await {
                    Ok(detail) => Action::DetailDidLoad(detail),
                    Err(error) => {
                        warn!(%error, id, "detail fetch failed");
                        Action::DetailDidError {
                            id,
                            failure: error.into(),
                        }
                    }
                }
            });
        }
        Effect::LoadSearchResult { id } => {
            let catalog = Arc::clone(catalog);
            ctx.tasks().spawn(TaskKey::new("search"), async move {
                match catalog.detail(&id.to_string()).await {
                    Ok(detail) => Action::SearchDidLoad(detail),
                    Err(error) => {
                        warn!(%error, id, "search lookup failed");
                        Action::SearchDidError {
                            id,
                            failure: error.into(),
                        }
                    }
                }
            });
        }
        Effect::LoadEvolution { id } => {
            let catalog = Arc::clone(catalog);
            ctx.tasks().spawn(TaskKey::new(format!("evo_{id}")), async move {
                match catalog.evolution(id).await {
                    Ok(stages) => Action::EvolutionDidLoad { id, stages },
                    Err(error) => {
                        warn!(%error, id, "evolution chain fetch failed");
                        Action::EvolutionDidError {
                            id,
                            failure: error.into(),
                        }
                    }
                }
            });
        }
        Effect::LoadSprite { id, url } => {
            let catalog = Arc::clone(catalog);
            ctx.tasks().spawn(TaskKey::new(format!("sprite_{id}")), async move {
                match catalog.sprite(&url).await {
                    Ok(sprite) => Action::SpriteDidLoad { id, sprite },
                    Err(error) => {
                        warn!(%error, id, %url, "sprite load failed");
                        Action::SpriteDidError {
                            id,
                            error: error.to_string(),
                        }
                    }
                }
            });
        }
    }
}
