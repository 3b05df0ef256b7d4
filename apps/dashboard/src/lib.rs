//! # Inventory Dashboard Library
//!
//! Terminal front end for the inventory dashboard.
//!
//! ## Module Organization
//! ```text
//! inventory_dashboard/
//! ├── lib.rs          ◄─── You are here (startup & input loop)
//! ├── state/
//! │   ├── mod.rs      ◄─── AppState: stores, cache, service
//! │   └── config.rs   ◄─── Display configuration
//! ├── screens/        ◄─── One view model per route, plus the layout
//! ├── navigator.rs    ◄─── Route guard, redirects, screen lifecycle
//! ├── command.rs      ◄─── Input line parsing
//! ├── render.rs       ◄─── View model → text
//! └── error.rs        ◄─── AppError for failed actions
//! ```
//!
//! ## Startup Sequence
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  1. Initialize Logging (stderr, RUST_LOG overrides)                     │
//! │  2. Load dashboard.toml, apply env and command-line overrides           │
//! │  3. Build AppState over the HTTP product service                        │
//! │  4. Attach log listeners to the stores and the cache                    │
//! │  5. Open the start route, then read commands until quit                 │
//! │     (a line typed while a screen loads abandons that load)              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

pub mod command;
pub mod error;
pub mod navigator;
pub mod render;
pub mod screens;
pub mod state;

use std::path::PathBuf;

use clap::Parser;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

use inventory_client::{CacheEvent, ClientConfig};
use inventory_core::{guard, Route};

use command::{Command, HELP};
use error::AppResult;
use navigator::Navigator;
use screens::product_detail::ProductDetailView;
use screens::product_list::ProductListView;
use screens::Screen;
use state::AppState;

/// Command-line arguments.
#[derive(Debug, Clone, Parser)]
#[command(name = "inventory-dashboard", version, about = "Inventory dashboard in the terminal")]
pub struct Args {
    /// Config file (defaults to the platform config directory)
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Product service base URL, overriding the config file
    #[arg(long, value_name = "URL")]
    pub api_url: Option<String>,

    /// Route to open first
    #[arg(long, value_name = "PATH", default_value = "/")]
    pub start: String,
}

/// Runs the dashboard until `quit` or end of input.
pub async fn run(args: Args) -> AppResult<()> {
    init_tracing();
    info!("Starting Inventory Dashboard");

    let mut config = ClientConfig::load_or_default(args.config);
    if let Some(url) = args.api_url {
        config = config.with_base_url(url);
        config.validate()?;
    }
    info!(api = %config.api.base_url, auth = %config.api.auth_url, "Configuration loaded");

    let state = AppState::from_config(&config)?;
    attach_listeners(&state);

    let mut navigator = Navigator::new(state);
    open(&mut navigator, &args.start).await;

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut queued: Option<String> = None;
    loop {
        let line = match queued.take() {
            Some(line) => line,
            None => match lines.next_line().await? {
                Some(line) => line,
                None => break,
            },
        };

        let command = match Command::parse(&line) {
            Ok(None) => continue,
            Ok(Some(Command::Quit)) => break,
            Ok(Some(command)) => command,
            Err(err) => {
                eprintln!("{}", err);
                continue;
            }
        };

        if !command.is_navigation() {
            execute(&mut navigator, command).await;
            continue;
        }

        // Input typed while a screen loads abandons that load
        tokio::select! {
            _ = execute(&mut navigator, command) => {}
            next = lines.next_line() => match next? {
                Some(line) => {
                    debug!(route = %navigator.current(), "Load abandoned for new input");
                    queued = Some(line);
                }
                None => break,
            },
        }
    }

    info!("Dashboard closed");
    Ok(())
}

async fn open(navigator: &mut Navigator, path: &str) {
    match navigator.resolve(path) {
        Ok(route) => {
            print_pending(navigator, &route);
            navigator.go(route).await;
            print_screen(navigator);
        }
        Err(err) => eprintln!("{}", err),
    }
}

async fn execute(navigator: &mut Navigator, command: Command) {
    let result = match command {
        Command::Go(path) => {
            open(navigator, &path).await;
            return;
        }
        Command::Next => navigator.next_page().await.map(|_| ()),
        Command::Previous => navigator.previous_page().await.map(|_| ()),
        Command::Favorite(id) => navigator.toggle_favorite(id).await.map(|_| ()),
        Command::Login(form) => {
            navigator.login(form).await;
            Ok(())
        }
        Command::Logout => {
            navigator.go(Route::Logout).await;
            Ok(())
        }
        Command::Create(form) => {
            navigator.create_product(form).await;
            Ok(())
        }
        Command::Refresh => {
            navigator.refresh().await;
            Ok(())
        }
        Command::Help => {
            println!("{}", HELP);
            return;
        }
        Command::Quit => return,
    };

    match result {
        Ok(()) => print_screen(navigator),
        Err(err) => eprintln!("{}", err),
    }
}

/// Prints the loading view when `route` has nothing cached yet.
fn print_pending(navigator: &Navigator, route: &Route) {
    let redirected = navigator
        .state()
        .auth
        .with(|auth| guard::check(auth, route))
        .is_redirect();
    if redirected {
        return;
    }

    let pending = screens::peek(navigator.state(), route);
    let loading = matches!(
        pending,
        Screen::ProductList(ProductListView::Loading { .. })
            | Screen::ProductDetail(ProductDetailView::Loading)
    );
    if loading {
        println!("{}", render::render(&pending));
    }
}

fn print_screen(navigator: &Navigator) {
    let layout = navigator.layout();
    println!("{}", render::page(layout.as_ref(), navigator.screen()));
}

fn attach_listeners(state: &AppState) {
    state.auth.subscribe(|auth| {
        debug!(authenticated = auth.is_authenticated(), "Auth state changed");
    });
    state.cart.subscribe(|cart| {
        debug!(favorites = cart.len(), "Favorites changed");
    });

    let mut events = state.cache.events();
    tokio::spawn(async move {
        loop {
            match events.recv().await {
                Ok(CacheEvent::Failed { key, message }) => {
                    warn!(key = %key, message = %message, "Query failed");
                }
                Ok(event) => debug!(key = %event.key(), ?event, "Cache event"),
                Err(tokio::sync::broadcast::error::RecvError::Lagged(skipped)) => {
                    warn!(skipped, "Cache event listener lagged");
                }
                Err(tokio::sync::broadcast::error::RecvError::Closed) => break,
            }
        }
    });
}

/// Initializes the tracing subscriber for structured logging.
///
/// Logs go to stderr so they never interleave with rendered screens.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Show debug messages
/// - `RUST_LOG=inventory_client=trace` - Trace the client only
/// - Default: INFO, DEBUG for the inventory crates
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,inventory=debug"));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

