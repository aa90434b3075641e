mod audio;
mod config;
mod controller;
mod logging;
mod model;
mod playback;
mod view;

use std::io;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use crossterm::{
    event::{self, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tokio::runtime::Handle;

use audio::{AudioFetcher, DeviceWatchSession, HttpMediaProbe, RodioQueuePlayer};
use config::AppConfig;
use controller::AppController;
use model::{AppModel, ArtworkLoader, CatalogClient};
use playback::{PlaybackCoordinator, PlayerFactory};
use view::AppView;

#[tokio::main]
async fn main() -> Result<()> {
    if let Err(e) = logging::init_logging() {
        eprintln!("Warning: Failed to initialize logging: {}", e);
    }

    tracing::info!("=== clipdeck starting ===");

    let config = AppConfig::default();
    let http = config.http_client()?;

    // Audio: one fetcher shared by the player and the duration probe
    let fetcher = AudioFetcher::new(config.audio_client()?, config.audio_cache_entries);
    let runtime = Handle::current();
    let player_fetcher = fetcher.clone();
    let factory: PlayerFactory =
        Box::new(move || Box::new(RodioQueuePlayer::new(player_fetcher.clone(), runtime.clone())));
    let coordinator = PlaybackCoordinator::new(
        factory,
        Arc::new(HttpMediaProbe::new(fetcher)),
        config.tick_interval,
    );

    let session = DeviceWatchSession::start(config.device_poll_interval);
    coordinator.attach_session(&session);

    let model = Arc::new(AppModel::new());
    let controller = AppController::new(
        model.clone(),
        coordinator.clone(),
        CatalogClient::new(http.clone(), config.catalog_url.clone()),
        ArtworkLoader::new(http, config.image_cache_cost_limit),
        &config,
    );
    controller.start_playback_listener();

    let controller_for_load = controller.clone();
    tokio::spawn(async move {
        controller_for_load.load_catalog().await;
    });

    tracing::info!("Starting TUI...");

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = run_app(&mut terminal, model, &coordinator, controller).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        tracing::error!(error = ?err, "Application error");
    }

    drop(session);
    tracing::info!("clipdeck shutting down");
    Ok(())
}

async fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    model: Arc<AppModel>,
    coordinator: &PlaybackCoordinator,
    controller: AppController,
) -> io::Result<()> {
    loop {
        let ui_state = model.get_ui_state().await;
        let playback = coordinator.state();
        let artwork = controller.visible_artwork().await;

        terminal.draw(|f| {
            AppView::render(f, &ui_state, &playback, artwork.as_ref());
        })?;

        if event::poll(Duration::from_millis(50))? {
            if let Event::Key(key) = event::read()? {
                if let Err(e) = controller.handle_key_event(key).await {
                    tracing::warn!(error = %e, "Key handling failed");
                }
            }
        }

        if model.should_quit().await {
            break;
        }
    }

    Ok(())
}
