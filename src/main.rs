use crossterm::event::{self, Event as CEvent, KeyCode};
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use crossterm::ExecutableCommand;
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use std::error::Error;
use std::io;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use poke_gallery::app::{App, Artwork, DetailState};
use poke_gallery::error::ApiError;
use poke_gallery::fetch::{Client, DEFAULT_LIST_LIMIT};
use poke_gallery::models::{DetailView, Summary};
use poke_gallery::ui::draw_ui;

/// One-slot mailbox a background task drops its result into; the draw loop
/// drains it on the next tick.
type Slot<T> = Arc<Mutex<Option<T>>>;

fn spawn_collection_load(
    client: &Client,
    type_filter: Option<String>,
    limit: usize,
    generation: u64,
    slot: &Slot<(u64, Result<Vec<Summary>, ApiError>)>,
) {
    let client = client.clone();
    let slot = slot.clone();
    tokio::spawn(async move {
        let result = client.load_collection(type_filter.as_deref(), limit).await;
        if let Err(err) = &result {
            tracing::warn!(%err, "collection load failed");
        }
        *slot.lock().unwrap() = Some((generation, result));
    });
}

fn spawn_detail_load(
    client: &Client,
    identifier: String,
    generation: u64,
    slot: &Slot<(u64, Result<(DetailView, Option<Artwork>), ApiError>)>,
) {
    let client = client.clone();
    let slot = slot.clone();
    tokio::spawn(async move {
        let result = match client.load_detail(&identifier).await {
            Ok(view) => {
                // Artwork is cosmetic: a fetch or decode failure degrades to
                // the placeholder, never to a failed detail view.
                let artwork = match &view.artwork_url {
                    Some(url) => match client.fetch_image(url).await {
                        Ok(bytes) => Artwork::decode(&bytes),
                        Err(err) => {
                            tracing::debug!(%err, "artwork fetch failed");
                            None
                        }
                    },
                    None => None,
                };
                Ok((view, artwork))
            }
            Err(err) => Err(err),
        };
        *slot.lock().unwrap() = Some((generation, result));
    });
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    // Log to a file only when asked; stdout belongs to the TUI.
    if let Ok(path) = std::env::var("POKE_GALLERY_LOG") {
        let file = std::fs::File::create(path)?;
        tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_writer(Mutex::new(file))
            .with_ansi(false)
            .init();
    }

    // Page size for the unfiltered gallery. Can be configured via the
    // `POKEMON_LIMIT` environment variable; only the first page is fetched.
    let list_limit: usize = std::env::var("POKEMON_LIMIT")
        .ok()
        .and_then(|s| s.parse::<usize>().ok())
        .unwrap_or(DEFAULT_LIST_LIMIT);

    // `--type <name>` selects the initial type tab, the CLI analog of the
    // original's `#/type/{name}` fragment.
    let args: Vec<String> = std::env::args().collect();
    let initial_type = args
        .iter()
        .position(|a| a == "--type")
        .and_then(|i| args.get(i + 1))
        .cloned();

    let client = Client::new();
    let mut app = App::new(initial_type);

    let collection_slot: Slot<(u64, Result<Vec<Summary>, ApiError>)> = Arc::new(Mutex::new(None));
    let detail_slot: Slot<(u64, Result<(DetailView, Option<Artwork>), ApiError>)> =
        Arc::new(Mutex::new(None));
    let types_slot: Slot<Result<Vec<String>, ApiError>> = Arc::new(Mutex::new(None));

    // Kick off the type directory and the first collection load.
    {
        let client = client.clone();
        let slot = types_slot.clone();
        tokio::spawn(async move {
            *slot.lock().unwrap() = Some(client.type_names().await);
        });
    }
    let generation = app.begin_collection_load();
    spawn_collection_load(
        &client,
        app.type_filter().map(str::to_string),
        list_limit,
        generation,
        &collection_slot,
    );

    // Terminal init
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    stdout.execute(EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let tick_rate = Duration::from_millis(200);
    let mut last_tick = Instant::now();

    loop {
        draw_ui(&mut terminal, &mut app)?;

        // Drain finished background work; stale generations are discarded
        // inside the apply functions.
        if let Some(result) = { types_slot.lock().unwrap().take() } {
            match result {
                Ok(types) => app.set_types(types),
                Err(err) => app.status = Some(format!("type list unavailable: {}", err)),
            }
        }
        if let Some((generation, result)) = { collection_slot.lock().unwrap().take() } {
            app.apply_collection(generation, result);
        }
        if let Some((generation, result)) = { detail_slot.lock().unwrap().take() } {
            app.apply_detail(generation, result);
        }

        let timeout = tick_rate
            .checked_sub(last_tick.elapsed())
            .unwrap_or_else(|| Duration::from_secs(0));
        if event::poll(timeout)? {
            if let CEvent::Key(key) = event::read()? {
                if app.search_mode {
                    match key.code {
                        KeyCode::Enter | KeyCode::Esc => {
                            app.search_mode = false;
                        }
                        KeyCode::Backspace => {
                            app.search_query.pop();
                            app.refresh_visible();
                        }
                        KeyCode::Char(c) => {
                            app.search_query.push(c);
                            app.refresh_visible();
                        }
                        _ => {}
                    }
                } else if !matches!(app.detail, DetailState::Closed) {
                    match key.code {
                        KeyCode::Char('q') => break,
                        KeyCode::Esc => app.close_detail(),
                        _ => {}
                    }
                } else {
                    match key.code {
                        KeyCode::Char('q') => break,
                        KeyCode::Char('h') | KeyCode::F(1) => {
                            app.show_help = !app.show_help;
                        }
                        KeyCode::Char('/') => {
                            app.search_mode = true;
                            app.search_query.clear();
                            app.refresh_visible();
                        }
                        KeyCode::Down => app.next(),
                        KeyCode::Up => app.previous(),
                        KeyCode::Left | KeyCode::Right => {
                            let delta = if key.code == KeyCode::Left { -1 } else { 1 };
                            if app.cycle_tab(delta) {
                                app.refresh_visible();
                                let generation = app.begin_collection_load();
                                spawn_collection_load(
                                    &client,
                                    app.type_filter().map(str::to_string),
                                    list_limit,
                                    generation,
                                    &collection_slot,
                                );
                            }
                        }
                        KeyCode::Enter => {
                            if let Some(record) = app.selected_record() {
                                let identifier = record.name.clone();
                                let generation = app.begin_detail_load(&identifier);
                                spawn_detail_load(&client, identifier, generation, &detail_slot);
                            }
                        }
                        KeyCode::Char('r') => {
                            let generation = app.begin_collection_load();
                            spawn_collection_load(
                                &client,
                                app.type_filter().map(str::to_string),
                                list_limit,
                                generation,
                                &collection_slot,
                            );
                        }
                        KeyCode::Esc => {
                            app.show_help = false;
                        }
                        _ => {}
                    }
                }
            }
        }

        if last_tick.elapsed() >= tick_rate {
            last_tick = Instant::now();
        }
    }

    // Restore terminal
    disable_raw_mode()?;
    let mut stdout = io::stdout();
    stdout.execute(LeaveAlternateScreen)?;
    Ok(())
}
