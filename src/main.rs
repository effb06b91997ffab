use std::io::Write;
use std::sync::Arc;
use std::time::Duration;

use tokio::io::{AsyncBufReadExt, BufReader};

use gameseeker::aggregate::{HistoryAggregator, PriceAggregator};
use gameseeker::chart::QuickChartRenderer;
use gameseeker::config::Config;
use gameseeker::dialog::{render, DialogAction, DialogEvent, DialogServices, DialogSession};
use gameseeker::matching::TitleIndex;
use gameseeker::notify::LogNotifier;
use gameseeker::refresh::title_refresh_task;
use gameseeker::store::{CatalogStore, SqliteCatalogStore};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv::dotenv().ok();

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Stderr)
        .init();

    let config = Config::from_env();

    log::info!("🚀 Starting gameseeker...");
    log::info!("📊 Configuration:");
    log::info!("   DB path: {}", config.db_path);
    log::info!("   Vendor fetch timeout: {}ms", config.vendor_fetch_timeout_ms);
    log::info!("   Title refresh interval: {}ms", config.title_refresh_interval_ms);

    let store: Arc<dyn CatalogStore> = Arc::new(SqliteCatalogStore::open(&config.db_path)?);

    let index = Arc::new(TitleIndex::new());
    let loaded = index.refresh(store.as_ref()).await?;
    log::info!("📖 Title index loaded ({} titles)", loaded);

    // Background refresher keeps the index current; searches keep working
    // off the previous snapshot if a refresh fails.
    tokio::spawn(title_refresh_task(
        Arc::clone(&index),
        Arc::clone(&store),
        config.title_refresh_interval_ms,
    ));

    let services = Arc::new(DialogServices {
        prices: PriceAggregator::new(
            Arc::clone(&store),
            Duration::from_millis(config.vendor_fetch_timeout_ms),
        ),
        history: HistoryAggregator::new(Arc::clone(&store)),
        index,
        charts: Arc::new(QuickChartRenderer::new(
            &config.chart_url,
            Duration::from_millis(config.chart_timeout_ms),
        )?),
        notifier: Arc::new(LogNotifier),
        store,
    });

    // Minimal line-oriented adapter: one stdin conversation. Real
    // transports map their own updates onto the same event set.
    println!("gameseeker console. Type a game title to search.");
    println!("Commands: /start, /report, /cancel, select <id>, history <id>, more <query>, quit");

    let mut session = DialogSession::new(services);
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    while let Some(line) = lines.next_line().await? {
        let input = line.trim();
        if input.is_empty() {
            continue;
        }
        if input == "quit" {
            break;
        }

        let event = parse_event(input);
        let action = session.handle(event).await;
        print_action(&action)?;
    }

    Ok(())
}

/// Map one console line onto the abstract dialog event set.
fn parse_event(input: &str) -> DialogEvent {
    if input == "/start" {
        return DialogEvent::Start;
    }
    if input == "/report" {
        return DialogEvent::Report;
    }
    if input == "/cancel" {
        return DialogEvent::Cancel;
    }
    if let Some(rest) = input.strip_prefix("select ") {
        return match rest.trim().parse() {
            Ok(id) => DialogEvent::Select(id),
            Err(_) => DialogEvent::Unrecognized,
        };
    }
    if let Some(rest) = input.strip_prefix("history ") {
        return match rest.trim().parse() {
            Ok(id) => DialogEvent::ShowHistory(id),
            Err(_) => DialogEvent::Unrecognized,
        };
    }
    if let Some(rest) = input.strip_prefix("more ") {
        return DialogEvent::ShowMore(rest.trim().to_string());
    }
    if input.starts_with('/') {
        return DialogEvent::Unrecognized;
    }
    DialogEvent::Query(input.to_string())
}

fn print_action(action: &DialogAction) -> std::io::Result<()> {
    match action {
        DialogAction::Detail { game_id, snapshots } => {
            print!("{}", render::render_detail(snapshots));
            println!("(history {} shows the price history chart)", game_id);
        }
        DialogAction::CandidateList {
            candidates,
            expandable,
        } => {
            println!("Pick a game (select <id>):");
            print!("{}", render::render_candidates(candidates));
            if let Some(query) = expandable {
                println!("(more {} shows the full list)", query);
            }
        }
        DialogAction::NoMatch { suggestions } => {
            println!("Nothing found. Did you mean:");
            print!("{}", render::render_candidates(suggestions));
        }
        DialogAction::Chart { game_id, image } => {
            let path = format!("history_{}.png", game_id);
            std::fs::File::create(&path)?.write_all(image)?;
            println!("Chart written to {}", path);
        }
        DialogAction::Greeting => {
            println!("Hi! Type a game title to start searching.");
        }
        DialogAction::ReportPrompt => {
            println!("Describe the problem (name the game or your query).");
            println!("Use /cancel to go back to searching.");
        }
        DialogAction::ReportForwarded => {
            println!("Thanks! Your report was forwarded. Back to searching.");
        }
        DialogAction::ReportCancelled => {
            println!("Back to search mode.");
        }
        DialogAction::Help => {
            println!("Could not make sense of that. Try a game title,");
            println!("or: /report, /cancel, select <id>, history <id>, more <query>");
        }
        DialogAction::NotFound => {
            println!("Game not found.");
        }
        DialogAction::Unavailable(detail) => {
            println!("Data source unavailable, try again later ({})", detail);
        }
    }
    Ok(())
}
