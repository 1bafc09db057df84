//! entrylog: log campus building entrance visits from the command line.
//!
//! Remote state lives in the team's log store endpoint; when it is
//! unreachable, submissions queue locally and `entrylog sync` (or the next
//! reconnect in a long-lived embedding) replays them in order.

mod cli;

use anyhow::{bail, Context, Result};
use clap::Parser;
use tracing_subscriber::{fmt, EnvFilter};

use entrylog_client::geo::StaticSource;
use entrylog_client::{
    ClientConfig, LogOutcome, PositionProvider, RemoteStore, Session, SyncEngine,
};
use entrylog_shared::protocol::DeleteRequest;
use entrylog_shared::types::{Building, Position};
use entrylog_store::Database;

use crate::cli::{Cli, Commands};

#[tokio::main]
async fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new("entrylog_client=info,entrylog_store=info,warn")
    });

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .init();

    let cli = Cli::parse();
    let config = ClientConfig::from_env();

    // Shared-secret login gate; nothing runs unauthenticated.
    let mut session = Session::new();
    let password = cli.password.clone().unwrap_or_default();
    if !session.login(&config, &password, cli.display_name.clone()) {
        bail!("incorrect team password (configure ENTRYLOG_TEAM_PASSWORD, pass --password)");
    }

    let db = match &cli.db {
        Some(path) => Database::open_at(path).context("opening database")?,
        None => Database::new().context("opening database")?,
    };
    let remote = RemoteStore::new(&config)?;
    let engine = SyncEngine::new(remote, db);

    match cli.command {
        Commands::List { query } => cmd_list(&engine, query.as_deref().unwrap_or("")).await,
        Commands::Log {
            building_id,
            entrance,
            lat,
            lng,
            accuracy,
            under_construction,
        } => {
            cmd_log(
                &engine,
                &building_id,
                entrance,
                Position::new(lat, lng, accuracy),
                under_construction,
            )
            .await
        }
        Commands::Del {
            building_id,
            entrance,
            latest,
        } => {
            let request = if latest {
                DeleteRequest::latest_matching(building_id, entrance)
            } else {
                DeleteRequest::all_matching(building_id, entrance)
            };
            cmd_delete(&engine, &request).await
        }
        Commands::Undo => cmd_delete(&engine, &DeleteRequest::undo_last()).await,
        Commands::Sync => cmd_sync(&engine).await,
        Commands::Status => cmd_status(&engine).await,
    }
}

async fn cmd_list(engine: &SyncEngine<RemoteStore>, query: &str) -> Result<()> {
    engine.refresh().await;

    let state = engine.state();
    let state = state.lock().unwrap_or_else(std::sync::PoisonError::into_inner);

    if let Some(ref reason) = state.degraded {
        println!("WARNING: working from local data: {reason}");
    }

    let done = state.done_set();
    let done_count = state
        .buildings
        .iter()
        .filter(|b| done.contains(b.id.as_str()))
        .count();
    println!(
        "Progress: {}% ({}/{} buildings done)",
        state.progress_percent(),
        done_count,
        state.buildings.len()
    );

    for building in state.filter_buildings(query) {
        let status = if state.is_under_construction(&building.id) {
            "under construction"
        } else if state.is_done(&building.id) {
            "done"
        } else {
            "pending"
        };
        println!(
            "  [{status:^18}] {:<8} {} ({} entrances)",
            building.id,
            building.name,
            building.entrance_count()
        );
    }

    if !state.queued.is_empty() {
        println!("{} submission(s) waiting to sync", state.queued.len());
    }

    Ok(())
}

async fn cmd_log(
    engine: &SyncEngine<RemoteStore>,
    building_id: &str,
    entrance: u32,
    position: Position,
    under_construction: bool,
) -> Result<()> {
    engine.refresh().await;

    let building = find_building(engine, building_id)?;
    if entrance < 1 || entrance > building.entrance_count() {
        bail!(
            "entrance {entrance} out of range for {} (1..={})",
            building.id,
            building.entrance_count()
        );
    }

    // The CLI has no positioning hardware; the coordinates come in as flags
    // and go through the same provider the app embeds.
    let provider = PositionProvider::new(StaticSource::new(position));
    let fix = match provider.acquire().await {
        Ok(fix) => fix,
        Err(e) => bail!("{}", e.user_message()),
    };

    let outcome = engine
        .log_visit(&building, entrance, fix, under_construction)
        .await?;
    println!("{}", outcome.user_message());

    if outcome == LogOutcome::Queued {
        println!("{} submission(s) waiting to sync", engine.queue_len().await?);
    }
    Ok(())
}

async fn cmd_delete(engine: &SyncEngine<RemoteStore>, request: &DeleteRequest) -> Result<()> {
    let deleted = engine.delete(request).await?;
    println!("Deleted {deleted} record(s). Status reverts on the next list.");
    Ok(())
}

async fn cmd_sync(engine: &SyncEngine<RemoteStore>) -> Result<()> {
    let report = engine.drain().await?;

    println!(
        "Synced {} submission(s); {} still queued.",
        report.synced, report.remaining
    );
    if report.remaining > 0 {
        println!("Replay halted at the first failure; run sync again later.");
    }
    Ok(())
}

async fn cmd_status(engine: &SyncEngine<RemoteStore>) -> Result<()> {
    println!("Device user id: {}", engine.device_user_id().await?);

    let pending = engine.pending().await?;
    println!("Queued submissions: {}", pending.len());
    for submission in pending {
        println!(
            "  #{} {} entrance {} (queued {})",
            submission.queue_id,
            submission.record.building_id,
            submission.record.entrance,
            submission.queued_at.format("%Y-%m-%d %H:%M:%S UTC")
        );
    }
    Ok(())
}

fn find_building(engine: &SyncEngine<RemoteStore>, building_id: &str) -> Result<Building> {
    let state = engine.state();
    let state = state.lock().unwrap_or_else(std::sync::PoisonError::into_inner);

    state
        .buildings
        .iter()
        .find(|b| b.id.eq_ignore_ascii_case(building_id))
        .cloned()
        .with_context(|| format!("unknown building id: {building_id}"))
}
