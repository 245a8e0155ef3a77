use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use cluedo_core::{DiceRoller, TurnOutcome};
use cluedo_tools::{SimConfig, build_session, init_tracing};

/// Runs an AI-only game and reports where every token ended up.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[arg(short, long, default_value_t = 42)]
    seed: u64,
    #[arg(short, long, default_value_t = 30)]
    rounds: u32,
    /// TOML file with a `[rules]` table and optional `board`/`tokens` keys
    #[arg(short, long)]
    config: Option<PathBuf>,
    /// JSON board specification; overrides the config file's board
    #[arg(short, long)]
    board: Option<PathBuf>,
    /// Write the final session snapshot as JSON
    #[arg(long)]
    snapshot: Option<PathBuf>,
}

fn main() -> Result<()> {
    init_tracing();
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => SimConfig::load(path)?,
        None => SimConfig::default(),
    };
    if args.board.is_some() {
        config.board = args.board.clone();
    }
    let mut session = build_session(&config)?;
    let mut dice = DiceRoller::new(args.seed, session.rules().die);
    tracing::info!(
        seed = args.seed,
        rounds = args.rounds,
        tokens = session.turn_order().len(),
        "simulation started"
    );

    let mut visits: BTreeMap<String, u32> = BTreeMap::new();
    let mut stalls = 0u32;
    for round in 1..=args.rounds {
        for result in session.play_ai_round(&mut dice)? {
            let name = &session.token(result.token)?.name;
            match result.outcome {
                TurnOutcome::RoomEntered(room) => {
                    let room = session.board().room_name(room);
                    let roll = result.roll;
                    println!("round {round:>3}: {name} rolled {roll} and entered the {room}");
                    *visits.entry(room.to_string()).or_default() += 1;
                }
                TurnOutcome::Stalled => stalls += 1,
                TurnOutcome::BudgetExhausted | TurnOutcome::Stopped => {}
            }
        }
    }

    println!("Simulation complete.");
    for (_, token) in session.tokens() {
        let place = match token.location.room() {
            Some(room) => session.board().room_name(room).to_string(),
            None => token.location.to_string(),
        };
        println!("{:<16} {place}", token.name);
    }
    for (room, count) in &visits {
        println!("Visits to {room}: {count}");
    }
    println!("Stalled turns: {stalls}");
    println!("Snapshot Hash: {}", session.snapshot_hash());

    if let Some(path) = &args.snapshot {
        let json = serde_json::to_string_pretty(&session.snapshot())
            .context("Failed to serialize snapshot")?;
        fs::write(path, json)
            .with_context(|| format!("Failed to write snapshot: {}", path.display()))?;
    }
    Ok(())
}
