use std::collections::BTreeMap;

use anyhow::{Result, bail};
use clap::Parser;
use cluedo_core::{
    CellId, DiceRoller, DieRange, Location, MoveEvent, MovementRules, Session, TurnOutcome,
    TurnResult,
};
use cluedo_tools::init_tracing;
use rand_chacha::{
    ChaCha8Rng,
    rand_core::{Rng, SeedableRng},
};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[arg(short, long, default_value_t = 42)]
    seed: u64,
    #[arg(short, long, default_value_t = 50)]
    games: u32,
    #[arg(short, long, default_value_t = 40)]
    rounds: u32,
}

fn choose<T: Clone>(rng: &mut ChaCha8Rng, slice: &[T]) -> T {
    let p = rng.next_u64() as usize % slice.len();
    slice[p].clone()
}

fn random_rules(rng: &mut ChaCha8Rng) -> MovementRules {
    MovementRules {
        die: choose(rng, &[DieRange::default(), DieRange { min: 2, max: 12 }]),
        block_occupied_corridors: choose(rng, &[true, true, false]),
        secret_passages: choose(rng, &[true, false]),
        ..MovementRules::default()
    }
}

fn check_turn(session: &Session, result: &TurnResult) -> Result<()> {
    if result.budget_remaining > result.roll {
        bail!("Invariant failed: budget grew past the roll");
    }
    let steps = result.path().len() as u32;
    let spent = result.roll - result.budget_remaining;
    if steps != spent {
        bail!("Invariant failed: {steps} steps for {spent} budget spent");
    }
    match result.outcome {
        TurnOutcome::RoomEntered(room) if result.final_location != Location::Room(room) => {
            bail!("Invariant failed: entered {room} but stands at {}", result.final_location);
        }
        TurnOutcome::Stalled if result.final_location != result.start => {
            bail!("Invariant failed: stalled token moved");
        }
        _ => {}
    }
    let rooms_entered =
        result.events.iter().filter(|event| matches!(event, MoveEvent::RoomEntered(_))).count();
    if rooms_entered > 1 {
        bail!("Invariant failed: {rooms_entered} rooms entered in one turn");
    }
    if session.token(result.token)?.location != result.final_location {
        bail!("Invariant failed: session and turn result disagree on location");
    }
    Ok(())
}

fn check_board(session: &Session) -> Result<()> {
    let mut corridor: BTreeMap<CellId, u32> = BTreeMap::new();
    for (_, token) in session.tokens() {
        if let Location::Cell(cell) = token.location {
            if session.board().is_room_entry(cell)? {
                bail!("Invariant failed: {} stands on entry cell {cell}", token.name);
            }
            *corridor.entry(cell).or_default() += 1;
        }
    }
    for (cell, count) in corridor {
        if count > 1 && session.rules().block_occupied_corridors {
            bail!("Invariant failed: {count} tokens share corridor cell {cell}");
        }
        if session.occupancy().occupants(cell).count() as u32 != count {
            bail!("Invariant failed: occupancy out of sync at {cell}");
        }
    }
    Ok(())
}

fn main() -> Result<()> {
    init_tracing();
    let args = Args::parse();

    println!("Starting fuzz harness on seed {} for {} games...", args.seed, args.games);
    let mut rng = ChaCha8Rng::seed_from_u64(args.seed);

    for game in 0..args.games {
        let rules = random_rules(&mut rng);
        let mut session = Session::classic(rules.clone())?;
        let mut dice = DiceRoller::new(rng.next_u64(), rules.die);
        for _ in 0..args.rounds {
            for result in session.play_ai_round(&mut dice)? {
                check_turn(&session, &result)?;
            }
            check_board(&session)?;
        }
        tracing::debug!(game, hash = session.snapshot_hash(), "game checked");
    }

    println!("Fuzzing completed successfully.");
    Ok(())
}
