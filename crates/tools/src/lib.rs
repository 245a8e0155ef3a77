//! Shared setup for the simulation binaries: config files, boards, logging.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use cluedo_core::{BoardGraph, CellKind, Location, MovementRules, PlayerKind, Session};
use serde::Deserialize;
use tracing_subscriber::EnvFilter;

/// Contents of a `--config` TOML file. Every key is optional.
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SimConfig {
    pub rules: MovementRules,
    /// JSON board specification; the classic board when absent.
    pub board: Option<PathBuf>,
    /// AI tokens to seat on a custom board.
    pub tokens: Option<usize>,
}

impl SimConfig {
    pub fn parse(text: &str) -> Result<Self> {
        let config: SimConfig = toml::from_str(text).context("Failed to parse config TOML")?;
        config.rules.validate().context("Invalid movement rules")?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        Self::parse(&text).with_context(|| format!("In config file {}", path.display()))
    }
}

pub fn load_board(path: &Path) -> Result<BoardGraph> {
    let json = fs::read_to_string(path)
        .with_context(|| format!("Failed to read board file: {}", path.display()))?;
    BoardGraph::from_json_str(&json)
        .with_context(|| format!("Invalid board specification in {}", path.display()))
}

/// Seats `count` AI tokens on the lowest-numbered corridor cells of `board`.
pub fn seat_tokens(board: BoardGraph, rules: MovementRules, count: usize) -> Result<Session> {
    let starts: Vec<_> = board
        .cells()
        .filter(|cell| cell.kind() == CellKind::Corridor)
        .map(|cell| cell.id())
        .take(count)
        .collect();
    if starts.len() < count {
        bail!("board has {} corridor cells, cannot seat {count} tokens", starts.len());
    }
    let mut session = Session::new(board, rules)?;
    for (seat, cell) in starts.into_iter().enumerate() {
        session.add_token(format!("Player {}", seat + 1), PlayerKind::Ai, Location::Cell(cell))?;
    }
    Ok(session)
}

/// Builds the session a config describes: the classic six suspects, or
/// seated tokens on a custom board.
pub fn build_session(config: &SimConfig) -> Result<Session> {
    match &config.board {
        None => Ok(Session::classic(config.rules.clone())?),
        Some(path) => {
            let board = load_board(path)?;
            seat_tokens(board, config.rules.clone(), config.tokens.unwrap_or(6))
        }
    }
}

/// Logs to stderr, filtered by `RUST_LOG` (default `info`).
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with_target(false)
        .with_writer(io::stderr)
        .init();
}
