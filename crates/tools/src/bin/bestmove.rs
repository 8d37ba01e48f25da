use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::Parser;
use hybrid_shogi_core::board::layout::Preset;
use hybrid_shogi_core::game::GameState;
use hybrid_shogi_core::search::{AiConfig, Difficulty, SearchRequest, SearchSession};
use hybrid_shogi_core::setup::BoardSetup;
use serde_json::json;

/// 保存された局面に対する AI の指し手を1回だけ求めて JSON で表示する。
///
/// 入力は盤面設定ドキュメント（`--setup`）、対局スナップショット（`--game`）、
/// またはプリセット（`--preset`）のいずれか。
#[derive(Parser, Debug)]
#[command(author, version, about = "Print the engine's move for a saved board")]
struct Cli {
    /// Board setup document (JSON)
    #[arg(long, conflicts_with_all = ["game", "preset"])]
    setup: Option<PathBuf>,

    /// Game snapshot (JSON written by GameState::to_json)
    #[arg(long, conflicts_with = "preset")]
    game: Option<PathBuf>,

    /// Start position preset (shogi, chess, empty8, empty9)
    #[arg(long)]
    preset: Option<String>,

    /// Strength level (1-6)
    #[arg(long, default_value_t = AiConfig::DEFAULT_LEVEL)]
    level: u8,

    /// Legacy difficulty (easy, medium, hard); overrides --level
    #[arg(long)]
    difficulty: Option<Difficulty>,

    /// Search depth override
    #[arg(long)]
    depth: Option<u8>,

    /// Include drops in the search
    #[arg(long, default_value_t = false)]
    drops: bool,

    /// Seed for the random-move path
    #[arg(long)]
    seed: Option<u64>,
}

fn load_game(cli: &Cli) -> Result<GameState> {
    if let Some(path) = &cli.setup {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        let setup = BoardSetup::from_json(&json)?;
        return Ok(GameState::from_setup(&setup)?);
    }
    if let Some(path) = &cli.game {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        return GameState::from_json(&json)
            .with_context(|| format!("invalid game snapshot {}", path.display()));
    }
    let name = cli.preset.as_deref().unwrap_or("shogi");
    match Preset::from_name(name) {
        Some(preset) => Ok(GameState::from_preset(preset)),
        None => bail!("unknown preset {name:?}"),
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Stderr)
        .init();

    let cli = Cli::parse();
    let game = load_game(&cli)?;

    let mut config = match cli.difficulty {
        Some(difficulty) => difficulty.config(),
        None => AiConfig::from_level(cli.level),
    };
    if let Some(depth) = cli.depth {
        config = config.with_depth(depth);
    }
    config.use_drops = cli.drops;
    config.seed = cli.seed;

    let session = SearchSession::start(SearchRequest::from_game(&game, config))?;
    let outcome = session.resolve_with_fallback()?;

    let report = json!({
        "player": game.side_to_move(),
        "level": config.level,
        "move": outcome.best,
        "display": outcome.best.map(|mv| mv.to_string()),
        "score": outcome.score,
        "nodes": outcome.nodes,
        "depth": outcome.depth,
        "randomized": outcome.randomized,
    });
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
