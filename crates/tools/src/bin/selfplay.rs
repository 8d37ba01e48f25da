use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::Local;
use clap::Parser;
use hybrid_shogi_core::board::layout::Preset;
use log::info;
use serde::Serialize;
use tools::selfplay::{run_game, GameResult, MatchConfig, MoveEvent};

/// AI 同士の自己対局ハーネス。1手ごとに JSON 1行、1局ごとに結果行を書き出す。
///
/// # よく使うコマンド例
///
/// - 将棋の初期配置でレベル3同士を4局:
///   `cargo run -p tools --bin selfplay -- --games 4 --level1 3 --level2 3`
///
/// - TOML の対局条件から実行（CLI の指定が優先）:
///   `cargo run -p tools --bin selfplay -- --config match.toml --out runs/selfplay/match.jsonl`
///
/// `--out` 未指定時は `runs/selfplay/<timestamp>-selfplay.jsonl` に書き出す。
#[derive(Parser, Debug)]
#[command(author, version, about = "hybrid shogi selfplay harness (AI vs AI)")]
struct Cli {
    /// Match config file (TOML)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Number of games to run
    #[arg(long)]
    games: Option<u32>,

    /// Maximum plies per game before declaring a draw
    #[arg(long)]
    max_plies: Option<u32>,

    /// Start position preset (shogi, chess, empty8, empty9)
    #[arg(long)]
    preset: Option<String>,

    /// Board setup document (JSON) used instead of a preset
    #[arg(long)]
    setup: Option<PathBuf>,

    /// Strength level for player 1
    #[arg(long)]
    level1: Option<u8>,

    /// Strength level for player 2
    #[arg(long)]
    level2: Option<u8>,

    /// Random plies played before the engines take over
    #[arg(long)]
    random_opening_plies: Option<u32>,

    /// Seed for reproducible games
    #[arg(long)]
    seed: Option<u64>,

    /// Output JSONL path
    #[arg(long)]
    out: Option<PathBuf>,
}

#[derive(Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum Record<'a> {
    Meta { started_at: String, config: &'a MatchConfig },
    Move(&'a MoveEvent),
    Result(&'a GameResult),
}

fn resolve_output_path(out: Option<&Path>, timestamp: &chrono::DateTime<Local>) -> PathBuf {
    if let Some(path) = out {
        return path.to_path_buf();
    }
    let dir = PathBuf::from("runs/selfplay");
    let name = format!("{}-selfplay.jsonl", timestamp.format("%Y%m%d-%H%M%S"));
    dir.join(name)
}

fn build_config(cli: &Cli) -> Result<MatchConfig> {
    let mut config = match &cli.config {
        Some(path) => MatchConfig::load(path)?,
        None => MatchConfig::default(),
    };
    if let Some(games) = cli.games {
        config.games = games;
    }
    if let Some(max_plies) = cli.max_plies {
        config.max_plies = max_plies;
    }
    if let Some(name) = &cli.preset {
        config.preset =
            Preset::from_name(name).with_context(|| format!("unknown preset {name:?}"))?;
    }
    if let Some(setup) = &cli.setup {
        config.setup = Some(setup.clone());
    }
    if cli.level1.is_some() {
        config.player1.level = cli.level1;
    }
    if cli.level2.is_some() {
        config.player2.level = cli.level2;
    }
    if let Some(plies) = cli.random_opening_plies {
        config.random_opening_plies = plies;
    }
    if cli.seed.is_some() {
        config.seed = cli.seed;
    }
    config.validate()?;
    Ok(config)
}

fn write_record(writer: &mut impl Write, record: &Record<'_>) -> Result<()> {
    serde_json::to_writer(&mut *writer, record)?;
    writeln!(writer)?;
    Ok(())
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Stderr)
        .init();

    let cli = Cli::parse();
    let config = build_config(&cli)?;

    let timestamp = Local::now();
    let output_path = resolve_output_path(cli.out.as_deref(), &timestamp);
    if let Some(parent) = output_path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("failed to create {}", parent.display()))?;
        }
    }
    let file = File::create(&output_path)
        .with_context(|| format!("failed to open {}", output_path.display()))?;
    let mut writer = BufWriter::new(file);
    write_record(
        &mut writer,
        &Record::Meta {
            started_at: timestamp.to_rfc3339(),
            config: &config,
        },
    )?;

    let mut tally = [0u32; 3];
    for game_id in 0..config.games {
        let result = run_game(&config, game_id, &mut |event: &MoveEvent| {
            write_record(&mut writer, &Record::Move(event))
        })?;
        write_record(&mut writer, &Record::Result(&result))?;
        writer.flush()?;
        let slot = match result.label() {
            "player1_win" => 0,
            "player2_win" => 1,
            _ => 2,
        };
        tally[slot] += 1;
    }
    writer.flush()?;

    info!(
        "[Selfplay] {} games: player1 {} / player2 {} / other {} -> {}",
        config.games,
        tally[0],
        tally[1],
        tally[2],
        output_path.display()
    );
    Ok(())
}
