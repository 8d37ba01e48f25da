use std::time::Instant;

use anyhow::{Context, Result};
use hybrid_shogi_core::board::layout::format_layout;
use hybrid_shogi_core::game::{Termination, Winner};
use hybrid_shogi_core::rules::PromotionPolicy;
use hybrid_shogi_core::search::{SearchRequest, SearchSession};
use hybrid_shogi_core::types::{MoveInput, Player};
use log::{debug, info};
use rand::{Rng, SeedableRng};
use rand_xoshiro::Xoshiro256PlusPlus;
use serde::Serialize;

use super::config::MatchConfig;

/// 1手ごとに呼ばれるイベント
#[derive(Debug, Clone, Serialize)]
pub struct MoveEvent {
    pub game: u32,
    pub ply: u32,
    pub side: Player,
    #[serde(rename = "move")]
    pub move_text: String,
    pub score: i32,
    pub nodes: u64,
    pub depth: u8,
    /// ランダムな序盤手、またはレベル1のランダム手
    pub random: bool,
    pub elapsed_ms: u64,
    /// 着手後の盤面
    pub board: Vec<String>,
}

/// 対局結果
#[derive(Debug, Clone, Serialize)]
pub struct GameResult {
    pub game: u32,
    pub plies: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub winner: Option<Winner>,
    pub reason: String,
}

impl GameResult {
    pub fn label(&self) -> &'static str {
        match self.winner {
            Some(Winner::Player(Player::First)) => "player1_win",
            Some(Winner::Player(Player::Second)) => "player2_win",
            Some(Winner::Draw) => "draw",
            None => "unfinished",
        }
    }
}

fn termination_label(termination: Option<Termination>) -> &'static str {
    match termination {
        Some(Termination::Checkmate) => "checkmate",
        Some(Termination::RoyalCaptured) => "royal_captured",
        Some(Termination::NoRoyal) => "no_royal",
        Some(Termination::Stalemate) => "stalemate",
        None => "unknown",
    }
}

/// 対局ごとのシード（シード未指定なら None）
fn game_seed(config: &MatchConfig, game_id: u32) -> Option<u64> {
    const GOLDEN: u64 = 0x9E37_79B9_7F4A_7C15;
    config.seed.map(|seed| seed.wrapping_add(u64::from(game_id).wrapping_mul(GOLDEN)))
}

/// 1局を実行する。
///
/// - `config`: 対局条件
/// - `game_id`: ゲーム番号（シードの派生に使う）
/// - `on_move`: 1手ごとに呼ばれるコールバック
pub fn run_game(
    config: &MatchConfig,
    game_id: u32,
    on_move: &mut dyn FnMut(&MoveEvent) -> Result<()>,
) -> Result<GameResult> {
    let mut game = config.initial_state()?;
    let seed = game_seed(config, game_id);
    let opening_seed = seed.unwrap_or_else(|| rand::rng().random::<u64>());
    let mut opening_rng = Xoshiro256PlusPlus::seed_from_u64(opening_seed);

    for ply in 1..=config.max_plies {
        if game.is_finished() {
            break;
        }
        let side = game.side_to_move();
        let started = Instant::now();

        let (mv, score, nodes, depth, random) = if ply <= config.random_opening_plies {
            let moves = game.legal_moves(PromotionPolicy::Auto);
            if moves.is_empty() {
                break;
            }
            (moves[opening_rng.random_range(0..moves.len())], 0, 0, 0, true)
        } else {
            let ai = config.side(side).ai_config(seed.map(|s| s.wrapping_add(u64::from(ply))));
            let session = SearchSession::start(SearchRequest::from_game(&game, ai))?;
            let outcome = session.resolve_with_fallback()?;
            let Some(mv) = outcome.best else {
                break;
            };
            (mv, outcome.score, outcome.nodes, outcome.depth, outcome.randomized)
        };

        game.apply(MoveInput::from(&mv))
            .with_context(|| format!("engine proposed an illegal move {mv} at ply {ply}"))?;
        let event = MoveEvent {
            game: game_id,
            ply,
            side,
            move_text: mv.to_string(),
            score,
            nodes,
            depth,
            random,
            elapsed_ms: started.elapsed().as_millis().min(u128::from(u64::MAX)) as u64,
            board: format_layout(game.board()),
        };
        debug!("[Selfplay] game {game_id} ply {ply}: {} {}", side, event.move_text);
        on_move(&event)?;
    }

    let plies = game.history().len() as u32;
    let result = if game.is_finished() {
        GameResult {
            game: game_id,
            plies,
            winner: game.winner(),
            reason: termination_label(game.termination()).to_string(),
        }
    } else if plies >= config.max_plies {
        GameResult {
            game: game_id,
            plies,
            winner: Some(Winner::Draw),
            reason: "max_plies".to_string(),
        }
    } else {
        GameResult {
            game: game_id,
            plies,
            winner: None,
            reason: "no_move".to_string(),
        }
    };
    info!(
        "[Selfplay] game {game_id} finished after {plies} plies: {} ({})",
        result.label(),
        result.reason
    );
    Ok(result)
}
