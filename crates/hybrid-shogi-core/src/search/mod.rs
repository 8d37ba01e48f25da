//! 探索エンジン（AI）
//!
//! 固定深さのミニマックス探索（アルファベータ枝刈り）で1手を選ぶ。
//! 探索は同期・単一スレッドの純粋な関数で、隠れたプロセス状態を持たない。
//! UI を止めないための非同期実行は [`SearchSession`] が担う。
//!
//! ```no_run
//! use hybrid_shogi_core::board::layout::Preset;
//! use hybrid_shogi_core::rules::RuleSet;
//! use hybrid_shogi_core::search::{best_move, AiConfig};
//! use hybrid_shogi_core::types::Player;
//!
//! let board = Preset::Shogi.board();
//! let outcome = best_move(&board, Player::First, &RuleSet::default(), &AiConfig::from_level(2))?;
//! println!("{:?}", outcome.best);
//! # Ok::<(), hybrid_shogi_core::error::SearchError>(())
//! ```

pub mod alpha_beta;
pub mod config;
pub mod eval;
pub mod ordering;
pub mod pst;
pub mod session;

use log::info;
use rand::{Rng, SeedableRng};
use rand_xoshiro::Xoshiro256PlusPlus;

pub use alpha_beta::{RootScore, SearchNode, Searcher};
pub use config::{AiConfig, Difficulty};
pub use eval::{evaluate, material_value, piece_value};
pub use session::{SearchRequest, SearchSession, TryResult};

use crate::board::layout::validate;
use crate::board::Board;
use crate::error::SearchResult;
use crate::game::GameState;
use crate::rules::{Hand, RuleSet};
use crate::types::{Move, Player};

/// 1回の思考の結果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchOutcome {
    /// 選んだ手（合法手がなければ None）
    pub best: Option<Move>,
    /// 選んだ手の評価値（AI 側から見た値）
    pub score: i32,
    /// 探索したノード数
    pub nodes: u64,
    /// 探索深さ（ランダム手なら 0）
    pub depth: u8,
    /// 探索せずにランダムに選んだ手か
    pub randomized: bool,
}

impl SearchOutcome {
    const fn no_move() -> SearchOutcome {
        SearchOutcome {
            best: None,
            score: 0,
            nodes: 0,
            depth: 0,
            randomized: false,
        }
    }

    const fn random(mv: Move) -> SearchOutcome {
        SearchOutcome {
            best: Some(mv),
            score: 0,
            nodes: 0,
            depth: 0,
            randomized: true,
        }
    }
}

/// 設定のシード（なければ OS の乱数）から乱数生成器を作る
pub(crate) fn make_rng(seed: Option<u64>) -> Xoshiro256PlusPlus {
    let seed = seed.unwrap_or_else(|| rand::rng().random::<u64>());
    Xoshiro256PlusPlus::seed_from_u64(seed)
}

/// `player` の手を選ぶ（持ち駒なし）
///
/// 合法手がなければ `best: None` を返す（エラーではない）。
pub fn best_move(
    board: &Board,
    player: Player,
    rules: &RuleSet,
    config: &AiConfig,
) -> SearchResult<SearchOutcome> {
    let root = SearchNode::new(board.clone());
    search_node(root, player, rules, config)
}

/// 対局中の局面から手番側の手を選ぶ（持ち駒を含む）
pub fn best_move_for_game(game: &GameState, config: &AiConfig) -> SearchResult<SearchOutcome> {
    if game.is_finished() {
        return Ok(SearchOutcome::no_move());
    }
    let player = game.side_to_move();
    let root = SearchNode {
        board: game.board().clone(),
        hands: [game.hand(Player::First).clone(), game.hand(Player::Second).clone()],
    };
    search_node(root, player, game.rules(), config)
}

/// 持ち駒を指定して手を選ぶ
pub fn best_move_with_hands(
    board: &Board,
    hands: &[Hand; 2],
    player: Player,
    rules: &RuleSet,
    config: &AiConfig,
) -> SearchResult<SearchOutcome> {
    let root = SearchNode {
        board: board.clone(),
        hands: hands.clone(),
    };
    search_node(root, player, rules, config)
}

pub(crate) fn search_node(
    root: SearchNode,
    player: Player,
    rules: &RuleSet,
    config: &AiConfig,
) -> SearchResult<SearchOutcome> {
    validate(&root.board)?;

    let mut searcher = Searcher::new(player, rules, config);
    let moves = searcher.generate(&root, player);
    if moves.is_empty() {
        info!("[Search] level {} {player}: no legal move", config.level);
        return Ok(SearchOutcome::no_move());
    }

    if config.random_move_rate > 0.0 {
        let mut rng = make_rng(config.seed);
        if rng.random::<f64>() < config.random_move_rate {
            let mv = moves[rng.random_range(0..moves.len())];
            info!(
                "[Search] level {} {player}: random move {mv} ({} candidates)",
                config.level,
                moves.len()
            );
            return Ok(SearchOutcome::random(mv));
        }
    }

    let depth = config.max_depth.max(1);
    let Some(best) = searcher.search_root(&root, &moves, depth) else {
        return Ok(SearchOutcome::no_move());
    };
    info!(
        "[Search] level {} {player}: depth {depth}, {} root moves, best {} score {} nodes {}",
        config.level,
        moves.len(),
        best.mv,
        best.score,
        searcher.nodes()
    );
    Ok(SearchOutcome {
        best: Some(best.mv),
        score: best.score,
        nodes: searcher.nodes(),
        depth,
        randomized: false,
    })
}

/// 一様ランダムな合法手（探索の代替として使う）
///
/// 盤面が不正なら探索と同じく `SearchError::MalformedBoard` を返す。
pub fn random_legal_move(
    board: &Board,
    hands: &[Hand; 2],
    player: Player,
    rules: &RuleSet,
    config: &AiConfig,
) -> SearchResult<Option<Move>> {
    validate(board)?;
    let root = SearchNode {
        board: board.clone(),
        hands: hands.clone(),
    };
    let moves = Searcher::new(player, rules, config).generate(&root, player);
    if moves.is_empty() {
        return Ok(None);
    }
    let mut rng = make_rng(config.seed);
    Ok(Some(moves[rng.random_range(0..moves.len())]))
}
