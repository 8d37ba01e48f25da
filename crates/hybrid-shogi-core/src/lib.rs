//! # hybrid-shogi-core
//!
//! 将棋とチェスの駒を同じ盤で混ぜて指すバリアントのルールエンジンと AI。
//!
//! ## モジュール構成
//!
//! - `types`: 基本型（Player, PieceKind, Piece, Square, Move, etc.）
//! - `catalog`: 駒種ごとの動きの定義
//! - `board`: 盤面と候補手、盤面テキスト形式とプリセット
//! - `rules`: 成り・持ち駒・王手判定・合法手
//! - `setup`: 盤面設定ドキュメント（JSON）
//! - `game`: 対局状態と指し手の適用
//! - `search`: アルファベータ探索と非同期の探索セッション
//! - `error`: エラー型
//!
//! ログは `log` ファサード経由で出力する。ロガーの初期化は呼び出し側が行う。

pub mod types;

pub mod board;
pub mod catalog;

pub mod rules;

pub mod game;
pub mod setup;

pub mod search;

pub mod error;

pub use board::layout::Preset;
pub use board::Board;
pub use error::{LayoutError, MoveError, SearchError};
pub use game::{GameState, GameStatus, Winner};
pub use rules::RuleSet;
pub use search::{best_move, AiConfig, Difficulty, SearchOutcome, SearchRequest, SearchSession};
