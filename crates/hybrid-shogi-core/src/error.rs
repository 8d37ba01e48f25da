//! エラー型
//!
//! - `LayoutError`: 盤面設定の不備（対局開始前に検出し、開始を止める）
//! - `MoveError`: 非合法な指し手（局面は変更されず、呼び出し側に拒否を返す）
//! - `SearchError`: 探索の失敗（入力盤面の不備、ワーカーの異常終了・タイムアウト）
//!
//! 玉が盤上にない状態はエラーではなく、その側の負けとして `GameStatus` で表す。

use crate::types::{PieceKind, Player, Square};

/// 盤面設定のエラー
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum LayoutError {
    /// 行が1つもない
    #[error("board has no rows")]
    Empty,

    /// 行の長さが揃っていない、または正方でない
    #[error("row {row} has {actual} cells, expected {expected}")]
    RowLength {
        row: usize,
        expected: usize,
        actual: usize,
    },

    /// 解釈できない駒コード
    #[error("unknown piece token {token:?} at ({row},{col})")]
    UnknownToken { token: String, row: usize, col: usize },

    /// 玉（キング）が2枚以上ある
    #[error("{player} has {count} royal pieces, at most one is allowed")]
    DuplicateRoyal { player: Player, count: usize },

    /// 設定ドキュメントの JSON が不正
    #[error("invalid board setup document: {0}")]
    Document(String),
}

/// 指し手のエラー
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum MoveError {
    /// 対局は終了している
    #[error("game is already finished")]
    GameFinished,

    /// 移動元に駒がない
    #[error("no piece at {0}")]
    NoPiece(Square),

    /// 手番でない側の駒
    #[error("piece at {square} belongs to {owner}, but it is {side_to_move}'s turn")]
    NotYourPiece {
        square: Square,
        owner: Player,
        side_to_move: Player,
    },

    /// 合法手に含まれない移動
    #[error("move from {from} to {to} is not legal")]
    IllegalDestination { from: Square, to: Square },

    /// 持ち駒にない
    #[error("{kind:?} is not in {player}'s reserve")]
    NotInHand { kind: PieceKind, player: Player },

    /// 打てないマス
    #[error("cannot drop {kind:?} on {to}")]
    IllegalDrop { kind: PieceKind, to: Square },

    /// チェスのポーン昇格で駒種が指定されていない、または不正
    #[error(
        "chess pawn reaching {to} must name a promotion target (queen, rook, bishop or knight)"
    )]
    PromotionChoiceRequired { to: Square },

    /// 成れない手で成りが指定された
    #[error("promotion is not allowed for this move to {to}")]
    PromotionNotAllowed { to: Square },
}

/// 探索のエラー
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum SearchError {
    /// 入力盤面が不正
    #[error("malformed search input: {0}")]
    MalformedBoard(#[from] LayoutError),

    /// 探索スレッドがパニックした
    #[error("search worker panicked: {0}")]
    WorkerPanicked(String),

    /// 探索スレッドを起動できなかった
    #[error("failed to start search worker: {0}")]
    Spawn(String),

    /// 探索スレッドが結果を返さずに終了した
    #[error("search worker disconnected without a result")]
    Disconnected,

    /// 制限時間内に結果が得られなかった
    #[error("search did not finish within {0} ms")]
    Timeout(u64),
}

/// Result type for layout operations
pub type LayoutResult<T> = Result<T, LayoutError>;

/// Result type for move application
pub type MoveResult<T> = Result<T, MoveError>;

/// Result type for search operations
pub type SearchResult<T> = Result<T, SearchError>;
