//! 持ち駒と駒打ち（Hand/Drop Rules）

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::board::Board;
use crate::types::{Piece, PieceKind, Player, Square};

/// 持ち駒
///
/// 将棋系の駒だけを保持し、枚数 0 のエントリは持たない。
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "BTreeMap<PieceKind, u32>", into = "BTreeMap<PieceKind, u32>")]
pub struct Hand {
    counts: BTreeMap<PieceKind, u32>,
}

impl Hand {
    pub fn new() -> Hand {
        Hand::default()
    }

    /// 駒種の枚数
    #[inline]
    pub fn count(&self, kind: PieceKind) -> u32 {
        self.counts.get(&kind).copied().unwrap_or(0)
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// 総枚数
    pub fn total(&self) -> u32 {
        self.counts.values().sum()
    }

    /// 持っている駒種と枚数（`PieceKind` の順）
    pub fn iter(&self) -> impl Iterator<Item = (PieceKind, u32)> + '_ {
        self.counts.iter().map(|(&k, &n)| (k, n))
    }

    /// 取った駒を持ち駒に加える
    ///
    /// 成り駒は元の駒種に戻る。チェス系の駒と玉は加えず false を返す。
    pub fn bank(&mut self, captured: Piece) -> bool {
        let kind = captured.demoted_kind();
        if !kind.is_hand_kind() {
            return false;
        }
        *self.counts.entry(kind).or_insert(0) += 1;
        true
    }

    /// 1枚取り出す（持っていなければ false）
    pub fn take(&mut self, kind: PieceKind) -> bool {
        let Some(n) = self.counts.get_mut(&kind) else {
            return false;
        };
        *n -= 1;
        if *n == 0 {
            self.counts.remove(&kind);
        }
        true
    }
}

impl TryFrom<BTreeMap<PieceKind, u32>> for Hand {
    type Error = String;

    fn try_from(counts: BTreeMap<PieceKind, u32>) -> Result<Self, Self::Error> {
        if let Some(kind) = counts.keys().find(|k| !k.is_hand_kind()) {
            return Err(format!("{kind:?} cannot be held in hand"));
        }
        Ok(Hand {
            counts: counts.into_iter().filter(|&(_, n)| n > 0).collect(),
        })
    }
}

impl From<Hand> for BTreeMap<PieceKind, u32> {
    fn from(hand: Hand) -> Self {
        hand.counts
    }
}

/// 列に自分の未成の歩があるか（二歩）
#[inline]
pub fn is_double_pawn_column(board: &Board, column: usize, player: Player) -> bool {
    board.column_has_unpromoted(column, player, PieceKind::Pawn)
}

/// 打った後に動けなくなる段か（歩・香は最奥段、桂は最奥2段）
#[inline]
pub fn is_dead_drop_row(kind: PieceKind, row: usize, player: Player, board_size: usize) -> bool {
    let depth = player.rows_from_far_edge(row, board_size);
    match kind {
        PieceKind::Pawn | PieceKind::Lance => depth == 0,
        PieceKind::Knight => depth < 2,
        _ => false,
    }
}

/// 駒を打てるマス（行優先）
///
/// 空きマスのうち、二歩と行き所のない段を除いたもの。王手の考慮はしない。
pub fn legal_drop_squares(board: &Board, kind: PieceKind, player: Player) -> Vec<Square> {
    if !kind.is_hand_kind() {
        return Vec::new();
    }
    let n = board.size();
    let mut pawn_columns = vec![false; n];
    if kind == PieceKind::Pawn {
        for (col, blocked) in pawn_columns.iter_mut().enumerate() {
            *blocked = is_double_pawn_column(board, col, player);
        }
    }

    board
        .squares()
        .filter(|&sq| board.get(sq).is_none())
        .filter(|&sq| !pawn_columns[sq.col])
        .filter(|&sq| !is_dead_drop_row(kind, sq.row, player, n))
        .collect()
}
