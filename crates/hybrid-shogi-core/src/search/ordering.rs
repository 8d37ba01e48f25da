//! 指し手の並べ替え
//!
//! 内部ノードの枝刈りを効かせるためだけに使う。評価値の打ち切りには使わないため、
//! 探索結果（各ルート手の評価値）は並べ替えの有無で変わらない。

use std::collections::HashMap;
use std::hash::{DefaultHasher, Hash, Hasher};

use super::eval::piece_value;
use crate::board::Board;
use crate::types::{Move, Player};

/// キラー手を保持する最大手数
pub const MAX_PLY: usize = 64;

const CACHED_BONUS: i32 = 30_000;
const CAPTURE_BONUS: i32 = 10_000;
const KILLER_BONUS: [i32; 2] = [5_000, 4_000];
const PROMOTION_BONUS: i32 = 3_000;

/// 局面のキー（盤面と手番）
pub fn position_key(board: &Board, side: Player) -> u64 {
    let mut hasher = DefaultHasher::new();
    board.hash(&mut hasher);
    side.hash(&mut hasher);
    hasher.finish()
}

/// 局面ごとの最善手の記録
#[derive(Debug, Default)]
pub struct OrderingCache {
    best: HashMap<u64, Move>,
}

impl OrderingCache {
    pub fn new() -> OrderingCache {
        OrderingCache::default()
    }

    #[inline]
    pub fn get(&self, key: u64) -> Option<&Move> {
        self.best.get(&key)
    }

    #[inline]
    pub fn store(&mut self, key: u64, mv: Move) {
        self.best.insert(key, mv);
    }

    pub fn len(&self) -> usize {
        self.best.len()
    }

    pub fn is_empty(&self) -> bool {
        self.best.is_empty()
    }
}

/// 手数ごとのキラー手（駒を取らない手で枝刈りを起こしたもの）
#[derive(Debug)]
pub struct KillerTable {
    slots: Vec<[Option<Move>; 2]>,
}

impl Default for KillerTable {
    fn default() -> Self {
        KillerTable {
            slots: vec![[None, None]; MAX_PLY],
        }
    }
}

impl KillerTable {
    pub fn new() -> KillerTable {
        KillerTable::default()
    }

    /// 枝刈りを起こした手を記録する（駒取りは記録しない）
    pub fn record(&mut self, ply: usize, mv: Move) {
        if mv.is_capture() {
            return;
        }
        let Some(slot) = self.slots.get_mut(ply) else {
            return;
        };
        if slot[0] != Some(mv) {
            slot[1] = slot[0];
            slot[0] = Some(mv);
        }
    }

    #[inline]
    pub fn get(&self, ply: usize) -> [Option<Move>; 2] {
        self.slots.get(ply).copied().unwrap_or([None, None])
    }
}

/// 手の並べ替え優先度（大きいほど先に読む）
pub fn order_score(mv: &Move, cached: Option<&Move>, killers: &[Option<Move>; 2]) -> i32 {
    let mut score = 0;
    if cached == Some(mv) {
        score += CACHED_BONUS;
    }
    if let Some(victim) = mv.captured {
        score += CAPTURE_BONUS + piece_value(victim.kind());
    }
    if killers[0].as_ref() == Some(mv) {
        score += KILLER_BONUS[0];
    } else if killers[1].as_ref() == Some(mv) {
        score += KILLER_BONUS[1];
    }
    if mv.promotion.is_promotion() {
        score += PROMOTION_BONUS;
    }
    score
}

/// 優先度の高い順に並べ替える（同点は元の順序を保つ）
pub fn order_moves(moves: &mut [Move], cached: Option<&Move>, killers: &[Option<Move>; 2]) {
    moves.sort_by_key(|mv| std::cmp::Reverse(order_score(mv, cached, killers)));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Piece, PieceKind, Promotion, Square};

    fn quiet(col: usize) -> Move {
        Move {
            from: Some(Square::new(4, col)),
            to: Square::new(3, col),
            piece: Piece::new(PieceKind::Gold, Player::First),
            captured: None,
            promotion: Promotion::NoPromotion,
        }
    }

    #[test]
    fn test_captures_first_by_victim_value() {
        let mut low = quiet(1);
        low.captured = Some(Piece::new(PieceKind::Pawn, Player::Second));
        let mut high = quiet(2);
        high.captured = Some(Piece::new(PieceKind::Rook, Player::Second));
        let mut moves = vec![quiet(0), low, high, quiet(3)];
        order_moves(&mut moves, None, &[None, None]);
        assert_eq!(moves, vec![high, low, quiet(0), quiet(3)]);
    }

    #[test]
    fn test_cached_and_killers() {
        let mut moves = vec![quiet(0), quiet(1), quiet(2), quiet(3)];
        let cached = quiet(3);
        order_moves(&mut moves, Some(&cached), &[Some(quiet(2)), Some(quiet(1))]);
        assert_eq!(moves, vec![quiet(3), quiet(2), quiet(1), quiet(0)]);
    }

    #[test]
    fn test_killer_record_shifts_and_skips_captures() {
        let mut killers = KillerTable::new();
        killers.record(2, quiet(0));
        killers.record(2, quiet(1));
        killers.record(2, quiet(1));
        assert_eq!(killers.get(2), [Some(quiet(1)), Some(quiet(0))]);

        let mut capture = quiet(5);
        capture.captured = Some(Piece::new(PieceKind::Pawn, Player::Second));
        killers.record(3, capture);
        assert_eq!(killers.get(3), [None, None]);
        // 上限を超える手数は無視
        killers.record(MAX_PLY + 1, quiet(0));
        assert_eq!(killers.get(MAX_PLY + 1), [None, None]);
    }

    #[test]
    fn test_position_key_depends_on_side() {
        let board = Board::empty(3);
        assert_ne!(position_key(&board, Player::First), position_key(&board, Player::Second));
        let copy = board.clone();
        assert_eq!(position_key(&board, Player::First), position_key(&copy, Player::First));
    }
}
