//! 駒の位置評価（Piece-Square Tables）
//!
//! 9×9 の基準表をプレイヤー1視点（0行目が敵陣の最奥段）で持ち、
//! 任意サイズの盤面には行・列を比例で対応付けて使う。
//! プレイヤー2は行と列の両方を反転して参照する。

use crate::types::{Piece, PieceKind, Player, Square};

const REF: usize = 9;

type Table = [[i32; REF]; REF];

/// 将棋の歩
#[rustfmt::skip]
const SHOGI_PAWN: Table = [
    [15, 15, 15, 15, 15, 15, 15, 15, 15],
    [15, 15, 15, 15, 15, 15, 15, 15, 15],
    [10, 10, 10, 10, 10, 10, 10, 10, 10],
    [ 5,  5,  5,  5,  5,  5,  5,  5,  5],
    [ 2,  2,  2, 10, 10,  2,  2,  2,  2],
    [ 1,  1,  2, 10, 10,  2,  1,  1,  1],
    [ 0,  0,  0,  5,  5,  0,  0,  0,  0],
    [ 0,  0,  0, -5, -5,  0,  0,  0,  0],
    [ 0,  0,  0,  0,  0,  0,  0,  0,  0],
];

/// チェスのポーン: 昇格段が最も高い
#[rustfmt::skip]
const CHESS_PAWN: Table = [
    [50, 50, 50, 50, 50, 50, 50, 50, 50],
    [20, 20, 20, 20, 20, 20, 20, 20, 20],
    [10, 10, 10, 10, 10, 10, 10, 10, 10],
    [ 5,  5,  5, 10, 10,  5,  5,  5,  5],
    [ 2,  2,  5, 10, 10,  5,  2,  2,  2],
    [ 1,  1,  2,  5,  5,  2,  1,  1,  1],
    [ 0,  0,  0,  0,  0,  0,  0,  0,  0],
    [ 0,  0,  0,  0,  0,  0,  0,  0,  0],
    [ 0,  0,  0,  0,  0,  0,  0,  0,  0],
];

/// 桂馬・ナイト
#[rustfmt::skip]
const KNIGHT: Table = [
    [ 5,   5,  5,  5,  5,  5,  5,   5,  5],
    [10,  10, 10, 10, 10, 10, 10,  10, 10],
    [15,  15, 15, 15, 15, 15, 15,  15, 15],
    [ 5,   5, 10, 10, 10, 10, 10,   5,  5],
    [ 0,   0,  5,  5,  5,  5,  5,   0,  0],
    [ 0,   0,  0,  0,  0,  0,  0,   0,  0],
    [ 0,   0,  0,  0,  0,  0,  0,   0,  0],
    [ 0,   5,  0,  0,  0,  0,  0,   5,  0],
    [ 0, -10,  0,  0,  0,  0,  0, -10,  0],
];

/// 玉・キング: 自陣の最下段が安全
#[rustfmt::skip]
const ROYAL: Table = [
    [-30, -40, -40, -40, -40, -40, -40, -40, -30],
    [-30, -40, -40, -40, -40, -40, -40, -40, -30],
    [-30, -40, -40, -40, -40, -40, -40, -40, -30],
    [-30, -40, -40, -40, -40, -40, -40, -40, -30],
    [-10, -20, -20, -20, -20, -20, -20, -20, -10],
    [  0, -10, -10, -10, -10, -10, -10, -10,   0],
    [ 10,   0,   0,   0,   0,   0,   0,   0,  10],
    [ 20,  10,   0,   0,   0,   0,   0,  10,  20],
    [ 30,  40,  30,  10,   0,  10,  30,  40,  30],
];

/// その他の駒: 中央と敵陣寄りを好む
#[rustfmt::skip]
const GENERIC: Table = [
    [ 10,  10,  10,  10,  10,  10,  10,  10,  10],
    [  5,   5,   5,   5,  10,   5,   5,   5,   5],
    [  0,   0,   0,   5,   5,   5,   0,   0,   0],
    [ -5,   0,   5,  10,  10,  10,   5,   0,  -5],
    [ -5,   0,   5,  10,  10,  10,   5,   0,  -5],
    [ -5,   0,   0,   5,   5,   5,   0,   0,  -5],
    [ -5,  -5,   0,   0,   0,   0,   0,  -5,  -5],
    [ -5,  -5,  -5,  -5,  -5,  -5,  -5,  -5,  -5],
    [-10, -10, -10, -10, -10, -10, -10, -10, -10],
];

/// 成り駒も元の駒種の表を使う
fn table_for(piece: Piece) -> &'static Table {
    match piece.kind() {
        PieceKind::Pawn => &SHOGI_PAWN,
        PieceKind::ChessPawn => &CHESS_PAWN,
        PieceKind::Knight | PieceKind::ChessKnight => &KNIGHT,
        PieceKind::King | PieceKind::ChessKing => &ROYAL,
        _ => &GENERIC,
    }
}

/// 盤面サイズ `n` の座標を基準表の座標に対応付ける（四捨五入）
#[inline]
fn scale(i: usize, n: usize) -> usize {
    if n <= 1 {
        return 0;
    }
    ((i * (REF - 1) + (n - 1) / 2) / (n - 1)).min(REF - 1)
}

/// 駒が `sq` にあるときの位置評価（駒の持ち主視点）
pub fn pst_value(piece: Piece, sq: Square, board_size: usize) -> i32 {
    if !sq.is_valid(board_size) {
        return 0;
    }
    let (row, col) = match piece.owner() {
        Player::First => (sq.row, sq.col),
        Player::Second => (board_size - 1 - sq.row, board_size - 1 - sq.col),
    };
    table_for(piece)[scale(row, board_size)][scale(col, board_size)]
}
