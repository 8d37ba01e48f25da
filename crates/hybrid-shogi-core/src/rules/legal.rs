//! 合法手（Legal Move Filter）
//!
//! 候補手のうち、指した後に自玉へ王手がかからないものだけを残す。
//! 対局で使う指し手生成はここを通す。

use super::check::is_in_check;
use super::hand::{legal_drop_squares, Hand};
use super::promotion::{promotion_choices, PromotionPolicy, PromotionZones};
use crate::board::{Board, SquareList};
use crate::types::{Move, Piece, Player, Promotion, Square};

/// `from` にある `piece` の合法な移動先
///
/// 候補手ごとに盤面のコピーで駒を動かし、自玉が王手にならないものを残す。
pub fn legal_moves(board: &Board, from: Square, piece: Piece) -> SquareList {
    let owner = piece.owner();
    board
        .candidate_moves(from, piece)
        .into_iter()
        .filter(|&to| !is_in_check(&board.with_move(from, to, piece), owner))
        .collect()
}

/// 手番側の盤上の駒の合法手を全て列挙する
///
/// 順序は駒の行優先走査、駒ごとの生成順、成りの候補順。
pub fn all_legal_moves(
    board: &Board,
    player: Player,
    zones: &PromotionZones,
    policy: PromotionPolicy,
) -> Vec<Move> {
    let n = board.size();
    let mut out = Vec::new();
    for (from, piece) in board.pieces_of(player) {
        for to in legal_moves(board, from, piece) {
            let captured = board.get(to);
            for promotion in promotion_choices(piece, from, to, zones, n, policy) {
                out.push(Move {
                    from: Some(from),
                    to,
                    piece,
                    captured,
                    promotion,
                });
            }
        }
    }
    out
}

/// 持ち駒を打つ合法手を全て列挙する
///
/// 順序は駒種順、マスの行優先。打った後に自玉が王手になる手は除く。
pub fn legal_drops(board: &Board, player: Player, hand: &Hand) -> Vec<Move> {
    let mut out = Vec::new();
    for (kind, _) in hand.iter() {
        let piece = Piece::new(kind, player);
        for to in legal_drop_squares(board, kind, player) {
            if is_in_check(&board.with_drop(to, piece), player) {
                continue;
            }
            out.push(Move {
                from: None,
                to,
                piece,
                captured: None,
                promotion: Promotion::NoPromotion,
            });
        }
    }
    out
}

/// 合法手が1つでもあるか（`hand` が None なら駒打ちを考えない）
pub fn has_legal_move(board: &Board, player: Player, hand: Option<&Hand>) -> bool {
    let on_board = board
        .pieces_of(player)
        .any(|(from, piece)| !legal_moves(board, from, piece).is_empty());
    if on_board {
        return true;
    }
    match hand {
        Some(hand) => hand.iter().any(|(kind, _)| {
            let piece = Piece::new(kind, player);
            legal_drop_squares(board, kind, player)
                .into_iter()
                .any(|to| !is_in_check(&board.with_drop(to, piece), player))
        }),
        None => false,
    }
}
