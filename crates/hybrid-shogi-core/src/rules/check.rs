//! 王手・詰み・ステイルメイトの判定
//!
//! 盤上の駒の移動だけを対象とする（持ち駒は考慮しない）。
//! 持ち駒による合駒を含めた終局判定は `game` が行う。
//!
//! 玉が盤上にない場合の扱い:
//! - `is_in_check` は false
//! - `is_checkmate` は true（玉なしは負け）
//! - `is_stalemate` は false

use crate::board::Board;
use crate::types::{Player, Square};

/// `by` の駒のいずれかが `target` に利いているか
pub fn is_square_attacked(board: &Board, target: Square, by: Player) -> bool {
    board
        .pieces_of(by)
        .any(|(from, piece)| board.candidate_moves(from, piece).contains(&target))
}

/// `player` の玉に王手がかかっているか
pub fn is_in_check(board: &Board, player: Player) -> bool {
    match board.find_royal(player) {
        Some(royal) => is_square_attacked(board, royal, player.opponent()),
        None => false,
    }
}

/// 盤上の駒を1手動かして王手を解消できるか
///
/// 成りは考慮しない（成っても利きの有無は変わらないため判定に影響しない）。
pub fn has_escape(board: &Board, player: Player) -> bool {
    board.pieces_of(player).any(|(from, piece)| {
        board
            .candidate_moves(from, piece)
            .into_iter()
            .any(|to| !is_in_check(&board.with_move(from, to, piece), player))
    })
}

/// 詰みか（玉がなければ true）
pub fn is_checkmate(board: &Board, player: Player) -> bool {
    if board.find_royal(player).is_none() {
        return true;
    }
    is_in_check(board, player) && !has_escape(board, player)
}

/// ステイルメイトか（王手ではなく、合法手がない）
pub fn is_stalemate(board: &Board, player: Player) -> bool {
    if board.find_royal(player).is_none() {
        return false;
    }
    !is_in_check(board, player) && !has_escape(board, player)
}
