//! 静的評価
//!
//! 評価値は常に AI 側（探索を依頼したプレイヤー）から見た値。

use super::config::AiConfig;
use super::pst::pst_value;
use crate::board::Board;
use crate::rules::Hand;
use crate::types::{Piece, PieceKind, Player};

/// 駒種の基本価値
pub const fn piece_value(kind: PieceKind) -> i32 {
    match kind {
        PieceKind::King | PieceKind::ChessKing => 10_000,
        PieceKind::Rook | PieceKind::ChessRook => 500,
        PieceKind::Bishop => 400,
        PieceKind::Gold => 300,
        PieceKind::Silver => 250,
        PieceKind::Knight => 200,
        PieceKind::Lance => 150,
        PieceKind::Pawn | PieceKind::ChessPawn => 100,
        PieceKind::ChessQueen => 900,
        PieceKind::ChessBishop | PieceKind::ChessKnight => 300,
    }
}

/// 盤上の駒の価値（成り駒は1.5倍）
#[inline]
pub const fn material_value(piece: Piece) -> i32 {
    let base = piece_value(piece.kind());
    if piece.is_promoted() { base * 3 / 2 } else { base }
}

/// `player` から見た評価値
///
/// 駒の価値の差に、設定に応じて位置評価と持ち駒を加える。
/// 持ち駒は駒打ちを探索する設定のときだけ数える。
pub fn evaluate(board: &Board, hands: &[Hand; 2], player: Player, config: &AiConfig) -> i32 {
    let n = board.size();
    let mut score = 0;
    for (sq, piece) in board.occupied() {
        let mut value = material_value(piece);
        if config.use_pst {
            value += pst_value(piece, sq, n);
        }
        if piece.owner() == player {
            score += value;
        } else {
            score -= value;
        }
    }

    if config.use_drops {
        score += hand_value(&hands[player.index()]);
        score -= hand_value(&hands[player.opponent().index()]);
    }
    score
}

fn hand_value(hand: &Hand) -> i32 {
    hand.iter().map(|(kind, count)| piece_value(kind) * count as i32).sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::layout::{parse_layout, Preset};
    use crate::types::Square;

    fn material_only() -> AiConfig {
        AiConfig::from_level(1)
    }

    #[test]
    fn test_initial_positions_are_balanced() {
        let hands = [Hand::new(), Hand::new()];
        for preset in [Preset::Shogi, Preset::Chess] {
            let board = preset.board();
            assert_eq!(evaluate(&board, &hands, Player::First, &material_only()), 0);
        }
    }

    #[test]
    fn test_positional_bonus_added_to_material() {
        let mut board = Board::empty(9);
        board.set(Square::new(1, 4), Some(Piece::new(PieceKind::ChessPawn, Player::First)));
        let hands = [Hand::new(), Hand::new()];
        let base = piece_value(PieceKind::ChessPawn);
        assert_eq!(evaluate(&board, &hands, Player::First, &material_only()), base);
        let config = AiConfig::from_level(2);
        assert_eq!(evaluate(&board, &hands, Player::First, &config), base + 20);
        assert_eq!(evaluate(&board, &hands, Player::Second, &config), -(base + 20));
    }

    #[test]
    fn test_promoted_piece_is_worth_one_and_a_half() {
        let board = parse_layout(&["+R . .", ". . .", ". . k"]).unwrap();
        let hands = [Hand::new(), Hand::new()];
        assert_eq!(evaluate(&board, &hands, Player::First, &material_only()), 750 - 10_000);
        assert_eq!(evaluate(&board, &hands, Player::Second, &material_only()), 10_000 - 750);
    }

    #[test]
    fn test_hands_count_only_with_drops() {
        let board = Board::empty(3);
        let mut hands = [Hand::new(), Hand::new()];
        hands[0].bank(Piece::new(PieceKind::Silver, Player::Second));
        assert_eq!(evaluate(&board, &hands, Player::First, &material_only()), 0);

        let mut config = material_only();
        config.use_drops = true;
        assert_eq!(evaluate(&board, &hands, Player::First, &config), 250);
        assert_eq!(evaluate(&board, &hands, Player::Second, &config), -250);
    }
}
