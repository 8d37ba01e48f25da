//! 指し手（Move）と成り指定（Promotion）

use serde::{Deserialize, Serialize};

use super::{Piece, PieceKind, Square};

/// 成りの指定
///
/// 将棋駒のその場成りとチェスのポーン昇格（駒種の置き換え）を区別する。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Promotion {
    /// 成らない
    #[default]
    NoPromotion,
    /// その場で成る（将棋駒）
    InPlace,
    /// 指定した駒種に置き換える（チェスのポーン）
    To(PieceKind),
}

impl Promotion {
    #[inline]
    pub const fn is_promotion(self) -> bool {
        !matches!(self, Promotion::NoPromotion)
    }
}

/// 確定した指し手
///
/// `piece` は動かす前の駒、`captured` は取った駒（盤上の姿のまま）。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Move {
    /// 移動元（None の場合は持ち駒から打つ）
    pub from: Option<Square>,
    pub to: Square,
    pub piece: Piece,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub captured: Option<Piece>,
    #[serde(default)]
    pub promotion: Promotion,
}

impl Move {
    /// 駒打ちかどうか
    #[inline]
    pub const fn is_drop(&self) -> bool {
        self.from.is_none()
    }

    #[inline]
    pub const fn is_capture(&self) -> bool {
        self.captured.is_some()
    }

    /// 着手後に `to` に置かれる駒
    #[inline]
    pub const fn placed_piece(&self) -> Piece {
        match self.promotion {
            Promotion::NoPromotion => self.piece,
            Promotion::InPlace => self.piece.promote(),
            Promotion::To(kind) => self.piece.with_kind(kind),
        }
    }
}

impl std::fmt::Display for Move {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.from {
            Some(from) => write!(f, "{}{}->{}", self.piece.kind().code(), from, self.to)?,
            None => write!(f, "{}*{}", self.piece.kind().code(), self.to)?,
        }
        match self.promotion {
            Promotion::NoPromotion => Ok(()),
            Promotion::InPlace => write!(f, "+"),
            Promotion::To(kind) => write!(f, "={}", kind.code()),
        }
    }
}

/// 呼び出し側が指定する指し手
///
/// 確定前の入力であり、合法性は `GameState::apply` が検証する。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum MoveInput {
    /// 盤上の駒を動かす
    Board {
        from: Square,
        to: Square,
        #[serde(default)]
        promotion: Promotion,
    },
    /// 持ち駒を打つ
    Drop { kind: PieceKind, to: Square },
}

impl MoveInput {
    #[inline]
    pub const fn to(&self) -> Square {
        match self {
            MoveInput::Board { to, .. } | MoveInput::Drop { to, .. } => *to,
        }
    }
}

impl From<&Move> for MoveInput {
    fn from(mv: &Move) -> MoveInput {
        match mv.from {
            Some(from) => MoveInput::Board {
                from,
                to: mv.to,
                promotion: mv.promotion,
            },
            None => MoveInput::Drop {
                kind: mv.piece.kind(),
                to: mv.to,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Player;

    #[test]
    fn test_placed_piece() {
        let pawn = Piece::new(PieceKind::ChessPawn, Player::First);
        let mv = Move {
            from: Some(Square::new(1, 0)),
            to: Square::new(0, 0),
            piece: pawn,
            captured: None,
            promotion: Promotion::To(PieceKind::ChessQueen),
        };
        assert_eq!(mv.placed_piece(), Piece::new(PieceKind::ChessQueen, Player::First));
        assert_eq!(mv.to_string(), "CP(1,0)->(0,0)=CQ");
    }

    #[test]
    fn test_move_input_json() {
        let json = r#"{"type":"board","from":{"row":6,"col":4},"to":{"row":4,"col":4}}"#;
        let input: MoveInput = serde_json::from_str(json).unwrap();
        assert_eq!(
            input,
            MoveInput::Board {
                from: Square::new(6, 4),
                to: Square::new(4, 4),
                promotion: Promotion::NoPromotion,
            }
        );

        let drop = r#"{"type":"drop","kind":"pawn","to":{"row":4,"col":0}}"#;
        let input: MoveInput = serde_json::from_str(drop).unwrap();
        assert_eq!(input.to(), Square::new(4, 0));
    }
}
