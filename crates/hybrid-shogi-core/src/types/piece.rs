//! 駒種（PieceKind）と駒（Piece）

use serde::{Deserialize, Serialize};

use super::Player;

/// 駒の系統（将棋系/チェス系）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PieceFamily {
    Shogi,
    Chess,
}

/// 駒種
///
/// 将棋の飛車とチェスのルークは別の駒種として扱う（成り方が異なるため）。
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum PieceKind {
    // 将棋
    King,
    Rook,
    Bishop,
    Gold,
    Silver,
    Knight,
    Lance,
    Pawn,
    // チェス
    ChessKing,
    ChessQueen,
    ChessRook,
    ChessBishop,
    ChessKnight,
    ChessPawn,
}

impl PieceKind {
    /// 駒種の数
    pub const NUM: usize = 14;

    /// 全ての駒種
    pub const ALL: [PieceKind; 14] = [
        PieceKind::King,
        PieceKind::Rook,
        PieceKind::Bishop,
        PieceKind::Gold,
        PieceKind::Silver,
        PieceKind::Knight,
        PieceKind::Lance,
        PieceKind::Pawn,
        PieceKind::ChessKing,
        PieceKind::ChessQueen,
        PieceKind::ChessRook,
        PieceKind::ChessBishop,
        PieceKind::ChessKnight,
        PieceKind::ChessPawn,
    ];

    /// 持ち駒にできる駒種（打てる駒）
    pub const HAND_KINDS: [PieceKind; 7] = [
        PieceKind::Rook,
        PieceKind::Bishop,
        PieceKind::Gold,
        PieceKind::Silver,
        PieceKind::Knight,
        PieceKind::Lance,
        PieceKind::Pawn,
    ];

    /// チェスのポーンが昇格できる駒種
    pub const CHESS_PROMOTION_TARGETS: [PieceKind; 4] = [
        PieceKind::ChessQueen,
        PieceKind::ChessRook,
        PieceKind::ChessBishop,
        PieceKind::ChessKnight,
    ];

    /// 系統
    #[inline]
    pub const fn family(self) -> PieceFamily {
        match self {
            PieceKind::King
            | PieceKind::Rook
            | PieceKind::Bishop
            | PieceKind::Gold
            | PieceKind::Silver
            | PieceKind::Knight
            | PieceKind::Lance
            | PieceKind::Pawn => PieceFamily::Shogi,
            _ => PieceFamily::Chess,
        }
    }

    /// 玉（キング）かどうか
    #[inline]
    pub const fn is_royal(self) -> bool {
        matches!(self, PieceKind::King | PieceKind::ChessKing)
    }

    /// その場で成れる駒かどうか（将棋の飛・角・銀・桂・香・歩）
    #[inline]
    pub const fn has_promoted_form(self) -> bool {
        matches!(
            self,
            PieceKind::Rook
                | PieceKind::Bishop
                | PieceKind::Silver
                | PieceKind::Knight
                | PieceKind::Lance
                | PieceKind::Pawn
        )
    }

    /// 持ち駒にできるかどうか
    #[inline]
    pub const fn is_hand_kind(self) -> bool {
        matches!(self.family(), PieceFamily::Shogi) && !self.is_royal()
    }

    /// チェスのポーン昇格先として有効か
    #[inline]
    pub const fn is_chess_promotion_target(self) -> bool {
        matches!(
            self,
            PieceKind::ChessQueen
                | PieceKind::ChessRook
                | PieceKind::ChessBishop
                | PieceKind::ChessKnight
        )
    }

    /// 盤面テキスト形式の駒コード（大文字、先手表記）
    pub const fn code(self) -> &'static str {
        match self {
            PieceKind::King => "K",
            PieceKind::Rook => "R",
            PieceKind::Bishop => "B",
            PieceKind::Gold => "G",
            PieceKind::Silver => "S",
            PieceKind::Knight => "N",
            PieceKind::Lance => "L",
            PieceKind::Pawn => "P",
            PieceKind::ChessKing => "CK",
            PieceKind::ChessQueen => "CQ",
            PieceKind::ChessRook => "CR",
            PieceKind::ChessBishop => "CB",
            PieceKind::ChessKnight => "CN",
            PieceKind::ChessPawn => "CP",
        }
    }

    /// 大文字の駒コードから駒種を得る
    pub fn from_code(code: &str) -> Option<PieceKind> {
        PieceKind::ALL.iter().copied().find(|k| k.code() == code)
    }
}

/// 盤上の駒
///
/// `promoted` は成れる将棋駒でのみ true になり得る。
/// チェスのポーン昇格は `kind` 自体を置き換える。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "PieceRepr")]
pub struct Piece {
    #[serde(rename = "type")]
    kind: PieceKind,
    #[serde(rename = "player")]
    owner: Player,
    promoted: bool,
}

/// デシリアライズ用の生表現（`promoted` の不変条件を検証するため）
#[derive(Deserialize)]
struct PieceRepr {
    #[serde(rename = "type")]
    kind: PieceKind,
    player: Player,
    #[serde(default)]
    promoted: bool,
}

impl TryFrom<PieceRepr> for Piece {
    type Error = String;

    fn try_from(repr: PieceRepr) -> Result<Self, Self::Error> {
        if repr.promoted && !repr.kind.has_promoted_form() {
            return Err(format!("{:?} has no promoted form", repr.kind));
        }
        Ok(Piece {
            kind: repr.kind,
            owner: repr.player,
            promoted: repr.promoted,
        })
    }
}

impl Piece {
    /// 成っていない駒を生成
    #[inline]
    pub const fn new(kind: PieceKind, owner: Player) -> Piece {
        Piece {
            kind,
            owner,
            promoted: false,
        }
    }

    /// 成り駒を生成（成れない駒種なら None）
    #[inline]
    pub const fn new_promoted(kind: PieceKind, owner: Player) -> Option<Piece> {
        if kind.has_promoted_form() {
            Some(Piece {
                kind,
                owner,
                promoted: true,
            })
        } else {
            None
        }
    }

    #[inline]
    pub const fn kind(self) -> PieceKind {
        self.kind
    }

    #[inline]
    pub const fn owner(self) -> Player {
        self.owner
    }

    #[inline]
    pub const fn is_promoted(self) -> bool {
        self.promoted
    }

    #[inline]
    pub const fn family(self) -> PieceFamily {
        self.kind.family()
    }

    #[inline]
    pub const fn is_royal(self) -> bool {
        self.kind.is_royal()
    }

    /// 成った駒を返す（成れない駒、成り済みの駒はそのまま）
    #[inline]
    pub const fn promote(self) -> Piece {
        if self.kind.has_promoted_form() {
            Piece {
                promoted: true,
                ..self
            }
        } else {
            self
        }
    }

    /// 駒種を置き換えた駒を返す（チェスのポーン昇格用）
    #[inline]
    pub const fn with_kind(self, kind: PieceKind) -> Piece {
        Piece {
            kind,
            owner: self.owner,
            promoted: false,
        }
    }

    /// 取られて持ち駒になるときの駒種（成りは元に戻る）
    #[inline]
    pub const fn demoted_kind(self) -> PieceKind {
        self.kind
    }
}
