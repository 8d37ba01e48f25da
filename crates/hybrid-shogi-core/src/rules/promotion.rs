//! 成りの判定（Promotion Rules）
//!
//! - 将棋駒: 移動元か移動先が成りゾーンにあれば成れる。行き所のない駒は必ず成る。
//! - チェスのポーン: チェス用ゾーンに入ったら昇格先の駒種を必ず選ぶ。
//!
//! 成りゾーンはプレイヤーごと・系統ごとに独立に設定する。
//! 行き所のない駒の判定はゾーン設定によらず盤端で決まる。

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use super::hand::is_dead_drop_row;
use crate::error::{MoveError, MoveResult};
use crate::types::{Piece, PieceFamily, PieceKind, Player, Promotion, Square};

/// 成りゾーン
///
/// `from_top = true` なら 0 行目から `rows` 行、false なら最終行から `rows` 行。
/// `rows == 0` はその系統が成らないことを表す。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PromotionZone {
    pub rows: usize,
    pub from_top: bool,
}

impl PromotionZone {
    /// 将棋駒の既定の段数
    pub const DEFAULT_SHOGI_ROWS: usize = 3;
    /// チェス駒の既定の段数
    pub const DEFAULT_CHESS_ROWS: usize = 1;

    /// プレイヤーから見た最奥段側に `rows` 行のゾーン
    #[inline]
    pub const fn far_edge(player: Player, rows: usize) -> PromotionZone {
        PromotionZone {
            rows,
            from_top: matches!(player, Player::First),
        }
    }

    /// 成らないゾーン
    #[inline]
    pub const fn disabled() -> PromotionZone {
        PromotionZone {
            rows: 0,
            from_top: true,
        }
    }

    /// 行がゾーン内か
    #[inline]
    pub const fn contains(self, row: usize, board_size: usize) -> bool {
        if row >= board_size {
            return false;
        }
        if self.from_top {
            row < self.rows
        } else {
            row + self.rows >= board_size
        }
    }
}

/// 1プレイヤー分の系統別ゾーン
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PromotionZones {
    pub shogi: PromotionZone,
    pub chess: PromotionZone,
}

impl PromotionZones {
    /// 既定値（将棋3段・チェス1段、いずれも最奥段側）
    pub const fn default_for(player: Player) -> PromotionZones {
        PromotionZones {
            shogi: PromotionZone::far_edge(player, PromotionZone::DEFAULT_SHOGI_ROWS),
            chess: PromotionZone::far_edge(player, PromotionZone::DEFAULT_CHESS_ROWS),
        }
    }

    #[inline]
    pub const fn for_family(&self, family: PieceFamily) -> PromotionZone {
        match family {
            PieceFamily::Shogi => self.shogi,
            PieceFamily::Chess => self.chess,
        }
    }
}

/// 成りを選択できるか（将棋駒）
///
/// 成れる駒種で未成かつ、移動元か移動先が将棋用ゾーン内であること。
/// 駒打ちは成れないため移動元は必須。
pub fn may_promote(
    piece: Piece,
    from: Square,
    to: Square,
    zones: &PromotionZones,
    board_size: usize,
) -> bool {
    if piece.is_promoted() || !piece.kind().has_promoted_form() {
        return false;
    }
    let zone = zones.shogi;
    zone.contains(from.row, board_size) || zone.contains(to.row, board_size)
}

/// 成らなければ次に動けない移動か（歩・香は最奥段、桂は最奥2段）
///
/// ゾーン設定には依存しない。
pub fn must_promote(piece: Piece, to: Square, player: Player, board_size: usize) -> bool {
    if piece.is_promoted() || !to.is_valid(board_size) {
        return false;
    }
    is_dead_drop_row(piece.kind(), to.row, player, board_size)
}

/// チェスのポーンがチェス用ゾーンに入ったか
pub fn can_promote_chess(
    piece: Piece,
    to: Square,
    zones: &PromotionZones,
    board_size: usize,
) -> bool {
    piece.kind() == PieceKind::ChessPawn && zones.chess.contains(to.row, board_size)
}

/// 呼び出し側の成り指定を検証し、確定した成りを返す
///
/// - チェスのポーンがゾーンに入る手は `Promotion::To` で有効な駒種を指定しなければならない
/// - 行き所のない将棋駒は指定によらず成る
/// - 成れない手に成りを指定するとエラー
pub fn resolve_promotion(
    piece: Piece,
    from: Square,
    to: Square,
    requested: Promotion,
    zones: &PromotionZones,
    board_size: usize,
) -> MoveResult<Promotion> {
    if can_promote_chess(piece, to, zones, board_size) {
        return match requested {
            Promotion::To(kind) if kind.is_chess_promotion_target() => Ok(requested),
            _ => Err(MoveError::PromotionChoiceRequired { to }),
        };
    }

    match requested {
        Promotion::To(_) => Err(MoveError::PromotionNotAllowed { to }),
        _ if must_promote(piece, to, piece.owner(), board_size) => Ok(Promotion::InPlace),
        Promotion::InPlace if may_promote(piece, from, to, zones, board_size) => {
            Ok(Promotion::InPlace)
        }
        Promotion::InPlace => Err(MoveError::PromotionNotAllowed { to }),
        Promotion::NoPromotion => Ok(Promotion::NoPromotion),
    }
}

/// 指し手一覧を作るときの成りの扱い
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PromotionPolicy {
    /// 成れるなら常に成り、チェスのポーンはクイーンを選ぶ（AI の既定）
    #[default]
    Auto,
    /// 選択可能な成り方を全て列挙する
    AllChoices,
}

/// 移動元・移動先の組に対する成りの候補
pub type PromotionChoices = SmallVec<[Promotion; 4]>;

/// 方針に従って、この移動で取り得る成り指定を列挙する
///
/// 返す値はいずれも `resolve_promotion` を通過する。
pub fn promotion_choices(
    piece: Piece,
    from: Square,
    to: Square,
    zones: &PromotionZones,
    board_size: usize,
    policy: PromotionPolicy,
) -> PromotionChoices {
    let mut out = PromotionChoices::new();

    if can_promote_chess(piece, to, zones, board_size) {
        match policy {
            PromotionPolicy::Auto => out.push(Promotion::To(PieceKind::ChessQueen)),
            PromotionPolicy::AllChoices => {
                out.extend(PieceKind::CHESS_PROMOTION_TARGETS.iter().map(|&k| Promotion::To(k)));
            }
        }
        return out;
    }

    if must_promote(piece, to, piece.owner(), board_size) {
        out.push(Promotion::InPlace);
    } else if may_promote(piece, from, to, zones, board_size) {
        out.push(Promotion::InPlace);
        if policy == PromotionPolicy::AllChoices {
            out.push(Promotion::NoPromotion);
        }
    } else {
        out.push(Promotion::NoPromotion);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sq(row: usize, col: usize) -> Square {
        Square::new(row, col)
    }

    #[test]
    fn test_zone_contains() {
        let top = PromotionZone::far_edge(Player::First, 3);
        assert!(top.contains(0, 9));
        assert!(top.contains(2, 9));
        assert!(!top.contains(3, 9));

        let bottom = PromotionZone::far_edge(Player::Second, 3);
        assert!(bottom.contains(8, 9));
        assert!(bottom.contains(6, 9));
        assert!(!bottom.contains(5, 9));
        assert!(!bottom.contains(9, 9));

        assert!(!PromotionZone::disabled().contains(0, 9));
    }

    #[test]
    fn test_may_promote_entering_or_leaving() {
        let zones = PromotionZones::default_for(Player::First);
        let silver = Piece::new(PieceKind::Silver, Player::First);
        // 入る
        assert!(may_promote(silver, sq(3, 4), sq(2, 4), &zones, 9));
        // 出る
        assert!(may_promote(silver, sq(2, 4), sq(3, 3), &zones, 9));
        // ゾーン外の移動
        assert!(!may_promote(silver, sq(4, 4), sq(3, 4), &zones, 9));
        // 金・成り済みは成れない
        let gold = Piece::new(PieceKind::Gold, Player::First);
        assert!(!may_promote(gold, sq(3, 4), sq(2, 4), &zones, 9));
        assert!(!may_promote(silver.promote(), sq(3, 4), sq(2, 4), &zones, 9));
    }

    #[test]
    fn test_must_promote_ignores_zone() {
        let pawn = Piece::new(PieceKind::Pawn, Player::First);
        let knight = Piece::new(PieceKind::Knight, Player::Second);
        assert!(must_promote(pawn, sq(0, 0), Player::First, 9));
        assert!(!must_promote(pawn, sq(1, 0), Player::First, 9));
        assert!(must_promote(knight, sq(7, 2), Player::Second, 9));
        assert!(must_promote(knight, sq(8, 2), Player::Second, 9));
        assert!(!must_promote(knight, sq(6, 2), Player::Second, 9));

        // ゾーンが無効でも最奥段の歩は成る
        let zones = PromotionZones {
            shogi: PromotionZone::disabled(),
            chess: PromotionZone::disabled(),
        };
        let resolved =
            resolve_promotion(pawn, sq(1, 0), sq(0, 0), Promotion::NoPromotion, &zones, 9);
        assert_eq!(resolved, Ok(Promotion::InPlace));
    }

    #[test]
    fn test_chess_pawn_requires_choice() {
        let zones = PromotionZones::default_for(Player::First);
        let pawn = Piece::new(PieceKind::ChessPawn, Player::First);
        assert!(can_promote_chess(pawn, sq(0, 3), &zones, 8));
        assert!(!can_promote_chess(pawn, sq(1, 3), &zones, 8));

        let missing =
            resolve_promotion(pawn, sq(1, 3), sq(0, 3), Promotion::NoPromotion, &zones, 8);
        assert_eq!(missing, Err(MoveError::PromotionChoiceRequired { to: sq(0, 3) }));
        let in_place = resolve_promotion(pawn, sq(1, 3), sq(0, 3), Promotion::InPlace, &zones, 8);
        assert_eq!(in_place, Err(MoveError::PromotionChoiceRequired { to: sq(0, 3) }));
        let to_king = Promotion::To(PieceKind::ChessKing);
        let king = resolve_promotion(pawn, sq(1, 3), sq(0, 3), to_king, &zones, 8);
        assert!(king.is_err());

        let knight = Promotion::To(PieceKind::ChessKnight);
        assert_eq!(resolve_promotion(pawn, sq(1, 3), sq(0, 3), knight, &zones, 8), Ok(knight));
    }

    #[test]
    fn test_promotion_not_allowed_outside_zone() {
        let zones = PromotionZones::default_for(Player::Second);
        let rook = Piece::new(PieceKind::Rook, Player::Second);
        let err = resolve_promotion(rook, sq(1, 1), sq(4, 1), Promotion::InPlace, &zones, 9);
        assert_eq!(err, Err(MoveError::PromotionNotAllowed { to: sq(4, 1) }));
        let err = resolve_promotion(
            rook,
            sq(1, 1),
            sq(7, 1),
            Promotion::To(PieceKind::ChessQueen),
            &zones,
            9,
        );
        assert_eq!(err, Err(MoveError::PromotionNotAllowed { to: sq(7, 1) }));
        assert_eq!(
            resolve_promotion(rook, sq(1, 1), sq(7, 1), Promotion::InPlace, &zones, 9),
            Ok(Promotion::InPlace)
        );
    }

    #[test]
    fn test_promotion_choices_by_policy() {
        let zones = PromotionZones::default_for(Player::First);
        let bishop = Piece::new(PieceKind::Bishop, Player::First);
        let auto = promotion_choices(bishop, sq(4, 4), sq(2, 2), &zones, 9, PromotionPolicy::Auto);
        assert_eq!(auto.as_slice(), &[Promotion::InPlace]);
        let all =
            promotion_choices(bishop, sq(4, 4), sq(2, 2), &zones, 9, PromotionPolicy::AllChoices);
        assert_eq!(all.as_slice(), &[Promotion::InPlace, Promotion::NoPromotion]);

        let pawn = Piece::new(PieceKind::ChessPawn, Player::First);
        let all =
            promotion_choices(pawn, sq(1, 0), sq(0, 0), &zones, 8, PromotionPolicy::AllChoices);
        assert_eq!(all.len(), 4);
        let auto = promotion_choices(pawn, sq(1, 0), sq(0, 0), &zones, 8, PromotionPolicy::Auto);
        assert_eq!(auto.as_slice(), &[Promotion::To(PieceKind::ChessQueen)]);
    }

    #[test]
    fn test_zone_json_uses_camel_case() {
        let zone: PromotionZone = serde_json::from_str(r#"{"rows":2,"fromTop":false}"#).unwrap();
        assert_eq!(
            zone,
            PromotionZone {
                rows: 2,
                from_top: false
            }
        );
    }
}
