//! 盤面設定ドキュメント
//!
//! 盤面エディタが保存する JSON と互換の形式。
//!
//! ```json
//! {
//!   "name": "My Board",
//!   "board": ["cr cn cb cq ck cb cn cr", "..."],
//!   "player1": { "useHandPieces": false },
//!   "player2": { "useHandPieces": false },
//!   "promotionZones": {
//!     "player1": { "rows": 3, "fromTop": true },
//!     "player2": { "shogi": { "rows": 3, "fromTop": false }, "chess": { "rows": 1, "fromTop": false } }
//!   }
//! }
//! ```
//!
//! `promotionZones` は省略可能。プレイヤーごとのゾーン指定は単一の `{rows, fromTop}`
//! （将棋駒に適用し、チェス駒は既定値）か、系統別の `{shogi, chess}` のどちらでもよい。

use serde::{Deserialize, Serialize};

use crate::board::Board;
use crate::board::layout::{format_layout, parse_layout, Preset};
use crate::error::{LayoutError, LayoutResult};
use crate::rules::{PlayerRules, PromotionZone, PromotionZones, RuleSet};
use crate::types::Player;

/// プレイヤーごとの設定
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerConfig {
    pub use_hand_pieces: bool,
}

/// プレイヤー1人分のゾーン指定
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ZoneSpec {
    /// 系統別
    PerFamily {
        shogi: PromotionZone,
        chess: PromotionZone,
    },
    /// 従来形式（将棋駒のみ）
    Legacy(PromotionZone),
}

impl ZoneSpec {
    fn resolve(self, player: Player) -> PromotionZones {
        match self {
            ZoneSpec::PerFamily { shogi, chess } => PromotionZones { shogi, chess },
            ZoneSpec::Legacy(shogi) => PromotionZones {
                shogi,
                ..PromotionZones::default_for(player)
            },
        }
    }
}

/// 両プレイヤーのゾーン指定
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ZoneDocument {
    pub player1: ZoneSpec,
    pub player2: ZoneSpec,
}

/// 盤面設定
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoardSetup {
    pub name: String,
    pub board: Vec<String>,
    pub player1: PlayerConfig,
    pub player2: PlayerConfig,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub promotion_zones: Option<ZoneDocument>,
}

impl BoardSetup {
    /// JSON 文字列から読み込む
    pub fn from_json(json: &str) -> LayoutResult<BoardSetup> {
        serde_json::from_str(json).map_err(|e| LayoutError::Document(e.to_string()))
    }

    /// JSON 文字列に書き出す
    pub fn to_json(&self) -> LayoutResult<String> {
        serde_json::to_string_pretty(self).map_err(|e| LayoutError::Document(e.to_string()))
    }

    /// プリセットの設定
    pub fn from_preset(preset: Preset) -> BoardSetup {
        let rules = RuleSet::for_preset(preset);
        BoardSetup {
            name: format!("{preset:?}"),
            board: format_layout(&preset.board()),
            player1: PlayerConfig {
                use_hand_pieces: rules.player1.use_hand_pieces,
            },
            player2: PlayerConfig {
                use_hand_pieces: rules.player2.use_hand_pieces,
            },
            promotion_zones: None,
        }
    }

    /// 盤面とルールを組み立てる（盤面が不正なら対局を開始できない）
    pub fn build(&self) -> LayoutResult<(Board, RuleSet)> {
        let board = parse_layout(&self.board)?;
        Ok((board, self.rules()))
    }

    /// ルールのみを組み立てる
    pub fn rules(&self) -> RuleSet {
        let zones = |player: Player| {
            let zone = self.promotion_zones.map(|doc| match player {
                Player::First => doc.player1,
                Player::Second => doc.player2,
            });
            match zone {
                Some(zone) => zone.resolve(player),
                None => PromotionZones::default_for(player),
            }
        };
        RuleSet {
            player1: PlayerRules {
                use_hand_pieces: self.player1.use_hand_pieces,
                promotion_zones: zones(Player::First),
            },
            player2: PlayerRules {
                use_hand_pieces: self.player2.use_hand_pieces,
                promotion_zones: zones(Player::Second),
            },
            stalemate: Default::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{PieceKind, Square};

    const TWO_ROYALS: &str = r#"{
        "name": "mixed",
        "board": ["k . ck", ". . .", "K . CK"],
        "player1": { "useHandPieces": true },
        "player2": { "useHandPieces": false }
    }"#;

    #[test]
    fn test_two_royals_prevent_game_start() {
        // 同じ側に玉とキングがあるので開始できない
        let setup = BoardSetup::from_json(TWO_ROYALS).unwrap();
        assert_eq!(
            setup.build().unwrap_err(),
            LayoutError::DuplicateRoyal {
                player: Player::First,
                count: 2
            }
        );
    }

    #[test]
    fn test_build_default_zones() {
        let json = r#"{
            "name": "mini",
            "board": ["k . .", ". . .", ". P K"],
            "player1": { "useHandPieces": true },
            "player2": { "useHandPieces": false }
        }"#;
        let setup = BoardSetup::from_json(json).unwrap();
        let (board, rules) = setup.build().unwrap();
        assert_eq!(board.get(Square::new(2, 1)).map(|p| p.kind()), Some(PieceKind::Pawn));
        assert!(rules.uses_hand(Player::First));
        assert!(!rules.uses_hand(Player::Second));
        assert_eq!(*rules.zones(Player::Second), PromotionZones::default_for(Player::Second));
    }

    #[test]
    fn test_legacy_and_per_family_zones() {
        let json = r#"{
            "name": "zones",
            "board": [". .", ". ."],
            "player1": { "useHandPieces": true },
            "player2": { "useHandPieces": true },
            "promotionZones": {
                "player1": { "rows": 2, "fromTop": true },
                "player2": {
                    "shogi": { "rows": 1, "fromTop": false },
                    "chess": { "rows": 0, "fromTop": false }
                }
            }
        }"#;
        let rules = BoardSetup::from_json(json).unwrap().rules();
        let p1 = rules.zones(Player::First);
        assert_eq!(p1.shogi, PromotionZone { rows: 2, from_top: true });
        assert_eq!(p1.chess, PromotionZone::far_edge(Player::First, 1));
        let p2 = rules.zones(Player::Second);
        assert_eq!(p2.shogi.rows, 1);
        assert_eq!(p2.chess.rows, 0);
    }

    #[test]
    fn test_malformed_board_is_rejected_at_build() {
        let setup = BoardSetup {
            name: "bad".to_string(),
            board: vec![". .".to_string(), ". . .".to_string()],
            player1: PlayerConfig { use_hand_pieces: false },
            player2: PlayerConfig { use_hand_pieces: false },
            promotion_zones: None,
        };
        assert!(matches!(setup.build(), Err(LayoutError::RowLength { .. })));
        assert!(matches!(BoardSetup::from_json("{"), Err(LayoutError::Document(_))));
    }

    #[test]
    fn test_preset_document() {
        let setup = BoardSetup::from_preset(Preset::Chess);
        assert_eq!(setup.board[0], "cr cn cb cq ck cb cn cr");
        assert!(!setup.player1.use_hand_pieces);
        let json = setup.to_json().unwrap();
        assert!(json.contains("useHandPieces"));
        assert!(!json.contains("promotionZones"));
        assert_eq!(BoardSetup::from_json(&json).unwrap(), setup);
    }
}
