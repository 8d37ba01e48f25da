//! ルール（成り・持ち駒・王手判定・合法手）と対局ごとの設定

pub mod check;
pub mod hand;
pub mod legal;
pub mod promotion;

use serde::{Deserialize, Serialize};

use crate::board::layout::Preset;
use crate::types::Player;

pub use check::{is_checkmate, is_in_check, is_stalemate};
pub use hand::{is_double_pawn_column, legal_drop_squares, Hand};
pub use legal::{all_legal_moves, has_legal_move, legal_drops, legal_moves};
pub use promotion::{
    PromotionPolicy, PromotionZone, PromotionZones, can_promote_chess, may_promote, must_promote,
    resolve_promotion,
};

/// ステイルメイトの扱い
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StalemateOutcome {
    /// 引き分け
    #[default]
    Draw,
    /// 指す手がない側の負け
    StalematedPlayerLoses,
}

/// プレイヤーごとの設定
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerRules {
    /// 取った将棋駒を持ち駒として使うか
    pub use_hand_pieces: bool,
    pub promotion_zones: PromotionZones,
}

impl PlayerRules {
    pub const fn default_for(player: Player) -> PlayerRules {
        PlayerRules {
            use_hand_pieces: true,
            promotion_zones: PromotionZones::default_for(player),
        }
    }
}

/// 対局ルール
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RuleSet {
    pub player1: PlayerRules,
    pub player2: PlayerRules,
    #[serde(default)]
    pub stalemate: StalemateOutcome,
}

impl Default for RuleSet {
    fn default() -> Self {
        RuleSet {
            player1: PlayerRules::default_for(Player::First),
            player2: PlayerRules::default_for(Player::Second),
            stalemate: StalemateOutcome::default(),
        }
    }
}

impl RuleSet {
    /// プリセット盤面の既定ルール（チェス盤は持ち駒なし）
    pub fn for_preset(preset: Preset) -> RuleSet {
        let mut rules = RuleSet::default();
        if preset == Preset::Chess {
            rules.player1.use_hand_pieces = false;
            rules.player2.use_hand_pieces = false;
        }
        rules
    }

    #[inline]
    pub const fn player(&self, player: Player) -> &PlayerRules {
        match player {
            Player::First => &self.player1,
            Player::Second => &self.player2,
        }
    }

    #[inline]
    pub const fn zones(&self, player: Player) -> &PromotionZones {
        &self.player(player).promotion_zones
    }

    #[inline]
    pub const fn uses_hand(&self, player: Player) -> bool {
        self.player(player).use_hand_pieces
    }
}
