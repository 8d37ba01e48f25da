//! 手番（Player）

use serde::{Deserialize, Serialize};

/// 対局者（プレイヤー1/プレイヤー2）
///
/// プレイヤー1は最終行側（下側）に陣取り、行番号が減る方向へ進む。
/// プレイヤー2は0行側（上側）に陣取り、行番号が増える方向へ進む。
/// JSON上は従来形式に合わせて `1` / `2` の数値で表す。
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
#[repr(u8)]
pub enum Player {
    First = 0,
    Second = 1,
}

impl Player {
    /// プレイヤーの数
    pub const NUM: usize = 2;

    /// 全てのプレイヤー
    pub const ALL: [Player; 2] = [Player::First, Player::Second];

    /// 相手を返す
    #[inline]
    pub const fn opponent(self) -> Player {
        match self {
            Player::First => Player::Second,
            Player::Second => Player::First,
        }
    }

    /// インデックスとして使用（配列アクセス用）
    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// 前進方向の行差分
    #[inline]
    pub const fn forward(self) -> i32 {
        match self {
            Player::First => -1,
            Player::Second => 1,
        }
    }

    /// 相手側の最終行（このプレイヤーにとっての最奥段）
    #[inline]
    pub const fn farthest_row(self, board_size: usize) -> usize {
        match self {
            Player::First => 0,
            Player::Second => board_size - 1,
        }
    }

    /// 最奥段から数えた距離（0 = 最奥段）
    #[inline]
    pub const fn rows_from_far_edge(self, row: usize, board_size: usize) -> usize {
        match self {
            Player::First => row,
            Player::Second => board_size - 1 - row,
        }
    }

    /// 従来形式の番号（1 または 2）
    #[inline]
    pub const fn number(self) -> u8 {
        self as u8 + 1
    }
}

impl std::ops::Not for Player {
    type Output = Player;

    #[inline]
    fn not(self) -> Player {
        self.opponent()
    }
}

impl From<Player> for u8 {
    fn from(player: Player) -> u8 {
        player.number()
    }
}

impl TryFrom<u8> for Player {
    type Error = String;

    fn try_from(n: u8) -> Result<Self, Self::Error> {
        match n {
            1 => Ok(Player::First),
            2 => Ok(Player::Second),
            _ => Err(format!("player must be 1 or 2, got {n}")),
        }
    }
}

impl std::fmt::Display for Player {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "player{}", self.number())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_player_opponent() {
        assert_eq!(Player::First.opponent(), Player::Second);
        assert_eq!(!Player::Second, Player::First);
    }

    #[test]
    fn test_player_far_edge() {
        assert_eq!(Player::First.farthest_row(9), 0);
        assert_eq!(Player::Second.farthest_row(9), 8);
        assert_eq!(Player::Second.farthest_row(8), 7);

        assert_eq!(Player::First.rows_from_far_edge(2, 9), 2);
        assert_eq!(Player::Second.rows_from_far_edge(6, 9), 2);
    }

    #[test]
    fn test_player_json_number() {
        assert_eq!(serde_json::to_string(&Player::Second).unwrap(), "2");
        let p: Player = serde_json::from_str("1").unwrap();
        assert_eq!(p, Player::First);
        assert!(serde_json::from_str::<Player>("3").is_err());
    }
}
