//! 探索設定（強さレベル 1〜6）

use log::warn;
use serde::{Deserialize, Serialize};

/// 探索の設定
///
/// 基本的には `AiConfig::from_level` で生成し、必要な項目だけ上書きする。
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AiConfig {
    /// 強さレベル（1〜6）
    pub level: u8,
    /// 探索深さ（ルートの1手を含む手数）
    pub max_depth: u8,
    /// 駒の位置評価を使う
    pub use_pst: bool,
    /// 局面ごとの最善手を手順の並べ替えに使う
    pub use_ordering_cache: bool,
    /// キラー手を手順の並べ替えに使う
    pub use_killers: bool,
    /// 探索せずにランダムな合法手を返す確率
    pub random_move_rate: f64,
    /// `SearchSession` で結果を待つ上限
    pub timeout_ms: u64,
    /// 持ち駒を打つ手を探索に含める
    pub use_drops: bool,
    /// ランダム手選択の乱数シード（None なら毎回変わる）
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
}

impl AiConfig {
    /// 最小レベル
    pub const MIN_LEVEL: u8 = 1;
    /// 最大レベル
    pub const MAX_LEVEL: u8 = 6;
    /// 範囲外のレベルが指定されたときに使うレベル
    pub const DEFAULT_LEVEL: u8 = 3;
    /// 最弱レベルのランダム手の確率
    pub const WEAKEST_RANDOM_RATE: f64 = 0.3;

    /// レベルから設定を生成する（範囲外はレベル3）
    ///
    /// | level | depth | PST | 並べ替えキャッシュ | キラー | timeout |
    /// |---|---|---|---|---|---|
    /// | 1 | 3 | - | - | - | 5s |
    /// | 2 | 3 | o | - | - | 5s |
    /// | 3 | 4 | o | o | - | 10s |
    /// | 4 | 4 | o | o | o | 15s |
    /// | 5 | 5 | o | o | o | 20s |
    /// | 6 | 6 | o | o | o | 25s |
    pub fn from_level(level: u8) -> AiConfig {
        let (max_depth, use_pst, use_ordering_cache, use_killers, timeout_ms) = match level {
            1 => (3, false, false, false, 5_000),
            2 => (3, true, false, false, 5_000),
            3 => (4, true, true, false, 10_000),
            4 => (4, true, true, true, 15_000),
            5 => (5, true, true, true, 20_000),
            6 => (6, true, true, true, 25_000),
            _ => {
                let fallback = Self::DEFAULT_LEVEL;
                warn!("[Search] level {level} is out of range, using level {fallback}");
                return AiConfig::from_level(Self::DEFAULT_LEVEL);
            }
        };
        AiConfig {
            level,
            max_depth,
            use_pst,
            use_ordering_cache,
            use_killers,
            random_move_rate: if level == 1 { Self::WEAKEST_RANDOM_RATE } else { 0.0 },
            timeout_ms,
            use_drops: false,
            seed: None,
        }
    }

    /// 乱数シードを固定する
    pub fn with_seed(mut self, seed: u64) -> AiConfig {
        self.seed = Some(seed);
        self
    }

    /// 探索深さを上書きする（1〜8に丸める）
    pub fn with_depth(mut self, depth: u8) -> AiConfig {
        self.max_depth = depth.clamp(1, 8);
        self
    }
}

impl Default for AiConfig {
    fn default() -> Self {
        AiConfig::from_level(Self::DEFAULT_LEVEL)
    }
}

/// 従来の3段階の難易度
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    /// 対応する強さレベル（easy=2, medium=3, hard=4）
    #[inline]
    pub const fn level(self) -> u8 {
        match self {
            Difficulty::Easy => 2,
            Difficulty::Medium => 3,
            Difficulty::Hard => 4,
        }
    }

    /// 探索深さ（easy=2, medium=3, hard=4）
    #[inline]
    pub const fn depth(self) -> u8 {
        match self {
            Difficulty::Easy => 2,
            Difficulty::Medium => 3,
            Difficulty::Hard => 4,
        }
    }

    /// レベルの設定を土台に、探索深さだけ難易度の値で上書きする
    pub fn config(self) -> AiConfig {
        AiConfig::from_level(self.level()).with_depth(self.depth())
    }
}

impl std::str::FromStr for Difficulty {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "easy" => Ok(Difficulty::Easy),
            "medium" => Ok(Difficulty::Medium),
            "hard" => Ok(Difficulty::Hard),
            other => Err(format!("unknown difficulty: {other}")),
        }
    }
}
