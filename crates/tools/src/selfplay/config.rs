//! 自己対局の設定（TOML）
//!
//! ```toml
//! games = 4
//! max_plies = 200
//! preset = "shogi"
//! random_opening_plies = 2
//! seed = 42
//!
//! [player1]
//! level = 3
//!
//! [player2]
//! level = 2
//! use_drops = true
//! ```

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use hybrid_shogi_core::board::layout::Preset;
use hybrid_shogi_core::game::GameState;
use hybrid_shogi_core::search::AiConfig;
use hybrid_shogi_core::setup::BoardSetup;
use hybrid_shogi_core::types::Player;
use serde::{Deserialize, Serialize};

/// 片側の AI 設定（省略した項目はレベルの既定値）
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SideConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub level: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub depth: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub use_drops: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_ms: Option<u64>,
}

impl SideConfig {
    /// 探索設定を組み立てる
    ///
    /// `seed` はランダム手（レベル1）の再現用。
    pub fn ai_config(&self, seed: Option<u64>) -> AiConfig {
        let mut config = AiConfig::from_level(self.level.unwrap_or(AiConfig::DEFAULT_LEVEL));
        if let Some(depth) = self.depth {
            config = config.with_depth(depth);
        }
        if let Some(use_drops) = self.use_drops {
            config.use_drops = use_drops;
        }
        if let Some(timeout_ms) = self.timeout_ms {
            config.timeout_ms = timeout_ms;
        }
        config.seed = seed;
        config
    }
}

/// 対局条件
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchConfig {
    /// 対局数
    pub games: u32,
    /// この手数で引き分け
    pub max_plies: u32,
    /// 開始局面のプリセット（`setup` が優先）
    pub preset: Preset,
    /// 盤面設定ドキュメント（JSON）のパス
    #[serde(skip_serializing_if = "Option::is_none")]
    pub setup: Option<PathBuf>,
    /// 開始直後にランダムに指す手数（対局ごとに局面を散らす）
    pub random_opening_plies: u32,
    /// 乱数シード（None なら毎回変わる）
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
    pub player1: SideConfig,
    pub player2: SideConfig,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            games: 1,
            max_plies: 256,
            preset: Preset::Shogi,
            setup: None,
            random_opening_plies: 0,
            seed: None,
            player1: SideConfig::default(),
            player2: SideConfig::default(),
        }
    }
}

impl MatchConfig {
    pub fn from_toml_str(text: &str) -> Result<MatchConfig> {
        let config: MatchConfig = toml::from_str(text).context("failed to parse match config")?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<MatchConfig> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        MatchConfig::from_toml_str(&text)
            .with_context(|| format!("invalid match config {}", path.display()))
    }

    pub fn validate(&self) -> Result<()> {
        if self.games == 0 {
            bail!("games must be >= 1");
        }
        if self.max_plies == 0 {
            bail!("max_plies must be >= 1");
        }
        Ok(())
    }

    pub fn side(&self, player: Player) -> &SideConfig {
        match player {
            Player::First => &self.player1,
            Player::Second => &self.player2,
        }
    }

    /// 開始局面を作る
    pub fn initial_state(&self) -> Result<GameState> {
        let Some(path) = &self.setup else {
            return Ok(GameState::from_preset(self.preset));
        };
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        let setup = BoardSetup::from_json(&json)
            .with_context(|| format!("invalid board setup {}", path.display()))?;
        GameState::from_setup(&setup)
            .with_context(|| format!("invalid board in {}", path.display()))
    }
}
