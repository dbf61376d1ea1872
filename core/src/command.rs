use serde::{Deserialize, Serialize};

/// All player-issued commands.
/// Variants added over time; never removed or reordered.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "cmd", rename_all = "snake_case")]
pub enum PlayerCommand {
    // ── Clock control ─────────────────────────────
    Pause,
    Resume,

    // ── Colony actions ────────────────────────────
    Explore,
    UpgradeHyphae,
    UpgradeBestNode,

    // ── Session ───────────────────────────────────
    Reset,
}

impl PlayerCommand {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Pause           => "pause",
            Self::Resume          => "resume",
            Self::Explore         => "explore",
            Self::UpgradeHyphae   => "upgrade_hyphae",
            Self::UpgradeBestNode => "upgrade_best_node",
            Self::Reset           => "reset",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        [
            Self::Pause,
            Self::Resume,
            Self::Explore,
            Self::UpgradeHyphae,
            Self::UpgradeBestNode,
            Self::Reset,
        ]
        .into_iter()
        .find(|cmd| cmd.name() == name)
    }
}

/// Outcome of a player action, surfaced to the player as feedback.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ActionResult {
    pub ok:      bool,
    pub message: String,
}

impl ActionResult {
    pub fn success(message: impl Into<String>) -> Self {
        Self { ok: true, message: message.into() }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self { ok: false, message: message.into() }
    }
}
