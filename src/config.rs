// ---------------------------------------------------------------------------
// Game configuration
// ---------------------------------------------------------------------------

/// Narration column used when no width is given.
pub const DEFAULT_WRAP: usize = 70;

/// Narrower than this and most option labels no longer fit on one line.
pub const MIN_WRAP: usize = 20;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameConfig {
    /// Seed for the random oracle. `None` draws from OS entropy.
    pub seed: Option<u64>,
    /// Column at which narration is word-wrapped.
    pub wrap_width: usize,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            seed: None,
            wrap_width: DEFAULT_WRAP,
        }
    }
}

impl GameConfig {
    /// Build a config from positional arguments (`[seed] [width]`), program
    /// name excluded. Values that do not parse fall back to the defaults.
    pub fn from_args(args: &[String]) -> Self {
        let defaults = Self::default();
        Self {
            seed: args.first().and_then(|s| s.parse().ok()),
            wrap_width: args
                .get(1)
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.wrap_width)
                .max(MIN_WRAP),
        }
    }
}
