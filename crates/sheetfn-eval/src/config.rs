//! Evaluation settings and the per-call context handed to every function.

use sheetfn_common::DateSystem;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Host-controlled knobs. Cheap to copy; hosts usually build one per
/// workbook and stamp it into each [`EvalContext`].
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EvalConfig {
    /// Which serial-date epoch DATE() produces.
    pub date_system: DateSystem,
    /// Whether text criteria, wildcard or plain, ignore case. Excel always does.
    pub wildcard_case_insensitive: bool,
}

impl Default for EvalConfig {
    fn default() -> Self {
        Self {
            date_system: DateSystem::Excel1900,
            wildcard_case_insensitive: true,
        }
    }
}

/// Where the formula being evaluated lives, plus the active config.
///
/// `row`/`col` are 0-based. They matter to ROW()/COLUMN() without arguments
/// and to implicit intersection of area arguments in scalar positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct EvalContext {
    pub row: u32,
    pub col: u32,
    pub config: EvalConfig,
}

impl EvalContext {
    pub fn new(row: u32, col: u32) -> Self {
        Self {
            row,
            col,
            config: EvalConfig::default(),
        }
    }

    pub fn with_config(mut self, config: EvalConfig) -> Self {
        self.config = config;
        self
    }
}

#[cfg(all(test, feature = "serde"))]
mod tests {
    use super::*;

    #[test]
    fn config_loads_from_partial_json() {
        let cfg: EvalConfig = serde_json::from_str(r#"{"date_system":"Excel1904"}"#).unwrap();
        assert_eq!(cfg.date_system, DateSystem::Excel1904);
        assert!(cfg.wildcard_case_insensitive);

        let back = serde_json::to_string(&cfg).unwrap();
        let again: EvalConfig = serde_json::from_str(&back).unwrap();
        assert_eq!(cfg, again);
    }
}
