//! Config module - level parameters consumed by the board
//!
//! Levels arrive as plain numeric configuration (JSON file or environment).
//! Loading is permissive: out-of-range values are clamped and misordered icon
//! thresholds are nudged upward, each correction logged at `warn`. Tooling
//! that prefers to reject bad input can call [`LevelConfig::validate`].
//!
//! # Environment Variables
//!
//! - `BLAST_ROWS`, `BLAST_COLUMNS`: board dimensions (2..=10)
//! - `BLAST_COLORS`: number of colors (1..=6)
//! - `BLAST_THRESHOLD_A`, `BLAST_THRESHOLD_B`, `BLAST_THRESHOLD_C`: icon tiers (2..=20)
//! - `BLAST_AUTO_SHUFFLE`: `1`/`true` to shuffle automatically on deadlock

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::types::{
    IconVariant, MAX_COLORS, MAX_DIMENSION, MAX_THRESHOLD, MIN_DIMENSION, MIN_GROUP_SIZE,
    MIN_THRESHOLD,
};

/// Errors from loading or strictly validating a level config
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read level config: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse level config: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("{field} = {value} is outside {min}..={max}")]
    OutOfRange {
        field: &'static str,
        value: u32,
        min: u32,
        max: u32,
    },
    #[error("icon thresholds must satisfy A < B < C (got {a}, {b}, {c})")]
    ThresholdOrder { a: u8, b: u8, c: u8 },
    #[error("min_group_size must be 2 (got {0})")]
    MinGroupSize(usize),
}

/// Group-size tiers for icon variants, `a < b < c`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Thresholds {
    pub a: u8,
    pub b: u8,
    pub c: u8,
}

impl Thresholds {
    /// Build thresholds, correcting range and ordering like a config load.
    pub fn new(a: u8, b: u8, c: u8) -> Self {
        Self { a, b, c }.sanitized()
    }

    /// Clamp into 2..=20 and enforce `a < b < c` by nudging `b = a + 1`,
    /// `c = b + 1`. `a` and `b` are capped so the nudged values still fit.
    pub fn sanitized(self) -> Self {
        let a = self.a.clamp(MIN_THRESHOLD, MAX_THRESHOLD - 2);
        let mut b = self.b.clamp(MIN_THRESHOLD, MAX_THRESHOLD - 1);
        if b <= a {
            b = a + 1;
        }
        let mut c = self.c.clamp(MIN_THRESHOLD, MAX_THRESHOLD);
        if c <= b {
            c = b + 1;
        }

        let fixed = Self { a, b, c };
        if fixed != self {
            warn!(
                a = self.a,
                b = self.b,
                c = self.c,
                fixed_a = fixed.a,
                fixed_b = fixed.b,
                fixed_c = fixed.c,
                "icon thresholds corrected"
            );
        }
        fixed
    }

    /// Variant for a group of `size` blocks. A group must exceed a threshold
    /// to reach its tier; groups below the blastable size are always Default.
    ///
    /// # Examples
    ///
    /// ```
    /// use tile_blast_core::config::Thresholds;
    /// use tile_blast_core::types::IconVariant;
    ///
    /// let t = Thresholds::new(4, 7, 9);
    /// assert_eq!(t.classify(2), IconVariant::Default);
    /// assert_eq!(t.classify(5), IconVariant::A);
    /// assert_eq!(t.classify(9), IconVariant::B);
    /// assert_eq!(t.classify(10), IconVariant::C);
    /// ```
    pub fn classify(&self, size: usize) -> IconVariant {
        if size < MIN_GROUP_SIZE {
            IconVariant::Default
        } else if size > self.c as usize {
            IconVariant::C
        } else if size > self.b as usize {
            IconVariant::B
        } else if size > self.a as usize {
            IconVariant::A
        } else {
            IconVariant::Default
        }
    }
}

impl Default for Thresholds {
    fn default() -> Self {
        Self { a: 4, b: 7, c: 9 }
    }
}

/// Numeric parameters of one level
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LevelConfig {
    pub rows: u8,
    pub columns: u8,
    pub color_count: u8,
    pub thresholds: Thresholds,
    pub min_group_size: usize,
    pub auto_shuffle_on_deadlock: bool,
}

impl Default for LevelConfig {
    fn default() -> Self {
        Self {
            rows: 8,
            columns: 8,
            color_count: 4,
            thresholds: Thresholds::default(),
            min_group_size: MIN_GROUP_SIZE,
            auto_shuffle_on_deadlock: true,
        }
    }
}

impl LevelConfig {
    pub fn new(rows: u8, columns: u8, color_count: u8) -> Self {
        Self {
            rows,
            columns,
            color_count,
            ..Self::default()
        }
        .sanitized()
    }

    /// Parse JSON and return the sanitized config
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let raw: LevelConfig = serde_json::from_str(json)?;
        Ok(raw.sanitized())
    }

    /// Read a JSON config file and return the sanitized config
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    /// Defaults overlaid with `BLAST_*` environment variables.
    /// Unparseable values are ignored.
    pub fn from_env() -> Self {
        use std::env;

        fn parse<T: std::str::FromStr>(key: &str) -> Option<T> {
            env::var(key).ok().and_then(|s| s.trim().parse().ok())
        }

        let mut config = Self::default();
        if let Some(v) = parse("BLAST_ROWS") {
            config.rows = v;
        }
        if let Some(v) = parse("BLAST_COLUMNS") {
            config.columns = v;
        }
        if let Some(v) = parse("BLAST_COLORS") {
            config.color_count = v;
        }
        if let Some(v) = parse("BLAST_THRESHOLD_A") {
            config.thresholds.a = v;
        }
        if let Some(v) = parse("BLAST_THRESHOLD_B") {
            config.thresholds.b = v;
        }
        if let Some(v) = parse("BLAST_THRESHOLD_C") {
            config.thresholds.c = v;
        }
        if let Ok(v) = env::var("BLAST_AUTO_SHUFFLE") {
            config.auto_shuffle_on_deadlock = v == "1" || v.to_lowercase() == "true";
        }
        config.sanitized()
    }

    /// Clamp every field into range and fix threshold ordering
    pub fn sanitized(self) -> Self {
        let rows = clamp_logged("rows", self.rows, MIN_DIMENSION, MAX_DIMENSION);
        let columns = clamp_logged("columns", self.columns, MIN_DIMENSION, MAX_DIMENSION);
        let color_count = clamp_logged("color_count", self.color_count, 1, MAX_COLORS);
        if self.min_group_size != MIN_GROUP_SIZE {
            warn!(
                value = self.min_group_size,
                fixed = MIN_GROUP_SIZE,
                "min_group_size is fixed"
            );
        }
        Self {
            rows,
            columns,
            color_count,
            thresholds: self.thresholds.sanitized(),
            min_group_size: MIN_GROUP_SIZE,
            auto_shuffle_on_deadlock: self.auto_shuffle_on_deadlock,
        }
    }

    /// Strict check: first problem found, without correcting anything
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_range("rows", self.rows, MIN_DIMENSION, MAX_DIMENSION)?;
        check_range("columns", self.columns, MIN_DIMENSION, MAX_DIMENSION)?;
        check_range("color_count", self.color_count, 1, MAX_COLORS)?;
        let t = self.thresholds;
        check_range("thresholds.a", t.a, MIN_THRESHOLD, MAX_THRESHOLD)?;
        check_range("thresholds.b", t.b, MIN_THRESHOLD, MAX_THRESHOLD)?;
        check_range("thresholds.c", t.c, MIN_THRESHOLD, MAX_THRESHOLD)?;
        if !(t.a < t.b && t.b < t.c) {
            return Err(ConfigError::ThresholdOrder {
                a: t.a,
                b: t.b,
                c: t.c,
            });
        }
        if self.min_group_size != MIN_GROUP_SIZE {
            return Err(ConfigError::MinGroupSize(self.min_group_size));
        }
        Ok(())
    }
}

fn clamp_logged(field: &'static str, value: u8, min: u8, max: u8) -> u8 {
    let fixed = value.clamp(min, max);
    if fixed != value {
        warn!(field, value, fixed, "level parameter clamped");
    }
    fixed
}

fn check_range(field: &'static str, value: u8, min: u8, max: u8) -> Result<(), ConfigError> {
    if (min..=max).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::OutOfRange {
            field,
            value: value as u32,
            min: min as u32,
            max: max as u32,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_threshold_classification_examples() {
        let t = Thresholds::new(4, 7, 9);
        assert_eq!(t.classify(1), IconVariant::Default);
        assert_eq!(t.classify(2), IconVariant::Default);
        assert_eq!(t.classify(4), IconVariant::Default);
        assert_eq!(t.classify(5), IconVariant::A);
        assert_eq!(t.classify(7), IconVariant::A);
        assert_eq!(t.classify(8), IconVariant::B);
        assert_eq!(t.classify(9), IconVariant::B);
        assert_eq!(t.classify(10), IconVariant::C);
        assert_eq!(t.classify(100), IconVariant::C);
    }

    #[test]
    fn test_threshold_nudging() {
        assert_eq!(Thresholds::new(5, 5, 5), Thresholds { a: 5, b: 6, c: 7 });
        assert_eq!(Thresholds::new(5, 3, 9), Thresholds { a: 5, b: 6, c: 9 });
        assert_eq!(Thresholds::new(4, 8, 6), Thresholds { a: 4, b: 8, c: 9 });
        assert_eq!(Thresholds::new(4, 7, 9), Thresholds { a: 4, b: 7, c: 9 });
    }

    #[test]
    fn test_threshold_nudging_near_ceiling() {
        assert_eq!(
            Thresholds::new(20, 20, 20),
            Thresholds { a: 18, b: 19, c: 20 }
        );
        assert_eq!(Thresholds::new(0, 0, 0), Thresholds { a: 2, b: 3, c: 4 });
    }

    #[test]
    fn test_sanitize_clamps_dimensions() {
        let c = LevelConfig::new(1, 40, 9);
        assert_eq!(c.rows, MIN_DIMENSION);
        assert_eq!(c.columns, MAX_DIMENSION);
        assert_eq!(c.color_count, MAX_COLORS);
        assert!(c.validate().is_ok());
    }

    #[test]
    fn test_validate_reports_problems() {
        let mut c = LevelConfig::default();
        assert!(c.validate().is_ok());

        c.thresholds = Thresholds { a: 7, b: 7, c: 9 };
        assert!(matches!(
            c.validate(),
            Err(ConfigError::ThresholdOrder { a: 7, b: 7, c: 9 })
        ));

        c.thresholds = Thresholds::default();
        c.rows = 11;
        assert!(matches!(
            c.validate(),
            Err(ConfigError::OutOfRange { field: "rows", .. })
        ));

        c.rows = 5;
        c.min_group_size = 3;
        assert!(matches!(c.validate(), Err(ConfigError::MinGroupSize(3))));
    }

    #[test]
    fn test_json_defaults_and_sanitize() {
        let c = LevelConfig::from_json_str(
            r#"{"rows": 5, "columns": 6, "thresholds": {"a": 6, "b": 6, "c": 6}}"#,
        )
        .unwrap();
        assert_eq!(c.rows, 5);
        assert_eq!(c.columns, 6);
        assert_eq!(c.color_count, 4);
        assert_eq!(c.thresholds, Thresholds { a: 6, b: 7, c: 8 });
        assert!(c.auto_shuffle_on_deadlock);
    }

    #[test]
    fn test_json_parse_error() {
        assert!(matches!(
            LevelConfig::from_json_str("{not json"),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        assert!(matches!(
            LevelConfig::load("/definitely/not/here.json"),
            Err(ConfigError::Io(_))
        ));
    }
}
