//! Fill-level classification into triage buckets.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Lowest fill level classified as [`Severity::Critical`].
pub const CRITICAL_THRESHOLD: u8 = 80;
/// Lowest fill level classified as [`Severity::High`].
pub const HIGH_THRESHOLD: u8 = 60;
/// Lowest fill level classified as [`Severity::Medium`].
pub const MEDIUM_THRESHOLD: u8 = 40;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
/// Discrete triage bucket derived from a fill level, ordered from least to most severe.
pub enum Severity {
    /// Below 40 %.
    Low,
    /// 40 % up to 59 %.
    Medium,
    /// 60 % up to 79 %.
    High,
    /// 80 % and above.
    Critical,
}

impl Severity {
    /// All severities in ascending order.
    pub const ALL: [Severity; 4] = [
        Severity::Low,
        Severity::Medium,
        Severity::High,
        Severity::Critical,
    ];

    /// Human-readable label.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Severity::Low => "Low",
            Severity::Medium => "Medium",
            Severity::High => "High",
            Severity::Critical => "Critical",
        }
    }

    /// Display color as an RGB triple (`#4CAF50`, `#FF9800`, `#F44336`, `#D32F2F`).
    #[must_use]
    pub fn rgb(self) -> (u8, u8, u8) {
        match self {
            Severity::Low => (0x4C, 0xAF, 0x50),
            Severity::Medium => (0xFF, 0x98, 0x00),
            Severity::High => (0xF4, 0x43, 0x36),
            Severity::Critical => (0xD3, 0x2F, 0x2F),
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.label())
    }
}

/// Clamp an untrusted fill level into `[0, 100]`.
#[must_use]
pub fn clamp_fill_level(fill_level: i32) -> u8 {
    u8::try_from(fill_level.clamp(0, 100)).unwrap_or(100)
}

/// Classify a fill level. Values outside `[0, 100]` are clamped first.
#[must_use]
pub fn classify(fill_level: i32) -> Severity {
    match clamp_fill_level(fill_level) {
        level if level >= CRITICAL_THRESHOLD => Severity::Critical,
        level if level >= HIGH_THRESHOLD => Severity::High,
        level if level >= MEDIUM_THRESHOLD => Severity::Medium,
        _ => Severity::Low,
    }
}
