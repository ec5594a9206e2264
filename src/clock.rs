//! Timestamp source for broadcast rendering
//!
//! Broadcast lines are prefixed with local time in `YYYY-MM-DD HH:MM:SS`
//! format. The `Clock` trait lets tests substitute a fixed timestamp.

use chrono::Local;

/// strftime format for broadcast timestamps
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Clock trait for dependency injection and testing
pub trait Clock: Send + Sync {
    /// Current time rendered with [`TIMESTAMP_FORMAT`]
    fn timestamp(&self) -> String;
}

/// System clock implementation (uses actual local time)
#[derive(Debug, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn timestamp(&self) -> String {
        Local::now().format(TIMESTAMP_FORMAT).to_string()
    }
}

/// Fixed clock implementation for testing (returns a fixed timestamp)
#[derive(Debug, Clone)]
pub struct FixedClock {
    stamp: String,
}

impl FixedClock {
    /// Create a new fixed clock with the given rendered timestamp
    pub fn new(stamp: impl Into<String>) -> Self {
        Self {
            stamp: stamp.into(),
        }
    }
}

impl Clock for FixedClock {
    fn timestamp(&self) -> String {
        self.stamp.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_system_clock_format_shape() {
        let stamp = SystemClock.timestamp();
        // "2020-08-07 19:50:00" is 19 chars with fixed separator positions
        assert_eq!(stamp.len(), 19);
        assert_eq!(&stamp[4..5], "-");
        assert_eq!(&stamp[7..8], "-");
        assert_eq!(&stamp[10..11], " ");
        assert_eq!(&stamp[13..14], ":");
        assert_eq!(&stamp[16..17], ":");
    }

    #[test]
    fn test_fixed_clock_returns_fixed_stamp() {
        let clock = FixedClock::new("2020-08-07 19:50:00");
        assert_eq!(clock.timestamp(), "2020-08-07 19:50:00");
        assert_eq!(clock.timestamp(), "2020-08-07 19:50:00");
    }
}
