use crate::error::{ImageGenError, Result};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::atomic::{AtomicU64, Ordering};
use uuid::Uuid;

// Shared by every generator in the process so two orchestrators writing to the
// same directory still never hand out the same timestamp.
static LAST_TIMESTAMP_NS: AtomicU64 = AtomicU64::new(0);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IdStrategy {
    #[default]
    Uuid,
    Timestamp,
}

impl IdStrategy {
    pub fn next_id(&self) -> String {
        match self {
            IdStrategy::Uuid => Uuid::new_v4().to_string(),
            IdStrategy::Timestamp => next_timestamp_ns().to_string(),
        }
    }
}

impl fmt::Display for IdStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IdStrategy::Uuid => f.write_str("uuid"),
            IdStrategy::Timestamp => f.write_str("timestamp"),
        }
    }
}

impl FromStr for IdStrategy {
    type Err = ImageGenError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "uuid" => Ok(IdStrategy::Uuid),
            "timestamp" | "time" => Ok(IdStrategy::Timestamp),
            other => Err(ImageGenError::ConfigError(format!(
                "Unknown id strategy '{}', expected uuid or timestamp",
                other
            ))),
        }
    }
}

/// Wall-clock nanoseconds, bumped past the last value handed out so the
/// sequence is strictly increasing even when the clock stalls or steps back.
fn next_timestamp_ns() -> u64 {
    let now = Utc::now()
        .timestamp_nanos_opt()
        .map(|ns| ns.max(0) as u64)
        .unwrap_or(0);

    let mut last = LAST_TIMESTAMP_NS.load(Ordering::Relaxed);
    loop {
        let candidate = now.max(last + 1);
        match LAST_TIMESTAMP_NS.compare_exchange_weak(
            last,
            candidate,
            Ordering::SeqCst,
            Ordering::Relaxed,
        ) {
            Ok(_) => return candidate,
            Err(actual) => last = actual,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_timestamp_ids_strictly_increase() {
        let ids: Vec<u64> = (0..1000)
            .map(|_| IdStrategy::Timestamp.next_id().parse().unwrap())
            .collect();
        assert!(ids.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_ids_unique_across_threads() {
        let handles: Vec<_> = (0..4)
            .map(|_| {
                std::thread::spawn(|| {
                    (0..250)
                        .map(|_| IdStrategy::Timestamp.next_id())
                        .collect::<Vec<_>>()
                })
            })
            .collect();

        let mut seen = HashSet::new();
        for handle in handles {
            for id in handle.join().unwrap() {
                assert!(seen.insert(id), "duplicate timestamp id");
            }
        }
        assert_eq!(seen.len(), 1000);
    }

    #[test]
    fn test_strategy_parsing() {
        assert_eq!("UUID".parse::<IdStrategy>().unwrap(), IdStrategy::Uuid);
        assert_eq!("timestamp".parse::<IdStrategy>().unwrap(), IdStrategy::Timestamp);
        assert!("ulid".parse::<IdStrategy>().is_err());
        assert_eq!(IdStrategy::Uuid.next_id().len(), 36);
    }
}
