//! Snowflake identifiers for every persisted entity
//!
//! Layout of the 64-bit value:
//! - Bits 63-22: milliseconds since [`Snowflake::EPOCH`]
//! - Bits 21-12: worker id (0-1023)
//! - Bits 11-0:  per-millisecond sequence (0-4095)

use std::fmt;
use std::time::{SystemTime, UNIX_EPOCH};

use parking_lot::Mutex;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

const WORKER_BITS: i64 = 10;
const SEQUENCE_BITS: i64 = 12;
const MAX_WORKER_ID: u16 = (1 << WORKER_BITS) - 1;
const SEQUENCE_MASK: i64 = (1 << SEQUENCE_BITS) - 1;

/// 64-bit entity identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Snowflake(i64);

impl Snowflake {
    /// 2024-01-01 00:00:00 UTC in milliseconds
    pub const EPOCH: i64 = 1_704_067_200_000;

    #[inline]
    pub const fn new(id: i64) -> Self {
        Self(id)
    }

    #[inline]
    pub const fn into_inner(self) -> i64 {
        self.0
    }

    /// Milliseconds since the Unix epoch at which the id was generated
    #[inline]
    pub fn timestamp(&self) -> i64 {
        (self.0 >> (WORKER_BITS + SEQUENCE_BITS)) + Self::EPOCH
    }

    #[inline]
    pub fn worker_id(&self) -> u16 {
        ((self.0 >> SEQUENCE_BITS) & i64::from(MAX_WORKER_ID)) as u16
    }

    pub fn parse(s: &str) -> Result<Self, SnowflakeParseError> {
        s.trim()
            .parse::<i64>()
            .map(Snowflake)
            .map_err(|_| SnowflakeParseError::InvalidFormat)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum SnowflakeParseError {
    #[error("invalid id format")]
    InvalidFormat,
}

impl fmt::Display for Snowflake {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for Snowflake {
    fn from(id: i64) -> Self {
        Self(id)
    }
}

impl From<Snowflake> for i64 {
    fn from(id: Snowflake) -> Self {
        id.0
    }
}

impl std::str::FromStr for Snowflake {
    type Err = SnowflakeParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Snowflake::parse(s)
    }
}

// Ids exceed 2^53, so JSON carries them as strings.
impl Serialize for Snowflake {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for Snowflake {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        use serde::de::{self, Visitor};

        struct IdVisitor;

        impl Visitor<'_> for IdVisitor {
            type Value = Snowflake;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("an id as a string or integer")
            }

            fn visit_i64<E: de::Error>(self, value: i64) -> Result<Snowflake, E> {
                Ok(Snowflake(value))
            }

            fn visit_u64<E: de::Error>(self, value: u64) -> Result<Snowflake, E> {
                i64::try_from(value)
                    .map(Snowflake)
                    .map_err(|_| E::custom("id out of range"))
            }

            fn visit_str<E: de::Error>(self, value: &str) -> Result<Snowflake, E> {
                Snowflake::parse(value).map_err(|_| E::custom("invalid id string"))
            }
        }

        deserializer.deserialize_any(IdVisitor)
    }
}

#[derive(Debug, Default)]
struct GeneratorState {
    last_timestamp: i64,
    sequence: i64,
}

/// Process-local id generator
///
/// Ids from one generator are strictly increasing. Several processes must
/// be configured with distinct worker ids to stay collision free.
#[derive(Debug)]
pub struct SnowflakeGenerator {
    worker_id: u16,
    state: Mutex<GeneratorState>,
}

impl SnowflakeGenerator {
    /// Worker ids above 1023 are masked into range.
    pub fn new(worker_id: u16) -> Self {
        Self {
            worker_id: worker_id & MAX_WORKER_ID,
            state: Mutex::new(GeneratorState::default()),
        }
    }

    pub fn worker_id(&self) -> u16 {
        self.worker_id
    }

    pub fn generate(&self) -> Snowflake {
        let mut state = self.state.lock();
        let mut timestamp = now_millis().max(state.last_timestamp);

        if timestamp == state.last_timestamp {
            state.sequence = (state.sequence + 1) & SEQUENCE_MASK;
            if state.sequence == 0 {
                // Sequence exhausted for this millisecond
                while timestamp <= state.last_timestamp {
                    std::hint::spin_loop();
                    timestamp = now_millis();
                }
            }
        } else {
            state.sequence = 0;
        }
        state.last_timestamp = timestamp;

        Snowflake(
            ((timestamp - Snowflake::EPOCH) << (WORKER_BITS + SEQUENCE_BITS))
                | (i64::from(self.worker_id) << SEQUENCE_BITS)
                | state.sequence,
        )
    }
}

impl Default for SnowflakeGenerator {
    fn default() -> Self {
        Self::new(0)
    }
}

fn now_millis() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as i64)
        .unwrap_or(Snowflake::EPOCH)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn test_parse_and_display() {
        let id = Snowflake::parse("987654321").unwrap();
        assert_eq!(id.into_inner(), 987_654_321);
        assert_eq!(id.to_string(), "987654321");
        assert!(Snowflake::parse("recipe-1").is_err());
    }

    #[test]
    fn test_json_uses_strings_and_accepts_numbers() {
        let id = Snowflake::new(123_456_789_012_345_678);
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"123456789012345678\"");

        let from_str: Snowflake = serde_json::from_str("\"42\"").unwrap();
        let from_num: Snowflake = serde_json::from_str("42").unwrap();
        assert_eq!(from_str, from_num);
    }

    #[test]
    fn test_generator_is_monotonic() {
        let gen = SnowflakeGenerator::new(3);
        let mut last = Snowflake::default();
        for _ in 0..5000 {
            let id = gen.generate();
            assert!(id > last);
            assert_eq!(id.worker_id(), 3);
            last = id;
        }
    }

    #[test]
    fn test_generator_masks_worker_id() {
        assert_eq!(SnowflakeGenerator::new(1025).worker_id(), 1);
    }

    #[test]
    fn test_generator_unique_across_threads() {
        let gen = Arc::new(SnowflakeGenerator::new(1));
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let gen = Arc::clone(&gen);
                thread::spawn(move || (0..1000).map(|_| gen.generate()).collect::<Vec<_>>())
            })
            .collect();

        let mut ids = HashSet::new();
        for handle in handles {
            ids.extend(handle.join().unwrap());
        }
        assert_eq!(ids.len(), 4000);
    }

    #[test]
    fn test_timestamp_round_trips_generation_time() {
        let before = now_millis();
        let id = SnowflakeGenerator::default().generate();
        assert!(id.timestamp() >= before);
        assert!(id.timestamp() <= now_millis());
    }
}
