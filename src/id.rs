//! Strategies for generating transaction IDs.

use std::fmt::Debug;

use clap::ValueEnum;
use time::OffsetDateTime;
use uuid::Uuid;

/// Produces a fresh ID for each new transaction.
///
/// IDs are not checked for collisions, uniqueness is entirely up to the generator.
pub trait IdGenerator: Debug + Send + Sync {
    /// Generate a new ID.
    fn generate(&self) -> String;
}

/// Generates random version 4 UUIDs.
#[derive(Debug, Default, Clone, Copy)]
pub struct UuidGenerator;

impl IdGenerator for UuidGenerator {
    fn generate(&self) -> String {
        Uuid::new_v4().to_string()
    }
}

/// Uses the current UTC time in milliseconds as the ID.
///
/// Two transactions created within the same millisecond will get the same ID.
#[derive(Debug, Default, Clone, Copy)]
pub struct TimestampIdGenerator;

impl IdGenerator for TimestampIdGenerator {
    fn generate(&self) -> String {
        (OffsetDateTime::now_utc().unix_timestamp_nanos() / 1_000_000).to_string()
    }
}

/// Which [IdGenerator] the server should use.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum IdStrategy {
    /// Random UUIDs, see [UuidGenerator].
    #[default]
    Uuid,
    /// Millisecond timestamps, see [TimestampIdGenerator].
    Timestamp,
}

impl IdStrategy {
    /// Create the generator for this strategy.
    pub fn generator(self) -> Box<dyn IdGenerator> {
        match self {
            IdStrategy::Uuid => Box::new(UuidGenerator),
            IdStrategy::Timestamp => Box::new(TimestampIdGenerator),
        }
    }
}


#[cfg(test)]
mod tests {
    use uuid::Uuid;

    use super::{IdGenerator, IdStrategy, test_utils::SequentialIdGenerator};

    #[test]
    fn uuid_strategy_generates_distinct_uuids() {
        let generator = IdStrategy::Uuid.generator();

        let first = generator.generate();
        let second = generator.generate();

        assert_ne!(first, second);
        assert!(Uuid::parse_str(&first).is_ok(), "{first} is not a UUID");
    }

    #[test]
    fn timestamp_strategy_generates_milliseconds() {
        let id = IdStrategy::Timestamp.generator().generate();

        let millis: i128 = id.parse().unwrap();
        // 2020-01-01T00:00:00Z
        assert!(millis > 1_577_836_800_000);
    }

    #[test]
    fn sequential_generator_counts_from_one() {
        let generator = SequentialIdGenerator::default();

        assert_eq!(generator.generate(), "1");
        assert_eq!(generator.generate(), "2");
    }
}
