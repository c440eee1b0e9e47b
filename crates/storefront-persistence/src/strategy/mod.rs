//! # Strategy Module
//!
//! Enum-based cache/database access strategies using dispatch pattern.
//!
//! ## Available Strategies
//!
//! ### Read Strategies
//! - `CacheFirst` - Check cache, fall back to DB on miss or cache error (default)
//! - `CacheStrict` - Check cache, fall back to DB on miss only; cache errors fail the read
//! - `DbOnly` - Skip cache entirely
//!
//! ### Write Strategies
//! - `WriteThrough` - Write DB, then best-effort cache fill (default)
//! - `DbOnly` - Write DB only, no cache interaction
//!
//! Every successful operation reports what happened on the cache side
//! through [`CacheLookup`] and [`CacheFill`], so a degraded cache is
//! visible to the caller instead of being swallowed.

pub mod read_strategy;
pub mod write_strategy;

pub use read_strategy::{CacheLookup, Lookup, ReadStrategy, Served};
pub use write_strategy::{CacheFill, WriteStrategy};

use std::fmt;
use std::str::FromStr;

/// Strategy name could not be parsed.
#[derive(Debug, thiserror::Error)]
#[error("unknown {kind} strategy: {value}")]
pub struct UnknownStrategy {
    pub kind: &'static str,
    pub value: String,
}

impl FromStr for ReadStrategy {
    type Err = UnknownStrategy;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "cache_first" => Ok(Self::CacheFirst),
            "cache_strict" => Ok(Self::CacheStrict),
            "db_only" => Ok(Self::DbOnly),
            _ => Err(UnknownStrategy {
                kind: "read",
                value: s.to_string(),
            }),
        }
    }
}

impl FromStr for WriteStrategy {
    type Err = UnknownStrategy;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "write_through" => Ok(Self::WriteThrough),
            "db_only" => Ok(Self::DbOnly),
            _ => Err(UnknownStrategy {
                kind: "write",
                value: s.to_string(),
            }),
        }
    }
}

impl fmt::Display for ReadStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::CacheFirst => "cache_first",
            Self::CacheStrict => "cache_strict",
            Self::DbOnly => "db_only",
        })
    }
}

impl fmt::Display for WriteStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::WriteThrough => "write_through",
            Self::DbOnly => "db_only",
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_strategies() {
        assert_eq!("cache-first".parse::<ReadStrategy>().unwrap(), ReadStrategy::CacheFirst);
        assert_eq!("CACHE_STRICT".parse::<ReadStrategy>().unwrap(), ReadStrategy::CacheStrict);
        assert_eq!("db_only".parse::<WriteStrategy>().unwrap(), WriteStrategy::DbOnly);
        assert!("write_back".parse::<WriteStrategy>().is_err());
    }

    #[test]
    fn test_display_round_trips_through_parse() {
        for strategy in [ReadStrategy::CacheFirst, ReadStrategy::CacheStrict, ReadStrategy::DbOnly] {
            assert_eq!(strategy.to_string().parse::<ReadStrategy>().unwrap(), strategy);
        }
    }
}
