//! Configuration loading and representation.
//!
//! Every setting comes from an environment variable with a default. Unset
//! variables fall back to the default; malformed ones are an error, so a typo
//! never silently changes negotiation rules.

use std::net::SocketAddr;

use chrono::Duration;
use thiserror::Error;
use tracing::debug;

use dealroom_negotiation::{CooldownPolicy, NegotiationPolicy, RoundLimitPolicy};
use dealroom_negotiation::policy::{DEFAULT_COOLDOWN_HOURS, DEFAULT_MAX_ROUNDS};

pub const MAX_ROUNDS: &str = "DEALROOM_MAX_ROUNDS";
pub const COOLDOWN_HOURS: &str = "DEALROOM_COOLDOWN_HOURS";
pub const CAP_COUNTER_AT_ASKING: &str = "DEALROOM_CAP_COUNTER_AT_ASKING";
pub const COUNTER_BACK_BELOW_SELLER: &str = "DEALROOM_COUNTER_BACK_BELOW_SELLER";
pub const BIND_ADDR: &str = "DEALROOM_BIND_ADDR";

pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{key} must be {expected}, got {value:?}")]
    Invalid {
        key: &'static str,
        value: String,
        expected: &'static str,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DealroomConfig {
    pub policy: NegotiationPolicy,
    pub bind_addr: SocketAddr,
}

impl Default for DealroomConfig {
    fn default() -> Self {
        Self {
            policy: NegotiationPolicy::default(),
            bind_addr: SocketAddr::from(([0, 0, 0, 0], 8080)),
        }
    }
}

impl DealroomConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a config from an arbitrary key lookup (tests pass a map).
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let max_rounds = parse_or(&lookup, MAX_ROUNDS, DEFAULT_MAX_ROUNDS, "a positive integer", |v| {
            v.parse::<u32>().ok().filter(|n| *n > 0)
        })?;

        let cooldown_hours = parse_or(
            &lookup,
            COOLDOWN_HOURS,
            DEFAULT_COOLDOWN_HOURS,
            "a non-negative number of hours",
            |v| v.parse::<i64>().ok().filter(|h| (0..=24 * 365).contains(h)),
        )?;

        let cap_counteroffer_at_asking =
            parse_or(&lookup, CAP_COUNTER_AT_ASKING, false, "a boolean", parse_bool)?;
        let counter_back_below_seller =
            parse_or(&lookup, COUNTER_BACK_BELOW_SELLER, false, "a boolean", parse_bool)?;

        let bind_addr = parse_or(
            &lookup,
            BIND_ADDR,
            DealroomConfig::default().bind_addr,
            "a socket address like 0.0.0.0:8080",
            |v| v.parse::<SocketAddr>().ok(),
        )?;

        Ok(Self {
            policy: NegotiationPolicy {
                rounds: RoundLimitPolicy::new(max_rounds),
                cooldown: CooldownPolicy::new(Duration::hours(cooldown_hours)),
                cap_counteroffer_at_asking,
                counter_back_below_seller,
            },
            bind_addr,
        })
    }
}

fn parse_or<F, T>(
    lookup: &F,
    key: &'static str,
    default: T,
    expected: &'static str,
    parse: impl Fn(&str) -> Option<T>,
) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        None => {
            debug!(key, "not set, using default");
            Ok(default)
        }
        Some(raw) => parse(raw.trim()).ok_or(ConfigError::Invalid {
            key,
            value: raw,
            expected,
        }),
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn empty_environment_yields_defaults() {
        let config = DealroomConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, DealroomConfig::default());
        assert_eq!(config.bind_addr.to_string(), DEFAULT_BIND_ADDR);
    }

    #[test]
    fn overrides_are_applied() {
        let config = DealroomConfig::from_lookup(lookup(&[
            (MAX_ROUNDS, "6"),
            (COOLDOWN_HOURS, "48"),
            (CAP_COUNTER_AT_ASKING, "true"),
            (COUNTER_BACK_BELOW_SELLER, "1"),
            (BIND_ADDR, "127.0.0.1:9000"),
        ]))
        .unwrap();

        assert_eq!(config.policy.rounds.max_rounds, 6);
        assert_eq!(config.policy.cooldown.window, Duration::hours(48));
        assert!(config.policy.cap_counteroffer_at_asking);
        assert!(config.policy.counter_back_below_seller);
        assert_eq!(config.bind_addr.port(), 9000);
    }

    #[test]
    fn malformed_values_are_rejected() {
        let err = DealroomConfig::from_lookup(lookup(&[(MAX_ROUNDS, "0")])).unwrap_err();
        assert_eq!(
            err,
            ConfigError::Invalid {
                key: MAX_ROUNDS,
                value: "0".to_string(),
                expected: "a positive integer",
            }
        );

        assert!(DealroomConfig::from_lookup(lookup(&[(CAP_COUNTER_AT_ASKING, "maybe")])).is_err());
        assert!(DealroomConfig::from_lookup(lookup(&[(COOLDOWN_HOURS, "-1")])).is_err());
        assert!(DealroomConfig::from_lookup(lookup(&[(BIND_ADDR, "localhost")])).is_err());
    }
}
