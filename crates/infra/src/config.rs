//! Process configuration read from environment variables.

use std::net::SocketAddr;
use std::str::FromStr;

use chrono::Duration;
use rust_decimal::Decimal;
use thiserror::Error;

use pricestats_products::ConditionalSumPolicy;

const DEFAULT_SESSION_TTL_SECS: i64 = 14 * 24 * 60 * 60;
/// Longest accepted `SESSION_TTL_SECS`: ten years.
pub const MAX_SESSION_TTL_SECS: i64 = 10 * 365 * 24 * 60 * 60;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("{var}={value:?} is invalid: {reason}")]
    Invalid {
        var: &'static str,
        value: String,
        reason: String,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub bind_addr: SocketAddr,
    pub use_persistent_stores: bool,
    /// Required when `use_persistent_stores` is set.
    pub database_url: Option<String>,
    pub session_ttl: Duration,
    pub cookie_secure: bool,
    pub stats_policy: ConditionalSumPolicy,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([0, 0, 0, 0], 8080)),
            use_persistent_stores: false,
            database_url: None,
            session_ttl: Duration::seconds(DEFAULT_SESSION_TTL_SECS),
            cookie_secure: false,
            stats_policy: ConditionalSumPolicy::default(),
        }
    }
}

impl Settings {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build settings from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Settings::default();

        let bind_addr = parse_var(&lookup, "BIND_ADDR")?.unwrap_or(defaults.bind_addr);
        let use_persistent_stores =
            parse_var(&lookup, "USE_PERSISTENT_STORES")?.unwrap_or(defaults.use_persistent_stores);

        let database_url = lookup("DATABASE_URL").filter(|v| !v.trim().is_empty());
        if use_persistent_stores && database_url.is_none() {
            return Err(ConfigError::Missing("DATABASE_URL"));
        }

        let session_ttl = match parse_var::<i64, _>(&lookup, "SESSION_TTL_SECS")? {
            Some(secs) => checked_session_ttl(secs)?,
            None => defaults.session_ttl,
        };

        let cookie_secure = parse_var(&lookup, "COOKIE_SECURE")?.unwrap_or(defaults.cookie_secure);
        if !cookie_secure {
            tracing::warn!("COOKIE_SECURE not set; session cookie may be sent over plain HTTP");
        }

        let name_length = parse_var::<usize, _>(&lookup, "STATS_NAME_LENGTH")?
            .unwrap_or(defaults.stats_policy.name_length);
        let price = parse_var::<Decimal, _>(&lookup, "STATS_PRICE_THRESHOLD")?
            .unwrap_or(defaults.stats_policy.price);

        Ok(Self {
            bind_addr,
            use_persistent_stores,
            database_url,
            session_ttl,
            cookie_secure,
            stats_policy: ConditionalSumPolicy::new(name_length, price),
        })
    }
}

fn checked_session_ttl(secs: i64) -> Result<Duration, ConfigError> {
    let invalid = |reason: String| ConfigError::Invalid {
        var: "SESSION_TTL_SECS",
        value: secs.to_string(),
        reason,
    };

    if secs <= 0 {
        return Err(invalid("must be positive".to_string()));
    }
    if secs > MAX_SESSION_TTL_SECS {
        return Err(invalid(format!("must be at most {MAX_SESSION_TTL_SECS}")));
    }
    Duration::try_seconds(secs).ok_or_else(|| invalid("out of range".to_string()))
}

fn parse_var<T, F>(lookup: &F, var: &'static str) -> Result<Option<T>, ConfigError>
where
    T: FromStr,
    T::Err: core::fmt::Display,
    F: Fn(&str) -> Option<String>,
{
    match lookup(var) {
        None => Ok(None),
        Some(raw) if raw.trim().is_empty() => Ok(None),
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|e| ConfigError::Invalid {
                var,
                value: raw.clone(),
                reason: e.to_string(),
            }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn settings(vars: &[(&str, &str)]) -> Result<Settings, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Settings::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_apply_when_nothing_is_set() {
        let s = settings(&[]).unwrap();
        assert_eq!(s, Settings::default());
        assert_eq!(s.bind_addr.to_string(), "0.0.0.0:8080");
        assert_eq!(s.session_ttl, Duration::days(14));
        assert_eq!(s.stats_policy, ConditionalSumPolicy::new(3, Decimal::from(50)));
    }

    #[test]
    fn overrides_are_parsed() {
        let s = settings(&[
            ("BIND_ADDR", "127.0.0.1:3000"),
            ("SESSION_TTL_SECS", "60"),
            ("COOKIE_SECURE", "true"),
            ("STATS_NAME_LENGTH", "5"),
            ("STATS_PRICE_THRESHOLD", "12.50"),
        ])
        .unwrap();

        assert_eq!(s.bind_addr.port(), 3000);
        assert_eq!(s.session_ttl, Duration::seconds(60));
        assert!(s.cookie_secure);
        assert_eq!(s.stats_policy.name_length, 5);
        assert_eq!(s.stats_policy.price, Decimal::new(1250, 2));
    }

    #[test]
    fn persistent_stores_need_a_database_url() {
        assert_eq!(
            settings(&[("USE_PERSISTENT_STORES", "true")]),
            Err(ConfigError::Missing("DATABASE_URL"))
        );

        let s = settings(&[
            ("USE_PERSISTENT_STORES", "true"),
            ("DATABASE_URL", "postgres://localhost/pricestats"),
        ])
        .unwrap();
        assert!(s.use_persistent_stores);
    }

    #[test]
    fn garbage_values_are_reported() {
        assert!(matches!(
            settings(&[("SESSION_TTL_SECS", "soon")]),
            Err(ConfigError::Invalid { var: "SESSION_TTL_SECS", .. })
        ));
        assert!(matches!(
            settings(&[("SESSION_TTL_SECS", "0")]),
            Err(ConfigError::Invalid { var: "SESSION_TTL_SECS", .. })
        ));
        assert!(matches!(
            settings(&[("USE_PERSISTENT_STORES", "yes please")]),
            Err(ConfigError::Invalid { var: "USE_PERSISTENT_STORES", .. })
        ));
    }

    #[test]
    fn oversized_session_ttl_is_rejected() {
        for secs in [i64::MAX.to_string(), "100000000000000".to_string()] {
            assert!(matches!(
                settings(&[("SESSION_TTL_SECS", secs.as_str())]),
                Err(ConfigError::Invalid { var: "SESSION_TTL_SECS", .. })
            ));
        }

        let max = MAX_SESSION_TTL_SECS.to_string();
        let s = settings(&[("SESSION_TTL_SECS", max.as_str())]).unwrap();
        assert_eq!(s.session_ttl.num_seconds(), MAX_SESSION_TTL_SECS);
    }
}
