//! Marketplace configuration, read from the environment.

use std::str::FromStr;
use std::time::Duration;

use db::DbConfig;

use crate::InitError;

/// Everything needed to bring the marketplace up.
#[derive(Debug, Clone)]
pub struct MarketplaceConfig {
    pub db: DbConfig,
    /// Capacity of the lifecycle event channel.
    pub event_capacity: usize,
    /// Notifications buffered per connection before pushes start failing.
    pub connection_buffer: usize,
    pub notify_rejections: bool,
    /// Idle time after which a gig actor is stopped.
    pub idle_gig_ttl: Duration,
}

impl Default for MarketplaceConfig {
    fn default() -> Self {
        Self {
            db: DbConfig::default(),
            event_capacity: 1024,
            connection_buffer: 64,
            notify_rejections: true,
            idle_gig_ttl: Duration::from_secs(300),
        }
    }
}

impl MarketplaceConfig {
    /// Read configuration from `GIGFLOW_*` environment variables, falling
    /// back to defaults for anything unset.
    pub fn from_env() -> Result<Self, InitError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Like [`from_env`](Self::from_env) with a custom variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, InitError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let mut db = defaults.db;

        if let Some(endpoint) = lookup("GIGFLOW_DB_ENDPOINT") {
            db = db.with_endpoint(endpoint);
        }
        if let Some(namespace) = lookup("GIGFLOW_DB_NAMESPACE") {
            db = db.with_namespace(namespace);
        }
        if let Some(database) = lookup("GIGFLOW_DB_DATABASE") {
            db = db.with_database(database);
        }
        match (lookup("GIGFLOW_DB_USER"), lookup("GIGFLOW_DB_PASS")) {
            (Some(user), Some(pass)) => db = db.with_credentials(user, pass),
            (None, None) => {}
            _ => {
                return Err(InitError::Config {
                    var: "GIGFLOW_DB_USER",
                    reason: "GIGFLOW_DB_USER and GIGFLOW_DB_PASS must be set together".into(),
                });
            }
        }

        let event_capacity =
            parse_var(&lookup, "GIGFLOW_EVENT_CAPACITY")?.unwrap_or(defaults.event_capacity);
        let connection_buffer =
            parse_var(&lookup, "GIGFLOW_CONNECTION_BUFFER")?.unwrap_or(defaults.connection_buffer);
        let notify_rejections =
            parse_var(&lookup, "GIGFLOW_NOTIFY_REJECTIONS")?.unwrap_or(defaults.notify_rejections);
        let idle_gig_ttl = parse_var::<u64, _>(&lookup, "GIGFLOW_IDLE_GIG_SECS")?
            .map(Duration::from_secs)
            .unwrap_or(defaults.idle_gig_ttl);

        if event_capacity == 0 {
            return Err(InitError::Config {
                var: "GIGFLOW_EVENT_CAPACITY",
                reason: "must be at least 1".into(),
            });
        }
        if connection_buffer == 0 {
            return Err(InitError::Config {
                var: "GIGFLOW_CONNECTION_BUFFER",
                reason: "must be at least 1".into(),
            });
        }

        Ok(Self {
            db,
            event_capacity,
            connection_buffer,
            notify_rejections,
            idle_gig_ttl,
        })
    }
}

fn parse_var<T, F>(lookup: &F, var: &'static str) -> Result<Option<T>, InitError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
    F: Fn(&str) -> Option<String>,
{
    let Some(raw) = lookup(var) else {
        return Ok(None);
    };
    raw.trim()
        .parse()
        .map(Some)
        .map_err(|e: T::Err| InitError::Config {
            var,
            reason: format!("invalid value {:?}: {}", raw, e),
        })
}
