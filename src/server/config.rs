use chrono::Duration;
use std::str::FromStr;

use crate::server::error::{config::ConfigError, AppError};

const DEFAULT_BIND_ADDRESS: &str = "0.0.0.0:8080";
const DEFAULT_PASSWORD_HASH_ITERATIONS: u32 = 600_000;

pub struct Config {
    pub database_url: String,
    pub bind_address: String,

    pub password_hash_iterations: u32,

    pub registration: RegistrationPolicy,
    pub outbox: OutboxSettings,
}

impl Config {
    pub fn from_env() -> Result<Self, AppError> {
        let defaults = RegistrationPolicy::default();
        let outbox_defaults = OutboxSettings::default();

        Ok(Self {
            database_url: std::env::var("DATABASE_URL")
                .map_err(|_| ConfigError::MissingEnvVar("DATABASE_URL".to_string()))?,
            bind_address: std::env::var("BIND_ADDRESS")
                .unwrap_or_else(|_| DEFAULT_BIND_ADDRESS.to_string()),
            password_hash_iterations: env_or(
                "PASSWORD_HASH_ITERATIONS",
                DEFAULT_PASSWORD_HASH_ITERATIONS,
            )?,
            registration: RegistrationPolicy {
                max_code_attempts: env_at_least(
                    "REGISTRATION_MAX_CODE_ATTEMPTS",
                    defaults.max_code_attempts,
                    1,
                )?,
                code_length: env_at_least("REGISTRATION_CODE_LENGTH", defaults.code_length, 1)?,
                code_ttl: env_seconds_or("REGISTRATION_CODE_TTL_SECONDS", defaults.code_ttl)?,
                resend_cooldown: env_seconds_or(
                    "REGISTRATION_RESEND_COOLDOWN_SECONDS",
                    defaults.resend_cooldown,
                )?,
                completion_window: env_seconds_or(
                    "REGISTRATION_COMPLETION_WINDOW_SECONDS",
                    defaults.completion_window,
                )?,
                cas_retry_limit: env_or(
                    "REGISTRATION_CAS_RETRY_LIMIT",
                    defaults.cas_retry_limit,
                )?,
            },
            outbox: OutboxSettings {
                batch_size: env_at_least("OUTBOX_BATCH_SIZE", outbox_defaults.batch_size, 1)?,
                max_attempts: env_at_least("OUTBOX_MAX_ATTEMPTS", outbox_defaults.max_attempts, 1)?,
            },
        })
    }
}

/// Limits governing the registration state machine.
#[derive(Debug, Clone, PartialEq)]
pub struct RegistrationPolicy {
    /// Wrong codes accepted before the registration expires.
    pub max_code_attempts: u32,
    /// Length of generated verification codes.
    pub code_length: usize,
    /// How long a freshly issued code stays valid.
    pub code_ttl: Duration,
    /// Minimum wait between two code issuances.
    pub resend_cooldown: Duration,
    /// How long a verified registration may wait for completion.
    pub completion_window: Duration,
    /// Reload-and-reapply attempts after an optimistic concurrency conflict.
    pub cas_retry_limit: u32,
}

impl Default for RegistrationPolicy {
    fn default() -> Self {
        Self {
            max_code_attempts: 3,
            code_length: 6,
            code_ttl: Duration::minutes(15),
            resend_cooldown: Duration::seconds(60),
            completion_window: Duration::hours(24),
            cas_retry_limit: 5,
        }
    }
}

/// Outbox relay tuning.
#[derive(Debug, Clone, PartialEq)]
pub struct OutboxSettings {
    /// Events relayed per run.
    pub batch_size: u64,
    /// Delivery attempts after which an event is parked.
    pub max_attempts: i32,
}

impl Default for OutboxSettings {
    fn default() -> Self {
        Self {
            batch_size: 50,
            max_attempts: 10,
        }
    }
}

/// Reads and parses an optional environment variable, falling back to `default`.
fn env_or<T>(name: &str, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match std::env::var(name) {
        Ok(value) => parse_value(name, &value),
        Err(_) => Ok(default),
    }
}

/// Like `env_or`, rejecting values below `min`.
fn env_at_least<T>(name: &str, default: T, min: T) -> Result<T, ConfigError>
where
    T: FromStr + PartialOrd + std::fmt::Display,
    T::Err: std::fmt::Display,
{
    at_least(name, env_or(name, default)?, min)
}

fn at_least<T>(name: &str, value: T, min: T) -> Result<T, ConfigError>
where
    T: PartialOrd + std::fmt::Display,
{
    if value < min {
        return Err(ConfigError::InvalidEnvVar {
            name: name.to_string(),
            value: value.to_string(),
            reason: format!("must be at least {min}"),
        });
    }

    Ok(value)
}

/// Like `env_or`, for durations given in whole seconds.
fn env_seconds_or(name: &str, default: Duration) -> Result<Duration, ConfigError> {
    match std::env::var(name) {
        Ok(value) => parse_value::<u32>(name, &value).map(|secs| Duration::seconds(secs.into())),
        Err(_) => Ok(default),
    }
}

fn parse_value<T>(name: &str, value: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    value
        .trim()
        .parse::<T>()
        .map_err(|e| ConfigError::InvalidEnvVar {
            name: name.to_string(),
            value: value.to_string(),
            reason: e.to_string(),
        })
}
