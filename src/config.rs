//! Server configuration from environment variables.

use chrono::Duration;

#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// TCP port to listen on
    pub port: u16,
    /// Default room capacity
    pub max_players: usize,
    /// How long a kick keeps a player out
    pub ban_duration: Duration,
    /// How long a fully-disconnected room survives before the reaper
    pub abandon_timeout: Duration,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 4025,
            max_players: 12,
            ban_duration: Duration::minutes(10),
            abandon_timeout: Duration::minutes(15),
        }
    }
}

impl ServerConfig {
    /// Load config from environment variables, falling back to defaults on
    /// anything missing or unparseable
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let port = read_env("PORT", defaults.port);
        let max_players = read_env("ROOM_MAX_PLAYERS", defaults.max_players).max(2);
        let ban_minutes = read_env("KICK_BAN_MINUTES", defaults.ban_duration.num_minutes());
        let abandon_minutes = read_env(
            "ROOM_ABANDON_MINUTES",
            defaults.abandon_timeout.num_minutes(),
        );

        Self {
            port,
            max_players,
            ban_duration: Duration::minutes(ban_minutes.max(1)),
            abandon_timeout: Duration::minutes(abandon_minutes.max(1)),
        }
    }
}

fn read_env<T: std::str::FromStr + std::fmt::Display>(key: &str, default: T) -> T {
    match std::env::var(key) {
        Ok(raw) => match raw.trim().parse() {
            Ok(value) => value,
            Err(_) => {
                tracing::warn!("Ignoring unparseable {}={:?}, using {}", key, raw, default);
                default
            }
        },
        Err(_) => default,
    }
}
