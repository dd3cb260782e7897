//! Application configuration loaded from a TOML file.
//!
//! The config file location defaults to `config.toml` and can be overridden
//! through the `TREEBOT_CONFIG` environment variable. Only the `[discord]`
//! section is mandatory; cooldowns, topic file, and state file all have
//! defaults.

use crate::errors::{Error, Result};
use chrono::TimeDelta;
use poise::serenity_prelude::{ChannelId, RoleId};
use serde::Deserialize;
use std::path::PathBuf;
use std::{env, fs, path::Path};

/// Environment variable overriding the config file path.
pub const CONFIG_PATH_ENV: &str = "TREEBOT_CONFIG";

/// Config file path used when [`CONFIG_PATH_ENV`] is unset.
pub const DEFAULT_CONFIG_PATH: &str = "config.toml";

/// Top-level application configuration.
#[derive(Deserialize, Debug)]
pub struct AppConfig {
    /// Guild-specific ids the bot operates on
    pub discord: DiscordConfig,
    /// Cooldown windows
    #[serde(default)]
    pub cooldowns: CooldownConfig,
    /// Topic pool location
    #[serde(default)]
    pub topics: TopicsConfig,
    /// State persistence location
    #[serde(default)]
    pub state: StateConfig,
}

/// Role and channel ids the bot needs to operate.
#[derive(Deserialize, Debug, Clone)]
pub struct DiscordConfig {
    /// Role pinged when test mode is off
    pub ping_role_id: RoleId,
    /// Role pinged while test mode is on
    pub test_ping_role_id: RoleId,
    /// Roles allowed to run admin commands
    pub admin_role_ids: Vec<RoleId>,
    /// Channel holding the persistent ping button message
    pub button_channel_id: ChannelId,
    /// Channel the role ping is sent to
    pub ping_channel_id: ChannelId,
}

/// Cooldown windows, in the units admins naturally think in.
#[derive(Deserialize, Debug, Clone)]
pub struct CooldownConfig {
    /// Seconds a user must wait between ping button presses
    #[serde(default = "default_button_seconds")]
    pub button_seconds: u64,
    /// Hours an issued topic stays out of circulation
    #[serde(default = "default_topic_hours")]
    pub topic_hours: u64,
}

const fn default_button_seconds() -> u64 {
    10
}

const fn default_topic_hours() -> u64 {
    2
}

impl Default for CooldownConfig {
    fn default() -> Self {
        Self {
            button_seconds: default_button_seconds(),
            topic_hours: default_topic_hours(),
        }
    }
}

impl CooldownConfig {
    /// Button cooldown as a duration.
    #[must_use]
    pub fn button_cooldown(&self) -> TimeDelta {
        saturating_seconds(self.button_seconds)
    }

    /// Topic cooldown as a duration.
    #[must_use]
    pub fn topic_cooldown(&self) -> TimeDelta {
        saturating_seconds(self.topic_hours.saturating_mul(3600))
    }
}

/// Converts a user-supplied second count into a `TimeDelta`, saturating at a
/// century so timestamp arithmetic downstream stays in range.
fn saturating_seconds(secs: u64) -> TimeDelta {
    const CEILING: i64 = 100 * 365 * 24 * 60 * 60;
    TimeDelta::seconds(i64::try_from(secs).unwrap_or(CEILING).min(CEILING))
}

/// Where the topic pool lives.
#[derive(Deserialize, Debug, Clone)]
pub struct TopicsConfig {
    /// Line-delimited topic file
    #[serde(default = "default_topics_file")]
    pub file: PathBuf,
}

fn default_topics_file() -> PathBuf {
    PathBuf::from("topics.txt")
}

impl Default for TopicsConfig {
    fn default() -> Self {
        Self {
            file: default_topics_file(),
        }
    }
}

/// Where persistent state lives.
#[derive(Deserialize, Debug, Clone)]
pub struct StateConfig {
    /// JSON state file
    #[serde(default = "default_state_file")]
    pub file: PathBuf,
}

fn default_state_file() -> PathBuf {
    PathBuf::from("data/state.json")
}

impl Default for StateConfig {
    fn default() -> Self {
        Self {
            file: default_state_file(),
        }
    }
}

/// Loads configuration from the default path, honoring the
/// [`CONFIG_PATH_ENV`] override.
pub fn load_app_configuration() -> Result<AppConfig> {
    let path = env::var(CONFIG_PATH_ENV).unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
    load_config(path)
}

/// Loads and parses the TOML configuration at `path`.
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<AppConfig> {
    let path_ref = path.as_ref();
    tracing::debug!("Attempting to load configuration from: {:?}", path_ref);
    let contents = fs::read_to_string(path_ref)
        .map_err(|e| Error::Config(format!("Failed to read config file {:?}: {}", path_ref, e)))?;
    let app_config: AppConfig = toml::from_str(&contents).map_err(|e| {
        Error::Config(format!(
            "Failed to parse TOML from config file {:?}: {}",
            path_ref, e
        ))
    })?;
    Ok(app_config)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;

    const FULL_CONFIG: &str = r#"
        [discord]
        ping_role_id = 1286817521952886854
        test_ping_role_id = 1186948054838951976
        admin_role_ids = [1186948054838951976]
        button_channel_id = 1272801417047834654
        ping_channel_id = 1286821326778011790

        [cooldowns]
        button_seconds = 15
        topic_hours = 4

        [topics]
        file = "custom/topics.txt"

        [state]
        file = "custom/state.json"
    "#;

    const MINIMAL_CONFIG: &str = r#"
        [discord]
        ping_role_id = 1
        test_ping_role_id = 2
        admin_role_ids = [3, 4]
        button_channel_id = 5
        ping_channel_id = 6
    "#;

    #[test]
    fn test_parses_full_config() {
        let config: AppConfig = toml::from_str(FULL_CONFIG).unwrap();

        assert_eq!(config.discord.ping_role_id, RoleId::new(1286817521952886854));
        assert_eq!(
            config.discord.admin_role_ids,
            vec![RoleId::new(1186948054838951976)]
        );
        assert_eq!(
            config.discord.button_channel_id,
            ChannelId::new(1272801417047834654)
        );
        assert_eq!(config.cooldowns.button_seconds, 15);
        assert_eq!(config.cooldowns.topic_hours, 4);
        assert_eq!(config.topics.file, PathBuf::from("custom/topics.txt"));
        assert_eq!(config.state.file, PathBuf::from("custom/state.json"));
    }

    #[test]
    fn test_minimal_config_gets_defaults() {
        let config: AppConfig = toml::from_str(MINIMAL_CONFIG).unwrap();

        assert_eq!(config.cooldowns.button_seconds, 10);
        assert_eq!(config.cooldowns.topic_hours, 2);
        assert_eq!(config.topics.file, PathBuf::from("topics.txt"));
        assert_eq!(config.state.file, PathBuf::from("data/state.json"));
    }

    #[test]
    fn test_cooldown_durations() {
        let config = CooldownConfig::default();
        assert_eq!(config.button_cooldown(), TimeDelta::seconds(10));
        assert_eq!(config.topic_cooldown(), TimeDelta::hours(2));
    }

    #[test]
    fn test_oversized_cooldowns_saturate() {
        let config = CooldownConfig {
            button_seconds: u64::MAX,
            topic_hours: u64::MAX,
        };
        let century = TimeDelta::seconds(100 * 365 * 24 * 60 * 60);
        assert_eq!(config.button_cooldown(), century);
        assert_eq!(config.topic_cooldown(), century);
    }

    #[test]
    fn test_missing_discord_section_is_an_error() {
        let result = toml::from_str::<AppConfig>("[cooldowns]\nbutton_seconds = 5\n");
        assert!(result.is_err());
    }

    #[test]
    fn test_load_config_missing_file_is_config_error() {
        let result = load_config("definitely/not/a/config.toml");
        assert!(matches!(result, Err(Error::Config(_))));
    }
}
