use std::{fs, str::FromStr, time::Duration};

use teloxide::types::UserId;

/// Default delay before copies sent to a user get deleted.
pub const DEFAULT_AUTO_DELETE: Duration = Duration::from_secs(120);
/// Default pause between copying two messages in a row, to stay clear of flood limits.
pub const DEFAULT_COPY_INTERVAL: Duration = Duration::from_millis(500);
pub const DEFAULT_PORT: u16 = 8080;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("No bot token: set BOT_TOKEN or put the token into the \"{key_file}\" file")]
    MissingToken { key_file: &'static str },
    #[error("{var} has an invalid value {value:?}")]
    Invalid { var: &'static str, value: String },
}

/// Everything the bot reads once at startup.
#[derive(Clone, Debug)]
pub struct Config {
    pub bot_token: String,
    /// The only user allowed to save, clear and list codes.
    /// [`None`] means nobody is.
    pub admin_id: Option<UserId>,
    /// SQLite URL of the database. [`None`] disables persistence.
    pub database_url: Option<String>,
    /// Port of the keep-alive web server.
    pub port: u16,
    pub auto_delete_after: Duration,
    pub copy_interval: Duration,
}

impl Config {
    /// Reads the config from the process environment.
    ///
    /// If `BOT_TOKEN` isn't set, the token is read from the file `key`
    /// (`key_debug` for debug builds) in the working directory.
    pub fn from_env() -> Result<Self, ConfigError> {
        let key_file = match cfg!(debug_assertions) {
            true => "key_debug",
            false => "key",
        };

        Self::from_env_with(
            |var| std::env::var(var).ok(),
            |path| fs::read_to_string(path).ok(),
            key_file,
        )
    }

    /// [`Config::from_env`] with the environment and the file system swapped
    /// out. A `BOT_TOKEN` that is set but blank still falls back to `key_file`.
    fn from_env_with(
        env: impl Fn(&str) -> Option<String>,
        read_file: impl Fn(&str) -> Option<String>,
        key_file: &'static str,
    ) -> Result<Self, ConfigError> {
        Self::from_lookup(|var| {
            let value = env(var).filter(|value| !value.trim().is_empty());
            match value {
                None if var == "BOT_TOKEN" => read_file(key_file),
                value => value,
            }
        })
        .map_err(|e| match e {
            ConfigError::MissingToken { .. } => ConfigError::MissingToken { key_file },
            e => e,
        })
    }

    /// Builds the config out of whatever `lookup` returns for each variable name.
    /// Values are trimmed, and empty ones count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |var: &str| {
            lookup(var)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let bot_token = get("BOT_TOKEN").ok_or(ConfigError::MissingToken { key_file: "key" })?;

        let admin_id = parse_var::<u64>(get("ADMIN_USER_ID"), "ADMIN_USER_ID")?.map(UserId);
        let port = parse_var(get("PORT"), "PORT")?.unwrap_or(DEFAULT_PORT);
        let auto_delete_after = parse_var(get("AUTO_DELETE_SECONDS"), "AUTO_DELETE_SECONDS")?
            .map_or(DEFAULT_AUTO_DELETE, Duration::from_secs);
        let copy_interval = parse_var(get("COPY_INTERVAL_MS"), "COPY_INTERVAL_MS")?
            .map_or(DEFAULT_COPY_INTERVAL, Duration::from_millis);

        Ok(Config {
            bot_token,
            admin_id,
            database_url: get("DATABASE_URL"),
            port,
            auto_delete_after,
            copy_interval,
        })
    }
}

fn parse_var<T: FromStr>(value: Option<String>, var: &'static str) -> Result<Option<T>, ConfigError> {
    value
        .map(|value| value.parse().map_err(|_| ConfigError::Invalid { var, value }))
        .transpose()
}

#[cfg(test)]
mod tests {
    use std::{collections::HashMap, time::Duration};

    use teloxide::types::UserId;

    use super::{Config, ConfigError, DEFAULT_AUTO_DELETE, DEFAULT_COPY_INTERVAL, DEFAULT_PORT};

    fn config_from(vars: &[(&str, &str)]) -> Result<Config, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|var| vars.get(var).cloned())
    }

    #[test]
    fn defaults() {
        let config = config_from(&[("BOT_TOKEN", "123:abc\n")]).unwrap();
        assert_eq!(config.bot_token, "123:abc");
        assert_eq!(config.admin_id, None);
        assert_eq!(config.database_url, None);
        assert_eq!(config.port, DEFAULT_PORT);
        assert_eq!(config.auto_delete_after, DEFAULT_AUTO_DELETE);
        assert_eq!(config.copy_interval, DEFAULT_COPY_INTERVAL);
    }

    #[test]
    fn everything_set() {
        let config = config_from(&[
            ("BOT_TOKEN", "123:abc"),
            ("ADMIN_USER_ID", "1366743555"),
            ("DATABASE_URL", "sqlite:movies.sqlite"),
            ("PORT", "9000"),
            ("AUTO_DELETE_SECONDS", "30"),
            ("COPY_INTERVAL_MS", "750"),
        ])
        .unwrap();
        assert_eq!(config.admin_id, Some(UserId(1366743555)));
        assert_eq!(config.database_url.as_deref(), Some("sqlite:movies.sqlite"));
        assert_eq!(config.port, 9000);
        assert_eq!(config.auto_delete_after, Duration::from_secs(30));
        assert_eq!(config.copy_interval, Duration::from_millis(750));
    }

    #[test]
    fn missing_token() {
        assert!(matches!(
            config_from(&[("ADMIN_USER_ID", "1")]),
            Err(ConfigError::MissingToken { .. })
        ));
        assert!(matches!(
            config_from(&[("BOT_TOKEN", "  ")]),
            Err(ConfigError::MissingToken { .. })
        ));
    }

    #[test]
    fn blank_token_falls_back_to_key_file() {
        let env = |var: &str| match var {
            "BOT_TOKEN" => Some(String::new()),
            "PORT" => Some("9000".to_string()),
            _ => None,
        };
        let read_file = |path: &str| (path == "key").then(|| "123:abc\n".to_string());

        let config = Config::from_env_with(env, read_file, "key").unwrap();
        assert_eq!(config.bot_token, "123:abc");
        assert_eq!(config.port, 9000);

        // No key file either.
        let err = Config::from_env_with(env, |_| None, "key_debug").unwrap_err();
        assert!(matches!(
            err,
            ConfigError::MissingToken {
                key_file: "key_debug"
            }
        ));

        // A real token wins over the file.
        let config = Config::from_env_with(
            |var| (var == "BOT_TOKEN").then(|| "456:def".to_string()),
            read_file,
            "key",
        )
        .unwrap();
        assert_eq!(config.bot_token, "456:def");
    }

    #[test]
    fn empty_database_url_disables_persistence() {
        let config = config_from(&[("BOT_TOKEN", "t"), ("DATABASE_URL", "")]).unwrap();
        assert_eq!(config.database_url, None);
    }

    #[test]
    fn invalid_values() {
        let err = config_from(&[("BOT_TOKEN", "t"), ("ADMIN_USER_ID", "admin")]).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { var: "ADMIN_USER_ID", .. }));

        let err = config_from(&[("BOT_TOKEN", "t"), ("PORT", "99999")]).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { var: "PORT", .. }));
    }
}
