//! Service configuration, resolved from the environment at startup.

use std::{env, path::PathBuf};

const DEFAULT_PORT: u16 = 8080;
const DEFAULT_DATA_DIR: &str = "data";

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    /// Directory holding one `<key>.json` document per collection.
    pub data_dir: PathBuf,
    /// Reject mutating requests unless a session is signed in.
    pub require_sign_in: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            require_sign_in: false,
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Builds a config from an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();

        let port = lookup("PORT")
            .and_then(|value| value.trim().parse::<u16>().ok())
            .unwrap_or(defaults.port);

        let data_dir = lookup("APP_DATA_DIR")
            .filter(|value| !value.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or(defaults.data_dir);

        let require_sign_in = lookup("APP_REQUIRE_SIGN_IN")
            .map(|value| is_truthy(&value))
            .unwrap_or(defaults.require_sign_in);

        Self {
            port,
            data_dir,
            require_sign_in,
        }
    }
}

fn is_truthy(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| vars.get(name).cloned()
    }

    #[test]
    fn defaults_when_unset() {
        let config = Config::from_lookup(lookup_from(&[]));
        assert_eq!(config.port, 8080);
        assert_eq!(config.data_dir, PathBuf::from("data"));
        assert!(!config.require_sign_in);
    }

    #[test]
    fn reads_overrides() {
        let config = Config::from_lookup(lookup_from(&[
            ("PORT", "9191"),
            ("APP_DATA_DIR", "/tmp/planner"),
            ("APP_REQUIRE_SIGN_IN", "Yes"),
        ]));
        assert_eq!(config.port, 9191);
        assert_eq!(config.data_dir, PathBuf::from("/tmp/planner"));
        assert!(config.require_sign_in);
    }

    #[test]
    fn unparsable_port_falls_back() {
        let config = Config::from_lookup(lookup_from(&[("PORT", "eighty")]));
        assert_eq!(config.port, 8080);
    }
}
