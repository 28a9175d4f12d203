//! Runtime configuration from environment variables.

use std::path::PathBuf;
use std::time::Duration;

#[derive(Clone, Debug)]
pub struct Config {
    /// `HOST`, default 0.0.0.0 so the app is reachable on a VPS.
    pub host: String,
    /// `PORT`, default 8080.
    pub port: u16,
    /// `DATA_FILE`, default tournament.json. Set it to an empty string to keep data in memory only.
    pub data_file: Option<PathBuf>,
    /// `STATIC_DIR`, default "static".
    pub static_dir: PathBuf,
    /// `ADMIN_PASSWORD`. Admin login is refused while unset.
    pub admin_password: Option<String>,
    /// `FLUSH_INTERVAL_SECS`, default 5.
    pub flush_interval: Duration,
    /// `COOKIE_SECURE=true` marks the admin session cookie HTTPS-only.
    pub secure_cookies: bool,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

const DEFAULT_DATA_FILE: &str = "tournament.json";
const DEFAULT_FLUSH_SECS: u64 = 5;

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup (tests pass a map instead of the process environment).
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let port = lookup("PORT")
            .and_then(|p| p.parse().ok())
            .unwrap_or_else(default_port);
        let data_file = match lookup("DATA_FILE") {
            Some(p) if p.trim().is_empty() => None,
            Some(p) => Some(PathBuf::from(p)),
            None => Some(PathBuf::from(DEFAULT_DATA_FILE)),
        };
        let flush_secs = lookup("FLUSH_INTERVAL_SECS")
            .and_then(|s| s.parse::<u64>().ok())
            .filter(|s| *s > 0)
            .unwrap_or(DEFAULT_FLUSH_SECS);
        Self {
            host: lookup("HOST").unwrap_or_else(default_host),
            port,
            data_file,
            static_dir: lookup("STATIC_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("static")),
            admin_password: lookup("ADMIN_PASSWORD").filter(|p| !p.is_empty()),
            flush_interval: Duration::from_secs(flush_secs),
            secure_cookies: lookup("COOKIE_SECURE").is_some_and(|v| v == "true" || v == "1"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(pairs: &[(&str, &str)]) -> Config {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|k| map.get(k).cloned())
    }

    #[test]
    fn defaults() {
        let c = config(&[]);
        assert_eq!(c.host, "0.0.0.0");
        assert_eq!(c.port, 8080);
        assert_eq!(c.data_file, Some(PathBuf::from("tournament.json")));
        assert_eq!(c.admin_password, None);
        assert_eq!(c.flush_interval, Duration::from_secs(5));
        assert!(!c.secure_cookies);
    }

    #[test]
    fn overrides_and_bad_values() {
        let c = config(&[
            ("PORT", "not-a-port"),
            ("DATA_FILE", ""),
            ("ADMIN_PASSWORD", "secret"),
            ("FLUSH_INTERVAL_SECS", "0"),
            ("COOKIE_SECURE", "true"),
        ]);
        assert!(c.secure_cookies);
        assert_eq!(c.port, 8080);
        assert_eq!(c.data_file, None);
        assert_eq!(c.admin_password.as_deref(), Some("secret"));
        assert_eq!(c.flush_interval, Duration::from_secs(5));
    }
}
