use std::path::PathBuf;
use tracing::info;

/// Application configuration
/// In debug builds a `.env` file is loaded first; environment variables win
/// over built-in defaults in every build.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Config {
    /// Directory holding the local level and list stores
    pub library_path: Option<PathBuf>,
    /// Report a closed picker to the UI like any other failure
    pub notify_on_cancel: bool,
    /// Reveal or share the file after a successful export
    pub post_export_action: bool,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            library_path: None,
            notify_on_cancel: true,
            post_export_action: true,
        }
    }
}

impl Config {
    /// Load configuration based on build mode
    pub fn load() -> Self {
        #[cfg(debug_assertions)]
        {
            if dotenvy::dotenv().is_ok() {
                info!("Config: Dev mode activated - loaded .env file");
            } else {
                tracing::debug!("Config: No .env file found");
            }
        }

        Self::from_env()
    }

    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Config::default();

        let library_path = lookup("GMD_TRANSFER_LIBRARY_PATH")
            .filter(|v| !v.trim().is_empty())
            .map(PathBuf::from);

        let notify_on_cancel = lookup("GMD_TRANSFER_NOTIFY_ON_CANCEL")
            .and_then(|v| parse_flag(&v))
            .unwrap_or(defaults.notify_on_cancel);

        let post_export_action = lookup("GMD_TRANSFER_POST_EXPORT_ACTION")
            .and_then(|v| parse_flag(&v))
            .unwrap_or(defaults.post_export_action);

        if let Some(path) = &library_path {
            info!("Config: Library path: {}", path.display());
        }

        Self {
            library_path,
            notify_on_cancel,
            post_export_action,
        }
    }

    /// Get the library storage path
    pub fn get_library_path(&self) -> PathBuf {
        if let Some(path) = &self.library_path {
            return path.clone();
        }

        match dirs::home_dir() {
            Some(home_dir) => home_dir.join(".gmd-transfer"),
            None => PathBuf::from(".gmd-transfer"),
        }
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(vars: &[(&str, &str)]) -> Config {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults_without_env() {
        assert_eq!(config_from(&[]), Config::default());
    }

    #[test]
    fn test_env_overrides() {
        let config = config_from(&[
            ("GMD_TRANSFER_LIBRARY_PATH", "/srv/levels"),
            ("GMD_TRANSFER_NOTIFY_ON_CANCEL", "false"),
            ("GMD_TRANSFER_POST_EXPORT_ACTION", "0"),
        ]);

        assert_eq!(config.get_library_path(), PathBuf::from("/srv/levels"));
        assert!(!config.notify_on_cancel);
        assert!(!config.post_export_action);
    }

    #[test]
    fn test_unparseable_flag_keeps_default() {
        let config = config_from(&[("GMD_TRANSFER_NOTIFY_ON_CANCEL", "maybe")]);
        assert!(config.notify_on_cancel);
    }
}
