use std::path::{Path, PathBuf};

use serde::Deserialize;
use url::Url;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ConfigPathError {
    MissingHomeDirectory,
}

const APP_DIR: &str = "stagecast";
const APP_CONFIG_FILE: &str = "config.json";

const DEFAULT_API_BASE: &str = "http://localhost:8000/api";
const DEFAULT_PLAYBACK_BASE: &str = "http://localhost:8000";

const API_BASE_ENV: &str = "STAGECAST_API_BASE";
const PLAYBACK_BASE_ENV: &str = "STAGECAST_PLAYBACK_BASE";

/// Optional settings from `config.json`.
#[derive(Debug, Clone, Default, Deserialize)]
struct ConfigFile {
    #[serde(default)]
    api_base: Option<Url>,
    #[serde(default)]
    playback_base: Option<Url>,
    #[serde(default)]
    autoplay: Option<bool>,
}

/// Resolved engine settings: where the two collaborators live and whether
/// playback attaches with autoplay.
#[derive(Debug, Clone, PartialEq)]
pub struct EngineConfig {
    /// Base address of the persistence collaborator's API.
    pub api_base: Url,
    /// Base address relative playable paths resolve against.
    pub playback_base: Url,
    pub autoplay: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            api_base: Url::parse(DEFAULT_API_BASE).expect("default api base is a valid url"),
            playback_base: Url::parse(DEFAULT_PLAYBACK_BASE)
                .expect("default playback base is a valid url"),
            autoplay: true,
        }
    }
}

/// Load settings from the config file, then apply environment overrides.
/// Anything missing or unparsable falls back to defaults.
pub fn load() -> EngineConfig {
    let contents = read_config_file();
    load_with(
        contents.as_deref(),
        std::env::var(API_BASE_ENV).ok().as_deref(),
        std::env::var(PLAYBACK_BASE_ENV).ok().as_deref(),
    )
}

fn read_config_file() -> Option<String> {
    let (xdg_config_home, home) = config_env_dirs();
    let path = app_config_path(
        APP_DIR,
        APP_CONFIG_FILE,
        xdg_config_home.as_deref(),
        home.as_deref(),
    )
    .ok()?;
    if !path.exists() {
        return None;
    }
    match std::fs::read_to_string(&path) {
        Ok(contents) => Some(contents),
        Err(err) => {
            tracing::warn!(?err, ?path, "failed to read config.json; using defaults");
            None
        }
    }
}

fn load_with(
    contents: Option<&str>,
    api_base_env: Option<&str>,
    playback_base_env: Option<&str>,
) -> EngineConfig {
    let file = contents
        .map(|contents| {
            serde_json::from_str::<ConfigFile>(contents).unwrap_or_else(|err| {
                tracing::warn!(?err, "failed to parse config.json; using defaults");
                ConfigFile::default()
            })
        })
        .unwrap_or_default();

    let mut config = EngineConfig::default();
    if let Some(api_base) = file.api_base {
        config.api_base = api_base;
    }
    if let Some(playback_base) = file.playback_base {
        config.playback_base = playback_base;
    }
    if let Some(autoplay) = file.autoplay {
        config.autoplay = autoplay;
    }

    if let Some(value) = api_base_env {
        match Url::parse(value) {
            Ok(url) => config.api_base = url,
            Err(err) => tracing::warn!(?err, value, "ignoring invalid {API_BASE_ENV}"),
        }
    }
    if let Some(value) = playback_base_env {
        match Url::parse(value) {
            Ok(url) => config.playback_base = url,
            Err(err) => tracing::warn!(?err, value, "ignoring invalid {PLAYBACK_BASE_ENV}"),
        }
    }

    config
}

fn config_env_dirs() -> (Option<PathBuf>, Option<PathBuf>) {
    (
        std::env::var_os("XDG_CONFIG_HOME").map(PathBuf::from),
        std::env::var_os("HOME").map(PathBuf::from),
    )
}

fn app_config_path(
    app_dir: &str,
    file_name: &str,
    xdg_config_home: Option<&Path>,
    home: Option<&Path>,
) -> Result<PathBuf, ConfigPathError> {
    let mut path = config_root(xdg_config_home, home)?;
    path.push(app_dir);
    path.push(file_name);
    Ok(path)
}

fn config_root(
    xdg_config_home: Option<&Path>,
    home: Option<&Path>,
) -> Result<PathBuf, ConfigPathError> {
    if let Some(xdg) = xdg_config_home.filter(|path| !path.as_os_str().is_empty()) {
        return Ok(xdg.to_path_buf());
    }

    let home = home.ok_or(ConfigPathError::MissingHomeDirectory)?;
    Ok(home.join(".config"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_point_at_the_local_collaborators() {
        let config = load_with(None, None, None);
        assert_eq!(config.api_base.as_str(), "http://localhost:8000/api");
        assert_eq!(config.playback_base.as_str(), "http://localhost:8000/");
        assert!(config.autoplay);
    }

    #[test]
    fn config_file_fields_override_defaults() {
        let contents = r#"{
            "api_base": "https://overlays.example.com/api",
            "autoplay": false
        }"#;
        let config = load_with(Some(contents), None, None);
        assert_eq!(config.api_base.as_str(), "https://overlays.example.com/api");
        assert_eq!(config.playback_base.as_str(), "http://localhost:8000/");
        assert!(!config.autoplay);
    }

    #[test]
    fn environment_overrides_beat_the_config_file() {
        let contents = r#"{"api_base": "https://overlays.example.com/api"}"#;
        let config = load_with(
            Some(contents),
            Some("https://staging.example.com/api"),
            Some("https://cdn.example.com"),
        );
        assert_eq!(config.api_base.as_str(), "https://staging.example.com/api");
        assert_eq!(config.playback_base.as_str(), "https://cdn.example.com/");
    }

    #[test]
    fn unparsable_file_and_env_fall_back_to_defaults() {
        let config = load_with(Some("{not json"), Some("::not a url::"), None);
        assert_eq!(config, EngineConfig::default());
    }

    #[test]
    fn app_config_path_prefers_xdg_config_home() {
        let path = app_config_path(
            "stagecast",
            "config.json",
            Some(Path::new("/tmp/config-root")),
            Some(Path::new("/tmp/home")),
        )
        .expect("path should resolve");

        assert_eq!(path, PathBuf::from("/tmp/config-root/stagecast/config.json"));
    }

    #[test]
    fn app_config_path_falls_back_to_home_dot_config() {
        let path = app_config_path("stagecast", "config.json", None, Some(Path::new("/tmp/home")))
            .expect("path should resolve");

        assert_eq!(path, PathBuf::from("/tmp/home/.config/stagecast/config.json"));
    }

    #[test]
    fn app_config_path_errors_when_home_missing_and_xdg_unset() {
        let error = app_config_path("stagecast", "config.json", None, None).unwrap_err();
        assert_eq!(error, ConfigPathError::MissingHomeDirectory);
    }
}
