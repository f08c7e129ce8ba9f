use anyhow::{Context, Result, bail};
use repoedit_runtime_config::{ApiSettings, CONFIG_FILE_NAME, RepoEditConfig};
use std::path::{Path, PathBuf};

/// Overrides the directory holding `repoedit.toml`.
pub const CONFIG_DIR_ENV: &str = "REPOEDIT_CONFIG_DIR";
/// Token used instead of the stored one; never written to disk.
pub const TOKEN_ENV: &str = "REPOEDIT_TOKEN";
/// Base URL used instead of `api.base_url`.
pub const API_URL_ENV: &str = "REPOEDIT_API_URL";

/// Get the config directory (platform config dir, or `$REPOEDIT_CONFIG_DIR`).
pub fn config_dir() -> Result<PathBuf> {
    if let Some(dir) = env_value(CONFIG_DIR_ENV) {
        return Ok(PathBuf::from(dir));
    }
    let dirs = directories::ProjectDirs::from("", "", "repoedit")
        .context("Could not determine config directory")?;
    Ok(dirs.config_dir().to_path_buf())
}

/// Canonical config file path.
pub fn config_path() -> Result<PathBuf> {
    Ok(config_dir()?.join(CONFIG_FILE_NAME))
}

/// Non-empty, trimmed environment value.
pub fn env_value(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Load config from `path`, returning defaults if the file does not exist.
pub fn load_config_from(path: &Path) -> Result<RepoEditConfig> {
    if !path.exists() {
        return Ok(RepoEditConfig::default());
    }
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config at {}", path.display()))?;
    toml::from_str(&content)
        .with_context(|| format!("Failed to parse config at {}", path.display()))
}

pub fn save_config_to(path: &Path, config: &RepoEditConfig) -> Result<()> {
    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create config dir at {}", dir.display()))?;
    }
    let content = toml::to_string_pretty(config).context("Failed to serialize config")?;
    std::fs::write(path, content)
        .with_context(|| format!("Failed to write config at {}", path.display()))?;
    Ok(())
}

/// Load the canonical config file.
pub fn load_config() -> Result<RepoEditConfig> {
    load_config_from(&config_path()?)
}

pub fn save_config(config: &RepoEditConfig) -> Result<()> {
    save_config_to(&config_path()?, config)
}

/// Transport settings with environment overrides applied.
pub fn effective_api_settings(config: &RepoEditConfig) -> ApiSettings {
    let mut api = config.api.clone();
    if let Some(url) = env_value(API_URL_ENV) {
        api.base_url = url;
    }
    api
}

/// Print current config. The token is never shown in full.
pub fn show_config() -> Result<()> {
    let config = load_config()?;
    let path = config_path()?;
    let api = effective_api_settings(&config);
    println!("Config file: {}", path.display());
    println!();
    println!("[api]");
    println!("  base_url             = {}", api.effective_base_url());
    println!("  connect_timeout_secs = {}", api.connect_timeout_secs);
    println!("  read_timeout_secs    = {}", api.read_timeout_secs);
    println!("  user_agent           = {}", api.user_agent);
    println!();
    println!("[credentials]");
    println!("  token = {}", crate::credentials::describe_token(&config));
    println!();
    println!("[editor]");
    println!(
        "  commit_message_template = {}",
        config.editor.commit_message_template
    );
    Ok(())
}

/// Update config with provided values.
pub fn set_config(api_url: Option<String>, timeout_secs: Option<u64>) -> Result<()> {
    let mut config = load_config()?;

    if let Some(url) = api_url {
        let url = url.trim().trim_end_matches('/').to_string();
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            bail!("api url must start with http:// or https:// (got `{url}`)");
        }
        config.api.base_url = url;
    }
    if let Some(secs) = timeout_secs {
        if secs == 0 {
            bail!("timeout must be at least 1 second");
        }
        config.api.connect_timeout_secs = secs;
        config.api.read_timeout_secs = secs;
    }

    save_config(&config)?;
    println!("Configuration updated.");
    show_config()
}
