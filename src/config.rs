use serde::Deserialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use directories::ProjectDirs;
use anyhow::{Context, Result};
use std::env;
use std::fs;
use crate::i18n::Locale;

#[derive(Deserialize, Debug, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub home_assistant: HomeAssistantConfig,
    #[serde(default)]
    pub slack: SlackConfig,
    #[serde(default)]
    pub shutdown: ShutdownConfig,
    #[serde(default)]
    pub translations: HashMap<String, HashMap<String, String>>,
}

#[derive(Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum EnvironmentSetting {
    #[default]
    Auto,
    Home,
    Work,
}

/// Which machine we are running on; picks the chat account and the shutdown blob.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum Environment {
    Home,
    Work,
}

impl Environment {
    pub fn as_str(self) -> &'static str {
        match self {
            Environment::Home => "home",
            Environment::Work => "work",
        }
    }
}

#[derive(Deserialize, Debug, Clone)]
pub struct GeneralConfig {
    #[serde(default)]
    pub environment: EnvironmentSetting,
    #[serde(default = "default_locale")]
    pub locale: Locale,
    #[serde(default = "default_queue_size")]
    pub queue_size: usize,
}

fn default_locale() -> Locale { Locale::Fr }
fn default_queue_size() -> usize { 8 }

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            environment: EnvironmentSetting::Auto,
            locale: default_locale(),
            queue_size: default_queue_size(),
        }
    }
}

#[derive(Deserialize, Debug, Clone, Default)]
pub struct HomeAssistantConfig {
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub token: String,
}

#[derive(Deserialize, Debug, Clone, Default)]
pub struct SlackConfig {
    #[serde(default)]
    pub token_home: String,
    #[serde(default)]
    pub token_work: String,
}

#[derive(Deserialize, Debug, Clone, Default)]
pub struct ShutdownConfig {
    #[serde(default)]
    pub home: String,
    #[serde(default)]
    pub work: String,
    #[serde(default)]
    pub warn_unparsed_lines: bool,
}

impl ShutdownConfig {
    pub fn commands_for(&self, environment: Environment) -> &str {
        match environment {
            Environment::Home => &self.home,
            Environment::Work => &self.work,
        }
    }
}

impl Config {
    /// Resolves `auto` the way the machine was told apart before: a home machine
    /// is not joined to a domain, so its name and its user domain are equal.
    pub fn environment(&self) -> Environment {
        match self.general.environment {
            EnvironmentSetting::Home => Environment::Home,
            EnvironmentSetting::Work => Environment::Work,
            EnvironmentSetting::Auto => {
                if env::var("COMPUTERNAME").ok() == env::var("USERDOMAIN").ok() {
                    Environment::Home
                } else {
                    Environment::Work
                }
            }
        }
    }
}

pub fn default_config_path() -> PathBuf {
    let proj_dirs = ProjectDirs::from("org", "scenedeck", "scenedeck");
    if let Some(dirs) = &proj_dirs {
        dirs.config_dir().join("config.toml")
    } else {
        PathBuf::from("config.toml")
    }
}

pub fn load_config(path: Option<&Path>) -> Result<Config> {
    let config_path = path.map(Path::to_path_buf).unwrap_or_else(default_config_path);

    if !config_path.exists() {
        log::info!("No config at {:?}, using defaults", config_path);
        return Ok(Config::default());
    }

    let content = fs::read_to_string(&config_path)
        .with_context(|| format!("reading {}", config_path.display()))?;
    let config = parse_config(&content)
        .with_context(|| format!("parsing {}", config_path.display()))?;
    log::info!("Loaded config from {:?}", config_path);
    Ok(config)
}

pub fn parse_config(content: &str) -> Result<Config> {
    let config: Config = toml::from_str(content)?;
    Ok(config)
}
