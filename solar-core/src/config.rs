use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{convert::TryFrom, fmt, fs, path::PathBuf};

pub const DEFAULT_BASE_URL: &str = "https://power.larc.nasa.gov";

/// NASA POWER user community. Selects the parameter units and defaults the API applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Community {
    /// Renewable energy.
    #[default]
    Re,
    /// Agroclimatology.
    Ag,
    /// Sustainable buildings.
    Sb,
}

impl Community {
    pub fn as_str(&self) -> &'static str {
        match self {
            Community::Re => "RE",
            Community::Ag => "AG",
            Community::Sb => "SB",
        }
    }

    pub const fn all() -> &'static [Community] {
        &[Community::Re, Community::Ag, Community::Sb]
    }
}

impl fmt::Display for Community {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for Community {
    type Error = anyhow::Error;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim().to_uppercase().as_str() {
            "RE" => Ok(Community::Re),
            "AG" => Ok(Community::Ag),
            "SB" => Ok(Community::Sb),
            _ => Err(anyhow!("Unknown community '{value}'. Supported communities: RE, AG, SB.")),
        }
    }
}

/// Top-level configuration stored on disk.
///
/// Example TOML:
/// ```toml
/// community = "RE"
/// base_url = "https://power.larc.nasa.gov"
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Community code sent with every request; `RE` when unset.
    pub community: Option<String>,

    /// Provider root URL; the hourly point path is appended to it.
    pub base_url: Option<String>,
}

impl Config {
    /// Return the configured community as a strongly-typed value.
    pub fn community(&self) -> Result<Community> {
        match self.community.as_deref() {
            Some(s) => Community::try_from(s).context(
                "Invalid community in config file.\n\
                 Hint: run `solar configure` to pick one of: RE, AG, SB.",
            ),
            None => Ok(Community::default()),
        }
    }

    pub fn set_community(&mut self, community: Community) {
        self.community = Some(community.as_str().to_string());
    }

    pub fn base_url(&self) -> &str {
        self.base_url
            .as_deref()
            .map(|url| url.trim_end_matches('/'))
            .filter(|url| !url.is_empty())
            .unwrap_or(DEFAULT_BASE_URL)
    }

    pub fn set_base_url(&mut self, url: String) {
        let url = url.trim().trim_end_matches('/').to_string();
        self.base_url = if url.is_empty() || url == DEFAULT_BASE_URL { None } else { Some(url) };
    }

    /// Load config from disk, or return an empty default if it doesn't exist yet.
    pub fn load() -> Result<Self> {
        let path = Self::config_file_path()?;
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        Self::from_toml(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    pub fn from_toml(contents: &str) -> Result<Self> {
        let cfg: Config = toml::from_str(contents)?;
        cfg.community()?;
        Ok(cfg)
    }

    /// Save config to disk, creating parent directories as needed.
    pub fn save(&self) -> Result<PathBuf> {
        let path = Self::config_file_path()?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml =
            toml::to_string_pretty(self).context("Failed to serialize configuration to TOML")?;

        fs::write(&path, toml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(path)
    }

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("dev", "solar-task", "solar-cli")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn community_as_str_roundtrip() {
        for c in Community::all() {
            let parsed = Community::try_from(c.as_str()).expect("roundtrip should succeed");
            assert_eq!(*c, parsed);
        }
        assert_eq!(Community::try_from(" ag ").unwrap(), Community::Ag);
    }

    #[test]
    fn unknown_community_error() {
        let err = Community::try_from("XX").unwrap_err();
        assert!(err.to_string().contains("Unknown community"));
    }

    #[test]
    fn defaults_when_unset() {
        let cfg = Config::default();

        assert_eq!(cfg.community().unwrap(), Community::Re);
        assert_eq!(cfg.base_url(), DEFAULT_BASE_URL);
    }

    #[test]
    fn setters_normalize_values() {
        let mut cfg = Config::default();

        cfg.set_community(Community::Sb);
        cfg.set_base_url("http://localhost:8080/ ".to_string());
        assert_eq!(cfg.community().unwrap(), Community::Sb);
        assert_eq!(cfg.base_url(), "http://localhost:8080");

        cfg.set_base_url(DEFAULT_BASE_URL.to_string());
        assert!(cfg.base_url.is_none());
    }

    #[test]
    fn parses_toml_and_rejects_bad_community() {
        let cfg = Config::from_toml("community = \"ag\"\nbase_url = \"http://mirror\"\n").unwrap();
        assert_eq!(cfg.community().unwrap(), Community::Ag);
        assert_eq!(cfg.base_url(), "http://mirror");

        let err = Config::from_toml("community = \"moon\"\n").unwrap_err();
        assert!(format!("{err:#}").contains("Unknown community"));
    }

    #[test]
    fn toml_roundtrip_keeps_fields() {
        let mut cfg = Config::default();
        cfg.set_community(Community::Ag);

        let text = toml::to_string_pretty(&cfg).unwrap();
        let back = Config::from_toml(&text).unwrap();

        assert_eq!(back.community().unwrap(), Community::Ag);
        assert_eq!(back.base_url(), DEFAULT_BASE_URL);
    }
}
