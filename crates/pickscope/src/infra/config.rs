//! Configuration management utilities.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use dirs_next::config_dir;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::domain::model::Declarations;

static DEFAULT_CONFIG: Lazy<&'static str> =
    Lazy::new(|| include_str!("../../assets/default-config.toml"));
static WORKSPACE_CONFIG_DIR: &str = ".pickscope";
static CONFIG_FILE: &str = "config.toml";

/// Layered configuration loaded from defaults, user, workspace, and env.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub surface: SurfaceConfig,
    #[serde(default)]
    pub page: PageConfig,
    #[serde(default)]
    pub locale: LocaleConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Default attributes and styles of the overlay surface.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SurfaceConfig {
    #[serde(default = "SurfaceConfig::default_id")]
    pub id: String,
    #[serde(default = "SurfaceConfig::default_ignore_class")]
    pub ignore_class: String,
    #[serde(default = "SurfaceConfig::default_width")]
    pub width: u32,
    #[serde(default = "SurfaceConfig::default_z_index")]
    pub z_index: u64,
}

impl SurfaceConfig {
    fn default_id() -> String {
        "iframe-x2eRYVVQRsG9".to_owned()
    }

    fn default_ignore_class() -> String {
        "adg-ignore".into()
    }

    fn default_width() -> u32 {
        320
    }

    fn default_z_index() -> u64 {
        999_999_999_999
    }

    /// Attributes applied to the surface unless a mount overrides them.
    pub fn default_attributes(&self) -> Declarations {
        [
            ("class", self.ignore_class.clone()),
            ("frameBorder", "0".to_owned()),
            ("width", self.width.to_string()),
            ("height", "auto".to_owned()),
            ("allowTransparency", "true".to_owned()),
            ("id", self.id.clone()),
        ]
        .into_iter()
        .map(|(name, value)| (name.to_owned(), value))
        .collect()
    }

    /// Styles applied to the surface unless a mount overrides them.
    pub fn default_styles(&self) -> Declarations {
        [
            ("clip", "auto".to_owned()),
            ("z-index", self.z_index.to_string()),
        ]
        .into_iter()
        .map(|(name, value)| (name.to_owned(), value))
        .collect()
    }
}

impl Default for SurfaceConfig {
    fn default() -> Self {
        Self {
            id: Self::default_id(),
            ignore_class: Self::default_ignore_class(),
            width: Self::default_width(),
            z_index: Self::default_z_index(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageConfig {
    /// Location reported to the rule constructor when the page does not provide one.
    #[serde(default = "PageConfig::default_location")]
    pub location: String,
}

impl PageConfig {
    fn default_location() -> String {
        "https://example.org/".into()
    }
}

impl Default for PageConfig {
    fn default() -> Self {
        Self {
            location: Self::default_location(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocaleConfig {
    #[serde(default = "LocaleConfig::default_language")]
    pub language: String,
}

impl LocaleConfig {
    fn default_language() -> String {
        "en".into()
    }
}

impl Default for LocaleConfig {
    fn default() -> Self {
        Self {
            language: Self::default_language(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// `tracing` filter directive used when `RUST_LOG` is unset.
    #[serde(default = "LoggingConfig::default_filter")]
    pub filter: String,
}

impl LoggingConfig {
    fn default_filter() -> String {
        "warn".into()
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: Self::default_filter(),
        }
    }
}

/// Environment overrides for critical settings.
#[derive(Debug, Default, Clone)]
pub struct EnvOverrides {
    locale: Option<String>,
    location: Option<String>,
    log: Option<String>,
}

impl EnvOverrides {
    fn from_env() -> Self {
        Self {
            locale: env::var("PICKSCOPE_LOCALE").ok(),
            location: env::var("PICKSCOPE_LOCATION").ok(),
            log: env::var("PICKSCOPE_LOG").ok(),
        }
    }

    #[cfg(test)]
    fn for_tests(locale: &str, location: &str, log: &str) -> Self {
        Self {
            locale: Some(locale.to_owned()),
            location: Some(location.to_owned()),
            log: Some(log.to_owned()),
        }
    }
}

/// One config file. Only keys present in the file are set.
#[derive(Debug, Default, Deserialize)]
struct ConfigLayer {
    #[serde(default)]
    surface: SurfaceLayer,
    #[serde(default)]
    page: PageLayer,
    #[serde(default)]
    locale: LocaleLayer,
    #[serde(default)]
    logging: LoggingLayer,
}

#[derive(Debug, Default, Deserialize)]
struct SurfaceLayer {
    id: Option<String>,
    ignore_class: Option<String>,
    width: Option<u32>,
    z_index: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
struct PageLayer {
    location: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct LocaleLayer {
    language: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct LoggingLayer {
    filter: Option<String>,
}

impl ConfigLayer {
    fn from_file(path: &Path) -> Result<Self> {
        let data = fs::read_to_string(path)
            .with_context(|| format!("failed to read config file: {}", path.display()))?;
        toml::from_str(&data).with_context(|| format!("invalid config file: {}", path.display()))
    }
}

impl Config {
    /// Load configuration from defaults, user/global config, workspace config, and env overrides.
    pub fn load() -> Result<Self> {
        let env = EnvOverrides::from_env();
        let global = global_config_path();
        let workspace = workspace_config_path()?;
        Self::load_with_layers(global, workspace, env)
    }

    fn load_with_layers(
        global: Option<PathBuf>,
        workspace: Option<PathBuf>,
        env_overrides: EnvOverrides,
    ) -> Result<Self> {
        let mut config = Self::from_str(&DEFAULT_CONFIG)?;

        for path in [global, workspace].into_iter().flatten() {
            if path.exists() {
                config.apply(ConfigLayer::from_file(&path)?);
            }
        }

        Ok(apply_env_overrides(config, env_overrides))
    }

    fn from_str(contents: &str) -> Result<Self> {
        let config: Config =
            toml::from_str(contents).with_context(|| "failed to parse TOML config".to_string())?;
        Ok(config)
    }

    /// Later layers win for every key they set, including default values.
    fn apply(&mut self, layer: ConfigLayer) {
        let ConfigLayer {
            surface,
            page,
            locale,
            logging,
        } = layer;
        set(&mut self.surface.id, surface.id);
        set(&mut self.surface.ignore_class, surface.ignore_class);
        set(&mut self.surface.width, surface.width);
        set(&mut self.surface.z_index, surface.z_index);
        set(&mut self.page.location, page.location);
        set(&mut self.locale.language, locale.language);
        set(&mut self.logging.filter, logging.filter);
    }
}

fn set<T>(slot: &mut T, value: Option<T>) {
    if let Some(value) = value {
        *slot = value;
    }
}

fn global_config_path() -> Option<PathBuf> {
    config_dir().map(|base| base.join("pickscope").join(CONFIG_FILE))
}

fn workspace_config_path() -> Result<Option<PathBuf>> {
    let cwd = env::current_dir()?;
    let root = find_workspace_root(&cwd).unwrap_or(cwd);
    Ok(Some(root.join(WORKSPACE_CONFIG_DIR).join(CONFIG_FILE)))
}

fn find_workspace_root(start: &Path) -> Option<PathBuf> {
    start
        .ancestors()
        .find(|dir| dir.join(WORKSPACE_CONFIG_DIR).is_dir())
        .map(Path::to_path_buf)
}

fn apply_env_overrides(mut config: Config, env: EnvOverrides) -> Config {
    if let Some(locale) = env.locale {
        config.locale.language = locale;
    }
    if let Some(location) = env.location {
        config.page.location = location;
    }
    if let Some(log) = env.log {
        config.logging.filter = log;
    }
    config
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn load_uses_defaults_when_no_files() {
        let config = Config::load_with_layers(None, None, EnvOverrides::default())
            .expect("load default config");
        assert_eq!(config, Config::default());
        assert_eq!(config.surface.id, "iframe-x2eRYVVQRsG9");
    }

    #[test]
    fn merge_global_and_workspace() -> Result<()> {
        let temp = tempfile::tempdir()?;
        let global = temp.path().join("config.toml");
        fs::write(
            &global,
            r#"
[surface]
width = 280
[locale]
language = "de"
"#,
        )?;

        let workspace_dir = temp.path().join("site");
        fs::create_dir_all(workspace_dir.join(WORKSPACE_CONFIG_DIR))?;
        fs::write(
            workspace_dir.join(".pickscope/config.toml"),
            r#"
[surface]
ignore_class = "picker-ignore"
[page]
location = "https://news.example.org/"
"#,
        )?;

        let config = Config::load_with_layers(
            Some(global),
            Some(workspace_dir.join(".pickscope/config.toml")),
            EnvOverrides::default(),
        )?;

        assert_eq!(config.surface.width, 280);
        assert_eq!(config.surface.ignore_class, "picker-ignore");
        assert_eq!(config.locale.language, "de");
        assert_eq!(config.page.location, "https://news.example.org/");
        assert_eq!(config.surface.id, "iframe-x2eRYVVQRsG9");
        Ok(())
    }

    #[test]
    fn workspace_can_restore_default_value() -> Result<()> {
        let temp = tempfile::tempdir()?;
        let global = temp.path().join("config.toml");
        fs::write(
            &global,
            r#"
[surface]
width = 280
[locale]
language = "de"
"#,
        )?;
        let workspace = temp.path().join("workspace.toml");
        fs::write(
            &workspace,
            r#"
[surface]
width = 320
[locale]
language = "en"
"#,
        )?;

        let config =
            Config::load_with_layers(Some(global), Some(workspace), EnvOverrides::default())?;

        assert_eq!(config.locale.language, "en");
        assert_eq!(config.surface.width, 320);
        Ok(())
    }

    #[test]
    fn env_overrides_take_precedence() -> Result<()> {
        let overrides = EnvOverrides::for_tests("de", "https://shop.example.com/", "debug");
        let config = Config::load_with_layers(None, None, overrides)?;
        assert_eq!(config.locale.language, "de");
        assert_eq!(config.page.location, "https://shop.example.com/");
        assert_eq!(config.logging.filter, "debug");
        Ok(())
    }

    #[test]
    fn invalid_config_returns_error() -> Result<()> {
        let temp = tempfile::tempdir()?;
        let file = temp.path().join("broken.toml");
        fs::write(&file, "this is not toml")?;
        assert!(ConfigLayer::from_file(&file).is_err());
        Ok(())
    }

    #[test]
    fn finds_workspace_root_from_nested_directory() -> Result<()> {
        let temp = tempfile::tempdir()?;
        fs::create_dir_all(temp.path().join(WORKSPACE_CONFIG_DIR))?;
        let nested = temp.path().join("a/b");
        fs::create_dir_all(&nested)?;
        assert_eq!(
            find_workspace_root(&nested).as_deref(),
            Some(temp.path())
        );
        Ok(())
    }

    #[test]
    fn surface_defaults_cover_fixed_attribute_set() {
        let surface = SurfaceConfig::default();
        let attributes = surface.default_attributes();
        assert_eq!(attributes.get("class").map(String::as_str), Some("adg-ignore"));
        assert_eq!(attributes.get("height").map(String::as_str), Some("auto"));
        assert_eq!(attributes.len(), 6);
        assert_eq!(
            surface.default_styles().get("z-index").map(String::as_str),
            Some("999999999999")
        );
    }
}
