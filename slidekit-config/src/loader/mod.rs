pub mod error;

use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use slidekit_core::CarouselConfig;
use slidekit_core::config::ALL_DOTS;
use tracing::{debug, info, warn};

use crate::util::{non_blank, parse_bool, parse_csv};
use crate::validation::{ConfigWarnings, apply_guard_rails};
use error::ConfigLoadError;

pub const CONFIG_PATH_VAR: &str = "SLIDEKIT_CONFIG_PATH";
pub const CONFIG_JSON_VAR: &str = "SLIDEKIT_CONFIG_JSON";
pub const AUTOPLAY_VAR: &str = "SLIDEKIT_AUTOPLAY";
pub const DELAY_MS_VAR: &str = "SLIDEKIT_DELAY_MS";
pub const PAGINATION_DOTS_VAR: &str = "SLIDEKIT_PAGINATION_DOTS";
pub const PAUSE_ON_HOVER_VAR: &str = "SLIDEKIT_PAUSE_ON_HOVER";
pub const IMAGES_VAR: &str = "SLIDEKIT_IMAGES";

const DEFAULT_FILES: &[&str] = &[
    "slidekit.toml",
    "slidekit.json",
    "config/slidekit.toml",
    "config/slidekit.json",
];

/// Where the base document of a loaded config came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    Default,
    Explicit(PathBuf),
    EnvPath(PathBuf),
    EnvInline,
    File(PathBuf),
}

impl fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigSource::Default => f.write_str("built-in defaults"),
            ConfigSource::Explicit(path) => write!(f, "{}", path.display()),
            ConfigSource::EnvPath(path) => {
                write!(f, "{} (${CONFIG_PATH_VAR})", path.display())
            }
            ConfigSource::EnvInline => write!(f, "${CONFIG_JSON_VAR}"),
            ConfigSource::File(path) => write!(f, "{}", path.display()),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ConfigLoad {
    pub config: CarouselConfig,
    pub source: ConfigSource,
    pub warnings: ConfigWarnings,
    /// Env vars that replaced a value from the base document.
    pub overrides: Vec<&'static str>,
}

/// Resolves a [`CarouselConfig`] from files, the environment and defaults.
///
/// Evaluation order for the base document:
/// 1) an explicit path (`--config`),
/// 2) `$SLIDEKIT_CONFIG_PATH` (TOML or JSON file),
/// 3) `$SLIDEKIT_CONFIG_JSON` (inline JSON),
/// 4) the first default file found under the search root,
/// 5) built-in defaults.
///
/// Individual `SLIDEKIT_*` overrides are layered on top, then guard rails
/// run over the result.
#[derive(Debug, Clone, Default)]
pub struct ConfigLoader {
    explicit_path: Option<PathBuf>,
    env: HashMap<String, String>,
    search_root: Option<PathBuf>,
}

impl ConfigLoader {
    /// Loader with an empty environment snapshot.
    pub fn new() -> Self {
        Self::default()
    }

    /// Loader reading the current process environment.
    pub fn from_process_env() -> Self {
        Self {
            env: std::env::vars().collect(),
            ..Self::default()
        }
    }

    pub fn with_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.explicit_path = Some(path.into());
        self
    }

    pub fn with_optional_path(mut self, path: Option<PathBuf>) -> Self {
        self.explicit_path = path;
        self
    }

    pub fn with_env(mut self, env: HashMap<String, String>) -> Self {
        self.env = env;
        self
    }

    pub fn with_var(
        mut self,
        key: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        self.env.insert(key.into(), value.into());
        self
    }

    /// Directory the default files are looked up in. Defaults to the
    /// working directory.
    pub fn with_search_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.search_root = Some(root.into());
        self
    }

    pub fn load(&self) -> Result<ConfigLoad, ConfigLoadError> {
        let (mut config, source) = self.resolve_base()?;
        let overrides = apply_env_overrides(&mut config, &self.env)?;
        let warnings = apply_guard_rails(&config)?;

        for warning in warnings.iter() {
            match &warning.hint {
                Some(hint) => warn!(hint = %hint, "{}", warning.message),
                None => warn!("{}", warning.message),
            }
        }
        info!(
            source = %source,
            overrides = ?overrides,
            warnings = warnings.len(),
            "carousel config loaded"
        );

        Ok(ConfigLoad {
            config,
            source,
            warnings,
            overrides,
        })
    }

    fn resolve_base(
        &self,
    ) -> Result<(CarouselConfig, ConfigSource), ConfigLoadError> {
        if let Some(path) = &self.explicit_path {
            let config = load_from_file(path)?;
            return Ok((config, ConfigSource::Explicit(path.clone())));
        }

        if let Some(raw) = non_blank(&self.env, CONFIG_PATH_VAR) {
            let path = PathBuf::from(raw.trim());
            let config = load_from_file(&path)?;
            return Ok((config, ConfigSource::EnvPath(path)));
        }

        if let Some(raw) = non_blank(&self.env, CONFIG_JSON_VAR) {
            let config = parse_json(raw, CONFIG_JSON_VAR)?;
            return Ok((config, ConfigSource::EnvInline));
        }

        if let Some(path) = self.find_default_file() {
            let config = load_from_file(&path)?;
            return Ok((config, ConfigSource::File(path)));
        }

        debug!("no carousel config found; using defaults");
        Ok((CarouselConfig::default(), ConfigSource::Default))
    }

    fn find_default_file(&self) -> Option<PathBuf> {
        let root = self
            .search_root
            .clone()
            .unwrap_or_else(|| PathBuf::from("."));
        DEFAULT_FILES
            .iter()
            .map(|candidate| root.join(candidate))
            .find(|path| path.is_file())
    }
}

pub fn load_from_file(path: &Path) -> Result<CarouselConfig, ConfigLoadError> {
    let contents =
        fs::read_to_string(path).map_err(|source| ConfigLoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;
    let origin = path.display().to_string();

    match path.extension().and_then(|ext| ext.to_str()) {
        Some("json") => parse_json(&contents, &origin),
        Some("toml") | Some("tml") => parse_toml(&contents, &origin),
        _ => parse_from_str(&contents, &origin),
    }
}

/// Parse a document of unknown format, trying TOML first and then JSON.
pub fn parse_from_str(
    contents: &str,
    origin: &str,
) -> Result<CarouselConfig, ConfigLoadError> {
    toml::from_str(contents).or_else(|toml_err| {
        serde_json::from_str(contents).map_err(|json_err| {
            ConfigLoadError::Unrecognized {
                origin: origin.to_string(),
                toml: toml_err.to_string(),
                json: json_err.to_string(),
            }
        })
    })
}

pub fn parse_toml(
    contents: &str,
    origin: &str,
) -> Result<CarouselConfig, ConfigLoadError> {
    toml::from_str(contents).map_err(|source| ConfigLoadError::Toml {
        origin: origin.to_string(),
        source,
    })
}

pub fn parse_json(
    raw: &str,
    origin: &str,
) -> Result<CarouselConfig, ConfigLoadError> {
    serde_json::from_str(raw).map_err(|source| ConfigLoadError::Json {
        origin: origin.to_string(),
        source,
    })
}

/// Layer `SLIDEKIT_*` overrides onto `config`, returning the names of the
/// vars that were applied. Blank values are ignored.
pub fn apply_env_overrides(
    config: &mut CarouselConfig,
    env: &HashMap<String, String>,
) -> Result<Vec<&'static str>, ConfigLoadError> {
    let mut applied = Vec::new();

    if let Some(raw) = non_blank(env, AUTOPLAY_VAR) {
        config.autoplay = env_bool(AUTOPLAY_VAR, raw)?;
        applied.push(AUTOPLAY_VAR);
    }

    if let Some(raw) = non_blank(env, DELAY_MS_VAR) {
        config.delay_ms = raw.trim().parse::<u64>().map_err(|_| {
            ConfigLoadError::InvalidEnv {
                key: DELAY_MS_VAR,
                value: raw.to_string(),
                reason: "expected milliseconds as an unsigned integer",
            }
        })?;
        applied.push(DELAY_MS_VAR);
    }

    if let Some(raw) = non_blank(env, PAGINATION_DOTS_VAR) {
        config.pagination_dots = parse_dot_count(raw)?;
        applied.push(PAGINATION_DOTS_VAR);
    }

    if let Some(raw) = non_blank(env, PAUSE_ON_HOVER_VAR) {
        config.pause_on_pointer_over = env_bool(PAUSE_ON_HOVER_VAR, raw)?;
        applied.push(PAUSE_ON_HOVER_VAR);
    }

    if let Some(raw) = non_blank(env, IMAGES_VAR) {
        config.images = parse_csv(raw);
        applied.push(IMAGES_VAR);
    }

    if !applied.is_empty() {
        debug!(vars = ?applied, "applied carousel env overrides");
    }
    Ok(applied)
}

fn env_bool(key: &'static str, raw: &str) -> Result<bool, ConfigLoadError> {
    parse_bool(raw).ok_or_else(|| ConfigLoadError::InvalidEnv {
        key,
        value: raw.to_string(),
        reason: "expected one of 1/true/yes/on or 0/false/no/off",
    })
}

fn parse_dot_count(raw: &str) -> Result<Option<usize>, ConfigLoadError> {
    let trimmed = raw.trim();
    if trimmed.eq_ignore_ascii_case(ALL_DOTS) {
        return Ok(None);
    }
    trimmed.parse::<usize>().map(Some).map_err(|_| {
        ConfigLoadError::InvalidEnv {
            key: PAGINATION_DOTS_VAR,
            value: raw.to_string(),
            reason: "expected a dot count or \"all\"",
        }
    })
}
