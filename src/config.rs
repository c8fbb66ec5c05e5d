//! Configuration for the zuzu catalog.
//!
//! Configuration sources (highest priority first):
//! 1. Environment variables (ZUZU_HOME, ZUZU_APP_ENV, CLOUDINARY_*)
//! 2. Config file (.zuzu/config.yaml)
//! 3. Defaults (~/.zuzu)
//!
//! Config file discovery:
//! - Searches current directory and parents for .zuzu/config.yaml
//! - Paths in config file are relative to the .zuzu/ directory
//!
//! API key and secret are read from the environment only.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::OnceLock;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::core::{CachePolicy, RetryPolicy, DEFAULT_VIDEOS_PER_CATEGORY};
use crate::domain::MarketingStats;

pub const ENV_HOME: &str = "ZUZU_HOME";
pub const ENV_APP_ENV: &str = "ZUZU_APP_ENV";
pub const ENV_CLOUD_NAME: &str = "CLOUDINARY_CLOUD_NAME";
pub const ENV_CLOUD_NAME_EXPO: &str = "EXPO_PUBLIC_CLOUDINARY_CLOUD_NAME";
pub const ENV_API_KEY: &str = "CLOUDINARY_API_KEY";
pub const ENV_API_SECRET: &str = "CLOUDINARY_API_SECRET";

/// File name of the persisted preferences
pub const PREFERENCES_FILE: &str = "zuzu-sports-storage.json";

/// Global cached configuration (stores Result to handle init errors)
static CONFIG: OnceLock<Result<ResolvedConfig, String>> = OnceLock::new();

/// Raw config file schema (matches YAML structure)
#[derive(Debug, Clone, Deserialize)]
pub struct ConfigFile {
    pub version: String,
    #[serde(default)]
    pub paths: PathsConfig,
    #[serde(default)]
    pub cloudinary: Option<CloudinaryFileConfig>,
    #[serde(default)]
    pub app: Option<AppFileConfig>,
    #[serde(default)]
    pub catalog: CatalogSettings,
    #[serde(default)]
    pub cache: CacheSettings,
    #[serde(default)]
    pub stats: MarketingStats,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PathsConfig {
    /// State directory (relative to .zuzu/)
    pub home: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CloudinaryFileConfig {
    pub cloud_name: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppFileConfig {
    pub environment: Option<AppEnvironment>,
}

/// Catalog limits
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogSettings {
    /// Page cap for the catalog search
    #[serde(default = "default_max_results")]
    pub max_results: u32,

    /// Size of the featured strip
    #[serde(default = "default_featured_count")]
    pub featured_count: u32,

    /// Videos kept per category card
    #[serde(default = "default_videos_per_category")]
    pub videos_per_category: usize,
}

fn default_max_results() -> u32 {
    crate::adapters::DEFAULT_MAX_RESULTS
}
fn default_featured_count() -> u32 {
    crate::adapters::cloudinary::FEATURED_COUNT
}
fn default_videos_per_category() -> usize {
    DEFAULT_VIDEOS_PER_CATEGORY
}

impl Default for CatalogSettings {
    fn default() -> Self {
        Self {
            max_results: default_max_results(),
            featured_count: default_featured_count(),
            videos_per_category: default_videos_per_category(),
        }
    }
}

/// Cache windows and retry policy
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheSettings {
    #[serde(default = "CachePolicy::videos")]
    pub videos: CachePolicy,

    #[serde(default = "CachePolicy::featured")]
    pub featured: CachePolicy,

    #[serde(default)]
    pub retry: RetryPolicy,
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            videos: CachePolicy::videos(),
            featured: CachePolicy::featured(),
            retry: RetryPolicy::default(),
        }
    }
}

/// Deployment environment
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AppEnvironment {
    #[default]
    Development,
    Staging,
    Production,
}

impl fmt::Display for AppEnvironment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppEnvironment::Development => write!(f, "development"),
            AppEnvironment::Staging => write!(f, "staging"),
            AppEnvironment::Production => write!(f, "production"),
        }
    }
}

impl FromStr for AppEnvironment {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "development" | "dev" => Ok(AppEnvironment::Development),
            "staging" => Ok(AppEnvironment::Staging),
            "production" | "prod" => Ok(AppEnvironment::Production),
            _ => anyhow::bail!("Unknown app environment: {}", s),
        }
    }
}

/// Feature switches derived from the environment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FeatureFlags {
    pub analytics: bool,
    pub crash_reporting: bool,
    pub debug_mode: bool,
}

impl FeatureFlags {
    pub fn for_environment(environment: AppEnvironment) -> Self {
        Self {
            analytics: environment == AppEnvironment::Production,
            crash_reporting: environment != AppEnvironment::Development,
            debug_mode: environment == AppEnvironment::Development,
        }
    }
}

/// Cloudinary account credentials
#[derive(Clone, Default, PartialEq, Eq)]
pub struct CloudinaryCredentials {
    pub cloud_name: String,
    pub api_key: String,
    pub api_secret: String,
}

impl fmt::Debug for CloudinaryCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CloudinaryCredentials")
            .field("cloud_name", &self.cloud_name)
            .field("api_key", &redact(&self.api_key))
            .field("api_secret", &redact(&self.api_secret))
            .finish()
    }
}

impl CloudinaryCredentials {
    /// Admin API root for this cloud
    pub fn base_url(&self) -> String {
        format!("https://api.cloudinary.com/v1_1/{}", self.cloud_name)
    }

    /// Names of the required variables that are unset
    pub fn missing_variables(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.cloud_name.is_empty() {
            missing.push(ENV_CLOUD_NAME);
        }
        if self.api_key.is_empty() {
            missing.push(ENV_API_KEY);
        }
        if self.api_secret.is_empty() {
            missing.push(ENV_API_SECRET);
        }
        missing
    }

    /// Fail with every missing variable listed
    pub fn validate(&self) -> Result<()> {
        let missing = self.missing_variables();
        if !missing.is_empty() {
            anyhow::bail!(
                "Missing required environment variables: {}",
                missing.join(", ")
            );
        }
        Ok(())
    }
}

fn redact(value: &str) -> &'static str {
    if value.is_empty() {
        "NOT_SET"
    } else {
        "***HIDDEN***"
    }
}

/// Resolved configuration with absolute paths
#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    /// State directory (preferences live here)
    pub home: PathBuf,
    /// Path to config file (if found)
    pub config_file: Option<PathBuf>,
    pub environment: AppEnvironment,
    pub features: FeatureFlags,
    pub cloudinary: CloudinaryCredentials,
    pub catalog: CatalogSettings,
    pub cache: CacheSettings,
    pub stats: MarketingStats,
}

/// Printable view of the configuration, secrets redacted
#[derive(Debug, Clone, Serialize)]
pub struct SafeConfig {
    pub home: PathBuf,
    pub config_file: Option<PathBuf>,
    pub environment: AppEnvironment,
    pub features: FeatureFlags,
    pub cloud_name: String,
    pub api_key: &'static str,
    pub api_secret: &'static str,
    pub catalog: CatalogSettings,
    pub cache: CacheSettings,
    pub stats: MarketingStats,
}

impl ResolvedConfig {
    /// Where persisted preferences are stored
    pub fn preferences_path(&self) -> PathBuf {
        self.home.join(PREFERENCES_FILE)
    }

    /// Configuration safe to print or log
    pub fn safe_summary(&self) -> SafeConfig {
        SafeConfig {
            home: self.home.clone(),
            config_file: self.config_file.clone(),
            environment: self.environment,
            features: self.features,
            cloud_name: self.cloudinary.cloud_name.clone(),
            api_key: redact(&self.cloudinary.api_key),
            api_secret: redact(&self.cloudinary.api_secret),
            catalog: self.catalog.clone(),
            cache: self.cache.clone(),
            stats: self.stats,
        }
    }
}

/// Find config file by searching current directory and parents
fn find_config_file() -> Option<PathBuf> {
    let mut current = std::env::current_dir().ok()?;

    loop {
        let config_path = current.join(".zuzu").join("config.yaml");
        if config_path.exists() {
            return Some(config_path);
        }

        if !current.pop() {
            break;
        }
    }

    None
}

/// Load and parse config file
fn load_config_file(path: &Path) -> Result<ConfigFile> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    serde_yaml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {}", path.display()))
}

/// Resolve a path that may be relative to the config file's parent
fn resolve_path(base: &Path, path_str: &str) -> PathBuf {
    let path = PathBuf::from(path_str);
    if path.is_absolute() {
        path
    } else {
        base.join(path)
            .canonicalize()
            .unwrap_or_else(|_| base.join(path_str))
    }
}

/// Resolve configuration from an environment lookup and an optional file
pub fn load_config_with<E>(env: E, config_file: Option<PathBuf>) -> Result<ResolvedConfig>
where
    E: Fn(&str) -> Option<String>,
{
    let var = |key: &str| env(key).filter(|v| !v.trim().is_empty());

    let file = match config_file {
        Some(ref path) => Some(load_config_file(path)?),
        None => None,
    };

    let home = if let Some(env_home) = var(ENV_HOME) {
        PathBuf::from(env_home)
    } else if let (Some(path), Some(home_path)) = (
        config_file.as_ref(),
        file.as_ref().and_then(|f| f.paths.home.as_ref()),
    ) {
        let zuzu_dir = path.parent().unwrap_or(Path::new("."));
        resolve_path(zuzu_dir, home_path)
    } else {
        dirs::home_dir()
            .context("Failed to determine home directory")?
            .join(".zuzu")
    };

    let environment = match var(ENV_APP_ENV) {
        Some(value) => value.parse::<AppEnvironment>()?,
        None => file
            .as_ref()
            .and_then(|f| f.app.as_ref())
            .and_then(|a| a.environment)
            .unwrap_or_default(),
    };

    let cloud_name = var(ENV_CLOUD_NAME)
        .or_else(|| var(ENV_CLOUD_NAME_EXPO))
        .or_else(|| {
            file.as_ref()
                .and_then(|f| f.cloudinary.as_ref())
                .and_then(|c| c.cloud_name.clone())
        })
        .unwrap_or_default();

    let cloudinary = CloudinaryCredentials {
        cloud_name,
        api_key: var(ENV_API_KEY).unwrap_or_default(),
        api_secret: var(ENV_API_SECRET).unwrap_or_default(),
    };

    let (catalog, cache, stats) = match file {
        Some(f) => (f.catalog, f.cache, f.stats),
        None => (
            CatalogSettings::default(),
            CacheSettings::default(),
            MarketingStats::default(),
        ),
    };

    Ok(ResolvedConfig {
        home,
        config_file,
        environment,
        features: FeatureFlags::for_environment(environment),
        cloudinary,
        catalog,
        cache,
        stats,
    })
}

/// Load configuration from all sources
fn load_config() -> Result<ResolvedConfig> {
    load_config_with(|key| std::env::var(key).ok(), find_config_file())
}

/// Get the global configuration (loads once, then cached)
pub fn config() -> Result<&'static ResolvedConfig> {
    let result = CONFIG.get_or_init(|| load_config().map_err(|e| e.to_string()));

    match result {
        Ok(config) => Ok(config),
        Err(e) => anyhow::bail!("{}", e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;
    use tempfile::TempDir;

    fn env_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_without_file_or_env() {
        let config = load_config_with(env_from(&[]), None).unwrap();

        let expected_home = dirs::home_dir().unwrap().join(".zuzu");
        assert_eq!(config.home, expected_home);
        assert_eq!(config.environment, AppEnvironment::Development);
        assert!(config.features.debug_mode);
        assert!(!config.features.analytics);
        assert_eq!(config.catalog, CatalogSettings::default());
        assert_eq!(config.stats.active_kids, 50_000);
        assert_eq!(
            config.preferences_path(),
            expected_home.join("zuzu-sports-storage.json")
        );
    }

    #[test]
    fn test_env_overrides() {
        let env = env_from(&[
            (ENV_HOME, "/tmp/zuzu-home"),
            (ENV_APP_ENV, "production"),
            (ENV_CLOUD_NAME_EXPO, "kids-cloud"),
            (ENV_API_KEY, "key"),
            (ENV_API_SECRET, "secret"),
        ]);
        let config = load_config_with(env, None).unwrap();

        assert_eq!(config.home, PathBuf::from("/tmp/zuzu-home"));
        assert_eq!(config.environment, AppEnvironment::Production);
        assert!(config.features.analytics);
        assert!(config.features.crash_reporting);
        assert_eq!(config.cloudinary.cloud_name, "kids-cloud");
        assert!(config.cloudinary.validate().is_ok());
        assert_eq!(
            config.cloudinary.base_url(),
            "https://api.cloudinary.com/v1_1/kids-cloud"
        );
    }

    #[test]
    fn test_invalid_environment_is_rejected() {
        let result = load_config_with(env_from(&[(ENV_APP_ENV, "qa")]), None);
        assert!(result.is_err());
    }

    #[test]
    fn test_missing_credentials_listed_together() {
        let credentials = CloudinaryCredentials {
            cloud_name: "demo".to_string(),
            ..Default::default()
        };
        let err = credentials.validate().unwrap_err().to_string();
        assert!(err.contains(ENV_API_KEY));
        assert!(err.contains(ENV_API_SECRET));
        assert!(!err.contains(ENV_CLOUD_NAME));
    }

    #[test]
    fn test_config_file_parsing() {
        let temp = TempDir::new().unwrap();
        let zuzu_dir = temp.path().join(".zuzu");
        std::fs::create_dir_all(&zuzu_dir).unwrap();

        let config_path = zuzu_dir.join("config.yaml");
        let mut file = std::fs::File::create(&config_path).unwrap();
        writeln!(
            file,
            r#"
version: "1.0"
paths:
  home: ./state
cloudinary:
  cloud_name: from-file
app:
  environment: staging
catalog:
  videos_per_category: 4
cache:
  retry:
    max_attempts: 2
stats:
  families: 12000
"#
        )
        .unwrap();

        let config = load_config_with(env_from(&[]), Some(config_path)).unwrap();
        assert_eq!(config.home, zuzu_dir.join("state"));
        assert_eq!(config.cloudinary.cloud_name, "from-file");
        assert_eq!(config.environment, AppEnvironment::Staging);
        assert_eq!(config.catalog.videos_per_category, 4);
        assert_eq!(config.catalog.max_results, 500);
        assert_eq!(config.cache.retry.max_attempts, 2);
        assert_eq!(config.cache.videos, CachePolicy::videos());
        assert_eq!(config.stats.families, 12_000);
        assert_eq!(config.stats.active_kids, 50_000);
    }

    #[test]
    fn test_safe_summary_redacts_secrets() {
        let env = env_from(&[(ENV_API_KEY, "abc123"), (ENV_CLOUD_NAME, "demo")]);
        let config = load_config_with(env, None).unwrap();
        let summary = serde_json::to_string(&config.safe_summary()).unwrap();

        assert!(!summary.contains("abc123"));
        assert!(summary.contains("***HIDDEN***"));
        assert!(summary.contains("NOT_SET"));
        assert!(!format!("{:?}", config.cloudinary).contains("abc123"));
    }

    #[test]
    fn test_resolve_relative_path() {
        let base = PathBuf::from("/home/user/project");

        assert_eq!(
            resolve_path(&base, "/absolute/path"),
            PathBuf::from("/absolute/path")
        );
        assert_eq!(
            resolve_path(&base, "./subdir"),
            PathBuf::from("/home/user/project/subdir")
        );
    }
}
