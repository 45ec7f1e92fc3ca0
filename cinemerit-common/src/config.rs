//! Bootstrap configuration and root folder resolution
//!
//! Configuration is bootstrap-only: it is read once at startup and the
//! service must restart to pick up changes.
//!
//! Root folder priority order:
//! 1. Command-line argument (highest priority)
//! 2. `CINEMERIT_ROOT_FOLDER` environment variable
//! 3. `CINEMERIT_ROOT` environment variable
//! 4. `root_folder` key of the TOML config file
//! 5. OS-dependent compiled default (fallback)

use crate::{Error, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Primary environment variable naming the root folder
pub const ROOT_FOLDER_ENV: &str = "CINEMERIT_ROOT_FOLDER";

/// Alternative (shorter) root folder environment variable
pub const ROOT_ENV: &str = "CINEMERIT_ROOT";

/// Database file name inside the root folder
pub const DATABASE_FILE_NAME: &str = "cinemerit.db";

pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 8000;

/// Built-in defaults used when neither CLI, environment nor TOML say otherwise
#[derive(Debug, Clone)]
pub struct CompiledDefaults {
    pub root_folder: PathBuf,
}

impl CompiledDefaults {
    pub fn for_current_platform() -> Self {
        Self {
            root_folder: default_root_folder(),
        }
    }
}

fn default_root_folder() -> PathBuf {
    if cfg!(target_os = "linux") {
        // ~/.local/share/cinemerit
        dirs::data_local_dir()
            .map(|d| d.join("cinemerit"))
            .unwrap_or_else(|| PathBuf::from("/var/lib/cinemerit"))
    } else if cfg!(target_os = "macos") {
        // ~/Library/Application Support/cinemerit
        dirs::data_dir()
            .map(|d| d.join("cinemerit"))
            .unwrap_or_else(|| PathBuf::from("/Library/Application Support/cinemerit"))
    } else if cfg!(target_os = "windows") {
        // %LOCALAPPDATA%\cinemerit
        dirs::data_local_dir()
            .map(|d| d.join("cinemerit"))
            .unwrap_or_else(|| PathBuf::from("C:\\ProgramData\\cinemerit"))
    } else {
        PathBuf::from("./cinemerit_data")
    }
}

/// Bootstrap configuration loaded from TOML
///
/// Every field has a default, so an empty file is a valid configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TomlConfig {
    /// Root folder holding the database (optional)
    pub root_folder: Option<PathBuf>,

    /// Explicit database file, overriding `<root_folder>/cinemerit.db`
    pub database_path: Option<PathBuf>,

    /// Address the HTTP server binds to
    pub host: String,

    /// HTTP server port
    pub port: u16,

    pub logging: LoggingConfig,

    pub pagination: PaginationConfig,
}

impl Default for TomlConfig {
    fn default() -> Self {
        Self {
            root_folder: None,
            database_path: None,
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            logging: LoggingConfig::default(),
            pagination: PaginationConfig::default(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default tracing level when `RUST_LOG` is not set
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

/// Page sizes for the HTML listing pages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct PaginationConfig {
    /// Records per page on the home page (`GET /`)
    pub home_page_size: i64,

    /// Records per page on the catalog page (`GET /catalog/`)
    pub list_page_size: i64,

    /// Upper bound for the `page_size` query override
    pub max_page_size: i64,
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            home_page_size: 3,
            list_page_size: 4,
            max_page_size: 100,
        }
    }
}

impl PaginationConfig {
    /// All sizes must be positive and the defaults must fit under the cap
    pub fn validate(&self) -> Result<()> {
        for (key, value) in [
            ("home_page_size", self.home_page_size),
            ("list_page_size", self.list_page_size),
            ("max_page_size", self.max_page_size),
        ] {
            if value < 1 {
                return Err(Error::Config(format!(
                    "pagination.{} must be at least 1 (got {})",
                    key, value
                )));
            }
        }
        if self.list_page_size > self.max_page_size {
            return Err(Error::Config(format!(
                "pagination.list_page_size ({}) exceeds pagination.max_page_size ({})",
                self.list_page_size, self.max_page_size
            )));
        }
        Ok(())
    }
}

/// Default config file location: `<config_dir>/cinemerit/config.toml`
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("cinemerit").join("config.toml"))
}

/// Parse a TOML config file
pub fn load_toml_config(path: &Path) -> Result<TomlConfig> {
    let content = std::fs::read_to_string(path)?;
    let config: TomlConfig = toml::from_str(&content)
        .map_err(|e| Error::Config(format!("Failed to parse {}: {}", path.display(), e)))?;
    config.pagination.validate()?;
    Ok(config)
}

/// Load configuration, falling back to defaults when the file is missing
///
/// A missing file is not an error: a warning is logged and built-in
/// defaults are used. A file that exists but does not parse is an error.
pub fn load_config_or_default(path: Option<&Path>) -> Result<TomlConfig> {
    let path = match path.map(Path::to_path_buf).or_else(default_config_path) {
        Some(path) => path,
        None => {
            warn!("Could not determine config directory, using built-in defaults");
            return Ok(TomlConfig::default());
        }
    };

    if !path.exists() {
        warn!(
            "Config file not found at {}, using built-in defaults",
            path.display()
        );
        return Ok(TomlConfig::default());
    }

    info!("Loading configuration from {}", path.display());
    load_toml_config(&path)
}

/// Resolves the root folder following the documented priority order
#[derive(Debug, Clone)]
pub struct RootFolderResolver {
    module_name: String,
    cli_arg: Option<PathBuf>,
    toml_root: Option<PathBuf>,
}

impl RootFolderResolver {
    pub fn new(module_name: &str) -> Self {
        Self {
            module_name: module_name.to_string(),
            cli_arg: None,
            toml_root: None,
        }
    }

    pub fn with_cli_arg(mut self, path: Option<PathBuf>) -> Self {
        self.cli_arg = path;
        self
    }

    pub fn with_toml_root(mut self, path: Option<PathBuf>) -> Self {
        self.toml_root = path;
        self
    }

    pub fn resolve(&self) -> PathBuf {
        if let Some(path) = &self.cli_arg {
            info!("{}: root folder from command line: {}", self.module_name, path.display());
            return path.clone();
        }

        for var in [ROOT_FOLDER_ENV, ROOT_ENV] {
            if let Ok(value) = std::env::var(var) {
                if !value.is_empty() {
                    info!("{}: root folder from {}: {}", self.module_name, var, value);
                    return PathBuf::from(value);
                }
            }
        }

        if let Some(path) = &self.toml_root {
            info!("{}: root folder from config file: {}", self.module_name, path.display());
            return path.clone();
        }

        let path = CompiledDefaults::for_current_platform().root_folder;
        info!("{}: root folder from compiled default: {}", self.module_name, path.display());
        path
    }
}

/// Prepares the resolved root folder for use
#[derive(Debug, Clone)]
pub struct RootFolderInitializer {
    root_folder: PathBuf,
}

impl RootFolderInitializer {
    pub fn new(root_folder: PathBuf) -> Self {
        Self { root_folder }
    }

    /// Create the root folder (and parents) if missing
    pub fn ensure_directory_exists(&self) -> Result<()> {
        if !self.root_folder.exists() {
            std::fs::create_dir_all(&self.root_folder)?;
            info!("Created root folder: {}", self.root_folder.display());
        }
        Ok(())
    }

    pub fn database_path(&self) -> PathBuf {
        self.root_folder.join(DATABASE_FILE_NAME)
    }

    pub fn database_exists(&self) -> bool {
        self.database_path().exists()
    }
}
