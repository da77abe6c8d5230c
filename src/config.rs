use std::env;
use std::sync::OnceLock;
use thiserror::Error;

/// Environment variables consulted, in order, for the MongoDB connection string.
pub const URI_VARIABLES: [&str; 2] = ["MONGODB_URI", "ANKIT_MONGO_URI"];

const DEFAULT_DATABASE: &str = "ankit_students_db";
const DEFAULT_COLLECTION: &str = "students";
const DEFAULT_PORT: u16 = 5000;

/// Errors encountered while loading configuration from environment variables.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Required environment variable was not provided.
    #[error("Missing environment variable: {0}")]
    MissingVariable(String),
    /// Environment variable contained a value that could not be parsed.
    #[error("Invalid value for environment variable: {0}")]
    InvalidValue(String),
}

/// Runtime configuration for the student registry.
#[derive(Debug, Clone)]
pub struct Config {
    /// MongoDB connection string. Never logged.
    pub mongodb_uri: String,
    /// Database holding the student collection.
    pub database_name: String,
    /// Collection storing one document per student.
    pub collection_name: String,
    /// Port the HTTP server binds on all interfaces.
    pub server_port: u16,
    /// How name fragments are turned into store patterns.
    pub name_search_mode: NameSearchMode,
    /// Answer `DELETE` on a missing student with 200 and an error body instead of 404.
    pub legacy_delete_status: bool,
}

/// Interpretation of the fragment passed to the name search.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum NameSearchMode {
    /// Escape pattern metacharacters so the fragment matches as plain text.
    #[default]
    Literal,
    /// Embed the fragment as-is, so pattern syntax in it is honoured.
    Raw,
}

impl Config {
    /// Load configuration from environment variables, performing validation along the way.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_source(|key| env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup.
    pub fn from_source<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let optional = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let mongodb_uri = URI_VARIABLES
            .iter()
            .find_map(|key| optional(*key))
            .ok_or_else(|| ConfigError::MissingVariable(URI_VARIABLES.join(" or ")))?;

        Ok(Self {
            mongodb_uri,
            database_name: optional("MONGODB_DATABASE")
                .unwrap_or_else(|| DEFAULT_DATABASE.to_string()),
            collection_name: optional("MONGODB_COLLECTION")
                .unwrap_or_else(|| DEFAULT_COLLECTION.to_string()),
            server_port: optional("SERVER_PORT")
                .map(|value| {
                    value
                        .trim()
                        .parse()
                        .map_err(|_| ConfigError::InvalidValue("SERVER_PORT".into()))
                })
                .transpose()?
                .unwrap_or(DEFAULT_PORT),
            name_search_mode: optional("NAME_SEARCH_MODE")
                .map(|value| {
                    value
                        .parse()
                        .map_err(|()| ConfigError::InvalidValue("NAME_SEARCH_MODE".into()))
                })
                .transpose()?
                .unwrap_or_default(),
            legacy_delete_status: optional("LEGACY_DELETE_STATUS")
                .map(|value| {
                    parse_flag(&value)
                        .ok_or_else(|| ConfigError::InvalidValue("LEGACY_DELETE_STATUS".into()))
                })
                .transpose()?
                .unwrap_or(true),
        })
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

impl std::str::FromStr for NameSearchMode {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "literal" => Ok(Self::Literal),
            "raw" => Ok(Self::Raw),
            _ => Err(()),
        }
    }
}

/// Global configuration cache populated during process start.
pub static CONFIG: OnceLock<Config> = OnceLock::new();

/// Load configuration from the environment and install it in the global cache.
pub fn init_config() -> Result<&'static Config, ConfigError> {
    dotenvy::dotenv().ok();
    let config = Config::from_env()?;
    tracing::debug!(
        database = %config.database_name,
        collection = %config.collection_name,
        server_port = config.server_port,
        name_search_mode = ?config.name_search_mode,
        legacy_delete_status = config.legacy_delete_status,
        "Loaded configuration"
    );
    Ok(CONFIG.get_or_init(|| config))
}
