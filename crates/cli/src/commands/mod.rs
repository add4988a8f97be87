pub mod ask;
pub mod catalog;
pub mod config;
pub mod search;

use katalog_core::config::{AppConfig, LoadOptions};
use katalog_core::{ApplicationError, CatalogProvider, JsonFileCatalog, SampleCatalog, SearchEngine};
use serde::Serialize;
use serde_json::{Map, Value};
use tracing::debug;

#[derive(Debug, Clone)]
pub struct CommandResult {
    pub exit_code: u8,
    pub output: String,
}

#[derive(Debug, Serialize)]
struct CommandOutcome {
    command: String,
    status: String,
    error_class: Option<String>,
    message: String,
    #[serde(flatten)]
    data: Map<String, Value>,
}

impl CommandResult {
    /// Success whose payload fields sit next to `command`/`status`/`message`.
    pub fn success_with(
        command: &str,
        message: impl Into<String>,
        data: Map<String, Value>,
    ) -> Self {
        let payload = CommandOutcome {
            command: command.to_string(),
            status: "ok".to_string(),
            error_class: None,
            message: message.into(),
            data,
        };
        Self { exit_code: 0, output: serialize_payload(payload) }
    }

    pub fn failure(
        command: &str,
        error_class: &str,
        message: impl Into<String>,
        exit_code: u8,
    ) -> Self {
        let payload = CommandOutcome {
            command: command.to_string(),
            status: "error".to_string(),
            error_class: Some(error_class.to_string()),
            message: message.into(),
            data: Map::new(),
        };
        Self { exit_code, output: serialize_payload(payload) }
    }

    pub fn from_error(command: &str, error: &ApplicationError) -> Self {
        Self::failure(command, error.error_class(), error.to_string(), error.exit_code())
    }
}

fn serialize_payload(payload: CommandOutcome) -> String {
    serde_json::to_string(&payload).unwrap_or_else(|error| {
        format!(
            "{{\"command\":\"unknown\",\"status\":\"error\",\"error_class\":\"serialization\",\"message\":\"{}\"}}",
            error.to_string().replace('\\', "\\\\").replace('"', "\\\"")
        )
    })
}

/// Flattens a serializable payload struct into top-level output fields.
pub(crate) fn payload_fields<T: Serialize>(payload: &T) -> Map<String, Value> {
    match serde_json::to_value(payload) {
        Ok(Value::Object(fields)) => fields,
        _ => Map::new(),
    }
}

/// Effective configuration plus a search engine over the configured catalog.
pub(crate) struct Session {
    pub config: AppConfig,
    pub engine: SearchEngine,
}

pub(crate) fn open_session(options: &LoadOptions) -> Result<Session, ApplicationError> {
    let config = AppConfig::load(options.clone())?;
    let catalog = match config.catalog.path.as_deref() {
        Some(path) => JsonFileCatalog::new(path).load_catalog()?,
        None => {
            debug!(event_name = "catalog.load.sample", "no catalog path configured, using sample");
            SampleCatalog.load_catalog()?
        }
    };

    Ok(Session { config, engine: SearchEngine::new(catalog) })
}

/// Missing limits use the configured default; zero or negative limits yield
/// an empty result.
pub fn resolve_limit(limit: Option<i64>, default: usize) -> usize {
    match limit {
        None => default,
        Some(limit) if limit <= 0 => 0,
        Some(limit) => usize::try_from(limit).unwrap_or(usize::MAX),
    }
}
