use std::env;
use std::fs;
use std::path::Path;

use katalog_core::config::{resolve_config_path, AppConfig, LoadOptions};
use katalog_core::ApplicationError;
use serde::Serialize;
use toml::Value;

use crate::commands::{payload_fields, CommandResult};

#[derive(Debug, Serialize)]
struct ConfigEntry {
    key: &'static str,
    value: String,
    source: String,
}

#[derive(Debug, Serialize)]
struct ConfigPayload {
    config_file: Option<String>,
    entries: Vec<ConfigEntry>,
}

pub fn run(options: &LoadOptions) -> CommandResult {
    let config = match AppConfig::load(options.clone()) {
        Ok(config) => config,
        Err(error) => return CommandResult::from_error("config", &ApplicationError::from(error)),
    };

    let config_file_path = resolve_config_path(options.config_path.as_deref());
    let config_file_doc = load_config_file_doc(config_file_path.as_deref());
    let sources = SourceLookup {
        file_doc: config_file_doc.as_ref(),
        file_path: config_file_path.as_deref(),
    };

    let entries = vec![
        ConfigEntry {
            key: "catalog.path",
            value: config
                .catalog
                .path
                .as_deref()
                .map(|path| path.display().to_string())
                .unwrap_or_else(|| "<sample>".to_string()),
            source: sources.field_source(
                "catalog.path",
                &["KATALOG_CATALOG_PATH"],
                options.overrides.catalog_path.is_some().then_some("--catalog"),
            ),
        },
        ConfigEntry {
            key: "search.default_limit",
            value: config.search.default_limit.to_string(),
            source: sources.field_source(
                "search.default_limit",
                &["KATALOG_SEARCH_DEFAULT_LIMIT"],
                None,
            ),
        },
        ConfigEntry {
            key: "search.smart_limit",
            value: config.search.smart_limit.to_string(),
            source: sources.field_source(
                "search.smart_limit",
                &["KATALOG_SEARCH_SMART_LIMIT"],
                None,
            ),
        },
        ConfigEntry {
            key: "logging.level",
            value: config.logging.level.clone(),
            source: sources.field_source(
                "logging.level",
                &["KATALOG_LOGGING_LEVEL", "KATALOG_LOG_LEVEL"],
                options.overrides.log_level.is_some().then_some("--log-level"),
            ),
        },
        ConfigEntry {
            key: "logging.format",
            value: format!("{:?}", config.logging.format).to_lowercase(),
            source: sources.field_source(
                "logging.format",
                &["KATALOG_LOGGING_FORMAT", "KATALOG_LOG_FORMAT"],
                None,
            ),
        },
    ];

    let payload = ConfigPayload {
        config_file: config_file_path.map(|path| path.display().to_string()),
        entries,
    };
    CommandResult::success_with(
        "config",
        "effective config (source precedence: override > env > file > default)",
        payload_fields(&payload),
    )
}

struct SourceLookup<'a> {
    file_doc: Option<&'a Value>,
    file_path: Option<&'a Path>,
}

impl SourceLookup<'_> {
    fn field_source(
        &self,
        key_path: &str,
        env_keys: &[&str],
        override_flag: Option<&str>,
    ) -> String {
        if let Some(flag) = override_flag {
            return format!("override ({flag})");
        }

        // Blank values are ignored by the loader, so they are not a source either.
        let env_key = env_keys.iter().find(|key| {
            env::var(key).map(|value| !value.trim().is_empty()).unwrap_or(false)
        });
        if let Some(env_key) = env_key {
            return format!("env ({env_key})");
        }

        if let Some(doc) = self.file_doc {
            if contains_path(doc, key_path) {
                let file_path = self
                    .file_path
                    .map(|path| path.display().to_string())
                    .unwrap_or_else(|| "config file".to_string());
                return format!("file ({file_path})");
            }
        }

        "default".to_string()
    }
}

fn load_config_file_doc(path: Option<&Path>) -> Option<Value> {
    let path = path?;
    let raw = fs::read_to_string(path).ok()?;
    raw.parse::<Value>().ok()
}

fn contains_path(root: &Value, key_path: &str) -> bool {
    let mut current = root;
    for key in key_path.split('.') {
        let Some(next) = current.get(key) else {
            return false;
        };
        current = next;
    }
    true
}
