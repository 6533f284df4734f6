use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use forno_core::config::{AppConfig, LoadOptions};
use toml::Value;

struct Field<'a> {
    key_path: &'a str,
    env_keys: &'a [&'a str],
    value: String,
}

pub fn run() -> String {
    let config = match AppConfig::load(LoadOptions::default()) {
        Ok(config) => config,
        Err(error) => return format!("config validation failed: {error}"),
    };

    let config_file_path = detect_config_path();
    let config_file_doc = load_config_file_doc(config_file_path.as_deref());

    let fields = [
        Field {
            key_path: "storage.backend",
            env_keys: &["FORNO_STORAGE_BACKEND"],
            value: format!("{:?}", config.storage.backend),
        },
        Field {
            key_path: "storage.path",
            env_keys: &["FORNO_STORAGE_PATH"],
            value: config.storage.path.display().to_string(),
        },
        Field {
            key_path: "server.bind_address",
            env_keys: &["FORNO_SERVER_BIND_ADDRESS"],
            value: config.server.bind_address.clone(),
        },
        Field {
            key_path: "server.port",
            env_keys: &["FORNO_SERVER_PORT"],
            value: config.server.port.to_string(),
        },
        Field {
            key_path: "tools.enabled",
            env_keys: &["FORNO_TOOLS_ENABLED"],
            value: config.tools.enabled.to_string(),
        },
        Field {
            key_path: "logging.level",
            env_keys: &["FORNO_LOGGING_LEVEL", "FORNO_LOG_LEVEL"],
            value: config.logging.level.clone(),
        },
        Field {
            key_path: "logging.format",
            env_keys: &["FORNO_LOGGING_FORMAT", "FORNO_LOG_FORMAT"],
            value: format!("{:?}", config.logging.format),
        },
    ];

    let mut lines = vec!["effective config (source precedence: env > file > default):".to_string()];
    for field in &fields {
        let source = field_source(
            field.key_path,
            field.env_keys,
            config_file_doc.as_ref(),
            config_file_path.as_deref(),
        );
        lines.push(render_line(field.key_path, &field.value, source));
    }

    lines.join("\n")
}

fn detect_config_path() -> Option<PathBuf> {
    let root = PathBuf::from("forno.toml");
    if root.exists() {
        return Some(root);
    }

    let nested = PathBuf::from("config/forno.toml");
    if nested.exists() {
        return Some(nested);
    }

    None
}

fn load_config_file_doc(path: Option<&Path>) -> Option<Value> {
    let path = path?;
    let raw = fs::read_to_string(path).ok()?;
    raw.parse::<Value>().ok()
}

fn field_source(
    key_path: &str,
    env_keys: &[&str],
    config_file_doc: Option<&Value>,
    config_file_path: Option<&Path>,
) -> String {
    if let Some(env_key) = env_keys.iter().find(|key| env::var_os(key).is_some()) {
        return format!("env ({env_key})");
    }

    if let Some(doc) = config_file_doc {
        if contains_path(doc, key_path) {
            let file_path = config_file_path
                .map(|path| path.display().to_string())
                .unwrap_or_else(|| "config file".to_string());
            return format!("file ({file_path})");
        }
    }

    "default".to_string()
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

fn render_line(key: &str, value: &str, source: String) -> String {
    format!("- {key} = {value} (source: {source})")
}
