//! # Gallery configuration
//!
//! A small string key/value store in the `app.set()` / `app.get()` style.
//! Environment variables are mirrored into dotted keys by [`GalleryConfig::load_env`]:
//!
//! ```rust
//! use gallery_core::GalleryConfig;
//!
//! let vars = vec![
//!     ("STORAGE_ACCOUNT".to_string(), "acme".to_string()),
//!     ("HTTP_PORT".to_string(), "8080".to_string()),
//! ];
//! let config = GalleryConfig::new().load_vars(vars);
//!
//! assert_eq!(config.get("storage.account"), Some("acme"));
//! assert_eq!(config.get_u16("http.port"), Some(8080));
//! ```

use std::collections::HashMap;

use gallery_blob::StorageConfig;
use tracing::warn;

const DEFAULT_PORT: u16 = 3030;
const DEFAULT_MAX_FILE_MB: usize = 100;

/// Environment variable → config key
const ENV_KEYS: &[(&str, &str)] = &[
    ("STORAGE_ACCOUNT", "storage.account"),
    ("STORAGE_SAS", "storage.sas"),
    ("STORAGE_CONTAINER", "storage.container"),
    ("STORAGE_ENDPOINT", "storage.endpoint"),
    ("GALLERY_STORE", "storage.backend"),
    ("HTTP_HOST", "http.host"),
    ("HTTP_PORT", "http.port"),
    ("GALLERY_MAX_FILE_SIZE_MB", "upload.max_file_mb"),
    ("STATIC_DIR", "http.static_dir"),
];

/// Which storage backend the gallery talks to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    Azure,
    Memory,
}

#[derive(Debug, Default, Clone)]
pub struct GalleryConfig {
    values: HashMap<String, String>,
}

impl GalleryConfig {
    /// Create a config store holding only the defaults.
    pub fn new() -> Self {
        let mut config = Self {
            values: HashMap::new(),
        };
        config.set("http.host", "127.0.0.1");
        config.set("http.port", "3030");
        config.set("storage.backend", "azure");
        config.set("upload.max_file_mb", "100");
        config
    }

    /// Defaults overlaid with the process environment.
    pub fn load_env() -> Self {
        Self::new().load_vars(std::env::vars())
    }

    /// Overlay recognised variables from any `(name, value)` source.
    pub fn load_vars<I>(mut self, vars: I) -> Self
    where
        I: IntoIterator<Item = (String, String)>,
    {
        for (name, value) in vars {
            if let Some((_, key)) = ENV_KEYS.iter().find(|(env, _)| *env == name) {
                self.set(*key, value.trim());
            }
        }
        self
    }

    /// Set a configuration key to a string value.
    pub fn set<K, V>(&mut self, key: K, value: V)
    where
        K: Into<String>,
        V: Into<String>,
    {
        self.values.insert(key.into(), value.into());
    }

    /// Get a configuration value by key.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(|s| s.as_str())
    }

    pub fn get_or<'a>(&'a self, key: &str, default: &'a str) -> &'a str {
        self.get(key).unwrap_or(default)
    }

    pub fn get_usize(&self, key: &str) -> Option<usize> {
        self.get(key).and_then(|v| v.parse::<usize>().ok())
    }

    pub fn get_u16(&self, key: &str) -> Option<u16> {
        self.get(key).and_then(|v| v.parse::<u16>().ok())
    }

    /// `host:port` the HTTP server binds to; an unparsable port falls back to the default
    pub fn http_addr(&self) -> String {
        let port = self.get_u16("http.port").unwrap_or_else(|| {
            warn!(value = ?self.get("http.port"), "invalid HTTP_PORT; using {DEFAULT_PORT}");
            DEFAULT_PORT
        });
        format!("{}:{}", self.get_or("http.host", "127.0.0.1"), port)
    }

    /// Per-file upload limit in bytes.
    ///
    /// Values that do not parse, or do not fit in `usize` once scaled, fall back
    /// to the default.
    pub fn max_file_bytes(&self) -> usize {
        let megabytes = self.get_usize("upload.max_file_mb");
        match megabytes.and_then(|mb| mb.checked_mul(1024 * 1024)) {
            Some(bytes) => bytes,
            None => {
                warn!(
                    value = ?self.get("upload.max_file_mb"),
                    "invalid GALLERY_MAX_FILE_SIZE_MB; using {DEFAULT_MAX_FILE_MB} MB"
                );
                DEFAULT_MAX_FILE_MB * 1024 * 1024
            }
        }
    }

    pub fn backend(&self) -> StoreBackend {
        match self.get("storage.backend").map(|b| b.to_ascii_lowercase()) {
            Some(b) if b == "memory" => StoreBackend::Memory,
            _ => StoreBackend::Azure,
        }
    }

    /// Storage settings; empty values are passed through unvalidated.
    pub fn storage(&self) -> StorageConfig {
        let config = StorageConfig::new(
            self.get_or("storage.account", ""),
            self.get_or("storage.container", ""),
            self.get_or("storage.sas", ""),
        );
        match self.get("storage.endpoint").filter(|e| !e.is_empty()) {
            Some(endpoint) => config.with_endpoint(endpoint),
            None => config,
        }
    }
}
