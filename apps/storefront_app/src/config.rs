// apps/storefront_app/src/config.rs

use crate::errors::{AppError, Result};
use dotenvy::dotenv;
use std::env;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
  Text,
  Json,
}

impl FromStr for LogFormat {
  type Err = AppError;

  fn from_str(s: &str) -> Result<Self> {
    match s.to_ascii_lowercase().as_str() {
      "text" => Ok(LogFormat::Text),
      "json" => Ok(LogFormat::Json),
      other => Err(AppError::Config(format!("Invalid LOG_FORMAT '{}': expected 'text' or 'json'", other))),
    }
  }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
  pub server_host: String,
  pub server_port: u16,
  /// `None` runs against the in-memory store.
  pub database_url: Option<String>,
  pub db_max_connections: u32,
  pub run_migrations: bool,
  pub strict_status_transitions: bool,
  pub log_format: LogFormat,
}

impl Default for AppConfig {
  fn default() -> Self {
    Self {
      server_host: "127.0.0.1".to_string(),
      server_port: 8080,
      database_url: None,
      db_max_connections: 10,
      run_migrations: true,
      strict_status_transitions: false,
      log_format: LogFormat::Text,
    }
  }
}

impl AppConfig {
  /// Loads `.env` if present, then reads the process environment.
  pub fn from_env() -> Result<Self> {
    dotenv().ok();
    Self::from_lookup(|name| env::var(name).ok())
  }

  /// Builds the config from an arbitrary variable lookup; unset variables
  /// fall back to the defaults.
  pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
    let defaults = Self::default();

    let parsed = |name: &str| -> Option<String> { lookup(name).filter(|v| !v.trim().is_empty()) };

    fn parse_as<T: FromStr>(name: &str, raw: Option<String>, default: T) -> Result<T>
    where
      T::Err: std::fmt::Display,
    {
      match raw {
        Some(value) => value
          .trim()
          .parse::<T>()
          .map_err(|e| AppError::Config(format!("Invalid {}: {}", name, e))),
        None => Ok(default),
      }
    }

    let config = Self {
      server_host: parsed("SERVER_HOST").unwrap_or(defaults.server_host),
      server_port: parse_as("SERVER_PORT", parsed("SERVER_PORT"), defaults.server_port)?,
      database_url: parsed("DATABASE_URL"),
      db_max_connections: parse_as("DB_MAX_CONNECTIONS", parsed("DB_MAX_CONNECTIONS"), defaults.db_max_connections)?,
      run_migrations: parse_as("RUN_MIGRATIONS", parsed("RUN_MIGRATIONS"), defaults.run_migrations)?,
      strict_status_transitions: parse_as(
        "STRICT_STATUS_TRANSITIONS",
        parsed("STRICT_STATUS_TRANSITIONS"),
        defaults.strict_status_transitions,
      )?,
      log_format: match parsed("LOG_FORMAT") {
        Some(raw) => raw.parse()?,
        None => defaults.log_format,
      },
    };

    Ok(config)
  }

  pub fn bind_address(&self) -> String {
    format!("{}:{}", self.server_host, self.server_port)
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use std::collections::HashMap;

  fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let vars: HashMap<String, String> = pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
    move |name| vars.get(name).cloned()
  }

  #[test]
  fn empty_environment_yields_defaults() {
    let config = AppConfig::from_lookup(lookup_from(&[])).unwrap();
    assert_eq!(config.bind_address(), "127.0.0.1:8080");
    assert!(config.database_url.is_none());
    assert!(config.run_migrations);
    assert!(!config.strict_status_transitions);
    assert_eq!(config.log_format, LogFormat::Text);
  }

  #[test]
  fn reads_every_variable() {
    let config = AppConfig::from_lookup(lookup_from(&[
      ("SERVER_HOST", "0.0.0.0"),
      ("SERVER_PORT", "9000"),
      ("DATABASE_URL", "postgres://localhost/storefront"),
      ("DB_MAX_CONNECTIONS", "4"),
      ("RUN_MIGRATIONS", "false"),
      ("STRICT_STATUS_TRANSITIONS", "true"),
      ("LOG_FORMAT", "JSON"),
    ]))
    .unwrap();

    assert_eq!(config.bind_address(), "0.0.0.0:9000");
    assert_eq!(config.database_url.as_deref(), Some("postgres://localhost/storefront"));
    assert_eq!(config.db_max_connections, 4);
    assert!(!config.run_migrations);
    assert!(config.strict_status_transitions);
    assert_eq!(config.log_format, LogFormat::Json);
  }

  #[test]
  fn invalid_port_is_a_config_error() {
    let err = AppConfig::from_lookup(lookup_from(&[("SERVER_PORT", "eighty")])).unwrap_err();
    assert!(matches!(err, AppError::Config(ref m) if m.starts_with("Invalid SERVER_PORT")));
  }

  #[derive(Clone, Default)]
  struct Captured(std::sync::Arc<std::sync::Mutex<Vec<u8>>>);

  impl std::io::Write for Captured {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
      self.0.lock().unwrap().extend_from_slice(buf);
      Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
      Ok(())
    }
  }

  // Config is read before the subscriber exists, so it must not log.
  #[test]
  fn loading_config_emits_no_events() {
    let captured = Captured::default();
    let sink = captured.clone();
    let subscriber = tracing_subscriber::fmt()
      .with_max_level(tracing::Level::TRACE)
      .with_writer(move || sink.clone())
      .finish();

    tracing::subscriber::with_default(subscriber, || {
      AppConfig::from_lookup(lookup_from(&[("SERVER_PORT", "9000")])).unwrap();
    });
    assert!(captured.0.lock().unwrap().is_empty());
  }
}
