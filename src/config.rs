//! Runtime settings read from environment variables (a `.env` file is honored by the server binary).

use crate::error::ConfigError;
use crate::store::{ConcurrencyMode, ListFailurePolicy};
use std::str::FromStr;

pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:3000";
pub const DEFAULT_DATABASE_URL: &str = "sqlite://todos.db?mode=rwc";
pub const DEFAULT_MAX_CONNECTIONS: u32 = 5;
pub const DEFAULT_BODY_LIMIT: usize = 64 * 1024;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StoreKind {
    Relational,
    KeyValue,
}

impl FromStr for StoreKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "relational" | "sql" => Ok(StoreKind::Relational),
            "kv" | "key_value" => Ok(StoreKind::KeyValue),
            _ => Err(invalid("TODO_BACKEND", s, "relational or kv")),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum KvEngine {
    Sqlite,
    Memory,
}

impl FromStr for KvEngine {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "sqlite" => Ok(KvEngine::Sqlite),
            "memory" => Ok(KvEngine::Memory),
            _ => Err(invalid("TODO_KV_ENGINE", s, "sqlite or memory")),
        }
    }
}

impl FromStr for ListFailurePolicy {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "fail_soft" | "soft" => Ok(ListFailurePolicy::FailSoft),
            "fail_hard" | "hard" => Ok(ListFailurePolicy::FailHard),
            _ => Err(invalid("TODO_LIST_POLICY", s, "fail_soft or fail_hard")),
        }
    }
}

impl FromStr for ConcurrencyMode {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "last_writer_wins" | "lww" => Ok(ConcurrencyMode::LastWriterWins),
            "compare_and_swap" | "cas" => Ok(ConcurrencyMode::CompareAndSwap),
            _ => Err(invalid("TODO_CONCURRENCY", s, "last_writer_wins or compare_and_swap")),
        }
    }
}

fn invalid(var: &'static str, value: &str, expected: &'static str) -> ConfigError {
    ConfigError::Invalid {
        var,
        value: value.to_string(),
        expected,
    }
}

#[derive(Clone, Debug)]
pub struct Settings {
    pub bind_addr: String,
    pub database_url: String,
    pub store: StoreKind,
    pub kv_engine: KvEngine,
    /// Overrides the per-backend default when set.
    pub list_policy: Option<ListFailurePolicy>,
    pub concurrency: ConcurrencyMode,
    pub kv_verify_writes: bool,
    pub max_connections: u32,
    pub body_limit: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            bind_addr: DEFAULT_BIND_ADDR.into(),
            database_url: DEFAULT_DATABASE_URL.into(),
            store: StoreKind::Relational,
            kv_engine: KvEngine::Sqlite,
            list_policy: None,
            concurrency: ConcurrencyMode::LastWriterWins,
            kv_verify_writes: false,
            max_connections: DEFAULT_MAX_CONNECTIONS,
            body_limit: DEFAULT_BODY_LIMIT,
        }
    }
}

impl Settings {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build settings from any key lookup; unset keys fall back to defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut s = Settings::default();
        if let Some(v) = lookup("TODO_BIND_ADDR") {
            s.bind_addr = v;
        }
        if let Some(v) = lookup("DATABASE_URL") {
            s.database_url = v;
        }
        if let Some(v) = lookup("TODO_BACKEND") {
            s.store = v.parse()?;
        }
        if let Some(v) = lookup("TODO_KV_ENGINE") {
            s.kv_engine = v.parse()?;
        }
        if let Some(v) = lookup("TODO_LIST_POLICY") {
            s.list_policy = Some(v.parse()?);
        }
        if let Some(v) = lookup("TODO_CONCURRENCY") {
            s.concurrency = v.parse()?;
        }
        if let Some(v) = lookup("TODO_KV_VERIFY_WRITES") {
            s.kv_verify_writes = parse_bool("TODO_KV_VERIFY_WRITES", &v)?;
        }
        if let Some(v) = lookup("TODO_MAX_CONNECTIONS") {
            s.max_connections = v
                .trim()
                .parse::<u32>()
                .ok()
                .filter(|n| *n > 0)
                .ok_or_else(|| invalid("TODO_MAX_CONNECTIONS", &v, "positive integer"))?;
        }
        if let Some(v) = lookup("TODO_BODY_LIMIT") {
            s.body_limit = v
                .trim()
                .parse()
                .map_err(|_| invalid("TODO_BODY_LIMIT", &v, "byte count"))?;
        }
        Ok(s)
    }

    /// List policy in effect: explicit override, else relational swallows faults and kv propagates them.
    pub fn effective_list_policy(&self) -> ListFailurePolicy {
        self.list_policy.unwrap_or(match self.store {
            StoreKind::Relational => ListFailurePolicy::FailSoft,
            StoreKind::KeyValue => ListFailurePolicy::FailHard,
        })
    }
}

fn parse_bool(var: &'static str, v: &str) -> Result<bool, ConfigError> {
    match v.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(invalid(var, v, "boolean")),
    }
}
