use serde::Deserialize;
use serde_json::{Map, Value};

#[derive(Debug, Default, Deserialize)]
pub struct Config {
	#[serde(default)]
	pub service: Service,
	#[serde(default)]
	pub storage: Storage,
	#[serde(default)]
	pub matcher: Matcher,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Service {
	pub http_bind: String,
	pub log_level: String,
}
impl Default for Service {
	fn default() -> Self {
		Self { http_bind: "127.0.0.1:3001".to_string(), log_level: "info".to_string() }
	}
}

#[derive(Debug, Default, Deserialize)]
pub struct Storage {
	#[serde(default)]
	pub postgres: Postgres,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Postgres {
	/// Required at startup; an empty DSN fails validation.
	pub dsn: String,
	pub pool_max_conns: u32,
}
impl Default for Postgres {
	fn default() -> Self {
		Self { dsn: String::new(), pool_max_conns: 10 }
	}
}

/// Connection settings for the external matching engine.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Matcher {
	pub api_base: String,
	pub path: String,
	/// Upper bound for one upstream call, connect and body included.
	pub timeout_ms: u64,
	pub default_headers: Map<String, Value>,
}
impl Default for Matcher {
	fn default() -> Self {
		Self {
			api_base: "http://localhost:8000".to_string(),
			path: "/predict".to_string(),
			timeout_ms: 10_000,
			default_headers: Map::new(),
		}
	}
}
