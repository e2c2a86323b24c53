use std::{
	collections::HashMap,
	env, fs,
	path::PathBuf,
	sync::atomic::{AtomicU64, Ordering},
	time::{SystemTime, UNIX_EPOCH},
};

use toml::Value;

use lyric_config::{Config, ENV_DATABASE_URL, ENV_LOG, ENV_MATCHER_URL, ENV_PORT, Error};

const SAMPLE_CONFIG_TOML: &str = include_str!("fixtures/sample_config.toml");

fn sample_with(section: &str, key: &str, value: Value) -> String {
	let mut root: Value = toml::from_str(SAMPLE_CONFIG_TOML).expect("Failed to parse sample config.");
	let mut table = root.as_table_mut().expect("Sample config must be a table.");

	for part in section.split('.') {
		table = table
			.get_mut(part)
			.and_then(Value::as_table_mut)
			.unwrap_or_else(|| panic!("Sample config must include [{section}]."));
	}

	table.insert(key.to_string(), value);

	toml::to_string(&root).expect("Failed to render sample config.")
}

fn write_temp_config(payload: &str) -> PathBuf {
	static COUNTER: AtomicU64 = AtomicU64::new(0);

	let nanos = SystemTime::now()
		.duration_since(UNIX_EPOCH)
		.expect("System time must be valid.")
		.as_nanos();
	let ordinal = COUNTER.fetch_add(1, Ordering::SeqCst);
	let pid = std::process::id();
	let mut path = env::temp_dir();

	path.push(format!("lyric_config_test_{nanos}_{pid}_{ordinal}.toml"));

	fs::write(&path, payload).expect("Failed to write test config.");

	path
}

fn parse(payload: &str) -> Config {
	toml::from_str(payload).expect("Failed to parse test config.")
}

fn no_env(_: &str) -> Option<String> {
	None
}

#[test]
fn sample_config_loads_and_normalizes() {
	let cfg = lyric_config::finish(parse(SAMPLE_CONFIG_TOML), no_env)
		.expect("Sample config must be valid.");

	assert_eq!(cfg.service.http_bind, "127.0.0.1:3001");
	assert_eq!(cfg.storage.postgres.pool_max_conns, 4);
	assert_eq!(cfg.matcher.api_base, "http://127.0.0.1:8000");
	assert_eq!(cfg.matcher.timeout_ms, 5_000);
	assert_eq!(cfg.matcher.default_headers["x-client"], "lyric-api");
}

#[test]
fn load_reads_file_from_disk() {
	let path = write_temp_config(SAMPLE_CONFIG_TOML);
	let result = lyric_config::load(&path);

	fs::remove_file(&path).expect("Failed to remove test config.");

	// The process environment may carry overrides; the file itself must parse and validate.
	let cfg = result.expect("Expected sample config to load.");

	assert!(!cfg.storage.postgres.dsn.is_empty());
}

#[test]
fn missing_file_reports_read_error() {
	let path = env::temp_dir().join("lyric_config_test_does_not_exist.toml");
	let err = lyric_config::load(&path).expect_err("Expected read error.");

	assert!(matches!(err, Error::ReadConfig { .. }), "Unexpected error: {err}");
}

#[test]
fn malformed_toml_reports_parse_error() {
	let path = write_temp_config("[service\nhttp_bind = ");
	let result = lyric_config::load(&path);

	fs::remove_file(&path).expect("Failed to remove test config.");

	let err = result.expect_err("Expected parse error.");

	assert!(matches!(err, Error::ParseConfig { .. }), "Unexpected error: {err}");
}

#[test]
fn missing_dsn_is_fatal() {
	let payload = sample_with("storage.postgres", "dsn", Value::String("  ".to_string()));
	let err = lyric_config::finish(parse(&payload), no_env).expect_err("Expected dsn error.");

	assert!(
		err.to_string().contains("storage.postgres.dsn must be non-empty."),
		"Unexpected error: {err}"
	);
}

#[test]
fn defaults_without_dsn_are_rejected() {
	let err = lyric_config::finish(Config::default(), no_env).expect_err("Expected dsn error.");

	assert!(err.to_string().contains(ENV_DATABASE_URL), "Unexpected error: {err}");
}

#[test]
fn timeout_must_be_positive() {
	let payload = sample_with("matcher", "timeout_ms", Value::Integer(0));
	let err = lyric_config::finish(parse(&payload), no_env).expect_err("Expected timeout error.");

	assert!(
		err.to_string().contains("matcher.timeout_ms must be greater than zero."),
		"Unexpected error: {err}"
	);
}

#[test]
fn api_base_requires_http_scheme() {
	let payload = sample_with("matcher", "api_base", Value::String("engine:8000".to_string()));
	let err = lyric_config::finish(parse(&payload), no_env).expect_err("Expected scheme error.");

	assert!(err.to_string().contains("matcher.api_base"), "Unexpected error: {err}");
}

#[test]
fn header_values_must_be_strings() {
	let mut cfg = parse(SAMPLE_CONFIG_TOML);

	cfg.matcher.default_headers.insert("x-retries".to_string(), serde_json::json!(3));

	let err = lyric_config::validate(&cfg).expect_err("Expected header error.");

	assert!(
		err.to_string().contains("matcher.default_headers.x-retries must be a string."),
		"Unexpected error: {err}"
	);
}

#[test]
fn environment_overrides_take_precedence() {
	let vars = HashMap::from([
		(ENV_DATABASE_URL, "postgres://env@db/lyric"),
		(ENV_MATCHER_URL, "http://matcher.internal:9000/"),
		(ENV_PORT, "8088"),
		(ENV_LOG, "debug"),
	]);
	let cfg = lyric_config::finish(parse(SAMPLE_CONFIG_TOML), |key| {
		vars.get(key).map(|value| value.to_string())
	})
	.expect("Overridden config must be valid.");

	assert_eq!(cfg.storage.postgres.dsn, "postgres://env@db/lyric");
	assert_eq!(cfg.matcher.api_base, "http://matcher.internal:9000");
	assert_eq!(cfg.service.http_bind, "127.0.0.1:8088");
	assert_eq!(cfg.service.log_level, "debug");
}

#[test]
fn env_only_config_is_valid_with_dsn() {
	let cfg = lyric_config::finish(Config::default(), |key| {
		(key == ENV_DATABASE_URL).then(|| "postgres://localhost/lyric".to_string())
	})
	.expect("Env-only config must be valid.");

	assert_eq!(cfg.service.http_bind, "127.0.0.1:3001");
	assert_eq!(cfg.matcher.path, "/predict");
	assert_eq!(cfg.matcher.timeout_ms, 10_000);
}

#[test]
fn invalid_port_override_is_rejected() {
	let err = lyric_config::finish(parse(SAMPLE_CONFIG_TOML), |key| {
		(key == ENV_PORT).then(|| "eighty".to_string())
	})
	.expect_err("Expected port override error.");

	assert!(
		matches!(err, Error::Override { variable: ENV_PORT, .. }),
		"Unexpected error: {err}"
	);
}
