mod error;
mod types;

pub use error::{Error, Result};
pub use types::{Config, Matcher, Postgres, Service, Storage};

use std::{env, fs, net::SocketAddr, path::Path};

pub const ENV_DATABASE_URL: &str = "LYRIC_DATABASE_URL";
pub const ENV_MATCHER_URL: &str = "LYRIC_MATCHER_URL";
pub const ENV_PORT: &str = "LYRIC_PORT";
pub const ENV_LOG: &str = "LYRIC_LOG";

pub fn load(path: &Path) -> Result<Config> {
	let raw = fs::read_to_string(path)
		.map_err(|err| Error::ReadConfig { path: path.to_path_buf(), source: err })?;
	let cfg: Config = toml::from_str(&raw)
		.map_err(|err| Error::ParseConfig { path: path.to_path_buf(), source: err })?;

	finish(cfg, |key| env::var(key).ok())
}

/// Builds a config from defaults plus environment overrides, without a file.
pub fn load_from_env() -> Result<Config> {
	finish(Config::default(), |key| env::var(key).ok())
}

pub fn finish<F>(mut cfg: Config, lookup: F) -> Result<Config>
where
	F: Fn(&str) -> Option<String>,
{
	apply_overrides(&mut cfg, lookup)?;
	normalize(&mut cfg);
	validate(&cfg)?;

	Ok(cfg)
}

pub fn apply_overrides<F>(cfg: &mut Config, lookup: F) -> Result<()>
where
	F: Fn(&str) -> Option<String>,
{
	if let Some(dsn) = lookup(ENV_DATABASE_URL) {
		cfg.storage.postgres.dsn = dsn;
	}
	if let Some(url) = lookup(ENV_MATCHER_URL) {
		cfg.matcher.api_base = url;
	}
	if let Some(level) = lookup(ENV_LOG)
		&& !level.trim().is_empty()
	{
		cfg.service.log_level = level;
	}
	if let Some(raw) = lookup(ENV_PORT) {
		let port: u16 = raw.trim().parse().map_err(|_| Error::Override {
			variable: ENV_PORT,
			message: format!("{raw:?} is not a valid port."),
		})?;
		let mut addr: SocketAddr = cfg.service.http_bind.parse().map_err(|_| Error::Override {
			variable: ENV_PORT,
			message: "service.http_bind must be a socket address to apply a port.".to_string(),
		})?;

		addr.set_port(port);

		cfg.service.http_bind = addr.to_string();
	}

	Ok(())
}

pub fn validate(cfg: &Config) -> Result<()> {
	if cfg.storage.postgres.dsn.is_empty() {
		return Err(Error::Validation {
			message: format!(
				"storage.postgres.dsn must be non-empty. Set it in the config file or via {ENV_DATABASE_URL}."
			),
		});
	}
	if cfg.storage.postgres.pool_max_conns == 0 {
		return Err(Error::Validation {
			message: "storage.postgres.pool_max_conns must be greater than zero.".to_string(),
		});
	}
	if cfg.service.http_bind.parse::<SocketAddr>().is_err() {
		return Err(Error::Validation {
			message: "service.http_bind must be a socket address such as 127.0.0.1:3001."
				.to_string(),
		});
	}
	if !(cfg.matcher.api_base.starts_with("http://")
		|| cfg.matcher.api_base.starts_with("https://"))
	{
		return Err(Error::Validation {
			message: "matcher.api_base must start with http:// or https://.".to_string(),
		});
	}
	if !cfg.matcher.path.starts_with('/') {
		return Err(Error::Validation {
			message: "matcher.path must start with /.".to_string(),
		});
	}
	if cfg.matcher.timeout_ms == 0 {
		return Err(Error::Validation {
			message: "matcher.timeout_ms must be greater than zero.".to_string(),
		});
	}

	for (key, value) in &cfg.matcher.default_headers {
		if !value.is_string() {
			return Err(Error::Validation {
				message: format!("matcher.default_headers.{key} must be a string."),
			});
		}
	}

	Ok(())
}

fn normalize(cfg: &mut Config) {
	cfg.storage.postgres.dsn = cfg.storage.postgres.dsn.trim().to_string();
	cfg.matcher.api_base = cfg.matcher.api_base.trim().trim_end_matches('/').to_string();
	cfg.service.log_level = cfg.service.log_level.trim().to_string();
}
