pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Failures outside the three classified match outcomes.
#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("Failed to build matcher request: {0}")]
	Request(#[from] reqwest::Error),
	#[error(transparent)]
	InvalidHeaderName(#[from] reqwest::header::InvalidHeaderName),
	#[error(transparent)]
	InvalidHeaderValue(#[from] reqwest::header::InvalidHeaderValue),
	#[error("{message}")]
	InvalidConfig { message: String },
	#[error("Matcher returned an invalid response: {message}")]
	InvalidResponse { message: String },
}
