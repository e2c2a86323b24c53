//! Client for the external lyric matching engine.
//!
//! The engine is opaque: it accepts lyric text and answers with a song, an artist, and a
//! confidence score, or with an error status. Every call resolves to one [`MatchOutcome`], or to
//! an [`Error`] when the engine breaks its own response contract.

pub mod client;

mod error;

pub use client::MatcherClient;
pub use error::{Error, Result};

use reqwest::header::{HeaderMap, HeaderName};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SongMatch {
	pub song: String,
	pub artist: String,
	pub confidence: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub enum MatchOutcome {
	Matched(SongMatch),
	/// The engine could not be reached in time.
	Unavailable { message: String },
	/// The engine answered with an error status.
	Rejected { status: u16, message: String },
}

pub fn default_headers(extra: &Map<String, Value>) -> Result<HeaderMap> {
	let mut headers = HeaderMap::new();

	for (key, value) in extra {
		let Some(raw) = value.as_str() else {
			return Err(Error::InvalidConfig {
				message: format!("Default header {key} must be a string."),
			});
		};

		headers.insert(HeaderName::from_bytes(key.as_bytes())?, raw.parse()?);
	}

	Ok(headers)
}
