use std::time::Duration;

use reqwest::Client;
use serde_json::Value;

use crate::{Error, MatchOutcome, Result, SongMatch};

const REJECTED_FALLBACK: &str = "ML service error";

#[derive(Debug, Clone)]
pub struct MatcherClient {
	client: Client,
	url: String,
}
impl MatcherClient {
	pub fn new(cfg: &lyric_config::Matcher) -> Result<Self> {
		let client = Client::builder()
			.timeout(Duration::from_millis(cfg.timeout_ms))
			.default_headers(crate::default_headers(&cfg.default_headers)?)
			.build()?;
		let url = format!("{}{}", cfg.api_base, cfg.path);

		Ok(Self { client, url })
	}

	/// Sends one request to the engine. No retries.
	pub async fn match_lyrics(&self, lyrics: &str) -> Result<MatchOutcome> {
		let body = serde_json::json!({ "lyrics": lyrics });
		let res = match self.client.post(&self.url).json(&body).send().await {
			Ok(res) => res,
			Err(err) if err.is_builder() => return Err(Error::Request(err)),
			Err(err) => return Ok(unavailable(&err)),
		};
		let status = res.status();

		if !status.is_success() {
			let message = match res.json::<Value>().await {
				Ok(json) => rejection_message(&json),
				Err(_) => REJECTED_FALLBACK.to_string(),
			};

			tracing::warn!(status = status.as_u16(), %message, "Matcher rejected the request.");

			return Ok(MatchOutcome::Rejected { status: status.as_u16(), message });
		}

		let json: Value = match res.json().await {
			Ok(json) => json,
			Err(err) if err.is_timeout() || err.is_body() => return Ok(unavailable(&err)),
			Err(err) =>
				return Err(Error::InvalidResponse {
					message: format!("body is not JSON ({status}): {err}"),
				}),
		};

		parse_match_response(json).map(MatchOutcome::Matched)
	}
}

fn unavailable(err: &reqwest::Error) -> MatchOutcome {
	tracing::warn!(error = %err, "Matcher is unreachable.");

	let message = if err.is_timeout() {
		"Matching engine timed out."
	} else {
		"Matching engine is unreachable."
	};

	MatchOutcome::Unavailable { message: message.to_string() }
}

fn rejection_message(json: &Value) -> String {
	json.get("detail")
		.or_else(|| json.get("error"))
		.and_then(Value::as_str)
		.map(str::trim)
		.filter(|message| !message.is_empty())
		.unwrap_or(REJECTED_FALLBACK)
		.to_string()
}

fn parse_match_response(json: Value) -> Result<SongMatch> {
	let song = required_text(&json, "song")?;
	let artist = required_text(&json, "artist")?;
	let confidence = json.get("confidence").and_then(Value::as_f64).ok_or_else(|| {
		Error::InvalidResponse { message: "confidence must be a number.".to_string() }
	})?;

	if !(0.0..=1.0).contains(&confidence) {
		return Err(Error::InvalidResponse {
			message: format!("confidence {confidence} is outside 0.0-1.0."),
		});
	}

	Ok(SongMatch { song, artist, confidence })
}

fn required_text(json: &Value, field: &str) -> Result<String> {
	json.get(field)
		.and_then(Value::as_str)
		.map(str::trim)
		.filter(|value| !value.is_empty() && !value.contains('\0'))
		.map(str::to_string)
		.ok_or_else(|| Error::InvalidResponse {
			message: format!("{field} must be non-empty text without NUL."),
		})
}
