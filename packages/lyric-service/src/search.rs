use lyric_matcher::MatchOutcome;
use lyric_storage::{NewSearchRecord, SearchId};

use crate::{Error, LyricService, Result, StoreOp};

pub const LYRICS_REQUIRED: &str = "Lyrics input is required and must be a non-empty string";
pub const LYRICS_NUL: &str = "Lyrics input must not contain NUL characters";

#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
pub struct SearchRequest {
	/// `None` when the caller sent no lyrics or a non-string value.
	pub lyrics: Option<String>,
}

#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct SearchResponse {
	pub song: String,
	pub artist: String,
	pub confidence: f64,
	pub id: SearchId,
}

impl LyricService {
	/// Matches one lyric snippet and records the result.
	///
	/// Nothing is persisted unless the matcher succeeds, and the write is attempted exactly once.
	pub async fn search(&self, req: SearchRequest) -> Result<SearchResponse> {
		let lyrics = req
			.lyrics
			.as_deref()
			.map(str::trim)
			.filter(|lyrics| !lyrics.is_empty())
			.ok_or_else(|| Error::validation(LYRICS_REQUIRED))?;

		// Postgres text rejects NUL.
		if lyrics.contains('\0') {
			return Err(Error::validation(LYRICS_NUL));
		}

		let found = match self.matcher.match_lyrics(lyrics).await {
			Ok(MatchOutcome::Matched(found)) => found,
			Ok(MatchOutcome::Unavailable { message }) => {
				tracing::warn!(%message, "Search failed; matcher unavailable.");

				return Err(Error::ServiceUnavailable { message });
			},
			Ok(MatchOutcome::Rejected { status, message }) => {
				tracing::warn!(status, %message, "Search failed; matcher rejected the request.");

				return Err(Error::Upstream { status, message });
			},
			Err(err) => {
				tracing::error!(error = %err, "Search failed; matcher call could not complete.");

				return Err(Error::from_matcher(err));
			},
		};
		let record = NewSearchRecord {
			lyrics: lyrics.to_string(),
			song: found.song,
			artist: found.artist,
			confidence: found.confidence,
		};
		let id = self.store.insert(&record).await.map_err(|err| {
			tracing::error!(
				error = %err,
				song = %record.song,
				artist = %record.artist,
				"Match computed but the search record was not persisted."
			);

			Error::from_store(StoreOp::RecordSearch, err)
		})?;

		tracing::info!(
			%id,
			song = %record.song,
			artist = %record.artist,
			confidence = record.confidence,
			"Search recorded."
		);

		Ok(SearchResponse {
			song: record.song,
			artist: record.artist,
			confidence: record.confidence,
			id,
		})
	}
}
