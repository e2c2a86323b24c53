use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::{Error, Result};

/// Store-assigned record identifier. Callers treat it as an opaque string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[serde(transparent)]
#[sqlx(transparent)]
pub struct SearchId(Uuid);
impl SearchId {
	pub fn generate() -> Self {
		Self(Uuid::new_v4())
	}
}
impl fmt::Display for SearchId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		fmt::Display::fmt(&self.0, f)
	}
}
impl FromStr for SearchId {
	type Err = Error;

	fn from_str(raw: &str) -> Result<Self> {
		Uuid::parse_str(raw.trim())
			.map(Self)
			.map_err(|_| Error::InvalidArgument(format!("{raw:?} is not a search id.")))
	}
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewSearchRecord {
	pub lyrics: String,
	pub song: String,
	pub artist: String,
	pub confidence: f64,
}
impl NewSearchRecord {
	/// Checks the record invariants. Stores call this before writing anything.
	pub fn validate(&self) -> Result<()> {
		for (field, value) in
			[("lyrics", &self.lyrics), ("song", &self.song), ("artist", &self.artist)]
		{
			if value.trim().is_empty() {
				return Err(Error::InvalidArgument(format!("{field} must be non-empty.")));
			}
			if value.trim().len() != value.len() {
				return Err(Error::InvalidArgument(format!("{field} must be trimmed.")));
			}
			if value.contains('\0') {
				return Err(Error::InvalidArgument(format!("{field} must not contain NUL.")));
			}
		}

		if !(0.0..=1.0).contains(&self.confidence) {
			return Err(Error::InvalidArgument(format!(
				"confidence must be in the range 0.0-1.0, got {}.",
				self.confidence
			)));
		}

		Ok(())
	}
}

#[derive(Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct SearchRecord {
	#[sqlx(rename = "search_id")]
	pub id: SearchId,
	pub lyrics: String,
	pub song: String,
	pub artist: String,
	pub confidence: f64,
	pub created_at: OffsetDateTime,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HistoryPage {
	pub skip: u64,
	pub limit: u64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct HistorySlice {
	pub items: Vec<SearchRecord>,
	/// Record count when the query ran; may lag concurrent inserts.
	pub total: u64,
}
