use lyric_storage::{HistoryPage, SearchId, SearchRecord};

use crate::{Error, LyricService, Result, StoreOp};

pub const DEFAULT_PAGE: i64 = 1;
pub const DEFAULT_LIMIT: i64 = 20;
pub const MAX_LIMIT: i64 = 100;
pub const INVALID_PAGINATION: &str =
	"Invalid pagination parameters. Page must be >= 1, limit must be between 1 and 100.";

#[derive(Debug, Clone, Copy, Default, serde::Serialize, serde::Deserialize)]
pub struct HistoryRequest {
	pub page: Option<i64>,
	pub limit: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryItem {
	pub id: SearchId,
	pub lyrics: String,
	pub song: String,
	pub artist: String,
	pub confidence: f64,
	#[serde(with = "crate::time_serde")]
	pub created_at: time::OffsetDateTime,
}
impl From<SearchRecord> for HistoryItem {
	fn from(record: SearchRecord) -> Self {
		Self {
			id: record.id,
			lyrics: record.lyrics,
			song: record.song,
			artist: record.artist,
			confidence: record.confidence,
			created_at: record.created_at,
		}
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub struct Pagination {
	pub page: u64,
	pub limit: u64,
	pub total: u64,
	pub pages: u64,
}

#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct HistoryResponse {
	pub items: Vec<HistoryItem>,
	pub pagination: Pagination,
}

impl LyricService {
	/// Returns one page of past searches, newest first.
	pub async fn list_history(&self, req: HistoryRequest) -> Result<HistoryResponse> {
		let (page, window) = resolve_window(req)?;
		let slice = self.store.query(window).await.map_err(|err| {
			tracing::error!(error = %err, page, limit = window.limit, "History query failed.");

			Error::from_store(StoreOp::ReadHistory, err)
		})?;
		let pagination = Pagination {
			page,
			limit: window.limit,
			total: slice.total,
			pages: slice.total.div_ceil(window.limit),
		};

		Ok(HistoryResponse {
			items: slice.items.into_iter().map(HistoryItem::from).collect(),
			pagination,
		})
	}
}

fn resolve_window(req: HistoryRequest) -> Result<(u64, HistoryPage)> {
	let page = req.page.unwrap_or(DEFAULT_PAGE);
	let limit = req.limit.unwrap_or(DEFAULT_LIMIT);

	if page < 1 || !(1..=MAX_LIMIT).contains(&limit) {
		return Err(Error::validation(INVALID_PAGINATION));
	}

	let page = page as u64;
	let limit = limit as u64;

	Ok((page, HistoryPage { skip: (page - 1).saturating_mul(limit), limit }))
}
