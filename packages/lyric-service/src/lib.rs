pub mod history;
pub mod search;
pub mod time_serde;

mod error;

pub use error::{Error, Result, StoreOp};
pub use history::{
	DEFAULT_LIMIT, DEFAULT_PAGE, HistoryItem, HistoryRequest, HistoryResponse, MAX_LIMIT,
	Pagination,
};
pub use search::{SearchRequest, SearchResponse};

use std::sync::Arc;

use lyric_matcher::{MatchOutcome, MatcherClient};
use lyric_storage::{BoxFuture, HistoryStore};

/// The matching engine as seen by the orchestrator.
pub trait Matcher
where
	Self: Send + Sync,
{
	fn match_lyrics<'a>(
		&'a self,
		lyrics: &'a str,
	) -> BoxFuture<'a, lyric_matcher::Result<MatchOutcome>>;
}
impl Matcher for MatcherClient {
	fn match_lyrics<'a>(
		&'a self,
		lyrics: &'a str,
	) -> BoxFuture<'a, lyric_matcher::Result<MatchOutcome>> {
		Box::pin(MatcherClient::match_lyrics(self, lyrics))
	}
}

/// Search orchestration and history reads over shared, explicitly constructed handles.
#[derive(Clone)]
pub struct LyricService {
	pub store: Arc<dyn HistoryStore>,
	pub matcher: Arc<dyn Matcher>,
}
impl LyricService {
	pub fn new(store: Arc<dyn HistoryStore>, matcher: Arc<dyn Matcher>) -> Self {
		Self { store, matcher }
	}
}
