use std::sync::Arc;

use lyric_matcher::MatcherClient;
use lyric_service::LyricService;
use lyric_storage::{PgHistoryStore, db::Db};

#[derive(Clone)]
pub struct AppState {
	pub service: Arc<LyricService>,
}
impl AppState {
	/// Wires the Postgres history and the HTTP matcher. `db` must already have its schema.
	pub fn new(db: &Db, matcher: &lyric_config::Matcher) -> color_eyre::Result<Self> {
		let store = PgHistoryStore::new(db);
		let matcher = MatcherClient::new(matcher)?;

		Ok(Self::from_service(LyricService::new(Arc::new(store), Arc::new(matcher))))
	}

	pub fn from_service(service: LyricService) -> Self {
		Self { service: Arc::new(service) }
	}
}
