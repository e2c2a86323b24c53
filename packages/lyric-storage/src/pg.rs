use sqlx::PgPool;

use crate::{
	BoxFuture, Error, HistoryStore, Result,
	db::Db,
	models::{HistoryPage, HistorySlice, NewSearchRecord, SearchId, SearchRecord},
	queries,
};

/// Postgres-backed history. Cloning shares the underlying pool.
#[derive(Clone)]
pub struct PgHistoryStore {
	pool: PgPool,
}
impl PgHistoryStore {
	pub fn new(db: &Db) -> Self {
		Self { pool: db.pool.clone() }
	}

	async fn insert_record(&self, record: &NewSearchRecord) -> Result<SearchId> {
		record.validate()?;

		let search_id = SearchId::generate();

		queries::insert_search(&self.pool, search_id, record).await?;

		Ok(search_id)
	}

	async fn query_page(&self, page: HistoryPage) -> Result<HistorySlice> {
		if page.limit == 0 {
			return Err(Error::InvalidArgument("limit must be greater than zero.".to_string()));
		}

		let total = queries::count_searches(&self.pool).await?;
		let items = queries::list_searches(&self.pool, page.skip, page.limit).await?;

		Ok(HistorySlice { items, total })
	}
}
impl HistoryStore for PgHistoryStore {
	fn insert<'a>(&'a self, record: &'a NewSearchRecord) -> BoxFuture<'a, Result<SearchId>> {
		Box::pin(self.insert_record(record))
	}

	fn query(&self, page: HistoryPage) -> BoxFuture<'_, Result<HistorySlice>> {
		Box::pin(self.query_page(page))
	}

	fn get(&self, id: SearchId) -> BoxFuture<'_, Result<Option<SearchRecord>>> {
		Box::pin(queries::get_search(&self.pool, id))
	}
}
