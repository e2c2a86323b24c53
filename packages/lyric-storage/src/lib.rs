pub mod db;
pub mod models;
pub mod pg;
pub mod queries;
pub mod schema;

mod error;

pub use error::Error;
pub use models::{HistoryPage, HistorySlice, NewSearchRecord, SearchId, SearchRecord};
pub use pg::PgHistoryStore;

use std::{future::Future, pin::Pin};

pub type Result<T, E = Error> = std::result::Result<T, E>;

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Append-only log of accepted searches.
///
/// Implementations assign `id` and `created_at` on insert and never update or delete a record.
/// `query` orders by `created_at` descending, ties broken by insertion order (newest first).
pub trait HistoryStore
where
	Self: Send + Sync,
{
	fn insert<'a>(&'a self, record: &'a NewSearchRecord) -> BoxFuture<'a, Result<SearchId>>;

	fn query(&self, page: HistoryPage) -> BoxFuture<'_, Result<HistorySlice>>;

	fn get(&self, id: SearchId) -> BoxFuture<'_, Result<Option<SearchRecord>>>;
}
