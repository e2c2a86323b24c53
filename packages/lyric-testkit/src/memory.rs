use std::sync::{
	Mutex, MutexGuard,
	atomic::{AtomicBool, AtomicUsize, Ordering},
};

use time::{Duration, OffsetDateTime};

use lyric_storage::{
	BoxFuture, Error, HistoryPage, HistorySlice, HistoryStore, NewSearchRecord, Result, SearchId,
	SearchRecord,
};

/// In-process `HistoryStore` with failure injection and call counters.
///
/// Records live in insertion order. Timestamps are strictly increasing so recency order is
/// deterministic even when inserts land within the same clock tick.
#[derive(Default)]
pub struct MemoryHistoryStore {
	records: Mutex<Vec<SearchRecord>>,
	fail_writes: AtomicBool,
	fail_reads: AtomicBool,
	inserts: AtomicUsize,
	queries: AtomicUsize,
}
impl MemoryHistoryStore {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn fail_writes(&self, enabled: bool) {
		self.fail_writes.store(enabled, Ordering::SeqCst);
	}

	pub fn fail_reads(&self, enabled: bool) {
		self.fail_reads.store(enabled, Ordering::SeqCst);
	}

	/// Insert attempts, including failed ones.
	pub fn insert_calls(&self) -> usize {
		self.inserts.load(Ordering::SeqCst)
	}

	pub fn query_calls(&self) -> usize {
		self.queries.load(Ordering::SeqCst)
	}

	pub fn len(&self) -> usize {
		self.lock().len()
	}

	pub fn is_empty(&self) -> bool {
		self.lock().is_empty()
	}

	/// Stored records, oldest first.
	pub fn records(&self) -> Vec<SearchRecord> {
		self.lock().clone()
	}

	fn lock(&self) -> MutexGuard<'_, Vec<SearchRecord>> {
		self.records.lock().unwrap_or_else(|err| err.into_inner())
	}

	fn insert_now(&self, record: &NewSearchRecord) -> Result<SearchId> {
		self.inserts.fetch_add(1, Ordering::SeqCst);

		if self.fail_writes.load(Ordering::SeqCst) {
			return Err(Error::Sqlx(sqlx::Error::PoolTimedOut));
		}

		record.validate()?;

		let mut records = self.lock();
		let now = OffsetDateTime::now_utc();
		let created_at = match records.last() {
			Some(last) if last.created_at >= now => last.created_at + Duration::microseconds(1),
			_ => now,
		};
		let id = SearchId::generate();

		records.push(SearchRecord {
			id,
			lyrics: record.lyrics.clone(),
			song: record.song.clone(),
			artist: record.artist.clone(),
			confidence: record.confidence,
			created_at,
		});

		Ok(id)
	}

	fn query_now(&self, page: HistoryPage) -> Result<HistorySlice> {
		self.queries.fetch_add(1, Ordering::SeqCst);

		if self.fail_reads.load(Ordering::SeqCst) {
			return Err(Error::Sqlx(sqlx::Error::PoolTimedOut));
		}
		if page.limit == 0 {
			return Err(Error::InvalidArgument("limit must be greater than zero.".to_string()));
		}

		let records = self.lock();
		let skip = usize::try_from(page.skip).unwrap_or(usize::MAX);
		let limit = usize::try_from(page.limit).unwrap_or(usize::MAX);
		let items = records.iter().rev().skip(skip).take(limit).cloned().collect();

		Ok(HistorySlice { items, total: records.len() as u64 })
	}
}
impl HistoryStore for MemoryHistoryStore {
	fn insert<'a>(&'a self, record: &'a NewSearchRecord) -> BoxFuture<'a, Result<SearchId>> {
		let result = self.insert_now(record);

		Box::pin(async move { result })
	}

	fn query(&self, page: HistoryPage) -> BoxFuture<'_, Result<HistorySlice>> {
		let result = self.query_now(page);

		Box::pin(async move { result })
	}

	fn get(&self, id: SearchId) -> BoxFuture<'_, Result<Option<SearchRecord>>> {
		let found = self.lock().iter().find(|record| record.id == id).cloned();

		Box::pin(async move { Ok(found) })
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn record(n: usize) -> NewSearchRecord {
		NewSearchRecord {
			lyrics: format!("line {n}"),
			song: format!("Song {n}"),
			artist: "Artist".to_string(),
			confidence: 0.5,
		}
	}

	#[tokio::test]
	async fn query_returns_newest_first() {
		let store = MemoryHistoryStore::new();

		for n in 1..=3 {
			store.insert(&record(n)).await.expect("Failed to insert record.");
		}

		let slice = store
			.query(HistoryPage { skip: 0, limit: 2 })
			.await
			.expect("Failed to query records.");
		let songs: Vec<_> = slice.items.iter().map(|item| item.song.as_str()).collect();

		assert_eq!(songs, ["Song 3", "Song 2"]);
		assert_eq!(slice.total, 3);
		assert!(slice.items[0].created_at > slice.items[1].created_at);
	}

	#[tokio::test]
	async fn failed_writes_leave_no_record() {
		let store = MemoryHistoryStore::new();

		store.fail_writes(true);

		assert!(store.insert(&record(1)).await.is_err());
		assert!(store.is_empty());
		assert_eq!(store.insert_calls(), 1);
	}
}
