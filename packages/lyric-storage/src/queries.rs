use sqlx::PgExecutor;

use crate::{
	Error, Result,
	models::{NewSearchRecord, SearchId, SearchRecord},
};

pub async fn insert_search<'e, E>(
	executor: E,
	search_id: SearchId,
	record: &NewSearchRecord,
) -> Result<()>
where
	E: PgExecutor<'e>,
{
	sqlx::query(
		"\
INSERT INTO search_history (
	search_id,
	lyrics,
	song,
	artist,
	confidence
)
VALUES ($1, $2, $3, $4, $5)",
	)
	.bind(search_id)
	.bind(record.lyrics.as_str())
	.bind(record.song.as_str())
	.bind(record.artist.as_str())
	.bind(record.confidence)
	.execute(executor)
	.await?;

	Ok(())
}

pub async fn list_searches<'e, E>(executor: E, skip: u64, limit: u64) -> Result<Vec<SearchRecord>>
where
	E: PgExecutor<'e>,
{
	// Offsets past the largest bigint select nothing either way.
	let skip = i64::try_from(skip).unwrap_or(i64::MAX);
	let limit = to_i64("limit", limit)?;
	let rows = sqlx::query_as::<_, SearchRecord>(
		"\
SELECT search_id, lyrics, song, artist, confidence, created_at
FROM search_history
ORDER BY created_at DESC, seq DESC
OFFSET $1
LIMIT $2",
	)
	.bind(skip)
	.bind(limit)
	.fetch_all(executor)
	.await?;

	Ok(rows)
}

pub async fn count_searches<'e, E>(executor: E) -> Result<u64>
where
	E: PgExecutor<'e>,
{
	let count: i64 =
		sqlx::query_scalar("SELECT count(*) FROM search_history").fetch_one(executor).await?;

	Ok(count.max(0) as u64)
}

pub async fn get_search<'e, E>(executor: E, search_id: SearchId) -> Result<Option<SearchRecord>>
where
	E: PgExecutor<'e>,
{
	let row = sqlx::query_as::<_, SearchRecord>(
		"\
SELECT search_id, lyrics, song, artist, confidence, created_at
FROM search_history
WHERE search_id = $1",
	)
	.bind(search_id)
	.fetch_optional(executor)
	.await?;

	Ok(row)
}

fn to_i64(label: &str, value: u64) -> Result<i64> {
	i64::try_from(value).map_err(|_| Error::InvalidArgument(format!("{label} is out of range.")))
}
