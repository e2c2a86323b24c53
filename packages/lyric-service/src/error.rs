pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Which store operation failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreOp {
	/// Writing a search whose match already succeeded.
	RecordSearch,
	ReadHistory,
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("{message}")]
	Validation { message: String },
	#[error("Matcher unavailable: {message}")]
	ServiceUnavailable { message: String },
	#[error("Matcher rejected the request with status {status}: {message}")]
	Upstream { status: u16, message: String },
	/// The matcher call could not be made at all, e.g. an unbuildable request.
	#[error("Matcher call failed: {message}")]
	MatcherCall { message: String },
	#[error("Storage error during {op:?}: {message}")]
	Persistence { op: StoreOp, message: String },
	#[error("Internal error: {message}")]
	Internal { message: String },
}
impl Error {
	pub(crate) fn validation(message: &str) -> Self {
		Self::Validation { message: message.to_string() }
	}

	pub(crate) fn from_matcher(err: lyric_matcher::Error) -> Self {
		match err {
			lyric_matcher::Error::InvalidResponse { .. } =>
				Self::Internal { message: err.to_string() },
			_ => Self::MatcherCall { message: err.to_string() },
		}
	}

	/// Constraint rejections and driver failures both surface as persistence errors.
	pub(crate) fn from_store(op: StoreOp, err: lyric_storage::Error) -> Self {
		Self::Persistence { op, message: err.to_string() }
	}
}
