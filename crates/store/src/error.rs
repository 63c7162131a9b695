use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

use crate::widget::WidgetId;

/// Store operation names, used for lock diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
	Find,
	List,
	Create,
	Update,
	Delete,
	Stats,
}

impl Operation {
	pub const fn as_str(self) -> &'static str {
		match self {
			Self::Find => "find",
			Self::List => "list",
			Self::Create => "create",
			Self::Update => "update",
			Self::Delete => "delete",
			Self::Stats => "stats",
		}
	}
}

impl std::fmt::Display for Operation {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.write_str(self.as_str())
	}
}

/// Errors surfaced by store operations.
///
/// Absence is never an error: `find` and `update` return `None` and `delete`
/// returns `false` for unknown identifiers.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum StoreError {
	/// The lock could not be acquired within the bounded wait. Retryable.
	#[error("store unavailable: {operation} could not acquire the lock within {timeout:?}")]
	Unavailable {
		operation: Operation,
		timeout: Duration,
	},
	/// Internal state is inconsistent. Not retryable.
	#[error("store invariant violated: {0}")]
	Invariant(#[from] InvariantViolation),
}

impl StoreError {
	/// Returns true if retrying the whole operation may succeed.
	pub fn is_retryable(&self) -> bool {
		matches!(self, Self::Unavailable { .. })
	}
}

/// Broken internal invariants detected before any mutation was applied.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InvariantViolation {
	/// A freshly allocated identifier is already present in the table.
	#[error("allocated id {0} is already in use")]
	DuplicateId(WidgetId),
	/// The order index references a widget the table does not hold.
	#[error("widget {id} indexed at z-index {z_index} is missing from the table")]
	MissingWidget { id: WidgetId, z_index: i32 },
	/// Every 32-bit identifier has been handed out.
	#[error("widget id space exhausted")]
	IdSpaceExhausted,
	/// Advancing the watermark or shifting a widget would leave the z-index range.
	#[error("z-index overflow at {0}")]
	ZIndexOverflow(i32),
}

/// Errors raised while loading or validating a [`StoreConfig`](crate::StoreConfig).
#[derive(Error, Debug)]
pub enum ConfigError {
	#[error("failed to read config {path}: {source}")]
	Io {
		path: PathBuf,
		#[source]
		source: std::io::Error,
	},
	#[error("invalid config: {0}")]
	Parse(#[from] toml::de::Error),
	/// The z-index gap must be a non-empty range of positive increments.
	#[error("invalid z-index gap [{min}, {max}): expected 1 <= min < max")]
	InvalidGap { min: i32, max: i32 },
}
