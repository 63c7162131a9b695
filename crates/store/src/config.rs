//! Store configuration, loadable from TOML.
//!
//! ```toml
//! lock_timeout_ms = 100
//! shift_bound = "watermark"
//! seed = 42
//!
//! [z_gap]
//! min = 10
//! max = 110
//! ```

use std::path::Path;
use std::time::Duration;

use serde::Deserialize;

use crate::error::ConfigError;

/// Returns the default bounded wait for lock acquisition in milliseconds.
fn default_lock_timeout_ms() -> u64 {
	100
}

/// Tunables for a [`WidgetStore`](crate::WidgetStore).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StoreConfig {
	/// How long an operation waits for the lock before failing as unavailable.
	pub lock_timeout_ms: u64,
	/// Spacing between auto-placed widgets.
	pub z_gap: ZIndexGap,
	/// Upper bound of a cascading shift.
	pub shift_bound: ShiftBound,
	/// Seeds the gap generator. OS entropy when absent.
	pub seed: Option<u64>,
}

impl Default for StoreConfig {
	fn default() -> Self {
		Self {
			lock_timeout_ms: default_lock_timeout_ms(),
			z_gap: ZIndexGap::default(),
			shift_bound: ShiftBound::default(),
			seed: None,
		}
	}
}

impl StoreConfig {
	/// Parses and validates a TOML document.
	pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
		let config: Self = toml::from_str(source)?;
		config.validate()?;
		Ok(config)
	}

	/// Reads, parses and validates a TOML file.
	pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
		let path = path.as_ref();
		let source = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
			path: path.to_path_buf(),
			source,
		})?;
		Self::from_toml_str(&source)
	}

	pub fn validate(&self) -> Result<(), ConfigError> {
		self.z_gap.validate()
	}

	pub fn lock_timeout(&self) -> Duration {
		Duration::from_millis(self.lock_timeout_ms)
	}

	pub fn with_lock_timeout(mut self, timeout: Duration) -> Self {
		self.lock_timeout_ms = u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX);
		self
	}

	pub fn with_seed(mut self, seed: u64) -> Self {
		self.seed = Some(seed);
		self
	}

	pub fn with_shift_bound(mut self, bound: ShiftBound) -> Self {
		self.shift_bound = bound;
		self
	}

	pub fn with_z_gap(mut self, min: i32, max: i32) -> Self {
		self.z_gap = ZIndexGap { min, max };
		self
	}
}

/// Half-open range `[min, max)` the watermark advances by for each auto-placed widget.
///
/// Wide gaps leave room for explicit inserts between auto-placed widgets
/// without forcing a cascade.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ZIndexGap {
	pub min: i32,
	pub max: i32,
}

impl Default for ZIndexGap {
	fn default() -> Self {
		Self { min: 10, max: 110 }
	}
}

impl ZIndexGap {
	pub fn validate(&self) -> Result<(), ConfigError> {
		if self.min >= 1 && self.min < self.max {
			Ok(())
		} else {
			Err(ConfigError::InvalidGap {
				min: self.min,
				max: self.max,
			})
		}
	}
}

/// Where a cascading shift stops.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ShiftBound {
	/// Shift widgets up to the auto-placement watermark. Widgets placed
	/// explicitly above the watermark, past a vacant slot, stay put.
	#[default]
	Watermark,
	/// Shift widgets up to the highest live z-index.
	HighestLive,
}
