//! Bounded-wait reader/writer guard around the store state.
//!
//! Reads share the lock; writes hold it exclusively. Every acquisition waits at
//! most the configured timeout and fails as [`StoreError::Unavailable`]
//! otherwise. Nothing is retried here.

use std::time::Duration;

use parking_lot::RwLock;

use crate::Result;
use crate::error::{Operation, StoreError};

#[derive(Debug)]
pub(crate) struct Guarded<T> {
	lock: RwLock<T>,
	timeout: Duration,
}

impl<T> Guarded<T> {
	pub fn new(value: T, timeout: Duration) -> Self {
		Self {
			lock: RwLock::new(value),
			timeout,
		}
	}

	/// Runs `f` under shared access.
	pub fn read<R>(&self, operation: Operation, f: impl FnOnce(&T) -> R) -> Result<R> {
		let Some(guard) = self.lock.try_read_for(self.timeout) else {
			return Err(self.unavailable(operation));
		};
		Ok(f(&guard))
	}

	/// Runs `f` under exclusive access.
	pub fn write<R>(&self, operation: Operation, f: impl FnOnce(&mut T) -> Result<R>) -> Result<R> {
		let Some(mut guard) = self.lock.try_write_for(self.timeout) else {
			return Err(self.unavailable(operation));
		};
		f(&mut guard)
	}

	fn unavailable(&self, operation: Operation) -> StoreError {
		tracing::warn!(%operation, timeout = ?self.timeout, "Store lock acquisition timed out");
		StoreError::Unavailable {
			operation,
			timeout: self.timeout,
		}
	}

	#[cfg(test)]
	pub(crate) fn lock(&self) -> &RwLock<T> {
		&self.lock
	}
}
