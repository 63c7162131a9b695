//! Concurrent in-memory store of rectangular widgets.
//!
//! Each widget carries a position, a size and a draw-order rank (z-index)
//! that is unique among live widgets. The store:
//! - [`WidgetId`]: allocates identifiers in increasing order, never reused
//! - [`WidgetRepository`]: find, list, create, update and delete operations
//! - resolves z-index collisions by shifting occupants up by one
//! - guards all state with one reader/writer lock with bounded wait
//!
//! Lock timeouts surface as the retryable [`StoreError::Unavailable`]; broken
//! internal state surfaces as the fatal [`StoreError::Invariant`].
//!
//! ```
//! use canvas_store::{NewWidget, WidgetRepository, WidgetStore};
//!
//! let store = WidgetStore::new();
//! let a = store.create(NewWidget::new(0, 0, 10.0, 20.0).at_z_index(1))?;
//! let b = store.create(NewWidget::new(5, 5, 10.0, 20.0).at_z_index(1))?;
//!
//! assert_eq!(store.find(a.id)?.map(|w| w.z_index), Some(2));
//! let order: Vec<_> = store.list()?.into_iter().map(|w| w.id).collect();
//! assert_eq!(order, vec![b.id, a.id]);
//! # Ok::<(), canvas_store::StoreError>(())
//! ```

mod config;
mod error;
mod guard;
mod order;
mod store;
mod table;
mod widget;

pub use config::{ShiftBound, StoreConfig, ZIndexGap};
pub use error::{ConfigError, InvariantViolation, Operation, StoreError};
pub use store::{StoreStats, WidgetRepository, WidgetStore};
pub use widget::{NewWidget, Widget, WidgetChanges, WidgetId};

/// Result alias for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;
