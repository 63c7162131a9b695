//! Widget store: CRUD orchestration over the widget table and order index.
//!
//! # Concurrency
//!
//! Table and index form one unit of state behind a single bounded-wait
//! reader/writer lock. `find`, `list` and `stats` take it shared; `create`,
//! `update` and `delete` take it exclusively. The cascading shift runs on the
//! already-locked [`StoreState`] and never touches the lock itself.
//!
//! # Atomicity
//!
//! Each mutation first plans everything that can fail (watermark overflow,
//! cascade extent, id allocation), then applies the plan with infallible
//! steps. The watermark of an automatic placement is committed in the apply
//! phase too. An error therefore never leaves a half-applied change.

use crate::Result;
use crate::config::{ShiftBound, StoreConfig};
use crate::error::{ConfigError, InvariantViolation, Operation, StoreError};
use crate::guard::Guarded;
use crate::order::OrderIndex;
use crate::table::WidgetTable;
use crate::widget::{NewWidget, Widget, WidgetChanges, WidgetId};

/// Storage operations consumed by the request-handling layer.
///
/// Unknown identifiers are not errors: `find` and `update` return `None`,
/// `delete` returns `false`.
pub trait WidgetRepository: Send + Sync {
	/// Returns the widget stored under `id`.
	fn find(&self, id: WidgetId) -> Result<Option<Widget>>;

	/// Returns every live widget in ascending z-index order.
	fn list(&self) -> Result<Vec<Widget>>;

	/// Creates a widget, shifting occupants of its z-index out of the way.
	fn create(&self, widget: NewWidget) -> Result<Widget>;

	/// Overlays `changes` onto the widget under `id`.
	fn update(&self, id: WidgetId, changes: &WidgetChanges) -> Result<Option<Widget>>;

	/// Removes the widget under `id`, returning whether it existed.
	fn delete(&self, id: WidgetId) -> Result<bool>;
}

/// Point-in-time counters, read under shared access.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StoreStats {
	/// Number of live widgets.
	pub live: usize,
	/// Identifier the next create will receive, `None` once exhausted.
	pub next_id: Option<WidgetId>,
	/// Current auto-placement watermark.
	pub watermark: i32,
}

/// Concurrent in-memory widget store.
#[derive(Debug)]
pub struct WidgetStore {
	state: Guarded<StoreState>,
}

impl Default for WidgetStore {
	fn default() -> Self {
		Self::new()
	}
}

impl WidgetStore {
	/// Creates an empty store with default configuration.
	pub fn new() -> Self {
		Self::build(&StoreConfig::default())
	}

	/// Creates an empty store after validating `config`.
	pub fn with_config(config: StoreConfig) -> std::result::Result<Self, ConfigError> {
		config.validate()?;
		Ok(Self::build(&config))
	}

	fn build(config: &StoreConfig) -> Self {
		let state = StoreState {
			table: WidgetTable::new(),
			order: OrderIndex::new(config.z_gap, config.seed),
			shift_bound: config.shift_bound,
		};
		Self {
			state: Guarded::new(state, config.lock_timeout()),
		}
	}

	pub fn stats(&self) -> Result<StoreStats> {
		self.state.read(Operation::Stats, |state| StoreStats {
			live: state.table.len(),
			next_id: state.table.peek_next_id(),
			watermark: state.order.watermark(),
		})
	}
}

impl WidgetRepository for WidgetStore {
	fn find(&self, id: WidgetId) -> Result<Option<Widget>> {
		self.state.read(Operation::Find, |state| {
			tracing::trace!(%id, "Finding widget");
			state.table.get(id).cloned()
		})
	}

	fn list(&self) -> Result<Vec<Widget>> {
		self.state
			.read(Operation::List, |state| state.list())?
			.map_err(|violation| invariant(Operation::List, violation))
	}

	fn create(&self, request: NewWidget) -> Result<Widget> {
		self.state.write(Operation::Create, |state| {
			let widget = state
				.create(&request)
				.map_err(|violation| invariant(Operation::Create, violation))?;
			state.debug_assert_consistent();
			tracing::debug!(id = %widget.id, z_index = widget.z_index, "Created widget");
			Ok(widget)
		})
	}

	fn update(&self, id: WidgetId, changes: &WidgetChanges) -> Result<Option<Widget>> {
		self.state.write(Operation::Update, |state| {
			let updated = state
				.update(id, changes)
				.map_err(|violation| invariant(Operation::Update, violation))?;
			state.debug_assert_consistent();
			match &updated {
				Some(widget) => {
					tracing::debug!(%id, z_index = widget.z_index, "Updated widget")
				}
				None => tracing::trace!(%id, "Update skipped, widget not found"),
			}
			Ok(updated)
		})
	}

	fn delete(&self, id: WidgetId) -> Result<bool> {
		self.state.write(Operation::Delete, |state| {
			let removed = state.delete(id);
			state.debug_assert_consistent();
			tracing::debug!(%id, removed, "Deleted widget");
			Ok(removed)
		})
	}
}

fn invariant(operation: Operation, violation: InvariantViolation) -> StoreError {
	tracing::error!(%operation, error = %violation, "Store invariant violated");
	StoreError::Invariant(violation)
}

/// State guarded by the store lock.
///
/// Invariants between operations:
/// - every table entry has exactly one index entry keyed by its z-index;
/// - no two widgets share a z-index.
#[derive(Debug)]
struct StoreState {
	table: WidgetTable,
	order: OrderIndex,
	shift_bound: ShiftBound,
}

impl StoreState {
	fn list(&self) -> std::result::Result<Vec<Widget>, InvariantViolation> {
		self.order
			.iter()
			.map(|(z_index, id)| self.resolve(z_index, id))
			.collect()
	}

	fn create(&mut self, request: &NewWidget) -> std::result::Result<Widget, InvariantViolation> {
		let z_index = self.order.propose_z_index(request.z_index)?;
		let shifts = if self.order.is_occupied(z_index) {
			self.plan_rearrange(z_index, None)?
		} else {
			Vec::new()
		};
		let id = self.table.allocate_id()?;

		if request.z_index.is_none() {
			self.order.advance_watermark(z_index);
		}
		self.rearrange(shifts);
		let widget = Widget::new(id, request, z_index);
		self.order.insert(z_index, id);
		self.table.put(widget.clone());
		Ok(widget)
	}

	fn update(
		&mut self,
		id: WidgetId,
		changes: &WidgetChanges,
	) -> std::result::Result<Option<Widget>, InvariantViolation> {
		let Some(current) = self.table.get(id) else {
			return Ok(None);
		};
		let previous_z = current.z_index;
		let candidate = current.apply(changes);
		let moved = candidate.z_index != previous_z;

		let shifts = match self.order.occupant(candidate.z_index) {
			Some(occupant) if occupant != id => {
				self.plan_rearrange(candidate.z_index, moved.then_some(previous_z))?
			}
			_ => Vec::new(),
		};

		if moved {
			self.order.remove(previous_z);
		}
		self.rearrange(shifts);
		self.order.insert(candidate.z_index, id);
		self.table.put(candidate.clone());
		Ok(Some(candidate))
	}

	fn delete(&mut self, id: WidgetId) -> bool {
		let Some(widget) = self.table.remove(id) else {
			return false;
		};
		self.order.remove(widget.z_index);
		true
	}

	/// Resolves the widgets a cascade from `from` would move, highest first.
	fn plan_rearrange(
		&self,
		from: i32,
		vacated: Option<i32>,
	) -> std::result::Result<Vec<Widget>, InvariantViolation> {
		self.order
			.cascade(from, self.shift_bound, vacated)?
			.into_iter()
			.map(|(z_index, id)| self.resolve(z_index, id))
			.collect()
	}

	/// Looks up the widget an index entry points at.
	fn resolve(
		&self,
		z_index: i32,
		id: WidgetId,
	) -> std::result::Result<Widget, InvariantViolation> {
		self.table
			.get(id)
			.filter(|widget| widget.z_index == z_index)
			.cloned()
			.ok_or(InvariantViolation::MissingWidget { id, z_index })
	}

	/// Moves each planned widget up by one z-index as a fresh value.
	///
	/// `shifts` must come from [`Self::plan_rearrange`] on the current state,
	/// highest first, so every target slot is free when it is filled.
	fn rearrange(&mut self, shifts: Vec<Widget>) {
		for widget in shifts {
			let shifted = widget.with_z_index(widget.z_index + 1);
			tracing::trace!(
				id = %widget.id,
				from = widget.z_index,
				to = shifted.z_index,
				"Shifted widget"
			);
			self.order.remove(widget.z_index);
			self.order.insert(shifted.z_index, shifted.id);
			self.table.put(shifted);
		}
	}

	/// Asserts that table and index agree one-to-one.
	///
	/// Only active in debug builds. Run after every mutation.
	#[cfg(debug_assertions)]
	fn debug_assert_consistent(&self) {
		debug_assert_eq!(
			self.table.len(),
			self.order.len(),
			"table and order index sizes diverged"
		);
		for (z_index, id) in self.order.iter() {
			let stored = self.table.get(id).map(|widget| widget.z_index);
			debug_assert_eq!(
				stored,
				Some(z_index),
				"index entry z={z_index} id={id} disagrees with table"
			);
		}
	}

	/// No-op in release builds.
	#[cfg(not(debug_assertions))]
	#[inline]
	fn debug_assert_consistent(&self) {}
}
