//! Order index: the z-index to widget mapping, kept as the rank-ordered
//! inverse of the widget table.
//!
//! The index owns z-index allocation. Auto-placed widgets advance an internal
//! watermark by a random gap drawn from [`ZIndexGap`], so that later explicit
//! inserts between them rarely collide. Collisions are resolved by a cascading
//! shift: every widget in the affected run moves up by one, highest first, so
//! each target slot is vacated before something moves into it.

use std::collections::BTreeMap;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::config::{ShiftBound, ZIndexGap};
use crate::error::InvariantViolation;
use crate::widget::WidgetId;

#[derive(Debug)]
pub(crate) struct OrderIndex {
	slots: BTreeMap<i32, WidgetId>,
	/// High-water mark of auto-placed z-indices; also bounds cascades.
	watermark: i32,
	gap: ZIndexGap,
	rng: StdRng,
}

impl OrderIndex {
	pub fn new(gap: ZIndexGap, seed: Option<u64>) -> Self {
		let rng = match seed {
			Some(seed) => StdRng::seed_from_u64(seed),
			None => StdRng::from_os_rng(),
		};
		Self {
			slots: BTreeMap::new(),
			watermark: 0,
			gap,
			rng,
		}
	}

	/// Returns `explicit` unchanged, or the watermark plus a random gap.
	///
	/// Does not move the watermark: once the create that asked for an
	/// automatic slot can no longer fail, pass the result to
	/// [`Self::advance_watermark`]. Collision handling is left to the caller.
	pub fn propose_z_index(&mut self, explicit: Option<i32>) -> Result<i32, InvariantViolation> {
		if let Some(z_index) = explicit {
			return Ok(z_index);
		}
		let step = self.rng.random_range(self.gap.min..self.gap.max);
		self.watermark
			.checked_add(step)
			.ok_or(InvariantViolation::ZIndexOverflow(self.watermark))
	}

	/// Commits an automatic slot returned by [`Self::propose_z_index`].
	pub fn advance_watermark(&mut self, z_index: i32) {
		debug_assert!(z_index > self.watermark, "watermark must only rise");
		self.watermark = z_index;
	}

	pub fn watermark(&self) -> i32 {
		self.watermark
	}

	pub fn is_occupied(&self, z_index: i32) -> bool {
		self.slots.contains_key(&z_index)
	}

	pub fn occupant(&self, z_index: i32) -> Option<WidgetId> {
		self.slots.get(&z_index).copied()
	}

	/// Maps `z_index` to `id`, returning the previous occupant.
	pub fn insert(&mut self, z_index: i32, id: WidgetId) -> Option<WidgetId> {
		self.slots.insert(z_index, id)
	}

	pub fn remove(&mut self, z_index: i32) -> Option<WidgetId> {
		self.slots.remove(&z_index)
	}

	#[cfg(any(test, debug_assertions))]
	pub fn len(&self) -> usize {
		self.slots.len()
	}

	/// `(z_index, id)` entries in ascending z-index order.
	pub fn iter(&self) -> impl Iterator<Item = (i32, WidgetId)> + '_ {
		self.slots.iter().map(|(&z_index, &id)| (z_index, id))
	}

	/// Plans the cascading shift that vacates `from`.
	///
	/// Returns the `(z_index, id)` entries to move up by one, highest first.
	/// The run covers `[from, upper]` where `upper` is chosen by `bound`
	/// (never below `from`). If the top of that run would land on an occupied
	/// slot, the run extends through the contiguous occupied slots above it,
	/// so the shift never produces a duplicate.
	///
	/// `vacated` names a slot to treat as empty: an update that moves a widget
	/// away from its old slot must not shift that widget.
	///
	/// Read-only. An error means nothing may be moved.
	pub fn cascade(
		&self,
		from: i32,
		bound: ShiftBound,
		vacated: Option<i32>,
	) -> Result<Vec<(i32, WidgetId)>, InvariantViolation> {
		let held = |z_index: i32| Some(z_index) != vacated && self.slots.contains_key(&z_index);

		let mut upper = match bound {
			ShiftBound::Watermark => self.watermark,
			ShiftBound::HighestLive => self.slots.last_key_value().map_or(from, |(&z, _)| z),
		}
		.max(from);

		while held(upper) {
			match upper.checked_add(1) {
				Some(next) if held(next) => upper = next,
				_ => break,
			}
		}

		self.slots
			.range(from..=upper)
			.rev()
			.filter(|&(&z_index, _)| Some(z_index) != vacated)
			.map(|(&z_index, &id)| match z_index.checked_add(1) {
				Some(_) => Ok((z_index, id)),
				None => Err(InvariantViolation::ZIndexOverflow(z_index)),
			})
			.collect()
	}
}
