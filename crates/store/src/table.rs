use std::collections::HashMap;

use crate::error::InvariantViolation;
use crate::widget::{Widget, WidgetId};

/// Primary storage keyed by widget identifier. Owns identifier allocation.
#[derive(Debug)]
pub(crate) struct WidgetTable {
	widgets: HashMap<WidgetId, Widget>,
	/// Next identifier to hand out; `None` once the id space is spent.
	next_id: Option<u32>,
}

impl WidgetTable {
	pub fn new() -> Self {
		Self {
			widgets: HashMap::new(),
			next_id: Some(0),
		}
	}

	/// Hands out the next identifier.
	///
	/// Fails without consuming the identifier if it is already present.
	pub fn allocate_id(&mut self) -> Result<WidgetId, InvariantViolation> {
		let raw = self.next_id.ok_or(InvariantViolation::IdSpaceExhausted)?;
		let id = WidgetId(raw);
		if self.widgets.contains_key(&id) {
			return Err(InvariantViolation::DuplicateId(id));
		}
		self.next_id = raw.checked_add(1);
		Ok(id)
	}

	/// Returns the identifier the next allocation would yield.
	pub fn peek_next_id(&self) -> Option<WidgetId> {
		self.next_id.map(WidgetId)
	}

	pub fn get(&self, id: WidgetId) -> Option<&Widget> {
		self.widgets.get(&id)
	}

	/// Inserts or replaces the record for `widget.id`.
	pub fn put(&mut self, widget: Widget) {
		self.widgets.insert(widget.id, widget);
	}

	/// Removes the record, returning it if it existed.
	pub fn remove(&mut self, id: WidgetId) -> Option<Widget> {
		self.widgets.remove(&id)
	}

	pub fn len(&self) -> usize {
		self.widgets.len()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::widget::NewWidget;

	fn widget(id: u32, z_index: i32) -> Widget {
		Widget::new(WidgetId(id), &NewWidget::new(0, 0, 1.0, 1.0), z_index)
	}

	#[test]
	fn test_ids_start_at_zero_and_increase() {
		let mut table = WidgetTable::new();
		assert_eq!(table.allocate_id(), Ok(WidgetId(0)));
		assert_eq!(table.allocate_id(), Ok(WidgetId(1)));
		assert_eq!(table.peek_next_id(), Some(WidgetId(2)));
	}

	#[test]
	fn test_ids_not_reused_after_remove() {
		let mut table = WidgetTable::new();
		let id = table.allocate_id().unwrap();
		table.put(widget(id.0, 1));
		assert!(table.remove(id).is_some());
		assert!(table.remove(id).is_none());
		assert_eq!(table.allocate_id(), Ok(WidgetId(1)));
	}

	#[test]
	fn test_duplicate_id_detected_without_consuming() {
		let mut table = WidgetTable::new();
		table.put(widget(0, 1));
		assert_eq!(
			table.allocate_id(),
			Err(InvariantViolation::DuplicateId(WidgetId(0)))
		);
		assert_eq!(table.peek_next_id(), Some(WidgetId(0)));
	}

	#[test]
	fn test_id_space_exhaustion() {
		let mut table = WidgetTable {
			widgets: HashMap::new(),
			next_id: Some(u32::MAX),
		};
		assert_eq!(table.allocate_id(), Ok(WidgetId(u32::MAX)));
		assert_eq!(
			table.allocate_id(),
			Err(InvariantViolation::IdSpaceExhausted)
		);
	}
}
