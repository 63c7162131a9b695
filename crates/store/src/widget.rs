//! Widget values and the inputs that create or change them.
//!
//! A [`Widget`] is immutable once constructed. Every mutation, including a
//! z-index shift caused by another widget's collision, builds a new value and
//! therefore a new `updated_at` timestamp.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Numeric identifier for a widget.
///
/// Assigned once at creation in strictly increasing order and never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WidgetId(pub u32);

impl std::fmt::Display for WidgetId {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "{}", self.0)
	}
}

/// A rectangular visual object with a position, a draw-order rank and a size.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Widget {
	pub id: WidgetId,
	pub x: i32,
	pub y: i32,
	/// Draw-order rank, unique among live widgets. Higher draws on top.
	pub z_index: i32,
	pub height: f64,
	pub width: f64,
	/// When this particular value was constructed.
	pub updated_at: DateTime<Utc>,
}

impl Widget {
	pub(crate) fn new(id: WidgetId, request: &NewWidget, z_index: i32) -> Self {
		Self {
			id,
			x: request.x,
			y: request.y,
			z_index,
			height: request.height,
			width: request.width,
			updated_at: Utc::now(),
		}
	}

	/// Returns a copy moved to `z_index`, stamped now.
	pub(crate) fn with_z_index(&self, z_index: i32) -> Self {
		Self {
			z_index,
			updated_at: Utc::now(),
			..self.clone()
		}
	}

	/// Overlays the present fields of `changes`, stamped now.
	pub(crate) fn apply(&self, changes: &WidgetChanges) -> Self {
		Self {
			id: self.id,
			x: changes.x.unwrap_or(self.x),
			y: changes.y.unwrap_or(self.y),
			z_index: changes.z_index.unwrap_or(self.z_index),
			height: changes.height.unwrap_or(self.height),
			width: changes.width.unwrap_or(self.width),
			updated_at: Utc::now(),
		}
	}

	/// Compares every field except `updated_at`.
	pub fn same_content(&self, other: &Widget) -> bool {
		self.id == other.id
			&& self.x == other.x
			&& self.y == other.y
			&& self.z_index == other.z_index
			&& self.height == other.height
			&& self.width == other.width
	}
}

/// Input for [`WidgetRepository::create`](crate::WidgetRepository::create).
///
/// Without an explicit `z_index` the store places the widget above every
/// auto-placed widget.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewWidget {
	pub x: i32,
	pub y: i32,
	#[serde(default)]
	pub z_index: Option<i32>,
	pub height: f64,
	pub width: f64,
}

impl NewWidget {
	pub fn new(x: i32, y: i32, height: f64, width: f64) -> Self {
		Self {
			x,
			y,
			z_index: None,
			height,
			width,
		}
	}

	/// Requests an explicit z-index.
	pub fn at_z_index(mut self, z_index: i32) -> Self {
		self.z_index = Some(z_index);
		self
	}
}

/// Partial changeset for [`WidgetRepository::update`](crate::WidgetRepository::update).
///
/// Absent fields keep their current value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct WidgetChanges {
	pub x: Option<i32>,
	pub y: Option<i32>,
	pub z_index: Option<i32>,
	pub height: Option<f64>,
	pub width: Option<f64>,
}

impl WidgetChanges {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn x(mut self, x: i32) -> Self {
		self.x = Some(x);
		self
	}

	pub fn y(mut self, y: i32) -> Self {
		self.y = Some(y);
		self
	}

	pub fn z_index(mut self, z_index: i32) -> Self {
		self.z_index = Some(z_index);
		self
	}

	pub fn height(mut self, height: f64) -> Self {
		self.height = Some(height);
		self
	}

	pub fn width(mut self, width: f64) -> Self {
		self.width = Some(width);
		self
	}

	/// Returns true if no field is set.
	pub fn is_empty(&self) -> bool {
		self.x.is_none()
			&& self.y.is_none()
			&& self.z_index.is_none()
			&& self.height.is_none()
			&& self.width.is_none()
	}
}
