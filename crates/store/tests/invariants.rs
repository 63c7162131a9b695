#![allow(unused_crate_dependencies)]

//! Random operation sequences against a live store, checking the ordering
//! and uniqueness invariants after every step.

use canvas_store::{
	NewWidget, StoreConfig, Widget, WidgetChanges, WidgetId, WidgetRepository, WidgetStore,
};
use proptest::prelude::*;

#[derive(Debug, Clone)]
enum Op {
	Create {
		z_index: Option<i32>,
	},
	Update {
		slot: usize,
		z_index: Option<i32>,
		y: Option<i32>,
	},
	Delete {
		slot: usize,
	},
}

fn arb_z_index() -> impl Strategy<Value = Option<i32>> {
	prop::option::of(-5..60_i32)
}

fn arb_op() -> impl Strategy<Value = Op> {
	prop_oneof![
		3 => arb_z_index().prop_map(|z_index| Op::Create { z_index }),
		2 => (any::<usize>(), arb_z_index(), prop::option::of(-100..100_i32))
			.prop_map(|(slot, z_index, y)| Op::Update { slot, z_index, y }),
		1 => any::<usize>().prop_map(|slot| Op::Delete { slot }),
	]
}

/// Picks a live widget, or an identifier that was never allocated.
fn pick(live: &[WidgetId], slot: usize) -> WidgetId {
	if live.is_empty() {
		WidgetId(u32::MAX)
	} else {
		live[slot % live.len()]
	}
}

fn assert_consistent(store: &WidgetStore, live: &[WidgetId]) -> Result<(), TestCaseError> {
	let listed = store.list().unwrap();
	prop_assert_eq!(listed.len(), live.len());
	prop_assert_eq!(store.stats().unwrap().live, live.len());

	for pair in listed.windows(2) {
		prop_assert!(
			pair[0].z_index < pair[1].z_index,
			"z-index order broken: {} then {}",
			pair[0].z_index,
			pair[1].z_index
		);
	}

	let mut ids: Vec<_> = listed.iter().map(|w| w.id).collect();
	ids.sort();
	let mut expected = live.to_vec();
	expected.sort();
	prop_assert_eq!(ids, expected);

	for widget in &listed {
		let found = store.find(widget.id).unwrap();
		prop_assert_eq!(found.as_ref(), Some(widget));
	}
	Ok(())
}

/// Checks how an explicit create at `z_index` moved the widgets in `before`.
fn assert_cascade(
	store: &WidgetStore,
	before: &[Widget],
	z_index: i32,
	watermark: i32,
) -> Result<(), TestCaseError> {
	let collided = before.iter().any(|w| w.z_index == z_index);
	for old in before {
		let now = store.find(old.id).unwrap().unwrap();
		if collided && (z_index..=watermark).contains(&old.z_index) {
			prop_assert_eq!(now.z_index, old.z_index + 1);
		} else if !collided || old.z_index < z_index {
			prop_assert_eq!(now.z_index, old.z_index);
		}
		prop_assert_eq!((now.x, now.y), (old.x, old.y));
		prop_assert_eq!((now.height, now.width), (old.height, old.width));
	}
	Ok(())
}

proptest! {
	#[test]
	fn prop_invariants_hold(ops in prop::collection::vec(arb_op(), 1..60), seed in any::<u64>()) {
		let store = WidgetStore::with_config(StoreConfig::default().with_seed(seed)).unwrap();
		let mut live: Vec<WidgetId> = Vec::new();
		let mut last_id: Option<WidgetId> = None;

		for op in ops {
			match op {
				Op::Create { z_index } => {
					let before = store.list().unwrap();
					let watermark = store.stats().unwrap().watermark;
					let request = NewWidget::new(1, 2, 3.0, 4.0);
					let created = match z_index {
						Some(z) => store.create(request.at_z_index(z)).unwrap(),
						None => store.create(request).unwrap(),
					};

					match z_index {
						Some(z) => {
							prop_assert_eq!(created.z_index, z);
							assert_cascade(&store, &before, z, watermark)?;
						}
						None => {
							let step = created.z_index - watermark;
							prop_assert!((10..110).contains(&step), "gap {} out of range", step);
						}
					}
					if let Some(last) = last_id {
						prop_assert!(created.id > last);
					}
					last_id = Some(created.id);
					live.push(created.id);
				}
				Op::Update { slot, z_index, y } => {
					let id = pick(&live, slot);
					let before = store.find(id).unwrap();
					let changes = WidgetChanges { z_index, y, ..WidgetChanges::default() };
					let updated = store.update(id, &changes).unwrap();

					match (before, updated) {
						(Some(old), Some(new)) => {
							prop_assert_eq!(new.x, old.x);
							prop_assert_eq!(new.y, y.unwrap_or(old.y));
							prop_assert_eq!(new.z_index, z_index.unwrap_or(old.z_index));
							prop_assert_eq!(store.find(id).unwrap(), Some(new));
						}
						(None, None) => {}
						(before, updated) => {
							prop_assert!(false, "presence changed: {:?} -> {:?}", before, updated);
						}
					}
				}
				Op::Delete { slot } => {
					let id = pick(&live, slot);
					let existed = live.contains(&id);
					prop_assert_eq!(store.delete(id).unwrap(), existed);
					prop_assert!(!store.delete(id).unwrap());
					live.retain(|&l| l != id);
				}
			}
			assert_consistent(&store, &live)?;
		}
	}
}
