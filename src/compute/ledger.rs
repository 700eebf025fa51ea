//! ledger.rs
//! Per-view output cache with dirty flags.
//!
//! Invalidation only marks a slot dirty: the last output (or failure) stays
//! readable until the view is recomputed.

use super::pipeline::DerivedSeries;
use crate::display::chart::Chart;
use crate::error::ConfigurationError;
use crate::graph::ViewId;

/// A successfully computed view.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewOutput {
    pub series: DerivedSeries,
    pub chart: Chart,
}

pub type ViewResult = Result<ViewOutput, ConfigurationError>;

#[derive(Debug, Clone)]
struct Slot {
    output: Option<ViewResult>,
    dirty: bool,
    recomputed: u64,
}

impl Default for Slot {
    fn default() -> Self { Self { output: None, dirty: true, recomputed: 0 } }
}

#[derive(Debug, Clone, Default)]
pub struct Ledger {
    slots: Vec<Slot>,
}

impl Ledger {
    pub fn new() -> Self { Self::default() }

    /// New slots start dirty with no output.
    pub fn ensure_capacity(&mut self, size: usize) {
        if self.slots.len() < size {
            self.slots.resize(size, Slot::default());
        }
    }

    pub fn get(&self, view: ViewId) -> Option<&ViewResult> {
        self.slots.get(view.index())?.output.as_ref()
    }

    /// Returns the cached output, running `compute` first if the slot is dirty.
    pub fn get_or_compute(&mut self, view: ViewId, compute: impl FnOnce() -> ViewResult) -> &ViewResult {
        let idx = view.index();
        if idx >= self.slots.len() {
            self.slots.resize(idx + 1, Slot::default());
        }
        let slot = &mut self.slots[idx];
        if slot.dirty {
            slot.output = None;
            slot.dirty = false;
            slot.recomputed += 1;
        }
        slot.output.get_or_insert_with(compute)
    }

    pub fn invalidate(&mut self, views: impl IntoIterator<Item = ViewId>) {
        for id in views {
            if let Some(slot) = self.slots.get_mut(id.index()) {
                slot.dirty = true;
            }
        }
    }

    pub fn is_dirty(&self, view: ViewId) -> bool {
        self.slots.get(view.index()).map_or(true, |s| s.dirty)
    }

    /// How many times `view` has been computed.
    pub fn recompute_count(&self, view: ViewId) -> u64 {
        self.slots.get(view.index()).map_or(0, |s| s.recomputed)
    }
}
