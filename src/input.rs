//! Edge-triggered handling for the tessellation factor keys.

use crate::scene::{TessFactors, TESS_STEP};

/// A control is either `Released` or `Pressed`; only the transition from
/// `Released` to `Pressed` fires an action.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
enum KeyPhase {
    #[default]
    Released,
    Pressed,
}

/// Per-control press/release state machine.
#[derive(Debug, Default, Clone, Copy)]
pub struct KeyEdge {
    phase: KeyPhase,
}

impl KeyEdge {
    /// Feeds one sampled key state. True exactly once per press cycle, no
    /// matter how many iterations the key stays held.
    pub fn fire(&mut self, down: bool) -> bool {
        let fired = down && self.phase == KeyPhase::Released;
        self.phase = if down {
            KeyPhase::Pressed
        } else {
            KeyPhase::Released
        };
        fired
    }
}

/// The four factor keys as sampled for one iteration.
#[derive(Debug, Default, Clone, Copy)]
pub struct FactorKeys {
    pub raise_inner: bool,
    pub lower_inner: bool,
    pub raise_outer: bool,
    pub lower_outer: bool,
}

/// Which factors changed during one iteration and need re-uploading.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct FactorChanges {
    pub inner: bool,
    pub outer: bool,
}

/// Edge trackers for the four tessellation controls.
#[derive(Debug, Default)]
pub struct TessControls {
    raise_inner: KeyEdge,
    lower_inner: KeyEdge,
    raise_outer: KeyEdge,
    lower_outer: KeyEdge,
}

impl TessControls {
    /// Applies at most one step per factor per press cycle.
    pub fn apply(&mut self, keys: FactorKeys, factors: &mut TessFactors) -> FactorChanges {
        let mut changes = FactorChanges::default();
        if self.raise_inner.fire(keys.raise_inner) {
            factors.inner += TESS_STEP;
            changes.inner = true;
        }
        if self.lower_inner.fire(keys.lower_inner) {
            factors.inner -= TESS_STEP;
            changes.inner = true;
        }
        if self.raise_outer.fire(keys.raise_outer) {
            factors.outer += TESS_STEP;
            changes.outer = true;
        }
        if self.lower_outer.fire(keys.lower_outer) {
            factors.outer -= TESS_STEP;
            changes.outer = true;
        }
        changes
    }
}
