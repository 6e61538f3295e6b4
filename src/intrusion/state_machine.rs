use crate::intrusion::Transition;
use crate::tracker::ZoneState;

/// Per-object debounced zone state.
///
/// `observed` is the raw per-frame containment result and
/// `frames_since_state_change` counts the frames it has held since it last
/// flipped. `confirmed` only follows `observed` once the observation has held
/// for `debounce_frames` consecutive frames, counting the frame of the flip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct IntrusionState {
    confirmed: ZoneState,
    observed: ZoneState,
    frames_since_state_change: u32,
}

impl IntrusionState {
    /// Confirmed state, the one alerts are based on.
    pub fn state(&self) -> ZoneState {
        self.confirmed
    }

    /// Raw state seen in the latest frame.
    pub fn observed(&self) -> ZoneState {
        self.observed
    }

    pub fn frames_since_state_change(&self) -> u32 {
        self.frames_since_state_change
    }

    /// Feed one frame's containment result.
    ///
    /// Returns the crossing when this frame confirms a new state.
    pub fn observe(&mut self, observed: ZoneState, debounce_frames: u32) -> Option<Transition> {
        self.record(observed);

        let held = self.frames_since_state_change.saturating_add(1);
        if self.observed != self.confirmed && held >= debounce_frames.max(1) {
            self.confirmed = self.observed;
            return Some(Transition::into_state(self.confirmed));
        }
        None
    }

    /// Pin the object outside without confirming a crossing.
    pub fn force_outside(&mut self) {
        self.record(ZoneState::Outside);
        self.confirmed = ZoneState::Outside;
    }

    /// Back to the registration state.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    fn record(&mut self, observed: ZoneState) {
        if observed != self.observed {
            self.observed = observed;
            self.frames_since_state_change = 0;
        } else {
            self.frames_since_state_change = self.frames_since_state_change.saturating_add(1);
        }
    }
}
