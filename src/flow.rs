use std::time::{Duration, Instant};

/// Keypresses are ignored for this long after a modal opens, so the Enter
/// that triggered it cannot double as its own acknowledgement.
pub const KEY_ARM_DELAY: Duration = Duration::from_millis(500);

/// Modal state of the interaction flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlowState {
    Idle,
    ConfirmingDelete { todo_id: i64 },
    WarningEmptyInput,
}

/// Confirmation/validation gate in front of destructive or invalid actions.
///
/// Keyboard shortcut handling is enabled and disabled purely by entering and
/// leaving a state; there is no listener bookkeeping anywhere else.
#[derive(Debug, Clone, Copy)]
pub struct InteractionFlow {
    state: FlowState,
    entered_at: Option<Instant>,
}

impl Default for InteractionFlow {
    fn default() -> Self {
        Self::new()
    }
}

impl InteractionFlow {
    pub fn new() -> Self {
        Self {
            state: FlowState::Idle,
            entered_at: None,
        }
    }

    pub fn state(&self) -> FlowState {
        self.state
    }

    pub fn is_idle(&self) -> bool {
        self.state == FlowState::Idle
    }

    /// User clicked delete on a todo: ask before doing anything.
    pub fn request_delete(&mut self, todo_id: i64, now: Instant) {
        self.enter(FlowState::ConfirmingDelete { todo_id }, now);
    }

    /// User submitted an empty title: warn instead of calling the backend.
    pub fn warn_empty_input(&mut self, now: Instant) {
        self.enter(FlowState::WarningEmptyInput, now);
    }

    /// Confirm the pending delete. Returns the id to delete, or `None` if no
    /// delete was pending.
    pub fn confirm_delete(&mut self) -> Option<i64> {
        match self.state {
            FlowState::ConfirmingDelete { todo_id } => {
                self.leave();
                Some(todo_id)
            }
            _ => None,
        }
    }

    /// Cancel the pending delete, no side effect.
    pub fn cancel(&mut self) {
        if matches!(self.state, FlowState::ConfirmingDelete { .. }) {
            self.leave();
        }
    }

    /// Acknowledge the empty-input warning.
    pub fn acknowledge_warning(&mut self) {
        if self.state == FlowState::WarningEmptyInput {
            self.leave();
        }
    }

    /// Whether modal keyboard shortcuts are live yet.
    pub fn keys_armed(&self, now: Instant) -> bool {
        match self.entered_at {
            Some(entered) => now.duration_since(entered) >= KEY_ARM_DELAY,
            None => false,
        }
    }

    fn enter(&mut self, state: FlowState, now: Instant) {
        self.state = state;
        self.entered_at = Some(now);
    }

    fn leave(&mut self) {
        self.state = FlowState::Idle;
        self.entered_at = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_delete_confirm_cycle() {
        let mut flow = InteractionFlow::new();
        let now = Instant::now();

        flow.request_delete(7, now);
        assert_eq!(flow.state(), FlowState::ConfirmingDelete { todo_id: 7 });

        assert_eq!(flow.confirm_delete(), Some(7));
        assert!(flow.is_idle());
    }

    #[test]
    fn test_delete_cancel_has_no_side_effect() {
        let mut flow = InteractionFlow::new();
        flow.request_delete(7, Instant::now());
        flow.cancel();
        assert!(flow.is_idle());
        // Nothing left to confirm.
        assert_eq!(flow.confirm_delete(), None);
    }

    #[test]
    fn test_empty_input_warning_cycle() {
        let mut flow = InteractionFlow::new();
        flow.warn_empty_input(Instant::now());
        assert_eq!(flow.state(), FlowState::WarningEmptyInput);

        flow.acknowledge_warning();
        assert!(flow.is_idle());
    }

    #[test]
    fn test_confirm_in_idle_returns_none() {
        let mut flow = InteractionFlow::new();
        assert_eq!(flow.confirm_delete(), None);
        flow.acknowledge_warning();
        assert!(flow.is_idle());
    }

    #[test]
    fn test_keys_suppressed_inside_arm_window() {
        let mut flow = InteractionFlow::new();
        let opened = Instant::now();
        flow.warn_empty_input(opened);

        // The keypress that opened the modal arrives "immediately".
        assert!(!flow.keys_armed(opened));
        assert!(!flow.keys_armed(opened + Duration::from_millis(499)));
        assert!(flow.keys_armed(opened + KEY_ARM_DELAY));
        assert!(flow.keys_armed(opened + Duration::from_millis(800)));
    }

    #[test]
    fn test_keys_never_armed_while_idle() {
        let flow = InteractionFlow::new();
        assert!(!flow.keys_armed(Instant::now()));
    }

    #[test]
    fn test_reentering_resets_arm_window() {
        let mut flow = InteractionFlow::new();
        let first = Instant::now();
        flow.request_delete(1, first);
        flow.cancel();

        let second = first + Duration::from_secs(2);
        flow.request_delete(2, second);
        assert!(!flow.keys_armed(second + Duration::from_millis(100)));
        assert!(flow.keys_armed(second + KEY_ARM_DELAY));
    }
}
