//! Consecutive-fault accounting for the traversal loop.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecoveryAction {
    /// Reset the feed and keep going.
    Resume,
    /// The fault cap is hit; abandon the run.
    GiveUp,
}

pub struct RecoveryPolicy {
    consecutive_faults: u32,
    max_faults: u32,
}

impl RecoveryPolicy {
    pub fn new(max_faults: u32) -> Self {
        Self {
            consecutive_faults: 0,
            max_faults,
        }
    }

    /// Record one fault and decide whether the run should continue.
    pub fn record_fault(&mut self) -> RecoveryAction {
        self.consecutive_faults += 1;
        if self.consecutive_faults >= self.max_faults {
            RecoveryAction::GiveUp
        } else {
            RecoveryAction::Resume
        }
    }

    /// A successful action clears the fault streak.
    pub fn record_success(&mut self) {
        self.consecutive_faults = 0;
    }

    pub fn faults(&self) -> u32 {
        self.consecutive_faults
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resumes_below_the_cap() {
        let mut policy = RecoveryPolicy::new(3);
        assert_eq!(policy.record_fault(), RecoveryAction::Resume);
        assert_eq!(policy.record_fault(), RecoveryAction::Resume);
        assert_eq!(policy.faults(), 2);
    }

    #[test]
    fn test_gives_up_at_the_cap() {
        let mut policy = RecoveryPolicy::new(3);
        policy.record_fault();
        policy.record_fault();
        assert_eq!(policy.record_fault(), RecoveryAction::GiveUp);
    }

    #[test]
    fn test_success_clears_the_streak() {
        let mut policy = RecoveryPolicy::new(2);
        policy.record_fault();
        policy.record_success();
        assert_eq!(policy.record_fault(), RecoveryAction::Resume);
    }

    #[test]
    fn test_zero_cap_gives_up_immediately() {
        let mut policy = RecoveryPolicy::new(0);
        assert_eq!(policy.record_fault(), RecoveryAction::GiveUp);
    }
}
