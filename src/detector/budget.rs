use std::time::{Duration, Instant};

/// Deadline checks are amortized over this many steps
const CLOCK_CHECK_INTERVAL: u64 = 256;

/// Cooperative ceiling on how much work a detector may do
///
/// Detectors call [`SearchBudget::consume`] once per unit of work (a path
/// extension or an examined node) and stop as soon as it returns `false`.
#[derive(Debug, Clone)]
pub struct SearchBudget {
    limit: u64,
    used: u64,
    deadline: Option<Instant>,
    exhausted: bool,
}

impl SearchBudget {
    /// Budget of `limit` steps, optionally also bounded by wall-clock time
    /// measured from now
    pub fn new(limit: u64, time_limit: Option<Duration>) -> Self {
        Self {
            limit,
            used: 0,
            deadline: time_limit.and_then(|limit| Instant::now().checked_add(limit)),
            exhausted: false,
        }
    }

    pub fn unlimited() -> Self {
        Self::new(u64::MAX, None)
    }

    /// Take one step; returns `false` once the budget is spent
    pub fn consume(&mut self) -> bool {
        if self.exhausted {
            return false;
        }
        if self.used >= self.limit {
            self.exhausted = true;
            return false;
        }
        if let Some(deadline) = self.deadline
            && self.used % CLOCK_CHECK_INTERVAL == 0
            && Instant::now() >= deadline
        {
            self.exhausted = true;
            return false;
        }

        self.used += 1;
        true
    }

    pub fn is_exhausted(&self) -> bool {
        self.exhausted
    }

    pub fn used(&self) -> u64 {
        self.used
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_step_limit() {
        let mut budget = SearchBudget::new(3, None);
        assert!(budget.consume());
        assert!(budget.consume());
        assert!(budget.consume());
        assert!(!budget.consume());
        assert!(budget.is_exhausted());
        assert_eq!(budget.used(), 3);
        assert!(!budget.consume());
    }

    #[test]
    fn test_elapsed_deadline_stops_search() {
        let mut budget = SearchBudget::new(u64::MAX, Some(Duration::ZERO));
        assert!(!budget.consume());
        assert!(budget.is_exhausted());
    }

    #[test]
    fn test_unlimited_budget() {
        let mut budget = SearchBudget::unlimited();
        for _ in 0..10_000 {
            assert!(budget.consume());
        }
        assert!(!budget.is_exhausted());
    }
}
