use std::time::Duration;

/// Number of polls run at the fast cadence before slowing down.
pub const FAST_POLLS: u32 = 6;

/// Delay before the poll following poll number `completed` (1-based).
///
/// Card balances usually move within the first minute after an action, so
/// the first six polls are 10s apart and the rest 30s.
pub fn card_poll_interval(completed: u32) -> Duration {
    match completed {
        n if n < FAST_POLLS => Duration::from_secs(10),
        _ => Duration::from_secs(30),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_two_phase_schedule() {
        let delays: Vec<u64> = (1..=8).map(|n| card_poll_interval(n).as_secs()).collect();
        assert_eq!(delays, vec![10, 10, 10, 10, 10, 30, 30, 30]);
    }
}
