//! Property-based invariant tests for the cancellable timer scheduler.
//!
//! 1. Every scheduled payload comes back exactly once (cancel, fire, or cancel_all).
//! 2. Deadlines never fire before their time.
//! 3. Fired deadlines come out in non-decreasing deadline order.

use std::collections::HashSet;
use std::time::Duration;

use folio_core::timer::{Scheduler, TimerHandle};
use proptest::prelude::*;

#[derive(Debug, Clone)]
enum Op {
    Schedule(u64),
    Frame,
    Cancel(usize),
    Advance(u64),
    RunFrame,
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        (0u64..2000).prop_map(Op::Schedule),
        Just(Op::Frame),
        (0usize..64).prop_map(Op::Cancel),
        (0u64..500).prop_map(Op::Advance),
        Just(Op::RunFrame),
    ]
}

fn record(payload: u32, returned: &mut HashSet<u32>) -> Result<(), TestCaseError> {
    prop_assert!(returned.insert(payload), "payload {} returned twice", payload);
    Ok(())
}

proptest! {
    #[test]
    fn every_payload_returned_exactly_once(ops in prop::collection::vec(op_strategy(), 1..200)) {
        let mut timers: Scheduler<(u32, Option<Duration>)> = Scheduler::new();
        let mut handles: Vec<TimerHandle> = Vec::new();
        let mut returned: HashSet<u32> = HashSet::new();
        let mut issued = 0u32;
        let mut now = Duration::ZERO;

        for op in ops {
            match op {
                Op::Schedule(delay) => {
                    let deadline = now + Duration::from_millis(delay);
                    handles.push(timers.schedule_at(deadline, (issued, Some(deadline))));
                    issued += 1;
                }
                Op::Frame => {
                    handles.push(timers.request_frame((issued, None)));
                    issued += 1;
                }
                Op::Cancel(idx) => {
                    if !handles.is_empty() {
                        let handle = handles.remove(idx % handles.len());
                        if let Some((payload, _)) = timers.cancel(handle) {
                            record(payload, &mut returned)?;
                        }
                    }
                }
                Op::Advance(step) => {
                    now += Duration::from_millis(step);
                    let mut last = Duration::ZERO;
                    for (payload, deadline) in timers.run_due(now) {
                        let deadline = deadline.expect("only deadlines fire from run_due");
                        prop_assert!(deadline <= now);
                        prop_assert!(deadline >= last);
                        last = deadline;
                        record(payload, &mut returned)?;
                    }
                }
                Op::RunFrame => {
                    for (payload, deadline) in timers.run_frame() {
                        prop_assert!(deadline.is_none());
                        record(payload, &mut returned)?;
                    }
                }
            }
        }

        let leftover = timers.pending();
        prop_assert_eq!(timers.cancel_all(), leftover);
        prop_assert_eq!(returned.len() + leftover, issued as usize);
    }
}
