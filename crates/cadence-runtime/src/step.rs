//! Step scheduling
//!
//! A resumable function is an explicit state machine: every call runs the
//! one block selected by the current state and returns the next state.
//! Nothing falls through; a call runs at most one block.

use std::fmt::Debug;

/// Result of running one block
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Step<S> {
    /// Block complete; run `S` on the next call
    Next(S),
    /// Run the same block again on the next call
    Repeat,
    /// Final block complete; restart from the initial state
    Done,
    /// Give up; restart from the initial state
    Abort,
}

impl<S> Step<S> {
    /// `Repeat` while `condition` holds, otherwise `Next(next)`
    pub fn repeat_while(condition: bool, next: S) -> Self {
        if condition {
            Step::Repeat
        } else {
            Step::Next(next)
        }
    }

    /// `Repeat` while `condition` holds, otherwise `Done`
    pub fn finish_unless(condition: bool) -> Self {
        if condition {
            Step::Repeat
        } else {
            Step::Done
        }
    }
}

/// What one call of a step function did
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum StepStatus {
    /// The skip guard held; no block ran
    Skipped,
    /// A block ran and the cursor moved on
    Advanced,
    /// A block ran and will run again
    Repeated,
    /// The final block ran; the cursor is back at the start
    Finished,
    /// The run was abandoned; the cursor is back at the start
    Aborted,
}

/// Block sequence driven one block per call
///
/// `State::default()` is the first block.
pub trait StepFunction {
    type State: Copy + Eq + Debug + Default;

    /// Return without running any block when this holds
    fn skip(&self, _state: Self::State) -> bool {
        false
    }

    /// Run the block for `state`
    fn step(&mut self, state: Self::State) -> Step<Self::State>;
}

/// Cursor owner for a step function
#[derive(Debug)]
pub struct Stepper<F: StepFunction> {
    function: F,
    state: F::State,
    blocks_run: u64,
}

impl<F: StepFunction> Stepper<F> {
    pub fn new(function: F) -> Self {
        Stepper {
            function,
            state: F::State::default(),
            blocks_run: 0,
        }
    }

    /// Run at most one block
    pub fn call(&mut self) -> StepStatus {
        if self.function.skip(self.state) {
            return StepStatus::Skipped;
        }

        self.blocks_run += 1;
        let status = match self.function.step(self.state) {
            Step::Next(next) => {
                self.state = next;
                StepStatus::Advanced
            }
            Step::Repeat => StepStatus::Repeated,
            Step::Done => {
                self.state = F::State::default();
                StepStatus::Finished
            }
            Step::Abort => {
                self.state = F::State::default();
                StepStatus::Aborted
            }
        };
        tracing::trace!(state = ?self.state, ?status, "step");
        status
    }

    /// Abandon the current run; the next call starts from the first block
    pub fn abort(&mut self) {
        self.state = F::State::default();
    }

    /// Block that the next call will run
    pub fn state(&self) -> F::State {
        self.state
    }

    pub fn blocks_run(&self) -> u64 {
        self.blocks_run
    }

    pub fn function(&self) -> &F {
        &self.function
    }

    pub fn function_mut(&mut self) -> &mut F {
        &mut self.function
    }

    pub fn into_inner(self) -> F {
        self.function
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
    enum Blink {
        #[default]
        On,
        Wait,
        Off,
    }

    #[derive(Default)]
    struct Blinker {
        trace: Vec<Blink>,
        wait_ticks: u32,
        paused: bool,
    }

    impl StepFunction for Blinker {
        type State = Blink;

        fn skip(&self, _state: Blink) -> bool {
            self.paused
        }

        fn step(&mut self, state: Blink) -> Step<Blink> {
            self.trace.push(state);
            match state {
                Blink::On => Step::Next(Blink::Wait),
                Blink::Wait => {
                    self.wait_ticks = self.wait_ticks.saturating_sub(1);
                    Step::repeat_while(self.wait_ticks > 0, Blink::Off)
                }
                Blink::Off => Step::Done,
            }
        }
    }

    #[test]
    fn test_one_block_per_call() {
        let mut stepper = Stepper::new(Blinker::default());
        assert_eq!(stepper.call(), StepStatus::Advanced);
        assert_eq!(stepper.call(), StepStatus::Advanced);
        assert_eq!(stepper.call(), StepStatus::Finished);
        assert_eq!(stepper.function().trace, vec![Blink::On, Blink::Wait, Blink::Off]);
        assert_eq!(stepper.state(), Blink::On);
    }

    #[test]
    fn test_repeat_while() {
        let mut stepper = Stepper::new(Blinker {
            wait_ticks: 3,
            ..Default::default()
        });
        let statuses: Vec<_> = (0..5).map(|_| stepper.call()).collect();
        assert_eq!(
            statuses,
            vec![
                StepStatus::Advanced,
                StepStatus::Repeated,
                StepStatus::Repeated,
                StepStatus::Advanced,
                StepStatus::Finished,
            ]
        );
    }

    #[test]
    fn test_skip_guard() {
        let mut stepper = Stepper::new(Blinker::default());
        stepper.call();
        stepper.function_mut().paused = true;
        assert_eq!(stepper.call(), StepStatus::Skipped);
        assert_eq!(stepper.state(), Blink::Wait);
        assert_eq!(stepper.blocks_run(), 1);
    }

    #[test]
    fn test_abort_resets_cursor() {
        let mut stepper = Stepper::new(Blinker::default());
        stepper.call();
        assert_eq!(stepper.state(), Blink::Wait);
        stepper.abort();
        assert_eq!(stepper.state(), Blink::On);
        stepper.call();
        assert_eq!(stepper.function().trace, vec![Blink::On, Blink::On]);
    }

    /// Linear chain of `len` blocks recording which block ran per call
    struct Chain {
        len: u8,
        ran: Vec<u8>,
    }

    impl StepFunction for Chain {
        type State = u8;

        fn step(&mut self, state: u8) -> Step<u8> {
            self.ran.push(state);
            if state + 1 == self.len {
                Step::Done
            } else {
                Step::Next(state + 1)
            }
        }
    }

    proptest! {
        #[test]
        fn prop_k_calls_run_k_blocks_in_order(len in 1u8..12, calls in 1u8..12) {
            let calls = calls.min(len);
            let mut stepper = Stepper::new(Chain { len, ran: Vec::new() });
            let mut last = StepStatus::Skipped;
            for _ in 0..calls {
                last = stepper.call();
            }
            let expected: Vec<u8> = (0..calls).collect();
            prop_assert_eq!(&stepper.function().ran, &expected);
            if calls == len {
                prop_assert_eq!(last, StepStatus::Finished);
                prop_assert_eq!(stepper.state(), 0);
            } else {
                prop_assert_eq!(last, StepStatus::Advanced);
            }
        }
    }
}
