//! Protocols
//!
//! A protocol is a step function whose blocks set up productions. Each
//! block registers the rules for the next production and may stage one
//! action with `Production::perform`. When the block returns, the staged
//! action runs exactly once; if it fails the protocol is aborted instead of
//! advancing.
//!
//! Blocks only run after the previous production finished, so from the
//! protocol's point of view every block boundary waits for "the" event.

use std::fmt::Debug;

use cadence_core::CadenceError;
use cadence_production::{Host, Production};

use crate::Step;

/// Sequence of productions
pub trait Protocol {
    type Host: Host;
    type State: Copy + Eq + Debug + Default;

    /// Name used in diagnostics
    fn name(&self) -> &str;

    /// Run the block for `state`
    fn step(
        &mut self,
        state: Self::State,
        production: &mut Production<Self::Host>,
        cx: &mut <Self::Host as Host>::Context,
    ) -> Step<Self::State>;
}

/// What one resumption of a protocol did
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ProtocolStatus {
    /// Block complete, waiting on the next production
    Advanced,
    /// Block will run again after the next production
    Repeated,
    /// Final block complete
    Finished,
    /// The protocol gave up or a staged action failed
    Aborted(Option<CadenceError>),
}

impl ProtocolStatus {
    /// The protocol no longer needs the active slot
    pub fn is_terminal(&self) -> bool {
        matches!(self, ProtocolStatus::Finished | ProtocolStatus::Aborted(_))
    }
}

/// Object-safe view of a running protocol
pub trait Resumable<H: Host> {
    fn name(&self) -> &str;

    /// Debug rendering of the block the next resumption will run
    fn position(&self) -> String;

    /// Run one block and the action it staged
    fn resume(&mut self, production: &mut Production<H>, cx: &mut H::Context) -> ProtocolStatus;

    /// Back to the first block
    fn reset(&mut self);
}

/// Cursor owner for a protocol
#[derive(Debug)]
pub struct ProtocolRunner<P: Protocol> {
    protocol: P,
    state: P::State,
}

impl<P: Protocol> ProtocolRunner<P> {
    pub fn new(protocol: P) -> Self {
        ProtocolRunner {
            protocol,
            state: P::State::default(),
        }
    }

    pub fn state(&self) -> P::State {
        self.state
    }

    pub fn protocol(&self) -> &P {
        &self.protocol
    }

    pub fn into_inner(self) -> P {
        self.protocol
    }
}

impl<P: Protocol> Resumable<P::Host> for ProtocolRunner<P> {
    fn name(&self) -> &str {
        self.protocol.name()
    }

    fn position(&self) -> String {
        format!("{:?}", self.state)
    }

    fn resume(
        &mut self,
        production: &mut Production<P::Host>,
        cx: &mut <P::Host as Host>::Context,
    ) -> ProtocolStatus {
        let block = self.state;
        let step = self.protocol.step(block, production, cx);

        if let Step::Abort = step {
            tracing::warn!(protocol = self.protocol.name(), ?block, "protocol aborted");
            production.cancel();
            self.state = P::State::default();
            return ProtocolStatus::Aborted(None);
        }

        if !production.run_pending(cx) {
            let err = CadenceError::ActionFailed {
                action: production.action_name().to_string(),
                protocol: self.protocol.name().to_string(),
            };
            tracing::warn!(?block, "{}", err);
            self.state = P::State::default();
            return ProtocolStatus::Aborted(Some(err));
        }

        let status = match step {
            Step::Next(next) => {
                self.state = next;
                ProtocolStatus::Advanced
            }
            Step::Repeat => ProtocolStatus::Repeated,
            Step::Done | Step::Abort => {
                self.state = P::State::default();
                ProtocolStatus::Finished
            }
        };
        tracing::debug!(protocol = self.protocol.name(), ?block, ?status, "block complete");
        status
    }

    fn reset(&mut self) {
        self.state = P::State::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{fail, ok, Log, TestHost};
    use cadence_core::Tier;
    use cadence_production::{Pattern, Procedure, ProductionConfig};
    use cadence_time::ManualClock;

    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
    enum Phase {
        #[default]
        Connect,
        Discover,
        Report,
    }

    struct Discovery {
        fail_connect: bool,
        rounds: u8,
    }

    impl Protocol for Discovery {
        type Host = TestHost;
        type State = Phase;

        fn name(&self) -> &str {
            "discovery"
        }

        fn step(&mut self, state: Phase, p: &mut Production<TestHost>, _: &mut Log) -> Step<Phase> {
            match state {
                Phase::Connect => {
                    let action: Procedure<TestHost> = if self.fail_connect { fail } else { ok };
                    p.perform("connect", action, "connect");
                    p.expect(Pattern::EventCode(0x3E), None, "conn").ok();
                    Step::Next(Phase::Discover)
                }
                Phase::Discover => {
                    self.rounds += 1;
                    p.perform("discover", ok, "discover");
                    Step::repeat_while(self.rounds < 2, Phase::Report)
                }
                Phase::Report => Step::Done,
            }
        }
    }

    fn production() -> Production<TestHost> {
        Production::with_clock(ProductionConfig::default(), ManualClock::new())
    }

    #[test]
    fn test_blocks_run_in_order() {
        let mut runner = ProtocolRunner::new(Discovery {
            fail_connect: false,
            rounds: 0,
        });
        let mut p = production();
        let mut log = Log::default();

        assert_eq!(runner.resume(&mut p, &mut log), ProtocolStatus::Advanced);
        assert_eq!(p.tier(Tier::Normal).len(), 1);
        assert_eq!(runner.resume(&mut p, &mut log), ProtocolStatus::Repeated);
        assert_eq!(runner.resume(&mut p, &mut log), ProtocolStatus::Advanced);
        assert_eq!(runner.state(), Phase::Report);
        assert_eq!(runner.resume(&mut p, &mut log), ProtocolStatus::Finished);
        assert_eq!(runner.state(), Phase::Connect);
        assert_eq!(log.entries, vec!["connect", "discover", "discover"]);
    }

    #[test]
    fn test_failed_action_aborts() {
        let mut runner = ProtocolRunner::new(Discovery {
            fail_connect: true,
            rounds: 0,
        });
        let mut p = production();
        let mut log = Log::default();

        let status = runner.resume(&mut p, &mut log);
        assert_eq!(
            status,
            ProtocolStatus::Aborted(Some(CadenceError::ActionFailed {
                action: "connect".into(),
                protocol: "discovery".into(),
            }))
        );
        assert!(status.is_terminal());
        assert_eq!(runner.state(), Phase::Connect);
    }

    /// Stages an action, registers a rule, then gives up
    struct GivesUp;

    impl Protocol for GivesUp {
        type Host = TestHost;
        type State = u8;

        fn name(&self) -> &str {
            "gives_up"
        }

        fn step(&mut self, _: u8, p: &mut Production<TestHost>, _: &mut Log) -> Step<u8> {
            p.perform("connect", ok, "connect");
            p.expect(Pattern::EventCode(0x3E), None, "conn").ok();
            p.until_event(Pattern::EventCode(0x3E));
            Step::Abort
        }
    }

    #[test]
    fn test_abort_drops_staged_action() {
        let mut runner = ProtocolRunner::new(GivesUp);
        let mut p = production();
        let mut log = Log::default();

        assert_eq!(runner.resume(&mut p, &mut log), ProtocolStatus::Aborted(None));
        assert!(!p.has_pending());
        assert!(p.tier(Tier::Normal).is_empty());
        assert!(matches!(p.completion(), cadence_production::Until::Once));

        // Nothing stale runs later
        assert!(p.run_pending(&mut log));
        assert!(log.entries.is_empty());
    }

    #[test]
    fn test_position_and_reset() {
        let mut runner = ProtocolRunner::new(Discovery {
            fail_connect: false,
            rounds: 0,
        });
        let mut p = production();
        let mut log = Log::default();
        runner.resume(&mut p, &mut log);
        assert_eq!(runner.position(), "Discover");
        runner.reset();
        assert_eq!(runner.position(), "Connect");
    }
}
