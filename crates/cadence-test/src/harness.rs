//! Harness - registry, recorder and transport wired together
//!
//! Frames the simulated controller emits in response to a procedure are
//! moved from the recorder's outbox to the transport after every step, so
//! request/response exchanges play out without any hand sequencing.

use cadence_core::CadenceResult;
use cadence_production::DispatchOutcome;
use cadence_runtime::{diagnostics, Protocol, ProtocolStatus, Registry, RuntimeConfig};
use cadence_time::ManualClock;

use crate::{BleHost, FrameScript, NoiseConfig, Recorder, ScriptedTransport};

/// Self-contained protocol test bench
pub struct Harness {
    pub registry: Registry<BleHost>,
    pub recorder: Recorder,
    pub transport: ScriptedTransport,
    pub clock: ManualClock,
}

impl Harness {
    /// Clean transport, default configuration
    pub fn new() -> CadenceResult<Self> {
        Self::with_noise(RuntimeConfig::default(), NoiseConfig::clean(), 0)
    }

    pub fn with_noise(config: RuntimeConfig, noise: NoiseConfig, seed: u64) -> CadenceResult<Self> {
        let clock = ManualClock::new();
        let registry = Registry::with_clock(config, clock.clone())?;
        Ok(Harness {
            registry,
            recorder: Recorder::new(),
            transport: ScriptedTransport::new(noise, seed),
            clock,
        })
    }

    /// Install the global diagnostic rules
    pub fn with_diagnostics(mut self) -> CadenceResult<Self> {
        diagnostics::install(self.registry.production_mut(), "diagnostics")?;
        Ok(self)
    }

    /// Queue unsolicited controller output
    pub fn script(&mut self, script: FrameScript) {
        self.transport.push_frames(script.into_frames());
    }

    /// Start a protocol, running its first block now
    pub fn start<P>(&mut self, protocol: P) -> CadenceResult<ProtocolStatus>
    where
        P: Protocol<Host = BleHost> + 'static,
    {
        let status = self.registry.start(protocol, &mut self.recorder);
        self.flush_outbox();
        status
    }

    /// Deliver one frame
    pub fn step(&mut self) -> Option<DispatchOutcome> {
        let outcome = self.transport.deliver(&mut self.registry, &mut self.recorder);
        self.flush_outbox();
        outcome
    }

    /// Deliver frames until the protocol ends or the transport runs dry
    ///
    /// Returns `true` if no protocol is active afterwards.
    pub fn run_until_idle(&mut self) -> bool {
        let limit = self.registry.config().max_poll_iterations;
        let mut delivered = 0;
        while self.registry.is_running() && !self.transport.is_empty() && delivered < limit {
            self.step();
            delivered += 1;
        }
        !self.registry.is_running()
    }

    fn flush_outbox(&mut self) {
        let frames = self.recorder.take_outbox();
        if !frames.is_empty() {
            tracing::trace!(count = frames.len(), "controller output queued");
            self.transport.push_frames(frames);
        }
    }
}
