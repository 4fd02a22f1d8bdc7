//! Protocol registry - the event entry point
//!
//! The registry owns the production and the single active protocol slot.
//! It is an explicit handle: every transport callback goes through
//! `on_event` on a registry value the application owns, so independent
//! registries can coexist in one process.

use std::fmt;

use cadence_core::{CadenceError, CadenceResult, Inbound};
use cadence_production::{truncate_name, DispatchOutcome, Host, Production};
use cadence_time::Clock;

use crate::{Protocol, ProtocolRunner, ProtocolStatus, Resumable, RuntimeConfig};

/// Entry point counters
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RuntimeStats {
    /// Frames passed to `on_event`
    pub dispatches: u64,
    pub finished: u64,
    pub rule_fired: u64,
    pub no_rule: u64,
    /// Frames the transport could not decode
    pub malformed_frames: u64,
    /// Protocol blocks executed
    pub blocks_run: u64,
    pub protocols_started: u64,
    pub protocols_completed: u64,
    pub protocols_aborted: u64,
}

/// Owner of the production and the active protocol
pub struct Registry<H: Host> {
    production: Production<H>,
    active: Option<Box<dyn Resumable<H>>>,
    protocol_name: String,
    config: RuntimeConfig,
    stats: RuntimeStats,
}

impl<H: Host> Registry<H> {
    /// Create a registry driven by the system clock
    pub fn new(config: RuntimeConfig) -> CadenceResult<Self> {
        config.validate()?;
        let production = Production::new(config.production.clone());
        Ok(Self::with_production(config, production))
    }

    /// Create a registry with a custom clock
    pub fn with_clock(config: RuntimeConfig, clock: impl Clock + 'static) -> CadenceResult<Self> {
        config.validate()?;
        let production = Production::with_clock(config.production.clone(), clock);
        Ok(Self::with_production(config, production))
    }

    fn with_production(config: RuntimeConfig, production: Production<H>) -> Self {
        Registry {
            production,
            active: None,
            protocol_name: String::new(),
            config,
            stats: RuntimeStats::default(),
        }
    }

    // ------------------------------------------------------------------
    // Protocol slot
    // ------------------------------------------------------------------

    /// Make `protocol` the active protocol without running it
    ///
    /// Its first block runs after the next finished production. An already
    /// active protocol is abandoned.
    pub fn begin<P>(&mut self, protocol: P)
    where
        P: Protocol<Host = H> + 'static,
    {
        if let Some(old) = self.active.take() {
            tracing::warn!(
                old = old.name(),
                new = protocol.name(),
                "replacing active protocol"
            );
            self.production.cancel();
            self.stats.protocols_aborted += 1;
        }

        self.protocol_name = truncate_name(protocol.name(), self.config.production.name_limit);
        self.stats.protocols_started += 1;
        tracing::info!(protocol = %self.protocol_name, "protocol started");
        self.active = Some(Box::new(ProtocolRunner::new(protocol)));
    }

    /// Make `protocol` active and run its first block now
    pub fn start<P>(&mut self, protocol: P, cx: &mut H::Context) -> CadenceResult<ProtocolStatus>
    where
        P: Protocol<Host = H> + 'static,
    {
        self.begin(protocol);
        self.resume(cx)
    }

    /// Run one block of the active protocol
    pub fn resume(&mut self, cx: &mut H::Context) -> CadenceResult<ProtocolStatus> {
        let active = self.active.as_mut().ok_or(CadenceError::NoActiveProtocol)?;
        let status = active.resume(&mut self.production, cx);
        self.stats.blocks_run += 1;

        match &status {
            ProtocolStatus::Finished => {
                tracing::info!(protocol = %self.protocol_name, "protocol finished");
                self.stats.protocols_completed += 1;
                self.production.cancel();
                self.active = None;
            }
            ProtocolStatus::Aborted(_) => {
                tracing::warn!(protocol = %self.protocol_name, "clearing aborted protocol");
                self.stats.protocols_aborted += 1;
                self.production.cancel();
                self.active = None;
            }
            ProtocolStatus::Advanced | ProtocolStatus::Repeated => {}
        }
        Ok(status)
    }

    /// Abandon the active protocol
    ///
    /// Clears its rules, completion condition and staged action. Global
    /// rules are kept. Returns `false` if nothing was running.
    pub fn abort(&mut self) -> bool {
        let Some(mut active) = self.active.take() else {
            return false;
        };
        tracing::warn!(
            protocol = %self.protocol_name,
            position = %active.position(),
            "protocol aborted"
        );
        active.reset();
        self.production.cancel();
        self.stats.protocols_aborted += 1;
        true
    }

    pub fn is_running(&self) -> bool {
        self.active.is_some()
    }

    /// Name of the most recently started protocol
    pub fn protocol_name(&self) -> &str {
        &self.protocol_name
    }

    /// Name of the most recently staged action
    pub fn action_name(&self) -> &str {
        self.production.action_name()
    }

    /// Block the active protocol runs next
    pub fn position(&self) -> Option<String> {
        self.active.as_ref().map(|active| active.position())
    }

    // ------------------------------------------------------------------
    // Entry point
    // ------------------------------------------------------------------

    /// Handle one frame from the transport
    ///
    /// Dispatches the frame; if that finished the production, the active
    /// protocol runs its next block.
    pub fn on_event<F>(&mut self, frame: &F, cx: &mut H::Context) -> DispatchOutcome
    where
        F: Inbound<Event = H::Event> + ?Sized,
    {
        self.stats.dispatches += 1;
        let outcome = self.production.dispatch(frame, cx);

        match outcome {
            DispatchOutcome::Finished => {
                self.stats.finished += 1;
                if let Err(e) = self.resume(cx) {
                    tracing::debug!("production finished: {}", e);
                }
            }
            DispatchOutcome::RuleFired => self.stats.rule_fired += 1,
            DispatchOutcome::NoRuleFired => self.stats.no_rule += 1,
        }
        outcome
    }

    /// Record a frame the transport failed to decode
    pub fn reject_frame(&mut self, err: &CadenceError) {
        self.stats.malformed_frames += 1;
        tracing::warn!("dropping frame: {}", err);
    }

    /// Feed frames until the active protocol ends
    ///
    /// Stops early when `frames` runs dry or `max_poll_iterations` frames
    /// were consumed. Returns `true` if no protocol is active afterwards.
    pub fn poll_until_idle<I, F>(&mut self, frames: I, cx: &mut H::Context) -> bool
    where
        I: IntoIterator<Item = F>,
        F: Inbound<Event = H::Event>,
    {
        let mut frames = frames.into_iter();
        let mut polled = 0;
        while self.is_running() {
            if polled == self.config.max_poll_iterations {
                tracing::warn!(
                    protocol = %self.protocol_name,
                    polled,
                    "protocol still running after poll limit"
                );
                break;
            }
            let Some(frame) = frames.next() else {
                break;
            };
            self.on_event(&frame, cx);
            polled += 1;
        }
        !self.is_running()
    }

    // ------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------

    pub fn production(&self) -> &Production<H> {
        &self.production
    }

    /// For registering global rules and inspecting tiers outside a block
    pub fn production_mut(&mut self) -> &mut Production<H> {
        &mut self.production
    }

    pub fn stats(&self) -> &RuntimeStats {
        &self.stats
    }

    pub fn config(&self) -> &RuntimeConfig {
        &self.config
    }
}

impl<H: Host> fmt::Debug for Registry<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registry")
            .field("protocol", &self.active.as_ref().map(|a| a.name()))
            .field("position", &self.position())
            .field("production", &self.production)
            .field("stats", &self.stats)
            .finish()
    }
}
