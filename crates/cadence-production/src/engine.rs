//! Production engine
//!
//! Dispatch order for one event:
//! 1. Exclusive tier, first match only
//! 2. Normal tier, every match
//! 3. Global tier, first match only, and only if 1 and 2 matched nothing
//! 4. Completion check; on completion the exclusive and normal tiers and
//!    the completion condition are cleared. Global rules persist.

use std::fmt;
use std::time::Duration;

use cadence_core::{CadenceResult, Inbound, Tier};
use cadence_time::{Clock, SystemClock, Timeout};

use crate::{
    matches, truncate_name, Action, Host, Pattern, Predicate, Procedure, ProductionConfig, Rule,
    RuleTier,
};

/// Result of dispatching one frame
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DispatchOutcome {
    /// No rule matched and the production continues
    NoRuleFired,
    /// At least one rule matched and the production continues
    RuleFired,
    /// The completion condition held; the production is over
    Finished,
}

impl DispatchOutcome {
    #[inline]
    pub fn is_finished(self) -> bool {
        matches!(self, DispatchOutcome::Finished)
    }
}

/// Completion condition
pub enum Until<E> {
    /// Complete after a single dispatch
    Once,
    /// Complete when the predicate holds for the dispatched event
    Predicate(Predicate<E>),
    /// Complete when the dispatched event matches the pattern
    Event(Pattern<E>),
    /// Complete on the first dispatch at or after the armed deadline
    Timeout,
}

impl<E> Default for Until<E> {
    fn default() -> Self {
        Until::Once
    }
}

impl<E> Clone for Until<E> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<E> Copy for Until<E> {}

impl<E> fmt::Debug for Until<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Until::Once => f.write_str("Once"),
            Until::Predicate(_) => f.write_str("Predicate"),
            Until::Event(pattern) => write!(f, "Event({:?})", pattern),
            Until::Timeout => f.write_str("Timeout"),
        }
    }
}

/// Staged procedure awaiting its single invocation
struct Pending<H: Host> {
    procedure: Procedure<H>,
    arg: H::Arg,
}

/// Dispatch counters
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ProductionStats {
    /// Frames handed to `dispatch`
    pub frames: u64,
    /// Frames that were not event notifications
    pub ignored_frames: u64,
    /// Rule matches per tier
    pub exclusive_matches: u64,
    pub normal_matches: u64,
    pub global_matches: u64,
    /// Productions that reached completion
    pub finished: u64,
    /// Registrations rejected because a tier was full
    pub rejected_rules: u64,
}

impl ProductionStats {
    fn record_match(&mut self, tier: Tier) {
        match tier {
            Tier::Exclusive => self.exclusive_matches += 1,
            Tier::Normal => self.normal_matches += 1,
            Tier::Global => self.global_matches += 1,
        }
    }
}

/// Rule based production
pub struct Production<H: Host> {
    exclusive: RuleTier<H>,
    normal: RuleTier<H>,
    global: RuleTier<H>,
    until: Until<H::Event>,
    pending: Option<Pending<H>>,
    action_name: String,
    /// An exclusive or normal rule matched in the current production
    matched: bool,
    /// The next dispatch opens a new production
    fresh: bool,
    clock: Box<dyn Clock>,
    timeout: Timeout,
    stats: ProductionStats,
    config: ProductionConfig,
}

impl<H: Host> Production<H> {
    /// Create a production driven by the system clock
    pub fn new(config: ProductionConfig) -> Self {
        Self::with_clock(config, SystemClock::new())
    }

    /// Create a production with a custom clock
    pub fn with_clock(config: ProductionConfig, clock: impl Clock + 'static) -> Self {
        Production {
            exclusive: RuleTier::new(Tier::Exclusive, config.tier_capacity),
            normal: RuleTier::new(Tier::Normal, config.tier_capacity),
            global: RuleTier::new(Tier::Global, config.tier_capacity),
            until: Until::Once,
            pending: None,
            action_name: String::new(),
            matched: false,
            fresh: true,
            clock: Box::new(clock),
            timeout: Timeout::new(),
            stats: ProductionStats::default(),
            config,
        }
    }

    // ------------------------------------------------------------------
    // Registration
    // ------------------------------------------------------------------

    /// Register a rule in a tier
    ///
    /// A full tier rejects the rule; the rejection is logged and the
    /// production keeps running with the rules it already has.
    pub fn register(&mut self, tier: Tier, rule: Rule<H>) -> CadenceResult<usize> {
        let pattern = rule.pattern;
        let result = self.rules_mut(tier).add(rule);
        match &result {
            Ok(slot) => tracing::trace!(%tier, slot, ?pattern, "rule registered"),
            Err(e) => {
                self.stats.rejected_rules += 1;
                tracing::warn!(%tier, ?pattern, "{}", e);
            }
        }
        result
    }

    /// Expect an event; every matching normal rule fires
    pub fn expect(
        &mut self,
        pattern: Pattern<H::Event>,
        action: Option<Action<H>>,
        arg: H::Arg,
    ) -> CadenceResult<usize> {
        self.register(Tier::Normal, Rule::new(pattern, action, arg))
    }

    pub fn expect_condition(
        &mut self,
        predicate: Predicate<H::Event>,
        action: Option<Action<H>>,
        arg: H::Arg,
    ) -> CadenceResult<usize> {
        self.expect(Pattern::Predicate(predicate), action, arg)
    }

    /// Expect an event; only the first matching exclusive rule fires
    pub fn expect_exclusive(
        &mut self,
        pattern: Pattern<H::Event>,
        action: Option<Action<H>>,
        arg: H::Arg,
    ) -> CadenceResult<usize> {
        self.register(Tier::Exclusive, Rule::new(pattern, action, arg))
    }

    pub fn expect_exclusive_condition(
        &mut self,
        predicate: Predicate<H::Event>,
        action: Option<Action<H>>,
        arg: H::Arg,
    ) -> CadenceResult<usize> {
        self.expect_exclusive(Pattern::Predicate(predicate), action, arg)
    }

    /// Fallback rule consulted when no specific rule matched
    ///
    /// Global rules survive production completion.
    pub fn expect_globally(
        &mut self,
        pattern: Pattern<H::Event>,
        action: Option<Action<H>>,
        arg: H::Arg,
    ) -> CadenceResult<usize> {
        self.register(Tier::Global, Rule::new(pattern, action, arg))
    }

    pub fn expect_globally_condition(
        &mut self,
        predicate: Predicate<H::Event>,
        action: Option<Action<H>>,
        arg: H::Arg,
    ) -> CadenceResult<usize> {
        self.expect_globally(Pattern::Predicate(predicate), action, arg)
    }

    // ------------------------------------------------------------------
    // Completion conditions
    // ------------------------------------------------------------------

    /// Run until the predicate holds for a dispatched event
    pub fn until(&mut self, predicate: Predicate<H::Event>) {
        self.until = Until::Predicate(predicate);
    }

    /// Run until an event matches the pattern
    ///
    /// `Pattern::NoCheck` means no event condition: single-shot.
    pub fn until_event(&mut self, pattern: Pattern<H::Event>) {
        self.until = match pattern {
            Pattern::NoCheck => Until::Once,
            pattern => Until::Event(pattern),
        };
    }

    /// Arm a timeout and run until it expires
    pub fn until_timeout(&mut self, duration: Duration) {
        self.set_timeout(duration);
        self.until = Until::Timeout;
    }

    /// Back to single-shot
    pub fn clear_until(&mut self) {
        self.until = Until::Once;
    }

    pub fn completion(&self) -> Until<H::Event> {
        self.until
    }

    /// Arm the timeout `duration` from now
    pub fn set_timeout(&mut self, duration: Duration) {
        let deadline = self.timeout.start(self.clock.as_ref(), duration);
        tracing::trace!(%deadline, "timeout armed");
    }

    pub fn clear_timeout(&mut self) {
        self.timeout.clear();
    }

    /// Has the armed timeout expired?
    pub fn timed_out(&self) -> bool {
        self.timeout.expired(self.clock.as_ref())
    }

    pub fn clock(&self) -> &dyn Clock {
        self.clock.as_ref()
    }

    // ------------------------------------------------------------------
    // Pending action
    // ------------------------------------------------------------------

    /// Stage one procedure to run when the current block ends
    ///
    /// Staging again before it runs replaces the earlier procedure.
    pub fn perform(&mut self, name: &str, procedure: Procedure<H>, arg: H::Arg) {
        self.action_name = truncate_name(name, self.config.name_limit);
        if self.pending.is_some() {
            tracing::debug!(action = %self.action_name, "replacing staged action");
        }
        self.pending = Some(Pending { procedure, arg });
    }

    /// Run the staged procedure, at most once
    ///
    /// Returns `true` when nothing was staged or the procedure succeeded.
    pub fn run_pending(&mut self, cx: &mut H::Context) -> bool {
        let Some(pending) = self.pending.take() else {
            return true;
        };
        let ok = (pending.procedure)(cx, &pending.arg);
        if ok {
            tracing::debug!(action = %self.action_name, "action performed");
        } else {
            tracing::warn!(action = %self.action_name, "action failed");
        }
        ok
    }

    pub fn has_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Name of the most recently staged action
    pub fn action_name(&self) -> &str {
        &self.action_name
    }

    // ------------------------------------------------------------------
    // Expectations
    // ------------------------------------------------------------------

    /// Did any exclusive or normal rule match in this production?
    ///
    /// Still answers for a production that just finished, until the next
    /// production's first dispatch.
    pub fn expectations_met(&self) -> bool {
        self.matched
    }

    /// Drop normal rules and forget past matches
    pub fn clear_expectations(&mut self) {
        self.normal.clear();
        self.matched = false;
    }

    pub fn clear_exclusive_expectations(&mut self) {
        self.exclusive.clear();
    }

    pub fn clear_global_expectations(&mut self) {
        self.global.clear();
    }

    /// Drop the rules of all three tiers
    pub fn clear_all_expectations(&mut self) {
        self.exclusive.clear();
        self.normal.clear();
        self.global.clear();
    }

    /// Abandon the current production
    ///
    /// Clears the exclusive and normal tiers, the completion condition,
    /// any staged action and the expectations-met flag. Global rules are
    /// kept.
    pub fn cancel(&mut self) {
        self.clear_production_rules();
        self.until = Until::Once;
        self.pending = None;
        self.matched = false;
        self.fresh = true;
    }

    pub fn tier(&self, tier: Tier) -> &RuleTier<H> {
        match tier {
            Tier::Exclusive => &self.exclusive,
            Tier::Normal => &self.normal,
            Tier::Global => &self.global,
        }
    }

    fn rules_mut(&mut self, tier: Tier) -> &mut RuleTier<H> {
        match tier {
            Tier::Exclusive => &mut self.exclusive,
            Tier::Normal => &mut self.normal,
            Tier::Global => &mut self.global,
        }
    }

    /// Clear every tier that does not outlive a production
    fn clear_production_rules(&mut self) {
        for tier in Tier::ALL {
            if tier.cleared_on_completion() {
                self.rules_mut(tier).clear();
            }
        }
    }

    pub fn stats(&self) -> &ProductionStats {
        &self.stats
    }

    pub fn config(&self) -> &ProductionConfig {
        &self.config
    }

    // ------------------------------------------------------------------
    // Dispatch
    // ------------------------------------------------------------------

    /// Dispatch one inbound frame
    ///
    /// Frames that are not event notifications are ignored and leave every
    /// tier untouched.
    pub fn dispatch<F>(&mut self, frame: &F, cx: &mut H::Context) -> DispatchOutcome
    where
        F: Inbound<Event = H::Event> + ?Sized,
    {
        self.stats.frames += 1;
        match frame.as_event() {
            Some(event) => self.dispatch_event(event, cx),
            None => {
                self.stats.ignored_frames += 1;
                tracing::debug!("non-event frame ignored");
                DispatchOutcome::NoRuleFired
            }
        }
    }

    /// Dispatch one event notification
    pub fn dispatch_event(&mut self, event: &H::Event, cx: &mut H::Context) -> DispatchOutcome {
        if self.fresh {
            self.matched = false;
            self.fresh = false;
        }

        let mut fired = false;
        for tier in Tier::ALL {
            // Fallback tiers only run when nothing specific matched
            if fired && !tier.counts_as_expected() {
                continue;
            }
            let rules = match tier {
                Tier::Exclusive => &mut self.exclusive,
                Tier::Normal => &mut self.normal,
                Tier::Global => &mut self.global,
            };
            if Self::scan(rules, event, cx, &mut self.stats) {
                fired = true;
                if tier.counts_as_expected() {
                    self.matched = true;
                }
            }
        }

        let complete = match self.until {
            Until::Once => true,
            Until::Predicate(predicate) => predicate(event),
            Until::Event(pattern) => pattern.matches(event),
            Until::Timeout => self.timeout.expired(self.clock.as_ref()),
        };

        let outcome = if complete {
            self.clear_production_rules();
            self.until = Until::Once;
            self.fresh = true;
            self.stats.finished += 1;
            DispatchOutcome::Finished
        } else if fired {
            DispatchOutcome::RuleFired
        } else {
            DispatchOutcome::NoRuleFired
        };

        tracing::debug!(?outcome, met = self.matched, "dispatched");
        outcome
    }

    /// Fire the matching rules of one tier; `true` if any matched
    fn scan(
        rules: &mut RuleTier<H>,
        event: &H::Event,
        cx: &mut H::Context,
        stats: &mut ProductionStats,
    ) -> bool {
        let tier = rules.tier();
        let mut hit = false;
        rules.begin_iteration();
        while let Some(rule) = rules.next() {
            if matches(event, &rule.pattern) {
                let ok = rule.fire(event, cx);
                tracing::trace!(%tier, pattern = ?rule.pattern, ok, "rule fired");
                stats.record_match(tier);
                hit = true;
                if tier.stops_at_first_match() {
                    break;
                }
            }
        }
        hit
    }
}

impl<H: Host> Default for Production<H> {
    fn default() -> Self {
        Self::new(ProductionConfig::default())
    }
}

impl<H: Host> fmt::Debug for Production<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Production")
            .field("exclusive", &self.exclusive)
            .field("normal", &self.normal)
            .field("global", &self.global)
            .field("until", &self.until)
            .field("pending", &self.pending.is_some())
            .field("action_name", &self.action_name)
            .field("matched", &self.matched)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{record, stage_fail, stage_ok, Ev, TestHost};
    use cadence_core::{CadenceError, Notification};
    use cadence_time::ManualClock;
    use proptest::prelude::*;

    type P = Production<TestHost>;

    fn production(capacity: usize) -> P {
        Production::with_clock(ProductionConfig::with_capacity(capacity), ManualClock::new())
    }

    struct NotAnEvent;

    impl Inbound for NotAnEvent {
        type Event = Ev;

        fn as_event(&self) -> Option<&Ev> {
            None
        }
    }

    #[test]
    fn test_single_shot_finishes_without_match() {
        let mut p = production(4);
        let mut log = Vec::new();
        assert_eq!(p.dispatch_event(&Ev::code(0x01), &mut log), DispatchOutcome::Finished);
        assert!(!p.expectations_met());
    }

    #[test]
    fn test_non_event_frame_ignored() {
        let mut p = production(4);
        let mut log = Vec::new();
        p.expect(Pattern::EventCode(0x01), Some(record), "a").unwrap();
        p.until_event(Pattern::EventCode(0x02));

        assert_eq!(p.dispatch(&NotAnEvent, &mut log), DispatchOutcome::NoRuleFired);
        assert_eq!(p.tier(Tier::Normal).len(), 1);
        assert_eq!(p.stats().ignored_frames, 1);
        assert!(log.is_empty());
    }

    #[test]
    fn test_exclusive_capacity_scenario() {
        let mut p = production(2);
        let mut log = Vec::new();
        p.expect_exclusive(Pattern::EventCode(0x07), Some(record), "first").unwrap();
        p.expect_exclusive(Pattern::EventCode(0x07), Some(record), "second").unwrap();
        let third = p.expect_exclusive(Pattern::EventCode(0x07), Some(record), "third");
        assert!(matches!(
            third,
            Err(CadenceError::CapacityExceeded { tier: Tier::Exclusive, capacity: 2 })
        ));
        assert_eq!(p.tier(Tier::Exclusive).len(), 2);
        assert_eq!(p.stats().rejected_rules, 1);

        p.dispatch(&Notification(Ev::code(0x07)), &mut log);
        assert_eq!(log, vec!["first"]);
    }

    #[test]
    fn test_normal_shadows_global() {
        let mut p = production(4);
        let mut log = Vec::new();
        p.expect(Pattern::EventCode(0x05), Some(record), "A").unwrap();
        p.expect_globally(Pattern::EventCode(0x05), Some(record), "B").unwrap();

        p.dispatch_event(&Ev::code(0x05), &mut log);
        assert_eq!(log, vec!["A"]);
    }

    #[test]
    fn test_global_fires_when_nothing_specific_matches() {
        let mut p = production(4);
        let mut log = Vec::new();
        p.expect(Pattern::EventCode(0x05), Some(record), "A").unwrap();
        p.expect_globally(Pattern::EventCode(0x06), Some(record), "B").unwrap();
        p.expect_globally(Pattern::EventCode(0x06), Some(record), "C").unwrap();

        assert_eq!(p.dispatch_event(&Ev::code(0x06), &mut log), DispatchOutcome::Finished);
        assert_eq!(log, vec!["B"]);
        assert!(!p.expectations_met());
    }

    #[test]
    fn test_exclusive_and_normal_both_fire() {
        let mut p = production(4);
        let mut log = Vec::new();
        p.expect_exclusive(Pattern::EventCode(0x05), Some(record), "ex").unwrap();
        p.expect(Pattern::EventCode(0x05), Some(record), "n1").unwrap();
        p.expect(Pattern::EventCode(0x06), Some(record), "n2").unwrap();
        p.expect(Pattern::EventCode(0x05), Some(record), "n3").unwrap();

        p.dispatch_event(&Ev::code(0x05), &mut log);
        assert_eq!(log, vec!["ex", "n1", "n3"]);
        assert!(p.expectations_met());
    }

    #[test]
    fn test_completion_clears_specific_tiers_only() {
        let mut p = production(4);
        let mut log = Vec::new();
        p.expect_exclusive(Pattern::EventCode(0x01), None, "ex").unwrap();
        p.expect(Pattern::EventCode(0x01), None, "n").unwrap();
        p.expect_globally(Pattern::EventCode(0x02), None, "g").unwrap();

        assert_eq!(p.dispatch_event(&Ev::code(0x09), &mut log), DispatchOutcome::Finished);
        assert!(p.tier(Tier::Exclusive).is_empty());
        assert!(p.tier(Tier::Normal).is_empty());
        assert_eq!(p.tier(Tier::Global).len(), 1);
    }

    #[test]
    fn test_until_event() {
        let mut p = production(4);
        let mut log = Vec::new();
        p.expect(Pattern::VendorCode(0x0C0A), Some(record), "item").unwrap();
        p.until_event(Pattern::ProcedureCode(0x02));

        assert_eq!(p.dispatch_event(&Ev::vendor(0x0C0A), &mut log), DispatchOutcome::RuleFired);
        assert_eq!(p.dispatch_event(&Ev::code(0x13), &mut log), DispatchOutcome::NoRuleFired);
        assert_eq!(p.dispatch_event(&Ev::vendor(0x0C0A), &mut log), DispatchOutcome::RuleFired);
        assert_eq!(p.dispatch_event(&Ev::procedure(0x02), &mut log), DispatchOutcome::Finished);
        assert_eq!(log, vec!["item", "item"]);
        assert!(p.expectations_met());
        assert!(matches!(p.completion(), Until::Once));
    }

    #[test]
    fn test_until_no_check_is_single_shot() {
        let mut p = production(4);
        let mut log = Vec::new();
        p.expect(Pattern::EventCode(0x01), Some(record), "n").unwrap();
        p.until_event(Pattern::NoCheck);
        assert!(matches!(p.completion(), Until::Once));

        assert_eq!(p.dispatch_event(&Ev::code(0x03), &mut log), DispatchOutcome::Finished);
        assert!(p.tier(Tier::Normal).is_empty());

        // Still finishes after an earlier event condition was in place
        p.until_event(Pattern::EventCode(0x7F));
        p.until_event(Pattern::NoCheck);
        for code in 0..5 {
            assert_eq!(p.dispatch_event(&Ev::code(code), &mut log), DispatchOutcome::Finished);
        }
        assert!(log.is_empty());
    }

    #[test]
    fn test_until_predicate_supersedes_event() {
        fn big(ev: &Ev) -> bool {
            ev.code > 0x10
        }
        let mut p = production(4);
        let mut log = Vec::new();
        p.until_event(Pattern::EventCode(0x01));
        p.until(big);

        assert_eq!(p.dispatch_event(&Ev::code(0x01), &mut log), DispatchOutcome::NoRuleFired);
        assert_eq!(p.dispatch_event(&Ev::code(0x11), &mut log), DispatchOutcome::Finished);
    }

    #[test]
    fn test_until_timeout() {
        let clock = ManualClock::new();
        let mut p: P = Production::with_clock(ProductionConfig::default(), clock.clone());
        let mut log = Vec::new();
        p.expect(Pattern::EventCode(0x02), Some(record), "report").unwrap();
        p.until_timeout(Duration::from_millis(100));

        assert_eq!(p.dispatch_event(&Ev::code(0x02), &mut log), DispatchOutcome::RuleFired);
        assert!(!p.timed_out());

        clock.advance(Duration::from_millis(100));
        assert!(p.timed_out());
        assert_eq!(p.dispatch_event(&Ev::code(0x02), &mut log), DispatchOutcome::Finished);
        assert_eq!(log, vec!["report", "report"]);
    }

    #[test]
    fn test_expectations_met_reset_by_next_production() {
        let mut p = production(4);
        let mut log = Vec::new();
        p.expect(Pattern::EventCode(0x01), None, "n").unwrap();
        p.dispatch_event(&Ev::code(0x01), &mut log);
        assert!(p.expectations_met());

        // Next production matches nothing
        p.expect(Pattern::EventCode(0x01), None, "n").unwrap();
        p.dispatch_event(&Ev::code(0x02), &mut log);
        assert!(!p.expectations_met());
    }

    #[test]
    fn test_clear_expectations_resets_met() {
        let mut p = production(4);
        let mut log = Vec::new();
        p.expect(Pattern::EventCode(0x01), None, "n").unwrap();
        p.until_event(Pattern::EventCode(0xFF));
        p.dispatch_event(&Ev::code(0x01), &mut log);
        assert!(p.expectations_met());

        p.clear_expectations();
        assert!(!p.expectations_met());
        assert!(p.tier(Tier::Normal).is_empty());
    }

    #[test]
    fn test_clear_all_expectations() {
        let mut p = production(4);
        p.expect_exclusive(Pattern::EventCode(1), None, "ex").unwrap();
        p.expect(Pattern::EventCode(1), None, "n").unwrap();
        p.expect_globally(Pattern::EventCode(1), None, "g").unwrap();

        p.clear_global_expectations();
        assert!(p.tier(Tier::Global).is_empty());
        assert_eq!(p.tier(Tier::Normal).len(), 1);

        p.clear_all_expectations();
        for tier in Tier::ALL {
            assert!(p.tier(tier).is_empty());
        }
    }

    #[test]
    fn test_pending_runs_once() {
        let mut p = production(4);
        let mut log = Vec::new();
        assert!(p.run_pending(&mut log));

        p.perform("start_discovery", stage_ok, "X");
        assert!(p.has_pending());
        assert_eq!(p.action_name(), "start_discovery");

        assert!(p.run_pending(&mut log));
        assert!(p.run_pending(&mut log));
        assert_eq!(log, vec!["X"]);
    }

    #[test]
    fn test_pending_failure_reported() {
        let mut p = production(4);
        let mut log = Vec::new();
        p.perform("connect", stage_fail, "Y");
        assert!(!p.run_pending(&mut log));
        assert!(!p.has_pending());
    }

    #[test]
    fn test_action_name_truncated() {
        let mut p: P = Production::with_clock(
            ProductionConfig {
                name_limit: 8,
                ..Default::default()
            },
            ManualClock::new(),
        );
        p.perform("discover_all_services", stage_ok, "Z");
        assert_eq!(p.action_name(), "discover");
    }

    #[test]
    fn test_cancel_keeps_global() {
        let mut p = production(4);
        p.expect(Pattern::EventCode(1), None, "n").unwrap();
        p.expect_globally(Pattern::EventCode(1), None, "g").unwrap();
        p.until_event(Pattern::EventCode(2));
        p.perform("x", stage_ok, "x");

        p.cancel();
        assert!(p.tier(Tier::Normal).is_empty());
        assert_eq!(p.tier(Tier::Global).len(), 1);
        assert!(!p.has_pending());
        assert!(matches!(p.completion(), Until::Once));
    }

    fn arb_pattern() -> impl Strategy<Value = Pattern<Ev>> {
        prop_oneof![
            (0u16..4).prop_map(Pattern::EventCode),
            Just(Pattern::NoCheck),
        ]
    }

    const NAMES: [&str; 8] = ["r0", "r1", "r2", "r3", "r4", "r5", "r6", "r7"];

    proptest! {
        #[test]
        fn prop_tier_firing_semantics(
            exclusive in proptest::collection::vec(arb_pattern(), 0..4),
            normal in proptest::collection::vec(arb_pattern(), 0..4),
            global in proptest::collection::vec(arb_pattern(), 0..4),
            code in 0u16..4,
        ) {
            let mut p = production(8);
            let mut log = Vec::new();
            let event = Ev::code(code);

            for (i, pattern) in exclusive.iter().enumerate() {
                p.expect_exclusive(*pattern, Some(record), NAMES[i]).unwrap();
            }
            for (i, pattern) in normal.iter().enumerate() {
                p.expect(*pattern, Some(record), NAMES[4 + i]).unwrap();
            }
            let mut global_log = Vec::new();
            for (i, pattern) in global.iter().enumerate() {
                p.expect_globally(*pattern, Some(record), NAMES[i]).unwrap();
                global_log.push((*pattern, NAMES[i]));
            }

            let outcome = p.dispatch_event(&event, &mut log);
            prop_assert_eq!(outcome, DispatchOutcome::Finished);

            let mut expected = Vec::new();
            if let Some(i) = exclusive.iter().position(|pat| pat.matches(&event)) {
                expected.push(NAMES[i]);
            }
            for (i, pattern) in normal.iter().enumerate() {
                if pattern.matches(&event) {
                    expected.push(NAMES[4 + i]);
                }
            }
            let specific = !expected.is_empty();
            if !specific {
                if let Some((_, name)) = global_log.iter().find(|(pat, _)| pat.matches(&event)) {
                    expected.push(*name);
                }
            }

            prop_assert_eq!(&log, &expected);
            prop_assert_eq!(p.expectations_met(), specific);
            prop_assert!(p.tier(Tier::Exclusive).is_empty());
            prop_assert!(p.tier(Tier::Normal).is_empty());
            prop_assert_eq!(p.tier(Tier::Global).len(), global.len());
        }
    }
}
