#![no_main]

use arbitrary::Arbitrary;
use cadence_core::{EventCode, Tier};
use cadence_production::{DispatchOutcome, Host, Pattern, Production, ProductionConfig};
use cadence_time::ManualClock;
use cadence_wire::HciEvent;
use libfuzzer_sys::fuzz_target;

struct FuzzHost;

impl Host for FuzzHost {
    type Event = HciEvent;
    type Context = Vec<(Tier, u8)>;
    type Arg = (Tier, u8);
}

fn fired(_: &HciEvent, log: &mut Vec<(Tier, u8)>, arg: &(Tier, u8)) -> bool {
    log.push(*arg);
    true
}

#[derive(Arbitrary, Debug)]
enum FuzzPattern {
    EventCode(u8),
    SubEvent(u8),
    ReasonCode(u8),
    VendorCode(u16),
    ProcedureCode(u8),
    NoCheck,
}

impl FuzzPattern {
    fn pattern(&self) -> Pattern<HciEvent> {
        match *self {
            FuzzPattern::EventCode(c) => Pattern::EventCode(c as EventCode),
            FuzzPattern::SubEvent(c) => Pattern::SubEvent(c as EventCode),
            FuzzPattern::ReasonCode(c) => Pattern::ReasonCode(c as EventCode),
            FuzzPattern::VendorCode(c) => Pattern::VendorCode(c),
            FuzzPattern::ProcedureCode(c) => Pattern::ProcedureCode(c as EventCode),
            FuzzPattern::NoCheck => Pattern::NoCheck,
        }
    }
}

#[derive(Arbitrary, Debug)]
struct Input {
    exclusive: Vec<FuzzPattern>,
    normal: Vec<FuzzPattern>,
    global: Vec<FuzzPattern>,
    events: Vec<(u8, Vec<u8>)>,
}

fuzz_target!(|input: Input| {
    let mut production: Production<FuzzHost> =
        Production::with_clock(ProductionConfig::with_capacity(8), ManualClock::new());
    let mut log = Vec::new();

    for (tier, patterns) in [
        (Tier::Exclusive, &input.exclusive),
        (Tier::Normal, &input.normal),
        (Tier::Global, &input.global),
    ] {
        for (i, p) in patterns.iter().enumerate() {
            let arg = (tier, i as u8);
            let _ = match tier {
                Tier::Exclusive => production.expect_exclusive(p.pattern(), Some(fired), arg),
                Tier::Normal => production.expect(p.pattern(), Some(fired), arg),
                Tier::Global => production.expect_globally(p.pattern(), Some(fired), arg),
            };
        }
    }
    let globals = production.tier(Tier::Global).len();

    for (code, params) in input.events.iter().take(16) {
        log.clear();
        let event = HciEvent::new(*code, params.clone());
        let outcome = production.dispatch_event(&event, &mut log);

        let exclusive = log.iter().filter(|(t, _)| *t == Tier::Exclusive).count();
        let global = log.iter().filter(|(t, _)| *t == Tier::Global).count();
        let specific = log.len() - global;
        assert!(exclusive <= 1);
        assert!(global <= 1);
        assert!(global == 0 || specific == 0);
        // Single shot: always finishes, leaving only global rules
        assert_eq!(outcome, DispatchOutcome::Finished);
        assert!(production.tier(Tier::Normal).is_empty());
        assert_eq!(production.tier(Tier::Global).len(), globals);
    }
});
