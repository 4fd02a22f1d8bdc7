//! Host used by unit tests

use cadence_production::Host;
use cadence_wire::HciEvent;

#[derive(Debug, Default)]
pub struct Log {
    pub entries: Vec<&'static str>,
}

pub struct TestHost;

impl Host for TestHost {
    type Event = HciEvent;
    type Context = Log;
    type Arg = &'static str;
}

pub fn ok(log: &mut Log, arg: &&'static str) -> bool {
    log.entries.push(*arg);
    true
}

pub fn fail(log: &mut Log, arg: &&'static str) -> bool {
    log.entries.push(*arg);
    false
}

pub fn record(_: &HciEvent, log: &mut Log, arg: &&'static str) -> bool {
    log.entries.push(*arg);
    true
}
