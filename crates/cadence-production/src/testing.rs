//! Minimal host for unit tests

use cadence_core::{EventCode, EventView};

use crate::Host;

const LE_META: EventCode = 0x3E;
const VENDOR: EventCode = 0xFF;
const RESET_ECODE: EventCode = 0x0001;
const PROCEDURE_ECODE: EventCode = 0x0407;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Ev {
    pub code: EventCode,
    pub sub: Option<EventCode>,
    pub ecode: Option<EventCode>,
    pub detail: Option<EventCode>,
}

impl Ev {
    pub fn code(code: EventCode) -> Self {
        Ev {
            code,
            ..Default::default()
        }
    }

    pub fn le_meta(sub: EventCode) -> Self {
        Ev {
            code: LE_META,
            sub: Some(sub),
            ..Default::default()
        }
    }

    pub fn vendor(ecode: EventCode) -> Self {
        Ev {
            code: VENDOR,
            ecode: Some(ecode),
            ..Default::default()
        }
    }

    pub fn reset(reason: EventCode) -> Self {
        Ev {
            detail: Some(reason),
            ..Ev::vendor(RESET_ECODE)
        }
    }

    pub fn procedure(procedure: EventCode) -> Self {
        Ev {
            detail: Some(procedure),
            ..Ev::vendor(PROCEDURE_ECODE)
        }
    }
}

impl EventView for Ev {
    fn event_code(&self) -> EventCode {
        self.code
    }

    fn sub_event(&self) -> Option<EventCode> {
        self.sub
    }

    fn vendor_code(&self) -> Option<EventCode> {
        self.ecode
    }

    fn reset_reason(&self) -> Option<EventCode> {
        match self.ecode {
            Some(RESET_ECODE) => self.detail,
            _ => None,
        }
    }

    fn procedure_code(&self) -> Option<EventCode> {
        match self.ecode {
            Some(PROCEDURE_ECODE) => self.detail,
            _ => None,
        }
    }
}

/// Actions append their argument to the context
pub struct TestHost;

impl Host for TestHost {
    type Event = Ev;
    type Context = Vec<&'static str>;
    type Arg = &'static str;
}

pub fn record(_: &Ev, log: &mut Vec<&'static str>, arg: &&'static str) -> bool {
    log.push(*arg);
    true
}

pub fn stage_ok(log: &mut Vec<&'static str>, arg: &&'static str) -> bool {
    log.push(*arg);
    true
}

pub fn stage_fail(log: &mut Vec<&'static str>, arg: &&'static str) -> bool {
    log.push(*arg);
    false
}
