//! Event classifier
//!
//! Pure matching of one event against one pattern. Every code pattern first
//! checks that the event belongs to the right category at all: a vendor
//! ecode pattern never matches a non-vendor event, and a reason pattern only
//! matches an initialization/reset event.

use std::fmt;

use cadence_core::{ClassifierKind, EventCode, EventView};

use crate::Predicate;

/// What a rule or completion condition tests
pub enum Pattern<E> {
    /// Never matches
    NoCheck,
    /// Top-level event code
    EventCode(EventCode),
    /// LE meta sub-event
    SubEvent(EventCode),
    /// Reset reason of an initialization event
    ReasonCode(EventCode),
    /// Vendor ecode
    VendorCode(EventCode),
    /// Procedure code of a procedure-complete event
    ProcedureCode(EventCode),
    /// Arbitrary predicate
    Predicate(Predicate<E>),
}

impl<E: EventView> Pattern<E> {
    /// Does `event` satisfy this pattern?
    pub fn matches(&self, event: &E) -> bool {
        match *self {
            Pattern::NoCheck => false,
            Pattern::EventCode(code) => event.event_code() == code,
            Pattern::SubEvent(code) => event.sub_event() == Some(code),
            Pattern::ReasonCode(code) => event.reset_reason() == Some(code),
            Pattern::VendorCode(code) => event.vendor_code() == Some(code),
            Pattern::ProcedureCode(code) => event.procedure_code() == Some(code),
            Pattern::Predicate(predicate) => predicate(event),
        }
    }
}

impl<E> Pattern<E> {
    pub fn kind(&self) -> ClassifierKind {
        match self {
            Pattern::NoCheck => ClassifierKind::NoCheck,
            Pattern::EventCode(_) => ClassifierKind::EventCode,
            Pattern::SubEvent(_) => ClassifierKind::SubEvent,
            Pattern::ReasonCode(_) => ClassifierKind::ReasonCode,
            Pattern::VendorCode(_) => ClassifierKind::VendorCode,
            Pattern::ProcedureCode(_) => ClassifierKind::ProcedureCode,
            Pattern::Predicate(_) => ClassifierKind::Predicate,
        }
    }

    /// Integer pattern value, for kinds that carry one
    pub fn code(&self) -> Option<EventCode> {
        match *self {
            Pattern::EventCode(code)
            | Pattern::SubEvent(code)
            | Pattern::ReasonCode(code)
            | Pattern::VendorCode(code)
            | Pattern::ProcedureCode(code) => Some(code),
            Pattern::NoCheck | Pattern::Predicate(_) => None,
        }
    }
}

/// Free-function form of [`Pattern::matches`]
#[inline]
pub fn matches<E: EventView>(event: &E, pattern: &Pattern<E>) -> bool {
    pattern.matches(event)
}

impl<E> Default for Pattern<E> {
    fn default() -> Self {
        Pattern::NoCheck
    }
}

impl<E> Clone for Pattern<E> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<E> Copy for Pattern<E> {}

impl<E> PartialEq for Pattern<E> {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Pattern::Predicate(a), Pattern::Predicate(b)) => *a as usize == *b as usize,
            _ => self.kind() == other.kind() && self.code() == other.code(),
        }
    }
}

impl<E> fmt::Debug for Pattern<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.code() {
            Some(code) => write!(f, "{:?}({:#06x})", self.kind(), code),
            None => write!(f, "{:?}", self.kind()),
        }
    }
}
