//! Classifier kinds and rule tiers
//!
//! Rules live in one of three tiers, evaluated in a fixed order:
//! - Exclusive: first match wins, stops the tier
//! - Normal: every match fires
//! - Global: consulted only when nothing else matched, first match wins,
//!   never counts toward "expectations met" and persists across productions

use std::fmt;

/// Rule tier determines firing behavior and lifetime
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Tier {
    /// Evaluated first, stops at the first match
    Exclusive,
    /// Evaluated second, every matching rule fires
    Normal,
    /// Fallback handlers for unexpected events
    Global,
}

impl Tier {
    /// Every tier, in evaluation order
    pub const ALL: [Tier; 3] = [Tier::Exclusive, Tier::Normal, Tier::Global];

    /// Does the tier stop searching after the first match?
    pub fn stops_at_first_match(self) -> bool {
        !matches!(self, Tier::Normal)
    }

    /// Does a match in this tier count toward "expectations met"?
    pub fn counts_as_expected(self) -> bool {
        !matches!(self, Tier::Global)
    }

    /// Is the tier cleared when a production finishes?
    pub fn cleared_on_completion(self) -> bool {
        !matches!(self, Tier::Global)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Tier::Exclusive => "exclusive",
            Tier::Normal => "normal",
            Tier::Global => "global",
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classifier kind - which property of an event a rule tests
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum ClassifierKind {
    /// Never matches
    #[default]
    NoCheck,
    /// Top-level event code equals the pattern
    EventCode,
    /// LE meta sub-event equals the pattern
    SubEvent,
    /// Initialization/reset event with the given reason
    ReasonCode,
    /// Vendor event with the given ecode
    VendorCode,
    /// Procedure-complete event for the given procedure
    ProcedureCode,
    /// Arbitrary predicate function
    Predicate,
}
