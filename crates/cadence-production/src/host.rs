//! Application bindings
//!
//! The engine is generic over one `Host` type that names the event type
//! the transport delivers, the collaborator state actions mutate and the
//! argument type rules carry. Arguments are typed, so a rule can only be
//! registered with an action that accepts its argument.

use std::fmt::Debug;

use cadence_core::EventView;

/// Types supplied by the embedding application
pub trait Host {
    /// Classified event notification
    type Event: EventView;
    /// Collaborator state handed to every action
    type Context;
    /// Per-rule argument passed back to the action
    type Arg: Clone + Debug;
}

/// Event predicate
pub type Predicate<E> = fn(&E) -> bool;

/// Action fired when a rule matches
///
/// The return value is only logged; the engine never acts on it.
pub type Action<H> = fn(&<H as Host>::Event, &mut <H as Host>::Context, &<H as Host>::Arg) -> bool;

/// Procedure staged with `perform`; `false` reports failure
pub type Procedure<H> = fn(&mut <H as Host>::Context, &<H as Host>::Arg) -> bool;
