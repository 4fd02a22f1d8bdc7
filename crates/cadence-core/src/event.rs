//! Event classification surface
//!
//! Cadence never decodes events itself. The transport collaborator hands
//! over a value implementing [`Inbound`]; notification frames expose an
//! [`EventView`] that answers the handful of questions the classifier asks.

/// Integer code carried by an event (event code, sub-event, ecode, ...)
pub type EventCode = u16;

/// Read-only view of one event notification
///
/// Every accessor except `event_code` answers `None` when the event does
/// not belong to the corresponding category at all, e.g. `sub_event` is
/// only `Some` for LE meta events.
pub trait EventView {
    /// Top-level event code
    fn event_code(&self) -> EventCode;

    /// Sub-event code of an LE meta event
    fn sub_event(&self) -> Option<EventCode>;

    /// Vendor ecode of a vendor-tagged event
    fn vendor_code(&self) -> Option<EventCode>;

    /// Reason code of an initialization/reset event
    fn reset_reason(&self) -> Option<EventCode>;

    /// Procedure code of a procedure-complete event
    fn procedure_code(&self) -> Option<EventCode>;
}

/// One frame delivered by the transport
pub trait Inbound {
    type Event: EventView;

    /// The event notification carried by this frame, if it is one
    fn as_event(&self) -> Option<&Self::Event>;
}

impl<T: Inbound> Inbound for &T {
    type Event = T::Event;

    fn as_event(&self) -> Option<&Self::Event> {
        (**self).as_event()
    }
}

/// A frame that is already known to be an event notification
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Notification<E>(pub E);

impl<E: EventView> Inbound for Notification<E> {
    type Event = E;

    fn as_event(&self) -> Option<&E> {
        Some(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Plain(EventCode);

    impl EventView for Plain {
        fn event_code(&self) -> EventCode {
            self.0
        }
        fn sub_event(&self) -> Option<EventCode> {
            None
        }
        fn vendor_code(&self) -> Option<EventCode> {
            None
        }
        fn reset_reason(&self) -> Option<EventCode> {
            None
        }
        fn procedure_code(&self) -> Option<EventCode> {
            None
        }
    }

    #[test]
    fn test_notification_is_event() {
        let frame = Notification(Plain(0x05));
        let event = frame.as_event().unwrap();
        assert_eq!(event.event_code(), 0x05);
    }

    #[test]
    fn test_reference_forwards() {
        let frame = Notification(Plain(0x3E));
        let by_ref = &frame;
        assert_eq!(by_ref.as_event().map(|e| e.event_code()), Some(0x3E));
    }
}
