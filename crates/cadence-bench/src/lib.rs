//! Shared fixtures for the Cadence benchmarks

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use cadence_production::{Host, Pattern, Production, ProductionConfig};
use cadence_time::ManualClock;
use cadence_wire::codes::{evt, le, vendor};
use cadence_wire::{HciEvent, HciPacket};

/// Host whose actions only count
pub struct CountingHost;

impl Host for CountingHost {
    type Event = HciEvent;
    type Context = u64;
    type Arg = ();
}

pub fn count(_: &HciEvent, hits: &mut u64, _: &()) -> bool {
    *hits += 1;
    true
}

/// Production with every tier filled to `capacity`
///
/// Exclusive and normal rules watch vendor ecodes; global rules watch
/// plain event codes. Only the last rule of each tier can match the
/// events from [`event_mix`].
pub fn loaded_production(capacity: usize) -> Production<CountingHost> {
    let mut production =
        Production::with_clock(ProductionConfig::with_capacity(capacity), ManualClock::new());
    for i in 0..capacity {
        let last = i + 1 == capacity;
        let ecode = if last {
            vendor::ATT_READ_BY_GROUP_TYPE_RESP
        } else {
            0x0F00 + i as u16
        };
        let code = if last { evt::DISCONN_COMPLETE } else { 0xF0 };
        let _ = production.expect_exclusive(Pattern::VendorCode(ecode), Some(count), ());
        let _ = production.expect(Pattern::VendorCode(ecode), Some(count), ());
        let _ = production.expect_globally(Pattern::EventCode(code as u16), Some(count), ());
    }
    production
}

/// Seeded mix of matching and non-matching events
pub fn event_mix(len: usize, seed: u64) -> Vec<HciEvent> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..len)
        .map(|_| match rng.gen_range(0..4) {
            0 => HciEvent::vendor(vendor::ATT_READ_BY_GROUP_TYPE_RESP, &[0x01, 0x08]),
            1 => HciEvent::new(evt::DISCONN_COMPLETE, vec![0x00, 0x01, 0x08, 0x13]),
            2 => HciEvent::le_meta(le::ADVERTISING_REPORT, &[0x01, 0x00]),
            _ => HciEvent::new(evt::NUM_COMP_PKTS, vec![0x01, 0x01, 0x08, 0x01, 0x00]),
        })
        .collect()
}

/// Encoded UART frames for [`event_mix`]
pub fn frame_mix(len: usize, seed: u64) -> Vec<Vec<u8>> {
    event_mix(len, seed)
        .into_iter()
        .filter_map(|event| HciPacket::Event(event).serialize().ok())
        .collect()
}
