#![no_main]

use cadence_core::EventView;
use cadence_wire::HciPacket;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(packet) = HciPacket::parse(data) else {
        return;
    };

    if let HciPacket::Event(event) = &packet {
        // Classification must never read past the parameters
        let _ = event.sub_event();
        let _ = event.vendor_code();
        let _ = event.reset_reason();
        let _ = event.procedure_code();
        let _ = event.describe();
    }

    // Anything that decodes must encode back to the same bytes
    let bytes = packet.serialize().expect("decoded packet re-encodes");
    assert_eq!(bytes, data);
});
