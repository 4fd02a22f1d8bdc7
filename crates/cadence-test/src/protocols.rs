//! Sample protocols driven by the harness

use std::time::Duration;

use cadence_production::{Pattern, Production};
use cadence_runtime::{Protocol, Step};
use cadence_wire::codes::{le, procedure, vendor};

use crate::{capture_connection, collect_vendor_data, issue, record, BleHost, Recorder};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum DiscoveryPhase {
    #[default]
    Connect,
    Discover,
    Disconnect,
}

/// Connect to a peer, then collect its primary services
#[derive(Debug, Default)]
pub struct ConnectAndDiscover;

impl Protocol for ConnectAndDiscover {
    type Host = BleHost;
    type State = DiscoveryPhase;

    fn name(&self) -> &str {
        "connect_and_discover"
    }

    fn step(
        &mut self,
        state: DiscoveryPhase,
        p: &mut Production<BleHost>,
        rec: &mut Recorder,
    ) -> Step<DiscoveryPhase> {
        match state {
            DiscoveryPhase::Connect => {
                p.perform("create_connection", issue, "create_connection");
                let _ = p.expect_exclusive(
                    Pattern::SubEvent(le::CONN_COMPLETE as u16),
                    Some(capture_connection),
                    "connected",
                );
                p.until_event(Pattern::SubEvent(le::CONN_COMPLETE as u16));
                Step::Next(DiscoveryPhase::Discover)
            }
            DiscoveryPhase::Discover => {
                if !p.expectations_met() || rec.connection_handle.is_none() {
                    return Step::Abort;
                }
                p.perform("discover_all_primary_services", issue, "discover_services");
                let _ = p.expect(
                    Pattern::VendorCode(vendor::ATT_READ_BY_GROUP_TYPE_RESP),
                    Some(collect_vendor_data),
                    "service",
                );
                p.until_event(Pattern::VendorCode(vendor::GATT_PROCEDURE_COMPLETE));
                Step::Next(DiscoveryPhase::Disconnect)
            }
            DiscoveryPhase::Disconnect => {
                p.perform("terminate", issue, "terminate");
                Step::Done
            }
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ObservePhase {
    #[default]
    Scan,
    Report,
}

/// Run observation procedures until `rounds` of them completed
#[derive(Debug)]
pub struct Observe {
    pub rounds: u32,
    completed: u32,
}

impl Observe {
    pub fn new(rounds: u32) -> Self {
        Observe {
            rounds,
            completed: 0,
        }
    }
}

impl Protocol for Observe {
    type Host = BleHost;
    type State = ObservePhase;

    fn name(&self) -> &str {
        "observe"
    }

    fn step(
        &mut self,
        state: ObservePhase,
        p: &mut Production<BleHost>,
        _: &mut Recorder,
    ) -> Step<ObservePhase> {
        match state {
            ObservePhase::Scan => {
                self.completed += 1;
                p.perform("start_observation", issue, "start_observation");
                let _ = p.expect(
                    Pattern::SubEvent(le::ADVERTISING_REPORT as u16),
                    Some(record),
                    "report",
                );
                p.until_event(Pattern::ProcedureCode(procedure::OBSERVATION as u16));
                Step::repeat_while(self.completed < self.rounds, ObservePhase::Report)
            }
            ObservePhase::Report => Step::Done,
        }
    }
}

/// Collect advertising reports for a fixed time
#[derive(Debug)]
pub struct TimedScan {
    pub window: Duration,
}

impl Protocol for TimedScan {
    type Host = BleHost;
    type State = bool;

    fn name(&self) -> &str {
        "timed_scan"
    }

    fn step(&mut self, scanning: bool, p: &mut Production<BleHost>, _: &mut Recorder) -> Step<bool> {
        if scanning {
            return Step::Done;
        }
        p.perform("start_scan", issue, "start_scan");
        let _ = p.expect(
            Pattern::SubEvent(le::ADVERTISING_REPORT as u16),
            Some(record),
            "report",
        );
        p.until_timeout(self.window);
        Step::Next(true)
    }
}
