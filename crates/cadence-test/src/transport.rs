//! Scripted transport with noise injection
//!
//! Delivers raw frames to a registry the way a UART receive path would:
//! bytes are decoded first, undecodable frames are reported and dropped,
//! decoded packets go to `Registry::on_event`. Noise is limited to frames
//! that must never affect a protocol (malformed bytes and non-event
//! packets), so a protocol run under noise ends exactly like a clean one.

use std::collections::VecDeque;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use cadence_production::{DispatchOutcome, Host};
use cadence_runtime::Registry;
use cadence_wire::{HciEvent, HciPacket, PacketType};

/// Noise injected between scripted frames
#[derive(Clone, Debug)]
pub struct NoiseConfig {
    /// Probability of a malformed frame before each scripted frame
    pub malformed_prob: f64,
    /// Probability of a non-event packet before each scripted frame
    pub stray_prob: f64,
}

impl Default for NoiseConfig {
    fn default() -> Self {
        NoiseConfig::clean()
    }
}

impl NoiseConfig {
    /// No noise
    pub fn clean() -> Self {
        NoiseConfig {
            malformed_prob: 0.0,
            stray_prob: 0.0,
        }
    }

    /// Occasional garbage on the line
    pub fn noisy() -> Self {
        NoiseConfig {
            malformed_prob: 0.1,
            stray_prob: 0.1,
        }
    }

    /// Garbage before most frames
    pub fn hostile() -> Self {
        NoiseConfig {
            malformed_prob: 0.4,
            stray_prob: 0.4,
        }
    }
}

/// Transport statistics
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TransportStats {
    pub scripted: u64,
    pub injected: u64,
    pub delivered: u64,
    pub malformed: u64,
}

/// Frame source for a registry
pub struct ScriptedTransport {
    queue: VecDeque<Vec<u8>>,
    noise: NoiseConfig,
    rng: StdRng,
    stats: TransportStats,
}

impl ScriptedTransport {
    /// Create a transport with seed
    pub fn new(noise: NoiseConfig, seed: u64) -> Self {
        ScriptedTransport {
            queue: VecDeque::new(),
            noise,
            rng: StdRng::seed_from_u64(seed),
            stats: TransportStats::default(),
        }
    }

    /// Transport without noise
    pub fn clean() -> Self {
        Self::new(NoiseConfig::clean(), 0)
    }

    /// Queue frames behind anything already pending
    pub fn push_frames(&mut self, frames: impl IntoIterator<Item = Vec<u8>>) {
        for frame in frames {
            self.push(frame);
        }
    }

    /// Queue one frame, possibly preceded by noise
    pub fn push(&mut self, frame: Vec<u8>) {
        if self.rng.gen::<f64>() < self.noise.malformed_prob {
            let garbage = self.malformed_frame();
            self.queue.push_back(garbage);
            self.stats.injected += 1;
        }
        if self.rng.gen::<f64>() < self.noise.stray_prob {
            let len = self.rng.gen_range(0..8);
            let mut stray = vec![PacketType::AclData.to_byte()];
            stray.extend((0..len).map(|_| self.rng.gen::<u8>()));
            self.queue.push_back(stray);
            self.stats.injected += 1;
        }
        self.queue.push_back(frame);
        self.stats.scripted += 1;
    }

    /// Bytes that never decode
    fn malformed_frame(&mut self) -> Vec<u8> {
        match self.rng.gen_range(0..3) {
            // Unknown packet type
            0 => vec![0x07, self.rng.gen()],
            // Event header cut short
            1 => vec![PacketType::Event.to_byte(), self.rng.gen()],
            // Declared length longer than the parameters
            _ => {
                let declared = self.rng.gen_range(4u8..32);
                vec![PacketType::Event.to_byte(), self.rng.gen(), declared, 0x00]
            }
        }
    }

    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Decode and deliver the next frame
    ///
    /// Returns `None` when the queue is empty or the frame was dropped as
    /// malformed.
    pub fn deliver<H>(
        &mut self,
        registry: &mut Registry<H>,
        cx: &mut H::Context,
    ) -> Option<DispatchOutcome>
    where
        H: Host<Event = HciEvent>,
    {
        let bytes = self.queue.pop_front()?;
        match HciPacket::parse(&bytes) {
            Ok(packet) => {
                self.stats.delivered += 1;
                Some(registry.on_event(&packet, cx))
            }
            Err(e) => {
                self.stats.malformed += 1;
                registry.reject_frame(&e);
                None
            }
        }
    }

    /// Deliver every queued frame
    pub fn drain<H>(&mut self, registry: &mut Registry<H>, cx: &mut H::Context) -> Vec<DispatchOutcome>
    where
        H: Host<Event = HciEvent>,
    {
        let mut outcomes = Vec::new();
        while !self.queue.is_empty() {
            outcomes.extend(self.deliver(registry, cx));
        }
        outcomes
    }

    pub fn stats(&self) -> &TransportStats {
        &self.stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_transport_injects_nothing() {
        let mut transport = ScriptedTransport::clean();
        transport.push_frames(vec![vec![0x04, 0x0E, 0x00]; 10]);
        assert_eq!(transport.pending(), 10);
        assert_eq!(transport.stats().injected, 0);
    }

    #[test]
    fn test_noise_is_deterministic_per_seed() {
        let run = |seed| {
            let mut transport = ScriptedTransport::new(NoiseConfig::hostile(), seed);
            transport.push_frames(vec![vec![0x04, 0x0E, 0x00]; 50]);
            transport.queue.clone()
        };
        assert_eq!(run(7), run(7));
    }

    #[test]
    fn test_injected_frames_never_decode_to_events() {
        let mut transport = ScriptedTransport::new(
            NoiseConfig {
                malformed_prob: 1.0,
                stray_prob: 1.0,
            },
            42,
        );
        transport.push(vec![0x04, 0x0E, 0x00]);
        assert_eq!(transport.pending(), 3);

        let garbage = transport.queue.pop_front().unwrap();
        assert!(HciPacket::parse(&garbage).is_err());
        let stray = transport.queue.pop_front().unwrap();
        assert!(!HciPacket::parse(&stray).unwrap().is_event());
    }
}
