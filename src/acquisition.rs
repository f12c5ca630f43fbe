//! Sensor acquisition pipeline and the sample hand-off channel.
//!
//! The acquisition task owns the sensor bus exclusively and publishes one
//! [`TemperatureSample`] per cycle into a single-slot channel. The control
//! task drains the slot with a non-blocking receive; neither side ever
//! waits on the other.
//!
//! ```text
//! ┌──────────────────┐  TemperatureSample  ┌──────────────────┐
//! │ Acquisition task │────────────────────▶│   Control task   │
//! │ (owns the bus)   │   capacity-1 slot   │ (owns outputs)   │
//! └──────────────────┘                     └──────────────────┘
//! ```
//!
//! The pipeline keeps two sample buffers and alternates between them,
//! flipping only after a successful publish. When the consumer has not yet
//! drained the slot, the publish is skipped, logged, and the same buffer is
//! reused next cycle — backpressure is visible without either side blocking.

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Channel;
use embassy_time::{Duration, Timer};
use log::warn;

use crate::error::BusError;
use crate::ports::SensorBus;
use crate::sample::{MAX_BUS_SENSORS, TemperatureSample};

// ───────────────────────────────────────────────────────────────
// Hand-off channel
// ───────────────────────────────────────────────────────────────

/// Single-slot, non-blocking hand-off carrying owned samples between the
/// acquisition and control tasks.
pub struct SampleHandoff {
    slot: Channel<CriticalSectionRawMutex, TemperatureSample, 1>,
}

/// The hand-off slot still holds an unconsumed sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HandoffFull;

impl SampleHandoff {
    pub const fn new() -> Self {
        Self {
            slot: Channel::new(),
        }
    }

    /// Non-blocking publish. Fails when the consumer has not drained the
    /// previous sample yet.
    pub fn publish(&self, sample: TemperatureSample) -> Result<(), HandoffFull> {
        self.slot.try_send(sample).map_err(|_| HandoffFull)
    }

    /// Non-blocking receive, draining the slot so the producer may publish
    /// again immediately.
    pub fn take(&self) -> Option<TemperatureSample> {
        self.slot.try_receive().ok()
    }
}

impl Default for SampleHandoff {
    fn default() -> Self {
        Self::new()
    }
}

// ───────────────────────────────────────────────────────────────
// Acquisition pipeline
// ───────────────────────────────────────────────────────────────

/// Pace the caller should apply before the next cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CyclePace {
    /// Cycle completed; run again at the normal period.
    Normal,
    /// The bus failed; retry at the longer backoff period.
    Backoff,
}

/// Continuously scans the sensor bus and produces complete samples.
pub struct AcquisitionPipeline<'a, B: SensorBus> {
    bus: B,
    handoff: &'a SampleHandoff,
    buffers: [TemperatureSample; 2],
    active: usize,
}

impl<'a, B: SensorBus> AcquisitionPipeline<'a, B> {
    pub fn new(bus: B, handoff: &'a SampleHandoff) -> Self {
        Self {
            bus,
            handoff,
            buffers: [TemperatureSample::empty(); 2],
            active: 0,
        }
    }

    /// Access the underlying bus (failure injection in tests, bus
    /// diagnostics in adapters).
    pub fn bus_mut(&mut self) -> &mut B {
        &mut self.bus
    }

    /// One scan → measure → publish pass.
    ///
    /// Bus failures are not fatal: the cycle's sample degrades to "no
    /// sensors" (still published, so downstream sees the loss) and the
    /// returned pace asks for a longer wait before retrying.
    pub fn run_cycle(&mut self) -> CyclePace {
        let buf = &mut self.buffers[self.active];
        *buf = TemperatureSample::empty();

        let pace = match Self::fill(&mut self.bus, buf) {
            Ok(()) => CyclePace::Normal,
            Err(e) => {
                warn!("sensor bus cycle failed: {}; presenting no sensors", e);
                *buf = TemperatureSample::empty();
                CyclePace::Backoff
            }
        };

        if self.handoff.publish(*buf).is_ok() {
            // The published buffer may now be referenced by the consumer;
            // the next cycle writes the other one.
            self.active ^= 1;
        } else {
            warn!("sample hand-off slot full; skipping publish");
        }

        pace
    }

    /// Forever-task wrapping [`run_cycle`](Self::run_cycle). Spawn on the
    /// acquisition executor.
    pub async fn run(mut self, normal: Duration, backoff: Duration) -> ! {
        loop {
            let pace = self.run_cycle();
            Timer::after(match pace {
                CyclePace::Normal => normal,
                CyclePace::Backoff => backoff,
            })
            .await;
        }
    }

    fn fill(bus: &mut B, buf: &mut TemperatureSample) -> Result<(), BusError> {
        let ids = bus.scan()?;
        let count = ids.len().min(MAX_BUS_SENSORS);
        let ids = &ids[..count];

        buf.identities[1..=count].copy_from_slice(ids);
        bus.measure_and_read(ids, &mut buf.readings[1..=count])?;
        buf.sensor_count = count + 1;
        Ok(())
    }
}
