//! Frame rate instrumentation
//!
//! Counts ticks on a channel and derives a per-second rate whenever a sample
//! is taken.

use serde::{Deserialize, Serialize};

/// Tick counter since a reset time
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FrameRate {
    count: u32,
    since_ms: f64,
}

impl FrameRate {
    pub fn new(now_ms: f64) -> Self {
        Self {
            count: 0,
            since_ms: now_ms,
        }
    }

    #[inline]
    pub fn tick(&mut self) {
        self.count += 1;
    }

    /// Milliseconds since the last reset
    pub fn elapsed_ms(&self, now_ms: f64) -> f64 {
        now_ms - self.since_ms
    }

    /// Ticks per second since the last reset, rounded
    pub fn rate(&self, now_ms: f64) -> u32 {
        let elapsed = self.elapsed_ms(now_ms);
        if elapsed <= 0.0 {
            return 0;
        }
        (f64::from(self.count) / (elapsed / 1000.0)).round() as u32
    }

    pub fn reset(&mut self, now_ms: f64) {
        self.count = 0;
        self.since_ms = now_ms;
    }
}

/// Counter channel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Channel {
    Render,
    Update,
}

/// Last sampled rates, for display
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rates {
    pub render: u32,
    pub update: u32,
}

/// Render and update counters, re-sampled about once a second
#[derive(Debug, Clone)]
pub struct FpsCounter {
    render: FrameRate,
    update: FrameRate,
    rates: Rates,
}

impl FpsCounter {
    /// Sampling window (ms)
    pub const SAMPLE_MS: f64 = 1000.0;

    pub fn new(now_ms: f64) -> Self {
        Self {
            render: FrameRate::new(now_ms),
            update: FrameRate::new(now_ms),
            rates: Rates::default(),
        }
    }

    /// Count one tick on `channel`, re-sampling once the window has passed
    pub fn tick(&mut self, channel: Channel, now_ms: f64) {
        let (rate, slot) = match channel {
            Channel::Render => (&mut self.render, &mut self.rates.render),
            Channel::Update => (&mut self.update, &mut self.rates.update),
        };
        rate.tick();
        if rate.elapsed_ms(now_ms) > Self::SAMPLE_MS {
            *slot = rate.rate(now_ms);
            rate.reset(now_ms);
        }
    }

    #[inline]
    pub fn rates(&self) -> Rates {
        self.rates
    }
}
