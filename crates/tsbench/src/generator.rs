//! Synthetic time-series workload
//!
//! Points are spread round-robin over the configured series. Every point
//! gets the next value of a sequence counter that is never reset, so keys
//! stay unique even when the series id wraps and timestamps repeat. Values
//! are random; keys depend only on the starting state.

use std::time::{SystemTime, UNIX_EPOCH};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::config::BenchConfig;
use crate::{encode_key, encode_value, Result, Write};

/// Amount the synthetic clock advances per generated point
pub const TIME_QUANTUM_MICROS: i64 = 1;

fn wall_clock() -> std::time::Duration {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
}

/// Generator state, threaded through the driver by `&mut`
#[derive(Debug)]
pub struct Generator {
    series: usize,
    next_series_id: usize,
    next_sequence: i64,
    clock_micros: i64,
    rng: StdRng,
}

impl Generator {
    /// Creates a generator starting at series 0, sequence 0 and the given clock
    pub fn new(series: usize, start_micros: i64, seed: u64) -> Self {
        debug_assert!(series > 0, "series count must be positive");
        Self {
            series,
            next_series_id: 0,
            next_sequence: 0,
            clock_micros: start_micros,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Creates a generator for a benchmark run, starting the clock now
    ///
    /// Without a configured seed, values are seeded from the wall clock.
    pub fn from_config(config: &BenchConfig) -> Self {
        let now = wall_clock();
        let seed = config.seed.unwrap_or(now.as_nanos() as u64);
        Self::new(config.series, now.as_micros() as i64, seed)
    }

    /// Series id the next point will use
    pub fn next_series_id(&self) -> usize {
        self.next_series_id
    }

    /// Sequence number the next point will use
    pub fn next_sequence(&self) -> i64 {
        self.next_sequence
    }

    /// Timestamp the next point will use
    pub fn clock_micros(&self) -> i64 {
        self.clock_micros
    }

    /// Produces `batch_size` writes and advances the state past them
    pub fn make_batch(&mut self, batch_size: usize) -> Result<Vec<Write>> {
        let mut writes = Vec::with_capacity(batch_size);
        for _ in 0..batch_size {
            let key = encode_key(
                self.next_series_id as i64,
                self.clock_micros,
                self.next_sequence,
            );
            let value = encode_value(self.rng.gen_range(0..=i64::MAX))?;
            writes.push(Write::new(key.to_vec(), value));
            self.advance();
        }
        Ok(writes)
    }

    fn advance(&mut self) {
        self.next_series_id += 1;
        if self.next_series_id >= self.series {
            self.next_series_id = 0;
        }
        self.next_sequence += 1;
        self.clock_micros += TIME_QUANTUM_MICROS;
    }
}
