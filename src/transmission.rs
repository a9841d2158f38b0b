//! Simulates sending a message down a noisy line.
//!
//! Each byte of the message independently has probability `p` of being
//! dropped, probability `p` of being doubled, and is otherwise left alone.
//! The walk edits the string while iterating it, so it steers only by the
//! positions its own edits return, through a [`CursorMut`].
//!
//! [`CursorMut`]: crate::cursor::CursorMut

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::debug;

use crate::chunky_string::ChunkyString;
use crate::error::{Result, TransmissionError};

/// Highest error rate for which "drop" and "double" stay disjoint.
pub const MAX_ERROR_RATE: f64 = 0.5;

/// What one call to [`NoisyTransmission::transmit`] did to the message.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TransmissionStats {
    pub erased: usize,
    pub duplicated: usize,
    pub unchanged: usize,
}

#[derive(Debug)]
pub struct NoisyTransmission<R = StdRng> {
    error_rate: f64,
    rng: R,
}

pub(crate) fn check_error_rate(error_rate: f64) -> bool {
    (0.0..=MAX_ERROR_RATE).contains(&error_rate)
}

impl NoisyTransmission<StdRng> {
    /// Seeded from OS entropy.
    pub fn new(error_rate: f64) -> std::result::Result<Self, TransmissionError> {
        Self::from_rng(error_rate, StdRng::from_entropy())
    }

    /// Deterministic: the same seed always damages a message the same way.
    pub fn with_seed(error_rate: f64, seed: u64) -> std::result::Result<Self, TransmissionError> {
        Self::from_rng(error_rate, StdRng::seed_from_u64(seed))
    }
}

impl<R: Rng> NoisyTransmission<R> {
    pub fn from_rng(error_rate: f64, rng: R) -> std::result::Result<Self, TransmissionError> {
        if !check_error_rate(error_rate) {
            return Err(TransmissionError::InvalidErrorRate(error_rate));
        }
        Ok(Self { error_rate, rng })
    }

    pub fn error_rate(&self) -> f64 {
        self.error_rate
    }

    /// Uniform draw in `[0, 1)`.
    pub fn random_float(&mut self) -> f64 {
        self.rng.gen()
    }

    /// Damages `message` in place, front to back. A doubled byte is copied
    /// once; neither copy is rolled for again.
    pub fn transmit<const N: usize>(&mut self, message: &mut ChunkyString<N>) -> Result<TransmissionStats> {
        let mut stats = TransmissionStats::default();
        let mut cursor = message.cursor_mut();

        while let Some(c) = cursor.current() {
            let roll = self.random_float();
            if roll < self.error_rate {
                cursor.erase()?;
                stats.erased += 1;
            } else if roll > 1.0 - self.error_rate {
                cursor.insert(c)?;
                // Step over the inserted copy and the original
                cursor.move_next()?;
                cursor.move_next()?;
                stats.duplicated += 1;
            } else {
                cursor.move_next()?;
                stats.unchanged += 1;
            }
        }

        debug!(
            erased = stats.erased,
            duplicated = stats.duplicated,
            unchanged = stats.unchanged,
            len = message.len(),
            "transmitted message"
        );
        Ok(stats)
    }
}
