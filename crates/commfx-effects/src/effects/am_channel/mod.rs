//! AM channel simulation.
//!
//! Each channel goes through a complete analog link:
//!
//! 1. Peak-normalize, optionally pre-emphasize (first-order highpass, 3 kHz)
//! 2. Modulate onto a carrier with random frequency and phase error
//!    (standard AM, DSB-SC or SSB)
//! 3. Add white Gaussian noise at the configured SNR
//! 4. Recover the carrier by squaring and halving (suppressed-carrier modes)
//! 5. Demodulate (envelope detector, or synchronous detector with `2/m` gain)
//! 6. De-emphasize, then peak-normalize
//!
//! All randomness comes from a per-channel PCG32 stream derived from the
//! seed passed to `process`.

mod demodulator;
mod effect;
mod modulator;
mod recovery;
mod types;


pub use effect::AmChannelEffect;
pub use types::{
    AmChannelParams, AmMode, MAX_SNR_DB, MAX_SYNC_TOLERANCE, MIN_CARRIER_HZ, NYQUIST_MARGIN_HZ,
};
