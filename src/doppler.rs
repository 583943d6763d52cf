//! Doppler model
//!
//! Pure conversions between the frequency heard/sent at the ground station
//! ("observed") and the frequency on the satellite transponder, given a
//! Doppler ratio `r = 1 + doppler100 / 1e8`.
//!
//! Downlink (`tx = false`): the satellite radiates `f_sat`, we hear `f_sat * r`.
//! Uplink (`tx = true`): we must transmit `f_sat / r` for the satellite to
//! receive `f_sat`. The shift has the opposite sign on the way up.
//!
//! `r` is never zero: it is built from a physically realizable shift that is
//! many orders of magnitude smaller than the 100 MHz reference.

/// Reference frequency the ephemeris reports Doppler shift against
pub const REFERENCE_HZ: f64 = 100e6;

/// Doppler ratio for a shift observed at the 100 MHz reference
pub fn ratio_from_shift(doppler_100mhz_hz: f64) -> f64 {
    1.0 + doppler_100mhz_hz / REFERENCE_HZ
}

/// Doppler shift at `f_ref`, scaled from the 100 MHz reference shift.
/// Negated for the uplink.
pub fn doppler_shift(f_ref: f64, doppler_100mhz_hz: f64, tx: bool) -> f64 {
    let shift = f_ref / REFERENCE_HZ * doppler_100mhz_hz;
    if tx {
        -shift
    } else {
        shift
    }
}

/// Frequency on the satellite for a frequency observed at the ground station
pub fn satellite_frequency_from_observed(f_obs: f64, r: f64, tx: bool) -> f64 {
    if tx {
        f_obs * r
    } else {
        f_obs / r
    }
}

/// Frequency observed at the ground station for a frequency on the satellite
pub fn observed_frequency_from_satellite(f_sat: f64, r: f64, tx: bool) -> f64 {
    if tx {
        f_sat / r
    } else {
        f_sat * r
    }
}

/// Re-target a dial frequency that was set for `from_ratio` so that it hits
/// the same satellite frequency at `to_ratio`.
pub fn retarget(f_obs: f64, from_ratio: f64, to_ratio: f64, tx: bool) -> f64 {
    observed_frequency_from_satellite(
        satellite_frequency_from_observed(f_obs, from_ratio, tx),
        to_ratio,
        tx,
    )
}
