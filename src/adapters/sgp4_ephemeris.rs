//! SGP4 ephemeris adapter using the `sgp4` crate
//!
//! Propagates two-line elements to an instant, rotates the TEME state into
//! the Earth-fixed frame and reduces it to azimuth, elevation and the
//! Doppler shift a 100 MHz downlink would see.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use sgp4::{Constants, Elements};

use crate::doppler::REFERENCE_HZ;
use crate::domain::{
    GroundStation, Observation, SatrigError, SatrigResult, TwoLineElements,
    EARTH_ROTATION_RAD_S,
};
use crate::ports::Ephemeris;

pub const SPEED_OF_LIGHT_KM_S: f64 = 299_792.458;

struct Propagator {
    elements: Elements,
    constants: Constants,
}

/// Caches parsed elements per satellite id
#[derive(Default)]
pub struct Sgp4Ephemeris {
    cache: HashMap<String, Propagator>,
}

impl Sgp4Ephemeris {
    pub fn new() -> Self {
        Self::default()
    }

    fn propagator(&mut self, id: &str, tle: &TwoLineElements) -> SatrigResult<&Propagator> {
        if !self.cache.contains_key(id) {
            let elements =
                Elements::from_tle(tle.name.clone(), tle.line1.as_bytes(), tle.line2.as_bytes())
                    .map_err(|e| SatrigError::Ephemeris(format!("Bad TLE for {id}: {e}")))?;
            let constants = Constants::from_elements(&elements)
                .map_err(|e| SatrigError::Ephemeris(format!("Bad elements for {id}: {e}")))?;
            log::debug!("Loaded elements for {id}");
            self.cache.insert(
                id.to_string(),
                Propagator {
                    elements,
                    constants,
                },
            );
        }
        self.cache
            .get(id)
            .ok_or_else(|| SatrigError::Ephemeris(format!("No elements for {id}")))
    }
}

impl Ephemeris for Sgp4Ephemeris {
    fn observe(
        &mut self,
        id: &str,
        tle: &TwoLineElements,
        station: &GroundStation,
        at: DateTime<Utc>,
    ) -> SatrigResult<Observation> {
        let propagator = self.propagator(id, tle)?;
        let naive = at.naive_utc();

        let minutes = propagator
            .elements
            .datetime_to_minutes_since_epoch(&naive)
            .map_err(|e| SatrigError::Ephemeris(e.to_string()))?;
        let prediction = propagator
            .constants
            .propagate(minutes)
            .map_err(|e| SatrigError::Ephemeris(e.to_string()))?;

        let sidereal = sgp4::iau_epoch_to_sidereal_time(sgp4::julian_years_since_j2000(&naive));
        let sat_ecef = teme_to_ecef_position(prediction.position, sidereal);
        let sat_vel = teme_to_ecef_velocity(prediction.position, prediction.velocity, sidereal);

        let sta_ecef = station.position_ecef_km();
        let sta_vel = station.velocity_ecef_km_s();

        let dr = [
            sat_ecef[0] - sta_ecef[0],
            sat_ecef[1] - sta_ecef[1],
            sat_ecef[2] - sta_ecef[2],
        ];
        let range_km = (dr[0] * dr[0] + dr[1] * dr[1] + dr[2] * dr[2]).sqrt();
        if range_km <= 0.0 {
            return Err(SatrigError::Ephemeris(format!(
                "Degenerate geometry for {id}"
            )));
        }

        let (east, north, up) = ecef_to_enu(dr, station.lat_rad(), station.lon_rad());
        let azimuth_deg = east.atan2(north).to_degrees().rem_euclid(360.0);
        let elevation_deg = (up / range_km).asin().to_degrees();

        let range_rate_km_s = (0..3)
            .map(|i| (sat_vel[i] - sta_vel[i]) * dr[i] / range_km)
            .sum::<f64>();

        Ok(Observation {
            azimuth_deg,
            elevation_deg,
            doppler_100mhz_hz: doppler_at_reference(range_rate_km_s),
        })
    }
}

/// Shift at 100 MHz for a range rate. Approaching (negative rate) raises
/// the received frequency.
pub fn doppler_at_reference(range_rate_km_s: f64) -> f64 {
    -REFERENCE_HZ * range_rate_km_s / SPEED_OF_LIGHT_KM_S
}

pub fn teme_to_ecef_position(pos_teme: [f64; 3], gmst: f64) -> [f64; 3] {
    let (sin_gmst, cos_gmst) = gmst.sin_cos();
    [
        pos_teme[0] * cos_gmst + pos_teme[1] * sin_gmst,
        -pos_teme[0] * sin_gmst + pos_teme[1] * cos_gmst,
        pos_teme[2],
    ]
}

pub fn teme_to_ecef_velocity(pos_teme: [f64; 3], vel_teme: [f64; 3], gmst: f64) -> [f64; 3] {
    let pos = teme_to_ecef_position(pos_teme, gmst);
    let rotated = teme_to_ecef_position(vel_teme, gmst);
    [
        rotated[0] + EARTH_ROTATION_RAD_S * pos[1],
        rotated[1] - EARTH_ROTATION_RAD_S * pos[0],
        rotated[2],
    ]
}

pub fn ecef_to_enu(dr: [f64; 3], lat_rad: f64, lon_rad: f64) -> (f64, f64, f64) {
    let (sin_lat, cos_lat) = lat_rad.sin_cos();
    let (sin_lon, cos_lon) = lon_rad.sin_cos();

    let east = -sin_lon * dr[0] + cos_lon * dr[1];
    let north = -sin_lat * cos_lon * dr[0] - sin_lat * sin_lon * dr[1] + cos_lat * dr[2];
    let up = cos_lat * cos_lon * dr[0] + cos_lat * sin_lon * dr[1] + sin_lat * dr[2];
    (east, north, up)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn iss() -> TwoLineElements {
        TwoLineElements::parse(
            "ISS (ZARYA)
1 25544U 98067A   20194.88612269 -.00002218  00000-0 -31515-4 0  9992
2 25544  51.6461 221.2784 0001413  89.1723 280.4612 15.49507896236008",
        )
        .unwrap()
    }

    fn station() -> GroundStation {
        GroundStation {
            latitude_deg: 52.0,
            longitude_deg: 4.4,
            altitude_m: 10.0,
        }
    }

    #[test]
    fn observation_is_physically_plausible() {
        let mut eph = Sgp4Ephemeris::new();
        let at = Utc.with_ymd_and_hms(2020, 7, 12, 22, 0, 0).unwrap();
        let obs = eph.observe("25544", &iss(), &station(), at).unwrap();

        assert!((0.0..360.0).contains(&obs.azimuth_deg));
        assert!((-90.0..=90.0).contains(&obs.elevation_deg));
        // LEO range rate never exceeds ~8 km/s, i.e. ~2.7 kHz at 100 MHz
        assert!(obs.doppler_100mhz_hz.abs() < 2_700.0);
    }

    #[test]
    fn elements_are_parsed_once_per_id() {
        let mut eph = Sgp4Ephemeris::new();
        let at = Utc.with_ymd_and_hms(2020, 7, 12, 22, 0, 0).unwrap();
        eph.observe("25544", &iss(), &station(), at).unwrap();
        eph.observe("25544", &iss(), &station(), at).unwrap();
        assert_eq!(eph.cache.len(), 1);
    }

    #[test]
    fn malformed_tle_is_an_ephemeris_error() {
        let mut eph = Sgp4Ephemeris::new();
        let tle = TwoLineElements {
            name: None,
            line1: "1 garbage".into(),
            line2: "2 garbage".into(),
        };
        let at = Utc.with_ymd_and_hms(2020, 7, 12, 22, 0, 0).unwrap();
        assert!(matches!(
            eph.observe("x", &tle, &station(), at),
            Err(SatrigError::Ephemeris(_))
        ));
    }

    #[test]
    fn approaching_satellite_raises_frequency() {
        assert!(doppler_at_reference(-7.0) > 0.0);
        assert!((doppler_at_reference(-SPEED_OF_LIGHT_KM_S / 1e6) - 100.0).abs() < 1e-9);
    }

    #[test]
    fn enu_of_zenith_offset_is_up() {
        let (e, n, u) = ecef_to_enu([1.0, 0.0, 0.0], 0.0, 0.0);
        assert!(e.abs() < 1e-12);
        assert!(n.abs() < 1e-12);
        assert!((u - 1.0).abs() < 1e-12);
    }
}
