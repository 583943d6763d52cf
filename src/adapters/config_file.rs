//! JSON configuration file adapter
//!
//! Reads a `Configuration` from disk and turns its satellite records into
//! domain `Satellite`s. Everything is validated here, once; the engine
//! never sees a malformed transponder.

use std::path::PathBuf;

use crate::domain::{
    Configuration, Mode, Passband, SatelliteConfig, Satellite, SatrigError, SatrigResult,
    Transponder, TransponderConfig, TwoLineElements,
};

/// Where to load the configuration from
#[derive(Debug, Clone)]
pub struct LoaderConfig {
    pub path: PathBuf,
}

pub struct ConfigLoader {
    config: LoaderConfig,
}

impl ConfigLoader {
    pub fn new(config: LoaderConfig) -> Self {
        Self { config }
    }

    /// Read and parse the configuration file
    pub fn load(&self) -> SatrigResult<Configuration> {
        let path = &self.config.path;
        let json = std::fs::read_to_string(path).map_err(|e| {
            SatrigError::Config(format!("Failed to read {}: {e}", path.display()))
        })?;
        let config: Configuration = serde_json::from_str(&json).map_err(|e| {
            SatrigError::Config(format!("Failed to parse {}: {e}", path.display()))
        })?;

        if config.timing.ui_interval_ms == 0 {
            return Err(SatrigError::Config("ui_interval_ms must be positive".into()));
        }
        if config.timing.calc_interval_ms < config.timing.ui_interval_ms {
            return Err(SatrigError::Config(format!(
                "calc_interval_ms ({}) must not be shorter than ui_interval_ms ({})",
                config.timing.calc_interval_ms, config.timing.ui_interval_ms
            )));
        }

        log::info!(
            "Loaded {} satellite(s) from {}",
            config.satellites.len(),
            path.display()
        );
        Ok(config)
    }

    /// Build the tracked satellite list. Satellites without transponders
    /// are skipped; an empty result is an error.
    pub fn satellites(config: &Configuration) -> SatrigResult<Vec<Satellite>> {
        let mut satellites = Vec::with_capacity(config.satellites.len());
        for record in &config.satellites {
            if record.transponders.is_empty() {
                log::warn!("Satellite {} has no transponders, skipping", record.id);
                continue;
            }
            satellites.push(build_satellite(record, config)?);
        }

        if satellites.is_empty() {
            return Err(SatrigError::Config(
                "No satellites with transponders configured".into(),
            ));
        }
        Ok(satellites)
    }
}

fn build_satellite(record: &SatelliteConfig, config: &Configuration) -> SatrigResult<Satellite> {
    let tle = TwoLineElements::parse(&record.tle)
        .map_err(|e| SatrigError::Config(format!("Satellite {}: {e}", record.id)))?;

    let name = record
        .name
        .clone()
        .or_else(|| tle.name.clone())
        .unwrap_or_else(|| record.id.clone());

    let transponders = record
        .transponders
        .iter()
        .map(build_transponder)
        .collect::<SatrigResult<Vec<_>>>()
        .map_err(|e| SatrigError::Config(format!("Satellite {}: {e}", record.id)))?;

    Ok(Satellite::new(
        record.id.clone(),
        name,
        tle,
        config.station,
        transponders,
    ))
}

fn build_transponder(record: &TransponderConfig) -> SatrigResult<Transponder> {
    let mode = Mode::from_name(&record.mode);
    if mode == Mode::Other {
        log::warn!(
            "Transponder {}: mode {:?} not supported by the radio",
            record.name,
            record.mode
        );
    }

    let downlink = Passband::from_edges(record.down_low, record.down_high)?;
    // UP_LOW of zero means no uplink
    let uplink = record
        .up_low
        .filter(|&low| low > 0)
        .map(|low| Passband::from_edges(low, record.up_high))
        .transpose()?;

    Ok(Transponder {
        name: record.name.clone(),
        mode,
        inverting: record.invert,
        downlink,
        uplink,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const STATION_JSON: &str = r#"{
        "station": { "latitude_deg": 52.0, "longitude_deg": 4.4, "altitude_m": 10 },
        "rig": { "port": "/dev/ttyS1" },
        "satellites": [
            {
                "id": "43017",
                "tle": "1 43017U 17073E   20194.58335648  .00000114  00000-0  17289-4 0  9990\n2 43017  97.6966 145.4826 0226297 180.9216 179.1200 14.79254707140986",
                "transponders": [
                    { "name": "FM", "mode": "fm", "down_low": 145960000, "up_low": 435250000 }
                ]
            },
            {
                "id": "25544",
                "name": "ISS",
                "tle": "ISS (ZARYA)\n1 25544U 98067A   20194.88612269 -.00002218  00000-0 -31515-4 0  9992\n2 25544  51.6461 221.2784 0001413  89.1723 280.4612 15.49507896236008",
                "transponders": []
            }
        ]
    }"#;

    fn write_temp(contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    fn loader(file: &NamedTempFile) -> ConfigLoader {
        ConfigLoader::new(LoaderConfig {
            path: file.path().to_path_buf(),
        })
    }

    #[test]
    fn loads_and_builds_satellites() {
        let file = write_temp(STATION_JSON);
        let config = loader(&file).load().unwrap();
        assert_eq!(config.rig.port, "/dev/ttyS1");
        assert_eq!(config.rig.baud_rate, 19200);

        let sats = ConfigLoader::satellites(&config).unwrap();
        // The ISS entry has no transponders and is skipped
        assert_eq!(sats.len(), 1);
        assert_eq!(sats[0].name, "43017");
        assert_eq!(sats[0].transponders[0].mode, Mode::Fm);
        assert_eq!(sats[0].transponders[0].uplink.unwrap().center_hz, 435_250_000);
        assert_eq!(sats[0].station.altitude_m, 10.0);
    }

    #[test]
    fn name_falls_back_to_tle_name() {
        let mut config: Configuration = serde_json::from_str(STATION_JSON).unwrap();
        config.satellites[1].name = None;
        config.satellites[1].transponders = config.satellites[0].transponders.clone();
        let sats = ConfigLoader::satellites(&config).unwrap();
        assert_eq!(sats[1].name, "ISS (ZARYA)");
    }

    #[test]
    fn no_usable_satellites_is_an_error() {
        let mut config: Configuration = serde_json::from_str(STATION_JSON).unwrap();
        config.satellites.truncate(0);
        assert!(matches!(
            ConfigLoader::satellites(&config),
            Err(SatrigError::Config(_))
        ));
    }

    #[test]
    fn inverted_band_edges_are_rejected() {
        let mut config: Configuration = serde_json::from_str(STATION_JSON).unwrap();
        config.satellites[0].transponders[0].down_high = Some(145_000_000);
        let err = ConfigLoader::satellites(&config).unwrap_err();
        assert!(err.to_string().contains("43017"));
    }

    #[test]
    fn zero_uplink_disables_transmit() {
        let mut config: Configuration = serde_json::from_str(STATION_JSON).unwrap();
        let trsp = &mut config.satellites[0].transponders[0];
        trsp.mode = "CW".into();
        trsp.up_low = Some(0);
        let sats = ConfigLoader::satellites(&config).unwrap();
        assert_eq!(sats[0].transponders[0].uplink, None);
        assert!(!sats[0].transponders[0].has_uplink());
    }

    #[test]
    fn missing_file_is_a_config_error() {
        let loader = ConfigLoader::new(LoaderConfig {
            path: PathBuf::from("/nonexistent/satrig.json"),
        });
        assert!(matches!(loader.load(), Err(SatrigError::Config(_))));
    }

    #[test]
    fn calc_interval_shorter_than_ui_interval_is_rejected() {
        let json = STATION_JSON.replacen(
            "\"satellites\"",
            "\"loop\": { \"ui_interval_ms\": 100, \"calc_interval_ms\": 50 }, \"satellites\"",
            1,
        );
        let file = write_temp(&json);
        assert!(loader(&file).load().is_err());
    }
}
