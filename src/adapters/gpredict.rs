//! Gpredict configuration directory adapter
//!
//! Builds a `Configuration` from a Gpredict user directory
//! (usually `~/.config/Gpredict`):
//!
//! - `gpredict.cfg`: `[GLOBAL] OPEN_MODULES` and `DEFAULT_QTH`
//! - `<DEFAULT_QTH>`: `[QTH] LAT`, `LON` (east positive), `ALT` (m)
//! - `modules/<module>.mod`: `[GLOBAL] SATELLITES`, `;`-separated ids
//! - `satdata/<id>.sat`: `[Satellite] VERSION` (1.1), `NAME`, `TLE1`, `TLE2`
//! - `trsp/<id>.trsp`: one section per transponder
//!
//! A satellite without a `.trsp` file is kept with no transponders;
//! `ConfigLoader::satellites` drops it later. Rig and loop settings are
//! not part of Gpredict and take their defaults.

use std::fmt::Display;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use ini::{Ini, Properties};

use crate::domain::{
    Configuration, GroundStation, LoopConfig, RigConfig, SatelliteConfig, SatrigError,
    SatrigResult, TransponderConfig,
};

/// Only satellite data format this loader understands
const SATDATA_VERSION: &str = "1.1";

/// Where Gpredict keeps its files
#[derive(Debug, Clone)]
pub struct GpredictConfig {
    pub gpredict_dir: PathBuf,
}

pub struct GpredictLoader {
    config: GpredictConfig,
}

impl GpredictLoader {
    pub fn new(config: GpredictConfig) -> Self {
        Self { config }
    }

    /// Read the station and every satellite of the open modules
    pub fn load(&self) -> SatrigResult<Configuration> {
        let dir = &self.config.gpredict_dir;
        if !dir.is_dir() {
            return Err(SatrigError::Config(format!(
                "No Gpredict configuration found in {}",
                dir.display()
            )));
        }

        let cfg_path = dir.join("gpredict.cfg");
        let cfg = read_ini(&cfg_path)?;
        let open_modules = required(&cfg, "GLOBAL", "OPEN_MODULES", &cfg_path)?;
        let default_qth = required(&cfg, "GLOBAL", "DEFAULT_QTH", &cfg_path)?;

        let station = read_qth(&dir.join(default_qth))?;

        let mut ids: Vec<String> = Vec::new();
        for module in split_list(open_modules) {
            let path = dir.join("modules").join(format!("{module}.mod"));
            let ini = read_ini(&path)?;
            for id in split_list(required(&ini, "GLOBAL", "SATELLITES", &path)?) {
                if !ids.iter().any(|known| known == id) {
                    ids.push(id.to_string());
                }
            }
        }

        let satellites = ids
            .iter()
            .map(|id| read_satellite(dir, id))
            .collect::<SatrigResult<Vec<_>>>()?;

        log::info!(
            "Loaded {} satellite(s) from Gpredict modules {open_modules:?} in {}",
            satellites.len(),
            dir.display()
        );
        Ok(Configuration {
            station,
            rig: RigConfig::default(),
            timing: LoopConfig::default(),
            satellites,
        })
    }
}

fn read_qth(path: &Path) -> SatrigResult<GroundStation> {
    let ini = read_ini(path)?;
    Ok(GroundStation {
        latitude_deg: number(required(&ini, "QTH", "LAT", path)?, "LAT", path)?,
        longitude_deg: number(required(&ini, "QTH", "LON", path)?, "LON", path)?,
        altitude_m: number(required(&ini, "QTH", "ALT", path)?, "ALT", path)?,
    })
}

fn read_satellite(dir: &Path, id: &str) -> SatrigResult<SatelliteConfig> {
    let path = dir.join("satdata").join(format!("{id}.sat"));
    let ini = read_ini(&path)?;

    let version = required(&ini, "Satellite", "VERSION", &path)?;
    if version != SATDATA_VERSION {
        return Err(SatrigError::Config(format!(
            "{}: unknown data format version {version}",
            path.display()
        )));
    }
    let name = required(&ini, "Satellite", "NAME", &path)?;
    let tle1 = required(&ini, "Satellite", "TLE1", &path)?;
    let tle2 = required(&ini, "Satellite", "TLE2", &path)?;

    let trsp_path = dir.join("trsp").join(format!("{id}.trsp"));
    let transponders = if trsp_path.is_file() {
        read_transponders(&trsp_path)?
    } else {
        log::warn!("No transponder file {} for {name}", trsp_path.display());
        Vec::new()
    };

    Ok(SatelliteConfig {
        id: id.to_string(),
        name: Some(name.to_string()),
        tle: format!("{name}\n{tle1}\n{tle2}"),
        transponders,
    })
}

/// Every named section except Gpredict's `DEFAULT` is a transponder
fn read_transponders(path: &Path) -> SatrigResult<Vec<TransponderConfig>> {
    let ini = read_ini(path)?;
    ini.iter()
        .filter_map(|(section, props)| section.map(|name| (name, props)))
        .filter(|(name, _)| !name.contains("DEFAULT"))
        .map(|(name, props)| transponder(name, props, path))
        .collect()
}

fn transponder(name: &str, props: &Properties, path: &Path) -> SatrigResult<TransponderConfig> {
    let optional = |key: &str| -> SatrigResult<Option<u64>> {
        props.get(key).map(|v| number(v, key, path)).transpose()
    };
    let down_low = optional("DOWN_LOW")?.ok_or_else(|| {
        SatrigError::Config(format!("{}: [{name}] has no DOWN_LOW", path.display()))
    })?;

    Ok(TransponderConfig {
        name: name.to_string(),
        mode: props.get("MODE").unwrap_or_default().to_string(),
        invert: props.get("INVERT") == Some("true"),
        down_low,
        down_high: optional("DOWN_HIGH")?,
        up_low: optional("UP_LOW")?,
        up_high: optional("UP_HIGH")?,
    })
}

fn read_ini(path: &Path) -> SatrigResult<Ini> {
    Ini::load_from_file_noescape(path)
        .map_err(|e| SatrigError::Config(format!("Can't open {}: {e}", path.display())))
}

fn required<'a>(ini: &'a Ini, section: &str, key: &str, path: &Path) -> SatrigResult<&'a str> {
    ini.get_from(Some(section), key).ok_or_else(|| {
        SatrigError::Config(format!("{}: missing [{section}] {key}", path.display()))
    })
}

fn number<T>(value: &str, key: &str, path: &Path) -> SatrigResult<T>
where
    T: FromStr,
    T::Err: Display,
{
    value.trim().parse().map_err(|e| {
        SatrigError::Config(format!("{}: bad {key} {value:?}: {e}", path.display()))
    })
}

fn split_list(list: &str) -> impl Iterator<Item = &str> {
    list.split(';').map(str::trim).filter(|s| !s.is_empty())
}
