use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uci_core::models::cohort::BedSelection;
use uci_core::models::patient::DischargeGrace;
use uci_core::models::procedure::ShiftSchedule;

/// Current config version. Bump this when adding fields or changing shape.
/// Each bump requires a corresponding entry in [`migrate`].
const CURRENT_VERSION: u32 = 2;

/// Environment variable naming the config file read by [`EngineConfig::from_env`].
pub const CONFIG_ENV: &str = "UCI_CONFIG";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct EngineConfig {
    /// Schema version. Missing or 0 = pre-versioned config.
    #[serde(default)]
    pub config_version: u32,
    /// How long after discharge a scored assessment may still be dated.
    #[serde(default)]
    pub assessment_grace: DischargeGrace,
    /// The same window for patient-bound procedure logs.
    #[serde(default = "default_procedure_grace")]
    pub procedure_grace: DischargeGrace,
    #[serde(default)]
    pub shift_schedule: ShiftSchedule,
    /// Named bed ranges shown as sectors on the dashboard. Added in v2.
    #[serde(default)]
    pub sectors: Vec<Sector>,
}

/// An inclusive range of beds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Sector {
    pub name: String,
    pub first_bed: u32,
    pub last_bed: u32,
}

impl Sector {
    pub fn beds(&self) -> BedSelection {
        BedSelection::Range {
            from: self.first_bed,
            to: self.last_bed,
        }
    }
}

fn default_procedure_grace() -> DischargeGrace {
    DischargeGrace {
        days: 1,
        inclusive: true,
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            config_version: CURRENT_VERSION,
            assessment_grace: DischargeGrace::NONE,
            procedure_grace: default_procedure_grace(),
            shift_schedule: ShiftSchedule::default(),
            sectors: Vec::new(),
        }
    }
}

impl EngineConfig {
    /// Load from the file named by `UCI_CONFIG`, or defaults when unset.
    pub fn from_env() -> eyre::Result<Self> {
        match std::env::var_os(CONFIG_ENV) {
            Some(path) => load_config(&PathBuf::from(path)),
            None => {
                tracing::debug!("{CONFIG_ENV} not set, using default config");
                Ok(EngineConfig::default())
            }
        }
    }

    pub fn validate(&self) -> eyre::Result<()> {
        self.shift_schedule
            .validate()
            .map_err(|e| eyre::eyre!("shift_schedule: {e}"))?;

        let mut names = BTreeSet::new();
        for sector in &self.sectors {
            if sector.name.trim().is_empty() {
                return Err(eyre::eyre!(
                    "sector with beds {}-{} has no name",
                    sector.first_bed,
                    sector.last_bed
                ));
            }
            if sector.first_bed > sector.last_bed {
                return Err(eyre::eyre!(
                    "sector '{}' starts at bed {} after its last bed {}",
                    sector.name,
                    sector.first_bed,
                    sector.last_bed
                ));
            }
            if !names.insert(sector.name.as_str()) {
                return Err(eyre::eyre!("sector '{}' defined twice", sector.name));
            }
        }
        Ok(())
    }

    pub fn sector(&self, name: &str) -> Option<&Sector> {
        self.sectors.iter().find(|s| s.name == name)
    }
}

pub fn load_config(path: &Path) -> eyre::Result<EngineConfig> {
    let contents = std::fs::read_to_string(path)
        .map_err(|e| eyre::eyre!("failed to read config at {}: {e}", path.display()))?;

    // Parse as raw JSON so we can run migrations before deserializing.
    let json: serde_json::Value = serde_json::from_str(&contents)?;
    let on_disk_version = json
        .get("config_version")
        .and_then(|v| v.as_u64())
        .unwrap_or(0) as u32;

    let migrated = migrate(json, on_disk_version)?;
    let config: EngineConfig = serde_json::from_value(migrated)?;
    config.validate()?;
    tracing::debug!(path = %path.display(), version = on_disk_version, "config loaded");
    Ok(config)
}

/// Run sequential migrations from `from_version` up to [`CURRENT_VERSION`].
/// Each migration is a pure transform on the raw JSON value.
fn migrate(mut json: serde_json::Value, from_version: u32) -> eyre::Result<serde_json::Value> {
    if from_version > CURRENT_VERSION {
        return Err(eyre::eyre!(
            "config_version {from_version} is newer than this build supports ({CURRENT_VERSION})"
        ));
    }

    let obj = json
        .as_object_mut()
        .ok_or_else(|| eyre::eyre!("config is not a JSON object"))?;

    // v0 → v1: `grace_hours` (procedures only) becomes `procedure_grace`,
    // `day_shift: [start, end]` becomes `shift_schedule`.
    if from_version < 1 {
        if let Some(hours) = obj.remove("grace_hours") {
            let hours = hours
                .as_u64()
                .ok_or_else(|| eyre::eyre!("grace_hours must be a whole number"))?;
            obj.insert(
                "procedure_grace".to_string(),
                serde_json::json!({ "days": hours.div_ceil(24), "inclusive": true }),
            );
        }
        if let Some(day_shift) = obj.remove("day_shift") {
            let bounds = day_shift
                .as_array()
                .filter(|a| a.len() == 2)
                .ok_or_else(|| eyre::eyre!("day_shift must be [start_hour, end_hour]"))?;
            obj.insert(
                "shift_schedule".to_string(),
                serde_json::json!({
                    "day_start_hour": bounds[0],
                    "day_end_hour": bounds[1],
                }),
            );
        }
        obj.insert("config_version".to_string(), serde_json::Value::Number(1.into()));
        tracing::info!("migrated config v0 → v1 (grace_hours, day_shift)");
    }

    // v1 → v2: add sectors
    if from_version < 2 {
        obj.entry("sectors")
            .or_insert(serde_json::Value::Array(Vec::new()));
        obj.insert("config_version".to_string(), serde_json::Value::Number(2.into()));
        tracing::info!("migrated config v1 → v2 (added sectors)");
    }

    Ok(json)
}

pub fn save_config(path: &Path, config: &EngineConfig) -> eyre::Result<()> {
    config.validate()?;
    if let Some(dir) = path.parent()
        && !dir.as_os_str().is_empty()
    {
        std::fs::create_dir_all(dir)?;
    }

    // Always write the current version, regardless of what was loaded.
    let mut stamped = config.clone();
    stamped.config_version = CURRENT_VERSION;
    let json = serde_json::to_string_pretty(&stamped)?;

    // Write to a temp file then rename for atomicity
    let tmp_path = path.with_extension("json.tmp");
    std::fs::write(&tmp_path, json.as_bytes())?;
    std::fs::rename(&tmp_path, path)?;

    tracing::info!(path = %path.display(), "config saved");
    Ok(())
}
