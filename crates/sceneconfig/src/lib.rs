use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize, Serializer};

/// Wave slots the renderer evaluates per frame.
pub const MAX_WAVE_COUNT: usize = 4;

/// Smallest grid with at least one cell.
pub const MIN_GRID_LENGTH: u16 = 2;

/// Largest grid accepted; keeps the index buffer near 400 MB.
pub const MAX_GRID_LENGTH: u16 = 4097;

/// Upper bound of the cloud-proportion slider.
pub const MAX_CLOUD_PROPORTION: f32 = 0.3;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to parse configuration: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct SceneConfig {
    pub version: u32,
    /// Extra directories searched for shader sources, before the defaults.
    #[serde(default)]
    pub shader_roots: Vec<PathBuf>,
    #[serde(default)]
    pub grid: GridConfig,
    #[serde(default)]
    pub waves: WavesConfig,
    #[serde(default)]
    pub clock: ClockConfig,
    #[serde(default)]
    pub settings: SettingsConfig,
    #[serde(default)]
    pub programs: BTreeMap<String, ProgramConfig>,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct GridConfig {
    /// Vertices per side of the water grid.
    #[serde(default = "default_grid_length")]
    pub length: u16,
    /// World-space size of the grid along X and Z.
    #[serde(default = "default_grid_extent")]
    pub extent: f32,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct WavesConfig {
    #[serde(default = "default_wave_count")]
    pub count: usize,
    /// Fixed seed for reproducible wave sets; random when absent.
    #[serde(default)]
    pub seed: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ClockConfig {
    #[serde(default = "default_min_hours")]
    pub min_hours: f32,
    #[serde(default = "default_max_hours")]
    pub max_hours: f32,
    /// Starting time of day; defaults to `min_hours`.
    #[serde(default)]
    pub start_hours: Option<f32>,
    /// Real time that one in-scene hour takes. Zero pauses the day cycle.
    #[serde(
        default = "default_seconds_per_hour",
        deserialize_with = "deserialize_duration",
        serialize_with = "serialize_duration"
    )]
    pub seconds_per_hour: Duration,
    /// Period of the vertical-bounce wave phase. Zero freezes the phase.
    #[serde(
        default = "default_wave_phase_period",
        deserialize_with = "deserialize_duration",
        serialize_with = "serialize_duration"
    )]
    pub wave_phase_period: Duration,
    #[serde(default)]
    pub animate_time_of_day: bool,
    #[serde(default = "default_true")]
    pub animate_waves: bool,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct SettingsConfig {
    #[serde(default = "default_cloud_proportion")]
    pub cloud_proportion: f32,
    #[serde(default = "default_bump")]
    pub bump_roughness: f32,
    #[serde(default = "default_bump")]
    pub bump_steepness: f32,
    #[serde(default)]
    pub bounce_amplitude: f32,
    #[serde(default)]
    pub polygon_mode: PolygonMode,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PolygonMode {
    #[default]
    Fill,
    Wireframe,
}

/// Shader resources for one program; names resolve against the shader roots.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ProgramConfig {
    pub vertex: String,
    pub fragment: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tess_control: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tess_eval: Option<String>,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            length: default_grid_length(),
            extent: default_grid_extent(),
        }
    }
}

impl Default for WavesConfig {
    fn default() -> Self {
        Self {
            count: default_wave_count(),
            seed: None,
        }
    }
}

impl Default for ClockConfig {
    fn default() -> Self {
        Self {
            min_hours: default_min_hours(),
            max_hours: default_max_hours(),
            start_hours: None,
            seconds_per_hour: default_seconds_per_hour(),
            wave_phase_period: default_wave_phase_period(),
            animate_time_of_day: false,
            animate_waves: true,
        }
    }
}

impl Default for SettingsConfig {
    fn default() -> Self {
        Self {
            cloud_proportion: default_cloud_proportion(),
            bump_roughness: default_bump(),
            bump_steepness: default_bump(),
            bounce_amplitude: 0.0,
            polygon_mode: PolygonMode::default(),
        }
    }
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            version: 1,
            shader_roots: Vec::new(),
            grid: GridConfig::default(),
            waves: WavesConfig::default(),
            clock: ClockConfig::default(),
            settings: SettingsConfig::default(),
            programs: BTreeMap::new(),
        }
    }
}

fn default_grid_length() -> u16 {
    513
}

fn default_grid_extent() -> f32 {
    100.0
}

fn default_wave_count() -> usize {
    MAX_WAVE_COUNT
}

fn default_min_hours() -> f32 {
    7.0
}

fn default_max_hours() -> f32 {
    17.0
}

fn default_seconds_per_hour() -> Duration {
    Duration::from_secs(2)
}

fn default_wave_phase_period() -> Duration {
    Duration::from_secs(4)
}

fn default_true() -> bool {
    true
}

fn default_cloud_proportion() -> f32 {
    0.15
}

fn default_bump() -> f32 {
    0.5
}

fn serialize_duration<S>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(&humantime::format_duration(*value).to_string())
}

fn deserialize_duration<'de, D>(deserializer: D) -> Result<Duration, D::Error>
where
    D: Deserializer<'de>,
{
    struct Visitor;
    impl<'de> de::Visitor<'de> for Visitor {
        type Value = Duration;

        fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
            formatter.write_str("a duration as number of seconds or human-readable string")
        }

        fn visit_str<E>(self, v: &str) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            humantime::parse_duration(v)
                .map_err(|err| E::custom(format!("invalid duration '{v}': {err}")))
        }

        fn visit_u64<E>(self, v: u64) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(Duration::from_secs(v))
        }

        fn visit_i64<E>(self, v: i64) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            if v < 0 {
                return Err(E::custom("duration must be non-negative"));
            }
            Ok(Duration::from_secs(v as u64))
        }

        fn visit_f64<E>(self, v: f64) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            if v.is_nan() || v.is_sign_negative() || v.is_infinite() {
                return Err(E::custom("duration must be finite and non-negative"));
            }
            Ok(Duration::from_secs_f64(v))
        }
    }

    deserializer.deserialize_any(Visitor)
}

impl SceneConfig {
    pub fn from_toml_str(input: &str) -> Result<Self, ConfigError> {
        let raw: SceneConfig = toml::from_str(input)?;
        raw.validate()?;
        Ok(raw)
    }

    pub fn program(&self, name: &str) -> Option<&ProgramConfig> {
        self.programs.get(name)
    }

    /// Checks every section and reports all problems in one error.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut issues = Vec::new();

        if self.version != 1 {
            issues.push(format!(
                "unsupported config version {}; expected 1",
                self.version
            ));
        }

        if !(MIN_GRID_LENGTH..=MAX_GRID_LENGTH).contains(&self.grid.length) {
            issues.push(format!(
                "grid.length must lie within [{MIN_GRID_LENGTH}, {MAX_GRID_LENGTH}], got {}",
                self.grid.length
            ));
        }

        if !self.grid.extent.is_finite() || self.grid.extent <= 0.0 {
            issues.push("grid.extent must be a positive number".into());
        }

        if self.waves.count > MAX_WAVE_COUNT {
            issues.push(format!(
                "waves.count must be at most {MAX_WAVE_COUNT}, got {}",
                self.waves.count
            ));
        }

        self.validate_clock(&mut issues);
        self.validate_settings(&mut issues);
        self.validate_programs(&mut issues);

        if issues.is_empty() {
            Ok(())
        } else {
            Err(ConfigError::Invalid(issues.join("; ")))
        }
    }

    fn validate_clock(&self, issues: &mut Vec<String>) {
        let clock = &self.clock;
        if !clock.min_hours.is_finite()
            || !clock.max_hours.is_finite()
            || clock.min_hours >= clock.max_hours
        {
            issues.push(format!(
                "clock.min_hours ({}) must be below clock.max_hours ({})",
                clock.min_hours, clock.max_hours
            ));
            return;
        }

        if let Some(start) = clock.start_hours {
            if !(clock.min_hours..=clock.max_hours).contains(&start) {
                issues.push(format!(
                    "clock.start_hours ({start}) must lie within [{}, {}]",
                    clock.min_hours, clock.max_hours
                ));
            }
        }
    }

    fn validate_settings(&self, issues: &mut Vec<String>) {
        let settings = &self.settings;
        if !(0.0..=MAX_CLOUD_PROPORTION).contains(&settings.cloud_proportion) {
            issues.push(format!(
                "settings.cloud_proportion must lie within [0, {MAX_CLOUD_PROPORTION}]"
            ));
        }

        let non_negative = [
            ("bump_roughness", settings.bump_roughness),
            ("bump_steepness", settings.bump_steepness),
            ("bounce_amplitude", settings.bounce_amplitude),
        ];
        for (key, value) in non_negative {
            if !value.is_finite() || value < 0.0 {
                issues.push(format!("settings.{key} must be >= 0"));
            }
        }
    }

    fn validate_programs(&self, issues: &mut Vec<String>) {
        for (name, program) in &self.programs {
            if name.trim().is_empty() {
                issues.push("program names may not be empty".into());
                continue;
            }
            if program.vertex.trim().is_empty() || program.fragment.trim().is_empty() {
                issues.push(format!(
                    "program '{name}' must name both a vertex and a fragment source"
                ));
            }
            let blank_tessellation = [&program.tess_control, &program.tess_eval]
                .into_iter()
                .flatten()
                .any(|source| source.trim().is_empty());
            if blank_tessellation {
                issues.push(format!(
                    "program '{name}' has an empty tessellation source; omit the key instead"
                ));
            }
        }
    }
}
