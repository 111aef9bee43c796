use orbfind_core::{default_threads, ConfigError, OrbConfig, OrbResult};

use crate::builder::LocatorBuilder;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Complete locator configuration: detection parameters plus ranking and
/// threading.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct LocatorConfig {
    /// Number of best matches kept
    pub top_n: usize,
    /// Worker threads of the locator's pool
    pub n_threads: usize,
    /// Keep only mutual nearest neighbours
    pub cross_check: bool,
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub name: Option<String>,
    /// Detection and description parameters
    pub orb: OrbConfig,
}

impl Default for LocatorConfig {
    fn default() -> Self {
        Self {
            top_n: 20,
            n_threads: default_threads(),
            cross_check: false,
            name: None,
            orb: OrbConfig::default(),
        }
    }
}

impl LocatorConfig {
    /// Fewer levels and features, higher threshold.
    pub fn fast_preset() -> Self {
        Self {
            name: Some("fast".to_string()),
            orb: OrbConfig {
                n_levels: 4,
                fast_threshold: 30,
                cell_size: 48,
                max_per_cell: 4,
                max_features: 250,
                ..OrbConfig::default()
            },
            ..Self::default()
        }
    }

    /// The default parameters.
    pub fn balanced_preset() -> Self {
        Self {
            name: Some("balanced".to_string()),
            ..Self::default()
        }
    }

    /// Low threshold and a large feature budget for weakly textured objects.
    pub fn dense_preset() -> Self {
        Self {
            top_n: 50,
            name: Some("dense".to_string()),
            orb: OrbConfig {
                fast_threshold: 10,
                cell_size: 24,
                max_per_cell: 16,
                max_features: 2000,
                ..OrbConfig::default()
            },
            ..Self::default()
        }
    }

    /// Look up a preset by name.
    pub fn preset(name: &str) -> Option<Self> {
        match name {
            "fast" => Some(Self::fast_preset()),
            "balanced" => Some(Self::balanced_preset()),
            "dense" => Some(Self::dense_preset()),
            _ => None,
        }
    }

    pub fn with_name(mut self, name: &str) -> Self {
        self.name = Some(name.to_string());
        self
    }

    pub fn to_builder(self) -> LocatorBuilder {
        LocatorBuilder::from_config(self)
    }

    /// Generate human-readable summary
    pub fn summary(&self) -> String {
        format!(
            "LocatorConfig[{}]: levels={}, downscale={:.3}, threshold={}, arc={}/{}, features={}, bits={}, top={}, threads={}",
            self.name.as_deref().unwrap_or("custom"),
            self.orb.n_levels,
            self.orb.downscale,
            self.orb.fast_threshold,
            self.orb.min_arc,
            self.orb.circle_samples(),
            self.orb.max_features,
            self.orb.descriptor_bits,
            self.top_n,
            self.n_threads
        )
    }

    pub fn validate(&self) -> OrbResult<()> {
        if self.n_threads == 0 {
            return Err(ConfigError::NonPositive("n_threads").into());
        }
        self.orb.validate()?;
        Ok(())
    }

    /// Save configuration to JSON file
    #[cfg(feature = "serde")]
    pub fn save_json<P: AsRef<std::path::Path>>(&self, path: P) -> Result<(), Box<dyn std::error::Error>> {
        std::fs::write(path, self.to_json()?)?;
        Ok(())
    }

    /// Load configuration from JSON file
    #[cfg(feature = "serde")]
    pub fn load_json<P: AsRef<std::path::Path>>(path: P) -> Result<Self, Box<dyn std::error::Error>> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    /// Save configuration to TOML file
    #[cfg(feature = "serde")]
    pub fn save_toml<P: AsRef<std::path::Path>>(&self, path: P) -> Result<(), Box<dyn std::error::Error>> {
        std::fs::write(path, self.to_toml()?)?;
        Ok(())
    }

    /// Load configuration from TOML file
    #[cfg(feature = "serde")]
    pub fn load_toml<P: AsRef<std::path::Path>>(path: P) -> Result<Self, Box<dyn std::error::Error>> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Load from a `.json` or `.toml` file, picked by extension.
    #[cfg(feature = "serde")]
    pub fn load<P: AsRef<std::path::Path>>(path: P) -> Result<Self, Box<dyn std::error::Error>> {
        let path = path.as_ref();
        match path.extension().and_then(|e| e.to_str()) {
            Some("json") => Self::load_json(path),
            Some("toml") => Self::load_toml(path),
            _ => Err(format!("unknown config format: {}", path.display()).into()),
        }
    }

    #[cfg(feature = "serde")]
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Deserialize from JSON string and validate
    #[cfg(feature = "serde")]
    pub fn from_json(json: &str) -> Result<Self, Box<dyn std::error::Error>> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    #[cfg(feature = "serde")]
    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }

    /// Deserialize from TOML string and validate
    #[cfg(feature = "serde")]
    pub fn from_toml(toml_str: &str) -> Result<Self, Box<dyn std::error::Error>> {
        let config: Self = toml::from_str(toml_str)?;
        config.validate()?;
        Ok(config)
    }
}
