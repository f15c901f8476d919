//! TOML level description consumed by [`crate::Session::new`].

use std::{fs, path::Path, time::Duration};

use anyhow::{Context, Result};
use glam::Vec2;
use lost_drone_core::{Boundary, EnemyTemplate, MoveDirection};
use lost_drone_level::Config as LevelSettings;
use lost_drone_system_currency::Config as CurrencySettings;
use lost_drone_system_waves::{Config as WaveSettings, WaveSpec};
use lost_drone_world::{arrange_nodes, CraftConfig, FieldConfig, LayoutError};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Level document version understood by this build.
pub const SUPPORTED_CONFIG_VERSION: u32 = 1;

/// Reasons a level document is rejected.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The document is not valid TOML or does not match the schema.
    #[error("failed to parse level toml")]
    Parse(#[from] toml::de::Error),
    /// The document could not be rendered as TOML.
    #[error("failed to render level toml")]
    Render(#[from] toml::ser::Error),
    /// The document declares a version other than [`SUPPORTED_CONFIG_VERSION`].
    #[error("unsupported level version {found}; expected 1")]
    UnsupportedVersion {
        /// Version found in the document.
        found: u32,
    },
    /// The level lists no player crafts.
    #[error("level must declare at least one craft")]
    NoCrafts,
    /// A boundary has its minimum edge beyond its maximum edge.
    #[error("{name} boundary is inverted")]
    InvertedBoundary {
        /// Name of the offending boundary.
        name: &'static str,
    },
    /// A craft starts without health.
    #[error("craft {index} must start with positive health (received {health})")]
    InvalidCraftHealth {
        /// Position of the craft in the `[[crafts]]` list.
        index: usize,
        /// Configured health.
        health: f32,
    },
    /// The lateral spawn range has its low end above its high end.
    #[error("spawn range [{low}, {high}] is inverted")]
    InvertedSpawnRange {
        /// Low end of the range.
        low: f32,
        /// High end of the range.
        high: f32,
    },
    /// The lateral spawn range has a non-finite end or width.
    #[error("spawn range [{low}, {high}] must be finite")]
    UnboundedSpawnRange {
        /// Low end of the range.
        low: f32,
        /// High end of the range.
        high: f32,
    },
    /// The path node layout cannot be produced.
    #[error(transparent)]
    Layout(#[from] LayoutError),
}

/// Complete description of a playable level.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LevelConfig {
    /// Document version.
    pub version: u32,
    /// Coordinator settings.
    #[serde(default)]
    pub level: LevelSection,
    /// Currency gainer settings.
    #[serde(default)]
    pub currency: CurrencySection,
    /// Field geometry and projectile settings.
    #[serde(default)]
    pub field: FieldSection,
    /// Wave schedule and enemy template.
    #[serde(default)]
    pub waves: WavesSection,
    /// Path node layout.
    #[serde(default)]
    pub nodes: NodesSection,
    /// Player crafts in roster order.
    #[serde(default = "default_crafts")]
    pub crafts: Vec<CraftSection>,
}

/// `[level]` table.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LevelSection {
    /// Balance the level starts with.
    pub starting_currency: u32,
    /// Earn income during the intro and upgrading phases too.
    pub always_gain_currency: bool,
    /// Length of the intro; no intro is played when absent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub intro_seconds: Option<f32>,
}

/// `[currency]` table.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CurrencySection {
    /// Currency granted per interval.
    pub amount: u32,
    /// Income time between grants in milliseconds.
    pub interval_ms: u64,
}

/// `[field]` table.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldSection {
    /// Region crafts are confined to.
    pub play_area: Boundary,
    /// Region outside of which enemies and shots are discarded.
    pub cull_area: Boundary,
    /// Shot speed in world units per second.
    pub shot_speed: f32,
    /// Shot collision radius.
    pub shot_radius: f32,
    /// Spawn offset of shots relative to the firing craft.
    pub muzzle_offset: Vec2,
}

/// One `[[crafts]]` entry.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CraftSection {
    /// Spawn position.
    pub position: Vec2,
    /// Top speed in world units per second.
    pub speed: f32,
    /// Starting health.
    pub health: f32,
    /// Collision radius.
    pub radius: f32,
    /// Minimum time between shots in milliseconds.
    pub fire_rate_ms: u64,
}

/// `[waves]` table.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WavesSection {
    /// Point enemies spawn around.
    pub anchor: Vec2,
    /// Horizontal offset range applied to the anchor.
    pub spawn_range: [f32; 2],
    /// Seed of the spawn position generator.
    pub seed: u64,
    /// Attributes shared by every enemy.
    pub enemy: EnemyTemplate,
    /// Waves in play order.
    pub wave: Vec<WaveSection>,
}

/// One `[[waves.wave]]` entry.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct WaveSection {
    /// Enemies emitted by the wave.
    pub enemy_count: u32,
    /// Milliseconds between consecutive enemies.
    pub spawn_interval_ms: u64,
    /// Milliseconds to wait before the wave begins.
    #[serde(default)]
    pub start_delay_ms: u64,
}

/// `[nodes]` table.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NodesSection {
    /// Number of path nodes.
    pub count: usize,
    /// Width the nodes are spread across.
    pub level_width: f32,
    /// Height of the node line.
    pub height: f32,
}

impl Default for LevelConfig {
    fn default() -> Self {
        Self {
            version: SUPPORTED_CONFIG_VERSION,
            level: LevelSection::default(),
            currency: CurrencySection::default(),
            field: FieldSection::default(),
            waves: WavesSection::default(),
            nodes: NodesSection::default(),
            crafts: default_crafts(),
        }
    }
}

impl Default for LevelSection {
    fn default() -> Self {
        Self {
            starting_currency: 100,
            always_gain_currency: false,
            intro_seconds: None,
        }
    }
}

impl Default for CurrencySection {
    fn default() -> Self {
        Self {
            amount: 5,
            interval_ms: 1_000,
        }
    }
}

impl Default for FieldSection {
    fn default() -> Self {
        let field = FieldConfig::default();
        Self {
            play_area: field.play_area,
            cull_area: field.cull_area,
            shot_speed: field.shot_speed,
            shot_radius: field.shot_radius,
            muzzle_offset: field.muzzle_offset,
        }
    }
}

impl Default for WavesSection {
    fn default() -> Self {
        Self {
            anchor: Vec2::new(0.0, 9.0),
            spawn_range: [-5.0, 5.0],
            seed: 0x5eed,
            enemy: EnemyTemplate {
                direction: MoveDirection::Down,
                speed: 3.0,
                contact_damage: 10.0,
                radius: 0.4,
            },
            wave: vec![
                WaveSection {
                    enemy_count: 3,
                    spawn_interval_ms: 800,
                    start_delay_ms: 0,
                },
                WaveSection {
                    enemy_count: 5,
                    spawn_interval_ms: 600,
                    start_delay_ms: 2_000,
                },
                WaveSection {
                    enemy_count: 8,
                    spawn_interval_ms: 400,
                    start_delay_ms: 3_000,
                },
            ],
        }
    }
}

impl Default for NodesSection {
    fn default() -> Self {
        Self {
            count: 5,
            level_width: 12.0,
            height: 8.0,
        }
    }
}

fn default_crafts() -> Vec<CraftSection> {
    vec![CraftSection {
        position: Vec2::new(0.0, -3.0),
        speed: 6.0,
        health: 30.0,
        radius: 0.5,
        fire_rate_ms: 150,
    }]
}

impl LevelConfig {
    /// Loads and validates a level document from disk.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)
            .with_context(|| format!("failed to read level config at {}", path.display()))?;
        Self::from_toml_str(&contents)
            .with_context(|| format!("invalid level config at {}", path.display()))
    }

    /// Parses and validates a level document.
    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Renders the document as TOML.
    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string(self)?)
    }

    /// Checks the invariants the session relies on.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.version != SUPPORTED_CONFIG_VERSION {
            return Err(ConfigError::UnsupportedVersion {
                found: self.version,
            });
        }
        if self.crafts.is_empty() {
            return Err(ConfigError::NoCrafts);
        }
        if !self.field.play_area.is_well_formed() {
            return Err(ConfigError::InvertedBoundary { name: "play" });
        }
        if !self.field.cull_area.is_well_formed() {
            return Err(ConfigError::InvertedBoundary { name: "cull" });
        }
        if let Some((index, craft)) = self
            .crafts
            .iter()
            .enumerate()
            .find(|(_, craft)| craft.health.is_nan() || craft.health <= 0.0)
        {
            return Err(ConfigError::InvalidCraftHealth {
                index,
                health: craft.health,
            });
        }
        let [low, high] = self.waves.spawn_range;
        if !low.is_finite() || !high.is_finite() || !(high - low).is_finite() {
            return Err(ConfigError::UnboundedSpawnRange { low, high });
        }
        if low > high {
            return Err(ConfigError::InvertedSpawnRange { low, high });
        }
        let _ = self.path_nodes()?;
        Ok(())
    }

    pub(crate) fn level_settings(&self) -> LevelSettings {
        LevelSettings::new(self.level.starting_currency)
            .with_intro(self.intro_duration().is_some())
            .with_always_gain_currency(self.level.always_gain_currency)
    }

    pub(crate) fn intro_duration(&self) -> Option<Duration> {
        self.level.intro_seconds.map(|seconds| {
            Duration::try_from_secs_f32(seconds.max(0.0)).unwrap_or(Duration::MAX)
        })
    }

    pub(crate) fn currency_settings(&self) -> CurrencySettings {
        CurrencySettings::new(
            self.currency.amount,
            Duration::from_millis(self.currency.interval_ms),
        )
    }

    pub(crate) fn field_config(&self) -> FieldConfig {
        FieldConfig {
            play_area: self.field.play_area,
            cull_area: self.field.cull_area,
            shot_speed: self.field.shot_speed,
            shot_radius: self.field.shot_radius,
            muzzle_offset: self.field.muzzle_offset,
        }
    }

    pub(crate) fn craft_configs(&self) -> Vec<CraftConfig> {
        self.crafts
            .iter()
            .map(|craft| CraftConfig {
                position: craft.position,
                speed: craft.speed,
                health: craft.health,
                radius: craft.radius,
            })
            .collect()
    }

    pub(crate) fn fire_rates(&self) -> impl Iterator<Item = Duration> + '_ {
        self.crafts
            .iter()
            .map(|craft| Duration::from_millis(craft.fire_rate_ms))
    }

    pub(crate) fn wave_settings(&self) -> WaveSettings {
        let waves = self
            .waves
            .wave
            .iter()
            .map(|wave| WaveSpec {
                enemy_count: wave.enemy_count,
                spawn_interval: Duration::from_millis(wave.spawn_interval_ms),
                start_delay: Duration::from_millis(wave.start_delay_ms),
            })
            .collect();
        let [low, high] = self.waves.spawn_range;
        WaveSettings::new(
            waves,
            self.waves.enemy,
            self.waves.anchor,
            (low, high),
            self.waves.seed,
        )
    }

    pub(crate) fn path_nodes(&self) -> Result<Vec<Vec2>, LayoutError> {
        arrange_nodes(self.nodes.count, self.nodes.level_width, self.nodes.height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_level_is_valid() {
        let config = LevelConfig::default();

        config.validate().expect("default level validates");
        assert_eq!(config.craft_configs().len(), 1);
        assert_eq!(config.wave_settings().total_enemies(), 16);
        assert!(config.intro_duration().is_none());
    }

    #[test]
    fn rendered_default_parses_back() {
        let config = LevelConfig::default();
        let rendered = config.to_toml_string().expect("default level renders");

        let parsed = LevelConfig::from_toml_str(&rendered).expect("rendered level parses");

        assert_eq!(parsed, config);
    }

    #[test]
    fn negative_intro_length_plays_no_intro_time() {
        let mut config = LevelConfig::default();
        config.level.intro_seconds = Some(-2.0);

        assert_eq!(config.intro_duration(), Some(Duration::ZERO));
        assert!(config.level_settings().has_intro());
    }
}
