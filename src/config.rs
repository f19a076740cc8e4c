use std::path::{Path, PathBuf};

use anyhow::{ensure, Context, Result};
use serde::{Deserialize, Serialize};

/// Everything tunable about a run. Missing fields fall back to the defaults,
/// so a config file only needs to list what it changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub window_width: u32,
    pub window_height: u32,
    pub seed: u64,
    pub agent: AgentConfig,
    pub food: FoodConfig,
    pub arena: ArenaConfig,
    pub view: ViewConfig,
    pub ground_texture: Option<PathBuf>,
    pub record_input: Option<PathBuf>,
    pub replay_input: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentConfig {
    pub radius: f32,
    /// World units per second.
    pub speed: f32,
    /// Radians per frame while a turn is held.
    pub turn_rate: f32,
    pub trail_capacity: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FoodConfig {
    pub radius: f32,
    pub placement_extent: i32,
    pub resample_extent: i32,
    pub clearance: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArenaConfig {
    pub boundary: bool,
    pub extent: f32,
    pub spacing: f32,
    pub per_wall: usize,
    pub obstacle_radius: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewConfig {
    /// World units visible across the shorter window axis.
    pub extent: f32,
    pub follow: f32,
    pub spline_tension: f32,
    pub spline_samples: usize,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            window_width: 1280,
            window_height: 720,
            seed: 1,
            agent: AgentConfig::default(),
            food: FoodConfig::default(),
            arena: ArenaConfig::default(),
            view: ViewConfig::default(),
            ground_texture: None,
            record_input: None,
            replay_input: None,
        }
    }
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            radius: 2.0,
            speed: 25.0,
            turn_rate: 0.1,
            trail_capacity: 100,
        }
    }
}

impl Default for FoodConfig {
    fn default() -> Self {
        Self {
            radius: 1.0,
            placement_extent: 90,
            resample_extent: 95,
            clearance: 2.0,
        }
    }
}

impl Default for ArenaConfig {
    fn default() -> Self {
        Self {
            boundary: true,
            extent: 100.0,
            spacing: 8.0,
            per_wall: 25,
            obstacle_radius: 5.0,
        }
    }
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            extent: 240.0,
            follow: 0.1,
            spline_tension: 0.5,
            spline_samples: 6,
        }
    }
}

impl GameConfig {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("unable to read config {}", path.display()))?;
        let config = Self::from_json(&text)
            .with_context(|| format!("invalid config {}", path.display()))?;

        Ok(config)
    }

    pub fn from_json(text: &str) -> Result<Self> {
        let config: GameConfig = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        ensure!(
            self.window_width > 0 && self.window_height > 0,
            "window size must be non-zero"
        );
        ensure!(self.agent.radius > 0.0, "agent radius must be positive");
        ensure!(self.agent.speed > 0.0, "agent speed must be positive");
        ensure!(self.agent.trail_capacity > 0, "trail capacity must be non-zero");
        ensure!(self.food.radius > 0.0, "food radius must be positive");
        ensure!(
            self.food.placement_extent > 0 && self.food.resample_extent > 0,
            "food extents must be positive"
        );
        // Cells are integers in [-extent, extent), so an agent between the two
        // middle cells is only guaranteed a cell `extent - 0.5` away per axis.
        // Rejection sampling never terminates past that.
        let reach = self.food.placement_extent.min(self.food.resample_extent) as f32 - 0.5;
        ensure!(
            self.food.clearance <= reach,
            "food clearance {} leaves no valid cell, must be at most {}",
            self.food.clearance,
            reach
        );
        ensure!(
            self.arena.obstacle_radius > 0.0,
            "obstacle radius must be positive"
        );
        ensure!(self.view.extent > 0.0, "view extent must be positive");
        ensure!(
            self.view.follow > 0.0 && self.view.follow <= 1.0,
            "view follow factor must be in (0, 1]"
        );

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = GameConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.agent.radius, 2.0);
        assert_eq!(config.agent.speed, 25.0);
        assert_eq!(config.agent.trail_capacity, 100);
        assert_eq!(config.arena.per_wall, 25);
    }

    #[test]
    fn partial_json_overrides() {
        let config = GameConfig::from_json(r#"{ "seed": 7, "agent": { "speed": 40.0 } }"#).unwrap();
        assert_eq!(config.seed, 7);
        assert_eq!(config.agent.speed, 40.0);
        assert_eq!(config.agent.radius, 2.0);
        assert_eq!(config.food, FoodConfig::default());
    }

    #[test]
    fn empty_object_is_default() {
        assert_eq!(GameConfig::from_json("{}").unwrap(), GameConfig::default());
    }

    #[test]
    fn rejects_bad_values() {
        assert!(GameConfig::from_json(r#"{ "agent": { "radius": 0.0 } }"#).is_err());
        assert!(GameConfig::from_json(r#"{ "agent": { "trail_capacity": 0 } }"#).is_err());
        assert!(GameConfig::from_json(r#"{ "food": { "clearance": 200.0 } }"#).is_err());
        assert!(GameConfig::from_json("not json").is_err());
    }

    #[test]
    fn clearance_must_leave_a_reachable_cell() {
        let tight = r#"{ "food": { "placement_extent": 1, "resample_extent": 1, "clearance": 0.9 } }"#;
        assert!(GameConfig::from_json(tight).is_err());

        let edge = r#"{ "food": { "placement_extent": 1, "resample_extent": 1, "clearance": 0.5 } }"#;
        let config = GameConfig::from_json(edge).unwrap();
        assert_eq!(config.food.clearance, 0.5);

        let mut config = GameConfig::default();
        config.food.placement_extent = 3;
        config.food.clearance = 2.6;
        assert!(config.validate().is_err());
        config.food.clearance = 2.5;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn json_round_trip() {
        let mut config = GameConfig::default();
        config.ground_texture = Some(PathBuf::from("textures/lava.png"));
        let text = serde_json::to_string(&config).unwrap();
        assert_eq!(GameConfig::from_json(&text).unwrap(), config);
    }
}
