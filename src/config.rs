use crate::gfx::{anim::Easing, math::Vec3};
use anyhow::Result;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub sequence: SequenceConfig,

    #[serde(default)]
    pub price_tag: PriceTagConfig,

    #[serde(default)]
    pub tax_text: TaxTextConfig,

    #[serde(default = "default_star_spawner")]
    pub stars: SpawnerConfig,

    #[serde(default)]
    pub star: StarConfig,

    #[serde(default)]
    pub leaves: LeafConfig,

    #[serde(default)]
    pub road: RoadConfig,

    #[serde(default)]
    pub camera: CameraConfig,

    #[serde(default)]
    pub host: HostConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SequenceConfig {
    pub auto_play: bool,
    pub start_delay: f32,
    pub leaf_effect_duration: f32,
    pub leaf_fade_out_duration: f32,
    /// Start the star spawner when the road phase begins.
    pub stars_enabled: bool,
    /// Forward each star's natural disappearance to `SegmentChain::grow`.
    pub stars_extend_road: bool,
}

impl Default for SequenceConfig {
    fn default() -> Self {
        Self {
            auto_play: true,
            start_delay: 0.5,
            leaf_effect_duration: 5.0,
            leaf_fade_out_duration: 2.0,
            stars_enabled: true,
            stars_extend_road: true,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PriceTagConfig {
    pub price: String,
    pub initial_position: Vec3,
    pub fade_in_duration: f32,
    pub display_duration: f32,
    pub move_up_distance: f32,
    pub fade_out_duration: f32,
    pub movement_easing: Easing,
    pub fade_easing: Easing,
}

impl Default for PriceTagConfig {
    fn default() -> Self {
        Self {
            price: "¥99.00".to_string(),
            initial_position: Vec3::new(0.0, -200.0, 0.0),
            fade_in_duration: 0.5,
            display_duration: 2.0,
            move_up_distance: 300.0,
            fade_out_duration: 1.5,
            movement_easing: Easing::SmoothStep,
            fade_easing: Easing::Linear,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TaxTextConfig {
    pub display_delay: f32,
    pub fade_in_duration: f32,
    pub display_duration: f32,
    pub fade_out_duration: f32,
    /// Road metres represented by one unit of currency.
    pub meters_per_unit: f32,
    /// `{amount}` and `{meters}` are substituted, both rounded to integers.
    pub template: String,
}

impl Default for TaxTextConfig {
    fn default() -> Self {
        Self {
            display_delay: 0.5,
            fade_in_duration: 1.0,
            display_duration: 3.0,
            fade_out_duration: 1.0,
            meters_per_unit: 2.0,
            template: "{amount} tax\n= {meters} m of road upkeep".to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpawnRegion {
    pub center: Vec3,
    /// Half-size on each axis; positions are sampled in `center ± extents`.
    pub extents: Vec3,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SpawnerConfig {
    /// Total entities per run, 0 for unbounded.
    pub total: u32,
    pub interval: f32,
    pub first_delay: f32,
    pub randomize_interval: bool,
    pub min_interval: f32,
    pub max_interval: f32,
    pub max_live: usize,
    pub region: SpawnRegion,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
}

impl Default for SpawnerConfig {
    fn default() -> Self {
        default_star_spawner()
    }
}

fn default_star_spawner() -> SpawnerConfig {
    SpawnerConfig {
        total: 10,
        interval: 3.0,
        first_delay: 0.5,
        randomize_interval: false,
        min_interval: 2.0,
        max_interval: 4.0,
        max_live: 32,
        region: SpawnRegion {
            center: Vec3::new(0.0, 0.0, 5.0),
            extents: Vec3::new(3.0, 0.0, 2.0),
        },
        seed: None,
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StarConfig {
    pub drop_height: f32,
    pub ground_level: f32,
    pub fall_duration: f32,
    pub fall_easing: Easing,
    /// Degrees per second about the forward axis while falling.
    pub spin_speed: f32,
    pub land_scale_bounce: f32,
    pub land_scale_duration: f32,
    pub rest_duration: f32,
    pub fade_out_duration: f32,
    pub fade_easing: Easing,
}

impl Default for StarConfig {
    fn default() -> Self {
        Self {
            drop_height: 10.0,
            ground_level: 0.0,
            fall_duration: 1.5,
            fall_easing: Easing::SmoothStep,
            spin_speed: 360.0,
            land_scale_bounce: 1.2,
            land_scale_duration: 0.3,
            rest_duration: 0.5,
            fade_out_duration: 1.0,
            fade_easing: Easing::Linear,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LeafConfig {
    pub max_leaves: usize,
    /// Leaves per second.
    pub spawn_rate: f32,
    pub fall_speed: f32,
    pub rotation_speed: f32,
    pub sway_amount: f32,
    pub sway_frequency: f32,
    pub despawn_height: f32,
    pub spawn_width: f32,
    pub spawn_depth: f32,
    pub spawn_height: f32,
    pub forward_distance: f32,
    pub size_range: [f32; 2],
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
}

impl Default for LeafConfig {
    fn default() -> Self {
        Self {
            max_leaves: 150,
            spawn_rate: 15.0,
            fall_speed: 2.0,
            rotation_speed: 90.0,
            sway_amount: 0.5,
            sway_frequency: 1.0,
            despawn_height: -2.0,
            spawn_width: 20.0,
            spawn_depth: 15.0,
            spawn_height: 10.0,
            forward_distance: 5.0,
            size_range: [0.1, 0.3],
            seed: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RoadConfig {
    pub origin: Vec3,
    pub axis: Vec3,
    pub initial_segments: usize,
    pub segment_length: f32,
    pub road_width: f32,
    pub extension_enabled: bool,
    pub extend_duration: f32,
    pub extend_easing: Easing,
    pub max_segments: usize,
    /// Animate growth; while an animation is in flight further growth is rejected.
    pub smooth_transition: bool,
    /// Entrance time of each initial segment.
    pub onboarding_duration: f32,
}

impl Default for RoadConfig {
    fn default() -> Self {
        Self {
            origin: Vec3::ZERO,
            axis: Vec3::FORWARD,
            initial_segments: 1,
            segment_length: 20.0,
            road_width: 10.0,
            extension_enabled: false,
            extend_duration: 0.5,
            extend_easing: Easing::SmoothStep,
            max_segments: 10,
            smooth_transition: true,
            onboarding_duration: 3.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CameraMode {
    #[default]
    Fixed,
    FollowRoad,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    pub mode: CameraMode,
    pub position: Vec3,
    pub rotation: Vec3,
    pub road_offset: Vec3,
    pub follow_smoothness: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            mode: CameraMode::Fixed,
            position: Vec3::new(0.0, 8.0, -12.0),
            rotation: Vec3::new(-1.0, 3.0, 0.0),
            road_offset: Vec3::new(0.0, 8.0, -5.0),
            follow_smoothness: 5.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HostConfig {
    pub fps_cap: u32,
    pub time_scale: f32,
}

impl Default for HostConfig {
    fn default() -> Self {
        Self {
            fps_cap: 60,
            time_scale: 1.0,
        }
    }
}

impl Config {
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        Ok(toml::from_str(contents)?)
    }

    pub fn load() -> Result<Self> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find config directory"))?;
        let config_path = config_dir.join("roadshow").join("config.toml");

        if config_path.exists() {
            let contents = std::fs::read_to_string(&config_path)?;
            Self::from_toml_str(&contents)
        } else {
            Ok(Config::default())
        }
    }

    pub fn save(&self) -> Result<()> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find config directory"))?;
        let config_dir = config_dir.join("roadshow");
        std::fs::create_dir_all(&config_dir)?;

        let config_path = config_dir.join("config.toml");
        let contents = toml::to_string_pretty(self)?;
        std::fs::write(&config_path, contents)?;

        Ok(())
    }
}
