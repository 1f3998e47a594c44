use serde::{Deserialize, Serialize};
use crate::api::error::Result;
use crate::components::archetype::ParticleArchetype;
use crate::components::color::named::{BARBIE_PINK, CYBER_BLUE, PINE_GREEN, SILVER};
use crate::systems::layout::LayoutShape;
use crate::systems::morph::TRANSITION_SPEED;
use crate::systems::spiral::{SpiralStyle, SPIRAL_COUNT, SPIRAL_LOOPS};

/// Scene description: shape constants, particle groups and the light strip.
/// Loaded from JSON; every field falls back to the built-in scene.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScenePreset {
    pub tree_height: f32,
    pub tree_radius: f32,
    pub scatter_radius: f32,
    /// Approach rate toward the target pose (lower is slower).
    pub transition_speed: f32,
    pub groups: Vec<GroupPreset>,
    /// `null` disables the light strip.
    pub spiral: Option<SpiralPreset>,
}

/// One batch of morphing particles.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupPreset {
    pub name: String,
    pub archetype: ParticleArchetype,
    pub count: usize,
    /// `#RRGGBB` entries; repeat an entry to weight it.
    pub palette: Vec<String>,
    #[serde(default = "default_scale_range")]
    pub scale_range: [f32; 2],
}

/// The spiral light strip.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpiralPreset {
    pub count: usize,
    pub loops: f32,
    pub lit_size: f32,
    pub jitter: f32,
    pub fade_rate: f32,
    pub max_boost: f32,
    pub blink_speed: [f32; 2],
    pub palette: Vec<String>,
}

fn default_scale_range() -> [f32; 2] {
    [1.0, 1.0]
}

impl GroupPreset {
    pub fn new(name: &str, archetype: ParticleArchetype, count: usize, palette: &[&str], scale_range: [f32; 2]) -> Self {
        Self {
            name: name.to_string(),
            archetype,
            count,
            palette: palette.iter().map(|s| s.to_string()).collect(),
            scale_range,
        }
    }
}

impl Default for SpiralPreset {
    fn default() -> Self {
        let style = SpiralStyle::default();
        Self {
            count: SPIRAL_COUNT,
            loops: SPIRAL_LOOPS,
            lit_size: style.lit_size,
            jitter: style.jitter,
            fade_rate: style.fade_rate,
            max_boost: style.max_boost,
            blink_speed: [style.blink_speed.0, style.blink_speed.1],
            palette: vec![CYBER_BLUE.to_string(), BARBIE_PINK.to_string()],
        }
    }
}

impl SpiralPreset {
    pub fn style(&self) -> SpiralStyle {
        SpiralStyle {
            lit_size: self.lit_size,
            jitter: self.jitter,
            fade_rate: self.fade_rate,
            max_boost: self.max_boost,
            blink_speed: (self.blink_speed[0], self.blink_speed[1]),
        }
    }
}

impl Default for ScenePreset {
    fn default() -> Self {
        let shape = LayoutShape::default();
        Self {
            tree_height: shape.tree_height,
            tree_radius: shape.tree_radius,
            scatter_radius: shape.scatter_radius,
            transition_speed: TRANSITION_SPEED,
            groups: vec![
                // Hearts: green pine with a hint of teal.
                GroupPreset::new(
                    "hearts",
                    ParticleArchetype::Needle,
                    1800,
                    &[PINE_GREEN, PINE_GREEN, "#024A44", "#00CFC1"],
                    [0.8, 1.3],
                ),
                GroupPreset::new("ornaments", ParticleArchetype::Ornament, 150, &[BARBIE_PINK, "#FF69B4", SILVER], [1.0, 1.5]),
                GroupPreset::new("stars", ParticleArchetype::Special, 50, &[CYBER_BLUE, SILVER, "#FFFFFF"], [1.2, 2.0]),
                GroupPreset::new("rings", ParticleArchetype::Special, 30, &[CYBER_BLUE], [1.5, 2.5]),
            ],
            spiral: Some(SpiralPreset::default()),
        }
    }
}

impl ScenePreset {
    /// Parse a preset from a JSON string.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn shape(&self) -> LayoutShape {
        LayoutShape {
            tree_height: self.tree_height,
            tree_radius: self.tree_radius,
            scatter_radius: self.scatter_radius,
        }
    }

    /// Instance slots needed across all batches.
    pub fn total_instances(&self) -> usize {
        let groups: usize = self.groups.iter().map(|g| g.count).sum();
        groups + self.spiral.as_ref().map_or(0, |s| s.count)
    }
}
