pub mod api;
pub mod core;
pub mod components;
pub mod systems;
pub mod renderer;
pub mod bridge;
pub mod assets;

// Re-export key types at crate root for convenience
pub use api::error::{MorphError, Result};
pub use api::scene::{MorphScene, SceneUpdate};
pub use api::types::{BatchId, MorphState};
pub use assets::preset::{GroupPreset, ScenePreset, SpiralPreset};
pub use bridge::protocol::{BatchEntry, ProtocolLayout};
pub use components::archetype::{ArchetypePolicy, ParticleArchetype, TreeBehavior, TreeOrientation};
pub use components::color::Color;
pub use components::particle::{Particle, ParticlePose};
pub use crate::core::rng::Rng;
pub use crate::core::time::{FrameClock, FrameTime};
pub use renderer::instance::{DirtyFlags, InstanceBatch};
pub use renderer::traits::InstanceSink;
pub use systems::layout::{generate_layout, LayoutShape};
pub use systems::morph::{BatchUpdate, Hover, MorphGroup};
pub use systems::spiral::{SpiralLayout, SpiralLight, SpiralStrip, SpiralStyle};
