use crate::api::error::{require_positive, Result};
use crate::api::types::{BatchId, MorphState};
use crate::assets::preset::ScenePreset;
use crate::components::color::parse_palette;
use crate::core::rng::Rng;
use crate::renderer::instance::InstanceBatch;
use crate::renderer::traits::InstanceSink;
use crate::systems::morph::{BatchUpdate, MorphGroup};
use crate::systems::spiral::{SpiralLayout, SpiralStrip};

/// Totals for one scene frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SceneUpdate {
    /// Batches that were not allocated and therefore left untouched.
    pub skipped_batches: usize,
    pub transforms_written: usize,
    pub colors_written: usize,
    pub rejected: usize,
}

impl SceneUpdate {
    fn add(&mut self, update: BatchUpdate) {
        if update.skipped {
            self.skipped_batches += 1;
        }
        self.transforms_written += update.transforms_written;
        self.colors_written += update.colors_written;
        self.rejected += update.rejected;
    }
}

/// Every animated batch of the scene plus the batches they write into.
///
/// Batches are ordered groups first, spiral last; [`BatchId`] indexes
/// that order. Each animator is the only writer of its batch.
pub struct MorphScene {
    groups: Vec<(MorphGroup, InstanceBatch)>,
    spiral: Option<(SpiralStrip, InstanceBatch)>,
}

impl MorphScene {
    /// Build every group and the strip from a preset. Any invalid group
    /// fails the whole scene.
    pub fn from_preset(preset: &ScenePreset, seed: u64) -> Result<Self> {
        let shape = preset.shape();
        shape.validate()?;
        require_positive("transition_speed", preset.transition_speed)?;

        let mut rng = Rng::new(seed);
        let mut groups = Vec::with_capacity(preset.groups.len());
        for g in &preset.groups {
            let palette = parse_palette(&g.palette)?;
            let group = MorphGroup::generate(
                g.name.clone(),
                g.archetype,
                g.count,
                &palette,
                &shape,
                (g.scale_range[0], g.scale_range[1]),
                preset.transition_speed,
                &mut rng,
            )?;
            groups.push((group, InstanceBatch::unallocated()));
        }

        let spiral = match &preset.spiral {
            Some(s) => {
                let palette = parse_palette(&s.palette)?;
                let layout = SpiralLayout {
                    loops: s.loops,
                    ..SpiralLayout::around(&shape, s.count)
                };
                let strip = SpiralStrip::generate(&layout, &palette, s.style(), &mut rng)?;
                Some((strip, InstanceBatch::unallocated()))
            }
            None => None,
        };

        let scene = Self { groups, spiral };
        log::info!(
            "scene: {} groups, {} instances, spiral {}",
            scene.groups.len(),
            scene.total_instances(),
            if scene.spiral.is_some() { "on" } else { "off" },
        );
        Ok(scene)
    }

    /// Allocate every batch (the renderer created its meshes).
    /// Group colors are uploaded again on the next frame.
    pub fn mount(&mut self) {
        for (group, batch) in &mut self.groups {
            batch.allocate(group.len());
            group.invalidate_colors();
        }
        if let Some((strip, batch)) = &mut self.spiral {
            batch.allocate(strip.len());
        }
    }

    /// Drop every batch; frames are skipped until the next `mount`.
    pub fn unmount(&mut self) {
        for (_, batch) in &mut self.groups {
            batch.release();
        }
        if let Some((_, batch)) = &mut self.spiral {
            batch.release();
        }
    }

    pub fn is_mounted(&self) -> bool {
        self.batches().all(|b| b.is_allocated())
    }

    /// Advance every batch one frame. Order across batches does not matter:
    /// no batch reads another.
    pub fn tick(&mut self, state: MorphState, elapsed: f32, dt: f32) -> SceneUpdate {
        let mut update = SceneUpdate::default();
        for (group, batch) in &mut self.groups {
            update.add(group.tick(state, elapsed, dt, batch));
        }
        if let Some((strip, batch)) = &mut self.spiral {
            update.add(strip.tick(state, elapsed, dt, batch));
        }
        update
    }

    pub fn groups(&self) -> impl Iterator<Item = &MorphGroup> {
        self.groups.iter().map(|(g, _)| g)
    }

    pub fn group(&self, name: &str) -> Option<&MorphGroup> {
        self.groups().find(|g| g.name() == name)
    }

    pub fn spiral(&self) -> Option<&SpiralStrip> {
        self.spiral.as_ref().map(|(s, _)| s)
    }

    pub fn batch_count(&self) -> usize {
        self.groups.len() + usize::from(self.spiral.is_some())
    }

    /// All batches in [`BatchId`] order.
    pub fn batches(&self) -> impl Iterator<Item = &InstanceBatch> {
        self.groups.iter().map(|(_, b)| b).chain(self.spiral.iter().map(|(_, b)| b))
    }

    pub fn batches_mut(&mut self) -> impl Iterator<Item = &mut InstanceBatch> {
        self.groups.iter_mut().map(|(_, b)| b).chain(self.spiral.iter_mut().map(|(_, b)| b))
    }

    pub fn batch(&self, id: BatchId) -> Option<&InstanceBatch> {
        self.batches().nth(id.0 as usize)
    }

    /// Instance slots each batch needs once mounted, in [`BatchId`] order.
    pub fn batch_sizes(&self) -> impl Iterator<Item = usize> + '_ {
        self.groups.iter().map(|(g, _)| g.len()).chain(self.spiral.iter().map(|(s, _)| s.len()))
    }

    pub fn total_instances(&self) -> usize {
        self.batch_sizes().sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::error::MorphError;
    use crate::assets::preset::GroupPreset;
    use crate::components::archetype::ParticleArchetype;

    fn small_preset() -> ScenePreset {
        let mut preset = ScenePreset::default();
        for g in &mut preset.groups {
            g.count = g.count.min(40);
        }
        if let Some(s) = &mut preset.spiral {
            s.count = 25;
        }
        preset
    }

    #[test]
    fn builds_default_scene() {
        let scene = MorphScene::from_preset(&ScenePreset::default(), 42).unwrap();
        assert_eq!(scene.batch_count(), 5);
        assert_eq!(scene.total_instances(), 2480);
        assert_eq!(scene.group("hearts").unwrap().len(), 1800);
        assert_eq!(scene.spiral().unwrap().len(), 450);
    }

    #[test]
    fn frames_before_mount_are_skipped() {
        let mut scene = MorphScene::from_preset(&small_preset(), 1).unwrap();
        assert!(!scene.is_mounted());
        let update = scene.tick(MorphState::TreeShape, 0.0, 0.016);
        assert_eq!(update.skipped_batches, 5);
        assert_eq!(update.transforms_written, 0);
    }

    #[test]
    fn mounted_frame_writes_everything() {
        let mut scene = MorphScene::from_preset(&small_preset(), 1).unwrap();
        scene.mount();
        assert!(scene.is_mounted());
        let total = scene.total_instances();
        let first = scene.tick(MorphState::Scattered, 0.0, 0.016);
        assert_eq!(first.skipped_batches, 0);
        assert_eq!(first.transforms_written, total);
        // group colors once + spiral colors every frame
        assert_eq!(first.colors_written, total);

        let second = scene.tick(MorphState::Scattered, 0.016, 0.016);
        assert_eq!(second.colors_written, 25);
        for batch in scene.batches() {
            assert!(batch.dirty().transforms);
        }
    }

    #[test]
    fn unmount_then_remount_reuploads_colors() {
        let mut scene = MorphScene::from_preset(&small_preset(), 2).unwrap();
        scene.mount();
        scene.tick(MorphState::Scattered, 0.0, 0.016);
        scene.unmount();
        assert_eq!(scene.tick(MorphState::Scattered, 0.1, 0.016).skipped_batches, 5);
        scene.mount();
        let update = scene.tick(MorphState::Scattered, 0.2, 0.016);
        assert_eq!(update.colors_written, scene.total_instances());
        let first = scene.batch(BatchId(0)).unwrap();
        assert!(first.len() > 0);
    }

    #[test]
    fn same_seed_same_scene() {
        let a = MorphScene::from_preset(&small_preset(), 77).unwrap();
        let b = MorphScene::from_preset(&small_preset(), 77).unwrap();
        for (ga, gb) in a.groups().zip(b.groups()) {
            assert_eq!(ga.particles(), gb.particles());
        }
        assert_eq!(a.spiral().unwrap().lights(), b.spiral().unwrap().lights());
    }

    #[test]
    fn bad_group_fails_scene() {
        let mut preset = small_preset();
        preset.groups.push(GroupPreset::new("empty", ParticleArchetype::Ornament, 10, &[], [1.0, 1.0]));
        assert!(matches!(
            MorphScene::from_preset(&preset, 1),
            Err(MorphError::EmptyPalette { ref group }) if group == "empty"
        ));

        let mut preset = small_preset();
        preset.groups[0].count = 0;
        assert!(matches!(MorphScene::from_preset(&preset, 1), Err(MorphError::EmptyGroup { .. })));

        let mut preset = small_preset();
        preset.groups[1].palette = vec!["pink".into()];
        assert!(matches!(MorphScene::from_preset(&preset, 1), Err(MorphError::InvalidColor(_))));

        let mut preset = small_preset();
        preset.scatter_radius = -1.0;
        assert!(MorphScene::from_preset(&preset, 1).is_err());
    }

    #[test]
    fn scene_without_spiral() {
        let mut preset = small_preset();
        preset.spiral = None;
        let mut scene = MorphScene::from_preset(&preset, 3).unwrap();
        scene.mount();
        assert_eq!(scene.batch_count(), 4);
        assert!(scene.spiral().is_none());
        scene.tick(MorphState::TreeShape, 0.0, 0.016);
    }
}
