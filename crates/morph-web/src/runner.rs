use morph_engine::{
    FrameClock, MorphScene, MorphState, ProtocolLayout, Result, SceneUpdate, ScenePreset,
};

/// Drives a [`MorphScene`] from the browser frame loop.
///
/// Holds the externally toggled [`MorphState`], turns raw frame deltas into
/// elapsed/delta pairs, and packs every frame into a flat buffer that the
/// JavaScript renderer reads through `get_frame_buffer_ptr`.
pub struct SceneRunner {
    scene: MorphScene,
    clock: FrameClock,
    state: MorphState,
    layout: ProtocolLayout,
    frame_buffer: Vec<f32>,
}

impl SceneRunner {
    pub fn new(preset: &ScenePreset, seed: u64) -> Result<Self> {
        let scene = MorphScene::from_preset(preset, seed)?;
        let layout = ProtocolLayout::from_scene(&scene);
        let frame_buffer = layout.alloc_buffer();
        Ok(Self {
            scene,
            clock: FrameClock::new(),
            state: MorphState::default(),
            layout,
            frame_buffer,
        })
    }

    /// The renderer created its instanced meshes.
    pub fn mount(&mut self) {
        self.scene.mount();
    }

    /// The renderer tore its meshes down; frames are skipped until remounted.
    pub fn unmount(&mut self) {
        self.scene.unmount();
    }

    /// Run one frame: animate every batch and pack the frame buffer.
    pub fn tick(&mut self, dt: f32) -> SceneUpdate {
        let time = self.clock.advance(dt);
        let update = self.scene.tick(self.state, time.elapsed, time.delta);
        self.layout
            .write_frame(&mut self.scene, self.state, time.frame, &mut self.frame_buffer);
        update
    }

    pub fn state(&self) -> MorphState {
        self.state
    }

    pub fn set_state(&mut self, state: MorphState) {
        if state != self.state {
            log::info!("morph state: {:?} -> {:?}", self.state, state);
        }
        self.state = state;
    }

    pub fn toggle_state(&mut self) -> MorphState {
        self.set_state(self.state.toggled());
        self.state
    }

    pub fn scene(&self) -> &MorphScene {
        &self.scene
    }

    pub fn layout(&self) -> &ProtocolLayout {
        &self.layout
    }

    // ---- Pointer accessors for the renderer ----

    pub fn frame_buffer(&self) -> &[f32] {
        &self.frame_buffer
    }

    pub fn frame_buffer_ptr(&self) -> *const f32 {
        self.frame_buffer.as_ptr()
    }

    pub fn frame_buffer_len(&self) -> u32 {
        self.frame_buffer.len() as u32
    }

    pub fn batch_count(&self) -> u32 {
        self.layout.batches.len() as u32
    }

    pub fn total_instances(&self) -> u32 {
        self.layout.total_instances as u32
    }
}
