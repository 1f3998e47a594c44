pub mod runner;

pub use runner::SceneRunner;

use std::cell::RefCell;
use wasm_bindgen::prelude::*;
use morph_engine::{MorphState, ScenePreset};

thread_local! {
    static RUNNER: RefCell<Option<SceneRunner>> = const { RefCell::new(None) };
}

/// Run `f` against the runner. Returns `None` while no scene is initialized,
/// so a scene that failed to build simply never renders.
fn with_runner<R>(f: impl FnOnce(&mut SceneRunner) -> R) -> Option<R> {
    RUNNER.with(|cell| cell.borrow_mut().as_mut().map(f))
}

fn init_logging() {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Info);
}

fn install(preset: &ScenePreset, seed: u64) -> bool {
    init_logging();
    match SceneRunner::new(preset, seed) {
        Ok(runner) => {
            RUNNER.with(|cell| *cell.borrow_mut() = Some(runner));
            log::info!("morph-web: initialized (seed {})", seed);
            true
        }
        Err(err) => {
            RUNNER.with(|cell| *cell.borrow_mut() = None);
            log::error!("morph-web: scene rejected: {}", err);
            false
        }
    }
}

fn entropy_seed() -> u64 {
    let now = js_sys::Date::now() as u64;
    let noise = (js_sys::Math::random() * u32::MAX as f64) as u64;
    (noise << 32) ^ now
}

/// Build the built-in scene with a random seed.
#[wasm_bindgen]
pub fn scene_init() -> bool {
    install(&ScenePreset::default(), entropy_seed())
}

/// Build the built-in scene with a fixed seed (reproducible layouts).
#[wasm_bindgen]
pub fn scene_init_seeded(seed: u32) -> bool {
    install(&ScenePreset::default(), seed as u64)
}

/// Build a scene from a JSON preset. Returns false (and renders nothing)
/// if the preset does not parse or describes an invalid scene.
#[wasm_bindgen]
pub fn scene_init_with_preset(json: &str) -> bool {
    match ScenePreset::from_json(json) {
        Ok(preset) => install(&preset, entropy_seed()),
        Err(err) => {
            init_logging();
            RUNNER.with(|cell| *cell.borrow_mut() = None);
            log::error!("morph-web: {}", err);
            false
        }
    }
}

#[wasm_bindgen]
pub fn scene_mount() {
    with_runner(|r| r.mount());
}

#[wasm_bindgen]
pub fn scene_unmount() {
    with_runner(|r| r.unmount());
}

#[wasm_bindgen]
pub fn scene_tick(dt: f32) {
    with_runner(|r| r.tick(dt));
}

/// 0 = scattered, anything else = tree.
#[wasm_bindgen]
pub fn scene_set_state(state: u32) {
    with_runner(|r| r.set_state(MorphState::from_u32(state)));
}

/// Flip the state; returns the new wire value.
#[wasm_bindgen]
pub fn scene_toggle_state() -> u32 {
    with_runner(|r| r.toggle_state().as_u32()).unwrap_or(0)
}

#[wasm_bindgen]
pub fn get_morph_state() -> u32 {
    with_runner(|r| r.state().as_u32()).unwrap_or(0)
}

// ---- Data accessors ----

#[wasm_bindgen]
pub fn get_frame_buffer_ptr() -> *const f32 {
    with_runner(|r| r.frame_buffer_ptr()).unwrap_or(std::ptr::null())
}

#[wasm_bindgen]
pub fn get_frame_buffer_len() -> u32 {
    with_runner(|r| r.frame_buffer_len()).unwrap_or(0)
}

#[wasm_bindgen]
pub fn get_batch_count() -> u32 {
    with_runner(|r| r.batch_count()).unwrap_or(0)
}

#[wasm_bindgen]
pub fn get_total_instances() -> u32 {
    with_runner(|r| r.total_instances()).unwrap_or(0)
}
