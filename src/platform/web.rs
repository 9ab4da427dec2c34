//! Browser host
//!
//! JS render loop calls `tick(elapsed, delta)` once per frame, then copies
//! `transforms()`/`colors()` into its instanced mesh when `is_dirty()`.

use js_sys::{Array, Float32Array};
use wasm_bindgen::prelude::*;

use crate::error::WarpError;
use crate::settings::WarpConfig;
use crate::sim::{GateEvent, WarpPhase, WarpState, tick};

#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
    // Fails only if a logger is already installed (module reloaded)
    if console_log::init_with_level(log::Level::Info).is_err() {
        log::warn!("Console logger already initialized");
    }
}

fn to_js(e: WarpError) -> JsValue {
    JsValue::from_str(&e.to_string())
}

/// Warp engine handle owned by the JS host
#[wasm_bindgen]
pub struct WarpHost {
    state: WarpState,
}

#[wasm_bindgen]
impl WarpHost {
    /// Build from an optional JSON config (defaults otherwise)
    #[wasm_bindgen(constructor)]
    pub fn new(config_json: Option<String>) -> Result<WarpHost, JsValue> {
        let config = match config_json {
            Some(json) => WarpConfig::from_json(&json).map_err(to_js)?,
            None => WarpConfig::default(),
        };
        let state = WarpState::new(config).map_err(to_js)?;
        Ok(Self { state })
    }

    pub fn initialize(&mut self, seed: u64) -> Result<(), JsValue> {
        self.state.initialize(seed).map_err(to_js)
    }

    /// Returns false when the frame was skipped (field not initialized yet)
    pub fn tick(&mut self, elapsed: f32, delta: f32) -> Result<bool, JsValue> {
        match tick(&mut self.state, elapsed, delta) {
            Ok(_) => Ok(true),
            Err(WarpError::NotInitialized) => {
                log::debug!("Warp field not initialized, skipping frame");
                Ok(false)
            }
            Err(e) => Err(to_js(e)),
        }
    }

    pub fn count(&self) -> usize {
        self.state.config().count
    }

    /// 16 floats per particle, column-major
    pub fn transforms(&self) -> Float32Array {
        match self.state.snapshot() {
            Ok(snap) => Float32Array::from(bytemuck::cast_slice::<_, f32>(snap.transforms)),
            Err(_) => Float32Array::new_with_length(0),
        }
    }

    /// 3 floats per particle
    pub fn colors(&self) -> Float32Array {
        match self.state.snapshot() {
            Ok(snap) => Float32Array::from(bytemuck::cast_slice::<_, f32>(snap.colors)),
            Err(_) => Float32Array::new_with_length(0),
        }
    }

    /// Distortion offset (x and y are equal)
    pub fn offset(&self) -> f32 {
        self.state.distortion().offset[0]
    }

    pub fn is_dirty(&self) -> bool {
        self.state.snapshot().is_ok_and(|snap| snap.dirty)
    }

    pub fn mark_uploaded(&mut self) {
        self.state.mark_uploaded();
    }

    pub fn bloom_enabled(&self) -> bool {
        self.state.bloom_enabled()
    }

    pub fn is_settled(&self) -> bool {
        self.state.phase() == Some(WarpPhase::Settled)
    }

    /// Pending gate events as strings ("bloom", "settled")
    pub fn take_events(&mut self) -> Array {
        self.state
            .drain_events()
            .iter()
            .map(|e: &GateEvent| JsValue::from_str(e.as_str()))
            .collect()
    }
}
