//! Per-frame update
//!
//! Host supplies `(elapsed, delta)`; the gate is sampled first so a frame
//! that settles already renders unstretched, then the particle pass runs and
//! the distortion uniform is refreshed.

use super::animator::{animate, prepare};
use super::effect::bridge;
use super::gate::GateEvent;
use super::state::WarpState;
use crate::error::{Result, WarpError};

/// What happened during one `tick`
#[derive(Debug, Clone, PartialEq)]
pub struct FrameReport {
    /// 1-based frame number since `initialize`
    pub frame: u64,
    pub warp_intensity: f32,
    pub step: f32,
    pub stretch: f32,
    /// Particles wrapped to the opposite plane this frame
    pub recycled: usize,
    /// Gate edges that fired this frame (also queued on the state)
    pub events: Vec<GateEvent>,
}

/// Advance the field by one displayed frame.
///
/// Fails without touching any buffer if the inputs are negative/non-finite
/// or the field has not been initialized.
pub fn tick(state: &mut WarpState, elapsed: f32, delta: f32) -> Result<FrameReport> {
    if !elapsed.is_finite() || !delta.is_finite() || elapsed < 0.0 || delta < 0.0 {
        return Err(WarpError::InvalidFrameTime { elapsed, delta });
    }
    let Some(field) = state.field.as_mut() else {
        return Err(WarpError::NotInitialized);
    };

    state.frame += 1;
    let frame = state.frame;

    let mut events = Vec::new();
    if let Some(gate) = state.gate.as_mut() {
        gate.update(elapsed, frame, &mut events);
    }
    let stretch_enabled = state.gate.as_ref().is_none_or(|g| g.stretch_enabled());

    prepare(
        &mut state.scratch,
        &state.config,
        field.seed(),
        elapsed,
        delta,
        frame,
        stretch_enabled,
    );
    let recycled = animate(field, &state.scratch);

    state.distortion = bridge(
        state.config.distortion,
        state.scratch.intensity,
        state.config.base_offset,
        state.gate.as_ref().map(|g| g.phase()),
    );
    state.elapsed = elapsed;

    for event in &events {
        log::info!(
            "Warp gate: {} at frame {} (t = {:.2}s)",
            event.as_str(),
            frame,
            elapsed
        );
    }
    state.events.extend_from_slice(&events);

    Ok(FrameReport {
        frame,
        warp_intensity: state.scratch.intensity,
        step: state.scratch.step,
        stretch: state.scratch.stretch,
        recycled,
        events,
    })
}
