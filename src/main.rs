//! Warp Field entry point
//!
//! Native: runs a headless warp at 60 Hz and logs what happened.
//! Web: the host drives `platform::web::WarpHost`; nothing runs here.

#[cfg(not(target_arch = "wasm32"))]
use warp_field::{
    Result, WarpConfig, WarpError,
    sim::{WarpState, tick},
};

/// Frame delta of the headless run
#[cfg(not(target_arch = "wasm32"))]
const FRAME_DT: f32 = 1.0 / 60.0;
/// Length of the headless run in seconds
#[cfg(not(target_arch = "wasm32"))]
const RUN_SECONDS: f32 = 10.0;

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Warp Field (native) starting...");

    let config = std::env::args()
        .nth(1)
        .map(|path| WarpConfig::load(std::path::Path::new(&path)))
        .unwrap_or_default();

    if let Err(e) = run(config) {
        log::error!("Warp run failed: {}", e);
        std::process::exit(1);
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn run(config: WarpConfig) -> Result<()> {
    let mut state = WarpState::new(config)?;

    // Hosts may start their frame loop before the field exists
    match tick(&mut state, 0.0, FRAME_DT) {
        Err(WarpError::NotInitialized) => log::debug!("Field not initialized yet, frame skipped"),
        other => {
            other?;
        }
    }

    let seed = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or(0x5EED);
    state.initialize(seed)?;

    let mut elapsed = 0.0_f32;
    let mut recycled_total = 0;
    let mut uploads = 0;
    while elapsed < RUN_SECONDS {
        let report = tick(&mut state, elapsed, FRAME_DT)?;
        recycled_total += report.recycled;
        if report.frame % 60 == 0 {
            log::debug!(
                "frame {}: intensity {:.4}, step {:.4}, stretch {:.2}, offset {:.5}",
                report.frame,
                report.warp_intensity,
                report.step,
                report.stretch,
                state.distortion().offset[0]
            );
        }

        // Stand-in for the GPU copy
        if state.snapshot()?.dirty {
            uploads += 1;
            state.mark_uploaded();
        }
        elapsed += FRAME_DT;
    }

    let scratch = state.scratch();
    println!("Warp run complete");
    println!("  particles:  {}", state.config().count);
    println!("  frames:     {} ({} uploads)", state.frame(), uploads);
    println!("  recycled:   {}", recycled_total);
    println!("  intensity:  {:.6}", scratch.intensity);
    println!("  step/frame: {:.5}", scratch.step);
    println!("  stretch:    {:.3}", scratch.stretch);
    if let Some(gate) = state.gate() {
        match gate.settled_at() {
            Some(frame) => println!("  settled at frame {}", frame),
            None => println!("  still warping"),
        }
    }
    Ok(())
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is platform::web::start, this is just to satisfy the compiler
}
