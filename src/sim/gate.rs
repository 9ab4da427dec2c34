//! Warp phase gate
//!
//! Two-state machine (`Warping` -> `Settled`) driven by a velocity signal.
//! Thresholds fire on downward crossings only, and each event is emitted
//! once per run so hosts can react to edges instead of polling a flag.

use serde::{Deserialize, Serialize};

use super::decay::decay;
use crate::error::{Result, WarpError};
use crate::settings::GateConfig;

/// Velocity signal as a function of elapsed time
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum VelocityCurve {
    /// `scale * 0.5^t`
    Decay { scale: f32 },
    /// `amplitude * exp(-((t - peak) / width)^2)`
    Bell { peak: f32, amplitude: f32, width: f32 },
}

impl VelocityCurve {
    pub fn sample(&self, elapsed: f32) -> f32 {
        match *self {
            VelocityCurve::Decay { scale } => scale * decay(elapsed),
            VelocityCurve::Bell {
                peak,
                amplitude,
                width,
            } => {
                let x = (elapsed - peak) / width;
                amplitude * (-x * x).exp()
            }
        }
    }

    pub fn validate(&self) -> Result<()> {
        match *self {
            VelocityCurve::Decay { scale } if !scale.is_finite() || scale <= 0.0 => Err(
                WarpError::InvalidConfiguration(format!("decay scale must be positive, got {}", scale)),
            ),
            VelocityCurve::Bell { width, .. } if !width.is_finite() || width <= 0.0 => Err(
                WarpError::InvalidConfiguration(format!("bell width must be positive, got {}", width)),
            ),
            VelocityCurve::Bell {
                peak, amplitude, ..
            } if !peak.is_finite() || !amplitude.is_finite() => Err(
                WarpError::InvalidConfiguration("bell peak and amplitude must be finite".into()),
            ),
            _ => Ok(()),
        }
    }

    /// True if the curve never rises for t >= 0
    pub fn is_falling(&self) -> bool {
        match *self {
            VelocityCurve::Decay { .. } => true,
            VelocityCurve::Bell { peak, .. } => peak <= 0.0,
        }
    }
}

/// Gate state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WarpPhase {
    /// Stretch applied, bloom possibly off
    Warping,
    /// Stretch cut, bloom on; terminal
    Settled,
}

/// Edge events for the host
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GateEvent {
    /// Turn bloom on
    BloomEnabled,
    /// Warp is over
    Settled,
}

impl GateEvent {
    pub fn as_str(&self) -> &'static str {
        match self {
            GateEvent::BloomEnabled => "bloom",
            GateEvent::Settled => "settled",
        }
    }
}

/// Threshold state machine
#[derive(Debug, Clone)]
pub struct WarpPhaseGate {
    velocity_floor: f32,
    velocity_ceiling: f32,
    curve: VelocityCurve,
    phase: WarpPhase,
    bloom: bool,
    /// Most recent sample; the curve at t=0 before the first update
    last_velocity: f32,
    /// Level the next sample is compared against for a downward crossing
    previous: f32,
    settled_at: Option<u64>,
}

impl WarpPhaseGate {
    pub fn new(config: &GateConfig) -> Self {
        Self {
            velocity_floor: config.velocity_floor,
            velocity_ceiling: config.velocity_ceiling,
            curve: config.curve,
            phase: WarpPhase::Warping,
            bloom: false,
            last_velocity: config.curve.sample(0.0),
            // A falling curve is already past its rise, so a first sample at or
            // below a threshold counts as a crossing
            previous: if config.curve.is_falling() {
                f32::INFINITY
            } else {
                config.curve.sample(0.0)
            },
            settled_at: None,
        }
    }

    pub fn phase(&self) -> WarpPhase {
        self.phase
    }

    pub fn bloom_enabled(&self) -> bool {
        self.bloom
    }

    /// Stretch only applies while warping
    pub fn stretch_enabled(&self) -> bool {
        self.phase == WarpPhase::Warping
    }

    /// Frame on which the gate settled
    pub fn settled_at(&self) -> Option<u64> {
        self.settled_at
    }

    /// Most recent velocity sample
    pub fn velocity(&self) -> f32 {
        self.last_velocity
    }

    /// Sample the curve at `elapsed` and run the threshold checks
    pub fn update(&mut self, elapsed: f32, frame: u64, events: &mut Vec<GateEvent>) -> f32 {
        let velocity = self.curve.sample(elapsed);
        self.observe(velocity, frame, events);
        velocity
    }

    /// Feed one velocity sample. Pushes at most one `BloomEnabled` and one
    /// `Settled` over the gate's lifetime, in that order.
    pub fn observe(&mut self, velocity: f32, frame: u64, events: &mut Vec<GateEvent>) {
        let previous = self.previous;
        self.previous = velocity;
        self.last_velocity = velocity;

        if self.phase == WarpPhase::Settled {
            return;
        }

        let crossed = |threshold: f32| previous > threshold && velocity <= threshold;

        if !self.bloom && crossed(self.velocity_ceiling) {
            self.bloom = true;
            events.push(GateEvent::BloomEnabled);
        }

        if crossed(self.velocity_floor) {
            if !self.bloom {
                self.bloom = true;
                events.push(GateEvent::BloomEnabled);
            }
            self.phase = WarpPhase::Settled;
            self.settled_at = Some(frame);
            events.push(GateEvent::Settled);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decay_gate() -> WarpPhaseGate {
        WarpPhaseGate::new(&GateConfig {
            velocity_floor: 1.0,
            velocity_ceiling: 4.0,
            curve: VelocityCurve::Decay { scale: 10.0 },
        })
    }

    #[test]
    fn test_starts_warping() {
        let gate = decay_gate();
        assert_eq!(gate.phase(), WarpPhase::Warping);
        assert!(!gate.bloom_enabled());
        assert!(gate.stretch_enabled());
        assert_eq!(gate.velocity(), 10.0);
    }

    #[test]
    fn test_early_bloom_then_settle() {
        let mut gate = decay_gate();
        let mut events = Vec::new();

        // 10 * 0.5^1 = 5: above both thresholds
        gate.update(1.0, 1, &mut events);
        assert!(events.is_empty());

        // 10 * 0.5^2 = 2.5: crossed the ceiling only
        gate.update(2.0, 2, &mut events);
        assert_eq!(events, vec![GateEvent::BloomEnabled]);
        assert!(gate.bloom_enabled());
        assert_eq!(gate.phase(), WarpPhase::Warping);

        // 10 * 0.5^4 = 0.625: crossed the floor
        gate.update(4.0, 3, &mut events);
        assert_eq!(events, vec![GateEvent::BloomEnabled, GateEvent::Settled]);
        assert_eq!(gate.phase(), WarpPhase::Settled);
        assert!(!gate.stretch_enabled());
        assert_eq!(gate.settled_at(), Some(3));
    }

    #[test]
    fn test_both_thresholds_in_one_frame() {
        let mut gate = decay_gate();
        let mut events = Vec::new();
        gate.update(10.0, 1, &mut events);
        assert_eq!(events, vec![GateEvent::BloomEnabled, GateEvent::Settled]);
    }

    #[test]
    fn test_settled_is_terminal() {
        let mut gate = decay_gate();
        let mut events = Vec::new();
        gate.update(10.0, 1, &mut events);
        events.clear();

        // Signal climbs back above both thresholds and falls again
        gate.observe(20.0, 2, &mut events);
        gate.observe(0.1, 3, &mut events);
        assert!(events.is_empty());
        assert_eq!(gate.phase(), WarpPhase::Settled);
        assert_eq!(gate.settled_at(), Some(1));
    }

    #[test]
    fn test_bell_leading_edge_does_not_settle() {
        let mut gate = WarpPhaseGate::new(&GateConfig {
            velocity_floor: 1.0,
            velocity_ceiling: 4.0,
            curve: VelocityCurve::Bell {
                peak: 3.0,
                amplitude: 10.0,
                width: 1.0,
            },
        });
        let mut events = Vec::new();

        // Rising from ~0 through both thresholds
        for (frame, t) in [0.5_f32, 1.0, 2.0, 3.0].iter().enumerate() {
            gate.update(*t, frame as u64, &mut events);
        }
        assert!(events.is_empty());
        assert_eq!(gate.phase(), WarpPhase::Warping);

        // Falling edge: 10*e^-1 ≈ 3.68 (< ceiling), then 10*e^-4 ≈ 0.18 (< floor)
        gate.update(4.0, 4, &mut events);
        assert_eq!(events, vec![GateEvent::BloomEnabled]);
        gate.update(5.0, 5, &mut events);
        assert_eq!(events, vec![GateEvent::BloomEnabled, GateEvent::Settled]);
    }

    #[test]
    fn test_decay_below_floor_from_start_settles_on_first_frame() {
        let mut gate = WarpPhaseGate::new(&GateConfig {
            velocity_floor: 1.0,
            velocity_ceiling: 4.0,
            curve: VelocityCurve::Decay { scale: 0.8 },
        });
        let mut events = Vec::new();

        gate.update(0.0, 1, &mut events);
        assert_eq!(events, vec![GateEvent::BloomEnabled, GateEvent::Settled]);
        assert_eq!(gate.phase(), WarpPhase::Settled);
        assert!(gate.bloom_enabled());
        assert!(!gate.stretch_enabled());
        assert_eq!(gate.settled_at(), Some(1));

        gate.update(1.0, 2, &mut events);
        assert_eq!(events.len(), 2);
    }

    #[test]
    fn test_decay_between_thresholds_from_start_blooms_on_first_frame() {
        let mut gate = WarpPhaseGate::new(&GateConfig {
            velocity_floor: 1.0,
            velocity_ceiling: 4.0,
            curve: VelocityCurve::Decay { scale: 3.0 },
        });
        let mut events = Vec::new();

        gate.update(0.0, 1, &mut events);
        assert_eq!(events, vec![GateEvent::BloomEnabled]);
        assert_eq!(gate.phase(), WarpPhase::Warping);
        assert_eq!(gate.velocity(), 3.0);

        // 3 * 0.5^2 = 0.75
        gate.update(2.0, 2, &mut events);
        assert_eq!(events, vec![GateEvent::BloomEnabled, GateEvent::Settled]);
    }

    #[test]
    fn test_bell_past_peak_counts_as_falling() {
        let mut gate = WarpPhaseGate::new(&GateConfig {
            velocity_floor: 1.0,
            velocity_ceiling: 4.0,
            curve: VelocityCurve::Bell {
                peak: -5.0,
                amplitude: 10.0,
                width: 1.0,
            },
        });
        let mut events = Vec::new();
        gate.update(0.0, 1, &mut events);
        assert_eq!(events, vec![GateEvent::BloomEnabled, GateEvent::Settled]);
    }

    #[test]
    fn test_curve_validation() {
        assert!(VelocityCurve::Decay { scale: 10.0 }.validate().is_ok());
        assert!(VelocityCurve::Decay { scale: 0.0 }.validate().is_err());
        assert!(
            VelocityCurve::Bell {
                peak: 1.0,
                amplitude: 1.0,
                width: 0.0
            }
            .validate()
            .is_err()
        );
    }

    #[test]
    fn test_event_names() {
        assert_eq!(GateEvent::BloomEnabled.as_str(), "bloom");
        assert_eq!(GateEvent::Settled.as_str(), "settled");
    }
}
