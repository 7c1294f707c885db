//! Numerical parameters and compile-time tunables for the simulation
//!
//! `Parameters` holds the runtime settings a scenario can override:
//! - fixed integration step size,
//! - deterministic seed for the tick-boundary body shuffle
//!
//! Everything else (pass counts, thresholds, gravity) is a compile-time
//! constant below.

/// Fixed integration step in seconds
pub const DT: f64 = 0.005;

/// Maximum collision-resolution passes per tick
pub const MAX_COLLISIONS: usize = 5;

/// Maximum resting-contact passes per tick
pub const MAX_CONTACTS: usize = 10;

/// Maximum shock-propagation passes after the contact loop saturates
pub const MAX_SHOCK_PROP: usize = 1;

/// Random body swaps per tick, to decorrelate iteration order
pub const SHUFFLE_SWAPS: usize = 15;

/// General geometric tolerance
pub const EPSILON: f64 = 1e-6;

/// Normal-velocity threshold below which a pair counts as colliding.
/// Must exceed the per-step gravity kick |g|*DT (~0.049), so bodies that
/// have settled are stabilized by the zero-restitution contact solver
/// instead of re-bouncing off their supports every step.
pub const THRESH_COLLIDE: f64 = 0.1;

/// Normal-velocity threshold below which a resting contact is corrected
pub const THRESH_CONTACT: f64 = 1e-4;

/// Impulse denominators below this are dropped rather than divided through
pub const DENOM_EPS: f64 = 1e-12;

/// Gravitational acceleration along -y
pub const GRAVITY_Y: f64 = -9.81;

#[derive(Debug, Clone)]
pub struct Parameters {
    pub dt: f64,   // step size
    pub seed: u64, // deterministic seed to make runs reproducable
}

impl Default for Parameters {
    fn default() -> Self {
        Self { dt: DT, seed: 42 }
    }
}
