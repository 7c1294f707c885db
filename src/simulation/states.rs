//! Core state types for the rigid-body simulation.
//!
//! Defines the body/system structs:
//! - `Body` with pose, momenta, derived quantities, material, and the
//!   contact-graph scratch fields
//! - `System` owning the ordered body vector, the clock, and the per-tick
//!   scratch (state snapshots, Tarjan ordering, seeded shuffle RNG)
//!
//! All primary state is expressed with nalgebra types behind the `NVec3`/
//! `NMat3`/`NQuat` aliases.

use nalgebra::{Matrix3, UnitQuaternion, Vector3};
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::simulation::params::GRAVITY_Y;
use crate::simulation::shape::BoxShape;

pub type NVec3 = Vector3<f64>;
pub type NMat3 = Matrix3<f64>;
pub type NQuat = UnitQuaternion<f64>;

/// One edge of the contact graph: the owning body rests on `other`.
/// `other` is an index into the system's body vector; lists are rebuilt
/// after the tick-boundary permutation, so indices never go stale.
#[derive(Debug, Clone)]
pub struct ContactInfo {
    pub other: usize,  // body this one rests upon
    pub point: NVec3,  // contact location, world space
    pub normal: NVec3, // unit, pointing from `other` toward the owner
}

/// Position-level state of one body, snapshotted and restored around the
/// tentative integrations of a tick.
#[derive(Debug, Clone, Copy)]
pub struct PosState {
    pub position: NVec3,
    pub orientation: NQuat,
}

/// Velocity-level state of one body. Momenta, not velocities, are primary.
#[derive(Debug, Clone, Copy)]
pub struct VelState {
    pub linear_momentum: NVec3,
    pub angular_momentum: NVec3,
}

#[derive(Debug, Clone)]
pub struct Body {
    /// Stable identity across the tick-boundary shuffles of the body vector
    pub id: usize,

    // primary state
    pub position: NVec3,
    pub orientation: NQuat,
    pub linear_momentum: NVec3,
    pub angular_momentum: NVec3,

    // derived, refreshed after any state write
    pub rot: NMat3,               // world-from-body rotation
    pub velocity: NVec3,          // linear_momentum * inv_mass
    pub omega: NVec3,             // inv_inertia_world * angular_momentum
    pub inv_inertia_world: NMat3, // rot * inv_inertia_body * rot^T

    pub inv_mass: f64, // 0 marks an immovable body
    pub inv_inertia_body: NMat3,
    pub restitution: f64,
    pub friction: f64,

    // accumulators, cleared each tick
    pub force: NVec3,
    pub torque: NVec3,

    pub shape: BoxShape,
    pub color: [f32; 3], // cosmetic, read by the viewer

    // spawn state, restored by reset()
    construct_pos: NVec3,
    construct_orientation: NQuat,
    construct_inv_mass: f64,

    // contact graph scratch
    pub in_contact_list: Vec<ContactInfo>,
    pub tarjan_index: i32, // -1 = unvisited
    pub lowlink: i32,
    pub on_stack: bool,
    pub scc_id: usize,
}

impl Body {
    pub fn new(
        position: NVec3,
        orientation: NQuat,
        shape: BoxShape,
        restitution: f64,
        friction: f64,
        inv_mass: f64,
        color: [f32; 3],
    ) -> Self {
        debug_assert!((0.0..=1.0).contains(&restitution));
        debug_assert!(friction >= 0.0);
        debug_assert!(inv_mass >= 0.0);

        let inv_inertia_body = shape.inv_inertia(inv_mass);
        let mut body = Self {
            id: 0,
            position,
            orientation,
            linear_momentum: NVec3::zeros(),
            angular_momentum: NVec3::zeros(),
            rot: NMat3::identity(),
            velocity: NVec3::zeros(),
            omega: NVec3::zeros(),
            inv_inertia_world: NMat3::zeros(),
            inv_mass,
            inv_inertia_body,
            restitution,
            friction,
            force: NVec3::zeros(),
            torque: NVec3::zeros(),
            shape,
            color,
            construct_pos: position,
            construct_orientation: orientation,
            construct_inv_mass: inv_mass,
            in_contact_list: Vec::new(),
            tarjan_index: -1,
            lowlink: 0,
            on_stack: false,
            scc_id: 0,
        };
        body.refresh_pose();
        body
    }

    pub fn is_fixed(&self) -> bool {
        self.inv_mass == 0.0
    }

    /// Mass of a movable body. Callers guard against fixed bodies.
    pub fn mass(&self) -> f64 {
        1.0 / self.inv_mass
    }

    /// Recompute rotation-dependent quantities from the orientation.
    /// The orientation is a `UnitQuaternion`, normalized on every write,
    /// so `rot` always agrees with it.
    pub fn refresh_pose(&mut self) {
        self.rot = self.orientation.to_rotation_matrix().into_inner();
        self.inv_inertia_world = self.rot * self.inv_inertia_body * self.rot.transpose();
        self.refresh_velocity();
    }

    /// Recompute velocity and omega from the momenta. Fixed bodies keep
    /// both identically zero through the zero inverse mass and inertia.
    pub fn refresh_velocity(&mut self) {
        self.velocity = self.linear_momentum * self.inv_mass;
        self.omega = self.inv_inertia_world * self.angular_momentum;
    }

    /// Velocity of the material point at world position `p`
    pub fn point_velocity(&self, p: &NVec3) -> NVec3 {
        self.velocity + self.omega.cross(&(p - self.position))
    }

    /// Apply an impulse at lever arm `r` from the center of mass.
    /// Momenta only; positions are never touched here. No-op on fixed
    /// bodies.
    pub fn apply_impulse(&mut self, impulse: &NVec3, r: &NVec3) {
        if self.is_fixed() {
            return;
        }
        self.linear_momentum += impulse;
        self.angular_momentum += r.cross(impulse);
        self.refresh_velocity();
    }

    pub fn pos_state(&self) -> PosState {
        PosState {
            position: self.position,
            orientation: self.orientation,
        }
    }

    pub fn set_pos_state(&mut self, s: &PosState) {
        self.position = s.position;
        self.orientation = s.orientation;
        self.refresh_pose();
    }

    pub fn vel_state(&self) -> VelState {
        VelState {
            linear_momentum: self.linear_momentum,
            angular_momentum: self.angular_momentum,
        }
    }

    pub fn set_vel_state(&mut self, s: &VelState) {
        self.linear_momentum = s.linear_momentum;
        self.angular_momentum = s.angular_momentum;
        self.refresh_velocity();
    }

    /// Restore the spawn pose and zero all motion
    pub fn reset(&mut self) {
        self.position = self.construct_pos;
        self.orientation = self.construct_orientation;
        self.inv_mass = self.construct_inv_mass;
        self.linear_momentum = NVec3::zeros();
        self.angular_momentum = NVec3::zeros();
        self.force = NVec3::zeros();
        self.torque = NVec3::zeros();
        self.in_contact_list.clear();
        self.refresh_pose();
    }
}

#[derive(Debug, Clone)]
pub struct System {
    pub bodies: Vec<Body>, // collection of bodies, permuted between ticks
    pub t: f64,            // time

    // per-tick scratch, reused across ticks
    pub(crate) prev_pos: Vec<PosState>,
    pub(crate) prev_vel: Vec<VelState>,
    pub(crate) top_sorted: Vec<usize>,
    pub(crate) tarjan_stack: Vec<usize>,
    pub(crate) scc_count: usize,
    pub(crate) rng: StdRng,
    seed: u64,
}

impl System {
    pub fn new(mut bodies: Vec<Body>, seed: u64) -> Self {
        for (i, b) in bodies.iter_mut().enumerate() {
            b.id = i;
        }
        let n = bodies.len();
        Self {
            bodies,
            t: 0.0,
            prev_pos: Vec::with_capacity(n),
            prev_vel: Vec::with_capacity(n),
            top_sorted: Vec::with_capacity(n),
            tarjan_stack: Vec::with_capacity(n),
            scc_count: 0,
            rng: StdRng::seed_from_u64(seed),
            seed,
        }
    }

    pub fn num_bodies(&self) -> usize {
        self.bodies.len()
    }

    /// Snapshot every body's (x, v) into the tick scratch arrays
    pub fn save_state(&mut self) {
        self.prev_pos.clear();
        self.prev_vel.clear();
        for b in &self.bodies {
            self.prev_pos.push(b.pos_state());
            self.prev_vel.push(b.vel_state());
        }
    }

    /// Rewind every body to the snapshot. The velocity snapshot accumulates
    /// collision-impulse deltas, so rewinding keeps resolved velocities
    /// while discarding tentative positions.
    pub fn restore_state(&mut self) {
        for (i, b) in self.bodies.iter_mut().enumerate() {
            b.set_pos_state(&self.prev_pos[i]);
            b.set_vel_state(&self.prev_vel[i]);
        }
    }

    pub fn zero_forces(&mut self) {
        for b in &mut self.bodies {
            b.force = NVec3::zeros();
            b.torque = NVec3::zeros();
        }
    }

    /// Uniform gravity on every movable body, applied at the center of
    /// mass, so no torque contribution
    pub fn add_gravity(&mut self) {
        for b in &mut self.bodies {
            if !b.is_fixed() {
                b.force += NVec3::new(0.0, b.mass() * GRAVITY_Y, 0.0);
            }
        }
    }

    /// Restore the post-construction state: spawn order, spawn poses, zero
    /// momenta, t = 0, and a freshly seeded RNG. Bit-identical to a newly
    /// built system.
    pub fn reset(&mut self) {
        self.bodies.sort_by_key(|b| b.id);
        for b in &mut self.bodies {
            b.reset();
        }
        self.t = 0.0;
        self.rng = StdRng::seed_from_u64(self.seed);
    }
}
