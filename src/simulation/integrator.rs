//! Fixed-step semi-implicit Euler integration for a single body
//!
//! The velocity and position updates are deliberately separate operations:
//! the collision and contact resolvers apply impulses to momenta between
//! the two, and the stepper rewinds positions while keeping the updated
//! velocities. Both are no-ops for fixed bodies.

use nalgebra::Quaternion;

use crate::simulation::states::{NQuat, System};

/// Advance body `i`'s momenta by one step from its force and torque
/// accumulators, then refresh velocity and omega.
/// p_n+1 = p_n + dt * F, L_n+1 = L_n + dt * tau
pub fn integrate_vel(sys: &mut System, dt: f64, i: usize) {
    let b = &mut sys.bodies[i];
    if b.is_fixed() {
        return;
    }
    b.linear_momentum += b.force * dt;
    b.angular_momentum += b.torque * dt;
    b.refresh_velocity();
}

/// Advance body `i`'s pose by one step from its current velocity and omega.
///
/// Position: x_n+1 = x_n + dt * v_n+1.
/// Orientation via the spinor ODE q' = 1/2 * omega * q, stepped explicitly
/// and renormalized: q_n+1 = normalize(q_n + (dt/2) * omega * q_n), with
/// omega embedded as a pure quaternion.
pub fn integrate_pos(sys: &mut System, dt: f64, i: usize) {
    let b = &mut sys.bodies[i];
    if b.is_fixed() {
        return;
    }
    b.position += b.velocity * dt;

    let q = b.orientation.into_inner();
    let spin = Quaternion::from_imag(b.omega) * q * (0.5 * dt);
    b.orientation = NQuat::from_quaternion(q + spin);
    b.refresh_pose();
}
