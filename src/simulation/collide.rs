//! Pairwise impulse resolution
//!
//! One shared routine applies the normal-plus-friction impulse at a contact
//! point; the collision scan drives it over every overlapping pair of the
//! tentatively advanced system. The resting-contact solver in `contact`
//! reuses the same routine with zero restitution.

use crate::simulation::intersect::intersect;
use crate::simulation::params::{DENOM_EPS, EPSILON, THRESH_COLLIDE};
use crate::simulation::states::{Body, NVec3, System};

/// Per-body contribution to the impulse denominator along `dir`:
/// 1/m + dir . ((I^-1 (r x dir)) x r). Zero for fixed bodies and for
/// bodies temporarily promoted to fixed during shock propagation.
fn denom_term(b: &Body, r: &NVec3, dir: &NVec3, treat_fixed: bool) -> f64 {
    if treat_fixed || b.is_fixed() {
        return 0.0;
    }
    let rxd = r.cross(dir);
    b.inv_mass + dir.dot(&(b.inv_inertia_world * rxd).cross(r))
}

/// Resolve one contact between bodies `a` and `b` at `point` with unit
/// `normal` pointing from `a` toward `b`.
///
/// If the relative normal velocity is approaching faster than `threshold`,
/// applies the restitution impulse plus a Coulomb-clamped friction impulse
/// (|j_t| <= mu * j, mu the pair minimum) to both momenta and returns the
/// total impulse on `b` with the lever arms, for callers that mirror the
/// deltas into a snapshot. Degenerate denominators drop the contact for
/// this pass rather than dividing through.
#[allow(clippy::too_many_arguments)]
pub(crate) fn resolve_pair(
    bodies: &mut [Body],
    a: usize,
    b: usize,
    point: &NVec3,
    normal: &NVec3,
    restitution: f64,
    threshold: f64,
    a_fixed: bool,
    b_fixed: bool,
) -> Option<(NVec3, NVec3, NVec3)> {
    let r_a = point - bodies[a].position;
    let r_b = point - bodies[b].position;
    let v_rel = bodies[b].point_velocity(point) - bodies[a].point_velocity(point);

    let v_n = v_rel.dot(normal);
    if v_n >= -threshold {
        return None;
    }

    let denom =
        denom_term(&bodies[a], &r_a, normal, a_fixed) + denom_term(&bodies[b], &r_b, normal, b_fixed);
    if denom < DENOM_EPS {
        return None;
    }
    let j = -(1.0 + restitution) * v_n / denom;
    let mut impulse = j * normal;

    // Coulomb friction along the tangential slip direction
    let v_t = v_rel - v_n * normal;
    let slip = v_t.norm();
    if slip > EPSILON {
        let tangent = v_t / slip;
        let denom_t = denom_term(&bodies[a], &r_a, &tangent, a_fixed)
            + denom_term(&bodies[b], &r_b, &tangent, b_fixed);
        if denom_t >= DENOM_EPS {
            let mu = bodies[a].friction.min(bodies[b].friction);
            let j_t = (-slip / denom_t).clamp(-mu * j, mu * j);
            impulse += j_t * tangent;
        }
    }

    if !a_fixed {
        let neg = -impulse;
        bodies[a].apply_impulse(&neg, &r_a);
    }
    if !b_fixed {
        bodies[b].apply_impulse(&impulse, &r_b);
    }
    Some((impulse, r_a, r_b))
}

/// One collision pass over the tentatively advanced system.
///
/// Scans all unordered pairs with at least one movable body, in index
/// order, and applies a restitution impulse (pair minimum) wherever the
/// boxes overlap while approaching. Impulse deltas are mirrored into the
/// tick's velocity snapshot so the stepper can rewind positions without
/// losing them. Returns true iff any impulse was applied.
pub fn collision_detect(sys: &mut System) -> bool {
    let n = sys.bodies.len();
    let mut any = false;
    for i in 0..n {
        for j in (i + 1)..n {
            if sys.bodies[i].is_fixed() && sys.bodies[j].is_fixed() {
                continue;
            }
            let Some(hit) = intersect(&sys.bodies[i], &sys.bodies[j]) else {
                continue;
            };
            let restitution = sys.bodies[i].restitution.min(sys.bodies[j].restitution);
            if let Some((impulse, r_i, r_j)) = resolve_pair(
                &mut sys.bodies,
                i,
                j,
                &hit.point,
                &hit.normal,
                restitution,
                THRESH_COLLIDE,
                false,
                false,
            ) {
                any = true;
                mirror_impulse(sys, i, &-impulse, &r_i);
                mirror_impulse(sys, j, &impulse, &r_j);
            }
        }
    }
    any
}

/// Replay a momentum delta onto the velocity snapshot entry for `idx`
fn mirror_impulse(sys: &mut System, idx: usize, impulse: &NVec3, r: &NVec3) {
    if sys.bodies[idx].is_fixed() {
        return;
    }
    sys.prev_vel[idx].linear_momentum += impulse;
    sys.prev_vel[idx].angular_momentum += r.cross(impulse);
}
