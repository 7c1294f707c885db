//! The per-tick pipeline
//!
//! One tick advances the whole world by `params.dt`: tentatively integrate,
//! resolve collisions against the tentative state (rewinding positions
//! between passes), then stabilize resting contacts bottom-up, then commit
//! the position update. The display loop calls `tick` synchronously; a full
//! tick always runs to completion.

use rand::Rng;

use crate::simulation::collide::collision_detect;
use crate::simulation::contact::{contact_detect, create_contact_graph};
use crate::simulation::integrator::{integrate_pos, integrate_vel};
use crate::simulation::params::{
    Parameters, MAX_COLLISIONS, MAX_CONTACTS, MAX_SHOCK_PROP, SHUFFLE_SWAPS,
};
use crate::simulation::states::System;

/// A few random swaps between movable bodies, so the fixed pair-scan order
/// does not bias the resolver tick after tick. The swap count is
/// deliberately shallow; contact lists are rebuilt afterwards, so stored
/// indices never survive the permutation.
fn shuffle_bodies(sys: &mut System) {
    let n = sys.bodies.len();
    if n < 2 {
        return;
    }
    for _ in 0..SHUFFLE_SWAPS {
        let j = sys.rng.gen_range(0..n);
        let k = sys.rng.gen_range(0..n);
        if j != k && !sys.bodies[j].is_fixed() && !sys.bodies[k].is_fixed() {
            sys.bodies.swap(j, k);
        }
    }
}

/// Tentatively advance every body by one step (velocities, then positions)
fn integrate_all(sys: &mut System, dt: f64) {
    for i in 0..sys.bodies.len() {
        integrate_vel(sys, dt, i);
        integrate_pos(sys, dt, i);
    }
}

/// Advance the world by one step of `params.dt`
pub fn tick(sys: &mut System, params: &Parameters) {
    let dt = params.dt;
    let n = sys.bodies.len();
    if n == 0 {
        return;
    }

    // decorrelate iteration order, then snapshot x and v so the scratch
    // arrays stay aligned with the permuted slots
    shuffle_bodies(sys);
    sys.save_state();

    // tentative advance to x', v'
    sys.zero_forces();
    sys.add_gravity();
    integrate_all(sys, dt);

    // find and resolve collisions; each pass rewinds to x with the
    // accumulated impulse deltas and re-integrates
    let mut count = 0;
    while collision_detect(sys) && count < MAX_COLLISIONS {
        count += 1;
        sys.restore_state();
        sys.zero_forces();
        sys.add_gravity();
        integrate_all(sys, dt);
    }

    // back to x; velocities now carry the collision impulses
    sys.restore_state();
    sys.zero_forces();
    sys.add_gravity();

    // initial contact graph, then the velocity update the contacts must
    // stabilize against
    create_contact_graph(sys, dt, true);
    for i in 0..n {
        integrate_vel(sys, dt, i);
    }

    // resolve resting contacts bottom-up, refreshing the graph between
    // passes so newly exposed supports are picked up
    let mut passes = 0;
    while passes < MAX_CONTACTS && contact_detect(sys, false) {
        passes += 1;
        create_contact_graph(sys, dt, false);
    }

    // shock propagation only when the contact loop saturated
    if passes == MAX_CONTACTS {
        for _ in 0..MAX_SHOCK_PROP {
            if !contact_detect(sys, true) {
                break;
            }
        }
    }

    // commit positions with the stabilized velocities
    for i in 0..n {
        integrate_pos(sys, dt, i);
    }

    sys.t += dt;
}
