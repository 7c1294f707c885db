//! Resting-contact handling: the rest-on graph, its Tarjan ordering, and
//! the contact solver with shock propagation
//!
//! Resting contacts are often sub-tolerance in the fully advanced system,
//! so the graph is built by probing one body at a time: advance just that
//! body by one step and see what it runs into. The edges ("i rests on k")
//! are then ordered bottom-up with Tarjan's strongly-connected-components
//! algorithm so that every support is corrected before the bodies it
//! carries.

use crate::simulation::collide::resolve_pair;
use crate::simulation::integrator::{integrate_pos, integrate_vel};
use crate::simulation::intersect::intersect;
use crate::simulation::params::THRESH_CONTACT;
use crate::simulation::states::{ContactInfo, System};

/// Rebuild every body's contact list by single-body probing.
///
/// For each movable body: save its state, advance it alone by `dt`
/// (momenta too on the initial call of a tick, so the pending gravity kick
/// exposes the supports underneath), test it against every other body, and
/// restore it. Probing uses the body's current velocity, so rebuilds
/// between solver passes pick up supports exposed by fresh impulses.
/// Finishes by re-sorting the bodies' solve order.
pub fn create_contact_graph(sys: &mut System, dt: f64, is_initial: bool) {
    for b in &mut sys.bodies {
        b.in_contact_list.clear();
    }

    let n = sys.bodies.len();
    for i in 0..n {
        if sys.bodies[i].is_fixed() {
            // fixed bodies never rest on anything
            continue;
        }
        let saved_pos = sys.bodies[i].pos_state();
        let saved_vel = sys.bodies[i].vel_state();

        if is_initial {
            integrate_vel(sys, dt, i);
        }
        integrate_pos(sys, dt, i);

        let mut found = Vec::new();
        for k in 0..n {
            if k == i {
                continue;
            }
            // normal points from the support k toward the probed body
            if let Some(hit) = intersect(&sys.bodies[k], &sys.bodies[i]) {
                found.push(ContactInfo {
                    other: k,
                    point: hit.point,
                    normal: hit.normal,
                });
            }
        }

        sys.bodies[i].set_pos_state(&saved_pos);
        sys.bodies[i].set_vel_state(&saved_vel);
        sys.bodies[i].in_contact_list = found;
    }

    topological_tarjan(sys);
}

/// Tarjan's SCC algorithm over the rest-on edges.
///
/// SCCs are emitted sinks-first, so supports receive lower SCC ids than
/// the bodies they carry and `top_sorted` lists the world bottom-up, with
/// each SCC's bodies contiguous. Scratch fields live on the bodies and are
/// reset here on every call.
pub fn topological_tarjan(sys: &mut System) {
    for b in &mut sys.bodies {
        b.tarjan_index = -1;
        b.lowlink = 0;
        b.on_stack = false;
        b.scc_id = 0;
    }
    sys.top_sorted.clear();
    sys.tarjan_stack.clear();
    sys.scc_count = 0;

    let mut next_index = 0;
    for v in 0..sys.bodies.len() {
        if sys.bodies[v].tarjan_index < 0 {
            strong_connect(sys, v, &mut next_index);
        }
    }
}

fn strong_connect(sys: &mut System, v: usize, next_index: &mut i32) {
    sys.bodies[v].tarjan_index = *next_index;
    sys.bodies[v].lowlink = *next_index;
    *next_index += 1;
    sys.tarjan_stack.push(v);
    sys.bodies[v].on_stack = true;

    let supports: Vec<usize> = sys.bodies[v].in_contact_list.iter().map(|c| c.other).collect();
    for k in supports {
        if sys.bodies[k].tarjan_index < 0 {
            strong_connect(sys, k, next_index);
            sys.bodies[v].lowlink = sys.bodies[v].lowlink.min(sys.bodies[k].lowlink);
        } else if sys.bodies[k].on_stack {
            sys.bodies[v].lowlink = sys.bodies[v].lowlink.min(sys.bodies[k].tarjan_index);
        }
    }

    if sys.bodies[v].lowlink == sys.bodies[v].tarjan_index {
        while let Some(w) = sys.tarjan_stack.pop() {
            sys.bodies[w].on_stack = false;
            sys.bodies[w].scc_id = sys.scc_count;
            sys.top_sorted.push(w);
            if w == v {
                break;
            }
        }
        sys.scc_count += 1;
    }
}

/// One resting-contact pass in bottom-up order.
///
/// Every contact is resolved with the collision impulse formula at zero
/// restitution, so resting bodies are stopped without bounce. With `shock`
/// set, the endpoint with the lower SCC id (the side already resolved;
/// ties go to the support) is treated as temporarily immovable for that
/// pair only, which breaks impulse cycles inside stacks. Returns true iff
/// any impulse was applied.
pub fn contact_detect(sys: &mut System, shock: bool) -> bool {
    let order = sys.top_sorted.clone();
    let mut any = false;
    for &i in &order {
        if sys.bodies[i].is_fixed() {
            continue;
        }
        let contacts = sys.bodies[i].in_contact_list.clone();
        for c in &contacts {
            let k = c.other;
            let (k_fixed, i_fixed) = if shock {
                if sys.bodies[k].scc_id <= sys.bodies[i].scc_id {
                    (true, false)
                } else {
                    (false, true)
                }
            } else {
                (false, false)
            };
            if resolve_pair(
                &mut sys.bodies,
                k,
                i,
                &c.point,
                &c.normal,
                0.0,
                THRESH_CONTACT,
                k_fixed,
                i_fixed,
            )
            .is_some()
            {
                any = true;
            }
        }
    }
    any
}
