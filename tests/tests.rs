use rbsim::simulation::contact::create_contact_graph;
use rbsim::simulation::intersect::intersect;
use rbsim::simulation::params::Parameters;
use rbsim::simulation::scenario::Scenario;
use rbsim::simulation::shape::BoxShape;
use rbsim::simulation::states::{Body, NQuat, NVec3, System};
use rbsim::simulation::stepper::tick;

use std::f64::consts::PI;

/// Default physics parameters for tests
pub fn test_params() -> Parameters {
    Parameters {
        dt: 0.005,
        seed: 42,
    }
}

/// A wide fixed floor whose top surface sits at y = 0
pub fn floor(restitution: f64, friction: f64) -> Body {
    Body::new(
        NVec3::new(0.0, -0.5, 0.0),
        NQuat::identity(),
        BoxShape::from_size(NVec3::new(200.0, 1.0, 200.0)),
        restitution,
        friction,
        0.0,
        [1.0, 1.0, 0.5],
    )
}

/// A unit-mass unit box with identity orientation
pub fn unit_box(pos: NVec3, restitution: f64, friction: f64) -> Body {
    Body::new(
        pos,
        NQuat::identity(),
        BoxShape::from_size(NVec3::new(1.0, 1.0, 1.0)),
        restitution,
        friction,
        1.0,
        [0.1, 0.7, 0.1],
    )
}

pub fn sys_of(bodies: Vec<Body>) -> System {
    System::new(bodies, 42)
}

pub fn run(sys: &mut System, p: &Parameters, ticks: usize) {
    for _ in 0..ticks {
        tick(sys, p);
    }
}

/// Look a body up by its stable id; the body vector is shuffled between
/// ticks, so slot indices are not stable across a run
pub fn body_by_id(sys: &System, id: usize) -> &Body {
    sys.bodies.iter().find(|b| b.id == id).unwrap()
}

fn quat_z(angle: f64) -> NQuat {
    NQuat::from_axis_angle(&NVec3::z_axis(), angle)
}

// ==================================================================================
// Shape tests
// ==================================================================================

#[test]
fn box_inverse_inertia_diagonal() {
    let shape = BoxShape::new(0.5, 0.5, 0.5);
    let inv = shape.inv_inertia(1.0);
    // 3 * inv_mass / (hy^2 + hz^2) = 3 / 0.5 = 6 for a unit cube
    assert!((inv[(0, 0)] - 6.0).abs() < 1e-12);
    assert!((inv[(1, 1)] - 6.0).abs() < 1e-12);
    assert!((inv[(2, 2)] - 6.0).abs() < 1e-12);
    assert_eq!(inv[(0, 1)], 0.0);

    // fixed bodies get a zero tensor so omega stays zero
    assert_eq!(shape.inv_inertia(0.0), nalgebra::Matrix3::zeros());
}

#[test]
fn support_centers_tied_features() {
    let shape = BoxShape::new(0.5, 0.5, 0.5);

    // a face-aligned query lands on the face center, not a corner
    let p = shape.support(&NVec3::new(0.0, -1.0, 0.0));
    assert_eq!(p, NVec3::new(0.0, -0.5, 0.0));

    // a fully general direction picks the matching corner
    let p = shape.support(&NVec3::new(1.0, -1.0, 1.0));
    assert_eq!(p, NVec3::new(0.5, -0.5, 0.5));

    // an edge-aligned query lands on the edge midpoint
    let p = shape.support(&NVec3::new(1.0, 1.0, 0.0));
    assert_eq!(p, NVec3::new(0.5, 0.5, 0.0));
}

#[test]
fn box_vertices_are_all_sign_combinations() {
    let shape = BoxShape::new(1.0, 2.0, 3.0);
    let verts = shape.vertices();
    assert_eq!(verts.len(), 8);
    for v in &verts {
        assert_eq!(v.x.abs(), 1.0);
        assert_eq!(v.y.abs(), 2.0);
        assert_eq!(v.z.abs(), 3.0);
    }
    for i in 0..8 {
        for j in (i + 1)..8 {
            assert_ne!(verts[i], verts[j]);
        }
    }
}

// ==================================================================================
// Intersection tests
// ==================================================================================

#[test]
fn separated_boxes_do_not_intersect() {
    let a = unit_box(NVec3::zeros(), 0.5, 0.5);
    let b = unit_box(NVec3::new(3.0, 0.0, 0.0), 0.5, 0.5);
    assert!(intersect(&a, &b).is_none());

    let c = unit_box(NVec3::new(0.0, 1.001, 0.0), 0.5, 0.5);
    assert!(intersect(&a, &c).is_none());
}

#[test]
fn overlap_reports_normal_toward_second_body() {
    let a = unit_box(NVec3::zeros(), 0.5, 0.5);
    let b = unit_box(NVec3::new(0.0, 0.9, 0.0), 0.5, 0.5);

    let hit = intersect(&a, &b).expect("overlapping boxes must intersect");
    assert!(hit.normal.y > 0.999, "normal should point from a toward b");
    assert!((hit.depth - 0.1).abs() < 1e-3);
    // face contact between axis-aligned boxes lands on the face center
    assert!((hit.point.y - 0.5).abs() < 1e-6);
    assert!(hit.point.x.abs() < 1e-9);
    assert!(hit.point.z.abs() < 1e-9);

    // flipping the argument order flips the normal
    let hit = intersect(&b, &a).unwrap();
    assert!(hit.normal.y < -0.999);
}

#[test]
fn touching_boxes_count_as_contact() {
    let a = unit_box(NVec3::zeros(), 0.5, 0.5);
    let b = unit_box(NVec3::new(0.0, 1.0 - 1e-9, 0.0), 0.5, 0.5);
    let hit = intersect(&a, &b).expect("touching boxes count as contact");
    assert!(hit.depth >= 0.0);
    assert!(hit.depth < 1e-4);
}

#[test]
fn tilted_box_contacts_floor_under_its_low_edge() {
    let f = floor(0.5, 0.5);
    let tilted = Body::new(
        NVec3::new(0.0, 0.704, 0.0), // bottom edge just below the floor top
        quat_z(PI / 4.0),
        BoxShape::from_size(NVec3::new(1.0, 1.0, 1.0)),
        0.5,
        0.5,
        1.0,
        [0.1, 0.7, 0.1],
    );

    let hit = intersect(&f, &tilted).expect("low edge dips below the floor");
    assert!(hit.normal.y > 0.999);
    // contact sits on the floor plane, under the box center
    assert!(hit.point.y.abs() < 0.01);
    assert!(hit.point.x.abs() < 1e-3);
}

// ==================================================================================
// Integrator tests
// ==================================================================================

#[test]
fn free_fall_momentum_bookkeeping() {
    // two movable boxes in empty space, total mass 3
    let mut heavy = unit_box(NVec3::new(-20.0, 0.0, 0.0), 0.5, 0.5);
    heavy.inv_mass = 0.5;
    let mut sys = sys_of(vec![unit_box(NVec3::new(20.0, 0.0, 0.0), 0.5, 0.5), heavy]);
    let p = test_params();

    let steps = 10;
    run(&mut sys, &p, steps);

    let total: NVec3 = sys
        .bodies
        .iter()
        .map(|b| b.linear_momentum)
        .sum();
    let expected = 3.0 * -9.81 * p.dt * steps as f64;
    assert!((total.y - expected).abs() < 1e-9, "got {}", total.y);
    assert!(total.x.abs() < 1e-12);
    assert!(total.z.abs() < 1e-12);
}

#[test]
fn semi_implicit_order_positions_use_updated_velocity() {
    let mut sys = sys_of(vec![unit_box(NVec3::new(0.0, 5.0, 0.0), 0.5, 0.5)]);
    let p = test_params();

    tick(&mut sys, &p);

    // x_1 = x_0 + dt * v_1 with v_1 = g * dt, so the first step already
    // moves by g * dt^2
    let expected = 5.0 + -9.81 * p.dt * p.dt;
    assert!((sys.bodies[0].position.y - expected).abs() < 1e-12);
}

#[test]
fn orientation_stays_unit_while_tumbling() {
    let mut b = unit_box(NVec3::new(0.0, 100.0, 0.0), 0.5, 0.5);
    b.angular_momentum = NVec3::new(1.3, 0.7, -0.4);
    b.refresh_velocity();
    let mut sys = sys_of(vec![b]);
    let p = test_params();

    for _ in 0..400 {
        tick(&mut sys, &p);
        let q = sys.bodies[0].orientation.into_inner();
        assert!((q.norm() - 1.0).abs() <= 1e-6);
    }

    // rot must stay orthonormal along with the quaternion
    let r = sys.bodies[0].rot;
    let should_be_identity = r * r.transpose();
    assert!((should_be_identity - nalgebra::Matrix3::identity()).norm() < 1e-9);
}

#[test]
fn fixed_body_never_moves() {
    let mut sys = sys_of(vec![
        floor(0.5, 0.5),
        unit_box(NVec3::new(0.0, 3.0, 0.0), 0.5, 0.5),
    ]);
    let p = test_params();
    run(&mut sys, &p, 200);

    let f = body_by_id(&sys, 0);
    assert_eq!(f.position, NVec3::new(0.0, -0.5, 0.0));
    assert_eq!(f.orientation, NQuat::identity());
    assert_eq!(f.linear_momentum, NVec3::zeros());
    assert_eq!(f.angular_momentum, NVec3::zeros());
    assert_eq!(f.velocity, NVec3::zeros());
    assert_eq!(f.omega, NVec3::zeros());
}

// ==================================================================================
// Collision tests
// ==================================================================================

#[test]
fn head_on_equal_mass_elastic_exchange() {
    let mut left = unit_box(NVec3::new(-1.1, 0.0, 0.0), 1.0, 0.0);
    left.linear_momentum = NVec3::new(1.0, 0.0, 0.0);
    left.refresh_velocity();
    let mut right = unit_box(NVec3::new(1.1, 0.0, 0.0), 1.0, 0.0);
    right.linear_momentum = NVec3::new(-1.0, 0.0, 0.0);
    right.refresh_velocity();

    let mut sys = sys_of(vec![left, right]);
    let p = test_params();
    run(&mut sys, &p, 300);

    // velocities swapped; both bodies kept falling identically meanwhile
    let l = body_by_id(&sys, 0);
    let r = body_by_id(&sys, 1);
    assert!((l.velocity.x + 1.0).abs() < 1e-3, "left vx {}", l.velocity.x);
    assert!((r.velocity.x - 1.0).abs() < 1e-3, "right vx {}", r.velocity.x);
    assert!((l.velocity.y - r.velocity.y).abs() < 1e-9);
}

#[test]
fn dropped_box_comes_to_rest_on_floor() {
    let mut sys = sys_of(vec![
        floor(0.0, 0.5),
        unit_box(NVec3::new(0.0, 5.0, 0.0), 1.0, 0.5),
    ]);
    let p = test_params();

    // 1.5 s: drop, impact, settle
    run(&mut sys, &p, 300);
    let b = body_by_id(&sys, 1);
    assert!((b.position.y - 0.5).abs() < 0.01, "y = {}", b.position.y);

    // and it stays put for the next half second
    for _ in 0..5 {
        run(&mut sys, &p, 20);
        let b = body_by_id(&sys, 1);
        assert!((b.position.y - 0.5).abs() < 0.01);
    }
    let b = body_by_id(&sys, 1);
    assert!(b.velocity.y.abs() < 1e-3);
}

#[test]
fn elastic_bounce_recovers_drop_height() {
    let mut sys = sys_of(vec![
        floor(1.0, 0.0),
        unit_box(NVec3::new(0.0, 5.0, 0.0), 1.0, 0.0),
    ]);
    let p = test_params();

    // first impact near t = 0.91 s; the rebound apex near t = 1.82 s
    let mut apex = f64::NEG_INFINITY;
    for step in 0..700 {
        tick(&mut sys, &p);
        if (250..650).contains(&step) {
            apex = apex.max(body_by_id(&sys, 1).position.y);
        }
    }

    // drop height above the rest pose was 4.5; require 98% recovery
    assert!(apex - 0.5 >= 0.98 * 4.5, "apex = {apex}");
}

#[test]
fn friction_holds_box_on_incline() {
    // 30 degree incline; tan(30) ~ 0.577, so mu = 1 holds the box and
    // mu = 0 lets it run away downhill
    let slope = PI / 6.0;
    let ramp_normal = NVec3::new(-slope.sin(), slope.cos(), 0.0);
    let surface = NVec3::new(0.0, -10.0, 0.0) + 10.0 * ramp_normal;
    let start = surface + (0.5 + 1e-4) * ramp_normal;

    let displacement_after = |mu: f64| {
        let ramp = Body::new(
            NVec3::new(0.0, -10.0, 0.0),
            quat_z(slope),
            BoxShape::from_size(NVec3::new(20.0, 20.0, 20.0)),
            1.0,
            mu,
            0.0,
            [1.0, 1.0, 0.5],
        );
        let block = Body::new(
            start,
            quat_z(slope),
            BoxShape::from_size(NVec3::new(1.0, 1.0, 1.0)),
            1.0,
            mu,
            1.0,
            [0.1, 0.7, 0.1],
        );
        let mut sys = sys_of(vec![ramp, block]);
        let p = test_params();
        run(&mut sys, &p, 200);
        (body_by_id(&sys, 1).position - start).norm()
    };

    assert!(
        displacement_after(1.0) < 0.1,
        "static friction should pin the box"
    );
    assert!(
        displacement_after(0.0) > 1.0,
        "without friction the box must slide away"
    );
}

// ==================================================================================
// Contact and stacking tests
// ==================================================================================

#[test]
fn two_box_stack_settles() {
    let mut sys = sys_of(vec![
        floor(0.4, 0.5),
        unit_box(NVec3::new(0.0, 0.5, 0.0), 0.4, 0.5),
        unit_box(NVec3::new(0.0, 1.5 + 1e-2, 0.0), 0.4, 0.5),
    ]);
    let p = test_params();
    run(&mut sys, &p, 400); // 2 s

    let a = body_by_id(&sys, 1);
    let b = body_by_id(&sys, 2);
    assert!((a.position.y - 0.5).abs() < 1e-3, "a.y = {}", a.position.y);
    assert!((b.position.y - 1.5).abs() < 1e-3, "b.y = {}", b.position.y);
    assert!(a.velocity.y.abs() < 1e-3);
    assert!(b.velocity.y.abs() < 1e-3);
}

#[test]
fn three_box_tower_stays_standing() {
    // scene 7 is the staggered three-box tower
    let Scenario {
        mut system,
        parameters,
    } = Scenario::preset(7);
    run(&mut system, &parameters, 1000); // 5 s

    let top = body_by_id(&system, 3);
    assert!(top.position.y > 2.4, "tower fell: top at {}", top.position.y);
}

#[test]
fn contact_graph_orders_supports_before_supported() {
    let mut sys = sys_of(vec![
        floor(0.4, 0.5),
        unit_box(NVec3::new(0.0, 0.5, 0.0), 0.4, 0.5),
        unit_box(NVec3::new(0.0, 1.5 + 1e-2, 0.0), 0.4, 0.5),
    ]);
    let p = test_params();
    run(&mut sys, &p, 200);

    sys.zero_forces();
    sys.add_gravity();
    create_contact_graph(&mut sys, p.dt, true);

    // the settled stack must show up in the graph at all
    let edges: usize = sys.bodies.iter().map(|b| b.in_contact_list.len()).sum();
    assert!(edges >= 2, "expected a stack, found {edges} contact edges");

    // fixed bodies never rest on anything
    for b in &sys.bodies {
        if b.is_fixed() {
            assert!(b.in_contact_list.is_empty());
        }
    }

    // valid condensation: no edge points from a lower SCC to a higher one
    for b in &sys.bodies {
        for c in &b.in_contact_list {
            assert!(
                b.scc_id >= sys.bodies[c.other].scc_id,
                "support ordering violated: {} -> {}",
                b.scc_id,
                sys.bodies[c.other].scc_id
            );
        }
    }
}

#[test]
fn small_pile_settles_without_penetration() {
    let Scenario {
        mut system,
        parameters,
    } = Scenario::preset(2);
    run(&mut system, &parameters, 1200); // 6 s

    for b in &system.bodies {
        assert!(
            b.velocity.y.abs() <= 1e-2,
            "body {} still moving: vy = {}",
            b.id,
            b.velocity.y
        );
    }

    let n = system.num_bodies();
    for i in 0..n {
        for j in (i + 1)..n {
            if let Some(hit) = intersect(&system.bodies[i], &system.bodies[j]) {
                assert!(
                    hit.depth < 1e-3,
                    "bodies {} and {} interpenetrate by {}",
                    system.bodies[i].id,
                    system.bodies[j].id,
                    hit.depth
                );
            }
        }
    }
}

// ==================================================================================
// System tests
// ==================================================================================

#[test]
fn reset_restores_spawn_state() {
    let Scenario {
        mut system,
        parameters,
    } = Scenario::preset(5);
    let fresh = Scenario::preset(5).system;

    run(&mut system, &parameters, 100);
    system.reset();

    assert_eq!(system.t, 0.0);
    assert_eq!(system.num_bodies(), fresh.num_bodies());
    for (b, f) in system.bodies.iter().zip(fresh.bodies.iter()) {
        assert_eq!(b.id, f.id);
        assert_eq!(b.position, f.position);
        assert_eq!(b.orientation, f.orientation);
        assert_eq!(b.linear_momentum, NVec3::zeros());
        assert_eq!(b.angular_momentum, NVec3::zeros());
        assert_eq!(b.rot, f.rot);
    }
}

#[test]
fn identical_seeds_give_identical_runs() {
    let Scenario {
        system: mut sys_a,
        parameters,
    } = Scenario::preset(2);
    let mut sys_b = Scenario::preset(2).system;

    run(&mut sys_a, &parameters, 150);
    run(&mut sys_b, &parameters, 150);

    for (a, b) in sys_a.bodies.iter().zip(sys_b.bodies.iter()) {
        assert_eq!(a.id, b.id);
        assert_eq!(a.position, b.position);
        assert_eq!(a.orientation, b.orientation);
        assert_eq!(a.linear_momentum, b.linear_momentum);
        assert_eq!(a.angular_momentum, b.angular_momentum);
    }
}

#[test]
fn yaml_scene_builds_scenario() {
    let yaml = r#"
parameters:
  dt: 0.005
  seed: 7

bodies:
  - position: [ 0.0, -0.5, 0.0 ]
    size: [ 40.0, 1.0, 40.0 ]
    restitution: 0.4
    friction: 0.5
    inv_mass: 0.0
  - position: [ 0.0, 3.0, 0.0 ]
    axis: [ 0.0, 0.0, 1.0 ]
    angle: 0.7853981634
    size: [ 2.0, 1.0, 1.0 ]
    restitution: 0.6
    friction: 0.5
    inv_mass: 0.5
    color: [ 0.7, 0.0, 0.4 ]
"#;
    let cfg: rbsim::ScenarioConfig = serde_yaml::from_str(yaml).unwrap();
    let scenario = Scenario::from_config(cfg);

    assert_eq!(scenario.parameters.seed, 7);
    assert_eq!(scenario.system.num_bodies(), 2);

    let f = &scenario.system.bodies[0];
    assert!(f.is_fixed());
    assert_eq!(f.shape.half, NVec3::new(20.0, 0.5, 20.0));

    let b = &scenario.system.bodies[1];
    assert_eq!(b.shape.half, NVec3::new(1.0, 0.5, 0.5));
    assert!((b.orientation.angle() - 0.7853981634).abs() < 1e-9);
    assert_eq!(b.color, [0.7, 0.0, 0.4]);
}
