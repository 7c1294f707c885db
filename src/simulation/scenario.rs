//! Build fully-initialized simulation scenarios
//!
//! A `Scenario` is the runtime bundle the viewer consumes: the body system
//! at t = 0 plus the numerical parameters. Scenarios come from the built-in
//! presets (selected by index on the command line) or from a YAML scene
//! description.
//!
//! The presets are the classic demo set: a lone falling box, a friction
//! slide, piles of mixed boxes, and stacks of increasing ambition. Scene
//! data specifies full edge lengths; `BoxShape::from_size` halves them.

use bevy::prelude::Resource;
use nalgebra::Unit;
use std::f64::consts::PI;

use crate::configuration::config::{BodyConfig, ScenarioConfig};
use crate::simulation::params::{Parameters, EPSILON};
use crate::simulation::shape::BoxShape;
use crate::simulation::states::{Body, NQuat, NVec3, System};

/// Preset used when no scene index is given or the index is out of range
pub const DEFAULT_SCENE: usize = 2;

/// Bevy resource representing a fully-initialized simulation scenario
///
/// Inserted as a `Resource` and then read by the systems responsible for
/// integration and visualization.
#[derive(Resource)]
pub struct Scenario {
    pub system: System,
    pub parameters: Parameters,
}

impl Scenario {
    /// Build one of the 8 built-in scenes; anything else falls back to the
    /// small pile
    pub fn preset(index: usize) -> Self {
        let bodies = match index {
            0 => single_box(),
            1 => slide(),
            2 => small_pile(),
            3 => high_pile(),
            4 => big_pile(),
            5 => stack(),
            6 => combo(),
            7 => tall_stack(),
            _ => small_pile(),
        };
        let parameters = Parameters::default();
        let system = System::new(bodies, parameters.seed);
        Self { system, parameters }
    }

    /// Build from a deserialized YAML scene description
    pub fn from_config(cfg: ScenarioConfig) -> Self {
        let bodies: Vec<Body> = cfg
            .bodies
            .iter()
            .map(|bc: &BodyConfig| {
                let orientation = match (&bc.axis, bc.angle) {
                    (Some(axis), Some(angle)) => NQuat::from_axis_angle(
                        &Unit::new_normalize(NVec3::new(axis[0], axis[1], axis[2])),
                        angle,
                    ),
                    _ => NQuat::identity(),
                };
                let color = bc.color.unwrap_or([0.1, 0.7, 0.1]);
                Body::new(
                    NVec3::new(bc.position[0], bc.position[1], bc.position[2]),
                    orientation,
                    BoxShape::from_size(NVec3::new(bc.size[0], bc.size[1], bc.size[2])),
                    bc.restitution,
                    bc.friction,
                    bc.inv_mass,
                    color,
                )
            })
            .collect();

        let parameters = Parameters {
            dt: cfg.parameters.dt,
            seed: cfg.parameters.seed,
        };
        let system = System::new(bodies, parameters.seed);
        Self { system, parameters }
    }
}

fn body(
    pos: NVec3,
    orientation: NQuat,
    size: NVec3,
    restitution: f64,
    friction: f64,
    inv_mass: f64,
    color: [f32; 3],
) -> Body {
    Body::new(
        pos,
        orientation,
        BoxShape::from_size(size),
        restitution,
        friction,
        inv_mass,
        color,
    )
}

fn quat_z(angle: f64) -> NQuat {
    NQuat::from_axis_angle(&NVec3::z_axis(), angle)
}

const FLOOR_COLOR: [f32; 3] = [1.0, 1.0, 0.5];
const GREEN: [f32; 3] = [0.1, 0.7, 0.1];

/// Scene 0: a lone box dropped onto a wide floor
fn single_box() -> Vec<Body> {
    let y = NVec3::y();
    vec![
        body(
            -0.5 * y,
            NQuat::identity(),
            NVec3::new(100.0, 1.0, 100.0),
            0.5,
            0.5,
            0.0,
            FLOOR_COLOR,
        ),
        body(
            5.0 * y,
            NQuat::identity(),
            NVec3::new(1.0, 1.0, 1.0),
            1.0,
            0.5,
            1.0,
            GREEN,
        ),
    ]
}

/// Scene 1: a box held by friction on a 30 degree incline
fn slide() -> Vec<Body> {
    let rot_ang = PI / 6.0;
    let center = NVec3::new(0.0, -10.0, 0.0);
    let x = NVec3::x();
    let y = NVec3::y();
    let (s, c) = (rot_ang.sin(), rot_ang.cos());

    vec![
        body(
            center,
            quat_z(rot_ang),
            NVec3::new(20.0, 20.0, 20.0),
            1.0,
            0.7,
            0.0,
            FLOOR_COLOR,
        ),
        body(
            center
                + (10.0 * (s + c) + 0.5 * (c - s) + 1.0e7 * EPSILON) * y
                + (10.0 * (c - s) - 0.5 * (s + c) + 1.0e7 * EPSILON) * x,
            quat_z(rot_ang),
            NVec3::new(1.0, 1.0, 1.0),
            1.0,
            1.0,
            1.0,
            GREEN,
        ),
    ]
}

/// Scene 2: about ten mixed boxes dropped into a loose pile
fn small_pile() -> Vec<Body> {
    let x = NVec3::x();
    let y = NVec3::y();
    let z = NVec3::z();
    let long = NVec3::new(2.0, 1.0, 1.0);
    let unit = NVec3::new(1.0, 1.0, 1.0);

    vec![
        body(
            -50.0 * y,
            NQuat::identity(),
            NVec3::new(100.0, 100.0, 100.0),
            0.6,
            0.5,
            0.0,
            FLOOR_COLOR,
        ),
        body(3.0 * y - 4.0 * x + 0.5 * z, NQuat::identity(), long, 1.0, 0.5, 0.5, GREEN),
        body(5.5 * y - 2.2 * x + z, NQuat::identity(), long, 1.0, 0.5, 0.5, GREEN),
        body(3.0 * y - x + 0.5 * z, quat_z(PI / 8.0), unit, 1.0, 0.5, 1.0, GREEN),
        body(1.7 * y - 1.5 * x, quat_z(PI / 4.0), unit, 1.0, 0.5, 1.0, GREEN),
        body(2.0 * y - 5.0 * x + 2.5 * z, NQuat::identity(), long, 1.0, 0.5, 0.5, GREEN),
        body(6.5 * y - 3.2 * x - z, NQuat::identity(), long, 1.0, 0.5, 0.5, GREEN),
        body(3.0 * y - 2.0 * x + 1.5 * z, quat_z(PI / 8.0), unit, 1.0, 0.5, 1.0, GREEN),
        body(4.7 * y - 3.5 * x, quat_z(PI / 4.0), unit, 1.0, 0.5, 1.0, GREEN),
    ]
}

/// Scene 3: the small-pile motif tiled into a tall falling block of piles
fn high_pile() -> Vec<Body> {
    let x = NVec3::x();
    let y = NVec3::y();
    let z = NVec3::z();
    let long = NVec3::new(2.0, 1.0, 1.0);
    let unit = NVec3::new(1.0, 1.0, 1.0);

    let mut bodies = vec![body(
        -500.0 * y,
        NQuat::identity(),
        NVec3::new(1000.0, 1000.0, 1000.0),
        0.6,
        0.5,
        0.0,
        FLOOR_COLOR,
    )];

    let iter = 2;
    for i in 0..iter {
        for k in 0..iter {
            for zz in 0..iter {
                let (fi, fk, fz) = (i as f64, k as f64, zz as f64);
                let lift = 18.0 * iter as f64 + (fi - 2.0) * 18.0;
                let dx = (fk - 2.0) * 7.5;
                let dz = (fz - 2.0) * 15.0;
                bodies.push(body(
                    (3.0 + lift) * y - (4.0 + dx) * x + (0.5 + dz) * z,
                    NQuat::identity(),
                    long,
                    1.0,
                    0.5,
                    0.5,
                    GREEN,
                ));
                bodies.push(body(
                    (5.0 + lift) * y - (1.2 + dx) * x + dz * z,
                    NQuat::identity(),
                    long,
                    1.0,
                    0.5,
                    0.5,
                    GREEN,
                ));
                bodies.push(body(
                    (3.0 + lift) * y - dx * x + (0.5 + dz) * z,
                    quat_z(PI / 8.0),
                    unit,
                    1.0,
                    0.5,
                    1.0,
                    GREEN,
                ));
                bodies.push(body(
                    (1.7 + lift) * y - (1.5 + dx) * x + dz * z,
                    quat_z(PI / 4.0),
                    unit,
                    1.0,
                    0.5,
                    1.0,
                    GREEN,
                ));
                bodies.push(body(
                    (2.0 + lift) * y - (5.0 + dx) * x + (2.5 + dz) * z,
                    NQuat::identity(),
                    long,
                    1.0,
                    0.5,
                    0.5,
                    GREEN,
                ));
                bodies.push(body(
                    (6.5 + lift) * y - (3.2 + dx) * x + dz * z,
                    NQuat::identity(),
                    long,
                    1.0,
                    0.5,
                    0.5,
                    GREEN,
                ));
                bodies.push(body(
                    (3.0 + lift) * y - (2.0 + dx) * x + (1.5 + dz) * z,
                    quat_z(PI / 8.0),
                    unit,
                    1.0,
                    0.5,
                    1.0,
                    GREEN,
                ));
                bodies.push(body(
                    (4.7 + lift) * y - (3.5 + dx) * x + dz * z,
                    quat_z(PI / 4.0),
                    unit,
                    1.0,
                    0.5,
                    1.0,
                    GREEN,
                ));
            }
        }
    }
    bodies
}

/// Scene 4: heavier boxes of mixed sizes tumbling onto each other
fn big_pile() -> Vec<Body> {
    let x = NVec3::x();
    let y = NVec3::y();
    let z = NVec3::z();
    let unit = NVec3::new(1.0, 1.0, 1.0);
    let tilt = NQuat::from_axis_angle(&Unit::new_normalize(NVec3::new(0.0, 1.0, 1.0)), PI / 6.0);

    vec![
        body(
            -50.0 * y,
            NQuat::identity(),
            NVec3::new(100.0, 100.0, 100.0),
            0.3,
            0.5,
            0.0,
            FLOOR_COLOR,
        ),
        body(5.0 * y + 2.5 * x + z, quat_z(PI / 6.0), unit, 0.7, 0.5, 1.0, [0.1, 0.8, 0.7]),
        body(4.5 * y + 2.0 * x - z, NQuat::identity(), unit, 0.7, 0.5, 1.0, [0.7, 0.0, 0.4]),
        body(4.5 * y + 3.3 * x - 0.5 * z, NQuat::identity(), unit, 0.7, 0.5, 1.0, [1.0, 0.4, 0.1]),
        body(8.0 * y + 2.5 * x + z, quat_z(PI / 6.0), unit, 0.7, 0.5, 1.0, [0.0, 0.4, 0.2]),
        body(7.0 * y + 2.0 * x - z, tilt, unit, 0.7, 0.5, 1.0, [0.0, 0.1, 0.7]),
        body(7.5 * y + 3.3 * x - 0.5 * z, NQuat::identity(), unit, 0.7, 0.5, 1.0, [0.3, 0.3, 0.3]),
        body(
            3.5 * y + x,
            NQuat::identity(),
            NVec3::new(2.0, 1.0, 3.0),
            0.7,
            0.5,
            1.0 / 6.0,
            GREEN,
        ),
        body(
            1.5 * y + 2.0 * x,
            NQuat::identity(),
            NVec3::new(2.0, 2.0, 2.0),
            0.7,
            0.5,
            0.125,
            GREEN,
        ),
        body(
            6.0 * y + 3.0 * x,
            quat_z(PI / 2.5),
            NVec3::new(1.0, 2.0, 2.0),
            0.7,
            0.5,
            0.25,
            GREEN,
        ),
    ]
}

/// Scene 5: boxes landing on a plank balanced on a pillar
fn stack() -> Vec<Body> {
    let x = NVec3::x();
    let y = NVec3::y();
    let z = NVec3::z();
    let unit = NVec3::new(1.0, 1.0, 1.0);

    vec![
        body(
            -100.0 * y,
            NQuat::identity(),
            NVec3::new(200.0, 200.0, 200.0),
            0.3,
            0.5,
            0.0,
            FLOOR_COLOR,
        ),
        body(9.5 * y + 2.5 * x + 2.5 * z, NQuat::identity(), unit, 0.4, 0.5, 1.0, [0.1, 0.8, 0.7]),
        body(10.7 * y + 2.0 * x + z, NQuat::identity(), unit, 0.4, 0.5, 1.0, [0.7, 0.0, 0.4]),
        body(9.5 * y + 2.3 * x + z, NQuat::identity(), unit, 0.4, 0.5, 1.0, [1.0, 0.4, 0.1]),
        body(9.5 * y + 1.2 * x + z, NQuat::identity(), unit, 0.4, 0.5, 1.0, [0.6, 0.4, 0.4]),
        body(
            9.5 * y + 2.5 * x - z,
            NQuat::identity(),
            NVec3::new(1.5, 1.5, 1.5),
            0.7,
            0.5,
            1.0 / 3.375,
            [0.0, 0.4, 0.2],
        ),
        body(
            50.0 * y + 2.0 * x - 4.5 * z,
            NQuat::identity(),
            NVec3::new(2.0, 2.0, 2.0),
            0.7,
            0.5,
            0.125,
            [0.3, 0.3, 0.3],
        ),
        body(
            8.5 * y + 2.0 * x - z,
            NQuat::identity(),
            NVec3::new(4.0, 0.3, 10.0),
            0.4,
            0.5,
            1.0 / 6.0,
            GREEN,
        ),
        body(
            4.1 * y + 2.0 * x,
            NQuat::identity(),
            NVec3::new(2.0, 8.0, 2.0),
            0.4,
            0.5,
            1.0 / 32.0,
            GREEN,
        ),
    ]
}

/// Scene 6: two fixed ramps funneling rows of boxes toward each other
fn combo() -> Vec<Body> {
    let center = NVec3::new(5.0, 10.0, 0.0);
    let x = NVec3::x();
    let y = NVec3::new(0.0, 1.0 + 100.0 * EPSILON, 0.0);
    let z = NVec3::z();
    let s2 = 2.0_f64.sqrt();
    let base = 5.0 * (s2 - 1.0);
    let q = quat_z(PI / 4.0);
    let unit = NVec3::new(1.0, 1.0, 1.0);
    let orange = [1.0, 0.7, 0.1];

    let mut bodies = vec![
        body(
            center - 110.0 * y,
            NQuat::identity(),
            NVec3::new(200.0, 200.0, 200.0),
            0.4,
            0.5,
            0.0,
            FLOOR_COLOR,
        ),
        body(
            center - (3.0 + 5.0 * s2 - 14.75 / s2) * y + (3.0 - 4.75 / s2) * x,
            quat_z(PI / 4.0),
            NVec3::new(10.0, 0.5, 10.0),
            0.4,
            0.5,
            0.0,
            [0.7, 0.0, 0.0],
        ),
        body(
            center - (3.0 + 5.0 * s2 - 14.75 / s2) * y - (10.0 + 3.25 / s2) * x,
            quat_z(-PI / 4.0),
            NVec3::new(10.0, 0.5, 10.0),
            0.4,
            0.5,
            0.0,
            [0.0, 0.2, 0.7],
        ),
    ];

    // right-hand rows
    bodies.push(body(center + (base + 2.0) * y - (0.5 * s2 - 3.0) * x + 2.0 * z, q, unit, 0.7, 0.5, 1.0, GREEN));
    bodies.push(body(center + (base + 0.7) * y - (0.5 * s2 - 1.7) * x + 1.5 * z, q, unit, 0.7, 0.5, 1.0, GREEN));
    bodies.push(body(
        center + (base + 1.7) * y - (0.5 * s2 - 2.7) * x - 2.0 * z,
        q,
        NVec3::new(1.7, 1.0, 1.0),
        0.7,
        0.5,
        1.0,
        GREEN,
    ));
    bodies.push(body(center + (base + 0.5) * y - (0.5 * s2 - 1.5) * x - 1.5 * z, q, unit, 0.7, 0.5, 1.0, GREEN));
    bodies.push(body(center + (base + 2.0) * y - (0.5 * s2 - 3.0) * x, q, unit, 0.7, 0.5, 1.0, GREEN));
    bodies.push(body(
        center + (base + 1.0) * y - (0.5 * s2 - 2.0) * x,
        q,
        NVec3::new(1.0, 1.0, 1.5),
        0.7,
        0.5,
        1.0,
        GREEN,
    ));
    bodies.push(body(center + (base + 5.5) * y - (0.5 * s2 - 3.0) * x + 2.0 * z, q, unit, 0.7, 0.5, 1.0, GREEN));
    bodies.push(body(
        center + (base + 5.2) * y - (0.5 * s2 - 2.7) * x - 2.0 * z,
        q,
        NVec3::new(1.7, 1.0, 1.0),
        0.7,
        0.5,
        1.0,
        GREEN,
    ));
    bodies.push(body(center + (base + 5.5) * y - (0.5 * s2 - 3.0) * x, q, unit, 0.7, 0.5, 1.0, GREEN));

    // left-hand rows
    bodies.push(body(center + (base + 2.0) * y - (3.5 * s2 + 10.0) * x + 2.0 * z, q, unit, 0.7, 0.5, 1.0, orange));
    bodies.push(body(center + (base + 1.5) * y - (3.5 * s2 + 9.5) * x - 1.5 * z, q, unit, 0.7, 0.5, 1.0, orange));
    bodies.push(body(
        center + (base + 0.8) * y - (3.5 * s2 + 8.8) * x + 2.0 * z,
        q,
        NVec3::new(1.0, 1.7, 1.0),
        0.7,
        0.5,
        1.0,
        orange,
    ));
    bodies.push(body(center + (base + 0.5) * y - (3.5 * s2 + 8.5) * x - 1.5 * z, q, unit, 0.7, 0.5, 1.0, orange));
    bodies.push(body(center + (base + 2.0) * y - (3.5 * s2 + 10.0) * x, q, unit, 0.7, 0.5, 1.0, orange));
    bodies.push(body(
        center + (base + 1.0) * y - (3.5 * s2 + 9.0) * x,
        q,
        NVec3::new(1.0, 1.0, 1.5),
        0.7,
        0.5,
        1.0,
        orange,
    ));
    bodies.push(body(center + (base + 5.0) * y - (3.5 * s2 + 9.5) * x - 1.5 * z, q, unit, 0.7, 0.5, 1.0, orange));
    bodies.push(body(
        center + (base + 4.3) * y - (3.5 * s2 + 8.8) * x + 2.0 * z,
        q,
        NVec3::new(1.0, 1.7, 1.0),
        0.7,
        0.5,
        1.0,
        orange,
    ));
    bodies.push(body(
        center + (base + 4.5) * y - (3.5 * s2 + 9.0) * x,
        q,
        NVec3::new(1.0, 1.0, 1.5),
        0.7,
        0.5,
        1.0,
        orange,
    ));

    bodies
}

/// Scene 7: three unit boxes stacked with a slight stagger
fn tall_stack() -> Vec<Body> {
    let x = NVec3::x();
    let y = NVec3::y();
    let box_height = 1.0;

    let mut bodies = vec![body(
        -0.5 * y,
        NQuat::identity(),
        NVec3::new(200.0, 1.0, 200.0),
        0.3,
        0.5,
        0.0,
        FLOOR_COLOR,
    )];

    for i in 0..3 {
        let fi = i as f64;
        bodies.push(body(
            ((0.5 + 1.0e4 * EPSILON) * box_height + (box_height + 1.0e4 * EPSILON) * fi) * y
                + (i % 2) as f64 * 0.1 * x,
            NQuat::identity(),
            NVec3::new(1.0, 1.0, 1.0),
            0.4,
            0.5,
            1.0,
            [
                (i % 5) as f32 / 15.0 + 0.67,
                (i % 4) as f32 / 12.0 + 0.67,
                (i % 2) as f32 / 6.0 + 0.67,
            ],
        ));
    }
    bodies
}
