//! Bevy 3D viewer for a running scenario
//!
//! The viewer is a thin display loop around the core: startup spawns one
//! cuboid entity per body, every frame steps the physics once and copies
//! body poses onto entity transforms. Space resets the world to its spawn
//! state, Escape or Q quits. The core itself never learns what a window is.

use bevy::app::AppExit;
use bevy::math::primitives::Cuboid;
use bevy::prelude::*;

use crate::simulation::scenario::Scenario;
use crate::simulation::states::Body;
use crate::simulation::stepper::tick;

/// Component tagging each cuboid with the stable id of its body. The body
/// vector is permuted between ticks, so entities map to bodies by id, not
/// by slot.
#[derive(Component)]
struct BodyId(pub usize);

/// Camera placement, looking at the origin
const CAMERA_POS: Vec3 = Vec3::new(0.0, 12.0, -30.0);

/// Convenience entrypoint: hand a scenario to a Bevy app and run it
pub fn run_3d(scenario: Scenario) {
    println!(
        "run_3d: starting Bevy viewer with {} bodies",
        scenario.system.num_bodies()
    );

    App::new()
        .insert_resource(scenario)
        .add_plugins(DefaultPlugins)
        .add_systems(Startup, setup_3d)
        .add_systems(Update, (physics_step, sync_transforms, keyboard))
        .run();
}

fn body_transform(b: &Body) -> Transform {
    let q = b.orientation.into_inner();
    Transform {
        translation: Vec3::new(
            b.position.x as f32,
            b.position.y as f32,
            b.position.z as f32,
        ),
        rotation: Quat::from_xyzw(q.i as f32, q.j as f32, q.k as f32, q.w as f32),
        ..Default::default()
    }
}

/// Startup system: spawn camera, light, and one cuboid per body
fn setup_3d(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    scenario: Res<Scenario>,
) {
    commands.spawn(Camera3dBundle {
        camera: Camera {
            clear_color: ClearColorConfig::Custom(Color::srgb(0.0, 0.0, 0.0)),
            ..Default::default()
        },
        transform: Transform::from_translation(CAMERA_POS).looking_at(Vec3::ZERO, Vec3::Y),
        ..Default::default()
    });

    commands.spawn(PointLightBundle {
        point_light: PointLight {
            intensity: 5_000_000.0,
            range: 500.0,
            ..Default::default()
        },
        transform: Transform::from_xyz(5.0, 50.0, 5.0),
        ..Default::default()
    });

    for b in scenario.system.bodies.iter() {
        let size = b.shape.size();
        commands.spawn((
            PbrBundle {
                mesh: meshes.add(Cuboid::new(size.x as f32, size.y as f32, size.z as f32).mesh()),
                material: materials.add(StandardMaterial {
                    base_color: Color::srgb(b.color[0], b.color[1], b.color[2]),
                    ..Default::default()
                }),
                transform: body_transform(b),
                ..Default::default()
            },
            BodyId(b.id),
        ));
    }
}

/// Per-frame physics step
fn physics_step(mut scenario: ResMut<Scenario>) {
    let Scenario {
        system, parameters, ..
    } = &mut *scenario;
    tick(system, parameters);
}

/// Copy body poses onto the cuboid entities
fn sync_transforms(scenario: Res<Scenario>, mut query: Query<(&BodyId, &mut Transform)>) {
    for (BodyId(id), mut transform) in &mut query {
        if let Some(b) = scenario.system.bodies.iter().find(|b| b.id == *id) {
            *transform = body_transform(b);
        }
    }
}

/// Space resets the world, Escape/Q quits
fn keyboard(
    keys: Res<ButtonInput<KeyCode>>,
    mut scenario: ResMut<Scenario>,
    mut exit: EventWriter<AppExit>,
) {
    if keys.just_pressed(KeyCode::Space) {
        scenario.system.reset();
    }
    if keys.just_pressed(KeyCode::Escape) || keys.just_pressed(KeyCode::KeyQ) {
        exit.send(AppExit::Success);
    }
}
