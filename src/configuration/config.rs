//! Configuration types for loading scenes from YAML.
//!
//! This module defines a thin, `serde`-deserializable representation of a
//! scene. A scene consists of:
//!
//! - [`ParametersConfig`] – numerical parameters (step size, shuffle seed)
//! - [`BodyConfig`]       – initial state for each body
//! - [`ScenarioConfig`]   – top-level wrapper used to load a scene from YAML
//!
//! # YAML format
//! An example scene YAML matching these types:
//!
//! ```yaml
//! parameters:
//!   dt: 0.005               # fixed step size in seconds
//!   seed: 42                # seed for the tick-boundary body shuffle
//!
//! bodies:
//!   - position: [ 0.0, -0.5, 0.0 ]
//!     size: [ 100.0, 1.0, 100.0 ]
//!     restitution: 0.5
//!     friction: 0.5
//!     inv_mass: 0.0         # 0 marks an immovable body
//!     color: [ 1.0, 1.0, 0.5 ]
//!   - position: [ 0.0, 5.0, 0.0 ]
//!     axis: [ 0.0, 0.0, 1.0 ]
//!     angle: 0.3926990817   # radians about axis
//!     size: [ 1.0, 1.0, 1.0 ]
//!     restitution: 1.0
//!     friction: 0.5
//!     inv_mass: 1.0
//! ```
//!
//! The engine maps this configuration into its runtime scenario
//! representation; sizes are full edge lengths, halved internally.

use serde::Deserialize;

/// Numerical parameters for a scene
#[derive(Deserialize, Debug, Clone)]
pub struct ParametersConfig {
    pub dt: f64,   // fixed step size
    pub seed: u64, // deterministic seed to make runs reproducable
}

/// Configuration for a single body's initial state
#[derive(Deserialize, Debug)]
pub struct BodyConfig {
    pub position: Vec<f64>,        // center of mass in world space
    pub axis: Option<Vec<f64>>,    // rotation axis (with `angle`); absent = identity
    pub angle: Option<f64>,        // rotation angle in radians
    pub size: Vec<f64>,            // full edge lengths of the box
    pub restitution: f64,          // bounciness in [0, 1]
    pub friction: f64,             // Coulomb friction coefficient
    pub inv_mass: f64,             // inverse mass; 0 marks an immovable body
    pub color: Option<[f32; 3]>,   // cosmetic color for the viewer
}

/// Top-level scene configuration loaded from YAML.
#[derive(Deserialize, Debug)]
pub struct ScenarioConfig {
    pub parameters: ParametersConfig, // numerical parameters
    pub bodies: Vec<BodyConfig>,      // initial state of the system
}
