pub mod simulation;
pub mod configuration;
pub mod visualization;
pub mod benchmark;

pub use simulation::states::{Body, ContactInfo, NMat3, NQuat, NVec3, System};
pub use simulation::shape::BoxShape;
pub use simulation::intersect::{intersect, Contact};
pub use simulation::integrator::{integrate_pos, integrate_vel};
pub use simulation::stepper::tick;
pub use simulation::params::Parameters;
pub use simulation::scenario::{Scenario, DEFAULT_SCENE};

pub use configuration::config::{BodyConfig, ParametersConfig, ScenarioConfig};

pub use visualization::rbsim_vis3d::run_3d;

pub use benchmark::benchmark::{bench_intersect, bench_tick};
