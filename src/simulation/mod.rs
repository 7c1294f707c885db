pub mod states;
pub mod params;
pub mod shape;
pub mod intersect;
pub mod integrator;
pub mod collide;
pub mod contact;
pub mod stepper;
pub mod scenario;
