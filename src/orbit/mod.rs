pub mod controller;

pub use controller::{OrbitingBody, OrbitingBodyController};
