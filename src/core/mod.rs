pub mod clock;
pub mod mass_source;

pub use clock::SimulationClock;
pub use mass_source::{MassSource, MassSourceSet};
