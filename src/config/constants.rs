// Tuning constants for the spacetime scene and the drop simulation
use crate::math::Real;

// Curvature field
pub const CURVATURE_GAIN: Real = 2.0;
pub const MIN_DISTANCE_SQ: Real = 0.01;
pub const DEPTH_SCALE: Real = 2.0;
pub const WAVE_TIME_RATE: Real = 0.5;
pub const WAVE_RADIAL_RATE: Real = 0.5;
pub const COLOR_MIX_GAIN: Real = 0.5;

// Mass sources
pub const MAX_ADDITIONAL_MASSES: usize = 2;
pub const MAX_MASS_SOURCES: usize = 1 + MAX_ADDITIONAL_MASSES;
pub const CENTRAL_MASS_POSITION: [Real; 3] = [0.0, -1.5, 0.0];
pub const MIN_MASS_STRENGTH: Real = 0.4;
pub const MAX_PLANET_MASS_STRENGTH: Real = 6.0;
pub const MAX_BLACK_HOLE_MASS_STRENGTH: Real = 12.0;
pub const BLACK_HOLE_MIN_STRENGTH: Real = 8.0;
pub const ADDITIONAL_MASS_EXTENT: Real = 10.0;
pub const ADDITIONAL_MASS_SPAWN_EXTENT: Real = 5.0;
pub const MIN_ADDITIONAL_STRENGTH: Real = 0.1;
pub const MAX_ADDITIONAL_STRENGTH: Real = 5.0;

// Grid surface
pub const GRID_EXTENT: Real = 50.0;
pub const SURFACE_Y_OFFSET: Real = -2.0;
pub const MIN_GRID_RESOLUTION: u32 = 50;
pub const MAX_GRID_RESOLUTION: u32 = 300;
pub const MIN_GRID_FREQUENCY: Real = 5.0;
pub const MAX_GRID_FREQUENCY: Real = 50.0;
pub const MAX_WAVE_AMPLITUDE: Real = 0.5;
pub const SURFACE_ALPHA: Real = 0.2;
/// Alpha of the overlay grid lines drawn over the surface.
pub const GRID_LINE_ALPHA: Real = 0.95;

// Clock
pub const MIN_TIME_SCALE: Real = 0.1;
pub const MAX_TIME_SCALE: Real = 3.0;

// Orbiting bodies
pub const MAX_PLANETS: usize = 5;
pub const MIN_PLANETS: usize = 1;
pub const ORBIT_SMOOTHING: Real = 0.15;
pub const ORBIT_BASE_RADIUS: Real = 3.0;
pub const ORBIT_RADIUS_STEP: Real = 2.0;
pub const ORBIT_BASE_SPEED: Real = 0.5;
pub const WOBBLE_RATE: Real = 2.0;
pub const WOBBLE_GAIN: Real = 0.04;
pub const ORBIT_PATH_SEGMENTS: usize = 96;
/// Height of a body's name label above its orbit plane, on top of its size.
pub const LABEL_LIFT: Real = 0.9;
pub const PLANET_BASE_SIZE: Real = 0.32;
pub const PLANET_SIZE_STEP: Real = 0.12;
pub const CENTRAL_BODY_SIZE: Real = 1.2;
pub const ACCRETION_DISK_SPIN: Real = 0.35;

// Free fall
pub const RESTITUTION: Real = 0.4;
pub const MAX_RESTITUTION: Real = 0.95;
pub const SQUASH_BASE: Real = 0.2;
pub const SQUASH_IMPACT_GAIN: Real = 0.5;
pub const SQUASH_DECAY_RATE: Real = 1.5;
pub const SETTLE_SPEED: Real = 0.5;
pub const TERMINAL_CLAMP_RATIO: Real = 0.99;
pub const FRONTAL_AREA_SCALE: Real = 0.01;
pub const WIND_X_GAIN: Real = 0.001;
pub const WIND_Z_GAIN: Real = 0.0005;
pub const WIND_X_RATE: Real = 2.0;
pub const WIND_Z_RATE: Real = 3.0;
pub const TRAIL_LENGTH: usize = 24;
pub const MIN_DROP_HEIGHT: Real = 10.0;
pub const MAX_DROP_HEIGHT: Real = 200.0;
pub const MIN_BODY_MASS: Real = 1.0;
pub const MAX_BODY_MASS: Real = 100.0;
pub const MAX_GRAVITY: Real = 30.0;
pub const MAX_WIND_FORCE: Real = 50.0;

// Infall demo
pub const INFALL_START: [Real; 3] = [5.0, 5.0, 5.0];
pub const INFALL_TARGET_LIFT: Real = 0.4;
pub const INFALL_RATE: Real = 0.5;
