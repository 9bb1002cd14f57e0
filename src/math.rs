use bevy::math::{Vec2, Vec3};

pub type Real = f32;

pub type Vector = Vec3;
pub type PlanePoint = Vec2;

#[inline(always)]
pub fn zero_vector() -> Vector {
    Vec3::ZERO
}

/// Project a world-space point onto the horizontal (x, z) plane.
#[inline(always)]
pub fn plane_point(position: Vector) -> PlanePoint {
    Vec2::new(position.x, position.z)
}

#[inline(always)]
pub fn distance_xz_squared(point: PlanePoint, position: Vector) -> Real {
    point.distance_squared(plane_point(position))
}

#[inline(always)]
pub fn lerp_vector(from: Vector, to: Vector, factor: Real) -> Vector {
    from.lerp(to, factor)
}

#[inline(always)]
pub fn vector_is_finite(v: Vector) -> bool {
    v.is_finite()
}

/// Clamp `value` into `[min, max]`, replacing NaN and infinities with `fallback`.
#[inline]
pub fn clamp_finite(value: Real, min: Real, max: Real, fallback: Real) -> Real {
    if value.is_finite() {
        value.clamp(min, max)
    } else {
        fallback
    }
}

/// Scalar linear interpolation, `factor` is not clamped.
#[inline(always)]
pub fn lerp(from: Real, to: Real, factor: Real) -> Real {
    from + (to - from) * factor
}
