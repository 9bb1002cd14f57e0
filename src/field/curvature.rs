//! Curvature field evaluated on the grid plane
//!
//! Each mass source contributes `strength * K / max(d_xz^2, eps)`. The sum
//! sinks the surface and drives the color gradient.

use bevy::color::Mix;
use bevy::prelude::*;

use crate::config::{
    COLOR_MIX_GAIN, CURVATURE_GAIN, DEPTH_SCALE, MAX_MASS_SOURCES, MIN_DISTANCE_SQ,
    WAVE_RADIAL_RATE, WAVE_TIME_RATE,
};
use crate::core::MassSource;
use crate::field::ColorScheme;
use crate::math::{PlanePoint, Real, distance_xz_squared};

/// Everything the surface needs to know about one point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldSample {
    pub curvature: Real,
    pub height: Real,
    pub color_mix: Real,
}

#[inline(always)]
pub fn source_curvature(point: PlanePoint, source: &MassSource) -> Real {
    let distance_sq = distance_xz_squared(point, source.position).max(MIN_DISTANCE_SQ);
    source.strength * CURVATURE_GAIN / distance_sq
}

/// Sum over at most [`MAX_MASS_SOURCES`] sources.
#[inline]
pub fn total_curvature(point: PlanePoint, sources: &[MassSource]) -> Real {
    sources
        .iter()
        .take(MAX_MASS_SOURCES)
        .map(|source| source_curvature(point, source))
        .sum()
}

/// Ripple travelling outward from the origin.
#[inline(always)]
pub fn wave(time: Real, radius: Real, amplitude: Real) -> Real {
    (time * WAVE_TIME_RATE + radius * WAVE_RADIAL_RATE).sin() * amplitude
}

#[inline(always)]
pub fn displaced_height(curvature: Real, point: PlanePoint, time: Real, amplitude: Real) -> Real {
    -curvature * DEPTH_SCALE - wave(time, point.length(), amplitude) * curvature
}

#[inline(always)]
pub fn color_mix_factor(curvature: Real) -> Real {
    (curvature * COLOR_MIX_GAIN).clamp(0.0, 1.0)
}

pub fn evaluate(
    point: PlanePoint,
    sources: &[MassSource],
    time: Real,
    wave_amplitude: Real,
) -> FieldSample {
    let curvature = total_curvature(point, sources);
    FieldSample {
        curvature,
        height: displaced_height(curvature, point, time, wave_amplitude),
        color_mix: color_mix_factor(curvature),
    }
}

/// Gradient color for a given curvature, mixed in linear space.
pub fn surface_color(curvature: Real, scheme: ColorScheme) -> LinearRgba {
    let (flat, deep) = scheme.colors();
    LinearRgba::from(flat).mix(&LinearRgba::from(deep), color_mix_factor(curvature))
}
