//! apexline-geom: sampled curve and track primitives (sans-IO).
//!
//! Provides the geometry the planner builds on: a [`SampledCurve`] with
//! closest-point projection and discrete curvature, Catmull-Rom
//! refitting, and a [`Track`] (centerline plus left/right boundaries).
//! This crate has **no I/O dependencies** -- it operates on in-memory
//! point sets and returns structured data.

pub mod curve;
mod spline;
pub mod track;
pub mod types;

pub use curve::SampledCurve;
pub use track::Track;
pub use types::{GeomError, Point, Polyline};
