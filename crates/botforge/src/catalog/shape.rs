//! Shorthand constructors for the primitive vocabulary.

use std::f64::consts::{PI, TAU};

use botforge_ir::{Primitive, Vec3};

/// Tessellation hint used by round shapes.
pub const SEGMENTS: u32 = 32;

/// Box with the given extents.
pub fn cuboid(x: f64, y: f64, z: f64) -> Primitive {
    Primitive::Box {
        size: Vec3::new(x, y, z),
    }
}

/// Sphere.
pub fn ball(radius: f64) -> Primitive {
    Primitive::Sphere {
        radius,
        segments: SEGMENTS,
    }
}

/// Upper hemisphere.
pub fn dome(radius: f64) -> Primitive {
    Primitive::Dome {
        radius,
        segments: SEGMENTS,
    }
}

/// Straight cylinder along Y.
pub fn rod(radius: f64, height: f64) -> Primitive {
    taper(radius, radius, height)
}

/// Cylinder along Y with different cap radii.
pub fn taper(radius_top: f64, radius_bottom: f64, height: f64) -> Primitive {
    Primitive::Cylinder {
        radius_top,
        radius_bottom,
        height,
        segments: SEGMENTS,
    }
}

/// Cone along Y, apex up.
pub fn cone(radius: f64, height: f64) -> Primitive {
    Primitive::Cone {
        radius,
        height,
        segments: SEGMENTS,
    }
}

/// Full torus in the XY plane.
pub fn ring(radius: f64, tube: f64) -> Primitive {
    arc(radius, tube, TAU)
}

/// Upward-bulging half torus in the XY plane.
pub fn half_ring(radius: f64, tube: f64) -> Primitive {
    arc(radius, tube, PI)
}

/// Torus arc starting on +X.
pub fn arc(radius: f64, tube: f64, angle: f64) -> Primitive {
    Primitive::Torus {
        radius,
        tube,
        arc: angle,
        segments: SEGMENTS,
    }
}

/// Capsule along Y.
pub fn capsule(radius: f64, length: f64) -> Primitive {
    Primitive::Capsule {
        radius,
        length,
        segments: SEGMENTS,
    }
}

/// Flat rectangle facing +Z.
pub fn plane(width: f64, height: f64) -> Primitive {
    Primitive::Plane { width, height }
}

/// Flat disc facing +Z.
pub fn disc(radius: f64) -> Primitive {
    Primitive::Circle {
        radius,
        segments: SEGMENTS,
    }
}

/// Regular octahedron.
pub fn octahedron(radius: f64) -> Primitive {
    Primitive::Octahedron { radius }
}
