//! Procedural geometry for the four primitive meshes the scene is built from.
//!
//! Conventions: the box is a unit cube centered on the origin, the plane
//! spans -1..1 on X and Z, and both cylinders stand on the XZ plane with
//! their base at `y = 0` and their top at `y = 1`.

use std::f32::consts::TAU;

use bytemuck::{Pod, Zeroable};
use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Number of segments used around the cylinder circumference.
pub const CYLINDER_SEGMENTS: u32 = 36;

/// Radius of the tapered cylinder's top ring (the base radius is 1).
pub const TAPERED_TOP_RADIUS: f32 = 0.5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MeshKind {
    Box,
    Cylinder,
    TaperedCylinder,
    Plane,
}

impl MeshKind {
    pub const ALL: [MeshKind; 4] = [
        MeshKind::Plane,
        MeshKind::Cylinder,
        MeshKind::TaperedCylinder,
        MeshKind::Box,
    ];

    pub fn name(self) -> &'static str {
        match self {
            MeshKind::Box => "box",
            MeshKind::Cylinder => "cylinder",
            MeshKind::TaperedCylinder => "tapered-cylinder",
            MeshKind::Plane => "plane",
        }
    }

    pub fn build(self) -> MeshData {
        match self {
            MeshKind::Box => unit_box(),
            MeshKind::Cylinder => frustum(1.0, 1.0, CYLINDER_SEGMENTS),
            MeshKind::TaperedCylinder => frustum(1.0, TAPERED_TOP_RADIUS, CYLINDER_SEGMENTS),
            MeshKind::Plane => plane(),
        }
    }
}

#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct MeshVertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub uv: [f32; 2],
}

#[derive(Debug, Clone, Default)]
pub struct MeshData {
    pub vertices: Vec<MeshVertex>,
    pub indices: Vec<u32>,
}

impl MeshData {
    fn push(&mut self, position: Vec3, normal: Vec3, uv: [f32; 2]) -> u32 {
        let index = self.vertices.len() as u32;
        self.vertices.push(MeshVertex {
            position: position.to_array(),
            normal: normal.to_array(),
            uv,
        });
        index
    }
}

fn unit_box() -> MeshData {
    // (normal, tangent u, tangent v) per face; corners are n/2 +- u/2 +- v/2.
    let faces = [
        (Vec3::Z, Vec3::X, Vec3::Y),
        (Vec3::NEG_Z, Vec3::NEG_X, Vec3::Y),
        (Vec3::NEG_X, Vec3::Z, Vec3::Y),
        (Vec3::X, Vec3::NEG_Z, Vec3::Y),
        (Vec3::Y, Vec3::X, Vec3::NEG_Z),
        (Vec3::NEG_Y, Vec3::X, Vec3::Z),
    ];

    let mut data = MeshData::default();
    for (normal, u, v) in faces {
        let center = normal * 0.5;
        let corners = [
            (center - u * 0.5 - v * 0.5, [0.0, 0.0]),
            (center + u * 0.5 - v * 0.5, [1.0, 0.0]),
            (center + u * 0.5 + v * 0.5, [1.0, 1.0]),
            (center - u * 0.5 + v * 0.5, [0.0, 1.0]),
        ];
        let base = data.vertices.len() as u32;
        for (position, uv) in corners {
            data.push(position, normal, uv);
        }
        data.indices
            .extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
    }
    data
}

fn plane() -> MeshData {
    let mut data = MeshData::default();
    let corners = [
        (Vec3::new(-1.0, 0.0, 1.0), [0.0, 0.0]),
        (Vec3::new(1.0, 0.0, 1.0), [1.0, 0.0]),
        (Vec3::new(1.0, 0.0, -1.0), [1.0, 1.0]),
        (Vec3::new(-1.0, 0.0, -1.0), [0.0, 1.0]),
    ];
    for (position, uv) in corners {
        data.push(position, Vec3::Y, uv);
    }
    data.indices.extend_from_slice(&[0, 1, 2, 0, 2, 3]);
    data
}

/// Capped cylinder whose radius goes from `bottom_radius` at `y = 0` to
/// `top_radius` at `y = 1`.
fn frustum(bottom_radius: f32, top_radius: f32, segments: u32) -> MeshData {
    let segments = segments.max(3);
    let slope = bottom_radius - top_radius;
    let mut data = MeshData::default();

    // Side wall; the seam column is duplicated so u can run 0..1.
    let side_base = data.vertices.len() as u32;
    for i in 0..=segments {
        let t = i as f32 / segments as f32;
        let (sin, cos) = (t * TAU).sin_cos();
        let normal = Vec3::new(cos, slope, sin).normalize();
        data.push(
            Vec3::new(cos * bottom_radius, 0.0, sin * bottom_radius),
            normal,
            [t, 0.0],
        );
        data.push(
            Vec3::new(cos * top_radius, 1.0, sin * top_radius),
            normal,
            [t, 1.0],
        );
    }
    for i in 0..segments {
        let b0 = side_base + i * 2;
        let t0 = b0 + 1;
        let b1 = b0 + 2;
        let t1 = b0 + 3;
        data.indices.extend_from_slice(&[b0, t0, b1, b1, t0, t1]);
    }

    push_cap(&mut data, 1.0, top_radius, Vec3::Y, segments);
    push_cap(&mut data, 0.0, bottom_radius, Vec3::NEG_Y, segments);
    data
}

fn push_cap(data: &mut MeshData, y: f32, radius: f32, normal: Vec3, segments: u32) {
    let center = data.push(Vec3::new(0.0, y, 0.0), normal, [0.5, 0.5]);
    for i in 0..segments {
        let (sin, cos) = (i as f32 / segments as f32 * TAU).sin_cos();
        data.push(
            Vec3::new(cos * radius, y, sin * radius),
            normal,
            [0.5 + 0.5 * cos, 0.5 + 0.5 * sin],
        );
    }
    for i in 0..segments {
        let current = center + 1 + i;
        let next = center + 1 + (i + 1) % segments;
        if normal.y > 0.0 {
            data.indices.extend_from_slice(&[center, next, current]);
        } else {
            data.indices.extend_from_slice(&[center, current, next]);
        }
    }
}
