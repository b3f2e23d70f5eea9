//! Geometry builders reused across verses

use crate::color::Rgba;
use crate::scene::Geometry;
use glam::Vec3;
use std::f32::consts::{PI, TAU};

/// Circle in the plane spanned by `u` and `v`
fn ring_points(center: Vec3, radius: f32, u: Vec3, v: Vec3, segments: usize) -> Vec<Vec3> {
    (0..segments)
        .map(|i| {
            let a = i as f32 / segments as f32 * TAU;
            center + (u * a.cos() + v * a.sin()) * radius
        })
        .collect()
}

fn closed_loop_edges(offset: u32, count: u32) -> impl Iterator<Item = [u32; 2]> {
    (0..count).map(move |i| [offset + i, offset + (i + 1) % count])
}

/// Closed circle in the XZ plane
pub fn circle(radius: f32, segments: usize, color: Rgba) -> Geometry {
    let positions = ring_points(Vec3::ZERO, radius, Vec3::X, Vec3::Z, segments);
    let edges = closed_loop_edges(0, segments as u32).collect();
    Geometry::lines(positions, edges, color)
}

/// Ellipse in the XY plane with semi-axes `a` (x) and `b` (y)
pub fn ellipse(a: f32, b: f32, segments: usize, color: Rgba) -> Geometry {
    let positions = ring_points(Vec3::ZERO, 1.0, Vec3::X * a, Vec3::Y * b, segments);
    let edges = closed_loop_edges(0, segments as u32).collect();
    Geometry::lines(positions, edges, color)
}

/// Wireframe sphere from latitude rings and meridians
pub fn wire_sphere(
    radius: f32,
    rings: usize,
    meridians: usize,
    segments: usize,
    color: Rgba,
) -> Geometry {
    let mut positions = Vec::new();
    let mut edges = Vec::new();

    for r in 1..rings {
        let lat = PI * r as f32 / rings as f32 - PI / 2.0;
        let offset = positions.len() as u32;
        positions.extend(ring_points(
            Vec3::new(0.0, radius * lat.sin(), 0.0),
            radius * lat.cos(),
            Vec3::X,
            Vec3::Z,
            segments,
        ));
        edges.extend(closed_loop_edges(offset, segments as u32));
    }

    for m in 0..meridians {
        let lon = PI * m as f32 / meridians as f32;
        let offset = positions.len() as u32;
        let u = Vec3::new(lon.cos(), 0.0, lon.sin());
        positions.extend(ring_points(Vec3::ZERO, radius, u, Vec3::Y, segments));
        edges.extend(closed_loop_edges(offset, segments as u32));
    }

    Geometry::lines(positions, edges, color)
}

/// Wireframe box centred at the origin
pub fn wire_box(half_extent: Vec3, color: Rgba) -> Geometry {
    let h = half_extent;
    let positions: Vec<Vec3> = (0..8)
        .map(|i| {
            Vec3::new(
                if i & 1 == 0 { -h.x } else { h.x },
                if i & 2 == 0 { -h.y } else { h.y },
                if i & 4 == 0 { -h.z } else { h.z },
            )
        })
        .collect();
    // Vertices differing in exactly one bit share an edge
    let mut edges = Vec::with_capacity(12);
    for a in 0..8u32 {
        for bit in [1u32, 2, 4] {
            let b = a ^ bit;
            if a < b {
                edges.push([a, b]);
            }
        }
    }
    Geometry::lines(positions, edges, color)
}

/// Regular grid of `nx * nz` vertices in the XZ plane, connected as a wireframe
pub fn grid_surface(nx: usize, nz: usize, width: f32, depth: f32, color: Rgba) -> Geometry {
    let positions = grid_positions(nx, nz, width, depth);
    let mut edges = Vec::new();
    let index = |i: usize, j: usize| (j * nx + i) as u32;
    for j in 0..nz {
        for i in 0..nx {
            if i + 1 < nx {
                edges.push([index(i, j), index(i + 1, j)]);
            }
            if j + 1 < nz {
                edges.push([index(i, j), index(i, j + 1)]);
            }
        }
    }
    Geometry::lines(positions, edges, color)
}

/// Rest positions of a grid surface, row-major in z
pub fn grid_positions(nx: usize, nz: usize, width: f32, depth: f32) -> Vec<Vec3> {
    let mut positions = Vec::with_capacity(nx * nz);
    for j in 0..nz {
        for i in 0..nx {
            let x = (i as f32 / (nx.max(2) - 1) as f32 - 0.5) * width;
            let z = (j as f32 / (nz.max(2) - 1) as f32 - 0.5) * depth;
            positions.push(Vec3::new(x, 0.0, z));
        }
    }
    positions
}

/// Arrow shaft plus a two-stroke head, pointing along +Y with unit length
pub fn arrow(color: Rgba) -> Geometry {
    Geometry::segments(
        vec![
            Vec3::ZERO,
            Vec3::Y,
            Vec3::Y,
            Vec3::new(0.08, 0.85, 0.0),
            Vec3::Y,
            Vec3::new(-0.08, 0.85, 0.0),
        ],
        color,
    )
}

/// Axis-aligned coordinate cross of half-length `len`
pub fn axes(len: f32, color: Rgba) -> Geometry {
    Geometry::segments(
        vec![
            Vec3::new(-len, 0.0, 0.0),
            Vec3::new(len, 0.0, 0.0),
            Vec3::new(0.0, -len, 0.0),
            Vec3::new(0.0, len, 0.0),
            Vec3::new(0.0, 0.0, -len),
            Vec3::new(0.0, 0.0, len),
        ],
        color,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::WHITE;

    #[test]
    fn box_has_twelve_edges() {
        let g = wire_box(Vec3::ONE, WHITE);
        assert_eq!(g.len(), 8);
        assert_eq!(g.edges().len(), 12);
    }

    #[test]
    fn grid_edge_count() {
        let g = grid_surface(4, 3, 2.0, 2.0, WHITE);
        assert_eq!(g.len(), 12);
        // 3 rows of 3 horizontal + 4 columns of 2 vertical
        assert_eq!(g.edges().len(), 9 + 8);
    }

    #[test]
    fn sphere_vertices_lie_on_radius() {
        let g = wire_sphere(2.0, 6, 4, 24, WHITE);
        assert!(g.positions().iter().all(|p| (p.length() - 2.0).abs() < 1e-4));
    }
}
