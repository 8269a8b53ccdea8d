//! Shared cube geometry.
//!
//! Faces are stored as independent quads (4 vertices each) so that every face
//! can carry flat colors and its own `0..1` texture square. Face order:
//! front (+Z), back (-Z), top (+Y), bottom (-Y), right (+X), left (-X).

use crate::paint::Color;

pub const FACE_COUNT: usize = 6;
pub const VERTEX_COUNT: usize = FACE_COUNT * 4;
pub const INDEX_COUNT: usize = FACE_COUNT * 6;

/// Unit cube corners in `[-1, 1]`, four per face, counter-clockwise seen from outside.
pub const POSITIONS: [[f32; 3]; VERTEX_COUNT] = [
    // front (z = 1)
    [-1.0, -1.0, 1.0],
    [1.0, -1.0, 1.0],
    [1.0, 1.0, 1.0],
    [-1.0, 1.0, 1.0],
    // back (z = -1)
    [1.0, -1.0, -1.0],
    [-1.0, -1.0, -1.0],
    [-1.0, 1.0, -1.0],
    [1.0, 1.0, -1.0],
    // top (y = 1)
    [-1.0, 1.0, 1.0],
    [1.0, 1.0, 1.0],
    [1.0, 1.0, -1.0],
    [-1.0, 1.0, -1.0],
    // bottom (y = -1)
    [-1.0, -1.0, -1.0],
    [1.0, -1.0, -1.0],
    [1.0, -1.0, 1.0],
    [-1.0, -1.0, 1.0],
    // right (x = 1)
    [1.0, -1.0, 1.0],
    [1.0, -1.0, -1.0],
    [1.0, 1.0, -1.0],
    [1.0, 1.0, 1.0],
    // left (x = -1)
    [-1.0, -1.0, -1.0],
    [-1.0, -1.0, 1.0],
    [-1.0, 1.0, 1.0],
    [-1.0, 1.0, -1.0],
];

const FACE_UVS: [[f32; 2]; 4] = [[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0]];

/// Texture coordinates; every face maps the full texture.
pub const TEX_COORDS: [[f32; 2]; VERTEX_COUNT] = {
    let mut out = [[0.0; 2]; VERTEX_COUNT];
    let mut i = 0;
    while i < VERTEX_COUNT {
        out[i] = FACE_UVS[i % 4];
        i += 1;
    }
    out
};

/// Two triangles per face: `[b, b+1, b+2]` and `[b, b+2, b+3]`.
pub const INDICES: [u16; INDEX_COUNT] = {
    let mut out = [0u16; INDEX_COUNT];
    let mut face = 0;
    while face < FACE_COUNT {
        let b = (face * 4) as u16;
        let i = face * 6;
        out[i] = b;
        out[i + 1] = b + 1;
        out[i + 2] = b + 2;
        out[i + 3] = b;
        out[i + 4] = b + 2;
        out[i + 5] = b + 3;
        face += 1;
    }
    out
};

/// Expands one color per face into one color per vertex.
pub fn face_colors(faces: [Color; FACE_COUNT]) -> [[f32; 4]; VERTEX_COUNT] {
    std::array::from_fn(|v| faces[v / 4].to_array())
}

/// Per-vertex colors for the flat-shaded cube: green front/back, red top/bottom,
/// blue right/left.
pub fn flat_colors() -> [[f32; 4]; VERTEX_COUNT] {
    face_colors([
        Color::GREEN,
        Color::GREEN,
        Color::RED,
        Color::RED,
        Color::BLUE,
        Color::BLUE,
    ])
}

/// Per-vertex colors for the textured cube (white, so the texture is unmodulated).
pub fn white_colors() -> [[f32; 4]; VERTEX_COUNT] {
    face_colors([Color::WHITE; FACE_COUNT])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn index_buffer_has_36_entries_within_vertex_bound() {
        assert_eq!(INDICES.len(), 36);
        assert!(INDICES.iter().all(|&i| (i as usize) < VERTEX_COUNT));
        assert_eq!(VERTEX_COUNT, 24);
    }

    #[test]
    fn every_vertex_is_referenced() {
        for v in 0..VERTEX_COUNT as u16 {
            assert!(INDICES.contains(&v), "vertex {v} unused");
        }
    }

    #[test]
    fn faces_are_planar_on_their_axis() {
        // (axis, expected coordinate) per face in storage order.
        let planes = [(2, 1.0), (2, -1.0), (1, 1.0), (1, -1.0), (0, 1.0), (0, -1.0)];
        for (face, (axis, value)) in planes.iter().enumerate() {
            for p in &POSITIONS[face * 4..face * 4 + 4] {
                assert_eq!(p[*axis], *value, "face {face}");
            }
        }
    }

    #[test]
    fn triangles_wind_counter_clockwise_from_outside() {
        let normals = [
            [0.0, 0.0, 1.0],
            [0.0, 0.0, -1.0],
            [0.0, 1.0, 0.0],
            [0.0, -1.0, 0.0],
            [1.0, 0.0, 0.0],
            [-1.0, 0.0, 0.0],
        ];
        for tri in INDICES.chunks(3) {
            let [a, b, c] = [0, 1, 2].map(|k| glam::Vec3::from(POSITIONS[tri[k] as usize]));
            let n = (b - a).cross(c - a).normalize();
            let face = tri[0] as usize / 4;
            assert!(n.abs_diff_eq(glam::Vec3::from(normals[face]), 1e-6), "face {face}");
        }
    }

    #[test]
    fn tex_coords_repeat_per_face() {
        for face in 0..FACE_COUNT {
            assert_eq!(&TEX_COORDS[face * 4..face * 4 + 4], &FACE_UVS);
        }
    }

    #[test]
    fn flat_colors_pair_opposite_faces() {
        let c = flat_colors();
        assert_eq!(c[0], Color::GREEN.to_array());
        assert_eq!(c[4], Color::GREEN.to_array());
        assert_eq!(c[8], Color::RED.to_array());
        assert_eq!(c[12], Color::RED.to_array());
        assert_eq!(c[16], Color::BLUE.to_array());
        assert_eq!(c[23], Color::BLUE.to_array());
    }

    #[test]
    fn white_colors_are_all_ones() {
        assert!(white_colors().iter().flatten().all(|&x| x == 1.0));
    }
}
