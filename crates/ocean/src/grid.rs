//! Static topology and positions for the square water grid.
use glam::Vec3;

pub const DEFAULT_GRID_LENGTH: u16 = 513;

/// Triangle index list for an `L x L` vertex grid.
///
/// Vertices are numbered row-major (`row * L + col`). Each cell contributes
/// two counter-clockwise triangles.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GridTopology {
    length: u16,
    indices: Vec<u32>,
}

impl GridTopology {
    pub fn length(&self) -> u16 {
        self.length
    }

    pub fn vertex_count(&self) -> u32 {
        u32::from(self.length) * u32::from(self.length)
    }

    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    pub fn index_count(&self) -> usize {
        self.indices.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    pub fn triangles(&self) -> impl Iterator<Item = [u32; 3]> + '_ {
        self.indices
            .chunks_exact(3)
            .map(|tri| [tri[0], tri[1], tri[2]])
    }

    /// Index buffer bytes, ready for upload.
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.indices)
    }
}

/// Builds the index topology for an `length x length` grid.
///
/// For each cell `(r, c)` the triangles are `(r,c) (r+1,c+1) (r+1,c)` and
/// `(r,c) (r,c+1) (r+1,c+1)`. Grids with fewer than two vertices per side
/// have no cells.
pub fn build_grid_topology(length: u16) -> GridTopology {
    let side = usize::from(length);
    if side < 2 {
        return GridTopology {
            length,
            indices: Vec::new(),
        };
    }

    let table: Vec<Vec<u32>> = (0..side)
        .map(|row| {
            (0..side)
                .map(|col| (row * side + col) as u32)
                .collect()
        })
        .collect();

    let cells = side - 1;
    let mut indices = Vec::with_capacity(cells * cells * 6);
    for r in 0..cells {
        for c in 0..cells {
            indices.extend_from_slice(&[
                table[r][c],
                table[r + 1][c + 1],
                table[r + 1][c],
                table[r][c],
                table[r][c + 1],
                table[r + 1][c + 1],
            ]);
        }
    }

    tracing::debug!(length, indices = indices.len(), "built grid topology");
    GridTopology { length, indices }
}

/// Vertex positions matching [`build_grid_topology`].
///
/// The grid lies on the XZ plane centred at the origin and spans `extent`
/// along both axes. Columns run toward +X and rows toward -Z, which keeps the
/// winding counter-clockwise when viewed from +Y.
pub fn build_grid_vertices(length: u16, extent: f32) -> Vec<Vec3> {
    let side = usize::from(length);
    match side {
        0 => Vec::new(),
        1 => vec![Vec3::ZERO],
        _ => {
            let step = extent / (side - 1) as f32;
            let half = extent * 0.5;
            (0..side)
                .flat_map(|row| {
                    (0..side).map(move |col| {
                        Vec3::new(col as f32 * step - half, 0.0, half - row as f32 * step)
                    })
                })
                .collect()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn layout(index: u32, length: u16) -> (f64, f64) {
        let side = u32::from(length);
        (f64::from(index % side), f64::from(index / side))
    }

    fn signed_area(tri: [u32; 3], length: u16) -> f64 {
        let (ax, ay) = layout(tri[0], length);
        let (bx, by) = layout(tri[1], length);
        let (cx, cy) = layout(tri[2], length);
        0.5 * ((bx - ax) * (cy - ay) - (cx - ax) * (by - ay))
    }

    #[test]
    fn counts_and_bounds_hold_for_small_grids() {
        for length in 2..=12u16 {
            let topology = build_grid_topology(length);
            let cells = usize::from(length - 1);
            assert_eq!(topology.index_count(), 6 * cells * cells);
            assert!(topology.indices().iter().all(|&i| i < topology.vertex_count()));
        }
    }

    #[test]
    fn every_triangle_is_counter_clockwise() {
        let topology = build_grid_topology(9);
        for tri in topology.triangles() {
            assert!(signed_area(tri, 9) > 0.0, "{tri:?} is not CCW");
        }
    }

    #[test]
    fn two_by_two_grid_matches_reference() {
        let topology = build_grid_topology(2);
        assert_eq!(topology.indices(), &[0, 3, 2, 0, 1, 3]);
    }

    #[test]
    fn degenerate_grids_are_empty() {
        assert!(build_grid_topology(0).is_empty());
        assert!(build_grid_topology(1).is_empty());
        assert_eq!(build_grid_topology(1).vertex_count(), 1);
    }

    #[test]
    fn topology_is_idempotent() {
        assert_eq!(build_grid_topology(33), build_grid_topology(33));
    }

    #[test]
    fn default_grid_fits_u32_indices() {
        let topology = build_grid_topology(DEFAULT_GRID_LENGTH);
        assert_eq!(topology.index_count(), 6 * 512 * 512);
        assert_eq!(topology.as_bytes().len(), topology.index_count() * 4);
        assert_eq!(topology.indices().iter().max(), Some(&(513 * 513 - 1)));
    }

    #[test]
    fn vertices_cover_extent_and_wind_up() {
        let vertices = build_grid_vertices(5, 8.0);
        assert_eq!(vertices.len(), 25);
        assert_eq!(vertices[0], Vec3::new(-4.0, 0.0, 4.0));
        assert_eq!(vertices[24], Vec3::new(4.0, 0.0, -4.0));

        let topology = build_grid_topology(5);
        for [a, b, c] in topology.triangles() {
            let (a, b, c) = (vertices[a as usize], vertices[b as usize], vertices[c as usize]);
            let normal = (b - a).cross(c - a);
            assert!(normal.y > 0.0);
        }
    }
}
