//! Height-field mesh built from a noise field
//!
//! One vertex per field sample, two triangles per quad of neighbouring
//! samples. Vertex colours follow the biome each sample classifies as.

use super::biomes::{normalize_height, BiomeThresholds};
use super::noise::NoiseField;
use crate::world::GridSink;

/// Triangle mesh over a noise field, ready to upload as vertex/index buffers
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HeightMesh {
    pub positions: Vec<[f32; 3]>,
    pub uvs: Vec<[f32; 2]>,
    pub colors: Vec<[f32; 4]>,
    pub indices: Vec<u32>,
}

impl HeightMesh {
    /// Build the mesh with a linear height response. Vertex `(x, y)` sits at
    /// `(x * cell_size, height * height_multiplier, y * cell_size)`.
    pub fn from_field(
        field: &NoiseField,
        thresholds: &BiomeThresholds,
        cell_size: f32,
        height_multiplier: f32,
    ) -> Self {
        Self::from_field_with_curve(field, thresholds, cell_size, height_multiplier, |h| h)
    }

    /// Build the mesh over the cells of `grid`, spacing vertices by its cell size
    pub fn for_grid(
        field: &NoiseField,
        thresholds: &BiomeThresholds,
        grid: &dyn GridSink,
        height_multiplier: f32,
        curve: impl Fn(f32) -> f32,
    ) -> Self {
        Self::from_field_with_curve(field, thresholds, grid.cell_size(), height_multiplier, curve)
    }

    /// Build the mesh, remapping each normalized height through `curve`
    /// before scaling. Colours follow the unmapped height's biome.
    pub fn from_field_with_curve(
        field: &NoiseField,
        thresholds: &BiomeThresholds,
        cell_size: f32,
        height_multiplier: f32,
        curve: impl Fn(f32) -> f32,
    ) -> Self {
        let (w, h) = (field.width, field.height);
        let vertex_count = (w * h) as usize;
        let mut mesh = HeightMesh {
            positions: Vec::with_capacity(vertex_count),
            uvs: Vec::with_capacity(vertex_count),
            colors: Vec::with_capacity(vertex_count),
            indices: Vec::with_capacity(quad_count(w, h) * 6),
        };

        let u_span = (w - 1).max(1) as f32;
        let v_span = (h - 1).max(1) as f32;
        for y in 0..h {
            for x in 0..w {
                let noise = field.values[(y * w + x) as usize];
                let height = normalize_height(noise);
                mesh.positions.push([
                    x as f32 * cell_size,
                    curve(height) * height_multiplier,
                    y as f32 * cell_size,
                ]);
                mesh.uvs.push([x as f32 / u_span, y as f32 / v_span]);

                let (r, g, b) = thresholds.classify(height).fg_color();
                mesh.colors
                    .push([r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0, 1.0]);
            }
        }

        let w = w as u32;
        for y in 0..(h - 1).max(0) as u32 {
            for x in 0..(w.saturating_sub(1)) {
                let i = y * w + x;
                mesh.indices.extend_from_slice(&[i, i + w, i + w + 1, i, i + w + 1, i + 1]);
            }
        }
        mesh
    }

    /// Wavefront OBJ text with per-vertex colours and texture coordinates
    pub fn to_obj(&self) -> String {
        let mut out = String::new();
        for (p, c) in self.positions.iter().zip(&self.colors) {
            out.push_str(&format!("v {} {} {} {} {} {}\n", p[0], p[1], p[2], c[0], c[1], c[2]));
        }
        for uv in &self.uvs {
            out.push_str(&format!("vt {} {}\n", uv[0], uv[1]));
        }
        // OBJ indices are 1-based
        for tri in self.indices.chunks_exact(3) {
            let (a, b, c) = (tri[0] + 1, tri[1] + 1, tri[2] + 1);
            out.push_str(&format!("f {a}/{a} {b}/{b} {c}/{c}\n"));
        }
        out
    }

    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }
}

fn quad_count(w: i32, h: i32) -> usize {
    ((w - 1).max(0) * (h - 1).max(0)) as usize
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::TileType;

    fn field(width: i32, height: i32, values: &[f32]) -> NoiseField {
        NoiseField {
            width,
            height,
            values: values.to_vec(),
        }
    }

    #[test]
    fn test_quad_triangulation() {
        let mesh = HeightMesh::from_field(&field(3, 2, &[0.0; 6]), &BiomeThresholds::default(), 1.0, 1.0);
        assert_eq!(mesh.vertex_count(), 6);
        assert_eq!(mesh.triangle_count(), 4);
        assert_eq!(&mesh.indices[..6], &[0, 3, 4, 0, 4, 1]);
        assert_eq!(&mesh.indices[6..], &[1, 4, 5, 1, 5, 2]);
    }

    #[test]
    fn test_vertex_placement() {
        let mesh = HeightMesh::from_field(&field(2, 2, &[-1.0, 0.0, 1.0, 0.5]), &BiomeThresholds::default(), 2.0, 10.0);
        assert_eq!(mesh.positions[0], [0.0, 0.0, 0.0]);
        assert_eq!(mesh.positions[1], [2.0, 5.0, 0.0]);
        assert_eq!(mesh.positions[2], [0.0, 10.0, 2.0]);
        assert_eq!(mesh.positions[3], [2.0, 7.5, 2.0]);
        assert_eq!(mesh.uvs[3], [1.0, 1.0]);
    }

    #[test]
    fn test_colors_follow_biome() {
        let mesh = HeightMesh::from_field(&field(2, 1, &[-1.0, 1.0]), &BiomeThresholds::default(), 1.0, 1.0);
        let (r, g, b) = TileType::Water.fg_color();
        assert_eq!(mesh.colors[0], [r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0, 1.0]);
        let (r, g, b) = TileType::Highland.fg_color();
        assert_eq!(mesh.colors[1], [r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0, 1.0]);
        assert!(mesh.indices.is_empty());
    }

    #[test]
    fn test_height_curve_remaps_before_scaling() {
        let f = field(3, 1, &[-1.0, 0.0, 1.0]);
        let mesh = HeightMesh::from_field_with_curve(&f, &BiomeThresholds::default(), 1.0, 8.0, |h| h * h);
        let heights: Vec<f32> = mesh.positions.iter().map(|p| p[1]).collect();
        assert_eq!(heights, vec![0.0, 2.0, 8.0]);

        // Colours come from the unmapped height: 0.5 is still grass
        let (r, g, b) = TileType::Grass.fg_color();
        assert_eq!(mesh.colors[1], [r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0, 1.0]);
    }

    #[test]
    fn test_grid_cell_size_spaces_vertices() {
        let grid = crate::world::TileGrid::new(2, 2, 2.5);
        let mesh = HeightMesh::for_grid(&field(2, 2, &[0.0; 4]), &BiomeThresholds::default(), &grid, 1.0, |h| h);
        assert_eq!(mesh.positions[3], [2.5, 0.5, 2.5]);
    }

    #[test]
    fn test_obj_export() {
        let mesh = HeightMesh::from_field(&field(2, 2, &[0.0; 4]), &BiomeThresholds::default(), 1.0, 1.0);
        let obj = mesh.to_obj();
        assert_eq!(obj.lines().filter(|l| l.starts_with("v ")).count(), 4);
        assert_eq!(obj.lines().filter(|l| l.starts_with("vt ")).count(), 4);
        let faces: Vec<&str> = obj.lines().filter(|l| l.starts_with("f ")).collect();
        assert_eq!(faces, vec!["f 1/1 3/3 4/4", "f 1/1 4/4 2/2"]);
    }

    #[test]
    fn test_empty_field() {
        let mesh = HeightMesh::from_field(&field(0, 0, &[]), &BiomeThresholds::default(), 1.0, 1.0);
        assert_eq!(mesh, HeightMesh::default());
    }
}
