//=========================================================================
// Quad Geometry
//
// Power-of-two texture sizing and the textured full-screen quad shared by
// every GPU presenter.
//
// The logical image occupies the top-left sub-rectangle of the texture,
// so UVs are scaled by `stored / texture` instead of spanning 0..1:
//
// ```text
//   (-1, 1) 3 ─────── 0 (1, 1)        vertex order and NDC positions
//           │ ╲       │
//           │   ╲     │               triangles: 0-1-3, 1-2-3
//           │     ╲   │
//   (-1,-1) 2 ─────── 1 (1,-1)
// ```
//
// For transposed frames the UV axes are swapped, which rotates the
// column-major image upright.
//
//=========================================================================

//=== External Crates =====================================================
use bytemuck::{Pod, Zeroable};

//=== Internal Modules ====================================================
use super::frame::{FrameFormat, FrameLayout, FrameSize};

//=== Texture Size ========================================================

/// Smallest power-of-two box holding the stored image.
pub fn texture_size_for(format: FrameFormat) -> FrameSize {
    let stored = format.stored_size();
    FrameSize::new(stored.width.next_power_of_two(), stored.height.next_power_of_two())
}

//=== QuadVertex ==========================================================

#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct QuadVertex {
    pub position: [f32; 3],
    pub tex_coord: [f32; 2],
}

/// Floats per vertex (position + UV).
pub const VERTEX_FLOATS: usize = 5;

pub const QUAD_INDICES: [u32; 6] = [0, 1, 3, 1, 2, 3];

//--- quad_vertices() -----------------------------------------------------

pub fn quad_vertices(format: FrameFormat, texture: FrameSize) -> [QuadVertex; 4] {
    let stored = format.stored_size();
    let u_max = stored.width as f32 / texture.width as f32;
    let v_max = stored.height as f32 / texture.height as f32;

    // UV per corner, in vertex order: top-right, bottom-right,
    // bottom-left, top-left.
    let uvs = match format.layout {
        FrameLayout::RowMajor => [[u_max, 0.0], [u_max, v_max], [0.0, v_max], [0.0, 0.0]],
        FrameLayout::Transposed => [[0.0, v_max], [u_max, v_max], [u_max, 0.0], [0.0, 0.0]],
    };

    let positions = [[1.0, 1.0, 0.0], [1.0, -1.0, 0.0], [-1.0, -1.0, 0.0], [-1.0, 1.0, 0.0]];

    let mut vertices = [QuadVertex::zeroed(); 4];
    for (vertex, (position, tex_coord)) in vertices.iter_mut().zip(positions.into_iter().zip(uvs)) {
        vertex.position = position;
        vertex.tex_coord = tex_coord;
    }
    vertices
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn transposed(width: u32, height: u32) -> FrameFormat {
        FrameFormat::new(FrameSize::new(width, height), FrameLayout::Transposed)
    }

    fn row_major(width: u32, height: u32) -> FrameFormat {
        FrameFormat::new(FrameSize::new(width, height), FrameLayout::RowMajor)
    }

    //=====================================================================
    // Texture Size
    //=====================================================================

    #[test]
    fn transposed_frames_use_the_classic_texture_sizes() {
        assert_eq!(texture_size_for(transposed(320, 200)), FrameSize::new(256, 512));
        assert_eq!(texture_size_for(transposed(640, 400)), FrameSize::new(512, 1024));
    }

    #[test]
    fn row_major_frames_round_each_axis() {
        assert_eq!(texture_size_for(row_major(320, 200)), FrameSize::new(512, 256));
        assert_eq!(texture_size_for(row_major(256, 256)), FrameSize::new(256, 256));
    }

    //=====================================================================
    // Quad
    //=====================================================================

    #[test]
    fn row_major_uvs_cover_the_logical_rectangle() {
        let format = row_major(320, 200);
        let quad = quad_vertices(format, texture_size_for(format));

        assert_eq!(quad[3].tex_coord, [0.0, 0.0], "top-left");
        assert_eq!(quad[1].tex_coord, [0.625, 0.78125], "bottom-right");
    }

    #[test]
    fn transposed_uvs_match_the_rotated_layout() {
        let format = transposed(320, 200);
        let quad = quad_vertices(format, texture_size_for(format));

        // 200/256 across, 320/512 down
        assert_eq!(quad[0].tex_coord, [0.0, 0.625]);
        assert_eq!(quad[1].tex_coord, [0.78125, 0.625]);
        assert_eq!(quad[2].tex_coord, [0.78125, 0.0]);
        assert_eq!(quad[3].tex_coord, [0.0, 0.0]);
    }

    #[test]
    fn quad_spans_clip_space() {
        let format = row_major(320, 200);
        let quad = quad_vertices(format, texture_size_for(format));

        assert_eq!(quad[0].position, [1.0, 1.0, 0.0]);
        assert_eq!(quad[2].position, [-1.0, -1.0, 0.0]);
    }

    #[test]
    fn vertex_is_tightly_packed() {
        assert_eq!(std::mem::size_of::<QuadVertex>(), VERTEX_FLOATS * 4);
        assert_eq!(bytemuck::cast_slice::<QuadVertex, f32>(&[QuadVertex::zeroed()]).len(), 5);
    }
}
