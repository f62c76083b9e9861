use super::glyph::GlyphPalette;
use super::pipeline::ProjectedSample;
use super::RenderState;

// --- Visibility resolver ---

/// Depth test for one in-bounds cell. Only a strictly nearer sample wins,
/// so on an exact tie the earlier sample keeps the cell.
pub fn depth_test(depth_buffer: &mut [f32], idx: usize, inv_depth: f32) -> bool {
    if inv_depth > depth_buffer[idx] {
        depth_buffer[idx] = inv_depth;
        true
    } else {
        false
    }
}

/// Resolves one projected sample against the frame buffers. Off-canvas and
/// occluded samples leave both buffers untouched.
pub fn resolve_sample(
    sample: &ProjectedSample,
    render_state: &mut RenderState,
    palette: &GlyphPalette,
) -> bool {
    let Some(idx) = render_state.canvas.cell_index(sample.x, sample.y) else {
        return false;
    };
    if !depth_test(&mut render_state.depth_buffer, idx, sample.inv_depth) {
        return false;
    }
    render_state.glyphs[idx] = palette.shade(sample.normal);
    true
}

pub fn rasterize_torus(
    samples: impl IntoIterator<Item = ProjectedSample>,
    render_state: &mut RenderState,
    palette: &GlyphPalette,
) -> usize {
    let mut written = 0usize;
    for sample in samples {
        if resolve_sample(&sample, render_state, palette) {
            written += 1;
        }
    }
    written
}
