//! PNG rendering for lattices.
//!
//! Renders a [`Lattice`] to an RGBA image without any GPU dependencies, using
//! the pattern-paper colours: empty sites white, melanophores black,
//! xanthophores yellow.

use crate::cell::CellState;
use crate::error::RenderError;
use crate::lattice::Lattice;
use image::{ImageBuffer, Rgba, RgbaImage};
use std::path::Path;

/// Colour for each cell state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderPalette {
    pub empty: [u8; 4],
    pub xanthophore: [u8; 4],
    pub melanophore: [u8; 4],
}

impl Default for RenderPalette {
    fn default() -> Self {
        Self {
            empty: [255, 255, 255, 255],
            xanthophore: [255, 255, 0, 255],
            melanophore: [0, 0, 0, 255],
        }
    }
}

impl RenderPalette {
    #[inline]
    pub fn color(&self, state: CellState) -> [u8; 4] {
        match state {
            CellState::Empty => self.empty,
            CellState::Xanthophore => self.xanthophore,
            CellState::Melanophore => self.melanophore,
        }
    }
}

/// One RGBA pixel per site, row-major. Suitable for uploading as a texture.
pub fn lattice_rgba(lattice: &Lattice, palette: &RenderPalette) -> Vec<u8> {
    let mut data = Vec::with_capacity(lattice.len() * 4);
    for &cell in lattice.cells() {
        data.extend_from_slice(&palette.color(cell));
    }
    data
}

/// Render a lattice to an RGBA image.
///
/// # Arguments
/// * `lattice` - The lattice to render
/// * `palette` - Colour for each cell state
/// * `pixel_size` - Size of each site in pixels (1 = 1:1, 4 = 4x4 per site)
///
/// Image x runs along columns and y along rows.
pub fn render_lattice(lattice: &Lattice, palette: &RenderPalette, pixel_size: u32) -> RgbaImage {
    let (rows, cols) = lattice.dimensions();
    let width = cols as u32 * pixel_size;
    let height = rows as u32 * pixel_size;

    ImageBuffer::from_fn(width, height, |px, py| {
        let row = (py / pixel_size) as isize;
        let col = (px / pixel_size) as isize;
        Rgba(palette.color(lattice.get(row, col)))
    })
}

/// Save an RGBA image to a PNG file, creating parent directories.
pub fn save_png(img: &RgbaImage, path: &Path) -> Result<(), RenderError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    img.save(path)?;
    Ok(())
}

/// Convenience function: render with the default palette and save to PNG.
pub fn render_to_png(lattice: &Lattice, path: &Path, pixel_size: u32) -> Result<(), RenderError> {
    if pixel_size == 0 {
        return Err(RenderError::ZeroPixelSize);
    }
    let img = render_lattice(lattice, &RenderPalette::default(), pixel_size);
    save_png(&img, path)
}
