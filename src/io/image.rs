//! PNG sample loading and region export with transparency for unfilled cells

use crate::io::error::{AlgorithmError, Result};
use crate::spatial::grid::BoundingBox;
use crate::spatial::{Coordinate, TerrainId};
use image::{ImageBuffer, Rgba};
use ndarray::Array2;
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::path::Path;

/// Mapping between RGBA colours and terrain ids
///
/// Colours are sorted before ids are handed out, so the same image always
/// yields the same ids.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Palette {
    colors: Vec<[u8; 4]>,
    lookup: HashMap<[u8; 4], TerrainId>,
}

impl Palette {
    /// Build a palette from an arbitrary set of colours
    pub fn from_colors(colors: impl IntoIterator<Item = [u8; 4]>) -> Self {
        let sorted: BTreeSet<[u8; 4]> = colors.into_iter().collect();
        let colors: Vec<[u8; 4]> = sorted.into_iter().collect();
        let lookup = colors
            .iter()
            .enumerate()
            .map(|(index, &color)| (color, index as TerrainId))
            .collect();

        Self { colors, lookup }
    }

    /// Terrain id for `color`, if it is part of the palette
    pub fn terrain_of(&self, color: [u8; 4]) -> Option<TerrainId> {
        self.lookup.get(&color).copied()
    }

    /// Colour for `terrain`, if the id is in range
    pub fn color_of(&self, terrain: TerrainId) -> Option<[u8; 4]> {
        self.colors.get(terrain as usize).copied()
    }

    /// Number of distinct colours
    pub const fn len(&self) -> usize {
        self.colors.len()
    }

    /// Whether the palette holds no colour
    pub const fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }
}

/// Terrain grid decoded from a sample image
#[derive(Debug, Clone)]
pub struct LabelledImage {
    /// Terrain ids indexed `[[x, y]]`
    pub labels: Array2<TerrainId>,
    /// Colours behind the ids
    pub palette: Palette,
}

/// Decode a PNG into terrain labels, one id per distinct colour
///
/// # Errors
///
/// Returns an error if the image cannot be opened or decoded, or if it has
/// no pixels.
pub fn load_sample_png<P: AsRef<Path>>(path: P) -> Result<LabelledImage> {
    let path_buf = path.as_ref().to_path_buf();
    let img = image::open(&path_buf).map_err(|e| AlgorithmError::ImageLoad {
        path: path_buf.clone(),
        source: e,
    })?;
    let rgba_img = img.to_rgba8();
    let (width, height) = rgba_img.dimensions();

    if width == 0 || height == 0 {
        return Err(AlgorithmError::InvalidSourceData {
            reason: format!("sample image '{}' has no pixels", path_buf.display()),
        });
    }

    let palette = Palette::from_colors(rgba_img.pixels().map(|pixel| pixel.0));

    let mut labels = Array2::zeros((width as usize, height as usize));
    for (x, y, pixel) in rgba_img.enumerate_pixels() {
        if let (Some(terrain), Some(label)) = (
            palette.terrain_of(pixel.0),
            labels.get_mut((x as usize, y as usize)),
        ) {
            *label = terrain;
        }
    }

    tracing::debug!(
        path = %path_buf.display(),
        width,
        height,
        colors = palette.len(),
        "loaded sample image"
    );

    Ok(LabelledImage { labels, palette })
}

/// Write the cells inside `bounds` as a PNG, leaving unset cells transparent
///
/// # Errors
///
/// Returns an error if:
/// - A terrain id has no colour in the palette
/// - The parent directory cannot be created
/// - The image cannot be saved to the specified path
pub fn export_region_as_png(
    cells: &BTreeMap<Coordinate, TerrainId>,
    bounds: &BoundingBox,
    palette: &Palette,
    output_path: &Path,
) -> Result<()> {
    let width = (bounds.max[0] - bounds.min[0] + 1).max(0) as u32;
    let height = (bounds.max[1] - bounds.min[1] + 1).max(0) as u32;

    let mut img = ImageBuffer::from_pixel(width, height, Rgba([0, 0, 0, 0]));

    for (&position, &terrain) in cells {
        if !bounds.contains(position) {
            continue;
        }

        let color = palette
            .color_of(terrain)
            .ok_or_else(|| AlgorithmError::InvalidSourceData {
                reason: format!(
                    "terrain {terrain} has no colour (palette holds {})",
                    palette.len()
                ),
            })?;

        let pixel_x = (position[0] - bounds.min[0]) as u32;
        let pixel_y = (position[1] - bounds.min[1]) as u32;
        img.put_pixel(pixel_x, pixel_y, Rgba(color));
    }

    if let Some(parent) = output_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| AlgorithmError::FileSystem {
            path: parent.to_path_buf(),
            operation: "create directory",
            source: e,
        })?;
    }

    img.save(output_path)
        .map_err(|e| AlgorithmError::ImageExport {
            path: output_path.to_path_buf(),
            source: e,
        })?;

    Ok(())
}
