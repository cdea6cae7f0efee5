//! Tests for sample decoding, palettes and region export

#[cfg(test)]
mod tests {
    use image::{Rgba, RgbaImage};
    use overlaptile::AlgorithmError;
    use overlaptile::io::image::{Palette, export_region_as_png, load_sample_png};
    use overlaptile::spatial::grid::BoundingBox;
    use std::collections::BTreeMap;
    use tempfile::TempDir;

    const RED: [u8; 4] = [255, 0, 0, 255];
    const BLUE: [u8; 4] = [0, 0, 255, 255];

    // Ids follow sorted colour order, duplicates collapse
    #[test]
    fn test_palette_is_sorted_and_deduplicated() {
        let palette = Palette::from_colors([RED, BLUE, RED]);

        assert_eq!(palette.len(), 2);
        assert_eq!(palette.terrain_of(BLUE), Some(0));
        assert_eq!(palette.terrain_of(RED), Some(1));
        assert_eq!(palette.color_of(1), Some(RED));
        assert_eq!(palette.color_of(2), None);
        assert_eq!(palette.terrain_of([1, 2, 3, 4]), None);
    }

    // Pixel (x, y) becomes label [[x, y]]
    #[test]
    fn test_load_sample_png_orientation() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("sample.png");
        RgbaImage::from_fn(3, 2, |x, y| Rgba(if x == 2 && y == 1 { BLUE } else { RED }))
            .save(&path)
            .unwrap();

        let labelled = load_sample_png(&path).unwrap();

        assert_eq!(labelled.labels.dim(), (3, 2));
        assert_eq!(labelled.labels[[2, 1]], 0);
        assert_eq!(labelled.labels[[0, 0]], 1);
        assert_eq!(labelled.palette.len(), 2);
    }

    // Unreadable files report the path
    #[test]
    fn test_load_missing_file() {
        let result = load_sample_png("does/not/exist.png");

        assert!(matches!(result, Err(AlgorithmError::ImageLoad { .. })));
    }

    // Export paints cells inside the bounds and leaves the rest transparent
    #[test]
    fn test_export_region() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("out").join("region.png");
        let palette = Palette::from_colors([RED, BLUE]);
        let bounds = BoundingBox {
            min: [1, 1],
            max: [3, 2],
        };
        let cells = BTreeMap::from([([1, 1], 1), ([3, 2], 0), ([9, 9], 0)]);

        export_region_as_png(&cells, &bounds, &palette, &path).unwrap();

        let output = image::open(&path).unwrap().to_rgba8();
        assert_eq!(output.dimensions(), (3, 2));
        assert_eq!(output.get_pixel(0, 0).0, RED);
        assert_eq!(output.get_pixel(2, 1).0, BLUE);
        assert_eq!(output.get_pixel(1, 0).0, [0, 0, 0, 0]);
    }

    // Terrain without a colour cannot be exported
    #[test]
    fn test_export_unknown_terrain() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("region.png");
        let palette = Palette::from_colors([RED]);
        let cells = BTreeMap::from([([0, 0], 5)]);

        let result = export_region_as_png(&cells, &BoundingBox::from_size(2, 2), &palette, &path);

        assert!(matches!(result, Err(AlgorithmError::InvalidSourceData { .. })));
        assert!(!path.exists());
    }
}
