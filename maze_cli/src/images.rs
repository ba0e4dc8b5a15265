// images.rs - Reads start/finish/logo rasters as opaque blobs with pixel sizes

use crate::error_handling::Result;
use log::{debug, info};
use maze_engine::{Maze, MazeConfig, RegionImage, RegionKind, RegionShape, Scale};
use std::path::Path;

/// Pixel dimensions and raw bytes of an image file; the content is never decoded
pub fn probe<P: AsRef<Path>>(path: P, kind: RegionKind) -> Result<RegionImage> {
    let path = path.as_ref();
    let (width, height) = image::image_dimensions(path)?;
    let bytes = std::fs::read(path)?;
    debug!("{:?} image {}: {}x{}px, {} bytes", kind, path.display(), width, height, bytes.len());
    Ok(RegionImage {
        kind,
        width,
        height,
        bytes,
    })
}

/// Catalog shape whose orientation matches the image
pub fn shape_for(image: &RegionImage, scale: Scale) -> RegionShape {
    RegionShape::for_image(image.width, image.height, scale)
}

/// Probes each `(kind, path, scale)` and sizes that region of `config` from
/// the image's aspect ratio
pub fn size_regions(config: &mut MazeConfig, requests: &[(RegionKind, &Path, Scale)]) -> Result<Vec<RegionImage>> {
    let mut images = Vec::with_capacity(requests.len());
    for &(kind, path, scale) in requests {
        let image = probe(path, kind)?;
        let shape = shape_for(&image, scale);
        match kind {
            RegionKind::Start => config.start = shape,
            RegionKind::Finish => config.finish = shape,
            RegionKind::Logo => config.logo = Some(shape),
        }
        info!("{:?} image {}x{}px sized as '{}'", kind, image.width, image.height, shape);
        images.push(image);
    }
    Ok(images)
}

/// Attaches the images whose region exists in `maze`; a dropped logo keeps none
pub fn attach_placed(maze: &mut Maze, images: &[RegionImage]) -> usize {
    let mut attached = 0;
    for image in images {
        if image.kind == RegionKind::Logo && maze.regions().logo.is_none() {
            debug!("Logo was not placed, skipping its image");
            continue;
        }
        maze.attach_image(image.clone());
        attached += 1;
    }
    attached
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgba, RgbaImage};
    use std::path::PathBuf;

    fn write_png(width: u32, height: u32) -> PathBuf {
        let path = std::env::temp_dir().join(format!("region-{}.png", uuid::Uuid::new_v4()));
        RgbaImage::from_pixel(width, height, Rgba([40, 90, 160, 255]))
            .save(&path)
            .unwrap();
        path
    }

    #[test]
    fn test_probe_reads_dimensions() {
        let path = std::env::temp_dir().join(format!("logo-{}.png", uuid::Uuid::new_v4()));
        RgbaImage::from_pixel(30, 10, Rgba([0, 0, 0, 255]))
            .save(&path)
            .unwrap();
        let img = probe(&path, RegionKind::Logo).unwrap();
        assert_eq!((img.width, img.height), (30, 10));
        assert!(!img.bytes.is_empty());
        assert_eq!(shape_for(&img, Scale::Medium), RegionShape::Horizontal(Scale::Medium));
        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_probe_missing_file_fails() {
        assert!(probe("/nonexistent/logo.png", RegionKind::Logo).is_err());
    }

    #[test]
    fn test_start_and_finish_images_size_their_blocks() {
        let wide = write_png(40, 10);
        let tall = write_png(10, 40);
        let mut config = MazeConfig {
            width: 10,
            height: 10,
            seed: Some(4),
            ..MazeConfig::default()
        };
        let images = size_regions(
            &mut config,
            &[
                (RegionKind::Start, wide.as_path(), Scale::Small),
                (RegionKind::Finish, tall.as_path(), Scale::Small),
            ],
        )
        .unwrap();
        assert_eq!(config.start, RegionShape::Horizontal(Scale::Small));
        assert_eq!(config.finish, RegionShape::Vertical(Scale::Small));
        assert_eq!(config.logo, None);

        let mut maze = Maze::generate(&config).unwrap();
        assert_eq!((maze.regions().start.width, maze.regions().start.height), (2, 1));
        assert_eq!((maze.regions().finish.width, maze.regions().finish.height), (1, 2));
        assert_eq!(attach_placed(&mut maze, &images), 2);
        let kinds: Vec<RegionKind> = maze.images().iter().map(|i| i.kind).collect();
        assert_eq!(kinds, vec![RegionKind::Start, RegionKind::Finish]);

        std::fs::remove_file(&wide).unwrap();
        std::fs::remove_file(&tall).unwrap();
    }

    #[test]
    fn test_logo_image_skipped_without_logo_region() {
        let square = write_png(16, 16);
        let mut with_logo = MazeConfig::default();
        let images = size_regions(&mut with_logo, &[(RegionKind::Logo, square.as_path(), Scale::Large)]).unwrap();
        assert_eq!(with_logo.logo, Some(RegionShape::Square(Scale::Large)));

        let plain = MazeConfig {
            width: 5,
            height: 5,
            seed: Some(2),
            ..MazeConfig::default()
        };
        let mut maze = Maze::generate(&plain).unwrap();
        assert_eq!(attach_placed(&mut maze, &images), 0);
        assert!(maze.images().is_empty());
        std::fs::remove_file(&square).unwrap();
    }
}
