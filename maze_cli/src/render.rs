// render.rs - ASCII and PNG views of a maze (walls, reserved blocks, solution, arrows)

use crate::error_handling::{CliError, Result};
use anyhow::Context;
use image::{ImageFormat, Rgba, RgbaImage};
use log::info;
use maze_engine::{Coord, Direction, Maze, Opening};
use std::path::Path;

const WALL: Rgba<u8> = Rgba([20, 20, 20, 255]);
const FLOOR: Rgba<u8> = Rgba([255, 255, 255, 255]);
const RESERVED: Rgba<u8> = Rgba([205, 205, 210, 255]);
const SOLUTION: Rgba<u8> = Rgba([220, 30, 30, 255]);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderOptions {
    pub show_solution: bool,
    pub show_arrows: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            show_solution: false,
            show_arrows: true,
        }
    }
}

fn arrow(dir: Direction) -> char {
    match dir {
        Direction::North => '^',
        Direction::East => '>',
        Direction::South => 'v',
        Direction::West => '<',
    }
}

/// Direction a walker moves through `opening`. Point endpoints are entered
/// from outside the grid; block endpoints are left through their opening.
fn travel(maze: &Maze, opening: Opening, entering: bool) -> Direction {
    let from_block = maze.regions().is_reserved(opening.cell);
    if entering == from_block {
        opening.side
    } else {
        opening.side.opposite()
    }
}

/// Text grid of `+`, `-` and `|`; `#` fills reserved cells and `*` marks the path
pub fn render_ascii(maze: &Maze, options: RenderOptions) -> String {
    let grid = maze.grid();
    let (w, h) = (grid.width(), grid.height());
    let mut canvas = vec![vec![' '; 4 * w + 1]; 2 * h + 1];

    for cell in grid.cells() {
        let (x, y) = (cell.x(), cell.y());
        let (row, col) = (2 * y, 4 * x);
        canvas[row][col] = '+';
        canvas[row][col + 4] = '+';
        canvas[row + 2][col] = '+';
        canvas[row + 2][col + 4] = '+';

        let mut sides = vec![Direction::North, Direction::West];
        if x == w - 1 {
            sides.push(Direction::East);
        }
        if y == h - 1 {
            sides.push(Direction::South);
        }
        for dir in sides {
            if cell.is_open(dir) {
                continue;
            }
            match dir {
                Direction::North => canvas[row][col + 1..col + 4].fill('-'),
                Direction::South => canvas[row + 2][col + 1..col + 4].fill('-'),
                Direction::West => canvas[row + 1][col] = '|',
                Direction::East => canvas[row + 1][col + 4] = '|',
            }
        }

        if maze.regions().is_reserved(cell.coord()) {
            canvas[row + 1][col + 1..col + 4].fill('#');
        } else if options.show_solution && cell.on_solution() {
            canvas[row + 1][col + 2] = '*';
        }
    }

    if options.show_arrows {
        for (opening, entering) in [(maze.entry(), true), (maze.exit(), false)] {
            let Coord { x, y } = opening.cell;
            let (row, col) = match opening.side {
                Direction::North => (2 * y, 4 * x + 2),
                Direction::South => (2 * y + 2, 4 * x + 2),
                Direction::West => (2 * y + 1, 4 * x),
                Direction::East => (2 * y + 1, 4 * x + 4),
            };
            canvas[row][col] = arrow(travel(maze, opening, entering));
        }
    }

    canvas
        .into_iter()
        .map(|line| line.into_iter().collect::<String>())
        .collect::<Vec<_>>()
        .join("\n")
}

fn hline(img: &mut RgbaImage, x0: u32, x1: u32, y: u32, color: Rgba<u8>) {
    for x in x0.min(x1)..=x0.max(x1) {
        if x < img.width() && y < img.height() {
            img.put_pixel(x, y, color);
        }
    }
}

fn vline(img: &mut RgbaImage, x: u32, y0: u32, y1: u32, color: Rgba<u8>) {
    for y in y0.min(y1)..=y0.max(y1) {
        if x < img.width() && y < img.height() {
            img.put_pixel(x, y, color);
        }
    }
}

/// Rasterises the maze, `cell_px` pixels per cell plus a one pixel closing border
pub fn render_image(maze: &Maze, cell_px: u32, show_solution: bool) -> Result<RgbaImage> {
    if cell_px < 4 {
        return Err(CliError::InvalidRenderSize {
            reason: format!("cell size {}px is below the 4px minimum", cell_px),
        });
    }
    let grid = maze.grid();
    let size = |cells: usize| {
        u32::try_from(cells)
            .ok()
            .and_then(|n| n.checked_mul(cell_px))
            .and_then(|n| n.checked_add(1))
    };
    let (Some(width), Some(height)) = (size(grid.width()), size(grid.height())) else {
        return Err(CliError::InvalidRenderSize {
            reason: format!("{}x{} cells at {}px overflows", grid.width(), grid.height(), cell_px),
        });
    };
    let mut img = RgbaImage::from_pixel(width, height, FLOOR);
    let origin = |c: Coord| (c.x as u32 * cell_px, c.y as u32 * cell_px);

    for coord in grid.coords() {
        if maze.regions().is_reserved(coord) {
            let (px, py) = origin(coord);
            for y in py + 1..py + cell_px {
                hline(&mut img, px + 1, px + cell_px - 1, y, RESERVED);
            }
        }
    }

    if show_solution {
        let center = |c: Coord| {
            let (px, py) = origin(c);
            (px + cell_px / 2, py + cell_px / 2)
        };
        if let Some(path) = maze.solution_path() {
            for pair in path.windows(2) {
                let (a, b) = (center(pair[0]), center(pair[1]));
                if a.1 == b.1 {
                    hline(&mut img, a.0, b.0, a.1, SOLUTION);
                } else {
                    vline(&mut img, a.0, a.1, b.1, SOLUTION);
                }
            }
        }
    }

    for cell in grid.cells() {
        let (px, py) = origin(cell.coord());
        if !cell.is_open(Direction::North) {
            hline(&mut img, px, px + cell_px, py, WALL);
        }
        if !cell.is_open(Direction::West) {
            vline(&mut img, px, py, py + cell_px, WALL);
        }
        if cell.x() == grid.width() - 1 && !cell.is_open(Direction::East) {
            vline(&mut img, px + cell_px, py, py + cell_px, WALL);
        }
        if cell.y() == grid.height() - 1 && !cell.is_open(Direction::South) {
            hline(&mut img, px, px + cell_px, py + cell_px, WALL);
        }
    }
    Ok(img)
}

pub fn encode_png(img: &RgbaImage) -> Result<Vec<u8>> {
    let mut png = Vec::new();
    img.write_to(&mut std::io::Cursor::new(&mut png), ImageFormat::Png)?;
    Ok(png)
}

/// Writes the maze as a PNG (creates parent dirs; "-" writes to stdout)
pub async fn export_png<P: AsRef<Path>>(
    maze: &Maze,
    path: P,
    cell_px: u32,
    show_solution: bool,
) -> anyhow::Result<()> {
    let path = path.as_ref();
    let png = encode_png(&render_image(maze, cell_px, show_solution)?)?;
    if path == Path::new("-") {
        use tokio::io::AsyncWriteExt;
        tokio::io::stdout()
            .write_all(&png)
            .await
            .context("Failed writing PNG to stdout")?;
        return Ok(());
    }
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent)
            .await
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    tokio::fs::write(path, &png)
        .await
        .with_context(|| format!("Failed writing PNG {}", path.display()))?;
    info!("Saved image to {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use maze_engine::{MazeConfig, RegionShape, Scale};

    fn corner_maze() -> Maze {
        let config = MazeConfig {
            width: 5,
            height: 5,
            start_at: Some(Coord::new(0, 0)),
            finish_at: Some(Coord::new(4, 4)),
            seed: Some(7),
            ..MazeConfig::default()
        };
        Maze::generate(&config).unwrap()
    }

    #[test]
    fn test_ascii_dimensions_and_arrows() {
        let maze = corner_maze();
        let art = render_ascii(&maze, RenderOptions::default());
        let lines: Vec<&str> = art.lines().collect();
        assert_eq!(lines.len(), 11);
        assert!(lines.iter().all(|l| l.chars().count() == 21));
        // Entry opens West at (0,0), exit East at (4,4); both read left to right
        assert_eq!(lines[1].chars().next(), Some('>'));
        assert_eq!(lines[9].chars().last(), Some('>'));
    }

    #[test]
    fn test_ascii_marks_solution() {
        let maze = corner_maze();
        let options = RenderOptions {
            show_solution: true,
            show_arrows: false,
        };
        let art = render_ascii(&maze, options);
        assert_eq!(art.matches('*').count(), maze.solution_length());
        assert!(!art.contains('>'));
    }

    #[test]
    fn test_ascii_fills_reserved_blocks() {
        let config = MazeConfig {
            width: 8,
            height: 6,
            start: RegionShape::Square(Scale::Medium),
            seed: Some(3),
            ..MazeConfig::default()
        };
        let maze = Maze::generate(&config).unwrap();
        let art = render_ascii(&maze, RenderOptions::default());
        assert_eq!(art.matches("###").count(), 4);
    }

    #[test]
    fn test_png_size_and_colors() {
        let config = MazeConfig {
            width: 6,
            height: 4,
            start: RegionShape::Square(Scale::Small),
            start_at: Some(Coord::new(0, 0)),
            seed: Some(11),
            ..MazeConfig::default()
        };
        let maze = Maze::generate(&config).unwrap();
        let img = render_image(&maze, 10, false).unwrap();
        assert_eq!(img.dimensions(), (61, 41));
        assert_eq!(*img.get_pixel(5, 5), RESERVED);
        assert_eq!(*img.get_pixel(60, 20), WALL);

        let solved = render_image(&maze, 10, true).unwrap();
        assert!(solved.pixels().any(|p| *p == SOLUTION));
        assert!(encode_png(&solved).unwrap().starts_with(&[0x89, b'P', b'N', b'G']));
    }

    #[test]
    fn test_png_rejects_tiny_cells() {
        let maze = corner_maze();
        assert!(matches!(
            render_image(&maze, 2, false),
            Err(CliError::InvalidRenderSize { .. })
        ));
    }
}
