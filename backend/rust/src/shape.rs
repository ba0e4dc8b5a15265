// shape.rs - Catalog of reserved-region shapes and the placed rectangles

use crate::error_handling::MazeError;
use crate::types::Coord;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Scale {
    Small,
    Medium,
    Large,
}

impl Scale {
    fn parse(word: &str) -> Option<Scale> {
        match word {
            "small" => Some(Scale::Small),
            "medium" => Some(Scale::Medium),
            "large" => Some(Scale::Large),
            _ => None,
        }
    }

    const fn step(self) -> usize {
        match self {
            Scale::Small => 0,
            Scale::Medium => 1,
            Scale::Large => 2,
        }
    }

    fn name(self) -> &'static str {
        match self {
            Scale::Small => "Small",
            Scale::Medium => "Medium",
            Scale::Large => "Large",
        }
    }
}

impl FromStr for Scale {
    type Err = MazeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Scale::parse(&s.trim().to_ascii_lowercase())
            .ok_or_else(|| MazeError::InvalidShapeCatalogValue(s.to_string()))
    }
}

/// Fixed catalog of reservable shapes.
///
/// `Point` is an ordinary maze cell on the boundary; every other shape
/// reserves a sealed rectangle that the generator skips.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum RegionShape {
    #[default]
    Point,
    Square(Scale),
    Horizontal(Scale),
    Vertical(Scale),
}

impl RegionShape {
    /// Width and height in cells
    pub const fn dimensions(self) -> (usize, usize) {
        match self {
            RegionShape::Point => (1, 1),
            RegionShape::Square(s) => (1 + s.step(), 1 + s.step()),
            RegionShape::Horizontal(s) => (2 + s.step(), 1 + s.step()),
            RegionShape::Vertical(s) => (1 + s.step(), 2 + s.step()),
        }
    }

    pub const fn is_point(self) -> bool {
        matches!(self, RegionShape::Point)
    }

    /// Picks the catalog shape whose orientation matches an image's aspect ratio
    pub fn for_image(width_px: u32, height_px: u32, scale: Scale) -> RegionShape {
        if width_px == 0 || height_px == 0 {
            return RegionShape::Square(scale);
        }
        let ratio = width_px as f64 / height_px as f64;
        if ratio > 1.25 {
            RegionShape::Horizontal(scale)
        } else if ratio < 0.8 {
            RegionShape::Vertical(scale)
        } else {
            RegionShape::Square(scale)
        }
    }
}

impl fmt::Display for RegionShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RegionShape::Point => write!(f, "Point"),
            RegionShape::Square(s) => write!(f, "{} square", s.name()),
            RegionShape::Horizontal(s) => write!(f, "{} rectangle horizontal", s.name()),
            RegionShape::Vertical(s) => write!(f, "{} rectangle vertical", s.name()),
        }
    }
}

impl FromStr for RegionShape {
    type Err = MazeError;

    /// Accepts "Medium rectangle vertical", "medium-rectangle-vertical" and
    /// the legacy "Arrow" alias for a point.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s
            .trim()
            .to_ascii_lowercase()
            .replace(['-', '_'], " ");
        let words: Vec<&str> = normalized.split_whitespace().collect();
        let shape = match words.as_slice() {
            ["point"] | ["arrow"] => Some(RegionShape::Point),
            [size, "square"] => Scale::parse(size).map(RegionShape::Square),
            [size, "rectangle", "horizontal"] | [size, "horizontal"] => {
                Scale::parse(size).map(RegionShape::Horizontal)
            }
            [size, "rectangle", "vertical"] | [size, "vertical"] => {
                Scale::parse(size).map(RegionShape::Vertical)
            }
            _ => None,
        };
        shape.ok_or_else(|| MazeError::InvalidShapeCatalogValue(s.to_string()))
    }
}

impl TryFrom<String> for RegionShape {
    type Error = MazeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<RegionShape> for String {
    fn from(shape: RegionShape) -> Self {
        shape.to_string()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RegionKind {
    Start,
    Finish,
    Logo,
}

/// A placed axis-aligned rectangle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Region {
    pub kind: RegionKind,
    pub origin: Coord,
    pub width: usize,
    pub height: usize,
    /// Point endpoints stay part of the maze; everything else is sealed off
    pub reserved: bool,
}

impl Region {
    pub fn contains(&self, coord: Coord) -> bool {
        coord.x >= self.origin.x
            && coord.x < self.origin.x + self.width
            && coord.y >= self.origin.y
            && coord.y < self.origin.y + self.height
    }

    /// True when every cell lies inside a `width` x `height` grid
    pub fn fits_within(&self, width: usize, height: usize) -> bool {
        let right = self.origin.x.checked_add(self.width);
        let bottom = self.origin.y.checked_add(self.height);
        self.width > 0
            && self.height > 0
            && right.is_some_and(|r| r <= width)
            && bottom.is_some_and(|b| b <= height)
    }

    pub fn cells(&self) -> impl Iterator<Item = Coord> + '_ {
        (self.origin.y..self.origin.y + self.height).flat_map(move |y| {
            (self.origin.x..self.origin.x + self.width).map(move |x| Coord::new(x, y))
        })
    }

    pub fn area(&self) -> usize {
        self.width * self.height
    }

    pub fn overlaps(&self, other: &Region) -> bool {
        self.origin.x < other.origin.x + other.width
            && other.origin.x < self.origin.x + self.width
            && self.origin.y < other.origin.y + other.height
            && other.origin.y < self.origin.y + self.height
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_dimensions() {
        assert_eq!(RegionShape::Point.dimensions(), (1, 1));
        assert_eq!(RegionShape::Square(Scale::Small).dimensions(), (1, 1));
        assert_eq!(RegionShape::Square(Scale::Large).dimensions(), (3, 3));
        assert_eq!(RegionShape::Horizontal(Scale::Small).dimensions(), (2, 1));
        assert_eq!(RegionShape::Horizontal(Scale::Large).dimensions(), (4, 3));
        assert_eq!(RegionShape::Vertical(Scale::Medium).dimensions(), (2, 3));
        assert_eq!(RegionShape::Vertical(Scale::Large).dimensions(), (3, 4));
    }

    #[test]
    fn test_parse_catalog_names() {
        assert_eq!("Point".parse::<RegionShape>().unwrap(), RegionShape::Point);
        assert_eq!("Arrow".parse::<RegionShape>().unwrap(), RegionShape::Point);
        assert_eq!(
            "Medium rectangle horizontal".parse::<RegionShape>().unwrap(),
            RegionShape::Horizontal(Scale::Medium)
        );
        assert_eq!(
            "large-rectangle-vertical".parse::<RegionShape>().unwrap(),
            RegionShape::Vertical(Scale::Large)
        );
        assert_eq!(
            "small_square".parse::<RegionShape>().unwrap(),
            RegionShape::Square(Scale::Small)
        );
    }

    #[test]
    fn test_parse_scale() {
        assert_eq!("Large".parse::<Scale>().unwrap(), Scale::Large);
        assert_eq!(" small ".parse::<Scale>().unwrap(), Scale::Small);
        assert!("huge".parse::<Scale>().is_err());
    }

    #[test]
    fn test_unknown_shape_is_rejected() {
        let err = "Huge triangle".parse::<RegionShape>().unwrap_err();
        assert!(matches!(err, MazeError::InvalidShapeCatalogValue(ref v) if v == "Huge triangle"));
    }

    #[test]
    fn test_display_parses_back() {
        for scale in [Scale::Small, Scale::Medium, Scale::Large] {
            for shape in [
                RegionShape::Square(scale),
                RegionShape::Horizontal(scale),
                RegionShape::Vertical(scale),
            ] {
                assert_eq!(shape.to_string().parse::<RegionShape>().unwrap(), shape);
            }
        }
    }

    #[test]
    fn test_shape_from_image_aspect() {
        assert_eq!(RegionShape::for_image(400, 100, Scale::Small), RegionShape::Horizontal(Scale::Small));
        assert_eq!(RegionShape::for_image(100, 400, Scale::Large), RegionShape::Vertical(Scale::Large));
        assert_eq!(RegionShape::for_image(120, 100, Scale::Medium), RegionShape::Square(Scale::Medium));
    }

    #[test]
    fn test_serde_uses_catalog_names() {
        let json = serde_json::to_string(&RegionShape::Square(Scale::Medium)).unwrap();
        assert_eq!(json, "\"Medium square\"");
        let bad: Result<RegionShape, _> = serde_json::from_str("\"tiny blob\"");
        assert!(bad.is_err());
    }

    #[test]
    fn test_region_geometry() {
        let a = Region {
            kind: RegionKind::Logo,
            origin: Coord::new(1, 1),
            width: 2,
            height: 3,
            reserved: true,
        };
        assert_eq!(a.cells().count(), 6);
        assert_eq!(a.area(), 6);
        assert!(a.contains(Coord::new(2, 3)));
        assert!(!a.contains(Coord::new(3, 1)));
        let b = Region { origin: Coord::new(3, 1), ..a };
        assert!(!a.overlaps(&b));
        let c = Region { origin: Coord::new(2, 3), ..a };
        assert!(a.overlaps(&c));
    }
}
