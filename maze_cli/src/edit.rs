// edit.rs - Wall toggles and metadata changes applied to a saved maze

use crate::error_handling::{CliError, Result};
use log::info;
use maze_engine::{Coord, Direction, Maze, WallState};
use std::str::FromStr;

/// One wall change, written `x,y,direction,state` (e.g. `3,1,east,down`)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WallEdit {
    pub x: usize,
    pub y: usize,
    pub dir: Direction,
    pub state: WallState,
}

fn invalid(input: &str, reason: impl Into<String>) -> CliError {
    CliError::InvalidEdit {
        input: input.to_string(),
        reason: reason.into(),
    }
}

impl FromStr for WallEdit {
    type Err = CliError;

    fn from_str(s: &str) -> Result<Self> {
        let parts: Vec<&str> = s.split(',').map(str::trim).collect();
        let [x, y, dir, state] = parts.as_slice() else {
            return Err(invalid(s, "expected x,y,direction,state"));
        };
        let x = x
            .parse()
            .map_err(|_| invalid(s, format!("'{}' is not a column", x)))?;
        let y = y
            .parse()
            .map_err(|_| invalid(s, format!("'{}' is not a row", y)))?;
        let dir = match dir.to_ascii_lowercase().as_str() {
            "n" | "north" => Direction::North,
            "e" | "east" => Direction::East,
            "s" | "south" => Direction::South,
            "w" | "west" => Direction::West,
            other => return Err(invalid(s, format!("unknown direction '{}'", other))),
        };
        let state = match state.to_ascii_lowercase().as_str() {
            "up" | "wall" | "1" => WallState::Up,
            "down" | "open" | "0" => WallState::Down,
            other => return Err(invalid(s, format!("unknown wall state '{}'", other))),
        };
        Ok(WallEdit { x, y, dir, state })
    }
}

/// Everything the `edit` command can change
#[derive(Debug, Clone, Default)]
pub struct EditRequest {
    pub walls: Vec<WallEdit>,
    pub name: Option<String>,
    pub author: Option<String>,
    pub show_arrows: Option<bool>,
}

impl EditRequest {
    pub fn is_empty(&self) -> bool {
        self.walls.is_empty() && self.name.is_none() && self.author.is_none() && self.show_arrows.is_none()
    }
}

/// The entry and exit walls are moved with `relocate`, never edited directly
fn touches_opening(maze: &Maze, edit: &WallEdit) -> bool {
    let here = Coord::new(edit.x, edit.y);
    [maze.entry(), maze.exit()].into_iter().any(|o| {
        (o.cell == here && o.side == edit.dir) || (o.cell.step(o.side) == Some(here) && o.side.opposite() == edit.dir)
    })
}

/// Applies `request` to `maze`. Wall edits are all checked before any is
/// made, and any wall edit drops the cached solution. Returns the number of
/// changes made.
pub fn apply(maze: &mut Maze, request: &EditRequest) -> Result<usize> {
    for edit in &request.walls {
        let label = format!("{},{},{:?},{:?}", edit.x, edit.y, edit.dir, edit.state);
        if edit.x >= maze.width() || edit.y >= maze.height() {
            return Err(invalid(
                &label,
                format!("outside the {}x{} grid", maze.width(), maze.height()),
            ));
        }
        if touches_opening(maze, edit) {
            return Err(invalid(&label, "entry and exit walls are changed with relocate"));
        }
    }

    let mut changes = 0;
    for edit in &request.walls {
        maze.set_wall(edit.x, edit.y, edit.dir, edit.state)?;
        changes += 1;
    }
    if let Some(name) = &request.name {
        maze.set_name(name.clone());
        changes += 1;
    }
    if let Some(author) = &request.author {
        maze.set_author(author.clone());
        changes += 1;
    }
    if let Some(show) = request.show_arrows {
        maze.set_show_arrows(show);
        changes += 1;
    }
    info!("Applied {} change(s) to '{}'", changes, maze.name());
    Ok(changes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use maze_engine::MazeConfig;

    fn corner_maze() -> Maze {
        let config = MazeConfig {
            width: 5,
            height: 5,
            start_at: Some(Coord::new(0, 0)),
            finish_at: Some(Coord::new(4, 4)),
            seed: Some(12),
            ..MazeConfig::default()
        };
        Maze::generate(&config).unwrap()
    }

    #[test]
    fn test_parse_wall_edits() {
        assert_eq!(
            "3,1,east,down".parse::<WallEdit>().unwrap(),
            WallEdit {
                x: 3,
                y: 1,
                dir: Direction::East,
                state: WallState::Down
            }
        );
        assert_eq!(" 0, 2, N, 1 ".parse::<WallEdit>().unwrap().dir, Direction::North);
        assert!(matches!("1,2,east".parse::<WallEdit>(), Err(CliError::InvalidEdit { .. })));
        assert!(matches!("a,2,east,up".parse::<WallEdit>(), Err(CliError::InvalidEdit { .. })));
        assert!(matches!("1,2,up,up".parse::<WallEdit>(), Err(CliError::InvalidEdit { .. })));
        assert!(matches!("1,2,east,maybe".parse::<WallEdit>(), Err(CliError::InvalidEdit { .. })));
    }

    #[test]
    fn test_wall_edit_updates_both_sides_and_drops_solution() {
        let mut maze = corner_maze();
        let closed = maze
            .grid()
            .cells()
            .find(|c| c.x() < 4 && !c.is_open(Direction::East))
            .map(|c| c.coord())
            .expect("a perfect 5x5 maze has a closed interior wall");
        let request = EditRequest {
            walls: vec![WallEdit {
                x: closed.x,
                y: closed.y,
                dir: Direction::East,
                state: WallState::Down,
            }],
            ..EditRequest::default()
        };
        assert_eq!(apply(&mut maze, &request).unwrap(), 1);
        assert!(maze.solution_path().is_none());
        assert_eq!(
            maze.grid().wall(closed.x + 1, closed.y, Direction::West).unwrap(),
            WallState::Down
        );
    }

    #[test]
    fn test_metadata_edits() {
        let mut maze = corner_maze();
        let request = EditRequest {
            name: Some("Garden".to_string()),
            author: Some("M. Escher".to_string()),
            show_arrows: Some(false),
            ..EditRequest::default()
        };
        assert!(!request.is_empty());
        assert_eq!(apply(&mut maze, &request).unwrap(), 3);
        assert_eq!(maze.name(), "Garden");
        assert_eq!(maze.author(), "M. Escher");
        assert!(!maze.show_arrows());
        assert!(maze.solution_path().is_some());
    }

    #[test]
    fn test_rejected_edits_change_nothing() {
        let mut maze = corner_maze();
        let before = maze.grid().clone();
        let entry = maze.entry();
        let request = EditRequest {
            walls: vec![
                WallEdit {
                    x: 1,
                    y: 1,
                    dir: Direction::South,
                    state: WallState::Down,
                },
                WallEdit {
                    x: entry.cell.x,
                    y: entry.cell.y,
                    dir: entry.side,
                    state: WallState::Up,
                },
            ],
            ..EditRequest::default()
        };
        assert!(matches!(apply(&mut maze, &request), Err(CliError::InvalidEdit { .. })));

        let outside = EditRequest {
            walls: vec![WallEdit {
                x: 5,
                y: 0,
                dir: Direction::West,
                state: WallState::Down,
            }],
            ..EditRequest::default()
        };
        assert!(matches!(apply(&mut maze, &outside), Err(CliError::InvalidEdit { .. })));
        assert_eq!(maze.grid(), &before);
        assert!(maze.solution_path().is_some());
    }
}
