//! ASCII maze layouts.
//!
//! `%` wall, `.` food, `o` capsule (plain floor here), `P` Pacman, `G` ghost,
//! space floor. The first text line is the top row of the board.

use crate::model::grid::Grid;
use crate::model::position::Position;
use core::str::FromStr;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LayoutError {
    #[error("layout is empty")]
    Empty,
    #[error("row {row} has {found} cells, expected {expected}")]
    Ragged {
        row: usize,
        expected: usize,
        found: usize,
    },
    #[error("unknown glyph {glyph:?} at row {row}, column {column}")]
    UnknownGlyph {
        glyph: char,
        row: usize,
        column: usize,
    },
    #[error("layout has no Pacman start")]
    MissingPacman,
    #[error("layout has {0} Pacman starts")]
    MultiplePacman(usize),
}

/// Walls, food and agent starts read from a block of rows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Terrain {
    pub walls: Grid,
    pub food: Grid,
    pub pacman: Vec<Position>,
    pub ghosts: Vec<Position>,
}

pub(crate) fn parse_terrain<S: AsRef<str>>(rows: &[S]) -> Result<Terrain, LayoutError> {
    let Some(first) = rows.first() else {
        return Err(LayoutError::Empty);
    };
    let width = first.as_ref().chars().count();
    let height = rows.len();
    if width == 0 {
        return Err(LayoutError::Empty);
    }

    let mut terrain = Terrain {
        walls: Grid::new(width, height),
        food: Grid::new(width, height),
        pacman: Vec::new(),
        ghosts: Vec::new(),
    };

    for (row, line) in rows.iter().enumerate() {
        let line = line.as_ref();
        let found = line.chars().count();
        if found != width {
            return Err(LayoutError::Ragged {
                row,
                expected: width,
                found,
            });
        }
        let y = (height - 1 - row) as i32;
        for (column, glyph) in line.chars().enumerate() {
            let pos = Position::new(column as i32, y);
            match glyph {
                '%' => terrain.walls.set(pos, true),
                '.' => terrain.food.set(pos, true),
                'P' => terrain.pacman.push(pos),
                'G' => terrain.ghosts.push(pos),
                ' ' | 'o' => {}
                _ => return Err(LayoutError::UnknownGlyph { glyph, row, column }),
            }
        }
    }

    // Ghosts are listed in reading order (top row first, left to right).
    Ok(terrain)
}

/// Terrain rows without agents, top row first.
pub(crate) fn render_terrain(walls: &Grid, food: &Grid) -> Vec<String> {
    (0..walls.height())
        .rev()
        .map(|y| {
            (0..walls.width())
                .map(|x| {
                    let pos = Position::new(x as i32, y as i32);
                    if walls.get(pos) {
                        '%'
                    } else if food.get(pos) {
                        '.'
                    } else {
                        ' '
                    }
                })
                .collect()
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layout {
    walls: Grid,
    food: Grid,
    pacman: Position,
    ghosts: Vec<Position>,
}

impl Layout {
    pub fn parse(text: &str) -> Result<Self, LayoutError> {
        let lines: Vec<&str> = text.lines().map(|line| line.trim_end_matches('\r')).collect();
        let start = lines.iter().position(|line| !line.trim().is_empty());
        let end = lines.iter().rposition(|line| !line.trim().is_empty());
        let (Some(start), Some(end)) = (start, end) else {
            return Err(LayoutError::Empty);
        };

        let terrain = parse_terrain(&lines[start..=end])?;
        let pacman = match terrain.pacman.as_slice() {
            [] => return Err(LayoutError::MissingPacman),
            [only] => *only,
            many => return Err(LayoutError::MultiplePacman(many.len())),
        };

        Ok(Self {
            walls: terrain.walls,
            food: terrain.food,
            pacman,
            ghosts: terrain.ghosts,
        })
    }

    pub fn width(&self) -> usize {
        self.walls.width()
    }

    pub fn height(&self) -> usize {
        self.walls.height()
    }

    pub fn walls(&self) -> &Grid {
        &self.walls
    }

    pub fn food(&self) -> &Grid {
        &self.food
    }

    pub fn pacman(&self) -> Position {
        self.pacman
    }

    pub fn ghosts(&self) -> &[Position] {
        &self.ghosts
    }
}

impl FromStr for Layout {
    type Err = LayoutError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}
