//! Level geometry: the tile grid, distance, and projectile paths.
//!
//! Level generation is external; the engine only needs to know which tiles
//! are floor, how far apart two points are, and which cells a projectile
//! crosses.

use serde::{Deserialize, Serialize};

/// A dungeon level's walkability grid.
///
/// Everything outside the grid counts as wall.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Level {
    pub height: i32,
    pub width: i32,
    /// Row-major floor mask.
    floor: Vec<bool>,
}

impl Level {
    /// An all-floor level bordered by wall, handy for tests and defaults.
    pub fn open(height: i32, width: i32) -> Self {
        let mut level = Self {
            height,
            width,
            floor: vec![true; (height * width) as usize],
        };
        for y in 0..height {
            level.set_floor(y, 0, false);
            level.set_floor(y, width - 1, false);
        }
        for x in 0..width {
            level.set_floor(0, x, false);
            level.set_floor(height - 1, x, false);
        }
        level
    }

    pub fn in_bounds(&self, y: i32, x: i32) -> bool {
        y >= 0 && y < self.height && x >= 0 && x < self.width
    }

    pub fn is_floor(&self, y: i32, x: i32) -> bool {
        self.in_bounds(y, x) && self.floor[(y * self.width + x) as usize]
    }

    pub fn set_floor(&mut self, y: i32, x: i32, is_floor: bool) {
        if self.in_bounds(y, x) {
            self.floor[(y * self.width + x) as usize] = is_floor;
        }
    }
}

/// Grid distance: the longer axis plus half the shorter.
///
/// A fast octagonal approximation of Euclidean distance, exact on the
/// axes and diagonals close enough for range checks.
pub fn distance(y1: i32, x1: i32, y2: i32, x2: i32) -> i32 {
    let dy = (y2 - y1).abs();
    let dx = (x2 - x1).abs();
    if dy > dx { dy + (dx >> 1) } else { dx + (dy >> 1) }
}

/// Cells a projectile crosses from origin toward a target, origin excluded.
///
/// Bresenham stepping, capped at `range` cells. The path stops *before*
/// entering a non-floor cell; deciding whether an occupied cell stops it is
/// the caller's job, since a shot at a monster must include its cell.
pub fn projectile_path(
    level: &Level,
    from: (i32, i32),
    to: (i32, i32),
    range: i32,
) -> Vec<(i32, i32)> {
    let (y1, x1) = from;
    let (y2, x2) = to;
    let mut path = Vec::new();
    if from == to || range <= 0 {
        return path;
    }

    let dy = (y2 - y1).abs();
    let dx = (x2 - x1).abs();
    let sy = if y2 > y1 { 1 } else { -1 };
    let sx = if x2 > x1 { 1 } else { -1 };

    let mut y = y1;
    let mut x = x1;
    let mut err = dx - dy;
    for _ in 0..range {
        let e2 = err * 2;
        if e2 > -dy {
            err -= dy;
            x += sx;
        }
        if e2 < dx {
            err += dx;
            y += sy;
        }
        if !level.is_floor(y, x) {
            break;
        }
        path.push((y, x));
        if (y, x) == (y2, x2) {
            break;
        }
    }
    path
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn distance_axes_and_diagonals() {
        assert_eq!(distance(0, 0, 0, 7), 7);
        assert_eq!(distance(0, 0, 7, 0), 7);
        assert_eq!(distance(0, 0, 4, 4), 6);
        assert_eq!(distance(3, 3, 3, 3), 0);
    }

    #[test]
    fn distance_is_symmetric() {
        assert_eq!(distance(1, 2, 8, 5), distance(8, 5, 1, 2));
    }

    #[test]
    fn straight_path_reaches_the_target() {
        let level = Level::open(10, 10);
        let path = projectile_path(&level, (5, 1), (5, 6), 20);
        assert_eq!(path, vec![(5, 2), (5, 3), (5, 4), (5, 5), (5, 6)]);
    }

    #[test]
    fn path_stops_at_a_wall() {
        let mut level = Level::open(10, 10);
        level.set_floor(5, 4, false);
        let path = projectile_path(&level, (5, 1), (5, 8), 20);
        assert_eq!(path, vec![(5, 2), (5, 3)]);
    }

    #[test]
    fn path_respects_range() {
        let level = Level::open(30, 30);
        let path = projectile_path(&level, (1, 1), (1, 25), 5);
        assert_eq!(path.len(), 5);
        assert_eq!(*path.last().unwrap(), (1, 6));
    }

    #[test]
    fn diagonal_path_lands_on_target() {
        let level = Level::open(10, 10);
        let path = projectile_path(&level, (1, 1), (5, 5), 20);
        assert_eq!(*path.last().unwrap(), (5, 5));
    }

    #[test]
    fn outside_the_grid_is_wall() {
        let level = Level::open(10, 10);
        assert!(!level.is_floor(-1, 3));
        assert!(!level.is_floor(3, 100));
    }
}
