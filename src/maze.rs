//! The eight obstacle layouts and their spawn points.
//!
//! Every layout is a template in fractions of the field (twenty-thirds of the
//! width, thirteenths of the height), so the shapes look the same on any
//! field size. Layout 0 is the open field.

use std::collections::HashSet;
use std::ops::RangeBounds;
use std::sync::Arc;

use crate::snake::{Direction, SnakeBody, INITIAL_LENGTH};
use crate::{Coords, FieldInt};

pub const MAZE_COUNT: usize = 8;

pub type Obstacles = Arc<HashSet<Coords>>;

#[derive(Clone, Debug)]
pub struct MazeLibrary {
    width: FieldInt,
    height: FieldInt,
    obstacles: [Obstacles; MAZE_COUNT],
    spawns: [Coords; MAZE_COUNT],
}

impl MazeLibrary {
    pub fn new(width: FieldInt, height: FieldInt) -> Self {
        let mut plan = Plan::new(width, height);
        let layouts = [
            Vec::new(),
            plan.perimeter(),
            plan.brackets(),
            plan.pinwheel(),
            plan.chambers(),
            plan.split(),
            plan.cross(),
            plan.labyrinth(),
        ];

        let nominal = plan.spawns();
        let mut obstacles: [Obstacles; MAZE_COUNT] = Default::default();
        let mut spawns = [(0, 0); MAZE_COUNT];

        for (i, cells) in layouts.into_iter().enumerate() {
            let set: HashSet<Coords> = cells.into_iter().collect();
            spawns[i] = clear_spawn(&set, nominal[i], width, height).unwrap_or_else(|| {
                log::warn!("maze {}: no obstacle-free spawn on a {}x{} field", i, width, height);
                nominal[i]
            });
            if spawns[i] != nominal[i] {
                log::warn!("maze {}: spawn {:?} blocked, using {:?}", i, nominal[i], spawns[i]);
            }
            obstacles[i] = Arc::new(set);
        }

        MazeLibrary { width, height, obstacles, spawns }
    }

    pub fn width(&self) -> FieldInt {
        self.width
    }

    pub fn height(&self) -> FieldInt {
        self.height
    }

    /// Obstacles of maze `index`; the index wraps modulo [`MAZE_COUNT`].
    pub fn obstacles(&self, index: usize) -> &Obstacles {
        &self.obstacles[index % MAZE_COUNT]
    }

    /// Head position of a fresh snake in maze `index`.
    pub fn spawn(&self, index: usize) -> Coords {
        self.spawns[index % MAZE_COUNT]
    }
}

/// Whether a new East-facing snake at `head` and the cell ahead of it are
/// free of obstacles.
pub fn spawn_is_clear(obstacles: &HashSet<Coords>, head: Coords, width: FieldInt, height: FieldInt) -> bool {
    let snake = SnakeBody::new(head, INITIAL_LENGTH, Direction::East, width, height);
    !snake.segments().any(|seg| obstacles.contains(&seg)) && !obstacles.contains(&snake.next_head())
}

// Rows outward from the nominal one (0, +1, -1, +2, -2, ...), each scanned
// eastwards from the nominal column.
fn clear_spawn(obstacles: &HashSet<Coords>, nominal: Coords, width: FieldInt, height: FieldInt) -> Option<Coords> {
    let (w, h) = (width as i64, height as i64);
    let row_offsets = (0..h).map(|k| if k % 2 == 1 { (k + 1) / 2 } else { -(k / 2) });

    for dy in row_offsets {
        let y = (nominal.1 as i64 + dy).rem_euclid(h) as FieldInt;
        for dx in 0..w {
            let x = ((nominal.0 as i64 + dx) % w) as FieldInt;
            if spawn_is_clear(obstacles, (x, y), width, height) {
                return Some((x, y));
            }
        }
    }

    None
}

struct Plan {
    w: FieldInt,
    h: FieldInt,
    cells: Vec<Coords>,
}

impl Plan {
    fn new(w: FieldInt, h: FieldInt) -> Self {
        Plan { w, h, cells: Vec::new() }
    }

    /// `n` twenty-thirds of the width.
    fn x(&self, n: u32) -> FieldInt {
        (self.w as u32 * n / 23) as FieldInt
    }

    /// `n` thirteenths of the height.
    fn y(&self, n: u32) -> FieldInt {
        (self.h as u32 * n / 13) as FieldInt
    }

    fn row(&mut self, y: FieldInt, xs: impl RangeBounds<FieldInt>) {
        for x in (0..self.w).filter(|x| xs.contains(x)) {
            self.cells.push((x, y));
        }
    }

    fn column(&mut self, x: FieldInt, ys: impl RangeBounds<FieldInt>) {
        for y in (0..self.h).filter(|y| ys.contains(y)) {
            self.cells.push((x, y));
        }
    }

    fn take(&mut self) -> Vec<Coords> {
        std::mem::take(&mut self.cells)
    }

    fn spawns(&self) -> [Coords; MAZE_COUNT] {
        [
            (self.x(10), self.y(7)),
            (self.x(10), self.y(7)),
            (self.x(13), self.y(6)),
            (self.x(15), self.y(3)),
            (self.x(11), self.y(6)),
            (self.x(10), self.y(6)),
            (self.x(18), self.y(3)),
            (self.x(17), self.y(5)),
        ]
    }

    fn perimeter(&mut self) -> Vec<Coords> {
        let (w, h) = (self.w, self.h);
        self.row(0, ..);
        self.row(h - 1, ..);
        self.column(0, ..);
        self.column(w - 1, ..);
        self.take()
    }

    fn brackets(&mut self) -> Vec<Coords> {
        let (w, h) = (self.w, self.h);
        let (arm_x, arm_y) = (self.x(2), self.y(2));
        for y in [0, h - 1] {
            self.row(y, ..arm_x);
            self.row(y, w - arm_x..);
        }
        for x in [0, w - 1] {
            self.column(x, ..arm_y);
            self.column(x, h - arm_y..);
        }

        let bar = self.x(7)..self.x(7) + self.x(9);
        self.row(self.y(4), bar.clone());
        self.row(self.y(8), bar);
        self.take()
    }

    fn pinwheel(&mut self) -> Vec<Coords> {
        self.row(self.y(10), ..self.x(8));
        self.row(self.y(2), self.x(14)..);
        self.column(self.x(8), ..self.y(6));
        self.column(self.x(14), self.y(6)..);
        self.take()
    }

    fn chambers(&mut self) -> Vec<Coords> {
        let (w, h) = (self.w, self.h);
        self.row(0, ..);
        self.row(h - 1, ..);
        for x in [0, w - 1] {
            self.column(x, ..=self.y(4));
            self.column(x, h - self.y(5)..);
        }
        for x in [self.x(6), self.x(16)] {
            self.column(x, self.y(2)..=self.y(4));
            self.column(x, self.y(8)..=self.y(10));
        }
        for y in [self.y(3), self.y(9)] {
            self.row(y, self.x(8)..=self.x(14));
        }
        self.take()
    }

    fn split(&mut self) -> Vec<Coords> {
        self.row(self.y(7), ..);
        self.column(self.x(12), self.y(7)..);
        self.column(self.x(10), ..self.y(4));
        self.column(0, ..self.y(1));
        self.row(0, ..self.x(2));
        self.row(0, self.x(5)..self.x(19));
        self.row(self.y(4), self.x(13)..);
        self.row(self.y(4), ..=self.x(10));
        self.take()
    }

    fn cross(&mut self) -> Vec<Coords> {
        let (w, h) = (self.w, self.h);
        self.row(h / 2, ..);
        self.column(w / 2, ..);
        for y in [self.y(2), self.y(10)] {
            self.row(y, self.x(10)..self.x(13));
        }
        for x in [self.x(7), self.x(16)] {
            self.column(x, self.y(5)..self.y(8));
        }
        self.take()
    }

    fn labyrinth(&mut self) -> Vec<Coords> {
        self.row(self.y(1), self.x(14)..=self.x(16));
        self.row(self.y(4), ..=self.x(11));
        self.row(self.y(4), self.x(14)..);
        self.row(self.y(8), self.x(2)..=self.x(8));
        self.row(self.y(8), self.x(11)..);
        self.row(self.y(11), self.x(6)..=self.x(8));
        self.column(self.x(4), self.y(3)..=self.y(4));
        self.column(self.x(8), self.y(2)..=self.y(4));
        self.column(self.x(8), self.y(6)..);
        self.column(self.x(14), ..=self.y(5));
        self.column(self.x(14), self.y(8)..=self.y(10));
        self.column(self.x(18), self.y(8)..=self.y(9));
        self.take()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_field_has_no_obstacles() {
        let library = MazeLibrary::new(40, 20);
        assert!(library.obstacles(0).is_empty());
    }

    #[test]
    fn test_perimeter_is_the_border() {
        let (w, h) = (40, 20);
        let library = MazeLibrary::new(w, h);
        let border = library.obstacles(1);

        assert_eq!(border.len(), 2 * w as usize + 2 * h as usize - 4);
        assert!(border.iter().all(|&(x, y)| x == 0 || y == 0 || x == w - 1 || y == h - 1));
    }

    #[test]
    fn test_layout_sizes_on_minimal_field() {
        let library = MazeLibrary::new(23, 13);
        let sizes: Vec<usize> = (0..MAZE_COUNT).map(|i| library.obstacles(i).len()).collect();
        assert_eq!(sizes, vec![0, 68, 30, 30, 88, 68, 43, 61]);
    }

    #[test]
    fn test_nominal_spawns_kept_when_clear() {
        let library = MazeLibrary::new(40, 20);
        let expected = [(17, 10), (17, 10), (22, 9), (26, 4), (19, 9), (17, 9), (31, 4)];
        for (i, spawn) in expected.iter().enumerate() {
            assert_eq!(library.spawn(i), *spawn, "maze {}", i);
        }
    }

    #[test]
    fn test_every_spawn_is_clear() {
        for (w, h) in [(23, 13), (24, 17), (40, 20), (46, 26), (80, 40)] {
            let library = MazeLibrary::new(w, h);
            for i in 0..MAZE_COUNT {
                assert!(spawn_is_clear(library.obstacles(i), library.spawn(i), w, h), "maze {} on {}x{}", i, w, h);
            }
        }
    }

    #[test]
    fn test_blocked_spawn_falls_back_along_the_row() {
        // On a 46-wide field the labyrinth's nominal snake touches the wall at x=28
        let library = MazeLibrary::new(46, 26);
        assert!(!spawn_is_clear(library.obstacles(7), (34, 10), 46, 26));
        assert_eq!(library.spawn(7), (35, 10));

        let library = MazeLibrary::new(40, 20);
        assert_eq!(library.spawn(7), (31, 7));
    }

    #[test]
    fn test_obstacles_are_in_bounds() {
        for (w, h) in [(23, 13), (24, 13), (40, 20), (57, 31), (200, 100)] {
            let library = MazeLibrary::new(w, h);
            for i in 0..MAZE_COUNT {
                assert!(library.obstacles(i).iter().all(|&(x, y)| x < w && y < h));
            }
        }
    }

    #[test]
    fn test_index_wraps() {
        let library = MazeLibrary::new(40, 20);
        assert_eq!(library.spawn(9), library.spawn(1));
        assert!(Arc::ptr_eq(library.obstacles(8), library.obstacles(0)));
    }
}
