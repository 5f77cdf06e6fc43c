//! One game on one maze: the snake, its food and bonus, and the score.

use std::collections::HashSet;
use std::rc::Rc;
use std::sync::Arc;

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use crate::maze::Obstacles;
use crate::snake::{Direction, SnakeBody};
use crate::{Coords, FieldInt};

/// Ticks a freshly spawned bonus stays on the field.
pub const BONUS_TICKS: u32 = 100;
pub const FOOD_POINTS: u32 = 1;
pub const BONUS_POINTS: u32 = 10;

// A bonus appears with odds of one in three.
const BONUS_ODDS: (u32, u32) = (1, 3);

/// Called with no arguments when the snake crashes.
pub type GameOverHook = Rc<dyn Fn()>;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Tick {
    Advanced,
    GameOver,
}

/// What occupies a cell, for renderers that tell the kinds apart.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Cell {
    Head,
    Body,
    Obstacle,
    Food,
    Bonus,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Bonus {
    pub pos: Coords,
    /// Always positive while the bonus exists.
    pub remaining: u32,
}

pub struct GameController<R = Pcg32> {
    width: FieldInt,
    height: FieldInt,
    snake: SnakeBody,
    obstacles: Obstacles,
    food: Coords,
    bonus: Option<Bonus>,
    score: u32,
    rng: R,
    hooks: Vec<GameOverHook>,
    finished: bool,
}

/// A PCG generator seeded from the thread-local entropy source.
pub fn entropy_rng() -> Pcg32 {
    Pcg32::from_rng(&mut rand::rng())
}

impl GameController<Pcg32> {
    /// Open field, snake in the middle facing east.
    pub fn new(width: FieldInt, height: FieldInt, initial_length: usize) -> Self {
        GameController::new_with_rng(width, height, initial_length, entropy_rng())
    }

    pub fn with_maze(width: FieldInt, height: FieldInt, initial_length: usize, obstacles: Obstacles, head: Coords) -> Self {
        GameController::with_maze_and_rng(width, height, initial_length, obstacles, head, entropy_rng())
    }
}

impl<R: Rng> GameController<R> {
    pub fn new_with_rng(width: FieldInt, height: FieldInt, initial_length: usize, rng: R) -> Self {
        let center = (width / 2, height / 2);
        GameController::with_maze_and_rng(width, height, initial_length, Arc::default(), center, rng)
    }

    pub fn with_maze_and_rng(
        width: FieldInt,
        height: FieldInt,
        initial_length: usize,
        obstacles: Obstacles,
        head: Coords,
        rng: R,
    ) -> Self {
        let snake = SnakeBody::new(head, initial_length, Direction::East, width, height);
        let mut game = GameController {
            width,
            height,
            snake,
            obstacles,
            food: head,
            bonus: None,
            score: 0,
            rng,
            hooks: Vec::new(),
            finished: false,
        };

        game.food = game.free_cell(&[]);
        game.maybe_spawn_bonus(&[]);
        game
    }

    /// Advances the game by one tick.
    ///
    /// Collisions are judged on the resting head, before it moves; food and
    /// bonus are judged on the cell the head is about to enter, so eating
    /// and growing happen on the step that reaches the item.
    pub fn update(&mut self) -> Tick {
        if self.finished {
            return Tick::GameOver;
        }

        if let Some(bonus) = self.bonus.as_mut() {
            bonus.remaining -= 1;
        }
        if self.bonus.is_some_and(|b| b.remaining == 0) {
            self.bonus = None;
        }

        if self.snake.check_self_collision() || self.snake.check_collision(&self.obstacles) {
            log::info!("crashed at {:?} with score {}", self.snake.head(), self.score);
            self.finished = true;
            for hook in &self.hooks {
                hook();
            }
            return Tick::GameOver;
        }

        let next = self.snake.next_head();

        if next == self.food {
            self.snake.grow();
            self.score += FOOD_POINTS;

            let mut taken = vec![next];
            taken.extend(self.bonus.map(|b| b.pos));
            self.food = self.free_cell(&taken);
            self.maybe_spawn_bonus(&[next]);
            log::debug!("food eaten, score {}, next food at {:?}", self.score, self.food);
        } else if self.bonus.is_some_and(|b| b.pos == next) {
            self.bonus = None;
            self.score += BONUS_POINTS;
            self.snake.grow();
            log::debug!("bonus eaten, score {}", self.score);
        }

        self.snake.move_step();
        Tick::Advanced
    }

    // Uniform draws until a cell is free of the snake, the maze and `taken`.
    // Never returns on a saturated field.
    fn free_cell(&mut self, taken: &[Coords]) -> Coords {
        let mut draws: u64 = 0;
        loop {
            draws += 1;
            let pos = (self.rng.random_range(0..self.width), self.rng.random_range(0..self.height));
            if !self.snake.contains(pos) && !self.obstacles.contains(&pos) && !taken.contains(&pos) {
                log::trace!("free cell {:?} after {} draws", pos, draws);
                return pos;
            }
        }
    }

    fn maybe_spawn_bonus(&mut self, taken: &[Coords]) {
        if self.bonus.is_some() || !self.rng.random_ratio(BONUS_ODDS.0, BONUS_ODDS.1) {
            return;
        }

        let mut taken = taken.to_vec();
        taken.push(self.food);
        let pos = self.free_cell(&taken);
        self.bonus = Some(Bonus { pos, remaining: BONUS_TICKS });
        log::debug!("bonus at {:?}", pos);
    }
}

impl<R> GameController<R> {
    /// Every occupied cell: snake, maze, food and the bonus while it lasts.
    pub fn field(&self) -> HashSet<Coords> {
        let mut field: HashSet<Coords> = self.snake.segments().collect();
        field.extend(self.obstacles.iter().copied());
        field.insert(self.food);
        if let Some(bonus) = self.bonus {
            field.insert(bonus.pos);
        }
        field
    }

    /// Occupied cells tagged by kind, back to front: later entries are drawn
    /// over earlier ones.
    pub fn cells(&self) -> Vec<(Coords, Cell)> {
        let mut cells = Vec::with_capacity(self.obstacles.len() + self.snake.len() + 2);
        cells.extend(self.obstacles.iter().map(|&pos| (pos, Cell::Obstacle)));
        cells.push((self.food, Cell::Food));
        cells.extend(self.bonus.map(|b| (b.pos, Cell::Bonus)));
        cells.extend(self.snake.segments().skip(1).map(|pos| (pos, Cell::Body)));
        cells.push((self.snake.head(), Cell::Head));
        cells
    }

    pub fn subscribe(&mut self, hook: GameOverHook) {
        self.hooks.push(hook);
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn food(&self) -> Coords {
        self.food
    }

    pub fn bonus(&self) -> Option<Bonus> {
        self.bonus
    }

    pub fn snake(&self) -> &SnakeBody {
        &self.snake
    }

    pub fn obstacles(&self) -> &Obstacles {
        &self.obstacles
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    pub fn width(&self) -> FieldInt {
        self.width
    }

    pub fn height(&self) -> FieldInt {
        self.height
    }

    pub fn face_north(&mut self) {
        self.snake.face_north();
    }

    pub fn face_east(&mut self) {
        self.snake.face_east();
    }

    pub fn face_south(&mut self) {
        self.snake.face_south();
    }

    pub fn face_west(&mut self) {
        self.snake.face_west();
    }

    pub fn steer_left(&mut self) {
        self.snake.steer_left();
    }

    pub fn steer_right(&mut self) {
        self.snake.steer_right();
    }
}
