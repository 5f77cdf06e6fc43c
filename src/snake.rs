use std::collections::{HashSet, VecDeque};

use crate::{Coords, FieldInt};
use Direction::*;

/// Length of a freshly spawned snake.
pub const INITIAL_LENGTH: usize = 7;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Direction {
    North,
    East,
    South,
    West,
}

// Row: current direction, column: requested direction (N, E, S, W).
// The only forbidden transition is an in-place reversal.
const TRANSITIONS: [[bool; 4]; 4] = [
    [true, true, false, true],
    [true, true, true, false],
    [false, true, true, true],
    [true, false, true, true],
];

const CLOCKWISE: [Direction; 4] = [North, East, South, West];

impl Direction {
    fn index(self) -> usize {
        match self {
            North => 0,
            East => 1,
            South => 2,
            West => 3,
        }
    }

    pub fn opposite(self) -> Direction {
        CLOCKWISE[(self.index() + 2) % 4]
    }

    pub fn left(self) -> Direction {
        CLOCKWISE[(self.index() + 3) % 4]
    }

    pub fn right(self) -> Direction {
        CLOCKWISE[(self.index() + 1) % 4]
    }

    /// Whether a snake facing `self` may turn to face `next` in one step.
    pub fn can_turn_to(self, next: Direction) -> bool {
        TRANSITIONS[self.index()][next.index()]
    }

    /// Steps `pos` one cell in this direction on a `width` x `height` torus.
    pub fn step(self, pos: Coords, width: FieldInt, height: FieldInt) -> Coords {
        let (x, y) = pos;
        match self {
            North => (x, (y + height - 1) % height),
            East => ((x + 1) % width, y),
            South => (x, (y + 1) % height),
            West => ((x + width - 1) % width, y),
        }
    }
}

/// Ordered snake segments, head first.
#[derive(Clone, Debug)]
pub struct SnakeBody {
    body: VecDeque<Coords>,
    direction: Direction,
    // Direction of the last move; a face command may not reverse it
    heading: Direction,
    width: FieldInt,
    height: FieldInt,
    pending_growth: usize,
}

impl SnakeBody {
    /// Lays out `length` segments from `head` backwards, opposite to `direction`.
    pub fn new(head: Coords, length: usize, direction: Direction, width: FieldInt, height: FieldInt) -> Self {
        let behind = direction.opposite();
        let mut body = VecDeque::with_capacity(length);
        let mut pos = head;

        for _ in 0..length {
            body.push_back(pos);
            pos = behind.step(pos, width, height);
        }

        SnakeBody { body, direction, heading: direction, width, height, pending_growth: 0 }
    }

    pub fn head(&self) -> Coords {
        self.body[0]
    }

    pub fn segments(&self) -> impl Iterator<Item = Coords> + '_ {
        self.body.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.body.len()
    }

    pub fn contains(&self, pos: Coords) -> bool {
        self.body.contains(&pos)
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// The cell the head will occupy after the next move.
    pub fn next_head(&self) -> Coords {
        self.direction.step(self.head(), self.width, self.height)
    }

    /// Every segment takes its predecessor's place and the head steps forward.
    /// A pending growth keeps the tail where it is.
    pub fn move_step(&mut self) {
        let new_head = self.next_head();
        self.body.push_front(new_head);
        self.heading = self.direction;

        if self.pending_growth > 0 {
            self.pending_growth -= 1;
        } else {
            self.body.pop_back();
        }
    }

    /// The next move prepends a head without dropping the tail.
    pub fn grow(&mut self) {
        self.pending_growth += 1;
    }

    pub fn check_self_collision(&self) -> bool {
        let head = self.head();
        self.body.iter().skip(1).any(|&seg| seg == head)
    }

    pub fn check_collision(&self, obstacles: &HashSet<Coords>) -> bool {
        obstacles.contains(&self.head())
    }

    pub fn steer_left(&mut self) {
        self.direction = self.direction.left();
    }

    pub fn steer_right(&mut self) {
        self.direction = self.direction.right();
    }

    pub fn face_north(&mut self) {
        self.set_direction(North);
    }

    pub fn face_east(&mut self) {
        self.set_direction(East);
    }

    pub fn face_south(&mut self) {
        self.set_direction(South);
    }

    pub fn face_west(&mut self) {
        self.set_direction(West);
    }

    /// Turns to `new_direction` unless that reverses the last move. Several
    /// calls between two moves are all judged against that same move.
    pub fn set_direction(&mut self, new_direction: Direction) {
        if self.heading.can_turn_to(new_direction) {
            self.direction = new_direction;
        }
    }

    pub fn head_char(&self) -> char {
        match self.direction {
            North => '^',
            South => 'v',
            West => '<',
            East => '>',
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn body(snake: &SnakeBody) -> Vec<Coords> {
        snake.segments().collect()
    }

    #[test]
    fn test_new_walks_backwards_from_head() {
        let snake = SnakeBody::new((10, 10), 3, East, 20, 20);
        assert_eq!(body(&snake), vec![(10, 10), (9, 10), (8, 10)]);

        let snake = SnakeBody::new((5, 5), 3, North, 20, 20);
        assert_eq!(body(&snake), vec![(5, 5), (5, 6), (5, 7)]);
    }

    #[test]
    fn test_new_wraps_around_the_edge() {
        let snake = SnakeBody::new((1, 0), 4, East, 20, 10);
        assert_eq!(body(&snake), vec![(1, 0), (0, 0), (19, 0), (18, 0)]);
    }

    #[test]
    fn test_move_shifts_segments() {
        let mut snake = SnakeBody::new((10, 10), 3, East, 20, 20);
        snake.move_step();
        assert_eq!(body(&snake), vec![(11, 10), (10, 10), (9, 10)]);

        snake.face_south();
        snake.move_step();
        assert_eq!(body(&snake), vec![(11, 11), (11, 10), (10, 10)]);
    }

    #[test]
    fn test_move_wraps_on_every_side() {
        let mut snake = SnakeBody::new((19, 3), 1, East, 20, 10);
        snake.move_step();
        assert_eq!(snake.head(), (0, 3));

        let mut snake = SnakeBody::new((0, 3), 1, West, 20, 10);
        snake.move_step();
        assert_eq!(snake.head(), (19, 3));

        let mut snake = SnakeBody::new((4, 0), 1, North, 20, 10);
        snake.move_step();
        assert_eq!(snake.head(), (4, 9));

        let mut snake = SnakeBody::new((4, 9), 1, South, 20, 10);
        snake.move_step();
        assert_eq!(snake.head(), (4, 0));
    }

    #[test]
    fn test_grow_keeps_tail_on_next_move() {
        let mut snake = SnakeBody::new((10, 10), 3, East, 20, 20);
        snake.grow();
        assert_eq!(snake.len(), 3);

        snake.move_step();
        assert_eq!(body(&snake), vec![(11, 10), (10, 10), (9, 10), (8, 10)]);

        snake.move_step();
        assert_eq!(body(&snake), vec![(12, 10), (11, 10), (10, 10), (9, 10)]);
    }

    #[test]
    fn test_self_collision() {
        let snake = SnakeBody::new((3, 3), 1, East, 20, 20);
        assert!(!snake.check_self_collision());

        // Tight loop: E, S, W, N brings the head back onto the body
        let mut snake = SnakeBody::new((10, 10), 5, East, 20, 20);
        assert!(!snake.check_self_collision());
        snake.face_south();
        snake.move_step();
        snake.face_west();
        snake.move_step();
        snake.face_north();
        snake.move_step();
        assert!(snake.check_self_collision());
    }

    #[test]
    fn test_obstacle_collision() {
        let snake = SnakeBody::new((3, 3), 3, East, 20, 20);
        let mut obstacles = HashSet::new();
        obstacles.insert((2, 3));
        assert!(!snake.check_collision(&obstacles));

        obstacles.insert((3, 3));
        assert!(snake.check_collision(&obstacles));
    }

    #[test]
    fn test_reversal_is_ignored() {
        let mut snake = SnakeBody::new((10, 10), 3, East, 20, 20);
        snake.face_west();
        assert_eq!(snake.direction(), East);

        snake.face_north();
        snake.move_step();
        assert_eq!(snake.direction(), North);
        snake.face_south();
        assert_eq!(snake.direction(), North);

        snake.face_east();
        snake.move_step();
        snake.face_south();
        assert_eq!(snake.direction(), South);
    }

    #[test]
    fn test_two_turns_before_a_move_cannot_reverse() {
        let mut snake = SnakeBody::new((10, 10), 3, East, 20, 20);
        snake.face_north();
        snake.face_west();
        assert_eq!(snake.direction(), North);

        snake.move_step();
        assert_eq!(body(&snake), vec![(10, 9), (10, 10), (9, 10)]);
        assert!(!snake.check_self_collision());

        // Once the snake has gone north, west is a plain turn again
        snake.face_west();
        snake.move_step();
        assert_eq!(body(&snake), vec![(9, 9), (10, 9), (10, 10)]);
        assert!(!snake.check_self_collision());
    }

    #[test]
    fn test_steering_cycles() {
        let mut snake = SnakeBody::new((10, 10), 3, East, 20, 20);
        snake.steer_left();
        assert_eq!(snake.direction(), North);
        snake.steer_left();
        assert_eq!(snake.direction(), West);
        snake.steer_left();
        assert_eq!(snake.direction(), South);
        snake.steer_left();
        assert_eq!(snake.direction(), East);

        snake.steer_right();
        assert_eq!(snake.direction(), South);
    }

    #[test]
    fn test_transition_table_only_forbids_opposites() {
        for from in CLOCKWISE {
            for to in CLOCKWISE {
                assert_eq!(from.can_turn_to(to), to != from.opposite(), "{:?} -> {:?}", from, to);
            }
        }
    }
}
