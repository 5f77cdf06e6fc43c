//! Snake on a wrapping grid, with eight mazes played in turn.
//!
//! - `snake`: segments, direction and steering
//! - `maze`: the eight obstacle layouts and their spawn points
//! - `controller`: one game: food, bonus, score, collisions
//! - `cycle`: restarts on the next maze after every game over
//! - `settings`: field size and speed

pub mod controller;
pub mod cycle;
pub mod maze;
pub mod settings;
pub mod snake;

pub type FieldInt = u16;
pub type Coords = (FieldInt, FieldInt);

pub use controller::{Bonus, Cell, GameController, GameOverHook, Tick};
pub use cycle::GameCycle;
pub use maze::{MazeLibrary, Obstacles, MAZE_COUNT};
pub use settings::{Settings, SettingsError};
pub use snake::{Direction, SnakeBody, INITIAL_LENGTH};
