//! Game after game, one maze after another.

use std::rc::Rc;
use std::sync::Arc;

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use crate::controller::{entropy_rng, GameController, GameOverHook, Tick};
use crate::maze::{MazeLibrary, MAZE_COUNT};
use crate::snake::INITIAL_LENGTH;
use crate::FieldInt;

/// Owns the running game. When it ends, the next maze is loaded into a fresh
/// controller and every registered hook is attached to it.
pub struct GameCycle<R = Pcg32> {
    library: MazeLibrary,
    maze_index: usize,
    controller: GameController<R>,
    rng: R,
    hooks: Vec<GameOverHook>,
    games_played: u32,
}

impl GameCycle<Pcg32> {
    pub fn new(width: FieldInt, height: FieldInt) -> Self {
        GameCycle::with_rng(width, height, entropy_rng())
    }
}

impl<R: Rng + SeedableRng> GameCycle<R> {
    pub fn with_rng(width: FieldInt, height: FieldInt, rng: R) -> Self {
        GameCycle::from_library(MazeLibrary::new(width, height), rng)
    }

    pub fn from_library(library: MazeLibrary, mut rng: R) -> Self {
        let controller = spawn(&library, 0, &mut rng);
        log::info!("starting on maze 0 ({}x{})", library.width(), library.height());

        GameCycle { library, maze_index: 0, controller, rng, hooks: Vec::new(), games_played: 0 }
    }

    /// Ticks the current game; a crash switches to the next maze before
    /// returning [`Tick::GameOver`].
    pub fn update(&mut self) -> Tick {
        let tick = self.controller.update();
        if tick == Tick::GameOver {
            self.next_maze();
        }
        tick
    }

    fn next_maze(&mut self) {
        let score = self.controller.score();
        self.games_played += 1;
        self.maze_index = (self.maze_index + 1) % MAZE_COUNT;
        self.controller = spawn(&self.library, self.maze_index, &mut self.rng);

        for hook in &self.hooks {
            self.controller.subscribe(Rc::clone(hook));
        }

        log::info!(
            "game {} ended with score {}, moving on to maze {}",
            self.games_played,
            score,
            self.maze_index
        );
    }
}

impl<R> GameCycle<R> {
    /// Registers a hook for every game over from now on, across restarts.
    pub fn subscribe(&mut self, hook: GameOverHook) {
        self.controller.subscribe(Rc::clone(&hook));
        self.hooks.push(hook);
    }

    pub fn controller(&self) -> &GameController<R> {
        &self.controller
    }

    pub fn controller_mut(&mut self) -> &mut GameController<R> {
        &mut self.controller
    }

    pub fn maze_index(&self) -> usize {
        self.maze_index
    }

    pub fn library(&self) -> &MazeLibrary {
        &self.library
    }

    pub fn games_played(&self) -> u32 {
        self.games_played
    }
}

fn spawn<R: Rng + SeedableRng>(library: &MazeLibrary, index: usize, rng: &mut R) -> GameController<R> {
    GameController::with_maze_and_rng(
        library.width(),
        library.height(),
        INITIAL_LENGTH,
        Arc::clone(library.obstacles(index)),
        library.spawn(index),
        R::from_rng(rng),
    )
}
