use std::io;
use std::thread::sleep;
use std::time::{Duration, Instant};

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use snake_mazes::settings::{HEIGHT_RANGE, WIDTH_RANGE};
use snake_mazes::{Cell, Direction, FieldInt, GameCycle, Settings, Tick};

use crate::term::{ScreenPos, TermManager};

const POLL_INTERVAL_MS: u64 = 5;
const GAME_OVER_PAUSE: Duration = Duration::from_secs(5);

// HUD on row 0, border on row 1, field from row 2
const FIELD_ORIGIN: ScreenPos = (1, 2);

const SNAKE_BODY_CHAR: char = '█';
const OBSTACLE_CHAR: char = '#';
const FOOD_CHAR: char = 'O';
const BONUS_CHAR: char = '$';

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Command {
    Face(Direction),
    SteerLeft,
    SteerRight,
    Pause,
    Quit,
}

impl Command {
    pub fn from_key_event(ev: &KeyEvent) -> Option<Command> {
        if is_ctrl_c(ev) {
            return Some(Command::Quit);
        }

        match ev.code {
            KeyCode::Char('w') | KeyCode::Up => Some(Command::Face(Direction::North)),
            KeyCode::Char('a') | KeyCode::Left => Some(Command::Face(Direction::West)),
            KeyCode::Char('s') | KeyCode::Down => Some(Command::Face(Direction::South)),
            KeyCode::Char('d') | KeyCode::Right => Some(Command::Face(Direction::East)),
            KeyCode::Char('q') => Some(Command::SteerLeft),
            KeyCode::Char('e') => Some(Command::SteerRight),
            KeyCode::Esc => Some(Command::Pause),
            _ => None,
        }
    }

    /// Whether the command does anything right now. While the game-over
    /// message is up only quitting does.
    fn is_live(self, paused: bool, crashed: bool) -> bool {
        match self {
            Command::Quit => true,
            Command::Pause => !crashed,
            _ => !paused && !crashed,
        }
    }
}

pub struct SnakeGame {
    settings: Settings,
    term: TermManager,
    cycle: GameCycle,
    paused: bool,
}

impl SnakeGame {
    pub fn new(settings: Settings, term: TermManager) -> Self {
        let cycle = GameCycle::new(settings.width, settings.height);
        SnakeGame { settings, term, cycle, paused: false }
    }

    pub fn initialize(&mut self) -> io::Result<()> {
        self.term.setup()?;
        self.term.clear()?;
        self.term.draw_borders(FIELD_ORIGIN, (self.settings.width, self.settings.height))
    }

    pub fn restore(&mut self) -> io::Result<()> {
        self.term.restore()
    }

    /// Returns `false` if the player quit from the intro screen.
    pub fn show_intro(&mut self) -> io::Result<bool> {
        let lines = &[
            "Arrow keys or WASD to move",
            "Q / E to steer left / right",
            "Esc to pause",
            "CTRL+C to quit",
            "",
            "Press any key to begin",
        ];

        self.term.show_message(lines)?;
        let key = self.term.read_key_blocking()?;
        self.term.hide_message()?;

        Ok(!is_ctrl_c(&key))
    }

    /// Runs games back to back until the player quits.
    pub fn play(&mut self) -> io::Result<()> {
        let interval = self.settings.tick_interval();
        let mut next_step = Instant::now() + interval;
        let mut resume_at: Option<Instant> = None;

        self.draw_frame()?;

        loop {
            sleep(Duration::from_millis(POLL_INTERVAL_MS));

            for key_ev in self.term.read_key_events_queue()? {
                let Some(cmd) = Command::from_key_event(&key_ev) else {
                    continue;
                };
                if !cmd.is_live(self.paused, resume_at.is_some()) {
                    continue;
                }

                match cmd {
                    Command::Quit => return Ok(()),
                    Command::Pause => self.toggle_pause()?,
                    cmd => self.apply(cmd),
                }
            }

            let now = Instant::now();

            if self.paused {
                next_step = now + interval;
                continue;
            }

            // Slow phase after a crash, the next maze is already loaded
            if let Some(at) = resume_at {
                if now < at {
                    continue;
                }
                resume_at = None;
                next_step = now + interval;
                self.term.hide_message()?;
                self.draw_frame()?;
                continue;
            }

            if now < next_step {
                continue;
            }
            next_step += interval;

            let score = self.cycle.controller().score();
            if self.cycle.update() == Tick::GameOver {
                self.draw_frame()?;
                self.game_over(score)?;
                resume_at = Some(now + GAME_OVER_PAUSE);
                continue;
            }

            self.draw_frame()?;
        }
    }

    ///////////////////////////////////////////////////////////////////////////

    fn apply(&mut self, cmd: Command) {
        let game = self.cycle.controller_mut();
        match cmd {
            Command::Face(Direction::North) => game.face_north(),
            Command::Face(Direction::East) => game.face_east(),
            Command::Face(Direction::South) => game.face_south(),
            Command::Face(Direction::West) => game.face_west(),
            Command::SteerLeft => game.steer_left(),
            Command::SteerRight => game.steer_right(),
            Command::Pause | Command::Quit => {}
        }
    }

    fn draw_frame(&mut self) -> io::Result<()> {
        let (w, h) = (self.settings.width as usize, self.settings.height as usize);
        let game = self.cycle.controller();
        let mut frame = vec![' '; w * h];

        for ((x, y), cell) in game.cells() {
            frame[y as usize * w + x as usize] = match cell {
                Cell::Head => game.snake().head_char(),
                Cell::Body => SNAKE_BODY_CHAR,
                Cell::Obstacle => OBSTACLE_CHAR,
                Cell::Food => FOOD_CHAR,
                Cell::Bonus => BONUS_CHAR,
            };
        }

        let hud = format!(
            "Maze: {}  Score: {}  Speed: {}",
            self.cycle.maze_index(),
            game.score(),
            self.settings.speed
        );
        let hud = format!("{:<width$}", hud, width = w + 2);

        for (i, ch) in frame.into_iter().enumerate() {
            let pos = (FIELD_ORIGIN.0 + (i % w) as u16, FIELD_ORIGIN.1 + (i / w) as u16);
            self.term.print_at(pos, ch)?;
        }
        self.term.print_str_at((0, 0), &hud)?;
        self.term.flush()
    }

    fn game_over(&mut self, score: u32) -> io::Result<()> {
        self.term.show_message(&[
            "Game over!",
            &format!("Score: {}", score),
            "",
            &format!("Next up: maze {}", self.cycle.maze_index()),
        ])
    }

    fn toggle_pause(&mut self) -> io::Result<()> {
        if !self.paused {
            self.term.show_message(&["Paused", "Press Esc to resume", "or Ctrl+C to quit"])?;
        } else {
            self.term.hide_message()?;
        }

        self.paused = !self.paused;
        Ok(())
    }
}

/// Shrinks the field so it fits on a terminal of `term` columns and rows
/// together with its border and the HUD; `None` if even the smallest field
/// does not fit.
pub fn fit_to_terminal(settings: Settings, term: ScreenPos) -> Option<Settings> {
    let max_width = term.0.checked_sub(2)?;
    let max_height = term.1.checked_sub(3)?;
    let width: FieldInt = settings.width.min(max_width);
    let height: FieldInt = settings.height.min(max_height);

    if width < *WIDTH_RANGE.start() || height < *HEIGHT_RANGE.start() {
        return None;
    }

    Some(Settings { width, height, ..settings })
}

fn is_ctrl_c(ev: &KeyEvent) -> bool {
    ev.code == KeyCode::Char('c') && ev.modifiers.contains(KeyModifiers::CONTROL)
}
