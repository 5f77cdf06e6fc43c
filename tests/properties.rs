use proptest::prelude::*;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use snake_mazes::maze::spawn_is_clear;
use snake_mazes::{Direction, GameController, MazeLibrary, SnakeBody, Tick, MAZE_COUNT};

fn direction() -> impl Strategy<Value = Direction> {
    prop_oneof![
        Just(Direction::North),
        Just(Direction::East),
        Just(Direction::South),
        Just(Direction::West),
    ]
}

proptest! {
    #[test]
    fn move_shifts_body_and_wraps_head(
        width in 2u16..60,
        height in 2u16..60,
        x in 0u16..60,
        y in 0u16..60,
        len in 1usize..10,
        dir in direction(),
    ) {
        let head = (x % width, y % height);
        let mut snake = SnakeBody::new(head, len, dir, width, height);
        let before: Vec<_> = snake.segments().collect();

        snake.move_step();
        let after: Vec<_> = snake.segments().collect();

        prop_assert_eq!(after.len(), before.len());
        prop_assert_eq!(&after[1..], &before[..before.len() - 1]);

        let expected = match dir {
            Direction::North => (head.0, (head.1 + height - 1) % height),
            Direction::East => ((head.0 + 1) % width, head.1),
            Direction::South => (head.0, (head.1 + 1) % height),
            Direction::West => ((head.0 + width - 1) % width, head.1),
        };
        prop_assert_eq!(after[0], expected);
        prop_assert!(after.iter().all(|&(x, y)| x < width && y < height));
    }

    #[test]
    fn four_steers_are_a_full_turn(dir in direction(), left in any::<bool>()) {
        let mut snake = SnakeBody::new((5, 5), 3, dir, 20, 20);
        for _ in 0..4 {
            if left { snake.steer_left() } else { snake.steer_right() }
        }
        prop_assert_eq!(snake.direction(), dir);
    }

    #[test]
    fn only_reversal_is_refused(from in direction(), to in direction()) {
        let mut snake = SnakeBody::new((5, 5), 3, from, 20, 20);
        snake.set_direction(to);
        let expected = if to == from.opposite() { from } else { to };
        prop_assert_eq!(snake.direction(), expected);
    }

    #[test]
    fn spawns_never_overlap_their_maze(width in 23u16..=200, height in 13u16..=100) {
        let library = MazeLibrary::new(width, height);
        for i in 0..MAZE_COUNT {
            prop_assert!(spawn_is_clear(library.obstacles(i), library.spawn(i), width, height));
        }
    }

    #[test]
    fn items_stay_off_snake_and_maze(seed in any::<u64>(), maze in 0usize..MAZE_COUNT, turns in prop::collection::vec(0u8..4, 60)) {
        let (width, height) = (30, 16);
        let library = MazeLibrary::new(width, height);
        let mut game = GameController::with_maze_and_rng(
            width,
            height,
            7,
            library.obstacles(maze).clone(),
            library.spawn(maze),
            Pcg32::seed_from_u64(seed),
        );

        for turn in turns {
            match turn {
                0 => game.steer_left(),
                1 => game.steer_right(),
                _ => {}
            }
            let len = game.snake().len();
            let score = game.score();

            if game.update() == Tick::GameOver {
                break;
            }

            let grown = game.snake().len() - len;
            prop_assert!(grown <= 1);
            prop_assert!(game.score() >= score);
            prop_assert!(!game.snake().contains(game.food()));
            prop_assert!(!game.obstacles().contains(&game.food()));
            if let Some(bonus) = game.bonus() {
                prop_assert!(bonus.remaining > 0);
                prop_assert_ne!(bonus.pos, game.food());
                prop_assert!(!game.obstacles().contains(&bonus.pos));
            }
        }
    }
}
