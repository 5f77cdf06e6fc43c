mod game;
mod term;

use std::env;
use std::path::PathBuf;

use anyhow::{bail, Context};
use snake_mazes::Settings;

const DEFAULT_SETTINGS_PATH: &str = "snake-settings.json";
const CONFIG_USAGE: &str = "usage: snake-mazes config <width> <height> <speed>";

fn main() -> anyhow::Result<()> {
    // Logs go to stderr; redirect it when RUST_LOG is set
    env_logger::init();

    let path = env::var_os("SNAKE_SETTINGS")
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_SETTINGS_PATH));

    let args: Vec<String> = env::args().skip(1).collect();
    if args.first().map(String::as_str) == Some("config") {
        let settings = config_from_args(&args[1..])?;
        settings.save(&path).with_context(|| format!("saving {}", path.display()))?;
        println!(
            "Saved {}x{} at speed {} to {}",
            settings.width,
            settings.height,
            settings.speed,
            path.display()
        );
        return Ok(());
    }

    let settings = Settings::load(&path).with_context(|| format!("loading {}", path.display()))?;

    let term = term::TermManager::new().context("reading terminal size")?;
    let Some(fitted) = game::fit_to_terminal(settings, term.size()) else {
        bail!("terminal {:?} is too small for a snake field", term.size());
    };
    if fitted != settings {
        log::warn!("field shrunk to {}x{} to fit the terminal", fitted.width, fitted.height);
    }

    let mut game = game::SnakeGame::new(fitted, term);
    let result = game.initialize().and_then(|_| {
        if game.show_intro()? {
            game.play()?;
        }
        Ok(())
    });

    // The terminal is restored even when the game loop failed
    game.restore().context("restoring terminal")?;
    result.context("terminal I/O")
}

/// Reads `<width> <height> <speed>` and checks them against the allowed ranges.
fn config_from_args(args: &[String]) -> anyhow::Result<Settings> {
    let [width, height, speed] = args else {
        bail!(CONFIG_USAGE);
    };

    let settings = Settings {
        width: width.parse().with_context(|| format!("width {:?}", width))?,
        height: height.parse().with_context(|| format!("height {:?}", height))?,
        speed: speed.parse().with_context(|| format!("speed {:?}", speed))?,
    };
    settings.validate()?;
    Ok(settings)
}
