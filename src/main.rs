mod app;
mod command;
mod config;
mod consts;
mod game;
mod keys;
mod logging;
mod render;
mod util;
use crate::app::App;
use crate::config::{Config, GameConfig};
use crate::game::GameEngine;
use crate::keys::TerminalKeys;
use anyhow::Context;
use lexopt::{Arg, Parser};
use ratatui::DefaultTerminal;
use std::io::{self, ErrorKind};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::info;

const USAGE: &str = "\
Usage: wrapsnake [<options>]

Play Snake on a board whose edges wrap around

Options:
  -c <file>, --config <file>
                    Read configuration from the given file

  --log-file <file> Append log messages to the given file

  -h, --help        Display this help message and exit
  -V, --version     Show the program version and exit
";

#[derive(Clone, Debug, Eq, PartialEq)]
enum Arguments {
    Run {
        config: Option<PathBuf>,
        log_file: Option<PathBuf>,
    },
    Help,
    Version,
}

impl Arguments {
    fn from_parser(mut parser: Parser) -> Result<Arguments, lexopt::Error> {
        let mut config = None;
        let mut log_file = None;
        while let Some(arg) = parser.next()? {
            match arg {
                Arg::Short('c') | Arg::Long("config") => {
                    config = Some(PathBuf::from(parser.value()?));
                }
                Arg::Long("log-file") => log_file = Some(PathBuf::from(parser.value()?)),
                Arg::Short('h') | Arg::Long("help") => return Ok(Arguments::Help),
                Arg::Short('V') | Arg::Long("version") => return Ok(Arguments::Version),
                _ => return Err(arg.unexpected()),
            }
        }
        Ok(Arguments::Run { config, log_file })
    }
}

fn main() -> ExitCode {
    match Arguments::from_parser(Parser::from_env()) {
        Ok(Arguments::Run { config, log_file }) => exit_code(run(config, log_file)),
        Ok(Arguments::Help) => {
            print!("{USAGE}");
            ExitCode::SUCCESS
        }
        Ok(Arguments::Version) => {
            println!("wrapsnake {}", env!("CARGO_PKG_VERSION"));
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("wrapsnake: {e}");
            eprintln!("Run `wrapsnake --help` for usage information");
            ExitCode::from(2)
        }
    }
}

fn run(config_path: Option<PathBuf>, log_file: Option<PathBuf>) -> anyhow::Result<()> {
    let config = match config_path {
        Some(path) => Config::load(&path, false)
            .with_context(|| format!("failed to load configuration from {}", path.display()))?,
        None => match Config::default_path() {
            Ok(path) => Config::load(&path, true).with_context(|| {
                format!("failed to load configuration from {}", path.display())
            })?,
            Err(_) => Config::default(),
        },
    };
    let log_file = log_file.or(config.log.file);
    logging::init(log_file.as_deref(), config.log.filter.as_deref())
        .context("failed to set up logging")?;
    let game = config.game;
    let size = game.grid_size();
    info!(
        width = size.width,
        height = size.height,
        start_interval_ms = game.start_interval_ms(),
        min_interval_ms = game.min_interval_ms(),
        "Starting wrapsnake {}",
        env!("CARGO_PKG_VERSION")
    );
    let terminal = ratatui::init();
    let r = play(terminal, game);
    ratatui::restore();
    r?;
    info!("Exiting");
    Ok(())
}

fn play(terminal: DefaultTerminal, game: GameConfig) -> io::Result<()> {
    let release_events = keys::request_release_events()?;
    info!(release_events, "Terminal keyboard support detected");
    let r = App::new(GameEngine::new(game)).run(terminal, TerminalKeys::new(release_events));
    let restored = if release_events {
        keys::restore_key_events()
    } else {
        Ok(())
    };
    r.and(restored)
}

fn exit_code(r: anyhow::Result<()>) -> ExitCode {
    match r {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) if is_broken_pipe(&e) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("wrapsnake: {e:?}");
            ExitCode::from(2)
        }
    }
}

fn is_broken_pipe(e: &anyhow::Error) -> bool {
    e.chain().any(|cause| {
        cause
            .downcast_ref::<io::Error>()
            .is_some_and(|ioe| ioe.kind() == ErrorKind::BrokenPipe)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(&[], Arguments::Run { config: None, log_file: None })]
    #[case(
        &["-c", "snake.toml"],
        Arguments::Run { config: Some(PathBuf::from("snake.toml")), log_file: None },
    )]
    #[case(
        &["--config=snake.toml", "--log-file", "snake.log"],
        Arguments::Run {
            config: Some(PathBuf::from("snake.toml")),
            log_file: Some(PathBuf::from("snake.log")),
        },
    )]
    #[case(&["--config", "x.toml", "-h"], Arguments::Help)]
    #[case(&["--version"], Arguments::Version)]
    #[case(&["-V", "--bogus"], Arguments::Version)]
    fn parse_args(#[case] args: &[&str], #[case] parsed: Arguments) {
        assert_eq!(
            Arguments::from_parser(Parser::from_args(args.iter().copied())).unwrap(),
            parsed
        );
    }

    #[rstest]
    #[case(&["--bogus"])]
    #[case(&["extra"])]
    #[case(&["--config"])]
    fn bad_args(#[case] args: &[&str]) {
        assert!(Arguments::from_parser(Parser::from_args(args.iter().copied())).is_err());
    }

    #[test]
    fn broken_pipe() {
        let e = anyhow::Error::new(io::Error::from(ErrorKind::BrokenPipe)).context("drawing");
        assert!(is_broken_pipe(&e));
        let e = anyhow::Error::new(io::Error::from(ErrorKind::NotFound)).context("loading");
        assert!(!is_broken_pipe(&e));
        assert!(!is_broken_pipe(&anyhow::anyhow!("no config")));
    }
}
