//! voxplay - voice-controlled learning quiz and maze game.

#![forbid(unsafe_code)]

use std::io::{self, BufRead, Write};

use anyhow::{Context, Result};
use clap::Parser;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use voxplay::learning::run_learning;
use voxplay::menu;
use voxplay::play::{play_maze, play_quiz};
use voxplay::speech::{ListenMode, MenuChoice};
use voxplay::{load_bank, Services, Settings};

mod cli;

use cli::{Cli, Command};

fn main() -> Result<()> {
    let cli = Cli::parse();
    let settings = cli.apply(Settings::from_env());

    // The terminal belongs to the games, so logs go to a file.
    let appender = tracing_appender::rolling::never(&settings.log_dir, "voxplay.log");
    let (writer, _guard) = tracing_appender::non_blocking(appender);
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "voxplay=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(writer).with_ansi(false))
        .init();

    info!("Starting voxplay v{}", env!("CARGO_PKG_VERSION"));

    let services = Services::from_settings(&settings);
    let command = match cli.command.unwrap_or(Command::Menu) {
        Command::Menu => {
            let stdin = io::stdin();
            match menu::choose(&services, stdin.lock(), &mut io::stdout())? {
                MenuChoice::Quiz => Command::Quiz,
                MenuChoice::Maze => Command::Maze,
                MenuChoice::Exit => return Ok(()),
            }
        }
        other => other,
    };

    match command {
        Command::Quiz => {
            let questions = load_bank(&settings.quiz_bank)
                .with_context(|| format!("loading {}", settings.quiz_bank.display()))?;
            let outcome = play_quiz(&settings, &services, questions)?;
            println!("{:?}", outcome);
        }
        Command::Maze => {
            let mut rng = match settings.seed {
                Some(seed) => StdRng::seed_from_u64(seed),
                None => StdRng::from_entropy(),
            };
            let outcome = play_maze(&settings, &services, &mut rng)?;
            println!("{:?}", outcome);
        }
        Command::Learn => {
            let questions = load_bank(&settings.learning_bank)
                .with_context(|| format!("loading {}", settings.learning_bank.display()))?;
            let listening = settings.stt_command.is_some();
            let stdin = io::stdin();
            let score = run_learning(&services, &questions, |q| {
                println!("\n{}", q.question);
                if listening {
                    let heard = services.hear(ListenMode::Quiz);
                    if !heard.is_empty() {
                        println!("You said: {}", heard);
                        return Ok(heard);
                    }
                }
                print!("> ");
                io::stdout().flush()?;
                let mut line = String::new();
                if stdin.lock().read_line(&mut line)? == 0 {
                    return Err(io::Error::new(
                        io::ErrorKind::UnexpectedEof,
                        "input closed before every question was answered",
                    ));
                }
                Ok(line.trim().to_string())
            })?;
            println!("Score: {} / {}", score, questions.len());
        }
        Command::Menu => {}
    }

    Ok(())
}
