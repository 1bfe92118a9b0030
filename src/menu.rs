use std::io::{self, BufRead, Write};

use crate::speech::{MenuChoice, Services};

const BANNER: &str = "\n===================================
VOICE CONTROLLED LEARNING GAME
===================================
0 -> Learning Quiz
1 -> Maze Game
2 -> Exit
===================================\n";

/// Typed menu. Loops until a valid choice; end of input counts as exit.
pub fn choose<R: BufRead, W: Write>(
    services: &Services,
    mut input: R,
    out: &mut W,
) -> io::Result<MenuChoice> {
    services.say("Welcome to the learning and gaming system.");
    writeln!(out, "{}", BANNER)?;

    let choice = loop {
        write!(out, "Enter your choice (0 / 1 / 2): ")?;
        out.flush()?;
        let mut line = String::new();
        if input.read_line(&mut line)? == 0 {
            break MenuChoice::Exit;
        }
        match MenuChoice::from_typed(&line) {
            Some(choice) => break choice,
            None => writeln!(out, "Invalid input. Please enter 0, 1, or 2.")?,
        }
    };

    services.say(match choice {
        MenuChoice::Quiz => "Starting learning quiz.",
        MenuChoice::Maze => "Starting maze game.",
        MenuChoice::Exit => "Exiting system.",
    });
    Ok(choice)
}
