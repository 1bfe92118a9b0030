//! Fixed-tick terminal loops that drive the game sessions.

use std::io::{self, Stdout, Write};
use std::thread;
use std::time::{Duration, Instant};

use crossterm::cursor::{Hide, Show};
use crossterm::event::{self, Event, KeyEvent};
use crossterm::terminal::{self, EnterAlternateScreen, LeaveAlternateScreen};
use crossterm::ExecutableCommand;
use rand::Rng;
use tracing::info;

use crate::config::Settings;
use crate::error::Result;
use crate::keyboard::{Dictation, KeyAction};
use crate::mailbox::{Mailbox, Poster};
use crate::maze_game::{MazeEvent, MazeSession};
use crate::quiz::{Question, QuizSession};
use crate::render::{Feedback, MazeRenderer, QuizScreen, QuizView};
use crate::speech::{ListenMode, Listener, MazeCommand, Services};

const FEEDBACK_PAUSE: Duration = Duration::from_millis(1500);
const FINISH_PAUSE: Duration = Duration::from_millis(2000);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Maze goal reached.
    Won,
    /// Every quiz question answered.
    Completed { score: u32 },
    /// Spoken or typed exit.
    Quit,
    /// Esc, the terminal's equivalent of closing the window.
    Closed,
}

/// The screen a game loop draws on and reads keys from.
pub trait Console: Write {
    fn size(&mut self) -> io::Result<(u16, u16)>;

    /// Next pending key, never blocking.
    fn next_key(&mut self) -> io::Result<Option<KeyEvent>>;

    /// Keeps the current frame up for `time`.
    fn hold(&mut self, time: Duration);
}

/// The real terminal, in raw mode on the alternate screen.
pub struct Tty {
    out: Stdout,
}

impl Write for Tty {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.out.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.out.flush()
    }
}

impl Console for Tty {
    fn size(&mut self) -> io::Result<(u16, u16)> {
        terminal::size()
    }

    fn next_key(&mut self) -> io::Result<Option<KeyEvent>> {
        while event::poll(Duration::ZERO)? {
            if let Event::Key(key) = event::read()? {
                return Ok(Some(key));
            }
        }
        Ok(None)
    }

    fn hold(&mut self, time: Duration) {
        thread::sleep(time);
    }
}

/// Leaves the alternate screen and raw mode when dropped, whichever way the
/// game ends.
struct Screen<'a, W: Write>(&'a mut W);

impl<W: Write> Drop for Screen<'_, W> {
    fn drop(&mut self) {
        let _ = self.0.execute(Show);
        let _ = self.0.execute(LeaveAlternateScreen);
        let _ = terminal::disable_raw_mode();
    }
}

fn on_alternate_screen<W: Write, T>(out: &mut W, f: impl FnOnce(&mut W) -> Result<T>) -> Result<T> {
    let mut screen = Screen(out);
    screen.0.execute(EnterAlternateScreen)?;
    screen.0.execute(Hide)?;
    f(&mut *screen.0)
}

/// Runs `f` on the real terminal and restores it afterwards, including when
/// setting it up fails half way.
pub fn with_terminal<T>(f: impl FnOnce(&mut Tty) -> Result<T>) -> Result<T> {
    terminal::enable_raw_mode()?;
    let mut tty = Tty { out: io::stdout() };
    on_alternate_screen(&mut tty, f)
}

/// Sleeps to the next frame deadline. A frame that overran starts the
/// schedule again from now.
struct Ticker {
    frame: Duration,
    next: Instant,
}

impl Ticker {
    fn new(frame: Duration) -> Self {
        Self {
            frame,
            next: Instant::now() + frame,
        }
    }

    fn wait(&mut self) {
        let now = Instant::now();
        match self.next.checked_duration_since(now) {
            Some(left) => {
                thread::sleep(left);
                self.next += self.frame;
            }
            None => self.next = now + self.frame,
        }
    }
}

/// Feeds every pending key to the dictation line.
fn pump_keys<C: Console>(
    console: &mut C,
    dictation: &mut Dictation,
    poster: &Poster,
) -> io::Result<KeyAction> {
    while let Some(key) = console.next_key()? {
        if dictation.handle(key, poster) == KeyAction::Close {
            return Ok(KeyAction::Close);
        }
    }
    Ok(KeyAction::None)
}

pub fn play_maze(settings: &Settings, services: &Services, rng: &mut impl Rng) -> Result<Outcome> {
    let mut session = MazeSession::new(settings.rows, settings.cols, settings.cell_size, rng)?;
    let outcome = with_terminal(|tty| run_maze(tty, settings, services, &mut session));
    info!(?outcome, "maze finished");
    outcome
}

/// Start narration, listener and loop for one maze on any console.
fn run_maze<C: Console>(
    console: &mut C,
    settings: &Settings,
    services: &Services,
    session: &mut MazeSession,
) -> Result<Outcome> {
    let mailbox = Mailbox::new();
    services.say("Pseudo 3D maze game started");
    services.say("Say move up, down, left or right");

    let listener = Listener::spawn(services.input.clone(), ListenMode::Maze, mailbox.poster());
    let outcome = maze_loop(console, settings, services, session, &mailbox);
    listener.stop();
    outcome
}

fn maze_loop<C: Console>(
    console: &mut C,
    settings: &Settings,
    services: &Services,
    session: &mut MazeSession,
    mailbox: &Mailbox,
) -> Result<Outcome> {
    let poster = mailbox.poster();
    let mut dictation = Dictation::new();
    let mut renderer = MazeRenderer::new(session.grid().rows(), session.grid().cols());
    let mut status = String::from("Say move up, down, left or right");
    let mut ticker = Ticker::new(settings.frame_time());

    loop {
        if pump_keys(console, &mut dictation, &poster)? == KeyAction::Close {
            return Ok(Outcome::Closed);
        }

        // Checked every tick, so a maze whose start is its goal is won
        // without a move.
        let event = if session.is_won() {
            Some(MazeEvent::Won)
        } else {
            mailbox
                .take()
                .as_deref()
                .and_then(MazeCommand::parse)
                .map(|command| {
                    let event = session.apply(command);
                    if event == MazeEvent::Moved {
                        status = format!("Moved {}", command.as_str());
                    }
                    event
                })
        };
        if let Some(line) = event.and_then(MazeEvent::spoken) {
            services.say(line);
            status = line.to_string();
        }

        let hud = format!("{} | typed: {}_ | Esc quits", status, dictation.line());
        let size = console.size()?;
        renderer.render(console, size, session, &hud)?;

        match event {
            Some(MazeEvent::Won) => {
                console.hold(FINISH_PAUSE);
                return Ok(Outcome::Won);
            }
            Some(MazeEvent::Exit) => return Ok(Outcome::Quit),
            _ => ticker.wait(),
        }
    }
}

pub fn play_quiz(settings: &Settings, services: &Services, questions: Vec<Question>) -> Result<Outcome> {
    let mut quiz = QuizSession::new(questions);
    let outcome = with_terminal(|tty| run_quiz(tty, settings, services, &mut quiz));
    info!(?outcome, score = quiz.score(), "quiz finished");
    outcome
}

fn run_quiz<C: Console>(
    console: &mut C,
    settings: &Settings,
    services: &Services,
    quiz: &mut QuizSession,
) -> Result<Outcome> {
    let mailbox = Mailbox::new();
    services.say("Welcome to the learning quiz.");

    let listener = Listener::spawn(services.input.clone(), ListenMode::Quiz, mailbox.poster());
    let outcome = quiz_loop(console, settings, services, quiz, &mailbox);
    listener.stop();
    outcome
}

fn quiz_loop<C: Console>(
    console: &mut C,
    settings: &Settings,
    services: &Services,
    quiz: &mut QuizSession,
    mailbox: &Mailbox,
) -> Result<Outcome> {
    let poster = mailbox.poster();
    let mut dictation = Dictation::new();
    let mut screen = QuizScreen::new();
    let mut ticker = Ticker::new(settings.frame_time());

    loop {
        if pump_keys(console, &mut dictation, &poster)? == KeyAction::Close {
            return Ok(Outcome::Closed);
        }

        let Some(current) = quiz.current().cloned() else {
            return Ok(Outcome::Completed {
                score: quiz.score(),
            });
        };
        let mut view = QuizView {
            number: quiz.number(),
            total: quiz.len(),
            score: quiz.score(),
            question: &current.question,
            feedback: None,
            typed: dictation.line(),
        };

        let verdict = mailbox.take().and_then(|answer| quiz.submit(&answer));
        if let Some(verdict) = &verdict {
            services.say(&verdict.spoken());
            view.score = quiz.score();
            view.feedback = Some(Feedback {
                text: verdict.feedback(),
                correct: verdict.correct,
            });
        }

        let size = console.size()?;
        screen.render(console, size, &view)?;

        if verdict.is_none() {
            ticker.wait();
            continue;
        }
        console.hold(FEEDBACK_PAUSE);
        if quiz.is_finished() {
            services.say(&quiz.summary());
            console.hold(FINISH_PAUSE);
            return Ok(Outcome::Completed {
                score: quiz.score(),
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::maze::Dir;
    use crate::speech::testing::services;
    use crossterm::event::{KeyCode, KeyModifiers};
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::VecDeque;

    /// Keys arrive in batches, one batch per tick; `None` ends a batch.
    #[derive(Default)]
    struct Scripted {
        keys: VecDeque<Option<KeyEvent>>,
        holds: Vec<Duration>,
        frames: usize,
        out: Vec<u8>,
    }

    impl Scripted {
        fn new(batches: &[&[KeyCode]]) -> Self {
            let mut keys = VecDeque::new();
            for batch in batches {
                keys.extend(
                    batch
                        .iter()
                        .map(|code| Some(KeyEvent::new(*code, KeyModifiers::NONE))),
                );
                keys.push_back(None);
            }
            Self {
                keys,
                ..Self::default()
            }
        }
    }

    impl Write for Scripted {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.out.extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl Console for Scripted {
        fn size(&mut self) -> io::Result<(u16, u16)> {
            self.frames += 1;
            assert!(self.frames < 500, "game loop never finished");
            Ok((120, 40))
        }

        fn next_key(&mut self) -> io::Result<Option<KeyEvent>> {
            Ok(self.keys.pop_front().flatten())
        }

        fn hold(&mut self, time: Duration) {
            self.holds.push(time);
        }
    }

    fn typed(text: &str) -> Vec<KeyCode> {
        let mut codes: Vec<KeyCode> = text.chars().map(KeyCode::Char).collect();
        codes.push(KeyCode::Enter);
        codes
    }

    fn fast() -> Settings {
        Settings {
            tick_hz: 1000,
            ..Settings::default()
        }
    }

    #[test]
    fn single_cell_maze_is_won_without_moving() {
        let (services, transcript) = services(&[]);
        let mut session = MazeSession::new(1, 1, 50, &mut StdRng::seed_from_u64(0)).unwrap();
        let mut console = Scripted::new(&[]);

        let outcome = run_maze(&mut console, &fast(), &services, &mut session).unwrap();
        assert_eq!(outcome, Outcome::Won);
        assert_eq!(
            transcript.lines(),
            vec![
                "Pseudo 3D maze game started",
                "Say move up, down, left or right",
                "Congratulations. Maze completed.",
            ]
        );
        assert_eq!(console.holds, vec![FINISH_PAUSE]);
    }

    #[test]
    fn maze_narrates_walls_then_exits() {
        let (services, transcript) = services(&[]);
        let mut session = MazeSession::new(4, 4, 50, &mut StdRng::seed_from_u64(7)).unwrap();
        // the start cell's top edge is the outer border
        let exit = typed("exit");
        let mut console = Scripted::new(&[&[KeyCode::Up], &exit]);

        let outcome = run_maze(&mut console, &fast(), &services, &mut session).unwrap();
        assert_eq!(outcome, Outcome::Quit);
        assert_eq!(session.player().pos, crate::maze::Pos::new(0, 0));
        assert_eq!(
            transcript.lines()[2..],
            ["Wall ahead".to_string(), "Exiting maze".to_string()]
        );
        assert!(console.holds.is_empty());
    }

    #[test]
    fn maze_moves_are_shown_not_spoken() {
        let (services, transcript) = services(&[]);
        let mut session = MazeSession::new(4, 4, 50, &mut StdRng::seed_from_u64(7)).unwrap();
        let start = session.player().pos;
        let open = Dir::ALL
            .into_iter()
            .find(|d| !session.grid().has_wall(start, *d))
            .unwrap();
        let mut console = Scripted::new(&[&typed(open.as_str()), &[KeyCode::Esc]]);

        let outcome = run_maze(&mut console, &fast(), &services, &mut session).unwrap();
        assert_eq!(outcome, Outcome::Closed);
        assert_ne!(session.player().pos, start);
        assert_eq!(transcript.lines().len(), 2);
        let screen = String::from_utf8_lossy(&console.out);
        assert!(screen.contains(&format!("Moved {}", open.as_str())));
    }

    #[test]
    fn quiz_gives_feedback_then_summary() {
        let (services, transcript) = services(&[]);
        let mut quiz = QuizSession::new(vec![
            Question {
                question: "What is two plus two?".into(),
                answer: "4".into(),
            },
            Question {
                question: "Capital of France?".into(),
                answer: "Paris".into(),
            },
        ]);
        let mut console = Scripted::new(&[&typed("four"), &typed("london")]);

        let outcome = run_quiz(&mut console, &fast(), &services, &mut quiz).unwrap();
        assert_eq!(outcome, Outcome::Completed { score: 1 });
        assert_eq!(
            transcript.lines(),
            vec![
                "Welcome to the learning quiz.",
                "Correct answer",
                "Wrong answer. The correct answer is paris",
                "Quiz completed. Your score is 1",
            ]
        );
        assert_eq!(console.holds, vec![FEEDBACK_PAUSE, FEEDBACK_PAUSE, FINISH_PAUSE]);
        let screen = String::from_utf8_lossy(&console.out);
        assert!(screen.contains("Correct Answer"));
        assert!(screen.contains("Wrong Answer"));
    }

    #[test]
    fn esc_closes_the_quiz() {
        let (services, transcript) = services(&[]);
        let mut quiz = QuizSession::new(vec![Question {
            question: "Capital of France?".into(),
            answer: "Paris".into(),
        }]);
        let mut console = Scripted::new(&[&[KeyCode::Char('p'), KeyCode::Esc]]);

        let outcome = run_quiz(&mut console, &fast(), &services, &mut quiz).unwrap();
        assert_eq!(outcome, Outcome::Closed);
        assert_eq!(quiz.score(), 0);
        assert_eq!(transcript.lines(), vec!["Welcome to the learning quiz."]);
    }

    /// Accepts everything except the cursor-hide sequence.
    #[derive(Default)]
    struct NoHide(Vec<u8>);

    impl Write for NoHide {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            if buf == b"\x1b[?25l" {
                return Err(io::Error::new(io::ErrorKind::Other, "hide refused"));
            }
            self.0.extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn failed_setup_still_restores_the_screen() {
        let mut out = NoHide::default();
        let mut ran = false;
        let result = on_alternate_screen(&mut out, |_| {
            ran = true;
            Ok(())
        });
        assert!(result.is_err());
        assert!(!ran);
        let written = String::from_utf8_lossy(&out.0);
        assert!(written.contains("\x1b[?1049h"));
        assert!(written.contains("\x1b[?25h"));
        assert!(written.contains("\x1b[?1049l"));
    }
}
