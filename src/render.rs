//! Terminal drawing for both games. Only tiles and lines that changed since
//! the previous frame are rewritten.

use std::io::{self, Write};

use crossterm::cursor::MoveTo;
use crossterm::style::{Color, Print, ResetColor, SetForegroundColor};
use crossterm::terminal::{Clear, ClearType};
use crossterm::QueueableCommand;
use unicode_width::UnicodeWidthStr;

use crate::maze::{Dir, Pos};
use crate::maze_game::MazeSession;

const CELL_W: usize = 2;

#[derive(Clone, Copy, PartialEq, Debug)]
enum Glyph {
    Player,
    Goal,
    Wall,
    Empty,
}

#[derive(Clone, Copy, PartialEq, Debug)]
struct Tile {
    glyph: Glyph,
    color: Color,
}

const BLANK: Tile = Tile {
    glyph: Glyph::Empty,
    color: Color::Reset,
};

/// Maze drawn as a (2R+1)×(2C+1) board: odd/odd tiles are cells, the tiles
/// between them are walls or openings, even/even tiles are posts.
fn glyph_at(session: &MazeSession, x: usize, y: usize) -> Glyph {
    let grid = session.grid();
    match (x % 2, y % 2) {
        (1, 1) => {
            let pos = Pos::new(y / 2, x / 2);
            if pos == session.player().pos {
                Glyph::Player
            } else if pos == session.goal() {
                Glyph::Goal
            } else {
                Glyph::Empty
            }
        }
        (0, 0) => Glyph::Wall,
        (0, _) => {
            let row = y / 2;
            let standing = if x == 0 {
                grid.has_wall(Pos::new(row, 0), Dir::Left)
            } else {
                grid.has_wall(Pos::new(row, x / 2 - 1), Dir::Right)
            };
            if standing {
                Glyph::Wall
            } else {
                Glyph::Empty
            }
        }
        _ => {
            let col = x / 2;
            let standing = if y == 0 {
                grid.has_wall(Pos::new(0, col), Dir::Up)
            } else {
                grid.has_wall(Pos::new(y / 2 - 1, col), Dir::Down)
            };
            if standing {
                Glyph::Wall
            } else {
                Glyph::Empty
            }
        }
    }
}

impl Glyph {
    fn text(self) -> &'static str {
        match self {
            Glyph::Player => "😃",
            Glyph::Goal => "🏁",
            Glyph::Wall => "██",
            Glyph::Empty => "  ",
        }
    }

    fn color(self) -> Color {
        match self {
            Glyph::Player => Color::Cyan,
            Glyph::Goal => Color::Green,
            Glyph::Wall => Color::DarkGrey,
            Glyph::Empty => Color::Reset,
        }
    }
}

fn tile_for(session: &MazeSession, x: usize, y: usize) -> Tile {
    let glyph = glyph_at(session, x, y);
    Tile {
        glyph,
        color: glyph.color(),
    }
}

/// Top-left corner of a board with its status line underneath, centred in
/// `term`. `None` when it doesn't fit.
fn place(board_w: usize, board_h: usize, term: (u16, u16)) -> Option<(u16, u16)> {
    let w = u16::try_from(board_w.checked_mul(CELL_W)?).ok()?;
    let h = u16::try_from(board_h.checked_add(1)?).ok()?;
    let x = term.0.checked_sub(w)? / 2;
    let y = term.1.checked_sub(h)? / 2;
    Some((x, y))
}

pub struct MazeRenderer {
    last: Vec<Tile>,
    last_hud: String,
    needs_full: bool,
    width: usize,
    height: usize,
    origin: (u16, u16),
}

impl MazeRenderer {
    pub fn new(rows: usize, cols: usize) -> Self {
        let width = cols * 2 + 1;
        let height = rows * 2 + 1;
        Self {
            last: vec![BLANK; width * height],
            last_hud: String::new(),
            needs_full: true,
            width,
            height,
            origin: (0, 0),
        }
    }

    /// Draws the board centred with `hud` on the line below it.
    pub fn render<W: Write>(
        &mut self,
        out: &mut W,
        term: (u16, u16),
        session: &MazeSession,
        hud: &str,
    ) -> io::Result<()> {
        let Some(origin) = place(self.width, self.height, term) else {
            out.queue(Clear(ClearType::All))?.queue(MoveTo(0, 0))?;
            out.queue(Print(format!(
                "Terminal too small for this maze: need {}x{}, have {}x{}.",
                self.width.saturating_mul(CELL_W),
                self.height.saturating_add(1),
                term.0,
                term.1
            )))?;
            self.needs_full = true;
            return out.flush();
        };
        if origin != self.origin {
            self.origin = origin;
            self.needs_full = true;
        }
        if self.needs_full {
            out.queue(Clear(ClearType::All))?;
        }

        for y in 0..self.height {
            for x in 0..self.width {
                let tile = tile_for(session, x, y);
                let idx = y * self.width + x;
                if self.needs_full || tile != self.last[idx] {
                    self.last[idx] = tile;
                    self.draw_tile(out, x, y, tile)?;
                }
            }
        }

        if self.needs_full || hud != self.last_hud {
            let row = self.origin.1 + self.height as u16;
            out.queue(MoveTo(self.origin.0, row))?
                .queue(Clear(ClearType::CurrentLine))?
                .queue(SetForegroundColor(Color::White))?
                .queue(Print(hud))?
                .queue(ResetColor)?;
            self.last_hud.clear();
            self.last_hud.push_str(hud);
        }
        self.needs_full = false;
        out.flush()
    }

    // Only called once `place` has fitted the whole board, so the
    // coordinates stay inside the terminal.
    fn draw_tile<W: Write>(&self, out: &mut W, x: usize, y: usize, tile: Tile) -> io::Result<()> {
        let text = tile.glyph.text();
        let pad = CELL_W.saturating_sub(text.width());
        let col = self.origin.0 + (x * CELL_W) as u16;
        let row = self.origin.1 + y as u16;
        out.queue(MoveTo(col, row))?
            .queue(SetForegroundColor(tile.color))?
            .queue(Print(format!("{}{:pad$}", text, "")))?
            .queue(ResetColor)?;
        Ok(())
    }
}

/// Greedy word wrap by display width. A word wider than the line gets a
/// line of its own.
pub fn wrap_text(text: &str, max_width: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();
    for word in text.split_whitespace() {
        if current.is_empty() {
            current.push_str(word);
            continue;
        }
        if current.width() + 1 + word.width() <= max_width {
            current.push(' ');
            current.push_str(word);
        } else {
            lines.push(std::mem::take(&mut current));
            current.push_str(word);
        }
    }
    lines.push(current);
    lines
}

#[derive(Debug, Clone, Copy)]
pub struct Feedback<'a> {
    pub text: &'a str,
    pub correct: bool,
}

#[derive(Debug, Clone, Copy)]
pub struct QuizView<'a> {
    pub number: usize,
    pub total: usize,
    pub score: u32,
    pub question: &'a str,
    pub feedback: Option<Feedback<'a>>,
    pub typed: &'a str,
}

#[derive(Default)]
pub struct QuizScreen {
    last: Vec<(String, Color)>,
    last_size: (u16, u16),
}

impl QuizScreen {
    pub fn new() -> Self {
        Self::default()
    }

    fn layout(view: &QuizView<'_>, term_w: u16) -> Vec<(String, Color)> {
        let wrap_at = (term_w as usize).saturating_sub(8).max(20);
        let mut lines = vec![
            ("Learning Quiz".to_string(), Color::Blue),
            (String::new(), Color::Reset),
        ];
        for line in wrap_text(view.question, wrap_at) {
            lines.push((line, Color::White));
        }
        lines.push((String::new(), Color::Reset));
        match view.feedback {
            Some(f) => lines.push((
                f.text.to_string(),
                if f.correct { Color::Green } else { Color::Red },
            )),
            None => lines.push((String::new(), Color::Reset)),
        }
        lines.push((String::new(), Color::Reset));
        lines.push((format!("> {}", view.typed), Color::Yellow));
        lines.push((String::new(), Color::Reset));
        lines.push((
            format!(
                "Question {} / {}   Score: {}   (Esc to quit)",
                view.number, view.total, view.score
            ),
            Color::White,
        ));
        lines
    }

    pub fn render<W: Write>(
        &mut self,
        out: &mut W,
        term: (u16, u16),
        view: &QuizView<'_>,
    ) -> io::Result<()> {
        let lines = Self::layout(view, term.0);
        let full = term != self.last_size || lines.len() != self.last.len();
        if full {
            out.queue(Clear(ClearType::All))?;
            self.last_size = term;
        }
        let top = (term.1 as usize).saturating_sub(lines.len()) / 2;
        for (i, line) in lines.iter().enumerate() {
            if !full && self.last.get(i) == Some(line) {
                continue;
            }
            let x = (term.0 as usize).saturating_sub(line.0.width()) / 2;
            out.queue(MoveTo(x as u16, (top + i) as u16))?;
            out.queue(Clear(ClearType::CurrentLine))?;
            out.queue(SetForegroundColor(line.1))?;
            out.queue(Print(&line.0))?;
            out.queue(ResetColor)?;
        }
        self.last = lines;
        out.flush()
    }
}
