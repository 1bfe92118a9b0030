use crate::maze::Dir;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MazeCommand {
    Move(Dir),
    Exit,
}

impl MazeCommand {
    /// First keyword found wins, checked in the order up, down, left, right,
    /// then exit/stop. Matching is by containment, so "go up please" moves.
    pub fn parse(text: &str) -> Option<Self> {
        let text = text.to_lowercase();
        for dir in [Dir::Up, Dir::Down, Dir::Left, Dir::Right] {
            if text.contains(dir.as_str()) {
                return Some(MazeCommand::Move(dir));
            }
        }
        if text.contains("exit") || text.contains("stop") {
            return Some(MazeCommand::Exit);
        }
        None
    }

    pub fn as_str(self) -> &'static str {
        match self {
            MazeCommand::Move(dir) => dir.as_str(),
            MazeCommand::Exit => "exit",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuChoice {
    Quiz,
    Maze,
    Exit,
}

const QUIZ_WORDS: [&str; 5] = ["learning", "learn in", "lurning", "quiz", "study"];
const MAZE_WORDS: [&str; 4] = ["maze", "maize", "mayz", "mays"];
const EXIT_WORDS: [&str; 4] = ["exit", "quit", "stop", "end"];

impl MenuChoice {
    /// Keyword spotting tuned for common mishearings.
    pub fn from_speech(text: &str) -> Option<Self> {
        let text = text.to_lowercase();
        let any = |words: &[&str]| words.iter().any(|w| text.contains(w));
        if any(&QUIZ_WORDS) {
            Some(MenuChoice::Quiz)
        } else if any(&MAZE_WORDS) {
            Some(MenuChoice::Maze)
        } else if any(&EXIT_WORDS) {
            Some(MenuChoice::Exit)
        } else {
            None
        }
    }

    /// Menu digits, falling back to the spoken keywords.
    pub fn from_typed(text: &str) -> Option<Self> {
        match text.trim() {
            "0" => Some(MenuChoice::Quiz),
            "1" => Some(MenuChoice::Maze),
            "2" => Some(MenuChoice::Exit),
            "" => None,
            other => Self::from_speech(other),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            MenuChoice::Quiz => "learning",
            MenuChoice::Maze => "maze",
            MenuChoice::Exit => "exit",
        }
    }
}
