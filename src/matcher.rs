//! Tolerant comparison of a spoken answer against the expected one.
//!
//! Recognizers mishear, spell numbers out and pad answers with filler, so a
//! verdict is the OR of several loose checks rather than an equality test.
//! Word-level containment is deliberately generous: if the expected answer
//! holds a common word, any reply that also contains it is accepted.

const NUMBER_WORDS: [(&str, &str); 11] = [
    ("zero", "0"),
    ("one", "1"),
    ("two", "2"),
    ("three", "3"),
    ("four", "4"),
    ("five", "5"),
    ("six", "6"),
    ("seven", "7"),
    ("eight", "8"),
    ("nine", "9"),
    ("ten", "10"),
];

const AFFIRMATIONS: [&str; 8] = ["yes", "yeah", "yep", "yup", "haa", "haan", "correct", "true"];

/// Lower-cases and trims, then keeps only `a-z`, `0-9` and spaces.
pub fn normalize(text: &str) -> String {
    text.to_lowercase()
        .trim()
        .chars()
        .filter(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || *c == ' ')
        .collect()
}

fn word_to_digit(word: &str) -> Option<&'static str> {
    NUMBER_WORDS
        .iter()
        .find(|(w, _)| *w == word)
        .map(|(_, d)| *d)
}

fn digit_to_word(digit: &str) -> Option<&'static str> {
    NUMBER_WORDS
        .iter()
        .find(|(_, d)| *d == digit)
        .map(|(w, _)| *w)
}

fn either_contains(user: &str, expected: &str) -> bool {
    user.contains(expected) || expected.contains(user)
}

fn spelled_digit(user: &str, expected: &str) -> bool {
    word_to_digit(expected).is_some_and(|digit| user.contains(digit))
}

fn spoken_number(user: &str, expected: &str) -> bool {
    digit_to_word(expected).is_some_and(|word| user.contains(word))
}

fn shares_keyword(user: &str, expected: &str) -> bool {
    expected.split_whitespace().any(|word| user.contains(word))
}

fn affirmed(user: &str, expected: &str) -> bool {
    expected == "yes" && AFFIRMATIONS.iter().any(|w| user.contains(w))
}

type Check = fn(&str, &str) -> bool;

const CHECKS: [Check; 5] = [
    either_contains,
    spelled_digit,
    spoken_number,
    shares_keyword,
    affirmed,
];

/// Both sides are normalized first; any single passing check accepts.
pub fn is_correct(user: &str, expected: &str) -> bool {
    let user = normalize(user);
    let expected = normalize(expected);
    CHECKS.iter().any(|check| check(&user, &expected))
}
