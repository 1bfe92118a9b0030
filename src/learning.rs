use std::io;

use tracing::{info, warn};

use crate::error::Result;
use crate::quiz::Question;
use crate::speech::Services;

/// Plain prompt/listen/score loop. The check is a case-sensitive substring
/// test on the raw transcript, with none of the quiz's tolerance. A failing
/// `listen` ends the session with its error.
pub fn run_learning(
    services: &Services,
    questions: &[Question],
    mut listen: impl FnMut(&Question) -> io::Result<String>,
) -> Result<u32> {
    services.say("Welcome to learning mode");

    let mut score = 0;
    for q in questions {
        services.say(&q.question);
        let answer = listen(q).map_err(|e| {
            warn!(error = %e, score, "learning input failed");
            e
        })?;
        if answer.contains(q.answer.as_str()) {
            services.say("Correct");
            score += 1;
        } else {
            services.say(&format!("Wrong. Correct answer is {}", q.answer));
        }
    }

    info!(score, total = questions.len(), "learning finished");
    services.say(&format!("Learning completed. Your score is {}", score));
    Ok(score)
}
