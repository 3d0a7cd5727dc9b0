use puzzle_types::{LetterFeedback, LetterStatus};

/// Score one guessed word against one target word, Wordle-style.
///
/// Two passes, in this order: exact-position matches first, each one
/// consuming its answer slot; then a left-to-right presence pass that
/// consumes the first remaining slot per matched letter. Running the
/// presence pass first would misallocate duplicate letters. Equal length
/// is the caller's precondition, not checked here. Pure, no side effects.
pub fn compute_feedback(guess: &str, answer: &str) -> Vec<LetterFeedback> {
    let guess_chars: Vec<char> = guess.to_lowercase().chars().collect();
    let mut remaining: Vec<Option<char>> = answer.to_lowercase().chars().map(Some).collect();

    let mut feedback: Vec<LetterFeedback> = guess_chars
        .iter()
        .map(|&letter| LetterFeedback {
            letter,
            status: LetterStatus::Absent,
        })
        .collect();

    // Pass 1: exact positions.
    for (i, &letter) in guess_chars.iter().enumerate() {
        if remaining.get(i).copied().flatten() == Some(letter) {
            feedback[i].status = LetterStatus::Correct;
            remaining[i] = None;
        }
    }

    // Pass 2: present elsewhere, consuming the first unclaimed slot.
    for (i, &letter) in guess_chars.iter().enumerate() {
        if feedback[i].status == LetterStatus::Correct {
            continue;
        }
        if let Some(slot) = remaining.iter_mut().find(|slot| **slot == Some(letter)) {
            feedback[i].status = LetterStatus::Present;
            *slot = None;
        }
    }

    feedback
}

/// A guess solves its target iff every letter came back correct.
pub fn is_winning(feedback: &[LetterFeedback]) -> bool {
    !feedback.is_empty() && feedback.iter().all(|f| f.status == LetterStatus::Correct)
}
