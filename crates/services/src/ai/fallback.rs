//! Offline tutor text, used when no backend is configured or a call fails.

use super::provider::Prompt;

const DEFAULT_CONCEPT: &str = "inheritance";

#[must_use]
pub fn hint(subskill: Option<&str>) -> String {
    match subskill.unwrap_or(DEFAULT_CONCEPT) {
        "inheritance" => {
            "Check which class actually defines or overrides the member being accessed.".into()
        }
        concept => {
            format!("Recall the core rule of {concept} and rule out options that contradict it.")
        }
    }
}

#[must_use]
pub fn explanation(options: &[String], correct_index: usize, chosen_index: usize) -> String {
    let option = |index: usize| {
        options.get(index).map_or_else(
            || "an unlisted option".to_string(),
            |text| format!("\"{text}\""),
        )
    };
    if chosen_index == correct_index {
        format!(
            "Correct: {} matches how members resolve along the base to subclass chain.",
            option(correct_index)
        )
    } else {
        format!(
            "{} reflects the actual resolution and override rules in the hierarchy. {} ignores \
             which class defines or overrides the behavior.",
            option(correct_index),
            option(chosen_index)
        )
    }
}

/// Words that introduce an option position, as in "option 2" or "choice B".
const POSITION_MARKERS: [&str; 6] = ["option", "choice", "index", "letter", "number", "position"];

/// Words allowed between a marker and the position it names.
const POSITION_FILLERS: [&str; 4] = ["is", "no", "number", "at"];

/// True when `hint` gives away the correct option.
///
/// That is either quoting its text, or naming its position next to a word
/// like "option": zero-based index, one-based number, or letter.
#[must_use]
pub fn reveals_answer(hint: &str, options: &[String], correct_index: usize) -> bool {
    let hint = hint.to_lowercase();
    if let Some(option) = options.get(correct_index) {
        let option = option.trim().to_lowercase();
        if !option.is_empty() && hint.contains(&option) {
            return true;
        }
    }

    let mut names = vec![
        correct_index.to_string(),
        correct_index.saturating_add(1).to_string(),
    ];
    if let Some(letter) = u8::try_from(correct_index)
        .ok()
        .filter(|index| *index < 26)
        .map(|index| char::from(b'a' + index))
    {
        names.push(letter.to_string());
    }

    let words: Vec<&str> = hint
        .split(|c: char| !c.is_alphanumeric())
        .filter(|word| !word.is_empty())
        .collect();
    words.iter().enumerate().any(|(at, word)| {
        POSITION_MARKERS.contains(word)
            && words[at + 1..]
                .iter()
                .find(|next| !POSITION_FILLERS.contains(*next))
                .is_some_and(|next| names.iter().any(|name| name == next))
    })
}

//
// ─── PROMPTS ───────────────────────────────────────────────────────────────────
//

#[must_use]
pub fn hint_prompt(text: &str, options: &[String], subskill: Option<&str>) -> Prompt {
    Prompt {
        system: "You write one short, actionable hint for a multiple-choice object-oriented \
                 programming question. Never state the answer, quote an option, or name an \
                 option letter. One sentence."
            .into(),
        user: format!(
            "Question: {text}\nOptions: {}\nConcept: {}",
            options.join(" | "),
            subskill.unwrap_or(DEFAULT_CONCEPT)
        ),
        max_tokens: 80,
    }
}

#[must_use]
pub fn explanation_prompt(
    text: &str,
    options: &[String],
    correct_index: usize,
    chosen_index: usize,
) -> Prompt {
    let pick = |index: usize| options.get(index).map_or("(none)", String::as_str);
    Prompt {
        system: "Explain in at most three sentences why the correct option is right and, if the \
                 learner chose differently, why their choice is misleading. Be concrete and brief."
            .into(),
        user: format!(
            "Question: {text}\nOptions: {}\nCorrect: {}\nChosen: {}",
            options.join(" | "),
            pick(correct_index),
            pick(chosen_index)
        ),
        max_tokens: 200,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn options() -> Vec<String> {
        ["is-a", "has-a", "uses-a", "contains-a"]
            .into_iter()
            .map(String::from)
            .collect()
    }

    #[test]
    fn hint_depends_on_subskill() {
        assert!(hint(None).contains("overrides"));
        assert_eq!(hint(Some("inheritance")), hint(None));
        assert!(hint(Some("polymorphism")).contains("polymorphism"));
    }

    #[test]
    fn explanation_affirms_or_corrects() {
        let right = explanation(&options(), 0, 0);
        assert!(right.starts_with("Correct:"));
        assert!(right.contains("\"is-a\""));

        let wrong = explanation(&options(), 0, 2);
        assert!(wrong.contains("\"is-a\""));
        assert!(wrong.contains("\"uses-a\""));
    }

    #[test]
    fn explanation_tolerates_out_of_range_indices() {
        let text = explanation(&options(), 0, 9);
        assert!(text.contains("an unlisted option"));

        let text = explanation(&options(), 0, usize::MAX);
        assert!(text.contains("\"is-a\""));
        assert!(text.contains("an unlisted option"));

        let text = explanation(&options(), usize::MAX, usize::MAX);
        assert!(text.starts_with("Correct: an unlisted option"));
    }

    #[test]
    fn answer_leak_is_case_insensitive() {
        assert!(reveals_answer(
            "The relationship is IS-A here.",
            &options(),
            0
        ));
        assert!(!reveals_answer(
            "Think about the relationship type.",
            &options(),
            0
        ));
        let blank = vec!["  ".to_string(), "x".to_string()];
        assert!(!reveals_answer("anything", &blank, 0));
    }

    #[test]
    fn naming_the_correct_position_is_a_leak() {
        let options = options();
        assert!(reveals_answer("Pick option 2 (index 1).", &options, 1));
        assert!(reveals_answer("The right choice is B.", &options, 1));
        assert!(reveals_answer("Go with option number 2.", &options, 1));
        assert!(reveals_answer("Look at index 1 first.", &options, 1));
        assert!(reveals_answer("Letter b fits best.", &options, 1));
    }

    #[test]
    fn other_positions_and_plain_numbers_are_not_leaks() {
        let options = options();
        assert!(!reveals_answer("Rule out option 4 first.", &options, 1));
        assert!(!reveals_answer(
            "There are 2 classes and 1 interface.",
            &options,
            1
        ));
        assert!(!reveals_answer(
            "Every option describes a relationship.",
            &options,
            0
        ));
        assert!(!reveals_answer("Pick option 3.", &options, usize::MAX));
    }

    #[test]
    fn prompts_carry_question_context() {
        let prompt = hint_prompt("Which relationship signals inheritance?", &options(), None);
        assert!(prompt.user.contains("Concept: inheritance"));
        assert!(prompt.user.contains("is-a | has-a"));

        let prompt = explanation_prompt("q", &options(), 0, 1);
        assert!(prompt.user.contains("Correct: is-a"));
        assert!(prompt.user.contains("Chosen: has-a"));
    }
}
