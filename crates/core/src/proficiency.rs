//! Learner model updates applied after every answer.
//!
//! Four signals move independently: an IRT-style ability estimate, a bounded
//! fatigue counter, a rolling partial-credit accuracy window, and an EWMA
//! mastery score. Accuracy and mastery use different credit tables.

use crate::model::{Band, FATIGUE_CEILING, Item, SessionState};

pub const LEARNING_RATE: f64 = 0.35;
pub const HINT_DAMPING: f64 = 0.85;

pub const SLOW_Z_THRESHOLD: f64 = 1.5;
pub const SLOW_Z_THRESHOLD_WITH_HINT: f64 = 2.0;
pub const LOW_ACCURACY_THRESHOLD: f64 = 0.4;
/// Hints within a full window that count as over-reliance.
pub const HEAVY_HINT_COUNT: usize = 3;

pub const MASTERY_RETAIN: f64 = 0.7;

/// One learner response to an item.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Response {
    pub correct: bool,
    pub hint_used: bool,
    pub elapsed_secs: f64,
}

//
// ─── ABILITY ───────────────────────────────────────────────────────────────────
//

#[must_use]
pub fn logistic(x: f64) -> f64 {
    1.0 / (1.0 + (-x).exp())
}

/// Probability that a learner of `ability` answers a `band` item correctly.
#[must_use]
pub fn predicted_correctness(ability: f64, band: Band) -> f64 {
    logistic(ability - band.difficulty())
}

/// Move ability toward the observed outcome.
///
/// A correct answer never lowers ability and an incorrect one never raises it,
/// since the prediction is strictly inside (0, 1).
#[must_use]
pub fn updated_ability(ability: f64, band: Band, correct: bool, hint_used: bool) -> f64 {
    let predicted = predicted_correctness(ability, band);
    let observed = if correct { 1.0 } else { 0.0 };
    let damping = if hint_used { HINT_DAMPING } else { 1.0 };
    ability + LEARNING_RATE * damping * (observed - predicted)
}

//
// ─── CREDIT TABLES ─────────────────────────────────────────────────────────────
//

/// Partial credit pushed into the rolling accuracy window.
#[must_use]
pub fn accuracy_credit(correct: bool, hint_used: bool) -> f64 {
    match (correct, hint_used) {
        (true, false) => 1.0,
        (true, true) => 0.90,
        (false, true) => 0.10,
        (false, false) => 0.0,
    }
}

/// Partial credit fed to the mastery EWMA. Differs from accuracy on a wrong hinted answer.
#[must_use]
pub fn mastery_credit(correct: bool, hint_used: bool) -> f64 {
    match (correct, hint_used) {
        (true, false) => 1.0,
        (true, true) => 0.90,
        (false, true) => 0.05,
        (false, false) => 0.0,
    }
}

#[must_use]
pub fn updated_mastery(mastery: f64, credit: f64) -> f64 {
    MASTERY_RETAIN * mastery + (1.0 - MASTERY_RETAIN) * credit
}

//
// ─── FATIGUE ───────────────────────────────────────────────────────────────────
//

fn update_fatigue(state: &mut SessionState, item: &Item, response: &Response) {
    let z = item.expected_time().z_score(response.elapsed_secs);
    let threshold = if response.hint_used {
        SLOW_Z_THRESHOLD_WITH_HINT
    } else {
        SLOW_Z_THRESHOLD
    };
    let slow_and_wrong = z > threshold && !response.correct;
    // Judged on the window as it stood before this answer.
    let struggling = state.accuracy_window.is_full()
        && state.accuracy_window.mean() <= LOW_ACCURACY_THRESHOLD;

    state.fatigue = if slow_and_wrong || struggling {
        (state.fatigue + 1).min(FATIGUE_CEILING)
    } else {
        state.fatigue.saturating_sub(1)
    };

    state.hint_window.push(response.hint_used);
    if state.hint_window.is_full() && state.hint_window.count_true() >= HEAVY_HINT_COUNT {
        state.fatigue = (state.fatigue + 1).min(FATIGUE_CEILING);
    }
}

//
// ─── UPDATE ────────────────────────────────────────────────────────────────────
//

/// Apply one response to ability, fatigue, accuracy, mastery and subskill counters.
///
/// Difficulty band transitions are left to [`crate::staircase`].
pub fn record_response(state: &mut SessionState, item: &Item, response: &Response) {
    state.ability = updated_ability(
        state.ability,
        item.band(),
        response.correct,
        response.hint_used,
    );

    update_fatigue(state, item, response);

    state
        .accuracy_window
        .push(accuracy_credit(response.correct, response.hint_used));
    state.mastery = updated_mastery(
        state.mastery,
        mastery_credit(response.correct, response.hint_used),
    );

    if response.correct {
        return;
    }
    if let Some(subskill) = item.subskill() {
        *state
            .wrong_by_subskill
            .entry(subskill.to_string())
            .or_insert(0) += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ItemDraft, ItemId};
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn item(band: Band) -> Item {
        let mut rng = StdRng::seed_from_u64(1);
        ItemDraft::new("q", ["a", "b", "c", "d"], 0)
            .with_subskill("inheritance")
            .into_item(ItemId::new(band, 1), "oop", &mut rng)
            .unwrap()
    }

    fn response(correct: bool, hint_used: bool, elapsed_secs: f64) -> Response {
        Response {
            correct,
            hint_used,
            elapsed_secs,
        }
    }

    #[test]
    fn ability_is_monotone_in_outcome() {
        for ability in [-4.0, -1.5, 0.0, 0.7, 3.0] {
            for band in Band::ALL {
                for hint in [false, true] {
                    assert!(updated_ability(ability, band, true, hint) >= ability);
                    assert!(updated_ability(ability, band, false, hint) <= ability);
                }
            }
        }
    }

    #[test]
    fn ability_update_matches_irt_rule() {
        // p = logistic(0 - 0) = 0.5; 0.35 * (1 - 0.5)
        assert!((updated_ability(0.0, Band::Medium, true, false) - 0.175).abs() < 1e-12);
        // hint damps the step by 0.85
        assert!((updated_ability(0.0, Band::Medium, true, true) - 0.148_75).abs() < 1e-12);
    }

    #[test]
    fn credit_tables_diverge_only_on_wrong_with_hint() {
        for (correct, hint) in [(true, false), (true, true), (false, false)] {
            assert_eq!(accuracy_credit(correct, hint), mastery_credit(correct, hint));
        }
        assert_eq!(accuracy_credit(false, true), 0.10);
        assert_eq!(mastery_credit(false, true), 0.05);
    }

    #[test]
    fn mastery_and_accuracy_track_different_dynamics() {
        let item = item(Band::Easy);
        let mut state = SessionState::default();
        record_response(&mut state, &item, &response(true, false, 18.0));
        record_response(&mut state, &item, &response(false, true, 18.0));

        // window mean of [1.0, 0.10]
        assert!((state.rolling_accuracy() - 0.55).abs() < 1e-12);
        // 0.7 * (0.7 * 0 + 0.3 * 1.0) + 0.3 * 0.05
        assert!((state.mastery() - 0.225).abs() < 1e-12);
    }

    #[test]
    fn slow_wrong_answers_saturate_fatigue() {
        let item = item(Band::Easy);
        let mut state = SessionState::default();
        for expected in [1, 2, 3, 3] {
            // z = (40 - 18) / 6 > 1.5
            record_response(&mut state, &item, &response(false, false, 40.0));
            assert_eq!(state.fatigue(), expected);
        }
    }

    #[test]
    fn hint_relaxes_slow_threshold() {
        let item = item(Band::Easy);
        let mut state = SessionState::default();
        // z = (28 - 18) / 6 ~= 1.67: slow without a hint, tolerated with one
        record_response(&mut state, &item, &response(false, true, 28.0));
        assert_eq!(state.fatigue(), 0);
        record_response(&mut state, &item, &response(false, false, 28.0));
        assert_eq!(state.fatigue(), 1);
    }

    #[test]
    fn quick_answers_recover_fatigue() {
        let item = item(Band::Medium);
        let mut state = SessionState::default();
        state.fatigue = 2;
        record_response(&mut state, &item, &response(true, false, 20.0));
        assert_eq!(state.fatigue(), 1);
        record_response(&mut state, &item, &response(false, false, 20.0));
        assert_eq!(state.fatigue(), 0);
        record_response(&mut state, &item, &response(true, false, 20.0));
        assert_eq!(state.fatigue(), 0);
    }

    #[test]
    fn full_low_accuracy_window_raises_fatigue() {
        let item = item(Band::Medium);
        let mut state = SessionState::default();
        // five quick wrong answers: fatigue stays at floor while the window fills
        for _ in 0..5 {
            record_response(&mut state, &item, &response(false, false, 22.0));
            assert_eq!(state.fatigue(), 0);
        }
        record_response(&mut state, &item, &response(true, false, 22.0));
        assert_eq!(state.fatigue(), 1);
    }

    #[test]
    fn heavy_hint_use_bumps_fatigue_once_window_is_full() {
        let item = item(Band::Medium);
        let mut state = SessionState::default();
        for _ in 0..4 {
            record_response(&mut state, &item, &response(true, true, 22.0));
            assert_eq!(state.fatigue(), 0);
        }
        record_response(&mut state, &item, &response(true, true, 22.0));
        assert_eq!(state.fatigue(), 1);
    }

    #[test]
    fn wrong_answers_count_per_subskill() {
        let item = item(Band::Hard);
        let mut state = SessionState::default();
        record_response(&mut state, &item, &response(false, false, 28.0));
        record_response(&mut state, &item, &response(true, false, 28.0));
        record_response(&mut state, &item, &response(false, true, 28.0));
        assert_eq!(state.wrong_count("inheritance"), 2);
        assert_eq!(state.wrong_count("polymorphism"), 0);
    }
}
