use crate::model::{Band, SessionState};

/// Consecutive Hard misses that demote the learner to Medium.
pub const HARD_MISS_LIMIT: u32 = 2;

/// Next band and Hard miss streak after one answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Step {
    pub band: Band,
    pub hard_miss_streak: u32,
}

/// Staircase transition from the band just served.
///
/// Depends only on the served band, correctness, hint use and the running
/// Hard miss streak; ability and mastery play no part.
#[must_use]
pub fn step(served: Band, correct: bool, hint_used: bool, hard_miss_streak: u32) -> Step {
    match served {
        Band::Easy => Step {
            band: if correct { Band::Medium } else { Band::Easy },
            hard_miss_streak: 0,
        },
        Band::Medium => {
            let band = match (correct, hint_used) {
                (true, false) => Band::Hard,
                (true, true) => Band::Medium,
                (false, _) => Band::Easy,
            };
            Step {
                band,
                hard_miss_streak: 0,
            }
        }
        Band::Hard if correct => Step {
            band: Band::Hard,
            hard_miss_streak: 0,
        },
        Band::Hard => {
            let streak = hard_miss_streak.saturating_add(1);
            if streak >= HARD_MISS_LIMIT {
                Step {
                    band: Band::Medium,
                    hard_miss_streak: 0,
                }
            } else {
                Step {
                    band: Band::Hard,
                    hard_miss_streak: streak,
                }
            }
        }
    }
}

/// Apply the staircase to a session after an answer.
///
/// The served band is the band of the last drawn item, or the current band if
/// nothing has been drawn since the reset.
pub fn advance(state: &mut SessionState, correct: bool, hint_used: bool) -> Step {
    let served = state.last_served_band.unwrap_or(state.current_band);
    let next = step(served, correct, hint_used, state.hard_miss_streak);
    state.current_band = next.band;
    state.hard_miss_streak = next.hard_miss_streak;
    next
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transition_table_holds_for_every_case() {
        // (served, correct, hint) -> band, with streak 0 going in
        let table = [
            (Band::Easy, true, false, Band::Medium),
            (Band::Easy, true, true, Band::Medium),
            (Band::Easy, false, false, Band::Easy),
            (Band::Easy, false, true, Band::Easy),
            (Band::Medium, true, false, Band::Hard),
            (Band::Medium, true, true, Band::Medium),
            (Band::Medium, false, false, Band::Easy),
            (Band::Medium, false, true, Band::Easy),
            (Band::Hard, true, false, Band::Hard),
            (Band::Hard, true, true, Band::Hard),
            (Band::Hard, false, false, Band::Hard),
            (Band::Hard, false, true, Band::Hard),
        ];
        for (served, correct, hint, expected) in table {
            assert_eq!(
                step(served, correct, hint, 0).band,
                expected,
                "{served} correct={correct} hint={hint}"
            );
        }
    }

    #[test]
    fn second_hard_miss_demotes_to_medium() {
        let first = step(Band::Hard, false, false, 0);
        assert_eq!(first, Step { band: Band::Hard, hard_miss_streak: 1 });

        let second = step(Band::Hard, false, true, first.hard_miss_streak);
        assert_eq!(second.band, Band::Medium);
        assert_eq!(second.hard_miss_streak, 0);
    }

    #[test]
    fn hard_correct_and_lower_bands_reset_streak() {
        assert_eq!(step(Band::Hard, true, false, 1).hard_miss_streak, 0);
        assert_eq!(step(Band::Hard, true, true, 1).hard_miss_streak, 0);
        assert_eq!(step(Band::Medium, false, false, 1).hard_miss_streak, 0);
        assert_eq!(step(Band::Easy, true, false, 1).hard_miss_streak, 0);
    }

    #[test]
    fn advance_uses_last_served_band() {
        let mut state = SessionState::default();
        state.current_band = Band::Hard;
        state.last_served_band = Some(Band::Medium);
        advance(&mut state, true, false);
        assert_eq!(state.current_band(), Band::Hard);

        let mut fresh = SessionState::default();
        advance(&mut fresh, true, false);
        assert_eq!(fresh.current_band(), Band::Medium);
    }
}
