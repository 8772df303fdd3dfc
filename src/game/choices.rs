//! Answer-set construction
//!
//! Builds the four buttons shown under a question: the correct answer plus
//! three distinct positive distractors, in shuffled order.

use rand::Rng;
use rand::seq::SliceRandom;

use crate::consts::CHOICE_COUNT;

/// Minimum distractor spread, so tiny answers still have enough candidates
const MIN_SPREAD: u32 = 5;
/// Spread scales with the answer's magnitude
const SPREAD_FACTOR: f32 = 0.2;

/// Build a shuffled choice set around `correct`.
///
/// Candidates are `correct ± delta` with `delta` drawn from `[1, spread]`
/// where `spread = max(5, ceil(correct * 0.2))`. Non-positive values and
/// duplicates are rejected and redrawn. The spread floor guarantees at least
/// five distinct positive candidates exist even for `correct == 1`, so the
/// loop terminates with probability 1.
pub fn build_choices(correct: u32, rng: &mut impl Rng) -> Vec<u32> {
    let spread = ((correct as f32 * SPREAD_FACTOR).ceil() as u32).max(MIN_SPREAD);

    let mut choices = Vec::with_capacity(CHOICE_COUNT);
    choices.push(correct);
    while choices.len() < CHOICE_COUNT {
        let delta = rng.random_range(1..=spread) as i64;
        let signed = if rng.random_bool(0.5) { delta } else { -delta };
        let candidate = correct as i64 + signed;
        if candidate <= 0 {
            continue;
        }
        let candidate = candidate as u32;
        if choices.contains(&candidate) {
            continue;
        }
        choices.push(candidate);
    }

    choices.shuffle(rng);
    choices
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn assert_valid(correct: u32, choices: &[u32]) {
        assert_eq!(choices.len(), CHOICE_COUNT);
        assert_eq!(
            choices.iter().filter(|&&c| c == correct).count(),
            1,
            "exactly one entry must equal the correct answer"
        );
        assert!(choices.iter().all(|&c| c >= 1), "no zero or negative choices");
        let mut sorted = choices.to_vec();
        sorted.sort_unstable();
        sorted.dedup();
        assert_eq!(sorted.len(), CHOICE_COUNT, "choices must be distinct");
    }

    #[test]
    fn test_small_and_large_answers() {
        let mut rng = Pcg32::seed_from_u64(99);
        for correct in [1, 2, 10, 100] {
            for _ in 0..50 {
                let choices = build_choices(correct, &mut rng);
                assert_valid(correct, &choices);
            }
        }
    }

    #[test]
    fn test_order_varies() {
        // With enough draws the correct answer must land in more than one slot
        let mut rng = Pcg32::seed_from_u64(5);
        let mut positions = std::collections::HashSet::new();
        for _ in 0..40 {
            let choices = build_choices(12, &mut rng);
            positions.insert(choices.iter().position(|&c| c == 12).unwrap());
        }
        assert!(positions.len() > 1, "shuffle never moved the correct answer");
    }

    proptest! {
        #[test]
        fn choice_set_always_valid(correct in 1u32..10_000, seed in any::<u64>()) {
            let mut rng = Pcg32::seed_from_u64(seed);
            let choices = build_choices(correct, &mut rng);
            assert_valid(correct, &choices);
        }
    }
}
