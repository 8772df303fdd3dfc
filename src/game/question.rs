//! Question generation
//!
//! Produces one arithmetic prompt per round. Division questions are built
//! backwards from divisor × quotient so the result is always an exact
//! positive integer.

use rand::Rng;
use serde::{Deserialize, Serialize};

/// Operand range selector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Difficulty {
    Easy,
    #[default]
    Medium,
    Hard,
}

impl Difficulty {
    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "easy" => Some(Difficulty::Easy),
            "medium" | "med" => Some(Difficulty::Medium),
            "hard" => Some(Difficulty::Hard),
            _ => None,
        }
    }

    /// Inclusive operand range for this difficulty
    pub fn range(&self) -> (u32, u32) {
        match self {
            Difficulty::Easy => (2, 8),
            Difficulty::Medium => (2, 12),
            Difficulty::Hard => (6, 18),
        }
    }
}

/// Which operations a session may draw from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpSet {
    MultiplyOnly,
    DivideOnly,
    /// Both operations, biased toward multiplication
    Mixed,
}

/// One round's prompt and its correct answer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    /// Display text, e.g. `"7 × 8 = ?"`
    pub text: String,
    pub answer: u32,
}

/// Probability of drawing multiplication from `OpSet::Mixed`
const MULTIPLY_BIAS: f64 = 0.55;

/// Generate a question for the given difficulty and operation set.
///
/// Answers are always positive integers; divisors are at least 2, so a
/// division can never be degenerate.
pub fn generate(difficulty: Difficulty, ops: OpSet, rng: &mut impl Rng) -> Question {
    let (min, max) = difficulty.range();
    let multiply = match ops {
        OpSet::MultiplyOnly => true,
        OpSet::DivideOnly => false,
        OpSet::Mixed => rng.random_bool(MULTIPLY_BIAS),
    };

    if multiply {
        let a = rng.random_range(min..=max);
        let b = rng.random_range(min..=max);
        Question {
            text: format!("{a} × {b} = ?"),
            answer: a * b,
        }
    } else {
        let divisor = rng.random_range(min..=max);
        let quotient = rng.random_range(min..=max);
        Question {
            text: format!("{} ÷ {divisor} = ?", divisor * quotient),
            answer: quotient,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    /// Pull the integer operands back out of the display text
    fn operands(text: &str) -> Vec<u32> {
        text.split(|c: char| !c.is_ascii_digit())
            .filter(|s| !s.is_empty())
            .map(|s| s.parse().unwrap())
            .collect()
    }

    #[test]
    fn test_multiply_operands_in_range() {
        let mut rng = Pcg32::seed_from_u64(42);
        for difficulty in [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard] {
            let (min, max) = difficulty.range();
            for _ in 0..100 {
                let q = generate(difficulty, OpSet::MultiplyOnly, &mut rng);
                assert!(q.text.contains('×'));
                let ops = operands(&q.text);
                assert_eq!(ops.len(), 2);
                assert!(ops.iter().all(|&v| (min..=max).contains(&v)));
                assert_eq!(ops[0] * ops[1], q.answer);
            }
        }
    }

    #[test]
    fn test_division_always_exact() {
        let mut rng = Pcg32::seed_from_u64(7);
        for difficulty in [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard] {
            let (min, max) = difficulty.range();
            for _ in 0..100 {
                let q = generate(difficulty, OpSet::DivideOnly, &mut rng);
                assert!(q.text.contains('÷'));
                let ops = operands(&q.text);
                assert_eq!(ops.len(), 2);
                let (dividend, divisor) = (ops[0], ops[1]);
                assert!(divisor >= 2, "divisor {divisor} could be degenerate");
                assert!((min..=max).contains(&divisor));
                assert_eq!(dividend % divisor, 0);
                assert_eq!(dividend / divisor, q.answer);
                assert!((min..=max).contains(&q.answer));
            }
        }
    }

    proptest! {
        #[test]
        fn answer_positive_and_bounded(seed in any::<u64>()) {
            let mut rng = Pcg32::seed_from_u64(seed);
            for difficulty in [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard] {
                let (_, max) = difficulty.range();
                let q = generate(difficulty, OpSet::Mixed, &mut rng);
                prop_assert!(q.answer >= 1);
                prop_assert!(q.answer <= max * max);
            }
        }
    }

    #[test]
    fn test_difficulty_round_trip() {
        for d in [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard] {
            assert_eq!(Difficulty::from_str(d.as_str()), Some(d));
        }
        assert_eq!(Difficulty::from_str("nope"), None);
    }
}
