//! Arithmetic problem generation
//!
//! Difficulty is banded by level. Every answer stays within `[0, 100]`.

use rand::Rng;

use super::state::{Operator, Problem};
use crate::consts::WRONG_ANSWER_COUNT;
use crate::rand_int;

/// Largest answer any problem may have
pub const MAX_ANSWER: u32 = 100;

/// Distractors are drawn within this distance of the correct answer
const DISTRACTOR_SPREAD: i32 = 10;
const DISTRACTOR_ATTEMPTS: u32 = 200;

/// Operand ranges for one difficulty band
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NumberRanges {
    pub max_num1: u32,
    pub min_num2: u32,
    pub max_num2: u32,
}

/// Operand ranges for a level
pub fn number_ranges(level: u32) -> NumberRanges {
    let (max_num1, min_num2, max_num2) = match level {
        0..=2 => (20, 1, 9),
        3..=5 => (50, 1, 9),
        6..=9 => (75, 1, 9),
        10..=14 => (80, 10, 20),
        _ => (99, 1, 99),
    };
    NumberRanges {
        max_num1,
        min_num2,
        max_num2,
    }
}

fn draw<R: Rng + ?Sized>(rng: &mut R, min: u32, max: u32) -> u32 {
    rand_int(rng, min as i32, max as i32) as u32
}

/// Generate a problem for the given level
pub fn generate_problem<R: Rng + ?Sized>(rng: &mut R, level: u32) -> Problem {
    let NumberRanges {
        max_num1,
        min_num2,
        max_num2,
    } = number_ranges(level);

    if rng.random_bool(0.5) {
        let mut num1 = draw(rng, 1, max_num1);
        // No room for even the smallest num2: shrink num1 first
        if MAX_ANSWER - num1 < min_num2 {
            num1 = draw(rng, 1, MAX_ANSWER - min_num2);
        }
        let num2 = draw(rng, min_num2, max_num2.min(MAX_ANSWER - num1));
        Problem {
            num1,
            num2,
            operator: Operator::Add,
            answer: num1 + num2,
        }
    } else {
        let num1 = draw(rng, min_num2, max_num1);
        let num2 = draw(rng, min_num2, max_num2.min(num1));
        Problem {
            num1,
            num2,
            operator: Operator::Subtract,
            answer: num1 - num2,
        }
    }
}

/// Three unique, non-negative distractors near `correct`
pub fn generate_wrong_answers<R: Rng + ?Sized>(rng: &mut R, correct: u32) -> Vec<u32> {
    let correct_i = correct as i64;
    let mut wrongs: Vec<u32> = Vec::with_capacity(WRONG_ANSWER_COUNT);
    let mut attempts = 0;

    while wrongs.len() < WRONG_ANSWER_COUNT && attempts < DISTRACTOR_ATTEMPTS {
        attempts += 1;
        let mut wrong = correct_i + rand_int(rng, -DISTRACTOR_SPREAD, DISTRACTOR_SPREAD) as i64;
        if wrong < 0 {
            wrong = correct_i + rand_int(rng, 1, DISTRACTOR_SPREAD) as i64;
        }
        let wrong = wrong as u32;
        if wrong == correct || wrongs.contains(&wrong) {
            continue;
        }
        wrongs.push(wrong);
    }

    // Sequential fallback above the answer always terminates
    let mut offset = 1;
    while wrongs.len() < WRONG_ANSWER_COUNT {
        let fallback = correct + offset;
        if !wrongs.contains(&fallback) {
            wrongs.push(fallback);
        }
        offset += 1;
    }

    wrongs
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn check(problem: &Problem) {
        assert!(problem.answer <= MAX_ANSWER);
        match problem.operator {
            Operator::Add => {
                assert_eq!(problem.answer, problem.num1 + problem.num2);
                assert!(problem.num1 + problem.num2 <= 100);
            }
            Operator::Subtract => {
                assert!(problem.num1 >= problem.num2);
                assert_eq!(problem.answer, problem.num1 - problem.num2);
            }
        }
    }

    #[test]
    fn test_bands() {
        assert_eq!(number_ranges(1).max_num1, 20);
        assert_eq!(number_ranges(2).max_num1, 20);
        assert_eq!(number_ranges(3).max_num1, 50);
        assert_eq!(number_ranges(9).max_num1, 75);
        assert_eq!(
            number_ranges(10),
            NumberRanges {
                max_num1: 80,
                min_num2: 10,
                max_num2: 20
            }
        );
        assert_eq!(number_ranges(15).max_num2, 99);
    }

    #[test]
    fn test_num2_respects_band_minimum() {
        let mut rng = Pcg32::seed_from_u64(3);
        for _ in 0..500 {
            let p = generate_problem(&mut rng, 12);
            assert!(p.num2 >= 10, "{p:?}");
            assert!(p.num2 <= 20, "{p:?}");
            check(&p);
        }
    }

    #[test]
    fn test_both_operators_appear() {
        let mut rng = Pcg32::seed_from_u64(11);
        let problems: Vec<_> = (0..200).map(|_| generate_problem(&mut rng, 5)).collect();
        assert!(problems.iter().any(|p| p.operator == Operator::Add));
        assert!(problems.iter().any(|p| p.operator == Operator::Subtract));
    }

    #[test]
    fn test_wrong_answers_for_zero() {
        let mut rng = Pcg32::seed_from_u64(5);
        for _ in 0..200 {
            let wrongs = generate_wrong_answers(&mut rng, 0);
            assert_eq!(wrongs.len(), 3);
            assert!(!wrongs.contains(&0));
        }
    }

    #[test]
    fn test_wrong_answers_near_correct() {
        let mut rng = Pcg32::seed_from_u64(9);
        let wrongs = generate_wrong_answers(&mut rng, 50);
        for w in wrongs {
            assert!((40..=60).contains(&w));
        }
    }

    proptest! {
        #[test]
        fn prop_problem_is_well_formed(seed in any::<u64>(), level in 1u32..40) {
            let mut rng = Pcg32::seed_from_u64(seed);
            let p = generate_problem(&mut rng, level);
            check(&p);
        }

        #[test]
        fn prop_wrong_answers_unique(seed in any::<u64>(), correct in 0u32..=100) {
            let mut rng = Pcg32::seed_from_u64(seed);
            let wrongs = generate_wrong_answers(&mut rng, correct);
            prop_assert_eq!(wrongs.len(), 3);
            prop_assert!(!wrongs.contains(&correct));
            prop_assert!(wrongs[0] != wrongs[1] && wrongs[1] != wrongs[2] && wrongs[0] != wrongs[2]);
        }
    }
}
