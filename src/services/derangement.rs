//! Derangement generation
//!
//! Produces a uniformly random permutation of the participants in which nobody
//! is mapped to themselves. Candidates come from an unbiased Fisher–Yates
//! shuffle and are rejected until one has no fixed point. For n ≥ 2 roughly
//! 1/e of all permutations qualify, so the attempt budget only bounds the
//! worst case.

use rand::seq::SliceRandom;
use rand::Rng;

use crate::models::Pairing;

/// Shuffle attempts before giving up
pub const DEFAULT_MAX_ATTEMPTS: usize = 100;

/// Smallest participant count accepted for an exchange.
///
/// Two people is a valid derangement but each would simply give to the other.
pub const DEFAULT_MIN_PARTICIPANTS: usize = 3;

/// True when `permuted` is a permutation of `original` with no fixed point
pub fn is_derangement<T: PartialEq>(original: &[T], permuted: &[T]) -> bool {
    original.len() == permuted.len() && original.iter().zip(permuted).all(|(a, b)| a != b)
}

/// Draw a random derangement of `participants` by rejection sampling.
///
/// Returns the pairings `giver = participants[k], receiver = Q[k]`, or `None`
/// when `max_attempts` shuffles all produced a fixed point.
pub fn generate_derangement<T, R>(participants: &[T], rng: &mut R, max_attempts: usize) -> Option<Vec<Pairing<T>>>
where
    T: Clone + PartialEq,
    R: Rng + ?Sized,
{
    let mut receivers = participants.to_vec();

    for _ in 0..max_attempts {
        // Fisher–Yates: i from n-1 down to 1, swap with uniform j in [0, i]
        receivers.shuffle(rng);

        if is_derangement(participants, &receivers) {
            return Some(
                participants
                    .iter()
                    .cloned()
                    .zip(receivers)
                    .map(|(giver, receiver)| Pairing { giver, receiver })
                    .collect(),
            );
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::{HashMap, HashSet};

    fn receivers_of<T: Clone>(pairings: &[Pairing<T>]) -> Vec<T> {
        pairings.iter().map(|p| p.receiver.clone()).collect()
    }

    #[test]
    fn test_four_participants_have_no_fixed_points() {
        let participants = vec!["A", "B", "C", "D"];
        let mut rng = StdRng::seed_from_u64(7);

        let pairings = generate_derangement(&participants, &mut rng, DEFAULT_MAX_ATTEMPTS).unwrap();

        assert_eq!(pairings.len(), 4);
        for (pairing, participant) in pairings.iter().zip(&participants) {
            assert_eq!(&pairing.giver, participant);
            assert_ne!(pairing.giver, pairing.receiver);
        }
        let receivers: HashSet<_> = receivers_of(&pairings).into_iter().collect();
        assert_eq!(receivers, participants.iter().copied().collect::<HashSet<_>>());
    }

    #[test]
    fn test_two_participants_swap() {
        let mut rng = StdRng::seed_from_u64(1);
        let pairings = generate_derangement(&[1, 2], &mut rng, DEFAULT_MAX_ATTEMPTS).unwrap();
        assert_eq!(pairings, vec![Pairing { giver: 1, receiver: 2 }, Pairing { giver: 2, receiver: 1 }]);
    }

    #[test]
    fn test_single_participant_exhausts_budget() {
        let mut rng = StdRng::seed_from_u64(1);
        assert!(generate_derangement(&["solo"], &mut rng, DEFAULT_MAX_ATTEMPTS).is_none());
    }

    #[test]
    fn test_zero_budget_never_succeeds() {
        let mut rng = StdRng::seed_from_u64(1);
        assert!(generate_derangement(&[1, 2, 3], &mut rng, 0).is_none());
    }

    #[test]
    fn test_is_derangement() {
        assert!(is_derangement(&[1, 2, 3], &[2, 3, 1]));
        assert!(!is_derangement(&[1, 2, 3], &[1, 3, 2]));
        assert!(!is_derangement(&[1, 2, 3], &[2, 1]));
    }

    /// Chi-squared goodness of fit against the 44 derangements of five elements
    #[test]
    fn test_derangements_of_five_are_uniform() {
        const DERANGEMENTS_OF_FIVE: usize = 44;
        const DRAWS_PER_OUTCOME: usize = 500;

        let participants: Vec<u8> = (0..5).collect();
        let mut rng = StdRng::seed_from_u64(0x5EC2_E7A5);
        let trials = DERANGEMENTS_OF_FIVE * DRAWS_PER_OUTCOME;

        let mut counts: HashMap<Vec<u8>, usize> = HashMap::new();
        for _ in 0..trials {
            let pairings = generate_derangement(&participants, &mut rng, DEFAULT_MAX_ATTEMPTS).unwrap();
            *counts.entry(receivers_of(&pairings)).or_default() += 1;
        }

        assert_eq!(counts.len(), DERANGEMENTS_OF_FIVE);
        assert!(counts.keys().all(|q| is_derangement(&participants, q)));

        let expected = DRAWS_PER_OUTCOME as f64;
        let chi_squared: f64 = counts
            .values()
            .map(|&observed| {
                let diff = observed as f64 - expected;
                diff * diff / expected
            })
            .sum();

        // 43 degrees of freedom; 90 sits far beyond the 0.999 quantile (~77.4)
        assert!(chi_squared < 90.0, "chi-squared statistic too large: {chi_squared}");
    }

    proptest! {
        #[test]
        fn prop_output_is_fixed_point_free_bijection(n in 2usize..40, seed in any::<u64>()) {
            let participants: Vec<usize> = (0..n).collect();
            let mut rng = StdRng::seed_from_u64(seed);

            let pairings = generate_derangement(&participants, &mut rng, DEFAULT_MAX_ATTEMPTS);
            prop_assert!(pairings.is_some());
            let pairings = pairings.unwrap();

            let givers: Vec<usize> = pairings.iter().map(|p| p.giver).collect();
            prop_assert_eq!(&givers, &participants);

            let mut receivers = receivers_of(&pairings);
            prop_assert!(pairings.iter().all(|p| p.giver != p.receiver));
            receivers.sort_unstable();
            prop_assert_eq!(receivers, participants);
        }
    }
}
