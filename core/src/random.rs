//! Unbiased random placement helpers.
//!
//! Everything here is built on a full Fisher–Yates shuffle, so every permutation of the candidates
//! is equally likely.

use alloc::vec::Vec;
use rand::Rng;
use rand::seq::SliceRandom;

use crate::*;

/// All integers in `min..=max`, in uniformly random order.
pub fn shuffled_range<R: Rng + ?Sized>(rng: &mut R, min: i32, max: i32) -> Result<Vec<i32>> {
    if min > max {
        return Err(GameError::InvalidRange { min, max });
    }

    let mut values: Vec<i32> = (min..=max).collect();
    values.shuffle(rng);
    Ok(values)
}

/// `count` distinct integers drawn from `min..=max`.
pub fn sample_without_replacement<R: Rng + ?Sized>(
    rng: &mut R,
    min: i32,
    max: i32,
    count: usize,
) -> Result<Vec<i32>> {
    let mut values = shuffled_range(rng, min, max)?;
    if count > values.len() {
        return Err(GameError::InsufficientCandidates {
            requested: count,
            available: values.len(),
        });
    }

    values.truncate(count);
    Ok(values)
}

/// A mask of `length` flags with exactly `true_count` of them set, at uniformly random positions.
pub fn random_bool_mask<R: Rng + ?Sized>(
    rng: &mut R,
    length: usize,
    true_count: usize,
) -> Result<Vec<bool>> {
    if true_count > length {
        return Err(GameError::TooManyMarked {
            requested: true_count,
            capacity: length,
        });
    }

    let mut mask: Vec<bool> = (0..length).map(|i| i < true_count).collect();
    mask.shuffle(rng);
    Ok(mask)
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    fn rng() -> SmallRng {
        SmallRng::seed_from_u64(0x5eed)
    }

    #[test]
    fn shuffled_range_is_a_permutation() {
        let mut rng = rng();

        let mut values = shuffled_range(&mut rng, -3, 12).unwrap();
        values.sort_unstable();

        assert_eq!(values, (-3..=12).collect::<Vec<_>>());
        assert_eq!(shuffled_range(&mut rng, 4, 4).unwrap(), vec![4]);
    }

    #[test]
    fn shuffled_range_rejects_inverted_bounds() {
        assert_eq!(
            shuffled_range(&mut rng(), 5, 1),
            Err(GameError::InvalidRange { min: 5, max: 1 })
        );
    }

    #[test]
    fn shuffled_range_is_uniform_over_permutations() {
        const TRIALS: usize = 6000;
        let mut rng = rng();
        let mut counts = [0usize; 6];

        for _ in 0..TRIALS {
            let values = shuffled_range(&mut rng, 1, 3).unwrap();
            let slot = match values.as_slice() {
                [1, 2, 3] => 0,
                [1, 3, 2] => 1,
                [2, 1, 3] => 2,
                [2, 3, 1] => 3,
                [3, 1, 2] => 4,
                [3, 2, 1] => 5,
                other => panic!("not a permutation: {other:?}"),
            };
            counts[slot] += 1;
        }

        // expected 1000 each, the bounds are roughly five standard deviations wide
        for count in counts {
            assert!((850..=1150).contains(&count), "skewed counts: {counts:?}");
        }
    }

    #[test]
    fn sample_draws_distinct_values_in_range() {
        let mut values = sample_without_replacement(&mut rng(), 16, 30, 5).unwrap();
        values.sort_unstable();
        values.dedup();

        assert_eq!(values.len(), 5);
        assert!(values.iter().all(|v| (16..=30).contains(v)));
    }

    #[test]
    fn sample_rejects_small_pool() {
        assert_eq!(
            sample_without_replacement(&mut rng(), 1, 3, 4),
            Err(GameError::InsufficientCandidates {
                requested: 4,
                available: 3
            })
        );
    }

    #[test]
    fn mask_has_exact_true_count() {
        let mut rng = rng();

        for true_count in 0..=10 {
            let mask = random_bool_mask(&mut rng, 10, true_count).unwrap();
            assert_eq!(mask.len(), 10);
            assert_eq!(mask.iter().filter(|&&flag| flag).count(), true_count);
        }
    }

    #[test]
    fn mask_rejects_overfull_request() {
        assert_eq!(
            random_bool_mask(&mut rng(), 4, 5),
            Err(GameError::TooManyMarked {
                requested: 5,
                capacity: 4
            })
        );
    }
}
