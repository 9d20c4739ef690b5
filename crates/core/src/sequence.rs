use rand::seq::SliceRandom;
use rand::Rng;
use thiserror::Error;

use crate::registry::{SEQUENCE_MAX, SEQUENCE_MIN};

pub const SEQUENCE_CAPTION: &str = "Your pseudo-random sequence:";

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum SequenceError {
    #[error("count {value} is outside the supported range {min}..={max}")]
    OutOfRange { value: i64, min: i64, max: i64 },
}

/// A sequence length that has already been checked against the registered bounds.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SequenceRequest {
    count: usize,
}

impl SequenceRequest {
    pub fn new(value: i64) -> Result<Self, SequenceError> {
        if !(SEQUENCE_MIN..=SEQUENCE_MAX).contains(&value) {
            return Err(SequenceError::OutOfRange {
                value,
                min: SEQUENCE_MIN,
                max: SEQUENCE_MAX,
            });
        }

        let count = usize::try_from(value).map_err(|_| SequenceError::OutOfRange {
            value,
            min: SEQUENCE_MIN,
            max: SEQUENCE_MAX,
        })?;
        Ok(Self { count })
    }

    pub fn count(&self) -> usize {
        self.count
    }
}

/// Shuffles `0..count` and shifts every value by one, yielding a permutation of
/// `1..=count`.
pub fn random_sequence<R>(request: SequenceRequest, rng: &mut R) -> Vec<u32>
where
    R: Rng + ?Sized,
{
    let mut values: Vec<u32> = (0..request.count as u32).collect();
    values.shuffle(rng);
    values.iter_mut().for_each(|value| *value += 1);
    values
}

pub fn render_reply(values: &[u32]) -> String {
    let mut body = String::from(SEQUENCE_CAPTION);
    for value in values {
        body.push('\n');
        body.push_str(&value.to_string());
    }
    body
}

pub fn render_log_line(values: &[u32]) -> String {
    values.iter().map(u32::to_string).collect::<Vec<_>>().join(",")
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::{
        random_sequence, render_log_line, render_reply, SequenceError, SequenceRequest,
        SEQUENCE_CAPTION,
    };

    fn assert_permutation(values: &[u32], count: usize) {
        assert_eq!(values.len(), count);
        let mut sorted = values.to_vec();
        sorted.sort_unstable();
        let expected: Vec<u32> = (1..=count as u32).collect();
        assert_eq!(sorted, expected, "sequence must be a permutation of 1..={count}");
    }

    #[test]
    fn every_supported_count_yields_a_permutation() {
        let mut rng = StdRng::seed_from_u64(7);
        for count in 2..=100 {
            let request = SequenceRequest::new(count).expect("count in range");
            let values = random_sequence(request, &mut rng);
            assert_permutation(&values, count as usize);
        }
    }

    #[test]
    fn counts_outside_registered_bounds_are_rejected() {
        for value in [-5, 0, 1, 101, i64::MAX] {
            assert_eq!(
                SequenceRequest::new(value),
                Err(SequenceError::OutOfRange { value, min: 2, max: 100 })
            );
        }
    }

    #[test]
    fn repeated_draws_differ() {
        let mut rng = StdRng::seed_from_u64(42);
        let request = SequenceRequest::new(100).expect("count in range");
        let first = random_sequence(request, &mut rng);
        let second = random_sequence(request, &mut rng);

        assert_permutation(&first, 100);
        assert_permutation(&second, 100);
        assert_ne!(first, second);
    }

    #[test]
    fn shuffle_is_not_biased_toward_input_order() {
        let mut rng = StdRng::seed_from_u64(1234);
        let request = SequenceRequest::new(10).expect("count in range");
        let identity: Vec<u32> = (1..=10).collect();

        let unshuffled =
            (0..200).filter(|_| random_sequence(request, &mut rng) == identity).count();
        assert!(unshuffled < 5, "identity ordering showed up {unshuffled} times in 200 draws");
    }

    #[test]
    fn reply_lists_values_one_per_line_after_caption() {
        let body = render_reply(&[3, 1, 2]);
        assert_eq!(body, format!("{SEQUENCE_CAPTION}\n3\n1\n2"));
        assert_eq!(render_log_line(&[3, 1, 2]), "3,1,2");
    }
}
