/// Bucket a key belongs to: `key mod capacity`, always in `[0, capacity)`.
///
/// Uses the Euclidean remainder so negative keys are placed like their
/// positive congruents instead of producing a negative index.
#[inline]
pub fn bucket_index(key: i32, capacity: usize) -> usize {
    debug_assert!(capacity > 0);
    i128::from(key).rem_euclid(capacity as i128) as usize
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_non_negative_keys() {
        assert_eq!(bucket_index(0, 10), 0);
        assert_eq!(bucket_index(9, 10), 9);
        assert_eq!(bucket_index(10, 10), 0);
        assert_eq!(bucket_index(9999, 100), 99);
        assert_eq!(bucket_index(12345, 1), 0);
    }

    #[test]
    fn test_negative_keys_stay_in_range() {
        assert_eq!(bucket_index(-1, 10), 9);
        assert_eq!(bucket_index(-10, 10), 0);
        assert_eq!(bucket_index(i32::MIN, 7), i128::from(i32::MIN).rem_euclid(7) as usize);
        for key in -50..50 {
            assert!(bucket_index(key, 13) < 13);
        }
    }

    #[test]
    fn test_extreme_keys() {
        assert_eq!(bucket_index(i32::MAX, 1), 0);
        assert_eq!(bucket_index(i32::MAX, usize::MAX), i32::MAX as usize);
    }
}
