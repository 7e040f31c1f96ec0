/// Fixed-stride decimation to at most `max_points` items.
///
/// `stride = max(1, len / max_points)`; every stride-th item is kept starting
/// at index 0, truncated to `max_points`. Order is preserved and the result
/// depends only on the input, so repeated calls return the same subsequence.
/// Inputs no longer than `max_points` come back unchanged.
pub fn downsample<T: Clone>(items: &[T], max_points: usize) -> Vec<T> {
    if max_points == 0 || items.is_empty() {
        return Vec::new();
    }

    let stride = (items.len() / max_points).max(1);

    items
        .iter()
        .step_by(stride)
        .take(max_points)
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identity_when_input_fits() {
        let input: Vec<u32> = (0..10).collect();
        assert_eq!(downsample(&input, 10), input);
        assert_eq!(downsample(&input, 100), input);
    }

    #[test]
    fn output_never_exceeds_cap() {
        for len in [1usize, 7, 99, 100, 101, 199, 250, 1_000, 12_345] {
            let input: Vec<usize> = (0..len).collect();
            for cap in [1usize, 3, 10, 100] {
                let out = downsample(&input, cap);
                assert!(out.len() <= cap, "len={} cap={} got {}", len, cap, out.len());
                assert_eq!(out[0], 0);
                assert!(out.windows(2).all(|w| w[0] < w[1]));
            }
        }
    }

    #[test]
    fn uses_fixed_stride() {
        let input: Vec<usize> = (0..250).collect();
        // stride = 250 / 100 = 2
        let out = downsample(&input, 100);
        assert_eq!(out.len(), 100);
        assert_eq!(&out[..4], &[0, 2, 4, 6]);
        assert_eq!(*out.last().unwrap(), 198);
    }

    #[test]
    fn deterministic() {
        let input: Vec<String> = (0..5_003).map(|n| format!("p{}", n)).collect();
        assert_eq!(downsample(&input, 97), downsample(&input, 97));
    }

    #[test]
    fn zero_cap_or_empty_input_is_empty() {
        assert!(downsample(&[1, 2, 3], 0).is_empty());
        assert!(downsample::<u8>(&[], 10).is_empty());
    }
}
