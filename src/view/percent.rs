use std::cmp::Reverse;

/// Split 100 percent over `weights` so that the shares sum to exactly 100.
///
/// Every share is first rounded down. The points lost to rounding go, one
/// each, to the items with the largest rounding remainder; ties favor the
/// earlier item. A zero total yields all zeros.
pub fn distribute_percent(weights: &[u64]) -> Vec<u8> {
    let total: u128 = weights.iter().map(|w| *w as u128).sum();
    if total == 0 {
        return vec![0; weights.len()];
    }

    let mut percents: Vec<u8> = weights
        .iter()
        .map(|w| (*w as u128 * 100 / total) as u8)
        .collect();

    let assigned: usize = percents.iter().map(|p| *p as usize).sum();
    let remaining = 100 - assigned;
    debug_assert!(remaining < weights.len());
    let remaining = remaining.min(weights.len());

    if remaining > 0 {
        let mut order: Vec<usize> = (0..weights.len()).collect();
        order.select_nth_unstable_by_key(remaining - 1, |i| {
            (Reverse(weights[*i] as u128 * 100 % total), *i)
        });
        for &i in &order[..remaining] {
            percents[i] += 1;
        }
    }
    percents
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sum(p: &[u8]) -> u32 {
        p.iter().map(|v| *v as u32).sum()
    }

    #[test]
    fn thirds_sum_to_hundred() {
        let p = distribute_percent(&[1, 1, 1]);
        assert_eq!(sum(&p), 100);
        let mut sorted = p.clone();
        sorted.sort();
        assert_eq!(sorted, vec![33, 33, 34]);
    }

    #[test]
    fn ties_go_to_earlier_items() {
        assert_eq!(distribute_percent(&[1, 1, 1]), vec![34, 33, 33]);
    }

    #[test]
    fn largest_remainder_gets_the_point() {
        // 33.33 / 66.67
        assert_eq!(distribute_percent(&[1, 2]), vec![33, 67]);
    }

    #[test]
    fn exact_split_is_untouched() {
        assert_eq!(distribute_percent(&[600, 400]), vec![60, 40]);
        assert_eq!(distribute_percent(&[5]), vec![100]);
    }

    #[test]
    fn zero_total_gives_zeros() {
        assert_eq!(distribute_percent(&[0, 0, 0]), vec![0, 0, 0]);
        assert!(distribute_percent(&[]).is_empty());
    }

    #[test]
    fn zero_weights_mixed_with_others() {
        let p = distribute_percent(&[0, 7, 0, 3]);
        assert_eq!(p, vec![0, 70, 0, 30]);
    }

    #[test]
    fn huge_weights_do_not_overflow() {
        let p = distribute_percent(&[u64::MAX, u64::MAX, 1]);
        assert_eq!(sum(&p), 100);
        assert_eq!(p[2], 0);
    }

    #[test]
    fn many_small_items_still_sum_to_hundred() {
        let weights: Vec<u64> = (1..=37).collect();
        assert_eq!(sum(&distribute_percent(&weights)), 100);

        let uniform = vec![3u64; 7];
        assert_eq!(sum(&distribute_percent(&uniform)), 100);
    }
}
