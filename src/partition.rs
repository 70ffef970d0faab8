/*!
# Linear partitioner

Splits an ordered sequence of non-negative region weights into `K`
contiguous groups minimizing the sum of squared group totals — equivalently,
minimizing the variance of block sums among contiguous partitions of that
ordering.

The DP's working tables are owned by a `Partitioner` created fresh for each
call and dropped at return; there is no process-wide shared state.
*/

use std::collections::HashMap;

/// Finds the contiguous-block sizes of `weights` into `k` groups minimizing
/// the sum of squared group totals.
///
/// Returns a vector of `k` non-negative block sizes summing to
/// `weights.len()`.
pub fn find_partition(weights: &[f64], k: usize) -> Vec<usize> {
    let n = weights.len();

    if k == 1 {
        return vec![n];
    }
    if k >= n {
        let mut splits = vec![0usize; k];
        for s in splits.iter_mut().take(n) {
            *s = 1;
        }
        return splits;
    }

    let mut partitioner = Partitioner::new(weights);
    partitioner.solve(k)
}

/// Owns the DP memo tables for one `find_partition` call.
struct Partitioner<'a> {
    weights: &'a [f64],
    n: usize,
    /// `prefix[i]` = sum of `weights[0..i)`.
    prefix: Vec<f64>,
    /// Memoized (cost, rightmost-block-length) keyed by `(k, trim)`, where
    /// `k` blocks partition the prefix `weights[0..n-trim)`.
    memo: HashMap<(usize, usize), (f64, usize)>,
}

impl<'a> Partitioner<'a> {
    fn new(weights: &'a [f64]) -> Self {
        let n = weights.len();
        let mut prefix = Vec::with_capacity(n + 1);
        prefix.push(0.0);
        for &w in weights {
            prefix.push(prefix.last().unwrap() + w);
        }
        Partitioner {
            weights,
            n,
            prefix,
            memo: HashMap::new(),
        }
    }

    /// Sum of `weights[i..i+len)`, squared.
    fn segment_cost(&self, i: usize, len: usize) -> f64 {
        let sum = self.prefix[i + len] - self.prefix[i];
        sum * sum
    }

    fn solve(&mut self, k: usize) -> Vec<usize> {
        self.cost(k, 0);

        let mut block_sizes_right_to_left = Vec::with_capacity(k);
        let mut trim = 0usize;
        for blocks_remaining in (1..=k).rev() {
            let (_, rlen) = self.cost(blocks_remaining, trim);
            block_sizes_right_to_left.push(rlen);
            trim += rlen;
        }
        block_sizes_right_to_left.reverse();
        block_sizes_right_to_left
    }

    /// Minimal sum-of-squares cost (and the rightmost block's length) for
    /// partitioning `weights[0..n-trim)` into `k` contiguous blocks.
    fn cost(&mut self, k: usize, trim: usize) -> (f64, usize) {
        if let Some(&cached) = self.memo.get(&(k, trim)) {
            return cached;
        }

        let remaining = self.n - trim;
        let result = if k == 1 {
            (self.segment_cost(0, remaining), remaining)
        } else {
            let mut best_cost = f64::INFINITY;
            let mut best_rlen = 0usize;
            let max_rlen = remaining - (k - 1);
            for rlen in 1..=max_rlen {
                let (sub_cost, _) = self.cost(k - 1, trim + rlen);
                let total = sub_cost + self.segment_cost(remaining - rlen, rlen);
                if total < best_cost {
                    best_cost = total;
                    best_rlen = rlen;
                }
            }
            (best_cost, best_rlen)
        };

        self.memo.insert((k, trim), result);
        result
    }
}
