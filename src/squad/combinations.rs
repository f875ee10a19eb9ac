/// All `k`-element subsets of `items`, each keeping the input order, in
/// lexicographic order of positions. `k == 0` or `k > items.len()` yields
/// no subsets.
pub fn combinations<T: Clone>(items: &[T], k: usize) -> Vec<Vec<T>> {
    let n = items.len();
    if k == 0 || k > n {
        return Vec::new();
    }

    let mut result = Vec::new();
    let mut indices: Vec<usize> = (0..k).collect();
    loop {
        result.push(indices.iter().map(|&i| items[i].clone()).collect());

        // Rightmost index that can still move forward.
        let Some(pos) = (0..k).rev().find(|&pos| indices[pos] < n - k + pos) else {
            return result;
        };
        indices[pos] += 1;
        for next in pos + 1..k {
            indices[next] = indices[next - 1] + 1;
        }
    }
}

/// Binomial coefficient C(n, k); used to size progress reports.
pub fn combination_count(n: usize, k: usize) -> usize {
    if k > n {
        return 0;
    }
    let k = k.min(n - k);
    (0..k).fold(1usize, |acc, i| acc * (n - i) / (i + 1))
}
