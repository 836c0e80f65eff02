use rand::Rng;

/// Uniformly random permutation of `items`, returned as a new vector.
///
/// Fisher–Yates on a copy: for `i` from `len - 1` down to `1`, pick `j` in
/// `0..=i` and swap. The caller's slice is left untouched.
pub fn shuffled<T: Clone, R: Rng + ?Sized>(items: &[T], rng: &mut R) -> Vec<T> {
    let mut out = items.to_vec();
    for i in (1..out.len()).rev() {
        let j = rng.gen_range(0..=i);
        out.swap(i, j);
    }
    out
}
