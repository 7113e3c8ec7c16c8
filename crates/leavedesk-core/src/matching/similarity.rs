use strsim::levenshtein;

/// Edit-distance similarity in `[0, 1]`.
///
/// `(max_len - distance) / max_len` with unit-cost insertions, deletions and
/// substitutions, lengths counted in characters. Two empty strings score `1.0`.
pub fn similarity(a: &str, b: &str) -> f64 {
    // Score a canonical ordering so the result is bit-for-bit symmetric.
    let (a, b) = if a <= b { (a, b) } else { (b, a) };

    let longest = a.chars().count().max(b.chars().count());
    if longest == 0 {
        return 1.0;
    }

    let distance = levenshtein(a, b);
    (longest - distance) as f64 / longest as f64
}
