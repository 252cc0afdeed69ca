//! Sample estimation of ⟨Z⟩ from measured bitstrings.
//!
//! A computational-basis measurement maps |0⟩ → bit 0 → eigenvalue +1 and
//! |1⟩ → bit 1 → eigenvalue -1, so the sample estimate of ⟨Z⟩ over a set of
//! shots is the mean of `(-1)^bit`.

/// Estimate ⟨Z⟩ as the mean of `(-1)^bit` across all shots.
///
/// Returns `None` for an empty shot list (no information, not a zero).
/// Callers are expected to have validated that bits are 0/1; ingest rejects
/// rows containing anything else.
pub fn z_expectation(bits: &[u8]) -> Option<f64> {
    if bits.is_empty() {
        return None;
    }
    let sum: f64 = bits
        .iter()
        .map(|&b| if b == 0 { 1.0 } else { -1.0 })
        .sum();
    Some(sum / bits.len() as f64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_zeros_give_plus_one() {
        assert_eq!(z_expectation(&[0, 0, 0, 0]), Some(1.0));
    }

    #[test]
    fn all_ones_give_minus_one() {
        assert_eq!(z_expectation(&[1, 1, 1]), Some(-1.0));
    }

    #[test]
    fn balanced_shots_give_zero() {
        assert_eq!(z_expectation(&[0, 1, 0, 1]), Some(0.0));
    }

    #[test]
    fn quarter_ones() {
        // 3 of 4 shots +1, 1 shot -1 -> mean 0.5
        assert_eq!(z_expectation(&[0, 0, 0, 1]), Some(0.5));
    }

    #[test]
    fn empty_input_is_none() {
        assert_eq!(z_expectation(&[]), None);
    }
}
