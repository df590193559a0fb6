//! Fuzzy token equality tolerant of recognition and transcription noise.

/// Default maximum edit distance for fuzzy word matching.
pub const DEFAULT_EDIT_DISTANCE: usize = 2;

/// Decide whether two tokens count as equal for alignment purposes.
///
/// Case-insensitive; exact matches are accepted immediately. Fuzzy comparison
/// is disabled for very short tokens (either length `<= threshold + 2`), which
/// guards against spurious matches between short function words such as
/// "de"/"die". A length difference larger than `threshold` is rejected without
/// computing the edit distance, since the distance cannot be smaller than the
/// length difference. Otherwise accepts when the Levenshtein distance is at
/// most `threshold`.
pub fn words_match(a: &str, b: &str, threshold: usize) -> bool {
    let a = a.to_lowercase();
    let b = b.to_lowercase();
    if a == b {
        return true;
    }

    let la = a.chars().count();
    let lb = b.chars().count();
    if la.min(lb) <= threshold + 2 || la > lb + threshold || lb > la + threshold {
        return false;
    }

    strsim::levenshtein(&a, &b) <= threshold
}
