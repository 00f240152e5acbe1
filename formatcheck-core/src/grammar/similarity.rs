// Edit-distance helpers for exception-word matching.

/// Levenshtein distance over Unicode scalar values
pub fn edit_distance(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    if a.is_empty() {
        return b.len();
    }
    if b.is_empty() {
        return a.len();
    }

    let mut previous: Vec<usize> = (0..=b.len()).collect();
    let mut current = vec![0; b.len() + 1];

    for (i, ca) in a.iter().enumerate() {
        current[0] = i + 1;
        for (j, cb) in b.iter().enumerate() {
            let substitution = previous[j] + usize::from(ca != cb);
            current[j + 1] = substitution.min(previous[j + 1] + 1).min(current[j] + 1);
        }
        std::mem::swap(&mut previous, &mut current);
    }

    previous[b.len()]
}

/// Largest distance still treated as the same word, scaled by the exception's length
pub fn distance_threshold(exception_len: usize) -> usize {
    match exception_len {
        0..=4 => 1,
        5..=7 => 2,
        _ => 3,
    }
}

/// Exact or fuzzy match against one exception word. Case-sensitive.
pub fn is_near(word: &str, exception: &str) -> bool {
    if word == exception {
        return true;
    }
    let threshold = distance_threshold(exception.chars().count());
    // Lengths alone may already rule the pair out
    let len_gap = word.chars().count().abs_diff(exception.chars().count());
    len_gap <= threshold && edit_distance(word, exception) <= threshold
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_edit_distance() {
        assert_eq!(edit_distance("kitten", "sitting"), 3);
        assert_eq!(edit_distance("", "abc"), 3);
        assert_eq!(edit_distance("КПІ", "КПI"), 1);
        assert_eq!(edit_distance("same", "same"), 0);
    }

    #[test]
    fn test_thresholds_scale_with_length() {
        assert_eq!(distance_threshold(3), 1);
        assert_eq!(distance_threshold(4), 1);
        assert_eq!(distance_threshold(7), 2);
        assert_eq!(distance_threshold(8), 3);
    }

    #[test]
    fn test_four_letter_exception() {
        assert!(is_near("ZDOs", "ZDOS"));
        assert!(!is_near("ZDxx", "ZDOS"));
        // Case matters
        assert!(!is_near("zdos", "ZDOS"));
    }
}
