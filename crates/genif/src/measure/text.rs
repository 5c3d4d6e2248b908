//! Edit distance for strings.

use std::convert::Infallible;

use super::Dissimilarity;

/// Levenshtein edit distance over Unicode scalar values.
///
/// Unit cost for insertion, deletion and substitution. Works for any item
/// that can be viewed as `str` (`String`, `&str`, `Box<str>`, ...).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Levenshtein;

impl<S: AsRef<str> + Send + Sync> Dissimilarity<S> for Levenshtein {
    type Error = Infallible;

    fn dissimilarity(&self, a: &S, b: &S) -> Result<f64, Infallible> {
        Ok(edit_distance(a.as_ref(), b.as_ref()) as f64)
    }
}

/// Two-row dynamic program, `O(|a|·|b|)` time and `O(|b|)` space.
fn edit_distance(a: &str, b: &str) -> usize {
    if a == b {
        return 0;
    }
    let b_chars: Vec<char> = b.chars().collect();
    let mut prev: Vec<usize> = (0..=b_chars.len()).collect();
    let mut curr = vec![0usize; b_chars.len() + 1];

    for (i, ca) in a.chars().enumerate() {
        curr[0] = i + 1;
        for (j, &cb) in b_chars.iter().enumerate() {
            let substitution = prev[j] + usize::from(ca != cb);
            curr[j + 1] = substitution.min(prev[j + 1] + 1).min(curr[j] + 1);
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[b_chars.len()]
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("", "", 0)]
    #[case("abc", "", 3)]
    #[case("", "abc", 3)]
    #[case("kitten", "sitting", 3)]
    #[case("flaw", "lawn", 2)]
    #[case("gumbo", "gambol", 2)]
    #[case("naïve", "naive", 1)]
    fn test_edit_distance(#[case] a: &str, #[case] b: &str, #[case] expected: usize) {
        assert_eq!(edit_distance(a, b), expected);
        assert_eq!(edit_distance(b, a), expected);
    }

    #[test]
    fn test_levenshtein_on_strings() {
        let a = String::from("sensor-01");
        let b = String::from("sensor-10");
        assert_eq!(Levenshtein.dissimilarity(&a, &b).unwrap(), 2.0);
    }
}
