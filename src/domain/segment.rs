//! Tokenization of normalized version strings.
//!
//! A version such as `1.7.5.rc0` or `1.0.0a` is split on dots, and each dot-segment is further
//! split where digits and letters meet. An `rc` word followed by digits becomes a single
//! pre-release token.

use std::cmp::Ordering;

/// One comparable piece of a version
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Segment {
    /// Release candidate marker (`rc3` -> `PreRelease(3)`)
    PreRelease(u64),
    /// Alphabetic run, e.g. the `a` in `1.0.0a`
    Word(String),
    /// Numeric run
    Number(u64),
}

impl Segment {
    /// Rank used when two positions hold different kinds of segment.
    ///
    /// The end of a version sits between pre-release markers and everything else, so
    /// `1.7.5.rc0 < 1.7.5 < 1.7.5a < 1.7.5.1`.
    fn rank(segment: Option<&Segment>) -> u8 {
        match segment {
            Some(Segment::PreRelease(_)) => 0,
            None => 1,
            Some(Segment::Word(_)) => 2,
            Some(Segment::Number(_)) => 3,
        }
    }

    pub fn is_prerelease(&self) -> bool {
        matches!(self, Segment::PreRelease(_))
    }
}

/// Split a normalized version string into segments
pub fn tokenize(version: &str) -> Vec<Segment> {
    let mut segments = Vec::new();

    for part in version.split('.').filter(|p| !p.is_empty()) {
        let mut rest = part;
        while !rest.is_empty() {
            let digits = rest.find(|c: char| !c.is_ascii_digit()).unwrap_or(rest.len());
            if digits > 0 {
                segments.push(Segment::Number(parse_number(&rest[..digits])));
                rest = &rest[digits..];
                continue;
            }

            let word_len = rest.find(|c: char| c.is_ascii_digit()).unwrap_or(rest.len());
            let word = &rest[..word_len];
            rest = &rest[word_len..];

            if word.eq_ignore_ascii_case("rc") {
                let digits = rest.find(|c: char| !c.is_ascii_digit()).unwrap_or(rest.len());
                segments.push(Segment::PreRelease(parse_number(&rest[..digits])));
                rest = &rest[digits..];
            } else {
                segments.push(Segment::Word(word.to_string()));
            }
        }
    }

    segments
}

// Digit runs that overflow u64 saturate; no real release gets near that.
fn parse_number(digits: &str) -> u64 {
    digits.parse::<u64>().unwrap_or(if digits.is_empty() { 0 } else { u64::MAX })
}

/// Three-way comparison of two segment sequences
pub fn compare_segments(left: &[Segment], right: &[Segment]) -> Ordering {
    let len = left.len().max(right.len());

    for i in 0..len {
        let ordering = match (left.get(i), right.get(i)) {
            (Some(Segment::Number(a)), Some(Segment::Number(b))) => a.cmp(b),
            (Some(Segment::PreRelease(a)), Some(Segment::PreRelease(b))) => a.cmp(b),
            (Some(Segment::Word(a)), Some(Segment::Word(b))) => a.cmp(b),
            (a, b) => Segment::rank(a).cmp(&Segment::rank(b)),
        };

        if ordering != Ordering::Equal {
            return ordering;
        }
    }

    Ordering::Equal
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokenize_plain_release() {
        assert_eq!(
            tokenize("1.7.5"),
            vec![Segment::Number(1), Segment::Number(7), Segment::Number(5)]
        );
    }

    #[test]
    fn test_tokenize_release_candidate() {
        assert_eq!(
            tokenize("1.7.5.rc0"),
            vec![
                Segment::Number(1),
                Segment::Number(7),
                Segment::Number(5),
                Segment::PreRelease(0)
            ]
        );
    }

    #[test]
    fn test_tokenize_attached_suffixes() {
        assert_eq!(
            tokenize("1.0.0a"),
            vec![
                Segment::Number(1),
                Segment::Number(0),
                Segment::Number(0),
                Segment::Word("a".to_string())
            ]
        );
        assert_eq!(
            tokenize("1.0rc1"),
            vec![Segment::Number(1), Segment::Number(0), Segment::PreRelease(1)]
        );
    }

    #[test]
    fn test_tokenize_bare_rc_counts_as_zero() {
        assert_eq!(
            tokenize("2.0.rc"),
            vec![Segment::Number(2), Segment::Number(0), Segment::PreRelease(0)]
        );
    }

    #[test]
    fn test_tokenize_empty() {
        assert!(tokenize("").is_empty());
    }

    #[test]
    fn test_compare_numeric_not_lexical() {
        assert_eq!(
            compare_segments(&tokenize("1.10.0"), &tokenize("1.9.0")),
            Ordering::Greater
        );
    }

    #[test]
    fn test_compare_leading_zeros_equal() {
        assert_eq!(
            compare_segments(&tokenize("1.07"), &tokenize("1.7")),
            Ordering::Equal
        );
    }
}
