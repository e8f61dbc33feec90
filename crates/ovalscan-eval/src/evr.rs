//! RPM package version decomposition and ordering
//!
//! Splits `epoch:version-release` strings and orders version strings with the
//! same rules `rpm` uses (`rpmvercmp`), including the `~` pre-release and `^`
//! post-release markers.

use ovalscan_core::{Error, Result};
use std::cmp::Ordering;

/// Epoch assumed when a version string carries none
pub const DEFAULT_EPOCH: u64 = 0;

/// The raw, unparsed segments of an `epoch:version-release` string
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EvrParts<'a> {
    /// Text before the first `:`, if there was one
    pub epoch: Option<&'a str>,
    /// Text between the epoch separator and the last `-`
    pub version: &'a str,
    /// Text after the last `-`, if there was one
    pub release: Option<&'a str>,
}

impl<'a> EvrParts<'a> {
    /// Split a raw version string. Never fails; the epoch is left unparsed.
    pub fn split(raw: &'a str) -> Self {
        let (epoch, rest) = match raw.split_once(':') {
            Some((epoch, rest)) => (Some(epoch), rest),
            None => (None, raw),
        };

        let (version, release) = match rest.rfind('-') {
            Some(idx) => (&rest[..idx], Some(&rest[idx + 1..])),
            None => (rest, None),
        };

        Self {
            epoch,
            version,
            release,
        }
    }

    /// Numeric epoch, `DEFAULT_EPOCH` when absent or empty
    pub fn epoch_number(&self, raw: &str) -> Result<u64> {
        match self.epoch {
            None | Some("") => Ok(DEFAULT_EPOCH),
            Some(epoch) => epoch.parse().map_err(|_| Error::MalformedVersion {
                version: raw.to_string(),
                reason: format!("epoch '{}' is not a non-negative integer", epoch),
            }),
        }
    }

    /// Release text, empty when absent
    pub fn release_str(&self) -> &'a str {
        self.release.unwrap_or("")
    }
}

/// A decomposed `epoch:version-release` triple
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Evr {
    pub epoch: u64,
    pub version: String,
    pub release: String,
    explicit_epoch: bool,
    explicit_release: bool,
}

impl Evr {
    /// Decompose a raw version string.
    ///
    /// Fails with `MalformedVersion` when an epoch prefix is present but is
    /// not a number.
    pub fn parse(raw: &str) -> Result<Self> {
        let parts = EvrParts::split(raw);
        Ok(Self {
            epoch: parts.epoch_number(raw)?,
            version: parts.version.to_string(),
            release: parts.release_str().to_string(),
            explicit_epoch: parts.epoch.is_some(),
            explicit_release: parts.release.is_some(),
        })
    }

    /// Whether the source string carried an `epoch:` prefix
    pub fn has_epoch(&self) -> bool {
        self.explicit_epoch
    }

    /// Whether the source string carried a `-release` suffix
    pub fn has_release(&self) -> bool {
        self.explicit_release
    }

    /// Full ordering: epoch, then version, then release
    pub fn compare(&self, other: &Evr) -> Ordering {
        compare_evr(self, other, rpmvercmp)
    }
}

impl std::fmt::Display for Evr {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.epoch, self.version)?;
        if self.explicit_release {
            write!(f, "-{}", self.release)?;
        }
        Ok(())
    }
}

/// Compare two triples: epoch numerically, then version and release with `cmp`
pub fn compare_evr<F>(a: &Evr, b: &Evr, cmp: F) -> Ordering
where
    F: Fn(&str, &str) -> Ordering,
{
    a.epoch
        .cmp(&b.epoch)
        .then_with(|| cmp(&a.version, &b.version))
        .then_with(|| cmp(&a.release, &b.release))
}

/// Compare `actual` against a possibly partial `expected` triple.
///
/// Only the components present on the expected side take part: the epoch when
/// it was written explicitly, the version always, the release when a `-`
/// suffix was written.
pub fn compare_evr_partial<F>(actual: &Evr, expected: &Evr, cmp: F) -> Ordering
where
    F: Fn(&str, &str) -> Ordering,
{
    let epoch = if expected.has_epoch() {
        actual.epoch.cmp(&expected.epoch)
    } else {
        Ordering::Equal
    };

    epoch
        .then_with(|| cmp(&actual.version, &expected.version))
        .then_with(|| {
            if expected.has_release() {
                cmp(&actual.release, &expected.release)
            } else {
                Ordering::Equal
            }
        })
}

/// Order two version strings the way `rpm` does.
pub fn rpmvercmp(a: &str, b: &str) -> Ordering {
    if a == b {
        return Ordering::Equal;
    }

    let (a, b) = (a.as_bytes(), b.as_bytes());
    let (mut i, mut j) = (0usize, 0usize);

    while i < a.len() || j < b.len() {
        while i < a.len() && is_separator(a[i]) {
            i += 1;
        }
        while j < b.len() && is_separator(b[j]) {
            j += 1;
        }

        let (ca, cb) = (a.get(i).copied(), b.get(j).copied());

        // `~` sorts before everything, even the end of the string
        if ca == Some(b'~') || cb == Some(b'~') {
            if ca != Some(b'~') {
                return Ordering::Greater;
            }
            if cb != Some(b'~') {
                return Ordering::Less;
            }
            i += 1;
            j += 1;
            continue;
        }

        // `^` sorts after the end of the string but before anything else
        if ca == Some(b'^') || cb == Some(b'^') {
            if ca.is_none() {
                return Ordering::Less;
            }
            if cb.is_none() {
                return Ordering::Greater;
            }
            if ca != Some(b'^') {
                return Ordering::Greater;
            }
            if cb != Some(b'^') {
                return Ordering::Less;
            }
            i += 1;
            j += 1;
            continue;
        }

        let (Some(first), Some(_)) = (ca, cb) else {
            break;
        };

        let numeric = first.is_ascii_digit();
        let class: fn(&u8) -> bool = if numeric {
            u8::is_ascii_digit
        } else {
            u8::is_ascii_alphabetic
        };

        let seg_a = take_run(a, i, class);
        let seg_b = take_run(b, j, class);
        i += seg_a.len();
        j += seg_b.len();

        // Segments of different classes: numeric beats alphabetic
        if seg_b.is_empty() {
            return if numeric {
                Ordering::Greater
            } else {
                Ordering::Less
            };
        }

        let ord = if numeric {
            compare_numeric(seg_a, seg_b)
        } else {
            seg_a.cmp(seg_b)
        };
        if ord != Ordering::Equal {
            return ord;
        }
    }

    match (i >= a.len(), j >= b.len()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Less,
        _ => Ordering::Greater,
    }
}

fn is_separator(c: u8) -> bool {
    !c.is_ascii_alphanumeric() && c != b'~' && c != b'^'
}

fn take_run(bytes: &[u8], start: usize, class: fn(&u8) -> bool) -> &[u8] {
    let end = bytes[start..]
        .iter()
        .position(|c| !class(c))
        .map_or(bytes.len(), |p| start + p);
    &bytes[start..end]
}

fn compare_numeric(a: &[u8], b: &[u8]) -> Ordering {
    let a = strip_leading_zeros(a);
    let b = strip_leading_zeros(b);
    a.len().cmp(&b.len()).then_with(|| a.cmp(b))
}

fn strip_leading_zeros(digits: &[u8]) -> &[u8] {
    let start = digits.iter().position(|&c| c != b'0').unwrap_or(digits.len());
    &digits[start..]
}

#[cfg(test)]
mod tests {
    use super::*;
    use Ordering::{Equal, Greater, Less};

    #[test]
    fn test_decompose_full() {
        let evr = Evr::parse("2:1.5-3").unwrap();
        assert_eq!(evr.epoch, 2);
        assert_eq!(evr.version, "1.5");
        assert_eq!(evr.release, "3");
        assert!(evr.has_epoch());
        assert!(evr.has_release());
    }

    #[test]
    fn test_decompose_version_only() {
        let evr = Evr::parse("1.5").unwrap();
        assert_eq!(evr.epoch, DEFAULT_EPOCH);
        assert_eq!(evr.version, "1.5");
        assert_eq!(evr.release, "");
        assert!(!evr.has_epoch());
        assert!(!evr.has_release());
    }

    #[test]
    fn test_decompose_uses_last_dash() {
        let parts = EvrParts::split("1:2.0-beta-4.el8");
        assert_eq!(parts.epoch, Some("1"));
        assert_eq!(parts.version, "2.0-beta");
        assert_eq!(parts.release, Some("4.el8"));
    }

    #[test]
    fn test_decompose_empty_epoch_defaults() {
        let evr = Evr::parse(":1.0-1").unwrap();
        assert_eq!(evr.epoch, 0);
        assert!(evr.has_epoch());
    }

    #[test]
    fn test_decompose_bad_epoch() {
        let err = Evr::parse("x:1.0-1").unwrap_err();
        assert_eq!(err.code(), "MALFORMED_VERSION");

        // Splitting alone never fails
        let parts = EvrParts::split("x:1.0-1");
        assert_eq!(parts.version, "1.0");
        assert!(parts.epoch_number("x:1.0-1").is_err());
    }

    #[test]
    fn test_decompose_empty_string() {
        let evr = Evr::parse("").unwrap();
        assert_eq!(evr, Evr::default());
    }

    #[test]
    fn test_rpmvercmp_basic() {
        assert_eq!(rpmvercmp("1.0", "1.0"), Equal);
        assert_eq!(rpmvercmp("1.0", "2.0"), Less);
        assert_eq!(rpmvercmp("2.0", "1.0"), Greater);
        assert_eq!(rpmvercmp("2.0", "2.0.1"), Less);
        assert_eq!(rpmvercmp("2.0.1a", "2.0.1"), Greater);
        assert_eq!(rpmvercmp("5.5p1", "5.5p2"), Less);
        assert_eq!(rpmvercmp("5.5p10", "5.5p1"), Greater);
        assert_eq!(rpmvercmp("1.0a", "1.0aa"), Less);
    }

    #[test]
    fn test_rpmvercmp_leading_zeros() {
        assert_eq!(rpmvercmp("1.010", "1.9"), Greater);
        assert_eq!(rpmvercmp("001", "1"), Equal);
        assert_eq!(rpmvercmp("1.0^git1", "1.01"), Less);
    }

    #[test]
    fn test_rpmvercmp_mixed_segments() {
        assert_eq!(rpmvercmp("10xyz", "10.1xyz"), Less);
        assert_eq!(rpmvercmp("xyz10", "xyz10.1"), Less);
        assert_eq!(rpmvercmp("xyz.4", "8"), Less);
        assert_eq!(rpmvercmp("8", "xyz.4"), Greater);
    }

    #[test]
    fn test_rpmvercmp_separators() {
        assert_eq!(rpmvercmp("2.0", "2_0"), Equal);
        assert_eq!(rpmvercmp("1.0", "1.0."), Equal);
    }

    #[test]
    fn test_rpmvercmp_tilde() {
        assert_eq!(rpmvercmp("1.0~rc1", "1.0"), Less);
        assert_eq!(rpmvercmp("1.0~~", "1.0~"), Less);
        assert_eq!(rpmvercmp("1.0~rc1", "1.0~rc2"), Less);
        assert_eq!(rpmvercmp("1.0~rc1~git123", "1.0~rc1"), Less);
        assert_eq!(rpmvercmp("~", ""), Less);
        assert_eq!(rpmvercmp("~~", "~~"), Equal);
    }

    #[test]
    fn test_rpmvercmp_caret() {
        assert_eq!(rpmvercmp("1.0^", "1.0"), Greater);
        assert_eq!(rpmvercmp("1.0^git1", "1.0"), Greater);
        assert_eq!(rpmvercmp("1.0^20160101", "1.0.1"), Less);
        assert_eq!(rpmvercmp("1.0~rc1^git1", "1.0~rc1"), Greater);
        assert_eq!(rpmvercmp("1.0^git1~pre", "1.0^git1"), Less);
    }

    #[test]
    fn test_rpmvercmp_degenerate_inputs() {
        assert_eq!(rpmvercmp("", ""), Equal);
        assert_eq!(rpmvercmp("", "1"), Less);
        assert_eq!(rpmvercmp("123", "45"), Greater);
        assert_eq!(rpmvercmp("+", ""), Equal);
        assert_eq!(rpmvercmp("é", "e"), Less);
    }

    #[test]
    fn test_rpmvercmp_total_order_on_chain() {
        let chain = [
            "1.0~rc1", "1.0", "1.0^git1", "1.0.1", "1.1", "1.1a", "1.10", "2",
        ];

        for (i, a) in chain.iter().enumerate() {
            assert_eq!(rpmvercmp(a, a), Equal, "{} should equal itself", a);
            for b in &chain[i + 1..] {
                assert_eq!(rpmvercmp(a, b), Less, "{} < {}", a, b);
                assert_eq!(rpmvercmp(b, a), Greater, "{} > {}", b, a);
            }
        }
    }

    #[test]
    fn test_evr_ordering_epoch_first() {
        let a = Evr::parse("1:1.1.0-2").unwrap();
        let b = Evr::parse("0:1.1.1-1").unwrap();
        assert_eq!(a.compare(&b), Greater);
        assert_eq!(b.compare(&a), Less);
    }

    #[test]
    fn test_evr_partial_skips_missing_components() {
        let actual = Evr::parse("3:2.4.6-97.el8").unwrap();

        let no_epoch = Evr::parse("2.4.6").unwrap();
        assert_eq!(compare_evr_partial(&actual, &no_epoch, rpmvercmp), Equal);

        let with_release = Evr::parse("2.4.6-98.el8").unwrap();
        assert_eq!(compare_evr_partial(&actual, &with_release, rpmvercmp), Less);

        let with_epoch = Evr::parse("0:2.4.6-98.el8").unwrap();
        assert_eq!(compare_evr_partial(&actual, &with_epoch, rpmvercmp), Greater);
    }

    #[test]
    fn test_evr_display() {
        assert_eq!(Evr::parse("1.5").unwrap().to_string(), "0:1.5");
        assert_eq!(Evr::parse("2:1.5-3").unwrap().to_string(), "2:1.5-3");
    }
}
