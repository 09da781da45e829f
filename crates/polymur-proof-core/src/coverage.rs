//! Byte coverage of the hash's window loads.
//!
//! For every length in a range, the union of the windows the hash reads must
//! equal `[0, length)` exactly: no byte skipped, no byte read past the end.
//! Each length is checked on its own; the ranges are small enough that there
//! is no reason to sample.

use std::collections::BTreeSet;
use std::fmt;
use std::ops::{Range, RangeInclusive};
use std::str::FromStr;

use serde::Serialize;
use tracing::{debug, info, instrument};

use crate::length_class::LengthClass;
use crate::params::{
    CHUNK_LEN, LARGE_MIN_LEN, LONG_MAX_LEN, MEDIUM_MAX_LEN, SHORT_MAX_LEN, WINDOWS_PER_CHUNK,
    WINDOW_LEN,
};
use crate::{ProofError, Result};

/// How a single load maps its offset to byte positions.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WindowScheme {
    /// 8-byte load masked to its low 7 bytes: `[offset, offset + 7)`.
    Mask,
    /// 8-byte load shifted right by one byte: `[offset + 1, offset + 8)`.
    Shift,
    /// Single byte: `[offset, offset + 1)`.
    Byte,
    /// 4-byte load: `[offset, offset + 4)`.
    U32,
}

impl WindowScheme {
    pub fn tag(self) -> &'static str {
        match self {
            WindowScheme::Mask => "mask",
            WindowScheme::Shift => "shift",
            WindowScheme::Byte => "byte",
            WindowScheme::U32 => "u32",
        }
    }
}

impl FromStr for WindowScheme {
    type Err = ProofError;

    fn from_str(tag: &str) -> Result<Self> {
        match tag {
            "mask" => Ok(WindowScheme::Mask),
            "shift" => Ok(WindowScheme::Shift),
            "byte" => Ok(WindowScheme::Byte),
            "u32" => Ok(WindowScheme::U32),
            other => Err(ProofError::UnrecognizedScheme(other.to_string())),
        }
    }
}

impl fmt::Display for WindowScheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// Byte positions read by a load of `scheme` at `offset`.
pub fn window_indices(offset: usize, scheme: WindowScheme) -> Range<usize> {
    match scheme {
        WindowScheme::Mask => offset..offset + WINDOW_LEN,
        WindowScheme::Shift => offset + 1..offset + WINDOW_LEN + 1,
        WindowScheme::Byte => offset..offset + 1,
        WindowScheme::U32 => offset..offset + 4,
    }
}

/// [`window_indices`] for a textual scheme tag.
pub fn window_indices_by_tag(offset: usize, tag: &str) -> Result<Range<usize>> {
    Ok(window_indices(offset, tag.parse()?))
}

/// One load: a scheme at an offset.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct Window {
    pub scheme: WindowScheme,
    pub offset: usize,
}

impl Window {
    pub const fn mask(offset: usize) -> Self {
        Self { scheme: WindowScheme::Mask, offset }
    }

    pub const fn shift(offset: usize) -> Self {
        Self { scheme: WindowScheme::Shift, offset }
    }

    pub const fn byte(offset: usize) -> Self {
        Self { scheme: WindowScheme::Byte, offset }
    }

    pub const fn u32(offset: usize) -> Self {
        Self { scheme: WindowScheme::U32, offset }
    }

    pub fn indices(self) -> Range<usize> {
        window_indices(self.offset, self.scheme)
    }

    fn shifted(self, base: usize) -> Self {
        Self { offset: self.offset + base, ..self }
    }
}

impl fmt::Display for Window {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.scheme, self.offset)
    }
}

/// Union of the positions read by `windows`.
pub fn covered_indices(windows: &[Window]) -> BTreeSet<usize> {
    windows.iter().flat_map(|w| w.indices()).collect()
}

/// Check that `windows` read exactly `[0, length)` and return the union.
pub fn coverage(length: usize, windows: &[Window]) -> Result<BTreeSet<usize>> {
    let covered = covered_indices(windows);
    let missing: Vec<usize> = (0..length).filter(|i| !covered.contains(i)).collect();
    let out_of_range: Vec<usize> = covered.range(length..).copied().collect();
    if missing.is_empty() && out_of_range.is_empty() {
        Ok(covered)
    } else {
        Err(ProofError::CoverageGap {
            length,
            missing,
            out_of_range,
        })
    }
}

/// The loads the hash performs for an input of `length` bytes.
pub fn layout(length: usize) -> Vec<Window> {
    match LengthClass::of(length) {
        None => Vec::new(),
        Some(LengthClass::Short) => short_windows(length),
        Some(LengthClass::Medium) => medium_windows(length),
        Some(LengthClass::Long) => long_windows(length),
        Some(LengthClass::Large) => large_windows(length),
    }
}

// 1..=7: three single bytes below 4, else two overlapping 4-byte loads.
fn short_windows(length: usize) -> Vec<Window> {
    if length < 4 {
        vec![Window::byte(0), Window::byte(length / 2), Window::byte(length - 1)]
    } else {
        vec![Window::u32(0), Window::u32(length - 4)]
    }
}

// 8..=21
fn medium_windows(length: usize) -> Vec<Window> {
    vec![
        Window::mask(0),
        Window::mask((length - 7) / 2),
        Window::shift(length - 8),
    ]
}

// 22..=49
fn long_windows(length: usize) -> Vec<Window> {
    let mut windows = medium_windows(length);
    windows.extend([
        Window::mask(7),
        Window::mask(14),
        Window::mask(length - 21),
        Window::mask(length - 14),
    ]);
    windows
}

// 50+: whole chunks while at least LARGE_MIN_LEN bytes remain, then the tail
// (always 1..=49 bytes) through its own class's loads.
fn large_windows(length: usize) -> Vec<Window> {
    let chunk = CHUNK_LEN as usize;
    let mut windows = Vec::new();
    let mut base = 0;
    let mut remaining = length;
    while remaining >= LARGE_MIN_LEN {
        windows.extend((0..WINDOWS_PER_CHUNK).map(|i| Window::mask(base + i * WINDOW_LEN)));
        base += chunk;
        remaining -= chunk;
    }
    windows.extend(layout(remaining).into_iter().map(|w| w.shifted(base)));
    windows
}

/// Result of proving coverage over one range of lengths.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct RangeCoverage {
    pub name: String,
    pub first: usize,
    pub last: usize,
    pub lengths_proven: usize,
    pub max_windows: usize,
}

/// Prove coverage of [`layout`] for every length in `lengths`.
#[instrument(skip(lengths), fields(first = *lengths.start(), last = *lengths.end()))]
pub fn prove_range(name: &str, lengths: RangeInclusive<usize>) -> Result<RangeCoverage> {
    let first = *lengths.start();
    let last = *lengths.end();
    let mut lengths_proven = 0;
    let mut max_windows = 0;
    for length in lengths {
        let windows = layout(length);
        coverage(length, &windows)?;
        lengths_proven += 1;
        max_windows = max_windows.max(windows.len());
    }
    debug!(lengths_proven, max_windows, "range covered");
    Ok(RangeCoverage {
        name: name.to_string(),
        first,
        last,
        lengths_proven,
        max_windows,
    })
}

/// Prove coverage for every modeled range, with large inputs checked up to
/// `large_max_length`.
pub fn prove_coverage(large_max_length: usize) -> Result<Vec<RangeCoverage>> {
    let ranges = [
        ("1-7", 1..=SHORT_MAX_LEN),
        ("8-21", SHORT_MAX_LEN + 1..=MEDIUM_MAX_LEN),
        ("22-49", MEDIUM_MAX_LEN + 1..=LONG_MAX_LEN),
        ("50+", LARGE_MIN_LEN..=large_max_length),
    ];
    let mut proven = Vec::with_capacity(ranges.len());
    for (name, lengths) in ranges {
        proven.push(prove_range(name, lengths)?);
    }
    info!(ranges = proven.len(), "coverage proof complete");
    Ok(proven)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full(length: usize) -> BTreeSet<usize> {
        (0..length).collect()
    }

    #[test]
    fn scheme_ranges() {
        assert_eq!(window_indices(0, WindowScheme::Mask), 0..7);
        assert_eq!(window_indices(3, WindowScheme::Shift), 4..11);
        assert_eq!(window_indices(5, WindowScheme::Byte), 5..6);
        assert_eq!(window_indices(2, WindowScheme::U32), 2..6);
        assert_eq!(window_indices(9, WindowScheme::Mask).len(), WINDOW_LEN);
        assert_eq!(window_indices(9, WindowScheme::Shift).len(), WINDOW_LEN);
    }

    #[test]
    fn unknown_scheme_is_rejected() {
        let err = window_indices_by_tag(0, "bogus").unwrap_err();
        assert!(matches!(err, ProofError::UnrecognizedScheme(ref tag) if tag == "bogus"));
        assert_eq!(window_indices_by_tag(0, "mask").unwrap(), 0..7);
    }

    #[test]
    fn scheme_tags_round_trip() {
        for scheme in [WindowScheme::Mask, WindowScheme::Shift, WindowScheme::Byte, WindowScheme::U32] {
            assert_eq!(scheme.tag().parse::<WindowScheme>().unwrap(), scheme);
        }
    }

    #[test]
    fn boundary_lengths() {
        assert_eq!(coverage(8, &layout(8)).unwrap(), full(8));
        assert_eq!(coverage(21, &layout(21)).unwrap(), full(21));
        assert_eq!(coverage(22, &layout(22)).unwrap(), full(22));
        assert_eq!(coverage(49, &layout(49)).unwrap(), full(49));
        assert_eq!(coverage(50, &layout(50)).unwrap(), full(50));
    }

    #[test]
    fn every_window_is_needed() {
        for lengths in [8..=21usize, 22..=49] {
            let count = layout(*lengths.start()).len();
            for dropped in 0..count {
                let breaks = lengths.clone().any(|length| {
                    let mut windows = layout(length);
                    windows.remove(dropped);
                    coverage(length, &windows).is_err()
                });
                assert!(breaks, "window {dropped} is redundant over {lengths:?}");
            }
        }
    }

    #[test]
    fn gap_reports_missing_and_overrun() {
        let err = coverage(10, &[Window::mask(0), Window::shift(4)]).unwrap_err();
        match err {
            ProofError::CoverageGap {
                length,
                missing,
                out_of_range,
            } => {
                assert_eq!(length, 10);
                assert!(missing.is_empty());
                assert_eq!(out_of_range, vec![10, 11]);
            }
            other => panic!("unexpected error: {other}"),
        }

        let err = coverage(9, &[Window::mask(0)]).unwrap_err();
        assert!(matches!(err, ProofError::CoverageGap { ref missing, .. } if *missing == vec![7, 8]));
    }

    #[test]
    fn large_layout_chunks_then_tail() {
        // 99 bytes: one chunk leaves 50, a second leaves a 1-byte tail.
        let windows = layout(99);
        assert_eq!(windows.len(), 2 * WINDOWS_PER_CHUNK + 3);
        assert_eq!(windows[WINDOWS_PER_CHUNK], Window::mask(49));
        assert!(windows[2 * WINDOWS_PER_CHUNK..].iter().all(|w| *w == Window::byte(98)));
    }

    #[test]
    fn empty_input_reads_nothing() {
        assert!(layout(0).is_empty());
        assert!(coverage(0, &layout(0)).unwrap().is_empty());
    }

    #[test]
    fn all_ranges_prove() {
        let ranges = prove_coverage(LARGE_MIN_LEN + 4 * CHUNK_LEN as usize).unwrap();
        let proven: Vec<_> = ranges.iter().map(|r| r.lengths_proven).collect();
        assert_eq!(proven, vec![7, 14, 28, 197]);
        assert_eq!(ranges[1].max_windows, 3);
        assert_eq!(ranges[2].max_windows, 7);
    }

    #[test]
    fn window_display() {
        assert_eq!(Window::shift(13).to_string(), "shift@13");
    }
}
