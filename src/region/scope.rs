//! Region values
//!
//! [`Scope`] is the self-contained record emitted by the scanner and used
//! as the tree's node key. [`Region`] borrows the sequence it indexes and
//! answers questions that need the surrounding values (neighbors, whether
//! the interval is a peak or a valley).

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::ops::Range;

use crate::PeakError;

/// Peak or valley region: half-open interval plus extremum and cutoff.
///
/// Equality and hashing use `(start, stop, argext, argcut)`. Two scopes
/// over the same interval with different orientation (one peak, one
/// valley) stay distinct keys unless both positions coincide.
///
/// `PartialOrd` is the nesting order: `a < b` iff `a`'s interval is
/// strictly inside `b`'s. Disjoint or overlapping scopes are unordered.
#[derive(Debug, Clone, Copy)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Scope {
    /// First index (inclusive)
    pub start: usize,

    /// End index (exclusive)
    pub stop: usize,

    /// Position of the (first) extremum
    pub argext: usize,

    /// Position of the (first) cutoff
    pub argcut: usize,

    /// Maximum of a peak region, minimum of a valley region
    pub extremum: f64,

    /// Minimum of a peak region, maximum of a valley region
    pub cutoff: f64,
}

impl Scope {
    /// Create a scope from its six fields
    pub fn new(
        start: usize,
        stop: usize,
        argext: usize,
        argcut: usize,
        extremum: f64,
        cutoff: f64,
    ) -> Self {
        Self {
            start,
            stop,
            argext,
            argcut,
            extremum,
            cutoff,
        }
    }

    /// Index of the last item
    #[inline]
    pub fn istop(&self) -> usize {
        self.stop - 1
    }

    /// Number of items covered
    #[inline]
    pub fn len(&self) -> usize {
        self.stop - self.start
    }

    /// Whether the interval is empty (never true for scanner output)
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.stop <= self.start
    }

    /// Covered indices
    pub fn interval(&self) -> Range<usize> {
        self.start..self.stop
    }

    /// Whether `index` lies inside the interval
    #[inline]
    pub fn contains(&self, index: usize) -> bool {
        self.start <= index && index < self.stop
    }

    /// Largest value in the region
    pub fn max(&self) -> f64 {
        self.extremum.max(self.cutoff)
    }

    /// Smallest value in the region
    pub fn min(&self) -> f64 {
        self.extremum.min(self.cutoff)
    }

    /// Position of the largest value
    pub fn argmax(&self) -> usize {
        if self.cutoff > self.extremum {
            self.argcut
        } else {
            self.argext
        }
    }

    /// Position of the smallest value
    pub fn argmin(&self) -> usize {
        if self.cutoff < self.extremum {
            self.argcut
        } else {
            self.argext
        }
    }

    /// Vertical extent `|extremum - cutoff|`
    #[inline]
    pub fn size(&self) -> f64 {
        (self.extremum - self.cutoff).abs()
    }

    /// Interval is contained in (or equal to) `other`'s
    pub fn is_subset(&self, other: &Scope) -> bool {
        other.start <= self.start && self.stop <= other.stop
    }

    /// Interval is strictly contained in `other`'s
    pub fn is_strict_subset(&self, other: &Scope) -> bool {
        self.is_subset(other) && (self.start, self.stop) != (other.start, other.stop)
    }

    /// Same scope with every position shifted right by `offset`
    pub fn offset_by(&self, offset: usize) -> Self {
        Self {
            start: self.start + offset,
            stop: self.stop + offset,
            argext: self.argext + offset,
            argcut: self.argcut + offset,
            ..*self
        }
    }

    /// Project this scope onto the sequence it was found in
    pub fn region<'a>(&self, values: &'a [f64]) -> Result<Region<'a>, PeakError> {
        Region::new(self.start, self.stop, values)
    }

    fn key(&self) -> (usize, usize, usize, usize) {
        (self.start, self.stop, self.argext, self.argcut)
    }
}

impl PartialEq for Scope {
    fn eq(&self, other: &Self) -> bool {
        self.key() == other.key()
    }
}

impl Eq for Scope {}

impl Hash for Scope {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key().hash(state);
    }
}

impl PartialOrd for Scope {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        if self == other {
            Some(Ordering::Equal)
        } else if self.is_strict_subset(other) {
            Some(Ordering::Less)
        } else if other.is_strict_subset(self) {
            Some(Ordering::Greater)
        } else {
            None
        }
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.start, self.stop)
    }
}

/// Half-open interval over a borrowed sequence of values
#[derive(Debug, Clone, Copy)]
pub struct Region<'a> {
    start: usize,
    stop: usize,
    values: &'a [f64],
}

impl<'a> Region<'a> {
    /// Create region `start:stop` over `values`
    pub fn new(start: usize, stop: usize, values: &'a [f64]) -> Result<Self, PeakError> {
        if start >= stop || stop > values.len() {
            return Err(PeakError::InvalidInput(format!(
                "region {}:{} does not fit a sequence of length {}",
                start,
                stop,
                values.len()
            )));
        }
        Ok(Self {
            start,
            stop,
            values,
        })
    }

    /// First index (inclusive)
    pub fn start(&self) -> usize {
        self.start
    }

    /// End index (exclusive)
    pub fn stop(&self) -> usize {
        self.stop
    }

    /// Index of the last item
    pub fn istop(&self) -> usize {
        self.stop - 1
    }

    /// Number of items covered
    pub fn len(&self) -> usize {
        self.stop - self.start
    }

    /// Always false; construction rejects empty intervals
    pub fn is_empty(&self) -> bool {
        false
    }

    /// The whole underlying sequence
    pub fn values(&self) -> &'a [f64] {
        self.values
    }

    /// Whether `index` lies inside the region
    pub fn contains(&self, index: usize) -> bool {
        self.start <= index && index < self.stop
    }

    /// Covered indices
    pub fn indices(&self) -> Range<usize> {
        self.start..self.stop
    }

    /// Values inside the region
    pub fn subarray(&self) -> &'a [f64] {
        &self.values[self.start..self.stop]
    }

    /// Same interval cut out of another array (e.g. x-coordinates)
    pub fn subarray_of<'b, T>(&self, other: &'b [T]) -> Option<&'b [T]> {
        other.get(self.start..self.stop)
    }

    /// Largest value inside the region
    pub fn max(&self) -> f64 {
        self.subarray()
            .iter()
            .copied()
            .fold(f64::NEG_INFINITY, f64::max)
    }

    /// Smallest value inside the region
    pub fn min(&self) -> f64 {
        self.subarray().iter().copied().fold(f64::INFINITY, f64::min)
    }

    /// Index of the first maximum
    pub fn argmax(&self) -> usize {
        let max = self.max();
        self.indices()
            .find(|&i| self.values[i] == max)
            .unwrap_or(self.start)
    }

    /// Index of the first minimum
    pub fn argmin(&self) -> usize {
        let min = self.min();
        self.indices()
            .find(|&i| self.values[i] == min)
            .unwrap_or(self.start)
    }

    /// Distance between maximum and minimum
    pub fn size(&self) -> f64 {
        self.max() - self.min()
    }

    /// Index of the left neighbor, if any
    pub fn pre(&self) -> Option<usize> {
        self.start.checked_sub(1)
    }

    /// Index of the right neighbor, if any
    pub fn post(&self) -> Option<usize> {
        (self.stop < self.values.len()).then_some(self.stop)
    }

    /// Both neighbors (where present) lie strictly below the region
    pub fn is_peak(&self) -> bool {
        let min = self.min();
        self.neighbors().all(|v| v < min)
    }

    /// Both neighbors (where present) lie strictly above the region
    pub fn is_valley(&self) -> bool {
        let max = self.max();
        self.neighbors().all(|v| v > max)
    }

    /// Flat peak region
    pub fn is_local_maximum(&self) -> bool {
        self.size() == 0.0 && self.is_peak()
    }

    /// Flat valley region
    pub fn is_local_minimum(&self) -> bool {
        self.size() == 0.0 && self.is_valley()
    }

    /// Whether both regions index the same sequence object
    pub fn same_sequence(&self, other: &Region<'_>) -> bool {
        std::ptr::eq(self.values.as_ptr(), other.values.as_ptr())
            && self.values.len() == other.values.len()
    }

    /// Nesting comparison; `Less` means strictly inside `other`.
    ///
    /// Fails with [`PeakError::MismatchedSequence`] when the regions
    /// index different sequences.
    pub fn try_nesting(&self, other: &Region<'_>) -> Result<Option<Ordering>, PeakError> {
        if !self.same_sequence(other) {
            return Err(PeakError::MismatchedSequence);
        }
        let inside = other.start <= self.start && self.stop <= other.stop;
        let outside = self.start <= other.start && other.stop <= self.stop;
        Ok(match (inside, outside) {
            (true, true) => Some(Ordering::Equal),
            (true, false) => Some(Ordering::Less),
            (false, true) => Some(Ordering::Greater),
            (false, false) => None,
        })
    }

    fn neighbors(&self) -> impl Iterator<Item = f64> + '_ {
        self.pre()
            .into_iter()
            .chain(self.post())
            .map(move |i| self.values[i])
    }
}

impl PartialEq for Region<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.same_sequence(other) && self.start == other.start && self.stop == other.stop
    }
}

impl fmt::Display for Region<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.start, self.stop)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    static DATA: [f64; 10] = [10.0, 30.0, 40.0, 30.0, 10.0, 50.0, 70.0, 70.0, 50.0, 80.0];

    #[test]
    fn test_scope_identity_ignores_values() {
        let a = Scope::new(1, 4, 2, 1, 40.0, 30.0);
        let b = Scope::new(1, 4, 2, 1, -1.0, -1.0);
        let valley = Scope::new(1, 4, 1, 2, 30.0, 40.0);
        assert_eq!(a, b);
        assert_ne!(a, valley);
        assert_eq!(a.partial_cmp(&valley), None);
    }

    #[test]
    fn test_flat_peak_and_valley_share_a_key() {
        let flat = [5.0, 5.0, 5.0];
        let peaks: Vec<Scope> = crate::region::find_peaks(flat).unwrap().collect();
        let valleys: Vec<Scope> = crate::region::find_valleys(flat).unwrap().collect();
        assert_eq!(peaks.len(), 1);
        assert_eq!((peaks[0].argext, peaks[0].argcut), (0, 0));
        assert_eq!(peaks, valleys);

        let keys: std::collections::HashSet<Scope> =
            peaks.iter().chain(&valleys).copied().collect();
        assert_eq!(keys.len(), 1);
    }

    #[test]
    fn test_scope_nesting_order() {
        let outer = Scope::new(0, 10, 9, 0, 80.0, 10.0);
        let inner = Scope::new(1, 4, 2, 1, 40.0, 30.0);
        let apart = Scope::new(5, 10, 9, 5, 80.0, 50.0);
        assert!(inner < outer);
        assert!(outer > inner);
        assert_eq!(inner.partial_cmp(&apart), None);
        assert!(inner <= inner);
    }

    #[test]
    fn test_scope_derived_values() {
        let peak = Scope::new(1, 4, 2, 1, 40.0, 30.0);
        assert_eq!(peak.istop(), 3);
        assert_eq!(peak.len(), 3);
        assert_eq!(peak.max(), 40.0);
        assert_eq!(peak.argmax(), 2);
        assert_eq!(peak.argmin(), 1);
        assert_eq!(peak.size(), 10.0);
        assert_eq!(peak.to_string(), "1:4");
        assert_eq!(peak.offset_by(5).to_string(), "6:9");
        assert_eq!(peak.offset_by(5).argext, 7);
    }

    #[test]
    fn test_region_queries() {
        let region = Region::new(1, 4, &DATA).unwrap();
        assert_eq!(region.subarray(), &[30.0, 40.0, 30.0]);
        assert_eq!(region.pre(), Some(0));
        assert_eq!(region.post(), Some(4));
        assert_eq!(region.argmax(), 2);
        assert_eq!(region.argmin(), 1);
        assert!(region.is_peak());
        assert!(!region.is_valley());
        assert!(!region.is_local_maximum());

        let top = Region::new(9, 10, &DATA).unwrap();
        assert_eq!(top.post(), None);
        assert!(top.is_local_maximum());

        let plateau = Region::new(6, 8, &DATA).unwrap();
        assert!(plateau.is_local_maximum());
        assert_eq!(plateau.subarray_of(&["a", "b", "c", "d", "e", "f", "g", "h", "i", "j"]), Some(&["g", "h"][..]));
    }

    #[test]
    fn test_region_rejects_bad_bounds() {
        assert!(matches!(
            Region::new(3, 11, &DATA),
            Err(PeakError::InvalidInput(_))
        ));
        assert!(Region::new(4, 4, &DATA).is_err());
    }

    #[test]
    fn test_mismatched_sequence() {
        let other = DATA.to_vec();
        let a = Region::new(1, 4, &DATA).unwrap();
        let b = Region::new(0, 10, &other).unwrap();
        assert!(matches!(
            a.try_nesting(&b),
            Err(PeakError::MismatchedSequence)
        ));
        let c = Region::new(0, 10, &DATA).unwrap();
        assert_eq!(a.try_nesting(&c).unwrap(), Some(Ordering::Less));
        assert_ne!(b, c);
    }
}
