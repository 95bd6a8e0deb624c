//! Single-pass peak/valley region scanner
//!
//! Walks adjacent value pairs once, keeping a stack of open candidate
//! regions. Uphill steps raise the extremum of open candidates and open a
//! new singleton; downhill steps close every candidate whose cutoff the new
//! value undercuts. Each point is pushed and popped at most once, so the
//! whole scan is amortized O(n) and emits at most 2n - 1 regions.
//!
//! Open candidates are nested, so their extrema only grow towards the
//! bottom of the stack. Candidates sharing an extremum are stored as one
//! [`Crest`] and an uphill step merges crests instead of touching every
//! candidate below it.
//!
//! Regions come out in ascending `stop` order, innermost first.

use std::collections::VecDeque;

use super::{Orientation, Scope};
use crate::PeakError;

/// Region still waiting for its `stop`
#[derive(Debug, Clone, Copy)]
struct Candidate {
    start: usize,
    argcut: usize,
    cutoff: f64,
}

/// Extremum shared by the open candidates from `from` to the next crest
#[derive(Debug, Clone, Copy)]
struct Crest {
    from: usize,
    argext: usize,
    extremum: f64,
}

/// Streaming region detector over any iterator of values
#[derive(Debug)]
pub struct RegionScanner<I> {
    values: I,
    orientation: Orientation,
    open: Vec<Candidate>,
    crests: Vec<Crest>,
    ready: VecDeque<Scope>,
    /// Index of `previous`
    position: usize,
    previous: f64,
    finished: bool,
    emitted: usize,
}

impl<I: Iterator<Item = f64>> RegionScanner<I> {
    /// Start scanning; fails on an empty sequence
    pub fn new(
        values: impl IntoIterator<IntoIter = I>,
        orientation: Orientation,
    ) -> Result<Self, PeakError> {
        let mut values = values.into_iter();
        let first = values
            .next()
            .ok_or_else(|| PeakError::InvalidInput("cannot scan an empty sequence".to_string()))?;
        let mut scanner = Self {
            values,
            orientation,
            open: Vec::new(),
            crests: Vec::new(),
            ready: VecDeque::new(),
            position: 0,
            previous: first,
            finished: false,
            emitted: 0,
        };
        scanner.open_singleton(0, first);
        Ok(scanner)
    }

    /// Orientation this scanner detects
    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    fn open_singleton(&mut self, position: usize, value: f64) {
        // absorb every crest the new value rises above
        let mut from = self.open.len();
        while let Some(crest) = self.crests.last() {
            if self.orientation.reaches(crest.extremum, value) {
                break;
            }
            from = crest.from;
            self.crests.pop();
        }
        self.open.push(Candidate {
            start: position,
            argcut: position,
            cutoff: value,
        });
        self.crests.push(Crest {
            from,
            argext: position,
            extremum: value,
        });
    }

    /// Close the innermost open candidate
    fn close_top(&mut self, stop: usize) -> Option<Scope> {
        let candidate = self.open.pop()?;
        let crest = self.crests.last().copied()?;
        if crest.from == self.open.len() {
            self.crests.pop();
        }
        let scope = Scope::new(
            candidate.start,
            stop,
            crest.argext,
            candidate.argcut,
            crest.extremum,
            candidate.cutoff,
        );
        self.ready.push_back(scope);
        Some(scope)
    }

    fn step(&mut self, next: f64) {
        let o = self.orientation;
        let i = self.position;

        if o.exceeds(next, self.previous) {
            // uphill
            self.open_singleton(i + 1, next);
        } else if o.exceeds(self.previous, next) {
            // downhill
            let mut last_closed = None;
            while self.open.last().is_some_and(|top| o.exceeds(top.cutoff, next)) {
                last_closed = self.close_top(i + 1);
            }
            if let Some(closed) = last_closed {
                let continues = self.open.last().is_some_and(|top| top.cutoff == next);
                if !continues {
                    self.crests.push(Crest {
                        from: self.open.len(),
                        argext: closed.argext,
                        extremum: closed.extremum,
                    });
                    self.open.push(Candidate {
                        start: closed.start,
                        argcut: i + 1,
                        cutoff: next,
                    });
                }
            }
        }
        // flat (or incomparable) steps leave the open candidates untouched

        self.position += 1;
        self.previous = next;
    }

    fn finish(&mut self) {
        let stop = self.position + 1;
        while self.close_top(stop).is_some() {}
        self.finished = true;
        tracing::debug!(
            orientation = %self.orientation,
            length = stop,
            regions = self.emitted + self.ready.len(),
            "scan finished"
        );
    }
}

impl<I: Iterator<Item = f64>> Iterator for RegionScanner<I> {
    type Item = Scope;

    fn next(&mut self) -> Option<Scope> {
        loop {
            if let Some(scope) = self.ready.pop_front() {
                self.emitted += 1;
                tracing::trace!(%scope, extremum = scope.extremum, cutoff = scope.cutoff, "region");
                return Some(scope);
            }
            if self.finished {
                return None;
            }
            match self.values.next() {
                Some(value) => self.step(value),
                None => self.finish(),
            }
        }
    }
}

/// Yield peak regions of `values` in canonical order
pub fn find_peaks<V>(values: V) -> Result<RegionScanner<V::IntoIter>, PeakError>
where
    V: IntoIterator<Item = f64>,
{
    RegionScanner::new(values, Orientation::Peak)
}

/// Yield valley regions of `values` in canonical order
pub fn find_valleys<V>(values: V) -> Result<RegionScanner<V::IntoIter>, PeakError>
where
    V: IntoIterator<Item = f64>,
{
    RegionScanner::new(values, Orientation::Valley)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn six(s: &Scope) -> (usize, usize, usize, usize, f64, f64) {
        (s.start, s.stop, s.argext, s.argcut, s.extremum, s.cutoff)
    }

    #[test]
    fn test_find_peaks_example() {
        let data = [10.0, 30.0, 40.0, 30.0, 10.0, 50.0, 70.0, 70.0, 50.0, 80.0];
        let peaks: Vec<_> = find_peaks(data).unwrap().map(|s| six(&s)).collect();
        assert_eq!(
            peaks,
            vec![
                (2, 3, 2, 2, 40.0, 40.0),
                (1, 4, 2, 1, 40.0, 30.0),
                (6, 8, 6, 6, 70.0, 70.0),
                (9, 10, 9, 9, 80.0, 80.0),
                (5, 10, 9, 5, 80.0, 50.0),
                (0, 10, 9, 0, 80.0, 10.0),
            ]
        );
    }

    #[test]
    fn test_empty_input_is_rejected() {
        assert!(matches!(
            find_peaks(Vec::<f64>::new()),
            Err(PeakError::InvalidInput(_))
        ));
        assert!(find_valleys(std::iter::empty()).is_err());
    }

    #[test]
    fn test_single_point() {
        let peaks: Vec<_> = find_peaks([42.0]).unwrap().collect();
        assert_eq!(peaks.len(), 1);
        assert_eq!(six(&peaks[0]), (0, 1, 0, 0, 42.0, 42.0));
    }

    #[test]
    fn test_monotone_input() {
        let data = [1.0, 2.0, 3.0, 4.0];
        let peaks: Vec<_> = find_peaks(data).unwrap().collect();
        let outer = peaks.last().unwrap();
        assert_eq!((outer.start, outer.stop, outer.argext), (0, 4, 3));

        // every prefix is a valley region, nested inside the next
        let valleys: Vec<_> = find_valleys(data).unwrap().collect();
        assert_eq!(valleys.len(), 4);
        assert!(valleys.windows(2).all(|w| w[0] < w[1]));
        assert_eq!(six(&valleys[3]), (0, 4, 0, 3, 1.0, 4.0));
    }

    #[test]
    fn test_flat_run_is_one_region() {
        let peaks: Vec<_> = find_peaks([5.0, 5.0, 5.0]).unwrap().collect();
        assert_eq!(peaks.len(), 1);
        assert_eq!(six(&peaks[0]), (0, 3, 0, 0, 5.0, 5.0));
    }

    #[test]
    fn test_region_count_bound() {
        let data: Vec<f64> = (0..50).map(|i| if i % 2 == 0 { i as f64 } else { -(i as f64) }).collect();
        let count = find_peaks(data.iter().copied()).unwrap().count();
        assert!(count <= 2 * data.len() - 1);
    }
}
