// 🔎 Record Filter
// Lazy filtering of a record stream against a caller-supplied condition

use crate::error::Result;
use crate::record::Record;
use std::iter::FusedIterator;

// ============================================================================
// CONDITION TRAIT
// ============================================================================

/// FilterCondition - predicate evaluated once per record
///
/// Takes `&mut self` so conditions may record what they saw while matching
/// (e.g. the matched company name). Implementations must not panic on records
/// that lack the fields they look at; such records simply don't match.
pub trait FilterCondition {
    fn matches(&mut self, record: &Record) -> bool;
}

impl<F> FilterCondition for F
where
    F: FnMut(&Record) -> bool,
{
    fn matches(&mut self, record: &Record) -> bool {
        self(record)
    }
}

// ============================================================================
// FILTER ADAPTER
// ============================================================================

/// Filtered - lazy sequence of the records a condition accepts
///
/// Pulls one record at a time from the source, keeps source order, and
/// forwards source errors untouched (the condition is not consulted for them).
pub struct Filtered<'c, I, C: ?Sized> {
    source: I,
    condition: &'c mut C,
    evaluated: usize,
    accepted: usize,
}

/// Wrap `source` so only records matching `condition` come out
///
/// The condition stays mutably borrowed until the returned sequence is
/// dropped, so any state it captures can only be read after filtering ends.
pub fn filter<I, C>(source: I, condition: &mut C) -> Filtered<'_, I::IntoIter, C>
where
    I: IntoIterator<Item = Result<Record>>,
    C: FilterCondition + ?Sized,
{
    Filtered {
        source: source.into_iter(),
        condition,
        evaluated: 0,
        accepted: 0,
    }
}

impl<I, C: ?Sized> Filtered<'_, I, C> {
    /// Records the condition has been evaluated against
    pub fn evaluated(&self) -> usize {
        self.evaluated
    }

    /// Records that passed
    pub fn accepted(&self) -> usize {
        self.accepted
    }
}

impl<I, C> Iterator for Filtered<'_, I, C>
where
    I: Iterator<Item = Result<Record>>,
    C: FilterCondition + ?Sized,
{
    type Item = Result<Record>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let record = match self.source.next()? {
                Ok(record) => record,
                Err(err) => return Some(Err(err)),
            };

            self.evaluated += 1;
            if self.condition.matches(&record) {
                self.accepted += 1;
                return Some(Ok(record));
            }
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, self.source.size_hint().1)
    }
}

impl<I, C> FusedIterator for Filtered<'_, I, C>
where
    I: FusedIterator<Item = Result<Record>>,
    C: FilterCondition + ?Sized,
{
}

// ============================================================================
// TESTS
// ============================================================================
