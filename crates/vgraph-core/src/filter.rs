//! Lazy filtering over re-openable sequences
//!
//! A [`LazyFilter`] pairs a [`Source`] with a [`Predicate`]. Every call to
//! [`LazyFilter::cursor`] opens a fresh iteration of the source, and the
//! returned [`FilterCursor`] pulls from it only as far as needed to find the
//! next accepted item. At most one accepted item is held in lookahead.

use crate::error::{Error, Result};
use std::iter::FusedIterator;

/// A sequence that can be iterated any number of times, independently.
pub trait Source {
    type Item;
    type Iter: Iterator<Item = Self::Item>;

    /// Open a new iteration from the beginning
    fn open(&self) -> Self::Iter;
}

impl<'a, T> Source for &'a [T] {
    type Item = &'a T;
    type Iter = std::slice::Iter<'a, T>;

    fn open(&self) -> Self::Iter {
        self.iter()
    }
}

/// Source backed by a closure that produces a fresh iterable on each call.
///
/// Created with [`from_fn`].
#[derive(Clone)]
pub struct FromFn<F>(F);

/// Wrap a producer closure as a [`Source`]
pub fn from_fn<F, I>(producer: F) -> FromFn<F>
where
    F: Fn() -> I,
    I: IntoIterator,
{
    FromFn(producer)
}

impl<F, I> Source for FromFn<F>
where
    F: Fn() -> I,
    I: IntoIterator,
{
    type Item = I::Item;
    type Iter = I::IntoIter;

    fn open(&self) -> Self::Iter {
        (self.0)().into_iter()
    }
}

/// Acceptance test applied to each item of a filtered sequence
pub trait Predicate<T> {
    fn accepts(&self, item: &T) -> bool;
}

impl<T, F> Predicate<T> for F
where
    F: Fn(&T) -> bool,
{
    fn accepts(&self, item: &T) -> bool {
        self(item)
    }
}

/// Read-only filtered view of a [`Source`]
#[derive(Clone)]
pub struct LazyFilter<S, P> {
    source: S,
    predicate: P,
}

impl<S, P> LazyFilter<S, P>
where
    S: Source,
    P: Predicate<S::Item>,
{
    pub fn new(source: S, predicate: P) -> Self {
        Self { source, predicate }
    }

    /// Open an independent cursor over a fresh iteration of the source
    pub fn cursor(&self) -> FilterCursor<'_, S::Iter, P> {
        FilterCursor {
            source: self.source.open(),
            predicate: &self.predicate,
            lookahead: None,
            exhausted: false,
        }
    }

    /// True if at least one item is accepted. Stops at the first match.
    pub fn has_any(&self) -> bool {
        self.cursor().has_next()
    }

    pub fn predicate(&self) -> &P {
        &self.predicate
    }
}

impl<'a, S, P> IntoIterator for &'a LazyFilter<S, P>
where
    S: Source,
    P: Predicate<S::Item>,
{
    type Item = S::Item;
    type IntoIter = FilterCursor<'a, S::Iter, P>;

    fn into_iter(self) -> Self::IntoIter {
        self.cursor()
    }
}

/// Single-pass cursor over a [`LazyFilter`].
///
/// Not meant to be shared between threads; it carries lookahead state.
pub struct FilterCursor<'a, I: Iterator, P> {
    source: I,
    predicate: &'a P,
    lookahead: Option<I::Item>,
    exhausted: bool,
}

impl<I, P> FilterCursor<'_, I, P>
where
    I: Iterator,
    P: Predicate<I::Item>,
{
    /// Whether another accepted item exists.
    ///
    /// Pulls source items until one is accepted or the source ends. Once the
    /// source has ended it is never polled again.
    pub fn has_next(&mut self) -> bool {
        if self.lookahead.is_some() {
            return true;
        }
        if self.exhausted {
            return false;
        }
        for item in self.source.by_ref() {
            if self.predicate.accepts(&item) {
                self.lookahead = Some(item);
                return true;
            }
        }
        self.exhausted = true;
        false
    }

    /// Next accepted item, or [`Error::ExhaustedSequence`]
    pub fn try_next(&mut self) -> Result<I::Item> {
        if !self.has_next() {
            return Err(Error::ExhaustedSequence);
        }
        self.lookahead.take().ok_or(Error::ExhaustedSequence)
    }
}

impl<I, P> Iterator for FilterCursor<'_, I, P>
where
    I: Iterator,
    P: Predicate<I::Item>,
{
    type Item = I::Item;

    fn next(&mut self) -> Option<Self::Item> {
        if self.has_next() {
            self.lookahead.take()
        } else {
            None
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let buffered = usize::from(self.lookahead.is_some());
        if self.exhausted {
            return (buffered, Some(buffered));
        }
        let upper = self.source.size_hint().1;
        (buffered, upper.and_then(|n| n.checked_add(buffered)))
    }
}

impl<I, P> FusedIterator for FilterCursor<'_, I, P>
where
    I: Iterator,
    P: Predicate<I::Item>,
{
}
