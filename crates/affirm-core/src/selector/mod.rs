//! Random affirmation selection with repetition avoidance
//!
//! [`RandomSelector`] picks the next item to display from a candidate slice,
//! skipping the item the caller showed last whenever another item exists.
//! The selector keeps no record of what it returned: the caller owns the
//! "last shown" id and passes it back on the next call.
//!
//! Entropy comes from an injected [`RandomSource`], so tests can replay
//! selections with a seeded generator.

use std::convert::Infallible;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::models::{Affirmation, AffirmationId};

/// A source of uniformly distributed integers.
pub trait RandomSource {
    /// Return a value uniformly distributed in `[0, bound)`.
    ///
    /// # Panics
    ///
    /// Implementations panic when `bound` is zero.
    fn next_below(&mut self, bound: u64) -> u64;
}

impl<R: Rng + ?Sized> RandomSource for R {
    fn next_below(&mut self, bound: u64) -> u64 {
        assert!(bound > 0, "random bound must be positive");
        self.gen_range(0..bound)
    }
}

/// Picks the next item to show, avoiding immediate repeats.
#[derive(Debug, Clone)]
pub struct RandomSelector<R = StdRng> {
    source: R,
}

impl RandomSelector<StdRng> {
    /// Selector backed by an OS-seeded generator
    #[must_use]
    pub fn from_entropy() -> Self {
        Self::new(StdRng::from_entropy())
    }

    /// Selector backed by a generator with a fixed seed
    #[must_use]
    pub fn seeded(seed: u64) -> Self {
        Self::new(StdRng::seed_from_u64(seed))
    }
}

impl Default for RandomSelector<StdRng> {
    fn default() -> Self {
        Self::from_entropy()
    }
}

impl<R: RandomSource> RandomSelector<R> {
    /// Create a selector drawing from the given source
    pub const fn new(source: R) -> Self {
        Self { source }
    }

    /// Give back the underlying random source
    pub fn into_inner(self) -> R {
        self.source
    }

    /// Pick the next item to display.
    ///
    /// - Empty `items` yields `None`.
    /// - A single item is always returned, even when its id is `exclude_id`.
    /// - Otherwise the result is drawn uniformly from the items whose id
    ///   differs from `exclude_id`. If every item carries that id, the
    ///   exclusion is dropped and all items are eligible.
    ///
    /// `get_id` is called at most twice per item and should return the same id
    /// each time. If it does not, the last item seen as eligible (or any item)
    /// is returned instead. `items` is never copied or reordered.
    pub fn select_next<'a, T, I, F>(
        &mut self,
        items: &'a [T],
        mut get_id: F,
        exclude_id: Option<&I>,
    ) -> Option<&'a T>
    where
        F: FnMut(&T) -> I,
        I: PartialEq,
    {
        match self.try_select_next(items, |item| Ok::<_, Infallible>(get_id(item)), exclude_id) {
            Ok(selected) => selected,
            Err(never) => match never {},
        }
    }

    /// Same as [`select_next`](Self::select_next) with a fallible id projection.
    ///
    /// The first error returned by `get_id` is handed back unchanged.
    pub fn try_select_next<'a, T, I, E, F>(
        &mut self,
        items: &'a [T],
        mut get_id: F,
        exclude_id: Option<&I>,
    ) -> Result<Option<&'a T>, E>
    where
        F: FnMut(&T) -> Result<I, E>,
        I: PartialEq,
    {
        match items {
            [] => return Ok(None),
            [only] => return Ok(Some(only)),
            _ => {}
        }

        let Some(excluded) = exclude_id else {
            return Ok(Some(self.pick_any(items)));
        };

        let mut eligible = 0usize;
        for item in items {
            if get_id(item)? != *excluded {
                eligible += 1;
            }
        }

        if eligible == 0 {
            tracing::debug!(
                candidates = items.len(),
                "every candidate carries the excluded id, ignoring exclusion"
            );
            return Ok(Some(self.pick_any(items)));
        }

        let target = self.draw_index(eligible);
        let mut seen = 0usize;
        let mut last_eligible = None;
        for item in items {
            if get_id(item)? != *excluded {
                if seen == target {
                    return Ok(Some(item));
                }
                seen += 1;
                last_eligible = Some(item);
            }
        }

        // Only reachable when `get_id` answers differently on the second pass
        tracing::warn!(
            counted = eligible,
            walked = seen,
            "id projection is not stable, falling back"
        );
        Ok(Some(last_eligible.unwrap_or_else(|| self.pick_any(items))))
    }

    /// Pick the next affirmation, avoiding the one shown last
    pub fn select_next_affirmation<'a>(
        &mut self,
        affirmations: &'a [Affirmation],
        last_shown: Option<&AffirmationId>,
    ) -> Option<&'a Affirmation> {
        self.select_next(affirmations, |affirmation| affirmation.id, last_shown)
    }

    /// Uniformly distributed integer in `[min, max)`, drawn from the same
    /// source as the selections.
    ///
    /// # Panics
    ///
    /// Panics when `min >= max`.
    pub fn next_int_in_range(&mut self, min: i64, max: i64) -> i64 {
        assert!(min < max, "empty range [{min}, {max})");
        let offset = self.draw(max.abs_diff(min));
        min.saturating_add_unsigned(offset)
    }

    fn pick_any<'a, T>(&mut self, items: &'a [T]) -> &'a T {
        &items[self.draw_index(items.len())]
    }

    #[allow(clippy::cast_possible_truncation)] // result is below `len`
    fn draw_index(&mut self, len: usize) -> usize {
        self.draw(len as u64) as usize
    }

    fn draw(&mut self, bound: u64) -> u64 {
        let value = self.source.next_below(bound);
        assert!(
            value < bound,
            "random source returned {value} for bound {bound}"
        );
        value
    }
}
