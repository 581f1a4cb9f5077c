//! Cumulative full-name map with per-name occurrence counts.
//!
//! The map lives for a whole run, so a name generated in the first round
//! still collides in every later retry round.

use std::num::NonZeroUsize;

use indexmap::IndexMap;
use tracing::debug;

use crate::config::UniquenessPolicy;
use crate::counters::RunCounters;

/// Outcome of observing one sampled full name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Observation {
    /// The name was recorded. `occurrences` is its count after this draw.
    Kept {
        /// Occurrence count including this draw.
        occurrences: NonZeroUsize,
    },
    /// The name was already present and has been discarded.
    Collided,
}

/// Tracks every full name generated during a run.
#[derive(Debug, Clone)]
pub struct UniquenessTracker {
    policy: UniquenessPolicy,
    names: IndexMap<String, NonZeroUsize>,
}

impl UniquenessTracker {
    /// Creates an empty tracker for `policy`.
    #[must_use]
    pub fn new(policy: UniquenessPolicy) -> Self {
        Self {
            policy,
            names: IndexMap::new(),
        }
    }

    /// Records `full_name`, counting a collision when it was seen before.
    ///
    /// Under [`UniquenessPolicy::UniqueOnly`] a repeat is discarded and its
    /// stored count stays untouched. Under
    /// [`UniquenessPolicy::AllowDuplicates`] the stored count grows by one.
    ///
    /// # Example
    ///
    /// ```
    /// use user_generation::{Observation, RunCounters, UniquenessPolicy, UniquenessTracker};
    ///
    /// let mut tracker = UniquenessTracker::new(UniquenessPolicy::UniqueOnly);
    /// let mut counters = RunCounters::default();
    ///
    /// assert!(matches!(tracker.observe("Ana Smith", &mut counters), Observation::Kept { .. }));
    /// assert_eq!(tracker.observe("Ana Smith", &mut counters), Observation::Collided);
    /// assert_eq!(counters.collisions, 1);
    /// ```
    pub fn observe(&mut self, full_name: &str, counters: &mut RunCounters) -> Observation {
        let policy = self.policy;
        let Some(count) = self.names.get_mut(full_name) else {
            self.names.insert(full_name.to_owned(), NonZeroUsize::MIN);
            return Observation::Kept {
                occurrences: NonZeroUsize::MIN,
            };
        };

        counters.collisions += 1;
        debug!(full_name, ?policy, "full name collision");

        match policy {
            UniquenessPolicy::UniqueOnly => Observation::Collided,
            UniquenessPolicy::AllowDuplicates => {
                *count = count.saturating_add(1);
                Observation::Kept {
                    occurrences: *count,
                }
            }
        }
    }

    /// Occurrence count of `full_name`, if it has been generated.
    #[must_use]
    pub fn occurrences(&self, full_name: &str) -> Option<NonZeroUsize> {
        self.names.get(full_name).copied()
    }

    /// Entries in first-generation order.
    pub fn entries(&self) -> impl Iterator<Item = (&str, NonZeroUsize)> {
        self.names
            .iter()
            .map(|(name, count)| (name.as_str(), *count))
    }

    /// Number of distinct full names generated so far.
    #[must_use]
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Returns `true` before the first name is observed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}
