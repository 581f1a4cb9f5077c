//! Per-run counters.

/// Counters owned by a single run and reset when it starts.
///
/// The sampler bumps the gender counts, the uniqueness tracker bumps the
/// collision count and the flush stage adds persisted rows.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunCounters {
    /// Given names drawn from the female pool.
    pub female: usize,
    /// Given names drawn from the male pool.
    pub male: usize,
    /// Sampled full names already present in the name map.
    pub collisions: usize,
    /// Rows newly stored by the persister.
    pub inserted: usize,
}

impl RunCounters {
    /// Total given-name draws so far.
    #[must_use]
    pub const fn draws(&self) -> usize {
        self.female + self.male
    }
}
