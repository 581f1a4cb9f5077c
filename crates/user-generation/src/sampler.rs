//! Identity sampling from name pools.
//!
//! Every identity draws its family name first, then a given name. When both
//! genders are enabled each draw flips its own coin; there is no quota, so
//! small runs can be lopsided. Sampling is with replacement and never checks
//! for repeats; that is the uniqueness tracker's job.

use crate::config::GenderMix;
use crate::counters::RunCounters;
use crate::index_source::IndexSource;
use crate::name_pool::{NamePool, NamePools};

/// Which given-name pool a draw came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Gender {
    /// Female given-name pool.
    Female,
    /// Male given-name pool.
    Male,
}

/// A given name together with the pool it was drawn from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GivenName<'a> {
    /// The drawn name.
    pub name: &'a str,
    /// Pool the name came from.
    pub gender: Gender,
}

/// One candidate identity before uniqueness tracking.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    /// Given name.
    pub given: String,
    /// Family name.
    pub family: String,
    /// Pool the given name came from.
    pub gender: Gender,
}

impl Identity {
    /// The full name, given name first.
    ///
    /// ```
    /// use user_generation::{Gender, Identity};
    ///
    /// let identity = Identity {
    ///     given: "Ada".to_owned(),
    ///     family: "Lovelace".to_owned(),
    ///     gender: Gender::Female,
    /// };
    /// assert_eq!(identity.full_name(), "Ada Lovelace");
    /// ```
    #[must_use]
    pub fn full_name(&self) -> String {
        format!("{} {}", self.given, self.family)
    }
}

/// Draws identities from a set of name pools.
#[derive(Debug, Clone, Copy)]
pub struct IdentitySampler<'a> {
    family: &'a NamePool,
    female: Option<&'a NamePool>,
    male: Option<&'a NamePool>,
}

impl<'a> IdentitySampler<'a> {
    /// Creates a sampler over the pools enabled by `mix`.
    ///
    /// A gender whose pool was not loaded is treated as disabled.
    #[must_use]
    pub fn new(pools: &'a NamePools, mix: GenderMix) -> Self {
        Self {
            family: pools.family(),
            female: pools.female().filter(|_| mix.includes_females()),
            male: pools.male().filter(|_| mix.includes_males()),
        }
    }

    /// Draws a given name, or `None` when no given-name pool is enabled.
    ///
    /// The matching gender counter is bumped before the name is picked.
    pub fn sample_given_name<S>(
        &self,
        source: &mut S,
        counters: &mut RunCounters,
    ) -> Option<GivenName<'a>>
    where
        S: IndexSource + ?Sized,
    {
        let (pool, gender) = match (self.female, self.male) {
            (Some(female), Some(male)) => {
                if source.coin_flip() {
                    (female, Gender::Female)
                } else {
                    (male, Gender::Male)
                }
            }
            (Some(female), None) => (female, Gender::Female),
            (None, Some(male)) => (male, Gender::Male),
            (None, None) => return None,
        };

        match gender {
            Gender::Female => counters.female += 1,
            Gender::Male => counters.male += 1,
        }

        Some(GivenName {
            name: pool.pick(source),
            gender,
        })
    }

    /// Draws a family name.
    pub fn sample_family_name<S>(&self, source: &mut S) -> &'a str
    where
        S: IndexSource + ?Sized,
    {
        self.family.pick(source)
    }

    /// Draws a family name and then a given name.
    ///
    /// Returns `None` when no given-name pool is enabled, signalling the
    /// caller to stop generating.
    pub fn sample_identity<S>(
        &self,
        source: &mut S,
        counters: &mut RunCounters,
    ) -> Option<Identity>
    where
        S: IndexSource + ?Sized,
    {
        let family = self.sample_family_name(source);
        let given = self.sample_given_name(source, counters)?;
        Some(Identity {
            given: given.name.to_owned(),
            family: family.to_owned(),
            gender: given.gender,
        })
    }
}

#[cfg(test)]
mod tests {
    use rstest::{fixture, rstest};

    use super::*;
    use crate::index_source::{RandomIndexSource, ScriptedIndexSource};

    fn pool(names: &str) -> NamePool {
        NamePool::from_lines(names).expect("non-empty pool")
    }

    #[fixture]
    fn pools() -> NamePools {
        NamePools::new(
            pool("Smith\nJones"),
            Some(pool("Ana\nMia\nEva")),
            Some(pool("Tom\nSam")),
        )
    }

    #[rstest]
    fn coin_flip_selects_the_gender_pool(pools: NamePools) {
        let sampler = IdentitySampler::new(&pools, GenderMix::Both);
        let mut source = ScriptedIndexSource::new(vec![1, 0], vec![true, false]);
        let mut counters = RunCounters::default();

        let first = sampler.sample_given_name(&mut source, &mut counters);
        let second = sampler.sample_given_name(&mut source, &mut counters);

        assert_eq!(
            first,
            Some(GivenName {
                name: "Mia",
                gender: Gender::Female
            })
        );
        assert_eq!(
            second,
            Some(GivenName {
                name: "Tom",
                gender: Gender::Male
            })
        );
        assert_eq!((counters.female, counters.male), (1, 1));
    }

    #[rstest]
    #[case(GenderMix::FemaleOnly, Gender::Female)]
    #[case(GenderMix::MaleOnly, Gender::Male)]
    fn single_gender_always_uses_its_pool(
        pools: NamePools,
        #[case] mix: GenderMix,
        #[case] expected: Gender,
    ) {
        let sampler = IdentitySampler::new(&pools, mix);
        let mut source = RandomIndexSource::seeded(3);
        let mut counters = RunCounters::default();

        for _ in 0..20 {
            let given = sampler
                .sample_given_name(&mut source, &mut counters)
                .expect("pool enabled");
            assert_eq!(given.gender, expected);
        }
        assert_eq!(counters.draws(), 20);
    }

    #[rstest]
    fn neither_gender_stops_without_counting(pools: NamePools) {
        let sampler = IdentitySampler::new(&pools, GenderMix::Neither);
        let mut source = ScriptedIndexSource::default();
        let mut counters = RunCounters::default();

        assert!(sampler.sample_identity(&mut source, &mut counters).is_none());
        assert_eq!(counters, RunCounters::default());
    }

    #[rstest]
    fn identity_draws_family_before_given_name(pools: NamePools) {
        let sampler = IdentitySampler::new(&pools, GenderMix::FemaleOnly);
        // First pick selects the family name, second the given name.
        let mut source = ScriptedIndexSource::new(vec![1, 2], vec![]);
        let mut counters = RunCounters::default();

        let identity = sampler
            .sample_identity(&mut source, &mut counters)
            .expect("identity");

        assert_eq!(identity.full_name(), "Eva Jones");
        assert_eq!(identity.gender, Gender::Female);
    }

    #[rstest]
    fn gender_counters_add_up_to_draws(pools: NamePools) {
        let sampler = IdentitySampler::new(&pools, GenderMix::Both);
        let mut source = RandomIndexSource::seeded(42);
        let mut counters = RunCounters::default();

        for _ in 0..250 {
            sampler.sample_identity(&mut source, &mut counters);
        }

        assert_eq!(counters.female + counters.male, 250);
        assert!(counters.female > 0 && counters.male > 0);
    }

    #[test]
    fn missing_pool_is_treated_as_disabled() {
        let pools = NamePools::new(pool("Smith"), None, Some(pool("Tom")));
        let sampler = IdentitySampler::new(&pools, GenderMix::Both);
        let mut source = ScriptedIndexSource::new(vec![], vec![true]);
        let mut counters = RunCounters::default();

        let given = sampler
            .sample_given_name(&mut source, &mut counters)
            .expect("male pool available");

        assert_eq!(given.gender, Gender::Male);
    }
}
