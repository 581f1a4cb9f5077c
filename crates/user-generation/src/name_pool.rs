//! Name pools loaded from per-locale text files.
//!
//! A locale directory holds `family.txt`, `female.txt` and `male.txt`, one
//! name per line. The family pool is always required; a given-name pool is
//! only read when its gender is enabled, and must then be non-empty, so the
//! sampler never indexes into an empty pool.

use std::fmt;
use std::num::NonZeroUsize;
use std::path::PathBuf;

use camino::{Utf8Path, Utf8PathBuf};
use cap_std::ambient_authority;
use cap_std::fs::Dir;
use tracing::debug;

use crate::config::{GenderMix, is_single_directory_name};
use crate::error::DataSourceError;
use crate::index_source::IndexSource;

/// Returns the directory holding the name corpora bundled with this crate.
#[must_use]
pub fn bundled_names_root() -> Utf8PathBuf {
    Utf8PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("names")
}

/// The three kinds of name pool a locale provides.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PoolKind {
    /// Family names.
    Family,
    /// Female given names.
    Female,
    /// Male given names.
    Male,
}

impl PoolKind {
    /// File name of the pool inside a locale directory.
    #[must_use]
    pub const fn file_name(self) -> &'static str {
        match self {
            Self::Family => "family.txt",
            Self::Female => "female.txt",
            Self::Male => "male.txt",
        }
    }
}

impl fmt::Display for PoolKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Family => "family",
            Self::Female => "female",
            Self::Male => "male",
        })
    }
}

/// An ordered, non-empty, immutable list of names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamePool {
    names: Vec<String>,
}

impl NamePool {
    /// Builds a pool from `names`, returning `None` when it is empty.
    ///
    /// # Example
    ///
    /// ```
    /// use user_generation::NamePool;
    ///
    /// assert!(NamePool::new(vec!["Ada".to_owned()]).is_some());
    /// assert!(NamePool::new(Vec::new()).is_none());
    /// ```
    #[must_use]
    pub fn new(names: Vec<String>) -> Option<Self> {
        (!names.is_empty()).then_some(Self { names })
    }

    /// Parses newline-delimited names, skipping blank lines.
    #[must_use]
    pub fn from_lines(contents: &str) -> Option<Self> {
        let names = contents
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(str::to_owned)
            .collect();
        Self::new(names)
    }

    /// Number of names in the pool.
    #[must_use]
    pub fn len(&self) -> NonZeroUsize {
        NonZeroUsize::new(self.names.len()).unwrap_or(NonZeroUsize::MIN)
    }

    /// Always `false`; pools are never empty.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        false
    }

    /// Returns the names in load order.
    #[must_use]
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Draws one name uniformly at random, with replacement.
    pub fn pick<S: IndexSource + ?Sized>(&self, source: &mut S) -> &str {
        let index = source.pick(self.len());
        // Sources return indices below `len`; the fallback only guards odd sources.
        self.names
            .get(index)
            .or_else(|| self.names.first())
            .map(String::as_str)
            .unwrap_or_default()
    }
}

/// The pools one run samples from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamePools {
    family: NamePool,
    female: Option<NamePool>,
    male: Option<NamePool>,
}

impl NamePools {
    /// Assembles pools directly, mostly for tests and embedded corpora.
    #[must_use]
    pub const fn new(family: NamePool, female: Option<NamePool>, male: Option<NamePool>) -> Self {
        Self {
            family,
            female,
            male,
        }
    }

    /// Loads the pools of `locale` below `root` for the enabled genders.
    ///
    /// # Errors
    ///
    /// Returns [`DataSourceError`] if the locale is not a plain directory
    /// name, the directory or a required file cannot be read, or a required
    /// pool is empty.
    pub fn load(root: &Utf8Path, locale: &str, mix: GenderMix) -> Result<Self, DataSourceError> {
        if !is_single_directory_name(locale) {
            return Err(DataSourceError::InvalidLocale {
                locale: locale.to_owned(),
            });
        }

        let locale_path = root.join(locale);
        let dir = Dir::open_ambient_dir(&locale_path, ambient_authority()).map_err(|err| {
            DataSourceError::LocaleUnavailable {
                path: PathBuf::from(locale_path.as_std_path()),
                message: err.to_string(),
            }
        })?;

        let family = load_pool(&dir, &locale_path, PoolKind::Family)?;
        let female = if mix.includes_females() {
            Some(load_pool(&dir, &locale_path, PoolKind::Female)?)
        } else {
            None
        };
        let male = if mix.includes_males() {
            Some(load_pool(&dir, &locale_path, PoolKind::Male)?)
        } else {
            None
        };

        debug!(
            locale,
            family = family.len().get(),
            female = female.as_ref().map_or(0, |pool| pool.len().get()),
            male = male.as_ref().map_or(0, |pool| pool.len().get()),
            "name pools loaded"
        );

        Ok(Self::new(family, female, male))
    }

    /// The family name pool.
    #[must_use]
    pub const fn family(&self) -> &NamePool {
        &self.family
    }

    /// The female given-name pool, when loaded.
    #[must_use]
    pub const fn female(&self) -> Option<&NamePool> {
        self.female.as_ref()
    }

    /// The male given-name pool, when loaded.
    #[must_use]
    pub const fn male(&self) -> Option<&NamePool> {
        self.male.as_ref()
    }
}

fn load_pool(
    dir: &Dir,
    locale_path: &Utf8Path,
    kind: PoolKind,
) -> Result<NamePool, DataSourceError> {
    let path = PathBuf::from(locale_path.join(kind.file_name()).as_std_path());
    let contents = dir
        .read_to_string(kind.file_name())
        .map_err(|err| DataSourceError::Unreadable {
            kind,
            path: path.clone(),
            message: err.to_string(),
        })?;
    NamePool::from_lines(&contents).ok_or(DataSourceError::EmptyPool { kind, path })
}
