//! Build variants.
//!
//! A variant is a set of boolean feature toggles, written in a vaguely
//! Spack-like syntax: `+mpi~debug +papi`. Variants produced by
//! [`all_variants`] define every [`Feature`]; variants parsed from user input
//! may define any subset and are used as filters via [`Variant::satisfies`].

use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Serialize, Serializer};

use crate::core::errors::ConfigureError;

/// A recognized variant feature.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Feature {
    Mpi,
    Debug,
    Papi,
    Opencl,
    Cuda,
    Rocm,
    Level0,
}

impl Feature {
    /// Every feature, in canonical order.
    pub const ALL: [Feature; 7] = [
        Feature::Mpi,
        Feature::Debug,
        Feature::Papi,
        Feature::Opencl,
        Feature::Cuda,
        Feature::Rocm,
        Feature::Level0,
    ];

    /// Name used in variant specs.
    pub fn name(self) -> &'static str {
        match self {
            Feature::Mpi => "mpi",
            Feature::Debug => "debug",
            Feature::Papi => "papi",
            Feature::Opencl => "opencl",
            Feature::Cuda => "cuda",
            Feature::Rocm => "rocm",
            Feature::Level0 => "level0",
        }
    }

    /// Look up a feature by name.
    pub fn from_name(name: &str) -> Option<Feature> {
        Feature::ALL.into_iter().find(|f| f.name() == name)
    }

    /// Value tried first during enumeration.
    fn first_value(self) -> bool {
        matches!(self, Feature::Debug | Feature::Papi)
    }

    fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Feature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A (possibly partial) assignment of features to booleans.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Variant {
    values: [Option<bool>; Feature::ALL.len()],
}

impl Variant {
    /// A variant that defines nothing. Every variant satisfies it.
    pub fn empty() -> Self {
        Variant::default()
    }

    /// Set a feature, returning the updated variant.
    pub fn with(mut self, feature: Feature, value: bool) -> Self {
        self.values[feature.index()] = Some(value);
        self
    }

    /// The value of a feature, if defined.
    pub fn get(&self, feature: Feature) -> Option<bool> {
        self.values[feature.index()]
    }

    /// Whether a feature is defined and enabled.
    pub fn enabled(&self, feature: Feature) -> bool {
        self.get(feature).unwrap_or(false)
    }

    /// Whether every feature is defined.
    pub fn is_complete(&self) -> bool {
        self.values.iter().all(Option::is_some)
    }

    /// Defined features and their values, in canonical order.
    pub fn iter(&self) -> impl Iterator<Item = (Feature, bool)> + '_ {
        Feature::ALL
            .into_iter()
            .filter_map(|f| self.get(f).map(|v| (f, v)))
    }

    /// Render as `+name`/`~name` tokens joined by `separator`.
    ///
    /// Undefined features are omitted.
    pub fn to_string_with(&self, separator: &str) -> String {
        self.iter()
            .map(|(f, v)| format!("{}{}", if v { '+' } else { '~' }, f.name()))
            .collect::<Vec<_>>()
            .join(separator)
    }

    /// Parse a variant spec.
    ///
    /// Every word must start with `+` or `~`; this is checked for all words
    /// before any name is looked up. A word may hold several features
    /// (`+mpi~debug`). Later mentions of a feature win.
    pub fn parse(text: &str) -> Result<Variant, ConfigureError> {
        static WORD: LazyLock<Regex> =
            LazyLock::new(|| Regex::new(r"[+~\w]+").expect("valid regex"));
        static PAIR: LazyLock<Regex> =
            LazyLock::new(|| Regex::new(r"([+~])(\w*)").expect("valid regex"));

        let words: Vec<&str> = WORD.find_iter(text).map(|m| m.as_str()).collect();
        if let Some(word) = words.iter().find(|w| !w.starts_with(['+', '~'])) {
            return Err(ConfigureError::MissingVariantIndicator {
                word: word.to_string(),
            });
        }

        let mut result = Variant::empty();
        for word in words {
            for caps in PAIR.captures_iter(word) {
                let name = &caps[2];
                let feature =
                    Feature::from_name(name).ok_or_else(|| ConfigureError::InvalidVariantName {
                        name: name.to_string(),
                    })?;
                result = result.with(feature, &caps[1] == "+");
            }
        }
        Ok(result)
    }

    /// Whether this variant is a refinement of `general`.
    ///
    /// Features left undefined on either side never conflict.
    pub fn satisfies(&self, general: &Variant) -> bool {
        general
            .iter()
            .all(|(f, v)| self.get(f).map_or(true, |mine| mine == v))
    }
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_string_with(" "))
    }
}

impl FromStr for Variant {
    type Err = ConfigureError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Variant::parse(s)
    }
}

impl Serialize for Variant {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

/// Lazy enumeration of every complete variant.
#[derive(Debug, Clone)]
pub struct AllVariants {
    next: u32,
}

impl Iterator for AllVariants {
    type Item = Variant;

    fn next(&mut self) -> Option<Variant> {
        if self.next >= 1 << Feature::ALL.len() {
            return None;
        }
        let index = self.next;
        self.next += 1;

        // `mpi` varies fastest
        let mut variant = Variant::empty();
        for feature in Feature::ALL {
            let flipped = index >> feature.index() & 1 == 1;
            variant = variant.with(feature, feature.first_value() != flipped);
        }
        Some(variant)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let left = (1usize << Feature::ALL.len()) - self.next as usize;
        (left, Some(left))
    }
}

impl ExactSizeIterator for AllVariants {}

/// Every complete variant, in a fixed order.
pub fn all_variants() -> AllVariants {
    AllVariants { next: 0 }
}
