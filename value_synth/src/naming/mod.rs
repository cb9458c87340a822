//! Naming resolution for derived members and generated locals.
//!
//! The resolver is built from immutable [`SynthesisConfig`] tables and an
//! injected [`Singularize`] implementation, so synthesis never consults global
//! state.

mod inflect;

#[cfg(test)]
mod tests;

use std::collections::BTreeSet;

use crate::config::SynthesisConfig;

pub use inflect::{EnglishInflector, Singularize};

/// Why a per-item convenience name is unavailable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Suppression {
    /// The inflector produced an empty name.
    Empty,
    /// The name is already singular.
    AlreadySingular,
    /// The singular is a reserved word.
    Reserved,
    /// The singular shadows a core-library type name.
    CoreType,
}

impl Suppression {
    /// Label used in logs.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Empty => "empty singular",
            Self::AlreadySingular => "already singular",
            Self::Reserved => "reserved word",
            Self::CoreType => "core type name",
        }
    }
}

/// Derives singular names and collision-free locals.
#[derive(Debug, Clone)]
pub struct NamingResolver<S = EnglishInflector> {
    reserved: BTreeSet<String>,
    core_types: BTreeSet<String>,
    inflector: S,
}

impl NamingResolver {
    /// Resolver using the built-in English inflector.
    #[must_use]
    pub fn new(config: &SynthesisConfig) -> Self {
        Self::with_inflector(config, EnglishInflector)
    }
}

impl<S: Singularize> NamingResolver<S> {
    /// Resolver using a caller-supplied inflector.
    #[must_use]
    pub fn with_inflector(config: &SynthesisConfig, inflector: S) -> Self {
        Self {
            reserved: config.reserved_words.clone(),
            core_types: config.core_type_names.clone(),
            inflector,
        }
    }

    /// Whether `word` is reserved in the target syntax.
    #[must_use]
    pub fn is_reserved(&self, word: &str) -> bool {
        self.reserved.contains(word)
    }

    /// The singular form of `name`, or the reason there is none.
    ///
    /// # Errors
    ///
    /// Returns a [`Suppression`] when the singular is empty, equal to `name`,
    /// a reserved word, or a core-library type name.
    pub fn resolve_singular(&self, name: &str) -> Result<String, Suppression> {
        let singular = self.inflector.singularize(name);
        if singular.is_empty() {
            Err(Suppression::Empty)
        } else if singular == name {
            Err(Suppression::AlreadySingular)
        } else if self.reserved.contains(&singular) {
            Err(Suppression::Reserved)
        } else if self.core_types.contains(&singular) {
            Err(Suppression::CoreType)
        } else {
            Ok(singular)
        }
    }

    /// The singular form of `name` when one is available.
    ///
    /// # Examples
    ///
    /// ```
    /// use value_synth::SynthesisConfig;
    /// use value_synth::naming::NamingResolver;
    ///
    /// let resolver = NamingResolver::new(&SynthesisConfig::default());
    /// assert_eq!(resolver.singular("tags").as_deref(), Some("tag"));
    /// assert_eq!(resolver.singular("tag"), None);
    /// assert_eq!(resolver.singular("Strings"), None);
    /// ```
    #[must_use]
    pub fn singular(&self, name: &str) -> Option<String> {
        self.resolve_singular(name).ok()
    }

    /// `candidate`, prefixed with underscores until it collides with nothing
    /// in `scope`.
    #[must_use]
    pub fn local_name<T: AsRef<str>>(&self, candidate: &str, scope: &[T]) -> String {
        let mut name = candidate.to_owned();
        while scope.iter().any(|taken| taken.as_ref() == name) {
            name.insert(0, '_');
        }
        name
    }
}

/// `prefix` joined to `word` with only the first character of `word`
/// uppercased; the rest is kept verbatim.
fn prefixed(prefix: &str, word: &str) -> String {
    let mut chars = word.chars();
    let mut name = String::with_capacity(prefix.len() + word.len());
    name.push_str(prefix);
    if let Some(first) = chars.next() {
        name.extend(first.to_uppercase());
    }
    name.push_str(chars.as_str());
    name
}

/// Name of the per-item adder for `singular`.
///
/// ```
/// use value_synth::naming::adder_name;
///
/// assert_eq!(adder_name("URL"), "addURL");
/// assert_eq!(adder_name("raw_item"), "addRaw_item");
/// ```
#[must_use]
pub fn adder_name(singular: &str) -> String {
    prefixed("add", singular)
}

/// Name of the per-item putter for `singular`.
#[must_use]
pub fn putter_name(singular: &str) -> String {
    prefixed("put", singular)
}
