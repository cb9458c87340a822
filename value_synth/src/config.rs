//! Synthesis configuration.
//!
//! The reserved-word and core-type tables are plain data handed to the
//! [`NamingResolver`](crate::naming::NamingResolver) when a
//! [`Synthesizer`](crate::Synthesizer) is built. Nothing here is global or
//! mutable once synthesis starts.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// Keywords of the target surface syntax.
const JAVA_KEYWORDS: &[&str] = &[
    "abstract",
    "assert",
    "boolean",
    "break",
    "byte",
    "case",
    "catch",
    "char",
    "class",
    "const",
    "continue",
    "default",
    "do",
    "double",
    "else",
    "enum",
    "extends",
    "final",
    "finally",
    "float",
    "for",
    "goto",
    "if",
    "implements",
    "import",
    "instanceof",
    "int",
    "interface",
    "long",
    "native",
    "new",
    "package",
    "private",
    "protected",
    "public",
    "return",
    "short",
    "static",
    "strictfp",
    "super",
    "switch",
    "synchronized",
    "this",
    "throw",
    "throws",
    "transient",
    "try",
    "void",
    "volatile",
    "while",
];

/// Unqualified names of the implicitly imported core-library types.
const JAVA_LANG_TYPES: &[&str] = &[
    "Appendable",
    "AutoCloseable",
    "Boolean",
    "Byte",
    "CharSequence",
    "Character",
    "Class",
    "ClassLoader",
    "Cloneable",
    "Comparable",
    "Deprecated",
    "Double",
    "Enum",
    "Error",
    "Exception",
    "Float",
    "Integer",
    "Iterable",
    "Long",
    "Math",
    "Module",
    "Number",
    "Object",
    "Override",
    "Package",
    "Process",
    "Readable",
    "Record",
    "Runnable",
    "Runtime",
    "RuntimeException",
    "Short",
    "StackTraceElement",
    "StrictMath",
    "String",
    "StringBuffer",
    "StringBuilder",
    "System",
    "Thread",
    "ThreadLocal",
    "Throwable",
    "Void",
];

/// Tunables and lookup tables for one synthesis run.
///
/// # Examples
///
/// ```
/// use value_synth::SynthesisConfig;
///
/// let config = SynthesisConfig::default();
/// assert!(config.reserved_words.contains("class"));
/// assert!(config.core_type_names.contains("String"));
/// assert_eq!(config.max_map_pairs, 5);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SynthesisConfig {
    /// Identifiers that cannot be used as field names or derived method
    /// parameter names.
    pub reserved_words: BTreeSet<String>,
    /// Unqualified core-library type names a derived singular must not shadow.
    pub core_type_names: BTreeSet<String>,
    /// Largest arity of the positional key/value map setters.
    pub max_map_pairs: u8,
    /// Suffix appended to the value type's simple name to name the builder.
    pub builder_suffix: String,
    /// Simple name of the nested immutable value type.
    pub value_type_name: String,
    /// Identifier recorded in the builder's generated-by metadata.
    pub generator: String,
}

impl Default for SynthesisConfig {
    fn default() -> Self {
        Self {
            reserved_words: JAVA_KEYWORDS.iter().map(|&w| w.to_owned()).collect(),
            core_type_names: JAVA_LANG_TYPES.iter().map(|&w| w.to_owned()).collect(),
            max_map_pairs: 5,
            builder_suffix: "Builder".to_owned(),
            value_type_name: "Value".to_owned(),
            generator: concat!(env!("CARGO_PKG_NAME"), " ", env!("CARGO_PKG_VERSION")).to_owned(),
        }
    }
}

impl SynthesisConfig {
    /// Whether `word` is reserved in the target syntax.
    #[must_use]
    pub fn is_reserved(&self, word: &str) -> bool {
        self.reserved_words.contains(word)
    }
}

#[cfg(test)]
mod tests {
    use super::SynthesisConfig;

    #[test]
    fn partial_documents_keep_the_remaining_defaults() {
        let config: SynthesisConfig =
            serde_json::from_str(r#"{ "max_map_pairs": 3 }"#).unwrap_or_default();
        assert_eq!(config.max_map_pairs, 3);
        assert_eq!(config.builder_suffix, "Builder");
        assert!(config.is_reserved("while"));
    }

    #[test]
    fn keyword_table_has_no_duplicates() {
        let config = SynthesisConfig::default();
        assert_eq!(config.reserved_words.len(), super::JAVA_KEYWORDS.len());
    }
}
