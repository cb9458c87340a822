//! English singularization.
//!
//! Rules operate on the trailing camel-case segment of an identifier so that
//! `accountHolders` becomes `accountHolder` and `childPeople` becomes
//! `childPerson`. The leading segments keep their original spelling.

/// Inverse pluralization.
pub trait Singularize {
    /// Returns the singular form of `word`, or `word` unchanged when it has
    /// none.
    fn singularize(&self, word: &str) -> String;
}

/// Words whose plural and singular forms coincide.
const UNCOUNTABLE: &[&str] = &[
    "equipment",
    "fish",
    "information",
    "money",
    "news",
    "rice",
    "series",
    "sheep",
    "species",
];

/// Whole-segment irregular plurals.
const IRREGULAR: &[(&str, &str)] = &[
    ("children", "child"),
    ("feet", "foot"),
    ("geese", "goose"),
    ("lice", "louse"),
    ("men", "man"),
    ("mice", "mouse"),
    ("moves", "move"),
    ("oxen", "ox"),
    ("people", "person"),
    ("sexes", "sex"),
    ("teeth", "tooth"),
];

/// Suffix replacements, tried in order. The first match wins.
const SUFFIXES: &[(&str, &str)] = &[
    ("quizzes", "quiz"),
    ("matrices", "matrix"),
    ("vertices", "vertex"),
    ("indices", "index"),
    ("aliases", "alias"),
    ("statuses", "status"),
    ("buses", "bus"),
    ("octopi", "octopus"),
    ("viri", "virus"),
    ("crises", "crisis"),
    ("axes", "axis"),
    ("analyses", "analysis"),
    ("diagnoses", "diagnosis"),
    ("parentheses", "parenthesis"),
    ("prognoses", "prognosis"),
    ("synopses", "synopsis"),
    ("theses", "thesis"),
    ("bases", "basis"),
    ("shoes", "shoe"),
    ("movies", "movie"),
    ("hives", "hive"),
    ("tives", "tive"),
    ("lves", "lf"),
    ("rves", "rf"),
    ("sses", "ss"),
    ("shes", "sh"),
    ("ches", "ch"),
    ("xes", "x"),
    ("oes", "o"),
];

/// Endings that already read as singular.
const SINGULAR_ENDINGS: &[&str] = &["ss", "us", "is"];

/// Rule-based English inflector.
#[derive(Debug, Clone, Copy, Default)]
pub struct EnglishInflector;

impl Singularize for EnglishInflector {
    fn singularize(&self, word: &str) -> String {
        let split = last_segment_start(word);
        let (head, segment) = word.split_at(split);
        let lower = segment.to_ascii_lowercase();
        if UNCOUNTABLE.contains(&lower.as_str()) {
            return word.to_owned();
        }
        if let Some((_, singular)) = IRREGULAR.iter().find(|(plural, _)| *plural == lower) {
            return format!("{head}{}", match_initial_case(segment, singular));
        }
        format!("{head}{}", singularize_segment(segment, &lower))
    }
}

fn last_segment_start(word: &str) -> usize {
    word.char_indices()
        .rev()
        .find(|(_, c)| c.is_ascii_uppercase())
        .map_or(0, |(i, _)| i)
}

fn match_initial_case(original: &str, replacement: &str) -> String {
    let upper = original.chars().next().is_some_and(|c| c.is_ascii_uppercase());
    if !upper {
        return replacement.to_owned();
    }
    let mut chars = replacement.chars();
    chars.next().map_or_else(String::new, |first| {
        first.to_ascii_uppercase().to_string() + chars.as_str()
    })
}

fn singularize_segment(segment: &str, lower: &str) -> String {
    let keep = |n: usize| segment.get(..segment.len() - n).unwrap_or_default();

    if let Some((plural, singular)) = SUFFIXES.iter().find(|(p, _)| lower.ends_with(p)) {
        return format!("{}{singular}", keep(plural.len()));
    }
    if let Some(stem) = lower.strip_suffix("ies")
        && ends_with_consonant_or_qu(stem)
    {
        return format!("{}y", keep(3));
    }
    if let Some(stem) = lower.strip_suffix("ves")
        && !stem.is_empty()
        && !stem.ends_with('f')
    {
        return format!("{}fe", keep(3));
    }
    if SINGULAR_ENDINGS.iter().any(|e| lower.ends_with(e)) {
        return segment.to_owned();
    }
    if lower.len() > 1 && lower.ends_with('s') {
        return keep(1).to_owned();
    }
    if lower.ends_with("ta") || lower.ends_with("ia") {
        return format!("{}um", keep(1));
    }
    segment.to_owned()
}

fn ends_with_consonant_or_qu(stem: &str) -> bool {
    if stem.ends_with("qu") {
        return true;
    }
    stem.chars()
        .last()
        .is_some_and(|c| c.is_ascii_alphabetic() && !"aeiouy".contains(c))
}
