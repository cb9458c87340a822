//! Tests for singular derivation and local naming.

use super::*;
use rstest::{fixture, rstest};

#[fixture]
fn resolver() -> NamingResolver {
    NamingResolver::new(&SynthesisConfig::default())
}

#[rstest]
#[case::plain("tags", "tag")]
#[case::camel("accountHolders", "accountHolder")]
#[case::ies("categories", "category")]
#[case::quy("soliloquies", "soliloquy")]
#[case::ches("matches", "match")]
#[case::xes("boxes", "box")]
#[case::ves("knives", "knife")]
#[case::lves("shelves", "shelf")]
#[case::irregular("people", "person")]
#[case::irregular_segment("childPeople", "childPerson")]
#[case::irregular_capital("adultChildren", "adultChild")]
#[case::latin("data", "datum")]
#[case::matrix("matrices", "matrix")]
#[case::status("statuses", "status")]
#[case::acronym("URLs", "URL")]
fn singularizes_plurals(#[case] plural: &str, #[case] expected: &str) {
    assert_eq!(EnglishInflector.singularize(plural), expected);
}

#[rstest]
#[case::already_singular("tag", Suppression::AlreadySingular)]
#[case::status("status", Suppression::AlreadySingular)]
#[case::uncountable("sheep", Suppression::AlreadySingular)]
#[case::reserved("classes", Suppression::Reserved)]
#[case::reserved_int("ints", Suppression::Reserved)]
#[case::core_type("Strings", Suppression::CoreType)]
#[case::core_type_objects("Objects", Suppression::CoreType)]
fn suppresses_unusable_singulars(
    resolver: NamingResolver,
    #[case] name: &str,
    #[case] reason: Suppression,
) {
    assert_eq!(resolver.resolve_singular(name), Err(reason));
    assert_eq!(resolver.singular(name), None);
}

#[rstest]
fn core_type_check_is_case_sensitive(resolver: NamingResolver) {
    assert_eq!(resolver.singular("strings").as_deref(), Some("string"));
}

struct Fixed(&'static str);

impl Singularize for Fixed {
    fn singularize(&self, _word: &str) -> String {
        self.0.to_owned()
    }
}

#[test]
fn empty_singular_is_suppressed() {
    let resolver = NamingResolver::with_inflector(&SynthesisConfig::default(), Fixed(""));
    assert_eq!(resolver.resolve_singular("things"), Err(Suppression::Empty));
}

#[rstest]
#[case::free("entry", &[], "entry")]
#[case::one_clash("entry", &["entry"], "_entry")]
#[case::chain("that", &["that", "_that"], "__that")]
#[case::unrelated("result", &["_result"], "result")]
fn local_names_avoid_scope(
    resolver: NamingResolver,
    #[case] candidate: &str,
    #[case] scope: &[&str],
    #[case] expected: &str,
) {
    assert_eq!(resolver.local_name(candidate, scope), expected);
}

#[rstest]
#[case::adder(adder_name("tag"), "addTag")]
#[case::adder_camel(adder_name("accountHolder"), "addAccountHolder")]
#[case::putter(putter_name("entry"), "putEntry")]
#[case::acronym(adder_name("URL"), "addURL")]
#[case::underscore(adder_name("raw_item"), "addRaw_item")]
#[case::putter_underscore(putter_name("raw_entry"), "putRaw_entry")]
#[case::non_ascii(adder_name("ärger"), "addÄrger")]
fn convenience_names_capitalize_only_the_first_letter(#[case] got: String, #[case] expected: &str) {
    assert_eq!(got, expected);
}

#[rstest]
fn acronym_and_lowercase_fields_get_distinct_adders(resolver: NamingResolver) {
    let upper = resolver.singular("URLs").map(|s| adder_name(&s));
    let lower = resolver.singular("urls").map(|s| adder_name(&s));
    assert_eq!(upper.as_deref(), Some("addURL"));
    assert_eq!(lower.as_deref(), Some("addUrl"));
}
