use replay_engine::variables::{VarValue, VariableStore, substitute};

fn vars(pairs: &[(&str, VarValue)]) -> VariableStore {
    let mut store = VariableStore::new();
    for (name, value) in pairs {
        store.set(*name, value.clone());
    }
    store
}

#[test]
fn test_plain_placeholder() {
    let v = vars(&[("a", "x".into())]);
    assert_eq!(substitute(Some("${a}"), &v), "x");
    assert_eq!(substitute(Some("Hello ${a}!"), &v), "Hello x!");
}

#[test]
fn test_negated_placeholder() {
    let v = vars(&[("a", true.into()), ("b", false.into()), ("s", "text".into())]);
    assert_eq!(substitute(Some("${!a}"), &v), "false");
    assert_eq!(substitute(Some("${!b}"), &v), "true");
    assert_eq!(substitute(Some("${!s}"), &v), "false");
}

#[test]
fn test_negating_empty_or_missing_is_true() {
    let v = vars(&[("empty", "".into())]);
    assert_eq!(substitute(Some("${!empty}"), &v), "true");
    assert_eq!(substitute(Some("${!missing}"), &v), "true");
}

#[test]
fn test_missing_variable_is_empty() {
    let v = VariableStore::new();
    assert_eq!(substitute(Some("${missing}"), &v), "");
    assert_eq!(substitute(Some("[${missing}]"), &v), "[]");
}

#[test]
fn test_bool_values_render_as_words() {
    let v = vars(&[("found", true.into())]);
    assert_eq!(substitute(Some("found=${found}"), &v), "found=true");
}

#[test]
fn test_absent_template_is_empty() {
    assert_eq!(substitute(None, &VariableStore::new()), "");
}

#[test]
fn test_no_placeholders_is_identity() {
    let v = vars(&[("a", "x".into())]);
    for template in ["", "plain", "css=#name", "//div[@id='a']", "$a {a} $ {a}"] {
        assert_eq!(substitute(Some(template), &v), template);
    }
}

#[test]
fn test_substitution_is_not_recursive() {
    let v = vars(&[("outer", "${inner}".into()), ("inner", "deep".into())]);
    assert_eq!(substitute(Some("${outer}"), &v), "${inner}");
}

#[test]
fn test_malformed_placeholders_pass_through() {
    let v = vars(&[("a", "x".into())]);
    assert_eq!(substitute(Some("${a"), &v), "${a");
    assert_eq!(substitute(Some("${a-b}"), &v), "${a-b}");
    assert_eq!(substitute(Some("${}"), &v), "${}");
    assert_eq!(substitute(Some("${!!a}"), &v), "${!!a}");
    assert_eq!(substitute(Some("${ a }"), &v), "${ a }");
}

#[test]
fn test_multiple_placeholders_left_to_right() {
    let v = vars(&[("first", "Ada".into()), ("last", "Lovelace".into())]);
    assert_eq!(
        substitute(Some("${first} ${last} (${!first})"), &v),
        "Ada Lovelace (false)"
    );
}

#[test]
fn test_word_characters_in_names() {
    let v = vars(&[("field_2", "ok".into())]);
    assert_eq!(substitute(Some("${field_2}"), &v), "ok");
}

#[test]
fn test_store_method_delegates() {
    let v = vars(&[("a", "x".into())]);
    assert_eq!(v.substitute(Some("${a}${a}")), "xx");
}

#[test]
fn test_non_ascii_names_pass_through_literally() {
    let v = vars(&[("café", "x".into())]);
    assert_eq!(substitute(Some("${café}"), &v), "${café}");
    assert_eq!(substitute(Some("${naïve}"), &VariableStore::new()), "${naïve}");
    assert_eq!(substitute(Some("${!naïve}"), &VariableStore::new()), "${!naïve}");
    assert_eq!(
        substitute(Some("${cafe_2} ${café}"), &vars(&[("cafe_2", "ok".into())])),
        "ok ${café}"
    );
}
