#![expect(clippy::unwrap_used, reason = "Tests use unwrap for brevity")]

use std::collections::BTreeMap;

use pretty_assertions::assert_eq;
use stencil_runtime::Value;

fn render(name: &str, vars: Vec<(&str, Value)>) -> String {
    stencil_e2e::environment().render(name, vars).unwrap()
}

fn list<T: Into<Value>>(items: Vec<T>) -> Value {
    Value::List(items.into_iter().map(Into::into).collect())
}

#[test]
fn conditionals() {
    assert_eq!(render("size", vec![("x", Value::Int(2))]), "big");
    assert_eq!(render("size", vec![("x", Value::Int(0))]), "small");
}

#[test]
fn parenthesized_tag_headers() {
    assert_eq!(render("paren_size", vec![("x", Value::Int(2))]), "big");
    assert_eq!(render("paren_size", vec![("x", Value::Int(0))]), "small");
    assert_eq!(render("paren_items", vec![("items", list(vec![1, 2, 3]))]), "123");
}

#[test]
fn arithmetic_precedence() {
    assert_eq!(render("math", vec![]), "14");
}

#[test]
fn loop_with_else() {
    assert_eq!(render("digits", vec![("xs", list(vec![1, 2, 3]))]), "123");
    assert_eq!(render("digits", vec![("xs", list(Vec::<i64>::new()))]), "none");
}

#[test]
fn nested_loops_keep_their_own_counters() {
    let rows = Value::List(vec![list(vec!["a", "b"]), list(vec!["c"])]);
    assert_eq!(render("grid", vec![("rows", rows)]), "1a2b|a1;1c|c2;");
}

#[test]
fn inner_loop_variables_do_not_leak_into_the_outer_loop() {
    let vars = vec![("xs", list(vec![1, 2])), ("ys", list(vec![7]))];
    assert_eq!(render("shadow", vars), "[1][1]");
}

#[test]
fn key_value_loop_over_map() {
    let prices: BTreeMap<String, Value> =
        BTreeMap::from([("apple".to_string(), Value::Int(3)), ("pear".to_string(), Value::Int(5))]);
    assert_eq!(
        render("prices", vec![("prices", Value::Map(prices))]),
        "apple=3, pear=5"
    );
}

#[test]
fn switch_picks_matching_case() {
    assert_eq!(render("kind", vec![("kind", Value::from("a"))]), "alpha");
    assert_eq!(render("kind", vec![("kind", Value::from("b"))]), "beta");
    assert_eq!(render("kind", vec![("kind", Value::from("z"))]), "other");
}

#[test]
fn include_shares_variables_and_globals() {
    assert_eq!(
        render("page", vec![("title", Value::from("<Home>"))]),
        "<h1>Stencil: &lt;Home&gt;</h1>"
    );
}

#[test]
fn escaping_and_raw() {
    assert_eq!(
        render("escape", vec![("html", Value::from("<b>&</b>"))]),
        "&lt;b&gt;&amp;&lt;/b&gt;|<b>&</b>"
    );
}

#[test]
fn failing_render_uses_error_template() {
    assert_eq!(render("failing", vec![]), "Error: division by zero");
}

#[test]
fn host_functions() {
    assert_eq!(
        render(
            "host",
            vec![("title", Value::from("Hello World")), ("name", Value::from("ana"))]
        ),
        "hello-world|Hi, ana|ANA!"
    );
}

#[test]
fn unknown_template_falls_back_to_error_template() {
    assert_eq!(render("nope", vec![]), "Error: template `nope` not found");
}

#[test]
fn nested_template_units_are_includable() {
    assert_eq!(
        render("cards", vec![("titles", list(vec!["a", "b"]))]),
        "[a][b]"
    );
    assert_eq!(render("card", vec![("title", Value::from("x"))]), "[x]");
}

#[test]
fn set_and_conditional_operator() {
    let vars = |price: i64| vec![("price", Value::Int(price)), ("qty", Value::Int(4))];
    assert_eq!(render("order", vars(30)), "120 large");
    assert_eq!(render("order", vars(5)), "20 small");
}

#[test]
fn methods_and_functions() {
    assert_eq!(
        render("strings", vec![("s", Value::from("a,b,a"))]),
        "o,b,o|3|A,B,A"
    );
}

#[test]
fn test_operators() {
    assert_eq!(render("tests", vec![("n", Value::Int(4))]), "even nd3 unset listed");
    assert_eq!(render("tests", vec![("n", Value::Int(3))]), " unset");
}

#[test]
fn inclusive_range() {
    assert_eq!(render("range", vec![]), "123");
}

#[test]
fn membership_in_a_range() {
    assert_eq!(render("membership", vec![("x", Value::Int(2))]), "in");
    assert_eq!(render("membership", vec![("x", Value::Int(5))]), "out");
}

#[test]
fn trim_markers() {
    assert_eq!(render("trim", vec![("name", Value::from("Ana"))]), "Hello,Ana!");
    assert_eq!(render("trim", vec![("name", Value::Null)]), "Hello,!");
}
