#![expect(clippy::unwrap_used, reason = "Tests use unwrap for brevity")]

use pretty_assertions::assert_eq;
use stencil_diagnostic::ErrorCode;
use stencil_ir::{DataValue, NodeArena, NodeKind, Operands};
use stencil_lexer::{tokenize, Delimiters};

use super::*;
use crate::builtin::CoreExtension;
use crate::optimize::Optimizer;
use crate::parse::parse;
use crate::Extension;

fn registries() -> Registries {
    let extensions: Vec<Box<dyn Extension>> = vec![Box::new(CoreExtension)];
    Registries::build(&extensions).unwrap()
}

fn try_compile(src: &str) -> Result<String, CompileError> {
    let registries = registries();
    let tokens = tokenize(src, &registries.lexer_config(Delimiters::default())).unwrap();
    let mut arena = parse(tokens, &registries, None).unwrap();
    Optimizer::with_default_passes().run(&mut arena, &registries);
    compile("page", "stencil", &arena, &registries)
}

fn compiled(src: &str) -> String {
    try_compile(src).unwrap()
}

/// The single expression `print` writes for `{{ src }}`.
fn printed(src: &str) -> String {
    let module = compiled(&format!("{{{{ {src} }}}}"));
    let line = module
        .lines()
        .find(|l| l.contains("__out.write_"))
        .unwrap()
        .trim();
    line.strip_prefix("__out.write_escaped(&")
        .or_else(|| line.strip_prefix("__out.write_value(&"))
        .and_then(|l| l.strip_suffix(");"))
        .unwrap()
        .to_string()
}

#[test]
fn module_skeleton() {
    let module = compiled("hello");
    assert!(module.contains("pub mod stencil_page {\n"), "{module}");
    assert!(module.contains("    use ::stencil_runtime::prelude::*;\n"), "{module}");
    assert!(module.contains("    pub struct Template;\n"), "{module}");
    assert!(module.contains("    impl Renderable for Template {\n"), "{module}");
    assert!(module.contains("            \"page\"\n"), "{module}");
    assert!(
        module.contains("            __out.write_str(\"hello\");\n            Ok(())\n"),
        "{module}"
    );
    assert!(module.contains("        vec![Box::new(Template)]\n"), "{module}");
    assert!(module.ends_with("    }\n}\n"), "{module}");
}

#[test]
fn text_is_written_verbatim() {
    let module = compiled("<b>\"quoted\"</b>\n");
    assert!(
        module.contains(r#"__out.write_str("<b>\"quoted\"</b>\n");"#),
        "{module}"
    );
}

#[test]
fn output_is_escaped_unless_safe() {
    let module = compiled("{{ name }}{{ raw(html) }}");
    assert!(module.contains("__out.write_escaped(&__ctx.get(\"name\"));"), "{module}");
    assert!(
        module.contains("__out.write_value(&functions::raw(&[__ctx.get(\"html\")])?);"),
        "{module}"
    );
}

#[test]
fn arithmetic() {
    assert_eq!(
        printed("2 + 3 * 4"),
        "ops::add(&Value::Int(2), &ops::mul(&Value::Int(3), &Value::Int(4))?)?"
    );
    assert_eq!(printed("-x"), "ops::neg(&__ctx.get(\"x\"))?");
    assert_eq!(printed("1.5"), "Value::Float(1.5)");
}

#[test]
fn logical_operators_short_circuit() {
    assert_eq!(
        printed("a and not b"),
        "Value::Bool((__ctx.get(\"a\")).is_truthy() && (Value::Bool(!(__ctx.get(\"b\")).is_truthy())).is_truthy())"
    );
}

#[test]
fn tests_and_negations() {
    assert_eq!(printed("x is empty"), "ops::is_empty(&__ctx.get(\"x\"))?");
    assert_eq!(
        printed("x is not empty"),
        "Value::Bool(!(ops::is_empty(&__ctx.get(\"x\"))?).is_truthy())"
    );
    assert_eq!(printed("x is set"), "Value::Bool(__ctx.contains(\"x\"))");
    assert_eq!(printed("x.y is set"), "ops::is_set(&ops::index(&__ctx.get(\"x\"), &Value::from(\"y\"))?)?");
    assert_eq!(
        printed("n is divisible by 3"),
        "ops::divisible_by(&__ctx.get(\"n\"), &Value::Int(3))?"
    );
    assert_eq!(
        printed("x not in xs"),
        "Value::Bool(!(ops::contains(&__ctx.get(\"x\"), &__ctx.get(\"xs\"))?).is_truthy())"
    );
}

#[test]
fn conditional_operator() {
    assert_eq!(
        printed("a ? 1 : 2"),
        "(if (__ctx.get(\"a\")).is_truthy() { Value::Int(1) } else { Value::Int(2) })"
    );
}

#[test]
fn indexing_and_lists() {
    assert_eq!(printed("xs[0]"), "ops::index(&__ctx.get(\"xs\"), &Value::Int(0))?");
    assert_eq!(
        printed("user.name"),
        "ops::index(&__ctx.get(\"user\"), &Value::from(\"name\"))?"
    );
    assert_eq!(printed("[1, \"a\"]"), "Value::List(vec![Value::Int(1), Value::from(\"a\")])");
}

#[test]
fn calls_by_invocation_kind() {
    assert_eq!(printed("upper(name)"), "functions::upper(&[__ctx.get(\"name\")])?");
    assert_eq!(
        printed("s.replace(\"a\", \"b\")"),
        "__env.call_method(&__ctx.get(\"s\"), \"replace\", &[Value::from(\"a\"), Value::from(\"b\")])?"
    );
    assert_eq!(
        printed("greet(name)"),
        "self.call_helper(__env, \"greet\", &[__ctx.get(\"name\")])?"
    );
}

#[test]
fn if_elseif_else() {
    let module = compiled("{% if x %}a{% elseif y %}b{% else %}c{% endif %}");
    let expected = "            if (__ctx.get(\"x\")).is_truthy() {\n\
                    \x20               __out.write_str(\"a\");\n\
                    \x20           } else if (__ctx.get(\"y\")).is_truthy() {\n\
                    \x20               __out.write_str(\"b\");\n\
                    \x20           } else {\n\
                    \x20               __out.write_str(\"c\");\n\
                    \x20           }\n\
                    \x20           Ok(())\n";
    assert!(module.contains(expected), "{module}");
}

#[test]
fn simple_loop_without_state_local() {
    let module = compiled("{% for v in xs %}{{ v }}{% endfor %}");
    let expected = "            __ctx.push_scope();\n\
                    \x20           let _tmp0 = (__ctx.get(\"xs\")).iter_entries()?;\n\
                    \x20           let _tmp3 = _tmp0.len();\n\
                    \x20           for (_tmp4, (_tmp1, _tmp2)) in _tmp0.into_iter().enumerate() {\n\
                    \x20               __ctx.set(\"v\", _tmp2);\n\
                    \x20               __ctx.set(\"loop\", LoopState::at(_tmp4, _tmp3).to_value());\n\
                    \x20               __out.write_escaped(&__ctx.get(\"v\"));\n\
                    \x20           }\n\
                    \x20           __ctx.pop_scope();\n";
    assert!(module.contains(expected), "{module}");
}

#[test]
fn key_value_loop() {
    let module = compiled("{% for k, v in m %}{% endfor %}");
    assert!(module.contains("__ctx.set(\"k\", _tmp1);"), "{module}");
    assert!(module.contains("__ctx.set(\"v\", _tmp2);"), "{module}");
}

#[test]
fn nested_loops_share_scope() {
    let module = compiled("{% for a in xs %}{% for b in a %}{{ b }}{% endfor %}{{ a }}{% endfor %}");
    assert_eq!(module.matches("__ctx.push_scope();").count(), 1, "{module}");
    assert_eq!(module.matches("__ctx.pop_scope();").count(), 1, "{module}");
    assert!(module.contains("let mut _tmp3 = LoopState::new(_tmp0.len());"), "{module}");
    assert_eq!(module.matches("__ctx.set(\"a\", _tmp2);").count(), 1, "{module}");
    assert!(module.contains("_tmp3.advance();"), "{module}");
    // The inner loop undoes its writes to the shared scope.
    let checkpoint = module.find("let _tmp4 = __ctx.checkpoint();").unwrap();
    let rollback = module.find("__ctx.rollback(_tmp4);").unwrap();
    let print_a = module.find("__out.write_escaped(&__ctx.get(\"a\"));").unwrap();
    assert!(checkpoint < rollback && rollback < print_a, "{module}");
}

#[test]
fn loop_else_runs_outside_the_loop_scope() {
    let module = compiled("{% for v in xs %}x{% else %}none{% endfor %}");
    assert!(module.contains("let _tmp1 = _tmp0.is_empty();"), "{module}");
    let expected = "            __ctx.pop_scope();\n\
                    \x20           if _tmp1 {\n\
                    \x20               __out.write_str(\"none\");\n\
                    \x20           }\n";
    assert!(module.contains(expected), "{module}");
}

#[test]
fn switch_chain() {
    let module = compiled("{% switch x %}{% case 1 %}one{% case 2 %}two{% default %}other{% endswitch %}");
    let expected = "            let _tmp0 = __ctx.get(\"x\");\n\
                    \x20           if ops::matches_case(&_tmp0, &Value::Int(1)) {\n\
                    \x20               __out.write_str(\"one\");\n\
                    \x20           } else if ops::matches_case(&_tmp0, &Value::Int(2)) {\n\
                    \x20               __out.write_str(\"two\");\n\
                    \x20           } else {\n\
                    \x20               __out.write_str(\"other\");\n\
                    \x20           }\n";
    assert!(module.contains(expected), "{module}");
}

#[test]
fn switch_with_only_default() {
    let module = compiled("{% switch x %}{% default %}d{% endswitch %}");
    let expected = "            let _tmp0 = __ctx.get(\"x\");\n\
                    \x20           {\n\
                    \x20               __out.write_str(\"d\");\n\
                    \x20           }\n\
                    \x20           Ok(())\n";
    assert!(module.contains(expected), "{module}");
}

#[test]
fn set_and_include() {
    let module = compiled("{% set total = 1 %}{% include \"header\" %}");
    assert!(module.contains("let _tmp0 = Value::Int(1);\n"), "{module}");
    assert!(module.contains("__ctx.set(\"total\", _tmp0);\n"), "{module}");
    assert!(module.contains("let _tmp1 = Value::from(\"header\");\n"), "{module}");
    assert!(module.contains("__env.include(&_tmp1, __ctx, __out)?;\n"), "{module}");
}

#[test]
fn nested_template_gets_its_own_unit() {
    let module = compiled("a{% template card %}b{% endtemplate %}c");
    assert!(module.contains("pub struct Template_card;"), "{module}");
    assert!(module.contains("\"card\"\n"), "{module}");
    assert!(
        module.contains("vec![Box::new(Template), Box::new(Template_card)]"),
        "{module}"
    );
    let card = module.find("impl Renderable for Template_card").unwrap();
    let b = module.find("__out.write_str(\"b\");").unwrap();
    let c = module.find("__out.write_str(\"c\");").unwrap();
    assert!(c < card && card < b, "{module}");
}

#[test]
fn duplicate_unit_names() {
    let err = try_compile("{% template a %}{% endtemplate %}{% template a %}{% endtemplate %}").unwrap_err();
    assert_eq!(err.code, ErrorCode::E2002);
    assert!(err.message.contains("`a` is defined twice"), "{}", err.message);

    let err = try_compile("{% template page %}{% endtemplate %}").unwrap_err();
    assert_eq!(err.code, ErrorCode::E2002);
}

#[test]
fn unit_names_colliding_as_identifiers() {
    let err = try_compile("{% template Card %}{% endtemplate %}{% template card %}{% endtemplate %}")
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::E2003);
    assert_eq!(err.message, "`card` and `Card` both compile to `Template_card`");
    assert_eq!(err.line, 1);
}

#[test]
fn module_names_are_identifiers() {
    assert_eq!(module_name("stencil", "emails/Welcome-2"), "stencil_emails_welcome_2");
    assert_eq!(module_name("app", "9lives"), "app__9lives");
    assert_eq!(module_name("app", ""), "app__");
}

#[test]
fn missing_operand_is_reported() {
    let registries = registries();
    let (add, _) = registries
        .operators
        .iter()
        .find(|(_, d)| d.name == "add")
        .unwrap();
    let print = registries.tags.lookup("print").unwrap();

    let mut arena = NodeArena::new();
    let one = arena.alloc(NodeKind::Data(DataValue::Int(1)), 4);
    let op = arena.alloc(
        NodeKind::Operator {
            operator: add,
            operands: Operands {
                left: Some(one),
                ..Operands::default()
            },
        },
        4,
    );
    let tag = arena.alloc(
        NodeKind::Tag {
            tag: print,
            children: vec![op],
        },
        4,
    );
    let root = arena.alloc(NodeKind::Root { children: vec![tag] }, 1);
    arena.set_root(root);

    let err = compile("page", "stencil", &arena, &registries).unwrap_err();
    assert_eq!(err.code, ErrorCode::E2001);
    assert_eq!(err.message, "operator `add` is missing its right operand");
    assert_eq!(err.line, 4);
}

#[test]
fn expression_in_statement_position() {
    let registries = registries();
    let mut arena = NodeArena::new();
    let var = arena.alloc(NodeKind::Variable("x".into()), 2);
    let root = arena.alloc(NodeKind::Root { children: vec![var] }, 1);
    arena.set_root(root);
    let err = compile("page", "stencil", &arena, &registries).unwrap_err();
    assert_eq!(err.code, ErrorCode::E2002);
    assert_eq!(err.line, 2);
}
