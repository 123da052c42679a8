#![expect(clippy::unwrap_used, reason = "Tests use unwrap for brevity")]

use parking_lot::Mutex;
use pretty_assertions::assert_eq;
use stencil_ir::{NodeArena, NodeId, NodeKind};
use stencil_lexer::{tokenize, Delimiters};

use super::*;
use crate::builtin::CoreExtension;
use crate::parse::parse;
use crate::{dump_tree, Extension};

fn registries() -> Registries {
    let extensions: Vec<Box<dyn Extension>> = vec![Box::new(CoreExtension)];
    Registries::build(&extensions).unwrap()
}

fn parsed(src: &str, registries: &Registries) -> NodeArena {
    let tokens = tokenize(src, &registries.lexer_config(Delimiters::default())).unwrap();
    parse(tokens, registries, None).unwrap()
}

fn optimized(src: &str) -> String {
    let registries = registries();
    let mut arena = parsed(src, &registries);
    Optimizer::with_default_passes().run(&mut arena, &registries);
    dump_tree(&arena, &registries)
}

#[test]
fn single_loop_needs_nothing() {
    assert_eq!(
        optimized("{% for a in xs %}{% endfor %}"),
        "root\n\
         \x20 tag for {has_else: false, needs_temp: false, reuse_context: false, value_var: \"a\"} @1\n\
         \x20   variable xs @1\n\
         \x20   block @1\n"
    );
}

#[test]
fn nested_loops() {
    assert_eq!(
        optimized("{% for a in xs %}{% for b in ys %}{% endfor %}{% endfor %}"),
        "root\n\
         \x20 tag for {has_else: false, needs_temp: true, reuse_context: false, value_var: \"a\"} @1\n\
         \x20   variable xs @1\n\
         \x20   block @1\n\
         \x20     tag for {has_else: false, needs_temp: false, reuse_context: true, value_var: \"b\"} @1\n\
         \x20       variable ys @1\n\
         \x20       block @1\n"
    );
}

#[test]
fn loop_nested_through_other_blocks() {
    let dump = optimized("{% for a in xs %}{% if a %}{% for b in a %}{% endfor %}{% endif %}{% endfor %}");
    assert!(dump.contains("needs_temp: true, reuse_context: false, value_var: \"a\""), "{dump}");
    assert!(dump.contains("needs_temp: false, reuse_context: true, value_var: \"b\""), "{dump}");
}

#[test]
fn nested_template_starts_a_fresh_loop_context() {
    let dump = optimized(
        "{% for a in xs %}{% template row %}{% for b in ys %}{% endfor %}{% endtemplate %}{% endfor %}",
    );
    assert!(dump.contains("reuse_context: false, value_var: \"b\""), "{dump}");
}

#[test]
fn output_safety() {
    assert_eq!(
        optimized("a{{ x }}{{ raw(x) }}{{ upper(x) }}"),
        "root\n\
         \x20 tag print {safe: true, text: true} @1\n\
         \x20   data \"a\" @1\n\
         \x20 tag print {safe: false} @1\n\
         \x20   variable x @1\n\
         \x20 tag print {safe: true} @1\n\
         \x20   call raw @1\n\
         \x20     variable x @1\n\
         \x20 tag print {safe: false} @1\n\
         \x20   call upper @1\n\
         \x20     variable x @1\n"
    );
}

#[test]
fn safe_function_nested_in_expression_is_not_safe() {
    let dump = optimized("{{ raw(x) ~ y }}");
    assert!(dump.contains("tag print {safe: false} @1"), "{dump}");
}

#[test]
fn running_twice_changes_nothing() {
    let registries = registries();
    let mut arena = parsed(
        "{% for a in xs %}{{ a }}{% for b in a %}{{ raw(b) }}{% endfor %}{% endfor %}",
        &registries,
    );
    let optimizer = Optimizer::with_default_passes();
    optimizer.run(&mut arena, &registries);
    let once = arena.aux_snapshot();
    optimizer.run(&mut arena, &registries);
    assert_eq!(arena.aux_snapshot(), once);
}

struct Named(&'static str, i32);

impl Pass for Named {
    fn name(&self) -> &'static str {
        self.0
    }

    fn priority(&self) -> i32 {
        self.1
    }
}

#[test]
fn passes_are_ordered_by_priority_then_insertion() {
    let mut optimizer = Optimizer::new();
    optimizer.add_pass(Box::new(Named("late", 10)));
    optimizer.add_pass(Box::new(Named("early", 0)));
    optimizer.add_pass(Box::new(Named("late-again", 10)));
    optimizer.add_pass(Box::new(Named("first", -5)));
    let names: Vec<_> = optimizer.pass_names().collect();
    assert_eq!(names, vec!["first", "early", "late", "late-again"]);
}

#[test]
fn default_passes() {
    let names: Vec<_> = Optimizer::with_default_passes().pass_names().collect();
    assert_eq!(names, vec!["loop-context", "output-safety"]);
}

/// Records tag visits as `enter <keyword> <depth>` / `leave <keyword>`.
#[derive(Default)]
struct Recorder {
    events: Mutex<Vec<String>>,
}

impl Recorder {
    fn keyword(arena: &NodeArena, node: NodeId, cx: &PassContext<'_>) -> Option<&'static str> {
        match arena[node].kind {
            NodeKind::Tag { tag, .. } => Some(cx.registries.tags.get(tag).keyword()),
            _ => None,
        }
    }
}

impl Pass for Recorder {
    fn name(&self) -> &'static str {
        "recorder"
    }

    fn priority(&self) -> i32 {
        0
    }

    fn enter(&self, arena: &mut NodeArena, node: NodeId, cx: &PassContext<'_>) {
        if let Some(keyword) = Self::keyword(arena, node, cx) {
            self.events
                .lock()
                .push(format!("enter {keyword} {}", cx.ancestors.len()));
        }
    }

    fn leave(&self, arena: &mut NodeArena, node: NodeId, cx: &PassContext<'_>) {
        if let Some(keyword) = Self::keyword(arena, node, cx) {
            self.events.lock().push(format!("leave {keyword}"));
        }
    }
}

#[test]
fn enter_and_leave_bracket_children() {
    let registries = registries();
    let mut arena = parsed("{% if a %}x{% endif %}{{ y }}", &registries);
    let recorder = std::sync::Arc::new(Recorder::default());

    struct Shared(std::sync::Arc<Recorder>);
    impl Pass for Shared {
        fn name(&self) -> &'static str {
            "shared"
        }
        fn priority(&self) -> i32 {
            0
        }
        fn enter(&self, arena: &mut NodeArena, node: NodeId, cx: &PassContext<'_>) {
            self.0.enter(arena, node, cx);
        }
        fn leave(&self, arena: &mut NodeArena, node: NodeId, cx: &PassContext<'_>) {
            self.0.leave(arena, node, cx);
        }
    }

    let mut optimizer = Optimizer::new();
    optimizer.add_pass(Box::new(Shared(std::sync::Arc::clone(&recorder))));
    optimizer.run(&mut arena, &registries);

    // Root, if, block: the text's print tag sits three levels down.
    assert_eq!(
        *recorder.events.lock(),
        vec![
            "enter if 1",
            "enter print 3",
            "leave print",
            "leave if",
            "enter print 1",
            "leave print",
        ]
    );
}
