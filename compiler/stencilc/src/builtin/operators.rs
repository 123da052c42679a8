//! Operators of the `core` extension and their code generation strategies.
//!
//! Precedence, lowest first:
//!
//! | prec | operators |
//! |------|-----------|
//! | 5    | `? :` (right) |
//! | 10   | `or` `\|\|` |
//! | 11   | `xor` |
//! | 12   | `and` `&&` |
//! | 15   | `not` `!` (prefix) |
//! | 20   | comparisons, `is`, tests |
//! | 25   | `in` `not in` `..` |
//! | 30   | `~` |
//! | 40   | `+` `-` |
//! | 60   | `*` `/` `%` |
//! | 70   | `-` `+` (prefix) |
//! | 80   | `**` (right) |

use stencil_ir::{NodeId, NodeKind, Slot};

use crate::codegen::{CompileError, Compiler};
use crate::registry::{Arity, Associativity, CompileOperator, OperatorDefinition};

/// `ops::<helper>(&left, &right)?`
pub struct BinaryHelper(pub &'static str);

impl CompileOperator for BinaryHelper {
    fn compile(&self, c: &mut Compiler<'_>, node: NodeId) -> Result<String, CompileError> {
        let left = c.operand(node, Slot::Left)?;
        let right = c.operand(node, Slot::Right)?;
        Ok(format!("ops::{}(&{left}, &{right})?", self.0))
    }
}

/// `ops::<helper>(&right)?` for prefix operators.
pub struct UnaryHelper(pub &'static str);

impl CompileOperator for UnaryHelper {
    fn compile(&self, c: &mut Compiler<'_>, node: NodeId) -> Result<String, CompileError> {
        let operand = c.operand(node, Slot::Right)?;
        Ok(format!("ops::{}(&{operand})?", self.0))
    }
}

/// `ops::<helper>(&left)?` for tests without an argument.
pub struct TestHelper(pub &'static str);

impl CompileOperator for TestHelper {
    fn compile(&self, c: &mut Compiler<'_>, node: NodeId) -> Result<String, CompileError> {
        let subject = c.operand(node, Slot::Left)?;
        Ok(format!("ops::{}(&{subject})?", self.0))
    }
}

/// `is set`: a bare variable checks the scope, anything else checks for
/// `null`.
pub struct IsSet;

impl CompileOperator for IsSet {
    fn compile(&self, c: &mut Compiler<'_>, node: NodeId) -> Result<String, CompileError> {
        let subject = c.operand_node(node, Slot::Left)?;
        if let NodeKind::Variable(name) = &c.node(subject)?.kind {
            return Ok(format!("Value::Bool(__ctx.contains({name:?}))"));
        }
        let subject = c.expression(subject)?;
        Ok(format!("ops::is_set(&{subject})?"))
    }
}

/// Short-circuiting `and` / `or`.
pub enum Logical {
    And,
    Or,
}

impl CompileOperator for Logical {
    fn compile(&self, c: &mut Compiler<'_>, node: NodeId) -> Result<String, CompileError> {
        let left = c.operand(node, Slot::Left)?;
        let right = c.operand(node, Slot::Right)?;
        let op = match self {
            Logical::And => "&&",
            Logical::Or => "||",
        };
        Ok(format!(
            "Value::Bool(({left}).is_truthy() {op} ({right}).is_truthy())"
        ))
    }
}

pub struct Not;

impl CompileOperator for Not {
    fn compile(&self, c: &mut Compiler<'_>, node: NodeId) -> Result<String, CompileError> {
        let operand = c.operand(node, Slot::Right)?;
        Ok(format!("Value::Bool(!({operand}).is_truthy())"))
    }
}

pub struct Conditional;

impl CompileOperator for Conditional {
    fn compile(&self, c: &mut Compiler<'_>, node: NodeId) -> Result<String, CompileError> {
        let condition = c.operand(node, Slot::Left)?;
        let then = c.operand(node, Slot::Middle)?;
        let otherwise = c.operand(node, Slot::Right)?;
        Ok(format!(
            "(if ({condition}).is_truthy() {{ {then} }} else {{ {otherwise} }})"
        ))
    }
}

fn binary(name: &str, aliases: &[&str], precedence: u8, helper: &'static str) -> OperatorDefinition {
    OperatorDefinition::binary(name, aliases, precedence, Associativity::Left, BinaryHelper(helper))
}

fn comparison(name: &str, aliases: &[&str], helper: &'static str) -> OperatorDefinition {
    OperatorDefinition::binary(name, aliases, 20, Associativity::None, BinaryHelper(helper))
}

/// Every `core` operator, negated forms next to their positive forms.
pub fn core_operators() -> Vec<OperatorDefinition> {
    let identical = comparison("identical", &["===", "is", "is same as"], "identical");
    let empty = OperatorDefinition::test("empty", &["is empty"], 20, false, TestHelper("is_empty"));
    let set = OperatorDefinition::test("set", &["is set"], 20, false, IsSet);
    let even = OperatorDefinition::test("even", &["is even"], 20, false, TestHelper("is_even"));
    let odd = OperatorDefinition::test("odd", &["is odd"], 20, false, TestHelper("is_odd"));
    let divisible = OperatorDefinition::test(
        "divisible by",
        &["is divisible by"],
        20,
        true,
        BinaryHelper("divisible_by"),
    );
    let like = OperatorDefinition::test("like", &["is like"], 20, true, BinaryHelper("like"));
    let contains = OperatorDefinition::binary("in", &["in"], 25, Associativity::None, BinaryHelper("contains"));

    vec![
        OperatorDefinition::new(
            "conditional",
            &["?"],
            5,
            Associativity::Right,
            Arity::Ternary,
            Conditional,
        ),
        OperatorDefinition::binary("or", &["or", "||"], 10, Associativity::Left, Logical::Or),
        binary("xor", &["xor"], 11, "xor"),
        OperatorDefinition::binary("and", &["and", "&&"], 12, Associativity::Left, Logical::And),
        OperatorDefinition::unary("not", &["not", "!"], 15, Not),
        comparison("equal", &["=="], "eq"),
        comparison("not equal", &["!="], "ne"),
        comparison("less", &["<"], "lt"),
        comparison("less or equal", &["<="], "le"),
        comparison("greater", &[">"], "gt"),
        comparison("greater or equal", &[">="], "ge"),
        identical.negated("not identical", &["!==", "is not", "is not same as"]),
        identical,
        empty.negated("not empty", &["is not empty"]),
        empty,
        set.negated("not set", &["is not set"]),
        set,
        even.negated("not even", &["is not even"]),
        even,
        odd.negated("not odd", &["is not odd"]),
        odd,
        divisible.negated("not divisible by", &["is not divisible by"]),
        divisible,
        like.negated("not like", &["is not like"]),
        like,
        contains.negated("not in", &["not in"]),
        contains,
        binary("range", &[".."], 27, "range"),
        binary("concat", &["~"], 30, "concat"),
        binary("add", &["+"], 40, "add"),
        binary("subtract", &["-"], 40, "sub"),
        binary("multiply", &["*"], 60, "mul"),
        binary("divide", &["/"], 60, "div"),
        binary("remainder", &["%"], 60, "rem"),
        OperatorDefinition::unary("negate", &["-"], 70, UnaryHelper("neg")),
        OperatorDefinition::unary("plus", &["+"], 70, UnaryHelper("pos")),
        OperatorDefinition::binary("power", &["**"], 80, Associativity::Right, BinaryHelper("pow")),
    ]
}
