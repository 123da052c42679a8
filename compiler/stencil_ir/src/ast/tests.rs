use pretty_assertions::assert_eq;

use super::*;

fn var(arena: &mut NodeArena, name: &str) -> NodeId {
    arena.alloc(NodeKind::Variable(name.to_string()), 1)
}

#[test]
fn operator_children_follow_slot_order() {
    let mut arena = NodeArena::new();
    let cond = var(&mut arena, "c");
    let then = var(&mut arena, "a");
    let other = var(&mut arena, "b");
    let ternary = arena.alloc(
        NodeKind::Operator {
            operator: OperatorId::new(0),
            operands: Operands {
                left: Some(cond),
                middle: Some(then),
                right: Some(other),
            },
        },
        1,
    );

    assert_eq!(arena.children(ternary).as_slice(), &[cond, then, other]);
}

#[test]
fn function_children_start_with_receiver() {
    let mut arena = NodeArena::new();
    let recv = var(&mut arena, "s");
    let arg = arena.alloc(NodeKind::Data(DataValue::String(",".into())), 1);
    let call = arena.alloc(
        NodeKind::Function {
            callee: Callee::Named("split".into()),
            receiver: Some(recv),
            args: vec![arg],
        },
        1,
    );

    assert_eq!(arena.children(call).as_slice(), &[recv, arg]);
}

#[test]
fn any_descendant_skips_the_node_itself() {
    let mut arena = NodeArena::new();
    let inner = arena.alloc(
        NodeKind::Tag {
            tag: TagId::new(1),
            children: vec![],
        },
        2,
    );
    let body = arena.alloc(
        NodeKind::Block {
            children: vec![inner],
        },
        1,
    );
    let outer = arena.alloc(
        NodeKind::Tag {
            tag: TagId::new(1),
            children: vec![body],
        },
        1,
    );

    let is_loop = |n: &Node| matches!(n.kind, NodeKind::Tag { tag, .. } if tag == TagId::new(1));
    assert!(arena.any_descendant(outer, is_loop));
    assert!(!arena.any_descendant(inner, is_loop));
}

#[test]
fn operands_get_and_set() {
    let mut operands = Operands::default();
    operands.set(Slot::Right, NodeId::new(4));
    assert_eq!(operands.get(Slot::Right), Some(NodeId::new(4)));
    assert_eq!(operands.get(Slot::Left), None);
    assert_eq!(operands.iter().count(), 1);
}

#[test]
fn invalid_id_is_not_valid() {
    assert!(!NodeId::INVALID.is_valid());
    assert!(NodeId::new(0).is_valid());
    assert_eq!(format!("{:?}", NodeId::INVALID), "NodeId::INVALID");
}

#[test]
fn aux_data_typed_accessors() {
    let mut arena = NodeArena::new();
    let id = var(&mut arena, "x");
    arena[id].aux.set("needs_temp", true);
    arena[id].aux.set("key_var", "k");

    assert!(arena[id].aux.bool_or("needs_temp", false));
    assert!(arena[id].aux.bool_or("missing", true));
    assert_eq!(arena[id].aux.str("key_var"), Some("k"));
    assert_eq!(arena[id].aux.int("key_var"), None);
}
