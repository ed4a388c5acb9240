use pretty_assertions::assert_eq;
use proptest::prelude::*;

use super::*;

fn if_(taken: bool) -> Directive {
    Directive::new(DirectiveKind::If, true, taken)
}

fn elif(taken: bool) -> Directive {
    Directive::new(DirectiveKind::Elif, true, taken)
}

fn else_(taken: bool) -> Directive {
    Directive::new(DirectiveKind::Else, true, taken)
}

fn endif() -> Directive {
    Directive::new(DirectiveKind::EndIf, true, false)
}

fn build(directives: impl IntoIterator<Item = Directive>) -> DirectiveStack {
    directives
        .into_iter()
        .fold(DirectiveStack::EMPTY, |stack, d| stack.add(d))
}

fn kinds(stack: &DirectiveStack) -> Vec<DirectiveKind> {
    stack.iter().map(|d| d.kind).collect()
}

// === is_defined ===

#[test]
fn define_and_undef_short_circuit() {
    let stack = build([Directive::define("A", true)]);
    assert_eq!(stack.is_defined("A"), DefineState::Defined);
    assert_eq!(stack.is_defined("B"), DefineState::Unspecified);

    let stack = stack.add(Directive::undef("A", true));
    assert_eq!(stack.is_defined("A"), DefineState::Undefined);
}

#[test]
fn else_branch_does_not_see_sibling_branch_defines() {
    // #define A / #if X / #undef A / #else -> the #undef belongs to the
    // skipped sibling branch and must not leak.
    let stack = build([
        Directive::define("A", true),
        if_(true),
        Directive::undef("A", true),
        else_(false),
    ]);
    assert_eq!(stack.is_defined("A"), DefineState::Defined);
}

#[test]
fn inactive_defines_are_invisible() {
    // #if false / #define A (excluded) / #elif A
    let stack = build([
        Directive::new(DirectiveKind::If, true, false),
        Directive::define("A", false),
    ]);
    assert_eq!(stack.is_defined("A"), DefineState::Unspecified);
}

#[test]
fn elif_without_enclosing_if_is_unspecified() {
    let stack = build([Directive::define("A", true), elif(true)]);
    assert_eq!(stack.is_defined("A"), DefineState::Unspecified);
}

// === branch queries ===

#[test]
fn branch_queries() {
    let stack = build([if_(false)]);
    assert!(stack.has_unfinished_if());
    assert!(stack.has_previous_if_or_elif());
    assert!(!stack.previous_branch_taken());

    let stack = stack.add(elif(true));
    assert!(stack.previous_branch_taken());

    let stack = stack.add(else_(false));
    assert!(!stack.has_previous_if_or_elif());
    assert!(stack.has_unfinished_if());

    let region = build([Directive::new(DirectiveKind::Region, true, false)]);
    assert!(region.has_unfinished_region());
    assert!(!region.has_unfinished_if());
}

// === #endif collapsing ===

#[test]
fn endif_keeps_taken_branch_entries_in_order() {
    let stack = build([
        Directive::define("OUTER", true),
        if_(true),
        Directive::define("A", true),
        Directive::define("B", true),
        endif(),
    ]);
    assert_eq!(
        kinds(&stack),
        vec![DirectiveKind::Define, DirectiveKind::Define, DirectiveKind::Define]
    );
    let symbols: Vec<_> = stack
        .iter()
        .filter_map(|d| d.identifier.as_deref())
        .collect();
    assert_eq!(symbols, vec!["B", "A", "OUTER"]);
}

#[test]
fn endif_drops_untaken_branch_entries() {
    let stack = build([
        if_(false),
        Directive::define("A", false),
        else_(true),
        Directive::define("B", true),
        endif(),
    ]);
    let symbols: Vec<_> = stack
        .iter()
        .filter_map(|d| d.identifier.as_deref())
        .collect();
    assert_eq!(symbols, vec!["B"]);
}

#[test]
fn endif_without_if_is_pushed() {
    let stack = build([endif()]);
    assert_eq!(kinds(&stack), vec![DirectiveKind::EndIf]);
}

#[test]
fn simple_if_endif_leaves_empty_stack() {
    let stack = build([if_(false), endif()]);
    assert!(stack.is_empty());
}

// === #endregion collapsing ===

#[test]
fn endregion_keeps_enclosed_entries() {
    let stack = build([
        Directive::new(DirectiveKind::Region, true, false),
        Directive::define("A", true),
        Directive::new(DirectiveKind::EndRegion, true, false),
    ]);
    assert_eq!(kinds(&stack), vec![DirectiveKind::Define]);
    assert!(!stack.has_unfinished_region());
}

// === Equivalence ===

#[test]
fn equivalence_ignores_insignificant_directives() {
    let a = build([
        Directive::define("A", true),
        Directive::new(DirectiveKind::Pragma, true, false),
    ]);
    let b = build([
        Directive::new(DirectiveKind::Line, true, false),
        Directive::define("A", true),
    ]);
    assert!(a.incrementally_equivalent(&b));
}

#[test]
fn equivalence_compares_identifiers_and_branches() {
    let a = build([Directive::define("A", true)]);
    let b = build([Directive::define("B", true)]);
    assert!(!a.incrementally_equivalent(&b));

    let taken = build([if_(true)]);
    let not_taken = build([if_(false)]);
    assert!(!taken.incrementally_equivalent(&not_taken));

    let inactive_a = build([Directive::define("A", false)]);
    let inactive_b = build([Directive::define("B", false)]);
    assert!(inactive_a.incrementally_equivalent(&inactive_b));
}

#[test]
fn equivalence_requires_same_length() {
    let a = build([Directive::define("A", true)]);
    assert!(!a.incrementally_equivalent(&DirectiveStack::EMPTY));
    assert!(!DirectiveStack::EMPTY.incrementally_equivalent(&a));
}

// === Persistence ===

#[test]
fn push_leaves_the_receiver_unchanged() {
    let base = build([Directive::define("A", true)]);
    let extended = base.add(Directive::define("B", true));
    assert_eq!(base.len(), 1);
    assert_eq!(extended.len(), 2);
}

#[test]
fn dropping_long_history_does_not_overflow() {
    let mut stack = DirectiveStack::EMPTY;
    for _ in 0..200_000 {
        stack = stack.add(Directive::new(DirectiveKind::Pragma, true, false));
    }
    assert_eq!(stack.len(), 200_000);
    drop(stack);
}

// === DirectiveSlot ===

#[test]
fn slot_first_install_wins() {
    let slot = DirectiveSlot::new();
    assert!(slot.get().is_none());
    let first = build([Directive::define("A", true)]);
    let installed = slot.initialize(first.clone());
    assert!(installed.ptr_eq(&first));

    let second = build([Directive::define("B", true)]);
    assert!(slot.initialize(second).ptr_eq(&first));
    assert!(slot.get_or_compute(|| DirectiveStack::EMPTY).ptr_eq(&first));
}

#[test]
fn slot_races_agree() {
    let slot = DirectiveSlot::new();
    std::thread::scope(|scope| {
        for _ in 0..4 {
            scope.spawn(|| {
                let stack = slot.get_or_compute(|| build([Directive::define("A", true)]));
                assert_eq!(stack.is_defined("A"), DefineState::Defined);
            });
        }
    });
    assert_eq!(slot.get().map(DirectiveStack::len), Some(1));
}

// === Properties ===

fn arb_directive() -> impl Strategy<Value = Directive> {
    let symbol = prop::sample::select(vec!["A", "B", "C"]);
    (0u8..8, any::<bool>(), any::<bool>(), symbol).prop_map(|(kind, active, taken, sym)| {
        match kind {
            0 => Directive::new(DirectiveKind::If, active, taken),
            1 => Directive::new(DirectiveKind::Elif, active, taken),
            2 => Directive::new(DirectiveKind::Else, active, taken),
            3 => Directive::new(DirectiveKind::EndIf, active, false),
            4 => Directive::define(sym, active),
            5 => Directive::undef(sym, active),
            6 => Directive::new(DirectiveKind::Region, active, false),
            _ => Directive::new(DirectiveKind::EndRegion, active, false),
        }
    })
}

proptest! {
    #[test]
    fn equivalence_is_reflexive(directives in prop::collection::vec(arb_directive(), 0..24)) {
        let stack = build(directives.clone());
        prop_assert!(stack.incrementally_equivalent(&stack));
        // A structurally identical but separately built stack is equivalent too.
        prop_assert!(stack.incrementally_equivalent(&build(directives)));
    }

    #[test]
    fn equivalence_is_symmetric(
        left in prop::collection::vec(arb_directive(), 0..16),
        right in prop::collection::vec(arb_directive(), 0..16),
    ) {
        let a = build(left);
        let b = build(right);
        prop_assert_eq!(a.incrementally_equivalent(&b), b.incrementally_equivalent(&a));
    }
}
