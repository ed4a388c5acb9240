//! Preprocessor directive history.
//!
//! [`DirectiveStack`] is a persistent cons list of the directives seen so far,
//! innermost (most recent) first. Pushing never mutates an existing stack, so
//! the blender can carry an old-tree history and a new-text history side by
//! side and snapshot either one for free.
//!
//! # Collapsing
//!
//! Completed regions do not keep their markers:
//! - `#endif` rebuilds the stack without the `#if`/`#elif`/`#else` markers,
//!   keeping only entries from the branch that was taken.
//! - `#endregion` drops the matching `#region` marker and keeps everything
//!   it enclosed.
//!
//! All walks are loops over the list; nothing here recurses on list length.

use std::fmt;
use std::sync::{Arc, OnceLock};

use crate::{SyntaxKind, TokenText};

/// Directive kinds tracked on the stack.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum DirectiveKind {
    If,
    Elif,
    Else,
    EndIf,
    Region,
    EndRegion,
    Define,
    Undef,
    Error,
    Warning,
    Line,
    Pragma,
    Nullable,
    Bad,
}

impl DirectiveKind {
    /// Trivia kind of a directive line of this kind.
    pub const fn trivia_kind(self) -> SyntaxKind {
        match self {
            DirectiveKind::If => SyntaxKind::IfDirectiveTrivia,
            DirectiveKind::Elif => SyntaxKind::ElifDirectiveTrivia,
            DirectiveKind::Else => SyntaxKind::ElseDirectiveTrivia,
            DirectiveKind::EndIf => SyntaxKind::EndIfDirectiveTrivia,
            DirectiveKind::Region => SyntaxKind::RegionDirectiveTrivia,
            DirectiveKind::EndRegion => SyntaxKind::EndRegionDirectiveTrivia,
            DirectiveKind::Define => SyntaxKind::DefineDirectiveTrivia,
            DirectiveKind::Undef => SyntaxKind::UndefDirectiveTrivia,
            DirectiveKind::Error => SyntaxKind::ErrorDirectiveTrivia,
            DirectiveKind::Warning => SyntaxKind::WarningDirectiveTrivia,
            DirectiveKind::Line => SyntaxKind::LineDirectiveTrivia,
            DirectiveKind::Pragma => SyntaxKind::PragmaDirectiveTrivia,
            DirectiveKind::Nullable => SyntaxKind::NullableDirectiveTrivia,
            DirectiveKind::Bad => SyntaxKind::BadDirectiveTrivia,
        }
    }

    /// Kinds that can change how later text is lexed.
    pub const fn is_significant(self) -> bool {
        matches!(
            self,
            DirectiveKind::If
                | DirectiveKind::Elif
                | DirectiveKind::Else
                | DirectiveKind::EndIf
                | DirectiveKind::Define
                | DirectiveKind::Undef
                | DirectiveKind::Region
                | DirectiveKind::EndRegion
        )
    }

    /// `#if`, `#elif` or `#else`.
    pub const fn is_branch(self) -> bool {
        matches!(
            self,
            DirectiveKind::If | DirectiveKind::Elif | DirectiveKind::Else
        )
    }
}

/// One directive as recorded on the stack.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct Directive {
    pub kind: DirectiveKind,
    /// Directive sits in text that is not excluded by an enclosing `#if`.
    pub is_active: bool,
    /// For branch directives: this branch's text is included.
    pub branch_taken: bool,
    /// Symbol of `#define`/`#undef`.
    pub identifier: Option<TokenText>,
}

impl Directive {
    pub fn new(kind: DirectiveKind, is_active: bool, branch_taken: bool) -> Self {
        Directive {
            kind,
            is_active,
            branch_taken,
            identifier: None,
        }
    }

    pub fn define(symbol: impl Into<TokenText>, is_active: bool) -> Self {
        Directive {
            identifier: Some(symbol.into()),
            ..Directive::new(DirectiveKind::Define, is_active, false)
        }
    }

    pub fn undef(symbol: impl Into<TokenText>, is_active: bool) -> Self {
        Directive {
            identifier: Some(symbol.into()),
            ..Directive::new(DirectiveKind::Undef, is_active, false)
        }
    }

    /// Whether two directives affect later lexing identically.
    ///
    /// Inactive directives only have to agree on kind.
    pub fn incrementally_equivalent(&self, other: &Directive) -> bool {
        if self.kind != other.kind || self.is_active != other.is_active {
            return false;
        }
        if !self.is_active {
            return true;
        }
        match self.kind {
            DirectiveKind::Define | DirectiveKind::Undef => self.identifier == other.identifier,
            DirectiveKind::If | DirectiveKind::Elif | DirectiveKind::Else => {
                self.branch_taken == other.branch_taken
            }
            _ => true,
        }
    }
}

/// Answer of [`DirectiveStack::is_defined`].
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum DefineState {
    Defined,
    Undefined,
    /// No `#define`/`#undef` for the symbol is visible; fall back to the
    /// configured symbols.
    Unspecified,
}

struct DirectiveNode {
    directive: Directive,
    tail: Option<Arc<DirectiveNode>>,
}

/// Persistent stack of directives, most recent first.
#[derive(Clone, Default)]
pub struct DirectiveStack {
    head: Option<Arc<DirectiveNode>>,
}

impl DirectiveStack {
    /// The empty history.
    pub const EMPTY: DirectiveStack = DirectiveStack { head: None };

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.head.is_none()
    }

    /// Same list instance (not merely equal contents).
    #[inline]
    pub fn ptr_eq(&self, other: &DirectiveStack) -> bool {
        match (&self.head, &other.head) {
            (Some(a), Some(b)) => Arc::ptr_eq(a, b),
            (None, None) => true,
            _ => false,
        }
    }

    /// Directives from most recent to oldest.
    pub fn iter(&self) -> Iter<'_> {
        Iter {
            next: self.head.as_deref(),
        }
    }

    /// Number of entries (walks the list).
    pub fn len(&self) -> usize {
        self.iter().count()
    }

    fn cons(&self, directive: Directive) -> DirectiveStack {
        DirectiveStack {
            head: Some(Arc::new(DirectiveNode {
                directive,
                tail: self.head.clone(),
            })),
        }
    }

    /// Resolve `symbol` against the visible history.
    ///
    /// Entries from sibling branches of the innermost open `#if` are skipped:
    /// after an `#elif`/`#else`, the walk jumps back to the matching `#if`.
    pub fn is_defined(&self, symbol: &str) -> DefineState {
        let mut current = self.head.as_deref();
        while let Some(node) = current {
            let directive = &node.directive;
            match directive.kind {
                DirectiveKind::Define
                    if directive.is_active && directive.identifier.as_deref() == Some(symbol) =>
                {
                    return DefineState::Defined;
                }
                DirectiveKind::Undef
                    if directive.is_active && directive.identifier.as_deref() == Some(symbol) =>
                {
                    return DefineState::Undefined;
                }
                DirectiveKind::Elif | DirectiveKind::Else => {
                    // Skip directives from previous branches of the same #if.
                    loop {
                        current = match current {
                            Some(node) => node.tail.as_deref(),
                            None => None,
                        };
                        match current {
                            None => return DefineState::Unspecified,
                            Some(node) if node.directive.kind == DirectiveKind::If => break,
                            Some(_) => {}
                        }
                    }
                }
                _ => {}
            }
            current = current.and_then(|node| node.tail.as_deref());
        }
        DefineState::Unspecified
    }

    /// `true` if any earlier section of the innermost `#if` took its branch.
    pub fn previous_branch_taken(&self) -> bool {
        for directive in self.iter() {
            if directive.branch_taken {
                return true;
            }
            if directive.kind == DirectiveKind::If {
                return false;
            }
        }
        false
    }

    fn previous_if_elif_else_or_region(&self) -> Option<&Directive> {
        self.iter().find(|d| {
            matches!(
                d.kind,
                DirectiveKind::If | DirectiveKind::Elif | DirectiveKind::Else | DirectiveKind::Region
            )
        })
    }

    /// Inside an `#if` that has not seen its `#endif`.
    pub fn has_unfinished_if(&self) -> bool {
        self.previous_if_elif_else_or_region()
            .is_some_and(|d| d.kind != DirectiveKind::Region)
    }

    /// The innermost open construct is an `#if` or `#elif` (so `#elif` and
    /// `#else` are allowed next).
    pub fn has_previous_if_or_elif(&self) -> bool {
        self.previous_if_elif_else_or_region()
            .is_some_and(|d| matches!(d.kind, DirectiveKind::If | DirectiveKind::Elif))
    }

    /// Inside a `#region` that has not seen its `#endregion`.
    pub fn has_unfinished_region(&self) -> bool {
        self.previous_if_elif_else_or_region()
            .is_some_and(|d| d.kind == DirectiveKind::Region)
    }

    /// Push `directive`, collapsing completed `#if` and `#region` blocks.
    ///
    /// An `#endif`/`#endregion` with nothing to close is pushed as-is.
    #[must_use]
    pub fn add(&self, directive: Directive) -> DirectiveStack {
        match directive.kind {
            DirectiveKind::EndIf if self.iter().any(|d| d.kind == DirectiveKind::If) => {
                self.complete_if()
            }
            DirectiveKind::EndRegion if self.iter().any(|d| d.kind == DirectiveKind::Region) => {
                self.complete_region()
            }
            _ => self.cons(directive),
        }
    }

    /// Entries above the innermost node matching `stop`, most recent first,
    /// plus the stack below that node.
    fn split_at(&self, stop: DirectiveKind) -> (Vec<&Directive>, Option<&DirectiveNode>) {
        let mut above = Vec::new();
        let mut current = self.head.as_deref();
        while let Some(node) = current {
            if node.directive.kind == stop {
                return (above, Some(node));
            }
            above.push(&node.directive);
            current = node.tail.as_deref();
        }
        (above, None)
    }

    /// Remove the innermost `#if` block, keeping the taken branch's entries.
    fn complete_if(&self) -> DirectiveStack {
        let (above, if_node) = self.split_at(DirectiveKind::If);
        let Some(if_node) = if_node else {
            return self.clone();
        };
        let mut include = if_node.directive.branch_taken;
        let mut stack = DirectiveStack {
            head: if_node.tail.clone(),
        };
        for directive in above.into_iter().rev() {
            match directive.kind {
                DirectiveKind::Elif | DirectiveKind::Else => include = directive.branch_taken,
                _ if include => stack = stack.cons(directive.clone()),
                _ => {}
            }
        }
        stack
    }

    /// Remove the innermost `#region` marker, keeping what it enclosed.
    fn complete_region(&self) -> DirectiveStack {
        let (above, region_node) = self.split_at(DirectiveKind::Region);
        let Some(region_node) = region_node else {
            return self.clone();
        };
        let mut stack = DirectiveStack {
            head: region_node.tail.clone(),
        };
        for directive in above.into_iter().rev() {
            stack = stack.cons(directive.clone());
        }
        stack
    }

    /// Whether lexing after `self` and after `other` must agree.
    ///
    /// Compares entry by entry after discarding directives that cannot
    /// influence later lexing.
    pub fn incrementally_equivalent(&self, other: &DirectiveStack) -> bool {
        if self.ptr_eq(other) {
            return true;
        }
        let mut mine = self.iter().filter(|d| d.kind.is_significant());
        let mut theirs = other.iter().filter(|d| d.kind.is_significant());
        loop {
            match (mine.next(), theirs.next()) {
                (Some(a), Some(b)) if a.incrementally_equivalent(b) => {}
                (None, None) => return true,
                _ => return false,
            }
        }
    }
}

impl Drop for DirectiveStack {
    fn drop(&mut self) {
        // Unlink uniquely owned nodes one at a time so long histories do not
        // recurse through `Arc` drops.
        let mut next = self.head.take();
        while let Some(node) = next {
            match Arc::try_unwrap(node) {
                Ok(mut node) => next = node.tail.take(),
                Err(_) => break,
            }
        }
    }
}

impl fmt::Debug for DirectiveStack {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

/// Iterator over a [`DirectiveStack`], most recent first.
pub struct Iter<'a> {
    next: Option<&'a DirectiveNode>,
}

impl<'a> Iterator for Iter<'a> {
    type Item = &'a Directive;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.next?;
        self.next = node.tail.as_deref();
        Some(&node.directive)
    }
}

/// Write-once slot holding a lazily computed [`DirectiveStack`].
///
/// Racing initializers may each compute a value; the first install wins and
/// later ones are dropped. Every caller computes the same history, so
/// losing the race is harmless.
#[derive(Default)]
pub struct DirectiveSlot {
    cell: OnceLock<DirectiveStack>,
}

impl DirectiveSlot {
    pub const fn new() -> Self {
        DirectiveSlot {
            cell: OnceLock::new(),
        }
    }

    pub fn get(&self) -> Option<&DirectiveStack> {
        self.cell.get()
    }

    /// Install `value` unless a value is already present; return the
    /// installed one.
    pub fn initialize(&self, value: DirectiveStack) -> &DirectiveStack {
        self.cell.get_or_init(move || value)
    }

    /// Return the installed stack, computing one with `compute` if the slot
    /// is still empty. `compute` runs outside any lock.
    pub fn get_or_compute(&self, compute: impl FnOnce() -> DirectiveStack) -> &DirectiveStack {
        if let Some(stack) = self.get() {
            return stack;
        }
        self.initialize(compute())
    }
}

#[cfg(test)]
mod tests;
