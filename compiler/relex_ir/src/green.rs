//! Green (position-free, immutable) syntax elements.
//!
//! Trivia, tokens and nodes are shared through `Arc` and never mutated after
//! construction. Widths and [`NodeFlags`] are computed once in the
//! constructors so the blender's reuse test is a handful of field reads.
//!
//! # Positions
//!
//! Green elements know their widths, not their positions. The old-tree arena
//! in the blender assigns absolute positions when it flattens a tree.
//!
//! # Traversal
//!
//! Token walks use an explicit work stack, never recursion, so arbitrarily
//! deep trees are safe to render or scan for directives.

use std::sync::Arc;

use smallvec::SmallVec;

use crate::{Diagnostic, Directive, DirectiveStack, NodeFlags, SyntaxKind, TokenText};

/// Leading or trailing trivia of one token.
pub type TriviaList = SmallVec<[Arc<GreenTrivia>; 2]>;

#[expect(
    clippy::cast_possible_truncation,
    reason = "documents are limited to u32::MAX characters"
)]
fn char_width(text: &str) -> u32 {
    text.chars().count() as u32
}

/// Decoded literal value.
#[derive(Clone, Debug, PartialEq)]
pub enum TokenValue {
    Text(TokenText),
    Char(char),
    Integer(u64),
    Real(f64),
    Bool(bool),
}

/// Opaque client marker attached to a token or node.
///
/// Annotated elements are never reused by the blender.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Annotation {
    pub kind: &'static str,
    pub data: Option<TokenText>,
}

impl Annotation {
    pub fn new(kind: &'static str) -> Self {
        Annotation { kind, data: None }
    }
}

// === Trivia ===

/// Whitespace, comment, directive or disabled text attached to a token.
#[derive(Clone, Debug, PartialEq)]
pub struct GreenTrivia {
    kind: SyntaxKind,
    text: TokenText,
    width: u32,
    directive: Option<Directive>,
    diagnostics: Box<[Diagnostic]>,
    flags: NodeFlags,
}

impl GreenTrivia {
    pub fn new(kind: SyntaxKind, text: impl Into<TokenText>) -> Self {
        debug_assert!(kind.is_trivia());
        let text = text.into();
        let mut flags = NodeFlags::empty();
        if kind == SyntaxKind::SkippedTokensTrivia {
            flags |= NodeFlags::CONTAINS_SKIPPED_TEXT;
        }
        GreenTrivia {
            kind,
            width: char_width(&text),
            text,
            directive: None,
            diagnostics: Box::default(),
            flags,
        }
    }

    /// Directive line; the trivia kind follows the directive kind.
    pub fn directive(text: impl Into<TokenText>, directive: Directive) -> Self {
        let mut trivia = GreenTrivia::new(directive.kind.trivia_kind(), text);
        trivia.flags |= NodeFlags::CONTAINS_DIRECTIVES;
        trivia.directive = Some(directive);
        trivia
    }

    #[must_use]
    pub fn with_diagnostics(mut self, diagnostics: impl Into<Box<[Diagnostic]>>) -> Self {
        self.diagnostics = diagnostics.into();
        self.flags
            .set(NodeFlags::CONTAINS_DIAGNOSTICS, !self.diagnostics.is_empty());
        self
    }

    #[inline]
    pub fn kind(&self) -> SyntaxKind {
        self.kind
    }

    #[inline]
    pub fn text(&self) -> &str {
        &self.text
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn directive_info(&self) -> Option<&Directive> {
        self.directive.as_ref()
    }

    #[inline]
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    #[inline]
    pub fn flags(&self) -> NodeFlags {
        self.flags
    }
}

// === Tokens ===

/// A lexical token with its attached trivia.
#[derive(Clone, Debug, PartialEq)]
pub struct GreenToken {
    kind: SyntaxKind,
    contextual_kind: SyntaxKind,
    text: TokenText,
    value: Option<TokenValue>,
    leading: TriviaList,
    trailing: TriviaList,
    diagnostics: Box<[Diagnostic]>,
    annotations: Box<[Annotation]>,
    /// Presence flags of a subtree this token stands in for.
    carried: NodeFlags,
    flags: NodeFlags,
    width: u32,
    full_width: u32,
}

impl GreenToken {
    pub fn new(
        kind: SyntaxKind,
        text: impl Into<TokenText>,
        leading: TriviaList,
        trailing: TriviaList,
    ) -> Self {
        debug_assert!(kind.is_token());
        let text = text.into();
        let width = char_width(&text);
        let mut token = GreenToken {
            kind,
            contextual_kind: kind,
            text,
            value: None,
            leading,
            trailing,
            diagnostics: Box::default(),
            annotations: Box::default(),
            carried: NodeFlags::empty(),
            flags: NodeFlags::empty(),
            width,
            full_width: 0,
        };
        token.refresh();
        token
    }

    /// Token of a fixed-text kind.
    pub fn fixed(kind: SyntaxKind, leading: TriviaList, trailing: TriviaList) -> Self {
        GreenToken::new(kind, kind.text().unwrap_or(""), leading, trailing)
    }

    /// Zero-width placeholder the parser inserts for an expected token.
    pub fn missing(kind: SyntaxKind) -> Self {
        let mut token = GreenToken::new(kind, "", TriviaList::new(), TriviaList::new());
        token.flags |= NodeFlags::IS_MISSING;
        token
    }

    fn refresh(&mut self) {
        let mut flags = (self.flags & NodeFlags::IS_MISSING) | self.carried;
        let mut full_width = self.width;
        for trivia in self.leading.iter().chain(&self.trailing) {
            full_width += trivia.width;
            flags |= trivia.flags.inherited();
        }
        if !self.diagnostics.is_empty() {
            flags |= NodeFlags::CONTAINS_DIAGNOSTICS;
        }
        if !self.annotations.is_empty() {
            flags |= NodeFlags::CONTAINS_ANNOTATIONS;
        }
        if self.kind == SyntaxKind::BadToken {
            flags |= NodeFlags::CONTAINS_SKIPPED_TEXT;
        }
        self.flags = flags;
        self.full_width = full_width;
    }

    #[must_use]
    pub fn with_value(mut self, value: TokenValue) -> Self {
        self.value = Some(value);
        self
    }

    /// Attach diagnostics; offsets are relative to the token's full start.
    #[must_use]
    pub fn with_diagnostics(mut self, diagnostics: impl Into<Box<[Diagnostic]>>) -> Self {
        self.diagnostics = diagnostics.into();
        self.refresh();
        self
    }

    #[must_use]
    pub fn with_annotations(mut self, annotations: impl Into<Box<[Annotation]>>) -> Self {
        self.annotations = annotations.into();
        self.refresh();
        self
    }

    /// Keep the presence flags of the subtree this token replaces.
    #[must_use]
    pub fn with_carried_flags(mut self, flags: NodeFlags) -> Self {
        self.carried = flags.inherited();
        self.refresh();
        self
    }

    /// Identifier that may act as the contextual keyword `kind`.
    #[must_use]
    pub fn with_contextual_kind(mut self, kind: SyntaxKind) -> Self {
        self.contextual_kind = kind;
        self
    }

    /// Parser-side promotion of an identifier to its contextual keyword.
    ///
    /// Returns `None` if this token is not an identifier spelled like a
    /// contextual keyword.
    pub fn promote_contextual(&self) -> Option<GreenToken> {
        if self.kind != SyntaxKind::IdentifierToken || !self.contextual_kind.is_contextual_keyword()
        {
            return None;
        }
        Some(GreenToken {
            kind: self.contextual_kind,
            ..self.clone()
        })
    }

    #[inline]
    pub fn kind(&self) -> SyntaxKind {
        self.kind
    }

    #[inline]
    pub fn contextual_kind(&self) -> SyntaxKind {
        self.contextual_kind
    }

    /// Core text without trivia.
    #[inline]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Core text as a [`TokenText`]; interned text keeps sharing its allocation.
    #[inline]
    pub fn shared_text(&self) -> TokenText {
        self.text.clone()
    }

    #[inline]
    pub fn value(&self) -> Option<&TokenValue> {
        self.value.as_ref()
    }

    #[inline]
    pub fn leading(&self) -> &[Arc<GreenTrivia>] {
        &self.leading
    }

    #[inline]
    pub fn trailing(&self) -> &[Arc<GreenTrivia>] {
        &self.trailing
    }

    #[inline]
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    #[inline]
    pub fn annotations(&self) -> &[Annotation] {
        &self.annotations
    }

    #[inline]
    pub fn flags(&self) -> NodeFlags {
        self.flags
    }

    #[inline]
    pub fn is_missing(&self) -> bool {
        self.flags.contains(NodeFlags::IS_MISSING)
    }

    /// Width of the core text.
    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Width including leading and trailing trivia.
    #[inline]
    pub fn full_width(&self) -> u32 {
        self.full_width
    }

    pub fn leading_width(&self) -> u32 {
        self.leading.iter().map(|t| t.width).sum()
    }

    pub fn trailing_width(&self) -> u32 {
        self.trailing.iter().map(|t| t.width).sum()
    }

    /// Append leading trivia, text and trailing trivia to `out`.
    pub fn write_full_text(&self, out: &mut String) {
        for trivia in &self.leading {
            out.push_str(&trivia.text);
        }
        out.push_str(&self.text);
        for trivia in &self.trailing {
            out.push_str(&trivia.text);
        }
    }

    pub fn to_full_string(&self) -> String {
        let mut out = String::new();
        self.write_full_text(&mut out);
        out
    }

    /// Fold this token's directive trivia into `stack`.
    pub fn apply_directives(&self, stack: &DirectiveStack) -> DirectiveStack {
        let mut stack = stack.clone();
        if !self.flags.contains(NodeFlags::CONTAINS_DIRECTIVES) {
            return stack;
        }
        for trivia in self.leading.iter().chain(&self.trailing) {
            if let Some(directive) = &trivia.directive {
                stack = stack.add(directive.clone());
            }
        }
        stack
    }
}

// === Nodes ===

/// Interior node of an old syntax tree.
#[derive(Clone, Debug, PartialEq)]
pub struct GreenNode {
    kind: SyntaxKind,
    children: Box<[GreenElement]>,
    diagnostics: Box<[Diagnostic]>,
    annotations: Box<[Annotation]>,
    flags: NodeFlags,
    full_width: u32,
}

impl GreenNode {
    pub fn new(kind: SyntaxKind, children: impl Into<Box<[GreenElement]>>) -> Self {
        debug_assert!(kind.is_node());
        let mut node = GreenNode {
            kind,
            children: children.into(),
            diagnostics: Box::default(),
            annotations: Box::default(),
            flags: NodeFlags::empty(),
            full_width: 0,
        };
        node.refresh();
        node
    }

    fn refresh(&mut self) {
        let mut flags = NodeFlags::empty();
        let mut full_width = 0;
        for child in &*self.children {
            full_width += child.full_width();
            flags |= child.flags().inherited();
        }
        if !self.diagnostics.is_empty() {
            flags |= NodeFlags::CONTAINS_DIAGNOSTICS;
        }
        if !self.annotations.is_empty() {
            flags |= NodeFlags::CONTAINS_ANNOTATIONS;
        }
        self.flags = flags;
        self.full_width = full_width;
    }

    /// Attach parser diagnostics to the node itself.
    #[must_use]
    pub fn with_diagnostics(mut self, diagnostics: impl Into<Box<[Diagnostic]>>) -> Self {
        self.diagnostics = diagnostics.into();
        self.refresh();
        self
    }

    #[must_use]
    pub fn with_annotations(mut self, annotations: impl Into<Box<[Annotation]>>) -> Self {
        self.annotations = annotations.into();
        self.refresh();
        self
    }

    #[inline]
    pub fn kind(&self) -> SyntaxKind {
        self.kind
    }

    #[inline]
    pub fn children(&self) -> &[GreenElement] {
        &self.children
    }

    #[inline]
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    #[inline]
    pub fn flags(&self) -> NodeFlags {
        self.flags
    }

    #[inline]
    pub fn full_width(&self) -> u32 {
        self.full_width
    }

    /// Every descendant token in source order.
    pub fn tokens(&self) -> Tokens<'_> {
        Tokens {
            stack: vec![self.children.iter()],
        }
    }

    /// First descendant token, if any.
    pub fn first_token(&self) -> Option<&Arc<GreenToken>> {
        let mut node = self;
        loop {
            match node.children.first()? {
                GreenElement::Token(token) => return Some(token),
                GreenElement::Node(child) => node = child,
            }
        }
    }

    /// Last descendant token, if any, found by following last children.
    ///
    /// A node whose last child is an empty node has no last token.
    pub fn last_token(&self) -> Option<&Arc<GreenToken>> {
        let mut node = self;
        loop {
            match node.children.last()? {
                GreenElement::Token(token) => return Some(token),
                GreenElement::Node(child) => node = child,
            }
        }
    }

    pub fn write_full_text(&self, out: &mut String) {
        for token in self.tokens() {
            token.write_full_text(out);
        }
    }

    pub fn to_full_string(&self) -> String {
        let mut out = String::new();
        self.write_full_text(&mut out);
        out
    }

    /// Fold every directive in this subtree into `stack`, in source order.
    pub fn apply_directives(&self, stack: &DirectiveStack) -> DirectiveStack {
        if !self.flags.contains(NodeFlags::CONTAINS_DIRECTIVES) {
            return stack.clone();
        }
        let mut stack = stack.clone();
        for token in self.tokens() {
            if token.flags.contains(NodeFlags::CONTAINS_DIRECTIVES) {
                stack = token.apply_directives(&stack);
            }
        }
        stack
    }
}

/// Iterator over a node's descendant tokens.
pub struct Tokens<'a> {
    stack: Vec<std::slice::Iter<'a, GreenElement>>,
}

impl<'a> Iterator for Tokens<'a> {
    type Item = &'a Arc<GreenToken>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let top = self.stack.last_mut()?;
            match top.next() {
                Some(GreenElement::Token(token)) => return Some(token),
                Some(GreenElement::Node(node)) => self.stack.push(node.children.iter()),
                None => {
                    self.stack.pop();
                }
            }
        }
    }
}

// === Elements ===

/// A node or a token.
#[derive(Clone, Debug, PartialEq)]
pub enum GreenElement {
    Node(Arc<GreenNode>),
    Token(Arc<GreenToken>),
}

impl GreenElement {
    #[inline]
    pub fn kind(&self) -> SyntaxKind {
        match self {
            GreenElement::Node(node) => node.kind,
            GreenElement::Token(token) => token.kind,
        }
    }

    #[inline]
    pub fn full_width(&self) -> u32 {
        match self {
            GreenElement::Node(node) => node.full_width,
            GreenElement::Token(token) => token.full_width,
        }
    }

    #[inline]
    pub fn flags(&self) -> NodeFlags {
        match self {
            GreenElement::Node(node) => node.flags,
            GreenElement::Token(token) => token.flags,
        }
    }

    #[inline]
    pub fn as_node(&self) -> Option<&Arc<GreenNode>> {
        match self {
            GreenElement::Node(node) => Some(node),
            GreenElement::Token(_) => None,
        }
    }

    #[inline]
    pub fn as_token(&self) -> Option<&Arc<GreenToken>> {
        match self {
            GreenElement::Token(token) => Some(token),
            GreenElement::Node(_) => None,
        }
    }

    /// Last descendant token (the token itself for a token).
    pub fn last_token(&self) -> Option<&Arc<GreenToken>> {
        match self {
            GreenElement::Node(node) => node.last_token(),
            GreenElement::Token(token) => Some(token),
        }
    }

    pub fn apply_directives(&self, stack: &DirectiveStack) -> DirectiveStack {
        match self {
            GreenElement::Node(node) => node.apply_directives(stack),
            GreenElement::Token(token) => token.apply_directives(stack),
        }
    }

    pub fn to_full_string(&self) -> String {
        match self {
            GreenElement::Node(node) => node.to_full_string(),
            GreenElement::Token(token) => token.to_full_string(),
        }
    }
}

impl From<Arc<GreenToken>> for GreenElement {
    fn from(token: Arc<GreenToken>) -> Self {
        GreenElement::Token(token)
    }
}

impl From<GreenToken> for GreenElement {
    fn from(token: GreenToken) -> Self {
        GreenElement::Token(Arc::new(token))
    }
}

impl From<GreenNode> for GreenElement {
    fn from(node: GreenNode) -> Self {
        GreenElement::Node(Arc::new(node))
    }
}

/// Static text for a token kind, or the provided owned text.
pub fn fixed_or_owned(kind: SyntaxKind, text: &str) -> TokenText {
    match kind.text() {
        Some(fixed) if fixed == text => TokenText::Static(fixed),
        _ => TokenText::Owned(text.to_owned()),
    }
}
