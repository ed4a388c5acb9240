#![allow(clippy::unwrap_used, clippy::expect_used)]

//! Old trees and blending runs for tests.

use std::sync::Arc;

use relex_ir::{GreenElement, GreenNode, GreenToken, GreenTrivia, SyntaxKind, TextEdit, TriviaList};
use relex_lexer::{Lexer, LexerMode, LexerOptions};
use relex_lexer_core::SourceText;

use crate::{BlendedNode, IncrementalStats, SyntaxTree, TokenStream};

/// Every syntax token of `text`, end of file included.
pub(crate) fn lex_tokens(text: &str, options: LexerOptions) -> Vec<Arc<GreenToken>> {
    let doc = SourceText::new(text);
    let mut lexer = Lexer::new(&doc, options);
    let mut mode = LexerMode::SYNTAX;
    let mut tokens = Vec::new();
    for _ in 0..=text.chars().count() {
        let token = lexer.lex(&mut mode);
        let done = token.kind() == SyntaxKind::EndOfFileToken;
        tokens.push(token);
        if done {
            break;
        }
    }
    tokens
}

/// A compilation unit with one `ExpressionStatement` per `;`-terminated
/// run of tokens.
pub(crate) fn statements(tokens: Vec<Arc<GreenToken>>) -> GreenNode {
    let mut children = Vec::new();
    let mut run = Vec::new();
    for token in tokens {
        if token.kind() == SyntaxKind::EndOfFileToken {
            children.append(&mut run);
            children.push(GreenElement::Token(token));
            break;
        }
        let ends_statement = token.kind() == SyntaxKind::SemicolonToken;
        run.push(GreenElement::Token(token));
        if ends_statement {
            children.push(GreenNode::new(SyntaxKind::ExpressionStatement, std::mem::take(&mut run)).into());
        }
    }
    GreenNode::new(SyntaxKind::CompilationUnit, children)
}

pub(crate) fn parse_with(text: &str, options: LexerOptions) -> SyntaxTree {
    SyntaxTree::new(Arc::new(statements(lex_tokens(text, options))))
}

pub(crate) fn parse(text: &str) -> SyntaxTree {
    parse_with(text, LexerOptions::default())
}

pub(crate) fn token(kind: SyntaxKind, text: &str) -> Arc<GreenToken> {
    Arc::new(GreenToken::new(kind, text.to_owned(), TriviaList::new(), TriviaList::new()))
}

/// `token` followed by one space.
pub(crate) fn spaced(kind: SyntaxKind, text: &str) -> Arc<GreenToken> {
    let space: TriviaList = [Arc::new(GreenTrivia::new(SyntaxKind::WhitespaceTrivia, " "))]
        .into_iter()
        .collect();
    Arc::new(GreenToken::new(kind, text.to_owned(), TriviaList::new(), space))
}

/// What a blending run emitted for one token.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct Emitted {
    pub kind: SyntaxKind,
    /// Token text without trivia.
    pub text: String,
    pub full_text: String,
    pub position: u32,
    pub reused: bool,
}

impl From<&BlendedNode<'_>> for Emitted {
    fn from(blended: &BlendedNode<'_>) -> Self {
        let token = blended.token.as_ref().expect("token reads always carry a token");
        Emitted {
            kind: token.kind(),
            text: token.text().to_owned(),
            full_text: token.to_full_string(),
            position: blended.position,
            reused: blended.reused,
        }
    }
}

pub(crate) struct Blend {
    pub tokens: Vec<Emitted>,
    pub stats: IncrementalStats,
    pub new_text: String,
}

impl Blend {
    pub(crate) fn reused_texts(&self) -> Vec<&str> {
        self.tokens
            .iter()
            .filter(|t| t.reused)
            .map(|t| t.text.as_str())
            .collect()
    }
}

/// Blend `old`'s tree against `edits`, lexing the edited text.
pub(crate) fn blend_with(old: &str, edits: &[TextEdit], options: LexerOptions) -> Blend {
    let tree = parse_with(old, options.clone());
    let (new_doc, changes) = SourceText::new(old).apply_edits(edits).unwrap();
    let mut lexer = Lexer::new(&new_doc, options);
    let mut stream = TokenStream::new(&mut lexer, Some(&tree), &changes).unwrap();
    let tokens = stream.by_ref().map(|b| Emitted::from(&b)).collect();
    Blend {
        tokens,
        stats: stream.stats().clone(),
        new_text: new_doc.to_text(),
    }
}

pub(crate) fn blend(old: &str, edits: &[TextEdit]) -> Blend {
    blend_with(old, edits, LexerOptions::default())
}

/// The same document lexed without an old tree.
pub(crate) fn fresh(text: &str, options: LexerOptions) -> Vec<Emitted> {
    let doc = SourceText::new(text);
    let mut lexer = Lexer::new(&doc, options);
    let stream = TokenStream::new(&mut lexer, None, &[]).unwrap();
    stream.map(|b| Emitted::from(&b)).collect()
}
