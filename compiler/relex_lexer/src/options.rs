//! Lexer configuration.

use rustc_hash::FxHashSet;

use relex_lexer_core::DEFAULT_CHUNK_CAPACITY;

/// How documentation comments are treated.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default, PartialOrd, Ord)]
pub enum DocumentationMode {
    /// `///` and `/** */` are ordinary comments.
    None,
    /// Documentation comments are recognized; XML errors are dropped.
    #[default]
    Parse,
    /// Documentation comments are recognized and XML errors reported.
    Diagnose,
}

/// Options for one lexing session.
#[derive(Clone, Debug)]
pub struct LexerOptions {
    /// Symbols defined before the first line (`-define:` style).
    pub preprocessor_symbols: FxHashSet<Box<str>>,
    pub documentation_mode: DocumentationMode,
    /// Recognize `#` directives in trivia.
    pub allow_directives: bool,
    /// Text window chunk size in characters.
    pub window_capacity: usize,
}

impl Default for LexerOptions {
    fn default() -> Self {
        LexerOptions {
            preprocessor_symbols: FxHashSet::default(),
            documentation_mode: DocumentationMode::default(),
            allow_directives: true,
            window_capacity: DEFAULT_CHUNK_CAPACITY,
        }
    }
}

impl LexerOptions {
    #[must_use]
    pub fn with_symbols<I, S>(mut self, symbols: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<Box<str>>,
    {
        self.preprocessor_symbols
            .extend(symbols.into_iter().map(Into::into));
        self
    }

    #[must_use]
    pub fn with_documentation_mode(mut self, mode: DocumentationMode) -> Self {
        self.documentation_mode = mode;
        self
    }

    #[must_use]
    pub fn with_directives(mut self, allow: bool) -> Self {
        self.allow_directives = allow;
        self
    }

    #[must_use]
    pub fn with_window_capacity(mut self, capacity: usize) -> Self {
        self.window_capacity = capacity;
        self
    }

    /// Symbol is defined by the options.
    pub fn is_symbol_defined(&self, symbol: &str) -> bool {
        self.preprocessor_symbols.contains(symbol)
    }

    /// Documentation comments are lexed as documentation trivia.
    pub fn parses_documentation(&self) -> bool {
        self.documentation_mode >= DocumentationMode::Parse
    }
}
