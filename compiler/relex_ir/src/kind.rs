//! Syntax kinds for tokens, trivia, directives and old-tree nodes.
//!
//! Every fixed-text kind (punctuation, keywords) carries its text so that
//! tokens of those kinds never store their own copy.

/// Declares [`SyntaxKind`] together with its text table and classification
/// predicates from one list.
macro_rules! syntax_kinds {
    (
        punctuation { $($punct:ident = $punct_text:literal,)* }
        keywords { $($kw:ident = $kw_text:literal,)* }
        contextual_keywords { $($ckw:ident = $ckw_text:literal,)* }
        preprocessor_keywords { $($ppkw:ident = $ppkw_text:literal,)* }
        tokens { $($token:ident,)* }
        trivia { $($trivia:ident,)* }
        directive_trivia { $($directive:ident,)* }
        nodes { $($node:ident,)* }
    ) => {
        /// Kind tag shared by tokens, trivia and nodes.
        #[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, PartialOrd, Ord, Default)]
        #[repr(u16)]
        pub enum SyntaxKind {
            #[default]
            None,
            $($punct,)*
            $($kw,)*
            $($ckw,)*
            $($ppkw,)*
            $($token,)*
            $($trivia,)*
            $($directive,)*
            $($node,)*
        }

        impl SyntaxKind {
            /// Fixed source text of punctuation and keyword kinds.
            pub const fn text(self) -> Option<&'static str> {
                match self {
                    $(SyntaxKind::$punct => Some($punct_text),)*
                    $(SyntaxKind::$kw => Some($kw_text),)*
                    $(SyntaxKind::$ckw => Some($ckw_text),)*
                    $(SyntaxKind::$ppkw => Some($ppkw_text),)*
                    _ => None,
                }
            }

            pub const fn is_punctuation(self) -> bool {
                matches!(self, $(SyntaxKind::$punct)|*)
            }

            /// Reserved keyword (always a keyword token when lexed).
            pub const fn is_reserved_keyword(self) -> bool {
                matches!(self, $(SyntaxKind::$kw)|*)
            }

            /// Contextual keyword: lexed as an identifier, promoted by the parser.
            pub const fn is_contextual_keyword(self) -> bool {
                matches!(self, $(SyntaxKind::$ckw)|*)
            }

            /// Keyword only meaningful inside a preprocessor directive.
            pub const fn is_preprocessor_keyword(self) -> bool {
                matches!(self, $(SyntaxKind::$ppkw)|*)
            }

            pub const fn is_trivia(self) -> bool {
                matches!(self, $(SyntaxKind::$trivia)|* $(| SyntaxKind::$directive)*)
            }

            pub const fn is_directive_trivia(self) -> bool {
                matches!(self, $(SyntaxKind::$directive)|*)
            }

            pub const fn is_node(self) -> bool {
                matches!(self, $(SyntaxKind::$node)|*)
            }

            /// Reserved keyword for `text`, if any.
            pub fn reserved_keyword(text: &str) -> Option<SyntaxKind> {
                match text {
                    $($kw_text => Some(SyntaxKind::$kw),)*
                    _ => None,
                }
            }

            /// Contextual keyword for `text`, if any.
            pub fn contextual_keyword(text: &str) -> Option<SyntaxKind> {
                match text {
                    $($ckw_text => Some(SyntaxKind::$ckw),)*
                    _ => None,
                }
            }

            /// Keyword recognized after `#` on a directive line.
            ///
            /// Directive lines reuse a handful of ordinary keywords
            /// (`if`, `else`, `true`, `false`, `default`).
            pub fn preprocessor_keyword(text: &str) -> Option<SyntaxKind> {
                match text {
                    $($ppkw_text => Some(SyntaxKind::$ppkw),)*
                    "if" => Some(SyntaxKind::IfKeyword),
                    "else" => Some(SyntaxKind::ElseKeyword),
                    "true" => Some(SyntaxKind::TrueKeyword),
                    "false" => Some(SyntaxKind::FalseKeyword),
                    "default" => Some(SyntaxKind::DefaultKeyword),
                    _ => None,
                }
            }
        }
    };
}

syntax_kinds! {
    punctuation {
        TildeToken = "~",
        ExclamationToken = "!",
        DollarToken = "$",
        PercentToken = "%",
        CaretToken = "^",
        AmpersandToken = "&",
        AsteriskToken = "*",
        OpenParenToken = "(",
        CloseParenToken = ")",
        MinusToken = "-",
        PlusToken = "+",
        EqualsToken = "=",
        OpenBraceToken = "{",
        CloseBraceToken = "}",
        OpenBracketToken = "[",
        CloseBracketToken = "]",
        BarToken = "|",
        BackslashToken = "\\",
        ColonToken = ":",
        SemicolonToken = ";",
        DoubleQuoteToken = "\"",
        SingleQuoteToken = "'",
        LessThanToken = "<",
        CommaToken = ",",
        GreaterThanToken = ">",
        DotToken = ".",
        QuestionToken = "?",
        HashToken = "#",
        SlashToken = "/",
        BarBarToken = "||",
        AmpersandAmpersandToken = "&&",
        MinusMinusToken = "--",
        PlusPlusToken = "++",
        ColonColonToken = "::",
        QuestionQuestionToken = "??",
        QuestionQuestionEqualsToken = "??=",
        QuestionDotToken = "?.",
        MinusGreaterThanToken = "->",
        ExclamationEqualsToken = "!=",
        EqualsEqualsToken = "==",
        EqualsGreaterThanToken = "=>",
        LessThanEqualsToken = "<=",
        LessThanLessThanToken = "<<",
        LessThanLessThanEqualsToken = "<<=",
        GreaterThanEqualsToken = ">=",
        GreaterThanGreaterThanToken = ">>",
        GreaterThanGreaterThanEqualsToken = ">>=",
        GreaterThanGreaterThanGreaterThanToken = ">>>",
        GreaterThanGreaterThanGreaterThanEqualsToken = ">>>=",
        SlashEqualsToken = "/=",
        AsteriskEqualsToken = "*=",
        BarEqualsToken = "|=",
        AmpersandEqualsToken = "&=",
        PlusEqualsToken = "+=",
        MinusEqualsToken = "-=",
        CaretEqualsToken = "^=",
        PercentEqualsToken = "%=",
        DotDotToken = "..",
        SlashGreaterThanToken = "/>",
        LessThanSlashToken = "</",
        XmlCommentStartToken = "<!--",
        XmlCommentEndToken = "-->",
        XmlCDataStartToken = "<![CDATA[",
        XmlCDataEndToken = "]]>",
        XmlProcessingInstructionStartToken = "<?",
        XmlProcessingInstructionEndToken = "?>",
    }
    keywords {
        AbstractKeyword = "abstract",
        AsKeyword = "as",
        BaseKeyword = "base",
        BoolKeyword = "bool",
        BreakKeyword = "break",
        ByteKeyword = "byte",
        CaseKeyword = "case",
        CatchKeyword = "catch",
        CharKeyword = "char",
        CheckedKeyword = "checked",
        ClassKeyword = "class",
        ConstKeyword = "const",
        ContinueKeyword = "continue",
        DecimalKeyword = "decimal",
        DefaultKeyword = "default",
        DelegateKeyword = "delegate",
        DoKeyword = "do",
        DoubleKeyword = "double",
        ElseKeyword = "else",
        EnumKeyword = "enum",
        EventKeyword = "event",
        ExplicitKeyword = "explicit",
        ExternKeyword = "extern",
        FalseKeyword = "false",
        FinallyKeyword = "finally",
        FixedKeyword = "fixed",
        FloatKeyword = "float",
        ForKeyword = "for",
        ForEachKeyword = "foreach",
        GotoKeyword = "goto",
        IfKeyword = "if",
        ImplicitKeyword = "implicit",
        InKeyword = "in",
        IntKeyword = "int",
        InterfaceKeyword = "interface",
        InternalKeyword = "internal",
        IsKeyword = "is",
        LockKeyword = "lock",
        LongKeyword = "long",
        NamespaceKeyword = "namespace",
        NewKeyword = "new",
        NullKeyword = "null",
        ObjectKeyword = "object",
        OperatorKeyword = "operator",
        OutKeyword = "out",
        OverrideKeyword = "override",
        ParamsKeyword = "params",
        PrivateKeyword = "private",
        ProtectedKeyword = "protected",
        PublicKeyword = "public",
        ReadOnlyKeyword = "readonly",
        RefKeyword = "ref",
        ReturnKeyword = "return",
        SByteKeyword = "sbyte",
        SealedKeyword = "sealed",
        ShortKeyword = "short",
        SizeOfKeyword = "sizeof",
        StackAllocKeyword = "stackalloc",
        StaticKeyword = "static",
        StringKeyword = "string",
        StructKeyword = "struct",
        SwitchKeyword = "switch",
        ThisKeyword = "this",
        ThrowKeyword = "throw",
        TrueKeyword = "true",
        TryKeyword = "try",
        TypeOfKeyword = "typeof",
        UIntKeyword = "uint",
        ULongKeyword = "ulong",
        UncheckedKeyword = "unchecked",
        UnsafeKeyword = "unsafe",
        UShortKeyword = "ushort",
        UsingKeyword = "using",
        VirtualKeyword = "virtual",
        VoidKeyword = "void",
        VolatileKeyword = "volatile",
        WhileKeyword = "while",
    }
    contextual_keywords {
        AddKeyword = "add",
        AliasKeyword = "alias",
        AscendingKeyword = "ascending",
        AsyncKeyword = "async",
        AwaitKeyword = "await",
        ByKeyword = "by",
        DescendingKeyword = "descending",
        DynamicKeyword = "dynamic",
        EqualsKeyword = "equals",
        FileKeyword = "file",
        FromKeyword = "from",
        GetKeyword = "get",
        GlobalKeyword = "global",
        GroupKeyword = "group",
        InitKeyword = "init",
        IntoKeyword = "into",
        JoinKeyword = "join",
        LetKeyword = "let",
        ManagedKeyword = "managed",
        NameOfKeyword = "nameof",
        NotNullKeyword = "notnull",
        OnKeyword = "on",
        OrderByKeyword = "orderby",
        PartialKeyword = "partial",
        RecordKeyword = "record",
        RemoveKeyword = "remove",
        RequiredKeyword = "required",
        ScopedKeyword = "scoped",
        SelectKeyword = "select",
        SetKeyword = "set",
        UnmanagedKeyword = "unmanaged",
        ValueKeyword = "value",
        VarKeyword = "var",
        WhenKeyword = "when",
        WhereKeyword = "where",
        WithKeyword = "with",
        YieldKeyword = "yield",
    }
    preprocessor_keywords {
        ElifKeyword = "elif",
        EndIfKeyword = "endif",
        DefineKeyword = "define",
        UndefKeyword = "undef",
        RegionKeyword = "region",
        EndRegionKeyword = "endregion",
        ErrorKeyword = "error",
        WarningKeyword = "warning",
        LineKeyword = "line",
        PragmaKeyword = "pragma",
        NullableKeyword = "nullable",
        HiddenKeyword = "hidden",
        DisableKeyword = "disable",
        RestoreKeyword = "restore",
        EnableKeyword = "enable",
        ChecksumKeyword = "checksum",
    }
    tokens {
        IdentifierToken,
        NumericLiteralToken,
        CharacterLiteralToken,
        StringLiteralToken,
        SingleLineRawStringLiteralToken,
        MultiLineRawStringLiteralToken,
        InterpolatedStringToken,
        InterpolatedStringStartToken,
        InterpolatedStringTextToken,
        InterpolatedStringEndToken,
        XmlNameToken,
        XmlEntityLiteralToken,
        XmlTextLiteralToken,
        XmlTextLiteralNewLineToken,
        EndOfDirectiveToken,
        EndOfDocumentationCommentToken,
        EndOfFileToken,
        BadToken,
    }
    trivia {
        WhitespaceTrivia,
        EndOfLineTrivia,
        SingleLineCommentTrivia,
        MultiLineCommentTrivia,
        SingleLineDocumentationCommentTrivia,
        MultiLineDocumentationCommentTrivia,
        DocumentationCommentExteriorTrivia,
        DisabledTextTrivia,
        SkippedTokensTrivia,
    }
    directive_trivia {
        IfDirectiveTrivia,
        ElifDirectiveTrivia,
        ElseDirectiveTrivia,
        EndIfDirectiveTrivia,
        RegionDirectiveTrivia,
        EndRegionDirectiveTrivia,
        DefineDirectiveTrivia,
        UndefDirectiveTrivia,
        ErrorDirectiveTrivia,
        WarningDirectiveTrivia,
        LineDirectiveTrivia,
        PragmaDirectiveTrivia,
        NullableDirectiveTrivia,
        BadDirectiveTrivia,
    }
    nodes {
        CompilationUnit,
        NamespaceDeclaration,
        ClassDeclaration,
        MethodDeclaration,
        Block,
        LocalDeclarationStatement,
        ExpressionStatement,
        ReturnStatement,
        VariableDeclaration,
        VariableDeclarator,
        EqualsValueClause,
        BinaryExpression,
        InvocationExpression,
        ArgumentList,
        IdentifierName,
        LiteralExpression,
        InterpolatedStringExpression,
        InterpolatedStringText,
        Interpolation,
        List,
    }
}

/// Longest reserved or contextual keyword, in characters.
///
/// Identifiers longer than this are never looked up as keywords.
pub const MAX_KEYWORD_LENGTH: usize = 10;

impl SyntaxKind {
    /// Any token kind, including fixed-text kinds.
    pub const fn is_token(self) -> bool {
        !matches!(self, SyntaxKind::None) && !self.is_trivia() && !self.is_node()
    }

    /// Reserved or contextual keyword.
    pub const fn is_keyword(self) -> bool {
        self.is_reserved_keyword() || self.is_contextual_keyword()
    }

    /// Tokens the fresh lexer never produces: the grammar parser builds them
    /// by merging adjacent `>` tokens or by promoting identifiers.
    pub const fn is_fabricated(self) -> bool {
        matches!(
            self,
            SyntaxKind::GreaterThanGreaterThanToken
                | SyntaxKind::GreaterThanGreaterThanEqualsToken
                | SyntaxKind::GreaterThanGreaterThanGreaterThanToken
                | SyntaxKind::GreaterThanGreaterThanGreaterThanEqualsToken
        ) || self.is_contextual_keyword()
    }

    /// Literal token kinds that carry a value.
    pub const fn is_literal(self) -> bool {
        matches!(
            self,
            SyntaxKind::NumericLiteralToken
                | SyntaxKind::CharacterLiteralToken
                | SyntaxKind::StringLiteralToken
                | SyntaxKind::SingleLineRawStringLiteralToken
                | SyntaxKind::MultiLineRawStringLiteralToken
                | SyntaxKind::InterpolatedStringToken
        )
    }

    /// Comment trivia of any flavor.
    pub const fn is_comment_trivia(self) -> bool {
        matches!(
            self,
            SyntaxKind::SingleLineCommentTrivia
                | SyntaxKind::MultiLineCommentTrivia
                | SyntaxKind::SingleLineDocumentationCommentTrivia
                | SyntaxKind::MultiLineDocumentationCommentTrivia
        )
    }
}

#[cfg(test)]
mod tests;
