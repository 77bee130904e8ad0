//! Syntax kinds for Python source trees
//!
//! Every token and node in the tree carries one of these kinds. Kinds are
//! numbered by declaration order, which is also their raw rowan value.

macro_rules! syntax_kinds {
    ($($(#[$attr:meta])* $name:ident),* $(,)?) => {
        /// All token and node kinds that can appear in a Python tree
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
        #[repr(u16)]
        pub enum PySyntaxKind {
            $($(#[$attr])* $name),*
        }

        impl PySyntaxKind {
            /// Every kind, indexed by its raw value
            pub const ALL: &'static [PySyntaxKind] = &[$(PySyntaxKind::$name),*];
        }
    };
}

syntax_kinds! {
    // Trivia
    /// Spaces, tabs and form feeds
    Whitespace,
    /// `# ...` up to, not including, the line break
    Comment,
    /// A line break that does not end a logical line
    Nl,
    /// A backslash followed by its line break
    LineContinuation,

    // Layout
    /// A line break that ends a logical line. Zero-width at end of input.
    Newline,
    /// Zero-width marker for an increase in indentation
    Indent,
    /// Zero-width marker for a decrease in indentation
    Dedent,

    // Literals & identifiers
    Ident,
    Number,
    /// A complete string literal including prefix and quotes
    Str,

    // Keywords
    FalseKw,
    NoneKw,
    TrueKw,
    AndKw,
    AsKw,
    AssertKw,
    AsyncKw,
    AwaitKw,
    BreakKw,
    ClassKw,
    ContinueKw,
    DefKw,
    DelKw,
    ElifKw,
    ElseKw,
    ExceptKw,
    FinallyKw,
    ForKw,
    FromKw,
    GlobalKw,
    IfKw,
    ImportKw,
    InKw,
    IsKw,
    LambdaKw,
    NonlocalKw,
    NotKw,
    OrKw,
    PassKw,
    RaiseKw,
    ReturnKw,
    TryKw,
    WhileKw,
    WithKw,
    YieldKw,

    // Punctuation
    LParen,
    RParen,
    LBracket,
    RBracket,
    LBrace,
    RBrace,
    Comma,
    Colon,
    Semicolon,
    Dot,
    Ellipsis,
    Arrow,
    At,
    /// Python 2 repr quote
    Backquote,
    Eq,
    ColonEq,

    // Operators
    Plus,
    Minus,
    Star,
    DoubleStar,
    Slash,
    DoubleSlash,
    Percent,
    Amp,
    Pipe,
    Caret,
    Tilde,
    Shl,
    Shr,
    Lt,
    Gt,
    LtEq,
    GtEq,
    EqEq,
    NotEq,
    LtGt,

    // Augmented assignment
    PlusEq,
    MinusEq,
    StarEq,
    DoubleStarEq,
    SlashEq,
    DoubleSlashEq,
    PercentEq,
    AmpEq,
    PipeEq,
    CaretEq,
    ShlEq,
    ShrEq,
    AtEq,

    /// A character sequence the lexer could not classify
    ErrorToken,

    // Structure nodes
    Module,
    SimpleStmt,
    ExprStmt,
    PassStmt,
    BreakStmt,
    ContinueStmt,
    ReturnStmt,
    RaiseStmt,
    GlobalStmt,
    NonlocalStmt,
    DelStmt,
    AssertStmt,
    /// Python 2 `exec code in globals, locals`
    ExecStmt,
    ImportStmt,
    ImportFromStmt,
    ImportAlias,
    DottedName,
    IfStmt,
    ElifClause,
    ElseClause,
    WhileStmt,
    ForStmt,
    TryStmt,
    ExceptClause,
    FinallyClause,
    WithStmt,
    WithItem,
    FuncDef,
    ParamList,
    Param,
    ClassDef,
    Decorated,
    Decorator,
    Suite,

    // Expression nodes
    Name,
    Literal,
    StringLiteral,
    ParenExpr,
    /// Python 2 `` `expr` ``
    ReprExpr,
    ListExpr,
    BraceExpr,
    DictEntry,
    TupleExpr,
    StarExpr,
    NamedExpr,
    LambdaExpr,
    TernaryExpr,
    BoolOpExpr,
    NotExpr,
    CompareExpr,
    BinExpr,
    UnaryExpr,
    /// An atom with its `await`, trailers and `**` exponent
    PowerExpr,
    AttrTrailer,
    CallTrailer,
    SubscriptTrailer,
    ArgList,
    /// Keyword, starred or generator argument
    Argument,
    SubscriptList,
    Slice,
    CompFor,
    CompIf,
    YieldExpr,

    /// Tokens skipped while recovering from a syntax error
    Error,

    // Sentinels
    /// End of input. Never stored in a tree.
    Eof,
    /// Raw value outside the known range
    Unknown,
}

impl PySyntaxKind {
    /// Whitespace, comments, non-logical line breaks and continuations
    pub fn is_trivia(self) -> bool {
        matches!(
            self,
            PySyntaxKind::Whitespace
                | PySyntaxKind::Comment
                | PySyntaxKind::Nl
                | PySyntaxKind::LineContinuation
        )
    }

    pub fn is_keyword(self) -> bool {
        (PySyntaxKind::FalseKw as u16..=PySyntaxKind::YieldKw as u16).contains(&(self as u16))
    }

    /// `+=`, `-=` and the other augmented assignment operators
    pub fn is_augmented_assign(self) -> bool {
        (PySyntaxKind::PlusEq as u16..=PySyntaxKind::AtEq as u16).contains(&(self as u16))
    }

    /// Look up the keyword kind for an identifier-shaped word
    pub fn from_keyword(word: &str) -> Option<PySyntaxKind> {
        let kind = match word {
            "False" => PySyntaxKind::FalseKw,
            "None" => PySyntaxKind::NoneKw,
            "True" => PySyntaxKind::TrueKw,
            "and" => PySyntaxKind::AndKw,
            "as" => PySyntaxKind::AsKw,
            "assert" => PySyntaxKind::AssertKw,
            "async" => PySyntaxKind::AsyncKw,
            "await" => PySyntaxKind::AwaitKw,
            "break" => PySyntaxKind::BreakKw,
            "class" => PySyntaxKind::ClassKw,
            "continue" => PySyntaxKind::ContinueKw,
            "def" => PySyntaxKind::DefKw,
            "del" => PySyntaxKind::DelKw,
            "elif" => PySyntaxKind::ElifKw,
            "else" => PySyntaxKind::ElseKw,
            "except" => PySyntaxKind::ExceptKw,
            "finally" => PySyntaxKind::FinallyKw,
            "for" => PySyntaxKind::ForKw,
            "from" => PySyntaxKind::FromKw,
            "global" => PySyntaxKind::GlobalKw,
            "if" => PySyntaxKind::IfKw,
            "import" => PySyntaxKind::ImportKw,
            "in" => PySyntaxKind::InKw,
            "is" => PySyntaxKind::IsKw,
            "lambda" => PySyntaxKind::LambdaKw,
            "nonlocal" => PySyntaxKind::NonlocalKw,
            "not" => PySyntaxKind::NotKw,
            "or" => PySyntaxKind::OrKw,
            "pass" => PySyntaxKind::PassKw,
            "raise" => PySyntaxKind::RaiseKw,
            "return" => PySyntaxKind::ReturnKw,
            "try" => PySyntaxKind::TryKw,
            "while" => PySyntaxKind::WhileKw,
            "with" => PySyntaxKind::WithKw,
            "yield" => PySyntaxKind::YieldKw,
            _ => return None,
        };
        Some(kind)
    }

    /// Human-readable form used in parser diagnostics
    pub fn describe(self) -> &'static str {
        match self {
            PySyntaxKind::Newline => "newline",
            PySyntaxKind::Indent => "indented block",
            PySyntaxKind::Dedent => "dedent",
            PySyntaxKind::Ident => "identifier",
            PySyntaxKind::Number => "number",
            PySyntaxKind::Str => "string",
            PySyntaxKind::InKw => "'in'",
            PySyntaxKind::ElseKw => "'else'",
            PySyntaxKind::ImportKw => "'import'",
            PySyntaxKind::ForKw => "'for'",
            PySyntaxKind::LParen => "'('",
            PySyntaxKind::RParen => "')'",
            PySyntaxKind::LBracket => "'['",
            PySyntaxKind::RBracket => "']'",
            PySyntaxKind::LBrace => "'{'",
            PySyntaxKind::RBrace => "'}'",
            PySyntaxKind::Comma => "','",
            PySyntaxKind::Colon => "':'",
            PySyntaxKind::Eq => "'='",
            PySyntaxKind::Backquote => "'`'",
            PySyntaxKind::Eof => "end of file",
            _ => "token",
        }
    }
}

impl From<PySyntaxKind> for rowan::SyntaxKind {
    fn from(kind: PySyntaxKind) -> Self {
        rowan::SyntaxKind(kind as u16)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_is_indexed_by_raw_value() {
        for (index, kind) in PySyntaxKind::ALL.iter().enumerate() {
            assert_eq!(*kind as usize, index, "{kind:?} is out of order");
        }
    }

    #[test]
    fn test_keywords() {
        assert_eq!(PySyntaxKind::from_keyword("def"), Some(PySyntaxKind::DefKw));
        assert_eq!(PySyntaxKind::from_keyword("None"), Some(PySyntaxKind::NoneKw));
        assert_eq!(PySyntaxKind::from_keyword("print"), None);
        assert_eq!(PySyntaxKind::from_keyword("self"), None);
        assert!(PySyntaxKind::YieldKw.is_keyword());
        assert!(PySyntaxKind::FalseKw.is_keyword());
        assert!(!PySyntaxKind::Ident.is_keyword());
        assert!(!PySyntaxKind::LParen.is_keyword());
    }

    #[test]
    fn test_trivia_kinds() {
        assert!(PySyntaxKind::Whitespace.is_trivia());
        assert!(PySyntaxKind::Comment.is_trivia());
        assert!(PySyntaxKind::Nl.is_trivia());
        assert!(PySyntaxKind::LineContinuation.is_trivia());
        assert!(!PySyntaxKind::Newline.is_trivia());
        assert!(!PySyntaxKind::Indent.is_trivia());
    }
}
