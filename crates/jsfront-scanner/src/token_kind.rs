//! Token categories.

use serde::Serialize;

/// How the next token should be lexed.
///
/// The grammar decides whether a `/` starts a regular expression (an operand
/// is expected) or is the division operator, and whether a `}` closes a
/// block or continues a template literal after a substitution.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum LexMode {
    /// An operand is expected: `/` begins a regular expression.
    Operand,
    /// An operator is expected: `/` is division.
    Operator,
    /// Just after a template substitution: `}` continues the template.
    TemplateTail,
}

/// The syntactic category of a token.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum TokenKind {
    Eof,

    // Names and literals
    Name,
    PrivateName,
    Number,
    BigInt,
    String,
    /// A template chunk ending in `${`.
    TemplateHead,
    /// A template chunk ending in a backtick.
    NoSubsTemplate,
    RegExp,

    // Punctuators
    Semi,
    Comma,
    Hook,
    Colon,
    Inc,
    Dec,
    Dot,
    TripleDot,
    OptionalChain,
    LeftBracket,
    RightBracket,
    LeftCurly,
    RightCurly,
    LeftParen,
    RightParen,
    Arrow,
    Not,
    BitNot,
    At,

    // Assignment operators
    Assign,
    AddAssign,
    SubAssign,
    CoalesceAssign,
    OrAssign,
    AndAssign,
    BitOrAssign,
    BitXorAssign,
    BitAndAssign,
    LshAssign,
    RshAssign,
    UrshAssign,
    MulAssign,
    DivAssign,
    ModAssign,
    PowAssign,

    // Binary operators, in precedence-table order
    Coalesce,
    Or,
    And,
    BitOr,
    BitXor,
    BitAnd,
    StrictEq,
    Eq,
    StrictNe,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
    InstanceOf,
    In,
    Lsh,
    Rsh,
    Ursh,
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    Pow,

    // Reserved words
    Break,
    Case,
    Catch,
    Class,
    Const,
    Continue,
    Debugger,
    Default,
    Delete,
    Do,
    Else,
    Enum,
    Export,
    Extends,
    False,
    Finally,
    For,
    Function,
    If,
    Import,
    New,
    Null,
    Return,
    Super,
    Switch,
    This,
    Throw,
    True,
    Try,
    TypeOf,
    Var,
    Void,
    While,
    With,
}

/// Number of binary-operator precedence classes.
pub const PRECEDENCE_CLASSES: usize = 12;

impl TokenKind {
    /// Map reserved-word text to its token kind.
    pub fn keyword(text: &str) -> Option<TokenKind> {
        let kind = match text {
            "break" => TokenKind::Break,
            "case" => TokenKind::Case,
            "catch" => TokenKind::Catch,
            "class" => TokenKind::Class,
            "const" => TokenKind::Const,
            "continue" => TokenKind::Continue,
            "debugger" => TokenKind::Debugger,
            "default" => TokenKind::Default,
            "delete" => TokenKind::Delete,
            "do" => TokenKind::Do,
            "else" => TokenKind::Else,
            "enum" => TokenKind::Enum,
            "export" => TokenKind::Export,
            "extends" => TokenKind::Extends,
            "false" => TokenKind::False,
            "finally" => TokenKind::Finally,
            "for" => TokenKind::For,
            "function" => TokenKind::Function,
            "if" => TokenKind::If,
            "import" => TokenKind::Import,
            "in" => TokenKind::In,
            "instanceof" => TokenKind::InstanceOf,
            "new" => TokenKind::New,
            "null" => TokenKind::Null,
            "return" => TokenKind::Return,
            "super" => TokenKind::Super,
            "switch" => TokenKind::Switch,
            "this" => TokenKind::This,
            "throw" => TokenKind::Throw,
            "true" => TokenKind::True,
            "try" => TokenKind::Try,
            "typeof" => TokenKind::TypeOf,
            "var" => TokenKind::Var,
            "void" => TokenKind::Void,
            "while" => TokenKind::While,
            "with" => TokenKind::With,
            _ => return None,
        };
        Some(kind)
    }

    /// Names that are reserved only in strict mode code.
    pub fn is_strict_reserved_word(text: &str) -> bool {
        matches!(
            text,
            "implements"
                | "interface"
                | "package"
                | "private"
                | "protected"
                | "public"
                | "static"
                | "let"
                | "yield"
        )
    }

    pub fn is_keyword(self) -> bool {
        matches!(
            self,
            TokenKind::Break
                | TokenKind::Case
                | TokenKind::Catch
                | TokenKind::Class
                | TokenKind::Const
                | TokenKind::Continue
                | TokenKind::Debugger
                | TokenKind::Default
                | TokenKind::Delete
                | TokenKind::Do
                | TokenKind::Else
                | TokenKind::Enum
                | TokenKind::Export
                | TokenKind::Extends
                | TokenKind::False
                | TokenKind::Finally
                | TokenKind::For
                | TokenKind::Function
                | TokenKind::If
                | TokenKind::Import
                | TokenKind::In
                | TokenKind::InstanceOf
                | TokenKind::New
                | TokenKind::Null
                | TokenKind::Return
                | TokenKind::Super
                | TokenKind::Switch
                | TokenKind::This
                | TokenKind::Throw
                | TokenKind::True
                | TokenKind::Try
                | TokenKind::TypeOf
                | TokenKind::Var
                | TokenKind::Void
                | TokenKind::While
                | TokenKind::With
        )
    }

    /// Reserved words and names are both acceptable as property names.
    pub fn is_identifier_name(self) -> bool {
        self == TokenKind::Name || self.is_keyword()
    }

    pub fn is_assignment(self) -> bool {
        matches!(
            self,
            TokenKind::Assign
                | TokenKind::AddAssign
                | TokenKind::SubAssign
                | TokenKind::CoalesceAssign
                | TokenKind::OrAssign
                | TokenKind::AndAssign
                | TokenKind::BitOrAssign
                | TokenKind::BitXorAssign
                | TokenKind::BitAndAssign
                | TokenKind::LshAssign
                | TokenKind::RshAssign
                | TokenKind::UrshAssign
                | TokenKind::MulAssign
                | TokenKind::DivAssign
                | TokenKind::ModAssign
                | TokenKind::PowAssign
        )
    }

    /// Binary operator precedence class (1 = loosest, 12 = `**`), or `None`
    /// if this token is not a binary operator.
    pub fn binary_precedence(self) -> Option<u8> {
        let precedence = match self {
            TokenKind::Coalesce => 1,
            TokenKind::Or => 2,
            TokenKind::And => 3,
            TokenKind::BitOr => 4,
            TokenKind::BitXor => 5,
            TokenKind::BitAnd => 6,
            TokenKind::StrictEq | TokenKind::Eq | TokenKind::StrictNe | TokenKind::Ne => 7,
            TokenKind::Lt
            | TokenKind::Le
            | TokenKind::Gt
            | TokenKind::Ge
            | TokenKind::InstanceOf
            | TokenKind::In => 8,
            TokenKind::Lsh | TokenKind::Rsh | TokenKind::Ursh => 9,
            TokenKind::Add | TokenKind::Sub => 10,
            TokenKind::Mul | TokenKind::Div | TokenKind::Mod => 11,
            TokenKind::Pow => 12,
            _ => return None,
        };
        Some(precedence)
    }

    pub fn is_binary_op(self) -> bool {
        self.binary_precedence().is_some()
    }

    /// Tokens whose lexing depends on the `LexMode` they were read under.
    pub fn is_mode_sensitive(self) -> bool {
        matches!(
            self,
            TokenKind::Div
                | TokenKind::DivAssign
                | TokenKind::RegExp
                | TokenKind::RightCurly
                | TokenKind::TemplateHead
                | TokenKind::NoSubsTemplate
        )
    }

    /// Human readable description used in "expected X, got Y" diagnostics.
    pub fn description(self) -> &'static str {
        match self {
            TokenKind::Eof => "end of script",
            TokenKind::Name => "identifier",
            TokenKind::PrivateName => "private name",
            TokenKind::Number => "numeric literal",
            TokenKind::BigInt => "bigint literal",
            TokenKind::String => "string literal",
            TokenKind::TemplateHead | TokenKind::NoSubsTemplate => "template literal",
            TokenKind::RegExp => "regular expression literal",
            TokenKind::Semi => "';'",
            TokenKind::Comma => "','",
            TokenKind::Hook => "'?'",
            TokenKind::Colon => "':'",
            TokenKind::Inc => "'++'",
            TokenKind::Dec => "'--'",
            TokenKind::Dot => "'.'",
            TokenKind::TripleDot => "'...'",
            TokenKind::OptionalChain => "'?.'",
            TokenKind::LeftBracket => "'['",
            TokenKind::RightBracket => "']'",
            TokenKind::LeftCurly => "'{'",
            TokenKind::RightCurly => "'}'",
            TokenKind::LeftParen => "'('",
            TokenKind::RightParen => "')'",
            TokenKind::Arrow => "'=>'",
            TokenKind::Not => "'!'",
            TokenKind::BitNot => "'~'",
            TokenKind::At => "'@'",
            TokenKind::Assign => "'='",
            TokenKind::AddAssign => "'+='",
            TokenKind::SubAssign => "'-='",
            TokenKind::CoalesceAssign => "'??='",
            TokenKind::OrAssign => "'||='",
            TokenKind::AndAssign => "'&&='",
            TokenKind::BitOrAssign => "'|='",
            TokenKind::BitXorAssign => "'^='",
            TokenKind::BitAndAssign => "'&='",
            TokenKind::LshAssign => "'<<='",
            TokenKind::RshAssign => "'>>='",
            TokenKind::UrshAssign => "'>>>='",
            TokenKind::MulAssign => "'*='",
            TokenKind::DivAssign => "'/='",
            TokenKind::ModAssign => "'%='",
            TokenKind::PowAssign => "'**='",
            TokenKind::Coalesce => "'??'",
            TokenKind::Or => "'||'",
            TokenKind::And => "'&&'",
            TokenKind::BitOr => "'|'",
            TokenKind::BitXor => "'^'",
            TokenKind::BitAnd => "'&'",
            TokenKind::StrictEq => "'==='",
            TokenKind::Eq => "'=='",
            TokenKind::StrictNe => "'!=='",
            TokenKind::Ne => "'!='",
            TokenKind::Lt => "'<'",
            TokenKind::Le => "'<='",
            TokenKind::Gt => "'>'",
            TokenKind::Ge => "'>='",
            TokenKind::InstanceOf => "keyword 'instanceof'",
            TokenKind::In => "keyword 'in'",
            TokenKind::Lsh => "'<<'",
            TokenKind::Rsh => "'>>'",
            TokenKind::Ursh => "'>>>'",
            TokenKind::Add => "'+'",
            TokenKind::Sub => "'-'",
            TokenKind::Mul => "'*'",
            TokenKind::Div => "'/'",
            TokenKind::Mod => "'%'",
            TokenKind::Pow => "'**'",
            TokenKind::Break => "keyword 'break'",
            TokenKind::Case => "keyword 'case'",
            TokenKind::Catch => "keyword 'catch'",
            TokenKind::Class => "keyword 'class'",
            TokenKind::Const => "keyword 'const'",
            TokenKind::Continue => "keyword 'continue'",
            TokenKind::Debugger => "keyword 'debugger'",
            TokenKind::Default => "keyword 'default'",
            TokenKind::Delete => "keyword 'delete'",
            TokenKind::Do => "keyword 'do'",
            TokenKind::Else => "keyword 'else'",
            TokenKind::Enum => "keyword 'enum'",
            TokenKind::Export => "keyword 'export'",
            TokenKind::Extends => "keyword 'extends'",
            TokenKind::False => "boolean literal 'false'",
            TokenKind::Finally => "keyword 'finally'",
            TokenKind::For => "keyword 'for'",
            TokenKind::Function => "keyword 'function'",
            TokenKind::If => "keyword 'if'",
            TokenKind::Import => "keyword 'import'",
            TokenKind::New => "keyword 'new'",
            TokenKind::Null => "null literal",
            TokenKind::Return => "keyword 'return'",
            TokenKind::Super => "keyword 'super'",
            TokenKind::Switch => "keyword 'switch'",
            TokenKind::This => "keyword 'this'",
            TokenKind::Throw => "keyword 'throw'",
            TokenKind::True => "boolean literal 'true'",
            TokenKind::Try => "keyword 'try'",
            TokenKind::TypeOf => "keyword 'typeof'",
            TokenKind::Var => "keyword 'var'",
            TokenKind::Void => "keyword 'void'",
            TokenKind::While => "keyword 'while'",
            TokenKind::With => "keyword 'with'",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_precedence_classes() {
        assert_eq!(TokenKind::Coalesce.binary_precedence(), Some(1));
        assert_eq!(TokenKind::Pow.binary_precedence(), Some(PRECEDENCE_CLASSES as u8));
        assert!(TokenKind::Mul.binary_precedence() > TokenKind::Add.binary_precedence());
        assert_eq!(TokenKind::Assign.binary_precedence(), None);
    }

    #[test]
    fn test_keyword_table() {
        assert_eq!(TokenKind::keyword("function"), Some(TokenKind::Function));
        assert_eq!(TokenKind::keyword("let"), None);
        assert!(TokenKind::is_strict_reserved_word("let"));
        assert!(TokenKind::InstanceOf.is_keyword());
        assert!(TokenKind::In.is_identifier_name());
    }
}
