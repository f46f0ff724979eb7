//! Lexer for Go source files.
//!
//! Tokenization is done by a logos-derived enum. Comments and newlines are
//! consumed by [`tokenize`], which applies Go's automatic semicolon
//! insertion so the parser only ever sees explicit `;` separators.

use std::ops::Range;

use logos::Logos;

/// Byte range of a token in its source file.
pub type Span = Range<usize>;

/// A Go token.
///
/// `Newline` and `BlockComment` are produced by the raw lexer only and are
/// never returned from [`tokenize`].
#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
#[logos(skip r"[ \t\r\f]+")]
#[logos(skip r"//[^\n]*")]
pub enum Token {
    #[token("\n")]
    Newline,

    /// Carries whether the comment spans more than one line.
    #[token("/*", lex_block_comment)]
    BlockComment(bool),

    // Keywords
    #[token("break")]
    Break,
    #[token("case")]
    Case,
    #[token("chan")]
    Chan,
    #[token("const")]
    Const,
    #[token("continue")]
    Continue,
    #[token("default")]
    Default,
    #[token("defer")]
    Defer,
    #[token("else")]
    Else,
    #[token("fallthrough")]
    Fallthrough,
    #[token("for")]
    For,
    #[token("func")]
    Func,
    #[token("go")]
    Go,
    #[token("goto")]
    Goto,
    #[token("if")]
    If,
    #[token("import")]
    Import,
    #[token("interface")]
    Interface,
    #[token("map")]
    Map,
    #[token("package")]
    Package,
    #[token("range")]
    Range,
    #[token("return")]
    Return,
    #[token("select")]
    Select,
    #[token("struct")]
    Struct,
    #[token("switch")]
    Switch,
    #[token("type")]
    Type,
    #[token("var")]
    Var,

    #[regex(r"[\p{L}_][\p{L}\p{Nd}_]*")]
    Ident,

    // Literals
    #[regex(r"[0-9][0-9a-zA-Z_]*(\.[0-9a-zA-Z_]*)?")]
    #[regex(r"\.[0-9][0-9a-zA-Z_]*")]
    Number,
    #[regex(r#""([^"\\\n]|\\.)*""#)]
    #[regex(r"`[^`]*`")]
    String,
    #[regex(r"'([^'\\\n]|\\.)+'")]
    Rune,

    // Delimiters
    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[token("[")]
    LBracket,
    #[token("]")]
    RBracket,
    #[token("{")]
    LBrace,
    #[token("}")]
    RBrace,
    #[token(",")]
    Comma,
    #[token(";")]
    Semicolon,
    #[token(".")]
    Dot,
    #[token("...")]
    Ellipsis,

    // Operators that appear in type syntax
    #[token("*")]
    Star,
    #[token("<-")]
    Arrow,
    #[token("~")]
    Tilde,
    #[token("|")]
    Pipe,
    #[token("=")]
    Assign,
    #[token("++")]
    Increment,
    #[token("--")]
    Decrement,

    // Every other operator; only their extent matters to the reflector.
    #[token("+")]
    #[token("-")]
    #[token("/")]
    #[token("%")]
    #[token("&")]
    #[token("^")]
    #[token("<<")]
    #[token(">>")]
    #[token("&^")]
    #[token("+=")]
    #[token("-=")]
    #[token("*=")]
    #[token("/=")]
    #[token("%=")]
    #[token("&=")]
    #[token("|=")]
    #[token("^=")]
    #[token("<<=")]
    #[token(">>=")]
    #[token("&^=")]
    #[token("&&")]
    #[token("||")]
    #[token("==")]
    #[token("!=")]
    #[token("<")]
    #[token("<=")]
    #[token(">")]
    #[token(">=")]
    #[token(":=")]
    #[token("!")]
    #[token(":")]
    Operator,
}

impl Token {
    /// Whether a line ending in this token gets an implicit `;`.
    fn ends_statement(&self) -> bool {
        matches!(
            self,
            Token::Ident
                | Token::Number
                | Token::String
                | Token::Rune
                | Token::Break
                | Token::Continue
                | Token::Fallthrough
                | Token::Return
                | Token::Increment
                | Token::Decrement
                | Token::RParen
                | Token::RBracket
                | Token::RBrace
        )
    }

    /// Human-readable description used in syntax errors.
    pub fn describe(&self) -> &'static str {
        match self {
            Token::Newline => "newline",
            Token::BlockComment(_) => "comment",
            Token::Ident => "identifier",
            Token::Number => "number",
            Token::String => "string",
            Token::Rune => "rune",
            Token::LParen => "'('",
            Token::RParen => "')'",
            Token::LBracket => "'['",
            Token::RBracket => "']'",
            Token::LBrace => "'{'",
            Token::RBrace => "'}'",
            Token::Comma => "','",
            Token::Semicolon => "';'",
            Token::Dot => "'.'",
            Token::Ellipsis => "'...'",
            Token::Star => "'*'",
            Token::Arrow => "'<-'",
            Token::Tilde => "'~'",
            Token::Pipe => "'|'",
            Token::Assign => "'='",
            Token::Increment => "'++'",
            Token::Decrement => "'--'",
            Token::Operator => "operator",
            _ => "keyword",
        }
    }
}

fn lex_block_comment(lex: &mut logos::Lexer<Token>) -> Option<bool> {
    // "/*" is already consumed
    let remainder = lex.remainder();
    let end = remainder.find("*/")?;
    let multiline = remainder[..end].contains('\n');
    lex.bump(end + 2);
    Some(multiline)
}

/// A token with its source span.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Spanned {
    pub token: Token,
    pub span: Span,
}

impl Spanned {
    /// An empty span marks a semicolon inserted at a line break.
    pub fn is_implicit(&self) -> bool {
        self.span.is_empty()
    }

    /// Description used in "found ..." messages.
    pub fn describe(&self) -> &'static str {
        if self.token == Token::Semicolon && self.is_implicit() {
            "newline"
        } else {
            self.token.describe()
        }
    }
}

/// A lexing failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LexError {
    pub message: String,
    pub span: Span,
}

/// Byte order mark Go accepts at the very start of a file.
const BOM: char = '\u{FEFF}';

/// Tokenize Go source, applying automatic semicolon insertion.
///
/// A leading byte order mark is skipped; spans still index into `src`.
pub fn tokenize(src: &str) -> Result<Vec<Spanned>, LexError> {
    let mut tokens: Vec<Spanned> = Vec::new();
    let mut lexer = Token::lexer(src);
    if src.starts_with(BOM) {
        lexer.bump(BOM.len_utf8());
    }

    while let Some(result) = lexer.next() {
        let span = lexer.span();
        match result {
            Ok(Token::Newline) | Ok(Token::BlockComment(true)) => {
                insert_semicolon(&mut tokens, span.start);
            }
            Ok(Token::BlockComment(false)) => {}
            Ok(token) => tokens.push(Spanned { token, span }),
            Err(()) => return Err(lex_error(src, span)),
        }
    }
    insert_semicolon(&mut tokens, src.len());

    Ok(tokens)
}

fn insert_semicolon(tokens: &mut Vec<Spanned>, at: usize) {
    if tokens.last().is_some_and(|t| t.token.ends_statement()) {
        tokens.push(Spanned {
            token: Token::Semicolon,
            span: at..at,
        });
    }
}

fn lex_error(src: &str, span: Span) -> LexError {
    let rest = &src[span.start..];
    let message = if rest.starts_with("/*") {
        "unterminated block comment".to_string()
    } else if rest.starts_with(['"', '`']) {
        "unterminated string literal".to_string()
    } else if rest.starts_with('\'') {
        "malformed rune literal".to_string()
    } else {
        match rest.chars().next() {
            Some(c) => format!("unexpected character '{}'", c),
            None => "unexpected end of input".to_string(),
        }
    };
    LexError { message, span }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(src: &str) -> Vec<Token> {
        tokenize(src)
            .unwrap()
            .into_iter()
            .map(|t| t.token)
            .collect()
    }

    #[test]
    fn test_keywords_and_identifiers() {
        assert_eq!(
            kinds("type Service interface"),
            vec![
                Token::Type,
                Token::Ident,
                Token::Interface,
                // interface does not end a statement
            ]
        );
        assert_eq!(kinds("types"), vec![Token::Ident, Token::Semicolon]);
    }

    #[test]
    fn test_semicolon_insertion() {
        let tokens = tokenize("package svc\n\nimport \"context\"\n").unwrap();
        let kinds: Vec<Token> = tokens.iter().map(|t| t.token).collect();
        assert_eq!(
            kinds,
            vec![
                Token::Package,
                Token::Ident,
                Token::Semicolon,
                Token::Import,
                Token::String,
                Token::Semicolon,
            ]
        );
        assert!(tokens[2].is_implicit());
        assert_eq!(tokens[2].describe(), "newline");
    }

    #[test]
    fn test_no_semicolon_after_open_delimiters() {
        assert_eq!(
            kinds("f(\na,\n)"),
            vec![
                Token::Ident,
                Token::LParen,
                Token::Ident,
                Token::Comma,
                Token::RParen,
                Token::Semicolon,
            ]
        );
    }

    #[test]
    fn test_comments_are_skipped() {
        assert_eq!(
            kinds("a // trailing\n/* inline */ b"),
            vec![Token::Ident, Token::Semicolon, Token::Ident, Token::Semicolon]
        );
    }

    #[test]
    fn test_multiline_block_comment_acts_as_newline() {
        assert_eq!(
            kinds("a /* one\ntwo */ b"),
            vec![Token::Ident, Token::Semicolon, Token::Ident, Token::Semicolon]
        );
    }

    #[test]
    fn test_literals() {
        assert_eq!(
            kinds(r#"x = "a\"b" + `raw
text` + 'c' + 0x1F + 1.5"#),
            vec![
                Token::Ident,
                Token::Assign,
                Token::String,
                Token::Operator,
                Token::String,
                Token::Operator,
                Token::Rune,
                Token::Operator,
                Token::Number,
                Token::Operator,
                Token::Number,
                Token::Semicolon,
            ]
        );
    }

    #[test]
    fn test_braces_inside_strings_are_opaque() {
        assert_eq!(
            kinds(r#"s := "{ } ( )""#),
            vec![Token::Ident, Token::Operator, Token::String, Token::Semicolon]
        );
    }

    #[test]
    fn test_type_operators() {
        assert_eq!(
            kinds("<-chan *[]T ...~|"),
            vec![
                Token::Arrow,
                Token::Chan,
                Token::Star,
                Token::LBracket,
                Token::RBracket,
                Token::Ident,
                Token::Ellipsis,
                Token::Tilde,
                Token::Pipe,
            ]
        );
    }

    #[test]
    fn test_unicode_identifier() {
        assert_eq!(kinds("größe"), vec![Token::Ident, Token::Semicolon]);
    }

    #[test]
    fn test_leading_byte_order_mark() {
        let tokens = tokenize("\u{FEFF}package orders\n").unwrap();
        let kinds: Vec<Token> = tokens.iter().map(|t| t.token).collect();
        assert_eq!(kinds, vec![Token::Package, Token::Ident, Token::Semicolon]);
        assert_eq!(tokens[0].span, 3..10);
    }

    #[test]
    fn test_byte_order_mark_elsewhere_is_rejected() {
        let err = tokenize("package \u{FEFF}orders").unwrap_err();
        assert_eq!(err.message, "unexpected character '\u{feff}'");
    }

    #[test]
    fn test_unterminated_comment() {
        let err = tokenize("a /* never closed").unwrap_err();
        assert_eq!(err.message, "unterminated block comment");
        assert_eq!(err.span.start, 2);
    }

    #[test]
    fn test_unexpected_character() {
        let err = tokenize("a $ b").unwrap_err();
        assert_eq!(err.message, "unexpected character '$'");
        assert_eq!(err.span, 2..3);
    }

    #[test]
    fn test_unterminated_string() {
        let err = tokenize("x := \"open\n").unwrap_err();
        assert_eq!(err.message, "unterminated string literal");
    }
}
