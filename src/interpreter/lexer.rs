use logos::{FilterResult, Lexer, Logos, Skip};
use tracing::debug;

use crate::{
    ast::Position,
    error::{LexError, LexErrorKind},
};

/// Represents a lexical token in the source input.
/// A token is a minimal but meaningful unit of text produced by the lexer.
/// This enum defines all recognized tokens in the language.
///
/// Whitespace, newlines, comments, and the `<?php` open tag are consumed by
/// the lexer and never reach the parser.
#[derive(Logos, Debug, PartialEq, Eq, Clone)]
#[logos(error = LexErrorKind)]
#[logos(skip r"[ \t\r\n\f]+")]
pub enum Token {
    /// Integer literal tokens, such as `42`.
    #[regex(r"[0-9]+", parse_integer)]
    Integer(i64),
    /// String literal tokens in single or double quotes, escapes processed.
    #[token("\"", |lex| lex_string(lex, '"'))]
    #[token("'", |lex| lex_string(lex, '\''))]
    Str(String),
    /// Identifier tokens; function names, type tags, or `true`/`false`.
    #[regex(r"[a-zA-Z_][a-zA-Z0-9_]*", |lex| lex.slice().to_string())]
    Identifier(String),
    /// `function`
    #[token("function")]
    Function,
    /// `if`
    #[token("if")]
    If,
    /// `else`
    #[token("else")]
    Else,
    /// `foreach`
    #[token("foreach")]
    Foreach,
    /// `as`
    #[token("as")]
    As,
    /// `use`
    #[token("use")]
    Use,
    /// `namespace`
    #[token("namespace")]
    Namespace,
    /// `const`
    #[token("const")]
    Const,
    /// `and`
    #[token("and")]
    And,
    /// `or`
    #[token("or")]
    Or,
    /// `<?php`
    #[token("<?php", logos::skip)]
    OpenTag,
    /// `// Comments.` and `# Comments.`
    #[token("//", line_comment)]
    #[token("#", line_comment)]
    Comment,
    /// `/* Block comments. */`
    #[token("/*", block_comment)]
    BlockComment,
    /// `+`
    #[token("+")]
    Plus,
    /// `-`
    #[token("-")]
    Minus,
    /// `*`
    #[token("*")]
    Star,
    /// `/`
    #[token("/")]
    Slash,
    /// `%`
    #[token("%")]
    Percent,
    /// `.`
    #[token(".")]
    Dot,
    /// `..`
    #[token("..")]
    DotDot,
    /// `=`
    #[token("=")]
    Assign,
    /// `+=`
    #[token("+=")]
    PlusAssign,
    /// `-=`
    #[token("-=")]
    MinusAssign,
    /// `*=`
    #[token("*=")]
    StarAssign,
    /// `/=`
    #[token("/=")]
    SlashAssign,
    /// `%=`
    #[token("%=")]
    PercentAssign,
    /// `.=`
    #[token(".=")]
    DotAssign,
    /// `==`
    #[token("==")]
    EqualEqual,
    /// `!=`
    #[token("!=")]
    BangEqual,
    /// `===`
    #[token("===")]
    EqualEqualEqual,
    /// `!==`
    #[token("!==")]
    BangEqualEqual,
    /// `<`
    #[token("<")]
    Less,
    /// `>`
    #[token(">")]
    Greater,
    /// `<=`
    #[token("<=")]
    LessEqual,
    /// `>=`
    #[token(">=")]
    GreaterEqual,
    /// `!`
    #[token("!")]
    Bang,
    /// `&&`
    #[token("&&")]
    AndAnd,
    /// `||`
    #[token("||")]
    OrOr,
    /// `->`
    #[token("->")]
    Arrow,
    /// `=>`
    #[token("=>")]
    FatArrow,
    /// `$`
    #[token("$")]
    Dollar,
    /// `\`
    #[token("\\")]
    Backslash,
    /// `:`
    #[token(":")]
    Colon,
    /// `;`
    #[token(";")]
    Semicolon,
    /// `,`
    #[token(",")]
    Comma,
    /// `(`
    #[token("(")]
    LParen,
    /// `)`
    #[token(")")]
    RParen,
    /// `{`
    #[token("{")]
    LBrace,
    /// `}`
    #[token("}")]
    RBrace,
    /// `[`
    #[token("[")]
    LBracket,
    /// `]`
    #[token("]")]
    RBracket,
    /// End of input. Appended by [`tokenize`], never matched.
    Eof,
}

/// A token together with its source text and location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpannedToken {
    /// The token kind and payload.
    pub token:  Token,
    /// The exact source text of the token. Empty for [`Token::Eof`].
    pub lexeme: String,
    /// Where the token starts.
    pub pos:    Position,
}

impl SpannedToken {
    /// 1-based line of the token.
    #[must_use]
    pub const fn line(&self) -> usize {
        self.pos.line
    }

    /// 1-based column of the token.
    #[must_use]
    pub const fn column(&self) -> usize {
        self.pos.column
    }

    /// The token as it should appear in a diagnostic.
    #[must_use]
    pub fn describe(&self) -> String {
        if self.token == Token::Eof {
            "end of input".to_string()
        } else {
            self.lexeme.clone()
        }
    }
}

/// Converts source text into a token sequence terminated by [`Token::Eof`].
///
/// # Parameters
/// - `source`: The complete program text.
///
/// # Returns
/// Every token in source order, each with its lexeme and position.
///
/// # Errors
/// Returns a [`LexError`] for the first character sequence that forms no
/// valid token, an unterminated string or block comment, or a malformed or
/// out of range integer literal.
///
/// # Example
/// ```
/// use phlite::interpreter::lexer::{Token, tokenize};
///
/// let tokens = tokenize("$x = 0..25").unwrap();
/// let kinds: Vec<_> = tokens.into_iter().map(|t| t.token).collect();
///
/// assert_eq!(kinds,
///            vec![Token::Dollar,
///                 Token::Identifier("x".into()),
///                 Token::Assign,
///                 Token::Integer(0),
///                 Token::DotDot,
///                 Token::Integer(25),
///                 Token::Eof]);
/// ```
pub fn tokenize(source: &str) -> Result<Vec<SpannedToken>, LexError> {
    let lines = LineIndex::new(source);
    let mut lexer = Token::lexer(source);
    let mut tokens = Vec::new();

    while let Some(result) = lexer.next() {
        let pos = lines.locate(source, lexer.span().start);
        match result {
            Ok(token) => tokens.push(SpannedToken { token,
                                                    lexeme: lexer.slice().to_string(),
                                                    pos }),
            Err(kind) => {
                return Err(LexError { kind,
                                      found: offending_text(kind, lexer.slice()),
                                      line: pos.line,
                                      column: pos.column });
            },
        }
    }

    tokens.push(SpannedToken { token:  Token::Eof,
                               lexeme: String::new(),
                               pos:    lines.locate(source, source.len()), });

    debug!(count = tokens.len(), "tokenized source");
    Ok(tokens)
}

/// Byte offsets of the first character of every line.
struct LineIndex {
    starts: Vec<usize>,
}

impl LineIndex {
    fn new(source: &str) -> Self {
        let starts = std::iter::once(0).chain(source.match_indices('\n').map(|(i, _)| i + 1))
                                       .collect();
        Self { starts }
    }

    fn locate(&self, source: &str, offset: usize) -> Position {
        let line = self.starts.partition_point(|&start| start <= offset);
        let start = self.starts[line - 1];
        let column = source[start..offset].chars().count() + 1;
        Position::new(line, column)
    }
}

/// Text shown for a lexical error. Unterminated constructs report only their
/// opening delimiter rather than the rest of the file.
fn offending_text(kind: LexErrorKind, slice: &str) -> String {
    match kind {
        LexErrorKind::UnterminatedString => slice.chars().take(1).collect(),
        LexErrorKind::UnterminatedComment => "/*".to_string(),
        _ => slice.to_string(),
    }
}

/// Parses an integer literal from the current token slice.
///
/// A digit run glued to identifier characters (`12ab`) is consumed whole and
/// reported as malformed.
fn parse_integer(lex: &mut Lexer<Token>) -> Result<i64, LexErrorKind> {
    let glued = lex.remainder()
                   .find(|c: char| !(c.is_ascii_alphanumeric() || c == '_'))
                   .unwrap_or(lex.remainder().len());
    if glued > 0 {
        lex.bump(glued);
        return Err(LexErrorKind::MalformedNumber);
    }
    lex.slice().parse().map_err(|_| LexErrorKind::IntegerTooLarge)
}

/// Scans a string body up to the closing `quote`.
///
/// Double-quoted strings understand `\n \t \r \0 \\ \" \' \$`; single-quoted
/// strings only `\\` and `\'`. Unknown escapes are kept verbatim.
fn lex_string(lex: &mut Lexer<Token>, quote: char) -> Result<String, LexErrorKind> {
    let mut value = String::new();
    let mut chars = lex.remainder().char_indices();

    while let Some((i, c)) = chars.next() {
        if c == quote {
            lex.bump(i + c.len_utf8());
            return Ok(value);
        }
        if c != '\\' {
            value.push(c);
            continue;
        }
        let Some((_, escaped)) = chars.next() else { break };
        match (quote, escaped) {
            ('"', 'n') => value.push('\n'),
            ('"', 't') => value.push('\t'),
            ('"', 'r') => value.push('\r'),
            ('"', '0') => value.push('\0'),
            ('"', '"' | '\'' | '$') | (_, '\\') | ('\'', '\'') => value.push(escaped),
            _ => {
                value.push('\\');
                value.push(escaped);
            },
        }
    }

    lex.bump(lex.remainder().len());
    Err(LexErrorKind::UnterminatedString)
}

fn line_comment(lex: &mut Lexer<Token>) -> Skip {
    let rest = lex.remainder();
    lex.bump(rest.find('\n').unwrap_or(rest.len()));
    Skip
}

fn block_comment(lex: &mut Lexer<Token>) -> FilterResult<(), LexErrorKind> {
    if let Some(end) = lex.remainder().find("*/") {
        lex.bump(end + 2);
        FilterResult::Skip
    } else {
        lex.bump(lex.remainder().len());
        FilterResult::Error(LexErrorKind::UnterminatedComment)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(source: &str) -> Vec<Token> {
        tokenize(source).unwrap().into_iter().map(|t| t.token).collect()
    }

    #[test]
    fn skips_open_tag_comments_and_whitespace() {
        let source = "<?php\n/** doc\n */ $a // trailing\n# hash\n/* x */ 1";
        assert_eq!(kinds(source),
                   vec![Token::Dollar, Token::Identifier("a".into()), Token::Integer(1), Token::Eof]);
    }

    #[test]
    fn longest_match_wins() {
        assert_eq!(kinds(". .. => -> == = .="),
                   vec![Token::Dot,
                        Token::DotDot,
                        Token::FatArrow,
                        Token::Arrow,
                        Token::EqualEqual,
                        Token::Assign,
                        Token::DotAssign,
                        Token::Eof]);
    }

    #[test]
    fn keywords_and_identifiers() {
        assert_eq!(kinds("foreach foreachx as use namespace const"),
                   vec![Token::Foreach,
                        Token::Identifier("foreachx".into()),
                        Token::As,
                        Token::Use,
                        Token::Namespace,
                        Token::Const,
                        Token::Eof]);
    }

    #[test]
    fn identity_operators_take_the_longest_match() {
        assert_eq!(kinds("=== !== == != ="),
                   vec![Token::EqualEqualEqual,
                        Token::BangEqualEqual,
                        Token::EqualEqual,
                        Token::BangEqual,
                        Token::Assign,
                        Token::Eof]);
    }

    #[test]
    fn string_escapes() {
        assert_eq!(kinds(r#""a\n\"b" 'c\'\n'"#),
                   vec![Token::Str("a\n\"b".into()), Token::Str("c'\\n".into()), Token::Eof]);
    }

    #[test]
    fn positions_are_one_based() {
        let tokens = tokenize("$a\n  fib(1)").unwrap();
        let fib = &tokens[2];
        assert_eq!(fib.token, Token::Identifier("fib".into()));
        assert_eq!((fib.line(), fib.column()), (2, 3));
        let eof = tokens.last().unwrap();
        assert_eq!((eof.line(), eof.column()), (2, 9));
    }

    #[test]
    fn reports_lexical_errors() {
        let err = tokenize("$a = 1\n  @").unwrap_err();
        assert_eq!((err.kind, err.line, err.column), (LexErrorKind::UnexpectedCharacter, 2, 3));

        let err = tokenize("println(\"abc").unwrap_err();
        assert_eq!((err.kind, err.column), (LexErrorKind::UnterminatedString, 9));

        assert_eq!(tokenize("/* open").unwrap_err().kind, LexErrorKind::UnterminatedComment);
        assert_eq!(tokenize("12ab").unwrap_err().kind, LexErrorKind::MalformedNumber);
        assert_eq!(tokenize("99999999999999999999").unwrap_err().kind,
                   LexErrorKind::IntegerTooLarge);
    }
}
