use std::iter::Peekable;

use crate::{
    ast::{Param, Position},
    error::ParseError,
    interpreter::{
        lexer::{SpannedToken, Token},
        parser::core::ParseResult,
    },
};

/// Returns the next token without consuming it.
///
/// Unlike [`Peekable::peek`], the returned reference is not tied to the
/// borrow of the iterator, so callers may keep it while advancing.
pub(in crate::interpreter::parser) fn peek<'a, I>(tokens: &mut Peekable<I>)
                                                  -> Option<&'a SpannedToken>
    where I: Iterator<Item = &'a SpannedToken>
{
    tokens.peek().copied()
}

/// Returns `true` if the next token is `expected`.
pub(in crate::interpreter::parser) fn next_is<'a, I>(tokens: &mut Peekable<I>,
                                                     expected: &Token)
                                                     -> bool
    where I: Iterator<Item = &'a SpannedToken>
{
    peek(tokens).is_some_and(|tok| tok.token == *expected)
}

/// Consumes any run of `;` separators.
pub(in crate::interpreter::parser) fn skip_semicolons<'a, I>(tokens: &mut Peekable<I>)
    where I: Iterator<Item = &'a SpannedToken>
{
    while next_is(tokens, &Token::Semicolon) {
        tokens.next();
    }
}

/// Builds the error for a token that does not fit the grammar here.
///
/// Reaching [`Token::Eof`] is reported as an unexpected end of input.
pub(in crate::interpreter::parser) fn unexpected(tok: &SpannedToken, expected: &str) -> ParseError {
    if tok.token == Token::Eof {
        ParseError::UnexpectedEndOfInput { expected: expected.to_string(),
                                           pos:      tok.pos, }
    } else {
        ParseError::UnexpectedToken { found:    tok.lexeme.clone(),
                                      expected: expected.to_string(),
                                      pos:      tok.pos, }
    }
}

/// Consumes the next token, failing if the stream is exhausted.
///
/// The stream always ends in [`Token::Eof`], which parsing functions never
/// consume, so exhaustion only happens on malformed input built by hand.
pub(in crate::interpreter::parser) fn advance<'a, I>(tokens: &mut Peekable<I>,
                                                     expected: &str)
                                                     -> ParseResult<&'a SpannedToken>
    where I: Iterator<Item = &'a SpannedToken>
{
    tokens.next()
          .ok_or_else(|| ParseError::UnexpectedEndOfInput { expected: expected.to_string(),
                                                            pos:      Position::default(), })
}

/// Returns the next token without consuming it, failing if the stream is
/// exhausted.
pub(in crate::interpreter::parser) fn peek_required<'a, I>(tokens: &mut Peekable<I>,
                                                           expected: &str)
                                                           -> ParseResult<&'a SpannedToken>
    where I: Iterator<Item = &'a SpannedToken>
{
    match peek(tokens) {
        Some(tok) => Ok(tok),
        None => advance(tokens, expected),
    }
}

/// Consumes the next token if it is `expected`, otherwise reports it.
///
/// # Parameters
/// - `tokens`: Token iterator.
/// - `expected`: The required token.
/// - `description`: How the requirement reads in an error, e.g. `"'('"`.
pub(in crate::interpreter::parser) fn expect<'a, I>(tokens: &mut Peekable<I>,
                                                    expected: &Token,
                                                    description: &str)
                                                    -> ParseResult<&'a SpannedToken>
    where I: Iterator<Item = &'a SpannedToken>
{
    match peek(tokens) {
        Some(tok) if tok.token == *expected => advance(tokens, description),
        Some(tok) => Err(unexpected(tok, description)),
        None => Err(ParseError::UnexpectedEndOfInput { expected: description.to_string(),
                                                       pos:      Position::default(), }),
    }
}

/// Consumes the closing delimiter of a bracketed construct.
///
/// Reaching the end of input reports the unclosed opener and where it was
/// opened.
pub(in crate::interpreter::parser) fn expect_closing<'a, I>(tokens: &mut Peekable<I>,
                                                            opener: char,
                                                            opened: Position)
                                                            -> ParseResult<()>
    where I: Iterator<Item = &'a SpannedToken>
{
    let (closing, description) = match opener {
        '(' => (Token::RParen, "')'"),
        '[' => (Token::RBracket, "']'"),
        _ => (Token::RBrace, "'}'"),
    };
    match peek(tokens) {
        Some(tok) if tok.token == closing => {
            tokens.next();
            Ok(())
        },
        Some(SpannedToken { token: Token::Eof,
                            pos, .. }) => Err(ParseError::UnclosedDelimiter { delimiter: opener,
                                                                              opened,
                                                                              pos: *pos }),
        Some(tok) => Err(unexpected(tok, description)),
        None => Err(ParseError::UnclosedDelimiter { delimiter: opener,
                                                    opened,
                                                    pos: Position::default() }),
    }
}

/// Parses a comma-separated list of items until a closing delimiter.
///
/// This utility is shared by array literals, argument lists and parameter
/// lists. The opening delimiter must already be consumed. A trailing comma
/// before the closing delimiter is accepted, and an immediately encountered
/// closing delimiter produces an empty list.
///
/// Grammar (simplified): `list := (item ("," item)* ","?)?`
///
/// # Parameters
/// - `tokens`: Token iterator positioned at the first item or closing token.
/// - `parse_item`: Function used to parse each list element.
/// - `opener`: The opening delimiter, `(` or `[`.
/// - `opened`: Where the opening delimiter was found.
///
/// # Errors
/// Returns a `ParseError` if:
/// - an item fails to parse,
/// - an item is followed by something other than `,` or the closing token,
/// - the stream ends before the closing token.
pub(in crate::interpreter::parser) fn parse_comma_separated<'a, I, T>(
    tokens: &mut Peekable<I>,
    parse_item: impl Fn(&mut Peekable<I>) -> ParseResult<T>,
    opener: char,
    opened: Position)
    -> ParseResult<Vec<T>>
    where I: Iterator<Item = &'a SpannedToken> + Clone
{
    let closing = if opener == '(' { Token::RParen } else { Token::RBracket };
    let mut items = Vec::new();

    loop {
        if next_is(tokens, &closing) {
            tokens.next();
            return Ok(items);
        }
        items.push(parse_item(tokens)?);
        if next_is(tokens, &Token::Comma) {
            tokens.next();
            continue;
        }
        expect_closing(tokens, opener, opened)?;
        return Ok(items);
    }
}

/// Parses a plain identifier and returns its name.
///
/// # Errors
/// Returns a `ParseError` if the next token is not an identifier.
pub(in crate::interpreter::parser) fn parse_identifier<'a, I>(tokens: &mut Peekable<I>,
                                                              expected: &str)
                                                              -> ParseResult<String>
    where I: Iterator<Item = &'a SpannedToken>
{
    let tok = advance(tokens, expected)?;
    match &tok.token {
        Token::Identifier(name) => Ok(name.clone()),
        _ => Err(unexpected(tok, expected)),
    }
}

/// Parses a `$name` variable reference and returns the name without `$`.
pub(in crate::interpreter::parser) fn parse_variable_name<'a, I>(tokens: &mut Peekable<I>)
                                                                 -> ParseResult<String>
    where I: Iterator<Item = &'a SpannedToken>
{
    expect(tokens, &Token::Dollar, "a variable")?;
    parse_identifier(tokens, "a variable name after '$'")
}

/// Parses a backslash-separated name such as `os\args` or `\a\b\f`.
///
/// A leading backslash is accepted and dropped.
///
/// Grammar: `path := "\"? identifier ("\" identifier)*`
pub(in crate::interpreter::parser) fn parse_name_path<'a, I>(tokens: &mut Peekable<I>)
                                                             -> ParseResult<Vec<String>>
    where I: Iterator<Item = &'a SpannedToken>
{
    if next_is(tokens, &Token::Backslash) {
        tokens.next();
    }
    let mut path = vec![parse_identifier(tokens, "a name")?];
    while next_is(tokens, &Token::Backslash) {
        tokens.next();
        path.push(parse_identifier(tokens, "a name after '\\'")?);
    }
    Ok(path)
}

/// Parses a parenthesised parameter list and an optional return type tag.
///
/// Each parameter is an optional type tag followed by a variable:
/// `int $n`, `Array $args`, or just `$x`.
///
/// Grammar:
/// ```text
///     params := "(" (param ("," param)* ","?)? ")" (":" identifier)?
///     param  := identifier? "$" identifier
/// ```
///
/// # Errors
/// Returns `InvalidFunctionDefinition` when the list is missing or a
/// parameter is malformed.
pub(in crate::interpreter::parser) fn parse_params<'a, I>(tokens: &mut Peekable<I>)
                                                          -> ParseResult<(Vec<Param>, Option<String>)>
    where I: Iterator<Item = &'a SpannedToken> + Clone
{
    let open = match peek(tokens) {
        Some(tok) if tok.token == Token::LParen => advance(tokens, "'('")?,
        Some(tok) => {
            return Err(ParseError::InvalidFunctionDefinition { details: format!("expected '(' before \
                                                                                 the parameter list, \
                                                                                 found `{}`",
                                                                                tok.describe()),
                                                               pos:     tok.pos, });
        },
        None => return Err(ParseError::UnexpectedEndOfInput { expected: "'('".into(),
                                                              pos:      Position::default(), }),
    };

    let params = parse_comma_separated(tokens, parse_param, '(', open.pos)?;

    let return_type = if next_is(tokens, &Token::Colon) {
        tokens.next();
        Some(parse_identifier(tokens, "a return type after ':'")?)
    } else {
        None
    };

    Ok((params, return_type))
}

fn parse_param<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Param>
    where I: Iterator<Item = &'a SpannedToken>
{
    let type_hint = match peek(tokens) {
        Some(SpannedToken { token: Token::Identifier(name),
                            .. }) => {
            tokens.next();
            Some(name.clone())
        },
        _ => None,
    };

    match peek(tokens) {
        Some(SpannedToken { token: Token::Dollar,
                            .. }) => Ok(Param { name: parse_variable_name(tokens)?,
                                                type_hint }),
        Some(tok) => Err(ParseError::InvalidFunctionDefinition { details: format!("expected a \
                                                                                   parameter \
                                                                                   variable, \
                                                                                   found `{}`",
                                                                                  tok.describe()),
                                                                 pos:     tok.pos, }),
        None => Err(ParseError::UnexpectedEndOfInput { expected: "a parameter".into(),
                                                       pos:      Position::default(), }),
    }
}
