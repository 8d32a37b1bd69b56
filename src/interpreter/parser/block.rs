use std::iter::Peekable;

use crate::{
    ast::Block,
    interpreter::{
        lexer::{SpannedToken, Token},
        parser::{
            core::ParseResult,
            statement::parse_statement,
            utils::{expect, expect_closing, next_is, peek, skip_semicolons},
        },
    },
};

/// Parses a block delimited by braces.
///
/// A block consists of zero or more statements, optionally separated by
/// semicolons. Parsing continues until the matching `}`.
///
/// Grammar: `block := "{" (statement ";"*)* "}"`
///
/// # Parameters
/// - `tokens`: Token stream positioned at the opening brace.
///
/// # Returns
/// The parsed [`Block`], positioned at its opening brace.
///
/// # Errors
/// - `UnexpectedToken` if the next token is not `{`.
/// - `UnclosedDelimiter` if the input ends before the closing `}`.
pub fn parse_block<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Block>
    where I: Iterator<Item = &'a SpannedToken> + Clone
{
    let open = expect(tokens, &Token::LBrace, "'{'")?;
    let mut statements = Vec::new();

    loop {
        skip_semicolons(tokens);
        if next_is(tokens, &Token::RBrace)
           || matches!(peek(tokens), Some(SpannedToken { token: Token::Eof, .. }) | None)
        {
            break;
        }
        statements.push(parse_statement(tokens)?);
    }

    expect_closing(tokens, '{', open.pos)?;

    Ok(Block { statements,
               pos: open.pos })
}
