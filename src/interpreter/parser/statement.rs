use std::{iter::Peekable, rc::Rc};

use crate::{
    ast::{ForeachStmt, FunctionDecl, Statement},
    interpreter::{
        lexer::{SpannedToken, Token},
        parser::{
            block::parse_block,
            core::{ParseResult, parse_expression},
            utils::{
                advance, expect, expect_closing, next_is, parse_identifier, parse_name_path,
                parse_params, parse_variable_name, peek_required,
            },
        },
    },
};

/// Parses a single statement.
///
/// A statement may be one of:
/// - a `namespace` declaration,
/// - a `use` import,
/// - a `const` declaration,
/// - a named function declaration,
/// - a `foreach` loop,
/// - an expression used as a statement.
///
/// The leading keyword decides the form; anything else is parsed as an
/// expression. `function` followed by `(` starts an anonymous function and
/// is therefore an expression too.
///
/// # Parameters
/// - `tokens`: Token iterator positioned at the first token of the statement.
///
/// # Returns
/// A parsed [`Statement`] node.
pub fn parse_statement<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Statement>
    where I: Iterator<Item = &'a SpannedToken> + Clone
{
    let first = peek_required(tokens, "a statement")?;

    match first.token {
        Token::Namespace => {
            tokens.next();
            let path = parse_name_path(tokens)?;
            Ok(Statement::Namespace { path,
                                      pos: first.pos })
        },
        Token::Use => {
            tokens.next();
            let path = parse_name_path(tokens)?;
            let alias = if next_is(tokens, &Token::As) {
                tokens.next();
                Some(parse_identifier(tokens, "an alias after 'as'")?)
            } else {
                None
            };
            Ok(Statement::Use { path,
                                alias,
                                pos: first.pos })
        },
        Token::Const => {
            tokens.next();
            let name = parse_identifier(tokens, "a constant name")?;
            expect(tokens, &Token::Assign, "'=' after the constant name")?;
            let value = parse_expression(tokens)?;
            Ok(Statement::Const { name,
                                  value,
                                  pos: first.pos })
        },
        Token::Function if is_declaration(tokens) => {
            tokens.next();
            Ok(Statement::Function(Rc::new(parse_function_rest(tokens, first)?)))
        },
        Token::Foreach => {
            tokens.next();
            Ok(Statement::Foreach(Box::new(parse_foreach(tokens, first)?)))
        },
        _ => {
            let expr = parse_expression(tokens)?;
            Ok(Statement::Expression { expr,
                                       pos: first.pos })
        },
    }
}

/// `function` directly followed by a name declares a function; followed by
/// `(` it is a function literal.
fn is_declaration<'a, I>(tokens: &Peekable<I>) -> bool
    where I: Iterator<Item = &'a SpannedToken> + Clone
{
    let mut ahead = tokens.clone();
    ahead.next();
    matches!(ahead.peek(), Some(SpannedToken { token: Token::Identifier(_), .. }))
}

/// Parses the remainder of a function declaration after `function`.
///
/// Grammar: `function_decl := "function" identifier params block`
///
/// # Parameters
/// - `tokens`: Token stream positioned at the function name.
/// - `keyword`: The `function` token, used as the declaration's position.
pub(in crate::interpreter::parser) fn parse_function_rest<'a, I>(tokens: &mut Peekable<I>,
                                                                 keyword: &SpannedToken)
                                                                 -> ParseResult<FunctionDecl>
    where I: Iterator<Item = &'a SpannedToken> + Clone
{
    let name = parse_identifier(tokens, "a function name")?;
    let (params, return_type) = parse_params(tokens)?;
    let body = parse_block(tokens)?;

    Ok(FunctionDecl { name,
                      params,
                      return_type,
                      body,
                      pos: keyword.pos })
}

/// Parses a `foreach` loop after the keyword.
///
/// Both header styles are accepted:
/// ```text
///     foreach ( <expr> as [$key =>] $value ) { <statements> }
///     foreach <expr> as [$key =>] $value { <statements> }
/// ```
/// A leading `(` only opens the header when an `as` appears directly inside
/// it; otherwise it belongs to the iterable expression, as in
/// `foreach ($a) as $v { }`.
fn parse_foreach<'a, I>(tokens: &mut Peekable<I>, keyword: &SpannedToken) -> ParseResult<ForeachStmt>
    where I: Iterator<Item = &'a SpannedToken> + Clone
{
    let header_paren = if has_parenthesised_header(tokens) {
        Some(advance(tokens, "'('")?.pos)
    } else {
        None
    };

    let iterable = parse_expression(tokens)?;
    expect(tokens, &Token::As, "'as' after the foreach iterable")?;

    let first = parse_variable_name(tokens)?;
    let (key, value) = if next_is(tokens, &Token::FatArrow) {
        tokens.next();
        (Some(first), parse_variable_name(tokens)?)
    } else {
        (None, first)
    };

    if let Some(opened) = header_paren {
        expect_closing(tokens, '(', opened)?;
    }

    let body = parse_block(tokens)?;

    Ok(ForeachStmt { iterable,
                     key,
                     value,
                     body,
                     pos: keyword.pos })
}

/// Looks ahead for `( ... as ... )` with `as` at nesting depth one.
fn has_parenthesised_header<'a, I>(tokens: &Peekable<I>) -> bool
    where I: Iterator<Item = &'a SpannedToken> + Clone
{
    let mut ahead = tokens.clone();
    if !matches!(ahead.next(), Some(SpannedToken { token: Token::LParen, .. })) {
        return false;
    }

    let mut depth = 1usize;
    for tok in ahead {
        match tok.token {
            Token::LParen | Token::LBracket | Token::LBrace => depth += 1,
            Token::RParen | Token::RBracket | Token::RBrace => {
                depth -= 1;
                if depth == 0 {
                    return false;
                }
            },
            Token::As if depth == 1 => return true,
            Token::Eof => return false,
            _ => {},
        }
    }
    false
}
