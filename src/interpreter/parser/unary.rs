use std::{iter::Peekable, rc::Rc};

use crate::{
    ast::{Expr, FunctionDecl, UnaryOperator},
    interpreter::{
        lexer::{SpannedToken, Token},
        parser::{
            block::parse_block,
            core::{ParseResult, parse_expression, parse_if},
            utils::{
                expect, expect_closing, parse_comma_separated, parse_identifier, parse_name_path,
                parse_params, parse_variable_name, peek, peek_required, unexpected,
            },
        },
    },
};

/// Parses prefix operators: `-` and `!`.
///
/// Prefix operators are right-associative and bind tighter than any binary
/// operator, but looser than postfix calls, so `-f(1)` negates the call.
///
/// The rule is: `unary := ("-" | "!") unary | postfix`
pub(crate) fn parse_unary<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Expr>
    where I: Iterator<Item = &'a SpannedToken> + Clone
{
    if let Some(tok) = peek(tokens) {
        let op = match tok.token {
            Token::Minus => Some(UnaryOperator::Negate),
            Token::Bang => Some(UnaryOperator::Not),
            _ => None,
        };
        if let Some(op) = op {
            tokens.next();
            let operand = parse_unary(tokens)?;
            return Ok(Expr::Unary { op,
                                    operand: Box::new(operand),
                                    pos: tok.pos });
        }
    }

    let primary = parse_primary(tokens)?;
    parse_postfix(tokens, primary)
}

/// Parses primary expressions.
///
/// Primary expressions are literals, variables, names, grouped expressions,
/// array literals, `if` expressions, blocks, and function literals.
///
/// Grammar:
/// ```text
///     primary := INTEGER | STRING | "$" identifier | path
///              | "(" expression ")" | "[" list "]"
///              | "if" if_rest | block | "function" params block
/// ```
///
/// # Errors
/// Returns a `ParseError` if no primary expression starts at the current
/// token.
pub(crate) fn parse_primary<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Expr>
    where I: Iterator<Item = &'a SpannedToken> + Clone
{
    let tok = peek_required(tokens, "an expression")?;

    match &tok.token {
        Token::Integer(value) => {
            tokens.next();
            Ok(Expr::IntLiteral { value: *value,
                                  pos:   tok.pos, })
        },
        Token::Str(value) => {
            tokens.next();
            Ok(Expr::StringLiteral { value: Rc::from(value.as_str()),
                                     pos:   tok.pos, })
        },
        Token::Dollar => Ok(Expr::Variable { name: parse_variable_name(tokens)?,
                                             pos:  tok.pos, }),
        Token::Identifier(_) | Token::Backslash => {
            Ok(Expr::Identifier { name: parse_name_path(tokens)?.join("\\"),
                                  pos:  tok.pos, })
        },
        Token::LParen => {
            tokens.next();
            let expr = parse_expression(tokens)?;
            expect_closing(tokens, '(', tok.pos)?;
            Ok(expr)
        },
        Token::LBracket => {
            tokens.next();
            let elements = parse_comma_separated(tokens, parse_expression, '[', tok.pos)?;
            Ok(Expr::ArrayLiteral { elements,
                                    pos: tok.pos })
        },
        Token::If => {
            tokens.next();
            parse_if(tokens, tok.pos)
        },
        Token::LBrace => Ok(Expr::Block(parse_block(tokens)?)),
        Token::Function => {
            tokens.next();
            parse_function_literal(tokens, tok)
        },
        _ => Err(unexpected(tok, "an expression")),
    }
}

/// Parses a chain of postfix operations applied to `node`.
///
/// Supported forms, applied left to right:
/// - `->name(args)`: method call,
/// - `(args)`: call; a bare name becomes a named call,
/// - `[index]`: indexing.
///
/// # Parameters
/// - `tokens`: Token stream positioned after the primary expression.
/// - `node`: The expression the postfix chain applies to.
fn parse_postfix<'a, I>(tokens: &mut Peekable<I>, mut node: Expr) -> ParseResult<Expr>
    where I: Iterator<Item = &'a SpannedToken> + Clone
{
    while let Some(tok) = peek(tokens) {
        node = match tok.token {
            Token::Arrow => {
                tokens.next();
                let method = parse_identifier(tokens, "a method name after '->'")?;
                let open = expect(tokens, &Token::LParen, "'(' after the method name")?;
                let arguments = parse_comma_separated(tokens, parse_expression, '(', open.pos)?;
                Expr::MethodCall { receiver: Box::new(node),
                                   method,
                                   arguments,
                                   pos: tok.pos }
            },
            Token::LParen => {
                tokens.next();
                let arguments = parse_comma_separated(tokens, parse_expression, '(', tok.pos)?;
                match node {
                    Expr::Identifier { name, pos } => Expr::Call { name,
                                                                   arguments,
                                                                   pos },
                    callee => Expr::CallValue { callee: Box::new(callee),
                                                arguments,
                                                pos: tok.pos },
                }
            },
            Token::LBracket => {
                tokens.next();
                let index = parse_expression(tokens)?;
                expect_closing(tokens, '[', tok.pos)?;
                Expr::Index { target: Box::new(node),
                              index:  Box::new(index),
                              pos:    tok.pos, }
            },
            _ => break,
        };
    }
    Ok(node)
}

/// Parses an anonymous `function (params) { body }` after the keyword.
fn parse_function_literal<'a, I>(tokens: &mut Peekable<I>,
                                 keyword: &SpannedToken)
                                 -> ParseResult<Expr>
    where I: Iterator<Item = &'a SpannedToken> + Clone
{
    let (params, return_type) = parse_params(tokens)?;
    let body = parse_block(tokens)?;

    Ok(Expr::Closure(Rc::new(FunctionDecl { name: FunctionDecl::ANONYMOUS.to_string(),
                                            params,
                                            return_type,
                                            body,
                                            pos: keyword.pos })))
}
