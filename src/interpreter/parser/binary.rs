use std::iter::Peekable;

use crate::{
    ast::{AssignTarget, BinaryOperator, Expr},
    error::ParseError,
    interpreter::{
        lexer::{SpannedToken, Token},
        parser::{core::ParseResult, unary::parse_unary, utils::peek},
    },
};

/// Parses assignment expressions.
///
/// Assignment is right-associative: `$a = $b = 1` assigns `1` to `$b`, then
/// to `$a`. The left side must be a variable or an index expression. Compound
/// forms (`+=`, `.=`, ...) combine the current value with the right side.
///
/// The rule is: `assignment := logical_or (assign_op assignment)?`
///
/// # Errors
/// Returns `InvalidAssignmentTarget` when the left side cannot be assigned.
pub fn parse_assignment<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Expr>
    where I: Iterator<Item = &'a SpannedToken> + Clone
{
    let left = parse_logical_or(tokens)?;

    let Some(tok) = peek(tokens) else { return Ok(left) };
    let Some(op) = token_to_assignment_operator(&tok.token) else { return Ok(left) };
    tokens.next();

    let target = match left {
        Expr::Variable { name, .. } => AssignTarget::Variable(name),
        Expr::Index { target, index, .. } => AssignTarget::Index { target, index },
        _ => return Err(ParseError::InvalidAssignmentTarget { pos: tok.pos }),
    };
    let value = parse_assignment(tokens)?;

    Ok(Expr::Assign { target,
                      op,
                      value: Box::new(value),
                      pos: tok.pos })
}

/// Parses logical OR expressions: `||` and `or`.
///
/// The rule is: `logical_or := logical_and (("||" | "or") logical_and)*`
pub fn parse_logical_or<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Expr>
    where I: Iterator<Item = &'a SpannedToken> + Clone
{
    parse_left_associative(tokens, parse_logical_and, |op| op == BinaryOperator::Or)
}

/// Parses logical AND expressions: `&&` and `and`.
///
/// The rule is: `logical_and := equality (("&&" | "and") equality)*`
pub fn parse_logical_and<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Expr>
    where I: Iterator<Item = &'a SpannedToken> + Clone
{
    parse_left_associative(tokens, parse_equality, |op| op == BinaryOperator::And)
}

/// Parses equality comparisons.
///
/// The rule is: `equality := relational (("==" | "!=" | "===" | "!==") relational)*`
pub fn parse_equality<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Expr>
    where I: Iterator<Item = &'a SpannedToken> + Clone
{
    parse_left_associative(tokens, parse_relational, |op| {
        matches!(op,
                 BinaryOperator::Equal
                 | BinaryOperator::NotEqual
                 | BinaryOperator::Identical
                 | BinaryOperator::NotIdentical)
    })
}

/// Parses ordering comparisons.
///
/// The rule is: `relational := range (("<" | ">" | "<=" | ">=") range)*`
pub fn parse_relational<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Expr>
    where I: Iterator<Item = &'a SpannedToken> + Clone
{
    parse_left_associative(tokens, parse_range, |op| {
        matches!(op,
                 BinaryOperator::Less
                 | BinaryOperator::Greater
                 | BinaryOperator::LessEqual
                 | BinaryOperator::GreaterEqual)
    })
}

/// Parses a range `start..end`.
///
/// Ranges do not chain: `a..b..c` is rejected by the caller when the second
/// `..` cannot start a statement.
///
/// The rule is: `range := additive (".." additive)?`
pub fn parse_range<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Expr>
    where I: Iterator<Item = &'a SpannedToken> + Clone
{
    let start = parse_additive(tokens)?;

    if let Some(tok) = peek(tokens)
       && tok.token == Token::DotDot
    {
        tokens.next();
        let end = parse_additive(tokens)?;
        return Ok(Expr::Range { start: Box::new(start),
                                end:   Box::new(end),
                                pos:   tok.pos, });
    }
    Ok(start)
}

/// Parses addition, subtraction, and string concatenation.
///
/// The rule is: `additive := multiplicative (("+" | "-" | ".") multiplicative)*`
pub fn parse_additive<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Expr>
    where I: Iterator<Item = &'a SpannedToken> + Clone
{
    parse_left_associative(tokens, parse_multiplicative, |op| {
        matches!(op, BinaryOperator::Add | BinaryOperator::Sub | BinaryOperator::Concat)
    })
}

/// Parses multiplication, division, and remainder.
///
/// The rule is: `multiplicative := unary (("*" | "/" | "%") unary)*`
pub fn parse_multiplicative<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Expr>
    where I: Iterator<Item = &'a SpannedToken> + Clone
{
    parse_left_associative(tokens, parse_unary, |op| {
        matches!(op, BinaryOperator::Mul | BinaryOperator::Div | BinaryOperator::Mod)
    })
}

/// Folds a run of same-level operators into a left-leaning tree.
///
/// # Parameters
/// - `tokens`: Token stream.
/// - `operand`: Parser for the next-higher precedence level.
/// - `accepts`: Selects the operators that belong to this level.
fn parse_left_associative<'a, I>(tokens: &mut Peekable<I>,
                                 operand: impl Fn(&mut Peekable<I>) -> ParseResult<Expr>,
                                 accepts: impl Fn(BinaryOperator) -> bool)
                                 -> ParseResult<Expr>
    where I: Iterator<Item = &'a SpannedToken> + Clone
{
    let mut left = operand(tokens)?;
    while let Some(tok) = peek(tokens)
          && let Some(op) = token_to_binary_operator(&tok.token)
          && accepts(op)
    {
        tokens.next();
        let right = operand(tokens)?;
        left = Expr::Binary { left: Box::new(left),
                              op,
                              right: Box::new(right),
                              pos: tok.pos };
    }
    Ok(left)
}

/// Maps a token to the binary operator it denotes, if any.
#[must_use]
pub const fn token_to_binary_operator(token: &Token) -> Option<BinaryOperator> {
    Some(match token {
        Token::Plus => BinaryOperator::Add,
        Token::Minus => BinaryOperator::Sub,
        Token::Star => BinaryOperator::Mul,
        Token::Slash => BinaryOperator::Div,
        Token::Percent => BinaryOperator::Mod,
        Token::Dot => BinaryOperator::Concat,
        Token::EqualEqual => BinaryOperator::Equal,
        Token::BangEqual => BinaryOperator::NotEqual,
        Token::EqualEqualEqual => BinaryOperator::Identical,
        Token::BangEqualEqual => BinaryOperator::NotIdentical,
        Token::Less => BinaryOperator::Less,
        Token::Greater => BinaryOperator::Greater,
        Token::LessEqual => BinaryOperator::LessEqual,
        Token::GreaterEqual => BinaryOperator::GreaterEqual,
        Token::AndAnd | Token::And => BinaryOperator::And,
        Token::OrOr | Token::Or => BinaryOperator::Or,
        _ => return None,
    })
}

/// Maps an assignment token to its operator.
///
/// Returns `Some(None)` for plain `=` and `Some(Some(op))` for compound
/// assignments.
#[must_use]
pub const fn token_to_assignment_operator(token: &Token) -> Option<Option<BinaryOperator>> {
    match token {
        Token::Assign => Some(None),
        Token::PlusAssign => Some(Some(BinaryOperator::Add)),
        Token::MinusAssign => Some(Some(BinaryOperator::Sub)),
        Token::StarAssign => Some(Some(BinaryOperator::Mul)),
        Token::SlashAssign => Some(Some(BinaryOperator::Div)),
        Token::PercentAssign => Some(Some(BinaryOperator::Mod)),
        Token::DotAssign => Some(Some(BinaryOperator::Concat)),
        _ => None,
    }
}
