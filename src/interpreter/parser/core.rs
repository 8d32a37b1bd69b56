use std::iter::Peekable;

use tracing::debug;

use crate::{
    ast::{Expr, Position, Program},
    error::ParseError,
    interpreter::{
        lexer::{SpannedToken, Token},
        parser::{
            binary::parse_assignment,
            block::parse_block,
            statement::parse_statement,
            utils::{peek, skip_semicolons},
        },
    },
};

pub type ParseResult<T> = Result<T, ParseError>;

/// Parses a complete token sequence into a [`Program`].
///
/// Statements are parsed until the end-of-input token. Semicolons between
/// statements are accepted and ignored.
///
/// Grammar: `program := (statement ";"*)* EOF`
///
/// # Parameters
/// - `tokens`: Output of [`tokenize`](crate::interpreter::lexer::tokenize),
///   terminated by [`Token::Eof`].
///
/// # Errors
/// Returns the first [`ParseError`] encountered. No partial program is
/// produced.
///
/// # Example
/// ```
/// use phlite::interpreter::{lexer::tokenize, parser::parse_program};
///
/// let tokens = tokenize("function id($x) { $x }\nprintln(id(1))").unwrap();
/// let program = parse_program(&tokens).unwrap();
///
/// assert_eq!(program.statements.len(), 2);
/// ```
pub fn parse_program(tokens: &[SpannedToken]) -> ParseResult<Program> {
    let mut iter = tokens.iter().peekable();
    let mut statements = Vec::new();

    loop {
        skip_semicolons(&mut iter);
        match peek(&mut iter) {
            Some(SpannedToken { token: Token::Eof, .. }) | None => break,
            Some(_) => statements.push(parse_statement(&mut iter)?),
        }
    }

    debug!(statements = statements.len(), "parsed program");
    Ok(Program { statements })
}

/// Parses a full expression.
///
/// This is the entry point for expression parsing.
/// It begins at the lowest-precedence level, assignment, and recursively
/// descends through the precedence hierarchy.
///
/// Grammar: `expression := assignment`
pub fn parse_expression<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Expr>
    where I: Iterator<Item = &'a SpannedToken> + Clone
{
    parse_assignment(tokens)
}

/// Parses an `if` expression with optional `else` and chained `else if`.
///
/// Syntax:
/// ```text
///     if <condition> { <statements> }
///     else if <condition> { <statements> }
///     else { <statements> }
/// ```
/// The condition is not parenthesised; it ends where the expression grammar
/// meets the opening brace of the branch.
///
/// # Parameters
/// - `tokens`: Token stream positioned after the `if` keyword.
/// - `pos`: Position of the `if` token.
///
/// # Returns
/// An `Expr::If` node representing the full conditional expression.
///
/// # Errors
/// - `UnexpectedToken` if a branch does not start with `{`, or `else` is
///   followed by something other than `if` or `{`.
/// - Propagates any errors from sub-expression parsing.
pub fn parse_if<'a, I>(tokens: &mut Peekable<I>, pos: Position) -> ParseResult<Expr>
    where I: Iterator<Item = &'a SpannedToken> + Clone
{
    let condition = parse_expression(tokens)?;
    let then_branch = parse_block(tokens)?;

    let else_branch = match peek(tokens) {
        Some(SpannedToken { token: Token::Else, .. }) => {
            tokens.next();

            match peek(tokens) {
                Some(SpannedToken { token: Token::If,
                                    pos: nested, .. }) => {
                    tokens.next();
                    Some(Box::new(parse_if(tokens, *nested)?))
                },
                _ => Some(Box::new(Expr::Block(parse_block(tokens)?))),
            }
        },
        _ => None,
    };

    Ok(Expr::If { condition: Box::new(condition),
                  then_branch,
                  else_branch,
                  pos })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        ast::{AssignTarget, BinaryOperator, Statement},
        interpreter::lexer::tokenize,
    };

    fn parse(source: &str) -> ParseResult<Program> {
        parse_program(&tokenize(source).unwrap())
    }

    fn single_expr(source: &str) -> Expr {
        match parse(source).unwrap().statements.remove(0) {
            Statement::Expression { expr, .. } => expr,
            other => panic!("expected expression statement, got {other:?}"),
        }
    }

    #[test]
    fn multiplication_binds_tighter_than_addition() {
        let Expr::Binary { op, right, .. } = single_expr("1 + 2 * 3") else {
            panic!("expected binary expression")
        };
        assert_eq!(op, BinaryOperator::Add);
        assert!(matches!(*right, Expr::Binary { op: BinaryOperator::Mul, .. }));
    }

    #[test]
    fn range_binds_looser_than_addition() {
        let Expr::Range { end, .. } = single_expr("0..$n + 1") else {
            panic!("expected range")
        };
        assert!(matches!(*end, Expr::Binary { op: BinaryOperator::Add, .. }));
    }

    #[test]
    fn assignment_is_right_associative() {
        let Expr::Assign { target, value, .. } = single_expr("$a = $b = 1") else {
            panic!("expected assignment")
        };
        assert_eq!(target, AssignTarget::Variable("a".into()));
        assert!(matches!(*value, Expr::Assign { .. }));
    }

    #[test]
    fn if_else_chain() {
        let Expr::If { else_branch, .. } = single_expr("if $a { 1 } else if $b { 2 } else { 3 }")
        else {
            panic!("expected if")
        };
        assert!(matches!(else_branch.as_deref(), Some(Expr::If { else_branch: Some(_), .. })));
    }

    #[test]
    fn foreach_header_forms() {
        for source in ["foreach ($xs as $k => $v) { }",
                       "foreach $xs as $k => $v { }",
                       "foreach (makeArray() as $k => $v) { }"]
        {
            let program = parse(source).unwrap();
            let Statement::Foreach(stmt) = &program.statements[0] else {
                panic!("expected foreach in {source}")
            };
            assert_eq!(stmt.key.as_deref(), Some("k"));
            assert_eq!(stmt.value, "v");
        }
    }

    #[test]
    fn parenthesised_iterable_without_header_parens() {
        let program = parse("foreach ($a) as $v { }").unwrap();
        let Statement::Foreach(stmt) = &program.statements[0] else { panic!("expected foreach") };
        assert!(matches!(stmt.iterable, Expr::Variable { .. }));
    }

    #[test]
    fn namespace_use_and_qualified_calls() {
        let program = parse("namespace a\\b; use os\\args; \\a\\b\\f(args())").unwrap();
        assert!(matches!(&program.statements[0], Statement::Namespace { path, .. } if path.len() == 2));
        assert!(matches!(&program.statements[1], Statement::Use { alias: None, .. }));
        let Statement::Expression { expr: Expr::Call { name, .. }, .. } = &program.statements[2]
        else {
            panic!("expected call")
        };
        assert_eq!(name, "a\\b\\f");
    }

    #[test]
    fn const_declaration_and_identity_comparison() {
        let program = parse("const MAX = 2 + 1; MAX === 3").unwrap();
        let Statement::Const { name, value, .. } = &program.statements[0] else {
            panic!("expected const")
        };
        assert_eq!(name, "MAX");
        assert!(matches!(value, Expr::Binary { op: BinaryOperator::Add, .. }));
        let Statement::Expression { expr, .. } = &program.statements[1] else {
            panic!("expected expression")
        };
        assert!(matches!(expr, Expr::Binary { op: BinaryOperator::Identical, .. }));

        assert!(parse("const = 1").is_err());
        assert!(parse("const MAX 1").is_err());
    }

    #[test]
    fn reports_position_and_expectation() {
        let err = parse("function f($x {\n}").unwrap_err();
        assert_eq!((err.line(), err.column()), (1, 15));

        let err = parse("if $a { 1 ").unwrap_err();
        assert!(matches!(err, ParseError::UnclosedDelimiter { delimiter: '{', .. }));
        assert_eq!(err.expected().as_deref(), Some("'}'"));

        let err = parse("1 = 2").unwrap_err();
        assert!(matches!(err, ParseError::InvalidAssignmentTarget { .. }));

        let err = parse("println(1,").unwrap_err();
        assert!(matches!(err, ParseError::UnexpectedEndOfInput { .. }));
    }
}
