use std::{fmt, rc::Rc};

/// A location in the source text.
///
/// Both fields are 1-based. Columns count characters, not bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Position {
    /// The source line.
    pub line:   usize,
    /// The column within the line.
    pub column: usize,
}

impl Position {
    /// Creates a position from a line and column pair.
    #[must_use]
    pub const fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}, column {}", self.line, self.column)
    }
}

/// A parsed source file.
///
/// The program is an ordered list of top-level statements. Function
/// declarations among them are hoisted before anything executes.
#[derive(Debug, Clone, PartialEq)]
pub struct Program {
    /// Top-level statements in source order.
    pub statements: Vec<Statement>,
}

/// A brace-delimited sequence of statements.
///
/// A block evaluates to the value of its final statement, or `Void` when it is
/// empty or ends in a statement that produces no value.
#[derive(Debug, Clone, PartialEq)]
pub struct Block {
    /// Statements in source order.
    pub statements: Vec<Statement>,
    /// Position of the opening brace.
    pub pos:        Position,
}

/// A named or anonymous function definition.
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionDecl {
    /// Declared name. Anonymous functions use [`FunctionDecl::ANONYMOUS`].
    pub name:        String,
    /// Parameters in declaration order.
    pub params:      Vec<Param>,
    /// Optional return type tag, e.g. `int` in `function f(): int`.
    ///
    /// Type tags are recorded but not enforced.
    pub return_type: Option<String>,
    /// The function body.
    pub body:        Block,
    /// Position of the `function` keyword.
    pub pos:         Position,
}

impl FunctionDecl {
    /// The name given to function literals.
    pub const ANONYMOUS: &'static str = "{closure}";
}

/// A single formal parameter: `[Type] $name`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Param {
    /// The variable name without the leading `$`.
    pub name:      String,
    /// Optional type tag such as `int` or `Array`.
    pub type_hint: Option<String>,
}

/// The header and body of a `foreach` statement.
#[derive(Debug, Clone, PartialEq)]
pub struct ForeachStmt {
    /// The expression being iterated.
    pub iterable: Expr,
    /// Optional key variable from `$key => $value`.
    pub key:      Option<String>,
    /// The value variable.
    pub value:    String,
    /// The loop body, evaluated once per element.
    pub body:     Block,
    /// Position of the `foreach` keyword.
    pub pos:      Position,
}

/// A top-level or block-level statement.
#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    /// `namespace a\b\c`
    Namespace {
        /// Path segments, e.g. `["gophp", "Function"]`.
        path: Vec<String>,
        /// Position of the `namespace` keyword.
        pos:  Position,
    },
    /// `use a\b\c [as alias]`
    Use {
        /// Path segments of the imported name.
        path:  Vec<String>,
        /// Explicit alias, if any. Defaults to the last path segment.
        alias: Option<String>,
        /// Position of the `use` keyword.
        pos:   Position,
    },
    /// A named function declaration.
    Function(Rc<FunctionDecl>),
    /// `const NAME = expr`
    Const {
        /// The constant's name.
        name:  String,
        /// The value expression, evaluated once when the statement runs.
        value: Expr,
        /// Position of the `const` keyword.
        pos:   Position,
    },
    /// A `foreach` loop.
    Foreach(Box<ForeachStmt>),
    /// An expression evaluated for its value or side effects.
    Expression {
        /// The expression.
        expr: Expr,
        /// Where the expression starts.
        pos:  Position,
    },
}

/// An expression node.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// An integer literal such as `42`.
    IntLiteral {
        /// The literal value.
        value: i64,
        /// Source position.
        pos:   Position,
    },
    /// A string literal with escapes already processed.
    StringLiteral {
        /// The literal contents.
        value: Rc<str>,
        /// Source position.
        pos:   Position,
    },
    /// A `$name` variable reference.
    Variable {
        /// The name without the leading `$`.
        name: String,
        /// Source position.
        pos:  Position,
    },
    /// A bare name: `true`, `false`, a constant, or a function used as a
    /// value.
    Identifier {
        /// The name, possibly namespace-qualified (`a\b\f`).
        name: String,
        /// Source position.
        pos:  Position,
    },
    /// A prefix operation such as `-x` or `!x`.
    Unary {
        /// The operator.
        op:      UnaryOperator,
        /// The operand.
        operand: Box<Self>,
        /// Position of the operator.
        pos:     Position,
    },
    /// An infix operation such as `a + b`.
    Binary {
        /// Left operand.
        left:  Box<Self>,
        /// The operator.
        op:    BinaryOperator,
        /// Right operand.
        right: Box<Self>,
        /// Position of the operator.
        pos:   Position,
    },
    /// `target = value` or a compound form such as `target += value`.
    Assign {
        /// The assigned place.
        target: AssignTarget,
        /// The operator of a compound assignment, `None` for plain `=`.
        op:     Option<BinaryOperator>,
        /// The right-hand side.
        value:  Box<Self>,
        /// Position of the assignment operator.
        pos:    Position,
    },
    /// `start..end`
    Range {
        /// Inclusive start bound.
        start: Box<Self>,
        /// Exclusive end bound.
        end:   Box<Self>,
        /// Position of the `..` token.
        pos:   Position,
    },
    /// `[e1, e2, ...]`
    ArrayLiteral {
        /// Element expressions.
        elements: Vec<Self>,
        /// Position of the opening bracket.
        pos:      Position,
    },
    /// `target[index]`
    Index {
        /// The indexed expression.
        target: Box<Self>,
        /// The index expression.
        index:  Box<Self>,
        /// Position of the opening bracket.
        pos:    Position,
    },
    /// A call through a name: `f(a, b)` or `ns\f(a, b)`.
    Call {
        /// The callee name, possibly namespace-qualified.
        name:      String,
        /// Argument expressions.
        arguments: Vec<Self>,
        /// Position of the callee name.
        pos:       Position,
    },
    /// A call on an arbitrary callee value: `$f(1)`.
    CallValue {
        /// The callee expression.
        callee:    Box<Self>,
        /// Argument expressions.
        arguments: Vec<Self>,
        /// Position of the opening parenthesis.
        pos:       Position,
    },
    /// `receiver->method(args)`
    MethodCall {
        /// The receiver expression.
        receiver:  Box<Self>,
        /// The method name.
        method:    String,
        /// Argument expressions.
        arguments: Vec<Self>,
        /// Position of the `->` token.
        pos:       Position,
    },
    /// `if cond { ... } else { ... }`
    If {
        /// The condition.
        condition:   Box<Self>,
        /// The block evaluated when the condition is truthy.
        then_branch: Block,
        /// Either a block or a nested `if` expression.
        else_branch: Option<Box<Self>>,
        /// Position of the `if` keyword.
        pos:         Position,
    },
    /// A block used as an expression.
    Block(Block),
    /// An anonymous `function (...) { ... }` literal.
    Closure(Rc<FunctionDecl>),
}

impl Expr {
    /// Returns the source position of this expression.
    #[must_use]
    pub fn pos(&self) -> Position {
        match self {
            Self::IntLiteral { pos, .. }
            | Self::StringLiteral { pos, .. }
            | Self::Variable { pos, .. }
            | Self::Identifier { pos, .. }
            | Self::Unary { pos, .. }
            | Self::Binary { pos, .. }
            | Self::Assign { pos, .. }
            | Self::Range { pos, .. }
            | Self::ArrayLiteral { pos, .. }
            | Self::Index { pos, .. }
            | Self::Call { pos, .. }
            | Self::CallValue { pos, .. }
            | Self::MethodCall { pos, .. }
            | Self::If { pos, .. } => *pos,
            Self::Block(block) => block.pos,
            Self::Closure(decl) => decl.pos,
        }
    }
}

/// The place written by an assignment.
#[derive(Debug, Clone, PartialEq)]
pub enum AssignTarget {
    /// `$name = ...`
    Variable(String),
    /// `array[index] = ...`
    Index {
        /// The indexed expression.
        target: Box<Expr>,
        /// The index expression.
        index:  Box<Expr>,
    },
}

/// Prefix operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOperator {
    /// `-`
    Negate,
    /// `!`
    Not,
}

/// Infix operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOperator {
    /// `+`
    Add,
    /// `-`
    Sub,
    /// `*`
    Mul,
    /// `/`
    Div,
    /// `%`
    Mod,
    /// `.`
    Concat,
    /// `==`
    Equal,
    /// `!=`
    NotEqual,
    /// `===`
    Identical,
    /// `!==`
    NotIdentical,
    /// `<`
    Less,
    /// `>`
    Greater,
    /// `<=`
    LessEqual,
    /// `>=`
    GreaterEqual,
    /// `&&` or `and`
    And,
    /// `||` or `or`
    Or,
}

impl fmt::Display for BinaryOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let symbol = match self {
            Self::Add => "+",
            Self::Sub => "-",
            Self::Mul => "*",
            Self::Div => "/",
            Self::Mod => "%",
            Self::Concat => ".",
            Self::Equal => "==",
            Self::NotEqual => "!=",
            Self::Identical => "===",
            Self::NotIdentical => "!==",
            Self::Less => "<",
            Self::Greater => ">",
            Self::LessEqual => "<=",
            Self::GreaterEqual => ">=",
            Self::And => "&&",
            Self::Or => "||",
        };
        f.write_str(symbol)
    }
}

impl fmt::Display for UnaryOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Negate => f.write_str("-"),
            Self::Not => f.write_str("!"),
        }
    }
}
