//! AST for mongosh script statements
//!
//! Only the constructs the compatibility helpers need are represented:
//! literals, object and array literals, identifiers, member access, calls,
//! `new` expressions and unary signs. A script is a list of [`Statement`]s.

use std::ops::Range;

/// Span information for source locations (character offsets)
pub type Span = Range<usize>;

/// One statement of a script
#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    /// Expression statement: `ObjectId("...")`, `use("sales")`, `db`
    Expr(Expr, Span),
    /// Shell command form: `use sales`
    Use(String, Span),
}

impl Statement {
    /// Source span of the statement
    pub fn span(&self) -> &Span {
        match self {
            Statement::Expr(_, span) | Statement::Use(_, span) => span,
        }
    }

    /// Whether this is `use name` or a top-level `use(...)` call
    pub fn selects_database(&self) -> bool {
        match self {
            Statement::Use(..) => true,
            Statement::Expr(Expr::Call(call), _) => {
                matches!(call.callee.as_ref(), Expr::Ident(name) if name == "use")
            }
            Statement::Expr(..) => false,
        }
    }
}

/// Root expression type
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// Object literal: { key: value, ... }
    Object(ObjectExpr),
    /// Array literal: [1, 2, 3]
    Array(ArrayExpr),
    /// String literal: "hello" or 'world'
    String(String),
    /// Number literal: 42 or 3.14
    Number(f64),
    /// Boolean literal: true or false
    Boolean(bool),
    /// Null literal
    Null,
    /// `undefined`
    Undefined,
    /// Identifier: global name
    Ident(String),
    /// Member expression: obj.prop
    Member(Box<MemberExpr>),
    /// Call expression: fn(args)
    Call(Box<CallExpr>),
    /// New expression: new Ctor(args)
    New(Box<NewExpr>),
    /// Unary expression: -x, +x, !x
    Unary(Box<UnaryExpr>),
}

impl Expr {
    /// Short description used in error messages
    pub fn describe(&self) -> &'static str {
        match self {
            Expr::Object(_) => "object literal",
            Expr::Array(_) => "array literal",
            Expr::String(_) => "string",
            Expr::Number(_) => "number",
            Expr::Boolean(_) => "boolean",
            Expr::Null => "null",
            Expr::Undefined => "undefined",
            Expr::Ident(_) => "identifier",
            Expr::Member(_) => "member expression",
            Expr::Call(_) => "call expression",
            Expr::New(_) => "new expression",
            Expr::Unary(_) => "unary expression",
        }
    }
}

/// Object expression: { key: value, ... }
#[derive(Debug, Clone, PartialEq)]
pub struct ObjectExpr {
    pub properties: Vec<Property>,
    pub span: Span,
}

impl ObjectExpr {
    pub fn new(properties: Vec<Property>, span: Span) -> Self {
        Self { properties, span }
    }
}

/// Object property: key: value
#[derive(Debug, Clone, PartialEq)]
pub struct Property {
    pub key: PropertyKey,
    pub value: Expr,
    pub span: Span,
}

impl Property {
    pub fn new(key: PropertyKey, value: Expr, span: Span) -> Self {
        Self { key, value, span }
    }
}

/// Property key (can be identifier, string, or number)
#[derive(Debug, Clone, PartialEq)]
pub enum PropertyKey {
    Ident(String),
    String(String),
    Number(String),
}

impl PropertyKey {
    pub fn as_str(&self) -> &str {
        match self {
            PropertyKey::Ident(s) | PropertyKey::String(s) | PropertyKey::Number(s) => s,
        }
    }
}

/// Array expression: [1, 2, 3]
#[derive(Debug, Clone, PartialEq)]
pub struct ArrayExpr {
    pub elements: Vec<Expr>,
    pub span: Span,
}

impl ArrayExpr {
    pub fn new(elements: Vec<Expr>, span: Span) -> Self {
        Self { elements, span }
    }
}

/// Member expression: obj.prop or obj[expr]
#[derive(Debug, Clone, PartialEq)]
pub struct MemberExpr {
    pub object: Box<Expr>,
    pub property: MemberProperty,
    pub span: Span,
}

impl MemberExpr {
    pub fn new(object: Expr, property: MemberProperty, span: Span) -> Self {
        Self {
            object: Box::new(object),
            property,
            span,
        }
    }
}

/// Member property (static or computed)
#[derive(Debug, Clone, PartialEq)]
pub enum MemberProperty {
    /// Static: obj.prop
    Ident(String),
    /// Computed: obj[expr]
    Computed(Expr),
}

/// Call expression: fn(arg1, arg2, ...)
#[derive(Debug, Clone, PartialEq)]
pub struct CallExpr {
    pub callee: Box<Expr>,
    pub arguments: Vec<Expr>,
    pub span: Span,
}

impl CallExpr {
    pub fn new(callee: Expr, arguments: Vec<Expr>, span: Span) -> Self {
        Self {
            callee: Box::new(callee),
            arguments,
            span,
        }
    }
}

/// New expression: new Ctor(arg1, arg2, ...)
#[derive(Debug, Clone, PartialEq)]
pub struct NewExpr {
    pub callee: Box<Expr>,
    pub arguments: Vec<Expr>,
    pub span: Span,
}

impl NewExpr {
    pub fn new(callee: Expr, arguments: Vec<Expr>, span: Span) -> Self {
        Self {
            callee: Box::new(callee),
            arguments,
            span,
        }
    }
}

/// Unary expression: -x, +x, !x
#[derive(Debug, Clone, PartialEq)]
pub struct UnaryExpr {
    pub operator: UnaryOperator,
    pub argument: Box<Expr>,
    pub span: Span,
}

impl UnaryExpr {
    pub fn new(operator: UnaryOperator, argument: Expr, span: Span) -> Self {
        Self {
            operator,
            argument: Box::new(argument),
            span,
        }
    }
}

/// Unary operators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOperator {
    /// Negation: -x
    Minus,
    /// Plus: +x
    Plus,
    /// Logical NOT: !x
    Not,
}
