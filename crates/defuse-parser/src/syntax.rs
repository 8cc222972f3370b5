//! Syntax tree for the Java subset the analyzer understands.
//!
//! The tree deliberately exposes only what the def/use passes consume:
//! package name, ordered type declarations with supertype name references
//! and members, ordered statements, and the expression shapes of the
//! resolution table. No semantic binding, no trivia, no modifier detail
//! beyond what changes analysis (static initializers).

use defuse_common::Span;
use std::fmt;

/// One parsed source file.
#[derive(Debug, Clone, Default)]
pub struct CompilationUnit {
    /// Dotted package name; empty path when the file has no package.
    pub package: Option<String>,
    pub types: Vec<TypeDecl>,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum TypeKind {
    Class,
    Interface,
    Enum,
}

#[derive(Debug, Clone)]
pub struct TypeDecl {
    pub kind: TypeKind,
    pub name: String,
    /// `extends` then `implements` references, in source order.
    pub supertypes: Vec<TypeRef>,
    /// Enum constants; empty for classes and interfaces.
    pub constants: Vec<EnumConstant>,
    pub members: Vec<Member>,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub struct EnumConstant {
    pub name: String,
    pub args: Vec<Expr>,
    /// Constant class body, when present.
    pub body: Option<Vec<Member>>,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub enum Member {
    Field(FieldDecl),
    Method(MethodDecl),
    Initializer(InitializerBlock),
    Type(TypeDecl),
}

#[derive(Debug, Clone)]
pub struct FieldDecl {
    pub ty: TypeRef,
    pub fragments: Vec<VarFragment>,
}

/// One declarator of a (possibly multi-name) variable or field declaration.
#[derive(Debug, Clone)]
pub struct VarFragment {
    pub name: String,
    pub init: Option<Expr>,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub struct MethodDecl {
    pub name: String,
    pub params: Vec<Param>,
    /// `None` for constructors.
    pub return_type: Option<TypeRef>,
    pub is_constructor: bool,
    /// `None` for abstract/interface methods.
    pub body: Option<Block>,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub struct Param {
    /// `None` for untyped lambda parameters.
    pub ty: Option<TypeRef>,
    pub name: String,
    pub span: Span,
}

/// A static or instance initializer block. Both get the same scope role.
#[derive(Debug, Clone)]
pub struct InitializerBlock {
    pub is_static: bool,
    pub body: Block,
}

#[derive(Debug, Clone)]
pub struct Block {
    pub stmts: Vec<Stmt>,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub struct LocalVarDecl {
    pub ty: TypeRef,
    pub fragments: Vec<VarFragment>,
}

#[derive(Debug, Clone)]
pub struct CatchClause {
    pub param: Param,
    pub body: Block,
}

/// One `case`/`default` group of a switch: its labels and the statements
/// that follow them. A `None` label is `default`.
#[derive(Debug, Clone)]
pub struct SwitchArm {
    pub labels: Vec<Option<Expr>>,
    pub stmts: Vec<Stmt>,
}

#[derive(Debug, Clone)]
pub enum Stmt {
    Block(Block),
    LocalVar(LocalVarDecl),
    LocalType(TypeDecl),
    Expr(Expr),
    If {
        cond: Expr,
        then_branch: Box<Stmt>,
        else_branch: Option<Box<Stmt>>,
    },
    While {
        cond: Expr,
        body: Box<Stmt>,
    },
    Do {
        body: Box<Stmt>,
        cond: Expr,
    },
    For {
        /// Either one `Expr::InlineDecl` or a list of plain expressions.
        init: Vec<Expr>,
        cond: Option<Expr>,
        update: Vec<Expr>,
        body: Box<Stmt>,
    },
    ForEach {
        param: Param,
        iterable: Expr,
        body: Box<Stmt>,
    },
    Switch {
        scrutinee: Expr,
        arms: Vec<SwitchArm>,
    },
    Return(Option<Expr>),
    Throw(Expr),
    Try {
        resources: Vec<LocalVarDecl>,
        body: Block,
        catches: Vec<CatchClause>,
        finally: Option<Block>,
    },
    Synchronized {
        lock: Expr,
        body: Block,
    },
    Labeled {
        label: String,
        stmt: Box<Stmt>,
    },
    Assert {
        cond: Expr,
        message: Option<Expr>,
    },
    Break,
    Continue,
    Empty,
}

/// Type references as written in source, reduced to what the analyzer
/// needs: enough structure to extract the outer named form.
#[derive(Debug, Clone)]
pub enum TypeRef {
    Named {
        /// Last segment of a (possibly qualified) name.
        name: String,
        args: Vec<TypeRef>,
    },
    Array(Box<TypeRef>),
    Primitive,
    Void,
    Wildcard,
    /// Multi-catch `A | B`; never yields a name.
    Union(Vec<TypeRef>),
}

impl TypeRef {
    /// The declared-type-name extraction policy, applied everywhere:
    /// arrays reduce to their element type's name, parameterized types to
    /// the outer named type, qualified names to their last segment;
    /// primitives, `void`, wildcards, and unions have no nameable form.
    pub fn name(&self) -> Option<&str> {
        match self {
            TypeRef::Named { name, .. } => Some(name),
            TypeRef::Array(elem) => elem.name(),
            TypeRef::Primitive | TypeRef::Void | TypeRef::Wildcard | TypeRef::Union(_) => None,
        }
    }
}

/// A simple or dotted name expression (`x`, `a.b.c`). Dotted chains nest
/// through `qualifier`: `a.b.c` is `c` qualified by `a.b`.
#[derive(Debug, Clone)]
pub struct NameExpr {
    pub qualifier: Option<Box<NameExpr>>,
    pub id: String,
}

impl NameExpr {
    pub fn simple(id: impl Into<String>) -> Self {
        NameExpr {
            qualifier: None,
            id: id.into(),
        }
    }
}

impl fmt::Display for NameExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(q) = &self.qualifier {
            write!(f, "{q}.")?;
        }
        f.write_str(&self.id)
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Literal {
    Str,
    Char,
    Int,
    Float,
    Bool,
    Null,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum UnaryOp {
    Plus,
    Minus,
    Not,
    BitNot,
    Inc,
    Dec,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Rem,
    Shl,
    Shr,
    UShr,
    Lt,
    Gt,
    Le,
    Ge,
    Eq,
    Ne,
    And,
    Or,
    BitAnd,
    BitOr,
    BitXor,
}

#[derive(Debug, Clone)]
pub struct LambdaExpr {
    pub params: Vec<Param>,
    pub body: LambdaBody,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub enum LambdaBody {
    Expr(Box<Expr>),
    Block(Block),
}

/// Every expression shape the evaluator distinguishes.
#[derive(Debug, Clone)]
pub enum Expr {
    Name(NameExpr),
    This,
    Literal(Literal),
    /// `Foo.class`; carries nothing the analysis reads.
    ClassLiteral,
    Unary {
        op: UnaryOp,
        operand: Box<Expr>,
        prefix: bool,
    },
    Binary {
        op: BinaryOp,
        lhs: Box<Expr>,
        rhs: Box<Expr>,
    },
    Paren(Box<Expr>),
    Assign {
        target: Box<Expr>,
        value: Box<Expr>,
    },
    /// A declaration in expression position (classic for-loop init).
    InlineDecl {
        ty: TypeRef,
        fragments: Vec<VarFragment>,
    },
    Call {
        receiver: Option<Box<Expr>>,
        name: String,
        args: Vec<Expr>,
    },
    SuperCall {
        name: String,
        args: Vec<Expr>,
    },
    /// `this(...)` / `super(...)` constructor delegation.
    ConstructorCall {
        args: Vec<Expr>,
    },
    New {
        ty: TypeRef,
        /// Outer instance of `outer.new Inner(...)`.
        qualifier: Option<Box<Expr>>,
        args: Vec<Expr>,
        /// Anonymous class body.
        body: Option<Vec<Member>>,
    },
    ArrayNew {
        ty: TypeRef,
        dims: Vec<Expr>,
        init: Option<Box<Expr>>,
    },
    ArrayInit(Vec<Expr>),
    Index {
        array: Box<Expr>,
        index: Box<Expr>,
    },
    FieldAccess {
        object: Box<Expr>,
        name: String,
    },
    SuperField {
        name: String,
    },
    Cast {
        ty: TypeRef,
        expr: Box<Expr>,
    },
    Conditional {
        cond: Box<Expr>,
        then_expr: Box<Expr>,
        else_expr: Box<Expr>,
    },
    InstanceOf {
        expr: Box<Expr>,
        ty: TypeRef,
    },
    Lambda(LambdaExpr),
    /// `recv::name`; opaque to the analysis.
    MethodRef {
        target: Box<Expr>,
        name: String,
    },
}

impl Expr {
    /// Dotted source text of a pure name chain, used as the receiver-text
    /// fallback when resolving static-style calls. Any other shape has no
    /// usable textual form.
    pub fn name_text(&self) -> Option<String> {
        match self {
            Expr::Name(name) => Some(name.to_string()),
            _ => None,
        }
    }
}
