use crate::span::Span;

/// Anything in the tree that covers a stretch of source.
pub trait Node {
    fn span(&self) -> Span;
}

#[derive(Debug, Clone, PartialEq)]
pub struct SourceFile {
    pub definitions: Vec<Definition>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Definition {
    /// stack Particle { pos: vec3, mass: float }
    Stack(RecordDef),
    /// single Config { gravity: float }
    Single(RecordDef),
    /// type Position = vec3 rack
    Type(TypeDef),
    Crunch(RoutineDef),
    Rake(RakeDef),
    Run(RoutineDef),
}

impl Definition {
    pub fn name(&self) -> &str {
        match self {
            Self::Stack(def) | Self::Single(def) => &def.name,
            Self::Type(def) => &def.name,
            Self::Crunch(def) | Self::Run(def) => &def.name,
            Self::Rake(def) => &def.name,
        }
    }
}

/// Body shared by `stack` and `single` definitions.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordDef {
    pub name: String,
    pub fields: Vec<FieldDef>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FieldDef {
    pub name: String,
    pub ty: Type,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TypeDef {
    pub name: String,
    pub aliased: Type,
    pub span: Span,
}

/// `crunch` and `run` share a shape: parameters, result, statement body.
#[derive(Debug, Clone, PartialEq)]
pub struct RoutineDef {
    pub name: String,
    pub params: Vec<Parameter>,
    pub result: ResultSpec,
    pub body: Vec<Statement>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RakeDef {
    pub name: String,
    pub params: Vec<Parameter>,
    pub result: ResultSpec,
    pub setup: Vec<LetBinding>,
    pub tines: Vec<TineDecl>,
    pub throughs: Vec<ThroughBlock>,
    pub sweep: SweepBlock,
    pub span: Span,
}

// ── Types ──

#[derive(Debug, Clone, PartialEq)]
pub struct Type {
    pub kind: TypeKind,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub enum TypeKind {
    Primitive(PrimitiveType),
    Compound(CompoundType),
    /// float rack, vec3 rack
    Rack(LaneType),
    /// Particle stack
    Stack(String),
    /// Config single
    Single(String),
    /// Particle pack
    Pack(String),
    Mask,
    Function { params: Vec<Type>, ret: Box<Type> },
    Tuple(Vec<Type>),
    Unit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrimitiveType {
    Float,
    Double,
    Int,
    Int8,
    Int16,
    Int64,
    Uint,
    Uint8,
    Uint16,
    Uint64,
    Bool,
}

impl PrimitiveType {
    pub fn from_name(name: &str) -> Option<Self> {
        let ty = match name {
            "float" => Self::Float,
            "double" => Self::Double,
            "int" => Self::Int,
            "int8" => Self::Int8,
            "int16" => Self::Int16,
            "int64" => Self::Int64,
            "uint" => Self::Uint,
            "uint8" => Self::Uint8,
            "uint16" => Self::Uint16,
            "uint64" => Self::Uint64,
            "bool" => Self::Bool,
            _ => return None,
        };
        Some(ty)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompoundType {
    Vec2,
    Vec3,
    Vec4,
    Mat3,
    Mat4,
}

impl CompoundType {
    pub fn from_name(name: &str) -> Option<Self> {
        let ty = match name {
            "vec2" => Self::Vec2,
            "vec3" => Self::Vec3,
            "vec4" => Self::Vec4,
            "mat3" => Self::Mat3,
            "mat4" => Self::Mat4,
            _ => return None,
        };
        Some(ty)
    }
}

/// Element type of a rack.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LaneType {
    Primitive(PrimitiveType),
    Compound(CompoundType),
}

// ── Signatures ──

#[derive(Debug, Clone, PartialEq)]
pub enum Parameter {
    /// x, (x: float rack)
    Rack { name: String, ty: Option<Type>, span: Span },
    /// <dt>, (<dt>: float)
    Scalar { expr: Expression, ty: Option<Type>, span: Span },
}

#[derive(Debug, Clone, PartialEq)]
pub enum ResultSpec {
    /// out, (out: float rack)
    Single { name: String, ty: Option<Type>, span: Span },
    /// (a, b)
    Tuple { names: Vec<String>, span: Span },
}

// ── Statements ──

#[derive(Debug, Clone, PartialEq)]
pub struct LetBinding {
    pub name: String,
    pub ty: Option<Type>,
    pub value: Expression,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    Let(LetBinding),
    /// x <- expr
    Assign { name: String, value: Expression, span: Span },
    /// over particles, <n> |> p: body
    Over {
        pack: Expression,
        count: Expression,
        binding: String,
        body: Expression,
        span: Span,
    },
    Expr(Expression),
}

// ── Expressions ──

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Pipe, // |>
    Or,
    And,
    Less,
    LessEq,
    Greater,
    GreaterEq,
    Equal,
    NotEqual,
    Add,
    Sub,
    Mul,
    Div,
    Rem,
    Shl,
    Shr,
    Rol, // <<<
    Ror, // >>>
    Cross, // ><
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    Neg,
    Not,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReduceOp {
    Add,
    Mul,
    Min,
    Max,
    Or,
    And,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanOp {
    Add,
    Mul,
    Min,
    Max,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Expression {
    Binary {
        op: BinaryOp,
        lhs: Box<Expression>,
        rhs: Box<Expression>,
        span: Span,
    },
    Unary {
        op: UnaryOp,
        operand: Box<Expression>,
        span: Span,
    },
    Call {
        name: String,
        args: Vec<Expression>,
        span: Span,
    },
    Field {
        base: Box<Expression>,
        name: String,
        span: Span,
    },
    /// <1.0>, <dt>, <cfg.gravity>
    Scalar { inner: ScalarInner, span: Span },
    /// Particle { pos := p, mass := <1.0> }
    Record {
        type_name: String,
        inits: Vec<FieldInit>,
        span: Span,
    },
    Reduce {
        operand: Box<Expression>,
        op: ReduceOp,
        span: Span,
    },
    Scan {
        operand: Box<Expression>,
        op: ScanOp,
        span: Span,
    },
    /// v ~> [1, 0, 3, 2]
    Shuffle {
        operand: Box<Expression>,
        indices: Vec<i64>,
        span: Span,
    },
    Lambda {
        params: Vec<Parameter>,
        body: Box<Expression>,
        span: Span,
    },
    LetIn {
        name: String,
        value: Box<Expression>,
        body: Box<Expression>,
        span: Span,
    },
    Primary(Primary, Span),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Primary {
    Ident(String),
    Int(i64),
    Float(f64),
    Bool(bool),
    /// @
    LaneIndex,
    Lanes,
    Unit,
    Paren(Box<Expression>),
    Tuple(Vec<Expression>),
}

/// Contents of a `<...>` scalar literal.
#[derive(Debug, Clone, PartialEq)]
pub enum ScalarInner {
    Ident(String),
    Field(Box<ScalarInner>, String),
    Int(i64),
    Float(f64),
}

#[derive(Debug, Clone, PartialEq)]
pub struct FieldInit {
    pub name: String,
    pub value: Expression,
    pub span: Span,
}

// ── Predicates ──

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareOp {
    Less,
    LessEq,
    Greater,
    GreaterEq,
    Equal,
    NotEqual,
    Is,
    IsNot,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Predicate {
    Or {
        lhs: Box<Predicate>,
        rhs: Box<Predicate>,
        span: Span,
    },
    And {
        lhs: Box<Predicate>,
        rhs: Box<Predicate>,
        span: Span,
    },
    Not { operand: Box<Predicate>, span: Span },
    Compare {
        lhs: Expression,
        op: CompareOp,
        rhs: Expression,
        span: Span,
    },
    /// #name as a boolean atom: the tine is active
    TineTest(TineRef),
    Group { inner: Box<Predicate>, span: Span },
    Const(bool, Span),
}

/// Lexical `#name`; whether the tine exists is not checked here.
#[derive(Debug, Clone, PartialEq)]
pub struct TineRef {
    pub name: String,
    pub span: Span,
}

// ── Rake blocks ──

#[derive(Debug, Clone, PartialEq)]
pub struct TineDecl {
    pub tine: TineRef,
    pub guard: Predicate,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ThroughGuard {
    Tine(TineRef),
    Predicate(Predicate),
}

#[derive(Debug, Clone, PartialEq)]
pub struct ThroughBlock {
    pub guard: ThroughGuard,
    pub else_value: Option<Expression>,
    pub setup: Vec<LetBinding>,
    pub value: Expression,
    pub binding: String,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SweepBlock {
    pub arms: Vec<SweepArm>,
    pub binding: String,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SweepTarget {
    Tine(TineRef),
    Wildcard(Span),
}

#[derive(Debug, Clone, PartialEq)]
pub struct SweepArm {
    pub target: SweepTarget,
    pub value: Expression,
    pub span: Span,
}

// ── Span access ──

macro_rules! span_field {
    ($($ty:ty),* $(,)?) => {
        $(impl Node for $ty {
            fn span(&self) -> Span {
                self.span
            }
        })*
    };
}

span_field!(
    SourceFile, RecordDef, FieldDef, TypeDef, RoutineDef, RakeDef, Type, LetBinding, FieldInit,
    TineRef, TineDecl, ThroughBlock, SweepBlock, SweepArm,
);

impl Node for Definition {
    fn span(&self) -> Span {
        match self {
            Self::Stack(def) | Self::Single(def) => def.span,
            Self::Type(def) => def.span,
            Self::Crunch(def) | Self::Run(def) => def.span,
            Self::Rake(def) => def.span,
        }
    }
}

impl Node for Parameter {
    fn span(&self) -> Span {
        match self {
            Self::Rack { span, .. } | Self::Scalar { span, .. } => *span,
        }
    }
}

impl Node for ResultSpec {
    fn span(&self) -> Span {
        match self {
            Self::Single { span, .. } | Self::Tuple { span, .. } => *span,
        }
    }
}

impl Node for Statement {
    fn span(&self) -> Span {
        match self {
            Self::Let(binding) => binding.span,
            Self::Assign { span, .. } | Self::Over { span, .. } => *span,
            Self::Expr(expr) => expr.span(),
        }
    }
}

impl Node for Expression {
    fn span(&self) -> Span {
        match self {
            Self::Binary { span, .. }
            | Self::Unary { span, .. }
            | Self::Call { span, .. }
            | Self::Field { span, .. }
            | Self::Scalar { span, .. }
            | Self::Record { span, .. }
            | Self::Reduce { span, .. }
            | Self::Scan { span, .. }
            | Self::Shuffle { span, .. }
            | Self::Lambda { span, .. }
            | Self::LetIn { span, .. }
            | Self::Primary(_, span) => *span,
        }
    }
}

impl Node for Predicate {
    fn span(&self) -> Span {
        match self {
            Self::Or { span, .. }
            | Self::And { span, .. }
            | Self::Not { span, .. }
            | Self::Compare { span, .. }
            | Self::Group { span, .. }
            | Self::Const(_, span) => *span,
            Self::TineTest(tine) => tine.span,
        }
    }
}

impl Node for ThroughGuard {
    fn span(&self) -> Span {
        match self {
            Self::Tine(tine) => tine.span,
            Self::Predicate(predicate) => predicate.span(),
        }
    }
}

impl Node for SweepTarget {
    fn span(&self) -> Span {
        match self {
            Self::Tine(tine) => tine.span,
            Self::Wildcard(span) => *span,
        }
    }
}
