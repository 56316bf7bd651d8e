#![allow(dead_code)]

use rake_syntax::ir::ast::*;

/// Compact s-expression rendering so tree shapes fit in one assertion.
pub fn sexpr(expr: &Expression) -> String {
    match expr {
        Expression::Binary { op, lhs, rhs, .. } => {
            format!("({} {} {})", binary_symbol(*op), sexpr(lhs), sexpr(rhs))
        }
        Expression::Unary { op, operand, .. } => {
            let name = match op {
                UnaryOp::Neg => "neg",
                UnaryOp::Not => "not",
            };
            format!("({} {})", name, sexpr(operand))
        }
        Expression::Call { name, args, .. } => {
            let mut out = format!("(call {name}");
            for arg in args {
                out.push(' ');
                out.push_str(&sexpr(arg));
            }
            out.push(')');
            out
        }
        Expression::Field { base, name, .. } => format!("(. {} {})", sexpr(base), name),
        Expression::Scalar { inner, .. } => format!("<{}>", scalar(inner)),
        Expression::Record { type_name, inits, .. } => {
            let mut out = format!("(record {type_name}");
            for init in inits {
                out.push_str(&format!(" ({} {})", init.name, sexpr(&init.value)));
            }
            out.push(')');
            out
        }
        Expression::Reduce { operand, op, .. } => {
            format!("(reduce-{} {})", format!("{op:?}").to_lowercase(), sexpr(operand))
        }
        Expression::Scan { operand, op, .. } => {
            format!("(scan-{} {})", format!("{op:?}").to_lowercase(), sexpr(operand))
        }
        Expression::Shuffle { operand, indices, .. } => {
            let indices: Vec<String> = indices.iter().map(|i| i.to_string()).collect();
            format!("(shuffle {} [{}])", sexpr(operand), indices.join(" "))
        }
        Expression::Lambda { params, body, .. } => {
            let params: Vec<String> = params.iter().map(param).collect();
            format!("(fun ({}) {})", params.join(" "), sexpr(body))
        }
        Expression::LetIn { name, value, body, .. } => {
            format!("(let {} {} {})", name, sexpr(value), sexpr(body))
        }
        Expression::Primary(primary, _) => match primary {
            Primary::Ident(name) => name.clone(),
            Primary::Int(value) => value.to_string(),
            Primary::Float(value) => format!("{value:?}"),
            Primary::Bool(value) => value.to_string(),
            Primary::LaneIndex => "@".to_string(),
            Primary::Lanes => "lanes".to_string(),
            Primary::Unit => "()".to_string(),
            Primary::Paren(inner) => format!("(paren {})", sexpr(inner)),
            Primary::Tuple(elements) => {
                let elements: Vec<String> = elements.iter().map(sexpr).collect();
                format!("(tuple {})", elements.join(" "))
            }
        },
    }
}

pub fn predicate(pred: &Predicate) -> String {
    match pred {
        Predicate::Or { lhs, rhs, .. } => format!("(or {} {})", predicate(lhs), predicate(rhs)),
        Predicate::And { lhs, rhs, .. } => format!("(and {} {})", predicate(lhs), predicate(rhs)),
        Predicate::Not { operand, .. } => format!("(not {})", predicate(operand)),
        Predicate::Compare { lhs, op, rhs, .. } => {
            let symbol = match op {
                CompareOp::Less => "<",
                CompareOp::LessEq => "<=",
                CompareOp::Greater => ">",
                CompareOp::GreaterEq => ">=",
                CompareOp::Equal => "=",
                CompareOp::NotEqual => "!=",
                CompareOp::Is => "is",
                CompareOp::IsNot => "is-not",
            };
            format!("({} {} {})", symbol, sexpr(lhs), sexpr(rhs))
        }
        Predicate::TineTest(tine) => format!("#{}", tine.name),
        Predicate::Group { inner, .. } => format!("(group {})", predicate(inner)),
        Predicate::Const(value, _) => value.to_string(),
    }
}

pub fn param(param: &Parameter) -> String {
    match param {
        Parameter::Rack { name, .. } => name.clone(),
        Parameter::Scalar { expr, .. } => sexpr(expr),
    }
}

fn scalar(inner: &ScalarInner) -> String {
    match inner {
        ScalarInner::Ident(name) => name.clone(),
        ScalarInner::Field(base, name) => format!("{}.{}", scalar(base), name),
        ScalarInner::Int(value) => value.to_string(),
        ScalarInner::Float(value) => format!("{value:?}"),
    }
}

fn binary_symbol(op: BinaryOp) -> &'static str {
    match op {
        BinaryOp::Pipe => "|>",
        BinaryOp::Or => "||",
        BinaryOp::And => "&&",
        BinaryOp::Less => "<",
        BinaryOp::LessEq => "<=",
        BinaryOp::Greater => ">",
        BinaryOp::GreaterEq => ">=",
        BinaryOp::Equal => "=",
        BinaryOp::NotEqual => "!=",
        BinaryOp::Add => "+",
        BinaryOp::Sub => "-",
        BinaryOp::Mul => "*",
        BinaryOp::Div => "/",
        BinaryOp::Rem => "%",
        BinaryOp::Shl => "<<",
        BinaryOp::Shr => ">>",
        BinaryOp::Rol => "<<<",
        BinaryOp::Ror => ">>>",
        BinaryOp::Cross => "><",
    }
}

pub fn expr(source: &str) -> String {
    match rake_syntax::parser::parse_expression(source) {
        Ok(expr) => sexpr(&expr),
        Err(e) => panic!("failed to parse {source:?}: {e}"),
    }
}

pub fn pred(source: &str) -> String {
    match rake_syntax::parser::parse_predicate(source) {
        Ok(pred) => predicate(&pred),
        Err(e) => panic!("failed to parse {source:?}: {e}"),
    }
}
