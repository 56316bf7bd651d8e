use crate::ir::ast::{BinaryOp, CompareOp, ReduceOp, ScanOp, UnaryOp};

use super::lexer::TokenKind;

// Binary precedence levels, loosest first. All levels are left-associative.
pub const PIPE: u8 = 1;
pub const OR: u8 = 2;
pub const AND: u8 = 3;
pub const COMPARE: u8 = 4;
pub const ADDITIVE: u8 = 5;
pub const MULTIPLICATIVE: u8 = 6;
pub const SHIFT: u8 = 7;
pub const CROSS: u8 = 8;

pub fn binary_precedence(token: TokenKind) -> Option<u8> {
    match token {
        TokenKind::PipeForward => Some(PIPE),
        TokenKind::PipePipe | TokenKind::Or => Some(OR),
        TokenKind::AmpAmp | TokenKind::And => Some(AND),
        TokenKind::Less
        | TokenKind::LessEq
        | TokenKind::Greater
        | TokenKind::GreaterEq
        | TokenKind::Equal
        | TokenKind::NotEqual => Some(COMPARE),
        TokenKind::Plus | TokenKind::Minus => Some(ADDITIVE),
        TokenKind::Star | TokenKind::Slash | TokenKind::Percent => Some(MULTIPLICATIVE),
        TokenKind::Shl | TokenKind::Shr | TokenKind::Rol | TokenKind::Ror => Some(SHIFT),
        TokenKind::Cross => Some(CROSS),
        _ => None,
    }
}

pub fn token_to_binop(token: TokenKind) -> Option<BinaryOp> {
    match token {
        TokenKind::PipeForward => Some(BinaryOp::Pipe),
        TokenKind::PipePipe | TokenKind::Or => Some(BinaryOp::Or),
        TokenKind::AmpAmp | TokenKind::And => Some(BinaryOp::And),
        TokenKind::Less => Some(BinaryOp::Less),
        TokenKind::LessEq => Some(BinaryOp::LessEq),
        TokenKind::Greater => Some(BinaryOp::Greater),
        TokenKind::GreaterEq => Some(BinaryOp::GreaterEq),
        TokenKind::Equal => Some(BinaryOp::Equal),
        TokenKind::NotEqual => Some(BinaryOp::NotEqual),
        TokenKind::Plus => Some(BinaryOp::Add),
        TokenKind::Minus => Some(BinaryOp::Sub),
        TokenKind::Star => Some(BinaryOp::Mul),
        TokenKind::Slash => Some(BinaryOp::Div),
        TokenKind::Percent => Some(BinaryOp::Rem),
        TokenKind::Shl => Some(BinaryOp::Shl),
        TokenKind::Shr => Some(BinaryOp::Shr),
        TokenKind::Rol => Some(BinaryOp::Rol),
        TokenKind::Ror => Some(BinaryOp::Ror),
        TokenKind::Cross => Some(BinaryOp::Cross),
        _ => None,
    }
}

pub fn token_to_unop(token: TokenKind) -> Option<UnaryOp> {
    match token {
        TokenKind::Minus => Some(UnaryOp::Neg),
        TokenKind::Bang | TokenKind::Not => Some(UnaryOp::Not),
        _ => None,
    }
}

/// Comparison operators of the predicate layer, except `is` / `is not`
/// which span two tokens and are handled by the caller.
pub fn token_to_compare(token: TokenKind) -> Option<CompareOp> {
    match token {
        TokenKind::Less => Some(CompareOp::Less),
        TokenKind::LessEq => Some(CompareOp::LessEq),
        TokenKind::Greater => Some(CompareOp::Greater),
        TokenKind::GreaterEq => Some(CompareOp::GreaterEq),
        TokenKind::Equal => Some(CompareOp::Equal),
        TokenKind::NotEqual => Some(CompareOp::NotEqual),
        _ => None,
    }
}

pub fn token_to_reduce(token: TokenKind) -> Option<ReduceOp> {
    match token {
        TokenKind::ReduceAdd => Some(ReduceOp::Add),
        TokenKind::ReduceMul => Some(ReduceOp::Mul),
        TokenKind::ReduceMin => Some(ReduceOp::Min),
        TokenKind::ReduceMax => Some(ReduceOp::Max),
        TokenKind::ReduceOr => Some(ReduceOp::Or),
        TokenKind::ReduceAnd => Some(ReduceOp::And),
        _ => None,
    }
}

pub fn token_to_scan(token: TokenKind) -> Option<ScanOp> {
    match token {
        TokenKind::ScanAdd => Some(ScanOp::Add),
        TokenKind::ScanMul => Some(ScanOp::Mul),
        TokenKind::ScanMin => Some(ScanOp::Min),
        TokenKind::ScanMax => Some(ScanOp::Max),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_ranked_token_maps_to_an_operator() {
        let ranked = [
            TokenKind::PipeForward,
            TokenKind::PipePipe,
            TokenKind::Or,
            TokenKind::AmpAmp,
            TokenKind::And,
            TokenKind::Less,
            TokenKind::LessEq,
            TokenKind::Greater,
            TokenKind::GreaterEq,
            TokenKind::Equal,
            TokenKind::NotEqual,
            TokenKind::Plus,
            TokenKind::Minus,
            TokenKind::Star,
            TokenKind::Slash,
            TokenKind::Percent,
            TokenKind::Shl,
            TokenKind::Shr,
            TokenKind::Rol,
            TokenKind::Ror,
            TokenKind::Cross,
        ];
        for token in ranked {
            assert!(binary_precedence(token).is_some(), "{token:?}");
            assert!(token_to_binop(token).is_some(), "{token:?}");
        }
    }

    #[test]
    fn arithmetic_levels_sit_above_comparison() {
        assert!(ADDITIVE > COMPARE);
        assert!(CROSS > SHIFT && SHIFT > MULTIPLICATIVE && MULTIPLICATIVE > ADDITIVE);
    }
}
