use crate::ir::ast::{CompoundType, LaneType, PrimitiveType, Type, TypeKind};

use super::lexer::TokenKind;
use super::parser::{PResult, Parser};

impl Parser {
    pub fn parse_type(&mut self) -> PResult<Type> {
        let start = self.cursor.peek().span;
        let kind = match self.peek_kind() {
            TokenKind::Ident => self.parse_named_type()?,
            TokenKind::TypeIdent => {
                let (name, _) = self.expect_type_ident()?;
                match self.peek_kind() {
                    TokenKind::Stack => {
                        self.cursor.advance();
                        TypeKind::Stack(name)
                    }
                    TokenKind::Single => {
                        self.cursor.advance();
                        TypeKind::Single(name)
                    }
                    TokenKind::Ident if self.cursor.peek().lexeme == "pack" => {
                        self.cursor.advance();
                        TypeKind::Pack(name)
                    }
                    _ => return Err(self.unexpected(&["`stack`", "`single`", "`pack`"])),
                }
            }
            TokenKind::LParen => self.parse_paren_type()?,
            _ => return Err(self.unexpected(&["type"])),
        };
        Ok(Type {
            kind,
            span: self.span_from(start),
        })
    }

    /// float, float rack, vec3, vec3 rack, mask
    fn parse_named_type(&mut self) -> PResult<TypeKind> {
        let name = self.cursor.peek().lexeme.clone();
        let lane = if let Some(primitive) = PrimitiveType::from_name(&name) {
            LaneType::Primitive(primitive)
        } else if let Some(compound) = CompoundType::from_name(&name) {
            LaneType::Compound(compound)
        } else if name == "mask" {
            self.cursor.advance();
            return Ok(TypeKind::Mask);
        } else {
            return Err(self.unexpected(&["type"]));
        };
        self.cursor.advance();

        if self.check(TokenKind::Ident) && self.cursor.peek().lexeme == "rack" {
            self.cursor.advance();
            return Ok(TypeKind::Rack(lane));
        }
        Ok(match lane {
            LaneType::Primitive(primitive) => TypeKind::Primitive(primitive),
            LaneType::Compound(compound) => TypeKind::Compound(compound),
        })
    }

    /// (), () -> t, (t, ...), (t, ...) -> t
    fn parse_paren_type(&mut self) -> PResult<TypeKind> {
        self.cursor.advance(); // consume '('
        let elements = self.comma_separated(TokenKind::RParen, |p| p.parse_type())?;
        self.expect(TokenKind::RParen)?;

        if self.eat(TokenKind::Arrow) {
            let ret = self.parse_type()?;
            return Ok(TypeKind::Function {
                params: elements,
                ret: Box::new(ret),
            });
        }
        if elements.is_empty() {
            Ok(TypeKind::Unit)
        } else {
            Ok(TypeKind::Tuple(elements))
        }
    }
}
