//! Recursive-descent parser for cQASM 3.

use crate::ast::{
    AstStatement, ExprNode, GateNode, IndexEntry, ModifierNode, Program, RefNode,
};
use crate::error::{ParseError, ParseResult};
use crate::lexer::{tokenize, SpannedToken, Token};

/// Parse a cQASM 3 source string into an AST.
pub fn parse_ast(source: &str) -> ParseResult<Program> {
    let mut parser = Parser::new(source)?;
    parser.parse_program()
}

struct Parser {
    tokens: Vec<SpannedToken>,
    pos: usize,
}

impl Parser {
    fn new(source: &str) -> ParseResult<Self> {
        let mut tokens = Vec::new();
        for result in tokenize(source) {
            match result {
                Ok(token) => tokens.push(token),
                Err((span, message)) => {
                    return Err(ParseError::Lexer {
                        position: span.start,
                        message,
                    });
                }
            }
        }
        Ok(Self { tokens, pos: 0 })
    }

    fn is_eof(&self) -> bool {
        self.pos >= self.tokens.len()
    }

    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos).map(|t| &t.token)
    }

    fn advance(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.pos).map(|t| t.token.clone());
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    fn expect(&mut self, expected: &Token) -> ParseResult<Token> {
        let found = self
            .advance()
            .ok_or_else(|| ParseError::UnexpectedEof(expected.to_string()))?;
        if std::mem::discriminant(&found) != std::mem::discriminant(expected) {
            return Err(ParseError::UnexpectedToken {
                expected: expected.to_string(),
                found: found.to_string(),
            });
        }
        Ok(found)
    }

    fn check(&self, token: &Token) -> bool {
        self.peek()
            .is_some_and(|t| std::mem::discriminant(t) == std::mem::discriminant(token))
    }

    fn consume(&mut self, token: &Token) -> bool {
        if self.check(token) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn skip_newlines(&mut self) {
        while self.consume(&Token::Newline) {}
    }

    /// One or more statement separators, or end of input.
    fn expect_separator(&mut self) -> ParseResult<()> {
        if self.is_eof() {
            return Ok(());
        }
        self.expect(&Token::Newline)?;
        self.skip_newlines();
        Ok(())
    }

    fn parse_identifier(&mut self) -> ParseResult<String> {
        match self.advance() {
            Some(Token::Identifier(name)) => Ok(name),
            Some(other) => Err(ParseError::UnexpectedToken {
                expected: "identifier".into(),
                found: other.to_string(),
            }),
            None => Err(ParseError::UnexpectedEof("identifier".into())),
        }
    }

    fn parse_int(&mut self) -> ParseResult<usize> {
        match self.advance() {
            Some(Token::IntLiteral(value)) => Ok(value as usize),
            Some(other) => Err(ParseError::UnexpectedToken {
                expected: "integer".into(),
                found: other.to_string(),
            }),
            None => Err(ParseError::UnexpectedEof("integer".into())),
        }
    }

    fn parse_program(&mut self) -> ParseResult<Program> {
        self.skip_newlines();
        self.expect(&Token::Version)?;
        let version = match self.advance() {
            Some(Token::FloatLiteral(v)) => format!("{v:.1}"),
            Some(Token::IntLiteral(v)) => format!("{v}.0"),
            Some(other) => {
                return Err(ParseError::UnexpectedToken {
                    expected: "version number".into(),
                    found: other.to_string(),
                });
            }
            None => return Err(ParseError::UnexpectedEof("version number".into())),
        };
        self.expect_separator()?;

        let mut statements = Vec::new();
        while !self.is_eof() {
            statements.push(self.parse_statement()?);
            self.expect_separator()?;
        }

        Ok(Program {
            version,
            statements,
        })
    }

    fn parse_statement(&mut self) -> ParseResult<AstStatement> {
        let token = self
            .peek()
            .cloned()
            .ok_or_else(|| ParseError::UnexpectedEof("statement".into()))?;
        match token {
            Token::Qubit => self.parse_register_decl(true),
            Token::Bit => self.parse_register_decl(false),
            Token::Init => {
                self.advance();
                Ok(AstStatement::Init(self.parse_ref()?))
            }
            Token::Reset => {
                self.advance();
                Ok(AstStatement::Reset(self.parse_ref()?))
            }
            Token::Barrier => {
                self.advance();
                Ok(AstStatement::Barrier(self.parse_ref()?))
            }
            Token::Wait => self.parse_wait(),
            Token::Asm => self.parse_asm(),
            Token::Inv | Token::Pow => self.parse_gate(),
            Token::Identifier(_) => self.parse_identifier_statement(),
            other => Err(ParseError::UnexpectedToken {
                expected: "statement".into(),
                found: other.to_string(),
            }),
        }
    }

    fn parse_register_decl(&mut self, is_qubit: bool) -> ParseResult<AstStatement> {
        self.advance();
        let size = if self.consume(&Token::LBracket) {
            let size = self.parse_int()?;
            self.expect(&Token::RBracket)?;
            size
        } else {
            1
        };
        let name = self.parse_identifier()?;
        Ok(if is_qubit {
            AstStatement::QubitDecl { name, size }
        } else {
            AstStatement::BitDecl { name, size }
        })
    }

    fn parse_wait(&mut self) -> ParseResult<AstStatement> {
        self.expect(&Token::Wait)?;
        self.expect(&Token::LParen)?;
        let cycles = self.parse_expression()?;
        self.expect(&Token::RParen)?;
        let operand = self.parse_ref()?;
        Ok(AstStatement::Wait { operand, cycles })
    }

    fn parse_asm(&mut self) -> ParseResult<AstStatement> {
        self.expect(&Token::Asm)?;
        self.expect(&Token::LParen)?;
        let backend = self.parse_identifier()?;
        self.expect(&Token::RParen)?;
        let payload = match self.advance() {
            Some(Token::RawString(payload)) => payload,
            Some(other) => {
                return Err(ParseError::UnexpectedToken {
                    expected: "raw string payload".into(),
                    found: other.to_string(),
                });
            }
            None => return Err(ParseError::UnexpectedEof("raw string payload".into())),
        };
        Ok(AstStatement::Asm { backend, payload })
    }

    /// A statement opening with an identifier: either a measure
    /// assignment (`b = measure q`) or a gate application.
    fn parse_identifier_statement(&mut self) -> ParseResult<AstStatement> {
        let name = self.parse_identifier()?;

        let looks_like_lhs = self.check(&Token::LBracket) || self.check(&Token::Eq);
        if looks_like_lhs {
            let bits = self.parse_indices_for(name)?;
            self.expect(&Token::Eq)?;
            self.expect(&Token::Measure)?;
            let qubits = self.parse_ref()?;
            return Ok(AstStatement::Measure { bits, qubits });
        }

        self.parse_gate_with_name(name, vec![])
    }

    fn parse_gate(&mut self) -> ParseResult<AstStatement> {
        let mut modifiers = Vec::new();
        loop {
            if self.consume(&Token::Inv) {
                modifiers.push(ModifierNode::Inv);
                self.expect(&Token::Dot)?;
            } else if self.consume(&Token::Pow) {
                self.expect(&Token::LParen)?;
                let exponent = self.parse_expression()?;
                self.expect(&Token::RParen)?;
                modifiers.push(ModifierNode::Pow(exponent));
                self.expect(&Token::Dot)?;
            } else {
                break;
            }
        }
        let name = self.parse_identifier()?;
        self.parse_gate_with_name(name, modifiers)
    }

    fn parse_gate_with_name(
        &mut self,
        name: String,
        modifiers: Vec<ModifierNode>,
    ) -> ParseResult<AstStatement> {
        let mut params = Vec::new();
        if self.consume(&Token::LParen) {
            loop {
                params.push(self.parse_expression()?);
                if !self.consume(&Token::Comma) {
                    break;
                }
            }
            self.expect(&Token::RParen)?;
        }

        let mut operands = vec![self.parse_ref()?];
        while self.consume(&Token::Comma) {
            operands.push(self.parse_ref()?);
        }

        Ok(AstStatement::Gate(GateNode {
            name,
            modifiers,
            params,
            operands,
        }))
    }

    fn parse_ref(&mut self) -> ParseResult<RefNode> {
        let register = self.parse_identifier()?;
        self.parse_indices_for(register)
    }

    fn parse_indices_for(&mut self, register: String) -> ParseResult<RefNode> {
        if !self.consume(&Token::LBracket) {
            return Ok(RefNode::Register(register));
        }
        let mut indices = Vec::new();
        loop {
            let start = self.parse_int()?;
            if self.consume(&Token::Colon) {
                let end = self.parse_int()?;
                indices.push(IndexEntry::Range(start, end));
            } else {
                indices.push(IndexEntry::Single(start));
            }
            if !self.consume(&Token::Comma) {
                break;
            }
        }
        self.expect(&Token::RBracket)?;
        Ok(RefNode::Indexed { register, indices })
    }

    // Expressions: sum → product → unary → primary.

    fn parse_expression(&mut self) -> ParseResult<ExprNode> {
        let mut left = self.parse_product()?;
        loop {
            if self.consume(&Token::Plus) {
                let right = self.parse_product()?;
                left = ExprNode::Add(Box::new(left), Box::new(right));
            } else if self.consume(&Token::Minus) {
                let right = self.parse_product()?;
                left = ExprNode::Sub(Box::new(left), Box::new(right));
            } else {
                return Ok(left);
            }
        }
    }

    fn parse_product(&mut self) -> ParseResult<ExprNode> {
        let mut left = self.parse_unary()?;
        loop {
            if self.consume(&Token::Star) {
                let right = self.parse_unary()?;
                left = ExprNode::Mul(Box::new(left), Box::new(right));
            } else if self.consume(&Token::Slash) {
                let right = self.parse_unary()?;
                left = ExprNode::Div(Box::new(left), Box::new(right));
            } else {
                return Ok(left);
            }
        }
    }

    fn parse_unary(&mut self) -> ParseResult<ExprNode> {
        if self.consume(&Token::Minus) {
            let inner = self.parse_unary()?;
            return Ok(ExprNode::Neg(Box::new(inner)));
        }
        self.parse_primary()
    }

    fn parse_primary(&mut self) -> ParseResult<ExprNode> {
        match self.advance() {
            Some(Token::IntLiteral(value)) => Ok(ExprNode::Int(value as i64)),
            Some(Token::FloatLiteral(value)) => Ok(ExprNode::Float(value)),
            Some(Token::Pi) => Ok(ExprNode::Pi),
            Some(Token::Tau) => Ok(ExprNode::Tau),
            Some(Token::LParen) => {
                let inner = self.parse_expression()?;
                self.expect(&Token::RParen)?;
                Ok(inner)
            }
            Some(other) => Err(ParseError::UnexpectedToken {
                expected: "expression".into(),
                found: other.to_string(),
            }),
            None => Err(ParseError::UnexpectedEof("expression".into())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_minimal_program() {
        let program = parse_ast("version 3.0\n\nqubit[2] q\n\nH q[0]\n").unwrap();
        assert_eq!(program.version, "3.0");
        assert_eq!(program.statements.len(), 2);
        assert_eq!(
            program.statements[0],
            AstStatement::QubitDecl {
                name: "q".into(),
                size: 2
            }
        );
    }

    #[test]
    fn test_parse_measure_assignment() {
        let program = parse_ast("version 3.0\nqubit[2] q\nbit[2] b\nb[0] = measure q[1]\n").unwrap();
        let AstStatement::Measure { bits, qubits } = &program.statements[2] else {
            panic!("expected measure, got {:?}", program.statements[2]);
        };
        assert_eq!(bits.register(), "b");
        assert_eq!(qubits.register(), "q");
    }

    #[test]
    fn test_parse_whole_register_measure() {
        let program = parse_ast("version 3.0\nqubit[2] q\nbit[2] b\nb = measure q\n").unwrap();
        assert!(matches!(
            &program.statements[2],
            AstStatement::Measure {
                bits: RefNode::Register(_),
                ..
            }
        ));
    }

    #[test]
    fn test_parse_sgmq_indices() {
        let program = parse_ast("version 3.0\nqubit[4] q\nX q[0, 2]\nY q[1:3]\n").unwrap();
        let AstStatement::Gate(gate) = &program.statements[1] else {
            panic!();
        };
        assert_eq!(
            gate.operands[0],
            RefNode::Indexed {
                register: "q".into(),
                indices: vec![IndexEntry::Single(0), IndexEntry::Single(2)],
            }
        );
        let AstStatement::Gate(gate) = &program.statements[2] else {
            panic!();
        };
        assert_eq!(
            gate.operands[0],
            RefNode::Indexed {
                register: "q".into(),
                indices: vec![IndexEntry::Range(1, 3)],
            }
        );
    }

    #[test]
    fn test_parse_modifiers() {
        let program = parse_ast("version 3.0\nqubit q\ninv.pow(2).S q[0]\n").unwrap();
        let AstStatement::Gate(gate) = &program.statements[1] else {
            panic!();
        };
        assert_eq!(gate.name, "S");
        assert_eq!(gate.modifiers.len(), 2);
        assert_eq!(gate.modifiers[0], ModifierNode::Inv);
        assert!(matches!(gate.modifiers[1], ModifierNode::Pow(_)));
    }

    #[test]
    fn test_parse_wait_and_asm() {
        let program =
            parse_ast("version 3.0\nqubit[2] q\nwait(3) q[0]\nasm(Backend) '''payload'''\n")
                .unwrap();
        assert!(matches!(program.statements[1], AstStatement::Wait { .. }));
        assert_eq!(
            program.statements[2],
            AstStatement::Asm {
                backend: "Backend".into(),
                payload: "payload".into()
            }
        );
    }

    #[test]
    fn test_parse_expression_precedence() {
        let program = parse_ast("version 3.0\nqubit q\nRz(pi/2 + 1 * 2) q[0]\n").unwrap();
        let AstStatement::Gate(gate) = &program.statements[1] else {
            panic!();
        };
        let value = gate.params[0].evaluate().unwrap();
        assert!((value - (std::f64::consts::PI / 2.0 + 2.0)).abs() < 1e-12);
    }

    #[test]
    fn test_missing_version_is_an_error() {
        assert!(matches!(
            parse_ast("qubit[2] q\n"),
            Err(ParseError::UnexpectedToken { .. })
        ));
    }

    #[test]
    fn test_semicolon_separated_source() {
        let program = parse_ast("version 3.0; qubit[2] q; H q[0]; CNOT q[0], q[1]").unwrap();
        assert_eq!(program.statements.len(), 3);
    }
}
