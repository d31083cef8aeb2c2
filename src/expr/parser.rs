//! Recursive-descent parser producing the expression tree.

use super::error::ExprError;
use super::lexer::Token;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum UnaryOp {
    Neg,
    Not,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Rem,
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
    And,
    Or,
}

impl BinaryOp {
    pub(crate) fn symbol(self) -> &'static str {
        match self {
            Self::Add => "+",
            Self::Sub => "-",
            Self::Mul => "*",
            Self::Div => "/",
            Self::Rem => "%",
            Self::Eq => "==",
            Self::Ne => "!=",
            Self::Lt => "<",
            Self::Le => "<=",
            Self::Gt => ">",
            Self::Ge => ">=",
            Self::And => "and",
            Self::Or => "or",
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub(crate) enum Ast {
    Literal(super::Value),
    Var(String),
    Unary(UnaryOp, Box<Ast>),
    Binary(BinaryOp, Box<Ast>, Box<Ast>),
}

#[derive(Clone, Debug, PartialEq)]
pub(crate) enum Statement {
    Assign(String, Ast),
    Eval(Ast),
}

/// Deepest tree the parser will build, counting parentheses, prefix
/// operators and operator chains.
pub(crate) const MAX_DEPTH: usize = 64;

pub(crate) struct Parser {
    tokens: Vec<Token>,
    pos: usize,
    depth: usize,
}

impl Parser {
    pub(crate) fn new(tokens: Vec<Token>) -> Self {
        Self {
            tokens,
            pos: 0,
            depth: 0,
        }
    }

    /// Parse a single expression that must consume every token.
    pub(crate) fn parse_expression(mut self) -> Result<Ast, ExprError> {
        if self.tokens.is_empty() {
            return Err(ExprError::Empty);
        }
        let ast = self.or_expr()?;
        self.expect_end()?;
        Ok(ast)
    }

    /// Parse `;`-separated statements. Empty statements are skipped.
    pub(crate) fn parse_script(mut self) -> Result<Vec<Statement>, ExprError> {
        let mut statements = Vec::new();
        while self.peek().is_some() {
            if self.eat(&Token::Semicolon) {
                continue;
            }
            statements.push(self.statement()?);
            match self.peek() {
                None => break,
                Some(Token::Semicolon) => self.pos += 1,
                Some(other) => {
                    return Err(ExprError::UnexpectedToken {
                        found: other.to_string(),
                        expected: "';' or end of script".to_string(),
                    })
                }
            }
        }
        if statements.is_empty() {
            return Err(ExprError::Empty);
        }
        Ok(statements)
    }

    fn statement(&mut self) -> Result<Statement, ExprError> {
        if let (Some(Token::Ident(name)), Some(Token::Assign)) =
            (self.tokens.get(self.pos), self.tokens.get(self.pos + 1))
        {
            let name = name.clone();
            self.pos += 2;
            return Ok(Statement::Assign(name, self.or_expr()?));
        }
        Ok(Statement::Eval(self.or_expr()?))
    }

    fn or_expr(&mut self) -> Result<Ast, ExprError> {
        let base = self.depth;
        let mut lhs = self.and_expr()?;
        while self.eat(&Token::Or) {
            self.descend()?;
            let rhs = self.and_expr()?;
            lhs = Ast::Binary(BinaryOp::Or, Box::new(lhs), Box::new(rhs));
        }
        self.depth = base;
        Ok(lhs)
    }

    fn and_expr(&mut self) -> Result<Ast, ExprError> {
        let base = self.depth;
        let mut lhs = self.not_expr()?;
        while self.eat(&Token::And) {
            self.descend()?;
            let rhs = self.not_expr()?;
            lhs = Ast::Binary(BinaryOp::And, Box::new(lhs), Box::new(rhs));
        }
        self.depth = base;
        Ok(lhs)
    }

    fn not_expr(&mut self) -> Result<Ast, ExprError> {
        if self.eat(&Token::Not) {
            self.descend()?;
            let operand = self.not_expr()?;
            self.depth -= 1;
            return Ok(Ast::Unary(UnaryOp::Not, Box::new(operand)));
        }
        self.comparison()
    }

    // Comparisons do not chain: `a < b < c` is rejected.
    fn comparison(&mut self) -> Result<Ast, ExprError> {
        let lhs = self.sum()?;
        let op = match self.peek() {
            Some(Token::EqEq) => BinaryOp::Eq,
            Some(Token::NotEq) => BinaryOp::Ne,
            Some(Token::Lt) => BinaryOp::Lt,
            Some(Token::Le) => BinaryOp::Le,
            Some(Token::Gt) => BinaryOp::Gt,
            Some(Token::Ge) => BinaryOp::Ge,
            _ => return Ok(lhs),
        };
        self.pos += 1;
        let rhs = self.sum()?;
        Ok(Ast::Binary(op, Box::new(lhs), Box::new(rhs)))
    }

    fn sum(&mut self) -> Result<Ast, ExprError> {
        let base = self.depth;
        let mut lhs = self.term()?;
        loop {
            let op = match self.peek() {
                Some(Token::Plus) => BinaryOp::Add,
                Some(Token::Minus) => BinaryOp::Sub,
                _ => {
                    self.depth = base;
                    return Ok(lhs);
                }
            };
            self.pos += 1;
            self.descend()?;
            let rhs = self.term()?;
            lhs = Ast::Binary(op, Box::new(lhs), Box::new(rhs));
        }
    }

    fn term(&mut self) -> Result<Ast, ExprError> {
        let base = self.depth;
        let mut lhs = self.unary()?;
        loop {
            let op = match self.peek() {
                Some(Token::Star) => BinaryOp::Mul,
                Some(Token::Slash) => BinaryOp::Div,
                Some(Token::Percent) => BinaryOp::Rem,
                _ => {
                    self.depth = base;
                    return Ok(lhs);
                }
            };
            self.pos += 1;
            self.descend()?;
            let rhs = self.unary()?;
            lhs = Ast::Binary(op, Box::new(lhs), Box::new(rhs));
        }
    }

    fn unary(&mut self) -> Result<Ast, ExprError> {
        if self.eat(&Token::Minus) {
            self.descend()?;
            let operand = self.unary()?;
            self.depth -= 1;
            return Ok(Ast::Unary(UnaryOp::Neg, Box::new(operand)));
        }
        self.primary()
    }

    fn primary(&mut self) -> Result<Ast, ExprError> {
        let token = self.tokens.get(self.pos).cloned().ok_or(ExprError::UnexpectedEnd {
            expected: "a value".to_string(),
        })?;
        self.pos += 1;

        match token {
            Token::Int(i) => Ok(Ast::Literal(super::Value::Int(i))),
            Token::Float(x) => Ok(Ast::Literal(super::Value::Float(x))),
            Token::Bool(b) => Ok(Ast::Literal(super::Value::Bool(b))),
            Token::Ident(name) => Ok(Ast::Var(name)),
            Token::LParen => {
                self.descend()?;
                let inner = self.or_expr()?;
                if !self.eat(&Token::RParen) {
                    return Err(self.unexpected("')'"));
                }
                self.depth -= 1;
                Ok(inner)
            }
            other => Err(ExprError::UnexpectedToken {
                found: other.to_string(),
                expected: "a value".to_string(),
            }),
        }
    }

    fn descend(&mut self) -> Result<(), ExprError> {
        self.depth += 1;
        if self.depth > MAX_DEPTH {
            return Err(ExprError::TooDeep { limit: MAX_DEPTH });
        }
        Ok(())
    }

    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn eat(&mut self, token: &Token) -> bool {
        if self.peek() == Some(token) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn expect_end(&self) -> Result<(), ExprError> {
        match self.peek() {
            None => Ok(()),
            Some(_) => Err(self.unexpected("end of expression")),
        }
    }

    fn unexpected(&self, expected: &str) -> ExprError {
        match self.peek() {
            Some(found) => ExprError::UnexpectedToken {
                found: found.to_string(),
                expected: expected.to_string(),
            },
            None => ExprError::UnexpectedEnd {
                expected: expected.to_string(),
            },
        }
    }
}
