use enum_map::Enum;
use std::fmt::{self, Display, Formatter};

/// Maximum length of an operand name, not counting a terminator.
pub const MAX_NAME_LEN: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Enum)]
pub enum TokenKind {
    Operand,
    Positive,
    Negative,
    Add,
    Subtract,
    Multiply,
    Divide,
    Power,
    LeftBracket,
    RightBracket,
}

impl TokenKind {
    /// True for the unary/binary operator kinds the operator table knows about.
    pub fn is_operator(self) -> bool {
        !matches!(
            self,
            TokenKind::Operand | TokenKind::LeftBracket | TokenKind::RightBracket
        )
    }
}

/// A single lexical unit: an operator/bracket tag, or an operand carrying a name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    name: String,
}

impl Token {
    pub fn new(kind: TokenKind) -> Token {
        Token {
            kind,
            name: String::new(),
        }
    }

    pub fn operand(name: impl Into<String>) -> Token {
        Token {
            kind: TokenKind::Operand,
            name: name.into(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Appends `c` to this token's name. Fails without mutating if the
    /// name would exceed `MAX_NAME_LEN` characters.
    pub fn push_char(&mut self, c: char) -> Result<(), ()> {
        if self.name.chars().count() >= MAX_NAME_LEN {
            return Err(());
        }
        self.name.push(c);
        Ok(())
    }
}

impl Display for Token {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self.kind {
            TokenKind::Operand => write!(f, "{}", self.name),
            _ => write!(f, "{}", crate::expr::operator::lexeme(self.kind)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn caps_operand_name_at_ten_chars() {
        let mut tok = Token::new(TokenKind::Operand);
        for _ in 0..MAX_NAME_LEN {
            assert!(tok.push_char('a').is_ok());
        }
        assert_eq!(tok.name().len(), MAX_NAME_LEN);
        assert!(tok.push_char('a').is_err());
        assert_eq!(tok.name().len(), MAX_NAME_LEN);
    }

    #[test]
    fn displays_operand_by_name_and_operator_by_lexeme() {
        let mut operand = Token::new(TokenKind::Operand);
        operand.push_char('x').unwrap();
        assert_eq!(operand.to_string(), "x");
        assert_eq!(Token::new(TokenKind::Add).to_string(), "+");
    }
}
