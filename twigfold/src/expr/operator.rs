use crate::expr::token::TokenKind;
use enum_map::{enum_map, EnumMap};
use std::sync::OnceLock;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrecedenceClass {
    Unary,
    Additive,
    Multiplicative,
    Exponent,
}

#[derive(Debug, Clone, Copy)]
pub struct OperatorInfo {
    pub arity: usize,
    pub lexeme: &'static str,
    pub associative: bool,
    pub precedence: PrecedenceClass,
}

fn table() -> &'static EnumMap<TokenKind, Option<OperatorInfo>> {
    static TABLE: OnceLock<EnumMap<TokenKind, Option<OperatorInfo>>> = OnceLock::new();
    TABLE.get_or_init(|| {
        use PrecedenceClass::*;
        use TokenKind::*;
        enum_map! {
            Positive => Some(OperatorInfo { arity: 1, lexeme: "+", associative: false, precedence: Unary }),
            Negative => Some(OperatorInfo { arity: 1, lexeme: "-", associative: false, precedence: Unary }),
            Add => Some(OperatorInfo { arity: 2, lexeme: "+", associative: true, precedence: Additive }),
            Subtract => Some(OperatorInfo { arity: 2, lexeme: "-", associative: false, precedence: Additive }),
            Multiply => Some(OperatorInfo { arity: 2, lexeme: "*", associative: true, precedence: Multiplicative }),
            Divide => Some(OperatorInfo { arity: 2, lexeme: "/", associative: false, precedence: Multiplicative }),
            Power => Some(OperatorInfo { arity: 2, lexeme: "^", associative: false, precedence: Exponent }),
            Operand => None,
            LeftBracket => None,
            RightBracket => None,
        }
    })
}

/// Static metadata for an operator kind. Panics if `kind` is not an operator
/// (`Operand`/bracket kinds never reach this query — see `compare`).
pub fn info(kind: TokenKind) -> OperatorInfo {
    table()[kind].expect("info() called on a non-operator token kind")
}

pub fn lexeme(kind: TokenKind) -> &'static str {
    match kind {
        TokenKind::Operand => "",
        TokenKind::LeftBracket => "(",
        TokenKind::RightBracket => ")",
        other => info(other).lexeme,
    }
}

pub fn is_associative(kind: TokenKind) -> bool {
    info(kind).associative
}

/// Total ordering between two real operator kinds. Never called with a
/// bracket or operand kind — the parser handles those in its own control
/// flow (spec §4.1: "brackets are incomparable ... the parser never asks").
pub fn compare(a: TokenKind, b: TokenKind) -> std::cmp::Ordering {
    use std::cmp::Ordering::*;
    use PrecedenceClass::*;
    let (pa, pb) = (info(a).precedence, info(b).precedence);
    match (pa, pb) {
        (Unary, Unary) => Equal,
        (Unary, Additive) => Greater,
        (Additive, Unary) => Less,
        (Unary, _) => Less,
        (_, Unary) => Greater,
        (Additive, Additive) => Equal,
        (Additive, _) => Less,
        (_, Additive) => Greater,
        (Multiplicative, Multiplicative) => Equal,
        (Multiplicative, Power) => Less,
        (Power, Multiplicative) => Greater,
        (Power, Power) => Equal,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cmp::Ordering;
    use TokenKind::*;

    #[test]
    fn unary_binds_tighter_than_additive_but_looser_than_multiplicative() {
        assert_eq!(compare(Positive, Add), Ordering::Greater);
        assert_eq!(compare(Positive, Multiply), Ordering::Less);
        assert_eq!(compare(Negative, Positive), Ordering::Equal);
    }

    #[test]
    fn same_class_operators_compare_equal() {
        assert_eq!(compare(Add, Subtract), Ordering::Equal);
        assert_eq!(compare(Multiply, Divide), Ordering::Equal);
        assert_eq!(compare(Power, Power), Ordering::Equal);
    }

    #[test]
    fn power_outranks_multiplicative_which_outranks_additive() {
        assert_eq!(compare(Power, Multiply), Ordering::Greater);
        assert_eq!(compare(Multiply, Add), Ordering::Greater);
        assert_eq!(compare(Add, Power), Ordering::Less);
    }

    #[test]
    fn only_add_and_multiply_are_associative() {
        assert!(is_associative(Add));
        assert!(is_associative(Multiply));
        assert!(!is_associative(Subtract));
        assert!(!is_associative(Divide));
        assert!(!is_associative(Power));
        assert!(!is_associative(Positive));
        assert!(!is_associative(Negative));
    }

    #[test]
    #[should_panic]
    fn info_panics_on_non_operator_kind() {
        let _ = info(Operand);
    }
}
