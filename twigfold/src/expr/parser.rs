use crate::expr::diagnostics::{Diagnostic, ParseErrorKind};
use crate::expr::operator;
use crate::expr::reader::Reader;
use crate::expr::token::{Token, TokenKind};
use crate::expr::tree::TreeNode;
use std::cmp::Ordering;

const SUBSYSTEM: &str = "ExpParser";

/// The parser's control state (spec §4.2). `Error` has no outgoing
/// transitions and is never actually stored: the first malformed-input
/// condition returns a `Diagnostic` straight out of `parse` instead of
/// looping through an `Error` value, which comes to the same thing since
/// nothing can recover from it either way.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DfaState {
    Start,
    AfterOperator,
    AfterOperand,
    Error,
    Complete,
}

/// The shunting-yard-style DFA described in spec §4.2. Consumes a `Reader`
/// one character at a time, builds one `TreeNode` per top-level expression
/// (expressions are comma-separated), and leaves both stacks empty on
/// success. Mirrors the shape of `dts/expression/parser.rs`'s `Parser`:
/// one assembly token, two stacks, a list of finished results.
pub struct Parser {
    assembly: Token,
    operator_stack: Vec<Token>,
    operand_stack: Vec<TreeNode>,
    finished: Vec<TreeNode>,
    state: DfaState,
}

impl Default for Parser {
    fn default() -> Parser {
        Parser::new()
    }
}

impl Parser {
    pub fn new() -> Parser {
        Parser {
            assembly: Token::new(TokenKind::Operand),
            operator_stack: Vec::new(),
            operand_stack: Vec::new(),
            finished: Vec::new(),
            state: DfaState::Start,
        }
    }

    /// Runs the DFA to completion, consuming `reader` until it reports
    /// EOF. Returns `Ok(())` once the state reaches `Complete`, leaving
    /// every finished expression tree in `self.finished()`. Returns the
    /// first malformed-input `Diagnostic` otherwise; everything built so
    /// far is simply dropped with `self`.
    pub fn parse(&mut self, reader: &mut impl Reader) -> Result<(), Diagnostic> {
        loop {
            self.state = match self.state {
                DfaState::Start => self.step_start(reader)?,
                DfaState::AfterOperator => self.step_after_operator(reader)?,
                DfaState::AfterOperand => self.step_after_operand(reader)?,
                DfaState::Complete => return Ok(()),
                DfaState::Error => unreachable!("Error state has no entry point"),
            };
        }
    }

    pub fn assembly_token(&self) -> &Token {
        &self.assembly
    }

    pub fn operator_stack(&self) -> &[Token] {
        &self.operator_stack
    }

    pub fn operand_stack(&self) -> &[TreeNode] {
        &self.operand_stack
    }

    pub fn finished(&self) -> &[TreeNode] {
        &self.finished
    }

    pub fn take_finished(self) -> Vec<TreeNode> {
        self.finished
    }

    fn fail(&self, kind: ParseErrorKind) -> Diagnostic {
        Diagnostic::new(SUBSYSTEM, kind)
    }

    fn step_start(&mut self, reader: &mut impl Reader) -> Result<DfaState, Diagnostic> {
        match reader.consume() {
            None | Some('\n') => Err(self.fail(ParseErrorKind::NoInput)),
            Some(' ') => Ok(DfaState::Start),
            Some(',') => Ok(DfaState::Start),
            Some('+') => {
                self.assembly.kind = TokenKind::Positive;
                Ok(DfaState::AfterOperator)
            }
            Some('-') => {
                self.assembly.kind = TokenKind::Negative;
                Ok(DfaState::AfterOperator)
            }
            Some('*') | Some('/') | Some('^') => {
                Err(self.fail(ParseErrorKind::InvalidOperatorSequence))
            }
            Some('(') | Some('[') | Some('{') => {
                self.assembly.kind = TokenKind::LeftBracket;
                Ok(DfaState::AfterOperator)
            }
            Some(')') | Some(']') | Some('}') => {
                Err(self.fail(ParseErrorKind::UnmatchedRightBracket))
            }
            Some(c) => {
                self.assembly.kind = TokenKind::Operand;
                self.assembly
                    .push_char(c)
                    .map_err(|()| self.fail(ParseErrorKind::NameTooLong))?;
                Ok(DfaState::AfterOperand)
            }
        }
    }

    fn step_after_operator(&mut self, reader: &mut impl Reader) -> Result<DfaState, Diagnostic> {
        match reader.consume() {
            None | Some('\n') => Err(self.fail(ParseErrorKind::TrailingOperator)),
            Some(' ') => Ok(DfaState::AfterOperator),
            Some('+') => {
                self.emit()?;
                self.assembly.kind = TokenKind::Positive;
                Ok(DfaState::AfterOperator)
            }
            Some('-') => {
                self.emit()?;
                self.assembly.kind = TokenKind::Negative;
                Ok(DfaState::AfterOperator)
            }
            Some('*') | Some('/') | Some('^') => {
                Err(self.fail(ParseErrorKind::InvalidOperatorSequence))
            }
            Some('(') | Some('[') | Some('{') => {
                self.emit()?;
                self.assembly.kind = TokenKind::LeftBracket;
                Ok(DfaState::AfterOperator)
            }
            Some(')') | Some(']') | Some('}') => {
                self.emit()?;
                self.assembly.kind = TokenKind::RightBracket;
                Ok(DfaState::AfterOperand)
            }
            Some(c) => {
                self.emit()?;
                self.assembly.kind = TokenKind::Operand;
                self.assembly
                    .push_char(c)
                    .map_err(|()| self.fail(ParseErrorKind::NameTooLong))?;
                Ok(DfaState::AfterOperand)
            }
        }
    }

    fn step_after_operand(&mut self, reader: &mut impl Reader) -> Result<DfaState, Diagnostic> {
        match reader.consume() {
            None | Some('\n') => {
                self.emit()?;
                self.finalize()?;
                Ok(DfaState::Complete)
            }
            Some(' ') => Ok(DfaState::AfterOperand),
            Some(',') => {
                self.emit()?;
                self.finalize()?;
                Ok(DfaState::Start)
            }
            Some('+') => {
                self.emit()?;
                self.assembly.kind = TokenKind::Add;
                Ok(DfaState::AfterOperator)
            }
            Some('-') => {
                self.emit()?;
                self.assembly.kind = TokenKind::Subtract;
                Ok(DfaState::AfterOperator)
            }
            Some('*') => {
                self.emit()?;
                self.assembly.kind = TokenKind::Multiply;
                Ok(DfaState::AfterOperator)
            }
            Some('/') => {
                self.emit()?;
                self.assembly.kind = TokenKind::Divide;
                Ok(DfaState::AfterOperator)
            }
            Some('^') => {
                self.emit()?;
                self.assembly.kind = TokenKind::Power;
                Ok(DfaState::AfterOperator)
            }
            Some('(') | Some('[') | Some('{') => {
                Err(self.fail(ParseErrorKind::MissingOperatorBeforeBracket))
            }
            Some(')') | Some(']') | Some('}') => {
                self.emit()?;
                self.assembly.kind = TokenKind::RightBracket;
                Ok(DfaState::AfterOperand)
            }
            Some(c) => {
                self.assembly
                    .push_char(c)
                    .map_err(|()| self.fail(ParseErrorKind::NameTooLong))?;
                Ok(DfaState::AfterOperand)
            }
        }
    }

    /// Pushes the current assembly token onto one of the stacks (or
    /// through a reduce chain), then resets `self.assembly` to a fresh
    /// blank token. Every DFA transition that starts building a *new*
    /// token first emits the one that was pending (spec §4.2.1).
    fn emit(&mut self) -> Result<(), Diagnostic> {
        let tok = std::mem::replace(&mut self.assembly, Token::new(TokenKind::Operand));
        match tok.kind {
            TokenKind::Operand => {
                self.operand_stack.push(TreeNode::leaf(tok));
            }
            TokenKind::LeftBracket => {
                self.operator_stack.push(tok);
            }
            TokenKind::RightBracket => loop {
                match self.operator_stack.last() {
                    Some(top) if top.kind == TokenKind::LeftBracket => {
                        self.operator_stack.pop();
                        break;
                    }
                    Some(_) => self.reduce()?,
                    None => return Err(self.fail(ParseErrorKind::MissingLeftBracket)),
                }
            },
            op => {
                while let Some(top) = self.operator_stack.last() {
                    if top.kind == TokenKind::LeftBracket {
                        break;
                    }
                    if operator::compare(op, top.kind) != Ordering::Greater {
                        self.reduce()?;
                    } else {
                        break;
                    }
                }
                self.operator_stack.push(tok);
            }
        }
        Ok(())
    }

    /// Pops the top operator and as many operands as its arity demands,
    /// and pushes the resulting subtree back onto the operand stack
    /// (spec §4.2.2). Operands are popped right-to-left, so they are
    /// reassembled into the original left-to-right child order.
    fn reduce(&mut self) -> Result<(), Diagnostic> {
        let op = self
            .operator_stack
            .pop()
            .ok_or_else(|| self.fail(ParseErrorKind::MissingOperands))?;
        let arity = operator::info(op.kind).arity;
        let mut children = Vec::with_capacity(arity);
        for _ in 0..arity {
            let child = self
                .operand_stack
                .pop()
                .ok_or_else(|| self.fail(ParseErrorKind::MissingOperands))?;
            children.push(child);
        }
        children.reverse();
        self.operand_stack.push(TreeNode::new(op, children));
        Ok(())
    }

    /// Closes out the expression just finished (spec §4.2.3). Nothing
    /// reduces a trailing run of operators until something forces it —
    /// the usual trigger is a lower-or-equal-precedence operator arriving
    /// later, which never happens for the last operator in an expression —
    /// so finalize drains the operator stack the rest of the way down
    /// before checking its precondition. Anything left after draining can
    /// only be an unmatched `LeftBracket` fence, which `reduce` can't pop.
    fn finalize(&mut self) -> Result<(), Diagnostic> {
        while let Some(top) = self.operator_stack.last() {
            if top.kind == TokenKind::LeftBracket {
                break;
            }
            self.reduce()?;
        }
        if !self.operator_stack.is_empty() {
            return Err(self.fail(ParseErrorKind::TokensRemainOnOperatorStack));
        }
        match self.operand_stack.len() {
            0 => Err(self.fail(ParseErrorKind::NoExpressionTrees)),
            1 => {
                let tree = self.operand_stack.pop().expect("checked len == 1");
                self.finished.push(tree);
                self.assembly = Token::new(TokenKind::Operand);
                Ok(())
            }
            _ => Err(self.fail(ParseErrorKind::UnconsolidatedExpressionTrees)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expr::reader::SliceReader;
    use assert_matches::assert_matches;

    fn parse(input: &str) -> Result<Vec<TreeNode>, Diagnostic> {
        let mut parser = Parser::new();
        let mut reader = SliceReader::new(input);
        parser.parse(&mut reader)?;
        Ok(parser.take_finished())
    }

    #[test]
    fn parses_a_single_operand() {
        let trees = parse("abc").unwrap();
        assert_eq!(trees.len(), 1);
        assert!(trees[0].is_leaf());
        assert_eq!(trees[0].token().name(), "abc");
    }

    #[test]
    fn multiplication_binds_tighter_than_addition() {
        let trees = parse("a+b*c").unwrap();
        assert_eq!(trees.len(), 1);
        let root = &trees[0];
        assert_eq!(root.token().kind, TokenKind::Add);
        assert_eq!(root.children()[0].token().name(), "a");
        assert_eq!(root.children()[1].token().kind, TokenKind::Multiply);
    }

    #[test]
    fn same_precedence_operators_are_left_associative() {
        // a-b-c must parse as (a-b)-c, not a-(b-c).
        let trees = parse("a-b-c").unwrap();
        let root = &trees[0];
        assert_eq!(root.token().kind, TokenKind::Subtract);
        assert_eq!(root.children()[1].token().name(), "c");
        let lhs = &root.children()[0];
        assert_eq!(lhs.token().kind, TokenKind::Subtract);
        assert_eq!(lhs.children()[0].token().name(), "a");
        assert_eq!(lhs.children()[1].token().name(), "b");
    }

    #[test]
    fn power_is_left_associative_too() {
        // a^b^c parses as (a^b)^c per spec §9 (non-standard on purpose).
        let trees = parse("a^b^c").unwrap();
        let root = &trees[0];
        assert_eq!(root.token().kind, TokenKind::Power);
        let lhs = &root.children()[0];
        assert_eq!(lhs.token().kind, TokenKind::Power);
    }

    #[test]
    fn mixed_bracket_styles_are_interchangeable() {
        let trees = parse("(a+b]*c").unwrap();
        let root = &trees[0];
        assert_eq!(root.token().kind, TokenKind::Multiply);
        assert_eq!(root.children()[0].token().kind, TokenKind::Add);
    }

    #[test]
    fn unary_minus_binds_tighter_than_binary_additive() {
        let trees = parse("-a+b").unwrap();
        let root = &trees[0];
        assert_eq!(root.token().kind, TokenKind::Add);
        assert_eq!(root.children()[0].token().kind, TokenKind::Negative);
    }

    #[test]
    fn comma_separates_independent_expressions() {
        let trees = parse("a+b,c*d").unwrap();
        assert_eq!(trees.len(), 2);
        assert_eq!(trees[0].token().kind, TokenKind::Add);
        assert_eq!(trees[1].token().kind, TokenKind::Multiply);
    }

    #[test]
    fn hash_prefixed_names_are_valid_operands() {
        let trees = parse("#0+#1").unwrap();
        assert_eq!(trees[0].children()[0].token().name(), "#0");
    }

    #[test]
    fn trailing_operator_is_an_error() {
        let err = parse("a+").unwrap_err();
        assert_matches!(err.kind(), ParseErrorKind::TrailingOperator);
    }

    #[test]
    fn consecutive_binary_operators_are_an_error() {
        let err = parse("a**b").unwrap_err();
        assert_matches!(err.kind(), ParseErrorKind::InvalidOperatorSequence);
    }

    #[test]
    fn missing_left_bracket_is_an_error() {
        let err = parse("a)").unwrap_err();
        assert_matches!(err.kind(), ParseErrorKind::MissingLeftBracket);
    }

    #[test]
    fn unmatched_right_bracket_at_expression_start_is_an_error() {
        let err = parse(")").unwrap_err();
        assert_matches!(err.kind(), ParseErrorKind::UnmatchedRightBracket);
    }

    #[test]
    fn unclosed_left_bracket_is_an_error() {
        let err = parse("(a+b").unwrap_err();
        assert_matches!(err.kind(), ParseErrorKind::TokensRemainOnOperatorStack);
    }

    #[test]
    fn operand_name_over_ten_chars_is_an_error() {
        let err = parse("abcdefghijk").unwrap_err();
        assert_matches!(err.kind(), ParseErrorKind::NameTooLong);
    }

    #[test]
    fn empty_input_is_an_error() {
        let err = parse("").unwrap_err();
        assert_matches!(err.kind(), ParseErrorKind::NoInput);
    }

    #[test]
    fn bracket_directly_after_an_operand_is_an_error() {
        let err = parse("a(b+c)").unwrap_err();
        assert_matches!(err.kind(), ParseErrorKind::MissingOperatorBeforeBracket);
    }
}
