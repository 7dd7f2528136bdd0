use std::fmt::{self, Display, Formatter};

/// Malformed-input and allocation-failure errors the parser can raise
/// (spec §7.1/§7.2). Mirrors `dts/diagnostics.rs`'s `DiagnosticKind`: a
/// closed enum with a hand-rolled `Display`, no span tracking (spec's
/// diagnostic contract is wording-only, not position-bearing).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseErrorKind {
    InvalidOperatorSequence,
    NoInput,
    TrailingOperator,
    MissingOperatorBeforeBracket,
    UnmatchedRightBracket,
    MissingLeftBracket,
    MissingOperands,
    TokensRemainOnOperatorStack,
    NoExpressionTrees,
    UnconsolidatedExpressionTrees,
    NameTooLong,
    InsufficientMemory,
}

impl Display for ParseErrorKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        use ParseErrorKind::*;
        let msg = match self {
            InvalidOperatorSequence => "invalid operator sequence",
            NoInput => "no input in new expression",
            TrailingOperator => "extra operator",
            MissingOperatorBeforeBracket => "missing operator after bracket",
            MissingLeftBracket => "missing left bracket",
            MissingOperands => "operands missing",
            TokensRemainOnOperatorStack => "tokens remain on operator stack",
            NoExpressionTrees => "no expression trees on stack",
            UnconsolidatedExpressionTrees => "unconsolidated expression trees",
            NameTooLong => "operand name exceeds 10 characters",
            InsufficientMemory => "insufficient memory",
        };
        write!(f, "{msg}")
    }
}

/// A single stderr diagnostic line, tagged with the subsystem that raised
/// it (spec §6: "prefixed with a subsystem tag").
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    subsystem: &'static str,
    kind: ParseErrorKind,
}

impl Diagnostic {
    pub fn new(subsystem: &'static str, kind: ParseErrorKind) -> Diagnostic {
        Diagnostic { subsystem, kind }
    }

    pub fn kind(&self) -> &ParseErrorKind {
        &self.kind
    }
}

impl Display for Diagnostic {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.subsystem, self.kind)
    }
}

/// Errors the factoring engine can raise mid-loop (spec §7, "errors during
/// the factoring phase"). Currently only the allocation-failure class,
/// raised by the budget-aware `TreeNode::replace_checked`/`copy_checked`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineErrorKind {
    InsufficientMemory,
}

impl Display for EngineErrorKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            EngineErrorKind::InsufficientMemory => write!(f, "insufficient memory"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn diagnostic_prefixes_subsystem_tag() {
        let d = Diagnostic::new("ExpParser", ParseErrorKind::NoInput);
        assert_eq!(d.to_string(), "ExpParser: no input in new expression");
    }
}
