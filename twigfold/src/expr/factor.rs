use crate::expr::diagnostics::EngineErrorKind;
use crate::expr::token::Token;
use crate::expr::tree::{Budget, TreeNode};
use std::fmt::{self, Display, Formatter, Write as _};

/// Greedily factors repeated subexpressions out of a list of expression
/// trees (spec §4.3/§4.4). Finds the first twig (pre-order, first tree to
/// last), gives it a fresh `#N` name, and substitutes that name for every
/// `eq_assoc`-equal occurrence across *every* tree in the list, including
/// the one it came from. Repeats until no twig remains anywhere.
pub struct FactoringEngine {
    trees: Vec<TreeNode>,
    next_id: usize,
}

/// One `#N = pattern` line emitted as a side effect of a substitution
/// round, returned so callers can print or log it as they see fit rather
/// than the engine writing to a hardcoded stream.
pub struct Substitution {
    pub id: usize,
    pub pattern: TreeNode,
}

impl Display for Substitution {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "#{} = {}", self.id, self.pattern)
    }
}

impl FactoringEngine {
    pub fn new(trees: Vec<TreeNode>) -> FactoringEngine {
        FactoringEngine { trees, next_id: 0 }
    }

    pub fn trees(&self) -> &[TreeNode] {
        &self.trees
    }

    /// Pre-order search across all trees, in list order, for the first
    /// twig. This is the whole selection policy spec §4.3 specifies:
    /// no "most common subtree" heuristic, no size weighting.
    fn first_twig(&self) -> Option<TreeNode> {
        self.trees.iter().find_map(TreeNode::first_twig)
    }

    /// Runs the substitution loop to exhaustion, calling `on_substitution`
    /// once per round with the fresh name and the pattern it replaced.
    /// `budget` bounds the total number of tree nodes the loop is allowed
    /// to allocate across every copy/replace it performs; pass
    /// `Budget::unlimited()` outside of failure-injection tests.
    pub fn simplify(
        &mut self,
        budget: &mut Budget,
        mut on_substitution: impl FnMut(&Substitution),
    ) -> Result<(), EngineErrorKind> {
        while let Some(pattern) = self.first_twig() {
            let fresh = TreeNode::leaf(Token::operand(format!("#{}", self.next_id)));
            let mut replaced = Vec::with_capacity(self.trees.len());
            for tree in &self.trees {
                let next = tree
                    .replace_checked(&pattern, &fresh, budget)
                    .map_err(|()| EngineErrorKind::InsufficientMemory)?;
                replaced.push(next);
            }
            self.trees = replaced;
            on_substitution(&Substitution {
                id: self.next_id,
                pattern: pattern.clone(),
            });
            self.next_id += 1;
        }
        Ok(())
    }
}

/// The structured dump printed after factoring finishes, successfully or
/// not (spec §6). The assembly token and both parser stacks are expected
/// to be empty by this point — parsing already completed — but are
/// printed verbatim rather than asserted on, since a programmer-error
/// invariant violation earlier is exactly the kind of bug this dump
/// exists to surface.
pub struct Dump<'a> {
    pub assembly: &'a Token,
    pub operator_stack: &'a [Token],
    pub operand_stack: &'a [TreeNode],
    pub expressions: &'a [TreeNode],
}

impl Display for Dump<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        writeln!(f, "---Assembly Token---")?;
        writeln!(f, "{}", self.assembly)?;
        writeln!(f, "---Operator Stack---")?;
        for tok in self.operator_stack {
            writeln!(f, "{tok}")?;
        }
        writeln!(f, "---Operand Stack---")?;
        for tree in self.operand_stack {
            writeln!(f, "{tree}\n")?;
        }
        writeln!(f, "---Expression List---")?;
        for (i, expr) in self.expressions.iter().enumerate() {
            let mut header = String::new();
            write!(header, "---Expression {i}---")?;
            writeln!(f, "{header}")?;
            writeln!(f, "{expr}")?;
        }
        Ok(())
    }
}
