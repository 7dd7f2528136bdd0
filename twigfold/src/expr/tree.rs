use crate::expr::token::{Token, TokenKind};

/// An ordered n-ary tree. Each node owns its token and its children;
/// children are created then transferred to their parent and never
/// re-parented, so the tree is cycle-free by construction (spec §3).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeNode {
    token: Token,
    children: Vec<TreeNode>,
}

impl TreeNode {
    pub fn leaf(token: Token) -> TreeNode {
        debug_assert_eq!(token.kind, TokenKind::Operand);
        TreeNode {
            token,
            children: Vec::new(),
        }
    }

    pub fn new(token: Token, children: Vec<TreeNode>) -> TreeNode {
        TreeNode { token, children }
    }

    pub fn token(&self) -> &Token {
        &self.token
    }

    pub fn children(&self) -> &[TreeNode] {
        &self.children
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// A twig is a node with at least one child, every one of which is a leaf.
    pub fn is_twig(&self) -> bool {
        !self.children.is_empty() && self.children.iter().all(TreeNode::is_leaf)
    }

    /// Structural equality: kinds, names, and children (in order) all match.
    pub fn eq_structural(&self, other: &TreeNode) -> bool {
        self.token == other.token
            && self.children.len() == other.children.len()
            && self
                .children
                .iter()
                .zip(other.children.iter())
                .all(|(a, b)| a.eq_structural(b))
    }

    /// Associative equality (spec §4.3): tokens equal; for a non-associative
    /// token, children compare pairwise in order; for an associative token
    /// (`Add`/`Multiply`), every child of `self` must have at least one
    /// `eq_assoc`-equal sibling in `other` and vice versa. This is a
    /// permutation *existence* check, not a multiset match (spec §9(iii)):
    /// `x+x` matches the first two children of `x+x+y` even though the
    /// third child of the right side is never "claimed".
    pub fn eq_assoc(&self, other: &TreeNode) -> bool {
        if self.token != other.token {
            return false;
        }
        if self.token.kind.is_operator() && crate::expr::operator::is_associative(self.token.kind)
        {
            if self.children.len() != other.children.len() {
                return false;
            }
            self.children
                .iter()
                .all(|a| other.children.iter().any(|b| a.eq_assoc(b)))
                && other
                    .children
                    .iter()
                    .all(|b| self.children.iter().any(|a| a.eq_assoc(b)))
        } else {
            self.children.len() == other.children.len()
                && self
                    .children
                    .iter()
                    .zip(other.children.iter())
                    .all(|(a, b)| a.eq_assoc(b))
        }
    }

    /// Deep copy. Trivial given owned children, but kept as an explicit
    /// method (rather than leaning on `Clone` alone) to keep the factoring
    /// engine's "copy the pattern before destroying the tree it came from"
    /// intent visible at call sites.
    pub fn copy(&self) -> TreeNode {
        self.clone()
    }

    /// Returns a fresh tree with every occurrence of `find` (tested with
    /// `eq_assoc`) replaced by a copy of `repl`. Children are reconstructed
    /// bottom-up before the parent itself is tested, so a substitution that
    /// fires deep in the tree is visible when testing an enclosing node
    /// (spec §4.3: "children are reconstructed before the parent is
    /// tested").
    pub fn replace(&self, find: &TreeNode, repl: &TreeNode) -> TreeNode {
        let rebuilt = TreeNode {
            token: self.token.clone(),
            children: self.children.iter().map(|c| c.replace(find, repl)).collect(),
        };
        if rebuilt.eq_assoc(find) {
            repl.copy()
        } else {
            rebuilt
        }
    }

    /// Every twig in `self`, in pre-order.
    pub fn twigs(&self) -> Vec<TreeNode> {
        let mut out = Vec::new();
        self.collect_twigs(&mut out);
        out
    }

    fn collect_twigs<'a>(&'a self, out: &mut Vec<TreeNode>) {
        if self.is_twig() {
            out.push(self.copy());
        }
        for child in &self.children {
            child.collect_twigs(out);
        }
    }

    /// Pre-order search for the first twig, or `None`.
    pub fn first_twig(&self) -> Option<TreeNode> {
        if self.is_twig() {
            return Some(self.copy());
        }
        self.children.iter().find_map(TreeNode::first_twig)
    }

    /// Number of `eq_assoc` matches of `pattern` found anywhere in `self`.
    /// Not part of the core contract (spec §4.4: the "most common subtree"
    /// probe this backs is dead in the original), kept as a tested method.
    pub fn count_matches(&self, pattern: &TreeNode) -> usize {
        let here = usize::from(self.eq_assoc(pattern));
        here + self
            .children
            .iter()
            .map(|c| c.count_matches(pattern))
            .sum::<usize>()
    }
}

/// A countdown of remaining allocations, used only to exercise the
/// "allocation failure" error class from spec §7.2 in tests. Rust's
/// allocator has no recoverable out-of-memory path to hook into the way
/// the original's `malloc`-returns-`NULL` checks do, so this stands in for
/// it: `copy_checked`/`replace_checked` charge one unit per node they
/// build and fail before constructing anything once the budget is spent,
/// so no partial tree is ever left allocated on the failure path.
#[derive(Debug, Clone, Copy)]
pub struct Budget(Option<usize>);

impl Budget {
    pub fn unlimited() -> Budget {
        Budget(None)
    }

    pub fn limited(n: usize) -> Budget {
        Budget(Some(n))
    }

    fn charge(&mut self) -> Result<(), ()> {
        match &mut self.0 {
            None => Ok(()),
            Some(0) => Err(()),
            Some(n) => {
                *n -= 1;
                Ok(())
            }
        }
    }
}

impl TreeNode {
    /// Budget-aware `copy`. Children are copied before the parent node is
    /// charged, so a failure deep in the tree propagates up without ever
    /// allocating the ancestor nodes above it.
    pub fn copy_checked(&self, budget: &mut Budget) -> Result<TreeNode, ()> {
        let children = self
            .children
            .iter()
            .map(|c| c.copy_checked(budget))
            .collect::<Result<Vec<_>, _>>()?;
        budget.charge()?;
        Ok(TreeNode {
            token: self.token.clone(),
            children,
        })
    }

    /// Budget-aware `replace`.
    pub fn replace_checked(
        &self,
        find: &TreeNode,
        repl: &TreeNode,
        budget: &mut Budget,
    ) -> Result<TreeNode, ()> {
        let children = self
            .children
            .iter()
            .map(|c| c.replace_checked(find, repl, budget))
            .collect::<Result<Vec<_>, _>>()?;
        budget.charge()?;
        let rebuilt = TreeNode {
            token: self.token.clone(),
            children,
        };
        if rebuilt.eq_assoc(find) {
            repl.copy_checked(budget)
        } else {
            Ok(rebuilt)
        }
    }
}
