//! A forest of nested ranges answering "smallest range containing X".
//!
//! Built fresh per query from a flat list of ranges that must be properly
//! nestable (no partial overlap), which delimiter pairing output
//! satisfies. Construction is a single left-to-right scan keeping a
//! stack of open ancestors, much like a block builder keeps its open
//! container path: each incoming range pops ancestors that don't contain
//! it, then attaches to the new stack top (or starts a fresh root).
//!
//! Lookups descend from the roots and fail open: if no child contains the
//! query, the nearest enclosing ancestor is returned rather than an error.

use crate::primitives::Range;

#[derive(Debug)]
pub struct RangeNode<T> {
    pub range: Range,
    pub item: T,
    pub children: Vec<RangeNode<T>>,
}

#[derive(Debug)]
pub struct RangeTree<T> {
    roots: Vec<RangeNode<T>>,
}

impl<T> RangeTree<T> {
    /// Builds the forest. `items` must be sorted by start position, ties
    /// broken largest-first, and must not partially overlap.
    pub fn build(items: Vec<(Range, T)>) -> Self {
        let mut roots: Vec<RangeNode<T>> = Vec::new();
        // Stack of indices: path from a root down to the open ancestor,
        // resolved against `roots` when attaching
        let mut stack: Vec<Range> = Vec::new();

        for (range, item) in items {
            while let Some(&top) = stack.last() {
                if top.contains(range) {
                    break;
                }
                stack.pop();
            }

            let node = RangeNode {
                range,
                item,
                children: Vec::new(),
            };

            if stack.is_empty() {
                roots.push(node);
            } else {
                // Walk down the ancestor path to the open node
                let mut current = roots.last_mut().expect("stack implies a root");
                for &ancestor in &stack[1..] {
                    let last = current
                        .children
                        .last_mut()
                        .expect("open ancestor must be the last child");
                    debug_assert_eq!(last.range, ancestor);
                    current = last;
                }
                current.children.push(node);
            }

            stack.push(range);
        }

        Self { roots }
    }

    pub fn roots(&self) -> &[RangeNode<T>] {
        &self.roots
    }

    /// The deepest node whose range contains `query`, or `None` when no
    /// root contains it. Descent stops at the last containing ancestor, so
    /// malformed queries still land on an enclosing node instead of
    /// erroring.
    pub fn smallest_containing(&self, query: Range) -> Option<&RangeNode<T>> {
        let mut current = self.roots.iter().find(|node| node.range.contains(query))?;
        loop {
            match current
                .children
                .iter()
                .find(|child| child.range.contains(query))
            {
                Some(child) => current = child,
                None => return Some(current),
            }
        }
    }

    /// Pre-order traversal of every node in the forest.
    pub fn flatten(&self) -> Vec<&RangeNode<T>> {
        fn walk<'a, T>(node: &'a RangeNode<T>, out: &mut Vec<&'a RangeNode<T>>) {
            out.push(node);
            for child in &node.children {
                walk(child, out);
            }
        }

        let mut out = Vec::new();
        for root in &self.roots {
            walk(root, &mut out);
        }
        out
    }
}
