use alloc::{string::String, vec::Vec};
use core::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
struct ClosedTag {
    depth: usize,
    name: String,
}

/// Remembers the most recently closed element at each nesting level.
///
/// Only maintained when same-name lists are enabled. Depths strictly decrease
/// from the top of the stack to the bottom.
#[derive(Debug, Default)]
pub(crate) struct ClosedTags {
    stack: Vec<ClosedTag>,
}

impl ClosedTags {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Records that the element `name` at `depth` was just closed.
    pub(crate) fn record(&mut self, depth: usize, name: &str) {
        while self.stack.last().is_some_and(|top| top.depth > depth) {
            self.stack.pop();
        }
        match self.stack.last_mut() {
            Some(top) if top.depth == depth => {
                top.name.clear();
                top.name.push_str(name);
            }
            _ => self.stack.push(ClosedTag {
                depth,
                name: name.into(),
            }),
        }
    }

    /// Name of the last sibling closed at `depth`, if it is still the most
    /// recent record.
    pub(crate) fn last_at(&self, depth: usize) -> Option<&str> {
        self.stack
            .last()
            .filter(|top| top.depth == depth)
            .map(|top| top.name.as_str())
    }
}

impl fmt::Display for ClosedTags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, tag) in self.stack.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "'{}'/{}", tag.name, tag.depth)?;
        }
        Ok(())
    }
}
