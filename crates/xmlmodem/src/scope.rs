//! Structural context tracked by the reader while it translates events.

use alloc::vec::Vec;
use core::fmt;

/// The structural context the reader believes it occupies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope {
    /// Inside an object; the next token is a field name or the object's end.
    InsideObject,
    /// Inside an array whose elements are objects.
    InsideArray,
    /// Inside an array synthesized from adjacent same-named siblings.
    InsideEmbeddedArray,
    /// Inside a synthesized array whose elements are bare text.
    InsidePrimitiveEmbeddedArray,
    /// Inside an array whose elements are bare text.
    InsidePrimitiveArray,
    /// Inside one bare-text element of a primitive array.
    PrimitiveValue,
    /// A field name was queued and its value has not been seen yet.
    Name,
}

impl Scope {
    /// Whether start tags seen in this scope are array elements.
    #[must_use]
    pub fn inside_array(self) -> bool {
        matches!(
            self,
            Scope::InsideArray
                | Scope::InsideEmbeddedArray
                | Scope::InsidePrimitiveEmbeddedArray
                | Scope::InsidePrimitiveArray
        )
    }
}

#[derive(Debug, Clone, Copy)]
struct Frame {
    scope: Scope,
    // auto-named text fields already produced in this frame
    texts: u32,
}

impl Frame {
    fn new(scope: Scope) -> Self {
        Self { scope, texts: 0 }
    }
}

/// Array-backed stack of [`Scope`]s mirroring the current nesting.
///
/// Besides the usual push/pop it supports the two interior edits needed to
/// rewrite context in place when the reader discovers, after the fact, that a
/// field was really the first element of a list.
#[derive(Debug, Default, Clone)]
pub(crate) struct ScopeStack {
    frames: Vec<Frame>,
}

impl ScopeStack {
    pub(crate) fn new() -> Self {
        Self {
            frames: Vec::with_capacity(32),
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.frames.len()
    }

    pub(crate) fn push(&mut self, scope: Scope) {
        self.frames.push(Frame::new(scope));
    }

    pub(crate) fn peek(&self) -> Option<Scope> {
        self.frames.last().map(|f| f.scope)
    }

    pub(crate) fn get(&self, index: usize) -> Option<Scope> {
        self.frames.get(index).map(|f| f.scope)
    }

    pub(crate) fn pop(&mut self) -> Option<Scope> {
        self.frames.pop().map(|f| f.scope)
    }

    /// Pops the top frame, and the [`Scope::Name`] frame it exposes, if any.
    pub(crate) fn fix(&mut self) {
        self.frames.pop();
        if self.peek() == Some(Scope::Name) {
            self.frames.pop();
        }
    }

    /// Removes the `count` frames that sat directly below `remembered_len`
    /// when that length was recorded.
    ///
    /// Frames pushed since are kept and shift down. Frames popped since count
    /// towards `count`. Returns the index at which the removed run started.
    pub(crate) fn cleanup(&mut self, count: usize, remembered_len: usize) -> usize {
        let current = self.frames.len();
        if remembered_len < current {
            let start = remembered_len.saturating_sub(count);
            self.frames.drain(start..remembered_len);
        } else {
            let already_gone = remembered_len - current;
            let remove = count.saturating_sub(already_gone);
            self.frames.truncate(current.saturating_sub(remove));
        }
        remembered_len.saturating_sub(count)
    }

    /// Removes the top `count` frames.
    pub(crate) fn cleanup_top(&mut self, count: usize) -> usize {
        self.cleanup(count, self.frames.len())
    }

    /// Inserts a frame at `index`, shifting later frames up. Indices past the
    /// end append.
    pub(crate) fn push_at(&mut self, index: usize, scope: Scope) {
        let index = index.min(self.frames.len());
        self.frames.insert(index, Frame::new(scope));
    }

    /// Returns the ordinal of the next auto-named text field in the top frame.
    pub(crate) fn next_text_ordinal(&mut self) -> u32 {
        match self.frames.last_mut() {
            Some(frame) => {
                frame.texts += 1;
                frame.texts
            }
            None => 1,
        }
    }

    pub(crate) fn scopes(&self) -> impl Iterator<Item = Scope> + '_ {
        self.frames.iter().map(|f| f.scope)
    }
}

impl fmt::Display for ScopeStack {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, scope) in self.scopes().enumerate() {
            if i > 0 {
                f.write_str(">")?;
            }
            write!(f, "{scope:?}")?;
        }
        Ok(())
    }
}
