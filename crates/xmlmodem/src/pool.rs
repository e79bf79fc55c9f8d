use alloc::{string::String, vec::Vec};

/// Bounded free list of value buffers.
///
/// Values dropped inside the reader (skipped subtrees, names discarded while
/// rewriting a list) give their allocation back here, and new values are
/// built in a recycled buffer when one is available. A capacity of zero turns
/// the pool into a pass-through.
#[derive(Debug)]
pub(crate) struct StringPool {
    free: Vec<String>,
    capacity: usize,
}

impl StringPool {
    pub(crate) fn new(capacity: usize) -> Self {
        Self {
            free: Vec::with_capacity(capacity),
            capacity,
        }
    }

    /// A cleared buffer holding `content`.
    pub(crate) fn get(&mut self, content: &str) -> String {
        match self.free.pop() {
            Some(mut buf) => {
                buf.push_str(content);
                buf
            }
            None => String::from(content),
        }
    }

    pub(crate) fn release(&mut self, mut buf: String) {
        if self.free.len() < self.capacity {
            buf.clear();
            self.free.push(buf);
        }
    }

    #[cfg(test)]
    pub(crate) fn available(&self) -> usize {
        self.free.len()
    }
}
