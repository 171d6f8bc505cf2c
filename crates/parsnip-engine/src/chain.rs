//! Persistent append-only sequences.
//!
//! A [`Chain`] is a singly-linked list built in reverse: appending creates a
//! new head that points at the shared tail. Every parser snapshot keeps its
//! own view of the output this way, and abandoned alternatives cost nothing
//! beyond the links they allocated.

use std::fmt;
use std::sync::Arc;

struct Link<T> {
    value: T,
    prev: Option<Arc<Link<T>>>,
}

/// A persistent list whose newest element is at the head.
///
/// Links are reference counted and never mutated, so chains may be shared
/// freely between snapshots and threads.
pub struct Chain<T> {
    head: Option<Arc<Link<T>>>,
    len: usize,
}

impl<T> Chain<T> {
    /// Creates an empty chain.
    #[must_use]
    pub const fn new() -> Self {
        Self { head: None, len: 0 }
    }

    /// Returns the number of elements.
    #[must_use]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if the chain has no elements.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.head.is_none()
    }

    /// Returns the chain with `value` following every element of `self`.
    #[must_use]
    pub fn append(&self, value: T) -> Self {
        Self {
            head: Some(Arc::new(Link {
                value,
                prev: self.head.clone(),
            })),
            len: self.len + 1,
        }
    }

    /// Returns the most recently appended element.
    #[must_use]
    pub fn last(&self) -> Option<&T> {
        self.head.as_deref().map(|link| &link.value)
    }

    /// Returns the chain without its most recently appended element.
    #[must_use]
    pub fn prev(&self) -> Self {
        match &self.head {
            Some(link) => Self {
                head: link.prev.clone(),
                len: self.len - 1,
            },
            None => Self::new(),
        }
    }

    /// Iterates from the most recent element back to the first.
    pub fn iter_rev(&self) -> RevIter<'_, T> {
        RevIter {
            next: self.head.as_deref(),
        }
    }

    /// Returns `true` if both chains share the same head link.
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        match (&self.head, &other.head) {
            (Some(a), Some(b)) => Arc::ptr_eq(a, b),
            (None, None) => true,
            _ => false,
        }
    }
}

impl<T: Clone> Chain<T> {
    /// Materializes the chain from first to last.
    #[must_use]
    pub fn to_vec(&self) -> Vec<T> {
        let mut out: Vec<T> = self.iter_rev().cloned().collect();
        out.reverse();
        out
    }

    /// A chain of the same length with the elements in reverse order.
    #[must_use]
    pub fn reverse(&self) -> Self {
        Self::new().rev_append_all(self)
    }

    /// The chain holding every element of `self` followed by
    /// `next.reverse()`.
    #[must_use]
    pub fn rev_append_all(&self, next: &Self) -> Self {
        next.iter_rev()
            .fold(self.clone(), |out, value| out.append(value.clone()))
    }

    /// Appends every element of `values`, in iteration order.
    #[must_use]
    pub fn extend<I>(&self, values: I) -> Self
    where
        I: IntoIterator<Item = T>,
    {
        values
            .into_iter()
            .fold(self.clone(), |out, value| out.append(value))
    }

    /// Splits off the `n` most recent elements.
    ///
    /// Returns the shared prefix and the split elements in forward order.
    /// `n` is clamped to the chain length.
    #[must_use]
    pub fn split_tail(&self, n: usize) -> (Self, Vec<T>) {
        let n = n.min(self.len);
        let mut tail = Vec::with_capacity(n);
        let mut rest = self.head.as_ref();
        for _ in 0..n {
            let Some(link) = rest else { break };
            tail.push(link.value.clone());
            rest = link.prev.as_ref();
        }
        tail.reverse();
        let prefix = Self {
            head: rest.cloned(),
            len: self.len - tail.len(),
        };
        (prefix, tail)
    }
}

impl<T> Default for Chain<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Clone for Chain<T> {
    fn clone(&self) -> Self {
        Self {
            head: self.head.clone(),
            len: self.len,
        }
    }
}

// Unlinks iteratively so that dropping a long chain cannot overflow the stack.
impl<T> Drop for Chain<T> {
    fn drop(&mut self) {
        let mut next = self.head.take();
        while let Some(link) = next {
            match Arc::try_unwrap(link) {
                Ok(mut link) => next = link.prev.take(),
                Err(_) => break,
            }
        }
    }
}

impl<T: PartialEq> PartialEq for Chain<T> {
    fn eq(&self, other: &Self) -> bool {
        self.len == other.len && (self.ptr_eq(other) || self.iter_rev().eq(other.iter_rev()))
    }
}

impl<T: Eq> Eq for Chain<T> {}

impl<T: fmt::Debug + Clone> fmt::Debug for Chain<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.to_vec()).finish()
    }
}

impl<T> FromIterator<T> for Chain<T> {
    /// Builds a chain whose last element is the last one yielded.
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut chain = Self::new();
        for value in iter {
            chain = chain.append(value);
        }
        chain
    }
}

/// Iterator over a chain from newest to oldest element.
pub struct RevIter<'c, T> {
    next: Option<&'c Link<T>>,
}

impl<'c, T> Iterator for RevIter<'c, T> {
    type Item = &'c T;

    fn next(&mut self) -> Option<Self::Item> {
        let link = self.next?;
        self.next = link.prev.as_deref();
        Some(&link.value)
    }
}
