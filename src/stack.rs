//! Fixed-capacity LIFO [`Stack`] backing both the move history of
//! [`crate::game::GameState`] and the descent path of the search tree.
//!
//! Both users are bounded by the number of plies in a game, so the storage is
//! an inline [`ArrayVec`] and never grows or reallocates.

use arrayvec::ArrayVec;
use thiserror::Error;

/// Protocol violations reported by [`Stack`].
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
pub enum StackError {
    /// `pop` or `peek` on an empty stack.
    #[error("stack is empty")]
    Empty,
    /// `push` on a stack that already holds `capacity` elements.
    #[error("stack is full (capacity {capacity})")]
    Full {
        #[allow(missing_docs)]
        capacity: usize,
    },
}

/// Bounded stack holding at most `CAPACITY` elements.
///
/// ```
/// use connect4_mcts::stack::{Stack, StackError};
///
/// let mut stack = Stack::<u8, 2>::new();
/// stack.push(1).unwrap();
/// stack.push(2).unwrap();
/// assert_eq!(stack.push(3), Err(StackError::Full { capacity: 2 }));
/// assert_eq!(stack.peek(), Ok(&2));
/// assert_eq!(stack.pop(), Ok(2));
/// assert_eq!(stack.len(), 1);
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Stack<T, const CAPACITY: usize> {
    items: ArrayVec<T, CAPACITY>,
}

impl<T, const CAPACITY: usize> Stack<T, CAPACITY> {
    /// Creates an empty stack.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            items: ArrayVec::new_const(),
        }
    }

    /// Places `value` on top of the stack.
    ///
    /// # Errors
    ///
    /// Returns [`StackError::Full`] without modifying the stack if it already
    /// holds `CAPACITY` elements.
    pub fn push(&mut self, value: T) -> Result<(), StackError> {
        self.items
            .try_push(value)
            .map_err(|_| StackError::Full { capacity: CAPACITY })
    }

    /// Removes and returns the most recently pushed value.
    ///
    /// # Errors
    ///
    /// Returns [`StackError::Empty`] if there is nothing to remove.
    pub fn pop(&mut self) -> Result<T, StackError> {
        self.items.pop().ok_or(StackError::Empty)
    }

    /// Returns the most recently pushed value without removing it.
    ///
    /// # Errors
    ///
    /// Returns [`StackError::Empty`] if the stack has no elements.
    pub fn peek(&self) -> Result<&T, StackError> {
        self.items.last().ok_or(StackError::Empty)
    }

    /// Number of stored items.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// True if nothing is stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Maximum number of items.
    #[must_use]
    pub const fn capacity(&self) -> usize {
        CAPACITY
    }

    /// Drops all elements.
    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Elements from the bottom (oldest) to the top (most recent).
    #[must_use]
    pub fn as_slice(&self) -> &[T] {
        &self.items
    }
}

impl<T, const CAPACITY: usize> Default for Stack<T, CAPACITY> {
    fn default() -> Self {
        Self::new()
    }
}
