//! Arena-backed singly-linked sequence.

use std::fmt;

use crate::types::errors::SequenceError;

/// Node stored in an arena slot.
struct Node<T> {
    value: T,
    next: Option<usize>,
}

/// Ordered, positionally addressable sequence of values.
///
/// Nodes live in a growable arena and link to each other by slot handle, so
/// relinking never juggles references. Released slots go to a free list and
/// are reused by later inserts.
///
/// Position `0` is the head. Front and back reads are O(1); anything else
/// walks the chain.
pub struct KeySequence<T> {
    slots: Vec<Option<Node<T>>>,
    free: Vec<usize>,
    head: Option<usize>,
    tail: Option<usize>,
    len: usize,
}

impl<T> KeySequence<T> {
    /// Creates an empty sequence.
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    /// Creates an empty sequence with room for `capacity` nodes.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: Vec::with_capacity(capacity),
            free: Vec::new(),
            head: None,
            tail: None,
            len: 0,
        }
    }

    /// Number of values in the sequence.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether the sequence is empty.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Inserts `value` before the element currently at `index`.
    ///
    /// `index == len` appends.
    pub fn insert_at(&mut self, value: T, index: usize) -> Result<(), SequenceError> {
        if index > self.len {
            return Err(SequenceError::InvalidIndex {
                index,
                len: self.len,
            });
        }

        if index == 0 {
            let handle = self.alloc(value, self.head);
            self.head = Some(handle);
            if self.tail.is_none() {
                self.tail = Some(handle);
            }
        } else {
            let prev = self.handle_at(index - 1)?;
            let next = self.node(prev)?.next;
            let handle = self.alloc(value, next);
            self.node_mut(prev)?.next = Some(handle);
            if index == self.len {
                self.tail = Some(handle);
            }
        }

        self.len += 1;
        Ok(())
    }

    /// Inserts `value` at the front.
    pub fn insert_first(&mut self, value: T) -> Result<(), SequenceError> {
        self.insert_at(value, 0)
    }

    /// Appends `value` after the last element.
    pub fn insert_last(&mut self, value: T) -> Result<(), SequenceError> {
        self.insert_at(value, self.len)
    }

    /// Removes and returns the element at `index`.
    pub fn remove_at(&mut self, index: usize) -> Result<T, SequenceError> {
        self.check_position(index)?;

        let removed = if index == 0 {
            let head = self.head.ok_or_else(|| broken("head missing"))?;
            self.head = self.node(head)?.next;
            head
        } else {
            let prev = self.handle_at(index - 1)?;
            self.unlink_after(prev)?
        };

        self.len -= 1;
        if self.len == 0 {
            self.head = None;
            self.tail = None;
        }

        self.release(removed)
    }

    /// Removes and returns the first element.
    pub fn remove_first(&mut self) -> Result<T, SequenceError> {
        self.remove_at(0)
    }

    /// Removes and returns the last element.
    ///
    /// Fails with [`SequenceError::EmptyList`] when there is nothing to remove.
    pub fn remove_last(&mut self) -> Result<T, SequenceError> {
        if self.len == 0 {
            return Err(SequenceError::EmptyList);
        }
        self.remove_at(self.len - 1)
    }

    /// Drops every element and resets the arena.
    pub fn clear(&mut self) {
        self.slots.clear();
        self.free.clear();
        self.head = None;
        self.tail = None;
        self.len = 0;
    }

    /// Returns the element at `index`.
    pub fn get_at(&self, index: usize) -> Result<&T, SequenceError> {
        self.check_position(index)?;
        let handle = self.handle_at(index)?;
        Ok(&self.node(handle)?.value)
    }

    /// Returns the first element.
    pub fn get_first(&self) -> Result<&T, SequenceError> {
        let head = self.head.ok_or(SequenceError::EmptyList)?;
        Ok(&self.node(head)?.value)
    }

    /// Returns the last element.
    pub fn get_last(&self) -> Result<&T, SequenceError> {
        let tail = self.tail.ok_or(SequenceError::EmptyList)?;
        Ok(&self.node(tail)?.value)
    }

    /// Relinks the element at `from` so it becomes the head.
    ///
    /// A no-op when `from == 0`. Runs on every cache hit.
    pub fn move_to_first(&mut self, from: usize) -> Result<(), SequenceError> {
        if from >= self.len {
            return Err(SequenceError::InvalidIndex {
                index: from,
                len: self.len,
            });
        }
        if from == 0 {
            return Ok(());
        }

        let prev = self.handle_at(from - 1)?;
        let moved = self.unlink_after(prev)?;
        self.node_mut(moved)?.next = self.head;
        self.head = Some(moved);
        Ok(())
    }

    /// Position of the first element matching `predicate`.
    ///
    /// `Ok(None)` when nothing matches. Fails with
    /// [`SequenceError::EmptyList`] on an empty sequence, which is distinct
    /// from "not found".
    pub fn position<F>(&self, mut predicate: F) -> Result<Option<usize>, SequenceError>
    where
        F: FnMut(&T) -> bool,
    {
        if self.len == 0 {
            return Err(SequenceError::EmptyList);
        }
        Ok(self.iter().position(|value| predicate(value)))
    }

    /// Position of the first element equal to `value`.
    pub fn index_of(&self, value: &T) -> Result<Option<usize>, SequenceError>
    where
        T: PartialEq,
    {
        self.position(|candidate| candidate == value)
    }

    /// Iterates from head to tail.
    pub fn iter(&self) -> Iter<'_, T> {
        Iter {
            slots: &self.slots,
            cursor: self.head,
            remaining: self.len,
        }
    }

    /// Copies the values out, head first.
    pub fn to_vec(&self) -> Vec<T>
    where
        T: Clone,
    {
        self.iter().cloned().collect()
    }

    /// Walks the chain and verifies head, tail and length agree.
    pub fn check_links(&self) -> Result<(), SequenceError> {
        if self.len == 0 {
            if self.head.is_some() || self.tail.is_some() {
                return Err(broken("empty sequence still has head or tail"));
            }
            return Ok(());
        }

        let mut cursor = self.head;
        let mut last = None;
        for hop in 0..self.len {
            let handle = cursor
                .ok_or_else(|| broken(format!("chain ends after {} of {} nodes", hop, self.len)))?;
            cursor = self.node(handle)?.next;
            last = Some(handle);
        }

        if cursor.is_some() {
            return Err(broken(format!("chain continues past {} nodes", self.len)));
        }
        if last != self.tail {
            return Err(broken("tail is not the last reachable node"));
        }
        Ok(())
    }

    /// Appends without a walk; the tail handle is always valid here.
    fn push_back(&mut self, value: T) {
        let handle = self.alloc(value, None);
        match self
            .tail
            .and_then(|tail| self.slots.get_mut(tail).and_then(Option::as_mut))
        {
            Some(last) => last.next = Some(handle),
            None => self.head = Some(handle),
        }
        self.tail = Some(handle);
        self.len += 1;
    }

    fn check_position(&self, index: usize) -> Result<(), SequenceError> {
        if self.len == 0 {
            return Err(SequenceError::EmptyList);
        }
        if index >= self.len {
            return Err(SequenceError::InvalidIndex {
                index,
                len: self.len,
            });
        }
        Ok(())
    }

    /// Handle of the node at `index`. Caller guarantees `index < len`.
    fn handle_at(&self, index: usize) -> Result<usize, SequenceError> {
        if index + 1 == self.len {
            return self.tail.ok_or_else(|| broken("tail missing"));
        }

        let mut cursor = self.head.ok_or_else(|| broken("head missing"))?;
        for hop in 0..index {
            cursor = self
                .node(cursor)?
                .next
                .ok_or_else(|| broken(format!("chain ends at hop {}", hop)))?;
        }
        Ok(cursor)
    }

    /// Detaches the node following `prev` and returns its handle.
    fn unlink_after(&mut self, prev: usize) -> Result<usize, SequenceError> {
        let target = self
            .node(prev)?
            .next
            .ok_or_else(|| broken("no node after predecessor"))?;
        let after = self.node(target)?.next;
        self.node_mut(prev)?.next = after;
        if self.tail == Some(target) {
            self.tail = Some(prev);
        }
        Ok(target)
    }

    fn node(&self, handle: usize) -> Result<&Node<T>, SequenceError> {
        self.slots
            .get(handle)
            .and_then(Option::as_ref)
            .ok_or_else(|| broken(format!("handle {} points at a free slot", handle)))
    }

    fn node_mut(&mut self, handle: usize) -> Result<&mut Node<T>, SequenceError> {
        self.slots
            .get_mut(handle)
            .and_then(Option::as_mut)
            .ok_or_else(|| broken(format!("handle {} points at a free slot", handle)))
    }

    fn alloc(&mut self, value: T, next: Option<usize>) -> usize {
        let node = Node { value, next };
        match self.free.pop() {
            Some(handle) => {
                self.slots[handle] = Some(node);
                handle
            }
            None => {
                self.slots.push(Some(node));
                self.slots.len() - 1
            }
        }
    }

    fn release(&mut self, handle: usize) -> Result<T, SequenceError> {
        let node = self
            .slots
            .get_mut(handle)
            .and_then(Option::take)
            .ok_or_else(|| broken(format!("handle {} released twice", handle)))?;
        self.free.push(handle);
        Ok(node.value)
    }
}

fn broken<S: Into<String>>(msg: S) -> SequenceError {
    SequenceError::Corrupted(msg.into())
}

impl<T> Default for KeySequence<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: fmt::Debug> fmt::Debug for KeySequence<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl<T> FromIterator<T> for KeySequence<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut sequence = KeySequence::new();
        for value in iter {
            sequence.push_back(value);
        }
        sequence
    }
}

/// Borrowing iterator over a [`KeySequence`], head first.
pub struct Iter<'a, T> {
    slots: &'a [Option<Node<T>>],
    cursor: Option<usize>,
    remaining: usize,
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let node = self.slots.get(self.cursor?)?.as_ref()?;
        self.cursor = node.next;
        self.remaining -= 1;
        Some(&node.value)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, Some(self.remaining))
    }
}
