//! Line storage with stable positional handles.
//!
//! Lines live in the slots of a `Vec` and are linked into document order
//! through `prev`/`next` slot indices, so inserting or removing a line is
//! O(1) and never moves any other line. A [`LineId`] names a slot together
//! with the slot's generation and the id of the arena that issued it:
//!
//! - freeing a slot bumps its generation, so handles to removed lines stop
//!   resolving even after the slot is reused;
//! - every arena gets a process-unique id, so a handle issued by one
//!   document never resolves in another.
//!
//! A handle that does not resolve yields `None` from every lookup.

use std::sync::atomic::{AtomicU64, Ordering};

use crate::line::Line;

static NEXT_ARENA_ID: AtomicU64 = AtomicU64::new(1);

/// Stable handle to a line inside a [`LineArena`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LineId {
    arena: u64,
    slot: usize,
    generation: u32,
}

#[derive(Debug)]
struct Node {
    line: Line,
    prev: Option<usize>,
    next: Option<usize>,
}

#[derive(Debug)]
struct Slot {
    generation: u32,
    node: Option<Node>,
}

/// Doubly linked list of lines backed by a slot vector.
///
/// The arena always holds at least one line.
#[derive(Debug)]
pub struct LineArena {
    id: u64,
    slots: Vec<Slot>,
    free: Vec<usize>,
    head: usize,
    tail: usize,
    len: usize,
}

impl LineArena {
    /// Creates an arena holding a single empty line.
    pub fn new() -> Self {
        Self::from_lines(std::iter::empty())
    }

    /// Creates an arena holding `lines` in order.
    ///
    /// An empty iterator still produces one empty line.
    pub fn from_lines<I>(lines: I) -> Self
    where
        I: IntoIterator<Item = Line>,
    {
        let mut arena = Self {
            id: NEXT_ARENA_ID.fetch_add(1, Ordering::Relaxed),
            slots: Vec::new(),
            free: Vec::new(),
            head: 0,
            tail: 0,
            len: 0,
        };
        for line in lines {
            arena.push_back(line);
        }
        if arena.len == 0 {
            arena.push_back(Line::new());
        }
        arena
    }

    /// Number of lines. Always at least 1.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Handle to the first line.
    pub fn first(&self) -> LineId {
        self.id_of(self.head)
    }

    /// Handle to the last line.
    pub fn last(&self) -> LineId {
        self.id_of(self.tail)
    }

    /// Returns true if `id` names a live line of this arena.
    pub fn contains(&self, id: LineId) -> bool {
        self.node(id).is_some()
    }

    pub fn get(&self, id: LineId) -> Option<&Line> {
        self.node(id).map(|node| &node.line)
    }

    pub fn get_mut(&mut self, id: LineId) -> Option<&mut Line> {
        self.node_mut(id).map(|node| &mut node.line)
    }

    /// Handle to the line after `id`, if any.
    pub fn next(&self, id: LineId) -> Option<LineId> {
        let next = self.node(id)?.next?;
        Some(self.id_of(next))
    }

    /// Handle to the line before `id`, if any.
    pub fn prev(&self, id: LineId) -> Option<LineId> {
        let prev = self.node(id)?.prev?;
        Some(self.id_of(prev))
    }

    /// Handle to the line at `row` (0-indexed). O(row).
    pub fn nth(&self, row: usize) -> Option<LineId> {
        let mut slot = self.head;
        for _ in 0..row {
            slot = self.slots[slot].node.as_ref()?.next?;
        }
        Some(self.id_of(slot))
    }

    /// Row of the line named by `id`. O(n); used for consistency checks.
    pub fn row_of(&self, id: LineId) -> Option<usize> {
        self.node(id)?;
        let mut slot = Some(self.head);
        let mut row = 0;
        while let Some(current) = slot {
            if current == id.slot {
                return Some(row);
            }
            slot = self.slots[current].node.as_ref().and_then(|node| node.next);
            row += 1;
        }
        None
    }

    /// Links `line` in directly after `id` and returns its handle.
    ///
    /// Returns `None` (and drops nothing) if `id` does not resolve.
    pub fn insert_after(&mut self, id: LineId, line: Line) -> Option<LineId> {
        let next = self.node(id)?.next;
        let slot = self.alloc(Node {
            line,
            prev: Some(id.slot),
            next,
        });

        if let Some(node) = self.slots[id.slot].node.as_mut() {
            node.next = Some(slot);
        }
        match next {
            Some(next) => {
                if let Some(node) = self.slots[next].node.as_mut() {
                    node.prev = Some(slot);
                }
            }
            None => self.tail = slot,
        }
        self.len += 1;
        Some(self.id_of(slot))
    }

    /// Unlinks the line named by `id` and returns it.
    ///
    /// Refuses to remove the only remaining line; returns `None` in that
    /// case or if `id` does not resolve.
    pub fn remove(&mut self, id: LineId) -> Option<Line> {
        if self.len == 1 || !self.contains(id) {
            return None;
        }

        let slot = &mut self.slots[id.slot];
        let node = slot.node.take()?;
        slot.generation = slot.generation.wrapping_add(1);
        self.free.push(id.slot);

        match node.prev {
            Some(prev) => {
                if let Some(prev_node) = self.slots[prev].node.as_mut() {
                    prev_node.next = node.next;
                }
            }
            None => {
                if let Some(next) = node.next {
                    self.head = next;
                }
            }
        }
        match node.next {
            Some(next) => {
                if let Some(next_node) = self.slots[next].node.as_mut() {
                    next_node.prev = node.prev;
                }
            }
            None => {
                if let Some(prev) = node.prev {
                    self.tail = prev;
                }
            }
        }

        self.len -= 1;
        Some(node.line)
    }

    /// Iterates over the lines in document order.
    pub fn iter(&self) -> Iter<'_> {
        Iter {
            arena: self,
            slot: Some(self.head),
            remaining: self.len,
        }
    }

    // ==================== Internals ====================

    fn id_of(&self, slot: usize) -> LineId {
        LineId {
            arena: self.id,
            slot,
            generation: self.slots[slot].generation,
        }
    }

    fn node(&self, id: LineId) -> Option<&Node> {
        if id.arena != self.id {
            return None;
        }
        let slot = self.slots.get(id.slot)?;
        if slot.generation != id.generation {
            return None;
        }
        slot.node.as_ref()
    }

    fn node_mut(&mut self, id: LineId) -> Option<&mut Node> {
        if id.arena != self.id {
            return None;
        }
        let slot = self.slots.get_mut(id.slot)?;
        if slot.generation != id.generation {
            return None;
        }
        slot.node.as_mut()
    }

    fn alloc(&mut self, node: Node) -> usize {
        match self.free.pop() {
            Some(slot) => {
                self.slots[slot].node = Some(node);
                slot
            }
            None => {
                self.slots.push(Slot {
                    generation: 0,
                    node: Some(node),
                });
                self.slots.len() - 1
            }
        }
    }

    fn push_back(&mut self, line: Line) {
        if self.len == 0 {
            let slot = self.alloc(Node {
                line,
                prev: None,
                next: None,
            });
            self.head = slot;
            self.tail = slot;
            self.len = 1;
        } else {
            let tail = self.last();
            let inserted = self.insert_after(tail, line);
            debug_assert!(inserted.is_some(), "tail handle must resolve");
        }
    }
}

impl Default for LineArena {
    fn default() -> Self {
        Self::new()
    }
}

/// Iterator over the lines of a [`LineArena`] in document order.
#[derive(Debug)]
pub struct Iter<'a> {
    arena: &'a LineArena,
    slot: Option<usize>,
    remaining: usize,
}

impl<'a> Iterator for Iter<'a> {
    type Item = &'a Line;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.arena.slots[self.slot?].node.as_ref()?;
        self.slot = node.next;
        self.remaining = self.remaining.saturating_sub(1);
        Some(&node.line)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl ExactSizeIterator for Iter<'_> {}

impl<'a> IntoIterator for &'a LineArena {
    type Item = &'a Line;
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
