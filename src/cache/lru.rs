//! LRU List Module
//!
//! Recency index for cache eviction: an arena-backed doubly linked list.
//!
//! Nodes live in a `Vec` and link to each other by slot index instead of
//! pointers. Vacated slots are chained into a free list and reused by later
//! pushes, so a slot index stays valid until the item in it is removed.

// Null link
const NIL: usize = usize::MAX;

#[derive(Debug)]
struct Node<T> {
    item: T,
    prev: usize,
    next: usize,
}

#[derive(Debug)]
enum Slot<T> {
    Occupied(Node<T>),
    Vacant { next_free: usize },
}

// == LRU List ==
/// Tracks recency order for LRU eviction.
///
/// - Head (front) = least recently used
/// - Tail (back) = most recently used
///
/// Push, remove, move-to-back and pop-front are all O(1).
#[derive(Debug)]
pub struct LruList<T> {
    slots: Vec<Slot<T>>,
    head: usize,
    tail: usize,
    free: usize,
    len: usize,
}

impl<T> Default for LruList<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> LruList<T> {
    // == Constructor ==
    /// Creates a new empty list.
    pub fn new() -> Self {
        Self {
            slots: Vec::new(),
            head: NIL,
            tail: NIL,
            free: NIL,
            len: 0,
        }
    }

    // == Push Back ==
    /// Appends an item at the most recently used end and returns its slot.
    pub fn push_back(&mut self, item: T) -> usize {
        let tail = self.tail;
        let idx = self.alloc(Node {
            item,
            prev: tail,
            next: NIL,
        });

        match self.node_mut(tail) {
            Some(node) => node.next = idx,
            None => self.head = idx,
        }
        self.tail = idx;
        self.len += 1;
        idx
    }

    // == Remove ==
    /// Unlinks the item in `slot` and frees the slot for reuse.
    pub fn remove(&mut self, slot: usize) -> Option<T> {
        self.node(slot)?;
        self.unlink(slot);

        let vacated = std::mem::replace(
            &mut self.slots[slot],
            Slot::Vacant {
                next_free: self.free,
            },
        );
        self.free = slot;
        self.len -= 1;

        match vacated {
            Slot::Occupied(node) => Some(node.item),
            Slot::Vacant { .. } => None,
        }
    }

    // == Move To Back ==
    /// Marks the item in `slot` as most recently used.
    ///
    /// Returns false if the slot is vacant.
    pub fn move_to_back(&mut self, slot: usize) -> bool {
        if self.node(slot).is_none() {
            return false;
        }
        if self.tail == slot {
            return true;
        }

        self.unlink(slot);
        let tail = self.tail;
        if let Some(node) = self.node_mut(slot) {
            node.prev = tail;
            node.next = NIL;
        }
        match self.node_mut(tail) {
            Some(node) => node.next = slot,
            None => self.head = slot,
        }
        self.tail = slot;
        true
    }

    // == Pop Front ==
    /// Removes and returns the least recently used item.
    ///
    /// Returns None if the list is empty.
    pub fn pop_front(&mut self) -> Option<T> {
        let head = self.head;
        self.remove(head)
    }

    // == Peek Front ==
    /// Returns the least recently used item without removing it.
    pub fn front(&self) -> Option<&T> {
        self.get(self.head)
    }

    // == Peek Back ==
    #[allow(dead_code)]
    pub fn back(&self) -> Option<&T> {
        self.get(self.tail)
    }

    pub fn get(&self, slot: usize) -> Option<&T> {
        self.node(slot).map(|node| &node.item)
    }

    pub fn get_mut(&mut self, slot: usize) -> Option<&mut T> {
        self.node_mut(slot).map(|node| &mut node.item)
    }

    // == Iterate ==
    /// Iterates `(slot, item)` pairs from least to most recently used.
    pub fn iter(&self) -> Iter<'_, T> {
        Iter {
            list: self,
            current: self.head,
            remaining: self.len,
        }
    }

    // == Compact ==
    /// Renumbers live items densely from slot 0 in recency order.
    ///
    /// Drops the free list and releases spare capacity. Relative order is
    /// unchanged, but every previously returned slot index is invalidated.
    pub fn compact(&mut self) {
        let mut old: Vec<Option<Node<T>>> = std::mem::take(&mut self.slots)
            .into_iter()
            .map(|slot| match slot {
                Slot::Occupied(node) => Some(node),
                Slot::Vacant { .. } => None,
            })
            .collect();

        let mut slots: Vec<Slot<T>> = Vec::with_capacity(self.len);
        let mut current = self.head;
        while let Some(node) = old.get_mut(current).and_then(Option::take) {
            current = node.next;
            let idx = slots.len();
            if let Some(Slot::Occupied(prev)) = idx.checked_sub(1).and_then(|p| slots.get_mut(p)) {
                prev.next = idx;
            }
            slots.push(Slot::Occupied(Node {
                item: node.item,
                prev: idx.checked_sub(1).unwrap_or(NIL),
                next: NIL,
            }));
        }

        self.len = slots.len();
        self.head = if slots.is_empty() { NIL } else { 0 };
        self.tail = slots.len().checked_sub(1).unwrap_or(NIL);
        self.free = NIL;
        self.slots = slots;
    }

    // == Clear ==
    pub fn clear(&mut self) {
        self.slots = Vec::new();
        self.head = NIL;
        self.tail = NIL;
        self.free = NIL;
        self.len = 0;
    }

    // == Length ==
    /// Returns the number of live items.
    pub fn len(&self) -> usize {
        self.len
    }

    // == Is Empty ==
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of arena slots, vacant ones included.
    pub fn slot_count(&self) -> usize {
        self.slots.len()
    }

    fn node(&self, slot: usize) -> Option<&Node<T>> {
        match self.slots.get(slot) {
            Some(Slot::Occupied(node)) => Some(node),
            _ => None,
        }
    }

    fn node_mut(&mut self, slot: usize) -> Option<&mut Node<T>> {
        match self.slots.get_mut(slot) {
            Some(Slot::Occupied(node)) => Some(node),
            _ => None,
        }
    }

    fn alloc(&mut self, node: Node<T>) -> usize {
        let free = self.free;
        match self.slots.get(free) {
            Some(Slot::Vacant { next_free }) => {
                self.free = *next_free;
                self.slots[free] = Slot::Occupied(node);
                free
            }
            _ => {
                self.slots.push(Slot::Occupied(node));
                self.slots.len() - 1
            }
        }
    }

    // Detaches the node from its neighbours; the slot stays occupied.
    fn unlink(&mut self, slot: usize) {
        let (prev, next) = match self.node(slot) {
            Some(node) => (node.prev, node.next),
            None => return,
        };

        match self.node_mut(prev) {
            Some(node) => node.next = next,
            None => self.head = next,
        }
        match self.node_mut(next) {
            Some(node) => node.prev = prev,
            None => self.tail = prev,
        }
    }
}

// == Iterator ==
/// Iterator over `(slot, item)` pairs, least recently used first.
pub struct Iter<'a, T> {
    list: &'a LruList<T>,
    current: usize,
    remaining: usize,
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = (usize, &'a T);

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let slot = self.current;
        let node = self.list.node(slot)?;
        self.current = node.next;
        self.remaining -= 1;
        Some((slot, &node.item))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<T> ExactSizeIterator for Iter<'_, T> {}
