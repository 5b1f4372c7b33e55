//! Dense slot storage with a free list of indices.
//!
//! Backs the alien torpedo pool (bounded) and the prize list (unbounded).
//! Insertion and removal are O(1); freed slots are reused before the
//! backing vector grows.

#[derive(Clone, Debug)]
pub struct Arena<T> {
    slots: Vec<Option<T>>,
    free: Vec<usize>,
    len: usize,
    capacity: Option<usize>,
}

impl<T> Default for Arena<T> {
    fn default() -> Self {
        Self::unbounded()
    }
}

impl<T> Arena<T> {
    /// An arena that refuses inserts once `capacity` values are live.
    pub fn bounded(capacity: usize) -> Self {
        Arena {
            slots: Vec::with_capacity(capacity),
            free: Vec::new(),
            len: 0,
            capacity: Some(capacity),
        }
    }

    pub fn unbounded() -> Self {
        Arena {
            slots: Vec::new(),
            free: Vec::new(),
            len: 0,
            capacity: None,
        }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn capacity(&self) -> Option<usize> {
        self.capacity
    }

    pub fn is_full(&self) -> bool {
        self.capacity.is_some_and(|cap| self.len >= cap)
    }

    /// Number of backing slots ever allocated, live or free.
    pub fn slot_count(&self) -> usize {
        self.slots.len()
    }

    /// Stores `value` and returns its index, or `None` when full.
    pub fn insert(&mut self, value: T) -> Option<usize> {
        if self.is_full() {
            return None;
        }
        let index = match self.free.pop() {
            Some(index) => {
                self.slots[index] = Some(value);
                index
            }
            None => {
                self.slots.push(Some(value));
                self.slots.len() - 1
            }
        };
        self.len += 1;
        Some(index)
    }

    pub fn remove(&mut self, index: usize) -> Option<T> {
        let value = self.slots.get_mut(index)?.take()?;
        self.free.push(index);
        self.len -= 1;
        Some(value)
    }

    pub fn iter(&self) -> impl Iterator<Item = (usize, &T)> {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(i, slot)| slot.as_ref().map(|v| (i, v)))
    }

    /// Visits every live value; those for which `keep` returns false are freed.
    pub fn retain_mut<F>(&mut self, mut keep: F)
    where
        F: FnMut(&mut T) -> bool,
    {
        for (index, slot) in self.slots.iter_mut().enumerate() {
            let drop_it = match slot {
                Some(value) => !keep(value),
                None => false,
            };
            if drop_it {
                *slot = None;
                self.free.push(index);
                self.len -= 1;
            }
        }
    }

    /// Frees every value and applies a new bound.
    pub fn reset(&mut self, capacity: Option<usize>) {
        self.slots.clear();
        self.free.clear();
        self.len = 0;
        self.capacity = capacity;
    }
}
