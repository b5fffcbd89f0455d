/// A small keyed arena with slot reuse.
///
/// A `Slab` stores values in a vector of optional slots and hands out the
/// slot index as a key. Removed slots are pushed onto a free list and reused
/// by later insertions, so keys stay small even when registrations churn.
///
/// The cancellation token keeps its registered wakers here: a blocked
/// primitive inserts its waker, keeps the key, and removes it when the wait
/// ends.
pub(crate) struct Slab<T> {
    /// Storage for items; `None` marks a vacant slot.
    items: Vec<Option<T>>,
    /// Stack of vacant indices that can be reused.
    free: Vec<usize>,
}

impl<T> Slab<T> {
    /// Creates an empty slab.
    pub(crate) const fn new() -> Self {
        Self {
            items: Vec::new(),
            free: Vec::new(),
        }
    }

    /// Inserts a value and returns its key.
    ///
    /// A vacant slot is reused if one exists, otherwise the slab grows by one.
    pub(crate) fn insert(&mut self, item: T) -> usize {
        match self.free.pop() {
            Some(index) => {
                self.items[index] = Some(item);
                index
            }
            None => {
                self.items.push(Some(item));
                self.items.len() - 1
            }
        }
    }

    /// Removes and returns the value stored under `key`.
    ///
    /// Returns `None` if the key is out of range or its slot is vacant,
    /// which makes removal after a [`drain`](Self::drain) harmless.
    pub(crate) fn remove(&mut self, key: usize) -> Option<T> {
        let item = self.items.get_mut(key)?.take()?;
        self.free.push(key);
        Some(item)
    }

    /// Removes every stored value, in key order.
    pub(crate) fn drain(&mut self) -> Vec<T> {
        self.free.clear();
        self.items.drain(..).flatten().collect()
    }

    /// Number of occupied slots.
    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.items.len() - self.free.len()
    }
}
