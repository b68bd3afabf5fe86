use serde::ser::{Serialize, SerializeSeq, Serializer};

/// Fixed-capacity ring buffer. The bound is the const parameter `N`; pushing
/// into a full ring overwrites the oldest slot.
#[derive(Debug, Clone, PartialEq)]
pub struct RingBuffer<T, const N: usize> {
    slots: [Option<T>; N],
    /// Index of the next slot to write.
    head: usize,
    len: usize,
}

impl<T, const N: usize> RingBuffer<T, N> {
    pub fn new() -> Self {
        Self {
            slots: std::array::from_fn(|_| None),
            head: 0,
            len: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Append a value, returning whatever it evicted.
    pub fn push(&mut self, value: T) -> Option<T> {
        if N == 0 {
            return Some(value);
        }

        let evicted = self.slots[self.head].replace(value);
        self.head = (self.head + 1) % N;
        if self.len < N {
            self.len += 1;
        }
        evicted
    }

    /// Iterate from the most recently pushed value to the oldest.
    pub fn iter_newest(&self) -> impl Iterator<Item = &T> + '_ {
        (0..self.len).filter_map(move |offset| {
            let idx = (self.head + N - 1 - offset) % N;
            self.slots[idx].as_ref()
        })
    }

    /// Iterate from the oldest value to the most recently pushed one.
    pub fn iter_oldest(&self) -> impl Iterator<Item = &T> + '_ {
        (0..self.len).filter_map(move |offset| {
            let idx = (self.head + N - self.len + offset) % N;
            self.slots[idx].as_ref()
        })
    }
}

impl<T, const N: usize> Default for RingBuffer<T, N> {
    fn default() -> Self {
        Self::new()
    }
}

// Serialized oldest first, the order a log reads in.
impl<T: Serialize, const N: usize> Serialize for RingBuffer<T, N> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(self.len))?;
        for item in self.iter_oldest() {
            seq.serialize_element(item)?;
        }
        seq.end()
    }
}
