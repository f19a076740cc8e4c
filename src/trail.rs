use crate::math::V3;

/// Fixed-capacity history of positions, newest first.
///
/// Backed by a ring buffer: pushing is O(1) and, once full, overwrites the
/// oldest sample in place.
#[derive(Debug, Clone)]
pub struct Trail {
    slots: Vec<V3>,
    capacity: usize,
    // Physical slot of logical index 0.
    head: usize,
}

impl Trail {
    pub fn new(capacity: usize) -> Self {
        Self {
            slots: Vec::with_capacity(capacity),
            capacity,
            head: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn push(&mut self, point: V3) {
        if self.capacity == 0 {
            return;
        }

        if self.slots.len() < self.capacity {
            self.slots.push(point);
            self.head = self.slots.len() - 1;
        } else {
            self.head = (self.head + 1) % self.capacity;
            self.slots[self.head] = point;
        }
    }

    /// Sample `index` pushes ago, `0` being the most recent.
    pub fn get(&self, index: usize) -> Option<V3> {
        if index >= self.slots.len() {
            return None;
        }

        let len = self.slots.len();
        let physical = (self.head + len - index) % len;
        Some(self.slots[physical])
    }

    pub fn newest(&self) -> Option<V3> {
        self.get(0)
    }

    pub fn iter(&self) -> impl Iterator<Item = V3> + '_ {
        (0..self.len()).filter_map(move |i| self.get(i))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn point(i: usize) -> V3 {
        V3::new(i as f32, 0.0, 0.0)
    }

    #[test]
    fn newest_first() {
        let mut trail = Trail::new(4);
        trail.push(point(1));
        trail.push(point(2));
        trail.push(point(3));

        assert_eq!(trail.len(), 3);
        assert_eq!(trail.newest(), Some(point(3)));
        assert_eq!(trail.iter().collect::<Vec<_>>(), vec![point(3), point(2), point(1)]);
        assert_eq!(trail.get(3), None);
    }

    #[test]
    fn evicts_oldest_when_full() {
        let mut trail = Trail::new(3);
        for i in 0..10 {
            trail.push(point(i));
            assert!(trail.len() <= trail.capacity());
            assert_eq!(trail.newest(), Some(point(i)));
        }

        assert_eq!(trail.len(), 3);
        assert_eq!(trail.iter().collect::<Vec<_>>(), vec![point(9), point(8), point(7)]);
    }

    #[test]
    fn wraparound_keeps_recency_order() {
        let mut trail = Trail::new(100);
        for i in 0..257 {
            trail.push(point(i));
        }

        assert_eq!(trail.len(), 100);
        for i in 0..100 {
            assert_eq!(trail.get(i), Some(point(256 - i)));
        }
    }

    #[test]
    fn zero_capacity_stays_empty() {
        let mut trail = Trail::new(0);
        trail.push(point(1));
        assert!(trail.is_empty());
        assert_eq!(trail.newest(), None);
    }
}
