use std::collections::VecDeque;

use hashbrown::HashSet;

pub type VoxelPos = (i32, i32, i32);

/// FIFO of voxels awaiting `on_update`. A voxel already waiting is not queued
/// twice; it can be queued again once it has been popped.
#[derive(Clone, Debug, Default)]
pub struct UpdateQueue {
    order: VecDeque<VoxelPos>,
    pending: HashSet<VoxelPos>,
}

impl UpdateQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `false` when the voxel was already waiting.
    pub fn push(&mut self, pos: VoxelPos) -> bool {
        if !self.pending.insert(pos) {
            return false;
        }
        self.order.push_back(pos);
        true
    }

    pub fn pop(&mut self) -> Option<VoxelPos> {
        let pos = self.order.pop_front()?;
        self.pending.remove(&pos);
        Some(pos)
    }

    #[inline]
    pub fn contains(&self, pos: VoxelPos) -> bool {
        self.pending.contains(&pos)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.order.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

/// Outcome of one [`World::tick`](crate::World::tick).
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct TickStats {
    pub processed: usize,
    /// Entries left for the next tick.
    pub deferred: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duplicates_coalesce_until_popped() {
        let mut q = UpdateQueue::new();
        assert!(q.push((1, 2, 3)));
        assert!(!q.push((1, 2, 3)));
        assert!(q.push((0, 0, 0)));
        assert_eq!(q.len(), 2);
        assert_eq!(q.pop(), Some((1, 2, 3)));
        assert!(!q.contains((1, 2, 3)));
        assert!(q.push((1, 2, 3)));
        assert_eq!(q.pop(), Some((0, 0, 0)));
        assert_eq!(q.pop(), Some((1, 2, 3)));
        assert_eq!(q.pop(), None);
    }
}
