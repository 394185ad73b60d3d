//! 最小优先队列
//!
//! 基于 priority-queue 的索引堆：同一元素重复插入时替换其优先级
//! （即 decrease-key），因此队列中不存在过期条目。
//! 优先级相同时按插入先后出队。

use priority_queue::PriorityQueue;
use std::cmp::{Ordering, Reverse};
use std::hash::Hash;

/// 堆键：优先级 + 插入序号
#[derive(Debug, Clone, Copy)]
struct Key {
    priority: f64,
    seq: u64,
}

impl PartialEq for Key {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Key {}

impl PartialOrd for Key {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Key {
    fn cmp(&self, other: &Self) -> Ordering {
        self.priority
            .total_cmp(&other.priority)
            .then(self.seq.cmp(&other.seq))
    }
}

/// 最小优先队列
#[derive(Debug, Clone)]
pub struct MinQueue<T: Hash + Eq> {
    heap: PriorityQueue<T, Reverse<Key>>,
    /// 下一个插入序号
    seq: u64,
}

impl<T: Hash + Eq> Default for MinQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Hash + Eq> MinQueue<T> {
    /// 创建空队列
    pub fn new() -> Self {
        Self {
            heap: PriorityQueue::new(),
            seq: 0,
        }
    }

    /// 插入元素；元素已在队列中时更新其优先级
    pub fn insert(&mut self, item: T, priority: f64) {
        let key = Key {
            priority,
            seq: self.seq,
        };
        self.seq += 1;
        self.heap.push(item, Reverse(key));
    }

    /// 取出优先级最小的元素
    pub fn extract_min(&mut self) -> Option<(T, f64)> {
        self.heap
            .pop()
            .map(|(item, Reverse(key))| (item, key.priority))
    }

    /// 查看最小元素
    pub fn peek(&self) -> Option<(&T, f64)> {
        self.heap
            .peek()
            .map(|(item, Reverse(key))| (item, key.priority))
    }

    /// 最小优先级，队列为空时返回正无穷
    pub fn peek_min_priority(&self) -> f64 {
        self.peek().map(|(_, p)| p).unwrap_or(f64::INFINITY)
    }

    /// 元素当前的优先级
    pub fn priority_of(&self, item: &T) -> Option<f64> {
        self.heap.get(item).map(|(_, Reverse(key))| key.priority)
    }

    pub fn contains(&self, item: &T) -> bool {
        self.heap.get(item).is_some()
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }

    pub fn clear(&mut self) {
        self.heap.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extracts_in_priority_order() {
        let mut q = MinQueue::new();
        q.insert("c", 3.0);
        q.insert("a", 1.0);
        q.insert("b", 2.0);

        assert_eq!(q.len(), 3);
        assert_eq!(q.extract_min(), Some(("a", 1.0)));
        assert_eq!(q.extract_min(), Some(("b", 2.0)));
        assert_eq!(q.extract_min(), Some(("c", 3.0)));
        assert_eq!(q.extract_min(), None);
        assert!(q.is_empty());
    }

    #[test]
    fn test_ties_follow_insertion_order() {
        let mut q = MinQueue::new();
        for item in [5, 1, 4, 2, 3] {
            q.insert(item, 7.0);
        }
        let order: Vec<i32> = std::iter::from_fn(|| q.extract_min().map(|(i, _)| i)).collect();
        assert_eq!(order, vec![5, 1, 4, 2, 3]);
    }

    #[test]
    fn test_reinsert_replaces_priority() {
        let mut q = MinQueue::new();
        q.insert('x', 10.0);
        q.insert('y', 5.0);
        q.insert('x', 1.0);

        assert_eq!(q.len(), 2);
        assert_eq!(q.priority_of(&'x'), Some(1.0));
        assert_eq!(q.extract_min(), Some(('x', 1.0)));
        assert_eq!(q.extract_min(), Some(('y', 5.0)));
    }

    #[test]
    fn test_peek_min_priority_sentinel() {
        let mut q: MinQueue<u32> = MinQueue::new();
        assert_eq!(q.peek_min_priority(), f64::INFINITY);
        q.insert(1, 2.5);
        q.insert(2, f64::INFINITY);
        assert_eq!(q.peek_min_priority(), 2.5);
        assert!(q.contains(&2));
        q.clear();
        assert!(q.peek().is_none());
    }

    #[test]
    fn test_infinity_sorts_after_finite() {
        let mut q = MinQueue::new();
        q.insert(1, f64::INFINITY);
        q.insert(2, 1e300);
        assert_eq!(q.extract_min().map(|(i, _)| i), Some(2));
    }
}
