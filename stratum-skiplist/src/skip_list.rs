use std::{
    fmt::{self, Debug, Display, Write},
    marker::PhantomData,
    mem,
    ptr::NonNull,
};

use crate::{
    error::{Error, Result},
    level::{DEFAULT_PROBABILITY, GeometricLevel, LevelGenerator},
};

type Link<K, V> = Option<NonNull<Node<K, V>>>;

/// Anything holding a tower of forward links: the head or a node.
trait Forward<K, V> {
    fn get_next(&self, level: usize) -> Link<K, V>;

    fn set_next(&mut self, level: usize, next: Link<K, V>);
}

struct Head<K, V> {
    tower: Box<[Link<K, V>]>,
}

impl<K, V> Head<K, V> {
    fn new(max_level: usize) -> Self {
        Self {
            tower: vec![None; max_level].into_boxed_slice(),
        }
    }
}

impl<K, V> Forward<K, V> for Head<K, V> {
    fn get_next(&self, level: usize) -> Link<K, V> {
        self.tower.get(level).copied().flatten()
    }

    fn set_next(&mut self, level: usize, next: Link<K, V>) {
        self.tower[level] = next;
    }
}

struct Node<K, V> {
    key: K,
    value: V,
    // levels 0..=level of this node
    tower: Box<[Link<K, V>]>,
}

impl<K, V> Node<K, V> {
    fn new(key: K, value: V, level: usize) -> NonNull<Self> {
        let node = Box::new(Node {
            key,
            value,
            tower: vec![None; level + 1].into_boxed_slice(),
        });
        NonNull::from(Box::leak(node))
    }

    fn level(&self) -> usize {
        self.tower.len() - 1
    }
}

impl<K, V> Forward<K, V> for Node<K, V> {
    fn get_next(&self, level: usize) -> Link<K, V> {
        self.tower.get(level).copied().flatten()
    }

    fn set_next(&mut self, level: usize, next: Link<K, V>) {
        self.tower[level] = next;
    }
}

/// A position during traversal.
enum Cursor<K, V> {
    Head,
    Node(NonNull<Node<K, V>>),
}

impl<K, V> Clone for Cursor<K, V> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<K, V> Copy for Cursor<K, V> {}

/// An ordered map on a skip list.
///
/// Every node is linked on level 0; a node drawn at level `n` is also linked
/// on levels `1..=n`, which lets lookups skip over runs of lower nodes.
pub struct SkipList<K, V, L = GeometricLevel> {
    head: Head<K, V>,
    level: usize,
    max_level: usize,
    len: usize,
    levels: L,
    _marker: PhantomData<Box<Node<K, V>>>,
}

unsafe impl<K, V, L> Send for SkipList<K, V, L>
where
    K: Send,
    V: Send,
    L: Send,
{
}

unsafe impl<K, V, L> Sync for SkipList<K, V, L>
where
    K: Sync,
    V: Sync,
    L: Sync,
{
}

impl<K, V> Default for SkipList<K, V> {
    fn default() -> Self {
        Self::from_generator(GeometricLevel::default())
    }
}

impl<K, V> SkipList<K, V> {
    /// Creates a list with `max_level` levels and promotion probability 0.5.
    pub fn new(max_level: usize) -> Result<Self> {
        Self::with_generator(GeometricLevel::new(max_level, DEFAULT_PROBABILITY)?)
    }

    pub fn probability(&self) -> f64 {
        self.levels.probability()
    }
}

impl<K, V, L> SkipList<K, V, L>
where
    L: LevelGenerator,
{
    /// Creates a list drawing node levels from `levels`.
    pub fn with_generator(levels: L) -> Result<Self> {
        if levels.max_level() == 0 {
            return Err(Error::InvalidMaxLevel(0));
        }
        Ok(Self::from_generator(levels))
    }

    fn from_generator(levels: L) -> Self {
        let max_level = levels.max_level();
        tracing::debug!(max_level, "create skip list");
        SkipList {
            head: Head::new(max_level),
            level: 0,
            max_level,
            len: 0,
            levels,
            _marker: PhantomData,
        }
    }

    fn random_level(&mut self) -> usize {
        let level = self.levels.random_level();
        debug_assert!(
            level < self.max_level,
            "level generator returned {level}, max level is {}",
            self.max_level
        );
        level.min(self.max_level - 1)
    }
}

impl<K, V, L> SkipList<K, V, L> {
    /// Highest level holding at least one node, 0 when empty.
    pub fn level(&self) -> usize {
        self.level
    }

    pub fn max_level(&self) -> usize {
        self.max_level
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn level_generator(&self) -> &L {
        &self.levels
    }

    /// Iterates level 0 in ascending key order.
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter {
            next: self.head.get_next(0),
            remaining: self.len,
            _marker: PhantomData,
        }
    }

    /// Keys linked on `level`, in order. Empty for levels above [`Self::level`].
    pub fn keys_at(&self, level: usize) -> Vec<&K> {
        let mut keys = Vec::new();
        let mut cur = self.head.get_next(level);
        while let Some(node) = cur {
            let node = unsafe { node.as_ref() };
            keys.push(&node.key);
            cur = node.get_next(level);
        }
        keys
    }

    fn next(&self, at: Cursor<K, V>, level: usize) -> Link<K, V> {
        match at {
            Cursor::Head => self.head.get_next(level),
            Cursor::Node(node) => unsafe { node.as_ref() }.get_next(level),
        }
    }

    fn set_next(&mut self, at: Cursor<K, V>, level: usize, next: Link<K, V>) {
        match at {
            Cursor::Head => self.head.set_next(level, next),
            Cursor::Node(mut node) => unsafe { node.as_mut() }.set_next(level, next),
        }
    }

    fn shrink_level(&mut self) {
        let from = self.level;
        while self.level > 0 && self.head.get_next(self.level).is_none() {
            self.level -= 1;
        }
        if self.level != from {
            tracing::debug!(from, to = self.level, "lower skip list level");
        }
    }
}

impl<K, V, L> SkipList<K, V, L>
where
    K: Ord,
{
    /// Walks from the top level down, calling `record` with the last position
    /// whose key is below `key` on every level. Returns that position on level 0.
    fn find_prev<F>(&self, key: &K, mut record: F) -> Cursor<K, V>
    where
        F: FnMut(usize, Cursor<K, V>),
    {
        let mut cur = Cursor::Head;
        for level in (0..=self.level).rev() {
            while let Some(next) = self.next(cur, level) {
                if unsafe { &next.as_ref().key } >= key {
                    break;
                }
                cur = Cursor::Node(next);
            }
            record(level, cur);
        }
        cur
    }

    fn find_eq(&self, key: &K) -> Link<K, V> {
        let prev = self.find_prev(key, |_, _| {});
        self.next(prev, 0)
            .filter(|node| unsafe { &node.as_ref().key } == key)
    }

    pub fn get(&self, key: &K) -> Option<&V> {
        self.find_eq(key).map(|node| unsafe { &(*node.as_ptr()).value })
    }

    pub fn get_mut(&mut self, key: &K) -> Option<&mut V> {
        self.find_eq(key)
            .map(|node| unsafe { &mut (*node.as_ptr()).value })
    }

    pub fn contains_key(&self, key: &K) -> bool {
        self.find_eq(key).is_some()
    }

    /// Removes `key` and returns its value, `None` if it was absent.
    pub fn remove(&mut self, key: &K) -> Option<V> {
        self.remove_entry(key).map(|(_, value)| value)
    }

    pub fn remove_entry(&mut self, key: &K) -> Option<(K, V)> {
        let mut prev = vec![Cursor::Head; self.max_level];
        let last = self.find_prev(key, |level, at| prev[level] = at);

        let Some(target) = self
            .next(last, 0)
            .filter(|node| unsafe { &node.as_ref().key } == key)
        else {
            tracing::trace!("remove missed");
            return None;
        };

        let height = unsafe { target.as_ref() }.level();
        debug_assert!(height <= self.level);
        for (level, at) in prev.iter().copied().enumerate().take(height + 1) {
            let next = unsafe { target.as_ref() }.get_next(level);
            self.set_next(at, level, next);
        }

        let node = unsafe { Box::from_raw(target.as_ptr()) };
        self.len -= 1;
        self.shrink_level();
        tracing::trace!(height, len = self.len, "remove node");

        Some((node.key, node.value))
    }
}

impl<K, V, L> SkipList<K, V, L>
where
    K: Ord,
    L: LevelGenerator,
{
    /// Inserts `key`, returning the previous value if the key was present.
    ///
    /// A present key keeps its node and only has its value swapped.
    pub fn insert(&mut self, key: K, value: V) -> Option<V> {
        let mut prev = vec![Cursor::Head; self.max_level];
        let last = self.find_prev(&key, |level, at| prev[level] = at);

        if let Some(node) = self.next(last, 0) {
            let node = unsafe { &mut *node.as_ptr() };
            if node.key == key {
                tracing::trace!("update in place");
                return Some(mem::replace(&mut node.value, value));
            }
        }

        // levels above the old top keep `Cursor::Head` as predecessor
        let height = self.random_level();
        if height > self.level {
            tracing::debug!(from = self.level, to = height, "raise skip list level");
            self.level = height;
        }

        let new_node = Node::new(key, value, height);
        for (level, at) in prev.iter().copied().enumerate().take(height + 1) {
            let next = self.next(at, level);
            unsafe { (*new_node.as_ptr()).set_next(level, next) };
            self.set_next(at, level, Some(new_node));
        }

        self.len += 1;
        tracing::trace!(height, len = self.len, "insert node");
        None
    }
}

impl<K, V, L> Drop for SkipList<K, V, L> {
    fn drop(&mut self) {
        let mut cur = self.head.get_next(0);
        while let Some(node) = cur {
            let node = unsafe { Box::from_raw(node.as_ptr()) };
            cur = node.get_next(0);
        }
    }
}

impl<K, V, L> Debug for SkipList<K, V, L>
where
    K: Debug,
    V: Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

/// Draws every level, highest first, with higher levels aligned above level 0:
///
/// ```text
/// L1: -----> (6) ---------------> (12)
/// L0: (3) -> (6) -> (7) -> (9) -> (12)
/// ```
impl<K, V, L> Display for SkipList<K, V, L>
where
    K: Display,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut base = String::new();
        let mut offsets = Vec::with_capacity(self.len);
        let mut cur = self.head.get_next(0);
        while let Some(node) = cur {
            if !base.is_empty() {
                base.push_str(" -> ");
            }
            offsets.push((node, base.len()));
            let node = unsafe { node.as_ref() };
            write!(base, "({})", node.key)?;
            cur = node.get_next(0);
        }

        let mut lines = vec![base];
        for level in 1..=self.level {
            let mut line = String::new();
            let mut offset_idx = 0;
            let mut cur = self.head.get_next(level);
            while let Some(node) = cur {
                while offset_idx < offsets.len() && offsets[offset_idx].0 != node {
                    offset_idx += 1;
                }
                let Some(&(_, pos)) = offsets.get(offset_idx) else {
                    break;
                };
                if pos > line.len() {
                    line.push_str(&"-".repeat((pos - line.len()).saturating_sub(2)));
                    line.push_str("> ");
                }
                let node = unsafe { node.as_ref() };
                write!(line, "({}) ", node.key)?;
                cur = node.get_next(level);
            }
            lines.push(line.trim_end().to_string());
        }

        for (level, line) in lines.iter().enumerate().rev() {
            writeln!(f, "L{level}: {line}")?;
        }
        Ok(())
    }
}

pub struct Iter<'a, K, V> {
    next: Link<K, V>,
    remaining: usize,
    _marker: PhantomData<&'a Node<K, V>>,
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        let node: &'a Node<K, V> = unsafe { self.next?.as_ref() };
        self.next = node.get_next(0);
        self.remaining -= 1;
        Some((&node.key, &node.value))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K, V> ExactSizeIterator for Iter<'_, K, V> {}

impl<'a, K, V, L> IntoIterator for &'a SkipList<K, V, L> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
