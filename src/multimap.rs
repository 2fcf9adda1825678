//! Insertion-ordered map from string keys to one or many values.
//!
//! Every container in the document tree (definitions, scans, sections and
//! the document itself) stores its children in an [`OrderedMultiMap`], so
//! the grouping-under-repeated-keys behavior is implemented exactly once.

use indexmap::map::Entry as Slot;
use indexmap::IndexMap;

/// The value side of an [`OrderedMultiMap`] slot: a single value until the
/// same key is inserted a second time, an ordered list from then on.
///
/// A `Many` produced by the map always holds at least two values; a key
/// inserted once stays `One` (never a one-element list).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OneOrMany<V> {
    One(V),
    Many(Vec<V>),
}

impl<V> OneOrMany<V> {
    /// All values in the slot, oldest first.
    pub fn as_slice(&self) -> &[V] {
        match self {
            OneOrMany::One(v) => std::slice::from_ref(v),
            OneOrMany::Many(vs) => vs,
        }
    }

    pub fn as_mut_slice(&mut self) -> &mut [V] {
        match self {
            OneOrMany::One(v) => std::slice::from_mut(v),
            OneOrMany::Many(vs) => vs,
        }
    }

    pub fn iter(&self) -> std::slice::Iter<'_, V> {
        self.as_slice().iter()
    }

    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, V> {
        self.as_mut_slice().iter_mut()
    }

    pub fn first(&self) -> Option<&V> {
        self.as_slice().first()
    }

    pub fn len(&self) -> usize {
        self.as_slice().len()
    }

    pub fn is_empty(&self) -> bool {
        self.as_slice().is_empty()
    }

    /// Appends a value, promoting `One` to `Many` on first growth.
    fn push(&mut self, value: V) {
        let current = std::mem::replace(self, OneOrMany::Many(Vec::new()));
        *self = match current {
            OneOrMany::One(first) => OneOrMany::Many(vec![first, value]),
            OneOrMany::Many(mut vs) => {
                vs.push(value);
                OneOrMany::Many(vs)
            }
        };
    }
}

/// Insertion-ordered map with duplicate-key grouping.
///
/// Distinct keys iterate in the order they were first inserted, no matter
/// how often a key's slot grew afterwards. Inserting an existing key
/// promotes its slot to an ordered list in place ([`insert`]); replacing a
/// slot wholesale keeps its position ([`set`]).
///
/// Comments have no natural key, so [`insert_comment`] allocates synthetic
/// `comment-<n>` keys from a per-map counter. The counter only ever counts
/// up, so removed comment keys are never reused.
///
/// [`insert`]: OrderedMultiMap::insert
/// [`set`]: OrderedMultiMap::set
/// [`insert_comment`]: OrderedMultiMap::insert_comment
#[derive(Debug, Clone)]
pub struct OrderedMultiMap<V> {
    slots: IndexMap<String, OneOrMany<V>>,
    comments: usize,
}

impl<V> OrderedMultiMap<V> {
    pub fn new() -> Self {
        OrderedMultiMap {
            slots: IndexMap::new(),
            comments: 0,
        }
    }

    /// Number of keys (a promoted slot still counts once).
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.slots.contains_key(key)
    }

    pub fn get(&self, key: &str) -> Option<&OneOrMany<V>> {
        self.slots.get(key)
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut OneOrMany<V>> {
        self.slots.get_mut(key)
    }

    /// Adds a value under `key`. A new key lands at the end of the
    /// iteration order; an existing key grows its slot in place.
    pub fn insert(&mut self, key: impl Into<String>, value: V) {
        match self.slots.entry(key.into()) {
            Slot::Occupied(mut slot) => slot.get_mut().push(value),
            Slot::Vacant(slot) => {
                slot.insert(OneOrMany::One(value));
            }
        }
    }

    /// Replaces the whole slot under `key` with a single value. An
    /// existing key keeps its position; a new key lands at the end.
    pub fn set(&mut self, key: impl Into<String>, value: V) {
        self.slots.insert(key.into(), OneOrMany::One(value));
    }

    /// Adds a comment value under the next synthetic `comment-<n>` key
    /// (1-based) and returns that key.
    pub fn insert_comment(&mut self, value: V) -> String {
        self.comments += 1;
        let key = format!("comment-{}", self.comments);
        self.slots.insert(key.clone(), OneOrMany::One(value));
        key
    }

    /// Removes a key and its slot, closing the gap so the remaining keys
    /// keep their relative order.
    pub fn remove(&mut self, key: &str) -> Option<OneOrMany<V>> {
        self.slots.shift_remove(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.slots.keys().map(String::as_str)
    }

    pub fn values(&self) -> impl Iterator<Item = &OneOrMany<V>> {
        self.slots.values()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &OneOrMany<V>)> {
        self.slots.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl<V> Default for OrderedMultiMap<V> {
    fn default() -> Self {
        OrderedMultiMap::new()
    }
}

// IndexMap's own equality ignores order; document equality must not, so
// compare the two iteration sequences directly. The comment counter is
// bookkeeping and does not participate.
impl<V: PartialEq> PartialEq for OrderedMultiMap<V> {
    fn eq(&self, other: &Self) -> bool {
        self.slots.len() == other.slots.len()
            && self.slots.iter().zip(other.slots.iter()).all(|(a, b)| a == b)
    }
}

impl<V: Eq> Eq for OrderedMultiMap<V> {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_insert_stays_one() {
        let mut map = OrderedMultiMap::new();
        map.insert("station", 1);
        assert_eq!(map.get("station"), Some(&OneOrMany::One(1)));
    }

    #[test]
    fn second_insert_promotes_in_place() {
        let mut map = OrderedMultiMap::new();
        map.insert("a", 1);
        map.insert("b", 2);
        map.insert("a", 3);
        assert_eq!(map.get("a"), Some(&OneOrMany::Many(vec![1, 3])));
        assert_eq!(map.keys().collect::<Vec<_>>(), vec!["a", "b"]);
    }

    #[test]
    fn third_insert_appends() {
        let mut map = OrderedMultiMap::new();
        map.insert("a", 1);
        map.insert("a", 2);
        map.insert("a", 3);
        assert_eq!(map.get("a"), Some(&OneOrMany::Many(vec![1, 2, 3])));
        assert_eq!(map.len(), 1);
    }

    #[test]
    fn comment_keys_count_up() {
        let mut map = OrderedMultiMap::new();
        assert_eq!(map.insert_comment(10), "comment-1");
        map.insert("x", 11);
        assert_eq!(map.insert_comment(12), "comment-2");
        map.insert("y", 13);
        assert_eq!(map.insert_comment(14), "comment-3");
        assert_eq!(
            map.keys().collect::<Vec<_>>(),
            vec!["comment-1", "x", "comment-2", "y", "comment-3"]
        );
    }

    #[test]
    fn set_replaces_slot_keeping_position() {
        let mut map = OrderedMultiMap::new();
        map.insert("a", 1);
        map.insert("b", 2);
        map.insert("a", 3);
        map.set("a", 9);
        assert_eq!(map.get("a"), Some(&OneOrMany::One(9)));
        assert_eq!(map.keys().collect::<Vec<_>>(), vec!["a", "b"]);
    }

    #[test]
    fn remove_keeps_relative_order() {
        let mut map = OrderedMultiMap::new();
        map.insert("a", 1);
        map.insert("b", 2);
        map.insert("c", 3);
        assert_eq!(map.remove("b"), Some(OneOrMany::One(2)));
        assert_eq!(map.keys().collect::<Vec<_>>(), vec!["a", "c"]);
        assert!(!map.contains_key("b"));
    }

    #[test]
    fn equality_is_order_sensitive() {
        let mut left = OrderedMultiMap::new();
        left.insert("a", 1);
        left.insert("b", 2);
        let mut right = OrderedMultiMap::new();
        right.insert("b", 2);
        right.insert("a", 1);
        assert_ne!(left, right);

        let mut same = OrderedMultiMap::new();
        same.insert("a", 1);
        same.insert("b", 2);
        assert_eq!(left, same);
    }
}
