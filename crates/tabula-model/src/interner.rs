//! Dense interning arena backing the vocabulary.

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::borrow::Borrow;
use std::collections::HashMap;
use std::hash::Hash;

/// Stores each distinct key once and hands out its position as a handle.
#[derive(Debug, Clone)]
pub(crate) struct Interner<K> {
    items: Vec<K>,
    index: HashMap<K, u32>,
}

impl<K> Default for Interner<K> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            index: HashMap::new(),
        }
    }
}

impl<K: Eq + Hash + Clone> Interner<K> {
    pub(crate) fn intern(&mut self, key: K) -> u32 {
        if let Some(&id) = self.index.get(&key) {
            return id;
        }
        debug_assert!(self.items.len() < u32::MAX as usize, "interner exhausted");
        let id = self.items.len() as u32;
        self.index.insert(key.clone(), id);
        self.items.push(key);
        id
    }

    pub(crate) fn lookup<Q>(&self, key: &Q) -> Option<u32>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.index.get(key).copied()
    }

    pub(crate) fn get(&self, id: u32) -> Option<&K> {
        self.items.get(id as usize)
    }

    pub(crate) fn len(&self) -> usize {
        self.items.len()
    }
}

impl<K: PartialEq> PartialEq for Interner<K> {
    fn eq(&self, other: &Self) -> bool {
        self.items == other.items
    }
}

impl<K: Eq> Eq for Interner<K> {}

impl<K: Serialize> Serialize for Interner<K> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.items.serialize(serializer)
    }
}

impl<'de, K> Deserialize<'de> for Interner<K>
where
    K: Deserialize<'de> + Eq + Hash + Clone,
{
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let items = Vec::<K>::deserialize(deserializer)?;
        let mut interner = Interner::default();
        for item in items {
            let expected = interner.len() as u32;
            if interner.intern(item) != expected {
                return Err(D::Error::custom("duplicate entry in interned table"));
            }
        }
        Ok(interner)
    }
}
