//! The display filter chain
//!
//! An ordered, mutable list of filter instances. `apply` runs every enabled
//! filter in insertion order over the same buffer, each filter's output
//! feeding the next in place. Order is stable under enable/disable of
//! unrelated entries; removing a filter releases its derived state (and any
//! transform handles) immediately.

use serde_json::Value;

use crate::filter::Filter;
use crate::notify::FilterId;
use crate::region::PixelRegion;
use crate::Result;

#[derive(Debug, Default)]
pub struct FilterChain {
    filters: Vec<Filter>,
}

impl FilterChain {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.filters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Filter> {
        self.filters.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Filter> {
        self.filters.iter_mut()
    }

    pub fn get(&self, id: FilterId) -> Option<&Filter> {
        self.filters.iter().find(|f| f.id() == id)
    }

    pub fn get_mut(&mut self, id: FilterId) -> Option<&mut Filter> {
        self.filters.iter_mut().find(|f| f.id() == id)
    }

    fn position(&self, id: FilterId) -> Option<usize> {
        self.filters.iter().position(|f| f.id() == id)
    }

    /// Append a filter; it applies after every existing entry
    pub fn add(&mut self, filter: Filter) -> FilterId {
        let id = filter.id();
        tracing::debug!(filter = filter.descriptor().name, "added to chain");
        self.filters.push(filter);
        id
    }

    /// Insert a filter at an explicit position (clamped to the end)
    pub fn insert(&mut self, index: usize, filter: Filter) -> FilterId {
        let id = filter.id();
        let index = index.min(self.filters.len());
        tracing::debug!(
            filter = filter.descriptor().name,
            index,
            "inserted into chain"
        );
        self.filters.insert(index, filter);
        id
    }

    /// Remove a filter, tearing down its derived state right away
    pub fn remove(&mut self, id: FilterId) -> Option<Filter> {
        let index = self.position(id)?;
        let mut filter = self.filters.remove(index);
        filter.invalidate();
        tracing::debug!(filter = filter.descriptor().name, "removed from chain");
        Some(filter)
    }

    /// Move a filter to a new position, preserving the relative order of
    /// the others. Returns false if the filter is not in this chain.
    pub fn reorder(&mut self, id: FilterId, new_index: usize) -> bool {
        let Some(index) = self.position(id) else {
            return false;
        };
        let filter = self.filters.remove(index);
        let new_index = new_index.min(self.filters.len());
        self.filters.insert(new_index, filter);
        true
    }

    /// Apply every enabled filter in order, in place
    ///
    /// Deterministic: the same chain configuration over the same input
    /// yields byte-identical output on every run.
    pub fn apply(&mut self, region: &mut PixelRegion<'_>) -> Result<()> {
        for filter in &mut self.filters {
            filter.apply(region)?;
        }
        Ok(())
    }

    /// Persist the whole chain as an ordered list of per-filter blobs
    pub fn to_state(&self) -> Result<Value> {
        let mut entries = Vec::with_capacity(self.filters.len());
        for filter in &self.filters {
            entries.push(filter.to_state()?);
        }
        Ok(Value::Array(entries))
    }

    /// Restore a chain from persisted state
    ///
    /// Entries with an unknown filter tag (or no decodable parameters) are
    /// skipped so configurations written by newer versions still load.
    pub fn from_state(state: &Value) -> Self {
        let mut chain = Self::new();
        let Some(entries) = state.as_array() else {
            tracing::warn!("chain state is not a list, starting empty");
            return chain;
        };
        for entry in entries {
            match Filter::from_state(entry) {
                Ok(filter) => {
                    chain.add(filter);
                }
                Err(e) => {
                    tracing::warn!("skipping unloadable chain entry: {e}");
                }
            }
        }
        chain
    }
}
