//! Per-chunk block palette: maps compact `u32` indices to [`BlockStack`] values
//! and back.
//!
//! Section arrays store palette indices only. The palette is built while a
//! chunk snapshot is assembled and never changes once meshing starts.

use rustc_hash::FxHashMap;

use crate::block::BlockStack;
use crate::error::BlockError;

/// Bidirectional `index ↔ BlockStack` table for one chunk.
#[derive(Clone, Debug, Default)]
pub struct BlockPalette {
    /// Dense array where `index == position`.
    stacks: Vec<BlockStack>,
    /// Reverse lookup: stack → index.
    index_of: FxHashMap<BlockStack, u32>,
}

impl BlockPalette {
    /// Creates an empty palette.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a palette from stacks in index order. Duplicates keep their
    /// first index.
    pub fn from_stacks(stacks: impl IntoIterator<Item = BlockStack>) -> Self {
        let mut palette = Self::new();
        for stack in stacks {
            palette.insert(stack);
        }
        palette
    }

    /// Returns the index of `stack`, adding it if it is not present yet.
    pub fn insert(&mut self, stack: BlockStack) -> u32 {
        if let Some(&index) = self.index_of.get(&stack) {
            return index;
        }
        let index = self.stacks.len() as u32;
        self.index_of.insert(stack.clone(), index);
        self.stacks.push(stack);
        index
    }

    /// Looks up the stack stored at `index`.
    ///
    /// # Errors
    ///
    /// Returns [`BlockError::UnknownIndex`] if `index` was never assigned.
    pub fn index_to_block_stack(&self, index: u32) -> Result<&BlockStack, BlockError> {
        self.stacks
            .get(index as usize)
            .ok_or(BlockError::UnknownIndex(index))
    }

    /// Returns the index assigned to `stack`, or `None` if it is not in the palette.
    pub fn block_stack_to_index(&self, stack: &BlockStack) -> Option<u32> {
        self.index_of.get(stack).copied()
    }

    /// Returns `true` if `stack` has been assigned an index.
    pub fn contains(&self, stack: &BlockStack) -> bool {
        self.index_of.contains_key(stack)
    }

    /// Number of distinct stacks.
    pub fn len(&self) -> usize {
        self.stacks.len()
    }

    /// Returns `true` if no stack has been inserted.
    pub fn is_empty(&self) -> bool {
        self.stacks.is_empty()
    }

    /// Iterates `(index, stack)` pairs in index order.
    pub fn iter(&self) -> impl Iterator<Item = (u32, &BlockStack)> {
        self.stacks.iter().enumerate().map(|(i, s)| (i as u32, s))
    }
}
