//! Block states and block stacks.
//!
//! A [`BlockStack`] is the unit the palette indexes and the resource pack
//! resolves into a mesh: the base block followed by any overlaid states
//! (for example a waterlogged fence is `[fence, water]`).

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::BlockError;

// ---------------------------------------------------------------------------
// BlockState
// ---------------------------------------------------------------------------

/// A single block state in a specific game format.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct BlockState {
    /// Platform the state is defined for (e.g. `"java"`, `"bedrock"`).
    pub platform: String,
    /// Data version the state is defined in.
    pub version: Vec<i64>,
    /// Resource namespace (e.g. `"minecraft"`).
    pub namespace: String,
    /// Block name without namespace (e.g. `"stone"`).
    pub base_name: String,
    /// Block properties. Ordered so equal states always hash and compare equal.
    pub properties: BTreeMap<String, String>,
}

impl BlockState {
    /// Creates a property-less Java block state.
    pub fn new(namespace: &str, base_name: &str) -> Self {
        Self {
            platform: "java".to_string(),
            version: vec![1, 21, 0],
            namespace: namespace.to_string(),
            base_name: base_name.to_string(),
            properties: BTreeMap::new(),
        }
    }

    /// Returns a copy of this state with one property set.
    pub fn with_property(mut self, key: &str, value: &str) -> Self {
        self.properties.insert(key.to_string(), value.to_string());
        self
    }

    /// `namespace:base_name`.
    pub fn namespaced_name(&self) -> String {
        format!("{}:{}", self.namespace, self.base_name)
    }
}

impl fmt::Display for BlockState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.namespace, self.base_name)?;
        if !self.properties.is_empty() {
            let props: Vec<String> = self
                .properties
                .iter()
                .map(|(k, v)| format!("{k}={v}"))
                .collect();
            write!(f, "[{}]", props.join(","))?;
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// BlockStack
// ---------------------------------------------------------------------------

/// An ordered, immutable, non-empty sequence of block states occupying one voxel.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct BlockStack(Vec<BlockState>);

impl BlockStack {
    /// Creates a stack from its states, base block first.
    ///
    /// # Errors
    ///
    /// Returns [`BlockError::EmptyStack`] if `states` is empty.
    pub fn new(states: Vec<BlockState>) -> Result<Self, BlockError> {
        if states.is_empty() {
            return Err(BlockError::EmptyStack);
        }
        Ok(Self(states))
    }

    /// Creates a stack holding a single block state.
    pub fn single(state: BlockState) -> Self {
        Self(vec![state])
    }

    /// The base (first) block state.
    pub fn base(&self) -> &BlockState {
        &self.0[0]
    }

    /// Overlaid states after the base block.
    pub fn extra(&self) -> &[BlockState] {
        &self.0[1..]
    }

    /// All states, base block first.
    pub fn states(&self) -> &[BlockState] {
        &self.0
    }

    /// Number of states in the stack (always at least one).
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Always `false`; stacks are non-empty by construction.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterates the states, base block first.
    pub fn iter(&self) -> std::slice::Iter<'_, BlockState> {
        self.0.iter()
    }
}

impl From<BlockState> for BlockStack {
    fn from(state: BlockState) -> Self {
        Self::single(state)
    }
}

impl<'a> IntoIterator for &'a BlockStack {
    type Item = &'a BlockState;
    type IntoIter = std::slice::Iter<'a, BlockState>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl fmt::Display for BlockStack {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, state) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(" + ")?;
            }
            write!(f, "{state}")?;
        }
        Ok(())
    }
}
