//! Workspace: the owner of every live tensor, keyed by name.

use crate::tensor::{Tensor, TensorRef};
use crate::types::DataType;
use std::collections::HashMap;

/// Registry of live tensors.
///
/// Operations never allocate or free tensors; they hold [`TensorRef`]
/// handles into the workspace.
#[derive(Debug, Default)]
pub struct Workspace {
    tensors: HashMap<String, TensorRef>,
}

impl Workspace {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a tensor under its own name, replacing any previous one.
    pub fn add_tensor(&mut self, tensor: Tensor) -> TensorRef {
        let name = tensor.name().to_string();
        let handle = TensorRef::new(tensor);
        self.tensors.insert(name, handle.clone());
        handle
    }

    /// Get the named tensor, creating an empty one of `dtype` if missing.
    pub fn create_tensor(&mut self, name: &str, dtype: DataType) -> TensorRef {
        self.tensors
            .entry(name.to_string())
            .or_insert_with(|| TensorRef::new(Tensor::new(name, dtype)))
            .clone()
    }

    /// Look up a tensor by name.
    pub fn get_tensor(&self, name: &str) -> Option<TensorRef> {
        self.tensors.get(name).cloned()
    }

    pub fn has_tensor(&self, name: &str) -> bool {
        self.tensors.contains_key(name)
    }

    /// Iterate over all tensor names.
    pub fn tensor_names(&self) -> impl Iterator<Item = &str> {
        self.tensors.keys().map(|s| s.as_str())
    }

    pub fn len(&self) -> usize {
        self.tensors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tensors.is_empty()
    }
}
