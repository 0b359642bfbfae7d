//! Host tensors and the shared handles operations hold on them.

use crate::types::{DataType, Element};
use crate::{Error, Result};
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

/// A named, typed, shaped byte buffer.
///
/// Storage is kept in 8-byte words so typed views through `bytemuck` are
/// always aligned, including for empty tensors.
#[derive(Debug, Clone)]
pub struct Tensor {
    name: String,
    data: Vec<u64>,
    size_bytes: usize,
    shape: Vec<usize>,
    dtype: DataType,
}

fn words_for(size_bytes: usize) -> usize {
    size_bytes.div_ceil(std::mem::size_of::<u64>())
}

impl Tensor {
    /// Create an empty (zero-element, rank-1) tensor of the given data type.
    pub fn new(name: impl Into<String>, dtype: DataType) -> Self {
        Self {
            name: name.into(),
            data: Vec::new(),
            size_bytes: 0,
            shape: vec![0],
            dtype,
        }
    }

    /// Create a zero-filled tensor.
    pub fn zeros(name: impl Into<String>, shape: &[usize], dtype: DataType) -> Self {
        let num_elements: usize = shape.iter().product();
        let size_bytes = num_elements * dtype.size();
        Self {
            name: name.into(),
            data: vec![0; words_for(size_bytes)],
            size_bytes,
            shape: shape.to_vec(),
            dtype,
        }
    }

    /// Create a tensor from a vector with a given shape.
    ///
    /// # Panics
    ///
    /// Panics if `data.len()` does not match the element count of `shape`.
    pub fn from_vec<T: Element>(name: impl Into<String>, data: Vec<T>, shape: &[usize]) -> Self {
        let expected_len: usize = shape.iter().product();
        assert_eq!(
            data.len(),
            expected_len,
            "Data length {} doesn't match shape {:?} (expected {})",
            data.len(),
            shape,
            expected_len
        );

        let mut tensor = Self::zeros(name, shape, T::DATA_TYPE);
        tensor
            .as_bytes_mut()
            .copy_from_slice(bytemuck::cast_slice(&data));
        tensor
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn shape(&self) -> &[usize] {
        &self.shape
    }

    pub fn dtype(&self) -> DataType {
        self.dtype
    }

    /// Number of dimensions.
    pub fn rank(&self) -> usize {
        self.shape.len()
    }

    /// Total number of elements.
    pub fn len(&self) -> usize {
        self.shape.iter().product()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Size of the storage in bytes.
    pub fn size_bytes(&self) -> usize {
        self.size_bytes
    }

    /// Resize to `shape`, keeping the data type.
    ///
    /// Existing content is preserved up to the new size; new bytes are zero.
    pub fn resize(&mut self, shape: &[usize]) {
        let num_elements: usize = shape.iter().product();
        let size_bytes = num_elements * self.dtype.size();
        if size_bytes < self.size_bytes {
            // Clear the dropped tail so a later grow reads zeros.
            self.all_bytes_mut()[size_bytes..].fill(0);
        }
        self.data.resize(words_for(size_bytes), 0);
        self.size_bytes = size_bytes;
        self.shape = shape.to_vec();
    }

    /// Change the shape without touching the data.
    pub fn reshape(&mut self, shape: &[usize]) -> Result<()> {
        let num_elements: usize = shape.iter().product();
        if num_elements != self.len() {
            return Err(Error::Tensor(format!(
                "Cannot reshape '{}' from {:?} to {:?}",
                self.name, self.shape, shape
            )));
        }
        self.shape = shape.to_vec();
        Ok(())
    }

    /// Replace shape and data type, reallocating zeroed storage.
    pub fn reset(&mut self, shape: &[usize], dtype: DataType) {
        let num_elements: usize = shape.iter().product();
        self.size_bytes = num_elements * dtype.size();
        self.data = vec![0; words_for(self.size_bytes)];
        self.shape = shape.to_vec();
        self.dtype = dtype;
    }

    /// Typed view of the data.
    ///
    /// # Errors
    ///
    /// Returns an error if `T` doesn't match the tensor's data type.
    pub fn as_slice<T: Element>(&self) -> Result<&[T]> {
        self.check_type::<T>()?;
        Ok(bytemuck::cast_slice(self.as_bytes()))
    }

    /// Mutable typed view of the data.
    ///
    /// # Errors
    ///
    /// Returns an error if `T` doesn't match the tensor's data type.
    pub fn as_mut_slice<T: Element>(&mut self) -> Result<&mut [T]> {
        self.check_type::<T>()?;
        Ok(bytemuck::cast_slice_mut(self.as_bytes_mut()))
    }

    /// Copy the data out into a vector.
    pub fn to_vec<T: Element>(&self) -> Result<Vec<T>> {
        Ok(self.as_slice::<T>()?.to_vec())
    }

    /// Raw bytes of the tensor data.
    pub fn as_bytes(&self) -> &[u8] {
        &bytemuck::cast_slice::<u64, u8>(&self.data)[..self.size_bytes]
    }

    /// Mutable raw bytes of the tensor data.
    pub fn as_bytes_mut(&mut self) -> &mut [u8] {
        let size_bytes = self.size_bytes;
        &mut self.all_bytes_mut()[..size_bytes]
    }

    fn all_bytes_mut(&mut self) -> &mut [u8] {
        bytemuck::cast_slice_mut(&mut self.data)
    }

    fn check_type<T: Element>(&self) -> Result<()> {
        if T::DATA_TYPE != self.dtype {
            return Err(Error::Tensor(format!(
                "Tensor '{}' holds {} data, accessed as {}",
                self.name,
                self.dtype,
                T::DATA_TYPE
            )));
        }
        Ok(())
    }
}

/// Shared handle to a tensor owned by a workspace.
///
/// Cloning the handle does not copy the tensor. Operations hold handles for
/// their bound inputs and outputs; storage lifetime stays with the workspace.
#[derive(Debug, Clone)]
pub struct TensorRef(Arc<RwLock<Tensor>>);

impl TensorRef {
    pub fn new(tensor: Tensor) -> Self {
        Self(Arc::new(RwLock::new(tensor)))
    }

    /// Shared read access.
    pub fn read(&self) -> RwLockReadGuard<'_, Tensor> {
        self.0.read().unwrap_or_else(PoisonError::into_inner)
    }

    /// Exclusive write access.
    pub fn write(&self) -> RwLockWriteGuard<'_, Tensor> {
        self.0.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Whether both handles point at the same tensor.
    pub fn ptr_eq(&self, other: &TensorRef) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl From<Tensor> for TensorRef {
    fn from(tensor: Tensor) -> Self {
        TensorRef::new(tensor)
    }
}
