//! Shape helpers shared by operator implementations.

use tessera_core::{DataType, Error, Result, Tensor};

/// Broadcast two shapes to a common output shape.
///
/// NumPy-style rules:
/// - Shapes are aligned from the rightmost dimension
/// - Dimensions match if they are equal or one of them is 1
/// - Missing dimensions in the shorter shape are treated as 1
///
/// ```text
/// [2, 3, 4] + [3, 4]    -> [2, 3, 4]
/// [2, 3, 4] + [2, 1, 4] -> [2, 3, 4]
/// [8, 1, 6, 1] + [7, 1, 5] -> [8, 7, 6, 5]
/// ```
pub fn broadcast_shapes(a: &[usize], b: &[usize]) -> Result<Vec<usize>> {
    let rank = a.len().max(b.len());
    let mut result = vec![1; rank];

    for i in 0..rank {
        let a_dim = if i < a.len() { a[a.len() - 1 - i] } else { 1 };
        let b_dim = if i < b.len() { b[b.len() - 1 - i] } else { 1 };

        result[rank - 1 - i] = match (a_dim, b_dim) {
            (x, y) if x == y => x,
            (1, y) => y,
            (x, 1) => x,
            (x, y) => {
                return Err(Error::InvalidArgument(format!(
                    "Cannot broadcast shapes {a:?} and {b:?}: dimension {} is {x} vs {y}",
                    rank - 1 - i
                )));
            }
        };
    }

    Ok(result)
}

/// Row-major strides of `shape`, aligned to `rank` with zero strides for
/// broadcast (size-1 or missing) dimensions.
pub fn broadcast_strides(shape: &[usize], rank: usize) -> Vec<usize> {
    let mut strides = vec![0; rank];
    let mut stride = 1;
    for i in 0..shape.len() {
        let dim = shape[shape.len() - 1 - i];
        if dim != 1 {
            strides[rank - 1 - i] = stride;
        }
        stride *= dim;
    }
    strides
}

/// Map a flat output index to the flat index of a broadcast input.
pub fn broadcast_offset(mut index: usize, out_shape: &[usize], strides: &[usize]) -> usize {
    let mut offset = 0;
    for axis in (0..out_shape.len()).rev() {
        let dim = out_shape[axis];
        offset += (index % dim) * strides[axis];
        index /= dim;
    }
    offset
}

/// Shape `output` for a result of `shape` and `dtype`, keeping its
/// allocation when the data type already matches.
pub fn prepare_output(output: &mut Tensor, shape: &[usize], dtype: DataType) {
    if output.dtype() == dtype {
        output.resize(shape);
    } else {
        output.reset(shape, dtype);
    }
}
