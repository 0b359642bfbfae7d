//! Reshape: same data, new shape.

use std::marker::PhantomData;

use tessera_core::{
    op_input_tags, op_output_tags, register_op, ConstructOp, DataType, DeviceType, Element, Error,
    OpBase, OpConstructContext, OpContext, OpInitContext, OpRegistry, Operation, Result, Tensor,
};

use crate::helpers::prepare_output;

/// Reshapes its input.
///
/// The target shape comes from the repeated `shape` attribute or, when that
/// is absent, from an `i64`/`i32` second input. A `0` entry copies the input
/// dimension at the same position; a single `-1` entry is inferred.
pub struct ReshapeOp<T> {
    base: OpBase,
    /// `None` when the definition carries no `shape` attribute.
    shape: Option<Vec<i64>>,
    _elem: PhantomData<fn() -> T>,
}

impl<T: Element> ReshapeOp<T> {
    op_input_tags!(INPUT, SHAPE);
    op_output_tags!(OUTPUT);

    fn target_shape(&self) -> Result<Vec<i64>> {
        if let Some(shape) = &self.shape {
            return Ok(shape.clone());
        }
        let shape = self.base.input(Self::SHAPE);
        match shape.dtype() {
            DataType::I64 => shape.to_vec::<i64>(),
            DataType::I32 => Ok(shape.as_slice::<i32>()?.iter().map(|&d| d as i64).collect()),
            other => Err(Error::InvalidArgument(format!(
                "Reshape '{}' shape input must be i64 or i32, got {other}",
                self.name()
            ))),
        }
    }
}

/// Resolve `0` and `-1` entries of `target` against `input_shape`.
pub fn resolve_shape(input_shape: &[usize], target: &[i64]) -> Result<Vec<usize>> {
    let mut dims = Vec::with_capacity(target.len());
    let mut inferred = None;

    for (i, &dim) in target.iter().enumerate() {
        match dim {
            -1 => {
                if inferred.replace(i).is_some() {
                    return Err(Error::InvalidArgument(
                        "Reshape allows at most one -1 dimension".to_string(),
                    ));
                }
                dims.push(1);
            }
            0 => {
                let copied = input_shape.get(i).copied().ok_or_else(|| {
                    Error::InvalidArgument(format!(
                        "Reshape dimension {i} copies from an input of rank {}",
                        input_shape.len()
                    ))
                })?;
                dims.push(copied);
            }
            d if d > 0 => dims.push(d as usize),
            d => {
                return Err(Error::InvalidArgument(format!(
                    "Invalid reshape dimension {d}"
                )));
            }
        }
    }

    let total: usize = input_shape.iter().product();
    let known: usize = dims.iter().product();
    if let Some(i) = inferred {
        if known == 0 || total % known != 0 {
            return Err(Error::InvalidArgument(format!(
                "Cannot infer reshape dimension: {total} elements into {target:?}"
            )));
        }
        dims[i] = total / known;
    } else if known != total {
        return Err(Error::InvalidArgument(format!(
            "Cannot reshape {input_shape:?} ({total} elements) to {dims:?}"
        )));
    }

    Ok(dims)
}

impl<T: Element> ConstructOp for ReshapeOp<T> {
    fn construct(context: &mut OpConstructContext<'_>) -> Self {
        let base = OpBase::new(context);
        let shape = base
            .debug_def()
            .has_arg("shape")
            .then(|| base.get_repeated_args("shape", Vec::new()));
        Self {
            base,
            shape,
            _elem: PhantomData,
        }
    }
}

impl<T: Element> Operation for ReshapeOp<T> {
    fn base(&self) -> &OpBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut OpBase {
        &mut self.base
    }

    fn init(&mut self, _context: &mut OpInitContext<'_>) -> Result<()> {
        if self.shape.is_none() && self.base.input_size() < 2 {
            return Err(Error::InvalidArgument(format!(
                "Reshape '{}' has neither a shape attribute nor a shape input",
                self.name()
            )));
        }
        let inferred = self.shape.iter().flatten().filter(|&&d| d == -1).count();
        if inferred > 1 {
            return Err(Error::InvalidArgument(format!(
                "Reshape '{}' has more than one -1 dimension",
                self.name()
            )));
        }
        Ok(())
    }

    fn run(&mut self, _context: &mut OpContext<'_>) -> Result<()> {
        let target = self.target_shape()?;
        let reshaped: Tensor = {
            let input = self.base.input(Self::INPUT);
            let dims = resolve_shape(input.shape(), &target)?;
            let mut reshaped = input.clone();
            reshaped.reshape(&dims)?;
            reshaped
        };

        let mut output = self.base.output(Self::OUTPUT);
        prepare_output(&mut output, reshaped.shape(), T::DATA_TYPE);
        output
            .as_mut_slice::<T>()?
            .copy_from_slice(reshaped.as_slice::<T>()?);
        Ok(())
    }
}

pub fn register(registry: &mut OpRegistry) -> Result<()> {
    register_op!(registry, "Reshape", ReshapeOp<f32>, DeviceType::Cpu, f32)?;
    register_op!(registry, "Reshape", ReshapeOp<i32>, DeviceType::Cpu, i32)
}
