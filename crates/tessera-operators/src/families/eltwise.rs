//! Binary elementwise operator family.
//!
//! Covers: Add, Sub, Mul, Div, Max, Min

use std::marker::PhantomData;

use tessera_core::{
    op_input_tags, op_output_tags, register_op, ConstructOp, DeviceType, Element, Error, OpBase,
    OpConstructContext, OpContext, OpInitContext, OpRegistry, Operation, Result,
};

use crate::helpers::{broadcast_offset, broadcast_shapes, broadcast_strides, prepare_output};

/// Which binary function an [`EltwiseOp`] computes.
///
/// Derived from the operator type the op was registered under.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EltwiseKind {
    Add,
    Sub,
    Mul,
    Div,
    Max,
    Min,
}

impl EltwiseKind {
    pub const ALL: [EltwiseKind; 6] = [
        EltwiseKind::Add,
        EltwiseKind::Sub,
        EltwiseKind::Mul,
        EltwiseKind::Div,
        EltwiseKind::Max,
        EltwiseKind::Min,
    ];

    /// Operator type name this kind is registered under.
    pub fn op_type(&self) -> &'static str {
        match self {
            EltwiseKind::Add => "Add",
            EltwiseKind::Sub => "Sub",
            EltwiseKind::Mul => "Mul",
            EltwiseKind::Div => "Div",
            EltwiseKind::Max => "Max",
            EltwiseKind::Min => "Min",
        }
    }

    pub fn from_op_type(op_type: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.op_type() == op_type)
    }
}

/// Element types the eltwise family computes in.
pub trait EltwiseElement: Element + PartialOrd {
    fn apply(kind: EltwiseKind, a: Self, b: Self) -> Result<Self>;
}

impl EltwiseElement for f32 {
    fn apply(kind: EltwiseKind, a: f32, b: f32) -> Result<f32> {
        Ok(match kind {
            EltwiseKind::Add => a + b,
            EltwiseKind::Sub => a - b,
            EltwiseKind::Mul => a * b,
            EltwiseKind::Div => a / b,
            EltwiseKind::Max => a.max(b),
            EltwiseKind::Min => a.min(b),
        })
    }
}

impl EltwiseElement for i32 {
    fn apply(kind: EltwiseKind, a: i32, b: i32) -> Result<i32> {
        Ok(match kind {
            EltwiseKind::Add => a.wrapping_add(b),
            EltwiseKind::Sub => a.wrapping_sub(b),
            EltwiseKind::Mul => a.wrapping_mul(b),
            EltwiseKind::Div => {
                if b == 0 {
                    return Err(Error::InvalidArgument(
                        "Integer division by zero".to_string(),
                    ));
                }
                a.wrapping_div(b)
            }
            EltwiseKind::Max => a.max(b),
            EltwiseKind::Min => a.min(b),
        })
    }
}

/// Binary elementwise operation with NumPy-style broadcasting.
///
/// All members of the family share the same structure:
/// - two inputs, one output
/// - output shape is the broadcast of both input shapes
/// - results are computed into a scratch buffer first, so the output may
///   alias either input
pub struct EltwiseOp<T> {
    base: OpBase,
    kind: Option<EltwiseKind>,
    _elem: PhantomData<fn() -> T>,
}

impl<T: EltwiseElement> EltwiseOp<T> {
    op_input_tags!(LHS, RHS);
    op_output_tags!(OUTPUT);

    pub fn kind(&self) -> Option<EltwiseKind> {
        self.kind
    }
}

impl<T: EltwiseElement> ConstructOp for EltwiseOp<T> {
    fn construct(context: &mut OpConstructContext<'_>) -> Self {
        let base = OpBase::new(context);
        let kind = EltwiseKind::from_op_type(&base.debug_def().op_type);
        Self {
            base,
            kind,
            _elem: PhantomData,
        }
    }
}

impl<T: EltwiseElement> Operation for EltwiseOp<T> {
    fn base(&self) -> &OpBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut OpBase {
        &mut self.base
    }

    fn init(&mut self, _context: &mut OpInitContext<'_>) -> Result<()> {
        if self.kind.is_none() {
            return Err(Error::Unsupported(format!(
                "'{}' is not an elementwise operator type",
                self.op_type()
            )));
        }
        if self.base.input_size() != 2 || self.base.output_size() != 1 {
            return Err(Error::InvalidArgument(format!(
                "{} '{}' expects 2 inputs and 1 output, got {} and {}",
                self.op_type(),
                self.name(),
                self.base.input_size(),
                self.base.output_size()
            )));
        }
        Ok(())
    }

    fn run(&mut self, _context: &mut OpContext<'_>) -> Result<()> {
        let kind = self.kind.ok_or_else(|| {
            Error::Unsupported(format!(
                "'{}' is not an elementwise operator type",
                self.op_type()
            ))
        })?;

        let (out_shape, values) = {
            let lhs = self.base.input(Self::LHS);
            let rhs = self.base.input(Self::RHS);
            let out_shape = broadcast_shapes(lhs.shape(), rhs.shape())?;
            let lhs_strides = broadcast_strides(lhs.shape(), out_shape.len());
            let rhs_strides = broadcast_strides(rhs.shape(), out_shape.len());
            let a = lhs.as_slice::<T>()?;
            let b = rhs.as_slice::<T>()?;

            let len: usize = out_shape.iter().product();
            let values = if a.len() == len && b.len() == len {
                a.iter()
                    .zip(b)
                    .map(|(&x, &y)| T::apply(kind, x, y))
                    .collect::<Result<Vec<_>>>()?
            } else {
                (0..len)
                    .map(|i| {
                        let x = a[broadcast_offset(i, &out_shape, &lhs_strides)];
                        let y = b[broadcast_offset(i, &out_shape, &rhs_strides)];
                        T::apply(kind, x, y)
                    })
                    .collect::<Result<Vec<_>>>()?
            };
            (out_shape, values)
        };

        let mut output = self.base.output(Self::OUTPUT);
        prepare_output(&mut output, &out_shape, T::DATA_TYPE);
        output.as_mut_slice::<T>()?.copy_from_slice(&values);
        Ok(())
    }
}

/// Register every eltwise kind for CPU `f32` and `i32`.
pub fn register(registry: &mut OpRegistry) -> Result<()> {
    for kind in EltwiseKind::ALL {
        register_op!(registry, kind.op_type(), EltwiseOp<f32>, DeviceType::Cpu, f32)?;
        register_op!(registry, kind.op_type(), EltwiseOp<i32>, DeviceType::Cpu, i32)?;
    }
    Ok(())
}
