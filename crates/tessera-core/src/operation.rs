//! The `Operation` trait: the executable form of one graph node.

use crate::arg_helper::{self, FromArg};
use crate::context::{OpConstructContext, OpContext, OpInitContext};
use crate::op_def::OperatorDef;
use crate::tensor::{Tensor, TensorRef};
use crate::types::DeviceType;
use crate::Result;
use std::sync::{Arc, RwLockReadGuard, RwLockWriteGuard};

/// State shared by every operation: its definition and bound tensors.
///
/// Inputs and outputs are bound by the graph loader after construction and
/// before the first `run`. The handles point into the workspace, which keeps
/// ownership of the storage.
#[derive(Debug)]
pub struct OpBase {
    operator_def: Arc<OperatorDef>,
    inputs: Vec<TensorRef>,
    outputs: Vec<TensorRef>,
}

impl OpBase {
    /// Capture the definition from a construct context.
    ///
    /// # Panics
    ///
    /// Panics if the context has no operator definition attached.
    pub fn new(context: &OpConstructContext<'_>) -> Self {
        Self {
            operator_def: Arc::clone(context.operator_def()),
            inputs: Vec::new(),
            outputs: Vec::new(),
        }
    }

    /// Attribute `name` of this operation's definition, or `default` when absent.
    pub fn get_optional_arg<T: FromArg>(&self, name: &str, default: T) -> T {
        arg_helper::get_optional_arg(&self.operator_def, name, default)
    }

    /// Repeated attribute `name`, or `default` when absent.
    pub fn get_repeated_args<T: FromArg>(&self, name: &str, default: Vec<T>) -> Vec<T> {
        arg_helper::get_repeated_args(&self.operator_def, name, default)
    }

    /// Device type recorded in the definition.
    pub fn device_type(&self) -> DeviceType {
        self.operator_def.device_type
    }

    pub fn operator_def(&self) -> &Arc<OperatorDef> {
        &self.operator_def
    }

    /// The definition, for diagnostics.
    pub fn debug_def(&self) -> &OperatorDef {
        &self.operator_def
    }

    pub fn set_inputs(&mut self, inputs: Vec<TensorRef>) {
        self.inputs = inputs;
    }

    pub fn set_outputs(&mut self, outputs: Vec<TensorRef>) {
        self.outputs = outputs;
    }

    /// Read access to input `idx`.
    ///
    /// An input guard must be dropped before taking an output guard on a
    /// tensor bound to both slots.
    ///
    /// # Panics
    ///
    /// Panics if `idx` is out of range.
    pub fn input(&self, idx: usize) -> RwLockReadGuard<'_, Tensor> {
        self.input_ref(idx).read()
    }

    /// Write access to output `idx`.
    ///
    /// # Panics
    ///
    /// Panics if `idx` is out of range.
    pub fn output(&self, idx: usize) -> RwLockWriteGuard<'_, Tensor> {
        self.output_ref(idx).write()
    }

    /// Handle bound to input `idx`.
    ///
    /// # Panics
    ///
    /// Panics if `idx` is out of range.
    pub fn input_ref(&self, idx: usize) -> &TensorRef {
        assert!(
            idx < self.inputs.len(),
            "input index {idx} out of range for operator '{}' with {} inputs",
            self.operator_def.display_name(),
            self.inputs.len()
        );
        &self.inputs[idx]
    }

    /// Handle bound to output `idx`.
    ///
    /// # Panics
    ///
    /// Panics if `idx` is out of range.
    pub fn output_ref(&self, idx: usize) -> &TensorRef {
        assert!(
            idx < self.outputs.len(),
            "output index {idx} out of range for operator '{}' with {} outputs",
            self.operator_def.display_name(),
            self.outputs.len()
        );
        &self.outputs[idx]
    }

    pub fn input_size(&self) -> usize {
        self.inputs.len()
    }

    pub fn output_size(&self) -> usize {
        self.outputs.len()
    }

    pub fn inputs(&self) -> &[TensorRef] {
        &self.inputs
    }

    pub fn outputs(&self) -> &[TensorRef] {
        &self.outputs
    }
}

/// A device- and data-type-specialized executable operator.
///
/// Lifecycle: constructed by a registry factory, `init` called exactly once,
/// then `run` called any number of times. Calling `run` before `init`, or
/// `init` twice, is a caller error and is not checked here.
///
/// `run` is expected to be stateless: the same bound input content yields the
/// same output. Operators that accumulate state across calls document it.
///
/// # Example
///
/// ```ignore
/// struct Identity {
///     base: OpBase,
/// }
///
/// impl Operation for Identity {
///     fn base(&self) -> &OpBase {
///         &self.base
///     }
///
///     fn base_mut(&mut self) -> &mut OpBase {
///         &mut self.base
///     }
///
///     fn run(&mut self, _ctx: &mut OpContext<'_>) -> Result<()> {
///         let input = self.base.input(0).clone();
///         *self.base.output(0) = input;
///         Ok(())
///     }
/// }
/// ```
pub trait Operation: Send {
    fn base(&self) -> &OpBase;

    fn base_mut(&mut self) -> &mut OpBase;

    /// One-time setup before the first `run`. Defaults to a no-op.
    fn init(&mut self, _context: &mut OpInitContext<'_>) -> Result<()> {
        Ok(())
    }

    /// Compute outputs from the currently bound inputs.
    ///
    /// On asynchronous backends this may return once the work is submitted.
    fn run(&mut self, context: &mut OpContext<'_>) -> Result<()>;

    /// Device type this operation was built for.
    fn device_type(&self) -> DeviceType {
        self.base().device_type()
    }

    fn op_type(&self) -> &str {
        &self.base().debug_def().op_type
    }

    /// Node name, or the operator type for unnamed nodes.
    fn name(&self) -> &str {
        self.base().debug_def().display_name()
    }
}

/// Name input slots of an operation.
///
/// ```ignore
/// impl Conv2D {
///     op_input_tags!(INPUT, FILTER, BIAS);
///     op_output_tags!(OUTPUT);
/// }
///
/// let filter = self.base.input(Self::FILTER);
/// ```
#[macro_export]
macro_rules! op_input_tags {
    ($($tag:ident),+ $(,)?) => {
        $crate::__op_tags!(0usize; $($tag),+);
    };
}

/// Name output slots of an operation. See [`op_input_tags!`].
#[macro_export]
macro_rules! op_output_tags {
    ($($tag:ident),+ $(,)?) => {
        $crate::__op_tags!(0usize; $($tag),+);
    };
}

#[doc(hidden)]
#[macro_export]
macro_rules! __op_tags {
    ($idx:expr;) => {};
    ($idx:expr; $tag:ident $(, $rest:ident)*) => {
        pub const $tag: usize = $idx;
        $crate::__op_tags!($idx + 1; $($rest),*);
    };
}
