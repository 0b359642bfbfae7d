//! Common test utilities for operator tests.
//!
//! Builds a single operation through the core registry, binds it to
//! workspace tensors, and drives it through `init` and `run`.

#![allow(dead_code)]

use std::sync::Arc;

pub use tessera_core::{
    CpuDevice, DataType, DeviceType, Error, OpConstructContext, OpContext, OpInitContext,
    Operation, OperatorDef, Result, Tensor, Workspace,
};
pub use tessera_operators::core_op_registry;

/// Install a test subscriber once; later calls are no-ops.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .with_target(false)
        .with_test_writer()
        .try_init();
}

/// One operation bound to its own workspace.
pub struct Harness {
    pub workspace: Workspace,
    pub device: CpuDevice,
    pub op: Box<dyn Operation>,
}

impl Harness {
    /// Create the operation for `def` on CPU and bind its tensors.
    ///
    /// `inputs` are added to the workspace; outputs are created empty.
    pub fn new(def: OperatorDef, inputs: Vec<Tensor>) -> Result<Self> {
        init_tracing();
        let registry = core_op_registry();
        let device = CpuDevice::new(1);
        let mut workspace = Workspace::new();

        let input_refs: Vec<_> = inputs
            .into_iter()
            .map(|tensor| workspace.add_tensor(tensor))
            .collect();
        let dtype = def.data_type()?;
        let output_refs: Vec<_> = def
            .outputs
            .iter()
            .map(|name| workspace.create_tensor(name, dtype))
            .collect();

        let mut op = {
            let mut ctx = OpConstructContext::new(&workspace);
            ctx.set_operator_def(Arc::new(def));
            ctx.set_device(&device);
            registry.create_operation(&mut ctx, DeviceType::Cpu)?
        };
        op.base_mut().set_inputs(input_refs);
        op.base_mut().set_outputs(output_refs);

        Ok(Self {
            workspace,
            device,
            op,
        })
    }

    pub fn init(&mut self) -> Result<()> {
        let mut ctx = OpInitContext::new(&self.workspace, Some(&self.device));
        self.op.init(&mut ctx)
    }

    pub fn run(&mut self) -> Result<()> {
        let mut ctx = OpContext::new(&self.workspace, &self.device);
        self.op.run(&mut ctx)
    }

    /// Snapshot of a workspace tensor.
    pub fn tensor(&self, name: &str) -> Tensor {
        self.workspace
            .get_tensor(name)
            .unwrap_or_else(|| panic!("tensor '{name}' not in workspace"))
            .read()
            .clone()
    }
}

/// Create a two-input, one-output definition for a binary elementwise op.
///
/// Inputs are named `a` and `b`, the output `c`.
pub fn binary_def(op_type: &str, dtype: DataType) -> OperatorDef {
    OperatorDef::new(op_type)
        .with_name(format!("{}_0", op_type.to_lowercase()))
        .with_data_type(dtype)
        .with_input("a")
        .with_input("b")
        .with_output("c")
}

/// Initialize, run once, and return output `c` as `f32`.
pub fn run_binary_f32(op_type: &str, a: Tensor, b: Tensor) -> Result<Tensor> {
    let mut harness = Harness::new(binary_def(op_type, DataType::F32), vec![a, b])?;
    harness.init()?;
    harness.run()?;
    Ok(harness.tensor("c"))
}
