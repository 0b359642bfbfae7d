//! Two-node demo network: `Add` followed by a `RELU` activation.

use std::sync::Arc;

use anyhow::{Context, Result};
use tessera_core::{
    CpuDevice, DataType, Device, DeviceType, OpRegistry, OperatorDef, Tensor, Workspace,
};
use tessera_runtime::{NetDef, NetOptions, SerialNet};

pub const DEMO_A: [f32; 4] = [1.0, -2.0, 3.0, -4.0];
pub const DEMO_B: [f32; 4] = [0.5, 0.5, -5.0, 1.0];

/// Result of one demo run.
#[derive(Debug, Clone, PartialEq)]
pub struct DemoOutput {
    /// Device type each operator was placed on, in execution order.
    pub placements: Vec<(String, DeviceType)>,
    pub sum: Vec<f32>,
    pub output: Vec<f32>,
}

pub fn demo_net() -> NetDef {
    NetDef::new()
        .with_op(
            OperatorDef::new("Add")
                .with_name("add")
                .with_data_type(DataType::F32)
                .with_input("a")
                .with_input("b")
                .with_output("sum"),
        )
        .with_op(
            OperatorDef::new("Activation")
                .with_name("relu")
                .with_input("sum")
                .with_output("out")
                .with_arg("activation", "RELU"),
        )
}

/// Build and run the demo net targeting `device`.
///
/// Only a CPU device handle exists, so other targets exercise fallback when
/// `cpu_fallback` is set and fail otherwise.
pub fn run_demo(
    registry: &OpRegistry,
    device: DeviceType,
    cpu_fallback: bool,
) -> Result<DemoOutput> {
    tracing::info!(target_device = %device, cpu_fallback, "running demo net");

    let mut workspace = Workspace::new();
    workspace.add_tensor(Tensor::from_vec("a", DEMO_A.to_vec(), &[DEMO_A.len()]));
    workspace.add_tensor(Tensor::from_vec("b", DEMO_B.to_vec(), &[DEMO_B.len()]));

    let devices: Vec<Arc<dyn Device>> = vec![Arc::new(CpuDevice::default())];
    let options = NetOptions {
        target_device: device,
        cpu_fallback,
    };

    let mut net = SerialNet::new(registry, &demo_net(), &mut workspace, &devices, &options)
        .context("Failed to build demo net")?;
    net.init(&workspace).context("Failed to initialize demo net")?;
    net.run(&workspace).context("Failed to run demo net")?;

    let placements = net
        .operations()
        .map(|op| (op.name().to_string(), op.device_type()))
        .collect();
    let read = |name: &str| -> Result<Vec<f32>> {
        let tensor = workspace
            .get_tensor(name)
            .with_context(|| format!("Tensor '{name}' missing after run"))?;
        let values = tensor.read().to_vec::<f32>()?;
        Ok(values)
    };

    Ok(DemoOutput {
        placements,
        sum: read("sum")?,
        output: read("out")?,
    })
}
