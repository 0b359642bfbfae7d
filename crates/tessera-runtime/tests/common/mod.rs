//! Common test utilities for net tests.

#![allow(dead_code)]

use std::sync::Arc;

use tessera_core::{CpuDevice, DataType, Device, DeviceType, OperatorDef};
use tessera_runtime::NetDef;

/// Install a test subscriber once; later calls are no-ops.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .with_target(false)
        .with_test_writer()
        .try_init();
}

/// Stand-in accelerator handle. Nothing executes on it; it only needs a
/// device type for placement.
#[derive(Debug)]
pub struct FakeGpu;

impl Device for FakeGpu {
    fn device_type(&self) -> DeviceType {
        DeviceType::Gpu
    }
}

pub fn cpu_only() -> Vec<Arc<dyn Device>> {
    vec![Arc::new(CpuDevice::new(1))]
}

pub fn cpu_and_gpu() -> Vec<Arc<dyn Device>> {
    vec![Arc::new(CpuDevice::new(1)), Arc::new(FakeGpu)]
}

/// `sum = a + b`, then `out = relu(sum)`.
pub fn add_relu_net() -> NetDef {
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
