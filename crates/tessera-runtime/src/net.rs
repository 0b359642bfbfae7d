//! Serial network: operators resolved once, then run in definition order.

use std::sync::Arc;

use tessera_core::{
    Device, DeviceType, Error, MemoryType, OpConstructContext, OpContext, OpInitContext, OpKey,
    OpRegistry, Operation, OperatorDef, TensorRef, Workspace,
};

use crate::error::{Result, RuntimeError};

/// Operator definitions in execution order.
#[derive(Debug, Clone, Default)]
pub struct NetDef {
    pub ops: Vec<OperatorDef>,
}

impl NetDef {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an operator.
    pub fn with_op(mut self, op: OperatorDef) -> Self {
        self.ops.push(op);
        self
    }
}

/// Placement policy for [`SerialNet::new`].
#[derive(Debug, Clone)]
pub struct NetOptions {
    /// Device every operator is placed on when it supports it.
    pub target_device: DeviceType,
    /// Place operators without a target-device implementation on CPU.
    pub cpu_fallback: bool,
}

impl Default for NetOptions {
    fn default() -> Self {
        Self {
            target_device: DeviceType::Cpu,
            cpu_fallback: true,
        }
    }
}

/// One placed operator.
struct NetStep {
    op: Box<dyn Operation>,
    device: Arc<dyn Device>,
}

/// Runs a fixed list of operations one after another.
///
/// Tensors stay in the workspace the net was built against; `init` and `run`
/// take that same workspace.
pub struct SerialNet {
    steps: Vec<NetStep>,
    initialized: bool,
}

impl SerialNet {
    /// Resolve, place and bind every operator of `net_def`.
    ///
    /// Output tensors that don't exist yet are created in `workspace` with the
    /// operator's data type. Inputs must already be present.
    #[tracing::instrument(skip_all, fields(ops = net_def.ops.len(), target = %options.target_device))]
    pub fn new(
        registry: &OpRegistry,
        net_def: &NetDef,
        workspace: &mut Workspace,
        devices: &[Arc<dyn Device>],
        options: &NetOptions,
    ) -> Result<Self> {
        let mut steps = Vec::with_capacity(net_def.ops.len());

        for def in &net_def.ops {
            let device = select_device(registry, def, devices, options)?;

            let inputs = def
                .inputs
                .iter()
                .map(|name| {
                    workspace.get_tensor(name).ok_or_else(|| {
                        RuntimeError::TensorNotFound(format!(
                            "'{name}' (input of '{}')",
                            def.display_name()
                        ))
                    })
                })
                .collect::<Result<Vec<_>>>()?;

            let mut op = {
                let mut ctx = OpConstructContext::new(workspace);
                ctx.set_operator_def(Arc::new(def.clone()));
                ctx.set_device(device.as_ref());
                ctx.set_output_mem_type(MemoryType::for_device(device.device_type()));
                registry.create_operation(&mut ctx, device.device_type())?
            };

            // Outputs are created only after inputs and the operation resolved.
            let dtype = def.data_type()?;
            let outputs: Vec<TensorRef> = def
                .outputs
                .iter()
                .map(|name| workspace.create_tensor(name, dtype))
                .collect();
            op.base_mut().set_inputs(inputs);
            op.base_mut().set_outputs(outputs);

            tracing::debug!(
                op = op.name(),
                op_type = op.op_type(),
                device = %op.device_type(),
                "created operation"
            );
            steps.push(NetStep { op, device });
        }

        Ok(Self {
            steps,
            initialized: false,
        })
    }

    /// Call `init` on every operation, in order.
    pub fn init(&mut self, workspace: &Workspace) -> Result<()> {
        for step in &mut self.steps {
            let name = step.op.name().to_string();
            let _span = tracing::debug_span!("init", op = %name).entered();

            let mut ctx = OpInitContext::new(workspace, Some(step.device.as_ref()));
            step.op
                .init(&mut ctx)
                .map_err(|source| RuntimeError::Operation { name, source })?;
        }
        self.initialized = true;
        Ok(())
    }

    /// Run every operation once, in order. Stops at the first failure.
    pub fn run(&mut self, workspace: &Workspace) -> Result<()> {
        if !self.initialized {
            return Err(RuntimeError::NotInitialized);
        }

        for step in &mut self.steps {
            let name = step.op.name().to_string();
            let _span = tracing::debug_span!("run", op = %name).entered();

            let mut ctx = OpContext::new(workspace, step.device.as_ref());
            step.op
                .run(&mut ctx)
                .map_err(|source| RuntimeError::Operation {
                    name: name.clone(),
                    source,
                })?;
            if ctx.is_pending() {
                tracing::trace!(op = %name, "operation still pending on device");
            }
        }
        Ok(())
    }

    /// Number of operations in the net.
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// The placed operations, in execution order.
    pub fn operations(&self) -> impl Iterator<Item = &dyn Operation> {
        self.steps.iter().map(|step| step.op.as_ref())
    }
}

/// Pick the device `def` runs on.
///
/// The target device wins when both a device handle and an implementation
/// for the operator's data type exist; otherwise CPU, if fallback is on.
fn select_device(
    registry: &OpRegistry,
    def: &OperatorDef,
    devices: &[Arc<dyn Device>],
    options: &NetOptions,
) -> Result<Arc<dyn Device>> {
    let info = registry
        .registration(&def.op_type)
        .ok_or_else(|| Error::UnknownOperator(def.op_type.clone()))?;
    let dtype = def.data_type()?;

    let candidate = |device_type: DeviceType| {
        info.creator(&OpKey::new(device_type, dtype))?;
        devices
            .iter()
            .find(|device| device.device_type() == device_type)
            .cloned()
    };

    let target = options.target_device;
    if let Some(device) = candidate(target) {
        return Ok(device);
    }
    if options.cpu_fallback && target != DeviceType::Cpu {
        if let Some(device) = candidate(DeviceType::Cpu) {
            tracing::info!(
                op = def.display_name(),
                %target,
                "falling back to CPU"
            );
            return Ok(device);
        }
    }

    Err(RuntimeError::NoAvailableDevice {
        op: def.display_name().to_string(),
        target,
    })
}
