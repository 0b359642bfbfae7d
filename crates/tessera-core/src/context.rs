//! Contexts threaded through the operation lifecycle.
//!
//! - [`OpConstructContext`]: handed to factories while an operation is built.
//! - [`OpInitContext`]: handed to `Operation::init`, once.
//! - [`OpContext`]: handed to every `Operation::run` call.
//!
//! None of them own the workspace or the device; both outlive the contexts.

use crate::device::Device;
use crate::op_def::OperatorDef;
use crate::types::MemoryType;
use crate::workspace::Workspace;
use std::sync::Arc;

/// Ambient state available while constructing an operation.
pub struct OpConstructContext<'a> {
    operator_def: Option<Arc<OperatorDef>>,
    workspace: &'a Workspace,
    device: Option<&'a dyn Device>,
    /// Consumed by output memory placement after construction.
    output_mem_type: MemoryType,
}

impl<'a> OpConstructContext<'a> {
    /// Create a context with no definition or device attached yet.
    pub fn new(workspace: &'a Workspace) -> Self {
        Self {
            operator_def: None,
            workspace,
            device: None,
            output_mem_type: MemoryType::default(),
        }
    }

    pub fn set_operator_def(&mut self, operator_def: Arc<OperatorDef>) {
        self.operator_def = Some(operator_def);
    }

    /// The definition of the operation being built.
    ///
    /// # Panics
    ///
    /// Panics if no definition has been attached.
    pub fn operator_def(&self) -> &Arc<OperatorDef> {
        self.operator_def
            .as_ref()
            .expect("operator_def was not set on the construct context")
    }

    pub fn has_operator_def(&self) -> bool {
        self.operator_def.is_some()
    }

    pub fn workspace(&self) -> &'a Workspace {
        self.workspace
    }

    pub fn set_device(&mut self, device: &'a dyn Device) {
        self.device = Some(device);
    }

    /// The target device.
    ///
    /// # Panics
    ///
    /// Panics if no device has been attached.
    pub fn device(&self) -> &'a dyn Device {
        self.device
            .expect("device was not set on the construct context")
    }

    pub fn try_device(&self) -> Option<&'a dyn Device> {
        self.device
    }

    pub fn set_output_mem_type(&mut self, mem_type: MemoryType) {
        self.output_mem_type = mem_type;
    }

    pub fn output_mem_type(&self) -> MemoryType {
        self.output_mem_type
    }
}

/// Ambient state for the one-time `Operation::init` call.
pub struct OpInitContext<'a> {
    workspace: &'a Workspace,
    device: Option<&'a dyn Device>,
}

impl<'a> OpInitContext<'a> {
    pub fn new(workspace: &'a Workspace, device: Option<&'a dyn Device>) -> Self {
        Self { workspace, device }
    }

    pub fn workspace(&self) -> &'a Workspace {
        self.workspace
    }

    pub fn set_device(&mut self, device: &'a dyn Device) {
        self.device = Some(device);
    }

    /// The device the operation was built for.
    ///
    /// # Panics
    ///
    /// Panics if no device has been attached.
    pub fn device(&self) -> &'a dyn Device {
        self.device.expect("device was not set on the init context")
    }

    pub fn try_device(&self) -> Option<&'a dyn Device> {
        self.device
    }
}

/// Per-invocation execution context for `Operation::run`.
///
/// Backends that enqueue work and return before it completes call
/// [`OpContext::mark_pending`]; the caller then knows the returned status
/// reflects submission only.
pub struct OpContext<'a> {
    workspace: &'a Workspace,
    device: &'a dyn Device,
    pending: bool,
}

impl<'a> OpContext<'a> {
    pub fn new(workspace: &'a Workspace, device: &'a dyn Device) -> Self {
        Self {
            workspace,
            device,
            pending: false,
        }
    }

    pub fn workspace(&self) -> &'a Workspace {
        self.workspace
    }

    pub fn device(&self) -> &'a dyn Device {
        self.device
    }

    pub fn mark_pending(&mut self) {
        self.pending = true;
    }

    pub fn is_pending(&self) -> bool {
        self.pending
    }
}
