//! Operator registry: resolves `(op type, device type, data type)` to a factory.

use crate::context::OpConstructContext;
use crate::operation::Operation;
use crate::types::{DataType, DeviceType};
use crate::{Error, Result};
use std::collections::{BTreeSet, HashMap};
use std::fmt;
use std::sync::Arc;

/// Factory producing an operation from a construct context.
pub type OpCreator =
    Arc<dyn Fn(&mut OpConstructContext<'_>) -> Box<dyn Operation> + Send + Sync>;

/// Composite key of one specialization of an operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct OpKey {
    pub device_type: DeviceType,
    pub data_type: DataType,
}

impl OpKey {
    pub fn new(device_type: DeviceType, data_type: DataType) -> Self {
        Self {
            device_type,
            data_type,
        }
    }
}

impl fmt::Display for OpKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.device_type, self.data_type)
    }
}

/// Operations constructible directly from a construct context.
///
/// Implementing this is all an operator needs for [`OpRegistry::default_creator`].
pub trait ConstructOp: Operation + Sized + 'static {
    fn construct(context: &mut OpConstructContext<'_>) -> Self;
}

/// Everything registered under one operator type.
///
/// Every key in the factory map has its device type in `devices`.
#[derive(Default)]
pub struct OpRegistrationInfo {
    devices: BTreeSet<DeviceType>,
    creators: HashMap<OpKey, OpCreator>,
}

impl OpRegistrationInfo {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record that `device_type` is available. Idempotent.
    pub fn add_device(&mut self, device_type: DeviceType) {
        self.devices.insert(device_type);
    }

    /// Insert `creator` under `key`, returning the factory it replaced.
    ///
    /// Also records the key's device type.
    pub fn register(&mut self, key: OpKey, creator: OpCreator) -> Option<OpCreator> {
        self.devices.insert(key.device_type);
        self.creators.insert(key, creator)
    }

    pub fn devices(&self) -> &BTreeSet<DeviceType> {
        &self.devices
    }

    pub fn creator(&self, key: &OpKey) -> Option<&OpCreator> {
        self.creators.get(key)
    }

    /// Registered keys, sorted.
    pub fn keys(&self) -> Vec<OpKey> {
        let mut keys: Vec<_> = self.creators.keys().copied().collect();
        keys.sort();
        keys
    }
}

impl fmt::Debug for OpRegistrationInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OpRegistrationInfo")
            .field("devices", &self.devices)
            .field("keys", &self.keys())
            .finish()
    }
}

/// Catalog from operator type name to its registrations.
///
/// Populated once by an explicit startup routine, then shared read-only
/// (typically behind an `Arc` or a `&'static`) and queried concurrently.
/// Registration takes `&mut self`, so a shared registry cannot change.
///
/// # Example
///
/// ```ignore
/// let mut registry = OpRegistry::new();
/// register_op!(registry, "Add", Eltwise<f32>, DeviceType::Cpu, f32)?;
///
/// let mut ctx = OpConstructContext::new(&workspace);
/// ctx.set_operator_def(Arc::new(def));
/// ctx.set_device(&cpu);
/// let op = registry.create_operation(&mut ctx, DeviceType::Cpu)?;
/// ```
#[derive(Debug, Default)]
pub struct OpRegistry {
    registry: HashMap<String, OpRegistrationInfo>,
}

impl OpRegistry {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `creator` for `op_type` on `(device_type, data_type)`.
    ///
    /// Registering an existing key replaces its factory; the replacement is
    /// logged since it means two modules claim the same specialization.
    pub fn register(
        &mut self,
        op_type: &str,
        device_type: DeviceType,
        data_type: DataType,
        creator: OpCreator,
    ) -> Result<()> {
        if op_type.is_empty() {
            return Err(Error::InvalidArgument(
                "Cannot register an operator with an empty type name".to_string(),
            ));
        }

        let info = self.registry.entry(op_type.to_string()).or_default();
        info.add_device(device_type);
        let key = OpKey::new(device_type, data_type);
        if info.register(key, creator).is_some() {
            tracing::warn!(op_type, %key, "duplicate operator registration, keeping the latest");
        } else {
            tracing::trace!(op_type, %key, "registered operator");
        }
        Ok(())
    }

    /// Device types with at least one factory for `op_type`.
    ///
    /// Unknown operator types yield an empty set.
    pub fn available_devices(&self, op_type: &str) -> BTreeSet<DeviceType> {
        self.registry
            .get(op_type)
            .map(|info| info.devices().clone())
            .unwrap_or_default()
    }

    /// Build the operation described by the context's definition for `device_type`.
    ///
    /// The data type comes from the definition's `"T"` attribute. When the
    /// definition requested another device, the context receives a copy
    /// stamped with `device_type` so the operation reports the device it was
    /// specialized for.
    ///
    /// # Errors
    ///
    /// - [`Error::UnknownOperator`] if nothing is registered under the op type
    /// - [`Error::UnsupportedSpecialization`] if the op type has no factory for
    ///   `(device_type, data_type)`
    /// - [`Error::InvalidArgument`] if the `"T"` attribute is malformed
    ///
    /// # Panics
    ///
    /// Panics if the context has no operator definition attached.
    pub fn create_operation(
        &self,
        context: &mut OpConstructContext<'_>,
        device_type: DeviceType,
    ) -> Result<Box<dyn Operation>> {
        let def = Arc::clone(context.operator_def());
        let info = self
            .registry
            .get(&def.op_type)
            .ok_or_else(|| Error::UnknownOperator(def.op_type.clone()))?;
        let data_type = def.data_type()?;
        let creator = info
            .creator(&OpKey::new(device_type, data_type))
            .ok_or_else(|| Error::UnsupportedSpecialization {
                op_type: def.op_type.clone(),
                device_type,
                data_type,
            })?;

        if def.device_type != device_type {
            tracing::debug!(
                op = def.display_name(),
                requested = %def.device_type,
                selected = %device_type,
                "placing operator on a different device than requested"
            );
            let mut placed = (*def).clone();
            placed.device_type = device_type;
            context.set_operator_def(Arc::new(placed));
        }

        Ok(creator(context))
    }

    /// Factory that constructs `O` from the context.
    pub fn default_creator<O: ConstructOp>() -> OpCreator {
        Arc::new(|context: &mut OpConstructContext<'_>| -> Box<dyn Operation> {
            Box::new(O::construct(context))
        })
    }

    /// Registration info for `op_type`, if any.
    pub fn registration(&self, op_type: &str) -> Option<&OpRegistrationInfo> {
        self.registry.get(op_type)
    }

    /// Check if an operator type is registered.
    pub fn contains(&self, op_type: &str) -> bool {
        self.registry.contains_key(op_type)
    }

    /// Number of registered operator types.
    pub fn len(&self) -> usize {
        self.registry.len()
    }

    pub fn is_empty(&self) -> bool {
        self.registry.is_empty()
    }

    /// Registered operator type names, sorted.
    pub fn op_types(&self) -> Vec<&str> {
        let mut names: Vec<_> = self.registry.keys().map(|s| s.as_str()).collect();
        names.sort_unstable();
        names
    }
}

/// Register `Impl` for an operator type, device type and element type.
///
/// ```ignore
/// register_op!(registry, "Add", Eltwise<f32>, DeviceType::Cpu, f32)?;
/// ```
#[macro_export]
macro_rules! register_op {
    ($registry:expr, $op_type:expr, $op:ty, $device:expr, $elem:ty) => {
        $registry.register(
            $op_type,
            $device,
            <$elem as $crate::types::Element>::DATA_TYPE,
            $crate::registry::OpRegistry::default_creator::<$op>(),
        )
    };
}
