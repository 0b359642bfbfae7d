//! Startup registration of the core operators.

use std::sync::OnceLock;

use tessera_core::{OpRegistry, Result};

use crate::families::eltwise;
use crate::operators::{activation, reshape};

static GLOBAL_REGISTRY: OnceLock<OpRegistry> = OnceLock::new();

/// Register every core operator into `registry`, in a fixed order.
///
/// Custom operators can be registered before or after this call; a later
/// registration of the same specialization replaces the earlier one.
pub fn register_core_ops(registry: &mut OpRegistry) -> Result<()> {
    eltwise::register(registry)?;
    activation::register(registry)?;
    reshape::register(registry)?;

    tracing::debug!(op_types = registry.len(), "registered core operators");
    Ok(())
}

/// Returns an operator registry pre-populated with the core operators.
///
/// The registry includes:
/// - 6 eltwise operators (Add, Sub, Mul, Div, Max, Min)
/// - Activation
/// - Reshape
pub fn core_op_registry() -> OpRegistry {
    let mut registry = OpRegistry::new();
    // Only fails on an empty operator type name, which no core module uses.
    register_core_ops(&mut registry).expect("core operator registration failed");
    registry
}

/// Process-wide registry, built from [`core_op_registry`] on first use.
///
/// The returned reference is shared and immutable for the rest of the
/// process, so it can be queried from any thread.
pub fn global_op_registry() -> &'static OpRegistry {
    GLOBAL_REGISTRY.get_or_init(core_op_registry)
}
