//! Registry listings.

use std::fmt::Write;

use anyhow::{Result, bail};
use tessera_core::OpRegistry;

/// Describe registered operators, one per line, with their specializations.
///
/// With `op`, only that operator is listed; an unregistered name is an error.
///
/// ```text
/// Add            CPU/f32, CPU/i32
/// ```
pub fn describe_registry(registry: &OpRegistry, op: Option<&str>) -> Result<String> {
    let op_types = match op {
        Some(name) if registry.contains(name) => vec![name],
        Some(name) => bail!("Operator '{name}' is not registered"),
        None => registry.op_types(),
    };

    let width = op_types.iter().map(|name| name.len()).max().unwrap_or(0);
    let mut out = String::new();
    for op_type in op_types {
        let keys = registry
            .registration(op_type)
            .map(|info| info.keys())
            .unwrap_or_default();
        let keys: Vec<String> = keys.iter().map(ToString::to_string).collect();
        writeln!(out, "{op_type:<width$}  {}", keys.join(", "))?;
    }
    Ok(out)
}
