//! Operator definitions: one graph node as handed over by the graph loader.

use crate::arg_helper::{self, FromArg};
use crate::types::{DataType, DeviceType};
use crate::{Error, Result};
use std::collections::HashMap;

/// Name of the attribute carrying the data type of an operator definition.
pub const DATA_TYPE_ARG: &str = "T";

/// A typed attribute value.
#[derive(Debug, Clone, PartialEq)]
pub enum ArgValue {
    Float(f32),
    Int(i64),
    String(String),
    Floats(Vec<f32>),
    Ints(Vec<i64>),
    Strings(Vec<String>),
}

impl ArgValue {
    /// Short name of the stored variant, for diagnostics.
    pub fn kind(&self) -> &'static str {
        match self {
            ArgValue::Float(_) => "float",
            ArgValue::Int(_) => "int",
            ArgValue::String(_) => "string",
            ArgValue::Floats(_) => "floats",
            ArgValue::Ints(_) => "ints",
            ArgValue::Strings(_) => "strings",
        }
    }
}

impl From<f32> for ArgValue {
    fn from(v: f32) -> Self {
        ArgValue::Float(v)
    }
}

impl From<i64> for ArgValue {
    fn from(v: i64) -> Self {
        ArgValue::Int(v)
    }
}

impl From<&str> for ArgValue {
    fn from(v: &str) -> Self {
        ArgValue::String(v.to_string())
    }
}

impl From<Vec<f32>> for ArgValue {
    fn from(v: Vec<f32>) -> Self {
        ArgValue::Floats(v)
    }
}

impl From<Vec<i64>> for ArgValue {
    fn from(v: Vec<i64>) -> Self {
        ArgValue::Ints(v)
    }
}

impl From<DataType> for ArgValue {
    fn from(v: DataType) -> Self {
        ArgValue::Int(v.code())
    }
}

/// Immutable description of one graph node.
///
/// Shared as `Arc<OperatorDef>` between construction contexts and the
/// operation built from it; nobody mutates it once it is shared.
#[derive(Debug, Clone, Default)]
pub struct OperatorDef {
    /// Node name (may be empty).
    pub name: String,

    /// Operator type (e.g., "Add", "Conv2D").
    pub op_type: String,

    /// Requested device type.
    pub device_type: DeviceType,

    /// Input tensor names, in slot order.
    pub inputs: Vec<String>,

    /// Output tensor names, in slot order.
    pub outputs: Vec<String>,

    /// Attributes keyed by name.
    pub args: HashMap<String, ArgValue>,
}

impl OperatorDef {
    /// Create a new definition for the given operator type.
    pub fn new(op_type: impl Into<String>) -> Self {
        Self {
            op_type: op_type.into(),
            ..Default::default()
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_device(mut self, device_type: DeviceType) -> Self {
        self.device_type = device_type;
        self
    }

    pub fn with_data_type(self, data_type: DataType) -> Self {
        self.with_arg(DATA_TYPE_ARG, data_type)
    }

    pub fn with_input(mut self, name: impl Into<String>) -> Self {
        self.inputs.push(name.into());
        self
    }

    pub fn with_output(mut self, name: impl Into<String>) -> Self {
        self.outputs.push(name.into());
        self
    }

    pub fn with_arg(mut self, name: impl Into<String>, value: impl Into<ArgValue>) -> Self {
        self.args.insert(name.into(), value.into());
        self
    }

    /// Get a raw attribute value.
    pub fn arg(&self, name: &str) -> Option<&ArgValue> {
        self.args.get(name)
    }

    /// Check if an attribute exists.
    pub fn has_arg(&self, name: &str) -> bool {
        self.args.contains_key(name)
    }

    /// Attribute coerced to `T`, or `default` when absent.
    pub fn optional_arg<T: FromArg>(&self, name: &str, default: T) -> T {
        arg_helper::get_optional_arg(self, name, default)
    }

    /// Repeated attribute coerced to `Vec<T>`, or `default` when absent.
    pub fn repeated_args<T: FromArg>(&self, name: &str, default: Vec<T>) -> Vec<T> {
        arg_helper::get_repeated_args(self, name, default)
    }

    /// Data type this node computes in, from the `"T"` attribute.
    ///
    /// Defaults to `F32` when the attribute is absent.
    pub fn data_type(&self) -> Result<DataType> {
        match self.args.get(DATA_TYPE_ARG) {
            None => Ok(DataType::F32),
            Some(ArgValue::Int(code)) => DataType::from_code(*code).ok_or_else(|| {
                Error::InvalidArgument(format!(
                    "Operator '{}' has unknown data type code {code}",
                    self.display_name()
                ))
            }),
            Some(other) => Err(Error::InvalidArgument(format!(
                "Operator '{}' has a {} data type attribute, expected int",
                self.display_name(),
                other.kind()
            ))),
        }
    }

    /// Node name, falling back to the operator type for unnamed nodes.
    pub fn display_name(&self) -> &str {
        if self.name.is_empty() {
            &self.op_type
        } else {
            &self.name
        }
    }
}
