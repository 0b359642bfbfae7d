//! Typed attribute extraction from operator definitions.
//!
//! A missing attribute yields the caller's default. An attribute that is
//! present but holds an incompatible value means the graph and the operator
//! disagree about the node's configuration, which is treated as a broken
//! construction sequence and panics.

use crate::op_def::{ArgValue, OperatorDef};
use crate::types::DataType;

/// Coercion from a stored attribute value to a Rust type.
pub trait FromArg: Sized {
    /// Coerce a scalar attribute.
    fn from_arg(value: &ArgValue) -> Option<Self>;

    /// Coerce a repeated attribute.
    fn from_repeated(value: &ArgValue) -> Option<Vec<Self>>;
}

impl FromArg for f32 {
    fn from_arg(value: &ArgValue) -> Option<Self> {
        match value {
            ArgValue::Float(v) => Some(*v),
            ArgValue::Int(v) => Some(*v as f32),
            _ => None,
        }
    }

    fn from_repeated(value: &ArgValue) -> Option<Vec<Self>> {
        match value {
            ArgValue::Floats(v) => Some(v.clone()),
            ArgValue::Ints(v) => Some(v.iter().map(|&x| x as f32).collect()),
            _ => None,
        }
    }
}

impl FromArg for i64 {
    fn from_arg(value: &ArgValue) -> Option<Self> {
        match value {
            ArgValue::Int(v) => Some(*v),
            _ => None,
        }
    }

    fn from_repeated(value: &ArgValue) -> Option<Vec<Self>> {
        match value {
            ArgValue::Ints(v) => Some(v.clone()),
            _ => None,
        }
    }
}

impl FromArg for i32 {
    fn from_arg(value: &ArgValue) -> Option<Self> {
        i64::from_arg(value).and_then(|v| i32::try_from(v).ok())
    }

    fn from_repeated(value: &ArgValue) -> Option<Vec<Self>> {
        i64::from_repeated(value)?
            .into_iter()
            .map(|v| i32::try_from(v).ok())
            .collect()
    }
}

impl FromArg for usize {
    fn from_arg(value: &ArgValue) -> Option<Self> {
        i64::from_arg(value).and_then(|v| usize::try_from(v).ok())
    }

    fn from_repeated(value: &ArgValue) -> Option<Vec<Self>> {
        i64::from_repeated(value)?
            .into_iter()
            .map(|v| usize::try_from(v).ok())
            .collect()
    }
}

impl FromArg for bool {
    fn from_arg(value: &ArgValue) -> Option<Self> {
        i64::from_arg(value).map(|v| v != 0)
    }

    fn from_repeated(value: &ArgValue) -> Option<Vec<Self>> {
        i64::from_repeated(value).map(|v| v.into_iter().map(|x| x != 0).collect())
    }
}

impl FromArg for String {
    fn from_arg(value: &ArgValue) -> Option<Self> {
        match value {
            ArgValue::String(v) => Some(v.clone()),
            _ => None,
        }
    }

    fn from_repeated(value: &ArgValue) -> Option<Vec<Self>> {
        match value {
            ArgValue::Strings(v) => Some(v.clone()),
            _ => None,
        }
    }
}

impl FromArg for DataType {
    fn from_arg(value: &ArgValue) -> Option<Self> {
        i64::from_arg(value).and_then(DataType::from_code)
    }

    fn from_repeated(value: &ArgValue) -> Option<Vec<Self>> {
        i64::from_repeated(value)?
            .into_iter()
            .map(DataType::from_code)
            .collect()
    }
}

/// Attribute `name` of `def` coerced to `T`, or `default` when absent.
///
/// # Panics
///
/// Panics if the attribute exists but cannot be coerced to `T`.
pub fn get_optional_arg<T: FromArg>(def: &OperatorDef, name: &str, default: T) -> T {
    match def.arg(name) {
        None => default,
        Some(value) => T::from_arg(value).unwrap_or_else(|| {
            panic!(
                "argument '{name}' of operator '{}' holds a {} value, not {}",
                def.display_name(),
                value.kind(),
                std::any::type_name::<T>()
            )
        }),
    }
}

/// Repeated attribute `name` of `def` coerced to `Vec<T>`, or `default` when absent.
///
/// # Panics
///
/// Panics if the attribute exists but cannot be coerced to a sequence of `T`.
pub fn get_repeated_args<T: FromArg>(def: &OperatorDef, name: &str, default: Vec<T>) -> Vec<T> {
    match def.arg(name) {
        None => default,
        Some(value) => T::from_repeated(value).unwrap_or_else(|| {
            panic!(
                "argument '{name}' of operator '{}' holds a {} value, not a sequence of {}",
                def.display_name(),
                value.kind(),
                std::any::type_name::<T>()
            )
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn def() -> OperatorDef {
        OperatorDef::new("Test")
            .with_arg("f", 1.5f32)
            .with_arg("i", 7i64)
            .with_arg("neg", -3i64)
            .with_arg("s", "relu")
            .with_arg("fs", vec![1.0f32, 2.0])
            .with_arg("is", vec![1i64, 0, -1])
            .with_arg("dt", DataType::I64)
    }

    #[test]
    fn test_missing_returns_default() {
        let def = def();
        assert_eq!(get_optional_arg(&def, "x", 3.25f32), 3.25);
        assert_eq!(get_optional_arg(&def, "x", -9i64), -9);
        assert_eq!(get_optional_arg(&def, "x", 4usize), 4);
        assert!(get_optional_arg(&def, "x", true));
        assert_eq!(get_optional_arg(&def, "x", "dflt".to_string()), "dflt");
        assert_eq!(get_optional_arg(&def, "x", DataType::U8), DataType::U8);
        assert_eq!(get_repeated_args::<i64>(&def, "x", vec![]), Vec::<i64>::new());
        assert_eq!(get_repeated_args(&def, "x", vec![0.5f32]), vec![0.5]);
    }

    #[test]
    fn test_scalar_coercion() {
        let def = def();
        assert_eq!(get_optional_arg(&def, "f", 0.0f32), 1.5);
        assert_eq!(get_optional_arg(&def, "i", 0.0f32), 7.0);
        assert_eq!(get_optional_arg(&def, "i", 0i32), 7);
        assert_eq!(get_optional_arg(&def, "i", 0usize), 7);
        assert!(get_optional_arg(&def, "i", false));
        assert_eq!(get_optional_arg(&def, "s", String::new()), "relu");
        assert_eq!(get_optional_arg(&def, "dt", DataType::F32), DataType::I64);
    }

    #[test]
    fn test_repeated_coercion() {
        let def = def();
        assert_eq!(get_repeated_args::<f32>(&def, "fs", vec![]), vec![1.0, 2.0]);
        assert_eq!(get_repeated_args::<i64>(&def, "is", vec![]), vec![1, 0, -1]);
        assert_eq!(get_repeated_args::<bool>(&def, "is", vec![]), vec![true, false, true]);
        assert_eq!(get_repeated_args::<f32>(&def, "is", vec![]), vec![1.0, 0.0, -1.0]);
    }

    #[test]
    #[should_panic(expected = "argument 's' of operator 'Test'")]
    fn test_type_mismatch_panics() {
        get_optional_arg(&def(), "s", 0i64);
    }

    #[test]
    #[should_panic(expected = "argument 'neg'")]
    fn test_negative_usize_panics() {
        get_optional_arg(&def(), "neg", 0usize);
    }

    #[test]
    #[should_panic(expected = "not a sequence")]
    fn test_repeated_mismatch_panics() {
        get_repeated_args::<String>(&def(), "is", vec![]);
    }
}
