//! Device, data and memory type tags shared by definitions, tensors and the registry.

use std::fmt;
use std::str::FromStr;

/// Backend category an operation runs on.
///
/// Ordered so that device sets iterate deterministically (CPU first).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum DeviceType {
    #[default]
    Cpu,
    Gpu,
    Hexagon,
    Hta,
    Apu,
}

impl DeviceType {
    /// All device types, in ordering order.
    pub const ALL: [DeviceType; 5] = [
        DeviceType::Cpu,
        DeviceType::Gpu,
        DeviceType::Hexagon,
        DeviceType::Hta,
        DeviceType::Apu,
    ];

    /// Canonical upper-case name.
    pub fn as_str(&self) -> &'static str {
        match self {
            DeviceType::Cpu => "CPU",
            DeviceType::Gpu => "GPU",
            DeviceType::Hexagon => "HEXAGON",
            DeviceType::Hta => "HTA",
            DeviceType::Apu => "APU",
        }
    }
}

impl fmt::Display for DeviceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DeviceType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        DeviceType::ALL
            .into_iter()
            .find(|d| d.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("Unknown device type '{s}'"))
    }
}

/// Element data types.
///
/// The discriminant is the stable code stored in an operator definition's
/// `"T"` attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum DataType {
    F32 = 1,
    U8 = 2,
    F16 = 3,
    I32 = 4,
    I64 = 5,
    BF16 = 6,
}

impl DataType {
    /// Size of this data type in bytes.
    pub fn size(&self) -> usize {
        match self {
            DataType::F32 | DataType::I32 => 4,
            DataType::F16 | DataType::BF16 => 2,
            DataType::I64 => 8,
            DataType::U8 => 1,
        }
    }

    /// Stable integer code of this data type.
    pub fn code(&self) -> i64 {
        *self as i64
    }

    /// Look up a data type by its integer code.
    pub fn from_code(code: i64) -> Option<Self> {
        match code {
            1 => Some(DataType::F32),
            2 => Some(DataType::U8),
            3 => Some(DataType::F16),
            4 => Some(DataType::I32),
            5 => Some(DataType::I64),
            6 => Some(DataType::BF16),
            _ => None,
        }
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DataType::F32 => "f32",
            DataType::U8 => "u8",
            DataType::F16 => "f16",
            DataType::I32 => "i32",
            DataType::I64 => "i64",
            DataType::BF16 => "bf16",
        };
        f.write_str(name)
    }
}

/// Rust element types with a matching [`DataType`].
pub trait Element: bytemuck::Pod + Send + Sync + 'static {
    const DATA_TYPE: DataType;
}

impl Element for f32 {
    const DATA_TYPE: DataType = DataType::F32;
}

impl Element for u8 {
    const DATA_TYPE: DataType = DataType::U8;
}

impl Element for i32 {
    const DATA_TYPE: DataType = DataType::I32;
}

impl Element for i64 {
    const DATA_TYPE: DataType = DataType::I64;
}

/// Where an operation's outputs should be placed.
///
/// Read by memory placement logic outside the core.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum MemoryType {
    #[default]
    CpuBuffer,
    GpuBuffer,
    GpuImage,
}

impl MemoryType {
    /// Default output placement for a device type.
    ///
    /// Only GPU outputs live in device memory; DSP and APU backends stage
    /// through host buffers.
    pub fn for_device(device_type: DeviceType) -> Self {
        match device_type {
            DeviceType::Gpu => MemoryType::GpuBuffer,
            DeviceType::Cpu | DeviceType::Hexagon | DeviceType::Hta | DeviceType::Apu => {
                MemoryType::CpuBuffer
            }
        }
    }
}
