//! Device handles passed through the lifecycle contexts.

use crate::types::DeviceType;
use std::fmt::Debug;

/// A compute backend.
///
/// The core only reads the device type; concrete operators and backend
/// layers downcast or query further capabilities themselves.
pub trait Device: Debug + Send + Sync {
    /// Backend category of this device.
    fn device_type(&self) -> DeviceType;

    /// Human-readable device name.
    fn name(&self) -> &str {
        self.device_type().as_str()
    }

    /// Number of worker threads available to kernels.
    fn num_threads(&self) -> usize {
        1
    }
}

/// Host CPU device.
#[derive(Debug, Clone)]
pub struct CpuDevice {
    num_threads: usize,
}

impl CpuDevice {
    /// Create a CPU device using `num_threads` workers (at least one).
    pub fn new(num_threads: usize) -> Self {
        Self {
            num_threads: num_threads.max(1),
        }
    }
}

impl Default for CpuDevice {
    fn default() -> Self {
        let num_threads = std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1);
        Self::new(num_threads)
    }
}

impl Device for CpuDevice {
    fn device_type(&self) -> DeviceType {
        DeviceType::Cpu
    }

    fn num_threads(&self) -> usize {
        self.num_threads
    }
}
