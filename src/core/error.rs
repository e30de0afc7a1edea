//! Error and fault types for the port layer
//!
//! Recoverable conditions are returned as [`PortError`]. Everything else is a
//! [`Fault`] and ends in a never-returning halt.

/// Port error type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u16)]
pub enum PortError {
    /// The first-task launch primitive returned control to the bootstrap
    FirstTaskReturned = 1001,
    /// The scheduler was already started
    SchedulerRunning = 1002,
}

/// Result type alias for port operations
pub type PortResult<T> = Result<T, PortError>;

impl PortError {
    /// Raw status code, matching the C kernel's `pdFAIL`-style checks
    #[inline]
    pub fn code(self) -> u16 {
        self as u16
    }
}

/// Unrecoverable conditions detected by the port or reported by the kernel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Fault {
    /// A runtime assertion failed
    AssertFailed {
        /// Source file of the assertion
        file: &'static str,
        /// Source line of the assertion
        line: u32,
    },
    /// A task overran its stack
    StackOverflow,
    /// The interrupt stack fill pattern was overwritten
    IsrStackOverflow,
    /// The scheduler was asked to stop, which this port does not support
    SchedulerEnded,
    /// A task function returned to its return-address sentinel
    TaskReturned,
}
