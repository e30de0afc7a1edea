//! Core type definitions shared with the kernel

use core::ffi::c_void;

/// Stack element type (one RV32 word)
pub type StackType = u32;

/// Signed status type used across the C kernel interface
pub type BaseType = i32;

/// Kernel success status
pub const PD_PASS: BaseType = 1;

/// Kernel failure status
pub const PD_FAIL: BaseType = 0;

/// Opaque identity of a kernel task
///
/// The port never dereferences it; it is only handed on to fault hooks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(transparent)]
pub struct TaskHandle(*mut c_void);

impl TaskHandle {
    /// Wrap a raw kernel task pointer
    #[inline(always)]
    pub const fn from_raw(ptr: *mut c_void) -> Self {
        Self(ptr)
    }

    /// Get the raw kernel task pointer
    #[inline(always)]
    pub const fn as_ptr(self) -> *mut c_void {
        self.0
    }

    /// Address of the task, for diagnostics
    #[inline(always)]
    pub fn addr(self) -> usize {
        self.0 as usize
    }
}

/// Scheduler lifecycle as seen by the port
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum PortState {
    /// Boot code is running, interrupts are conceptually masked
    PreScheduler = 0,
    /// The first task has been launched, the kernel owns the hart
    Running = 1,
}
