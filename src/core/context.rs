//! Port-wide state shared with the kernel
//!
//! One [`PortContext`] holds the critical nesting counter and the scheduler
//! lifecycle. The address new tasks return to lives in its own
//! [`TaskReturnAddress`] word, since the kernel's stack setup loads it directly.
//!
//! Initialization order: the context is built at compile time with the
//! non-zero critical nesting sentinel, so it is valid before `main` runs and
//! before the tick timer can fire. The kernel resets the counter to zero once
//! the first task runs.

use portable_atomic::{AtomicPtr, AtomicU8, AtomicUsize, Ordering};

use crate::config::{CFG_TASK_RETURN_ADDRESS, PORT_CRITICAL_NESTING_INIT};
use crate::error::{PortError, PortResult};
use crate::types::PortState;

/// Shared port state
#[repr(C)]
pub struct PortContext {
    critical_nesting: AtomicUsize,
    state: AtomicU8,
}

impl PortContext {
    /// Create a context in the pre-scheduler state
    pub const fn new() -> Self {
        Self {
            critical_nesting: AtomicUsize::new(PORT_CRITICAL_NESTING_INIT),
            state: AtomicU8::new(PortState::PreScheduler as u8),
        }
    }

    // ============ Critical nesting ============

    /// Current critical nesting count
    #[inline(always)]
    pub fn critical_nesting(&self) -> usize {
        self.critical_nesting.load(Ordering::Relaxed)
    }

    /// Raw pointer to the counter, for the context switch assembly
    #[inline(always)]
    pub fn critical_nesting_ptr(&self) -> *mut usize {
        self.critical_nesting.as_ptr()
    }

    /// Reset the counter to zero
    ///
    /// Called by the kernel when real task execution begins.
    #[inline(always)]
    pub fn clear_critical_nesting(&self) {
        self.critical_nesting.store(0, Ordering::SeqCst);
    }

    /// Mask interrupts and enter one more critical level
    #[inline]
    pub fn enter_critical(&self) {
        crate::port::disable_interrupts();
        self.critical_nesting.fetch_add(1, Ordering::SeqCst);
    }

    /// Leave one critical level
    ///
    /// Interrupts are unmasked only when the outermost level closes. While the
    /// pre-scheduler sentinel is in place the count never reaches zero, so
    /// boot code cannot unmask interrupts by accident.
    ///
    /// # Returns
    /// `true` if this call unmasked interrupts
    #[inline]
    pub fn exit_critical(&self) -> bool {
        let prev = self
            .critical_nesting
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1));

        if prev == Ok(1) {
            crate::port::enable_interrupts();
            true
        } else {
            false
        }
    }

    // ============ Lifecycle ============

    /// Current lifecycle state
    #[inline(always)]
    pub fn state(&self) -> PortState {
        match self.state.load(Ordering::Acquire) {
            0 => PortState::PreScheduler,
            _ => PortState::Running,
        }
    }

    /// Check if the scheduler has been started
    #[inline(always)]
    pub fn is_running(&self) -> bool {
        self.state() == PortState::Running
    }

    /// One-way transition into the running state
    pub(crate) fn mark_running(&self) -> PortResult<()> {
        self.state
            .compare_exchange(
                PortState::PreScheduler as u8,
                PortState::Running as u8,
                Ordering::AcqRel,
                Ordering::Acquire,
            )
            .map(|_| ())
            .map_err(|_| PortError::SchedulerRunning)
    }
}

impl Default for PortContext {
    fn default() -> Self {
        Self::new()
    }
}

/// Global port context used by the default MIK32 composition
pub static PORT_CONTEXT: PortContext = PortContext::new();

/// Address of a critical nesting counter
///
/// Context switch assembly saves and restores the count through this pointer.
#[repr(transparent)]
pub struct CriticalNestingPtr(&'static AtomicUsize);

impl CriticalNestingPtr {
    /// Pointer to the counter of `ctx`
    pub const fn to(ctx: &'static PortContext) -> Self {
        Self(&ctx.critical_nesting)
    }

    /// Raw address of the counter
    #[inline(always)]
    pub fn as_ptr(&self) -> *mut usize {
        self.0.as_ptr()
    }
}

/// Critical nesting pointer of [`PORT_CONTEXT`]
#[cfg_attr(target_arch = "riscv32", export_name = "pxCriticalNesting")]
pub static CRITICAL_NESTING_PTR: CriticalNestingPtr = CriticalNestingPtr::to(&PORT_CONTEXT);

// ============ Task return address ============

/// Address a task returns to if its entry function ever returns
///
/// Word-sized, so stack setup code can load it without going through Rust.
/// Holds [`task_return_trap`](crate::fault::task_return_trap) unless an
/// override was configured or installed.
#[repr(transparent)]
pub struct TaskReturnAddress(AtomicPtr<()>);

impl TaskReturnAddress {
    /// Word holding the configured return address
    pub const fn new() -> Self {
        let addr = if CFG_TASK_RETURN_ADDRESS == 0 {
            crate::fault::task_return_trap as *mut ()
        } else {
            CFG_TASK_RETURN_ADDRESS as *mut ()
        };
        Self(AtomicPtr::new(addr))
    }

    /// Current return address
    #[inline(always)]
    pub fn get(&self) -> usize {
        self.0.load(Ordering::Relaxed) as usize
    }

    /// Install a return address, 0 restores the default trap
    ///
    /// Only affects tasks the kernel creates afterwards.
    pub fn set(&self, addr: usize) {
        let addr = match addr {
            0 => crate::fault::task_return_trap as *mut (),
            addr => addr as *mut (),
        };
        self.0.store(addr, Ordering::Relaxed);
    }
}

impl Default for TaskReturnAddress {
    fn default() -> Self {
        Self::new()
    }
}

/// Return address the kernel installs in new task frames
#[cfg_attr(target_arch = "riscv32", export_name = "xTaskReturnAddress")]
pub static TASK_RETURN_ADDRESS: TaskReturnAddress = TaskReturnAddress::new();
