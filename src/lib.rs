//! Real-time kernel port layer for the MIK32 microcontroller
//!
//! Glue between an externally supplied preemptive kernel and the MIK32
//! (RV32IMC core, Syntacore SCR1 machine timer):
//! - Tick timer arming through an overridable [`TickTimer`] strategy
//! - Scheduler bootstrap onto a dedicated interrupt stack
//! - Critical nesting and task return state shared with the kernel
//! - Never-returning fault hooks for stack overflow and shutdown

#![no_std]
#![deny(unsafe_op_in_unsafe_fn)]

// ============ Critical Section ============

#[cfg(target_arch = "riscv32")]
mod cs_impl {
    use critical_section::{set_impl, Impl, RawRestoreState};

    struct SingleHartCriticalSection;
    set_impl!(SingleHartCriticalSection);

    unsafe impl Impl for SingleHartCriticalSection {
        unsafe fn acquire() -> RawRestoreState {
            let was_active = crate::port::interrupts_enabled();
            crate::port::disable_interrupts();
            was_active
        }

        unsafe fn release(was_active: RawRestoreState) {
            if was_active {
                crate::port::enable_interrupts();
            }
        }
    }
}

// ============ Modules ============

pub mod log;
mod lang_items;

pub mod core;
pub mod port;

// ============ Re-exports ============

pub use self::core::config;
pub use self::core::config::*;
pub use self::core::context;
pub use self::core::context::{
    CriticalNestingPtr, PortContext, TaskReturnAddress, CRITICAL_NESTING_PTR, PORT_CONTEXT,
    TASK_RETURN_ADDRESS,
};
pub use self::core::critical;
pub use self::core::error;
pub use self::core::error::{Fault, PortError, PortResult};
pub use self::core::fault;
pub use self::core::fault::{FaultHandler, SpinHalt};
pub use self::core::hooks;
pub use self::core::hooks::{FirstTaskLauncher, TickTimer};
pub use self::core::isr_stack;
pub use self::core::isr_stack::{InterruptStack, IsrStackTop, StackTopWord, StaticIsrStack};
pub use self::core::sched;
pub use self::core::sched::Port;
pub use self::core::types;
pub use self::core::types::*;

pub use port::scr1_timer::Scr1Timer;
