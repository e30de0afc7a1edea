//! Fatal fault handling
//!
//! Every fault the port detects or the kernel reports ends here. A
//! [`FaultHandler`] never returns: the default policy masks interrupts and
//! spins so corrupted state cannot propagate. Integrators substitute their
//! own handler to log, reset, or park the system differently.

use crate::error::Fault;
use crate::types::TaskHandle;

/// Terminal fault policy
pub trait FaultHandler {
    /// Stop the system after `fault`
    fn halt(&self, fault: Fault) -> !;

    /// Called when the kernel detects that `task` overran its stack
    ///
    /// The stack of `task` is unrecoverable, so this must not return.
    fn stack_overflow(&self, task: TaskHandle, name: &str) -> ! {
        crate::error!("stack overflow in task {=str} @ {=usize:#x}", name, task.addr());
        self.halt(Fault::StackOverflow)
    }
}

/// Default policy: mask interrupts and spin forever
#[derive(Debug, Clone, Copy, Default)]
pub struct SpinHalt;

impl FaultHandler for SpinHalt {
    fn halt(&self, fault: Fault) -> ! {
        crate::fatal!("fatal: {}", fault)
    }
}

impl<H: FaultHandler + ?Sized> FaultHandler for &H {
    fn halt(&self, fault: Fault) -> ! {
        (**self).halt(fault)
    }

    fn stack_overflow(&self, task: TaskHandle, name: &str) -> ! {
        (**self).stack_overflow(task, name)
    }
}

/// Default return target of task entry functions
///
/// Reaching it means a task function returned instead of looping or deleting
/// itself.
#[no_mangle]
pub extern "C" fn task_return_trap() -> ! {
    SpinHalt.halt(Fault::TaskReturned)
}

/// Assert a port invariant, halting through `handler` when it fails
///
/// Compiled out unless the `assert` feature is enabled.
#[macro_export]
macro_rules! port_assert {
    ($handler:expr, $cond:expr $(,)?) => {
        if $crate::config::CFG_ASSERT_EN && !($cond) {
            $crate::fault::FaultHandler::halt(
                $handler,
                $crate::error::Fault::AssertFailed {
                    file: file!(),
                    line: line!(),
                },
            )
        }
    };
}
