//! Scheduler bootstrap and shutdown
//!
//! A [`Port`] is the composition of everything the bootstrap needs: the
//! shared [`PortContext`], the interrupt stack, the tick timer, the
//! first-task launcher and the fault policy. Boot code builds one (or uses
//! the MIK32 default) and calls [`Port::start`] exactly once.

use core::convert::Infallible;

use crate::config::{CFG_ISR_STACK_CHECK_EN, PORT_BYTE_ALIGNMENT_MASK};
use crate::context::PortContext;
use crate::error::{Fault, PortError, PortResult};
use crate::fault::{FaultHandler, SpinHalt};
use crate::hooks::{FirstTaskLauncher, TickTimer};
use crate::isr_stack::InterruptStack;
use crate::port_assert;
use crate::types::TaskHandle;

/// Port composition
pub struct Port<'a, S, T, L, H = SpinHalt> {
    ctx: &'a PortContext,
    isr_stack: &'a S,
    timer: T,
    launcher: L,
    handler: H,
}

impl<'a, S, T, L, H> Port<'a, S, T, L, H>
where
    S: InterruptStack,
    T: TickTimer,
    L: FirstTaskLauncher,
    H: FaultHandler,
{
    /// Compose a port
    pub const fn new(ctx: &'a PortContext, isr_stack: &'a S, timer: T, launcher: L, handler: H) -> Self {
        Self {
            ctx,
            isr_stack,
            timer,
            launcher,
            handler,
        }
    }

    /// Replace the tick timer
    pub fn with_timer<T2: TickTimer>(self, timer: T2) -> Port<'a, S, T2, L, H> {
        Port {
            ctx: self.ctx,
            isr_stack: self.isr_stack,
            timer,
            launcher: self.launcher,
            handler: self.handler,
        }
    }

    /// Replace the fault policy
    pub fn with_fault_handler<H2: FaultHandler>(self, handler: H2) -> Port<'a, S, T, L, H2> {
        Port {
            ctx: self.ctx,
            isr_stack: self.isr_stack,
            timer: self.timer,
            launcher: self.launcher,
            handler,
        }
    }

    /// Shared context
    #[inline(always)]
    pub fn context(&self) -> &'a PortContext {
        self.ctx
    }

    /// Tick timer, for the tick interrupt handler
    #[inline(always)]
    pub fn timer(&self) -> &T {
        &self.timer
    }

    /// Fault policy
    #[inline(always)]
    pub fn fault_handler(&self) -> &H {
        &self.handler
    }

    /// Start multitasking
    ///
    /// Checks the interrupt stack geometry, arms the tick timer and jumps into
    /// the first task. The success type is uninhabited: this only ever comes
    /// back with an error.
    ///
    /// # Returns
    /// * `Err(PortError::SchedulerRunning)` - Already started, nothing touched
    /// * `Err(PortError::FirstTaskReturned)` - The launch primitive returned
    pub fn start(&self) -> PortResult<Infallible> {
        if self.ctx.is_running() {
            return Err(PortError::SchedulerRunning);
        }

        // The interrupt stack is the stack main() ran on before this point,
        // or the static one; either way its top must be aligned.
        let top = self.isr_stack.top();
        crate::debug!("interrupt stack top {=usize:#x}", top);
        port_assert!(&self.handler, top & PORT_BYTE_ALIGNMENT_MASK == 0);

        crate::info!("arming tick timer");
        self.timer.setup_tick_interrupt();

        self.ctx.mark_running()?;
        crate::info!("launching first task");
        unsafe { self.launcher.start_first_task() };

        crate::error!("first task launch returned");
        Err(PortError::FirstTaskReturned)
    }

    /// Stop multitasking
    ///
    /// Not supported on this target: halts instead of returning to a caller
    /// that would assume the scheduler is still running.
    pub fn end(&self) -> ! {
        crate::warn!("scheduler shutdown requested");
        self.handler.halt(Fault::SchedulerEnded)
    }

    /// Report a task stack overflow detected by the kernel
    pub fn stack_overflow(&self, task: TaskHandle, name: &str) -> ! {
        self.handler.stack_overflow(task, name)
    }

    /// Check the interrupt stack fill pattern
    ///
    /// Only active at overflow-check level 3 with a static interrupt stack.
    /// A damaged pattern is an assertion failure, not a task stack overflow.
    pub fn check_isr_stack(&self) {
        if CFG_ISR_STACK_CHECK_EN {
            self.check_isr_stack_now();
        }
    }

    /// Check the interrupt stack fill pattern regardless of configuration
    pub fn check_isr_stack_now(&self) {
        if !self.isr_stack.fill_intact() {
            crate::error!("interrupt stack fill pattern overwritten");
            port_assert!(&self.handler, false);
            self.handler.halt(Fault::IsrStackOverflow);
        }
    }
}
