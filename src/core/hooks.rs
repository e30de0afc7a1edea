//! Hook contracts between the port and its collaborators
//!
//! The bootstrap consumes two strategies: something that arms the periodic
//! tick and the lower-level primitive that jumps into the first task. Both are
//! plain traits so boot code can compose its own implementations instead of
//! the MIK32 defaults.

/// Periodic tick source
pub trait TickTimer {
    /// Configure and start the timer so it raises the tick interrupt at
    /// [`CFG_TICK_RATE_HZ`](crate::config::CFG_TICK_RATE_HZ)
    fn setup_tick_interrupt(&self);

    /// Schedule the next tick from the tick interrupt handler
    fn reload(&self) {}
}

impl<T: TickTimer + ?Sized> TickTimer for &T {
    fn setup_tick_interrupt(&self) {
        (**self).setup_tick_interrupt()
    }

    fn reload(&self) {
        (**self).reload()
    }
}

/// First-task launch primitive supplied by the machine-level port
pub trait FirstTaskLauncher {
    /// Restore the first task's context and jump into it
    ///
    /// # Safety
    /// The kernel must have selected a current task with a fully initialized
    /// stack frame. Under correct operation this never returns.
    unsafe fn start_first_task(&self);
}
