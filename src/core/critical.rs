//! Critical section handling on top of the port's nesting counter
//!
//! Provides the RAII guard kernel code uses to mask interrupts around
//! shared state.

use crate::context::PortContext;

/// RAII guard for critical sections
///
/// When this guard is created, interrupts are masked and the nesting count
/// of its context goes up by one. Dropping it leaves that level again.
pub struct CriticalSection<'a> {
    ctx: &'a PortContext,
}

impl<'a> CriticalSection<'a> {
    /// Enter a critical section on `ctx`
    #[inline(always)]
    pub fn enter(ctx: &'a PortContext) -> Self {
        ctx.enter_critical();
        CriticalSection { ctx }
    }

    /// Nesting count while this guard is held
    #[inline(always)]
    pub fn nesting(&self) -> usize {
        self.ctx.critical_nesting()
    }
}

impl Drop for CriticalSection<'_> {
    #[inline(always)]
    fn drop(&mut self) {
        self.ctx.exit_critical();
    }
}

/// Execute a closure with interrupts masked
#[inline]
pub fn critical_section<F, R>(ctx: &PortContext, f: F) -> R
where
    F: FnOnce(&CriticalSection<'_>) -> R,
{
    let cs = CriticalSection::enter(ctx);
    f(&cs)
}
