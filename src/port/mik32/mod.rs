//! MIK32 port implementation
//!
//! Interrupt masking through `mstatus.MIE`, the default port composition and
//! the C-ABI symbols the kernel and its machine-level assembly link against:
//!
//! | Symbol                          | Kind             |
//! |---------------------------------|------------------|
//! | `xPortStartScheduler`           | exported fn      |
//! | `vPortEndScheduler`             | exported fn      |
//! | `vApplicationStackOverflowHook` | exported fn      |
//! | `xISRStackTop`                  | exported word    |
//! | `xTaskReturnAddress`            | exported word    |
//! | `pxCriticalNesting`             | exported pointer |
//! | `xPortStartFirstTask`           | imported fn      |
//! | `__freertos_irq_stack_top`      | linker symbol    |

use core::ffi::{c_char, c_void, CStr};

use riscv::register::{mie, mstatus};

use crate::context::PORT_CONTEXT;
use crate::fault::SpinHalt;
use crate::hooks::{FirstTaskLauncher, TickTimer};
use crate::isr_stack::{InterruptStack, StackTopWord};
use crate::port::scr1_timer::Scr1Timer;
use crate::sched::Port;
use crate::types::{BaseType, StackType, TaskHandle, PD_FAIL};

// ============ Interrupt masking ============

/// Mask machine interrupts
#[inline(always)]
pub fn disable_interrupts() {
    unsafe { mstatus::clear_mie() };
}

/// Unmask machine interrupts
#[inline(always)]
pub fn enable_interrupts() {
    unsafe { mstatus::set_mie() };
}

/// Check whether machine interrupts are unmasked
#[inline(always)]
pub fn interrupts_enabled() -> bool {
    mstatus::read().mie()
}

/// Mask interrupts and spin forever
pub fn park() -> ! {
    disable_interrupts();
    loop {
        core::hint::spin_loop();
    }
}

/// Unmask the machine timer interrupt source
#[inline(always)]
pub fn enable_timer_interrupt() {
    unsafe { mie::set_mtimer() };
}

/// Check whether the machine timer interrupt source is unmasked
#[inline(always)]
pub fn timer_interrupt_enabled() -> bool {
    mie::read().mtimer()
}

// ============ Interrupt stack ============

extern "C" {
    /// Top of the stack main() ran on, provided by the linker script
    static __freertos_irq_stack_top: [StackType; 0];
}

/// Interrupt stack reusing the boot stack named by `__freertos_irq_stack_top`
///
/// Once the scheduler runs, main() never resumes, so its stack becomes the
/// interrupt stack.
pub struct LinkerIsrStack;

impl InterruptStack for LinkerIsrStack {
    fn top(&self) -> usize {
        linker_stack_top() as usize
    }
}

fn linker_stack_top() -> *const u8 {
    unsafe { core::ptr::addr_of!(__freertos_irq_stack_top) as *const u8 }
}

#[cfg(feature = "static-isr-stack")]
pub type DefaultIsrStack = crate::isr_stack::StaticIsrStack<{ crate::config::CFG_ISR_STACK_SIZE_WORDS }>;

#[cfg(not(feature = "static-isr-stack"))]
pub type DefaultIsrStack = LinkerIsrStack;

#[cfg(feature = "static-isr-stack")]
static ISR_STACK: DefaultIsrStack = crate::isr_stack::StaticIsrStack::new();

#[cfg(not(feature = "static-isr-stack"))]
static ISR_STACK: DefaultIsrStack = LinkerIsrStack;

/// Initial interrupt context stack pointer, loaded by the trap entry
#[cfg(feature = "static-isr-stack")]
#[export_name = "xISRStackTop"]
pub static ISR_STACK_TOP: StackTopWord = StackTopWord::new(ISR_STACK.top_ptr());

/// Initial interrupt context stack pointer, loaded by the trap entry
#[cfg(not(feature = "static-isr-stack"))]
#[export_name = "xISRStackTop"]
pub static ISR_STACK_TOP: StackTopWord =
    StackTopWord::new(unsafe { core::ptr::addr_of!(__freertos_irq_stack_top) as *const u8 });

// ============ First task ============

extern "C" {
    /// Restores the first task's context; lives in the machine-level assembly
    fn xPortStartFirstTask();
}

/// Launcher calling into the machine-level assembly
pub struct AsmLauncher;

impl FirstTaskLauncher for AsmLauncher {
    unsafe fn start_first_task(&self) {
        unsafe { xPortStartFirstTask() }
    }
}

// ============ Default composition ============

/// MIK32 port: SCR1 tick timer, default interrupt stack, spin-halt faults
pub static PORT: Port<'static, DefaultIsrStack, Scr1Timer, AsmLauncher> =
    Port::new(&PORT_CONTEXT, &ISR_STACK, Scr1Timer::mik32(), AsmLauncher, SpinHalt);

/// Current `mtime` value, for log timestamps
pub fn mtime_now() -> u64 {
    PORT.timer().now()
}

// ============ Kernel entry points ============

/// Start the scheduler; only returns on failure
#[export_name = "xPortStartScheduler"]
pub extern "C" fn port_start_scheduler() -> BaseType {
    match PORT.start() {
        Ok(never) => match never {},
        Err(_) => PD_FAIL,
    }
}

/// Stop the scheduler, which halts on this port
#[export_name = "vPortEndScheduler"]
pub extern "C" fn port_end_scheduler() -> ! {
    PORT.end()
}

/// Stack overflow hook called by the kernel
///
/// # Safety
/// `name` must be null or point to a NUL-terminated string.
#[export_name = "vApplicationStackOverflowHook"]
pub unsafe extern "C" fn port_stack_overflow_hook(task: *mut c_void, name: *const c_char) -> ! {
    let name = if name.is_null() {
        "<unnamed>"
    } else {
        unsafe { CStr::from_ptr(name) }.to_str().unwrap_or("<invalid>")
    };
    PORT.stack_overflow(TaskHandle::from_raw(task), name)
}

/// Interrupt stack fill check, called by the kernel on context switch
#[no_mangle]
pub extern "C" fn port_check_isr_stack() {
    PORT.check_isr_stack();
}

/// Program the next tick compare value, called from the tick interrupt
#[no_mangle]
pub extern "C" fn port_tick_reload() {
    PORT.timer().reload();
}
