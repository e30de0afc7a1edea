//! Boot Example - bring up the port with a custom overflow policy
//!
//! Build for the MIK32 with `--features rt`. The kernel, its task setup and the
//! `xPortStartFirstTask` assembly are linked in from the kernel build.

#![no_std]
#![no_main]

use mik32_port::error::Fault;
use mik32_port::port::{AsmLauncher, LinkerIsrStack};
use mik32_port::types::TaskHandle;
use mik32_port::{FaultHandler, Port, Scr1Timer, PORT_CONTEXT};
use riscv_rt::entry;

// ============ Fault policy ============

/// Logs the offending task, then parks the hart
struct ReportAndPark;

impl FaultHandler for ReportAndPark {
    fn halt(&self, fault: Fault) -> ! {
        mik32_port::fatal!("boot demo halted: {}", fault)
    }

    fn stack_overflow(&self, task: TaskHandle, name: &str) -> ! {
        mik32_port::error!("task {=str} @ {=usize:#x} overflowed", name, task.addr());
        self.halt(Fault::StackOverflow)
    }
}

extern "C" {
    /// Kernel-side setup: creates the application tasks
    fn app_create_tasks();
}

static ISR_STACK: LinkerIsrStack = LinkerIsrStack;

// ============ Main ============

#[entry]
fn main() -> ! {
    unsafe { app_create_tasks() };

    mik32_port::info!(
        "critical nesting before start: {=usize:#x}",
        PORT_CONTEXT.critical_nesting()
    );

    // Same parts as the default `PORT`, with a different fault policy
    let port = Port::new(
        &PORT_CONTEXT,
        &ISR_STACK,
        Scr1Timer::mik32(),
        AsmLauncher,
        ReportAndPark,
    );

    match port.start() {
        Ok(never) => match never {},
        Err(e) => {
            mik32_port::error!("scheduler start failed: {}", e);
            port.end()
        }
    }
}
