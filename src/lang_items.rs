//! Language items and default exception handlers

// When defmt feature is enabled on the target, log over RTT
#[cfg(all(feature = "defmt", target_arch = "riscv32"))]
use defmt_rtt as _;

#[cfg(all(not(feature = "defmt"), target_arch = "riscv32"))]
use panic_halt as _;

// Defmt panic handler
#[cfg(all(feature = "defmt", target_arch = "riscv32"))]
#[defmt::panic_handler]
fn defmt_panic() -> ! {
    crate::port::park()
}

#[cfg(all(feature = "defmt", target_arch = "riscv32"))]
#[panic_handler]
fn panic(info: &core::panic::PanicInfo) -> ! {
    crate::fatal!("panic: {}", defmt::Display2Format(info))
}

// Default exception handler before the kernel installs its trap vector
#[cfg(all(feature = "rt", target_arch = "riscv32"))]
#[export_name = "ExceptionHandler"]
fn exception_handler(_trap_frame: &riscv_rt::TrapFrame) -> ! {
    crate::fatal!("unhandled exception")
}

// Defmt timestamp
#[cfg(all(feature = "defmt", target_arch = "riscv32"))]
defmt::timestamp!("{=u64}", crate::port::mtime_now());
