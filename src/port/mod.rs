//! Port layer - CPU-specific implementations
//!
//! Interrupt masking, the first-task launcher and the kernel-facing entry
//! points for the MIK32. Other targets get a host stub so the port logic can
//! be exercised in tests.

pub mod scr1_timer;

#[cfg(target_arch = "riscv32")]
pub mod mik32;

#[cfg(target_arch = "riscv32")]
pub use mik32::*;

// Host implementations (for testing)
#[cfg(not(target_arch = "riscv32"))]
pub mod stub {
    use portable_atomic::{AtomicBool, Ordering};

    static MIE: AtomicBool = AtomicBool::new(false);
    static MTIE: AtomicBool = AtomicBool::new(false);

    pub fn disable_interrupts() {
        MIE.store(false, Ordering::SeqCst);
    }

    pub fn enable_interrupts() {
        MIE.store(true, Ordering::SeqCst);
    }

    pub fn interrupts_enabled() -> bool {
        MIE.load(Ordering::SeqCst)
    }

    pub fn park() -> ! {
        disable_interrupts();
        loop {
            core::hint::spin_loop();
        }
    }

    pub fn enable_timer_interrupt() {
        MTIE.store(true, Ordering::SeqCst);
    }

    pub fn timer_interrupt_enabled() -> bool {
        MTIE.load(Ordering::SeqCst)
    }
}

#[cfg(not(target_arch = "riscv32"))]
pub use stub::*;
