//! SCR1 machine timer binding
//!
//! The MIK32 core timer is the Syntacore SCR1 variant of the RISC-V machine
//! timer: a control/divider pair followed by the 64-bit `mtime` and
//! `mtimecmp` registers, each split into low and high words.
//!
//! | Offset | Register      |
//! |--------|---------------|
//! | 0x00   | `TIMER_CTRL`  |
//! | 0x04   | `TIMER_DIV`   |
//! | 0x08   | `MTIME`       |
//! | 0x0C   | `MTIMEH`      |
//! | 0x10   | `MTIMECMP`    |
//! | 0x14   | `MTIMECMPH`   |

use core::ptr::{read_volatile, write_volatile};

use portable_atomic::{AtomicU64, Ordering};

use crate::hooks::TickTimer;

/// `TIMER_CTRL` counter enable bit
pub const TIMER_CTRL_ENABLE: u32 = 1 << 0;

/// `TIMER_CTRL` clock source bit (0 = core clock, 1 = RTC)
pub const TIMER_CTRL_CLKSRC_RTC: u32 = 1 << 1;

/// One 32-bit register of the timer block
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Register {
    Ctrl,
    Div,
    Mtime,
    MtimeH,
    Mtimecmp,
    MtimecmpH,
}

/// Word access to the timer registers
pub trait TimerRegisters {
    fn read(&self, reg: Register) -> u32;
    fn write(&self, reg: Register, value: u32);

    /// Whether `TIMER_CTRL` and `TIMER_DIV` exist
    fn has_control(&self) -> bool {
        true
    }
}

/// Memory-mapped timer registers
#[derive(Debug, Clone, Copy)]
pub struct Mmio {
    ctrl: usize,
    mtime: usize,
    mtimecmp: usize,
}

impl Mmio {
    /// Registers at the given addresses, `ctrl` 0 when there is no control block
    ///
    /// # Safety
    /// `mtime` and `mtimecmp` (and `ctrl` when non-zero) must be valid for
    /// volatile 32-bit access at offsets 0 and 4 for as long as they are used.
    pub const unsafe fn new(ctrl: usize, mtime: usize, mtimecmp: usize) -> Self {
        Self { ctrl, mtime, mtimecmp }
    }

    fn address(&self, reg: Register) -> usize {
        match reg {
            Register::Ctrl => self.ctrl,
            Register::Div => self.ctrl + 0x04,
            Register::Mtime => self.mtime,
            Register::MtimeH => self.mtime + 0x04,
            Register::Mtimecmp => self.mtimecmp,
            Register::MtimecmpH => self.mtimecmp + 0x04,
        }
    }
}

impl TimerRegisters for Mmio {
    #[inline(always)]
    fn read(&self, reg: Register) -> u32 {
        unsafe { read_volatile(self.address(reg) as *const u32) }
    }

    #[inline(always)]
    fn write(&self, reg: Register, value: u32) {
        unsafe { write_volatile(self.address(reg) as *mut u32, value) }
    }

    fn has_control(&self) -> bool {
        self.ctrl != 0
    }
}

/// Machine timer driver
///
/// Keeps the compare value of the next tick so the tick handler can move
/// `mtimecmp` forward by exactly one period.
pub struct Scr1Timer<R = Mmio> {
    regs: R,
    increments_per_tick: u64,
    next_time: AtomicU64,
}

impl Scr1Timer {
    /// Create a timer driver for the given register addresses
    ///
    /// `ctrl` may be 0 for CLINT-style timers that have no control block.
    ///
    /// # Safety
    /// See [`Mmio::new`].
    pub const unsafe fn new(ctrl: usize, mtime: usize, mtimecmp: usize, increments_per_tick: u64) -> Self {
        Self::with_registers(unsafe { Mmio::new(ctrl, mtime, mtimecmp) }, increments_per_tick)
    }

    /// Timer driver at the configured MIK32 addresses
    #[cfg(target_arch = "riscv32")]
    pub const fn mik32() -> Self {
        use crate::config::{
            CFG_MTIMECMP_BASE_ADDRESS, CFG_MTIME_BASE_ADDRESS, CFG_TIMER_CTRL_ADDRESS,
            CFG_TIMER_INCREMENTS_PER_TICK,
        };

        // The addresses come from the chip memory map or its build-time override.
        unsafe {
            Self::new(
                CFG_TIMER_CTRL_ADDRESS,
                CFG_MTIME_BASE_ADDRESS,
                CFG_MTIMECMP_BASE_ADDRESS,
                CFG_TIMER_INCREMENTS_PER_TICK,
            )
        }
    }
}

impl<R: TimerRegisters> Scr1Timer<R> {
    /// Timer driver over an arbitrary register block
    pub const fn with_registers(regs: R, increments_per_tick: u64) -> Self {
        Self {
            regs,
            increments_per_tick,
            next_time: AtomicU64::new(0),
        }
    }

    /// Register block
    pub fn registers(&self) -> &R {
        &self.regs
    }

    /// `mtime` increments per tick
    #[inline(always)]
    pub fn increments_per_tick(&self) -> u64 {
        self.increments_per_tick
    }

    /// Compare value the next [`reload`](TickTimer::reload) will program
    #[inline(always)]
    pub fn next_time(&self) -> u64 {
        self.next_time.load(Ordering::Relaxed)
    }

    /// Read the 64-bit `mtime` counter
    ///
    /// The high word is re-read until it is stable so a carry between the two
    /// halves cannot produce a torn value.
    pub fn now(&self) -> u64 {
        loop {
            let hi = self.regs.read(Register::MtimeH);
            let lo = self.regs.read(Register::Mtime);
            if hi == self.regs.read(Register::MtimeH) {
                return ((hi as u64) << 32) | lo as u64;
            }
        }
    }

    /// Read back the programmed `mtimecmp`
    pub fn compare(&self) -> u64 {
        let lo = self.regs.read(Register::Mtimecmp);
        let hi = self.regs.read(Register::MtimecmpH);
        ((hi as u64) << 32) | lo as u64
    }

    /// Program `mtimecmp`
    ///
    /// The high word is parked at all-ones first, so the compare can never
    /// match early while only one half has been written.
    fn set_compare(&self, value: u64) {
        self.regs.write(Register::MtimecmpH, u32::MAX);
        self.regs.write(Register::Mtimecmp, value as u32);
        self.regs.write(Register::MtimecmpH, (value >> 32) as u32);
    }

    /// Start the counter on the core clock with no prescaler
    fn enable_counter(&self) {
        if !self.regs.has_control() {
            return;
        }

        self.regs.write(Register::Div, 0);
        let ctrl = self.regs.read(Register::Ctrl);
        self.regs
            .write(Register::Ctrl, (ctrl & !TIMER_CTRL_CLKSRC_RTC) | TIMER_CTRL_ENABLE);
    }
}

impl<R: TimerRegisters> TickTimer for Scr1Timer<R> {
    fn setup_tick_interrupt(&self) {
        self.enable_counter();

        let first = self.now().wrapping_add(self.increments_per_tick);
        self.set_compare(first);
        self.next_time
            .store(first.wrapping_add(self.increments_per_tick), Ordering::Relaxed);

        crate::debug!(
            "tick timer armed: first compare {=u64}, period {=u64}",
            first,
            self.increments_per_tick
        );
        crate::port::enable_timer_interrupt();
    }

    fn reload(&self) {
        let next = self.next_time.load(Ordering::Relaxed);
        self.set_compare(next);
        self.next_time
            .store(next.wrapping_add(self.increments_per_tick), Ordering::Relaxed);
    }
}
