//! Dedicated interrupt stack
//!
//! Interrupt service routines run on their own stack so interrupt-time
//! execution never grows a task's stack. The stack is either a static array
//! owned by the port or a region the linker script provides.

use core::cell::UnsafeCell;
use core::mem::size_of;

use crate::config::{PORT_BYTE_ALIGNMENT_MASK, PORT_ISR_STACK_CHECK_BYTES, PORT_ISR_STACK_FILL_BYTE};
use crate::types::StackType;

/// Source of the interrupt stack top
pub trait InterruptStack {
    /// Initial stack pointer for interrupt context
    fn top(&self) -> usize;

    /// Whether the deep end of the stack still carries its fill pattern
    ///
    /// Stacks without a known fill pattern always report `true`.
    fn fill_intact(&self) -> bool {
        true
    }
}

/// Word value of a freshly filled interrupt stack
const FILL_WORD: StackType = StackType::from_ne_bytes([PORT_ISR_STACK_FILL_BYTE; size_of::<StackType>()]);

/// Statically allocated interrupt stack of `WORDS` words
#[repr(C, align(16))]
pub struct StaticIsrStack<const WORDS: usize> {
    words: UnsafeCell<[StackType; WORDS]>,
}

// Only interrupt context writes the stack, through the stack pointer.
unsafe impl<const WORDS: usize> Sync for StaticIsrStack<WORDS> {}

impl<const WORDS: usize> StaticIsrStack<WORDS> {
    /// Create a stack filled with [`PORT_ISR_STACK_FILL_BYTE`]
    pub const fn new() -> Self {
        Self {
            words: UnsafeCell::new([FILL_WORD; WORDS]),
        }
    }

    /// Lowest address of the stack
    #[inline(always)]
    pub fn base(&self) -> usize {
        self.words.get() as usize
    }

    /// Size of the stack in words
    #[inline(always)]
    pub const fn size_words(&self) -> usize {
        WORDS
    }

    /// Usable words, the size rounded down to the alignment mask
    #[inline(always)]
    pub const fn usable_words() -> usize {
        WORDS & !PORT_BYTE_ALIGNMENT_MASK
    }

    /// Initial interrupt stack pointer, usable in static initializers
    pub const fn top_ptr(&self) -> *const u8 {
        (self.words.get() as *const u8).wrapping_add(Self::usable_words() * size_of::<StackType>())
    }

    /// Fill bytes the overflow check compares against
    pub const fn expected_fill() -> [u8; PORT_ISR_STACK_CHECK_BYTES] {
        [PORT_ISR_STACK_FILL_BYTE; PORT_ISR_STACK_CHECK_BYTES]
    }
}

impl<const WORDS: usize> InterruptStack for StaticIsrStack<WORDS> {
    fn top(&self) -> usize {
        self.top_ptr() as usize
    }

    fn fill_intact(&self) -> bool {
        let expected = Self::expected_fill();
        let len = expected.len().min(WORDS * size_of::<StackType>());
        let base = self.words.get() as *const u8;

        // The deepest bytes are the last ones an overflowing interrupt reaches.
        (0..len).all(|i| {
            let byte = unsafe { core::ptr::read_volatile(base.add(i)) };
            byte == expected[i]
        })
    }
}

impl<const WORDS: usize> Default for StaticIsrStack<WORDS> {
    fn default() -> Self {
        Self::new()
    }
}

/// Interrupt stack whose top address is known up front
///
/// Used for stacks carved out by the linker script or any other custom
/// memory layout. No fill pattern is tracked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IsrStackTop(usize);

impl IsrStackTop {
    /// Interrupt stack ending at `top`
    pub const fn at(top: usize) -> Self {
        Self(top)
    }
}

impl InterruptStack for IsrStackTop {
    fn top(&self) -> usize {
        self.0
    }
}

/// Interrupt stack top published as a plain data word
///
/// Interrupt entry code loads the word directly to switch stacks.
#[repr(transparent)]
pub struct StackTopWord(*const u8);

// Written once at link time, read-only afterwards.
unsafe impl Sync for StackTopWord {}

impl StackTopWord {
    /// Word holding `top`
    pub const fn new(top: *const u8) -> Self {
        Self(top)
    }

    /// Address the word holds
    #[inline(always)]
    pub fn addr(&self) -> usize {
        self.0 as usize
    }
}
