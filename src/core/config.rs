//! Compile-time configuration for the MIK32 port
//!
//! Values are fixed at build time. Integrator overrides are taken from
//! `MIK32_*` environment variables (decimal or `0x` hex, `_` separators
//! allowed); anything left unset falls back to the MIK32 defaults below.
//! `build.rs` warns about missing timer addresses.

// ============ Environment parsing ============

/// Parse a build-time numeric setting.
///
/// Accepts decimal or `0x`/`0X` prefixed hexadecimal with optional `_`
/// separators. Panics during const evaluation on anything else, which turns a
/// malformed setting into a compile error.
pub const fn parse_usize(s: &str) -> usize {
    let bytes = s.as_bytes();
    let mut i = 0;
    let mut radix = 10;

    if bytes.len() > 2 && bytes[0] == b'0' && (bytes[1] == b'x' || bytes[1] == b'X') {
        radix = 16;
        i = 2;
    }

    let mut value: usize = 0;
    let mut digits = 0;
    while i < bytes.len() {
        let b = bytes[i];
        i += 1;
        let digit = match b {
            b'_' => continue,
            b'0'..=b'9' => (b - b'0') as usize,
            b'a'..=b'f' if radix == 16 => (b - b'a' + 10) as usize,
            b'A'..=b'F' if radix == 16 => (b - b'A' + 10) as usize,
            _ => panic!("invalid digit in numeric port setting"),
        };
        value = match value.checked_mul(radix) {
            Some(v) => match v.checked_add(digit) {
                Some(v) => v,
                None => panic!("numeric port setting overflows usize"),
            },
            None => panic!("numeric port setting overflows usize"),
        };
        digits += 1;
    }

    if digits == 0 {
        panic!("empty numeric port setting");
    }
    value
}

const fn env_or(value: Option<&str>, default: usize) -> usize {
    match value {
        Some(s) => parse_usize(s),
        None => default,
    }
}

/// Narrow a parsed setting to `u32`, rejecting values that do not fit
pub const fn narrow_u32(value: usize) -> u32 {
    if value > u32::MAX as usize {
        panic!("numeric port setting does not fit in 32 bits");
    }
    value as u32
}

/// Validate a stack overflow checking level
pub const fn stack_check_level(value: usize) -> u8 {
    if value > 3 {
        panic!("stack overflow checking level must be 0 to 3");
    }
    value as u8
}

// ============ Timer ============

/// Base of the SCR1 timer block on the MIK32
pub const SCR1_TIMER_BASE_ADDRESS: usize = 0x0049_0000;

/// Deprecated CLINT base, 0 when unset
pub const CFG_CLINT_BASE_ADDRESS: usize = env_or(option_env!("MIK32_CLINT_BASE_ADDRESS"), 0);

/// Address of the 64-bit `mtime` register (low word first)
pub const CFG_MTIME_BASE_ADDRESS: usize = match option_env!("MIK32_MTIME_BASE_ADDRESS") {
    Some(s) => parse_usize(s),
    None if CFG_CLINT_BASE_ADDRESS != 0 => CFG_CLINT_BASE_ADDRESS + 0xBFF8,
    None => SCR1_TIMER_BASE_ADDRESS + 0x08,
};

/// Address of the 64-bit `mtimecmp` register (low word first)
pub const CFG_MTIMECMP_BASE_ADDRESS: usize = match option_env!("MIK32_MTIMECMP_BASE_ADDRESS") {
    Some(s) => parse_usize(s),
    None if CFG_CLINT_BASE_ADDRESS != 0 => CFG_CLINT_BASE_ADDRESS + 0x4000,
    None => SCR1_TIMER_BASE_ADDRESS + 0x10,
};

/// Address of the SCR1 timer control register, 0 on CLINT-style timers
pub const CFG_TIMER_CTRL_ADDRESS: usize = if CFG_MTIME_BASE_ADDRESS == SCR1_TIMER_BASE_ADDRESS + 0x08 {
    SCR1_TIMER_BASE_ADDRESS
} else {
    0
};

/// Frequency of the `mtime` counter in Hz
pub const CFG_MTIME_HZ: u32 = narrow_u32(env_or(option_env!("MIK32_MTIME_HZ"), 32_000_000));

/// System tick rate in Hz
pub const CFG_TICK_RATE_HZ: u32 = narrow_u32(env_or(option_env!("MIK32_TICK_RATE_HZ"), 1000));

/// `mtime` increments between two tick interrupts
pub const CFG_TIMER_INCREMENTS_PER_TICK: u64 = (CFG_MTIME_HZ / CFG_TICK_RATE_HZ) as u64;

// ============ Stacks ============

/// Required stack alignment in bytes
pub const PORT_BYTE_ALIGNMENT: usize = 16;

/// Mask applied to addresses (and the static stack size) to test alignment
pub const PORT_BYTE_ALIGNMENT_MASK: usize = PORT_BYTE_ALIGNMENT - 1;

/// Size of the static interrupt stack in words
pub const CFG_ISR_STACK_SIZE_WORDS: usize = env_or(option_env!("MIK32_ISR_STACK_SIZE_WORDS"), 256);

/// Fill byte of a fresh static interrupt stack.
///
/// Not `0xa5`: the kernel fills task stacks with that value, so it would
/// legitimately show up in the interrupt stack too.
pub const PORT_ISR_STACK_FILL_BYTE: u8 = 0xee;

/// Number of bytes at the deep end of the interrupt stack compared against the fill
pub const PORT_ISR_STACK_CHECK_BYTES: usize = 20;

/// Stack overflow checking level (0 = off, 3 adds interrupt stack checking)
pub const CFG_CHECK_FOR_STACK_OVERFLOW: u8 = if cfg!(feature = "isr-stack-check") {
    3
} else {
    stack_check_level(env_or(option_env!("MIK32_CHECK_FOR_STACK_OVERFLOW"), 2))
};

/// Whether the interrupt stack fill pattern is checked
pub const CFG_ISR_STACK_CHECK_EN: bool =
    cfg!(feature = "static-isr-stack") && CFG_CHECK_FOR_STACK_OVERFLOW > 2;

// ============ Kernel interface ============

/// Critical nesting value before the kernel takes over
pub const PORT_CRITICAL_NESTING_INIT: usize = 0xaaaa_aaaa;

/// Task return address override, 0 selects the port's own trap
pub const CFG_TASK_RETURN_ADDRESS: usize = env_or(option_env!("MIK32_TASK_RETURN_ADDRESS"), 0);

/// Runtime assertions in the port
pub const CFG_ASSERT_EN: bool = cfg!(feature = "assert");

// ============ Sanity checks ============

const _: () = assert!(CFG_TICK_RATE_HZ > 0, "tick rate must be non-zero");
const _: () = assert!(
    CFG_TICK_RATE_HZ <= CFG_MTIME_HZ,
    "tick rate must not exceed the mtime frequency"
);
const _: () = assert!(
    !cfg!(feature = "static-isr-stack") || CFG_ISR_STACK_SIZE_WORDS > PORT_BYTE_ALIGNMENT_MASK,
    "static interrupt stack is too small"
);
const _: () = assert!(PORT_BYTE_ALIGNMENT.is_power_of_two());
