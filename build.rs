use std::env;

/// Build-time port configuration, read by `src/core/config.rs` through `option_env!`.
const CONFIG_VARS: &[&str] = &[
    "MIK32_CLINT_BASE_ADDRESS",
    "MIK32_MTIME_BASE_ADDRESS",
    "MIK32_MTIMECMP_BASE_ADDRESS",
    "MIK32_MTIME_HZ",
    "MIK32_TICK_RATE_HZ",
    "MIK32_ISR_STACK_SIZE_WORDS",
    "MIK32_CHECK_FOR_STACK_OVERFLOW",
    "MIK32_TASK_RETURN_ADDRESS",
];

fn main() {
    println!("cargo:rerun-if-changed=build.rs");
    for var in CONFIG_VARS {
        println!("cargo:rerun-if-env-changed={var}");
    }

    // Host builds (tests) never touch the timer registers.
    if env::var("CARGO_CFG_TARGET_ARCH").as_deref() != Ok("riscv32") {
        return;
    }

    let clint = env::var("MIK32_CLINT_BASE_ADDRESS").is_ok();
    let mtime = env::var("MIK32_MTIME_BASE_ADDRESS").is_ok();
    let mtimecmp = env::var("MIK32_MTIMECMP_BASE_ADDRESS").is_ok();

    if clint {
        println!(
            "cargo:warning=MIK32_CLINT_BASE_ADDRESS is deprecated. MIK32_MTIME_BASE_ADDRESS and \
             MIK32_MTIMECMP_BASE_ADDRESS are being derived from it; set them directly instead."
        );
    }

    if !mtime && !clint {
        println!(
            "cargo:warning=MIK32_MTIME_BASE_ADDRESS is not set, using the SCR1 default 0x0049_0008. \
             Set it to the address of the memory-mapped mtime register."
        );
    }

    if !mtimecmp && !clint {
        println!(
            "cargo:warning=MIK32_MTIMECMP_BASE_ADDRESS is not set, using the SCR1 default 0x0049_0010. \
             Set it to the address of the memory-mapped mtimecmp register."
        );
    }

    let isr_check = env::var("CARGO_FEATURE_ISR_STACK_CHECK").is_ok();
    let level_three = env::var("MIK32_CHECK_FOR_STACK_OVERFLOW")
        .map(|v| v.trim() == "3")
        .unwrap_or(false);
    if (isr_check || level_three) && env::var("CARGO_FEATURE_STATIC_ISR_STACK").is_err() {
        println!(
            "cargo:warning=ISR stack overflow checking needs the `static-isr-stack` feature; \
             the linker-provided interrupt stack has no fill pattern to check."
        );
    }
}
