// Cycle counter used by the benchmarks. On architectures without an
// accessible counter, nanoseconds since the first call are returned.

#[cfg(target_arch = "x86_64")]
pub fn core_cycles() -> u64 {
    use core::arch::x86_64::{_mm_lfence, _rdtsc};
    unsafe {
        _mm_lfence();
        _rdtsc()
    }
}

#[cfg(target_arch = "aarch64")]
pub fn core_cycles() -> u64 {
    use core::arch::asm;
    let mut x: u64;
    unsafe {
        asm!("dsb sy", "mrs {}, pmccntr_el0", out(reg) x);
    }
    x
}

#[cfg(not(any(target_arch = "x86_64", target_arch = "aarch64")))]
pub fn core_cycles() -> u64 {
    use std::sync::OnceLock;
    use std::time::Instant;
    static START: OnceLock<Instant> = OnceLock::new();
    START.get_or_init(Instant::now).elapsed().as_nanos() as u64
}

// Median of the measured durations, divided by the number of
// operations per measurement.
#[allow(dead_code)]
pub fn median(tt: &mut [u64], ops: usize) -> f64 {
    tt.sort();
    (tt[tt.len() >> 1] as f64) / (ops as f64)
}
