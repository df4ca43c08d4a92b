//! Environment-driven defaults.
//!
//! Values are read once per process and cached. Anything that fails to
//! parse falls back to the built-in default.

use std::sync::OnceLock;

/// Default run record width in bits.
pub const DEFAULT_RUN_WIDTH: u32 = 8;
/// Default size header width in bits.
pub const DEFAULT_SIZE_WIDTH: u32 = 16;
/// Default packed-buffer size at which parallel XOR splits work.
pub const DEFAULT_PARALLEL_MIN_BYTES: usize = 64 * 1024;

fn parse_env_u32(name: &str, default: u32) -> u32 {
    std::env::var(name)
        .ok()
        .and_then(|v| v.trim().parse::<u32>().ok())
        .unwrap_or(default)
}

fn parse_env_usize(name: &str, default: usize) -> usize {
    std::env::var(name)
        .ok()
        .and_then(|v| v.trim().parse::<usize>().ok())
        .unwrap_or(default)
}

static RUN_WIDTH: OnceLock<u32> = OnceLock::new();

/// Run record width from `SGF_RUN_WIDTH` (not validated here).
pub fn run_width() -> u32 {
    *RUN_WIDTH.get_or_init(|| parse_env_u32("SGF_RUN_WIDTH", DEFAULT_RUN_WIDTH))
}

static SIZE_WIDTH: OnceLock<u32> = OnceLock::new();

/// Size header width from `SGF_SIZE_WIDTH` (not validated here).
pub fn size_width() -> u32 {
    *SIZE_WIDTH.get_or_init(|| parse_env_u32("SGF_SIZE_WIDTH", DEFAULT_SIZE_WIDTH))
}

static PARALLEL_MIN_BYTES: OnceLock<usize> = OnceLock::new();

/// Threshold from `SGF_PARALLEL_MIN_BYTES`; at least one chunk's worth.
pub fn parallel_min_bytes() -> usize {
    *PARALLEL_MIN_BYTES.get_or_init(|| {
        parse_env_usize("SGF_PARALLEL_MIN_BYTES", DEFAULT_PARALLEL_MIN_BYTES).max(1)
    })
}
