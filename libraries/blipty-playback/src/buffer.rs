//! Transport stash sizing

const MIB: f64 = 1024.0 * 1024.0;

/// Smallest initial stash size (4 MiB)
pub const MIN_BUFFER_SIZE: usize = 4 * 1024 * 1024;

/// Largest initial stash size (64 MiB)
pub const MAX_BUFFER_SIZE: usize = 64 * 1024 * 1024;

/// Memory assumed when the platform does not report it
pub const DEFAULT_DEVICE_MEMORY_GB: f64 = 4.0;

/// Initial stash size for a device with the given memory
///
/// Two MiB per GB of memory, clamped to 4..=64 MiB. Unknown or non-finite
/// memory counts as 4 GB.
pub fn calculate_buffer_size(device_memory_gb: Option<f64>) -> usize {
    let memory_gb = device_memory_gb
        .filter(|gb| gb.is_finite())
        .unwrap_or(DEFAULT_DEVICE_MEMORY_GB);

    let size = (memory_gb * 2.0 * MIB).clamp(MIN_BUFFER_SIZE as f64, MAX_BUFFER_SIZE as f64);

    size as usize
}
