//! nimbus-shards: how a file is split before it leaves the device
//!
//! Shard sizes are powers of two scaled up from 2 MiB, capped at 4 GiB. The
//! search runs over the file's *bit* length: scale the candidate size up until
//! it covers the file, then back off four doublings so a file just past a
//! threshold doesn't get an oversized shard. Everything here is pure and
//! deterministic — the same file size always produces the same plan, on every
//! device, which the network relies on for contract negotiation.

/// Smallest shard the network accepts (2 MiB)
pub const MIN_SHARD_SIZE: u64 = 2 * 1024 * 1024;

/// Largest shard the network accepts (4 GiB)
pub const MAX_SHARD_SIZE: u64 = 4 * 1024 * 1024 * 1024;

/// Doublings to back off from the first size that covers the file
const SHARD_MULTIPLE_BACK: u32 = 4;

/// Upper bound of the doubling search
const MAX_SHARD_HOPS: u32 = 40;

const MIN_SHARD_BITS: u128 = (MIN_SHARD_SIZE as u128) * 8;
const MAX_SHARD_BITS: u128 = (MAX_SHARD_SIZE as u128) * 8;

fn shard_bits_at(hops: u32) -> u128 {
    MIN_SHARD_BITS << hops
}

/// Shard size in bytes for a file of `file_size` bytes.
///
/// Returns 0 for an empty file, and 0 if no candidate within the search bound
/// covers the file (implausibly large input; callers treat 0 as an error).
pub fn compute_shard_size(file_size: u64) -> u64 {
    if file_size == 0 {
        return 0;
    }
    let file_bits = (file_size as u128) * 8;

    for hops in 0..=MAX_SHARD_HOPS {
        if file_bits > shard_bits_at(hops) {
            continue;
        }
        // First size that covers the file; back off, then re-clamp to the cap.
        let mut candidate = hops.saturating_sub(SHARD_MULTIPLE_BACK);
        while candidate > 0 && shard_bits_at(candidate) > MAX_SHARD_BITS {
            candidate -= 1;
        }
        return (shard_bits_at(candidate) / 8) as u64;
    }
    0
}

/// Number of data shards the bridge accounts for a file of `file_size` bytes.
///
/// The bridge counts shards against the file's bit length and sizes shards by
/// feeding that same bit count back through the size search. Both sides must
/// agree on this arithmetic, so it is preserved as-is.
pub fn total_data_shards(file_size: u64) -> u64 {
    if file_size == 0 {
        return 0;
    }
    let file_bits = (file_size as u128) * 8;
    let shard_size = compute_shard_size(u64::try_from(file_bits).unwrap_or(u64::MAX));
    if shard_size == 0 {
        return 0;
    }
    file_bits.div_ceil(shard_size as u128) as u64
}

/// Parity shards accompanying `total` data shards (2/3 overhead, rounded up).
pub fn parity_shards(total: u64) -> u64 {
    (total * 2).div_ceil(3)
}

/// How many shards fit in `ram_budget` bytes of working memory, at least 1.
///
/// Upload pipelines use this to bound in-flight shard buffers.
pub fn concurrency_for(ram_budget: u64, file_size: u64) -> u64 {
    match compute_shard_size(file_size) {
        0 => 1,
        shard_size => (ram_budget / shard_size).max(1),
    }
}

/// A file's partitioning: shard size in bytes and how many shards cover it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShardPlan {
    pub shard_size: u64,
    pub shard_count: u64,
}

impl ShardPlan {
    /// Plan the partitioning of a file of `file_size` bytes.
    pub fn for_size(file_size: u64) -> ShardPlan {
        let shard_size = compute_shard_size(file_size);
        if shard_size == 0 {
            return ShardPlan {
                shard_size: 0,
                shard_count: 0,
            };
        }
        ShardPlan {
            shard_size,
            shard_count: file_size.div_ceil(shard_size),
        }
    }
}
