//! MurmurHash64A, the shingle fingerprint function.
//!
//! This is Austin Appleby's 64-bit MurmurHash2 variant for 64-bit platforms,
//! reproduced bit-exact. Input blocks are always read little-endian, so the
//! output does not depend on the host byte order.

const M: u64 = 0xc6a4_a793_5bd1_e995;
const R: u32 = 47;

/// Hash `bytes` under `seed` with MurmurHash64A.
///
/// Pure and total over every input length, including zero.
pub fn hash64(bytes: &[u8], seed: u64) -> u64 {
    let mut h = seed ^ (bytes.len() as u64).wrapping_mul(M);

    let mut blocks = bytes.chunks_exact(8);
    for block in blocks.by_ref() {
        let mut word = [0u8; 8];
        word.copy_from_slice(block);
        let mut k = u64::from_le_bytes(word);

        k = k.wrapping_mul(M);
        k ^= k >> R;
        k = k.wrapping_mul(M);

        h ^= k;
        h = h.wrapping_mul(M);
    }

    let tail = blocks.remainder();
    if !tail.is_empty() {
        for (pos, &byte) in tail.iter().enumerate().rev() {
            h ^= u64::from(byte) << (8 * pos);
        }
        h = h.wrapping_mul(M);
    }

    h ^= h >> R;
    h = h.wrapping_mul(M);
    h ^= h >> R;
    h
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_input_seed_zero() {
        assert_eq!(hash64(b"", 0), 0);
    }

    #[test]
    fn empty_input_nonzero_seed() {
        assert_eq!(hash64(b"", 1), 0xc6a4_a793_5bd0_64dc);
    }

    #[test]
    fn reference_vectors_short_inputs() {
        assert_eq!(hash64(b"test", 0), 0x2f4a_8724_618f_4c63);
        assert_eq!(hash64(b"test", 0x9747_b28c), 0xeb01_435b_bd4d_a813);
        assert_eq!(hash64(b"test", 42), 0x45bd_d00c_46d4_5f24);
        assert_eq!(hash64(b"a", 0), 0x0717_17d2_d36b_6b11);
        assert_eq!(hash64(b"hello", 0), 0x1e68_d17c_457b_f117);
    }

    #[test]
    fn reference_vectors_block_boundaries() {
        // exactly one block, no tail
        assert_eq!(hash64(b"thequick", 0), 0xb905_95a5_2b03_7507);
        // one block plus a two byte tail
        assert_eq!(hash64(b"quickbrown", 1), 0xd9a0_3433_e1ef_d713);
        assert_eq!(
            hash64(b"The quick brown fox jumps over the lazy dog", 0),
            0x5589_ca33_042a_861b
        );
    }

    #[test]
    fn seed_changes_output() {
        assert_ne!(hash64(b"shingle", 1), hash64(b"shingle", 2));
    }

    #[test]
    fn every_tail_length_is_distinct() {
        let data = b"abcdefghijklmnop";
        let hashes: std::collections::HashSet<u64> =
            (0..=data.len()).map(|n| hash64(&data[..n], 7)).collect();
        assert_eq!(hashes.len(), data.len() + 1);
    }
}
