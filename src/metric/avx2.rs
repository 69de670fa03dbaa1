#![allow(clippy::undocumented_unsafe_blocks)]
#![allow(unsafe_op_in_unsafe_fn)]

use std::arch::x86_64::*;

#[must_use]
#[target_feature(enable = "avx2")]
pub(super) unsafe fn sad_row_u8(a: *const u8, b: *const u8, len: usize) -> u64 {
    let mut acc256 = _mm256_setzero_si256();
    let mut acc128 = _mm_setzero_si128();
    let mut i = 0;

    while i + 32 <= len {
        let va = _mm256_loadu_si256(a.add(i) as *const __m256i);
        let vb = _mm256_loadu_si256(b.add(i) as *const __m256i);
        acc256 = _mm256_add_epi64(acc256, _mm256_sad_epu8(va, vb));
        i += 32;
    }

    if i + 16 <= len {
        let va = _mm_loadu_si128(a.add(i) as *const __m128i);
        let vb = _mm_loadu_si128(b.add(i) as *const __m128i);
        acc128 = _mm_add_epi64(acc128, _mm_sad_epu8(va, vb));
        i += 16;
    }

    if i + 8 <= len {
        let va = _mm_loadl_epi64(a.add(i) as *const __m128i);
        let vb = _mm_loadl_epi64(b.add(i) as *const __m128i);
        acc128 = _mm_add_epi64(acc128, _mm_sad_epu8(va, vb));
        i += 8;
    }

    // Reduce acc256: add high and low 128-bit lanes
    let acc256_lo = _mm256_castsi256_si128(acc256);
    let acc256_hi = _mm256_extracti128_si256(acc256, 1);
    let combined = _mm_add_epi64(_mm_add_epi64(acc256_lo, acc256_hi), acc128);

    // Reduce 2x u64 lanes to scalar
    let high = _mm_unpackhi_epi64(combined, combined);
    let total = _mm_add_epi64(combined, high);
    let mut sum = _mm_cvtsi128_si64(total) as u64;

    while i < len {
        sum += (*a.add(i)).abs_diff(*b.add(i)) as u64;
        i += 1;
    }
    sum
}
