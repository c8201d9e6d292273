use crate::FastMap;
use crate::U256_1;
use crate::error::{MathError, StateError};
use crate::math::bit_math::{least_significant_bit, most_significant_bit};
use alloy_primitives::U256;
use std::ops::Shr;

/// Maps a compressed tick index into the `(word, bit)` coordinates of the
/// tick bitmap.
pub fn position(tick: i32) -> (i16, u8) {
    (tick.shr(8) as i16, (tick % 256) as u8)
}

/// Returns the bitmap word stored at `word`, or zero if absent.
pub fn get_word(bitmap: &FastMap<i16, U256>, word: i16) -> U256 {
    *bitmap.get(&word).unwrap_or(&U256::ZERO)
}

/// Toggles the initialized bit for `tick`, which must be aligned to
/// `tick_spacing`.
pub fn flip_tick(
    tick_bitmap: &mut FastMap<i16, U256>,
    tick: i32,
    tick_spacing: i32,
) -> Result<(), StateError> {
    if (tick % tick_spacing) != 0 {
        return Err(StateError::InvalidTickSpacing);
    }

    let (word_pos, bit_pos) = position(tick / tick_spacing);
    let mask = U256_1 << bit_pos;
    let word = get_word(tick_bitmap, word_pos);
    tick_bitmap.insert(word_pos, word ^ mask);
    Ok(())
}

/// Searches one 256-bit bitmap word for the next initialized tick at or
/// below `tick` (`lte`), or strictly above it.
///
/// Returns the candidate tick and whether it is actually initialized;
/// when it is not, the candidate is the word boundary and the caller
/// continues the search from there.
pub fn next_initialized_tick_within_one_word(
    bitmap: &FastMap<i16, U256>,
    tick: i32,
    tick_spacing: i32,
    lte: bool,
) -> Result<(i32, bool), MathError> {
    let mut compressed: i32 = tick / tick_spacing;

    // round toward negative infinity
    if tick < 0 && tick % tick_spacing != 0 {
        compressed -= 1;
    }

    if lte {
        let (word_pos, bit_pos) = position(compressed);

        // all bits at or to the right of the current bit
        let mask: U256 = (U256_1 << bit_pos) - U256_1 + (U256_1 << bit_pos);
        let masked: U256 = get_word(bitmap, word_pos) & mask;

        let initialized = !masked.is_zero();

        let next: i32 = if initialized {
            (compressed - (bit_pos - most_significant_bit(masked)?) as i32) * tick_spacing
        } else {
            (compressed - bit_pos as i32) * tick_spacing
        };
        Ok((next, initialized))
    } else {
        let (word_pos, bit_pos) = position(compressed + 1);

        // all bits at or to the left of the next bit
        let mask: U256 = ((U256_1 << bit_pos) - U256_1) ^ U256::MAX;
        let masked: U256 = get_word(bitmap, word_pos) & mask;

        let initialized = !masked.is_zero();

        let next: i32 = if initialized {
            (compressed + 1 + (least_significant_bit(masked)? - bit_pos) as i32) * tick_spacing
        } else {
            (compressed + 1 + (255u8 - bit_pos) as i32) * tick_spacing
        };
        Ok((next, initialized))
    }
}
