use alloy_primitives::{Address, U256};
use anyhow::{Result, bail};
use byteorder::{BigEndian, ByteOrder};

pub const WORD_SIZE: usize = 32;
// Address occupies the low 20 bytes of its word
pub const ADDRESS_PADDING: usize = WORD_SIZE - 20;

pub type Word = [u8; WORD_SIZE];

// Convert a u256 to a big-endian word
pub fn u256_to_word(value: U256) -> Word {
    value.to_be_bytes::<WORD_SIZE>()
}

// Convert a word to a u256
pub fn word_to_u256(word: &[u8]) -> Result<U256> {
    if word.len() != WORD_SIZE {
        bail!("Expected a {} byte word, got {} bytes", WORD_SIZE, word.len());
    }

    Ok(U256::from_be_slice(word))
}

// Left-pad an address into a word
pub fn address_to_word(address: Address) -> Word {
    let mut word = [0u8; WORD_SIZE];
    word[ADDRESS_PADDING..].copy_from_slice(address.as_slice());
    word
}

// Read an address back out of a word, rejecting dirty high bytes
pub fn word_to_address(word: &[u8]) -> Result<Address> {
    if word.len() != WORD_SIZE {
        bail!("Expected a {} byte word, got {} bytes", WORD_SIZE, word.len());
    }

    if word[..ADDRESS_PADDING].iter().any(|byte| *byte != 0) {
        bail!("Address word has non-zero padding");
    }

    Ok(Address::from_slice(&word[ADDRESS_PADDING..]))
}

// Offsets and lengths are encoded as uint256 but must fit in a u64
pub fn usize_to_word(value: usize) -> Word {
    let mut word = [0u8; WORD_SIZE];
    BigEndian::write_u64(&mut word[WORD_SIZE - 8..], value as u64);
    word
}

pub fn word_to_usize(word: &[u8]) -> Result<usize> {
    if word.len() != WORD_SIZE {
        bail!("Expected a {} byte word, got {} bytes", WORD_SIZE, word.len());
    }

    if word[..WORD_SIZE - 8].iter().any(|byte| *byte != 0) {
        bail!("Length or offset word does not fit in 64 bits");
    }

    let value = BigEndian::read_u64(&word[WORD_SIZE - 8..]);

    usize::try_from(value).map_err(|_| anyhow::anyhow!("Value {} overflows usize", value))
}

// Right-pad bytes to a multiple of the word size
pub fn pad_to_words(bytes: &[u8]) -> Vec<u8> {
    let padded_len = bytes.len().div_ceil(WORD_SIZE) * WORD_SIZE;
    let mut padded = Vec::with_capacity(padded_len);
    padded.extend_from_slice(bytes);
    padded.resize(padded_len, 0);
    padded
}
