use alloy_primitives::{Address, Bytes, U256};
use anyhow::{Context, Result, anyhow, bail};

use crate::types::{AbiType, AbiValue};

use super::next_arg::NextArg;
use super::serializers::{
    Word, WORD_SIZE, address_to_word, pad_to_words, u256_to_word, usize_to_word, word_to_address,
    word_to_u256, word_to_usize,
};

pub const SELECTOR_SIZE: usize = 4;
pub const DEFAULT_OFFSET: usize = 0;

// A head slot is either the value itself or a pointer into the tail
#[derive(Debug, Clone)]
enum Slot {
    Static(Word),
    Dynamic(Vec<u8>),
}

/// Solidity ABI argument buffer.
///
/// Built with the `add_*` methods for call arguments, or created with
/// [`Args::from_bytes`] over return data and read back with the `next_*`
/// methods. Head words are consumed in order; dynamic values follow their
/// offset into the tail.
#[derive(Debug, Clone, Default)]
pub struct Args {
    slots: Vec<Slot>,
    serialized: Vec<u8>,
    offset: usize, // For deserialization
}

impl Args {
    pub fn new() -> Self {
        Self {
            slots: Vec::new(),
            serialized: Vec::new(),
            offset: DEFAULT_OFFSET,
        }
    }

    /// Creates Args from existing return data, ready for deserialization.
    pub fn from_bytes(serialized: impl Into<Vec<u8>>) -> Self {
        Self {
            slots: Vec::new(),
            serialized: serialized.into(),
            offset: DEFAULT_OFFSET,
        }
    }

    /// Returns the current head offset.
    pub fn get_offset(&self) -> usize {
        self.offset
    }

    /// Number of arguments added so far.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Encodes heads followed by tails.
    pub fn serialize(&self) -> Vec<u8> {
        let head_len = self.slots.len() * WORD_SIZE;
        let mut head = Vec::with_capacity(head_len);
        let mut tail = Vec::new();

        for slot in &self.slots {
            match slot {
                Slot::Static(word) => head.extend_from_slice(word),
                Slot::Dynamic(body) => {
                    head.extend_from_slice(&usize_to_word(head_len + tail.len()));
                    tail.extend_from_slice(body);
                }
            }
        }

        head.extend_from_slice(&tail);
        head
    }

    /// Prefixes the encoded arguments with a method selector.
    pub fn to_calldata(&self, selector: [u8; SELECTOR_SIZE]) -> Bytes {
        let mut calldata = selector.to_vec();
        calldata.extend_from_slice(&self.serialize());
        Bytes::from(calldata)
    }

    // --- Internal Helpers for Reading ---

    fn word_at(&self, position: usize) -> Result<&[u8]> {
        let end = position.checked_add(WORD_SIZE).ok_or_else(|| {
            anyhow!("Offset overflow while reading a word at {}", position)
        })?;

        if end > self.serialized.len() {
            bail!(
                "Not enough bytes to read. Wanted a word at offset {}, but buffer length is {}",
                position,
                self.serialized.len()
            );
        }

        Ok(&self.serialized[position..end])
    }

    /// Reads the next head word. Advances the offset.
    fn read_word(&mut self) -> Result<&[u8]> {
        let position = self.offset;
        self.word_at(position)?;
        self.offset = position + WORD_SIZE;
        self.word_at(position)
    }

    // --- Deserialization Methods (`next*`) ---

    pub fn next_u256(&mut self) -> Result<U256> {
        let word = self.read_word().context("Failed to read uint256")?;
        word_to_u256(word)
    }

    pub fn next_address(&mut self) -> Result<Address> {
        let word = self.read_word().context("Failed to read address")?;
        word_to_address(word)
    }

    /// Reads the next bool; anything but 0 or 1 is malformed.
    pub fn next_bool(&mut self) -> Result<bool> {
        let value = self.next_u256().context("Failed to read bool")?;

        if value == U256::ZERO {
            Ok(false)
        } else if value == U256::from(1) {
            Ok(true)
        } else {
            bail!("Invalid bool word: {}", value)
        }
    }

    /// Reads the next string by following its head offset into the tail.
    pub fn next_string(&mut self) -> Result<String> {
        let pointer = word_to_usize(self.read_word().context("Failed to read string offset")?)?;
        let len = word_to_usize(self.word_at(pointer).context("Failed to read string length")?)?;

        let start = pointer + WORD_SIZE;
        let end = start
            .checked_add(len)
            .ok_or_else(|| anyhow!("String length {} overflows", len))?;

        if end > self.serialized.len() {
            bail!(
                "String of length {} at offset {} exceeds buffer length {}",
                len,
                start,
                self.serialized.len()
            );
        }

        String::from_utf8(self.serialized[start..end].to_vec())
            .with_context(|| format!("Failed to decode UTF-8 string with length {}", len))
    }

    /// Reads the next value through its `NextArg` implementation.
    pub fn next_typed<T>(&mut self, element_type: AbiType) -> Result<T>
    where
        Args: NextArg<T>,
    {
        self.next_arg(element_type)
    }

    // --- Serialization Methods (`add*`) ---

    pub fn add_u256(&mut self, value: U256) -> &mut Self {
        self.slots.push(Slot::Static(u256_to_word(value)));
        self
    }

    pub fn add_address(&mut self, value: Address) -> &mut Self {
        self.slots.push(Slot::Static(address_to_word(value)));
        self
    }

    pub fn add_bool(&mut self, value: bool) -> &mut Self {
        self.add_u256(if value { U256::from(1) } else { U256::ZERO })
    }

    /// Adds a string (length word, then UTF-8 bytes right-padded to a word).
    pub fn add_string(&mut self, value: &str) -> &mut Self {
        let bytes = value.as_bytes();
        let mut body = usize_to_word(bytes.len()).to_vec();
        body.extend_from_slice(&pad_to_words(bytes));
        self.slots.push(Slot::Dynamic(body));
        self
    }

    pub fn add_value(&mut self, value: &AbiValue) -> &mut Self {
        match value {
            AbiValue::Address(address) => self.add_address(*address),
            AbiValue::Uint256(number) => self.add_u256(*number),
            AbiValue::Bool(flag) => self.add_bool(*flag),
            AbiValue::String(text) => self.add_string(text),
        }
    }
}
