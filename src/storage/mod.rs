//! Persistent byte store
//!
//! Program text and user files live in a flat, byte-addressable store that is
//! split into fixed-size slots (see [`files`]). The interpreter reads program
//! bytes straight from here one symbol at a time; nothing is loaded into the
//! memory region.
//!
//! [`MemoryStorage`] keeps the whole store in RAM and can be loaded from and
//! saved to an image file so programs and their files survive between runs.

pub mod files;

use crate::memory::value::Address;
use std::fs;
use std::io;
use std::path::Path;

pub use files::{FileEntry, FileError, FileSlots};

/// Total size of the store
pub const STORAGE_SIZE: usize = 32768;
/// Size of one file slot
pub const FILE_ENTRY_SIZE: usize = 1024;

pub const FILE_EXISTS_OFFSET: usize = 0;
pub const FILE_NAME_OFFSET: usize = 1;
pub const FILE_SIZE_OFFSET: usize = 17;
pub const FILE_DATA_OFFSET: usize = 19;

pub const FILE_EXISTS_TRUE: u8 = 1;
/// Also the erased state of the medium, so a blank store has no files
pub const FILE_EXISTS_FALSE: u8 = 255;

pub const FILE_NAME_MAXIMUM_LENGTH: usize = 15;
pub const FILE_MAXIMUM_SIZE: usize = 1000;

/// Byte-level access to the store
pub trait Storage {
    fn size(&self) -> usize;

    /// Fill `buffer` from `address`. Bytes past the end read as 0.
    fn read(&self, address: Address, buffer: &mut [u8]);

    /// Write `bytes` at `address`. Bytes past the end are dropped.
    fn write(&mut self, address: Address, bytes: &[u8]);

    fn read_byte(&self, address: Address) -> u8 {
        let mut byte = [0u8; 1];
        self.read(address, &mut byte);
        byte[0]
    }

    fn read_u16(&self, address: Address) -> u16 {
        let mut bytes = [0u8; 2];
        self.read(address, &mut bytes);
        u16::from_le_bytes(bytes)
    }

    fn write_u16(&mut self, address: Address, value: u16) {
        self.write(address, &value.to_le_bytes());
    }
}

/// Store held in memory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemoryStorage {
    bytes: Vec<u8>,
}

impl MemoryStorage {
    /// An erased store with no files.
    pub fn new() -> Self {
        MemoryStorage {
            bytes: vec![FILE_EXISTS_FALSE; STORAGE_SIZE],
        }
    }

    /// Wrap an existing image, padding or truncating it to the store size.
    pub fn from_bytes(mut bytes: Vec<u8>) -> Self {
        bytes.resize(STORAGE_SIZE, FILE_EXISTS_FALSE);
        MemoryStorage { bytes }
    }

    /// Load an image file, or start erased if it does not exist yet.
    pub fn load(path: &Path) -> io::Result<Self> {
        match fs::read(path) {
            Ok(bytes) => Ok(Self::from_bytes(bytes)),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(Self::new()),
            Err(err) => Err(err),
        }
    }

    pub fn save(&self, path: &Path) -> io::Result<()> {
        fs::write(path, &self.bytes)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }
}

impl Default for MemoryStorage {
    fn default() -> Self {
        Self::new()
    }
}

impl Storage for MemoryStorage {
    fn size(&self) -> usize {
        self.bytes.len()
    }

    fn read(&self, address: Address, buffer: &mut [u8]) {
        let start = address as usize;
        for (offset, slot) in buffer.iter_mut().enumerate() {
            *slot = self.bytes.get(start + offset).copied().unwrap_or(0);
        }
    }

    fn write(&mut self, address: Address, bytes: &[u8]) {
        let start = address as usize;
        for (offset, byte) in bytes.iter().enumerate() {
            if let Some(slot) = self.bytes.get_mut(start + offset) {
                *slot = *byte;
            }
        }
    }
}
