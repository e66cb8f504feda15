//! File slots
//!
//! The store is an array of [`FILE_ENTRY_SIZE`]-byte slots:
//!
//! ```text
//! offset 0   exists flag (1 present, 255 absent)
//! offset 1   name, NUL terminated, at most 15 characters
//! offset 17  data size, 16-bit little endian
//! offset 19  data, NUL terminated, at most 1000 bytes
//! ```
//!
//! Files are found by a linear scan comparing names. [`FileSlots`] is
//! implemented for every [`Storage`].

use super::*;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileError {
    MissingFile,
    NameTooLong,
    FileExists,
    StorageFull,
    BadIndex,
    BadAmount,
}

impl fmt::Display for FileError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            FileError::MissingFile => write!(f, "file does not exist"),
            FileError::NameTooLong => {
                write!(f, "name longer than {} characters", FILE_NAME_MAXIMUM_LENGTH)
            }
            FileError::FileExists => write!(f, "file already exists"),
            FileError::StorageFull => write!(f, "no free file slot"),
            FileError::BadIndex => write!(f, "read position outside the file"),
            FileError::BadAmount => write!(f, "amount outside the file's size limit"),
        }
    }
}

impl std::error::Error for FileError {}

/// A listed file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileEntry {
    /// Address of the slot
    pub address: Address,
    pub name: Vec<u8>,
    pub size: usize,
}

impl FileEntry {
    pub fn name_lossy(&self) -> String {
        String::from_utf8_lossy(&self.name).into_owned()
    }
}

/// File operations over the slot layout
pub trait FileSlots: Storage {
    fn slot_count(&self) -> usize {
        self.size() / FILE_ENTRY_SIZE
    }

    fn slot_exists(&self, slot: Address) -> bool {
        self.read_byte(slot + FILE_EXISTS_OFFSET as Address) == FILE_EXISTS_TRUE
    }

    fn file_name(&self, slot: Address) -> Vec<u8> {
        let mut name = [0u8; FILE_NAME_MAXIMUM_LENGTH + 1];
        self.read(slot + FILE_NAME_OFFSET as Address, &mut name);
        let end = name.iter().position(|&byte| byte == 0).unwrap_or(name.len());
        name[..end].to_vec()
    }

    fn file_size(&self, slot: Address) -> usize {
        self.read_u16(slot + FILE_SIZE_OFFSET as Address) as usize
    }

    /// Address of the first data byte of a slot; programs start here.
    fn file_data_address(&self, slot: Address) -> Address {
        slot + FILE_DATA_OFFSET as Address
    }

    /// Slot address of the file called `name`.
    fn find_file(&self, name: &[u8]) -> Option<Address> {
        (0..self.slot_count())
            .map(|index| (index * FILE_ENTRY_SIZE) as Address)
            .find(|&slot| self.slot_exists(slot) && self.file_name(slot) == name)
    }

    fn list_files(&self) -> Vec<FileEntry> {
        (0..self.slot_count())
            .map(|index| (index * FILE_ENTRY_SIZE) as Address)
            .filter(|&slot| self.slot_exists(slot))
            .map(|slot| FileEntry {
                address: slot,
                name: self.file_name(slot),
                size: self.file_size(slot),
            })
            .collect()
    }

    /// Create an empty file in the first free slot.
    fn create_file(&mut self, name: &[u8]) -> Result<Address, FileError> {
        if name.len() > FILE_NAME_MAXIMUM_LENGTH {
            return Err(FileError::NameTooLong);
        }
        if self.find_file(name).is_some() {
            return Err(FileError::FileExists);
        }
        let slot = (0..self.slot_count())
            .map(|index| (index * FILE_ENTRY_SIZE) as Address)
            .find(|&slot| !self.slot_exists(slot))
            .ok_or(FileError::StorageFull)?;
        self.write(slot + FILE_EXISTS_OFFSET as Address, &[FILE_EXISTS_TRUE]);
        let mut stored = name.to_vec();
        stored.push(0);
        self.write(slot + FILE_NAME_OFFSET as Address, &stored);
        self.write_u16(slot + FILE_SIZE_OFFSET as Address, 0);
        self.write(slot + FILE_DATA_OFFSET as Address, &[0]);
        Ok(slot)
    }

    fn delete_file(&mut self, name: &[u8]) -> Result<(), FileError> {
        let slot = self.find_file(name).ok_or(FileError::MissingFile)?;
        self.write(slot + FILE_EXISTS_OFFSET as Address, &[FILE_EXISTS_FALSE]);
        Ok(())
    }

    fn rename_file(&mut self, name: &[u8], new_name: &[u8]) -> Result<(), FileError> {
        let slot = self.find_file(name).ok_or(FileError::MissingFile)?;
        if new_name.len() > FILE_NAME_MAXIMUM_LENGTH {
            return Err(FileError::NameTooLong);
        }
        if self.find_file(new_name).is_some() {
            return Err(FileError::FileExists);
        }
        let mut stored = new_name.to_vec();
        stored.push(0);
        self.write(slot + FILE_NAME_OFFSET as Address, &stored);
        Ok(())
    }

    /// Read `amount` bytes starting `index` bytes into the file.
    fn read_file(&self, slot: Address, index: i32, amount: i32) -> Result<Vec<u8>, FileError> {
        let size = self.file_size(slot) as i32;
        if index < 0 || index >= size {
            return Err(FileError::BadIndex);
        }
        if amount < 0 || amount > size - index {
            return Err(FileError::BadAmount);
        }
        let mut data = vec![0u8; amount as usize];
        self.read(self.file_data_address(slot) + index as Address, &mut data);
        Ok(data)
    }

    /// Replace a file's contents.
    fn write_file(&mut self, slot: Address, data: &[u8]) -> Result<(), FileError> {
        if data.len() > FILE_MAXIMUM_SIZE {
            return Err(FileError::BadAmount);
        }
        self.write_u16(slot + FILE_SIZE_OFFSET as Address, data.len() as u16);
        let mut stored = data.to_vec();
        stored.push(0);
        let address = self.file_data_address(slot);
        self.write(address, &stored);
        Ok(())
    }

    /// Store a program under `name`, replacing any file of that name.
    fn install_program(&mut self, name: &[u8], code: &[u8]) -> Result<Address, FileError> {
        let slot = match self.find_file(name) {
            Some(slot) => slot,
            None => self.create_file(name)?,
        };
        self.write_file(slot, code)?;
        Ok(slot)
    }
}

impl<S: Storage + ?Sized> FileSlots for S {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_store_has_no_files() {
        let storage = MemoryStorage::new();
        assert_eq!(storage.slot_count(), 32);
        assert!(storage.list_files().is_empty());
    }

    #[test]
    fn test_create_write_read() {
        let mut storage = MemoryStorage::new();
        let slot = storage.create_file(b"NOTES").unwrap();
        assert_eq!(storage.find_file(b"NOTES"), Some(slot));
        assert_eq!(storage.file_size(slot), 0);

        storage.write_file(slot, b"hello world").unwrap();
        assert_eq!(storage.file_size(slot), 11);
        assert_eq!(storage.read_file(slot, 6, 5).unwrap(), b"world");
        assert_eq!(storage.read_file(slot, 11, 0), Err(FileError::BadIndex));
        assert_eq!(storage.read_file(slot, 6, 6), Err(FileError::BadAmount));
        assert_eq!(storage.read_file(slot, 1, i32::MAX), Err(FileError::BadAmount));
    }

    #[test]
    fn test_name_rules() {
        let mut storage = MemoryStorage::new();
        storage.create_file(b"A").unwrap();
        assert_eq!(storage.create_file(b"A"), Err(FileError::FileExists));
        assert_eq!(
            storage.create_file(b"SIXTEEN_CHARS_XX"),
            Err(FileError::NameTooLong)
        );
        storage.create_file(b"B").unwrap();
        assert_eq!(storage.rename_file(b"A", b"B"), Err(FileError::FileExists));
        storage.rename_file(b"A", b"C").unwrap();
        assert!(storage.find_file(b"A").is_none());
        storage.delete_file(b"C").unwrap();
        assert_eq!(storage.delete_file(b"C"), Err(FileError::MissingFile));
    }

    #[test]
    fn test_full_store() {
        let mut storage = MemoryStorage::new();
        for index in 0..32 {
            storage.create_file(format!("F{}", index).as_bytes()).unwrap();
        }
        assert_eq!(storage.create_file(b"MORE"), Err(FileError::StorageFull));
    }
}
