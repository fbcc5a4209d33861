use crate::error::Result;
use std::path::Path;

/// Size of the flat address space, 1 MiB.
pub const MEMORY_SIZE: usize = 1 << 20;

const ADDRESS_MASK: u32 = (MEMORY_SIZE - 1) as u32;

/// Flat, byte addressable memory. Addresses wrap at 1 MiB.
pub struct Memory {
    data: Vec<u8>,
}

impl Default for Memory {
    fn default() -> Self {
        Self {
            data: vec![0; MEMORY_SIZE],
        }
    }
}

impl Memory {
    /// Copies `bytes` into memory starting at `address`. Returns the number of bytes copied,
    /// which is less than `bytes.len()` if the end of memory was reached.
    pub fn load(&mut self, address: u32, bytes: &[u8]) -> usize {
        let start = (address & ADDRESS_MASK) as usize;
        let count = bytes.len().min(MEMORY_SIZE - start);
        self.data[start..start + count].copy_from_slice(&bytes[..count]);
        count
    }

    #[inline]
    pub fn read_u8(&self, address: u32) -> u8 {
        self.data[(address & ADDRESS_MASK) as usize]
    }

    #[inline]
    pub fn write_u8(&mut self, address: u32, value: u8) {
        self.data[(address & ADDRESS_MASK) as usize] = value;
    }

    pub fn read_u16(&self, address: u32) -> u16 {
        u16::from_le_bytes([self.read_u8(address), self.read_u8(address.wrapping_add(1))])
    }

    pub fn write_u16(&mut self, address: u32, value: u16) {
        let [lo, hi] = value.to_le_bytes();
        self.write_u8(address, lo);
        self.write_u8(address.wrapping_add(1), hi);
    }

    /// Iterates the bytes from `address` to the end of memory.
    pub fn bytes_from(&self, address: u32) -> impl Iterator<Item = u8> + '_ {
        self.data[(address & ADDRESS_MASK) as usize..].iter().copied()
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.data
    }

    /// Writes the whole memory image to `path` as flat binary.
    pub fn dump(&self, path: impl AsRef<Path>) -> Result<()> {
        std::fs::write(path, &self.data)?;
        Ok(())
    }
}
