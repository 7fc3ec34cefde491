use crate::errors::LoadProgramError;
use crate::hardware::keyboard::KeyboardInputProvider;
use std::cell::RefCell;
use std::fmt::{Debug, Formatter};
use std::io;
use std::ops::{Index, IndexMut};
use std::rc::Rc;

/// Number of addressable u16 words, one per possible 16-bit address.
pub const MEMORY_SIZE_U16: usize = 1 << u16::BITS;

/// Memory regions mapped to IO functionality.
#[repr(u16)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, enumn::N)]
pub enum MemoryMappedIOLocations {
    /// Keyboard Status Register
    Kbsr = 0xFE00,
    /// Keyboard Data Register
    Kbdr = 0xFE02,
}

/// An abstraction for the LC-3 memory including memory mapped IO but excluding registers.
///
/// Indexing (`memory[address]`) accesses the raw words without any device side effects,
/// [`Memory::read`] and [`Memory::write`] are the accesses made by executing instructions.
pub struct Memory {
    /// Index equals memory address
    data: Box<[u16]>,
    keyboard: Rc<RefCell<dyn KeyboardInputProvider>>,
}

impl Debug for Memory {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let used = self.data.iter().filter(|w| **w != 0).count();
        write!(
            f,
            "Memory: {} words, {used} non-zero, KBSR: {:#06X}, KBDR: {:#06X}",
            self.data.len(),
            self[MemoryMappedIOLocations::Kbsr as u16],
            self[MemoryMappedIOLocations::Kbdr as u16]
        )
    }
}

impl Index<u16> for Memory {
    type Output = u16;
    fn index(&self, index: u16) -> &Self::Output {
        &self.data[Self::slot(index)]
    }
}
impl IndexMut<u16> for Memory {
    fn index_mut(&mut self, index: u16) -> &mut Self::Output {
        &mut self.data[Self::slot(index)]
    }
}

impl Memory {
    const KEYBOARD_STATUS_REGISTER_SET: u16 = 1 << 15;
    const KEYBOARD_STATUS_REGISTER_UNSET: u16 = 0;

    #[must_use]
    pub fn new(keyboard: Rc<RefCell<dyn KeyboardInputProvider>>) -> Self {
        Self {
            data: vec![0x0u16; MEMORY_SIZE_U16].into_boxed_slice(),
            keyboard,
        }
    }
    #[inline]
    fn slot(address: u16) -> usize {
        let slot = usize::from(address);
        debug_assert!(
            slot < MEMORY_SIZE_U16,
            "Address {address:#06X} exceeds memory of {MEMORY_SIZE_U16} words"
        );
        slot
    }
    /// Reads the word at `address`.
    ///
    /// Reading the keyboard status register polls the keyboard first: if a character is
    /// available the status register gets bit 15 set and the character is copied into the
    /// keyboard data register, otherwise the status register is cleared.
    ///
    /// # Errors
    /// - polling or reading the keyboard failed
    pub fn read(&mut self, address: u16) -> io::Result<u16> {
        if MemoryMappedIOLocations::n(address) == Some(MemoryMappedIOLocations::Kbsr) {
            self.poll_keyboard()?;
        }
        Ok(self[address])
    }
    pub fn write(&mut self, address: u16, value: u16) {
        self[address] = value;
    }
    fn poll_keyboard(&mut self) -> io::Result<()> {
        let mut keyboard = self.keyboard.borrow_mut();
        if keyboard.check_input_available()? {
            let data = keyboard.read_input_character()?;
            drop(keyboard);
            self[MemoryMappedIOLocations::Kbsr as u16] = Self::KEYBOARD_STATUS_REGISTER_SET;
            self[MemoryMappedIOLocations::Kbdr as u16] = data;
        } else {
            drop(keyboard);
            self[MemoryMappedIOLocations::Kbsr as u16] = Self::KEYBOARD_STATUS_REGISTER_UNSET;
        }
        Ok(())
    }
    /// Loads a program image: a big-endian `.ORIG` header word followed by big-endian
    /// program words which are stored from the origin address on, wrapping around at the
    /// end of the address space.
    ///
    /// Returns the origin and the number of words loaded.
    ///
    /// # Errors
    /// - Image is shorter than the `.ORIG` header
    /// - Image has an odd number of bytes
    pub fn load_image(&mut self, image: &[u8]) -> Result<(u16, usize), LoadProgramError> {
        if image.len() < 2 {
            return Err(LoadProgramError::ProgramMissingOrigHeader);
        }
        if image.len() % 2 != 0 {
            return Err(LoadProgramError::ProgramOddLength { bytes: image.len() });
        }
        let mut words = image
            .chunks_exact(2)
            .map(|pair| u16::from_be_bytes([pair[0], pair[1]]));
        let origin = words
            .next()
            .ok_or(LoadProgramError::ProgramMissingOrigHeader)?;
        let mut address = origin;
        let mut count = 0;
        for word in words {
            self[address] = word;
            address = address.wrapping_add(1);
            count += 1;
        }
        Ok((origin, count))
    }
}
