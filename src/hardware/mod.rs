//! Machine state of the LC-3: memory including memory mapped devices, and the register file.
pub mod keyboard;
pub mod memory;
pub mod registers;
