//! # LC-3 Virtual Machine.
//!
//! `lc3-vm` executes programs of the LC-3 (Little Computer 3) architecture.
//! Usage starts with loading a program image via `emulator::from_program` or
//! [`emulator::Emulator::load_image`], followed by [`emulator::Emulator::execute`].
//!
//!  # Example
//! ```
//! use lc3_vm::emulator::{Emulator, ExitReason};
//! use lc3_vm::hardware::keyboard::TerminalInputProvider;
//! use std::cell::RefCell;
//! use std::rc::Rc;
//!
//! let mut emu = Emulator::new(
//!     Rc::new(RefCell::new(TerminalInputProvider::new())),
//!     Box::new(std::io::sink()),
//! );
//! // .ORIG x3000, ADD R1, R1, #3, HALT
//! emu.load_image(&[0x30, 0x00, 0x12, 0x63, 0xF0, 0x25]).unwrap();
//! assert_eq!(emu.execute().unwrap(), ExitReason::Halted);
//! assert_eq!(emu.registers().get(1), 3);
//! ```
//! # Errors
//! - Program image cannot be read or is malformed, see [`errors::LoadProgramError`]
//! - Reading the keyboard or writing the output fails, see [`errors::ExecutionError`]

pub mod emulator;
pub mod errors;
pub mod hardware;
pub mod terminal;
