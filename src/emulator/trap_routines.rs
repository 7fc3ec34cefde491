use crate::errors::ExecutionError;
use crate::hardware::keyboard::KeyboardInputProvider;
use crate::hardware::memory::{MEMORY_SIZE_U16, Memory};
use crate::hardware::registers::Registers;
use std::io;
use std::io::Write;
use std::ops::ControlFlow;

/// Trap vectors, the lowest 8 bits of a TRAP instruction.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, enumn::N)]
pub enum TrapVector {
    GetC = 0x20,
    Out = 0x21,
    PutS = 0x22,
    In = 0x23,
    PutSp = 0x24,
    Halt = 0x25,
}

pub type TrapResult = ControlFlow<Result<(), ExecutionError>>;

const IN_PROMPT: &str = "Input a character: ";
const HALT_MESSAGE: &str = "HALT\n";

/// GETC: Read a single character from the keyboard. The character is not echoed onto the console.
///
/// Its ASCII code is copied into R0.
pub fn get_c(regs: &mut Registers, keyboard: &mut dyn KeyboardInputProvider) -> TrapResult {
    match keyboard.read_input_character() {
        Ok(c) => {
            regs.set(0, c);
            ControlFlow::Continue(())
        }
        Err(e) => wrap_io_error_in_cf(&e),
    }
}

/// IN: Print a prompt on the screen and read a single character echoed back from the keyboard.
///
/// Otherwise, like 0x20 GETC.
pub fn in_trap(
    regs: &mut Registers,
    keyboard: &mut dyn KeyboardInputProvider,
    stdout: &mut impl Write,
) -> TrapResult {
    write_str_out(IN_PROMPT, stdout)?;
    get_c(regs, keyboard)?;
    write_str_out(&String::from(low_byte_char(regs.get(0))), stdout)
}

/// OUT: Write a character in R0[7:0] to the console display.
pub fn out(regs: &Registers, stdout: &mut impl Write) -> TrapResult {
    write_str_out(&String::from(low_byte_char(regs.get(0))), stdout)
}

fn low_byte_char(input: u16) -> char {
    #[expect(
        clippy::cast_possible_truncation,
        reason = "Truncation is what is expected here"
    )]
    let c = (input as u8) as char;
    c
}

fn put_one_char_per_u16(input: u16, append_to: &mut String) {
    append_to.push(low_byte_char(input));
}

fn put_two_chars_per_u16(input: u16, append_to: &mut String) {
    append_to.push(low_byte_char(input));
    let c = low_byte_char(input >> 8);
    if c != '\0' {
        append_to.push(c);
    }
}

fn put(
    regs: &Registers,
    mem: &Memory,
    stdout: &mut impl Write,
    handle_char: fn(u16, &mut String),
) -> TrapResult {
    let mut s = String::with_capacity(120);
    // a string without terminator ends after one pass through the address space
    let words = (0..MEMORY_SIZE_U16)
        .scan(regs.get(0), |address, _| {
            let word = mem[*address];
            *address = address.wrapping_add(1);
            Some(word)
        })
        .take_while(|word| *word != 0);
    for word in words {
        handle_char(word, &mut s);
    }
    write_str_out(s.as_str(), stdout)
}

/// PUTS: print null-delimited char* from register 0's address
pub fn put_s(regs: &Registers, mem: &Memory, stdout: &mut impl Write) -> TrapResult {
    put(regs, mem, stdout, put_one_char_per_u16)
}

/// PUTSP: Packed version of PUTS
///
/// The ASCII code contained in bits [7:0] of a memory location is written to the console first.
/// The second character of the last memory location can be 0x00.
/// Writing terminates with a 0x000 char.
pub fn put_sp(regs: &Registers, mem: &Memory, stdout: &mut impl Write) -> TrapResult {
    put(regs, mem, stdout, put_two_chars_per_u16)
}

/// HALT: End program and stdout a message
pub fn halt(stdout: &mut impl Write) -> TrapResult {
    write_str_out(HALT_MESSAGE, stdout)?;
    ControlFlow::Break(Ok(()))
}

fn write_str_out(message: &str, stdout: &mut impl Write) -> TrapResult {
    match write!(stdout, "{message}").and_then(|()| stdout.flush()) {
        Ok(()) => ControlFlow::Continue(()),
        Err(e) => wrap_io_error_in_cf(&e),
    }
}

fn wrap_io_error_in_cf(error: &io::Error) -> TrapResult {
    ControlFlow::Break(Err(ExecutionError::IOInputOutputError(error.to_string())))
}
