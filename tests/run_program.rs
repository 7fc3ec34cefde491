use googletest::prelude::*;
use lc3_vm::emulator::{self, Emulator, ExitReason, MachineState};
use lc3_vm::errors::LoadProgramError;
use lc3_vm::hardware::keyboard::KeyboardInputProvider;
use std::cell::RefCell;
use std::io;
use std::io::Write;
use std::rc::Rc;

struct ScriptedKeyboard(Vec<u16>);
impl KeyboardInputProvider for ScriptedKeyboard {
    fn check_input_available(&mut self) -> io::Result<bool> {
        Ok(!self.0.is_empty())
    }
    fn read_input_character(&mut self) -> io::Result<u16> {
        self.0
            .pop()
            .ok_or_else(|| io::Error::from(io::ErrorKind::UnexpectedEof))
    }
}

#[derive(Clone, Default)]
struct SharedOutput(Rc<RefCell<Vec<u8>>>);
impl Write for SharedOutput {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.borrow_mut().write(buf)
    }
    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

fn image(origin: u16, words: &[u16]) -> Vec<u8> {
    std::iter::once(origin)
        .chain(words.iter().copied())
        .flat_map(u16::to_be_bytes)
        .collect()
}

#[gtest]
fn test_echo_character_and_packed_string() {
    let program = [
        0xF020, // GETC
        0x1221, // ADD R1, R0, #1
        0xF021, // OUT
        0xE002, // LEA R0, #2
        0xF024, // PUTSP
        0xF025, // HALT
        0x6b6f, // "ok"
        0x0000,
    ];
    let output = SharedOutput::default();
    let mut emu = Emulator::new(
        Rc::new(RefCell::new(ScriptedKeyboard(vec![u16::from(b'z')]))),
        Box::new(output.clone()),
    );
    emu.load_image(&image(0x3000, &program)).unwrap();
    expect_that!(emu.execute(), eq(&Ok(ExitReason::Halted)));
    expect_that!(emu.state(), eq(MachineState::Stopped));
    expect_that!(emu.registers().get(1), eq(u16::from(b'z') + 1));
    let written = String::from_utf8(output.0.borrow().clone()).unwrap();
    expect_that!(written, eq("zokHALT\n"));
}

#[gtest]
fn test_branch_before_first_flag_update_falls_through() {
    let mut emu = Emulator::new(
        Rc::new(RefCell::new(ScriptedKeyboard(Vec::new()))),
        Box::new(io::sink()),
    );
    // BRnzp #1, ADD R2, R2, #1, HALT
    emu.load_image(&image(0x3000, &[0x0E01, 0x14A1, 0xF025]))
        .unwrap();
    expect_that!(emu.execute(), eq(&Ok(ExitReason::Halted)));
    expect_that!(emu.registers().get(2), eq(1));
}

#[gtest]
fn test_from_program_missing_file() {
    let result = emulator::from_program("does/not/exist.obj");
    expect_that!(
        matches!(result, Err(LoadProgramError::ProgramNotLoadable { .. })),
        eq(true)
    );
}
