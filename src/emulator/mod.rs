//! The fetch-decode-execute engine of the LC-3.
pub mod instruction;
pub mod opcodes;
pub mod trap_routines;

#[cfg(test)]
pub(crate) mod test_helpers;

use crate::errors::{ExecutionError, LoadProgramError};
use crate::hardware::keyboard::{KeyboardInputProvider, TerminalInputProvider};
use crate::hardware::memory::Memory;
use crate::hardware::registers::Registers;
use crate::terminal::ConsoleOutput;
use instruction::Instruction;
use opcodes::Opcode;
use std::cell::RefCell;
use std::fmt::{Debug, Formatter};
use std::io::Write;
use std::ops::ControlFlow;
use std::path::Path;
use std::rc::Rc;
use std::{fs, io};
use trap_routines::TrapVector;

/// Address the program counter starts from unless configured otherwise.
pub const DEFAULT_START_ADDRESS: u16 = 0x3000;

/// Whether the machine is executing instructions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MachineState {
    Stopped,
    Running,
}

/// Why [`Emulator::execute`] returned without an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitReason {
    /// The HALT trap was executed.
    Halted,
    /// The instruction's opcode is not known to the machine.
    UnknownOpcode { op_code: u8, instruction: u16 },
}

/// The public facing emulator used to run LC-3 programs.
pub struct Emulator {
    registers: Registers,
    memory: Memory,
    keyboard: Rc<RefCell<dyn KeyboardInputProvider>>,
    output: Box<dyn Write>,
    start_address: u16,
    state: MachineState,
}

impl Debug for Emulator {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Emulator")
            .field("state", &self.state)
            .field("start_address", &format_args!("{:#06X}", self.start_address))
            .field("registers", &self.registers)
            .field("memory", &self.memory)
            .finish_non_exhaustive()
    }
}

/// Reads the program image at `path` into a new terminal backed [`Emulator`].
///
/// # Errors
/// See [`from_program_bytes`], additionally the file could not be read.
pub fn from_program(path: impl AsRef<Path>) -> Result<Emulator, LoadProgramError> {
    let path = path.as_ref();
    let image = fs::read(path).map_err(|source| LoadProgramError::ProgramNotLoadable {
        path: path.display().to_string(),
        source,
    })?;
    from_program_bytes(&image)
}

/// Loads the program image into a new [`Emulator`] reading from the terminal keyboard
/// and writing to stdout, ready for a terminal in raw mode.
///
/// # Errors
/// See [`Memory::load_image`]
pub fn from_program_bytes(image: &[u8]) -> Result<Emulator, LoadProgramError> {
    let mut emu = Emulator::new(
        Rc::new(RefCell::new(TerminalInputProvider::new())),
        Box::new(ConsoleOutput::new(io::stdout())),
    );
    emu.load_image(image)?;
    Ok(emu)
}

impl Emulator {
    /// Creates a stopped machine with zeroed memory and registers.
    #[must_use]
    pub fn new(
        keyboard: Rc<RefCell<dyn KeyboardInputProvider>>,
        output: Box<dyn Write>,
    ) -> Self {
        Self {
            registers: Registers::new(),
            memory: Memory::new(Rc::clone(&keyboard)),
            keyboard,
            output,
            start_address: DEFAULT_START_ADDRESS,
            state: MachineState::Stopped,
        }
    }
    /// Program counter value at the start of [`Emulator::execute`].
    #[must_use]
    pub fn with_start_address(mut self, start_address: u16) -> Self {
        self.start_address = start_address;
        self
    }
    /// Loads a program image, see [`Memory::load_image`].
    ///
    /// # Errors
    /// - Program is missing valid .ORIG header
    /// - Program has an odd number of bytes
    pub fn load_image(&mut self, image: &[u8]) -> Result<(), LoadProgramError> {
        let (origin, count) = self.memory.load_image(image)?;
        log::debug!("Loaded {count} words at origin {origin:#06X}");
        Ok(())
    }
    #[must_use]
    pub const fn registers(&self) -> &Registers {
        &self.registers
    }
    #[must_use]
    pub const fn memory(&self) -> &Memory {
        &self.memory
    }
    #[must_use]
    pub const fn state(&self) -> MachineState {
        self.state
    }
    /// Discards memory and registers, the loaded program is gone afterwards.
    pub fn reset(&mut self) {
        log::debug!("Resetting memory and registers");
        self.memory = Memory::new(Rc::clone(&self.keyboard));
        self.registers = Registers::new();
        self.state = MachineState::Stopped;
    }
    /// Zeroes all registers, memory is kept so a loaded program can be run again.
    pub fn reset_registers(&mut self) {
        self.registers = Registers::new();
    }
    /// Executes the loaded program from the start address until it halts.
    ///
    /// Returns how the machine stopped, an unknown opcode is not an error.
    ///
    /// # Errors
    /// - Reading the keyboard or writing the output failed
    pub fn execute(&mut self) -> Result<ExitReason, ExecutionError> {
        self.registers.set_pc(self.start_address);
        self.state = MachineState::Running;
        let result = loop {
            match self.step() {
                ControlFlow::Continue(()) => {}
                ControlFlow::Break(result) => break result,
            }
        };
        self.state = MachineState::Stopped;
        result
    }
    /// One fetch-decode-execute cycle.
    fn step(&mut self) -> ControlFlow<Result<ExitReason, ExecutionError>> {
        let pc = self.registers.pc();
        let instruction = match self.memory.read(pc) {
            Ok(bits) => Instruction::from(bits),
            Err(e) => return ControlFlow::Break(Err(e.into())),
        };
        // PC saturates at the end of the address space
        if pc < u16::MAX {
            self.registers.set_pc(pc + 1);
        }
        log::trace!("{pc:#06X}: {instruction:?}");
        self.execute_instruction(instruction.op_code(), instruction)
    }
    fn execute_instruction(
        &mut self,
        op_code: u8,
        i: Instruction,
    ) -> ControlFlow<Result<ExitReason, ExecutionError>> {
        let Some(opcode) = Opcode::n(op_code) else {
            log::warn!("Unknown opcode {op_code:#06b} in instruction {:#018b}", i.bits());
            return ControlFlow::Break(Ok(ExitReason::UnknownOpcode {
                op_code,
                instruction: i.bits(),
            }));
        };
        let regs = &mut self.registers;
        let memory = &mut self.memory;
        match opcode {
            Opcode::Add => opcodes::add(i, regs),
            Opcode::And => opcodes::and(i, regs),
            Opcode::Not => opcodes::not(i, regs),
            Opcode::Br => opcodes::br(i, regs),
            Opcode::Jmp => opcodes::jmp_or_ret(i, regs),
            Opcode::Jsr => opcodes::jsr(i, regs),
            Opcode::Ld => return continue_or_break(opcodes::ld(i, regs, memory)),
            Opcode::Ldi => return continue_or_break(opcodes::ldi(i, regs, memory)),
            Opcode::Ldr => return continue_or_break(opcodes::ldr(i, regs, memory)),
            Opcode::Lea => opcodes::lea(i, regs),
            Opcode::St => opcodes::st(i, regs, memory),
            Opcode::Sti => return continue_or_break(opcodes::sti(i, regs, memory)),
            Opcode::Str => opcodes::str(i, regs, memory),
            Opcode::Trap => return self.execute_trap(i),
            // reserved and unused on this machine
            Opcode::Rti | Opcode::Res => {}
        }
        ControlFlow::Continue(())
    }
    fn execute_trap(&mut self, i: Instruction) -> ControlFlow<Result<ExitReason, ExecutionError>> {
        let regs = &mut self.registers;
        let stdout = &mut self.output;
        let result = match TrapVector::n(i.trap_vector()) {
            Some(TrapVector::GetC) => trap_routines::get_c(regs, &mut *self.keyboard.borrow_mut()),
            Some(TrapVector::Out) => trap_routines::out(regs, stdout),
            Some(TrapVector::PutS) => trap_routines::put_s(regs, &self.memory, stdout),
            Some(TrapVector::In) => {
                trap_routines::in_trap(regs, &mut *self.keyboard.borrow_mut(), stdout)
            }
            Some(TrapVector::PutSp) => trap_routines::put_sp(regs, &self.memory, stdout),
            Some(TrapVector::Halt) => trap_routines::halt(stdout),
            None => {
                log::warn!("Ignoring unknown trap vector {:#04X}", i.trap_vector());
                ControlFlow::Continue(())
            }
        };
        match result {
            ControlFlow::Continue(()) => ControlFlow::Continue(()),
            ControlFlow::Break(Ok(())) => ControlFlow::Break(Ok(ExitReason::Halted)),
            ControlFlow::Break(Err(e)) => ControlFlow::Break(Err(e)),
        }
    }
}

fn continue_or_break(result: io::Result<()>) -> ControlFlow<Result<ExitReason, ExecutionError>> {
    match result {
        Ok(()) => ControlFlow::Continue(()),
        Err(e) => ControlFlow::Break(Err(e.into())),
    }
}
