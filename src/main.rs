use clap::Parser;
use lc3_vm::emulator::{self, ExitReason};
use lc3_vm::terminal;
use std::path::PathBuf;
use std::process::ExitCode;

/// Runs an LC-3 program image until it halts.
#[derive(Parser)]
#[command(version, about)]
struct Args {
    /// Program image: big-endian words, the first one is the load origin
    image: PathBuf,

    /// Address at which to start executing, hexadecimal with 0x prefix or decimal
    #[arg(long, default_value = "0x3000", value_parser = parse_address)]
    start: u16,
}

fn parse_address(value: &str) -> Result<u16, String> {
    value
        .strip_prefix("0x")
        .or_else(|| value.strip_prefix('x'))
        .map_or_else(|| value.parse(), |hex| u16::from_str_radix(hex, 16))
        .map_err(|e| format!("invalid address {value}: {e}"))
}

fn main() -> ExitCode {
    env_logger::init();
    let args = Args::parse();

    let mut emu = match emulator::from_program(&args.image) {
        Ok(emu) => emu.with_start_address(args.start),
        Err(e) => {
            eprintln!("{e}");
            return ExitCode::FAILURE;
        }
    };

    let result = {
        let _lock = terminal::set_terminal_raw();
        emu.execute()
    };
    match result {
        Ok(ExitReason::Halted) => ExitCode::SUCCESS,
        Ok(ExitReason::UnknownOpcode {
            op_code,
            instruction,
        }) => {
            eprintln!("BAD OPCODE: {op_code:#06b} in instruction {instruction:#018b}");
            ExitCode::from(2)
        }
        Err(e) => {
            eprintln!("{e}");
            ExitCode::FAILURE
        }
    }
}
