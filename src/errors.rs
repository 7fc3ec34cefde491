use displaydoc::Display;
use std::io;
use thiserror::Error;

/// Errors while turning a program image into machine memory.
#[derive(Display, Error, Debug)]
pub enum LoadProgramError {
    /// Could not read program image {path}: {source}
    ProgramNotLoadable {
        path: String,
        #[source]
        source: io::Error,
    },
    /// Program is missing valid .ORIG header
    ProgramMissingOrigHeader,
    /// Program has an odd length of {bytes} bytes, last u16 word is truncated
    ProgramOddLength { bytes: usize },
}

/// Fatal errors ending the execution of a loaded program.
#[derive(Display, Error, Debug, PartialEq, Eq)]
pub enum ExecutionError {
    /// Error reading the input device or writing the output sink: {0}
    IOInputOutputError(String),
}

impl From<io::Error> for ExecutionError {
    fn from(error: io::Error) -> Self {
        Self::IOInputOutputError(error.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use googletest::prelude::*;

    #[gtest]
    pub fn test_load_program_error_messages() {
        expect_that!(
            LoadProgramError::ProgramMissingOrigHeader.to_string(),
            eq("Program is missing valid .ORIG header")
        );
        expect_that!(
            LoadProgramError::ProgramOddLength { bytes: 5 }.to_string(),
            eq("Program has an odd length of 5 bytes, last u16 word is truncated")
        );
        let not_loadable = LoadProgramError::ProgramNotLoadable {
            path: String::from("missing.obj"),
            source: io::Error::new(io::ErrorKind::NotFound, "no such file"),
        };
        expect_that!(
            not_loadable.to_string(),
            eq("Could not read program image missing.obj: no such file")
        );
        expect_that!(std::error::Error::source(&not_loadable).is_some(), eq(true));
    }
    #[gtest]
    pub fn test_execution_error_from_io_error() {
        let error = ExecutionError::from(io::Error::other("broken pipe"));
        expect_that!(
            error.to_string(),
            eq("Error reading the input device or writing the output sink: broken pipe")
        );
    }
}
