use crate::emulator::Emulator;
use crate::hardware::keyboard::KeyboardInputProvider;
use std::cell::RefCell;
use std::collections::VecDeque;
use std::io;
use std::io::Write;
use std::rc::Rc;

/// Keyboard fake handing out the characters of a fixed input, one per read.
pub struct FakeKeyboardInputProvider {
    input: VecDeque<u16>,
    error: Option<String>,
}
impl FakeKeyboardInputProvider {
    pub fn new(input: &str) -> Self {
        Self {
            input: input.bytes().map(u16::from).collect(),
            error: None,
        }
    }
    pub fn failing(message: &str) -> Self {
        Self {
            input: VecDeque::new(),
            error: Some(String::from(message)),
        }
    }
    fn fail(&self) -> io::Result<()> {
        self.error
            .as_ref()
            .map_or(Ok(()), |message| Err(io::Error::other(message.clone())))
    }
}
impl KeyboardInputProvider for FakeKeyboardInputProvider {
    fn check_input_available(&mut self) -> io::Result<bool> {
        self.fail()?;
        Ok(!self.input.is_empty())
    }
    fn read_input_character(&mut self) -> io::Result<u16> {
        self.fail()?;
        self.input
            .pop_front()
            .ok_or_else(|| io::Error::new(io::ErrorKind::UnexpectedEof, "No input available"))
    }
}

/// Captures everything written, a clone shares the same buffer.
#[derive(Clone, Default)]
pub struct StringWriter {
    vec: Rc<RefCell<Vec<u8>>>,
}
impl Write for StringWriter {
    fn write(&mut self, data: &[u8]) -> Result<usize, io::Error> {
        self.vec.borrow_mut().write(data)
    }
    fn flush(&mut self) -> Result<(), io::Error> {
        Ok(())
    }
}
impl StringWriter {
    pub fn new() -> Self {
        Self::default()
    }
    pub fn get_string(&self) -> String {
        String::from_utf8(self.vec.borrow().clone()).unwrap()
    }
}

/// Output sink rejecting every write.
pub struct FailingWriter;
impl Write for FailingWriter {
    fn write(&mut self, _data: &[u8]) -> Result<usize, io::Error> {
        Err(io::Error::new(io::ErrorKind::BrokenPipe, "Broken pipe"))
    }
    fn flush(&mut self) -> Result<(), io::Error> {
        Err(io::Error::new(io::ErrorKind::BrokenPipe, "Broken pipe"))
    }
}

/// Emulator with a program loaded at `0x3000`, fake keyboard input and captured output.
pub struct FakeEmulator {
    pub inner: Emulator,
    pub stdout: StringWriter,
}
impl FakeEmulator {
    pub fn new(program_no_header: &[u16], stdin_data: &str) -> Self {
        let mut image = Vec::with_capacity(2 * (program_no_header.len() + 1));
        for word in std::iter::once(&0x3000u16).chain(program_no_header) {
            image.extend_from_slice(&word.to_be_bytes());
        }
        let stdout = StringWriter::new();
        let mut inner = Emulator::new(
            Rc::new(RefCell::new(FakeKeyboardInputProvider::new(stdin_data))),
            Box::new(stdout.clone()),
        );
        inner.load_image(&image).unwrap();
        Self { inner, stdout }
    }
}
