//! The console device: the one concrete device this repo implements.
//!
//! Mapped at port range `0x10..0x17`. Ports `0x10`/`0x11` hold a
//! big-endian short "vector" the ROM installs; `0x12` carries the
//! injected character; `0x17` the input kind; `0x18`/`0x19` are the
//! stdout/stderr output ports the ROM writes to one byte at a time.

use crate::vm::Vm;

/// Input event kind passed to [`Console::inject`]. Only `Char` and `End`
/// are given meaning by this device; the rest of the byte range is
/// reserved for host-defined kinds (e.g. argument/piped-input signaling)
/// that this core does not interpret.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InputKind {
    /// A single character arrived (keypress, pasted character, ...).
    Char,
    /// End of input stream.
    End,
    /// Any other host-defined kind, passed through verbatim.
    Other(u8),
}

impl InputKind {
    fn as_byte(self) -> u8 {
        match self {
            InputKind::Char => 0x01,
            InputKind::End => 0x04,
            InputKind::Other(b) => b,
        }
    }
}

/// Which of the console's two output ports a byte arrived on.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ConsoleStream {
    Stdout,
    Stderr,
}

/// Where console output goes. A constructor-time choice, mirroring
/// `uxnpy`'s `capture_output: bool` plus optional `app` callback.
pub enum ConsoleSink {
    /// Write straight through to the process's stdout/stderr.
    Stdio,
    /// Append to in-memory buffers instead of touching the real streams.
    /// Useful for tests and for embedding the VM in a larger host.
    Capture {
        stdout: Vec<u8>,
        stderr: Vec<u8>,
    },
    /// Forward each byte to a host-supplied callback (e.g. a terminal UI
    /// widget), instead of writing to a stream or buffer.
    Callback(Box<dyn FnMut(ConsoleStream, u8)>),
}

impl Default for ConsoleSink {
    fn default() -> Self {
        ConsoleSink::Stdio
    }
}

/// The console device. Holds no back-reference to the owning `Vm` — a
/// `&mut Vm` is passed in explicitly by the caller for the duration of
/// each call, sidestepping the Vm/Console/Emulator reference cycle
/// without `Rc<RefCell<_>>` or unsafe code.
pub struct Console {
    sink: ConsoleSink,
}

impl Console {
    /// A console that writes straight through to the host's stdout/stderr.
    pub fn new() -> Self {
        Self {
            sink: ConsoleSink::Stdio,
        }
    }

    /// A console that captures output into in-memory buffers instead of
    /// writing to real streams.
    pub fn capturing() -> Self {
        Self {
            sink: ConsoleSink::Capture {
                stdout: Vec::new(),
                stderr: Vec::new(),
            },
        }
    }

    /// A console that forwards each output byte to `callback`.
    pub fn with_callback(callback: impl FnMut(ConsoleStream, u8) + 'static) -> Self {
        Self {
            sink: ConsoleSink::Callback(Box::new(callback)),
        }
    }

    /// The captured stdout buffer, if this console was built with
    /// [`Console::capturing`].
    pub fn stdout(&self) -> Option<&[u8]> {
        match &self.sink {
            ConsoleSink::Capture { stdout, .. } => Some(stdout),
            _ => None,
        }
    }

    /// The captured stderr buffer, if this console was built with
    /// [`Console::capturing`].
    pub fn stderr(&self) -> Option<&[u8]> {
        match &self.sink {
            ConsoleSink::Capture { stderr, .. } => Some(stderr),
            _ => None,
        }
    }

    /// Handle a `DEO` to the console's port range. `port` must be `0x18`
    /// or `0x19`; anything else in `0x10..0x17` carries no output
    /// behavior and is ignored here (the vector/input ports are written
    /// by [`Console::inject`], not by the ROM).
    pub fn deo(&mut self, port: u8, dev: &[u8; 256]) {
        match port {
            0x18 => self.emit(ConsoleStream::Stdout, dev[0x18]),
            0x19 => self.emit(ConsoleStream::Stderr, dev[0x19]),
            _ => {}
        }
    }

    fn emit(&mut self, stream: ConsoleStream, byte: u8) {
        match &mut self.sink {
            ConsoleSink::Stdio => {
                use std::io::Write;
                match stream {
                    ConsoleStream::Stdout => {
                        print!("{}", byte as char);
                        let _ = std::io::stdout().flush();
                    }
                    ConsoleStream::Stderr => {
                        eprint!("{}", byte as char);
                        let _ = std::io::stderr().flush();
                    }
                }
            }
            ConsoleSink::Capture { stdout, stderr } => match stream {
                ConsoleStream::Stdout => stdout.push(byte),
                ConsoleStream::Stderr => stderr.push(byte),
            },
            ConsoleSink::Callback(cb) => cb(stream, byte),
        }
    }

    /// Deliver one input event to `vm`: write the character and kind
    /// into the device page, then reentrantly run `vm.eval(vector)` if
    /// the ROM has installed a nonzero vector at `0x10`/`0x11`. If the
    /// vector is still zero, the bytes are buffered into the device page
    /// but no code runs — this is not an error, just a ROM that hasn't
    /// installed a handler yet.
    pub fn inject(&mut self, vm: &mut Vm, ch: u8, kind: InputKind) {
        let vector = ((vm.dev[0x10] as u16) << 8) | vm.dev[0x11] as u16;
        vm.dev[0x12] = ch;
        vm.dev[0x17] = kind.as_byte();
        if vector != 0 {
            let mut router = ConsoleBus { console: self };
            vm.eval(vector, &mut router);
        }
    }

    /// Feed a line of text character by character via [`Console::inject`],
    /// terminated by a newline, matching `uxnpy`'s `Console.on_console`.
    pub fn on_line(&mut self, vm: &mut Vm, line: &str) {
        for ch in line.bytes() {
            self.inject(vm, ch, InputKind::Char);
        }
        self.inject(vm, b'\n', InputKind::Char);
    }
}

impl Default for Console {
    fn default() -> Self {
        Self::new()
    }
}

/// Routes the reentrant `eval` call inside [`Console::inject`] back to
/// this same console for port `0x10`; every other port is a pass-through
/// on the device page, since no other device is installed in this repo
/// (spec's non-goal devices: system/screen/datetime/controller).
struct ConsoleBus<'a> {
    console: &'a mut Console,
}

impl crate::device::Device for ConsoleBus<'_> {
    fn dei(&mut self, port: u8, dev: &[u8; 256]) -> u8 {
        dev[port as usize]
    }

    fn deo(&mut self, port: u8, dev: &[u8; 256]) {
        if port & 0xf0 == 0x10 {
            self.console.deo(port, dev);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::device::NullDevice;

    #[test]
    fn deo_to_0x18_captures_stdout() {
        let mut console = Console::capturing();
        let mut dev = [0u8; 256];
        dev[0x18] = b'*';
        console.deo(0x18, &dev);
        assert_eq!(console.stdout(), Some(&b"*"[..]));
    }

    #[test]
    fn deo_to_0x19_captures_stderr() {
        let mut console = Console::capturing();
        let mut dev = [0u8; 256];
        dev[0x19] = b'E';
        console.deo(0x19, &dev);
        assert_eq!(console.stderr(), Some(&b"E"[..]));
    }

    #[test]
    fn inject_writes_device_bytes() {
        let mut vm = Vm::new();
        let mut console = Console::capturing();
        console.inject(&mut vm, b'A', InputKind::Char);
        assert_eq!(vm.dev[0x12], b'A');
        assert_eq!(vm.dev[0x17], 0x01);
    }

    #[test]
    fn inject_with_zero_vector_does_not_run_code() {
        let mut vm = Vm::new();
        vm.ram[0x100] = 0x00; // BRK would be harmless anyway, but pc stays 0
        let mut console = Console::capturing();
        console.inject(&mut vm, b'A', InputKind::Char);
        assert_eq!(vm.pc, 0); // eval() was never called
    }

    #[test]
    fn inject_reentrantly_runs_installed_vector() {
        // Vector at 0x0150: DEI 0x12 (the injected char); DEO 0x18 (echo); BRK
        let mut vm = Vm::new();
        vm.dev[0x10] = 0x01;
        vm.dev[0x11] = 0x50;
        vm.ram[0x150] = 0x80; // LIT
        vm.ram[0x151] = 0x12; // port 0x12
        vm.ram[0x152] = 0x16; // DEI
        vm.ram[0x153] = 0x80; // LIT
        vm.ram[0x154] = 0x18; // port 0x18
        vm.ram[0x155] = 0x17; // DEO
        vm.ram[0x156] = 0x00; // BRK

        let mut console = Console::capturing();
        console.inject(&mut vm, b'A', InputKind::Char);
        assert_eq!(console.stdout(), Some(&b"A"[..]));
    }

    #[test]
    fn on_line_sends_each_char_then_newline() {
        let mut vm = Vm::new();
        vm.dev[0x10] = 0x01;
        vm.dev[0x11] = 0x50;
        // Echo vector, same as above.
        vm.ram[0x150] = 0x80;
        vm.ram[0x151] = 0x12;
        vm.ram[0x152] = 0x16;
        vm.ram[0x153] = 0x80;
        vm.ram[0x154] = 0x18;
        vm.ram[0x155] = 0x17;
        vm.ram[0x156] = 0x00;

        let mut console = Console::capturing();
        console.on_line(&mut vm, "hi");
        assert_eq!(console.stdout(), Some(&b"hi\n"[..]));
    }

    #[test]
    fn null_device_dei_passes_through() {
        let mut bus = NullDevice;
        let mut dev = [0u8; 256];
        dev[0x30] = 0x99;
        assert_eq!(crate::device::Device::dei(&mut bus, 0x30, &dev), 0x99);
    }
}
