//! `uxn-machine`: the Emulator Frame that wires one `Vm` to one `Console`
//! and routes device-bus access by port high nibble. This is the piece
//! spec.md calls the "Emulator Frame" (section 2, item 5) — it owns the
//! VM and the console by value and exposes `load`/`eval`/`inject` as the
//! one concrete wiring of core to a host.

pub mod error;

use uxn_core::console::Console;
use uxn_core::device::Device;
use uxn_core::vm::Vm;

pub use error::RomError;

/// Where ROMs are loaded: spec.md §6, "Loaded at address 0x0100."
pub const RESET_ADDR: u16 = 0x0100;

/// Largest ROM that fits between the reset address and the top of
/// memory: `0x10000 - 0x0100`.
pub const MAX_ROM_LEN: usize = 0x10000 - RESET_ADDR as usize;

/// Routes `DEI`/`DEO` calls from a running `Vm` to the one device this
/// repo implements (the console, at `0x10..0x1f`). Everything else —
/// the system (`0x00`), screen (`0x20`), and datetime (`0xc0`) ranges
/// spec.md lists as reserved but never implemented — falls through to a
/// plain read/no-op on the device page, exactly as `uxnpy`'s `Emu.dei`/
/// `Emu.deo` do for the devices it never attaches.
struct Router<'a> {
    console: &'a mut Console,
}

impl Device for Router<'_> {
    fn dei(&mut self, port: u8, dev: &[u8; 256]) -> u8 {
        dev[port as usize]
    }

    fn deo(&mut self, port: u8, dev: &[u8; 256]) {
        if port & 0xf0 == 0x10 {
            self.console.deo(port, dev);
        }
    }
}

/// Owns one `Vm` and one `Console`; the "Emulator Frame" of spec.md §2/§4.5.
///
/// `Console` holds no back-reference to the `Vm` it drives — each call
/// that needs both (the device router during `eval`, the reentrant
/// vector call during `inject`) borrows `vm` and `console` as two
/// disjoint fields for exactly as long as it needs them, rather than
/// storing a pointer. There is no reference cycle to resolve with
/// `Rc<RefCell<_>>` or unsafe code.
pub struct Emulator {
    pub vm: Vm,
    pub console: Console,
}

impl Emulator {
    /// A fresh emulator: zero-initialized VM, console writing straight
    /// through to the host's stdout/stderr.
    pub fn new() -> Self {
        Self {
            vm: Vm::new(),
            console: Console::new(),
        }
    }

    /// A fresh emulator whose console captures output into in-memory
    /// buffers instead of writing to real streams. Handy for tests and
    /// for hosts that want to inspect output before deciding to display it.
    pub fn with_capture() -> Self {
        Self {
            vm: Vm::new(),
            console: Console::capturing(),
        }
    }

    /// Copy `rom` into RAM at [`RESET_ADDR`] and run it to completion
    /// (a `BRK`, or the step budget, whichever comes first).
    ///
    /// Rejects ROMs too large to fit before `0x10000`; spec.md §7 leaves
    /// the choice between truncating and rejecting to the loader, and
    /// this one rejects, surfacing the oversize as an explicit error
    /// instead of silently discarding program bytes.
    pub fn load(&mut self, rom: &[u8]) -> Result<(), RomError> {
        if rom.len() > MAX_ROM_LEN {
            return Err(RomError::TooLarge {
                len: rom.len(),
                max: MAX_ROM_LEN,
            });
        }
        let base = RESET_ADDR as usize;
        self.vm.ram[base..base + rom.len()].copy_from_slice(rom);
        self.eval(RESET_ADDR);
        Ok(())
    }

    /// Load a ROM straight from a filesystem path (`uxnpy`'s
    /// `Emu.load_file`), surfacing I/O errors alongside the size check.
    pub fn load_file(&mut self, path: impl AsRef<std::path::Path>) -> Result<(), RomError> {
        let rom = std::fs::read(path)?;
        self.load(&rom)
    }

    /// Run the VM starting at `addr`, routing any `DEI`/`DEO` it performs
    /// to this emulator's devices.
    pub fn eval(&mut self, addr: u16) {
        let mut router = Router {
            console: &mut self.console,
        };
        self.vm.eval(addr, &mut router);
    }

    /// Deliver one input character to the console, reentrantly running
    /// the ROM's installed input vector if it has set one.
    pub fn inject(&mut self, ch: u8, kind: uxn_core::console::InputKind) {
        self.console.inject(&mut self.vm, ch, kind);
    }

    /// Feed a line of text to the console, one character at a time, then
    /// a trailing newline.
    pub fn on_line(&mut self, line: &str) {
        self.console.on_line(&mut self.vm, line);
    }
}

impl Default for Emulator {
    fn default() -> Self {
        Self::new()
    }
}
