//! `uxn-core`: the Uxn stack machine — decoder, dual-stack model, device
//! bus, and console device. No third-party dependencies; this crate is
//! the minimal, host-agnostic core described by the spec it implements.
//! A host (see `uxn-machine`/`uxn-cli`) supplies ROM loading, the
//! device-bus router, and anything resembling a UI.

pub mod console;
pub mod device;
pub mod stack;
pub mod vm;

pub mod prelude {
    pub use crate::console::{Console, ConsoleSink, ConsoleStream, InputKind};
    pub use crate::device::{Device, NullDevice};
    pub use crate::stack::{Stack, StackKind};
    pub use crate::vm::{DEFAULT_STEP_BUDGET, Vm};
}
