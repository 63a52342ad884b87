pub mod lib;
mod module;
mod opcode;
mod program;
mod task;
mod value;
mod vm;
#[cfg(test)]
mod tests;

pub use module::{mangle_function, Module};
pub use opcode::Opcode;
pub use program::{Function, Program};
pub use task::Task;
pub use value::Value;
pub use vm::{Outcome, Vm, VmBuilder};
