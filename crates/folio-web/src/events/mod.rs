pub mod keyboard;
pub mod pointer;

pub use keyboard::{wire_close_controls, wire_global_keydown};
pub use pointer::{wire_input_handlers, InputWiring};
