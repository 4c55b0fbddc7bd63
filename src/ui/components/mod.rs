mod command_input;
mod filter_input;
mod input;
mod key_result;

pub use command_input::{CommandEvent, CommandInput};
pub use filter_input::{FilterEvent, FilterInput};
pub use key_result::KeyResult;
