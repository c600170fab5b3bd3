pub mod cli;
pub mod error;
pub mod operand;

pub use cli::{format_fixed, run, split_options, sum_operands, Options, USAGE};
pub use error::{ExitStatus, SumError};
pub use operand::{parse_operand, scan_prefix, ParseMode};
