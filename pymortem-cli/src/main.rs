//! Command-line interface entry point for PyMortem.

use std::process::ExitCode;

fn main() -> ExitCode {
    match pymortem::entry_point::run_with_args(std::env::args().skip(1).collect()) {
        Ok(code) => ExitCode::from(u8::try_from(code).unwrap_or(1)),
        Err(error) => {
            eprintln!("Error: {error:#}");
            ExitCode::FAILURE
        }
    }
}
