use std::process::ExitCode;

use folder_sync::output as out;

mod app;
mod logging;

fn main() -> ExitCode {
    let args = folder_sync::cli::parse();
    match app::run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            out::print_error(&format!("{e:#}"));
            ExitCode::FAILURE
        }
    }
}
