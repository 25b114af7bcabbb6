use std::process::ExitCode;

fn main() -> ExitCode {
    match roicoloc::run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}
