use std::process::ExitCode;

fn main() -> ExitCode {
    cruisemate_cli::run()
}
