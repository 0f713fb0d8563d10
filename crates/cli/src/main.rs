use std::process::ExitCode;

fn main() -> ExitCode {
    petworld_cli::run()
}
