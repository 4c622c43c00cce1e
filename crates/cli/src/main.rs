use std::process::ExitCode;

fn main() -> ExitCode {
    shopwise_cli::run()
}
