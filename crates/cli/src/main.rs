use std::process::ExitCode;

fn main() -> ExitCode {
    katalog_cli::run()
}
