use std::process::ExitCode;

fn main() -> ExitCode {
    if smart_reviewers_lib::run() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}
