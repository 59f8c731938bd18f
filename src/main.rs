use std::process::ExitCode;

fn main() -> ExitCode {
    support_dashboards_lib::run()
}
