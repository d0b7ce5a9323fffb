use std::process::ExitCode;

fn main() -> ExitCode {
    match kuznets_curves::app::run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{}: {err}", err.kind().label());
            ExitCode::from(err.exit_code())
        }
    }
}
