use std::process::ExitCode;

fn main() -> ExitCode {
    // Scene graphs are walked recursively, deep hierarchies need room.
    let child = std::thread::Builder::new()
        .stack_size(1024 * 1024 * 64)
        .spawn(meshbake_cli::internal_main);

    let result = match child {
        Ok(child) => match child.join() {
            Ok(result) => result,
            Err(_) => return ExitCode::FAILURE,
        },
        Err(err) => Err(err.into()),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {:?}", err);
            ExitCode::FAILURE
        }
    }
}
