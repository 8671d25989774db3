mod args;
mod output;

use args::Cli;
use ascii_studio::{LogObserver, convert_batch, convert_path};
use clap::Parser;
use std::process::ExitCode;

fn main() -> ExitCode {
    // Configure logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();
    let params = match cli.params() {
        Ok(params) => params,
        Err(e) => {
            eprintln!("error: {e}");
            return ExitCode::from(2);
        }
    };

    if let Some(c) = output::find_collision(cli.output.as_deref(), &cli.images) {
        eprintln!(
            "error: '{}' and '{}' would both be written to '{}'",
            c.first.display(),
            c.second.display(),
            c.destination.display()
        );
        return ExitCode::from(2);
    }

    let multiple = cli.images.len() > 1;
    log::debug!("converting {} image(s) with {:?}", cli.images.len(), params);

    let results = if multiple {
        convert_batch(&cli.images, params, &LogObserver)
    } else {
        vec![convert_path(&cli.images[0], params, &LogObserver)]
    };

    let mut failures = 0;
    for (input, result) in cli.images.iter().zip(results) {
        let written = result.map_err(|e| e.to_string()).and_then(|art| {
            output::emit(&art, input, cli.output.as_deref(), multiple)
                .map_err(|e| format!("failed to write output for '{}': {e}", input.display()))
        });
        if let Err(message) = written {
            eprintln!("{message}");
            failures += 1;
        }
    }

    if failures > 0 {
        log::warn!("{failures} of {} conversion(s) failed", cli.images.len());
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}
