//! Kiosk

use std::{io, process::ExitCode};

use kiosk::{
    catalog::Catalog,
    config::KioskConfig,
    fixtures::{Fixture, FixtureError},
    logging,
    shell::Shell,
};
use tracing::error;

fn main() -> ExitCode {
    let config = match KioskConfig::load() {
        Ok(config) => config,
        Err(error) => {
            // Help and version requests end up here too.
            _ = error.print();

            return if error.use_stderr() {
                ExitCode::FAILURE
            } else {
                ExitCode::SUCCESS
            };
        }
    };

    if let Err(init_error) = logging::init(&config.logging) {
        #[expect(
            clippy::print_stderr,
            reason = "logging not initialized, must use eprintln for setup errors"
        )]
        {
            eprintln!("{init_error}");
        }

        return ExitCode::FAILURE;
    }

    let catalog = match load_catalog(&config) {
        Ok(catalog) => catalog,
        Err(load_error) => {
            error!(%load_error, "failed to load catalog");

            #[expect(
                clippy::print_stderr,
                reason = "the user must see why the shop cannot open"
            )]
            {
                eprintln!("Failed to load catalog: {load_error}");
            }

            return ExitCode::FAILURE;
        }
    };

    let stdin = io::stdin();
    let stdout = io::stdout();
    let mut shell = Shell::new(&catalog, stdin.lock(), stdout.lock()).with_payment(config.payment);

    match shell.run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(shell_error) => {
            error!(%shell_error, "session aborted");

            ExitCode::FAILURE
        }
    }
}

fn load_catalog(config: &KioskConfig) -> Result<Catalog<'static>, FixtureError> {
    match &config.catalog {
        Some(path) => Fixture::from_path(path),
        None => Fixture::builtin(),
    }
}
