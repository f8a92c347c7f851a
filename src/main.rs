use chainhash::cli::run_cli;
use chainhash::common::exception::CliError;

fn main() -> Result<(), CliError> {
    // Parse arguments, build the table and run the menu loop
    run_cli()
}
