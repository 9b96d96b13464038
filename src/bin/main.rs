use std::process::ExitCode;

fn main() -> ExitCode {
    ontology_agent::cli::main()
}
