mod cli;
mod jq_exec;

use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    init_tracing();
    let command_line_interface = cli::CommandLineInterface::load();
    tracing::debug!(?command_line_interface, "parsed arguments");
    command_line_interface.run()
}

// stdout carries decoded documents, so logs go to stderr
fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}
