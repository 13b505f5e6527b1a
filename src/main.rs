use clap::Parser;
use mcbdsc::cli::Cli;
use mcbdsc::logging;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let _guard = logging::init(&cli.log_config())?;

    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?
        .block_on(mcbdsc::cli::run(cli))
}
