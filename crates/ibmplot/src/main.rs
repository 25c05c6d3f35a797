use clap::Parser;
use ibmplot::cli::Cli;
use ibmplot::PostProcessor;

fn main() -> ibmplot::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    log::info!("----- ibmplot - POST-PROCESSING -----");
    let mut post = PostProcessor::new(&cli.case_path, cli.selection(), cli.plot_options())?;
    let written = post.run()?;
    log::info!("----- ibmplot - END ({} image(s)) -----", written.len());

    Ok(())
}
