use clap::Parser;

#[tokio::main]
async fn main() {
    let cli = cassiopeia::cli::Cli::parse();
    let exit_code = cassiopeia::run(cli).await;
    std::process::exit(exit_code);
}
