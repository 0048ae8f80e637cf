use clap::Parser;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    focusynth_lib::run(focusynth_lib::Cli::parse()).await
}
