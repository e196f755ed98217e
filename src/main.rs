use anyhow::Result;

mod app;
mod logging;

fn main() -> Result<()> {
    let cli = filekit::cli::parse();
    app::run(cli)
}
