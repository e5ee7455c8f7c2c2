use anyhow::Result;
use gpa_collector::orchestrator::App;
use gpa_collector::utils::logging;
use gpa_collector::Config;

#[tokio::main]
async fn main() -> Result<()> {
    // init logging
    logging::init();

    let config = Config::from_env();

    let mut app = App::initialize(config)?;
    app.run().await?;

    Ok(())
}
