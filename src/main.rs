use drop_consolidator::config::Config;
use drop_consolidator::output::print_summary;
use drop_consolidator::run;
use std::error::Error;
use std::time::Instant;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    // Do as little as possible in main.rs as it can't contain any tests
    log4rs::init_file("log4rs.yml", Default::default())?;
    dotenv::dotenv().ok();

    let start_time = Instant::now();
    log::info!("Start Time: {}", chrono::Local::now().to_rfc3339());

    let config = Config::from_env()?;
    let (report, consolidated) = run(&config).await?;

    log::info!("End Time: {}", chrono::Local::now().to_rfc3339());
    log::info!(
        "Execution time: {:.1} seconds",
        start_time.elapsed().as_secs_f64()
    );
    print_summary(&report, consolidated.rejected_count, &config.output_file);

    Ok(())
}
