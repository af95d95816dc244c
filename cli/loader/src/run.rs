//! Main execution logic for the eventlake CLI.

use anyhow::Result;
use el_loader::config::LoaderConfig;
use el_loader::engine::{
    create_athena_client, AthenaConfig, AthenaEngine, PollConfig, QueryExecutor,
};
use el_loader::pipeline::{LoadOutcome, LoadPipeline};
use el_loader::results::read_event_details;
use el_loader::store::{create_s3_client, S3Config, S3Store};
use el_loader::viz::CountryScatter;
use el_types::Dimensions;
use std::time::Duration;
use tracing::Level;
use tracing_subscriber::fmt;

use crate::args::{Cli, LogLevel};

/// Initialize logging.
pub fn init_logging(level: LogLevel) -> Result<()> {
    let level: Level = level.into();

    let subscriber = fmt::Subscriber::builder()
        .with_max_level(level)
        .with_writer(std::io::stderr); // Log to stderr so stdout is clean for output

    subscriber.init();

    Ok(())
}

/// Execute the load with the provided arguments.
pub async fn execute(args: Cli) -> Result<LoadOutcome> {
    let config = LoaderConfig::new(&args.source_bucket, &args.output_bucket)
        .with_database(&args.database);

    // Build S3 access to the output bucket
    let mut s3_config = S3Config::new(&args.output_bucket).with_region(&args.region);
    if let Some(endpoint) = &args.s3_endpoint {
        s3_config = s3_config.with_endpoint(endpoint);
    }
    if let (Some(access_key), Some(secret_key)) = (&args.access_key, &args.secret_key) {
        s3_config = s3_config.with_credentials(access_key, secret_key);
    }
    if let Some(profile) = &args.profile {
        s3_config = s3_config.with_profile(profile);
    }

    // Build Athena access
    let mut athena_config = AthenaConfig::new().with_region(&args.region);
    if let Some(endpoint) = &args.athena_endpoint {
        athena_config = athena_config.with_endpoint(endpoint);
    }
    if let (Some(access_key), Some(secret_key)) = (&args.access_key, &args.secret_key) {
        athena_config = athena_config.with_credentials(access_key, secret_key);
    }
    if let Some(profile) = &args.profile {
        athena_config = athena_config.with_profile(profile);
    }

    let s3_client = create_s3_client(&s3_config).await?;
    let athena_client = create_athena_client(&athena_config).await?;

    let store = S3Store::new(s3_client, &args.output_bucket);
    let engine = AthenaEngine::new(athena_client);

    let mut poll = PollConfig::new().with_interval(Duration::from_secs(args.poll_interval_secs));
    if let Some(timeout_secs) = args.poll_timeout_secs {
        poll = poll.with_timeout(Duration::from_secs(timeout_secs));
    }

    let executor =
        QueryExecutor::new(engine, store, &config.database, &config.output_bucket).with_poll(poll);
    let pipeline = LoadPipeline::new(executor, config)?;

    let dims = Dimensions::new()
        .with("brand", &args.brand)
        .with("tracker", &args.tracker)
        .with("channel", &args.channel)
        .with("year", &args.year)
        .with("month", &args.month)
        .with("day", &args.day);

    let outcome = pipeline.run(&dims).await?;

    // Emit the scatter payload when a country was requested and the run
    // completed
    if let (Some(country), LoadOutcome::Completed { details_path, .. }) =
        (&args.country, &outcome)
    {
        let table = read_event_details(
            pipeline.executor().store(),
            details_path,
            args.max_rows,
        )
        .await?;
        let scatter =
            CountryScatter::build(&table, country, args.bounds, args.landmarks.clone());
        println!("{}", serde_json::to_string(&scatter)?);
    }

    Ok(outcome)
}
