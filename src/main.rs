//! CLI entry point for the bikewatch tool.
//!
//! Provides subcommands for computing station traffic for a single
//! time-of-day filter, sweeping the whole day into per-minute snapshots,
//! and listing the station inventory.

use anyhow::Result;
use bikewatch::{
    fetch::{BasicClient, fetch_bytes},
    loader::{parse_stations, parse_trips},
    model::{Station, Trip},
    output::{TrafficSnapshot, append_records, write_snapshot},
    publish::{write_gzipped_json_to_s3, write_json_to_s3},
    scales::RadiusScale,
    timefilter::{ANY_TIME, DEFAULT_WINDOW_MINUTES, filter_trips_by_minute},
    traffic::{compute_station_traffic, max_total_traffic},
};
use bytes::Bytes;
use clap::{Parser, Subcommand};
use std::ffi::OsStr;
use std::path::Path;
use tracing::{debug, info};
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

#[derive(Parser)]
#[command(name = "bikewatch")]
#[command(about = "Aggregate bike-share station traffic for a map frontend", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute per-station traffic for one time-of-day filter setting
    Traffic {
        /// Stations JSON: file path or URL
        #[arg(value_name = "STATIONS_FILE_OR_URL")]
        stations: String,

        /// Trip log CSV: file path or URL
        #[arg(value_name = "TRIPS_FILE_OR_URL")]
        trips: String,

        /// Minute of day to filter around (-1 = no filter)
        #[arg(short = 'a', long, default_value_t = ANY_TIME,
              value_parser = clap::value_parser!(i32).range(-1..=1439))]
        at: i32,

        /// Window tolerance in minutes around the target
        #[arg(short, long, default_value_t = DEFAULT_WINDOW_MINUTES)]
        window: i64,

        /// CSV file to append per-station rows to
        #[arg(short, long, default_value = "traffic.csv")]
        output: String,

        /// Optional: also write a full JSON snapshot to this path
        #[arg(long)]
        snapshot: Option<String>,

        /// Optional: S3 bucket name to upload the snapshot to (e.g., "my-bucket")
        #[arg(long)]
        s3_bucket: Option<String>,
    },
    /// Recompute traffic for every step of the day, one snapshot per step
    Sweep {
        /// Stations JSON: file path or URL
        #[arg(value_name = "STATIONS_FILE_OR_URL")]
        stations: String,

        /// Trip log CSV: file path or URL
        #[arg(value_name = "TRIPS_FILE_OR_URL")]
        trips: String,

        /// Directory to write snapshot JSON files into
        #[arg(short, long, default_value = "snapshots")]
        output_dir: String,

        /// Minutes between snapshots
        #[arg(short, long, default_value_t = 60,
              value_parser = clap::value_parser!(u32).range(1..=1440))]
        step: u32,

        /// Window tolerance in minutes around each target
        #[arg(short, long, default_value_t = DEFAULT_WINDOW_MINUTES)]
        window: i64,

        /// Optional: S3 bucket name to upload snapshots to (e.g., "my-bucket")
        #[arg(long)]
        s3_bucket: Option<String>,

        /// Optional: Gzip compress snapshots before uploading to S3
        #[arg(long, default_value_t = false)]
        gzip: bool,
    },
    /// List stations from a stations document
    ListStations {
        /// Stations JSON: file path or URL
        #[arg(value_name = "STATIONS_FILE_OR_URL")]
        stations: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok(); // Load .env file

    // Logging setup: colored stderr + JSON rolling log file
    let log_file_path =
        std::env::var("LOG_FILE_PATH").unwrap_or_else(|_| "logs/bikewatch.log".to_string());
    let log_dir = Path::new(&log_file_path)
        .parent()
        .unwrap_or(Path::new("logs"));
    let log_file_name = Path::new(&log_file_path)
        .file_name()
        .unwrap_or(OsStr::new("bikewatch.log"));

    let file_appender = tracing_appender::rolling::daily(log_dir, log_file_name);
    let (non_blocking_file, _file_guard) = tracing_appender::non_blocking(file_appender);

    let stderr_layer = fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::from_env("RUST_LOG").add_directive("info".parse().unwrap()));

    let json_layer = fmt::layer()
        .json()
        .with_current_span(true)
        .with_span_list(true)
        .with_writer(non_blocking_file)
        .with_filter(EnvFilter::from_env("RUST_LOG_JSON").add_directive("debug".parse().unwrap()));

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Traffic {
            stations,
            trips,
            at,
            window,
            output,
            snapshot,
            s3_bucket,
        } => {
            let (station_list, trip_log) = load_inputs(&stations, &trips).await?;
            let result = recompute(&station_list, &trip_log, at, window);

            info!(
                filter = %result.label,
                stations = result.stations.len(),
                max_total_traffic = result.max_total_traffic,
                "Traffic recomputed"
            );

            append_records(&output, &result.stations)?;

            if let Some(path) = snapshot {
                write_snapshot(&path, &result)?;
            }

            if let Some(bucket) = s3_bucket {
                let config = aws_config::load_from_env().await;
                let s3 = aws_sdk_s3::Client::new(&config);
                let key = snapshot_key(at);
                write_json_to_s3(&s3, &bucket, &key, &result).await?;
                info!(bucket = %bucket, key = %key, "Snapshot uploaded");
            }
        }
        Commands::Sweep {
            stations,
            trips,
            output_dir,
            step,
            window,
            s3_bucket,
            gzip,
        } => {
            sweep(&stations, &trips, &output_dir, step, window, s3_bucket, gzip).await?;
        }
        Commands::ListStations { stations } => {
            let bytes = fetcher(&stations).await?;
            let station_list = parse_stations(&bytes)?;

            info!(total = station_list.len(), "Station list fetched");

            for station in &station_list {
                info!(
                    short_name = %station.short_name,
                    name = station.name.as_deref().unwrap_or("(unnamed)"),
                    lat = station.lat,
                    lon = station.lon,
                    "Station"
                );
            }

            let named = station_list.iter().filter(|s| s.name.is_some()).count();
            let lat_span = coord_span(&station_list, |s| s.lat);
            let lon_span = coord_span(&station_list, |s| s.lon);

            info!(
                total = station_list.len(),
                named,
                lat_min = lat_span.0,
                lat_max = lat_span.1,
                lon_min = lon_span.0,
                lon_max = lon_span.1,
                "Station list summary"
            );
        }
    }

    Ok(())
}

/// Loads a document from a local file path or fetches it over HTTP.
#[tracing::instrument(fields(source = %url))]
async fn fetcher(url: &str) -> Result<Bytes> {
    let bytes = if url.starts_with("http") {
        let client = BasicClient::new();
        fetch_bytes(&client, url).await?
    } else {
        Bytes::from(std::fs::read(url)?)
    };
    Ok(bytes)
}

/// Loads and parses both input documents.
#[tracing::instrument(fields(stations = %stations_src, trips = %trips_src))]
async fn load_inputs(stations_src: &str, trips_src: &str) -> Result<(Vec<Station>, Vec<Trip>)> {
    let station_bytes = fetcher(stations_src).await?;
    let stations = parse_stations(&station_bytes)?;

    let trip_bytes = fetcher(trips_src).await?;
    let trips = parse_trips(&trip_bytes)?;

    info!(
        stations = stations.len(),
        trips = trips.len(),
        "Inputs loaded"
    );
    Ok((stations, trips))
}

/// One full recomputation: filter the trip subset, rebuild every station's
/// counts, and derive the scale values for the active filter setting.
fn recompute(stations: &[Station], trips: &[Trip], at: i32, window: i64) -> TrafficSnapshot {
    let subset = filter_trips_by_minute(trips, at, window);
    debug!(
        target_minute = at,
        window,
        selected = subset.len(),
        total = trips.len(),
        "Trip subset selected"
    );

    let mut rows = compute_station_traffic(stations, subset);
    let max = max_total_traffic(&rows);

    let scale = RadiusScale::new(max, at != ANY_TIME);
    scale.apply(&mut rows);

    TrafficSnapshot::new(at, window, max, rows)
}

/// Snapshot object key for a filter setting.
fn snapshot_key(at: i32) -> String {
    if at == ANY_TIME {
        "snapshots/any_time.json".to_string()
    } else {
        format!("snapshots/minute={at:04}.json")
    }
}

/// Recomputes traffic for every `step` minutes of the day (plus the
/// unfiltered baseline), writing one snapshot per setting and optionally
/// uploading each to S3. The batch analogue of a UI slider firing events.
#[tracing::instrument(skip(s3_bucket, gzip), fields(output_dir, step, window))]
async fn sweep(
    stations_src: &str,
    trips_src: &str,
    output_dir: &str,
    step: u32,
    window: i64,
    s3_bucket: Option<String>,
    gzip: bool,
) -> Result<()> {
    let (stations, trips) = load_inputs(stations_src, trips_src).await?;

    // Initialize S3 client if bucket is provided
    let s3_client = if s3_bucket.is_some() {
        let config = aws_config::load_from_env().await;
        Some(aws_sdk_s3::Client::new(&config))
    } else {
        None
    };

    if let Some(ref bucket) = s3_bucket {
        info!(bucket = %bucket, gzip, "S3 upload enabled");
    }

    std::fs::create_dir_all(output_dir)?;

    // Unfiltered baseline first, then each minute of the day
    let mut targets = vec![ANY_TIME];
    targets.extend((0..1440).step_by(step as usize));

    for at in targets {
        let result = recompute(&stations, &trips, at, window);

        let filename = if at == ANY_TIME {
            "any_time.json".to_string()
        } else {
            format!("minute={at:04}.json")
        };
        let path = format!("{output_dir}/{filename}");
        write_snapshot(&path, &result)?;

        info!(
            filter = %result.label,
            max_total_traffic = result.max_total_traffic,
            path = %path,
            "Snapshot written"
        );

        if let (Some(bucket), Some(s3)) = (&s3_bucket, &s3_client) {
            let key = snapshot_key(at);
            if gzip {
                write_gzipped_json_to_s3(s3, bucket, &key, &result).await?;
            } else {
                write_json_to_s3(s3, bucket, &key, &result).await?;
            }
        }
    }

    info!(output_dir, "Sweep complete");
    Ok(())
}

/// Min/max of a coordinate across the station list.
fn coord_span(stations: &[Station], f: impl Fn(&Station) -> f64) -> (f64, f64) {
    stations.iter().fold((f64::MAX, f64::MIN), |(lo, hi), s| {
        let v = f(s);
        (lo.min(v), hi.max(v))
    })
}
