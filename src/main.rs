use anyhow::Result;
use clap::Parser;

use xmeasures::config::{Config, MAX_LEVEL};
use xmeasures::measures::{self, MatchOptions};
use xmeasures::storage::{self, SimilarityReport};
use xmeasures::Collection;

#[derive(Parser, Debug)]
#[clap(
    name = "xmeasures",
    about = "Extrinsic measures evaluation of two clusterings in the CNL format"
)]
struct Cli {
    /// First collection of clusters (CNL file)
    collection1: String,

    /// Second collection of clusters (CNL file)
    collection2: String,

    /// Evaluate F1 Max Average Harmonic (default when no measure is selected)
    #[clap(long, short = 'f')]
    f1: bool,

    /// Evaluate NMI (not implemented yet, reported as 0)
    #[clap(long, short = 'n')]
    nmi: bool,

    /// Expected average number of clusters per node, used to size preallocations
    #[clap(long, short = 'm', default_value = "1.0")]
    membership: f32,

    /// Diagnostics level: 0 summary, 1 sizing estimates, 2 per-cluster scores
    #[clap(long, default_value = "0")]
    trace_level: u8,

    /// Self checks: 0 none, 1 node index after load, 2 also score ranges
    #[clap(long, default_value = "0")]
    validate_level: u8,

    /// Match clusters in parallel
    #[clap(long)]
    parallel: bool,

    /// Number of worker threads (0 = use all available cores)
    #[clap(long, default_value = "0")]
    threads: usize,

    /// Save the JSON report to this file
    #[clap(long, short = 'o')]
    output: Option<String>,

    /// Print the JSON report instead of plain values
    #[clap(long)]
    json: bool,

    /// Verbose logging
    #[clap(long, short)]
    verbose: bool,
}

fn main() -> Result<()> {
    // Parse command line arguments
    let args = Cli::parse();

    let config = Config {
        membership: args.membership,
        trace_level: args.trace_level,
        validate_level: args.validate_level,
        parallel: args.parallel,
        threads: args.threads,
    };
    config.validate()?;

    // Configure logging
    let log_level = if args.verbose {
        config.log_level().max(log::LevelFilter::Debug)
    } else {
        config.log_level()
    };

    env_logger::Builder::new()
        .filter_level(log_level)
        .format_timestamp_millis()
        .init();

    if config.parallel {
        let num_threads = config.worker_threads();
        log::debug!("Using {} worker threads", num_threads);
        rayon::ThreadPoolBuilder::new()
            .num_threads(num_threads)
            .build_global()?;
    }
    log::debug!(
        "Trace level {} of {}, validate level {} of {}",
        config.trace_level,
        MAX_LEVEL,
        config.validate_level,
        MAX_LEVEL
    );

    // 1. Load both collections
    let cn1 = Collection::load_with(&args.collection1, &config);
    let cn2 = Collection::load_with(&args.collection2, &config);

    // 2. Evaluate the requested measures
    let mut report = SimilarityReport::new(&cn1, &cn2);
    let options = MatchOptions::from(&config);
    if args.f1 || !args.nmi {
        report.f1mah = Some(measures::f1mah_with(&cn1, &cn2, &options));
    }
    if args.nmi {
        report.nmi = Some(measures::eval_nmi(&cn1, &cn2));
    }

    // 3. Output
    if args.json {
        println!("{}", storage::to_json(&report)?);
    } else {
        if let Some(f1mah) = report.f1mah {
            println!("F1mah: {}", f1mah);
        }
        if let Some(nmi) = report.nmi {
            println!("NMI: {}", nmi);
        }
    }
    if let Some(output) = &args.output {
        storage::write_report(&report, output)?;
    }

    Ok(())
}
