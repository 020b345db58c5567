//! Batch processing command for a directory of invoice documents.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::mpsc;
use std::thread;
use std::time::{Duration, Instant};

use clap::Args;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{info, warn};

use factura_core::{Catalog, Invoice, Pipeline, output};

/// Arguments for the batch command.
#[derive(Args)]
pub struct BatchArgs {
    /// Source directory with <key>.pdf documents (overrides config)
    #[arg(short, long)]
    source_dir: Option<PathBuf>,

    /// Catalog CSV path (overrides config)
    #[arg(long)]
    catalog: Option<PathBuf>,

    /// Output CSV path (overrides config)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Number of parallel workers
    #[arg(short = 'j', long)]
    jobs: Option<usize>,

    /// Per-document timeout in seconds
    #[arg(long)]
    timeout: Option<u64>,
}

/// Result of processing a single document.
enum DocOutcome {
    Done(Box<Invoice>),
    Failed(String),
    TimedOut,
}

pub async fn run(args: BatchArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();

    let mut config = super::load_config(config_path)?;
    if let Some(source_dir) = args.source_dir {
        config.source_dir = source_dir;
    }
    if let Some(catalog_path) = args.catalog {
        config.catalog_path = catalog_path;
    }
    if let Some(output_path) = args.output {
        config.output_path = output_path;
    }
    if let Some(jobs) = args.jobs {
        config.jobs = jobs;
    }
    if let Some(timeout) = args.timeout {
        config.document_timeout_secs = timeout;
    }

    // The catalog is a precondition for all enrichment: loading it is the
    // only batch-fatal step, and it runs before any document is touched.
    let catalog = Catalog::load(&config.catalog_path, &config.catalog_columns).map_err(|e| {
        anyhow::anyhow!(
            "cannot start batch: failed to load catalog {}: {e}",
            config.catalog_path.display()
        )
    })?;
    info!("loaded {} catalog entries", catalog.len());

    let jobs = config.jobs.max(1);
    let timeout = Duration::from_secs(config.document_timeout_secs.max(1));
    let precision = config.precision;
    let output_path = config.output_path.clone();
    let broken_path = config.broken_output_path();

    let pipeline = Arc::new(Pipeline::new(config, catalog));
    let keys = pipeline.list_keys()?;
    if keys.is_empty() {
        anyhow::bail!(
            "No PDF documents found in {}",
            pipeline.config().source_dir.display()
        );
    }

    println!(
        "{} Found {} documents to process",
        style("ℹ").blue(),
        keys.len()
    );

    let pb = ProgressBar::new(keys.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} documents")
            .unwrap()
            .progress_chars("=>-"),
    );

    let outcomes = run_pool(&pipeline, &keys, jobs, timeout, &pb);
    pb.finish_with_message("Complete");

    // Partition in original key order so the output diffs stably.
    let mut invoices = Vec::new();
    let mut failures = Vec::new();
    let mut flags = 0usize;
    for (key, outcome) in keys.iter().zip(outcomes) {
        match outcome {
            DocOutcome::Done(invoice) => {
                if invoice.flag {
                    flags += 1;
                }
                for warning in &invoice.warnings {
                    warn!("{key}: {warning}");
                }
                invoices.push(*invoice);
            }
            DocOutcome::Failed(error) => {
                warn!("skipped {key}: {error}");
                failures.push((key.clone(), error));
            }
            DocOutcome::TimedOut => {
                warn!("skipped {key}: timed out");
                failures.push((key.clone(), "timed out".to_string()));
            }
        }
    }

    let rows = output::write_clean_csv(&output_path, &invoices)?;
    let broken = output::write_broken_csv(&broken_path, &invoices, precision)?;

    println!();
    println!(
        "{} Processed {} documents in {:?}",
        style("✓").green(),
        keys.len(),
        start.elapsed()
    );
    println!(
        "   {} clean rows written to {}",
        style(rows).green(),
        output_path.display()
    );
    println!(
        "   {} flagged invoice(s) written to {}",
        if flags > 0 {
            style(flags).red()
        } else {
            style(flags).green()
        },
        broken_path.display()
    );
    info!("flags: {flags}, broken rows: {broken}");

    if !failures.is_empty() {
        println!();
        println!("{}", style("Skipped documents:").red());
        for (key, error) in &failures {
            println!("  - {key}: {error}");
        }
    }

    Ok(())
}

/// Runs the per-document pipeline on a bounded worker pool. Results are
/// collected by original index; a document that exceeds the timeout is
/// recorded as such and the batch moves on without it.
fn run_pool(
    pipeline: &Arc<Pipeline>,
    keys: &[String],
    jobs: usize,
    timeout: Duration,
    pb: &ProgressBar,
) -> Vec<DocOutcome> {
    let total = keys.len();
    let mut outcomes: Vec<Option<DocOutcome>> = (0..total).map(|_| None).collect();

    let (tx, rx) = mpsc::channel::<(usize, DocOutcome)>();
    let mut in_flight: HashMap<usize, Instant> = HashMap::new();
    let mut next = 0usize;
    let mut completed = 0usize;

    while completed < total {
        while in_flight.len() < jobs && next < total {
            let idx = next;
            next += 1;
            in_flight.insert(idx, Instant::now() + timeout);

            let pipeline = Arc::clone(pipeline);
            let key = keys[idx].clone();
            let tx = tx.clone();
            thread::spawn(move || {
                let outcome = match pipeline.process_document(&key) {
                    Ok(invoice) => DocOutcome::Done(Box::new(invoice)),
                    Err(e) => DocOutcome::Failed(e.to_string()),
                };
                // The dispatcher may have given up on this document already.
                let _ = tx.send((idx, outcome));
            });
        }

        match rx.recv_timeout(Duration::from_millis(200)) {
            Ok((idx, outcome)) => {
                if in_flight.remove(&idx).is_some() {
                    outcomes[idx] = Some(outcome);
                    completed += 1;
                    pb.inc(1);
                }
            }
            Err(mpsc::RecvTimeoutError::Timeout) => {}
            Err(mpsc::RecvTimeoutError::Disconnected) => break,
        }

        let now = Instant::now();
        let expired: Vec<usize> = in_flight
            .iter()
            .filter(|(_, deadline)| **deadline <= now)
            .map(|(idx, _)| *idx)
            .collect();
        for idx in expired {
            in_flight.remove(&idx);
            outcomes[idx] = Some(DocOutcome::TimedOut);
            completed += 1;
            pb.inc(1);
        }
    }

    outcomes
        .into_iter()
        .map(|outcome| outcome.unwrap_or(DocOutcome::TimedOut))
        .collect()
}
