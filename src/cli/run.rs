use crate::cli::RunArgs;
use crate::config::Config;
use crate::error::CurateError;
use crate::output::{write_results, write_summary, CSV_FILE};
use crate::prompt::{create_fewshot_messages, PromptSet};
use crate::provider::create_invoker;
use crate::runner::{chunk_size, Batch, BatchScheduler, LogProgress, Preamble, PANEL};
use crate::units::{discover_units, load_image_table, load_metrics, ImageTable, MetricsTable, UnitId};
use chrono::Local;
use std::time::Instant;
use tracing::{info, warn};

/// Inputs loaded once before any model call
struct Prepared {
    unit_ids: Vec<UnitId>,
    images: ImageTable,
    metrics: Option<MetricsTable>,
    preamble: Preamble,
}

pub async fn execute(args: RunArgs) -> anyhow::Result<()> {
    run_curation(args).await?;
    Ok(())
}

async fn run_curation(args: RunArgs) -> Result<(), CurateError> {
    // Load and validate config
    info!("Loading config from {:?}", args.config);
    let mut config = Config::load(&args.config)?;

    // Apply CLI overrides
    if let Some(concurrency) = args.concurrency {
        config.concurrency = concurrency;
    }
    if let Some(report_dir) = args.report_dir {
        config.report_dir = report_dir;
    }
    if let Some(model) = args.model {
        config.provider.model = model;
    }
    if let Some(modalities) = args.modalities {
        config.modalities = modalities;
    }
    if let Some(units) = args.units {
        config.unit_ids = Some(units);
    }
    if args.dry_run {
        config.dry_run = true;
    }

    config.validate()?;

    let prepared = prepare(&config)?;

    if config.dry_run {
        info!("DRY RUN - no model calls will be made");
        print_execution_plan(&config, &prepared);
        return Ok(());
    }

    let invoker = create_invoker(&config.provider)?;
    let scheduler = BatchScheduler::new(invoker, config.retry.clone(), config.concurrency);

    let batch = Batch {
        unit_ids: &prepared.unit_ids,
        images: &prepared.images,
        metrics: prepared.metrics.as_ref(),
        preamble: &prepared.preamble,
    };

    let start = Instant::now();
    let records = scheduler.run(&batch, &LogProgress).await?;
    let duration = start.elapsed();

    // Dated report directory (reports/YYYY-MM-DD/)
    let date_str = Local::now().format("%Y-%m-%d").to_string();
    let report_dir = config.report_dir.join(&date_str);

    write_results(&report_dir, &records)?;
    info!("Wrote {}", report_dir.join(CSV_FILE).display());

    let summary = write_summary(&report_dir, &records, &config.provider.model, duration)?;
    if !summary.degraded.is_empty() {
        warn!(
            "{} units had reviewers that failed every attempt: {:?}",
            summary.degraded.len(),
            summary.degraded
        );
    }

    info!(
        "Completed in {:.1}s: {} good, {} bad across {} units",
        summary.duration_sec, summary.good, summary.bad, summary.units
    );

    Ok(())
}

fn prepare(config: &Config) -> Result<Prepared, CurateError> {
    let prompts = PromptSet::load(config.prompt_dir.as_deref())?;

    let unit_ids = match &config.unit_ids {
        Some(ids) => {
            let mut ids = ids.clone();
            ids.sort_unstable();
            ids.dedup();
            ids
        }
        None => discover_units(&config.image_dir)?,
    };
    info!("Found {} units in {:?}", unit_ids.len(), config.image_dir);

    let images = load_image_table(&config.image_dir, &unit_ids, &config.modalities)?;
    if images.is_empty() {
        warn!("No units to classify under {:?}", config.image_dir);
    }

    // Rows are only dropped when the user picked the units explicitly
    let only = config.unit_ids.as_ref().map(|_| unit_ids.as_slice());
    let metrics = match &config.metrics {
        Some(metrics) => Some(load_metrics(&metrics.path, &metrics.columns, only)?),
        None => None,
    };

    // Few-shot units are rendered from their own images, whether or not they are also curated
    let example_ids: Vec<UnitId> = config
        .fewshot
        .good_ids
        .iter()
        .chain(&config.fewshot.bad_ids)
        .copied()
        .collect();
    let examples = load_image_table(&config.image_dir, &example_ids, &config.modalities)?;
    let fewshot = create_fewshot_messages(
        &examples,
        &config.fewshot.good_ids,
        &config.fewshot.bad_ids,
    )?;

    let system = prompts.build_system_messages(
        &config.modalities,
        metrics.is_some(),
        !config.fewshot.is_empty(),
    );

    Ok(Prepared {
        unit_ids,
        images,
        metrics,
        preamble: Preamble { system, fewshot },
    })
}

fn print_execution_plan(config: &Config, prepared: &Prepared) {
    println!("\n=== Execution Plan ===\n");
    println!("Image dir: {:?}", config.image_dir);
    println!("Units: {}", prepared.unit_ids.len());
    println!(
        "Modalities: {}",
        config
            .modalities
            .iter()
            .map(|m| m.caption())
            .collect::<Vec<_>>()
            .join(", ")
    );

    match &prepared.metrics {
        Some(metrics) => println!("Metrics: {} rows", metrics.len()),
        None => println!("Metrics: none"),
    }

    if !config.fewshot.is_empty() {
        println!(
            "Few-shot: {} good, {} bad",
            config.fewshot.good_ids.len(),
            config.fewshot.bad_ids.len()
        );
    }

    println!(
        "Model: {} ({})",
        config.provider.model, config.provider.base_url
    );
    println!(
        "Concurrency: {} (chunk size {})",
        config.concurrency,
        chunk_size(config.concurrency)
    );
    println!(
        "Retry: {} attempts, {}ms apart",
        config.retry.max_attempts, config.retry.delay_ms
    );
    println!(
        "Model calls: {} ({} units x {} reviewers)",
        prepared.unit_ids.len() * PANEL.len(),
        prepared.unit_ids.len(),
        PANEL.len()
    );
    println!();
}
