use anyhow::{bail, Context, Result};
use clap::Parser;
use common::{map::do_map, merge::merge, reduce::do_reduce, App, MapTask, ReduceTask};
use futures::future::try_join_all;
use std::{fs, path::PathBuf};
use tracing::{info, Level};

/// Runs a whole job on this machine: every map task, then every reduce task,
/// then merges the reduce outputs into `mrtmp.<job>`.
#[derive(Parser, Debug)]
struct Cli {
    #[arg(short, long, default_value = "iiseq")]
    job_name: String,
    #[arg(short, long, default_value_t = 3, value_parser = clap::value_parser!(u64).range(1..))]
    n_reduce: u64,
    /// Where intermediate shards and outputs are written
    #[arg(short, long, default_value = ".")]
    work_dir: PathBuf,
    #[arg(short, long, default_value = "ii")]
    app_name: String,
    /// Also write logs to <LOG_DIR>/mr.log
    #[arg(long)]
    log_dir: Option<PathBuf>,
    #[arg(short, long)]
    verbose: bool,
    #[arg(required = true)]
    input_files: Vec<PathBuf>,
}

fn load_app(name: &str) -> Result<App> {
    match name {
        "ii" | "indexer" => Ok(app_indexer::APP),
        _ => bail!("unknown app: {name}"),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    if let Some(dir) = &cli.log_dir {
        fs::create_dir_all(dir).with_context(|| format!("creating {}", dir.display()))?;
    }
    let level = if cli.verbose { Level::DEBUG } else { Level::INFO };
    let _guard = common::init_logger(level, cli.log_dir.as_deref());

    let app = load_app(&cli.app_name)?;
    fs::create_dir_all(&cli.work_dir)
        .with_context(|| format!("creating {}", cli.work_dir.display()))?;
    let n_reduce = cli.n_reduce as usize;
    let n_map = cli.input_files.len();
    info!(
        "job {}: app = {}, {} map tasks, {} reduce tasks",
        cli.job_name, app.name, n_map, n_reduce
    );

    for (index, input) in cli.input_files.iter().enumerate() {
        let task = MapTask {
            job_name: cli.job_name.clone(),
            index,
            n_reduce,
            work_dir: cli.work_dir.clone(),
            input: input.clone(),
        };
        do_map(&task, app.map).with_context(|| format!("map task {index} failed"))?;
    }

    // reduce tasks share nothing, so they run side by side
    let handles = (0..n_reduce).map(|r| {
        let task = ReduceTask::new(&cli.job_name, r, n_map, &cli.work_dir);
        let reducef = app.reduce;
        tokio::task::spawn_blocking(move || do_reduce(&task, reducef))
    });
    let results = try_join_all(handles)
        .await
        .context("reduce task panicked")?;
    for (r, result) in results.into_iter().enumerate() {
        let summary = result.with_context(|| format!("reduce task {r} failed"))?;
        info!("reduce task {} wrote {}", r, summary.output.display());
    }

    let output = merge(&cli.job_name, n_reduce, &cli.work_dir).context("merge failed")?;
    info!("job {} done: {}", cli.job_name, output.display());
    Ok(())
}
