//! regrr-demo — маленький инструментированный "пайплайн" для проверки вывода.
//!
//! Пишет типичный набор артефактов: внешний scope, managed-матрицу с правкой
//! через get(), N повторных входов во вложенный scope и пару direct save
//! (одно- и двухканальная матрицы). Итог печатается текстом или JSON.

use anyhow::{Context, Result};
use clap::Parser;
use log::info;
use std::path::PathBuf;

use crate::config::RecorderConfig;
use crate::mat::{Depth, Mat};
use crate::recorder::Recorder;

#[derive(Parser, Debug)]
#[command(
    name = "regrr-demo",
    version,
    about = "Run a small instrumented pipeline and capture its regression artifacts"
)]
pub struct Cli {
    /// Output root (overrides REGRR_DIR). Without it and without REGRR_DIR nothing is written.
    #[arg(long)]
    pub dir: Option<PathBuf>,
    /// Output extension: .xml | .yml | .json (overrides REGRR_EXT)
    #[arg(long)]
    pub ext: Option<String>,
    /// How many times the inner step runs
    #[arg(long, default_value_t = 10)]
    pub iterations: u32,
    /// Print the metrics summary as JSON
    #[arg(long)]
    pub json: bool,
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();
    exec(cli)
}

pub fn exec(cli: Cli) -> Result<()> {
    let mut cfg = RecorderConfig::from_env();
    if let Some(dir) = cli.dir {
        cfg = cfg.with_output_root(Some(dir));
    }
    if let Some(ext) = cli.ext.as_deref() {
        cfg = cfg.with_extension(ext);
    }
    let rec = Recorder::new(cfg.build());

    run_pipeline(&rec, cli.iterations)?;

    let m = rec.metrics();
    if cli.json {
        let out = serde_json::json!({
            "enabled": rec.is_enabled(),
            "output_root": rec.output_root().map(|p| p.display().to_string()),
            "manifest": rec.manifest_path().map(|p| p.display().to_string()),
            "metrics": m,
        });
        println!(
            "{}",
            serde_json::to_string_pretty(&out).context("serialize summary")?
        );
    } else {
        println!("enabled:         {}", rec.is_enabled());
        if let Some(p) = rec.manifest_path() {
            println!("manifest:        {}", p.display());
        }
        println!("scopes entered:  {}", m.scopes_entered);
        println!("managed stored:  {}", m.artifacts_stored);
        println!("direct saves:    {}", m.direct_saves);
        println!("files written:   {}", m.files_written);
    }
    Ok(())
}

fn inner_step(rec: &Recorder, i: u32) -> Result<()> {
    let _scope = rec.scoped("step")?;
    let mut m = Mat::zeros(2, 2, 1, Depth::F32);
    m.set(0, 0, 0, f64::from(i))?;
    rec.save(&m, "progress", true)?;
    Ok(())
}

/// The instrumented pipeline itself. Public for the integration tests.
pub fn run_pipeline(rec: &Recorder, iterations: u32) -> Result<()> {
    let a = Mat::zeros(10, 10, 1, Depth::F32);
    let b = Mat::zeros(20, 20, 2, Depth::F32);

    let _main = rec.scoped("main")?;

    let hello = rec.managed("hello", Mat::zeros(4, 4, 1, Depth::F32))?;
    if rec.is_enabled() {
        hello.get()?.borrow_mut()?.set(0, 0, 0, 10.0)?;
    }

    for i in 0..iterations {
        inner_step(rec, i)?;
    }

    rec.save(&a, "a", true)?;
    rec.save(&b, "b", true)?;

    hello.close()?;
    info!("regrr-demo: pipeline finished ({} iterations)", iterations);
    Ok(())
}
