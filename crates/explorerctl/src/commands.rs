//! Command handlers for explorerctl.

use anyhow::{Context, Result};
use explorer_common::{ExplorerConfig, GitPublisher, HttpGateway, LocalStore};
use explorer_shared::clock::SystemClock;
use explorer_shared::persist::{persist_run, PersistPlan, Publisher};
use explorer_shared::synthesis::{synthesize as synthesize_content, Synthesis, SynthesisRules};
use explorer_shared::topic::generate_topic;
use explorer_shared::{CountRange, Explorer, PersistenceError, RunRecord};
use owo_colors::OwoColorize;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::fs;
use std::path::Path;
use tracing::warn;

const HR: &str = "------------------------------------------------------------";

pub struct RunOptions {
    pub cycle: u64,
    pub topic: Option<String>,
    pub seed: Option<u64>,
    pub iterations: Option<usize>,
    pub publish: bool,
    pub json: bool,
}

fn gateway(config: &ExplorerConfig) -> Result<HttpGateway> {
    let api_key = config.api_key();
    if api_key.is_none() {
        warn!(
            env = %config.model.api_key_env,
            "no API key set, requests go out unauthenticated"
        );
    }
    HttpGateway::new(&config.model, api_key)
}

fn print_kv(key: &str, value: &str) {
    println!("{:12} {}", key, value);
}

/// Handle run command
pub fn run(config: &ExplorerConfig, opts: RunOptions) -> Result<()> {
    let catalog = config.load_catalog()?;
    let gateway = gateway(config)?;

    let mut settings = config.explorer_settings();
    if let Some(n) = opts.iterations {
        settings.gauntlet.iterations =
            CountRange::exactly(n).context("--iterations must be at least 1")?;
    }

    let mut rng = match opts.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let topic = match opts.topic {
        Some(topic) => topic,
        None => generate_topic(&gateway, settings.budgets.topic, settings.timeout_secs),
    };

    println!();
    println!("{}", format!("EXPLORER - CYCLE {}", opts.cycle).bold());
    println!("{}", HR.dimmed());
    print_kv("topic", &topic);
    print_kv("model", &config.model.model);
    print_kv("iterations", &settings.gauntlet.iterations.to_string());
    println!();

    let preview_chars = settings.gauntlet.preview_chars;
    let explorer = Explorer::new(&catalog, &gateway, &SystemClock, settings);
    let record = explorer.run(opts.cycle, &topic, &mut rng)?;

    let store = LocalStore::new(&config.output.dir);
    let git = GitPublisher::new(&config.publish);
    let rules = SynthesisRules::default();
    let publish = opts.publish || config.publish.enabled;
    let plan = PersistPlan {
        preview_chars,
        write_json: opts.json || config.output.write_json,
        publisher: if publish {
            Some((&git as &dyn Publisher, &rules))
        } else {
            None
        },
    };

    match persist_run(&record, &store, &plan) {
        Ok(report) => {
            print_summary(&record, &report.transcript);
            if let Some(json) = &report.json {
                print_kv("json", &json.display().to_string());
            }
            if let Some(synthesis) = &report.synthesis {
                print_kv("published", &synthesis.title.green().to_string());
            }
            Ok(())
        }
        Err(PersistenceError::Publish { written, reason }) => {
            print_summary(&record, &written);
            println!("{} {}", "[PUBLISH FAILED]".bright_red(), reason);
            anyhow::bail!("transcript saved to {} but publishing failed", written.display())
        }
        Err(PersistenceError::Incomplete {
            written,
            path,
            reason,
        }) => {
            print_summary(&record, &written);
            println!("{} {}: {}", "[WRITE FAILED]".bright_red(), path.display(), reason);
            anyhow::bail!(
                "transcript saved to {} but {} was not written",
                written.display(),
                path.display()
            )
        }
        Err(e) => Err(e.into()),
    }
}

fn print_summary(record: &RunRecord, transcript: &Path) {
    println!("{}", HR.dimmed());
    print_kv("saved", &transcript.display().to_string().cyan().to_string());
    print_kv("elapsed", &format!("{:.2}s", record.elapsed_secs()));
    print_kv("iterations", &record.gauntlet.iterations.to_string());
    println!();
    println!("{}", "[FINAL IDEA]".bright_green());
    println!("{}", record.gauntlet.final_idea);
    println!();
    println!("{}", "[TRANSLATION]".bright_green());
    println!("{}", record.translation);
}

/// Handle topic command
pub fn topic(config: &ExplorerConfig) -> Result<()> {
    let gateway = gateway(config)?;
    let topic = generate_topic(&gateway, config.budgets.topic, config.model.timeout_secs);
    println!("{}", topic);
    Ok(())
}

/// Handle synthesize command
pub fn synthesize(config: &ExplorerConfig, file: &Path, cycle: u64, publish: bool) -> Result<()> {
    let content = fs::read_to_string(file)
        .with_context(|| format!("Failed to read transcript {}", file.display()))?;
    let synthesis = synthesize_content(&content, cycle, &SynthesisRules::default());
    print_synthesis(&synthesis);

    if publish || config.publish.enabled {
        GitPublisher::new(&config.publish).publish(&synthesis.title, &synthesis.body, file)?;
        println!();
        println!("{} {}", "[PUBLISHED]".bright_green(), synthesis.title);
    }
    Ok(())
}

fn print_synthesis(synthesis: &Synthesis) {
    let pct = (synthesis.confidence * 100.0).round() as u32;
    let confidence = if pct >= 70 {
        format!("{}%", pct).bright_green().to_string()
    } else if pct >= 40 {
        format!("{}%", pct).yellow().to_string()
    } else {
        format!("{}%", pct).bright_red().to_string()
    };

    println!("{}", synthesis.title.bold());
    println!("{}", HR.dimmed());
    print_kv("confidence", &confidence);
    println!();
    println!("{}", synthesis.body);
}

/// Handle lenses command
pub fn lenses(config: &ExplorerConfig) -> Result<()> {
    let catalog = config.load_catalog()?;
    println!(
        "{} categories, {} lenses",
        catalog.len(),
        catalog.lens_count()
    );
    for category in catalog.categories() {
        println!();
        println!("{}", category.name.cyan());
        for lens in &category.lenses {
            println!("  * {}", lens);
        }
    }
    Ok(())
}

/// Handle config command
pub fn show_config(config: &ExplorerConfig) -> Result<()> {
    print!("{}", config.to_toml()?);
    Ok(())
}

/// Handle config --init
pub fn init_config(path: Option<&Path>) -> Result<()> {
    let path = match path {
        Some(path) => path.to_path_buf(),
        None => ExplorerConfig::default_path().context("Could not determine the config directory")?,
    };
    ExplorerConfig::default().save_new(&path)?;
    println!("{} {}", "[OK]".bright_green(), path.display());
    Ok(())
}
