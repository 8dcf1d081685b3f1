use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use loadorder_core::{LoadOrderSorter, PluginEntry, SorterConfig};
use std::fs;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "loadorder")]
#[command(about = "Sort and check plugin load orders against a load order template", long_about = None)]
struct Cli {
    /// Path to the load order template (defaults to $LOADORDER_TEMPLATE or lotemplate.txt)
    #[arg(long, global = true, value_name = "FILE")]
    template: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the load order in template order
    Sort {
        /// Plugin list: one name per line, or a JSON array of plugin entries
        #[arg(value_name = "LIST")]
        list: PathBuf,
    },
    /// Exit with status 1 if the load order is not in template order
    Check {
        #[arg(value_name = "LIST")]
        list: PathBuf,
    },
    /// Print the index at which a plugin should be inserted
    Insert {
        #[arg(value_name = "LIST")]
        list: PathBuf,
        plugin: String,
    },
    /// Generate the load order report
    Report {
        #[arg(value_name = "LIST")]
        list: PathBuf,
        /// Emit the report as JSON instead of text
        #[arg(long)]
        json: bool,
        /// Write the report to a file instead of stdout
        #[arg(long, value_name = "FILE")]
        output: Option<PathBuf>,
    },
    /// Show information about the template
    Info {
        /// Also list every entry with its requirements and conflicts
        #[arg(long)]
        entries: bool,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("loadorder=info,loadorder_core=info")),
        )
        .init();

    let cli = Cli::parse();
    let config = SorterConfig::resolve(cli.template)?;
    let sorter = LoadOrderSorter::from_config(&config)?;
    if !sorter.has_master_list() {
        tracing::warn!(
            path = %config.template_path.display(),
            "no load order template found; every plugin is treated as unknown"
        );
    }

    match cli.command {
        Commands::Sort { list } => {
            let entries = read_plugin_list(&list)?;
            let names = plugin_names(&entries);
            for name in sorter.sort(&names) {
                println!("{name}");
            }
        }
        Commands::Check { list } => {
            let entries = read_plugin_list(&list)?;
            let names = plugin_names(&entries);
            if sorter.is_sorted(&names) {
                println!("Load order matches the template");
            } else {
                println!("Load order does not match the template");
                std::process::exit(1);
            }
        }
        Commands::Insert { list, plugin } => {
            let entries = read_plugin_list(&list)?;
            let names = plugin_names(&entries);
            let known = sorter
                .master_list()
                .is_some_and(|masters| masters.contains(&plugin));
            if !known {
                tracing::warn!(plugin = %plugin, "plugin is not in the template; appending it");
            }
            println!("{}", sorter.insertion_index(&names, &plugin));
        }
        Commands::Report { list, json, output } => {
            let entries = read_plugin_list(&list)?;
            let report = sorter.generate_report(&entries);
            let rendered = if json {
                serde_json::to_string_pretty(&report)?
            } else {
                report.to_string()
            };

            match output {
                Some(path) => {
                    let stamped = format!(
                        "Generated {}\n{}",
                        chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
                        rendered
                    );
                    fs::write(&path, stamped)
                        .with_context(|| format!("Failed to write report: {:?}", path))?;
                    tracing::info!(path = %path.display(), "wrote load order report");
                }
                None => print!("{rendered}"),
            }
        }
        Commands::Info { entries } => match sorter.master_list() {
            Some(masters) => {
                println!("Template: {}", config.template_path.display());
                println!("Version: {}", masters.file_version());
                println!("Entries: {}", masters.len());
                println!("Duplicates: {}", masters.duplicate_count());
                println!("Fingerprint: {}", masters.fingerprint());
                if entries {
                    for (name, record) in masters.iter() {
                        println!("{:>5}  {}", record.ordinal, name);
                        for required in &record.requires {
                            println!("         requires {required}");
                        }
                        for conflict in &record.conflicts {
                            println!("         conflicts with {conflict}");
                        }
                    }
                }
            }
            None => println!("No template at {}", config.template_path.display()),
        },
    }

    Ok(())
}

/// Reads a plugin list. `.json` files hold an array of plugin entries; any
/// other file lists one active plugin per line, `#` starting a comment line.
fn read_plugin_list(path: &Path) -> Result<Vec<PluginEntry>> {
    let content =
        fs::read_to_string(path).with_context(|| format!("Failed to read plugin list: {:?}", path))?;

    if path.extension().is_some_and(|ext| ext.eq_ignore_ascii_case("json")) {
        return serde_json::from_str(&content)
            .with_context(|| format!("Invalid plugin list: {:?}", path));
    }

    Ok(content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(PluginEntry::new)
        .collect())
}

fn plugin_names(entries: &[PluginEntry]) -> Vec<&str> {
    entries.iter().map(|entry| entry.name.as_str()).collect()
}
