use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use inifile::IniFile;
use inifile::logging::{self, LogConfig};
use tracing::Level;

/// Inspect and normalize INI files.
#[derive(Parser, Debug)]
#[command(name = "inifile", version, about, long_about = None)]
struct Args {
    /// INI file to read; `BasedOn` inheritance is applied.
    #[arg(value_name = "FILE")]
    path: PathBuf,

    /// Only print this section.
    #[arg(short, long)]
    section: Option<String>,

    /// Only print this key of `--section`.
    #[arg(short, long, requires = "section")]
    key: Option<String>,

    /// Write the merged file in canonical form to this path.
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Emit debug diagnostics.
    #[arg(short, long)]
    verbose: bool,

    /// Send diagnostics to this file instead of standard error.
    #[arg(long, value_name = "FILE")]
    log_file: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    logging::init_tracing(&LogConfig {
        console: true,
        file_path: args.log_file.clone(),
        level: if args.verbose { Level::DEBUG } else { Level::WARN },
    })?;

    let ini = IniFile::from_path(&args.path)
        .with_context(|| format!("failed to parse {}", args.path.display()))?;

    match (&args.section, &args.key) {
        (Some(section), Some(key)) => {
            let value = ini
                .try_get_string(section, key)
                .with_context(|| format!("key {key:?} not found in section [{section}]"))?;
            println!("{value}");
        }
        (Some(section), None) => {
            let section = ini
                .section(section)
                .with_context(|| format!("section [{section}] not found"))?;
            print_section(section);
        }
        (None, _) => ini.sections().for_each(print_section),
    }

    if let Some(output) = &args.output {
        ini.write_to_path(output)
            .with_context(|| format!("failed to write {}", output.display()))?;
    }

    Ok(())
}

fn print_section(section: &inifile::Section) {
    println!("[{}]", section.name());

    for (key, value) in section.entries() {
        println!("{key} = \"{value}\"");
    }

    println!();
}
