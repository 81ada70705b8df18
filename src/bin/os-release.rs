//! Command-line tool for inspecting os-release files.
//!
//! By default this reads the os-release file of the running system.  `--root` looks in a
//! mounted image or sysroot instead, and `--file` reads one specific file.

use std::{
    path::{Path, PathBuf},
    process::ExitCode,
};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};

use osrel::OsRelease;

/// os-release
#[derive(Debug, Parser)]
#[clap(name = "os-release", version)]
pub struct App {
    /// Read this file instead of the standard locations
    #[clap(long, group = "source")]
    file: Option<PathBuf>,
    /// Look for the standard locations under this root directory
    #[clap(long, group = "source")]
    root: Option<PathBuf>,

    #[clap(subcommand)]
    cmd: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Prints every field as KEY=value
    Show,
    /// Prints the value of a single field, like PRETTY_NAME
    Get { key: String },
    /// Succeeds if the ID or ID_LIKE fields contain the given id
    IsLike { id: String },
    /// Checks that each of the given files parses
    Check {
        #[clap(required = true)]
        files: Vec<PathBuf>,
    },
}

fn load(args: &App) -> Result<OsRelease> {
    let osrel = if let Some(path) = &args.file {
        osrel::read(path)
    } else if let Some(root) = &args.root {
        osrel::current_in(root)
    } else {
        osrel::current()
    };
    Ok(osrel?)
}

fn check(path: &Path) -> Result<String> {
    let osrel = osrel::read(path).with_context(|| format!("checking {path:?}"))?;
    Ok(osrel.pretty_name().to_string())
}

fn main() -> Result<ExitCode> {
    env_logger::init();

    let args = App::parse();

    match &args.cmd {
        Command::Show => {
            for (key, value) in load(&args)?.entries() {
                println!("{key}={value}");
            }
        }
        Command::Get { key } => {
            let osrel = load(&args)?;
            let Some(value) = osrel.get(key) else {
                bail!("{key} is not set");
            };
            println!("{value}");
        }
        Command::IsLike { id } => {
            if !load(&args)?.is_like(id) {
                return Ok(ExitCode::FAILURE);
            }
        }
        Command::Check { files } => {
            let mut failed = false;
            for path in files {
                match check(path) {
                    Ok(pretty_name) => println!("{}: {pretty_name}", path.display()),
                    Err(err) => {
                        eprintln!("{err:#}");
                        failed = true;
                    }
                }
            }
            if failed {
                return Ok(ExitCode::FAILURE);
            }
        }
    }

    Ok(ExitCode::SUCCESS)
}
