use std::{ffi::OsString, path::PathBuf, process::ExitCode};

use anyhow::Result;
use clap::Parser;
use procdump_pss::DumpMode;

#[derive(Parser, Debug)]
#[command(version, about, long_about = "Write a full-memory minidump of a process.")]
struct Args {
    #[arg(short, long, help = "Process ID to dump.")]
    pid: u32,
    #[arg(short, long, default_value = ".", help = "Dest path to save dump file.")]
    dest: PathBuf,
    #[arg(short, long, help = "File name of the dump, defaults to <pid>.dmp.")]
    filename: Option<OsString>,
    #[arg(short, long, help = "Enable if dump from snapshot.")]
    snapshot: bool,
}

impl Args {
    fn mode(&self) -> DumpMode {
        if self.snapshot {
            DumpMode::Snapshot
        } else {
            DumpMode::Live
        }
    }
}

fn main() -> Result<ExitCode> {
    env_logger::try_init()?;
    let args = Args::parse();
    log::debug!("{args:?}");

    match run(&args) {
        Ok(path) => {
            println!("[*] PID: {} -> {}", args.pid, path.display());
            Ok(ExitCode::SUCCESS)
        }
        Err(e) => {
            println!("[!] {e}");
            Ok(ExitCode::FAILURE)
        }
    }
}

#[cfg(windows)]
fn run(args: &Args) -> Result<PathBuf, procdump_pss::DumpError> {
    procdump_pss::dump(
        &procdump_pss::WindowsPlatform,
        args.mode(),
        args.pid,
        &args.dest,
        args.filename.as_deref(),
    )
}

#[cfg(not(windows))]
fn run(args: &Args) -> Result<PathBuf> {
    anyhow::bail!(
        "{:?} dumps are only supported on windows (pid {})",
        args.mode(),
        args.pid
    )
}
