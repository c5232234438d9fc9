use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

use orclite::io::source::read_local_file;
use orclite::reader::{open, ReaderOptions};

/// Scan a columnar file and report how many rows and batches it holds.
#[derive(Parser)]
#[command(name = "file-scan", version)]
struct Args {
    /// The file to scan.
    path: PathBuf,
}

fn main() -> ExitCode {
    env_logger::init();
    let args = Args::parse();
    match scan(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            eprintln!("Error reading file {}! {error}", args.path.display());
            ExitCode::FAILURE
        }
    }
}

fn scan(args: &Args) -> orclite::Result<()> {
    let source = read_local_file(&args.path)?;
    let mut reader = open(Box::new(source), ReaderOptions::default())?;

    let mut batch = reader.create_row_batch(1000)?;
    let mut rows: u64 = 0;
    let mut batches: u64 = 0;
    while reader.next(&mut batch)? {
        batches += 1;
        rows += batch.num_elements as u64;
    }
    println!("Rows: {rows}");
    println!("Batches: {batches}");
    Ok(())
}
