use std::fs::File;
use std::io::{BufRead, BufReader, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};
use log::{info, warn};
use zettabgp::models::{Bgp4MpRecord, RibRecord};
use zettabgp::parser::{Bgp4MpDecoder, ExaBgpDecoder, RibDecoder, StoredRouteUpdate};
use zettabgp::{DecodeError, Dispatcher, FeedError, ListenerError, RouteUpdate, UpdateFeed};

/// zettabgp decodes ExaBGP and MRT route updates into per-prefix records.
#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
struct Opts {
    #[clap(subcommand)]
    command: Command,

    #[clap(flatten)]
    output: OutputOpts,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Decode ExaBGP JSON lines, as written to an ExaBGP API process
    Exabgp {
        /// Input file, stdin if omitted
        #[clap(name = "FILE")]
        file_path: Option<PathBuf>,
    },
    /// Decode BGP4MP records, one JSON object per line, as dumped by an MRT reader
    Bgp4mp {
        /// Input file, stdin if omitted
        #[clap(name = "FILE")]
        file_path: Option<PathBuf>,
    },
    /// Decode TABLE_DUMP_V2 RIB records, one JSON object per line, as dumped by an MRT reader
    Rib {
        /// Input file, stdin if omitted
        #[clap(name = "FILE")]
        file_path: Option<PathBuf>,
    },
}

#[derive(Args, Debug)]
struct OutputOpts {
    /// Output as JSON objects
    #[clap(long, global = true, conflicts_with = "document")]
    json: bool,

    /// Output as stored route update documents
    #[clap(long, global = true)]
    document: bool,

    /// Stop at the first line that cannot be decoded
    #[clap(long, global = true)]
    fail_fast: bool,

    /// Print feed counters when done
    #[clap(long, global = true)]
    stats: bool,
}

#[derive(Debug, Clone, Copy)]
enum OutputFormat {
    Psv,
    Json,
    Document,
}

impl OutputFormat {
    fn render(&self, update: &RouteUpdate) -> Result<String, serde_json::Error> {
        match self {
            OutputFormat::Psv => Ok(update.to_string()),
            OutputFormat::Json => serde_json::to_string(update),
            OutputFormat::Document => serde_json::to_string(&StoredRouteUpdate::from(update)),
        }
    }
}

fn open_input(file_path: Option<&PathBuf>) -> std::io::Result<Box<dyn BufRead>> {
    match file_path {
        Some(path) => Ok(Box::new(BufReader::new(File::open(path)?))),
        None => Ok(Box::new(BufReader::new(std::io::stdin()))),
    }
}

fn printer(format: OutputFormat) -> Dispatcher {
    let mut stdout = std::io::stdout();
    let mut dispatcher = Dispatcher::new();
    dispatcher.register_fn(move |update: &RouteUpdate| -> Result<(), ListenerError> {
        let line = format.render(update)?;
        writeln!(stdout, "{}", line)?;
        Ok(())
    });
    dispatcher
}

/// Feeds every non-empty line of `reader` through `process`.
///
/// Lines that fail to decode are logged and skipped unless `fail_fast` is set. Listener failures
/// always stop the run.
fn run_lines<D, F>(
    reader: Box<dyn BufRead>,
    feed: &mut UpdateFeed<D>,
    fail_fast: bool,
    mut process: F,
) -> Result<(), Box<dyn std::error::Error>>
where
    D: zettabgp::RouteUpdateDecoder,
    F: FnMut(&mut UpdateFeed<D>, &str) -> Result<usize, FeedError>,
{
    for (index, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        match process(feed, &line) {
            Ok(_) => {}
            Err(FeedError::Decode(e)) if !fail_fast => {
                warn!("skipping line {}: {}", index + 1, e);
            }
            Err(e) => return Err(e.into()),
        }
    }
    Ok(())
}

fn decode_record<'a, T: serde::Deserialize<'a>>(line: &'a str) -> Result<T, FeedError> {
    serde_json::from_str(line)
        .map_err(DecodeError::from)
        .map_err(FeedError::from)
}

fn is_broken_pipe(e: &(dyn std::error::Error + 'static)) -> bool {
    let mut source = Some(e);
    while let Some(err) = source {
        if let Some(io_err) = err.downcast_ref::<std::io::Error>() {
            return io_err.kind() == std::io::ErrorKind::BrokenPipe;
        }
        source = err.source();
    }
    false
}

fn run(opts: Opts) -> Result<(), Box<dyn std::error::Error>> {
    let format = match (opts.output.json, opts.output.document) {
        (true, _) => OutputFormat::Json,
        (false, true) => OutputFormat::Document,
        (false, false) => OutputFormat::Psv,
    };
    let fail_fast = opts.output.fail_fast;

    let stats = match &opts.command {
        Command::Exabgp { file_path } => {
            let mut feed = UpdateFeed::new(ExaBgpDecoder, printer(format));
            run_lines(open_input(file_path.as_ref())?, &mut feed, fail_fast, |feed, line| {
                feed.process(line)
            })?;
            feed.stats()
        }
        Command::Bgp4mp { file_path } => {
            let mut feed = UpdateFeed::new(Bgp4MpDecoder, printer(format));
            run_lines(open_input(file_path.as_ref())?, &mut feed, fail_fast, |feed, line| {
                let record: Bgp4MpRecord = decode_record(line)?;
                feed.process(&record)
            })?;
            feed.stats()
        }
        Command::Rib { file_path } => {
            let mut feed = UpdateFeed::new(RibDecoder, printer(format));
            run_lines(open_input(file_path.as_ref())?, &mut feed, fail_fast, |feed, line| {
                let record: RibRecord = decode_record(line)?;
                feed.process(&record)
            })?;
            feed.stats()
        }
    };

    info!("done, {}", stats);
    if opts.output.stats {
        eprintln!("{}", stats);
    }
    Ok(())
}

fn main() -> ExitCode {
    let opts: Opts = Opts::parse();

    env_logger::init();

    match run(opts) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) if is_broken_pipe(e.as_ref()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{}", e);
            ExitCode::FAILURE
        }
    }
}
