use std::error::Error as StdError;
use std::fmt::Display;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use clap::{ArgGroup, Args, Parser, Subcommand};
use log::info;

use rangex::io::read_header;
use rangex::{
    load_binary, load_entries, load_index, parse_interval, parse_point, peek_data_type,
    save_entries, time_build, BenchConfig, DataType, DelimitedOptions, GeneratorConfig,
    InputKind, QueryBench, RangeEntry, RangeFile, RangeIndex, RangexConfig, SpanDistribution,
    StoredBound,
};

type CliResult<T = ()> = Result<T, Box<dyn StdError>>;

/// Run `$body` with `$T` bound to the Rust type behind a [`DataType`]
macro_rules! with_bound {
    ($dtype:expr, $T:ident => $body:expr) => {
        match $dtype {
            DataType::F32 => {
                type $T = f32;
                $body
            }
            DataType::F64 => {
                type $T = f64;
                $body
            }
            DataType::I32 => {
                type $T = i32;
                $body
            }
            DataType::I64 => {
                type $T = i64;
                $body
            }
            DataType::U32 => {
                type $T = u32;
                $body
            }
            DataType::U64 => {
                type $T = u64;
                $body
            }
        }
    };
}

/// Load `$path` as an index and run `$body` with it bound to `$index`
///
/// Binary files keep their `u64` values; text formats yield `String` values.
macro_rules! with_index {
    ($path:expr, $dtype:expr, $options:expr, $index:ident => $body:expr) => {
        with_bound!($dtype, B => {
            if InputKind::from_path($path)?.is_binary() {
                let $index = load_binary::<B, _>($path)?;
                $body
            } else {
                let $index = load_index::<B, _>($path, $options)?;
                $body
            }
        })
    };
}

#[derive(Parser)]
#[command(author, version, long_about = None)]
#[command(about = "Rangex - query numeric ranges through a sorted-start index")]
struct Cli {
    #[command(flatten)]
    log: LogOptions,

    /// JSON configuration file; command line flags take precedence
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

/// Common logging options
#[derive(Args, Debug)]
struct LogOptions {
    /// Increase log verbosity. Pass multiple times for more log output.
    ///
    /// By default only errors are shown. `-v` adds warnings, `-vv` info,
    /// `-vvv` debug and `-vvvv` trace.
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count, global = true)]
    verbosity: u8,

    /// Set fancier logging filters, in `env_logger` syntax
    #[arg(long = "log-filter", env = "RANGEX_LOG", global = true)]
    log_filter: Option<String>,
}

impl LogOptions {
    /// Install the global logger
    fn init_logger(&self) {
        env_logger::Builder::new()
            .filter_level(self.verbosity_level())
            .parse_filters(self.log_filter.as_deref().unwrap_or_default())
            .init();
    }

    fn verbosity_level(&self) -> log::LevelFilter {
        match self.verbosity {
            0 => log::LevelFilter::Error,
            1 => log::LevelFilter::Warn,
            2 => log::LevelFilter::Info,
            3 => log::LevelFilter::Debug,
            _ => log::LevelFilter::Trace,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a synthetic range dataset
    Generate {
        /// Output file (.rngx, .csv, .tsv, .txt or .jsonl)
        #[arg(long, short)]
        out: PathBuf,

        /// Number of ranges
        #[arg(long)]
        count: Option<usize>,

        /// Smallest span
        #[arg(long)]
        min_span: Option<f64>,

        /// Largest span
        #[arg(long)]
        max_span: Option<f64>,

        /// Start domain (format: from:to)
        #[arg(long)]
        domain: Option<String>,

        /// RNG seed
        #[arg(long)]
        seed: Option<u64>,

        /// Fraction of ranges drawn from a long tail up to --long-max-span
        #[arg(long, requires = "long_max_span")]
        long_tail: Option<f64>,

        /// Upper span limit of the long tail
        #[arg(long)]
        long_max_span: Option<f64>,

        /// Every range gets exactly --max-span
        #[arg(long, conflicts_with = "long_tail")]
        fixed: bool,

        /// Bound type
        #[arg(long, default_value = "f64", value_parser = parse_data_type)]
        dtype: DataType,

        /// Write ranges in ascending start order
        #[arg(long)]
        sorted: bool,
    },
    /// Show dataset summary
    Info {
        /// Dataset file
        file: PathBuf,

        /// Bound type for text formats
        #[arg(long, default_value = "f64", value_parser = parse_data_type)]
        dtype: DataType,
    },
    /// Query ranges overlapping an interval or containing a point
    #[command(group(ArgGroup::new("target").required(true).args(["range", "point"])))]
    Query {
        /// Dataset file
        file: PathBuf,

        /// Overlap query (format: from:to)
        #[arg(long)]
        range: Option<String>,

        /// Containment query
        #[arg(long)]
        point: Option<String>,

        /// Print at most this many matches
        #[arg(long)]
        limit: Option<usize>,

        /// Only print the number of matches
        #[arg(long)]
        count: bool,

        /// Bound type for text formats
        #[arg(long, default_value = "f64", value_parser = parse_data_type)]
        dtype: DataType,
    },
    /// Measure query throughput on a dataset
    Bench {
        /// Dataset file
        file: PathBuf,

        /// Number of queries
        #[arg(long)]
        queries: Option<usize>,

        /// Width of range queries
        #[arg(long)]
        width: Option<f64>,

        /// Fraction of point queries
        #[arg(long)]
        point_fraction: Option<f64>,

        /// RNG seed for query sampling
        #[arg(long)]
        seed: Option<u64>,

        /// Run queries on all cores
        #[arg(long)]
        parallel: bool,

        /// Check every result against a linear scan
        #[arg(long)]
        verify: bool,

        /// Print the report as JSON
        #[arg(long)]
        json: bool,

        /// Bound type for text formats
        #[arg(long, default_value = "f64", value_parser = parse_data_type)]
        dtype: DataType,
    },
    /// Convert a dataset between formats
    Convert {
        /// Input file
        input: PathBuf,

        /// Output file
        output: PathBuf,

        /// Bound type for text formats
        #[arg(long, default_value = "f64", value_parser = parse_data_type)]
        dtype: DataType,
    },
}

fn parse_data_type(text: &str) -> Result<DataType, String> {
    DataType::from_name(&text.to_ascii_lowercase())
        .ok_or_else(|| format!("unknown data type {text:?}, expected one of f32, f64, i32, i64, u32, u64"))
}

fn main() -> CliResult {
    let cli = Cli::parse();
    cli.log.init_logger();
    let start_time = Instant::now();

    let config = match &cli.config {
        Some(path) => RangexConfig::from_path(path)?,
        None => RangexConfig::default(),
    };
    let options = config.delimited;

    match cli.command {
        Commands::Generate {
            out,
            count,
            min_span,
            max_span,
            domain,
            seed,
            long_tail,
            long_max_span,
            fixed,
            dtype,
            sorted,
        } => {
            let mut generator = config.generator;
            if let Some(count) = count {
                generator.count = count;
            }
            if let Some(min_span) = min_span {
                generator.min_span = min_span;
            }
            if let Some(max_span) = max_span {
                generator.max_span = max_span;
            }
            if let Some(domain) = domain {
                let (from, to) = parse_interval::<f64>(&domain).map_err(rangex::Error::from)?;
                generator = generator.with_domain(from, to);
            }
            if let Some(seed) = seed {
                generator.seed = seed;
            }
            if let (Some(long_fraction), Some(long_max_span)) = (long_tail, long_max_span) {
                generator.distribution = SpanDistribution::LongTail {
                    long_fraction,
                    long_max_span,
                };
            } else if fixed {
                generator.distribution = SpanDistribution::Fixed;
            }
            with_bound!(dtype, T => handle_generate::<T>(&out, &generator, sorted, &options))?;
        }
        Commands::Info { file, dtype } => {
            let dtype = resolve_data_type(&file, dtype)?;
            with_index!(&file, dtype, &options, index => handle_info(&file, &index))?;
        }
        Commands::Query {
            file,
            range,
            point,
            limit,
            count,
            dtype,
        } => {
            let dtype = resolve_data_type(&file, dtype)?;
            with_index!(&file, dtype, &options, index => {
                handle_query(&index, range.as_deref(), point.as_deref(), limit, count)
            })?;
        }
        Commands::Bench {
            file,
            queries,
            width,
            point_fraction,
            seed,
            parallel,
            verify,
            json,
            dtype,
        } => {
            let mut bench = config.bench;
            if let Some(queries) = queries {
                bench.queries = queries;
            }
            if let Some(width) = width {
                bench.query_width = width;
            }
            if let Some(point_fraction) = point_fraction {
                bench.point_fraction = point_fraction;
            }
            if let Some(seed) = seed {
                bench.seed = seed;
            }
            bench.parallel |= parallel;
            bench.verify |= verify;
            bench.validate()?;

            let dtype = resolve_data_type(&file, dtype)?;
            with_bound!(dtype, T => {
                let entries = if InputKind::from_path(&file)?.is_binary() {
                    RangeFile::<T>::open(&file)?
                        .entries()
                        .map(|entry| entry.map_value(|value| value.to_string()))
                        .collect()
                } else {
                    load_entries::<T, _>(&file, &options)?
                };
                handle_bench::<T>(entries, bench, json)
            })?;
        }
        Commands::Convert {
            input,
            output,
            dtype,
        } => {
            let dtype = resolve_data_type(&input, dtype)?;
            with_bound!(dtype, T => {
                let entries = load_entries::<T, _>(&input, &options)?;
                save_entries(&output, &entries, &options)?;
                println!(
                    "Converted {} ranges from {} to {}",
                    entries.len(),
                    input.display(),
                    output.display()
                );
            });
        }
    }

    info!("completed in {:.2?}", start_time.elapsed());
    Ok(())
}

/// Binary files carry their own data type; text files use `--dtype`
fn resolve_data_type(path: &Path, requested: DataType) -> CliResult<DataType> {
    if InputKind::from_path(path)?.is_binary() {
        let found = peek_data_type(path)?;
        if found != requested {
            info!("{} holds {found} bounds", path.display());
        }
        Ok(found)
    } else {
        Ok(requested)
    }
}

fn handle_generate<T: StoredBound>(
    out: &Path,
    config: &GeneratorConfig,
    sorted: bool,
    options: &DelimitedOptions,
) -> CliResult {
    let started = Instant::now();
    let entries = rangex::generate::<T>(config)?;
    let count = entries.len();

    if InputKind::from_path(out)?.is_binary() {
        if sorted {
            RangeFile::write_index(out, &RangeIndex::build(entries))?;
        } else {
            RangeFile::write(out, &entries)?;
        }
    } else {
        let entries = if sorted {
            RangeIndex::build(entries).into_entries()
        } else {
            entries
        };
        let entries: Vec<RangeEntry<T, String>> = entries
            .into_iter()
            .map(|entry| entry.map_value(|value| value.to_string()))
            .collect();
        save_entries(out, &entries, options)?;
    }

    println!(
        "Generated {count} {} ranges into {} in {:.2?}",
        T::data_type(),
        out.display(),
        started.elapsed()
    );
    Ok(())
}

fn handle_info<T: StoredBound, V>(path: &Path, index: &RangeIndex<T, V>) -> CliResult {
    let kind = InputKind::from_path(path)?;
    println!("File:        {}", path.display());
    match kind {
        InputKind::Binary => {
            let header = read_header(path)?;
            println!("Format:      rngx v{}", header.version);
            println!("Sorted:      {}", header.is_sorted());
            println!("Values:      {}", header.has_values());
        }
        InputKind::Delimited(delimiter) => println!("Format:      delimited ({delimiter:?})"),
        InputKind::JsonLines => println!("Format:      JSON lines"),
    }
    println!("Data type:   {}", T::data_type());
    println!("Entries:     {}", index.count());
    if !index.is_empty() {
        println!("Lower bound: {}", index.lower_bound());
        println!("Upper bound: {}", index.upper_bound());
        println!("Max span:    {}", index.max_span());
        let malformed = index.values().filter(|entry| !entry.is_well_formed()).count();
        if malformed > 0 {
            println!("Malformed:   {malformed} (start > end)");
        }
    }
    Ok(())
}

fn handle_query<T: StoredBound, V: Display>(
    index: &RangeIndex<T, V>,
    range: Option<&str>,
    point: Option<&str>,
    limit: Option<usize>,
    count_only: bool,
) -> CliResult {
    let limit = limit.unwrap_or(usize::MAX);
    let (total, shown) = match (range, point) {
        (Some(range), _) => {
            let (from, to) = parse_interval::<T>(range).map_err(rangex::Error::from)?;
            let total = index.count_range(from, to);
            if !count_only {
                for entry in index.overlapping(from, to).take(limit) {
                    println!("{}\t{}\t{}", entry.start, entry.end, entry.value);
                }
            }
            (total, total.min(limit))
        }
        (None, Some(point)) => {
            let point = parse_point::<T>(point).map_err(rangex::Error::from)?;
            let total = index.count_point(point);
            if !count_only {
                for entry in index.containing(point).take(limit) {
                    println!("{}\t{}\t{}", entry.start, entry.end, entry.value);
                }
            }
            (total, total.min(limit))
        }
        (None, None) => return Err("either --range or --point is required".into()),
    };

    if count_only {
        println!("{total}");
    } else if shown < total {
        info!("showing {shown} of {total} matches");
    }
    Ok(())
}

fn handle_bench<T: StoredBound>(
    entries: Vec<RangeEntry<T, String>>,
    config: BenchConfig,
    json: bool,
) -> CliResult {
    let (index, build_time): (RangeIndex<T, String>, Duration) = time_build(entries);
    let report = QueryBench::new(&index, config).run();

    if json {
        let mut value = serde_json::to_value(&report)?;
        value["build_secs"] = build_time.as_secs_f64().into();
        println!("{}", serde_json::to_string_pretty(&value)?);
    } else {
        println!("build time:     {build_time:.2?}");
        println!("{report}");
    }
    Ok(())
}
