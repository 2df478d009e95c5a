use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand, ValueEnum};
use rayon::prelude::*;
use walkdir::WalkDir;

use parquet_rows::logger::{log_error, set_log_file, set_log_prefix};
use parquet_rows::{FileLayout, Int96Format, ReadOptions, Row, RowWindow, open_file_with_options};

#[derive(Parser)]
#[command(
    name = "pqrows",
    version,
    about = "Print Parquet rows as path -> value records"
)]
struct Cli {
    /// Also write warnings and errors to this file.
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print every row of a file.
    Dump(DumpArgs),
    /// Print row groups and columns of one or more files.
    Inspect(InspectArgs),
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Json,
    Csv,
}

#[derive(Parser)]
struct DumpArgs {
    input: PathBuf,

    /// Output format: one JSON object per line, or CSV with a header.
    #[arg(long, value_enum, default_value_t = OutputFormat::Json)]
    format: OutputFormat,

    /// Pad rendered values to at least N characters.
    #[arg(long, default_value_t = 0)]
    width: usize,

    /// Skip leading N rows.
    #[arg(long)]
    skip: Option<u64>,

    /// Limit to at most N rows.
    #[arg(long = "max-rows")]
    max_rows: Option<u64>,

    /// Character encoding of byte-array columns.
    #[arg(long)]
    encoding: Option<String>,

    /// Render INT96 columns as timestamps.
    #[arg(long)]
    int96_timestamps: bool,
}

#[derive(Parser)]
struct InspectArgs {
    /// Input files or directories (directories are searched for *.parquet).
    #[arg(required = true)]
    inputs: Vec<PathBuf>,

    /// Emit JSON instead of human readable output.
    #[arg(long)]
    json: bool,
}

type AnyError = Box<dyn std::error::Error + Send + Sync>;

fn main() -> Result<(), AnyError> {
    let cli = Cli::parse();
    if let Some(path) = &cli.log_file {
        set_log_file(path)?;
    }

    match cli.command {
        Command::Dump(args) => run_dump(&args),
        Command::Inspect(args) => run_inspect(&args),
    }
}

fn run_dump(args: &DumpArgs) -> Result<(), AnyError> {
    let _prefix = set_log_prefix(args.input.display().to_string());

    let mut options = ReadOptions::new().with_width(args.width);
    if let Some(skip) = args.skip {
        options = options.with_skip_rows(skip);
    }
    if let Some(max_rows) = args.max_rows {
        options = options.with_max_rows(max_rows);
    }
    if let Some(label) = &args.encoding {
        options = options.with_encoding(label.as_str());
    }
    if args.int96_timestamps {
        options = options.with_int96_format(Int96Format::Timestamp);
    }

    let file = File::open(&args.input)?;
    let rows = open_file_with_options(&file, &options).inspect_err(|err| {
        log_error(&format!("cannot open: {err}"));
    })?;
    drop(file);

    let stdout = io::stdout();
    let out = BufWriter::new(stdout.lock());
    let result = match args.format {
        OutputFormat::Json => write_json(rows, out),
        OutputFormat::Csv => write_csv(rows, out),
    };
    if let Err(err) = &result {
        log_error(&err.to_string());
    }
    result
}

fn write_json<W: Write>(rows: RowWindow, mut out: W) -> Result<(), AnyError> {
    for row in rows {
        serde_json::to_writer(&mut out, &row?)?;
        out.write_all(b"\n")?;
    }
    out.flush()?;
    Ok(())
}

fn write_csv<W: Write>(rows: RowWindow, out: W) -> Result<(), AnyError> {
    let paths: Vec<String> = rows
        .get_ref()
        .layout()
        .columns
        .iter()
        .map(|column| column.path.to_string())
        .collect();
    let mut writer = csv::Writer::from_writer(out);
    writer.write_record(&paths)?;
    for row in rows {
        writer.write_record(csv_record(&paths, &row?))?;
    }
    writer.flush()?;
    Ok(())
}

fn csv_record<'a>(paths: &'a [String], row: &'a Row) -> impl Iterator<Item = &'a str> {
    paths.iter().map(|path| row.get(path).unwrap_or(""))
}

fn run_inspect(args: &InspectArgs) -> Result<(), AnyError> {
    let files = discover_inputs(&args.inputs);
    if files.is_empty() {
        return Err("no Parquet files found".into());
    }

    let reports: Vec<(PathBuf, Result<FileLayout, String>)> = files
        .into_par_iter()
        .map(|path| {
            let _prefix = set_log_prefix(path.display().to_string());
            let layout = inspect_one(&path).map_err(|err| {
                log_error(&err.to_string());
                err.to_string()
            });
            (path, layout)
        })
        .collect();

    let failures = reports.iter().filter(|(_, report)| report.is_err()).count();
    if args.json {
        print_json(&reports)?;
    } else {
        for (path, report) in &reports {
            match report {
                Ok(layout) => print_layout(path, layout),
                Err(err) => println!("{}: error: {err}", path.display()),
            }
        }
    }

    if failures > 0 {
        return Err(format!("{failures} file(s) could not be inspected").into());
    }
    Ok(())
}

fn inspect_one(path: &Path) -> Result<FileLayout, AnyError> {
    let file = File::open(path)?;
    let rows = open_file_with_options(&file, &ReadOptions::new())?;
    Ok(rows.get_ref().layout().clone())
}

fn print_json(reports: &[(PathBuf, Result<FileLayout, String>)]) -> Result<(), AnyError> {
    #[derive(serde::Serialize)]
    struct InspectJson<'a> {
        path: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        layout: Option<&'a FileLayout>,
        #[serde(skip_serializing_if = "Option::is_none")]
        error: Option<&'a str>,
    }

    let payload: Vec<InspectJson<'_>> = reports
        .iter()
        .map(|(path, report)| InspectJson {
            path: path.display().to_string(),
            layout: report.as_ref().ok(),
            error: report.as_ref().err().map(String::as_str),
        })
        .collect();
    serde_json::to_writer_pretty(io::stdout(), &payload)?;
    println!();
    Ok(())
}

fn print_layout(path: &Path, layout: &FileLayout) {
    println!(
        "{}  Row groups: {}  Rows: {}  Columns: {}",
        path.display(),
        layout.row_group_count(),
        layout.declared_rows(),
        layout.column_count()
    );
    for group in &layout.row_groups {
        println!("  group {idx:>3}: {rows} rows", idx = group.index, rows = group.num_rows);
    }
    for column in &layout.columns {
        println!(
            "  [{idx:>3}] {path:<32}  {kind:<20}  def={def} rep={rep}",
            idx = column.index,
            path = column.path,
            kind = column.kind.as_str(),
            def = column.max_def_level,
            rep = column.max_rep_level,
        );
    }
}

fn discover_inputs(inputs: &[PathBuf]) -> Vec<PathBuf> {
    let mut files = Vec::new();
    for input in inputs {
        if input.is_dir() {
            let mut found: Vec<PathBuf> = WalkDir::new(input)
                .into_iter()
                .filter_map(Result::ok)
                .filter(|entry| entry.file_type().is_file())
                .map(walkdir::DirEntry::into_path)
                .filter(|path| {
                    path.extension()
                        .is_some_and(|ext| ext.eq_ignore_ascii_case("parquet"))
                })
                .collect();
            found.sort();
            files.extend(found);
        } else {
            files.push(input.clone());
        }
    }
    files
}
