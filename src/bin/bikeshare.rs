use anyhow::{Context, Result};
use bikeshare_rs::analysis::Analysis;
use bikeshare_rs::paginate::{self, PAGE_SIZE};
use bikeshare_rs::present::Presenter;
use bikeshare_rs::{
    City, DayFilter, DayOfWeek, FilterSpec, Month, MonthFilter, Registry, analyze, storage,
};
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::fmt::Display;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "bikeshare",
    version,
    about = "Explore & summarize US bikeshare trip data"
)]
struct Cli {
    /// Directory holding chicago.csv, new_york_city.csv and washington.csv.
    #[arg(long, global = true, env = "BIKESHARE_DATA_DIR", default_value = ".")]
    data_dir: PathBuf,
    /// Locale for number formatting (en, de, fr, es, it, pt, nl).
    #[arg(long, global = true, default_value = "en")]
    locale: String,
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Interactive session: choose filters, read the stats, page through raw trips.
    Explore,
    /// Print statistics once for the given filters (and optionally save them).
    Stats(StatsArgs),
}

#[derive(ValueEnum, Clone, Debug)]
enum OutFormat {
    Csv,
    Json,
}

#[derive(Args, Debug)]
struct StatsArgs {
    /// City to analyze: chicago, "new york" or washington.
    #[arg(short, long)]
    city: String,
    /// Month to filter by (january..june) or "all".
    #[arg(short, long, default_value = "all")]
    month: String,
    /// Day of week to filter by (monday..sunday) or "all".
    #[arg(short, long, default_value = "all")]
    day: String,
    /// Print the report as JSON instead of text.
    #[arg(long, default_value_t = false)]
    json: bool,
    /// Also print this many pages of raw trips (5 per page).
    #[arg(long, default_value_t = 0)]
    raw_pages: usize,
    /// Save to file: the report as JSON, or the filtered trips as CSV.
    #[arg(long)]
    out: Option<PathBuf>,
    /// Output format (csv or json). If omitted, inferred from --out extension.
    #[arg(long, value_enum)]
    format: Option<OutFormat>,
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    let registry = Registry::new(&cli.data_dir);
    let presenter = Presenter::new(&cli.locale);
    match cli.cmd {
        Command::Explore => {
            let stdin = io::stdin();
            let stdout = io::stdout();
            Session::new(stdin.lock(), stdout.lock(), registry, presenter).run()
        }
        Command::Stats(args) => cmd_stats(&registry, &presenter, args),
    }
}

fn cmd_stats(registry: &Registry, presenter: &Presenter, args: StatsArgs) -> Result<()> {
    let spec = FilterSpec::parse(&args.city, &args.month, &args.day)?;
    let analysis = analyze(registry, &spec)?;

    let stdout = io::stdout();
    let mut out = stdout.lock();
    if args.json {
        serde_json::to_writer_pretty(&mut out, &analysis.report)?;
        writeln!(out)?;
    } else {
        presenter.write_report(&mut out, &analysis.report)?;
        let schema = analysis.trips.schema();
        for (i, page) in paginate::pages(&analysis.trips)
            .take(args.raw_pages)
            .enumerate()
        {
            presenter.write_page(&mut out, page, i * PAGE_SIZE, schema)?;
        }
    }

    if let Some(path) = args.out.as_ref() {
        let fmt = match args.format {
            Some(OutFormat::Csv) => "csv",
            Some(OutFormat::Json) => "json",
            None => path.extension().and_then(|e| e.to_str()).unwrap_or("json"),
        }
        .to_ascii_lowercase();
        match fmt.as_str() {
            "csv" => {
                storage::save_csv(&analysis.trips, path)?;
                eprintln!("Saved {} trips to {}", analysis.trips.len(), path.display());
            }
            "json" => {
                storage::save_json(&analysis.report, path)?;
                eprintln!("Saved report to {}", path.display());
            }
            other => anyhow::bail!("unsupported format: {}", other),
        }
    }
    Ok(())
}

/// Prompt loop over any line-oriented input, so it can be driven by a pipe.
struct Session<R, W> {
    input: R,
    out: W,
    registry: Registry,
    presenter: Presenter,
}

impl<R: BufRead, W: Write> Session<R, W> {
    fn new(input: R, out: W, registry: Registry, presenter: Presenter) -> Self {
        Self {
            input,
            out,
            registry,
            presenter,
        }
    }

    /// Runs until the user declines to restart or input ends.
    fn run(&mut self) -> Result<()> {
        writeln!(self.out, "Hello! Let's explore some US bikeshare data!")?;
        loop {
            let Some(spec) = self.ask_filters()? else {
                return Ok(());
            };
            match analyze(&self.registry, &spec) {
                Ok(analysis) => {
                    self.presenter.write_report(&mut self.out, &analysis.report)?;
                    if !self.page_records(&analysis)? {
                        return Ok(());
                    }
                }
                Err(e) => {
                    log::error!("analysis failed: {e}");
                    writeln!(self.out, "Could not load data: {e}")?;
                }
            }
            let restart = self.ask("\nWould you like to restart? Enter yes or no.", |s| {
                Ok::<_, String>(s.eq_ignore_ascii_case("yes"))
            })?;
            if restart != Some(true) {
                return Ok(());
            }
        }
    }

    fn ask_filters(&mut self) -> Result<Option<FilterSpec>> {
        let cities = or_list(&City::ALL.map(|c| c.to_string()));
        let Some(city) = self.ask(
            &format!("Would you like to see data for {cities}?"),
            City::from_key,
        )?
        else {
            return Ok(None);
        };

        let months = Month::ALL.map(|m| capitalize(m.name())).join(", ");
        let Some(month) = self.ask(
            &format!("Which month do you like to filter the data? {months} or for All?"),
            |s| s.parse::<MonthFilter>(),
        )?
        else {
            return Ok(None);
        };

        let days = DayOfWeek::ALL.map(|d| d.name()).join(", ");
        let Some(day) = self.ask(
            &format!("Which day do you like to filter the data? {days} or for All?"),
            |s| s.parse::<DayFilter>(),
        )?
        else {
            return Ok(None);
        };

        writeln!(self.out, "----------------------------------------")?;
        Ok(Some(FilterSpec::new(city, month, day)))
    }

    /// Shows pages until the user says no. Returns false if input ended.
    fn page_records(&mut self, analysis: &Analysis) -> Result<bool> {
        let schema = analysis.trips.schema();
        let mut offset = 0;
        loop {
            let answer = self.ask(
                &format!("Do you want to see {PAGE_SIZE} individual records?"),
                parse_yes_no,
            )?;
            match answer {
                None => return Ok(false),
                Some(false) => return Ok(true),
                Some(true) => {
                    let page = paginate::page(&analysis.trips, offset);
                    if page.is_empty() {
                        writeln!(self.out, "No more records.")?;
                        return Ok(true);
                    }
                    self.presenter
                        .write_page(&mut self.out, page, offset, schema)?;
                    offset += page.len();
                }
            }
        }
    }

    /// Ask until `parse` accepts the answer. `None` once input is exhausted.
    fn ask<T, E: Display>(
        &mut self,
        question: &str,
        parse: impl Fn(&str) -> std::result::Result<T, E>,
    ) -> Result<Option<T>> {
        loop {
            writeln!(self.out, "{question}")?;
            self.out.flush()?;
            let mut line = String::new();
            if self.input.read_line(&mut line).context("reading input")? == 0 {
                return Ok(None);
            }
            match parse(line.trim()) {
                Ok(v) => return Ok(Some(v)),
                Err(e) => writeln!(self.out, "Sorry, not an appropriate choice. ({e})")?,
            }
        }
    }
}

/// `a, b or c`
fn or_list(items: &[String]) -> String {
    match items {
        [] => String::new(),
        [only] => only.clone(),
        [init @ .., last] => format!("{} or {last}", init.join(", ")),
    }
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn parse_yes_no(s: &str) -> std::result::Result<bool, &'static str> {
    match s.to_lowercase().as_str() {
        "yes" | "y" => Ok(true),
        "no" | "n" => Ok(false),
        _ => Err("please answer yes or no"),
    }
}
