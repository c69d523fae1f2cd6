use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

use clap::Parser;

use roster::record::parse_date;
use roster::session::{SearchPath, SearchReport, Shared, Timed};
use roster::{Config, Error, Field, List, Result, Session};

#[derive(Parser, Debug)]
#[command(name = "roster")]
#[command(version)]
#[command(about = "Load customer records from CSV, sort them and search them")]
struct Args {
    /// CSV file to load before the menu starts
    #[arg(long, value_name = "FILE")]
    csv: Option<PathBuf>,

    /// Records shown after each sort
    #[arg(long, value_name = "N", default_value_t = Config::default().preview)]
    preview: usize,

    /// Load the CSV (default sample.csv), print the first records by id and exit
    #[arg(long)]
    test: bool,
}

fn main() {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .try_init()
        .ok();

    let config = Config { csv_path: args.csv, preview: args.preview, ..Config::default() };

    let outcome = if args.test {
        smoke_test(config)
    } else {
        let stdin = io::stdin();
        let mut menu = Menu::new(stdin.lock(), io::stdout().lock(), config);
        menu.run()
    };

    if let Err(e) = outcome {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn smoke_test(config: Config) -> Result<()> {
    let path = config.csv_path.clone().unwrap_or_else(|| PathBuf::from("sample.csv"));
    if !path.exists() {
        println!("{} not found; run without --test for the menu", path.display());
        return Ok(());
    }
    let mut session = Session::open(&path, config)?;
    let stats = session.stats();
    println!(
        "Loaded {} records (dates {} to {})",
        stats.count,
        show_date(stats.min_date),
        show_date(stats.max_date)
    );
    session.sort_default(Field::CustomerId);
    println!("First 3 by {}:", Field::CustomerId);
    for record in session.first_n(Some(3)) {
        println!("{}", record);
    }
    return Ok(());
}

fn show_date(date: Option<chrono::NaiveDate>) -> String {
    return match date {
        Some(d) => d.format("%Y-%m-%d").to_string(),
        None => "-".to_string(),
    };
}

struct Menu<R, W> {
    input: R,
    out: W,
    config: Config,
    session: Option<Session>,
}

impl<R: BufRead, W: Write> Menu<R, W> {
    fn new(input: R, out: W, config: Config) -> Self {
        return Menu { input, out, config, session: None };
    }

    fn run(&mut self) -> Result<()> {
        if let Some(path) = self.config.csv_path.clone() {
            self.load(&path)?;
        } else if self.config.default_csv.exists() {
            let default_csv = self.config.default_csv.clone();
            let answer = self.prompt(&format!("Found '{}'. Load it now? (y/n): ", default_csv.display()))?;
            if answer.as_deref().is_some_and(|a| a.eq_ignore_ascii_case("y")) {
                self.load(&default_csv)?;
            }
        }

        loop {
            self.print_menu()?;
            let Some(choice) = self.prompt("Select an option: ")? else {
                return Ok(());
            };
            match choice.as_str() {
                "0" => {
                    writeln!(self.out, "Bye")?;
                    return Ok(());
                }
                "9" => {
                    if let Some(path) = self.prompt("CSV path: ")? {
                        self.load(Path::new(&path))?;
                    }
                }
                "1" | "2" | "3" | "4" | "5" | "6" | "7" | "8" => {
                    if let Err(e) = self.dispatch(&choice) {
                        match e {
                            Error::Console(_) => return Err(e),
                            other => writeln!(self.out, "{}", other)?,
                        }
                    }
                }
                _ => writeln!(self.out, "Invalid option")?,
            }
        }
    }

    fn print_menu(&mut self) -> Result<()> {
        writeln!(self.out)?;
        writeln!(self.out, "Customer records")?;
        writeln!(self.out, "1. Sort by Customer Id")?;
        writeln!(self.out, "2. Sort by First Name")?;
        writeln!(self.out, "3. Sort by Subscription Date")?;
        writeln!(self.out, "4. Sort by Country")?;
        writeln!(self.out, "5. Show the first n records, or all of them")?;
        writeln!(self.out, "6. Search by name, company, country or subscription date range")?;
        writeln!(self.out, "7. Statistics")?;
        writeln!(self.out, "8. Show the tree level by level")?;
        writeln!(self.out, "9. Load CSV")?;
        writeln!(self.out, "0. Exit")?;
        return Ok(());
    }

    /// Write a prompt and read one trimmed line. `None` on end of input.
    fn prompt(&mut self, text: &str) -> Result<Option<String>> {
        write!(self.out, "{}", text)?;
        self.out.flush()?;
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        return Ok(Some(line.trim().to_string()));
    }

    fn load(&mut self, path: &Path) -> Result<()> {
        match Session::open(path, self.config.clone()) {
            Ok(session) => {
                let stats = session.stats();
                writeln!(
                    self.out,
                    "Loaded {} records. Earliest date: {} latest: {}",
                    stats.count,
                    show_date(stats.min_date),
                    show_date(stats.max_date)
                )?;
                // Indices and the last sort belong to the old session.
                self.session = Some(session);
            }
            Err(Error::NotFound(path)) => {
                writeln!(self.out, "File not found: {}", path.display())?;
            }
            Err(e) => return Err(e),
        }
        return Ok(());
    }

    fn dispatch(&mut self, choice: &str) -> Result<()> {
        if self.session.is_none() {
            writeln!(self.out, "Load a CSV first (option 9)")?;
            return Ok(());
        }
        return match choice {
            "1" => self.sort(Field::CustomerId),
            "2" => self.sort(Field::FirstName),
            "3" => self.sort(Field::SubscriptionDate),
            "4" => self.sort(Field::Country),
            "5" => self.show_records(),
            "6" => self.search(),
            "7" => self.statistics(),
            _ => self.levels(),
        };
    }

    fn session(&mut self) -> Result<&mut Session> {
        return self.session.as_mut().ok_or(Error::NotLoaded);
    }

    fn sort(&mut self, field: Field) -> Result<()> {
        let preview = self.config.preview;
        let session = self.session.as_mut().ok_or(Error::NotLoaded)?;
        let report = session.sort_default(field);
        let shown: Vec<String> = session.first_n(Some(preview)).map(|r| r.to_string()).collect();

        writeln!(
            self.out,
            "Sorted by {} ({}). Records: {} in {:.6}s",
            report.field,
            report.algorithm,
            report.count,
            report.elapsed.as_secs_f64()
        )?;
        writeln!(self.out, "\nFirst records after sorting:")?;
        for line in shown {
            writeln!(self.out, "{}", line)?;
        }
        return Ok(());
    }

    fn show_records(&mut self) -> Result<()> {
        let answer = self.prompt("Number of records, or 'all': ")?.unwrap_or_default();
        let n = match answer.to_lowercase().as_str() {
            "" | "all" | "a" => None,
            text => match text.parse::<usize>() {
                Ok(0) => None,
                Ok(n) => Some(n),
                Err(_) => {
                    writeln!(self.out, "Invalid number, showing all")?;
                    None
                }
            },
        };
        let session = self.session.as_ref().ok_or(Error::NotLoaded)?;
        for record in session.first_n(n) {
            writeln!(self.out, "{}", record)?;
        }
        return Ok(());
    }

    fn search(&mut self) -> Result<()> {
        let choice = self
            .prompt("Search by (1) first name (2) last name (3) company (4) country (5) date range: ")?
            .unwrap_or_default();
        let field = match choice.as_str() {
            "1" => Field::FirstName,
            "2" => Field::LastName,
            "3" => Field::Company,
            "4" => Field::Country,
            "5" => return self.search_dates(),
            _ => {
                writeln!(self.out, "Invalid option")?;
                return Ok(());
            }
        };
        let value = self.prompt(&format!("Value for {}: ", field))?.unwrap_or_default();

        if !self.session()?.has_index(field) {
            let answer = self.prompt(&format!("Build an index on {} to speed up searches? (y/n): ", field))?;
            if answer.as_deref().is_some_and(|a| a.eq_ignore_ascii_case("y")) {
                let distinct = self.session()?.build_index(field).distinct_keys();
                writeln!(self.out, "Index built ({} distinct keys).", distinct)?;
            }
        }

        let session = self.session()?;
        let report = session.search_field(field, &value)?;
        let stack = session.search_stack(field, &value)?;
        let queue = session.search_queue(field, &value)?;
        self.print_report(&report)?;
        self.print_matches("stack", &stack)?;
        self.print_matches("queue", &queue)?;
        return Ok(());
    }

    fn search_dates(&mut self) -> Result<()> {
        let start = self.prompt("Start date (YYYY-MM-DD): ")?.unwrap_or_default();
        let end = self.prompt("End date (YYYY-MM-DD): ")?.unwrap_or_default();
        let (Some(start), Some(end)) = (parse_date(&start), parse_date(&end)) else {
            writeln!(self.out, "Invalid date format")?;
            return Ok(());
        };
        let report = self.session()?.search_date_range(start, end);
        return self.print_report(&report);
    }

    fn print_report(&mut self, report: &SearchReport) -> Result<()> {
        let label = match report.path {
            SearchPath::Index => "index",
            SearchPath::SortTree => "sorted tree",
            SearchPath::TreeScan => "tree scan",
        };
        self.print_matches(label, &report.indexed)?;
        writeln!(self.out, "---")?;
        return self.print_matches("list", &report.linear);
    }

    fn print_matches(&mut self, label: &str, found: &Timed<List<Shared>>) -> Result<()> {
        writeln!(
            self.out,
            "Found in {}: {} ({:.6}s)",
            label,
            found.value.len(),
            found.elapsed.as_secs_f64()
        )?;
        for record in found.value.iter() {
            writeln!(self.out, "{}", record)?;
        }
        return Ok(());
    }

    fn statistics(&mut self) -> Result<()> {
        let stats = self.session()?.country_stats();
        writeln!(self.out, "Countries: {}", stats.total)?;
        let answer = self.prompt("How many countries to show? (n for all): ")?.unwrap_or_default();
        let limit = answer.parse::<usize>().ok();
        for row in stats.rows.iter().take(limit.unwrap_or(usize::MAX)) {
            writeln!(self.out, "{}: {}", row.country, row.count)?;
        }
        let load = self.session()?.stats().clone();
        writeln!(self.out, "Earliest subscription: {}", show_date(load.min_date))?;
        writeln!(self.out, "Latest subscription: {}", show_date(load.max_date))?;
        return Ok(());
    }

    fn levels(&mut self) -> Result<()> {
        let Some(view) = self.session()?.level_view() else {
            writeln!(self.out, "No sort applied yet. Sort by some field first.")?;
            return Ok(());
        };
        writeln!(self.out, "Tree by level (depth: key - records under the key):")?;
        for entry in view {
            writeln!(self.out, "{}: {} - {}", entry.depth, entry.key, entry.count)?;
        }
        return Ok(());
    }
}
