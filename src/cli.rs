//! CLI definition, dispatch and the interactive wizard loop.

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::thread;

use crate::adapters::console::{self, ANALYZING_STAGES};
use crate::adapters::csv_adapter::CsvJournalAdapter;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::domain::config_validation::validate_config;
use crate::domain::error::StockproError;
use crate::domain::journal::{Journal, StockFilter};
use crate::domain::settings::Settings;
use crate::domain::sizing::compute_position;
use crate::domain::trade::{TradeInput, TrendChecks};
use crate::domain::wizard::{Event, Step, Transition, WizardContext, transition};
use crate::ports::journal_port::JournalPort;

#[derive(Parser, Debug)]
#[command(name = "stockpro", about = "Position sizer and trade journal")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Walk through a trade setup step by step
    Wizard {
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// Where the journal is exported on quit
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Existing journal to continue
        #[arg(long)]
        journal: Option<PathBuf>,
    },
    /// Size a single trade and print the plan
    Size {
        #[arg(long, allow_hyphen_values = true)]
        capital: f64,
        #[arg(long, allow_hyphen_values = true)]
        entry: f64,
        #[arg(long, allow_hyphen_values = true)]
        stop_loss: f64,
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
    /// List a saved journal, optionally for one stock
    Journal {
        #[arg(short, long)]
        file: PathBuf,
        #[arg(long)]
        stock: Option<String>,
    },
    /// Validate a configuration file
    Validate {
        #[arg(short, long)]
        config: PathBuf,
    },
}

/// Installs the stderr log subscriber; `RUST_LOG` overrides the `warn` default.
pub fn init_logging() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .try_init();
}

pub fn run(cli: Cli) -> ExitCode {
    let result = match cli.command {
        Command::Wizard {
            config,
            output,
            journal,
        } => run_wizard_command(config.as_deref(), output, journal.as_deref()),
        Command::Size {
            capital,
            entry,
            stop_loss,
            config,
        } => run_size(capital, entry, stop_loss, config.as_deref()),
        Command::Journal { file, stock } => run_journal(&file, stock.as_deref()),
        Command::Validate { config } => run_validate(&config),
    };
    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            (&e).into()
        }
    }
}

/// Loads and validates settings, or returns the defaults when no file is given.
pub fn load_settings(path: Option<&Path>) -> Result<Settings, StockproError> {
    match path {
        Some(path) => {
            let adapter = FileConfigAdapter::from_file(path)?;
            tracing::info!(source = adapter.source(), "loading config");
            validate_config(&adapter)?;
            Ok(Settings::from_config(&adapter))
        }
        None => Ok(Settings::default()),
    }
}

fn run_wizard_command(
    config: Option<&Path>,
    output: Option<PathBuf>,
    journal_path: Option<&Path>,
) -> Result<(), StockproError> {
    let mut settings = load_settings(config)?;
    if let Some(output) = output {
        settings.journal_output = output;
    }

    let port = CsvJournalAdapter;
    let journal = match journal_path {
        Some(path) => port.import(path)?,
        None => Journal::new(),
    };
    let today = chrono::Local::now().date_naive();

    let stdin = io::stdin();
    let stdout = io::stdout();
    run_wizard(stdin.lock(), stdout.lock(), &settings, &port, journal, today)?;
    Ok(())
}

fn run_size(
    capital: f64,
    entry: f64,
    stop_loss: f64,
    config: Option<&Path>,
) -> Result<(), StockproError> {
    let settings = load_settings(config)?;
    let plan = compute_position(capital, entry, stop_loss, &settings.sizing)?;
    tracing::debug!(?plan, "position sized");

    let stdout = io::stdout();
    let mut out = stdout.lock();
    writeln!(out, "Risk amount:      {:.2}", plan.risk_amount)?;
    writeln!(out, "Gap:              {:.2}", plan.gap)?;
    console::render_metrics(&mut out, &plan)?;
    Ok(())
}

fn run_journal(file: &Path, stock: Option<&str>) -> Result<(), StockproError> {
    let journal = CsvJournalAdapter.import(file)?;
    let filter = stock.map(StockFilter::parse).unwrap_or_default();
    let rows = filter.apply(&journal);

    let stdout = io::stdout();
    console::render_table(&mut stdout.lock(), &rows)?;
    eprintln!("{} of {} entries", rows.len(), journal.len());
    Ok(())
}

fn run_validate(config: &Path) -> Result<(), StockproError> {
    eprintln!("Validating config: {}", config.display());
    let settings = load_settings(Some(config))?;
    eprintln!(
        "  risk {:.2}%  reward:risk {}  journal {}",
        settings.sizing.risk_fraction * 100.0,
        settings.sizing.reward_risk,
        settings.journal_output.display()
    );
    eprintln!("Configuration is valid.");
    Ok(())
}

#[derive(Debug, PartialEq)]
enum Reply {
    Events(Vec<Event>),
    Export(Option<PathBuf>),
    Invalid(String),
    Quit,
}

/// Drives the wizard over line-oriented input until `quit` or end of input.
///
/// The journal is exported to the configured output on exit when it holds
/// entries that were not exported yet. Returns the final journal.
pub fn run_wizard<R: BufRead, W: Write>(
    mut input: R,
    mut out: W,
    settings: &Settings,
    port: &dyn JournalPort,
    journal: Journal,
    today: NaiveDate,
) -> Result<Journal, StockproError> {
    let mut step = Step::Welcome;
    let mut ctx = WizardContext::with_journal(journal);
    let mut exported_len = ctx.journal.len();

    loop {
        console::render_step(&mut out, step, &ctx)?;
        let reply = match step {
            Step::Welcome => read_welcome(&mut input, &mut out)?,
            Step::Capital => read_capital(&mut input, &mut out, settings, &ctx)?,
            Step::TradeSetup => read_trade(&mut input, &mut out, settings, &ctx, today)?,
            Step::Analyzing => {
                play_analyzing(&mut out, settings)?;
                Reply::Events(vec![Event::Finish])
            }
            Step::Results => read_results(&mut input, &mut out)?,
            Step::Journal => read_journal(&mut input, &mut out)?,
        };

        match reply {
            Reply::Quit => break,
            Reply::Invalid(msg) => writeln!(out, "error: {msg}")?,
            Reply::Export(path) => {
                let path = path.unwrap_or_else(|| settings.journal_output.clone());
                match port.export(&ctx.journal, &path) {
                    Ok(()) => {
                        exported_len = ctx.journal.len();
                        writeln!(out, "Journal saved to {}", path.display())?;
                    }
                    Err(e) => {
                        tracing::warn!(path = %path.display(), error = %e, "export failed");
                        writeln!(out, "error: {e}")?;
                    }
                }
            }
            Reply::Events(events) => match apply_events(step, &ctx, events, settings) {
                Ok(t) => {
                    tracing::debug!(from = %step, to = %t.step, "wizard transition");
                    step = t.step;
                    ctx = t.context;
                }
                Err(e) => writeln!(out, "error: {e}")?,
            },
        }
    }

    if ctx.journal.len() != exported_len {
        port.export(&ctx.journal, &settings.journal_output)?;
        writeln!(out, "Journal saved to {}", settings.journal_output.display())?;
    }
    Ok(ctx.journal)
}

/// Applies events in order; on the first failure nothing is committed.
fn apply_events(
    step: Step,
    ctx: &WizardContext,
    events: Vec<Event>,
    settings: &Settings,
) -> Result<Transition, StockproError> {
    let mut current = Transition {
        step,
        context: ctx.clone(),
    };
    for event in events {
        current = transition(current.step, &current.context, event, settings)?;
    }
    Ok(current)
}

fn prompt<R: BufRead, W: Write>(
    input: &mut R,
    out: &mut W,
    label: &str,
) -> io::Result<Option<String>> {
    write!(out, "{label}: ")?;
    out.flush()?;
    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim().to_string()))
}

/// Navigation commands. `:back` and `:quit` work at every prompt; the bare
/// words only where the answer cannot be a ticker.
fn navigation(answer: &str, bare_words: bool) -> Option<Reply> {
    let lower = answer.to_lowercase();
    let word = match lower.strip_prefix(':') {
        Some(word) => word,
        None if bare_words => lower.as_str(),
        None => return None,
    };
    match word {
        "quit" | "q" | "exit" => Some(Reply::Quit),
        "back" => Some(Reply::Events(vec![Event::Back])),
        _ => None,
    }
}

fn parse_amount(answer: &str, default: f64, field: &str) -> Result<f64, String> {
    if answer.is_empty() {
        return Ok(default);
    }
    match answer.replace(',', "").parse::<f64>() {
        Ok(value) if value.is_finite() => Ok(value),
        _ => Err(format!("{field}: '{answer}' is not a number")),
    }
}

fn parse_yes(answer: &str) -> bool {
    matches!(answer.to_lowercase().as_str(), "y" | "yes" | "true" | "1" | "x")
}

fn read_welcome<R: BufRead, W: Write>(input: &mut R, out: &mut W) -> io::Result<Reply> {
    let Some(answer) = prompt(input, out, "Press Enter to start")? else {
        return Ok(Reply::Quit);
    };
    Ok(match answer.to_lowercase().as_str() {
        "" | "start" | "s" => Reply::Events(vec![Event::Start]),
        "quit" | "q" | "exit" => Reply::Quit,
        other => Reply::Invalid(format!("unknown command '{other}'")),
    })
}

fn read_capital<R: BufRead, W: Write>(
    input: &mut R,
    out: &mut W,
    settings: &Settings,
    ctx: &WizardContext,
) -> io::Result<Reply> {
    let default = ctx.capital.unwrap_or(settings.wizard.capital);
    let label = format!("Enter Total Investment Value (INR) [{default}] (or back)");
    let Some(answer) = prompt(input, out, &label)? else {
        return Ok(Reply::Quit);
    };
    if let Some(reply) = navigation(&answer, true) {
        return Ok(reply);
    }
    Ok(match parse_amount(&answer, default, "capital") {
        Ok(capital) => Reply::Events(vec![Event::SetCapital(capital), Event::Next]),
        Err(msg) => Reply::Invalid(msg),
    })
}

fn read_trade<R: BufRead, W: Write>(
    input: &mut R,
    out: &mut W,
    settings: &Settings,
    ctx: &WizardContext,
    today: NaiveDate,
) -> io::Result<Reply> {
    let previous = ctx.trade.as_ref();
    let default_stock = previous
        .map(|t| t.stock.clone())
        .unwrap_or_else(|| settings.wizard.stock.clone());
    let default_entry = previous.map_or(settings.wizard.entry_price, |t| t.entry_price);
    let default_stop = previous.map_or(settings.wizard.stop_loss, |t| t.stop_loss);
    let default_date = previous.map_or(today, |t| t.trade_date);

    let mut answers = Vec::with_capacity(4);
    for (i, label) in [
        format!("Stock Ticker [{default_stock}] (or :back)"),
        format!("Entry Price [{default_entry}]"),
        format!("Original Stop Loss [{default_stop}]"),
        format!("Trade Date [{}]", default_date.format("%Y-%m-%d")),
    ]
    .into_iter()
    .enumerate()
    {
        let Some(answer) = prompt(input, out, &label)? else {
            return Ok(Reply::Quit);
        };
        if let Some(reply) = navigation(&answer, i > 0) {
            return Ok(reply);
        }
        answers.push(answer);
    }

    writeln!(out, "Technical SMA Checks (50-Day)")?;
    let mut ticks = [false; 4];
    for (tick, label) in ticks.iter_mut().zip([
        "Nifty 50 Trend [y/N]",
        "Sensex Trend [y/N]",
        "Industry Trend [y/N]",
        "Stock Trend [y/N]",
    ]) {
        let Some(answer) = prompt(input, out, label)? else {
            return Ok(Reply::Quit);
        };
        *tick = parse_yes(&answer);
    }

    let stock = if answers[0].is_empty() {
        default_stock
    } else {
        answers[0].clone()
    };
    let entry = match parse_amount(&answers[1], default_entry, "entry price") {
        Ok(v) => v,
        Err(msg) => return Ok(Reply::Invalid(msg)),
    };
    let stop_loss = match parse_amount(&answers[2], default_stop, "stop loss") {
        Ok(v) => v,
        Err(msg) => return Ok(Reply::Invalid(msg)),
    };
    let trade_date = if answers[3].is_empty() {
        default_date
    } else {
        match NaiveDate::parse_from_str(&answers[3], "%Y-%m-%d") {
            Ok(d) => d,
            Err(_) => {
                return Ok(Reply::Invalid(format!(
                    "trade date: '{}' is not YYYY-MM-DD",
                    answers[3]
                )));
            }
        }
    };

    let checks = TrendChecks {
        nifty: ticks[0],
        sensex: ticks[1],
        industry: ticks[2],
        stock: ticks[3],
    };
    let trade = TradeInput::new(&stock, entry, stop_loss, trade_date, checks);
    Ok(Reply::Events(vec![Event::SubmitTrade(trade), Event::Run]))
}

fn play_analyzing<W: Write>(out: &mut W, settings: &Settings) -> io::Result<()> {
    let pause = settings.wizard.analyzing / ANALYZING_STAGES.len() as u32;
    for stage in ANALYZING_STAGES {
        writeln!(out, "  {stage}")?;
        out.flush()?;
        if !pause.is_zero() {
            thread::sleep(pause);
        }
    }
    Ok(())
}

fn read_results<R: BufRead, W: Write>(input: &mut R, out: &mut W) -> io::Result<Reply> {
    let Some(answer) = prompt(input, out, "Action")? else {
        return Ok(Reply::Quit);
    };
    Ok(match answer.to_lowercase().as_str() {
        "save" | "s" => Reply::Events(vec![Event::Save]),
        "fix" | "f" => Reply::Events(vec![Event::Fix]),
        "quit" | "q" | "exit" => Reply::Quit,
        other => Reply::Invalid(format!("unknown command '{other}'")),
    })
}

fn read_journal<R: BufRead, W: Write>(input: &mut R, out: &mut W) -> io::Result<Reply> {
    let Some(answer) = prompt(input, out, "Action")? else {
        return Ok(Reply::Quit);
    };
    let (command, arg) = match answer.split_once(char::is_whitespace) {
        Some((c, a)) => (c.to_lowercase(), a.trim()),
        None => (answer.to_lowercase(), ""),
    };
    Ok(match command.as_str() {
        "filter" => Reply::Events(vec![Event::Filter(StockFilter::parse(arg))]),
        "export" => Reply::Export((!arg.is_empty()).then(|| PathBuf::from(arg))),
        "restart" | "r" => Reply::Events(vec![Event::Restart]),
        "quit" | "q" | "exit" => Reply::Quit,
        other => Reply::Invalid(format!("unknown command '{other}'")),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn amount_parsing() {
        assert_eq!(parse_amount("", 5.0, "x"), Ok(5.0));
        assert_eq!(parse_amount("1,00,000", 0.0, "x"), Ok(100_000.0));
        assert_eq!(parse_amount("-3.5", 0.0, "x"), Ok(-3.5));
        assert!(parse_amount("ten", 0.0, "capital").unwrap_err().contains("capital"));
        assert!(parse_amount("inf", 0.0, "capital").is_err());
        assert!(parse_amount("NaN", 0.0, "entry").is_err());
    }

    #[test]
    fn navigation_words() {
        assert_eq!(navigation("Q", true), Some(Reply::Quit));
        assert_eq!(navigation("back", true), Some(Reply::Events(vec![Event::Back])));
        assert_eq!(navigation("Q", false), None);
        assert_eq!(navigation("BACK", false), None);
        assert_eq!(navigation(":quit", false), Some(Reply::Quit));
        assert_eq!(navigation(":Back", false), Some(Reply::Events(vec![Event::Back])));
        assert_eq!(navigation("2500", true), None);
    }

    #[test]
    fn yes_parsing() {
        assert!(parse_yes("Y"));
        assert!(parse_yes("yes"));
        assert!(!parse_yes(""));
        assert!(!parse_yes("n"));
    }

    #[test]
    fn apply_events_is_all_or_nothing() {
        let settings = Settings::default();
        let ctx = WizardContext::default();
        let err = apply_events(
            Step::Capital,
            &ctx,
            vec![Event::SetCapital(1000.0), Event::Save],
            &settings,
        );
        assert!(err.is_err());
        assert_eq!(ctx.capital, None);
    }

    #[test]
    fn cli_parses_size_with_negative_capital() {
        let cli = Cli::try_parse_from([
            "stockpro",
            "size",
            "--capital",
            "-100",
            "--entry",
            "10",
            "--stop-loss",
            "9",
        ])
        .unwrap();
        match cli.command {
            Command::Size { capital, .. } => assert_eq!(capital, -100.0),
            other => panic!("unexpected command {other:?}"),
        }
    }
}
