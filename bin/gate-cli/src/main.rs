use std::fs;
use std::path::PathBuf;

use anyhow::{anyhow, bail, Context};
use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use gate_entry::{
    Decision, EntryDesk, EntryForm, EntryOutcome, ManualApprover, PendingApproval, MAX_PEOPLE,
};
use gate_log::{
    format_timestamp, FileStore, HistoryQuery, StatusFilter, VisitLogStore, VisitRecord,
    STILL_INSIDE,
};
use gate_plate::{extract_plate, ScanOutcome, ScanSession, TesseractCommand, Threshold};
use gate_roster::{load_roster, AuthorityRecord, Roster};
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[derive(Clone, Debug)]
struct GateConfig {
    data_dir: PathBuf,
    roster_path: Option<PathBuf>,
}

impl GateConfig {
    fn roster(&self) -> anyhow::Result<Roster> {
        match &self.roster_path {
            Some(path) => load_roster(path)
                .with_context(|| format!("failed to load roster {}", path.display())),
            None => Ok(Roster::builtin()),
        }
    }

    fn visit_log(&self) -> VisitLogStore<FileStore> {
        VisitLogStore::new(FileStore::new(self.data_dir.clone()))
    }
}

#[derive(Clone, Debug, Parser)]
#[command(name = "gate-cli")]
#[command(about = "Gate entry, approval and visitor log management")]
struct Cli {
    #[arg(long, env = "GATEHOUSE_DATA_DIR", default_value = ".gatehouse", global = true)]
    data_dir: PathBuf,
    #[arg(long, global = true)]
    roster: Option<PathBuf>,
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,
    #[command(subcommand)]
    command: CliCommand,
}

#[derive(Clone, Debug, Subcommand)]
enum CliCommand {
    /// Read a license plate from an image file.
    Scan {
        image: PathBuf,
        #[arg(long, env = "GATEHOUSE_TESSERACT", default_value = "tesseract")]
        tesseract: PathBuf,
        #[arg(long, default_value = "eng")]
        language: String,
        #[arg(long, value_enum, default_value_t = ThresholdMode::Fixed)]
        threshold: ThresholdMode,
    },
    /// Pull a plate number out of already-recognized text.
    Extract { text: String },
    Authorities {
        #[arg(long)]
        purpose: Option<String>,
        #[arg(long)]
        json: bool,
    },
    Purposes,
    /// Print the dial URL for an authority.
    Call { id: u32 },
    Enter {
        #[arg(long)]
        vehicle: String,
        #[arg(long, allow_negative_numbers = true)]
        people: Option<i64>,
        #[arg(long = "name")]
        names: Vec<String>,
        #[arg(long)]
        purpose: String,
        #[arg(long, conflicts_with_all = ["manual_approve", "deny"])]
        authority: Option<u32>,
        #[arg(long, conflicts_with = "deny")]
        manual_approve: bool,
        #[arg(long, requires = "manual_approve")]
        unattributed: bool,
        #[arg(long)]
        deny: bool,
    },
    Exit { id: String },
    List {
        #[arg(long, value_enum, default_value_t = StatusArg::All)]
        status: StatusArg,
        #[arg(long)]
        search: Option<String>,
        #[arg(long)]
        json: bool,
    },
    Export {
        #[arg(long, default_value = ".")]
        out: PathBuf,
    },
    /// Delete the whole visit history.
    Clear {
        #[arg(long)]
        confirm: bool,
    },
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum ThresholdMode {
    Fixed,
    Otsu,
}

impl ThresholdMode {
    fn threshold(self) -> Threshold {
        match self {
            Self::Fixed => Threshold::default(),
            Self::Otsu => Threshold::Otsu,
        }
    }
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum StatusArg {
    All,
    Inside,
    Exited,
}

impl StatusArg {
    fn filter(self) -> StatusFilter {
        match self {
            Self::All => StatusFilter::All,
            Self::Inside => StatusFilter::Inside,
            Self::Exited => StatusFilter::Exited,
        }
    }
}

fn init_logging(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

fn print_plate(plate: Option<&str>, raw_text: &str) {
    match plate {
        Some(plate) => println!("plate detected: {plate}"),
        None => {
            println!("no plate detected: please retry or enter manually");
            let raw = raw_text.trim();
            if !raw.is_empty() {
                println!("recognized text: {raw}");
            }
        }
    }
}

fn print_authority(authority: &AuthorityRecord) {
    println!(
        "{:>4}  {}  {}, {}  {}  {}",
        authority.id,
        authority.name,
        authority.designation,
        authority.department,
        authority.phone,
        authority.email
    );
}

fn print_record(record: &VisitRecord) {
    let exit = record
        .exit_time
        .as_ref()
        .map(format_timestamp)
        .unwrap_or_else(|| STILL_INSIDE.to_string());
    println!(
        "{}  {}  {}  people={}  names={}  purpose={}  approved_by={}  entry={}  exit={}",
        record.id,
        record.vehicle_number,
        record.status.as_str(),
        record.number_of_people,
        record.names.join(", "),
        record.purpose,
        record.approved_by.as_deref().unwrap_or("-"),
        format_timestamp(&record.entry_time),
        exit
    );
}

fn handle_scan(
    image: PathBuf,
    tesseract: PathBuf,
    language: String,
    threshold: ThresholdMode,
) -> anyhow::Result<()> {
    let bytes =
        fs::read(&image).with_context(|| format!("failed to read image {}", image.display()))?;
    let recognizer = TesseractCommand::new(tesseract).with_language(language);
    let session = ScanSession::new(recognizer).with_threshold(threshold.threshold());

    let outcome = session
        .scan(&bytes)
        .with_context(|| format!("failed to scan {}", image.display()))?;
    match &outcome {
        ScanOutcome::Detected { plate, .. } => print_plate(Some(plate.as_str()), ""),
        ScanOutcome::NotFound { raw_text } => print_plate(None, raw_text),
    }
    Ok(())
}

#[allow(clippy::too_many_arguments)]
fn handle_enter(
    cfg: &GateConfig,
    vehicle: String,
    people: Option<i64>,
    names: Vec<String>,
    purpose: String,
    authority: Option<u32>,
    manual_approve: bool,
    unattributed: bool,
    deny: bool,
) -> anyhow::Result<()> {
    let roster = cfg.roster()?;
    let log = cfg.visit_log();
    let desk = EntryDesk::new(&roster, &log);

    let mut form = EntryForm::new();
    form.set_vehicle_number(vehicle);
    form.set_purpose(purpose);
    form.set_number_of_people(people.unwrap_or(names.len() as i64));
    let given = names.len();
    for (index, name) in names.into_iter().enumerate() {
        if !form.set_name(index, name) {
            bail!(
                "{given} names given for {} people; at most {MAX_PEOPLE} visitors per entry",
                form.number_of_people()
            );
        }
    }

    let mut pending = desk.begin(&form)?;
    let decision = if deny {
        Decision::Deny
    } else if manual_approve {
        Decision::ManualApprove(if unattributed {
            ManualApprover::Unattributed
        } else {
            ManualApprover::System
        })
    } else {
        if let Some(id) = authority {
            pending = pending.select(id)?;
        }
        match pending.approval() {
            PendingApproval::MultiMatch { candidates } => {
                println!("matching authorities:");
                for candidate in candidates {
                    print_authority(candidate);
                }
                bail!(
                    "{} authorities match purpose {:?}; select one with --authority <id>",
                    candidates.len(),
                    pending.details().purpose
                );
            }
            PendingApproval::NoMatch => bail!(
                "no authority found for purpose {:?}; use --deny or --manual-approve",
                pending.details().purpose
            ),
            PendingApproval::SingleMatch { .. } | PendingApproval::Resolved { .. } => {
                Decision::Approve
            }
        }
    };

    match desk.decide(pending, decision)? {
        EntryOutcome::Approved(record) => {
            println!(
                "entry approved id={} vehicle={} approved_by={}",
                record.id,
                record.vehicle_number,
                record.approved_by.as_deref().unwrap_or("-")
            );
        }
        EntryOutcome::Denied { vehicle_number } => {
            println!("entry denied vehicle={vehicle_number}");
        }
    }
    Ok(())
}

fn handle_command(cfg: &GateConfig, command: CliCommand) -> anyhow::Result<()> {
    match command {
        CliCommand::Scan {
            image,
            tesseract,
            language,
            threshold,
        } => handle_scan(image, tesseract, language, threshold),
        CliCommand::Extract { text } => {
            let found = extract_plate(&text);
            print_plate(found.as_ref().map(|m| m.plate.as_str()), &text);
            Ok(())
        }
        CliCommand::Authorities { purpose, json } => {
            let roster = cfg.roster()?;
            let authorities: Vec<&AuthorityRecord> = match &purpose {
                Some(purpose) => roster.resolve(purpose),
                None => roster.authorities().iter().collect(),
            };
            if json {
                let rendered = serde_json::to_string_pretty(&authorities)
                    .context("failed to format authorities")?;
                println!("{rendered}");
            } else if authorities.is_empty() {
                println!("no relevant authority found");
            } else {
                for authority in authorities {
                    print_authority(authority);
                }
            }
            Ok(())
        }
        CliCommand::Purposes => {
            for purpose in cfg.roster()?.available_purposes() {
                println!("{purpose}");
            }
            Ok(())
        }
        CliCommand::Call { id } => {
            let roster = cfg.roster()?;
            let authority = roster
                .find(id)
                .ok_or_else(|| anyhow!("unknown authority id {id}"))?;
            println!("{}", authority.dial_url());
            Ok(())
        }
        CliCommand::Enter {
            vehicle,
            people,
            names,
            purpose,
            authority,
            manual_approve,
            unattributed,
            deny,
        } => handle_enter(
            cfg,
            vehicle,
            people,
            names,
            purpose,
            authority,
            manual_approve,
            unattributed,
            deny,
        ),
        CliCommand::Exit { id } => {
            match cfg.visit_log().record_exit(&id)? {
                Some(record) => println!("exit recorded vehicle={}", record.vehicle_number),
                None => println!("no vehicle inside with id {id}"),
            }
            Ok(())
        }
        CliCommand::List {
            status,
            search,
            json,
        } => {
            let log = cfg.visit_log();
            let query = HistoryQuery {
                status: status.filter(),
                search,
            };
            let records = log.query(&query);
            if json {
                let rendered = serde_json::to_string_pretty(&records)
                    .context("failed to format visit log")?;
                println!("{rendered}");
                return Ok(());
            }

            let summary = log.summary();
            println!(
                "total={} inside={} exited={}",
                summary.total, summary.inside, summary.exited
            );
            if records.is_empty() {
                println!("no vehicle entries match the current filter");
            }
            for record in &records {
                print_record(record);
            }
            Ok(())
        }
        CliCommand::Export { out } => {
            let today = chrono::Local::now().date_naive();
            let path = cfg
                .visit_log()
                .export_to_dir(&out, today)
                .context("failed to export visit history")?;
            println!("exported visit history to {}", path.display());
            Ok(())
        }
        CliCommand::Clear { confirm } => {
            if !confirm {
                bail!("clearing visit history cannot be undone; re-run with --confirm");
            }
            cfg.visit_log().clear_all()?;
            println!("visit history cleared");
            Ok(())
        }
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let cfg = GateConfig {
        data_dir: cli.data_dir,
        roster_path: cli.roster,
    };
    debug!(data_dir = %cfg.data_dir.display(), "gate-cli starting");

    handle_command(&cfg, cli.command)
}
