//! `kaizen` - CLI for the kaizen record keeper
//!
//! This binary is the operator-facing boundary: it turns commands into
//! repository calls and reports every failure as a one-line notice.

#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{bail, Context};
use clap::Parser;
use tracing::info;

use kaizen::analytics;
use kaizen::cli::{
    Cli, Command, ConfigCommand, InitiativeCommand, InitiativeListCommand, OutputFormat,
    RcaCommand, RcaListCommand, ResetCommand, ResetTarget,
};
use kaizen::comments;
use kaizen::export;
use kaizen::filter;
use kaizen::repository::local_today;
use kaizen::{
    init_logging, Config, Error, Initiative, Record, Repository, RootCauseDraft, RootCauseRecord,
    Store,
};

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Initialize logging based on verbosity
    init_logging(cli.verbosity());

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    // Validation reports on a file that may not load
    if let Command::Config(ConfigCommand::Validate { file }) = &cli.command {
        return handle_validate(file.clone().or_else(|| cli.config.clone()));
    }

    let config = Config::load_from(cli.config.clone()).context("failed to load configuration")?;

    if let Command::Config(cmd) = cli.command {
        return handle_config(&config, cli.config.as_deref(), &cmd);
    }

    let db_path = config.database_path();
    let store = Store::open(&db_path)
        .with_context(|| format!("failed to open database at {}", db_path.display()))?;

    match cli.command {
        Command::Initiative(cmd) => handle_initiative(&config, &store, cmd),
        Command::Rca(cmd) => handle_rca(&config, &store, cmd),
        Command::Reset(cmd) => handle_reset(&store, &cmd),
        Command::Status(cmd) => handle_status(&config, &store, cmd.json),
        Command::Config(_) => Ok(()),
    }
}

/// Open a collection, reporting a corrupted slot once and carrying on empty.
fn open_repo<'s, T: Record>(
    config: &Config,
    store: &'s Store,
    seed: bool,
) -> kaizen::Result<Repository<'s, T>> {
    let (repo, corruption) = Repository::<T>::recover(store, seed)?;
    if let Some(err) = corruption {
        eprintln!("warning: {err}; showing it as empty until the next change");
    }
    Ok(repo.with_owner(config.records.default_owner.clone()))
}

fn handle_initiative(config: &Config, store: &Store, cmd: InitiativeCommand) -> anyhow::Result<()> {
    let mut repo = open_repo::<Initiative>(config, store, config.storage.seed_sample_data)?;

    match cmd {
        InitiativeCommand::List(list) => print_initiatives(repo.list(), &list)?,
        InitiativeCommand::Show { id } => {
            let initiative = repo
                .get(&id)
                .ok_or_else(|| Error::not_found(Initiative::KIND, &id))?;
            print_initiative(initiative);
        }
        InitiativeCommand::Create(fields) => {
            let created = repo.create(fields.into())?;
            println!("Created initiative {} ({})", created.id, created.title);
        }
        InitiativeCommand::Update { id, fields } => {
            let updated = repo.update(&id, fields.into())?;
            println!("Updated initiative {} ({})", updated.id, updated.title);
        }
        InitiativeCommand::Delete { id } => {
            repo.delete(&id)?;
            println!("Deleted initiative {id}");
        }
        InitiativeCommand::Comment { id, text, author } => {
            let author = author.unwrap_or_else(|| config.records.comment_author.clone());
            let updated = comments::append(&mut repo, &id, &text, &author)?;
            println!(
                "Added comment to {} ({} comments)",
                updated.id,
                updated.comments.len()
            );
        }
        InitiativeCommand::Export { output } => {
            let content = export::initiatives_to_csv(repo.list());
            let default_name = export::initiatives_file_name(local_today());
            write_export(config, output.as_deref(), &default_name, &content)?;
        }
        InitiativeCommand::ExportOne { id, output } => {
            let initiative = repo
                .get(&id)
                .ok_or_else(|| Error::not_found(Initiative::KIND, &id))?;
            let content = export::initiative_to_lines(initiative);
            let default_name = export::initiative_file_name(&initiative.title);
            write_export(config, output.as_deref(), &default_name, &content)?;
        }
        InitiativeCommand::Dashboard { json } => print_dashboard(repo.list(), json)?,
    }
    Ok(())
}

fn handle_rca(config: &Config, store: &Store, cmd: RcaCommand) -> anyhow::Result<()> {
    let mut repo = open_repo::<RootCauseRecord>(config, store, config.storage.seed_sample_data)?;

    match cmd {
        RcaCommand::List(list) => print_root_causes(repo.list(), &list)?,
        RcaCommand::Show { id } => {
            let record = repo
                .get(&id)
                .ok_or_else(|| Error::not_found(RootCauseRecord::KIND, &id))?;
            print_root_cause(record);
        }
        RcaCommand::Create(fields) => {
            let created = repo.create(RootCauseDraft::try_from(fields)?)?;
            println!("Created analysis {} ({})", created.id, created.title);
        }
        RcaCommand::Update { id, fields } => {
            let updated = repo.update(&id, RootCauseDraft::try_from(fields)?)?;
            println!("Updated analysis {} ({})", updated.id, updated.title);
        }
        RcaCommand::Delete { id } => {
            repo.delete(&id)?;
            println!("Deleted analysis {id}");
        }
        RcaCommand::Export { id, output } => {
            let record = repo
                .get(&id)
                .ok_or_else(|| Error::not_found(RootCauseRecord::KIND, &id))?;
            let content = export::root_cause_to_lines(record);
            let default_name = export::root_cause_file_name(&record.title);
            write_export(config, output.as_deref(), &default_name, &content)?;
        }
    }
    Ok(())
}

fn handle_reset(store: &Store, cmd: &ResetCommand) -> anyhow::Result<()> {
    let label = match cmd.target {
        ResetTarget::Initiatives => "initiatives",
        ResetTarget::Rca => "root cause analyses",
    };
    if !cmd.yes {
        bail!("this deletes every stored {label}; rerun with --yes to confirm");
    }

    let removed = match cmd.target {
        ResetTarget::Initiatives => Repository::<Initiative>::recover(store, false)?.0.reset()?,
        ResetTarget::Rca => Repository::<RootCauseRecord>::recover(store, false)?.0.reset()?,
    };
    println!("Removed {removed} {label}");
    Ok(())
}

fn handle_status(config: &Config, store: &Store, json: bool) -> anyhow::Result<()> {
    let stats = store.stats()?;
    let collections = [
        ("initiatives", Repository::<Initiative>::stored_count(store)),
        (
            "root cause analyses",
            Repository::<RootCauseRecord>::stored_count(store),
        ),
    ];

    if json {
        let mut records = serde_json::Map::new();
        for (name, count) in collections {
            let value = match count {
                Ok(n) => serde_json::json!(n),
                Err(err) if err.is_corruption() => serde_json::json!("CORRUPTED"),
                Err(err) => return Err(err.into()),
            };
            records.insert(name.to_string(), value);
        }
        let status = serde_json::json!({
            "database_path": store.path(),
            "config_path": Config::default_config_path(),
            "seed_sample_data": config.storage.seed_sample_data,
            "db_size_bytes": stats.db_size_bytes,
            "slots": stats.slots,
            "records": records,
        });
        println!("{}", serde_json::to_string_pretty(&status)?);
    } else {
        println!("kaizen status");
        println!("-------------");
        println!("Database:      {}", store.path().display());
        println!("Size:          {} bytes", stats.db_size_bytes);
        println!("Seeding:       {}", config.storage.seed_sample_data);
        println!();
        for (name, count) in collections {
            let count = match count {
                Ok(None) => "not created yet".to_string(),
                Ok(Some(n)) => n.to_string(),
                Err(err) if err.is_corruption() => "CORRUPTED".to_string(),
                Err(err) => return Err(err.into()),
            };
            println!("{name:<20} {count}");
        }
        for slot in &stats.slots {
            let updated = slot
                .updated_at
                .map_or_else(|| "-".to_string(), |t| t.to_rfc3339());
            println!("  {:<30} {:>8} bytes  {updated}", slot.key, slot.bytes);
        }
    }
    Ok(())
}

fn handle_config(config: &Config, path: Option<&Path>, cmd: &ConfigCommand) -> anyhow::Result<()> {
    match cmd {
        ConfigCommand::Show { json } => {
            if *json {
                println!("{}", serde_json::to_string_pretty(config)?);
            } else {
                println!("Current Configuration");
                println!("=====================");
                println!();
                println!("[Storage]");
                println!("  Database path:      {}", config.database_path().display());
                println!("  Seed sample data:   {}", config.storage.seed_sample_data);
                println!();
                println!("[Records]");
                println!("  Default owner:      {}", config.records.default_owner);
                println!("  Comment author:     {}", config.records.comment_author);
                println!();
                println!("[Export]");
                println!(
                    "  Output directory:   {}",
                    config
                        .export
                        .output_dir
                        .as_deref()
                        .map_or_else(|| ".".to_string(), |p| p.display().to_string())
                );
            }
        }
        ConfigCommand::Path => {
            let path = path.map_or_else(Config::default_config_path, Path::to_path_buf);
            println!("{}", path.display());
        }
        ConfigCommand::Validate { .. } => {}
    }
    Ok(())
}

fn handle_validate(file: Option<PathBuf>) -> anyhow::Result<()> {
    let path = file.unwrap_or_else(Config::default_config_path);
    println!("Validating configuration: {}", path.display());
    Config::load_file(&path).with_context(|| format!("{} is invalid", path.display()))?;
    println!("Configuration is valid.");
    Ok(())
}

/// Write export `content` to `output`, stdout for `-`, or the configured
/// export directory under `default_name`.
fn write_export(
    config: &Config,
    output: Option<&Path>,
    default_name: &str,
    content: &str,
) -> anyhow::Result<()> {
    if output == Some(Path::new("-")) {
        let mut stdout = io::stdout().lock();
        write_content(&mut stdout, content).context("failed to write export to stdout")?;
        return Ok(());
    }

    let path = output.map_or_else(|| config.export_path(default_name), Path::to_path_buf);
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    fs::write(&path, content).with_context(|| format!("failed to write {}", path.display()))?;
    info!(path = %path.display(), bytes = content.len(), "Wrote export");
    println!("Exported to {}", path.display());
    Ok(())
}

/// Write export content exactly as rendered, with no trailing newline.
fn write_content(writer: &mut impl Write, content: &str) -> io::Result<()> {
    writer.write_all(content.as_bytes())?;
    writer.flush()
}

fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        text.to_string()
    } else {
        let mut cut: String = text.chars().take(width.saturating_sub(1)).collect();
        cut.push('~');
        cut
    }
}

fn print_initiatives(records: &[Initiative], list: &InitiativeListCommand) -> anyhow::Result<()> {
    let found = filter::apply(records, &list.criteria());

    match list.format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&found)?),
        OutputFormat::Plain => {
            for i in &found {
                println!("{}\t{}\t{}\t{}", i.id, i.status, i.department, i.title);
            }
        }
        OutputFormat::Table => {
            println!(
                "{:<18} {:<32} {:<14} {:<16} {:<12} {:>10}",
                "ID", "TITLE", "DEPARTMENT", "OWNER", "STATUS", "SAVINGS"
            );
            for i in &found {
                println!(
                    "{:<18} {:<32} {:<14} {:<16} {:<12} {:>10}",
                    truncate(&i.id, 18),
                    truncate(&i.title, 32),
                    truncate(&i.department, 14),
                    truncate(&i.owner, 16),
                    i.status.label(),
                    i.cost_savings
                );
            }
            println!("{} of {} initiatives", found.len(), records.len());
        }
    }
    Ok(())
}

fn print_initiative(i: &Initiative) {
    println!("{} [{}]", i.title, i.status);
    println!("  Id:                 {}", i.id);
    println!("  Department:         {}", i.department);
    println!("  Owner:              {}", i.owner);
    println!("  Started:            {}", i.date_started);
    if let Some(done) = i.date_completed {
        println!("  Completed:          {done}");
    }
    println!("  Problem:            {}", i.problem_statement);
    println!("  Root cause:         {}", i.root_cause_summary);
    println!("  Action plan:        {}", i.action_plan);
    println!("  KPIs before:        {}", i.before_kpis);
    println!("  KPIs after:         {}", i.after_kpis);
    println!("  Time saved (h):     {}", i.time_saved);
    println!("  Cost savings:       {}", i.cost_savings);
    println!("  Created / modified: {} / {}", i.date_created, i.date_modified);

    if !i.comments.is_empty() {
        println!();
        println!("Comments ({})", i.comments.len());
        for c in &i.comments {
            println!("  {} {}: {}", c.date, c.author, c.text);
        }
    }
}

fn print_root_causes(records: &[RootCauseRecord], list: &RcaListCommand) -> anyhow::Result<()> {
    let found = filter::apply(records, &list.criteria());

    match list.format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&found)?),
        OutputFormat::Plain => {
            for r in &found {
                println!("{}\t{}\t{}", r.id, r.status, r.title);
            }
        }
        OutputFormat::Table => {
            println!(
                "{:<18} {:<36} {:<16} {:<6} {:>5}",
                "ID", "TITLE", "OWNER", "STATUS", "WHYS"
            );
            for r in &found {
                println!(
                    "{:<18} {:<36} {:<16} {:<6} {:>5}",
                    truncate(&r.id, 18),
                    truncate(&r.title, 36),
                    truncate(&r.owner, 16),
                    r.status.label(),
                    r.causal_chain().count()
                );
            }
            println!("{} of {} analyses", found.len(), records.len());
        }
    }
    Ok(())
}

fn print_root_cause(r: &RootCauseRecord) {
    println!("{} [{}]", r.title, r.status);
    println!("  Id:                 {}", r.id);
    println!("  Owner:              {}", r.owner);
    println!("  Problem:            {}", r.problem_statement);
    for (depth, reason) in r.causal_chain() {
        println!("  Why {depth}:              {reason}");
    }
    println!("  Root cause:         {}", r.root_cause_summary);
    println!("  Corrective actions: {}", r.corrective_actions);
    println!("  Created / modified: {} / {}", r.date_created, r.date_modified);
}

fn print_dashboard(records: &[Initiative], json: bool) -> anyhow::Result<()> {
    let summary = analytics::summary(records);
    let by_status = analytics::status_counts(records);
    let by_department = analytics::department_stats(records);
    let trend = analytics::monthly_trend(records);

    if json {
        let dashboard = serde_json::json!({
            "summary": summary,
            "statusCounts": by_status,
            "departmentStats": by_department,
            "monthlyTrend": trend,
        });
        println!("{}", serde_json::to_string_pretty(&dashboard)?);
        return Ok(());
    }

    println!("Kaizen dashboard");
    println!("================");
    println!("Initiatives:        {}", summary.total);
    println!("Completed:          {}", summary.completed);
    println!("In progress:        {}", summary.in_progress);
    println!("Cost savings:       {}", summary.total_cost_savings);
    println!("Time saved (h):     {}", summary.total_time_saved);

    println!();
    println!("By status");
    for (status, count) in &by_status {
        println!("  {:<14} {count}", status.label());
    }

    println!();
    println!("By department");
    for (department, stats) in &by_department {
        let name = if department.is_empty() {
            "(none)"
        } else {
            department.as_str()
        };
        println!(
            "  {:<14} {}/{} completed ({:.0}%)  savings {}",
            truncate(name, 14),
            stats.completed,
            stats.total,
            stats.completion_rate() * 100.0,
            stats.savings
        );
    }

    println!();
    println!("Completed by month");
    for bucket in &trend {
        println!(
            "  {:<8} {:>3}  savings {}",
            bucket.month, bucket.completed_count, bucket.savings_sum
        );
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_content_adds_no_trailing_newline() {
        let records = kaizen::seed::initiatives();
        let content = export::initiatives_to_csv(&records);

        let mut out = Vec::new();
        write_content(&mut out, &content).unwrap();

        assert_eq!(out, content.as_bytes());
        assert!(!out.ends_with(b"\n"));
    }

    #[test]
    fn test_truncate_marks_cut_text() {
        assert_eq!(truncate("Production", 14), "Production");
        assert_eq!(truncate("Reduce Setup Time", 6), "Reduc~");
    }
}
