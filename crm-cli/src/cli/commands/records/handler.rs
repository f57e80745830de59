//! Record command handler, generic over the record kind

use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use chrono::Local;
use colored::*;
use dialoguer::{Input, Select};
use is_terminal::IsTerminal;

use super::RecordCommands;
use crate::cli::Session;
use crate::cli::output::render_table;
use crate::models::options::{is_known, options_for};
use crate::models::{Employee, Record, RecordKind};
use crate::pages::{Download, Page, RecordSink, assignee_options, filter_options};
use crate::store::{Collection, RecordStore, StoreData};
use crate::transfer::{check_csv_path, resolve_header, write_download};

/// Handle one record command for kind `R`
pub async fn handle_record_command<R>(command: RecordCommands, session: &Session) -> Result<()>
where
    R: Record,
    StoreData: Collection<R>,
    RecordStore: RecordSink<R>,
{
    let mut store = RecordStore::load(&session.data_file)?;
    let mut page: Page<R> = Page::new(
        store.records::<R>().to_vec(),
        session.user.clone(),
        session.role.clone(),
    );
    let now = Local::now();
    let today = now.date_naive();

    match command {
        RecordCommands::List => {
            let visible = page.visible();
            if visible.is_empty() {
                println!("{}", format!("No {} to show", plural(R::KIND)).dimmed());
                return Ok(());
            }
            let rows: Vec<Vec<String>> = visible.iter().map(|r| r.list_row()).collect();
            print!("{}", render_table(R::list_columns(), &rows));
            println!(
                "{}",
                format!("{} of {} {}", rows.len(), page.records().len(), plural(R::KIND)).dimmed()
            );
        }

        RecordCommands::Template { out_dir } => {
            let download = page.template(today)?;
            save_download(&download, out_dir, session)?;
        }

        RecordCommands::Import { file, strict } => {
            check_csv_path(&file)?;
            let text = tokio::fs::read_to_string(&file)
                .await
                .with_context(|| format!("Failed to read CSV file: {}", file.display()))?;

            let strict = strict || session.config.import.strict;
            let mut rng = rand::rng();
            let report = page
                .import(&text, strict, now, &mut rng, &mut store)
                .with_context(|| format!("Failed to import {}", file.display()))?;
            if !report.records.is_empty() {
                store.save()?;
            }

            println!(
                "Imported {} {}",
                report.records.len().to_string().bright_green().bold(),
                plural(R::KIND)
            );
            if !report.unmapped_columns.is_empty() {
                println!(
                    "{}",
                    format!("Kept unmapped columns: {}", report.unmapped_columns.join(", ")).dimmed()
                );
            }
            for issue in &report.issues {
                println!("  {} {}", "warning:".yellow(), issue);
            }
            if report.rejected_rows > 0 {
                println!(
                    "{}",
                    format!("Rejected {} rows (strict import)", report.rejected_rows).red()
                );
            }
        }

        RecordCommands::Export { all, ids, out_dir } => {
            if all {
                page.toggle_all();
            } else {
                let visible: Vec<String> =
                    page.visible_ids().into_iter().map(str::to_string).collect();
                for id in &ids {
                    if !visible.contains(id) {
                        bail!("No visible {} with id '{}'", R::KIND.label().to_lowercase(), id);
                    }
                    page.selection.select(id);
                }
            }

            match page.export(today)? {
                Some(download) => {
                    save_download(&download, out_dir, session)?;
                    println!("Exported {} {}", page.selection.len(), plural(R::KIND));
                }
                None => println!("{}", "Nothing selected, no file written".yellow()),
            }
        }

        RecordCommands::New {
            set,
            remark,
            pick_assignee,
        } => {
            page.open_create(now)?;
            fill_form(&mut page, &set, remark.as_deref(), pick_assignee, store.employees())?;
            let id = page.submit_form(now, &mut store)?;
            store.save()?;
            println!("Created {} {}", R::KIND.label().to_lowercase(), id.bright_green().bold());
        }

        RecordCommands::Edit {
            id,
            set,
            remark,
            pick_assignee,
        } => {
            page.open_edit(&id)?;
            fill_form(&mut page, &set, remark.as_deref(), pick_assignee, store.employees())?;
            let id = page.submit_form(now, &mut store)?;
            store.save()?;
            println!("Updated {} {}", R::KIND.label().to_lowercase(), id.bright_green().bold());
        }
    }

    Ok(())
}

fn plural(kind: RecordKind) -> &'static str {
    match kind {
        RecordKind::Leads => "leads",
        RecordKind::Opportunities => "opportunities",
        RecordKind::Sales => "sales",
        RecordKind::ActionItems => "action items",
    }
}

fn save_download(download: &Download, out_dir: Option<PathBuf>, session: &Session) -> Result<()> {
    let dir = out_dir.unwrap_or_else(|| session.config.export_dir());
    let path = write_download(&dir, &download.filename, &download.contents)?;
    println!("Saved {}", path.display().to_string().bright_green());
    Ok(())
}

/// Apply `--set`, `--remark` and `--pick-assignee` to the open form
fn fill_form<R: Record>(
    page: &mut Page<R>,
    assignments: &[String],
    remark: Option<&str>,
    pick: bool,
    employees: &[Employee],
) -> Result<()> {
    for raw in assignments {
        let (key, value) = parse_assignment(raw)?;
        let field = resolve_field_key::<R>(key)
            .with_context(|| format!("Unknown {} field '{}'", R::KIND.label().to_lowercase(), key))?;
        page.form
            .set_field(&field, value)
            .with_context(|| format!("Invalid value for '{}'", key))?;
        let listed = options_for(R::KIND, &field);
        if !value.is_empty() && listed.is_some_and(|options| !is_known(options, value)) {
            println!("  {} '{}' is not a listed option for '{}'", "warning:".yellow(), value, key);
        }
    }

    if pick {
        let include_groups = R::KIND == RecordKind::ActionItems;
        let assignee = pick_assignee(employees, include_groups)?;
        page.form.set_field(assignee_field(R::KIND), &assignee)?;
    }

    if let Some(text) = remark {
        page.form.set_remark(text)?;
    }
    Ok(())
}

/// Split `FIELD=VALUE` at the first `=`
fn parse_assignment(raw: &str) -> Result<(&str, &str)> {
    match raw.split_once('=') {
        Some((key, value)) if !key.trim().is_empty() => Ok((key.trim(), value)),
        _ => bail!("Expected FIELD=VALUE, got '{}'", raw),
    }
}

/// Accept a canonical field name or a header from the import template
fn resolve_field_key<R: Record>(key: &str) -> Option<String> {
    if R::is_known_field(key) {
        return Some(key.to_string());
    }
    match resolve_header(R::KIND, key) {
        (field, true) if R::is_known_field(&field) => Some(field),
        _ => None,
    }
}

fn assignee_field(kind: RecordKind) -> &'static str {
    match kind {
        RecordKind::Opportunities => "salesOwner",
        _ => "assignee",
    }
}

fn pick_assignee(employees: &[Employee], include_groups: bool) -> Result<String> {
    if !std::io::stdin().is_terminal() {
        bail!("--pick-assignee needs an interactive terminal");
    }
    let options = assignee_options(employees, include_groups);
    if options.is_empty() {
        bail!("No active employees to pick from, add some with 'crm-cli employees add'");
    }

    let query: String = Input::new()
        .with_prompt("Filter assignees")
        .allow_empty(true)
        .interact_text()
        .context("Failed to read assignee filter")?;
    let matches = filter_options(&options, &query);
    if matches.is_empty() {
        bail!("No assignee matches '{}'", query);
    }

    let labels: Vec<&str> = matches.iter().map(|o| o.label.as_str()).collect();
    let idx = Select::new()
        .with_prompt("Assignee")
        .items(&labels)
        .default(0)
        .interact()
        .context("Failed to read assignee choice")?;
    Ok(matches[idx].value.clone())
}
