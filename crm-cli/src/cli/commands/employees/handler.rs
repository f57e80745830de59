use anyhow::{Context, Result, bail};
use chrono::Local;
use colored::*;
use dialoguer::{Input, Select};
use is_terminal::IsTerminal;

use super::EmployeeCommands;
use crate::cli::Session;
use crate::cli::output::render_table;
use crate::models::{Employee, EmployeeStatus, UserRole, record_id};
use crate::store::RecordStore;

pub fn handle_employee_command(command: EmployeeCommands, session: &Session) -> Result<()> {
    let mut store = RecordStore::load(&session.data_file)?;

    match command {
        EmployeeCommands::List => {
            if store.employees().is_empty() {
                println!("{}", "No employees yet".dimmed());
                return Ok(());
            }
            let rows: Vec<Vec<String>> = store
                .employees()
                .iter()
                .map(|e| {
                    let status = match e.status {
                        EmployeeStatus::Active => e.status.label().green().to_string(),
                        EmployeeStatus::Inactive => e.status.label().dimmed().to_string(),
                    };
                    vec![e.id.clone(), e.name.clone(), e.role.to_string(), status]
                })
                .collect();
            print!("{}", render_table(&["ID", "Name", "Role", "Status"], &rows));
        }

        EmployeeCommands::Add {
            name,
            role,
            id,
            inactive,
        } => {
            let name = match name {
                Some(name) => name,
                None => prompt_name()?,
            };
            if name.trim().is_empty() {
                bail!("Employee name cannot be blank");
            }
            let role = match role {
                Some(role) => UserRole::from_label(&role),
                None => prompt_role()?,
            };
            let employee = Employee {
                id: id.unwrap_or_else(|| record_id("EMP", &Local::now())),
                name: name.trim().to_string(),
                role,
                status: if inactive {
                    EmployeeStatus::Inactive
                } else {
                    EmployeeStatus::Active
                },
            };

            println!(
                "Saved employee {} as {}",
                employee.picker_label().bright_green(),
                employee.id.cyan()
            );
            store.add_employee(employee);
            store.save()?;
        }
    }

    Ok(())
}

fn require_terminal(what: &str) -> Result<()> {
    if !std::io::stdin().is_terminal() {
        bail!("Missing {}; pass it as an argument when not running interactively", what);
    }
    Ok(())
}

fn prompt_name() -> Result<String> {
    require_terminal("employee name")?;
    Input::new()
        .with_prompt("Name")
        .interact_text()
        .context("Failed to read employee name")
}

fn prompt_role() -> Result<UserRole> {
    require_terminal("employee role")?;
    let roles = UserRole::all_variants();
    let labels: Vec<&str> = roles.iter().map(|r| r.label()).collect();
    let idx = Select::new()
        .with_prompt("Role")
        .items(&labels)
        .default(0)
        .interact()
        .context("Failed to read employee role")?;
    Ok(roles[idx].clone())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use std::path::PathBuf;

    #[test]
    fn test_add_employee_with_arguments() {
        let dir = std::env::temp_dir().join(format!("crm-cli-employees-{}", std::process::id()));
        let session = Session::new(
            Config::default(),
            Some("maya".to_string()),
            None,
            Some(dir.join("records.json")),
        );

        handle_employee_command(
            EmployeeCommands::Add {
                name: Some(" Ana Silva ".to_string()),
                role: Some("presales consultant".to_string()),
                id: Some("EMP-7".to_string()),
                inactive: true,
            },
            &session,
        )
        .unwrap();

        let store = RecordStore::load(PathBuf::from(&session.data_file)).unwrap();
        let employee = &store.employees()[0];
        assert_eq!(employee.id, "EMP-7");
        assert_eq!(employee.name, "Ana Silva");
        assert_eq!(employee.role, UserRole::PresalesConsultant);
        assert!(!employee.is_active());

        std::fs::remove_dir_all(&dir).ok();
    }
}
