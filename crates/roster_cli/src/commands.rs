//! Subcommand handlers.
//!
//! Each handler performs one service call and prints its notice.

use anyhow::{anyhow, bail, Result};
use chrono::Local;
use roster_core::{EmployeeForm, KeyValueStore, RecordService, ServiceError};
use std::path::Path;

type Service = RecordService<Box<dyn KeyValueStore>>;

/// Optional per-field overrides applied on top of an existing record.
#[derive(Debug, Default)]
pub struct FieldChanges {
    pub id: Option<String>,
    pub name: Option<String>,
    pub age: Option<String>,
    pub address: Option<String>,
}

impl FieldChanges {
    fn apply(self, form: &mut EmployeeForm) {
        if let Some(id) = self.id {
            form.id = id;
        }
        if let Some(name) = self.name {
            form.name = name;
        }
        if let Some(age) = self.age {
            form.age = age;
        }
        if let Some(address) = self.address {
            form.address = address;
        }
    }
}

pub fn list(service: &Service, query: &str) -> Result<()> {
    let rows = service.visible(query);
    if rows.is_empty() {
        println!("No employees found.");
        return Ok(());
    }

    println!("{:>5}  {:<8}  {:<24}  {:>4}  {}", "#", "ID", "Name", "Age", "Address");
    for (index, record) in rows {
        println!(
            "{:>5}  {:<8}  {:<24}  {:>4}  {}",
            index, record.id, record.name, record.age, record.address
        );
    }
    Ok(())
}

pub fn add(service: &mut Service, form: EmployeeForm) -> Result<()> {
    let notice = service.submit(form, "").map_err(user_facing)?;
    println!("{notice}");
    Ok(())
}

pub fn edit(service: &mut Service, index: usize, changes: FieldChanges) -> Result<()> {
    let mut form = service.edit_form(index).map_err(user_facing)?;
    changes.apply(&mut form);
    let notice = service
        .submit(form, &index.to_string())
        .map_err(user_facing)?;
    println!("{notice}");
    Ok(())
}

pub fn edit_id(service: &mut Service, id: &str, changes: FieldChanges) -> Result<()> {
    let Some(record) = service.store().find(id) else {
        bail!("employee not found: {id}");
    };
    let mut form = EmployeeForm::from_record(record);
    changes.apply(&mut form);
    let notice = service.submit_for_id(id, form).map_err(user_facing)?;
    println!("{notice}");
    Ok(())
}

pub fn delete(service: &mut Service, index: usize) -> Result<()> {
    let notice = service.delete(index).map_err(user_facing)?;
    println!("{notice}");
    Ok(())
}

pub fn delete_id(service: &mut Service, id: &str) -> Result<()> {
    let notice = service.delete_by_id(id).map_err(user_facing)?;
    println!("{notice}");
    Ok(())
}

pub fn clear(service: &mut Service, confirmed: bool) -> Result<()> {
    if !confirmed {
        bail!(
            "refusing to delete all {} records without --yes",
            service.store().len()
        );
    }
    let notice = service.clear_all().map_err(user_facing)?;
    println!("{notice}");
    Ok(())
}

pub fn seed(service: &mut Service) -> Result<()> {
    let notice = service.seed_samples().map_err(user_facing)?;
    println!("{notice}");
    Ok(())
}

pub fn export(service: &Service, dir: &Path, to_stdout: bool) -> Result<()> {
    if to_stdout {
        let csv = service
            .store()
            .export_csv()
            .map_err(|err| user_facing(err.into()))?;
        println!("{csv}");
        return Ok(());
    }

    let outcome = service
        .export(dir, Local::now().date_naive())
        .map_err(user_facing)?;
    println!(
        "{} ({} rows -> {})",
        outcome.notice,
        outcome.rows,
        outcome.path.display()
    );
    Ok(())
}

fn user_facing(err: ServiceError) -> anyhow::Error {
    anyhow!(err.user_message())
}

#[cfg(test)]
mod tests {
    use super::FieldChanges;
    use roster_core::EmployeeForm;

    #[test]
    fn changes_override_only_given_fields() {
        let mut form = EmployeeForm {
            id: "1".to_string(),
            name: "A".to_string(),
            age: "30".to_string(),
            address: "X".to_string(),
        };
        FieldChanges {
            age: Some("31".to_string()),
            ..FieldChanges::default()
        }
        .apply(&mut form);

        assert_eq!(form.age, "31");
        assert_eq!(form.name, "A");
        assert_eq!(form.id, "1");
    }
}
