//! Project repository: all SQL for projects and their child records

use rusqlite::{params, Row, Transaction};
use rust_decimal::Decimal;

use super::db::Database;
use crate::error::{Error, Result};
use crate::models::project::{Category, Material, Project, Step};

/// Repository for projects. Every method runs in its own
/// connection-scoped transaction.
pub struct ProjectRepo<'a> {
    db: &'a Database,
}

impl<'a> ProjectRepo<'a> {
    pub fn new(db: &'a Database) -> Self {
        Self { db }
    }

    /// Insert a project and return it with the generated id set.
    pub fn insert(&self, mut project: Project) -> Result<Project> {
        self.db.with_transaction(move |tx| {
            tx.execute(
                "INSERT INTO project (project_name, estimated_hours, actual_hours, difficulty, notes)
                 VALUES (?, ?, ?, ?, ?)",
                params![
                    project.project_name,
                    decimal_to_sql(project.estimated_hours),
                    decimal_to_sql(project.actual_hours),
                    project.difficulty,
                    project.notes,
                ],
            )?;

            project.project_id = Some(tx.last_insert_rowid());
            Ok(project)
        })
    }

    /// All projects ordered by name, without child records.
    pub fn list(&self) -> Result<Vec<Project>> {
        self.db.with_transaction(|tx| {
            let mut stmt = tx.prepare(
                "SELECT project_id, project_name, estimated_hours, actual_hours, difficulty, notes
                 FROM project
                 ORDER BY project_name",
            )?;

            let rows = stmt.query_map([], project_from_row)?;

            let mut projects = Vec::new();
            for row in rows {
                projects.push(row?);
            }
            Ok(projects)
        })
    }

    /// A single project by id, with materials, steps, and categories
    /// populated. No matching row is `Ok(None)`, not an error.
    pub fn get(&self, project_id: i64) -> Result<Option<Project>> {
        self.db.with_transaction(|tx| {
            let mut stmt = tx.prepare(
                "SELECT project_id, project_name, estimated_hours, actual_hours, difficulty, notes
                 FROM project
                 WHERE project_id = ?",
            )?;

            let mut project = match stmt.query_row([project_id], project_from_row) {
                Ok(project) => project,
                Err(rusqlite::Error::QueryReturnedNoRows) => return Ok(None),
                Err(e) => return Err(Error::from(e)),
            };

            project.materials = materials_for_project(tx, project_id)?;
            project.steps = steps_for_project(tx, project_id)?;
            project.categories = categories_for_project(tx, project_id)?;

            Ok(Some(project))
        })
    }

    /// Replace all mutable fields by id. Returns whether exactly one row
    /// was affected; an unknown id is `false`, not an error.
    pub fn update(&self, project: &Project) -> Result<bool> {
        self.db.with_transaction(|tx| {
            let rows = tx.execute(
                "UPDATE project
                 SET project_name = ?, estimated_hours = ?, actual_hours = ?, difficulty = ?, notes = ?
                 WHERE project_id = ?",
                params![
                    project.project_name,
                    decimal_to_sql(project.estimated_hours),
                    decimal_to_sql(project.actual_hours),
                    project.difficulty,
                    project.notes,
                    project.project_id,
                ],
            )?;
            Ok(rows == 1)
        })
    }

    /// Delete by id, with the same one-row-affected semantics as `update`.
    pub fn delete(&self, project_id: i64) -> Result<bool> {
        self.db.with_transaction(|tx| {
            let rows = tx.execute("DELETE FROM project WHERE project_id = ?", [project_id])?;
            Ok(rows == 1)
        })
    }

    /// Execute an ordered list of raw statements as one transaction.
    /// Any failure rolls back the whole batch.
    pub fn execute_batch<S: AsRef<str>>(&self, statements: &[S]) -> Result<()> {
        self.db.with_transaction(|tx| {
            for sql in statements {
                tx.execute_batch(sql.as_ref())?;
            }
            Ok(())
        })
    }
}

fn project_from_row(row: &Row<'_>) -> rusqlite::Result<Project> {
    Ok(Project {
        project_id: row.get(0)?,
        project_name: row.get(1)?,
        estimated_hours: decimal_from_sql(row, 2)?,
        actual_hours: decimal_from_sql(row, 3)?,
        difficulty: row.get(4)?,
        notes: row.get(5)?,
        materials: Vec::new(),
        steps: Vec::new(),
        categories: Vec::new(),
    })
}

fn materials_for_project(tx: &Transaction<'_>, project_id: i64) -> Result<Vec<Material>> {
    let mut stmt = tx.prepare(
        "SELECT material_id, project_id, material_name, num_required, cost
         FROM material
         WHERE project_id = ?",
    )?;

    let rows = stmt.query_map([project_id], |row| {
        Ok(Material {
            material_id: row.get(0)?,
            project_id: row.get(1)?,
            material_name: row.get(2)?,
            num_required: row.get(3)?,
            cost: decimal_from_sql(row, 4)?,
        })
    })?;

    let mut materials = Vec::new();
    for row in rows {
        materials.push(row?);
    }
    Ok(materials)
}

fn steps_for_project(tx: &Transaction<'_>, project_id: i64) -> Result<Vec<Step>> {
    let mut stmt = tx.prepare(
        "SELECT step_id, project_id, step_text, step_order
         FROM step
         WHERE project_id = ?
         ORDER BY step_order",
    )?;

    let rows = stmt.query_map([project_id], |row| {
        Ok(Step {
            step_id: row.get(0)?,
            project_id: row.get(1)?,
            step_text: row.get(2)?,
            step_order: row.get(3)?,
        })
    })?;

    let mut steps = Vec::new();
    for row in rows {
        steps.push(row?);
    }
    Ok(steps)
}

fn categories_for_project(tx: &Transaction<'_>, project_id: i64) -> Result<Vec<Category>> {
    let mut stmt = tx.prepare(
        "SELECT c.category_id, c.category_name
         FROM category c
         JOIN project_category pc USING (category_id)
         WHERE pc.project_id = ?
         ORDER BY c.category_name",
    )?;

    let rows = stmt.query_map([project_id], |row| {
        Ok(Category {
            category_id: row.get(0)?,
            category_name: row.get(1)?,
        })
    })?;

    let mut categories = Vec::new();
    for row in rows {
        categories.push(row?);
    }
    Ok(categories)
}

/// Decimal columns are stored as TEXT, rescaled to 2 decimal places so the
/// stored form re-reads identically.
fn decimal_to_sql(value: Option<Decimal>) -> Option<String> {
    value.map(|mut d| {
        d.rescale(2);
        d.to_string()
    })
}

fn decimal_from_sql(row: &Row<'_>, idx: usize) -> rusqlite::Result<Option<Decimal>> {
    let raw: Option<String> = row.get(idx)?;
    raw.map(|s| {
        s.parse::<Decimal>().map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(idx, rusqlite::types::Type::Text, Box::new(e))
        })
    })
    .transpose()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::db::{open_database, schema_statements};
    use std::path::Path;
    use tempfile::tempdir;

    fn test_db(dir: &Path) -> Database {
        let db = open_database(&dir.join("test.sqlite")).unwrap();
        ProjectRepo::new(&db)
            .execute_batch(&schema_statements())
            .unwrap();
        db
    }

    fn sample_project() -> Project {
        Project {
            project_name: "Bookshelf".to_string(),
            estimated_hours: Some("4.50".parse().unwrap()),
            actual_hours: Some("6.00".parse().unwrap()),
            difficulty: Some(3),
            notes: Some("use oak boards".to_string()),
            ..Project::default()
        }
    }

    #[test]
    fn test_insert_assigns_id_and_round_trips() {
        let dir = tempdir().unwrap();
        let db = test_db(dir.path());
        let repo = ProjectRepo::new(&db);

        let created = repo.insert(sample_project()).unwrap();
        let id = created.project_id.expect("id assigned on insert");

        let fetched = repo.get(id).unwrap().expect("project exists");
        assert_eq!(fetched.project_id, Some(id));
        assert_eq!(fetched.project_name, "Bookshelf");
        assert_eq!(fetched.estimated_hours, Some("4.50".parse().unwrap()));
        assert_eq!(fetched.actual_hours, Some("6.00".parse().unwrap()));
        assert_eq!(fetched.difficulty, Some(3));
        assert_eq!(fetched.notes.as_deref(), Some("use oak boards"));
    }

    #[test]
    fn test_hours_persist_at_two_decimal_places() {
        let dir = tempdir().unwrap();
        let db = test_db(dir.path());
        let repo = ProjectRepo::new(&db);

        let project = Project {
            project_name: "Planter box".to_string(),
            estimated_hours: Some("3".parse().unwrap()),
            ..Project::default()
        };

        let id = repo.insert(project).unwrap().project_id.unwrap();
        let fetched = repo.get(id).unwrap().unwrap();

        assert_eq!(fetched.estimated_hours.unwrap().to_string(), "3.00");
    }

    #[test]
    fn test_list_empty_store() {
        let dir = tempdir().unwrap();
        let db = test_db(dir.path());

        let projects = ProjectRepo::new(&db).list().unwrap();
        assert!(projects.is_empty());
    }

    #[test]
    fn test_list_is_ordered_by_name_and_shallow() {
        let dir = tempdir().unwrap();
        let db = test_db(dir.path());
        let repo = ProjectRepo::new(&db);

        for name in ["Workbench", "Birdhouse", "Planter box"] {
            repo.insert(Project {
                project_name: name.to_string(),
                ..Project::default()
            })
            .unwrap();
        }

        let projects = repo.list().unwrap();
        let names: Vec<&str> = projects.iter().map(|p| p.project_name.as_str()).collect();
        assert_eq!(names, ["Birdhouse", "Planter box", "Workbench"]);
        assert!(projects.iter().all(|p| p.materials.is_empty()
            && p.steps.is_empty()
            && p.categories.is_empty()));
    }

    #[test]
    fn test_get_populates_children() {
        let dir = tempdir().unwrap();
        let db = test_db(dir.path());
        let repo = ProjectRepo::new(&db);

        let id = repo.insert(sample_project()).unwrap().project_id.unwrap();

        repo.execute_batch(&[
            format!(
                "INSERT INTO material (project_id, material_name, num_required, cost)
                 VALUES ({id}, 'oak board', 4, '12.00')"
            ),
            format!(
                "INSERT INTO material (project_id, material_name, num_required, cost)
                 VALUES ({id}, 'wood screws', 24, '0.10')"
            ),
            format!(
                "INSERT INTO step (project_id, step_text, step_order)
                 VALUES ({id}, 'Cut boards to length', 1)"
            ),
            "INSERT INTO category (category_name) VALUES ('Woodworking')".to_string(),
            format!(
                "INSERT INTO project_category (project_id, category_id)
                 VALUES ({id}, 1)"
            ),
        ])
        .unwrap();

        let fetched = repo.get(id).unwrap().unwrap();
        assert_eq!(fetched.materials.len(), 2);
        assert_eq!(fetched.steps.len(), 1);
        assert_eq!(fetched.steps[0].step_text, "Cut boards to length");
        assert_eq!(fetched.categories.len(), 1);
        assert_eq!(fetched.categories[0].category_name, "Woodworking");
    }

    #[test]
    fn test_get_unknown_id_is_none() {
        let dir = tempdir().unwrap();
        let db = test_db(dir.path());

        let fetched = ProjectRepo::new(&db).get(42).unwrap();
        assert!(fetched.is_none());
    }

    #[test]
    fn test_update_replaces_all_fields() {
        let dir = tempdir().unwrap();
        let db = test_db(dir.path());
        let repo = ProjectRepo::new(&db);

        let created = repo.insert(sample_project()).unwrap();
        let id = created.project_id.unwrap();

        let updated = Project {
            project_id: Some(id),
            project_name: "Corner bookshelf".to_string(),
            estimated_hours: Some("5.25".parse().unwrap()),
            actual_hours: Some("7.75".parse().unwrap()),
            difficulty: Some(4),
            notes: Some("sand before assembly".to_string()),
            ..Project::default()
        };

        assert!(repo.update(&updated).unwrap());

        let fetched = repo.get(id).unwrap().unwrap();
        assert_eq!(fetched.project_name, "Corner bookshelf");
        assert_eq!(fetched.estimated_hours, Some("5.25".parse().unwrap()));
        assert_eq!(fetched.actual_hours, Some("7.75".parse().unwrap()));
        assert_eq!(fetched.difficulty, Some(4));
        assert_eq!(fetched.notes.as_deref(), Some("sand before assembly"));
    }

    #[test]
    fn test_update_unknown_id_is_false() {
        let dir = tempdir().unwrap();
        let db = test_db(dir.path());

        let ghost = Project {
            project_id: Some(99),
            project_name: "Ghost".to_string(),
            ..Project::default()
        };
        assert!(!ProjectRepo::new(&db).update(&ghost).unwrap());
    }

    #[test]
    fn test_delete_removes_project() {
        let dir = tempdir().unwrap();
        let db = test_db(dir.path());
        let repo = ProjectRepo::new(&db);

        let id = repo.insert(sample_project()).unwrap().project_id.unwrap();

        assert!(repo.delete(id).unwrap());
        assert!(repo.get(id).unwrap().is_none());
    }

    #[test]
    fn test_delete_unknown_id_is_false() {
        let dir = tempdir().unwrap();
        let db = test_db(dir.path());

        assert!(!ProjectRepo::new(&db).delete(42).unwrap());
    }

    #[test]
    fn test_failing_batch_rolls_back_entirely() {
        let dir = tempdir().unwrap();
        let db = test_db(dir.path());
        let repo = ProjectRepo::new(&db);

        let result = repo.execute_batch(&[
            "INSERT INTO project (project_name) VALUES ('first')",
            "INSERT INTO no_such_table (x) VALUES (1)",
            "INSERT INTO project (project_name) VALUES ('second')",
        ]);

        assert!(matches!(result, Err(Error::Storage(_))));
        assert!(repo.list().unwrap().is_empty());
    }
}
