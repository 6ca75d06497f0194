//! Thin service layer between the shell and the repository

use tracing::info;

use crate::error::Result;
use crate::models::project::Project;
use crate::storage::db::schema_statements;
use crate::storage::{Database, ProjectRepo};

pub struct ProjectService {
    db: Database,
}

impl ProjectService {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// Create the tables if they do not exist yet.
    pub fn create_schema(&self) -> Result<()> {
        ProjectRepo::new(&self.db).execute_batch(&schema_statements())?;
        info!("Applied database schema");
        Ok(())
    }

    pub fn add_project(&self, project: Project) -> Result<Project> {
        let project = ProjectRepo::new(&self.db).insert(project)?;
        info!(
            "Created project {} ({:?})",
            project.project_name, project.project_id
        );
        Ok(project)
    }

    pub fn fetch_all_projects(&self) -> Result<Vec<Project>> {
        ProjectRepo::new(&self.db).list()
    }

    pub fn fetch_project_by_id(&self, project_id: i64) -> Result<Option<Project>> {
        ProjectRepo::new(&self.db).get(project_id)
    }

    pub fn modify_project_details(&self, project: &Project) -> Result<bool> {
        let updated = ProjectRepo::new(&self.db).update(project)?;
        if updated {
            info!("Updated project {:?}", project.project_id);
        }
        Ok(updated)
    }

    pub fn delete_project(&self, project_id: i64) -> Result<bool> {
        let deleted = ProjectRepo::new(&self.db).delete(project_id)?;
        if deleted {
            info!("Deleted project {}", project_id);
        }
        Ok(deleted)
    }
}
