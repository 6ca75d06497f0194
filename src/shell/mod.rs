//! Interactive menu shell
//!
//! A blocking loop over a fixed menu. The shell holds at most one
//! "currently selected project"; errors raised during an iteration are
//! printed and the loop continues.

use std::io::{BufRead, Write};
use std::str::FromStr;

use rust_decimal::Decimal;

use crate::error::{Error, Result};
use crate::models::project::Project;
use crate::services::ProjectService;

const MENU: &[&str] = &[
    "1) Add a project",
    "2) List projects",
    "3) Select a project",
    "4) Update project details",
    "5) Delete a project",
];

/// The shell is generic over its streams so sessions can be scripted in
/// tests.
pub struct Shell<R, W> {
    input: R,
    out: W,
    service: ProjectService,
    cur_project: Option<Project>,
}

impl<R: BufRead, W: Write> Shell<R, W> {
    pub fn new(input: R, out: W, service: ProjectService) -> Self {
        Self {
            input,
            out,
            service,
            cur_project: None,
        }
    }

    /// Run the menu loop until the user exits with a blank selection.
    ///
    /// Validation and storage failures are printed and the loop continues;
    /// only I/O failures on the streams themselves end the session early.
    pub fn run(&mut self) -> Result<()> {
        loop {
            match self.process_selection() {
                Ok(true) => return Ok(()),
                Ok(false) => {}
                Err(Error::Io(e)) => return Err(Error::Io(e)),
                Err(e) => writeln!(self.out, "\nError: {e}")?,
            }
        }
    }

    fn process_selection(&mut self) -> Result<bool> {
        self.print_menu()?;

        match self.prompt_parse::<i64>("Enter a menu selection")? {
            None => {
                writeln!(self.out, "\nExiting the menu. Goodbye!")?;
                return Ok(true);
            }
            Some(1) => self.create_project()?,
            Some(2) => self.list_projects()?,
            Some(3) => self.select_project()?,
            Some(4) => self.update_project_details()?,
            Some(5) => self.delete_project()?,
            Some(other) => {
                writeln!(self.out, "\n{other} is not a valid selection. Try again.")?
            }
        }

        Ok(false)
    }

    fn print_menu(&mut self) -> Result<()> {
        writeln!(
            self.out,
            "\nThese are the available selections. Press the Enter key to quit:"
        )?;
        for line in MENU {
            writeln!(self.out, "   {line}")?;
        }
        Ok(())
    }

    fn create_project(&mut self) -> Result<()> {
        let Some(project_name) = self.prompt_string("Enter the project name")? else {
            writeln!(self.out, "\nNo name given, project not created.")?;
            return Ok(());
        };
        let estimated_hours = self.prompt_decimal("Enter the estimated hours")?;
        let actual_hours = self.prompt_decimal("Enter the actual hours")?;
        let difficulty = self.prompt_parse::<i32>("Enter the project difficulty (1-5)")?;
        let notes = self.prompt_string("Enter the project notes")?;

        let project = Project {
            project_name,
            estimated_hours,
            actual_hours,
            difficulty,
            notes,
            ..Project::default()
        };

        let created = self.service.add_project(project)?;
        writeln!(self.out, "\nYou have successfully created project:")?;
        write!(self.out, "{created}")?;
        Ok(())
    }

    fn list_projects(&mut self) -> Result<()> {
        let projects = self.service.fetch_all_projects()?;

        writeln!(self.out, "\nProjects:")?;
        for project in &projects {
            if let Some(id) = project.project_id {
                writeln!(self.out, "   {id}: {}", project.project_name)?;
            }
        }
        Ok(())
    }

    fn select_project(&mut self) -> Result<()> {
        self.list_projects()?;

        let Some(project_id) = self.prompt_parse::<i64>("Enter a project ID to select a project")?
        else {
            return Ok(());
        };

        // A failed lookup leaves no selection behind.
        self.cur_project = None;
        self.cur_project = self.service.fetch_project_by_id(project_id)?;

        match &self.cur_project {
            Some(project) => {
                writeln!(self.out, "\nYou are working with project:")?;
                write!(self.out, "{project}")?;
            }
            None => writeln!(self.out, "\nYou are not working with a project.")?,
        }
        Ok(())
    }

    fn update_project_details(&mut self) -> Result<()> {
        let Some(cur) = self.cur_project.clone() else {
            writeln!(self.out, "\nPlease select a project.")?;
            return Ok(());
        };

        writeln!(self.out, "\nCurrent project details:")?;
        write!(self.out, "{cur}")?;

        let name_prompt = format!(
            "Enter new project name (or press Enter to keep \"{}\")",
            cur.project_name
        );
        let project_name = self.prompt_string(&name_prompt)?;
        let estimated_hours =
            self.prompt_decimal("Enter new estimated hours (or press Enter to keep)")?;
        let actual_hours = self.prompt_decimal("Enter new actual hours (or press Enter to keep)")?;
        let difficulty = self.prompt_parse::<i32>("Enter new difficulty (or press Enter to keep)")?;
        let notes = self.prompt_string("Enter new notes (or press Enter to keep)")?;

        let updated = Project {
            project_id: cur.project_id,
            project_name: project_name.unwrap_or(cur.project_name),
            estimated_hours: estimated_hours.or(cur.estimated_hours),
            actual_hours: actual_hours.or(cur.actual_hours),
            difficulty: difficulty.or(cur.difficulty),
            notes: notes.or(cur.notes),
            ..Project::default()
        };

        if self.service.modify_project_details(&updated)? {
            if let Some(id) = updated.project_id {
                self.cur_project = self.service.fetch_project_by_id(id)?;
            }
            if let Some(project) = &self.cur_project {
                writeln!(self.out, "\nUpdated project details:")?;
                write!(self.out, "{project}")?;
            }
        } else {
            writeln!(self.out, "\nProject not found, nothing was updated.")?;
        }
        Ok(())
    }

    fn delete_project(&mut self) -> Result<()> {
        self.list_projects()?;

        let Some(project_id) = self.prompt_parse::<i64>("Enter the ID of the project to delete")?
        else {
            return Ok(());
        };

        if self.service.delete_project(project_id)? {
            writeln!(self.out, "\nProject {project_id} was deleted successfully.")?;
            if self.cur_project.as_ref().and_then(|p| p.project_id) == Some(project_id) {
                self.cur_project = None;
            }
        } else {
            writeln!(self.out, "\nProject {project_id} was not found.")?;
        }
        Ok(())
    }

    /// Prompt for one line of input. Blank input (and end of input) is
    /// `None`.
    fn prompt_string(&mut self, prompt: &str) -> Result<Option<String>> {
        write!(self.out, "{prompt}: ")?;
        self.out.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }

        let trimmed = line.trim();
        Ok(if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        })
    }

    fn prompt_parse<T: FromStr>(&mut self, prompt: &str) -> Result<Option<T>> {
        match self.prompt_string(prompt)? {
            None => Ok(None),
            Some(raw) => match raw.parse::<T>() {
                Ok(value) => Ok(Some(value)),
                Err(_) => Err(Error::InvalidNumber(raw)),
            },
        }
    }

    /// Decimal input is rescaled to 2 places on entry.
    fn prompt_decimal(&mut self, prompt: &str) -> Result<Option<Decimal>> {
        match self.prompt_string(prompt)? {
            None => Ok(None),
            Some(raw) => match raw.parse::<Decimal>() {
                Ok(mut value) => {
                    value.rescale(2);
                    Ok(Some(value))
                }
                Err(_) => Err(Error::InvalidDecimal(raw)),
            },
        }
    }
}
