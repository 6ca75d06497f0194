use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A DIY project with effort estimates and notes.
///
/// Child collections are populated only when a single project is fetched by
/// id; bulk listings leave them empty.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Project {
    pub project_id: Option<i64>,
    pub project_name: String,
    pub estimated_hours: Option<Decimal>,
    pub actual_hours: Option<Decimal>,
    pub difficulty: Option<i32>,
    pub notes: Option<String>,
    #[serde(default)]
    pub materials: Vec<Material>,
    #[serde(default)]
    pub steps: Vec<Step>,
    #[serde(default)]
    pub categories: Vec<Category>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Material {
    pub material_id: i64,
    pub project_id: i64,
    pub material_name: String,
    pub num_required: Option<i32>,
    pub cost: Option<Decimal>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Step {
    pub step_id: i64,
    pub project_id: i64,
    pub step_text: String,
    pub step_order: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Category {
    pub category_id: i64,
    pub category_name: String,
}

impl fmt::Display for Project {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.project_id {
            Some(id) => writeln!(f, "   ID={id} name={}", self.project_name)?,
            None => writeln!(f, "   name={}", self.project_name)?,
        }
        if let Some(hours) = self.estimated_hours {
            writeln!(f, "   Estimated hours: {hours}")?;
        }
        if let Some(hours) = self.actual_hours {
            writeln!(f, "   Actual hours: {hours}")?;
        }
        if let Some(difficulty) = self.difficulty {
            writeln!(f, "   Difficulty: {difficulty}")?;
        }
        if let Some(notes) = &self.notes {
            writeln!(f, "   Notes: {notes}")?;
        }
        if !self.materials.is_empty() {
            writeln!(f, "   Materials:")?;
            for material in &self.materials {
                writeln!(f, "      {material}")?;
            }
        }
        if !self.steps.is_empty() {
            writeln!(f, "   Steps:")?;
            for step in &self.steps {
                writeln!(f, "      {step}")?;
            }
        }
        if !self.categories.is_empty() {
            writeln!(f, "   Categories:")?;
            for category in &self.categories {
                writeln!(f, "      {category}")?;
            }
        }
        Ok(())
    }
}

impl fmt::Display for Material {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.material_name)?;
        if let Some(num) = self.num_required {
            write!(f, " x{num}")?;
        }
        if let Some(cost) = self.cost {
            write!(f, " @ {cost}")?;
        }
        Ok(())
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.step_order, self.step_text)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.category_name)
    }
}
