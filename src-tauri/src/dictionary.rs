//! Bundled reference data: the MELD questionnaire form definition and
//! the lesion-entity dictionary. Both ship as JSON resources, are seeded
//! into lookup tables at startup and are read-only afterwards.

use rusqlite::{params, Connection};
use serde::{Deserialize, Serialize};

use crate::db::DatabaseError;

const FORM_JSON: &str = include_str!("../resources/form.json");
const ENTITIES_JSON: &str = include_str!("../resources/entities.json");

/// One control of the questionnaire form.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FormControl {
    pub name: String,
    #[serde(rename = "type")]
    pub control_type: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub note: String,
    #[serde(default)]
    pub required: i64,
    #[serde(default)]
    pub section: String,
    #[serde(default)]
    pub choices: Vec<Choice>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Choice {
    pub value: String,
    pub label: String,
}

/// One group of the pathological-entity dictionary.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntityGroup {
    pub group_name: String,
    pub group_code: String,
    pub entities: Vec<Entity>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Entity {
    pub name: String,
    pub code: String,
}

/// Seed the lookup tables from the bundled JSON. Runs on every open;
/// `INSERT OR REPLACE` keeps the tables in step with the shipped
/// resources after an app update.
pub fn seed_reference_data(conn: &Connection) -> Result<(), DatabaseError> {
    let controls: Vec<FormControl> = serde_json::from_str(FORM_JSON)
        .map_err(|e| DatabaseError::ReferenceData(format!("form.json: {e}")))?;
    let groups: Vec<EntityGroup> = serde_json::from_str(ENTITIES_JSON)
        .map_err(|e| DatabaseError::ReferenceData(format!("entities.json: {e}")))?;

    for (position, control) in controls.iter().enumerate() {
        let choices = serde_json::to_string(&control.choices)
            .map_err(|e| DatabaseError::ReferenceData(e.to_string()))?;
        conn.execute(
            "INSERT OR REPLACE INTO form_controls
                 (name, control_type, content, note, required, section, choices, position)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            params![
                control.name,
                control.control_type,
                control.content,
                control.note,
                control.required,
                control.section,
                choices,
                position as i64,
            ],
        )?;
    }

    for group in &groups {
        for (position, entity) in group.entities.iter().enumerate() {
            conn.execute(
                "INSERT OR REPLACE INTO entities
                     (code, name, group_code, group_name, position)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                params![
                    entity.code,
                    entity.name,
                    group.group_code,
                    group.group_name,
                    position as i64,
                ],
            )?;
        }
    }

    tracing::debug!(
        controls = controls.len(),
        groups = groups.len(),
        "Reference data seeded"
    );
    Ok(())
}

/// Form definition in declaration order, for the form renderer.
pub fn form_definition(conn: &Connection) -> Result<Vec<FormControl>, DatabaseError> {
    let mut stmt = conn.prepare(
        "SELECT name, control_type, content, note, required, section, choices
         FROM form_controls ORDER BY position",
    )?;

    let rows = stmt.query_map([], |row| {
        Ok((
            row.get::<_, String>(0)?,
            row.get::<_, String>(1)?,
            row.get::<_, String>(2)?,
            row.get::<_, String>(3)?,
            row.get::<_, i64>(4)?,
            row.get::<_, String>(5)?,
            row.get::<_, String>(6)?,
        ))
    })?;

    let mut controls = Vec::new();
    for row in rows {
        let (name, control_type, content, note, required, section, choices) = row?;
        controls.push(FormControl {
            name,
            control_type,
            content,
            note,
            required,
            section,
            choices: serde_json::from_str(&choices)
                .map_err(|e| DatabaseError::ReferenceData(e.to_string()))?,
        });
    }
    Ok(controls)
}

/// Entity dictionary regrouped for the dictionary viewer.
pub fn entity_groups(conn: &Connection) -> Result<Vec<EntityGroup>, DatabaseError> {
    let mut stmt = conn.prepare(
        "SELECT code, name, group_code, group_name
         FROM entities ORDER BY group_name, position",
    )?;

    let rows = stmt.query_map([], |row| {
        Ok((
            row.get::<_, String>(0)?,
            row.get::<_, String>(1)?,
            row.get::<_, String>(2)?,
            row.get::<_, String>(3)?,
        ))
    })?;

    let mut groups: Vec<EntityGroup> = Vec::new();
    for row in rows {
        let (code, name, group_code, group_name) = row?;
        match groups.last_mut().filter(|g| g.group_code == group_code) {
            Some(group) => group.entities.push(Entity { name, code }),
            None => groups.push(EntityGroup {
                group_name,
                group_code,
                entities: vec![Entity { name, code }],
            }),
        }
    }
    Ok(groups)
}
