use std::{collections::BTreeSet, fmt};

use tracing::warn;

use crate::{application::error::ApplicationError, domain::models::file::FileReference};

/// Field separator in the storage addressing scheme.
pub const RESERVED_DELIMITER: char = ',';

const PARENT_DIR_MARKER: &str = "..";

/// Characters that change meaning once a key is placed in a path or URL.
const FORBIDDEN_CHARS: &[char] = &['\\', '\0', '%', '?', '#'];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReferenceField {
    Category,
    Name,
}

impl fmt::Display for ReferenceField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReferenceField::Category => f.write_str("category"),
            ReferenceField::Name => f.write_str("name"),
        }
    }
}

/// Checks untrusted category/name pairs before anything touches storage.
#[derive(Debug, Clone)]
pub struct ReferenceValidator {
    categories: BTreeSet<String>,
}

impl ReferenceValidator {
    pub fn new(categories: BTreeSet<String>) -> Self {
        Self { categories }
    }

    pub fn validate(
        &self,
        category: Option<&str>,
        name: Option<&str>,
    ) -> Result<FileReference, ApplicationError> {
        let category = require(ReferenceField::Category, category)?;
        let name = require(ReferenceField::Name, name)?;

        check_segment(ReferenceField::Category, category)?;
        check_segment(ReferenceField::Name, name)?;

        if name.contains('/') {
            return Err(reject(ReferenceField::Name, name, "contains a path separator"));
        }

        if !self.categories.contains(category) {
            return Err(reject(
                ReferenceField::Category,
                category,
                "is not an allowed category",
            ));
        }

        Ok(FileReference::new(category, name))
    }
}

fn require(field: ReferenceField, value: Option<&str>) -> Result<&str, ApplicationError> {
    value.ok_or_else(|| {
        warn!("Rejected file reference: missing {}", field);
        ApplicationError::InvalidReference(format!("missing {}", field))
    })
}

/// Rules shared by every untrusted reference field.
pub fn check_segment(field: ReferenceField, value: &str) -> Result<(), ApplicationError> {
    if value.is_empty() {
        return Err(reject(field, value, "is empty"));
    }
    if value.contains(PARENT_DIR_MARKER) {
        return Err(reject(field, value, "contains a parent directory marker"));
    }
    if value.contains(RESERVED_DELIMITER) {
        return Err(reject(field, value, "contains the reserved delimiter"));
    }
    if value.contains(FORBIDDEN_CHARS) {
        return Err(reject(field, value, "contains a forbidden character"));
    }
    if value.starts_with('/') || value.ends_with('/') {
        return Err(reject(field, value, "has a leading or trailing separator"));
    }
    Ok(())
}

fn reject(field: ReferenceField, value: &str, reason: &str) -> ApplicationError {
    warn!("Rejected file reference: {} {:?} {}", field, value, reason);
    ApplicationError::InvalidReference(format!("{} {}", field, reason))
}
