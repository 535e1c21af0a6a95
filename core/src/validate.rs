//! Request-side validation for policies and policy ids.

use crate::error::ValidationError;
use crate::types::{PolicySettings, RuleType};

/// Maximum policy description length, in characters.
pub const MAX_DESCRIPTION_LENGTH: usize = 500;

impl PolicySettings {
    /// Check the fields the API would reject.
    ///
    /// Checks run in order (name, description, rule type) and the first
    /// failure is returned.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.validate_name()?;

        let length = self.description.chars().count();
        if length > MAX_DESCRIPTION_LENGTH {
            return Err(ValidationError::Description { length });
        }

        self.rule_type.parse::<RuleType>()?;
        Ok(())
    }

    /// The name must contain at least one non-whitespace character.
    pub fn validate_name(&self) -> Result<(), ValidationError> {
        if self.name.trim().is_empty() {
            return Err(ValidationError::Name);
        }
        Ok(())
    }
}

/// Policy ids are opaque but must not be empty or whitespace-only.
pub fn validate_policy_id(id: &str) -> Result<(), ValidationError> {
    if id.trim().is_empty() {
        return Err(ValidationError::Id);
    }
    Ok(())
}
