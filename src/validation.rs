use crate::errors::{ValidationError, ValidationResult};

/// A trait that criteria/options types implement for validation.
pub trait Validate {
    /// Validates the value and returns the first error encountered.
    fn validate(&self) -> ValidationResult<()>;
}

/// Struct for configuring validations in a fluent style
#[derive(Default)]
pub struct ValidationBuilder<T> {
    field_name: String,
    value: Option<T>,
    errors: Vec<ValidationError>,
}

impl<T> ValidationBuilder<T> {
    pub fn new(field_name: &str, value: Option<T>) -> Self {
        Self {
            field_name: field_name.to_string(),
            value,
            errors: Vec::new(),
        }
    }

    pub fn required(mut self) -> Self
    where
        T: Default + PartialEq,
    {
        if self.value.is_none() || self.value == Some(T::default()) {
            self.errors.push(ValidationError::required(&self.field_name));
        }
        self
    }

    pub fn validate_with<F>(mut self, validator: F) -> Self
    where
        F: FnOnce(&T) -> Result<(), ValidationError>,
    {
        if let Some(value) = &self.value {
            if let Err(err) = validator(value) {
                self.errors.push(err);
            }
        }
        self
    }

    /// Complete validation and return result
    pub fn validate(self) -> ValidationResult<()> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            // Return the first error for simplicity
            Err(self.errors[0].clone())
        }
    }
}

/// String-specific validations
impl ValidationBuilder<String> {
    pub fn min_length(mut self, min: usize) -> Self {
        if let Some(value) = &self.value {
            if value.len() < min {
                self.errors
                    .push(ValidationError::min_length(&self.field_name, min));
            }
        }
        self
    }
}

/// Numeric validations used by query limits and level bounds
impl ValidationBuilder<usize> {
    pub fn at_least(mut self, min: usize) -> Self {
        if let Some(value) = &self.value {
            if *value < min {
                self.errors.push(ValidationError::range(
                    &self.field_name,
                    &min.to_string(),
                    "unbounded",
                ));
            }
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_required() {
        let result = ValidationBuilder::new("name", Some("".to_string()))
            .required()
            .validate();
        assert!(result.is_err());

        let result = ValidationBuilder::new("name", Some("report".to_string()))
            .required()
            .validate();
        assert!(result.is_ok());
    }

    #[test]
    fn test_min_length() {
        let result = ValidationBuilder::new("name", Some("ab".to_string()))
            .min_length(3)
            .validate();
        assert!(result.is_err());
    }

    #[test]
    fn test_at_least() {
        let result = ValidationBuilder::new("limit", Some(0usize))
            .at_least(1)
            .validate();
        assert!(result.is_err());

        let result = ValidationBuilder::new("limit", Some(10usize))
            .at_least(1)
            .validate();
        assert!(result.is_ok());

        // Absent optional values pass untouched
        let result = ValidationBuilder::new("limit", None::<usize>)
            .at_least(1)
            .validate();
        assert!(result.is_ok());
    }

    #[test]
    fn test_validate_with() {
        let result = ValidationBuilder::new("field", Some(5usize))
            .validate_with(|v| {
                if *v > 3 {
                    Err(ValidationError::invalid_value("field", "too large"))
                } else {
                    Ok(())
                }
            })
            .validate();
        assert!(result.is_err());
    }
}
