//! Field-level rules for support persons.
//!
//! Every rule runs; violations accumulate so the caller sees all of them at
//! once.

use validator::ValidateEmail as _;

use crate::{
  error::{FieldError, ValidationFailure},
  person::{PersonStatus, Seniority, SupportPerson, SupportPersonInput},
};

// ── Limits ──────────────────────────────────────────────────────────────

pub const ALIAS_LEN: (usize, usize) = (3, 50);
pub const NAME_LEN: (usize, usize) = (2, 100);
pub const SPECIALIZATION_LEN: (usize, usize) = (2, 50);
pub const MAX_SPECIALIZATIONS: usize = 10;
pub const MAX_WORKLOAD: i64 = 100;
pub const RATING_RANGE: (f64, f64) = (1.0, 5.0);

/// The closed vocabulary of specializations.
pub const APPROVED_SPECIALIZATIONS: [&str; 11] = [
  "Authentication",
  "Network Security",
  "Windows Server",
  "Database",
  "Performance Tuning",
  "Cloud Services",
  "Azure Active Directory",
  "Email Systems",
  "Backup & Recovery",
  "Hardware",
  "Mobile Devices",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationMode {
  Create,
  /// The alias is supplied out of band and may be omitted from the payload.
  Update,
}

fn blank(value: Option<&str>) -> Option<&str> { value.filter(|v| !v.trim().is_empty()) }

fn within(value: &str, (min, max): (usize, usize)) -> bool {
  (min..=max).contains(&value.chars().count())
}

fn is_alias_char(c: char) -> bool { c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') }

/// Validate `input` and, if it passes, build the person it describes.
///
/// The returned person is active. In [`ValidationMode::Update`] with no alias
/// in the payload the alias is left empty for the caller to fill in.
pub fn validate_person(
  input: &SupportPersonInput,
  mode: ValidationMode,
) -> Result<SupportPerson, ValidationFailure> {
  let mut errors = Vec::new();

  match blank(input.alias.as_deref()) {
    None if mode == ValidationMode::Create => {
      errors.push(FieldError::new("alias", "Alias is required"));
    }
    None => {}
    Some(alias) => {
      if !within(alias, ALIAS_LEN) {
        errors.push(FieldError::new("alias", "Alias must be between 3-50 characters"));
      }
      if !alias.chars().all(is_alias_char) {
        errors.push(FieldError::new(
          "alias",
          "Alias can only contain alphanumeric characters, underscore, hyphen, and period",
        ));
      }
    }
  }

  match blank(input.name.as_deref()) {
    None => errors.push(FieldError::new("name", "Name is required")),
    Some(name) if !within(name, NAME_LEN) => {
      errors.push(FieldError::new("name", "Name must be between 2-100 characters"));
    }
    Some(_) => {}
  }

  match blank(input.email.as_deref()) {
    None => errors.push(FieldError::new("email", "Email is required")),
    Some(email) if !email.validate_email() => {
      errors.push(FieldError::new("email", "Invalid email format").with_value(email));
    }
    Some(_) => {}
  }

  if input.specializations.is_empty() {
    errors.push(FieldError::new("specializations", "At least one specialization is required"));
  } else {
    if input.specializations.len() > MAX_SPECIALIZATIONS {
      errors.push(FieldError::new("specializations", "Maximum 10 specializations allowed"));
    }
    for (i, spec) in input.specializations.iter().enumerate() {
      if spec.trim().is_empty() || !within(spec, SPECIALIZATION_LEN) {
        errors.push(
          FieldError::new("specializations", "Each specialization must be between 2-50 characters")
            .with_value(spec.as_str()),
        );
      } else if !APPROVED_SPECIALIZATIONS.contains(&spec.as_str()) {
        errors.push(
          FieldError::new("specializations", format!("Specialization '{spec}' is not from the approved list"))
            .with_value(spec.as_str()),
        );
      } else if input.specializations[..i].contains(spec) {
        errors.push(
          FieldError::new("specializations", format!("Specialization '{spec}' is listed more than once"))
            .with_value(spec.as_str()),
        );
      }
    }
  }

  let seniority = match blank(input.seniority.as_deref()) {
    None => {
      errors.push(FieldError::new("seniority", "Seniority is required"));
      None
    }
    Some(level) => match level.parse::<Seniority>() {
      Ok(level) => Some(level),
      Err(_) => {
        errors.push(
          FieldError::new("seniority", "Seniority must be one of: Junior, MidLevel, Senior, Lead, Manager")
            .with_value(level),
        );
        None
      }
    },
  };

  let workload = u32::try_from(input.current_workload)
    .ok()
    .filter(|w| i64::from(*w) <= MAX_WORKLOAD);
  if workload.is_none() {
    errors.push(
      FieldError::new("currentWorkload", "Current workload must be between 0-100")
        .with_value(input.current_workload.to_string()),
    );
  }

  if let Some(rating) = input.customer_satisfaction_rating
    && !(RATING_RANGE.0..=RATING_RANGE.1).contains(&rating)
  {
    errors.push(
      FieldError::new("customerSatisfactionRating", "Customer satisfaction rating must be between 1.0-5.0")
        .with_value(rating.to_string()),
    );
  }

  if let Some(hours) = input.average_resolution_time
    && (hours.is_nan() || hours < 0.0)
  {
    errors.push(
      FieldError::new("averageResolutionTime", "Average resolution time must be >= 0")
        .with_value(hours.to_string()),
    );
  }

  match (seniority, workload) {
    (Some(seniority), Some(current_workload)) if errors.is_empty() => Ok(SupportPerson {
      alias: input.alias.clone().unwrap_or_default(),
      name: input.name.clone().unwrap_or_default(),
      email: input.email.clone().unwrap_or_default(),
      specializations: input.specializations.clone(),
      current_workload,
      average_resolution_time: input.average_resolution_time,
      customer_satisfaction_rating: input.customer_satisfaction_rating,
      seniority,
      status: PersonStatus::Active,
    }),
    _ => Err(ValidationFailure::fields(errors)),
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn valid() -> SupportPersonInput {
    SupportPersonInput {
      alias:                        Some("jane.doe".into()),
      name:                         Some("Jane Doe".into()),
      email:                        Some("jane.doe@contoso.com".into()),
      specializations:              vec!["Database".into(), "Backup & Recovery".into()],
      current_workload:             4,
      average_resolution_time:      Some(12.5),
      customer_satisfaction_rating: Some(4.2),
      seniority:                    Some("Senior".into()),
    }
  }

  #[test]
  fn valid_input_builds_active_person() {
    let p = validate_person(&valid(), ValidationMode::Create).unwrap();
    assert_eq!(p.alias, "jane.doe");
    assert_eq!(p.seniority, Seniority::Senior);
    assert_eq!(p.current_workload, 4);
    assert!(p.is_active());
  }

  #[test]
  fn all_violations_are_reported_together() {
    let input = SupportPersonInput {
      alias:                        Some("a!".into()),
      name:                         None,
      email:                        Some("not-an-email".into()),
      specializations:              vec![],
      current_workload:             101,
      average_resolution_time:      Some(-1.0),
      customer_satisfaction_rating: Some(5.5),
      seniority:                    Some("Intern".into()),
    };
    let err = validate_person(&input, ValidationMode::Create).unwrap_err();

    for field in [
      "alias",
      "name",
      "email",
      "specializations",
      "seniority",
      "currentWorkload",
      "customerSatisfactionRating",
      "averageResolutionTime",
    ] {
      assert!(err.has_field(field), "missing violation for {field}");
    }
    // Both the length and the pattern rule fire for "a!".
    assert_eq!(err.errors.iter().filter(|e| e.field == "alias").count(), 2);
  }

  #[test]
  fn alias_required_on_create_only() {
    let input = SupportPersonInput { alias: None, ..valid() };
    let err = validate_person(&input, ValidationMode::Create).unwrap_err();
    assert!(err.has_field("alias"));

    let p = validate_person(&input, ValidationMode::Update).unwrap();
    assert_eq!(p.alias, "");
  }

  #[test]
  fn alias_still_checked_on_update_when_present() {
    let input = SupportPersonInput { alias: Some("has space".into()), ..valid() };
    let err = validate_person(&input, ValidationMode::Update).unwrap_err();
    assert!(err.has_field("alias"));
  }

  #[test]
  fn unapproved_specialization_is_rejected() {
    let input = SupportPersonInput {
      specializations: vec!["Database".into(), "Underwater Basket Weaving".into()],
      ..valid()
    };
    let err = validate_person(&input, ValidationMode::Create).unwrap_err();
    assert_eq!(err.errors.len(), 1);
    assert_eq!(err.errors[0].provided_value.as_deref(), Some("Underwater Basket Weaving"));
  }

  #[test]
  fn repeated_specialization_is_rejected() {
    let input = SupportPersonInput {
      specializations: vec!["Hardware".into(), "Database".into(), "Hardware".into()],
      ..valid()
    };
    let err = validate_person(&input, ValidationMode::Create).unwrap_err();
    assert_eq!(err.errors.len(), 1);
    assert_eq!(err.errors[0].field, "specializations");
    assert_eq!(err.errors[0].provided_value.as_deref(), Some("Hardware"));
  }

  #[test]
  fn too_many_specializations() {
    let input = SupportPersonInput {
      specializations: std::iter::repeat_n("Hardware".to_string(), 11).collect(),
      ..valid()
    };
    let err = validate_person(&input, ValidationMode::Create).unwrap_err();
    assert!(err.has_field("specializations"));
  }

  #[test]
  fn boundary_values_pass() {
    let input = SupportPersonInput {
      alias: Some("abc".into()),
      name: Some("Jo".into()),
      current_workload: 100,
      customer_satisfaction_rating: Some(1.0),
      average_resolution_time: Some(0.0),
      ..valid()
    };
    assert!(validate_person(&input, ValidationMode::Create).is_ok());

    let input = SupportPersonInput { customer_satisfaction_rating: Some(5.0), current_workload: 0, ..valid() };
    assert!(validate_person(&input, ValidationMode::Create).is_ok());
  }

  #[test]
  fn nan_rating_is_rejected() {
    let input = SupportPersonInput { customer_satisfaction_rating: Some(f64::NAN), ..valid() };
    let err = validate_person(&input, ValidationMode::Create).unwrap_err();
    assert!(err.has_field("customerSatisfactionRating"));
  }

  #[test]
  fn seniority_is_case_sensitive() {
    let input = SupportPersonInput { seniority: Some("senior".into()), ..valid() };
    assert!(validate_person(&input, ValidationMode::Create).is_err());
  }
}
