// Copyright 2025 Chris Custine
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Contact form validation.
//!
//! Validation works on the raw JSON value so that a missing or mistyped
//! field produces a field-level message instead of a generic decode error.
//! Every field is checked; all failures are reported together.

use std::collections::BTreeMap;

use lazy_static::lazy_static;
use regex::Regex;
use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use serde_json::Value;

const NAME_MIN: usize = 2;
const NAME_MAX: usize = 50;
const MESSAGE_MIN: usize = 10;
const MESSAGE_MAX: usize = 1000;

/// Key used for errors that are not tied to a single field.
pub const FORM_ERROR_KEY: &str = "_form";

/// Key holding the message list at each level of the serialized tree.
const ERRORS_KEY: &str = "_errors";

lazy_static! {
    static ref EMAIL_RE: Regex = Regex::new(
        r"^[A-Za-z0-9_'+\-.]*[A-Za-z0-9_+\-]@([A-Za-z0-9][A-Za-z0-9\-]*\.)+[A-Za-z]{2,}$"
    )
    .expect("email pattern is valid");
}

/// Kind of project the sender is enquiring about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProjectType {
    #[serde(rename = "Web Development")]
    WebDevelopment,
    #[serde(rename = "Mobile App")]
    MobileApp,
    #[serde(rename = "AI Integration")]
    AiIntegration,
    #[serde(rename = "UI/UX Design")]
    UiUxDesign,
}

impl ProjectType {
    pub const ALL: [ProjectType; 4] = [
        ProjectType::WebDevelopment,
        ProjectType::MobileApp,
        ProjectType::AiIntegration,
        ProjectType::UiUxDesign,
    ];

    /// Get the wire label of this project type
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            ProjectType::WebDevelopment => "Web Development",
            ProjectType::MobileApp => "Mobile App",
            ProjectType::AiIntegration => "AI Integration",
            ProjectType::UiUxDesign => "UI/UX Design",
        }
    }

    /// Parse a wire label. Matching is exact.
    #[must_use]
    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|p| p.label() == label)
    }
}

/// A contact submission that passed validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactForm {
    pub name: String,
    pub email: String,
    pub project_type: ProjectType,
    pub message: String,
}

/// Field-level validation failures, keyed by wire field name.
///
/// Serializes as a nested tree: form-level messages under a top-level
/// `_errors` list and each failing field as `{ "_errors": [...] }`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors(BTreeMap<String, Vec<String>>);

#[derive(Serialize)]
struct FieldErrors<'a> {
    #[serde(rename = "_errors")]
    errors: &'a [String],
}

impl Serialize for ValidationErrors {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        map.serialize_entry(ERRORS_KEY, self.field(FORM_ERROR_KEY))?;
        for (field, messages) in self.0.iter().filter(|(field, _)| *field != FORM_ERROR_KEY) {
            map.serialize_entry(field, &FieldErrors { errors: messages })?;
        }
        map.end()
    }
}

impl ValidationErrors {
    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.0.entry(field.to_string()).or_default().push(message.into());
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Messages recorded for one field
    #[must_use]
    pub fn field(&self, field: &str) -> &[String] {
        self.0.get(field).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Names of all fields with errors, sorted
    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }
}

impl std::fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let parts: Vec<String> = self
            .0
            .iter()
            .map(|(field, messages)| format!("{}: {}", field, messages.join(", ")))
            .collect();
        write!(f, "{}", parts.join("; "))
    }
}

impl std::error::Error for ValidationErrors {}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Fetch a string field, recording "Required" / type errors.
fn string_field<'a>(
    body: &'a serde_json::Map<String, Value>,
    field: &str,
    errors: &mut ValidationErrors,
) -> Option<&'a str> {
    match body.get(field) {
        None => {
            errors.add(field, "Required");
            None
        }
        Some(Value::String(s)) => Some(s.as_str()),
        Some(other) => {
            errors.add(
                field,
                format!("Expected string, received {}", json_type_name(other)),
            );
            None
        }
    }
}

fn check_length(
    value: &str,
    field: &str,
    (min, max): (usize, usize),
    (too_short, too_long): (&str, &str),
    errors: &mut ValidationErrors,
) -> bool {
    let len = value.chars().count();
    if len < min {
        errors.add(field, too_short);
        false
    } else if len > max {
        errors.add(field, too_long);
        false
    } else {
        true
    }
}

/// Check an email address against the accepted address grammar.
#[must_use]
pub fn is_valid_email(email: &str) -> bool {
    !email.starts_with('.') && !email.contains("..") && EMAIL_RE.is_match(email)
}

/// Validate a raw contact payload.
pub fn validate(body: &Value) -> Result<ContactForm, ValidationErrors> {
    let mut errors = ValidationErrors::default();

    let Some(object) = body.as_object() else {
        errors.add(
            FORM_ERROR_KEY,
            format!("Expected object, received {}", json_type_name(body)),
        );
        return Err(errors);
    };

    let name = string_field(object, "name", &mut errors).filter(|name| {
        check_length(
            name,
            "name",
            (NAME_MIN, NAME_MAX),
            ("Name must be at least 2 characters", "Name is too long"),
            &mut errors,
        )
    });

    let email = string_field(object, "email", &mut errors).filter(|email| {
        let valid = is_valid_email(email);
        if !valid {
            errors.add("email", "Invalid email address");
        }
        valid
    });

    let project_type = string_field(object, "projectType", &mut errors).and_then(|label| {
        let parsed = ProjectType::from_label(label);
        if parsed.is_none() {
            let expected: Vec<String> = ProjectType::ALL
                .iter()
                .map(|p| format!("'{}'", p.label()))
                .collect();
            errors.add(
                "projectType",
                format!(
                    "Invalid enum value. Expected {}, received '{}'",
                    expected.join(" | "),
                    label
                ),
            );
        }
        parsed
    });

    let message = string_field(object, "message", &mut errors).filter(|message| {
        check_length(
            message,
            "message",
            (MESSAGE_MIN, MESSAGE_MAX),
            ("Message must be at least 10 characters", "Message is too long"),
            &mut errors,
        )
    });

    match (name, email, project_type, message) {
        (Some(name), Some(email), Some(project_type), Some(message)) if errors.is_empty() => {
            Ok(ContactForm {
                name: name.to_string(),
                email: email.to_string(),
                project_type,
                message: message.to_string(),
            })
        }
        _ => Err(errors),
    }
}
