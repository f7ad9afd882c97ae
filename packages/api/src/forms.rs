//! # Authentication form schema
//!
//! The sign-up and sign-in forms share one set of values ([`AuthFormValues`]) but
//! validate them against a schema chosen by [`FormMode`]:
//!
//! | Field | Sign-up rule | Sign-in |
//! |-------|--------------|---------|
//! | `firstName`, `lastName` | at least 3 characters | ignored |
//! | `address1`, `city` | required, at most 50 characters | ignored |
//! | `state` | 2 or 3 characters | ignored |
//! | `postalCode` | 3 to 6 characters | ignored |
//! | `dateOfBirth` | calendar date, `YYYY-MM-DD` | ignored |
//! | `ssn` (NIN) | at least 3 digits | ignored |
//! | `email` | valid address | valid address |
//! | `password` | at least 8 characters | at least 8 characters |
//!
//! The same schema runs in the browser before submission and again inside the
//! `sign_up` server function, so the identity service never sees data that
//! would not pass the form.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Which variant of the authentication form is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FormMode {
    SignUp,
    SignIn,
}

impl FormMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            FormMode::SignUp => "sign-up",
            FormMode::SignIn => "sign-in",
        }
    }

    /// Route path of the page hosting this form.
    pub fn path(&self) -> &'static str {
        match self {
            FormMode::SignUp => "/sign-up",
            FormMode::SignIn => "/sign-in",
        }
    }

    /// The form a user is pointed to from the footer of this one.
    pub fn other(&self) -> FormMode {
        match self {
            FormMode::SignUp => FormMode::SignIn,
            FormMode::SignIn => FormMode::SignUp,
        }
    }

    /// Fields rendered for this mode, in display order.
    pub fn fields(&self) -> &'static [FieldSpec] {
        match self {
            FormMode::SignUp => &SIGN_UP_FIELDS,
            FormMode::SignIn => &SIGN_IN_FIELDS,
        }
    }

    /// Fields grouped into the rows they share on screen.
    pub fn rows(&self) -> impl Iterator<Item = &'static [FieldSpec]> {
        self.fields().chunk_by(|a, b| a.row == b.row)
    }

    pub fn requires(&self, field: Field) -> bool {
        self.fields().iter().any(|spec| spec.field == field)
    }

    pub fn title(&self) -> &'static str {
        match self {
            FormMode::SignUp => "Sign Up",
            FormMode::SignIn => "Sign In",
        }
    }

    pub fn footer_prompt(&self) -> &'static str {
        match self {
            FormMode::SignUp => "Already have an account?",
            FormMode::SignIn => "Don't have an account?",
        }
    }
}

impl fmt::Display for FormMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a mode string is neither `sign-up` nor `sign-in`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown form mode: {0}")]
pub struct UnknownFormMode(pub String);

impl FromStr for FormMode {
    type Err = UnknownFormMode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "sign-up" => Ok(FormMode::SignUp),
            "sign-in" => Ok(FormMode::SignIn),
            other => Err(UnknownFormMode(other.to_string())),
        }
    }
}

/// A single input on the authentication form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Field {
    FirstName,
    LastName,
    Address1,
    State,
    City,
    PostalCode,
    DateOfBirth,
    Ssn,
    Email,
    Password,
}

impl Field {
    /// Form key, as used for the `name` attribute of the input.
    pub fn as_str(&self) -> &'static str {
        match self {
            Field::FirstName => "firstName",
            Field::LastName => "lastName",
            Field::Address1 => "address1",
            Field::State => "state",
            Field::City => "city",
            Field::PostalCode => "postalCode",
            Field::DateOfBirth => "dateOfBirth",
            Field::Ssn => "ssn",
            Field::Email => "email",
            Field::Password => "password",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Static description of how a field is rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    pub field: Field,
    pub label: &'static str,
    pub placeholder: &'static str,
    pub input_type: &'static str,
    /// Fields with the same row number are laid out side by side.
    pub row: u8,
}

const fn spec(
    field: Field,
    label: &'static str,
    placeholder: &'static str,
    input_type: &'static str,
    row: u8,
) -> FieldSpec {
    FieldSpec {
        field,
        label,
        placeholder,
        input_type,
        row,
    }
}

const EMAIL: FieldSpec = spec(Field::Email, "Email", "Enter your email", "email", 4);
const PASSWORD: FieldSpec = spec(
    Field::Password,
    "Password",
    "Enter your password",
    "password",
    5,
);

static SIGN_UP_FIELDS: [FieldSpec; 10] = [
    spec(Field::FirstName, "First Name", "Enter your first name", "text", 0),
    spec(Field::LastName, "Last Name", "ex: Demola", "text", 0),
    spec(Field::Address1, "Address", "Enter your specific address", "text", 1),
    spec(Field::State, "State", "Example: Lag", "text", 2),
    spec(Field::City, "City", "Example: Ikeja", "text", 2),
    spec(Field::PostalCode, "Postal Code", "Example: 1344", "text", 2),
    spec(Field::DateOfBirth, "Date of Birth", "YYYY-MM-DD", "text", 3),
    spec(Field::Ssn, "NIN", "Example: 4729920394", "text", 3),
    EMAIL,
    PASSWORD,
];

static SIGN_IN_FIELDS: [FieldSpec; 2] = [EMAIL, PASSWORD];

/// Raw values as typed into the form.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AuthFormValues {
    pub first_name: String,
    pub last_name: String,
    pub address1: String,
    pub state: String,
    pub city: String,
    pub postal_code: String,
    pub date_of_birth: String,
    pub ssn: String,
    pub email: String,
    pub password: String,
}

impl AuthFormValues {
    pub fn get(&self, field: Field) -> &str {
        match field {
            Field::FirstName => &self.first_name,
            Field::LastName => &self.last_name,
            Field::Address1 => &self.address1,
            Field::State => &self.state,
            Field::City => &self.city,
            Field::PostalCode => &self.postal_code,
            Field::DateOfBirth => &self.date_of_birth,
            Field::Ssn => &self.ssn,
            Field::Email => &self.email,
            Field::Password => &self.password,
        }
    }

    pub fn set(&mut self, field: Field, value: String) {
        let slot = match field {
            Field::FirstName => &mut self.first_name,
            Field::LastName => &mut self.last_name,
            Field::Address1 => &mut self.address1,
            Field::State => &mut self.state,
            Field::City => &mut self.city,
            Field::PostalCode => &mut self.postal_code,
            Field::DateOfBirth => &mut self.date_of_birth,
            Field::Ssn => &mut self.ssn,
            Field::Email => &mut self.email,
            Field::Password => &mut self.password,
        };
        *slot = value;
    }
}

/// Sign-up data that passed validation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignUpParams {
    pub first_name: String,
    pub last_name: String,
    pub address1: String,
    pub city: String,
    pub state: String,
    pub postal_code: String,
    /// `YYYY-MM-DD`
    pub date_of_birth: String,
    pub ssn: String,
    pub email: String,
    pub password: String,
}

impl SignUpParams {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// Sign-in data that passed validation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignInParams {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ValidatedForm {
    SignUp(SignUpParams),
    SignIn(SignInParams),
}

/// Per-field validation messages, ordered by field.
#[derive(Debug, Clone, Default, PartialEq, Eq, thiserror::Error)]
#[error("{}", join_messages(.0))]
pub struct ValidationErrors(BTreeMap<Field, String>);

impl ValidationErrors {
    pub fn get(&self, field: Field) -> Option<&str> {
        self.0.get(&field).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn fields(&self) -> impl Iterator<Item = Field> + '_ {
        self.0.keys().copied()
    }

    fn add(&mut self, field: Field, message: impl Into<String>) {
        // Keep the first failing rule per field.
        self.0.entry(field).or_insert_with(|| message.into());
    }
}

fn join_messages(errors: &BTreeMap<Field, String>) -> String {
    errors
        .iter()
        .map(|(field, message)| format!("{field}: {message}"))
        .collect::<Vec<_>>()
        .join("; ")
}

/// Validate `values` against the schema for `mode`.
pub fn validate(mode: FormMode, values: &AuthFormValues) -> Result<ValidatedForm, ValidationErrors> {
    match mode {
        FormMode::SignUp => validate_sign_up(values).map(ValidatedForm::SignUp),
        FormMode::SignIn => validate_sign_in(values).map(ValidatedForm::SignIn),
    }
}

pub fn validate_sign_in(values: &AuthFormValues) -> Result<SignInParams, ValidationErrors> {
    let mut errors = ValidationErrors::default();
    let email = check_credentials(&mut errors, values);
    if !errors.is_empty() {
        return Err(errors);
    }
    Ok(SignInParams {
        email,
        password: values.password.clone(),
    })
}

pub fn validate_sign_up(values: &AuthFormValues) -> Result<SignUpParams, ValidationErrors> {
    validate_sign_up_on(values, chrono::Utc::now().date_naive())
}

/// Sign-up validation with `today` as the latest accepted date of birth.
fn validate_sign_up_on(
    values: &AuthFormValues,
    today: NaiveDate,
) -> Result<SignUpParams, ValidationErrors> {
    let mut errors = ValidationErrors::default();
    let trimmed = |field: Field| values.get(field).trim().to_string();
    let first_name = trimmed(Field::FirstName);
    let last_name = trimmed(Field::LastName);
    let address1 = trimmed(Field::Address1);
    let city = trimmed(Field::City);
    let state = trimmed(Field::State);
    let postal_code = trimmed(Field::PostalCode);
    let date_of_birth = trimmed(Field::DateOfBirth);
    let ssn = trimmed(Field::Ssn);

    min_chars(&mut errors, Field::FirstName, &first_name, 3);
    min_chars(&mut errors, Field::LastName, &last_name, 3);
    min_chars(&mut errors, Field::Address1, &address1, 1);
    max_chars(&mut errors, Field::Address1, &address1, 50);
    min_chars(&mut errors, Field::City, &city, 1);
    max_chars(&mut errors, Field::City, &city, 50);
    min_chars(&mut errors, Field::State, &state, 2);
    max_chars(&mut errors, Field::State, &state, 3);
    min_chars(&mut errors, Field::PostalCode, &postal_code, 3);
    max_chars(&mut errors, Field::PostalCode, &postal_code, 6);
    let date_of_birth = match parse_date_of_birth(&date_of_birth, today) {
        Ok(date) => date.format(DATE_FORMAT).to_string(),
        Err(message) => {
            errors.add(Field::DateOfBirth, message);
            date_of_birth
        }
    };
    min_chars(&mut errors, Field::Ssn, &ssn, 3);
    if !ssn.chars().all(|c| c.is_ascii_digit()) {
        errors.add(Field::Ssn, "Must contain digits only");
    }
    let email = check_credentials(&mut errors, values);

    if !errors.is_empty() {
        return Err(errors);
    }

    Ok(SignUpParams {
        first_name,
        last_name,
        address1,
        city,
        state: state.to_uppercase(),
        postal_code,
        date_of_birth,
        ssn,
        email,
        password: values.password.clone(),
    })
}

/// Checks shared by both modes. Returns the normalised email.
fn check_credentials(errors: &mut ValidationErrors, values: &AuthFormValues) -> String {
    let email = normalize_email(&values.email);
    if !is_valid_email(&email) {
        errors.add(Field::Email, "Please enter a valid email");
    }
    if values.password.chars().count() < 8 {
        errors.add(Field::Password, "Password must be at least 8 characters");
    }
    email
}

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Parse a zero-padded `YYYY-MM-DD` date that is not in the future.
fn parse_date_of_birth(value: &str, today: NaiveDate) -> Result<NaiveDate, &'static str> {
    let format_error = "Use the format YYYY-MM-DD";
    // chrono accepts unpadded months and days; the form does not.
    if value.len() != 10 {
        return Err(format_error);
    }
    let date = NaiveDate::parse_from_str(value, DATE_FORMAT).map_err(|_| format_error)?;
    if date > today {
        return Err("Date of birth cannot be in the future");
    }
    Ok(date)
}

pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

fn min_chars(errors: &mut ValidationErrors, field: Field, value: &str, min: usize) {
    if value.chars().count() < min {
        let message = if min == 1 {
            "This field is required".to_string()
        } else {
            format!("Must be at least {min} characters")
        };
        errors.add(field, message);
    }
}

fn max_chars(errors: &mut ValidationErrors, field: Field, value: &str, max: usize) {
    if value.chars().count() > max {
        errors.add(field, format!("Must be at most {max} characters"));
    }
}

fn is_valid_email(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }
    let labels: Vec<&str> = domain.split('.').collect();
    labels.len() >= 2 && labels.iter().all(|label| !label.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sign_up_values() -> AuthFormValues {
        AuthFormValues {
            first_name: "Adaeze".into(),
            last_name: "Okafor".into(),
            address1: "12 Allen Avenue".into(),
            state: "lag".into(),
            city: "Ikeja".into(),
            postal_code: "100271".into(),
            date_of_birth: "1994-03-17".into(),
            ssn: "4729920394".into(),
            email: " Ada@Example.com ".into(),
            password: "correct-horse".into(),
        }
    }

    #[test]
    fn test_sign_up_renders_every_field() {
        let fields: Vec<Field> = FormMode::SignUp.fields().iter().map(|s| s.field).collect();
        assert_eq!(
            fields,
            vec![
                Field::FirstName,
                Field::LastName,
                Field::Address1,
                Field::State,
                Field::City,
                Field::PostalCode,
                Field::DateOfBirth,
                Field::Ssn,
                Field::Email,
                Field::Password,
            ]
        );
    }

    #[test]
    fn test_sign_in_renders_only_credentials() {
        let fields: Vec<Field> = FormMode::SignIn.fields().iter().map(|s| s.field).collect();
        assert_eq!(fields, vec![Field::Email, Field::Password]);
        assert!(!FormMode::SignIn.requires(Field::FirstName));
        assert!(FormMode::SignUp.requires(Field::Ssn));
    }

    #[test]
    fn test_rows_group_side_by_side_fields() {
        let rows: Vec<usize> = FormMode::SignUp.rows().map(<[FieldSpec]>::len).collect();
        assert_eq!(rows, vec![2, 1, 3, 2, 1, 1]);
        assert_eq!(FormMode::SignIn.rows().count(), 2);
    }

    #[test]
    fn test_mode_parsing() {
        assert_eq!("sign-up".parse::<FormMode>(), Ok(FormMode::SignUp));
        assert_eq!("sign-in".parse::<FormMode>(), Ok(FormMode::SignIn));
        assert!("login".parse::<FormMode>().is_err());
        assert_eq!(FormMode::SignIn.other(), FormMode::SignUp);
        assert_eq!(FormMode::SignUp.path(), "/sign-up");
    }

    #[test]
    fn test_valid_sign_up_is_normalised() {
        let ValidatedForm::SignUp(params) = validate(FormMode::SignUp, &sign_up_values()).unwrap()
        else {
            panic!("expected sign-up params");
        };
        assert_eq!(params.email, "ada@example.com");
        assert_eq!(params.state, "LAG");
        assert_eq!(params.full_name(), "Adaeze Okafor");
        assert_eq!(params.password, "correct-horse");
    }

    #[test]
    fn test_sign_in_ignores_profile_fields() {
        let values = AuthFormValues {
            email: "ada@example.com".into(),
            password: "correct-horse".into(),
            ..Default::default()
        };
        assert_eq!(
            validate(FormMode::SignIn, &values),
            Ok(ValidatedForm::SignIn(SignInParams {
                email: "ada@example.com".into(),
                password: "correct-horse".into(),
            }))
        );
        // The same values are incomplete for sign-up.
        let errors = validate(FormMode::SignUp, &values).unwrap_err();
        assert!(errors.get(Field::FirstName).is_some());
        assert!(errors.get(Field::Email).is_none());
    }

    #[test]
    fn test_sign_up_rule_violations() {
        let mut values = sign_up_values();
        values.first_name = "Al".into();
        values.state = "L".into();
        values.postal_code = "1234567".into();
        values.date_of_birth = "1994-02-30".into();
        values.ssn = "12a4".into();
        values.address1 = "x".repeat(51);

        let errors = validate(FormMode::SignUp, &values).unwrap_err();
        let fields: Vec<Field> = errors.fields().collect();
        assert_eq!(
            fields,
            vec![
                Field::FirstName,
                Field::Address1,
                Field::State,
                Field::PostalCode,
                Field::DateOfBirth,
                Field::Ssn,
            ]
        );
        assert_eq!(errors.get(Field::FirstName), Some("Must be at least 3 characters"));
        assert_eq!(errors.get(Field::DateOfBirth), Some("Use the format YYYY-MM-DD"));

        let mut values = sign_up_values();
        values.date_of_birth = "1994-3-7".into();
        let errors = validate(FormMode::SignUp, &values).unwrap_err();
        assert_eq!(errors.get(Field::DateOfBirth), Some("Use the format YYYY-MM-DD"));

        values.date_of_birth = "2999-01-01".into();
        let errors = validate(FormMode::SignUp, &values).unwrap_err();
        assert_eq!(
            errors.get(Field::DateOfBirth),
            Some("Date of birth cannot be in the future")
        );
    }

    #[test]
    fn test_date_of_birth_bounds() {
        let today = NaiveDate::from_ymd_opt(2024, 7, 25).unwrap();
        let mut values = sign_up_values();

        values.date_of_birth = " 2024-07-25 ".into();
        let params = validate_sign_up_on(&values, today).unwrap();
        assert_eq!(params.date_of_birth, "2024-07-25");

        values.date_of_birth = "2024-07-26".into();
        assert!(validate_sign_up_on(&values, today).is_err());
        values.date_of_birth = "94-03-17".into();
        assert!(validate_sign_up_on(&values, today).is_err());
    }

    #[test]
    fn test_credentials_rules() {
        let values = AuthFormValues {
            email: "not-an-email".into(),
            password: "short".into(),
            ..Default::default()
        };
        let errors = validate(FormMode::SignIn, &values).unwrap_err();
        assert_eq!(errors.len(), 2);
        assert_eq!(
            errors.to_string(),
            "email: Please enter a valid email; password: Password must be at least 8 characters"
        );
    }

    #[test]
    fn test_email_shapes() {
        assert!(is_valid_email("a@b.co"));
        assert!(!is_valid_email("a@b"));
        assert!(!is_valid_email("@b.co"));
        assert!(!is_valid_email("a@@b.co"));
        assert!(!is_valid_email("a b@c.co"));
        assert!(!is_valid_email("a@b..co"));
    }

    #[test]
    fn test_values_accessors_use_form_keys() {
        let mut values = AuthFormValues::default();
        values.set(Field::PostalCode, "1344".into());
        assert_eq!(values.get(Field::PostalCode), "1344");
        assert_eq!(values.postal_code, "1344");
        assert_eq!(Field::PostalCode.to_string(), "postalCode");
        assert_eq!(FormMode::SignUp.to_string(), "sign-up");
    }
}
