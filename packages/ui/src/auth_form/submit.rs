//! Form state for [`AuthForm`](super::AuthForm), kept free of any rendering so it
//! can be driven directly in tests.
//!
//! A submission moves through `Idle → Submitting → Succeeded | Failed`. While
//! `Submitting`, [`AuthFormState::begin`] refuses to start another one, which is
//! what backs the disabled submit button.

use api::forms::{validate, ValidatedForm};
use api::{AuthFormValues, Field, FormMode, UserInfo, ValidationErrors};

/// Message shown when the identity service call fails.
pub const GENERIC_FAILURE: &str = "Something went wrong. Please try again.";

/// Progress of the current submission.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum SubmitState {
    #[default]
    Idle,
    Submitting,
    Succeeded(UserInfo),
    /// Holds the underlying error text for logging; the UI shows [`GENERIC_FAILURE`].
    Failed(String),
}

/// The call to make for an accepted submission.
#[derive(Debug, Clone, PartialEq)]
pub enum Submission {
    SignUp(AuthFormValues),
    SignIn { email: String, password: String },
}

/// Why [`AuthFormState::begin`] did not start a submission.
#[derive(Debug, Clone, PartialEq)]
pub enum Rejected {
    /// A previous submission has not finished yet.
    Pending,
    Invalid(ValidationErrors),
}

/// What the view should do once a submission finishes.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// Signed in: go to the home route.
    NavigateHome(UserInfo),
    /// Signed up: replace the form with the account-linking section.
    ShowLinkAccount(UserInfo),
    Failed,
    /// No submission was pending; the result was dropped.
    Ignored,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AuthFormState {
    mode: FormMode,
    pub values: AuthFormValues,
    pub errors: ValidationErrors,
    submit: SubmitState,
}

impl AuthFormState {
    pub fn new(mode: FormMode) -> Self {
        Self {
            mode,
            values: AuthFormValues::default(),
            errors: ValidationErrors::default(),
            submit: SubmitState::Idle,
        }
    }

    pub fn mode(&self) -> FormMode {
        self.mode
    }

    pub fn submit_state(&self) -> &SubmitState {
        &self.submit
    }

    pub fn is_loading(&self) -> bool {
        self.submit == SubmitState::Submitting
    }

    /// The freshly created user, once sign-up succeeded.
    pub fn linked_user(&self) -> Option<&UserInfo> {
        match (&self.submit, self.mode) {
            (SubmitState::Succeeded(user), FormMode::SignUp) => Some(user),
            _ => None,
        }
    }

    pub fn failure_message(&self) -> Option<&'static str> {
        matches!(self.submit, SubmitState::Failed(_)).then_some(GENERIC_FAILURE)
    }

    pub fn set_value(&mut self, field: Field, value: String) {
        self.values.set(field, value);
    }

    /// Validate the current values and, if they pass, mark the form as submitting.
    pub fn begin(&mut self) -> Result<Submission, Rejected> {
        if self.is_loading() {
            return Err(Rejected::Pending);
        }

        match validate(self.mode, &self.values) {
            Ok(validated) => {
                self.errors = ValidationErrors::default();
                self.submit = SubmitState::Submitting;
                Ok(match validated {
                    ValidatedForm::SignUp(_) => Submission::SignUp(self.values.clone()),
                    ValidatedForm::SignIn(params) => Submission::SignIn {
                        email: params.email,
                        password: params.password,
                    },
                })
            }
            Err(errors) => {
                self.errors = errors.clone();
                self.submit = SubmitState::Idle;
                Err(Rejected::Invalid(errors))
            }
        }
    }

    /// Record the result of the call started by [`begin`](Self::begin).
    pub fn finish(&mut self, result: Result<UserInfo, String>) -> Outcome {
        if !self.is_loading() {
            return Outcome::Ignored;
        }

        match result {
            Ok(user) => {
                self.submit = SubmitState::Succeeded(user.clone());
                match self.mode {
                    FormMode::SignIn => Outcome::NavigateHome(user),
                    FormMode::SignUp => Outcome::ShowLinkAccount(user),
                }
            }
            Err(message) => {
                tracing::error!(mode = %self.mode, error = %message, "authentication failed");
                self.submit = SubmitState::Failed(message);
                Outcome::Failed
            }
        }
    }

    pub fn heading(&self) -> &'static str {
        if self.linked_user().is_some() {
            "Link Account"
        } else {
            self.mode.title()
        }
    }

    pub fn subheading(&self) -> &'static str {
        if self.linked_user().is_some() {
            "Link your account to get started"
        } else {
            "Please enter your details"
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user() -> UserInfo {
        UserInfo {
            id: "u1".into(),
            email: "ada@example.com".into(),
            name: Some("Adaeze Okafor".into()),
        }
    }

    fn filled_sign_in() -> AuthFormState {
        let mut form = AuthFormState::new(FormMode::SignIn);
        form.set_value(Field::Email, "Ada@Example.com".into());
        form.set_value(Field::Password, "correct-horse".into());
        form
    }

    fn filled_sign_up() -> AuthFormState {
        let mut form = AuthFormState::new(FormMode::SignUp);
        for (field, value) in [
            (Field::FirstName, "Adaeze"),
            (Field::LastName, "Okafor"),
            (Field::Address1, "12 Allen Avenue"),
            (Field::State, "LA"),
            (Field::City, "Ikeja"),
            (Field::PostalCode, "100271"),
            (Field::DateOfBirth, "1994-03-17"),
            (Field::Ssn, "4729920394"),
            (Field::Email, "ada@example.com"),
            (Field::Password, "correct-horse"),
        ] {
            form.set_value(field, value.to_string());
        }
        form
    }

    #[test]
    fn test_sign_in_success_navigates_once() {
        let mut form = filled_sign_in();
        let submission = form.begin().unwrap();
        assert_eq!(
            submission,
            Submission::SignIn {
                email: "ada@example.com".into(),
                password: "correct-horse".into(),
            }
        );
        assert!(form.is_loading());

        let outcomes = [form.finish(Ok(user())), form.finish(Ok(user()))];
        let navigations = outcomes
            .iter()
            .filter(|o| matches!(o, Outcome::NavigateHome(_)))
            .count();
        assert_eq!(navigations, 1);
        assert_eq!(outcomes[1], Outcome::Ignored);
        assert!(!form.is_loading());
        // Sign-in never shows the linking section.
        assert_eq!(form.linked_user(), None);
        assert_eq!(form.heading(), "Sign In");
    }

    #[test]
    fn test_pending_submission_blocks_another() {
        let mut form = filled_sign_in();
        form.begin().unwrap();
        assert_eq!(form.begin(), Err(Rejected::Pending));
        assert!(form.is_loading());
    }

    #[test]
    fn test_failure_resets_loading_and_stays_on_form() {
        let mut form = filled_sign_in();
        form.begin().unwrap();

        let outcome = form.finish(Err("Invalid email or password".into()));
        assert_eq!(outcome, Outcome::Failed);
        assert!(!form.is_loading());
        assert_eq!(form.linked_user(), None);
        assert_eq!(form.heading(), "Sign In");
        assert_eq!(form.failure_message(), Some(GENERIC_FAILURE));
        assert_eq!(
            form.submit_state(),
            &SubmitState::Failed("Invalid email or password".into())
        );

        // The form can be submitted again after a failure.
        assert!(form.begin().is_ok());
        assert_eq!(form.failure_message(), None);
    }

    #[test]
    fn test_invalid_values_never_start_a_call() {
        let mut form = AuthFormState::new(FormMode::SignIn);
        form.set_value(Field::Email, "ada".into());

        match form.begin() {
            Err(Rejected::Invalid(errors)) => {
                assert!(errors.get(Field::Email).is_some());
                assert!(errors.get(Field::Password).is_some());
            }
            other => panic!("expected validation failure, got {other:?}"),
        }
        assert!(!form.is_loading());
        assert!(form.errors.get(Field::Email).is_some());
    }

    #[test]
    fn test_sign_up_success_reveals_link_account() {
        let mut form = filled_sign_up();
        assert!(matches!(form.begin(), Ok(Submission::SignUp(_))));
        assert_eq!(form.heading(), "Sign Up");

        let outcome = form.finish(Ok(user()));
        assert_eq!(outcome, Outcome::ShowLinkAccount(user()));
        assert_eq!(form.linked_user(), Some(&user()));
        assert_eq!(form.heading(), "Link Account");
        assert_eq!(form.subheading(), "Link your account to get started");
    }

    #[test]
    fn test_sign_up_requires_profile_fields() {
        let mut form = AuthFormState::new(FormMode::SignUp);
        form.set_value(Field::Email, "ada@example.com".into());
        form.set_value(Field::Password, "correct-horse".into());

        let Err(Rejected::Invalid(errors)) = form.begin() else {
            panic!("expected validation failure");
        };
        assert_eq!(errors.len(), 8);
        assert!(errors.get(Field::Email).is_none());
    }
}
