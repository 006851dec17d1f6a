// Simulated login and registration
// No backend: a valid submission waits out a fixed latency and then succeeds

use crate::scheduler::{Scheduler, TaskId};
use crate::settings::Settings;
use crate::ui::modal::{LOGIN_MODAL, REGISTER_MODAL};
use crate::validation::{is_valid_email, validate_form, FormResult, Rule};
use log::info;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::Duration;

pub const MSG_FILL_ALL: &str = "Por favor, preencha todos os campos.";
pub const MSG_INVALID_EMAIL: &str = "Por favor, digite um e-mail válido.";
pub const MSG_FIX_ERRORS: &str = "Por favor, corrija os erros no formulário.";
pub const MSG_LOGIN_OK: &str = "Login realizado com sucesso!";
pub const MSG_REGISTER_OK: &str = "Cadastro realizado com sucesso!";

/// Register form fields and their rules, in display order
pub const REGISTER_RULES: [(&str, &[Rule]); 6] = [
    ("firstname", &[Rule::Required, Rule::Name]),
    ("lastname", &[Rule::Required, Rule::Name]),
    ("email", &[Rule::Required, Rule::Email]),
    ("phone", &[Rule::Phone]),
    ("password", &[Rule::Required, Rule::Password]),
    ("confirm-password", &[Rule::Required, Rule::ConfirmPassword]),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AuthFlow {
    Login,
    Register,
}

impl AuthFlow {
    fn key(&self) -> &'static str {
        match self {
            AuthFlow::Login => "login",
            AuthFlow::Register => "register",
        }
    }

    pub fn success_message(&self) -> &'static str {
        match self {
            AuthFlow::Login => MSG_LOGIN_OK,
            AuthFlow::Register => MSG_REGISTER_OK,
        }
    }

    /// Modal closed once the flow succeeds
    pub fn modal(&self) -> &'static str {
        match self {
            AuthFlow::Login => LOGIN_MODAL,
            AuthFlow::Register => REGISTER_MODAL,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterForm {
    pub firstname: String,
    pub lastname: String,
    pub email: String,
    #[serde(default)]
    pub phone: String,
    pub password: String,
    pub confirm_password: String,
}

impl RegisterForm {
    fn as_map(&self) -> BTreeMap<String, String> {
        [
            ("firstname", &self.firstname),
            ("lastname", &self.lastname),
            ("email", &self.email),
            ("phone", &self.phone),
            ("password", &self.password),
            ("confirm-password", &self.confirm_password),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.clone()))
        .collect()
    }

    /// Field-level results, used for blur-time validation as well
    pub fn validate(&self) -> FormResult {
        validate_form(&self.as_map(), &REGISTER_RULES, "password")
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitStatus {
    /// Nothing was sent; `message` goes to a toast, `fields` to the inline errors
    Rejected {
        message: &'static str,
        fields: Option<FormResult>,
    },
    Pending(TaskId),
}

pub struct Auth {
    login_latency: Duration,
    register_latency: Duration,
    tasks: Scheduler<AuthFlow>,
}

impl Auth {
    pub fn new(settings: &Settings) -> Self {
        Self {
            login_latency: Duration::from_millis(settings.login_latency_ms),
            register_latency: Duration::from_millis(settings.register_latency_ms),
            tasks: Scheduler::new(),
        }
    }

    pub fn submit_login(&mut self, form: &LoginForm) -> SubmitStatus {
        if form.email.is_empty() || form.password.is_empty() {
            return SubmitStatus::Rejected {
                message: MSG_FILL_ALL,
                fields: None,
            };
        }
        if !is_valid_email(&form.email) {
            return SubmitStatus::Rejected {
                message: MSG_INVALID_EMAIL,
                fields: None,
            };
        }
        info!("Login submitted for {}", form.email);
        self.start(AuthFlow::Login, self.login_latency)
    }

    pub fn submit_register(&mut self, form: &RegisterForm) -> SubmitStatus {
        let result = form.validate();
        if !result.is_valid() {
            return SubmitStatus::Rejected {
                message: MSG_FIX_ERRORS,
                fields: Some(result),
            };
        }
        info!("Registration submitted for {}", form.email);
        self.start(AuthFlow::Register, self.register_latency)
    }

    /// Submit button shows its loading state while the flow is pending
    pub fn is_loading(&self, flow: AuthFlow) -> bool {
        self.tasks.is_key_pending(flow.key())
    }

    /// Flows that completed during `elapsed`
    pub fn advance(&mut self, elapsed: Duration) -> Vec<AuthFlow> {
        self.tasks.advance(elapsed)
    }

    pub fn cancel_all(&mut self) {
        self.tasks.cancel_all();
    }

    pub fn next_due_in(&self) -> Option<Duration> {
        self.tasks.next_due_in()
    }

    fn start(&mut self, flow: AuthFlow, latency: Duration) -> SubmitStatus {
        SubmitStatus::Pending(self.tasks.schedule_keyed(flow.key(), latency, flow))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    fn valid_register() -> RegisterForm {
        RegisterForm {
            firstname: "Ana".to_string(),
            lastname: "Souza".to_string(),
            email: "ana@example.com".to_string(),
            phone: "(11) 91234-5678".to_string(),
            password: "segredo123".to_string(),
            confirm_password: "segredo123".to_string(),
        }
    }

    #[test]
    fn test_login_requires_fields_and_email() {
        let mut auth = Auth::new(&Settings::default());
        let status = auth.submit_login(&LoginForm::default());
        assert_eq!(
            status,
            SubmitStatus::Rejected {
                message: MSG_FILL_ALL,
                fields: None
            }
        );
        let status = auth.submit_login(&LoginForm {
            email: "ana".to_string(),
            password: "x".to_string(),
        });
        assert!(matches!(status, SubmitStatus::Rejected { message, .. } if message == MSG_INVALID_EMAIL));
        assert!(!auth.is_loading(AuthFlow::Login));
    }

    #[test]
    fn test_login_completes_after_latency() {
        let mut auth = Auth::new(&Settings::default());
        let status = auth.submit_login(&LoginForm {
            email: "ana@example.com".to_string(),
            password: "x".to_string(),
        });
        assert!(matches!(status, SubmitStatus::Pending(_)));
        assert!(auth.is_loading(AuthFlow::Login));
        assert!(auth.advance(ms(1499)).is_empty());
        assert_eq!(auth.advance(ms(1)), vec![AuthFlow::Login]);
        assert!(!auth.is_loading(AuthFlow::Login));
        assert_eq!(AuthFlow::Login.modal(), "login-modal");
    }

    #[test]
    fn test_register_rejects_with_field_errors() {
        let mut auth = Auth::new(&Settings::default());
        let mut form = valid_register();
        form.confirm_password = "outra".to_string();
        form.phone = "123".to_string();
        match auth.submit_register(&form) {
            SubmitStatus::Rejected {
                message,
                fields: Some(fields),
            } => {
                assert_eq!(message, MSG_FIX_ERRORS);
                assert_eq!(fields.first_error("confirm-password"), Some("As senhas não coincidem"));
                assert!(fields.first_error("phone").is_some());
                assert_eq!(fields.first_error("email"), None);
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_register_completes_after_two_seconds() {
        let mut auth = Auth::new(&Settings::default());
        assert!(matches!(
            auth.submit_register(&valid_register()),
            SubmitStatus::Pending(_)
        ));
        assert!(auth.advance(ms(1999)).is_empty());
        assert_eq!(auth.advance(ms(1)), vec![AuthFlow::Register]);
        assert_eq!(AuthFlow::Register.success_message(), MSG_REGISTER_OK);
    }
}
