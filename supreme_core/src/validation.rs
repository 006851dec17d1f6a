// Form validation rules for the login and register forms

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use std::collections::BTreeMap;

static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$").expect("valid email regex")
});

static PHONE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\(\d{2}\)\s\d{4,5}-\d{4}$").expect("valid phone regex"));

pub fn is_valid_email(email: &str) -> bool {
    EMAIL_RE.is_match(email)
}

/// Brazilian format: `(xx) xxxxx-xxxx` or `(xx) xxxx-xxxx`
pub fn is_valid_phone(phone: &str) -> bool {
    PHONE_RE.is_match(phone)
}

pub fn is_valid_password(password: &str) -> bool {
    password.chars().count() >= 8
}

pub fn is_valid_name(name: &str) -> bool {
    name.trim().chars().count() >= 2
}

pub fn is_required(value: &str) -> bool {
    !value.trim().is_empty()
}

/// Reformat a phone number as the user types. Inputs that do not have 10 or
/// 11 digits are returned unchanged.
pub fn format_phone(phone: &str) -> String {
    let digits: String = phone.chars().filter(|c| c.is_ascii_digit()).collect();
    match digits.len() {
        10 | 11 => {
            let (area, rest) = digits.split_at(2);
            let (prefix, line) = rest.split_at(rest.len() - 4);
            format!("({}) {}-{}", area, prefix, line)
        }
        _ => phone.to_string(),
    }
}

/// A single field rule
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rule {
    Required,
    Email,
    Phone,
    Password,
    Name,
    /// Must equal the form's password field
    ConfirmPassword,
}

impl Rule {
    pub fn message(&self) -> &'static str {
        match self {
            Rule::Required => "Este campo é obrigatório",
            Rule::Email => "Digite um e-mail válido",
            Rule::Phone => "Digite um telefone válido no formato (xx) xxxxx-xxxx",
            Rule::Password => "A senha deve ter pelo menos 8 caracteres",
            Rule::Name => "Nome deve ter pelo menos 2 caracteres",
            Rule::ConfirmPassword => "As senhas não coincidem",
        }
    }

    fn check(&self, value: &str, password: Option<&str>) -> bool {
        match self {
            Rule::Required => is_required(value),
            Rule::Email => is_valid_email(value),
            Rule::Phone => is_valid_phone(value),
            Rule::Password => is_valid_password(value),
            Rule::Name => is_valid_name(value),
            Rule::ConfirmPassword => password == Some(value),
        }
    }
}

/// Violations for one field, in rule order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FieldResult {
    pub errors: Vec<&'static str>,
}

impl FieldResult {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// The message shown inline: only the first violation is displayed
    pub fn first_error(&self) -> Option<&'static str> {
        self.errors.first().copied()
    }
}

pub fn validate_field(value: &str, rules: &[Rule], password: Option<&str>) -> FieldResult {
    FieldResult {
        errors: rules
            .iter()
            .filter(|rule| !rule.check(value, password))
            .map(Rule::message)
            .collect(),
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FormResult {
    pub fields: BTreeMap<String, FieldResult>,
}

impl FormResult {
    pub fn is_valid(&self) -> bool {
        self.fields.values().all(FieldResult::is_valid)
    }

    pub fn first_error(&self, field: &str) -> Option<&'static str> {
        self.fields.get(field).and_then(FieldResult::first_error)
    }
}

/// Validate every field listed in `rules`. Missing form values count as
/// empty strings; `confirm` rules compare against `password_field`.
pub fn validate_form(
    data: &BTreeMap<String, String>,
    rules: &[(&str, &[Rule])],
    password_field: &str,
) -> FormResult {
    let password = data.get(password_field).map(String::as_str);
    let fields = rules
        .iter()
        .map(|(name, field_rules)| {
            let value = data.get(*name).map(String::as_str).unwrap_or("");
            let pw = if field_rules.contains(&Rule::ConfirmPassword) {
                Some(password.unwrap_or(""))
            } else {
                None
            };
            (name.to_string(), validate_field(value, field_rules, pw))
        })
        .collect();
    FormResult { fields }
}
