use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use unicode_segmentation::UnicodeSegmentation;
use validator::{Validate, ValidationError};

use crate::core::AppError;
use crate::models::currencies::Currency;

pub const MAX_LOGO_BYTES: usize = 2 * 1024 * 1024;

/// The single company-configuration record. The table is constrained to one
/// row (`id = 1`); absence of the row is valid and callers fall back to
/// `CompanySettings::default()`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct CompanySettings {
    pub id: i32,
    pub company_name: Option<String>,
    pub company_email: Option<String>,
    pub company_phone: Option<String>,
    pub company_address: Option<String>,
    pub tax_id: Option<String>,
    pub currency: String,
    pub currency_symbol: String,
    pub date_format: String,
    pub timezone: String,
    pub logo_path: Option<String>,
    pub lock_before_date: Option<NaiveDate>,
    pub created_at: Option<NaiveDateTime>,
    pub updated_at: Option<NaiveDateTime>,
}

impl Default for CompanySettings {
    fn default() -> Self {
        Self {
            id: 1,
            company_name: None,
            company_email: None,
            company_phone: None,
            company_address: None,
            tax_id: None,
            currency: "UGX".to_string(),
            currency_symbol: "UGX".to_string(),
            date_format: "d/m/Y".to_string(),
            timezone: "Africa/Kampala".to_string(),
            logo_path: None,
            lock_before_date: None,
            created_at: None,
            updated_at: None,
        }
    }
}

impl CompanySettings {
    /// Merge a validated command into the current record. Provided fields
    /// overwrite, omitted fields are left unchanged; the four required
    /// fields always come from the command.
    pub fn apply(&mut self, command: &UpdateCompanySettings) {
        if command.company_name.is_some() {
            self.company_name = command.company_name.clone();
        }
        if command.company_email.is_some() {
            self.company_email = command.company_email.clone();
        }
        if command.company_phone.is_some() {
            self.company_phone = command.company_phone.clone();
        }
        if command.company_address.is_some() {
            self.company_address = command.company_address.clone();
        }
        if command.tax_id.is_some() {
            self.tax_id = command.tax_id.clone();
        }

        self.currency = command.currency.clone();
        self.currency_symbol = command.currency_symbol.clone();
        self.date_format = command.date_format.clone();
        self.timezone = command.timezone.clone();

        if let Some(date) = command.lock_before_date {
            self.lock_before_date = Some(date);
        }
    }
}

/// Command object assembled from the settings form. Built independently of
/// any UI binding; `validate()` must pass before anything is persisted.
#[derive(Validate, Debug, Default, Clone, Serialize, Deserialize)]
pub struct UpdateCompanySettings {
    #[validate(custom = "validate_company_name")]
    pub company_name: Option<String>,
    #[validate(
        email(message = "must be a valid email address"),
        length(max = 255, message = "must not exceed 255 characters")
    )]
    pub company_email: Option<String>,
    #[validate(length(max = 50, message = "must not exceed 50 characters"))]
    pub company_phone: Option<String>,
    #[validate(length(max = 500, message = "must not exceed 500 characters"))]
    pub company_address: Option<String>,
    #[validate(length(max = 100, message = "must not exceed 100 characters"))]
    pub tax_id: Option<String>,
    #[validate(length(min = 1, max = 10, message = "is required and must not exceed 10 characters"))]
    pub currency: String,
    #[validate(length(min = 1, max = 10, message = "is required and must not exceed 10 characters"))]
    pub currency_symbol: String,
    #[validate(length(min = 1, max = 50, message = "is required and must not exceed 50 characters"))]
    pub date_format: String,
    #[validate(
        length(min = 1, max = 100, message = "is required and must not exceed 100 characters"),
        custom = "validate_timezone"
    )]
    pub timezone: String,
    pub lock_before_date: Option<NaiveDate>,
}

fn validate_company_name(name: &str) -> Result<(), ValidationError> {
    if name.graphemes(true).count() > 255 {
        let mut error = ValidationError::new("length");
        error.message = Some("must not exceed 255 characters".into());
        return Err(error);
    }

    let forbidden_characters = ['/', '(', ')', '"', '<', '>', '\\', '{', '}'];
    if name.chars().any(|c| forbidden_characters.contains(&c)) {
        let mut error = ValidationError::new("forbidden_characters");
        error.message = Some("contains characters that are not allowed".into());
        return Err(error);
    }

    Ok(())
}

fn validate_timezone(timezone: &str) -> Result<(), ValidationError> {
    if timezone.parse::<chrono_tz::Tz>().is_err() {
        let mut error = ValidationError::new("timezone");
        error.message = Some("must be a valid IANA timezone name".into());
        return Err(error);
    }
    Ok(())
}

/// An uploaded logo image, captured from the multipart request before any
/// write happens.
#[derive(Debug, Clone)]
pub struct LogoUpload {
    pub filename: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl LogoUpload {
    pub fn validate(&self) -> Result<(), AppError> {
        if !self.content_type.starts_with("image/") {
            return Err(AppError::validation_error("logo: must be an image"));
        }
        if self.bytes.is_empty() {
            return Err(AppError::validation_error("logo: uploaded file is empty"));
        }
        if self.bytes.len() > MAX_LOGO_BYTES {
            return Err(AppError::validation_error("logo: must not exceed 2MB"));
        }
        Ok(())
    }
}

/// Read model handed to whatever renders the settings page.
#[derive(Debug, Serialize)]
pub struct CompanySettingsView {
    pub settings: CompanySettings,
    pub logo_url: Option<String>,
    pub currencies: Vec<Currency>,
    pub base_currency: Currency,
}

/// Form fields arrive as text; an empty or whitespace-only submission is
/// treated as omitted.
pub fn non_empty(value: String) -> Option<String> {
    if value.trim().is_empty() {
        None
    } else {
        Some(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use claim::{assert_err, assert_none, assert_ok, assert_some};
    use fake::faker::internet::en::SafeEmail;
    use fake::Fake;
    use quickcheck::{Arbitrary, Gen};

    fn valid_command() -> UpdateCompanySettings {
        UpdateCompanySettings {
            currency: "UGX".to_string(),
            currency_symbol: "UGX".to_string(),
            date_format: "d/m/Y".to_string(),
            timezone: "Africa/Kampala".to_string(),
            ..UpdateCompanySettings::default()
        }
    }

    #[test]
    fn defaults_match_an_absent_record() {
        let settings = CompanySettings::default();
        assert_eq!(settings.id, 1);
        assert_eq!(settings.currency, "UGX");
        assert_eq!(settings.currency_symbol, "UGX");
        assert_eq!(settings.date_format, "d/m/Y");
        assert_eq!(settings.timezone, "Africa/Kampala");
        assert_none!(settings.company_name);
        assert_none!(settings.logo_path);
        assert_none!(settings.lock_before_date);
    }

    #[test]
    fn a_minimal_command_is_valid() {
        assert_ok!(valid_command().validate());
    }

    #[test]
    fn generated_emails_are_accepted() {
        let mut command = valid_command();
        command.company_email = Some(SafeEmail().fake());
        assert_ok!(command.validate());
    }

    #[test]
    fn malformed_email_is_rejected_and_names_the_field() {
        let mut command = valid_command();
        command.company_email = Some("not-an-email".to_string());

        let errors = command.validate();
        assert_err!(&errors);
        let err: AppError = errors.unwrap_err().into();
        assert!(err.message().contains("company_email"));
    }

    #[test]
    fn oversized_fields_are_rejected() {
        let mut command = valid_command();
        command.company_name = Some("x".repeat(256));
        assert_err!(command.validate());

        let mut command = valid_command();
        command.company_phone = Some("7".repeat(51));
        assert_err!(command.validate());

        let mut command = valid_command();
        command.company_address = Some("a".repeat(501));
        assert_err!(command.validate());

        let mut command = valid_command();
        command.tax_id = Some("t".repeat(101));
        assert_err!(command.validate());

        let mut command = valid_command();
        command.currency = "TOOLONGCODE".to_string();
        assert_err!(command.validate());
    }

    #[test]
    fn company_name_with_forbidden_characters_is_rejected() {
        let mut command = valid_command();
        command.company_name = Some("Acme <script>".to_string());
        assert_err!(command.validate());
    }

    #[test]
    fn missing_required_fields_are_rejected() {
        let mut command = valid_command();
        command.currency = String::new();
        assert_err!(command.validate());

        let mut command = valid_command();
        command.timezone = String::new();
        assert_err!(command.validate());
    }

    #[test]
    fn unknown_timezone_is_rejected() {
        let mut command = valid_command();
        command.timezone = "Mars/Olympus_Mons".to_string();
        assert_err!(command.validate());
    }

    #[test]
    fn apply_overwrites_provided_and_keeps_omitted_fields() {
        let mut settings = CompanySettings {
            company_name: Some("Code Academy Uganda".to_string()),
            company_email: Some("info@codeacademy.ug".to_string()),
            ..CompanySettings::default()
        };

        let mut command = valid_command();
        command.company_email = Some("accounts@codeacademy.ug".to_string());
        command.company_phone = Some("+256-700-000000".to_string());
        command.currency = "USD".to_string();
        command.currency_symbol = "$".to_string();

        settings.apply(&command);

        assert_eq!(settings.company_name.as_deref(), Some("Code Academy Uganda"));
        assert_eq!(
            settings.company_email.as_deref(),
            Some("accounts@codeacademy.ug")
        );
        assert_eq!(settings.company_phone.as_deref(), Some("+256-700-000000"));
        assert_eq!(settings.currency, "USD");
        assert_eq!(settings.currency_symbol, "$");
    }

    #[test]
    fn apply_sets_the_period_lock_date() {
        let mut settings = CompanySettings::default();
        let mut command = valid_command();
        command.lock_before_date = NaiveDate::from_ymd_opt(2024, 7, 1);

        settings.apply(&command);
        assert_some!(settings.lock_before_date);
    }

    #[test]
    fn non_empty_drops_blank_submissions() {
        assert_none!(non_empty(String::new()));
        assert_none!(non_empty("   ".to_string()));
        assert_eq!(non_empty("UGX".to_string()).as_deref(), Some("UGX"));
    }

    #[test]
    fn logo_upload_checks_type_and_size() {
        let upload = LogoUpload {
            filename: "logo.png".to_string(),
            content_type: "image/png".to_string(),
            bytes: vec![0u8; 1024],
        };
        assert_ok!(upload.validate());

        let oversized = LogoUpload {
            bytes: vec![0u8; MAX_LOGO_BYTES + 100_000],
            ..upload.clone()
        };
        let err = oversized.validate().unwrap_err();
        assert!(err.message().contains("logo"));

        let not_an_image = LogoUpload {
            content_type: "application/pdf".to_string(),
            ..upload.clone()
        };
        assert_err!(not_an_image.validate());

        let empty = LogoUpload {
            bytes: Vec::new(),
            ..upload
        };
        assert_err!(empty.validate());
    }

    #[derive(Clone, Debug)]
    struct AnySettings(CompanySettings);

    impl Arbitrary for AnySettings {
        fn arbitrary<G: Gen>(g: &mut G) -> Self {
            AnySettings(CompanySettings {
                company_name: Option::<String>::arbitrary(g),
                company_email: Option::<String>::arbitrary(g),
                company_phone: Option::<String>::arbitrary(g),
                company_address: Option::<String>::arbitrary(g),
                tax_id: Option::<String>::arbitrary(g),
                currency: String::arbitrary(g),
                currency_symbol: String::arbitrary(g),
                date_format: String::arbitrary(g),
                timezone: String::arbitrary(g),
                logo_path: Option::<String>::arbitrary(g),
                lock_before_date: arbitrary_date(g),
                ..CompanySettings::default()
            })
        }
    }

    #[derive(Clone, Debug)]
    struct AnyCommand(UpdateCompanySettings);

    impl Arbitrary for AnyCommand {
        fn arbitrary<G: Gen>(g: &mut G) -> Self {
            AnyCommand(UpdateCompanySettings {
                company_name: Option::<String>::arbitrary(g),
                company_email: Option::<String>::arbitrary(g),
                company_phone: Option::<String>::arbitrary(g),
                company_address: Option::<String>::arbitrary(g),
                tax_id: Option::<String>::arbitrary(g),
                currency: String::arbitrary(g),
                currency_symbol: String::arbitrary(g),
                date_format: String::arbitrary(g),
                timezone: String::arbitrary(g),
                lock_before_date: arbitrary_date(g),
            })
        }
    }

    fn arbitrary_date<G: Gen>(g: &mut G) -> Option<NaiveDate> {
        if bool::arbitrary(g) {
            let offset = i64::from(u16::arbitrary(g) % 3650);
            NaiveDate::from_ymd_opt(2020, 1, 1).map(|d| d + chrono::Duration::days(offset))
        } else {
            None
        }
    }

    #[quickcheck_macros::quickcheck]
    fn apply_is_the_union_of_previous_and_supplied(
        base: AnySettings,
        command: AnyCommand,
    ) -> bool {
        let mut merged = base.0.clone();
        merged.apply(&command.0);

        merged.company_name == command.0.company_name.clone().or(base.0.company_name.clone())
            && merged.company_email
                == command.0.company_email.clone().or(base.0.company_email.clone())
            && merged.company_phone
                == command.0.company_phone.clone().or(base.0.company_phone.clone())
            && merged.company_address
                == command
                    .0
                    .company_address
                    .clone()
                    .or(base.0.company_address.clone())
            && merged.tax_id == command.0.tax_id.clone().or(base.0.tax_id.clone())
            && merged.currency == command.0.currency
            && merged.currency_symbol == command.0.currency_symbol
            && merged.date_format == command.0.date_format
            && merged.timezone == command.0.timezone
            && merged.lock_before_date == command.0.lock_before_date.or(base.0.lock_before_date)
            && merged.logo_path == base.0.logo_path
    }

    #[quickcheck_macros::quickcheck]
    fn apply_is_idempotent(base: AnySettings, command: AnyCommand) -> bool {
        let mut once = base.0.clone();
        once.apply(&command.0);

        let mut twice = once.clone();
        twice.apply(&command.0);

        once == twice
    }
}
