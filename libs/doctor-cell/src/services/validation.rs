use std::sync::OnceLock;

use regex::Regex;

use crate::models::{AddDoctorForm, AddDoctorRequest, Address, DoctorError, ImageUpload};

pub const MIN_PASSWORD_LENGTH: usize = 8;

fn email_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^[A-Za-z0-9._%+-]+@[A-Za-z0-9](?:[A-Za-z0-9-]*[A-Za-z0-9])?(?:\.[A-Za-z0-9](?:[A-Za-z0-9-]*[A-Za-z0-9])?)*\.[A-Za-z]{2,}$")
            .expect("email pattern compiles")
    })
}

pub fn is_valid_email(email: &str) -> bool {
    email.len() <= 254 && email_pattern().is_match(email)
}

/// Parse the serialized address object sent by the admin panel.
pub fn parse_address(raw: &str) -> Result<Address, DoctorError> {
    let address: Address = serde_json::from_str(raw)
        .map_err(|e| DoctorError::InvalidAddress(format!("Address must be a JSON object with line1 and line2: {}", e)))?;

    if address.line1.trim().is_empty() {
        return Err(DoctorError::InvalidAddress("Address line1 must not be empty".to_string()));
    }

    Ok(address)
}

pub fn parse_fees(raw: &str) -> Result<f64, DoctorError> {
    match raw.trim().parse::<f64>() {
        Ok(fees) if fees.is_finite() && fees >= 0.0 => Ok(fees),
        _ => Err(DoctorError::InvalidInput("Fees must be a non-negative number".to_string())),
    }
}

fn image_content_type(image: &ImageUpload) -> Option<String> {
    if image.content_type.starts_with("image/") {
        return Some(image.content_type.clone());
    }

    let extension = image.file_name.rsplit('.').next()?.to_ascii_lowercase();
    let guessed = match extension.as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "webp" => "image/webp",
        "gif" => "image/gif",
        _ => return None,
    };

    Some(guessed.to_string())
}

fn take(field: Option<String>, name: &str, missing: &mut Vec<String>) -> String {
    match field {
        Some(value) if !value.trim().is_empty() => value,
        _ => {
            missing.push(name.to_string());
            String::new()
        }
    }
}

/// Check a raw registration form. Presence is checked first, then email,
/// password, address, fees and image type, so nothing reaches the stores
/// unless every check passes.
pub fn validate_add_doctor(form: AddDoctorForm) -> Result<AddDoctorRequest, DoctorError> {
    let mut missing = Vec::new();

    let name = take(form.name, "name", &mut missing);
    let email = take(form.email, "email", &mut missing);
    let password = take(form.password, "password", &mut missing);
    let speciality = take(form.speciality, "speciality", &mut missing);
    let degree = take(form.degree, "degree", &mut missing);
    let experience = take(form.experience, "experience", &mut missing);
    let about = take(form.about, "about", &mut missing);
    let fees = take(form.fees, "fees", &mut missing);
    let address = take(form.address, "address", &mut missing);

    let image = match form.image {
        Some(image) if !image.bytes.is_empty() => Some(image),
        _ => {
            missing.push("image".to_string());
            None
        }
    };

    let image = match image {
        Some(image) if missing.is_empty() => image,
        _ => return Err(DoctorError::MissingInput(missing.join(", "))),
    };

    let email = email.trim().to_string();
    if !is_valid_email(&email) {
        return Err(DoctorError::InvalidEmail);
    }

    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(DoctorError::WeakPassword);
    }

    let address = parse_address(&address)?;
    let fees = parse_fees(&fees)?;

    let content_type = image_content_type(&image)
        .ok_or_else(|| DoctorError::InvalidInput("Doctor image must be a png, jpeg, webp or gif file".to_string()))?;

    Ok(AddDoctorRequest {
        name: name.trim().to_string(),
        email,
        password,
        speciality,
        degree,
        experience,
        about,
        fees,
        address,
        image: ImageUpload { content_type, ..image },
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn complete_form() -> AddDoctorForm {
        AddDoctorForm {
            name: Some("Dr. Sarah Patel".to_string()),
            email: Some("sarah@clinic.test".to_string()),
            password: Some("12345678".to_string()),
            speciality: Some("Dermatologist".to_string()),
            degree: Some("MBBS".to_string()),
            experience: Some("1 Year".to_string()),
            about: Some("Skin specialist".to_string()),
            fees: Some("30".to_string()),
            address: Some(r#"{"line1":"37th Cross","line2":"Ring Road"}"#.to_string()),
            image: Some(ImageUpload {
                file_name: "sarah.png".to_string(),
                content_type: "image/png".to_string(),
                bytes: vec![0x89, 0x50, 0x4e, 0x47],
            }),
        }
    }

    #[test]
    fn complete_form_passes() {
        let request = validate_add_doctor(complete_form()).unwrap();

        assert_eq!(request.fees, 30.0);
        assert_eq!(request.address.line2, "Ring Road");
        assert_eq!(request.image.content_type, "image/png");
    }

    #[test]
    fn every_missing_field_is_reported() {
        let form = AddDoctorForm {
            fees: None,
            image: None,
            ..complete_form()
        };

        match validate_add_doctor(form) {
            Err(DoctorError::MissingInput(fields)) => assert_eq!(fields, "fees, image"),
            other => panic!("expected MissingInput, got {:?}", other),
        }
    }

    #[test]
    fn blank_field_counts_as_missing() {
        let form = AddDoctorForm {
            about: Some("   ".to_string()),
            ..complete_form()
        };

        assert_matches!(validate_add_doctor(form), Err(DoctorError::MissingInput(_)));
    }

    #[test]
    fn malformed_email_is_rejected() {
        let form = AddDoctorForm {
            email: Some("not-an-email".to_string()),
            ..complete_form()
        };

        assert_matches!(validate_add_doctor(form), Err(DoctorError::InvalidEmail));
    }

    #[test]
    fn password_length_boundary() {
        let seven = AddDoctorForm {
            password: Some("1234567".to_string()),
            ..complete_form()
        };
        assert_matches!(validate_add_doctor(seven), Err(DoctorError::WeakPassword));

        let eight = AddDoctorForm {
            password: Some("abcdefgh".to_string()),
            ..complete_form()
        };
        assert!(validate_add_doctor(eight).is_ok());
    }

    #[test]
    fn malformed_address_has_its_own_error() {
        let form = AddDoctorForm {
            address: Some("{line1: unquoted}".to_string()),
            ..complete_form()
        };

        assert_matches!(validate_add_doctor(form), Err(DoctorError::InvalidAddress(_)));
    }

    #[test]
    fn non_numeric_fees_are_rejected() {
        assert_matches!(parse_fees("fifty"), Err(DoctorError::InvalidInput(_)));
        assert_matches!(parse_fees("-5"), Err(DoctorError::InvalidInput(_)));
        assert_eq!(parse_fees(" 42.5 ").unwrap(), 42.5);
    }

    #[test]
    fn image_type_is_guessed_from_extension() {
        let form = AddDoctorForm {
            image: Some(ImageUpload {
                file_name: "portrait.JPG".to_string(),
                content_type: "application/octet-stream".to_string(),
                bytes: vec![1, 2, 3],
            }),
            ..complete_form()
        };

        assert_eq!(validate_add_doctor(form).unwrap().image.content_type, "image/jpeg");
    }

    #[test]
    fn email_syntax() {
        assert!(is_valid_email("first.last+tag@sub.example.org"));
        assert!(!is_valid_email("missing-at.example.com"));
        assert!(!is_valid_email("two@@example.com"));
        assert!(!is_valid_email("user@localhost"));
    }
}
