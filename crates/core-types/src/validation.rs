//! The validation schema for a candidate school record.
//!
//! The add-school page runs [`validate_school`] before it sends anything, and
//! the creation endpoint runs the same predicates again: a client-side pass is
//! only an optimization and is never trusted.

use crate::enums::Field;
use crate::error::FieldErrors;
use crate::school::{ImageFile, NewSchool};
use regex::Regex;
use std::sync::LazyLock;

/// The authoritative image size ceiling, in bytes.
pub const MAX_IMAGE_BYTES: u64 = 5_000_000;

/// MIME types accepted for the school image. The file extension is never
/// consulted.
pub const ALLOWED_IMAGE_TYPES: [&str; 4] = ["image/jpeg", "image/jpg", "image/png", "image/webp"];

pub const MAX_EMAIL_CHARS: usize = 255;

static CONTACT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]{10}$").expect("contact pattern is valid"));

static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^[A-Za-z0-9_%+-]+(?:\.[A-Za-z0-9_%+-]+)*@[A-Za-z0-9](?:[A-Za-z0-9-]*[A-Za-z0-9])?(?:\.[A-Za-z0-9](?:[A-Za-z0-9-]*[A-Za-z0-9])?)*\.[A-Za-z]{2,}$",
    )
    .expect("email pattern is valid")
});

/// A candidate record as entered on the form, before any checks.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SchoolForm {
    pub name: String,
    pub address: String,
    pub city: String,
    pub state: String,
    pub contact: String,
    pub email_id: String,
    /// Every file attached to the image input. Exactly one is required.
    pub images: Vec<ImageFile>,
}

impl SchoolForm {
    /// The raw text value of a text field. `Field::Image` has no text value.
    pub fn text(&self, field: Field) -> Option<&str> {
        match field {
            Field::Name => Some(&self.name),
            Field::Address => Some(&self.address),
            Field::City => Some(&self.city),
            Field::State => Some(&self.state),
            Field::Contact => Some(&self.contact),
            Field::EmailId => Some(&self.email_id),
            Field::Image => None,
        }
    }

    /// Fields that are absent: blank text, or no attached file.
    pub fn missing_fields(&self) -> Vec<Field> {
        Field::ALL
            .into_iter()
            .filter(|field| match self.text(*field) {
                Some(value) => value.trim().is_empty(),
                None => self.images.is_empty(),
            })
            .collect()
    }
}

pub fn is_valid_contact(contact: &str) -> bool {
    CONTACT_RE.is_match(contact)
}

/// Checks address syntax only; the length ceiling is a separate rule.
pub fn is_valid_email(email: &str) -> bool {
    EMAIL_RE.is_match(email)
}

pub fn is_allowed_image_type(mime_type: &str) -> bool {
    let mime = mime_type.trim().to_ascii_lowercase();
    ALLOWED_IMAGE_TYPES.contains(&mime.as_str())
}

pub fn is_within_size(file: &ImageFile, max_bytes: u64) -> bool {
    file.size_bytes <= max_bytes
}

/// Human form of a byte ceiling, e.g. `5MB`.
pub fn describe_limit(max_bytes: u64) -> String {
    if max_bytes >= 1_000_000 && max_bytes % 1_000_000 == 0 {
        format!("{}MB", max_bytes / 1_000_000)
    } else if max_bytes >= 1024 * 1024 && max_bytes % (1024 * 1024) == 0 {
        format!("{}MB", max_bytes / (1024 * 1024))
    } else {
        format!("{} bytes", max_bytes)
    }
}

fn check_length(
    errors: &mut FieldErrors,
    field: Field,
    value: &str,
    min: usize,
    max: usize,
    label: &str,
) {
    let len = value.chars().count();
    if len < min {
        errors.add(field, format!("{label} must be at least {min} characters"));
    } else if len > max {
        errors.add(field, format!("{label} must not exceed {max} characters"));
    }
}

/// Runs every rule against `form`.
///
/// On success the trimmed text values are returned as a [`NewSchool`] with no
/// image location; the caller fills that in once the file is stored.
pub fn validate_school(form: &SchoolForm, max_image_bytes: u64) -> Result<NewSchool, FieldErrors> {
    let mut errors = FieldErrors::new();

    let name = form.name.trim();
    let address = form.address.trim();
    let city = form.city.trim();
    let state = form.state.trim();
    let contact = form.contact.trim();
    let email_id = form.email_id.trim();

    check_length(&mut errors, Field::Name, name, 2, 100, "School name");
    check_length(&mut errors, Field::Address, address, 10, 200, "Address");
    check_length(&mut errors, Field::City, city, 2, 50, "City");
    check_length(&mut errors, Field::State, state, 2, 50, "State");

    if !is_valid_contact(contact) {
        errors.add(Field::Contact, "Contact number must be exactly 10 digits");
    }

    if !is_valid_email(email_id) {
        errors.add(Field::EmailId, "Please enter a valid email address");
    } else if email_id.chars().count() > MAX_EMAIL_CHARS {
        errors.add(Field::EmailId, "Email must not exceed 255 characters");
    }

    match form.images.as_slice() {
        [file] => {
            if !is_within_size(file, max_image_bytes) {
                errors.add(
                    Field::Image,
                    format!("Max file size is {}", describe_limit(max_image_bytes)),
                );
            } else if !is_allowed_image_type(&file.mime_type) {
                errors.add(Field::Image, "Only .jpg, .jpeg, .png and .webp files are accepted");
            }
        }
        _ => errors.add(Field::Image, "Image is required"),
    }

    if !errors.is_empty() {
        return Err(errors);
    }

    Ok(NewSchool {
        name: name.to_string(),
        address: address.to_string(),
        city: city.to_string(),
        state: state.to_string(),
        contact: contact.to_string(),
        email_id: email_id.to_string(),
        image: None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lincoln() -> SchoolForm {
        SchoolForm {
            name: "Lincoln High".into(),
            address: "123 Main St, Springfield".into(),
            city: "Springfield".into(),
            state: "IL".into(),
            contact: "5551234567".into(),
            email_id: "admin@lincoln.edu".into(),
            images: vec![ImageFile::new("front.jpg", "image/jpeg", 200 * 1024)],
        }
    }

    #[test]
    fn accepts_a_complete_record() {
        let school = validate_school(&lincoln(), MAX_IMAGE_BYTES).unwrap();
        assert_eq!(school.name, "Lincoln High");
        assert_eq!(school.contact, "5551234567");
        assert_eq!(school.image, None);
    }

    #[test]
    fn trims_surrounding_whitespace() {
        let mut form = lincoln();
        form.city = "  Springfield ".into();
        let school = validate_school(&form, MAX_IMAGE_BYTES).unwrap();
        assert_eq!(school.city, "Springfield");
    }

    #[test]
    fn contact_must_be_exactly_ten_digits() {
        assert!(is_valid_contact("1234567890"));
        assert!(!is_valid_contact("12345"));
        assert!(!is_valid_contact("555-123"));
        assert!(!is_valid_contact("12345678901"));
        assert!(!is_valid_contact("12345abcde"));
    }

    #[test]
    fn email_syntax() {
        assert!(is_valid_email("a@b.co"));
        assert!(is_valid_email("admin@lincoln.edu"));
        assert!(is_valid_email("first.last+tag@mail.example.org"));
        assert!(!is_valid_email("not-an-email"));
        assert!(!is_valid_email("a@b"));
        assert!(!is_valid_email("a b@c.com"));
        assert!(!is_valid_email("@c.com"));
    }

    #[test]
    fn email_length_ceiling() {
        let mut form = lincoln();
        form.email_id = format!("{}@example.com", "a".repeat(250));
        let errors = validate_school(&form, MAX_IMAGE_BYTES).unwrap_err();
        assert_eq!(errors.get(Field::EmailId), Some("Email must not exceed 255 characters"));
    }

    #[test]
    fn length_bounds_report_the_first_failing_rule() {
        let mut form = lincoln();
        form.name = "L".into();
        form.address = "short".into();
        form.state = "I".repeat(51);
        let errors = validate_school(&form, MAX_IMAGE_BYTES).unwrap_err();
        assert_eq!(errors.get(Field::Name), Some("School name must be at least 2 characters"));
        assert_eq!(errors.get(Field::Address), Some("Address must be at least 10 characters"));
        assert_eq!(errors.get(Field::State), Some("State must not exceed 50 characters"));
        assert!(!errors.contains(Field::City));
        assert_eq!(errors.first().map(|(f, _)| f), Some(Field::Name));
    }

    #[test]
    fn image_mime_is_checked_regardless_of_extension() {
        let mut form = lincoln();
        form.images = vec![ImageFile::new("photo.jpg", "image/gif", 1000)];
        let errors = validate_school(&form, MAX_IMAGE_BYTES).unwrap_err();
        assert_eq!(
            errors.get(Field::Image),
            Some("Only .jpg, .jpeg, .png and .webp files are accepted")
        );

        assert!(is_allowed_image_type("image/webp"));
        assert!(is_allowed_image_type("IMAGE/PNG"));
        assert!(!is_allowed_image_type("application/pdf"));
        assert!(!is_allowed_image_type("image/svg+xml"));
    }

    #[test]
    fn image_count_and_size() {
        let mut form = lincoln();
        form.images.clear();
        let errors = validate_school(&form, MAX_IMAGE_BYTES).unwrap_err();
        assert_eq!(errors.get(Field::Image), Some("Image is required"));

        form.images = vec![
            ImageFile::new("a.png", "image/png", 10),
            ImageFile::new("b.png", "image/png", 10),
        ];
        assert!(validate_school(&form, MAX_IMAGE_BYTES).is_err());

        form.images = vec![ImageFile::new("a.png", "image/png", MAX_IMAGE_BYTES + 1)];
        let errors = validate_school(&form, MAX_IMAGE_BYTES).unwrap_err();
        assert_eq!(errors.get(Field::Image), Some("Max file size is 5MB"));

        form.images = vec![ImageFile::new("a.png", "image/png", MAX_IMAGE_BYTES)];
        assert!(validate_school(&form, MAX_IMAGE_BYTES).is_ok());
    }

    #[test]
    fn missing_fields_treats_blank_text_as_absent() {
        let mut form = lincoln();
        form.city = "   ".into();
        form.images.clear();
        assert_eq!(form.missing_fields(), vec![Field::City, Field::Image]);
        assert!(lincoln().missing_fields().is_empty());
    }

    #[test]
    fn describes_limits() {
        assert_eq!(describe_limit(5_000_000), "5MB");
        assert_eq!(describe_limit(10 * 1024 * 1024), "10MB");
        assert_eq!(describe_limit(1500), "1500 bytes");
    }
}
