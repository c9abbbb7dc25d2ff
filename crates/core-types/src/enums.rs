use serde::{Deserialize, Serialize};
use std::fmt;

/// The fields of a school submission, in the order the form presents them.
///
/// The string form matches the multipart field names accepted by
/// `POST /api/schools`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    Name,
    Address,
    City,
    State,
    Contact,
    EmailId,
    Image,
}

impl Field {
    pub const ALL: [Field; 7] = [
        Field::Name,
        Field::Address,
        Field::City,
        Field::State,
        Field::Contact,
        Field::EmailId,
        Field::Image,
    ];

    /// Returns the wire name of the field.
    pub fn as_str(&self) -> &'static str {
        match self {
            Field::Name => "name",
            Field::Address => "address",
            Field::City => "city",
            Field::State => "state",
            Field::Contact => "contact",
            Field::EmailId => "email_id",
            Field::Image => "image",
        }
    }

    /// Looks a field up by its wire name.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|f| f.as_str() == name)
    }

    /// The label shown next to the input on the add-school form.
    pub fn label(&self) -> &'static str {
        match self {
            Field::Name => "School Name",
            Field::Address => "Address",
            Field::City => "City",
            Field::State => "State",
            Field::Contact => "Contact Number",
            Field::EmailId => "Email Address",
            Field::Image => "School Image",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
