//! Third-party notification targets.

use uuid::Uuid;

/// A third-party notification target, managed independently of any user and
/// linked to thresholds through a join table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Recipient {
    /// Stable row identifier.
    pub id: Uuid,
    /// Delivery address.
    pub email: String,
    /// Given name used in salutations.
    pub first_name: String,
    /// Family name used in salutations.
    pub last_name: String,
    /// Role label, e.g. `Representative`.
    pub designation: String,
}

impl Recipient {
    /// Full display name used in templates and rosters.
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.

    use super::*;

    #[test]
    fn full_name_joins_given_and_family_names() {
        let recipient = Recipient {
            id: Uuid::new_v4(),
            email: "rep@example.gov".to_owned(),
            first_name: "Jordan".to_owned(),
            last_name: "Reyes".to_owned(),
            designation: "Representative".to_owned(),
        };
        assert_eq!(recipient.full_name(), "Jordan Reyes");
    }
}
