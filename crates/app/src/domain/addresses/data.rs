//! Address Data

use crate::domain::addresses::errors::AddressesServiceError;

/// Address fields supplied on create and on update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddressDetails {
    pub street: String,
    pub city: String,
    pub state: String,
    pub postal_code: String,
    pub country: String,
    pub is_primary: bool,
}

impl AddressDetails {
    /// Trims every text field, rejecting blanks.
    ///
    /// # Errors
    ///
    /// [`AddressesServiceError::MissingField`] naming the first blank field.
    pub fn normalized(mut self) -> Result<Self, AddressesServiceError> {
        for (field, name) in [
            (&mut self.street, "street"),
            (&mut self.city, "city"),
            (&mut self.state, "state"),
            (&mut self.postal_code, "postalCode"),
            (&mut self.country, "country"),
        ] {
            let trimmed = field.trim();

            if trimmed.is_empty() {
                return Err(AddressesServiceError::MissingField(name));
            }

            *field = trimmed.to_string();
        }

        Ok(self)
    }
}
