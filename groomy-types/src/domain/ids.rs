//! Uuid-backed identifier newtypes.
//!
//! Every aggregate gets its own id type so a `QuoteId` can never be passed
//! where a `CustomerId` is expected.

macro_rules! define_id {
    ($(#[$doc:meta])+ $name:ident) => {
        $(#[$doc])+
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
        #[serde(transparent)]
        pub struct $name(uuid::Uuid);

        impl $name {
            /// Creates a new random id.
            pub fn new() -> Self {
                Self(uuid::Uuid::new_v4())
            }

            /// Creates an id from an existing UUID.
            pub fn from_uuid(uuid: uuid::Uuid) -> Self {
                Self(uuid)
            }

            /// Returns the underlying UUID.
            pub fn as_uuid(&self) -> &uuid::Uuid {
                &self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl std::str::FromStr for $name {
            type Err = uuid::Error;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Ok(Self(uuid::Uuid::parse_str(s)?))
            }
        }
    };
}

define_id!(
    /// Unique identifier for a grooming quote request.
    QuoteRequestId
);
define_id!(
    /// Unique identifier for a groomer's quote (bid).
    QuoteId
);
define_id!(
    /// Unique identifier for a reservation (selected quote).
    SelectedQuoteId
);
define_id!(
    /// Unique identifier for a payment record.
    PaymentId
);
define_id!(
    /// Unique identifier for a customer profile.
    CustomerId
);
define_id!(
    /// Unique identifier for a groomer profile.
    GroomerId
);
define_id!(
    /// Unique identifier for a platform user account.
    UserId
);
define_id!(
    /// Unique identifier for a customer's dog.
    DogId
);
define_id!(
    /// Unique identifier for a notification row.
    NotificationId
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_id_roundtrip_through_string() {
        let id = QuoteId::new();
        let parsed: QuoteId = id.to_string().parse().unwrap();
        assert_eq!(id, parsed);
    }

    #[test]
    fn test_invalid_id_fails_to_parse() {
        assert!("not-a-uuid".parse::<PaymentId>().is_err());
    }
}
