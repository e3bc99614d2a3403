//! Domain models for the reservation payments service.

pub mod event;
pub mod ids;
pub mod notification;
pub mod payment;
pub mod quote;
pub mod reservation;
pub mod view;

pub use event::{ReservationCancelled, ReservationConfirmed, ReservationEvent};
pub use ids::{
    CustomerId, DogId, GroomerId, NotificationId, PaymentId, QuoteId, QuoteRequestId,
    SelectedQuoteId, UserId,
};
pub use notification::{Notification, NotificationType, RecipientRole};
pub use payment::{Payment, PaymentStatus, PAYMENT_STATUS_GROUP};
pub use quote::{Quote, QuoteRequest, QuoteRequestStatus, QuoteStatus, RequestScope};
pub use reservation::{ReservationStatus, SelectedQuote};
pub use view::{CancellationView, QuotePaymentView};
