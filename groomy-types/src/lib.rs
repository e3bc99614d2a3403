//! # Groomy Types
//!
//! Domain types and port traits for the grooming reservation payments
//! service. This crate has ZERO external IO dependencies - only data
//! structures, business rules, and trait definitions.
//!
//! ## Architecture
//!
//! This crate represents the **innermost core** of the hexagonal architecture:
//! - `domain/` - Pure domain types (Quote, SelectedQuote, Payment, Notification)
//! - `ports/` - Trait definitions that adapters must implement
//! - `dto/` - Data Transfer Objects for API boundaries
//! - `error/` - Domain and application error types

pub mod domain;
pub mod dto;
pub mod error;
pub mod ports;

// Re-export commonly used types
pub use domain::{
    CancellationView, CustomerId, DogId, GroomerId, Notification, NotificationId,
    NotificationType, Payment, PaymentId, PaymentStatus, Quote, QuoteId, QuotePaymentView,
    QuoteRequest, QuoteRequestId, QuoteRequestStatus, QuoteStatus, RecipientRole,
    RequestScope, ReservationCancelled, ReservationConfirmed, ReservationEvent,
    ReservationStatus, SelectedQuote, SelectedQuoteId, UserId, PAYMENT_STATUS_GROUP,
};
pub use dto::*;
pub use error::{AppError, DomainError, RepoError};
pub use ports::{GatewayError, PaymentGateway, ReservationRepository};
