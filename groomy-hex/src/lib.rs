//! # Groomy Hex
//!
//! Application service layer and HTTP adapter for the reservation
//! payments service.
//!
//! ## Architecture
//!
//! - `service/` - Application service (orchestrates the payment workflows)
//! - `notifier/` - Post-commit event channel and notification worker
//! - `sweeper/` - Scheduled retention purge
//! - `inbound/` - HTTP adapter (Axum server)
//!
//! The service is generic over `R: ReservationRepository` and
//! `G: PaymentGateway`, allowing different adapter implementations to be
//! injected.

pub mod inbound;
pub mod notifier;
pub mod service;
pub mod sweeper;


pub use notifier::{EventPublisher, NotificationWorker};
pub use service::ReservationPaymentService;
pub use sweeper::RetentionSweeper;
