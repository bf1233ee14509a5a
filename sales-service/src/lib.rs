//! sales-service: back-office record keeping for one organization's
//! sales documents.
//!
//! Companies own Sites, Clients optionally attach to a Site, and the
//! commercial document chain runs Quote -> PurchaseOrder -> DeliveryNote
//! -> Invoice, each stage recomputing its derived monetary fields on
//! every save.

pub mod config;
pub mod handlers;
pub mod models;
pub mod services;
pub mod startup;

pub use startup::AppState;
