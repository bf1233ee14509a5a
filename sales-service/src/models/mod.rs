//! Domain models for sales-service.

mod client;
mod company;
mod delivery;
mod invoice;
mod order;
mod profile;
mod quote;
mod site;
mod target;
pub mod totals;

pub use client::{
    check_type_fields, merge_type_identifiers, Client, ClientType, CreateClient, UpdateClient,
};
pub use company::{Company, CreateCompany, LegalForm, UpdateCompany};
pub use delivery::{
    CreateDeliveryLine, CreateDeliveryNote, DeliveryLine, DeliveryNote, DeliveryStatus,
    UpdateDeliveryLine, UpdateDeliveryNote,
};
pub use invoice::{
    compute_remaining, compute_tax, tax_rate, BillingStatus, CreateInvoice, Invoice, PaymentStatus,
    ShippingStatus, UpdateInvoice,
};
pub use order::{
    CreateOrderLine, CreatePurchaseOrder, OrderLine, PurchaseOrder, UpdateOrderLine,
    UpdatePurchaseOrder,
};
pub use profile::{Profile, ProfileRow, Role};
pub use quote::{
    CreateQuote, CreateQuoteLine, DocumentStatus, Quote, QuoteLine, UpdateQuote, UpdateQuoteLine,
};
pub use site::{CreateSite, InvoiceFooter, Region, Site, UpdateSite};
pub use target::{CreateMonthlyTarget, MonthlyTarget};
