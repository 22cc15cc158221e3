pub mod catalog;
pub mod selection;
pub mod pricing;
pub mod checkout;
pub mod session;
pub mod schedule;
pub mod payment;
