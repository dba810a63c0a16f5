pub mod engagement;
pub mod listing;
pub mod notification_handler;
pub mod payment;
pub mod provider;
pub mod report;
pub mod review;
