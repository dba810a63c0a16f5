pub mod engagement_service;
pub mod error;
pub mod identity;
pub mod notification_service;
pub mod payment_service;
pub mod provider_service;
pub mod report_service;
pub mod review_service;
pub mod side_effect;
pub mod storage;
