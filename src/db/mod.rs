pub mod db;
pub mod engagementdb;
pub mod listingdb;
pub mod notificationdb;
pub mod providerdb;
pub mod reportdb;
pub mod reviewdb;
pub mod subscriptiondb;
pub mod userdb;
