pub mod engagementmodel;
pub mod listingmodel;
pub mod notificationmodel;
pub mod reportmodel;
pub mod reviewmodel;
pub mod subscriptionmodel;
pub mod usermodel;
