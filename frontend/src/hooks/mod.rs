pub mod use_calendar;
pub mod use_cart;
pub mod use_notifications;
pub mod use_pricing;
