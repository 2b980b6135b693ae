pub mod calendar;
pub mod cart_panel;
pub mod notifications;
pub mod reservation_modal;
pub mod tariff_summary;
