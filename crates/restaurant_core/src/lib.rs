pub mod domain;
pub mod email_templates;
pub mod error;
pub mod hours;
pub mod notifications;
pub mod orders;
pub mod ports;
pub mod special_hours;

pub use domain::{
    DateRange, DayHours, EmailMessage, KgOrderData, KgOrderLine, KgProduct, OrderSource,
    ProductPatch, ProductUnit, RestaurantStatus, SpecialPeriod, SpecialPeriodInput, StatusReason,
    WeeklyHours,
};
pub use error::ValidationError;
pub use ports::{DatabaseService, MailService, PortError, PortResult};
