pub mod availability;
pub mod booking;
pub mod dashboard;
pub mod lifecycle;

pub use availability::filter_available;
pub use booking::BookingService;
pub use dashboard::DashboardService;
pub use lifecycle::AppointmentLifecycleService;
