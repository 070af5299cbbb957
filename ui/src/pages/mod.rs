pub mod billing;
pub mod dashboard;
pub mod login;
pub mod my_stuff;
pub mod not_found;
pub mod recall_detail;
pub mod scan;
pub mod settings;
pub mod subscriptions;
pub mod transparency;

pub use billing::BillingPage;
pub use dashboard::DashboardPage;
pub use login::LoginPage;
pub use my_stuff::MyStuffPage;
pub use not_found::NotFoundPage;
pub use recall_detail::RecallDetailPage;
pub use scan::ScanPage;
pub use settings::SettingsPage;
pub use subscriptions::SubscriptionsPage;
pub use transparency::TransparencyPage;
