pub mod layout;
pub mod login_form;
pub mod markdown_text;
pub mod recall_drawer;
pub mod require_auth;
pub mod toast;

pub use login_form::LoginForm;
pub use markdown_text::MarkdownText;
pub use recall_drawer::RecallDrawer;
pub use require_auth::RequireAuth;
pub use toast::ToastContainer;
