mod dashboard;
mod getresponse;
mod logout;
mod members;

pub use dashboard::admin_dashboard;
pub use getresponse::*;
pub use logout::logout;
pub use members::*;
