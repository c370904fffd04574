// Library exports for the Benji's Deli storefront behaviors

pub mod animation;
pub mod behaviors;
pub mod config;
pub mod constants;
pub mod dom;
pub mod hours;
pub mod schedule;
pub mod site;
pub mod storefront;
pub mod ui;
pub mod utils;
pub mod visibility;

// Re-export commonly used types
pub use config::SiteConfig;
pub use dom::{Document, ElementId, Page};
pub use hours::{Clock, FixedClock, OpenState, SystemClock, WeeklySchedule};
pub use site::Site;
pub use storefront::{Storefront, StorefrontSnapshot};
pub use utils::error::{SiteError, SiteResult};
