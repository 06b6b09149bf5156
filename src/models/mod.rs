pub mod event;
pub mod member;
pub mod user;

pub use event::{Event, EventResponse};
pub use member::Role;
pub use user::AttendeeProfile;
