pub mod event;

pub use event::{EventService, ListFilters, PageRequest, Pagination};
