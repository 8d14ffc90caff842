pub mod job;
pub mod response;

pub use job::{Category, ClientSummary, JobRecord, JobSearchResult, PagingInfo};
