pub mod queries;

pub use queries::ContentQuery;
