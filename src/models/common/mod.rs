pub mod pagination;
pub mod response;

pub use pagination::{Paginated, PaginatedResponse, PaginationQuery};
pub use response::ApiResponse;
