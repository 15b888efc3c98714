mod entities;
mod pagination;

pub use entities::*;
pub use pagination::Pagination;
