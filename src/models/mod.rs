pub mod playlist;

pub use playlist::{required_credentials, CategoriesRequest, CategoriesResponse, ServeM3uQuery};
