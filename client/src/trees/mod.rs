pub mod tree_service;

pub use tree_service::TreeService;
