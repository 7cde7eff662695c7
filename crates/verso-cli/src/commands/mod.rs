pub mod build;
pub mod config;
pub mod recommend;
pub mod status;

pub use build::run_build;
pub use recommend::run_recommend;
pub use status::show_status;
