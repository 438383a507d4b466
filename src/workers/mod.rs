pub mod code_cleanup;

pub use code_cleanup::spawn_code_cleanup;
