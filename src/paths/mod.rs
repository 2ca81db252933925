pub mod path;

pub use path::{is_external, os_path_to_string, strip_extension, LinkTarget};
