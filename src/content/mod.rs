pub mod boilerplate;
pub mod sanitizer;
pub mod selector;

pub use boilerplate::strip_boilerplate;
pub use sanitizer::sanitize;
pub use selector::render_body;
