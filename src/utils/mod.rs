pub mod formatter;

pub use formatter::RequestFormatter;
