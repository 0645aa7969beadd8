//! Configuration access port trait.

/// Read-only access to `[section] key = value` settings.
pub trait ConfigPort {
    /// Raw value, or `None` if the section or key is absent.
    fn get_string(&self, section: &str, key: &str) -> Option<String>;
    /// Boolean flag; `default` when absent or unrecognised.
    fn get_bool(&self, section: &str, key: &str, default: bool) -> bool;
}
