//! Process-wide default container.
//!
//! Only for code at the boundary that cannot be handed a [`Container`].
//! Everything inside the engine takes an explicit `&Container`, and tests
//! should build their own instead of sharing this one.

use once_cell::sync::Lazy;

use crate::container::Container;

static GLOBAL: Lazy<Container> = Lazy::new(Container::new);

/// The shared default container, created empty on first use.
///
/// ```
/// use sanduq_container::global;
///
/// global().singleton("app.name", "sanduq");
/// assert!(global().contains("app.name"));
/// ```
pub fn global() -> &'static Container {
    &GLOBAL
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn global_is_one_instance() {
        assert!(std::ptr::eq(global(), global()));
    }

    #[test]
    fn global_keeps_registrations() {
        global().singleton("global.tests.marker", 1u8);
        assert!(global().contains("global.tests.marker"));
    }
}
