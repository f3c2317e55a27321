//! Overlay panel state.
//!
//! Which aside panel (search, cart, mobile menu, language picker) is
//! open is interactive state with an open/close lifecycle. It lives in
//! an explicit context object handed to components, not a module-level
//! singleton, so tests and server-rendered previews can hold several
//! independent instances.

/// The overlay panels a storefront can open.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AsideKind {
    Search,
    Cart,
    MobileMenu,
    Language,
}

/// Tracks which overlay panel is open, if any. At most one panel is
/// open at a time; opening one closes the others.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Aside {
    active: Option<AsideKind>,
}

impl Aside {
    /// Create a context with every panel closed.
    pub fn new() -> Self {
        Self::default()
    }

    /// Open a panel, closing any other.
    pub fn open(&mut self, kind: AsideKind) {
        self.active = Some(kind);
    }

    /// Close whatever panel is open.
    pub fn close(&mut self) {
        self.active = None;
    }

    /// The open panel, if any.
    pub fn active(&self) -> Option<AsideKind> {
        self.active
    }

    /// Whether a specific panel is open.
    pub fn is_open(&self, kind: AsideKind) -> bool {
        self.active == Some(kind)
    }
}
