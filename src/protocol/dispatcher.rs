use std::borrow::Cow;
use std::collections::HashMap;

/// Closed set of interception handlers. Packet kinds the bridge knows how
/// to inspect get a variant here; everything else passes through raw.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandlerKind {
    /// Versioned chat filtering (quiet mode).
    Chat,
}

/// Routes logical packet names to handlers with zero-copy keys for statics.
/// Uses Cow<'static, str> to avoid heap allocations for known packet names.
///
/// Built once per process and only read per message afterwards, so no
/// interior locking is needed.
#[derive(Debug)]
pub struct Dispatcher {
    handlers: HashMap<Cow<'static, str>, HandlerKind>,
}

impl Default for Dispatcher {
    fn default() -> Self {
        Self::with_defaults()
    }
}

impl Dispatcher {
    /// An empty dispatcher. Every packet resolves to pass-through.
    pub fn new() -> Self {
        Self {
            handlers: HashMap::new(),
        }
    }

    /// A dispatcher with the built-in interception routes registered.
    pub fn with_defaults() -> Self {
        let mut dispatcher = Self::new();
        dispatcher.register("chat_message", HandlerKind::Chat);
        dispatcher
    }

    pub fn register(&mut self, name: impl Into<Cow<'static, str>>, kind: HandlerKind) {
        self.handlers.insert(name.into(), kind);
    }

    /// Resolve a logical packet name to its handler, if one is registered.
    /// `None` means the packet is not intercepted and forwards raw.
    pub fn resolve(&self, name: &str) -> Option<HandlerKind> {
        self.handlers.get(name).copied()
    }
}
