//! Shared engine handle for listeners that call back into the engine.
//!
//! A listener can only reach the engine through shared ownership. The
//! handle runs each operation under a short `borrow_mut`, releases it, and
//! only then dispatches the queued events, so handlers may read the engine
//! or start further operations.

use std::cell::{Ref, RefCell};
use std::rc::{Rc, Weak};

use crate::engine::MentionEngine;
use crate::host::TextHost;

/// Reference-counted engine that dispatches events outside its borrow.
///
/// `should_add_mention_on_return_key` is still answered while the engine is
/// borrowed, so that hook must not touch the engine.
pub struct SharedEngine<H: TextHost> {
    inner: Rc<RefCell<MentionEngine<H>>>,
}

impl<H: TextHost> Clone for SharedEngine<H> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<H: TextHost> SharedEngine<H> {
    pub fn new(mut engine: MentionEngine<H>) -> Self {
        engine.defer_events(true);
        Self {
            inner: Rc::new(RefCell::new(engine)),
        }
    }

    /// Handle that does not keep the engine alive, for listeners to hold
    pub fn downgrade(&self) -> WeakEngine<H> {
        WeakEngine {
            inner: Rc::downgrade(&self.inner),
        }
    }

    /// Read access. Panics if called from inside [`SharedEngine::update`].
    pub fn borrow(&self) -> Ref<'_, MentionEngine<H>> {
        self.inner.borrow()
    }

    /// Run `f` on the engine, then dispatch the events it queued.
    ///
    /// Handlers run after the borrow is released and may call back into
    /// this handle. Events from nested updates are dispatched by the nested
    /// call, before the rest of the outer batch.
    pub fn update<R>(&self, f: impl FnOnce(&mut MentionEngine<H>) -> R) -> R {
        let (result, events, listener) = {
            let mut engine = self.inner.borrow_mut();
            let result = f(&mut engine);
            (result, engine.take_events(), engine.listener())
        };

        if let Some(listener) = listener {
            for event in &events {
                event.dispatch(&*listener);
            }
        }
        result
    }

    /// Give the engine back once no other handle is left
    pub fn try_unwrap(self) -> Result<MentionEngine<H>, Self> {
        Rc::try_unwrap(self.inner)
            .map(|cell| {
                let mut engine = cell.into_inner();
                engine.defer_events(false);
                engine
            })
            .map_err(|inner| Self { inner })
    }
}

/// Non-owning [`SharedEngine`] handle
pub struct WeakEngine<H: TextHost> {
    inner: Weak<RefCell<MentionEngine<H>>>,
}

impl<H: TextHost> Clone for WeakEngine<H> {
    fn clone(&self) -> Self {
        Self {
            inner: Weak::clone(&self.inner),
        }
    }
}

impl<H: TextHost> WeakEngine<H> {
    pub fn upgrade(&self) -> Option<SharedEngine<H>> {
        self.inner.upgrade().map(|inner| SharedEngine { inner })
    }
}
