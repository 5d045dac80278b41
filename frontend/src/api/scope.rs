use std::cell::Cell;
use std::rc::Rc;

use web_sys::{AbortController, AbortSignal};
use yew::prelude::*;

use crate::error::ApiError;

/// Lifetime of the requests a component starts. Cancelling aborts whatever
/// is in flight and makes late results unobservable.
#[derive(Clone)]
pub struct RequestScope {
    controller: Option<AbortController>,
    alive: Rc<Cell<bool>>,
}

impl RequestScope {
    pub fn new() -> Self {
        Self::with_controller(AbortController::new().ok())
    }

    fn with_controller(controller: Option<AbortController>) -> Self {
        Self {
            controller,
            alive: Rc::new(Cell::new(true)),
        }
    }

    pub fn signal(&self) -> Option<AbortSignal> {
        self.controller.as_ref().map(|c| c.signal())
    }

    pub fn is_alive(&self) -> bool {
        self.alive.get()
    }

    pub fn cancel(&self) {
        if self.alive.replace(false) {
            if let Some(controller) = &self.controller {
                controller.abort();
            }
        }
    }

    /// Filters a call result down to what the component may still act on:
    /// `None` once the scope is gone or the error ends the page (expired
    /// session, cancellation).
    pub fn settle<T>(&self, result: Result<T, ApiError>) -> Option<Result<T, ApiError>> {
        if !self.is_alive() {
            return None;
        }
        match result {
            Err(e) if e.is_terminal() => None,
            other => Some(other),
        }
    }
}

impl Default for RequestScope {
    fn default() -> Self {
        Self::new()
    }
}

/// A [`RequestScope`] bound to the calling component: created on mount,
/// cancelled on unmount.
#[hook]
pub fn use_request_scope() -> RequestScope {
    let scope = use_memo(|_| RequestScope::new(), ());
    {
        let scope = scope.clone();
        use_effect_with_deps(move |_| move || scope.cancel(), ());
    }
    (*scope).clone()
}
