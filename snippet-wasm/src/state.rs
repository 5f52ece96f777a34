use leptos::prelude::*;

use crate::collections::{Collections, Feed};
use crate::query::SearchFilters;
use crate::session::Session;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ToastKind {
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Toast {
    pub(crate) id: u64,
    pub(crate) kind: ToastKind,
    pub(crate) message: String,
}

/// Явное состояние приложения.
///
/// Создаётся один раз в `App`, раздаётся вниз через context и живёт от
/// `init` до `dispose` — модульных глобалов нет.
#[derive(Debug, Clone, Copy)]
pub(crate) struct AppState {
    pub(crate) session: RwSignal<Session>,
    pub(crate) collections: RwSignal<Collections>,
    pub(crate) filters: RwSignal<SearchFilters>,
    pub(crate) active_feed: RwSignal<Feed>,
    pub(crate) toasts: RwSignal<Vec<Toast>>,
    next_toast_id: RwSignal<u64>,
}

impl AppState {
    pub(crate) fn new() -> Self {
        Self {
            session: RwSignal::new(Session::default()),
            collections: RwSignal::new(Collections::default()),
            filters: RwSignal::new(SearchFilters::default()),
            active_feed: RwSignal::new(Feed::Home),
            toasts: RwSignal::new(Vec::new()),
            next_toast_id: RwSignal::new(0),
        }
    }

    /// Создаёт состояние и кладёт его в context текущего scope.
    pub(crate) fn provide() -> Self {
        let state = Self::new();
        provide_context(state);
        state
    }

    /// Достаёт состояние из context; паникует вне дерева `App`.
    pub(crate) fn expect() -> Self {
        expect_context::<AppState>()
    }

    pub(crate) fn is_authenticated(&self) -> bool {
        self.session.with(|session| session.is_authenticated())
    }

    pub(crate) fn push_toast(&self, kind: ToastKind, message: impl Into<String>) {
        let Some(id) = self.next_toast_id.try_update(|id| {
            *id += 1;
            *id
        }) else {
            return;
        };
        self.toasts.update(|toasts| {
            toasts.push(Toast {
                id,
                kind,
                message: message.into(),
            });
        });
    }

    pub(crate) fn dismiss_toast(&self, id: u64) {
        self.toasts.update(|toasts| toasts.retain(|toast| toast.id != id));
    }

    /// Явное завершение жизненного цикла: все сигналы освобождаются.
    pub(crate) fn dispose(self) {
        self.session.dispose();
        self.collections.dispose();
        self.filters.dispose();
        self.active_feed.dispose();
        self.toasts.dispose();
        self.next_toast_id.dispose();
    }
}
