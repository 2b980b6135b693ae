use std::cell::Cell;
use std::rc::Rc;

use gloo::timers::callback::Timeout;
use yew::prelude::*;

use crate::services::logging::Logger;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ToastKind {
    Info,
    Success,
    Error,
}

impl ToastKind {
    /// CSS class of the toast
    pub fn class(self) -> &'static str {
        match self {
            ToastKind::Info => "info",
            ToastKind::Success => "succes",
            ToastKind::Error => "erreur",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Toast {
    pub id: u64,
    pub kind: ToastKind,
    pub message: String,
}

/// Toasts on screen plus the number of calls still in flight
#[derive(Debug, Clone, PartialEq, Default)]
pub struct NotificationState {
    pub toasts: Vec<Toast>,
    pub pending: u32,
}

impl NotificationState {
    pub fn is_busy(&self) -> bool {
        self.pending > 0
    }
}

pub enum NotificationAction {
    Show(Toast),
    Dismiss(u64),
    BeginBusy,
    EndBusy,
}

impl Reducible for NotificationState {
    type Action = NotificationAction;

    fn reduce(self: Rc<Self>, action: Self::Action) -> Rc<Self> {
        let mut next = (*self).clone();
        match action {
            NotificationAction::Show(toast) => next.toasts.push(toast),
            NotificationAction::Dismiss(id) => next.toasts.retain(|toast| toast.id != id),
            NotificationAction::BeginBusy => next.pending += 1,
            NotificationAction::EndBusy => next.pending = next.pending.saturating_sub(1),
        }
        Rc::new(next)
    }
}

/// Handle used by hooks and components to raise toasts and drive the busy
/// indicator
#[derive(Clone, PartialEq)]
pub struct Notifier {
    dispatcher: UseReducerDispatcher<NotificationState>,
    next_id: Rc<Cell<u64>>,
    duration_ms: u32,
}

impl Notifier {
    pub fn info(&self, message: impl Into<String>) {
        self.show(ToastKind::Info, message.into());
    }

    pub fn success(&self, message: impl Into<String>) {
        self.show(ToastKind::Success, message.into());
    }

    /// Error toast, also written to the console
    pub fn error(&self, message: impl Into<String>) {
        let message = message.into();
        Logger::error_with_component("notifications", &message);
        self.show(ToastKind::Error, format!("Erreur : {}", message));
    }

    pub fn begin_busy(&self) {
        self.dispatcher.dispatch(NotificationAction::BeginBusy);
    }

    pub fn end_busy(&self) {
        self.dispatcher.dispatch(NotificationAction::EndBusy);
    }

    fn show(&self, kind: ToastKind, message: String) {
        let id = self.next_id.get();
        self.next_id.set(id + 1);
        self.dispatcher.dispatch(NotificationAction::Show(Toast { id, kind, message }));

        let dispatcher = self.dispatcher.clone();
        Timeout::new(self.duration_ms, move || {
            dispatcher.dispatch(NotificationAction::Dismiss(id));
        })
        .forget();
    }
}

pub struct UseNotificationsResult {
    pub state: Rc<NotificationState>,
    pub notifier: Notifier,
}

#[hook]
pub fn use_notifications(duration_ms: u32) -> UseNotificationsResult {
    let state = use_reducer(NotificationState::default);
    let next_id = use_memo((), |_| Cell::new(0u64));

    let notifier = Notifier {
        dispatcher: state.dispatcher(),
        next_id,
        duration_ms,
    };

    UseNotificationsResult {
        state: Rc::new((*state).clone()),
        notifier,
    }
}
