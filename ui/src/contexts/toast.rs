use std::collections::BTreeMap;
use std::rc::Rc;

use uuid::Uuid;
use yew::prelude::*;

const DEFAULT_DURATION_MS: u32 = 5000;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ToastKind {
    Error,
    Success,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Toast {
    pub id: Uuid,
    /// Insertion order, for stable display.
    pub seq: u64,
    pub message: String,
    pub kind: ToastKind,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ToastState {
    pub toasts: BTreeMap<Uuid, Toast>,
    next_seq: u64,
}

impl ToastState {
    /// Oldest first.
    pub fn ordered(&self) -> Vec<Toast> {
        let mut toasts: Vec<_> = self.toasts.values().cloned().collect();
        toasts.sort_by_key(|toast| toast.seq);
        toasts
    }
}

pub enum ToastAction {
    Add {
        id: Uuid,
        message: String,
        kind: ToastKind,
    },
    Remove(Uuid),
}

impl Reducible for ToastState {
    type Action = ToastAction;

    fn reduce(self: Rc<Self>, action: Self::Action) -> Rc<Self> {
        let mut next = (*self).clone();

        match action {
            ToastAction::Add { id, message, kind } => {
                let seq = next.next_seq;
                next.next_seq += 1;
                next.toasts.insert(
                    id,
                    Toast {
                        id,
                        seq,
                        message,
                        kind,
                    },
                );
            }
            ToastAction::Remove(id) => {
                next.toasts.remove(&id);
            }
        }

        Rc::new(next)
    }
}

pub type ToastContext = UseReducerHandle<ToastState>;

#[derive(Properties, PartialEq)]
pub struct ToastProviderProps {
    pub children: Children,
}

#[function_component]
pub fn ToastProvider(props: &ToastProviderProps) -> Html {
    let toast_state = use_reducer(ToastState::default);

    html! {
        <ContextProvider<ToastContext> context={toast_state}>
            {props.children.clone()}
        </ContextProvider<ToastContext>>
    }
}

#[derive(Clone)]
pub struct ToastHandle {
    context: Option<ToastContext>,
}

impl ToastHandle {
    fn add(&self, message: String, kind: ToastKind) {
        let Some(context) = self.context.clone() else {
            tracing::warn!("toast outside of a ToastProvider: {message}");
            return;
        };
        let id = Uuid::new_v4();
        context.dispatch(ToastAction::Add { id, message, kind });

        yew::platform::spawn_local(async move {
            gloo_timers::future::TimeoutFuture::new(DEFAULT_DURATION_MS)
                .await;
            context.dispatch(ToastAction::Remove(id));
        });
    }

    pub fn error(&self, message: impl Into<String>) {
        self.add(message.into(), ToastKind::Error);
    }

    pub fn success(&self, message: impl Into<String>) {
        self.add(message.into(), ToastKind::Success);
    }

    pub fn remove(&self, id: Uuid) {
        if let Some(context) = &self.context {
            context.dispatch(ToastAction::Remove(id));
        }
    }
}

#[hook]
pub fn use_toast() -> ToastHandle {
    ToastHandle {
        context: use_context::<ToastContext>(),
    }
}
