use std::future::Future;
use std::rc::Rc;

use client_sync::FetchState;
use yew::prelude::*;

/// Generic fetch hook return type
pub struct FetchHookReturn<T> {
    pub data: FetchState<T>,
    pub is_loading: bool,
    /// Error from a failed refetch; the previously loaded data is kept.
    pub error: Option<String>,
    pub refetch: Callback<()>,
}

impl<T> FetchHookReturn<T> {
    /// Render based on fetch state with contextual messages.
    ///
    /// - Nothing yet: "Loading {context}..."
    /// - First load failed: "Error loading {context}: ..."
    /// - Server returned nothing: `empty_text`
    /// - Data: `render_fn(data, is_loading, refresh_error)`
    pub fn render<F>(&self, context: &str, empty_text: &str, render_fn: F) -> Html
    where
        F: Fn(&T, bool, Option<&String>) -> Html,
    {
        match &self.data {
            FetchState::NotFetched | FetchState::Loading => html! {
                <div class="text-center py-12">
                    <p class="text-neutral-600 dark:text-neutral-400">
                        {format!("Loading {context}...")}
                    </p>
                </div>
            },
            FetchState::Error(error) => html! {
                <div class="p-4 rounded-md bg-red-50 \
                           dark:bg-red-900/20 border \
                           border-red-200 dark:border-red-800">
                    <p class="text-sm text-red-700 dark:text-red-400">
                        {format!("Error loading {context}: {error}")}
                    </p>
                </div>
            },
            FetchState::Empty => html! {
                <div class="text-center py-12">
                    <p class="text-neutral-600 dark:text-neutral-400">
                        {empty_text.to_string()}
                    </p>
                </div>
            },
            FetchState::Loaded(data) => {
                render_fn(data, self.is_loading, self.error.as_ref())
            }
        }
    }
}

struct Fetched<T> {
    data: FetchState<T>,
    error: Option<String>,
    is_loading: bool,
    /// Only the answer to the newest request is applied.
    latest: u64,
}

impl<T> Default for Fetched<T> {
    fn default() -> Self {
        Self {
            data: FetchState::NotFetched,
            error: None,
            is_loading: false,
            latest: 0,
        }
    }
}

enum FetchAction<T> {
    Begin(u64),
    Finish(u64, Result<FetchState<T>, String>),
}

impl<T: Clone> Reducible for Fetched<T> {
    type Action = FetchAction<T>;

    fn reduce(self: Rc<Self>, action: Self::Action) -> Rc<Self> {
        let mut next = Fetched {
            data: self.data.clone(),
            error: self.error.clone(),
            is_loading: self.is_loading,
            latest: self.latest,
        };
        match action {
            FetchAction::Begin(seq) => {
                next.latest = seq;
                next.is_loading = true;
                if !next.data.is_fetched() {
                    next.data = FetchState::Loading;
                }
            }
            FetchAction::Finish(seq, _) if seq != next.latest => {
                tracing::debug!("dropping stale response #{seq}");
                return self;
            }
            FetchAction::Finish(_, Ok(data)) => {
                next.is_loading = false;
                next.data = data;
                next.error = None;
            }
            FetchAction::Finish(_, Err(e)) => {
                next.is_loading = false;
                if next.data.is_fetched() {
                    next.error = Some(e);
                } else {
                    next.data = FetchState::Error(e);
                }
            }
        }
        Rc::new(next)
    }
}

/// Generic fetch hook composer.
///
/// Fetches on mount and whenever `deps` change, and provides refetch
/// capability. The fetch function decides between `Loaded` and `Empty`;
/// an `Err` becomes `FetchState::Error` on first load and a refresh error
/// once data is loaded.
///
/// # Example
///
/// ```ignore
/// #[hook]
/// pub fn use_report() -> FetchHookReturn<TransparencyReport> {
///     use_fetch((), || async move {
///         let report = TransparencyReport::fetch(&get_api_client()).await;
///         Ok(FetchState::Loaded(report))
///     })
/// }
/// ```
#[hook]
pub fn use_fetch<T, D, F, Fut>(deps: D, fetch_fn: F) -> FetchHookReturn<T>
where
    T: Clone + 'static,
    D: PartialEq + Clone + 'static,
    F: Fn() -> Fut + 'static,
    Fut: Future<Output = Result<FetchState<T>, String>> + 'static,
{
    let fetched = use_reducer(Fetched::<T>::default);
    let counter = use_mut_ref(|| 0u64);

    let refetch = {
        let fetched = fetched.clone();
        let counter = counter.clone();
        let fetch_fn = Rc::new(fetch_fn);

        use_callback(deps.clone(), move |_, _| {
            let fetched = fetched.clone();
            let fetch_fn = fetch_fn.clone();
            let seq = {
                let mut counter = counter.borrow_mut();
                *counter += 1;
                *counter
            };

            yew::platform::spawn_local(async move {
                fetched.dispatch(FetchAction::Begin(seq));
                let result = fetch_fn().await;
                fetched.dispatch(FetchAction::Finish(seq, result));
            });
        })
    };

    // Auto-fetch on mount and when deps change
    {
        let refetch = refetch.clone();
        use_effect_with(deps, move |_| refetch.emit(()));
    }

    FetchHookReturn {
        data: fetched.data.clone(),
        is_loading: fetched.is_loading,
        error: fetched.error.clone(),
        refetch,
    }
}
