use gloo_timers::callback::Interval;
use yew::prelude::*;

/// How often the my stuff page re-polls item statuses.
pub const REFRESH_INTERVAL_MS: u32 = 30_000;

/// Call `refresh` every `period_ms` while the component is mounted. The
/// timer is dropped on unmount; a request already in flight is not
/// cancelled.
#[hook]
pub fn use_interval_refresh(refresh: Callback<()>, period_ms: u32) {
    use_effect_with((refresh, period_ms), |(refresh, period_ms)| {
        let refresh = refresh.clone();
        let interval = Interval::new(*period_ms, move || refresh.emit(()));
        move || drop(interval)
    });
}
