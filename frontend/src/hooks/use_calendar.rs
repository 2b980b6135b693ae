use std::cell::RefCell;
use std::rc::Rc;

use shared::{availability_map, AvailabilityMap, DisplayedMonth, MonthNavigator, MonthRequest};
use wasm_bindgen_futures::spawn_local;
use web_sys::MouseEvent;
use yew::prelude::*;

use crate::hooks::use_notifications::Notifier;
use crate::services::api::{ApiClient, GatewayError};
use crate::services::date_utils::today;
use crate::services::logging::Logger;

const COMPONENT: &str = "calendar";

/// Month on screen together with the availability fetched for it
#[derive(Clone)]
pub struct CalendarState {
    pub displayed: DisplayedMonth,
    pub availability: Rc<AvailabilityMap>,
}

pub struct UseCalendarResult {
    pub state: CalendarState,
    pub actions: UseCalendarActions,
}

#[derive(Clone)]
pub struct UseCalendarActions {
    pub prev_month: Callback<MouseEvent>,
    pub next_month: Callback<MouseEvent>,
    /// Fetch availability of the latest requested month
    pub refresh_calendar: Callback<()>,
}

#[hook]
pub fn use_calendar(api_client: &ApiClient, notifier: &Notifier) -> UseCalendarResult {
    let navigator = use_mut_ref(|| MonthNavigator::new(DisplayedMonth::containing(today())));
    let rendered = use_state({
        let month = navigator.borrow().shown();
        move || CalendarState {
            displayed: month,
            availability: Rc::new(AvailabilityMap::new()),
        }
    });

    let load_month = {
        let api_client = api_client.clone();
        let notifier = notifier.clone();
        let rendered = rendered.clone();
        let navigator = navigator.clone();
        Callback::from(move |request: MonthRequest| {
            load_availability(
                api_client.clone(),
                notifier.clone(),
                rendered.clone(),
                navigator.clone(),
                request,
            );
        })
    };

    let change_month = {
        let navigator = navigator.clone();
        let load_month = load_month.clone();
        Callback::from(move |delta: i32| {
            let request = navigator.borrow_mut().navigate(delta);
            Logger::info_with_component(COMPONENT, &format!("Affichage {}", request.month.title()));
            load_month.emit(request);
        })
    };

    let prev_month = {
        let change_month = change_month.clone();
        Callback::from(move |_: MouseEvent| change_month.emit(-1))
    };

    let next_month = {
        let change_month = change_month.clone();
        Callback::from(move |_: MouseEvent| change_month.emit(1))
    };

    // Reads the navigator at call time, so a refresh held since the first
    // render still targets the month the user moved to
    let refresh_calendar = {
        let navigator = navigator.clone();
        let load_month = load_month.clone();
        Callback::from(move |_: ()| {
            let request = navigator.borrow_mut().refresh();
            load_month.emit(request);
        })
    };

    let actions = UseCalendarActions {
        prev_month,
        next_month,
        refresh_calendar,
    };

    UseCalendarResult {
        state: (*rendered).clone(),
        actions,
    }
}

/// Fetch the requested month and show it, unless a newer month was requested
/// meanwhile. On failure the month on screen stays as it was.
fn load_availability(
    api_client: ApiClient,
    notifier: Notifier,
    rendered: UseStateHandle<CalendarState>,
    navigator: Rc<RefCell<MonthNavigator>>,
    request: MonthRequest,
) {
    let month = request.month;
    let anchor = match month.anchor() {
        Ok(anchor) => anchor,
        Err(e) => {
            Logger::error_with_component(COMPONENT, &e.to_string());
            navigator.borrow_mut().reject(request);
            return;
        }
    };
    notifier.begin_busy();

    spawn_local(async move {
        let result = api_client.fetch_month_availability(anchor).await;
        notifier.end_busy();

        match result {
            Ok(days) => {
                if !navigator.borrow_mut().accept(request) {
                    Logger::debug_with_component(COMPONENT, &format!("Réponse périmée pour {} ignorée", month.title()));
                    return;
                }
                Logger::debug_with_component(COMPONENT, &format!("{} jour(s) reçus pour {}", days.len(), month.title()));
                rendered.set(CalendarState {
                    displayed: month,
                    availability: Rc::new(availability_map(&days)),
                });
            }
            Err(e) => {
                if !navigator.borrow_mut().reject(request) {
                    return;
                }
                match e {
                    GatewayError::Unavailable => {
                        Logger::warn_with_component(COMPONENT, &GatewayError::Unavailable.to_string());
                    }
                    e => notifier.error(format!("Impossible de charger le planning: {}", e)),
                }
            }
        }
    });
}
