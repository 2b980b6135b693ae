use chrono::NaiveDate;
use web_sys::MouseEvent;
use yew::prelude::*;

mod components;
mod config;
mod hooks;
mod services;

use components::calendar::Calendar;
use components::cart_panel::CartPanel;
use components::notifications::NotificationArea;
use components::reservation_modal::ReservationModal;
use components::tariff_summary::TariffSummaryView;
use config::WidgetConfig;
use hooks::use_calendar::use_calendar;
use hooks::use_cart::use_cart;
use hooks::use_notifications::use_notifications;
use hooks::use_pricing::use_pricing;
use services::api::ApiClient;
use services::date_utils::today;
use services::logging::Logger;
use services::storage::CartStorage;

#[function_component(App)]
fn app() -> Html {
    let config = use_memo((), |_| WidgetConfig::default());
    let api_client = use_memo((), {
        let remote = config.remote.clone();
        move |_| ApiClient::with_functions(remote)
    });
    let storage = use_memo((), {
        let key = config.cart_storage_key.clone();
        move |_| CartStorage::new(key)
    });

    let notifications = use_notifications(config.toast_duration_ms);
    let notifier = notifications.notifier.clone();

    // Cart is restored before anything else is fetched
    let cart = use_cart(&storage, &notifier);
    let calendar = use_calendar(&api_client, &notifier);

    // Pricing first, then the availability of the month on screen
    let bundle = use_pricing(&api_client, &notifier, calendar.actions.refresh_calendar.clone());

    let modal_anchor = use_state(|| Option::<NaiveDate>::None);

    let open_modal = {
        let modal_anchor = modal_anchor.clone();
        Callback::from(move |day: NaiveDate| {
            Logger::debug_with_component("app", &format!("Réservation demandée pour {}", day));
            modal_anchor.set(Some(day));
        })
    };

    let on_book = {
        let open_modal = open_modal.clone();
        Callback::from(move |_: MouseEvent| open_modal.emit(today()))
    };

    let close_modal = {
        let modal_anchor = modal_anchor.clone();
        Callback::from(move |_: ()| modal_anchor.set(None))
    };

    html! {
        <>
            <NotificationArea
                toasts={notifications.state.toasts.clone()}
                busy={notifications.state.is_busy()}
            />

            <header class="header">
                <div class="container">
                    <h1>{"Réservation de tournées"}</h1>
                </div>
            </header>

            <main class="main">
                <div class="container">
                    <TariffSummaryView pricing={bundle.as_ref().and_then(|b| b.pricing.clone())} />

                    <Calendar
                        displayed={calendar.state.displayed}
                        availability={calendar.state.availability.clone()}
                        today={today()}
                        on_prev_month={calendar.actions.prev_month.clone()}
                        on_next_month={calendar.actions.next_month.clone()}
                        on_select_day={open_modal}
                        {on_book}
                    />

                    <CartPanel
                        cart={cart.cart.clone()}
                        on_remove={cart.actions.remove_item.clone()}
                        on_clear={cart.actions.clear.clone()}
                    />
                </div>
            </main>

            <ReservationModal
                anchor={*modal_anchor}
                bundle={bundle.clone()}
                api_client={(*api_client).clone()}
                notifier={notifier.clone()}
                on_add_to_cart={cart.actions.add_item.clone()}
                on_close={close_modal}
            />
        </>
    }
}

fn main() {
    yew::Renderer::<App>::new().render();
}
