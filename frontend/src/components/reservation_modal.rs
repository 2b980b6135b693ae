use std::cell::RefCell;
use std::rc::Rc;

use chrono::NaiveDate;
use shared::dates::format_euros;
use shared::{
    day_chips, estimate_round, first_enabled, stop_options, CartLineItem, PricingBundle,
    PricingConfig, RequestSequence, TariffCards, TimeSlot,
};
use wasm_bindgen_futures::spawn_local;
use web_sys::{HtmlInputElement, HtmlSelectElement, MouseEvent};
use yew::prelude::*;

use crate::hooks::use_notifications::Notifier;
use crate::services::api::{ApiClient, GatewayError};
use crate::services::date_utils::now_local;
use crate::services::logging::Logger;

const COMPONENT: &str = "reservation-modal";

#[derive(Properties, PartialEq)]
pub struct ReservationModalProps {
    /// Day the modal was opened on; `None` keeps it closed
    pub anchor: Option<NaiveDate>,
    pub bundle: Option<PricingBundle>,
    pub api_client: ApiClient,
    pub notifier: Notifier,
    pub on_add_to_cart: Callback<CartLineItem>,
    pub on_close: Callback<()>,
}

#[derive(Clone, PartialEq)]
enum SlotList {
    Idle,
    Loading,
    Ready(Rc<Vec<TimeSlot>>),
}

#[function_component(ReservationModal)]
pub fn reservation_modal(props: &ReservationModalProps) -> Html {
    let selected_day = use_state(|| Option::<NaiveDate>::None);
    let stop_count = use_state(|| 1u32);
    let return_to_pharmacy = use_state(|| false);
    let slots = use_state(|| SlotList::Idle);
    let sequence = use_mut_ref(RequestSequence::new);

    let pricing = props.bundle.as_ref().and_then(|bundle| bundle.pricing.clone());
    let rules = props.bundle.as_ref().map(|bundle| bundle.rules.clone()).unwrap_or_default();

    // Opening: lock scrolling, check the tariffs, preselect the first bookable day
    use_effect_with(props.anchor, {
        let selected_day = selected_day.clone();
        let stop_count = stop_count.clone();
        let return_to_pharmacy = return_to_pharmacy.clone();
        let notifier = props.notifier.clone();
        let pricing_loaded = pricing.is_some();
        let rules = rules.clone();

        move |anchor: &Option<NaiveDate>| {
            let opened = anchor.is_some();
            if let Some(anchor) = *anchor {
                set_scroll_lock(true);
                Logger::info_with_component(COMPONENT, &format!("Ouverture sur {}", anchor));
                stop_count.set(1);
                return_to_pharmacy.set(false);

                if pricing_loaded {
                    let chips = day_chips(anchor, now_local(), &rules);
                    selected_day.set(first_enabled(&chips));
                } else {
                    notifier.error("La configuration ou les tarifs ne sont pas disponibles.");
                    selected_day.set(None);
                }
            }

            move || {
                if opened {
                    set_scroll_lock(false);
                    selected_day.set(None);
                }
            }
        }
    });

    // Any change of day, stop count or return option refreshes the slots
    use_effect_with(
        (props.anchor.is_some() && pricing.is_some(), *selected_day, *stop_count, *return_to_pharmacy),
        {
            let api_client = props.api_client.clone();
            let notifier = props.notifier.clone();
            let slots = slots.clone();
            let sequence = sequence.clone();

            move |(ready, day, stops, _)| {
                match (*ready, *day) {
                    (true, Some(day)) => load_slots(api_client, notifier, slots, sequence, day, *stops),
                    _ => {
                        // Drop whatever is still in flight
                        sequence.borrow_mut().issue();
                        slots.set(SlotList::Idle);
                    }
                }
                || ()
            }
        },
    );

    let Some(anchor) = props.anchor else {
        return html! {};
    };

    let on_close_click = {
        let on_close = props.on_close.clone();
        Callback::from(move |_: MouseEvent| on_close.emit(()))
    };

    let on_backdrop_click = {
        let on_close = props.on_close.clone();
        Callback::from(move |e: MouseEvent| {
            e.stop_propagation();
            on_close.emit(());
        })
    };

    let on_modal_click = Callback::from(|e: MouseEvent| {
        e.stop_propagation();
    });

    let on_select_day = {
        let selected_day = selected_day.clone();
        Callback::from(move |day: NaiveDate| selected_day.set(Some(day)))
    };

    let on_stops_change = {
        let stop_count = stop_count.clone();
        Callback::from(move |e: Event| {
            let select: HtmlSelectElement = e.target_unchecked_into();
            if let Ok(value) = select.value().parse::<u32>() {
                stop_count.set(value);
            }
        })
    };

    let on_return_change = {
        let return_to_pharmacy = return_to_pharmacy.clone();
        Callback::from(move |e: Event| {
            let input: HtmlInputElement = e.target_unchecked_into();
            return_to_pharmacy.set(input.checked());
        })
    };

    let on_pick_slot = {
        let selected_day = selected_day.clone();
        let stop_count = stop_count.clone();
        let return_to_pharmacy = return_to_pharmacy.clone();
        let pricing = pricing.clone();
        let on_add_to_cart = props.on_add_to_cart.clone();
        let on_close = props.on_close.clone();
        Callback::from(move |slot: TimeSlot| {
            let (Some(day), Some(pricing)) = (*selected_day, pricing.as_ref()) else {
                return;
            };
            let item = CartLineItem::from_slot(day, &slot, *stop_count, *return_to_pharmacy, pricing);
            on_add_to_cart.emit(item);
            on_close.emit(());
        })
    };

    let on_submit = Callback::from(|e: SubmitEvent| e.prevent_default());

    let cards = TariffCards::from_pricing(pricing.as_ref());

    html! {
        <div id="reservation-modal" class="reservation-modal-backdrop" onclick={on_backdrop_click}>
            <div class="reservation-modal" onclick={on_modal_click}>
                <div class="reservation-modal-header">
                    <h3>{"Réserver une tournée"}</h3>
                    <button type="button" class="reservation-modal-close" aria-label="Fermer"
                            onclick={on_close_click}>{"×"}</button>
                </div>

                <div class="reservation-cards">
                    <div id="card-base" class="card"><div class="card-body">{cards.base}</div></div>
                    <div id="card-stops" class="card"><div class="card-body">{cards.stops}</div></div>
                    <div id="card-opts" class="card"><div class="card-body">{cards.options}</div></div>
                </div>

                <form id="formReservation" class="reservation-form" onsubmit={on_submit}>
                    if pricing.is_some() {
                        <>
                        <div id="js-day-chips" class="day-chips">
                            {for day_chips(anchor, now_local(), &rules).into_iter().map(|chip| {
                                let active = *selected_day == Some(chip.date);
                                let class = classes!(
                                    "chip",
                                    active.then_some("is-active"),
                                    (!chip.enabled).then_some("is-disabled"),
                                );
                                let onclick = chip.enabled.then(|| {
                                    let on_select_day = on_select_day.clone();
                                    let date = chip.date;
                                    Callback::from(move |_: MouseEvent| on_select_day.emit(date))
                                });
                                html! {
                                    <button type="button" {class} {onclick} data-iso={chip.iso()}
                                            disabled={!chip.enabled}>
                                        {chip.label()}
                                    </button>
                                }
                            })}
                        </div>

                        <div class="form-group">
                            <label for="select-arrets">{"Nombre d'arrêts"}</label>
                            <select id="select-arrets" onchange={on_stops_change}>
                                {for stop_options(rules.max_visible_stops).into_iter().map(|option| {
                                    html! {
                                        <option value={option.value.to_string()} selected={option.value == *stop_count}>
                                            {option.label}
                                        </option>
                                    }
                                })}
                            </select>
                        </div>

                        <div class="form-group">
                            <label class="checkbox-label">
                                <input id="cb-retour" type="checkbox" checked={*return_to_pharmacy}
                                       onchange={on_return_change} />
                                {"Retour à la pharmacie"}
                            </label>
                        </div>

                        <div id="slots-container" class="slots-container">
                            {render_slots(&slots, *stop_count, pricing.as_ref(), &on_pick_slot)}
                        </div>
                        </>
                    }
                </form>
            </div>
        </div>
    }
}

fn render_slots(
    slots: &SlotList,
    stop_count: u32,
    pricing: Option<&PricingConfig>,
    on_pick_slot: &Callback<TimeSlot>,
) -> Html {
    let slots = match slots {
        SlotList::Idle => return html! {},
        SlotList::Loading => return html! { <p class="slots-chargement">{"Chargement des créneaux…"}</p> },
        SlotList::Ready(slots) => slots,
    };

    if slots.is_empty() {
        return html! {
            <p class="slots-vide">{"Aucun créneau disponible pour cette configuration."}</p>
        };
    }

    let estimate = pricing.map(|pricing| estimate_round(stop_count, pricing).price);

    html! {
        <>
        {for slots.iter().map(|slot| {
            let price = slot.base_price.or(estimate).unwrap_or(0.0);
            let onclick = {
                let on_pick_slot = on_pick_slot.clone();
                let slot = slot.clone();
                Callback::from(move |_: MouseEvent| on_pick_slot.emit(slot.clone()))
            };
            html! {
                <button type="button" class="slot-capsule" {onclick}>
                    <div class="slot-ligne">
                        <span class="slot-time">{&slot.time_range}</span>
                        <span class="slot-price">{format_euros(price)}</span>
                    </div>
                    <div class="slot-tags">
                        if slot.is_urgent() {
                            <span class="slot-tag">{"⚡ Urgent"}</span>
                        }
                        if slot.is_saturday() {
                            <span class="slot-tag">{"🟪 Samedi"}</span>
                        }
                    </div>
                </button>
            }
        })}
        </>
    }
}

fn load_slots(
    api_client: ApiClient,
    notifier: Notifier,
    slots: UseStateHandle<SlotList>,
    sequence: Rc<RefCell<RequestSequence>>,
    day: NaiveDate,
    stops: u32,
) {
    let ticket = sequence.borrow_mut().issue();
    slots.set(SlotList::Loading);
    notifier.begin_busy();

    spawn_local(async move {
        let result = api_client.fetch_day_slots(day, stops).await;
        notifier.end_busy();

        if !sequence.borrow().is_latest(ticket) {
            return;
        }

        // Slot failures are not worth a toast: the empty list says enough
        let list = match result {
            Ok(list) => list,
            Err(GatewayError::Unavailable) => {
                Logger::warn_with_component(COMPONENT, &GatewayError::Unavailable.to_string());
                Vec::new()
            }
            Err(e) => {
                Logger::error_with_component(COMPONENT, &format!("getAvailableSlots failed: {}", e));
                Vec::new()
            }
        };
        slots.set(SlotList::Ready(Rc::new(list)));
    });
}

fn set_scroll_lock(locked: bool) {
    let Some(body) = web_sys::window()
        .and_then(|window| window.document())
        .and_then(|document| document.body())
    else {
        Logger::warn_with_component(COMPONENT, "document.body indisponible");
        return;
    };

    let value = if locked { "hidden" } else { "" };
    if let Err(err) = body.style().set_property("overflow", value) {
        Logger::warn_with_component(COMPONENT, &format!("Verrouillage du défilement impossible: {:?}", err));
    }
}
