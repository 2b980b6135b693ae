use shared::dates::{date_from_iso, format_day_month_fr, format_euros};
use shared::{Cart, CartLineItem};
use web_sys::MouseEvent;
use yew::prelude::*;

#[derive(Properties, PartialEq)]
pub struct CartPanelProps {
    pub cart: Cart,
    pub on_remove: Callback<String>,
    pub on_clear: Callback<()>,
}

#[function_component(CartPanel)]
pub fn cart_panel(props: &CartPanelProps) -> Html {
    let cart = &props.cart;

    let on_clear = {
        let on_clear = props.on_clear.clone();
        Callback::from(move |_: MouseEvent| on_clear.emit(()))
    };

    let footer_class = if cart.is_empty() {
        "panier-pied-de-page hidden"
    } else {
        "panier-pied-de-page"
    };

    html! {
        <aside class="panier">
            <h2>{"Votre panier"}</h2>
            {if cart.is_empty() {
                html! { <p class="panier-vide">{"Votre panier est vide."}</p> }
            } else {
                html! {
                    <ul id="liste-panier" class="liste-panier">
                        {for cart.items().iter().map(|item| cart_row(item, &props.on_remove))}
                    </ul>
                }
            }}
            <div id="panier-pied-de-page" class={footer_class}>
                <div class="panier-total">
                    <span>{"Total"}</span>
                    <span id="panier-total-valeur">{format_euros(cart.total())}</span>
                </div>
                <button type="button" class="btn btn-secondary" onclick={on_clear}>
                    {"Vider le panier"}
                </button>
            </div>
        </aside>
    }
}

fn cart_row(item: &CartLineItem, on_remove: &Callback<String>) -> Html {
    // Unparseable stored dates are shown as stored
    let day = date_from_iso(&item.date)
        .map(format_day_month_fr)
        .unwrap_or_else(|_| item.date.clone());

    let on_delete = {
        let on_remove = on_remove.clone();
        let id = item.id.clone();
        Callback::from(move |_: MouseEvent| on_remove.emit(id.clone()))
    };

    html! {
        <li class="item-panier" data-id-item={item.id.clone()}>
            <div class="item-panier-infos">
                <strong>{format!("Le {} à {}", day, item.start_time)}</strong>
                <small>{&item.description}</small>
            </div>
            <div class="item-panier-actions">
                <span class="item-panier-prix">{format_euros(item.price)}</span>
                <button class="item-panier-supprimer" aria-label="Supprimer cet article" type="button"
                        onclick={on_delete}>{"×"}</button>
            </div>
        </li>
    }
}
