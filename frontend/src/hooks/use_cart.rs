use std::rc::Rc;

use shared::{Cart, CartLineItem};
use yew::prelude::*;

use crate::hooks::use_notifications::Notifier;
use crate::services::logging::Logger;
use crate::services::storage::CartStorage;

const COMPONENT: &str = "cart";

#[derive(Debug, Clone, PartialEq)]
pub struct CartState {
    pub cart: Cart,
}

pub enum CartAction {
    Add(CartLineItem),
    Remove(String),
    Clear,
}

impl Reducible for CartState {
    type Action = CartAction;

    fn reduce(self: Rc<Self>, action: Self::Action) -> Rc<Self> {
        let mut cart = self.cart.clone();
        match action {
            CartAction::Add(item) => cart.add_item(item),
            CartAction::Remove(id) => {
                cart.remove_item(&id);
            }
            CartAction::Clear => cart.clear(),
        }
        Rc::new(Self { cart })
    }
}

pub struct UseCartResult {
    pub cart: Cart,
    pub actions: UseCartActions,
}

#[derive(Clone)]
pub struct UseCartActions {
    pub add_item: Callback<CartLineItem>,
    pub remove_item: Callback<String>,
    pub clear: Callback<()>,
}

/// Cart restored from local storage and written back after every change
#[hook]
pub fn use_cart(storage: &CartStorage, notifier: &Notifier) -> UseCartResult {
    let state = {
        let storage = storage.clone();
        use_reducer(move || CartState { cart: storage.load() })
    };

    // Persist after each mutation
    use_effect_with(state.cart.clone(), {
        let storage = storage.clone();
        move |cart: &Cart| {
            if let Err(e) = storage.save(cart) {
                Logger::warn_with_component(COMPONENT, &format!("Sauvegarde impossible: {}", e));
            }
            || ()
        }
    });

    let add_item = {
        let dispatcher = state.dispatcher();
        let notifier = notifier.clone();
        Callback::from(move |item: CartLineItem| {
            Logger::info_with_component(COMPONENT, &format!("Ajout {} ({} {})", item.id, item.date, item.start_time));
            dispatcher.dispatch(CartAction::Add(item));
            notifier.success("Tournée ajoutée au panier !");
        })
    };

    let remove_item = {
        let dispatcher = state.dispatcher();
        let notifier = notifier.clone();
        Callback::from(move |id: String| {
            Logger::info_with_component(COMPONENT, &format!("Retrait {}", id));
            dispatcher.dispatch(CartAction::Remove(id));
            notifier.info("Tournée retirée du panier.");
        })
    };

    let clear = {
        let dispatcher = state.dispatcher();
        let notifier = notifier.clone();
        Callback::from(move |_: ()| {
            dispatcher.dispatch(CartAction::Clear);
            notifier.info("Panier vidé.");
        })
    };

    UseCartResult {
        cart: state.cart.clone(),
        actions: UseCartActions {
            add_item,
            remove_item,
            clear,
        },
    }
}
