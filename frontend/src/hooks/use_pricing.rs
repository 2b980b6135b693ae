use shared::PricingBundle;
use wasm_bindgen_futures::spawn_local;
use yew::prelude::*;

use crate::hooks::use_notifications::Notifier;
use crate::services::api::{ApiClient, GatewayError};
use crate::services::logging::Logger;

const COMPONENT: &str = "pricing";

/// Fetch tariffs and booking rules once per session.
///
/// `on_loaded` fires after an accepted reply so the caller can chain the
/// first availability fetch.
#[hook]
pub fn use_pricing(api_client: &ApiClient, notifier: &Notifier, on_loaded: Callback<()>) -> Option<PricingBundle> {
    let bundle = use_state(|| Option::<PricingBundle>::None);

    use_effect_with((), {
        let api_client = api_client.clone();
        let notifier = notifier.clone();
        let bundle = bundle.clone();

        move |_| {
            notifier.begin_busy();
            spawn_local(async move {
                match api_client.fetch_pricing().await {
                    Ok(response) => match response.into_bundle() {
                        Ok(loaded) => {
                            if loaded.pricing.is_none() {
                                Logger::warn_with_component(COMPONENT, "Réponse sans tarifs");
                            }
                            bundle.set(Some(loaded));
                            on_loaded.emit(());
                        }
                        Err(rejected) => {
                            notifier.error(format!("Erreur de configuration des tarifs: {}", rejected));
                        }
                    },
                    Err(GatewayError::Unavailable) => {
                        Logger::warn_with_component(COMPONENT, &GatewayError::Unavailable.to_string());
                    }
                    Err(e) => {
                        notifier.error(format!("Impossible de charger la configuration: {}", e));
                    }
                }
                notifier.end_busy();
            });
            || ()
        }
    });

    (*bundle).clone()
}
