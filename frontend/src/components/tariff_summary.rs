use shared::{PricingConfig, TariffSummary};
use yew::prelude::*;

#[derive(Properties, PartialEq)]
pub struct TariffSummaryProps {
    pub pricing: Option<PricingConfig>,
}

/// Tariff lines shown above the calendar; left blank until pricing loads
#[function_component(TariffSummaryView)]
pub fn tariff_summary_view(props: &TariffSummaryProps) -> Html {
    let summary = props.pricing.as_ref().map(TariffSummary::from_pricing);
    let line = |text: Option<&String>| text.cloned().unwrap_or_default();

    html! {
        <section class="tarifs">
            <div class="carte-tarif">
                <h3>{"Course"}</h3>
                <p id="tarif-base">{line(summary.as_ref().map(|s| &s.base))}</p>
            </div>
            <div class="carte-tarif">
                <h3>{"Arrêts"}</h3>
                <p id="tarif-paliers">{line(summary.as_ref().map(|s| &s.tiers))}</p>
            </div>
            <div class="carte-tarif">
                <h3>{"Options"}</h3>
                <p id="tarif-options">{line(summary.as_ref().map(|s| &s.options))}</p>
            </div>
        </section>
    }
}
