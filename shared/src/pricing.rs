//! Client-side round estimate.
//!
//! Only used when a slot arrives without a backend price; the formula must
//! stay identical to the backend's.

use crate::{dates::format_euros, dates::format_euros_fr, PricingConfig};

/// Minutes of a single-stop round
pub const BASE_DURATION_MINUTES: u32 = 30;
/// Minutes added per stop beyond the first
pub const MINUTES_PER_EXTRA_STOP: u32 = 15;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RoundEstimate {
    pub duration_minutes: u32,
    pub price: f64,
}

/// Estimate duration and price of a round with `stops` stops.
///
/// Stop 1 is covered by the base fare. Stops 2 up to `max_tiered_stop`
/// (inclusive) cost the tier price, every stop after that the overflow price.
pub fn estimate_round(stops: u32, pricing: &PricingConfig) -> RoundEstimate {
    let extra_stops = stops.saturating_sub(1);
    let duration_minutes = BASE_DURATION_MINUTES + extra_stops * MINUTES_PER_EXTRA_STOP;

    let tiers = &pricing.stops;
    let mut price = pricing.base;
    for index in 2..=stops {
        price += if index <= tiers.max_tiered_stop {
            tiers.per_stop_price
        } else {
            tiers.overflow_price
        };
    }

    RoundEstimate { duration_minutes, price }
}

/// Lines of the tariff summary shown next to the calendar
#[derive(Debug, Clone, PartialEq)]
pub struct TariffSummary {
    pub base: String,
    pub tiers: String,
    pub options: String,
}

impl TariffSummary {
    pub fn from_pricing(pricing: &PricingConfig) -> Self {
        let tiers = &pricing.stops;

        let mut options = Vec::new();
        if let Some(amount) = pricing.options.urgency.as_ref().and_then(|s| s.active_amount()) {
            options.push(format!("Urgence +{}", format_euros_fr(amount)));
        }
        if let Some(amount) = pricing.options.saturday.as_ref().and_then(|s| s.active_amount()) {
            options.push(format!("Samedi +{}", format_euros_fr(amount)));
        }

        Self {
            base: format!("À partir de {} la course.", format_euros_fr(pricing.base)),
            tiers: format!(
                "+{} / arrêt jusqu'à {}, puis +{}.",
                format_euros_fr(tiers.per_stop_price),
                tiers.max_tiered_stop,
                format_euros_fr(tiers.overflow_price)
            ),
            options: if options.is_empty() {
                "Aucune option spéciale.".to_string()
            } else {
                options.join(", ")
            },
        }
    }
}

/// Text of the three tariff cards in the reservation modal
#[derive(Debug, Clone, PartialEq)]
pub struct TariffCards {
    pub base: String,
    pub stops: String,
    pub options: String,
}

impl TariffCards {
    pub fn from_pricing(pricing: Option<&PricingConfig>) -> Self {
        let Some(pricing) = pricing else {
            let empty = "Config vide ou invalide".to_string();
            return Self {
                base: empty.clone(),
                stops: empty.clone(),
                options: empty,
            };
        };

        let tiers = &pricing.stops;
        Self {
            base: format!("{} HT la course de base", format_euros(pricing.base)),
            stops: format!(
                "+{} / arrêt (2→{}), puis +{} au-delà",
                format_euros(tiers.per_stop_price),
                tiers.max_tiered_stop,
                format_euros(tiers.overflow_price)
            ),
            options: if pricing.options.return_counts_as_stop {
                "Retour pharmacie = +1 arrêt".to_string()
            } else {
                "Retour pharmacie inclus".to_string()
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{PricingOptions, StopPricing, Surcharge};

    fn grid() -> PricingConfig {
        PricingConfig {
            base: 10.0,
            stops: StopPricing {
                per_stop_price: 3.0,
                max_tiered_stop: 4,
                overflow_price: 5.0,
            },
            options: PricingOptions::default(),
        }
    }

    #[test]
    fn test_estimate_prices() {
        let pricing = grid();
        assert_eq!(estimate_round(1, &pricing).price, 10.0);
        assert_eq!(estimate_round(4, &pricing).price, 19.0);
        assert_eq!(estimate_round(5, &pricing).price, 24.0);
        assert_eq!(estimate_round(6, &pricing).price, 29.0);
    }

    #[test]
    fn test_estimate_durations() {
        let pricing = grid();
        assert_eq!(estimate_round(1, &pricing).duration_minutes, 30);
        assert_eq!(estimate_round(2, &pricing).duration_minutes, 45);
        assert_eq!(estimate_round(6, &pricing).duration_minutes, 105);
    }

    #[test]
    fn test_estimate_clamps_zero_stops() {
        let estimate = estimate_round(0, &grid());
        assert_eq!(estimate.duration_minutes, 30);
        assert_eq!(estimate.price, 10.0);
    }

    #[test]
    fn test_single_stop_tier_bills_overflow_from_second_stop() {
        let mut pricing = grid();
        pricing.stops.max_tiered_stop = 1;
        assert_eq!(estimate_round(3, &pricing).price, 20.0);
    }

    #[test]
    fn test_tariff_summary_lists_active_options() {
        let mut pricing = grid();
        pricing.options.urgency = Some(Surcharge { active: true, amount: 8.0 });
        pricing.options.saturday = Some(Surcharge { active: false, amount: 6.0 });

        let summary = TariffSummary::from_pricing(&pricing);
        assert_eq!(summary.base, "À partir de 10,00\u{a0}€ la course.");
        assert_eq!(summary.tiers, "+3,00\u{a0}€ / arrêt jusqu'à 4, puis +5,00\u{a0}€.");
        assert_eq!(summary.options, "Urgence +8,00\u{a0}€");

        let plain = TariffSummary::from_pricing(&grid());
        assert_eq!(plain.options, "Aucune option spéciale.");
    }

    #[test]
    fn test_tariff_cards() {
        let mut pricing = grid();
        let cards = TariffCards::from_pricing(Some(&pricing));
        assert_eq!(cards.base, "10.00 € HT la course de base");
        assert_eq!(cards.stops, "+3.00 € / arrêt (2→4), puis +5.00 € au-delà");
        assert_eq!(cards.options, "Retour pharmacie inclus");

        pricing.options.return_counts_as_stop = true;
        assert_eq!(TariffCards::from_pricing(Some(&pricing)).options, "Retour pharmacie = +1 arrêt");

        let empty = TariffCards::from_pricing(None);
        assert_eq!(empty.base, "Config vide ou invalide");
    }
}
