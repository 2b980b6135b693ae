use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use chrono::NaiveDate;

pub mod booking;
pub mod calendar;
pub mod cart;
pub mod dates;
pub mod pricing;
pub mod sequence;

pub use booking::{chip_enabled, day_chips, first_enabled, stop_options, DayChip, StopOption};
pub use calendar::{CalendarCell, DisplayedMonth, MonthGrid, MonthNavigator, MonthRequest};
pub use cart::Cart;
pub use dates::DateError;
pub use pricing::{estimate_round, RoundEstimate, TariffCards, TariffSummary};
pub use sequence::{RequestSequence, RequestTicket};

/// Slot tag marking an urgent round
pub const TAG_URGENT: &str = "urgent";
/// Slot tag marking a Saturday round
pub const TAG_SATURDAY: &str = "samedi";

/// Tariff grid published by the backend (`tarifs` on the wire)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct PricingConfig {
    /// Fare of a round with a single stop
    #[serde(default, deserialize_with = "null_as_default")]
    pub base: f64,
    #[serde(rename = "arrets", default)]
    pub stops: StopPricing,
    #[serde(default)]
    pub options: PricingOptions,
}

/// Tiered per-stop pricing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StopPricing {
    /// Price of each additional stop up to `max_tiered_stop`
    #[serde(rename = "prix_palier", default, deserialize_with = "null_as_default")]
    pub per_stop_price: f64,
    /// Last stop index (inclusive) billed at the tier price
    #[serde(
        rename = "palier_max_inclus",
        default = "default_max_tiered_stop",
        deserialize_with = "tier_bound"
    )]
    pub max_tiered_stop: u32,
    /// Price of each stop beyond the tier
    #[serde(rename = "prix_apres", default, deserialize_with = "null_as_default")]
    pub overflow_price: f64,
}

fn default_max_tiered_stop() -> u32 {
    1
}

/// `null` and `0` both mean "no tier bound given"
fn tier_bound<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(Option::<u32>::deserialize(deserializer)?
        .filter(|bound| *bound > 0)
        .unwrap_or_else(default_max_tiered_stop))
}

impl Default for StopPricing {
    fn default() -> Self {
        Self {
            per_stop_price: 0.0,
            max_tiered_stop: default_max_tiered_stop(),
            overflow_price: 0.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct PricingOptions {
    #[serde(rename = "urgence", default, skip_serializing_if = "Option::is_none")]
    pub urgency: Option<Surcharge>,
    #[serde(rename = "samedi", default, skip_serializing_if = "Option::is_none")]
    pub saturday: Option<Surcharge>,
    /// Whether the return leg to the pharmacy is billed as one more stop
    #[serde(rename = "retour_compte_comme_arret", default, deserialize_with = "null_as_default")]
    pub return_counts_as_stop: bool,
}

/// Optional surcharge toggled by the backend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Surcharge {
    #[serde(rename = "actif", default, deserialize_with = "null_as_default")]
    pub active: bool,
    #[serde(rename = "surcharge", default, deserialize_with = "null_as_default")]
    pub amount: f64,
}

impl Surcharge {
    /// Amount of the surcharge when the backend enabled it
    pub fn active_amount(&self) -> Option<f64> {
        self.active.then_some(self.amount)
    }
}

/// Booking rules (`reservation` on the wire)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "PartialRules")]
pub struct ReservationRules {
    #[serde(rename = "ALLOW_SAME_DAY")]
    pub allow_same_day: bool,
    /// Local hour from which same-day booking closes
    #[serde(rename = "SAME_DAY_CUTOFF_HOUR")]
    pub same_day_cutoff_hour: u32,
    #[serde(rename = "MAX_ARRETS_VISIBLE")]
    pub max_visible_stops: u32,
}

impl Default for ReservationRules {
    fn default() -> Self {
        Self {
            allow_same_day: true,
            same_day_cutoff_hour: 12,
            max_visible_stops: 12,
        }
    }
}

/// Rules as sent; absent and `null` fields both keep the default
#[derive(Deserialize, Default)]
#[serde(default)]
struct PartialRules {
    #[serde(rename = "ALLOW_SAME_DAY")]
    allow_same_day: Option<bool>,
    #[serde(rename = "SAME_DAY_CUTOFF_HOUR")]
    same_day_cutoff_hour: Option<u32>,
    #[serde(rename = "MAX_ARRETS_VISIBLE")]
    max_visible_stops: Option<u32>,
}

impl From<PartialRules> for ReservationRules {
    fn from(partial: PartialRules) -> Self {
        let defaults = Self::default();
        Self {
            allow_same_day: partial.allow_same_day.unwrap_or(defaults.allow_same_day),
            same_day_cutoff_hour: partial.same_day_cutoff_hour.unwrap_or(defaults.same_day_cutoff_hour),
            max_visible_stops: partial.max_visible_stops.unwrap_or(defaults.max_visible_stops),
        }
    }
}

/// Raw reply of the pricing endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct PricingResponse {
    #[serde(default, deserialize_with = "null_as_default")]
    pub ok: bool,
    #[serde(rename = "tarifs", default)]
    pub pricing: Option<PricingConfig>,
    #[serde(rename = "reservation", default)]
    pub rules: Option<ReservationRules>,
    #[serde(default)]
    pub errors: Option<Vec<String>>,
}

/// Pricing and rules cached for the whole session
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PricingBundle {
    pub pricing: Option<PricingConfig>,
    pub rules: ReservationRules,
}

/// The backend answered but refused to publish its tariffs
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("{0}")]
pub struct PricingRejected(pub String);

impl PricingResponse {
    /// Accept the reply, or turn `ok: false` into the joined error list
    pub fn into_bundle(self) -> Result<PricingBundle, PricingRejected> {
        if !self.ok {
            let message = match self.errors {
                Some(errors) if !errors.is_empty() => errors.join(", "),
                _ => "Réponse invalide".to_string(),
            };
            return Err(PricingRejected(message));
        }

        Ok(PricingBundle {
            pricing: self.pricing,
            rules: self.rules.unwrap_or_default(),
        })
    }
}

/// Availability of one calendar day
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DayAvailability {
    /// Day in `YYYY-MM-DD`
    pub date: String,
    #[serde(rename = "disponible", default, deserialize_with = "null_as_default")]
    pub available: bool,
}

/// Availability of a month keyed by day
pub type AvailabilityMap = HashMap<NaiveDate, bool>;

/// Build the lookup used by the calendar. Later entries win and malformed
/// dates are dropped.
pub fn availability_map(days: &[DayAvailability]) -> AvailabilityMap {
    days.iter()
        .filter_map(|day| {
            dates::date_from_iso(&day.date)
                .ok()
                .map(|date| (date, day.available))
        })
        .collect()
}

/// Bookable time slot for a (day, stop count) query
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeSlot {
    #[serde(rename = "timeRange")]
    pub time_range: String,
    /// Authoritative price computed by the backend
    #[serde(rename = "basePrice", default)]
    pub base_price: Option<f64>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub tags: Vec<String>,
}

/// The backend sends `null` for fields it has no value for
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: serde::Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

impl TimeSlot {
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }

    pub fn is_urgent(&self) -> bool {
        self.has_tag(TAG_URGENT)
    }

    pub fn is_saturday(&self) -> bool {
        self.has_tag(TAG_SATURDAY)
    }
}

/// Booked round held in the cart.
///
/// Wire names match the entries already stored in users' browsers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartLineItem {
    pub id: String,
    /// Day of the round in `YYYY-MM-DD`
    pub date: String,
    #[serde(rename = "startTime")]
    pub start_time: String,
    #[serde(rename = "totalStops")]
    pub total_stops: u32,
    #[serde(rename = "returnToPharmacy", default)]
    pub return_to_pharmacy: bool,
    #[serde(rename = "prix", default)]
    pub price: f64,
    #[serde(rename = "duree", default)]
    pub duration_minutes: u32,
    #[serde(rename = "details", default)]
    pub description: String,
    #[serde(rename = "isRecurrent", default)]
    pub is_recurring: bool,
}

impl CartLineItem {
    /// Generate a line item id in format "tournee-<uuid>"
    pub fn new_id() -> String {
        format!("tournee-{}", uuid::Uuid::new_v4())
    }

    /// Build the line item for a slot picked in the reservation modal.
    ///
    /// The slot price wins over the local estimate when the backend sent one.
    pub fn from_slot(
        day: NaiveDate,
        slot: &TimeSlot,
        total_stops: u32,
        return_to_pharmacy: bool,
        pricing: &PricingConfig,
    ) -> Self {
        let total_stops = total_stops.max(1);
        let estimate = estimate_round(total_stops, pricing);
        let price = slot.base_price.unwrap_or(estimate.price);
        let price = if price.is_finite() { price.max(0.0) } else { 0.0 };

        Self {
            id: Self::new_id(),
            date: dates::iso_from_date(day),
            start_time: slot.time_range.clone(),
            total_stops,
            return_to_pharmacy,
            price,
            duration_minutes: estimate.duration_minutes,
            description: round_description(estimate.duration_minutes, total_stops, return_to_pharmacy),
            is_recurring: false,
        }
    }
}

/// Summary line shown under a cart entry
pub fn round_description(duration_minutes: u32, total_stops: u32, return_to_pharmacy: bool) -> String {
    format!(
        "Tournée de {}min ({} arrêt(s), retour: {})",
        duration_minutes,
        total_stops,
        if return_to_pharmacy { "oui" } else { "non" }
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_pricing() -> PricingConfig {
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
    fn test_pricing_response_wire_format() {
        let json = r#"{
            "ok": true,
            "tarifs": {
                "base": 12.5,
                "arrets": { "prix_palier": 3, "palier_max_inclus": 4, "prix_apres": 5 },
                "options": {
                    "urgence": { "actif": true, "surcharge": 8 },
                    "samedi": { "actif": false, "surcharge": 6 },
                    "retour_compte_comme_arret": true
                }
            },
            "reservation": { "ALLOW_SAME_DAY": false, "SAME_DAY_CUTOFF_HOUR": 10, "MAX_ARRETS_VISIBLE": 8 }
        }"#;

        let response: PricingResponse = serde_json::from_str(json).unwrap();
        let bundle = response.into_bundle().unwrap();
        let pricing = bundle.pricing.unwrap();

        assert_eq!(pricing.base, 12.5);
        assert_eq!(pricing.stops.max_tiered_stop, 4);
        assert_eq!(pricing.options.urgency.unwrap().active_amount(), Some(8.0));
        assert_eq!(pricing.options.saturday.unwrap().active_amount(), None);
        assert!(pricing.options.return_counts_as_stop);
        assert!(!bundle.rules.allow_same_day);
        assert_eq!(bundle.rules.same_day_cutoff_hour, 10);
        assert_eq!(bundle.rules.max_visible_stops, 8);
    }

    #[test]
    fn test_rules_fall_back_to_defaults() {
        let response: PricingResponse =
            serde_json::from_str(r#"{ "ok": true, "tarifs": { "base": 10 } }"#).unwrap();
        let bundle = response.into_bundle().unwrap();
        assert_eq!(bundle.rules, ReservationRules::default());

        let partial: ReservationRules =
            serde_json::from_str(r#"{ "SAME_DAY_CUTOFF_HOUR": 9 }"#).unwrap();
        assert!(partial.allow_same_day);
        assert_eq!(partial.same_day_cutoff_hour, 9);
        assert_eq!(partial.max_visible_stops, 12);
    }

    #[test]
    fn test_null_fields_keep_defaults() {
        let json = r#"{
            "ok": true,
            "tarifs": {
                "base": 10,
                "arrets": { "prix_palier": null, "palier_max_inclus": null, "prix_apres": null },
                "options": { "urgence": null, "retour_compte_comme_arret": null }
            },
            "reservation": { "ALLOW_SAME_DAY": null, "SAME_DAY_CUTOFF_HOUR": null, "MAX_ARRETS_VISIBLE": 6 }
        }"#;

        let response: PricingResponse = serde_json::from_str(json).unwrap();
        let bundle = response.into_bundle().unwrap();
        let pricing = bundle.pricing.unwrap();

        assert_eq!(pricing.stops.max_tiered_stop, 1);
        assert_eq!(pricing.stops.per_stop_price, 0.0);
        assert!(pricing.options.urgency.is_none());
        assert!(!pricing.options.return_counts_as_stop);
        assert!(bundle.rules.allow_same_day);
        assert_eq!(bundle.rules.same_day_cutoff_hour, 12);
        assert_eq!(bundle.rules.max_visible_stops, 6);
    }

    #[test]
    fn test_zero_tier_bound_defaults_to_one() {
        let stops: StopPricing = serde_json::from_str(r#"{ "palier_max_inclus": 0 }"#).unwrap();
        assert_eq!(stops.max_tiered_stop, 1);
    }

    #[test]
    fn test_null_availability_is_unavailable() {
        let days: Vec<DayAvailability> =
            serde_json::from_str(r#"[{ "date": "2026-10-20", "disponible": null }, { "date": "2026-10-21" }]"#)
                .unwrap();
        assert!(days.iter().all(|day| !day.available));
    }

    #[test]
    fn test_missing_tier_bound_defaults_to_one() {
        let pricing: PricingConfig =
            serde_json::from_str(r#"{ "base": 10, "arrets": { "prix_palier": 3 } }"#).unwrap();
        assert_eq!(pricing.stops.max_tiered_stop, 1);
        assert_eq!(pricing.stops.overflow_price, 0.0);
    }

    #[test]
    fn test_rejected_pricing_joins_errors() {
        let response = PricingResponse {
            ok: false,
            errors: Some(vec!["base manquante".to_string(), "paliers invalides".to_string()]),
            ..PricingResponse::default()
        };
        let err = response.into_bundle().unwrap_err();
        assert_eq!(err.to_string(), "base manquante, paliers invalides");

        let err = PricingResponse::default().into_bundle().unwrap_err();
        assert_eq!(err.0, "Réponse invalide");
    }

    #[test]
    fn test_availability_map_last_write_wins() {
        let days = vec![
            DayAvailability { date: "2026-10-05".to_string(), available: false },
            DayAvailability { date: "2026-10-06".to_string(), available: true },
            DayAvailability { date: "2026-10-05".to_string(), available: true },
            DayAvailability { date: "not-a-date".to_string(), available: true },
        ];

        let map = availability_map(&days);
        assert_eq!(map.len(), 2);
        assert_eq!(map.get(&NaiveDate::from_ymd_opt(2026, 10, 5).unwrap()), Some(&true));
    }

    #[test]
    fn test_time_slot_tags_and_optional_price() {
        let slot: TimeSlot = serde_json::from_str(
            r#"{ "timeRange": "08:00-10:00", "basePrice": 21.5, "tags": ["urgent", "samedi"] }"#,
        )
        .unwrap();
        assert!(slot.is_urgent());
        assert!(slot.is_saturday());
        assert_eq!(slot.base_price, Some(21.5));

        let bare: TimeSlot = serde_json::from_str(r#"{ "timeRange": "14:00-16:00" }"#).unwrap();
        assert!(bare.tags.is_empty());
        assert_eq!(bare.base_price, None);

        let nulls: TimeSlot =
            serde_json::from_str(r#"{ "timeRange": "16:00-18:00", "basePrice": null, "tags": null }"#).unwrap();
        assert!(nulls.tags.is_empty());
        assert_eq!(nulls.base_price, None);
    }

    #[test]
    fn test_line_item_prefers_backend_price() {
        let day = NaiveDate::from_ymd_opt(2026, 10, 20).unwrap();
        let slot = TimeSlot {
            time_range: "08:00-10:00".to_string(),
            base_price: Some(42.0),
            tags: vec![],
        };

        let item = CartLineItem::from_slot(day, &slot, 6, true, &sample_pricing());
        assert_eq!(item.price, 42.0);
        assert_eq!(item.duration_minutes, 105);
        assert_eq!(item.date, "2026-10-20");
        assert_eq!(item.description, "Tournée de 105min (6 arrêt(s), retour: oui)");
        assert!(item.id.starts_with("tournee-"));
    }

    #[test]
    fn test_line_item_falls_back_to_estimate() {
        let day = NaiveDate::from_ymd_opt(2026, 10, 20).unwrap();
        let slot = TimeSlot {
            time_range: "14:00-16:00".to_string(),
            base_price: None,
            tags: vec![],
        };

        let item = CartLineItem::from_slot(day, &slot, 4, false, &sample_pricing());
        assert_eq!(item.price, 19.0);
        assert_eq!(item.description, "Tournée de 75min (4 arrêt(s), retour: non)");
    }

    #[test]
    fn test_line_item_clamps_stop_count() {
        let day = NaiveDate::from_ymd_opt(2026, 10, 20).unwrap();
        let slot = TimeSlot {
            time_range: "14:00-16:00".to_string(),
            base_price: None,
            tags: vec![],
        };

        let item = CartLineItem::from_slot(day, &slot, 0, false, &sample_pricing());
        assert_eq!(item.total_stops, 1);
        assert_eq!(item.price, 10.0);
        assert_eq!(item.description, "Tournée de 30min (1 arrêt(s), retour: non)");
    }

    #[test]
    fn test_line_item_ids_are_unique() {
        let a = CartLineItem::new_id();
        let b = CartLineItem::new_id();
        assert_ne!(a, b);
    }

    #[test]
    fn test_line_item_reads_stored_wire_names() {
        let json = r#"{
            "id": "tournee-1700000000000",
            "date": "2026-10-20",
            "startTime": "08:00-10:00",
            "totalStops": 3,
            "returnToPharmacy": true,
            "prix": 16,
            "duree": 60,
            "details": "Tournée de 60min (3 arrêt(s), retour: oui)",
            "isRecurrent": false
        }"#;
        let item: CartLineItem = serde_json::from_str(json).unwrap();
        assert_eq!(item.total_stops, 3);
        assert_eq!(item.price, 16.0);
        assert_eq!(item.duration_minutes, 60);
    }
}
