use chrono::NaiveDate;
use js_sys::{Array, Function, Promise, Reflect, JSON};
use serde::de::DeserializeOwned;
use shared::{dates::iso_from_date, DayAvailability, PricingResponse, TimeSlot};
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;

use crate::config::RemoteFunctions;
use crate::services::logging::Logger;

const COMPONENT: &str = "api";

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum GatewayError {
    /// The page is not served by the script host (local preview)
    #[error("google.script.run indisponible (prévisualisation locale ?)")]
    Unavailable,
    #[error("{0}")]
    Remote(String),
    #[error("réponse illisible: {0}")]
    Decode(String),
}

/// Client for the hosted script backend.
///
/// Every call registers a success and a failure handler on
/// `google.script.run`; both are the two ends of one promise, so exactly one
/// of them settles the returned future.
#[derive(Clone, PartialEq)]
pub struct ApiClient {
    functions: RemoteFunctions,
}

impl ApiClient {
    pub fn with_functions(functions: RemoteFunctions) -> Self {
        Self { functions }
    }

    /// Tariffs and booking rules
    pub async fn fetch_pricing(&self) -> Result<PricingResponse, GatewayError> {
        let reply = self.call(&self.functions.pricing, &[]).await?;
        Ok(decode::<PricingResponse>(reply)?.unwrap_or_default())
    }

    /// Availability of every day of the month containing `anchor`
    pub async fn fetch_month_availability(&self, anchor: NaiveDate) -> Result<Vec<DayAvailability>, GatewayError> {
        let args = [JsValue::from_str(&iso_from_date(anchor))];
        let reply = self.call(&self.functions.month_availability, &args).await?;
        Ok(decode::<Vec<DayAvailability>>(reply)?.unwrap_or_default())
    }

    /// Slots bookable on `day` for a round of `stops` stops
    pub async fn fetch_day_slots(&self, day: NaiveDate, stops: u32) -> Result<Vec<TimeSlot>, GatewayError> {
        let args = [
            JsValue::from_str(&iso_from_date(day)),
            JsValue::from_f64(f64::from(stops)),
        ];
        let reply = self.call(&self.functions.day_slots, &args).await?;
        Ok(decode::<Vec<TimeSlot>>(reply)?.unwrap_or_default())
    }

    async fn call(&self, function: &str, args: &[JsValue]) -> Result<JsValue, GatewayError> {
        let runner = script_runner()?;
        let args: Array = args.iter().collect();

        let mut registration = Ok(());
        let promise = Promise::new(&mut |resolve: Function, reject: Function| {
            registration = register(&runner, function, &args, &resolve, &reject);
        });
        registration?;

        Logger::debug_with_component(COMPONENT, &format!("{} sent", function));
        JsFuture::from(promise)
            .await
            .map_err(|err| GatewayError::Remote(error_message(&err)))
    }
}

fn script_runner() -> Result<JsValue, GatewayError> {
    let window = web_sys::window().ok_or(GatewayError::Unavailable)?;
    ["google", "script", "run"]
        .iter()
        .try_fold(JsValue::from(window), |parent, key| {
            Reflect::get(&parent, &JsValue::from_str(key))
                .ok()
                .filter(|value| !value.is_undefined() && !value.is_null())
                .ok_or(GatewayError::Unavailable)
        })
}

fn method(target: &JsValue, name: &str) -> Result<Function, GatewayError> {
    Reflect::get(target, &JsValue::from_str(name))
        .ok()
        .and_then(|value| value.dyn_into::<Function>().ok())
        .ok_or_else(|| GatewayError::Remote(format!("{} introuvable", name)))
}

fn register(
    runner: &JsValue,
    function: &str,
    args: &Array,
    resolve: &Function,
    reject: &Function,
) -> Result<(), GatewayError> {
    let runner = method(runner, "withSuccessHandler")?
        .call1(runner, resolve)
        .map_err(|err| GatewayError::Remote(error_message(&err)))?;
    let runner = method(&runner, "withFailureHandler")?
        .call1(&runner, reject)
        .map_err(|err| GatewayError::Remote(error_message(&err)))?;
    method(&runner, function)?
        .apply(&runner, args)
        .map_err(|err| GatewayError::Remote(error_message(&err)))?;
    Ok(())
}

/// Convert a reply into `T`; `null` and `undefined` give `None`
fn decode<T: DeserializeOwned>(value: JsValue) -> Result<Option<T>, GatewayError> {
    if value.is_undefined() || value.is_null() {
        return Ok(None);
    }
    let json = JSON::stringify(&value)
        .ok()
        .and_then(|text| text.as_string())
        .ok_or_else(|| GatewayError::Decode("valeur non sérialisable".to_string()))?;
    serde_json::from_str::<Option<T>>(&json).map_err(|e| GatewayError::Decode(e.to_string()))
}

/// `err.message` when present, the value itself otherwise
fn error_message(err: &JsValue) -> String {
    Reflect::get(err, &JsValue::from_str("message"))
        .ok()
        .and_then(|message| message.as_string())
        .or_else(|| err.as_string())
        .unwrap_or_else(|| format!("{:?}", err))
}

#[cfg(test)]
mod tests {
    use super::*;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    #[wasm_bindgen_test]
    async fn test_calls_without_script_host_are_unavailable() {
        let client = ApiClient::with_functions(RemoteFunctions::default());
        assert_eq!(client.fetch_pricing().await, Err(GatewayError::Unavailable));

        let day = NaiveDate::from_ymd_opt(2026, 10, 20).unwrap();
        assert_eq!(client.fetch_day_slots(day, 2).await, Err(GatewayError::Unavailable));
    }
}
