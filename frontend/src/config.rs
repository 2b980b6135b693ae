/// Names of the remote procedures exposed by the hosted script backend
#[derive(Debug, Clone, PartialEq)]
pub struct RemoteFunctions {
    pub pricing: String,
    pub month_availability: String,
    pub day_slots: String,
}

impl Default for RemoteFunctions {
    fn default() -> Self {
        Self {
            pricing: "getTarifsPublic".to_string(),
            month_availability: "getPlanningMois".to_string(),
            day_slots: "getAvailableSlots".to_string(),
        }
    }
}

/// Configuration of the booking widget
#[derive(Debug, Clone, PartialEq)]
pub struct WidgetConfig {
    /// Local storage key holding the serialized cart
    pub cart_storage_key: String,
    /// How long a toast stays on screen
    pub toast_duration_ms: u32,
    pub remote: RemoteFunctions,
}

impl Default for WidgetConfig {
    fn default() -> Self {
        Self {
            cart_storage_key: "panierReservationELS".to_string(),
            toast_duration_ms: 5000,
            remote: RemoteFunctions::default(),
        }
    }
}
