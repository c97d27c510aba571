//! Tracking pixel configuration and multi-vendor event fan-out.

use serde::{Deserialize, Serialize};

/// Ad/analytics vendors a pixel can belong to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PixelVendor {
    Meta,
    Tiktok,
    Google,
    Snapchat,
}

impl PixelVendor {
    /// Map a canonical snake_case event name to the vendor's own name.
    /// Unknown events pass through unchanged.
    pub fn event_name(&self, event: &str) -> String {
        let mapped = match (self, event) {
            (PixelVendor::Meta, "page_view") => "PageView",
            (PixelVendor::Meta, "sign_up") => "CompleteRegistration",
            (PixelVendor::Meta, "begin_checkout") => "InitiateCheckout",
            (PixelVendor::Meta, "purchase") => "Purchase",
            (PixelVendor::Meta, "lead") => "Lead",

            (PixelVendor::Tiktok, "page_view") => "Pageview",
            (PixelVendor::Tiktok, "sign_up") => "CompleteRegistration",
            (PixelVendor::Tiktok, "begin_checkout") => "InitiateCheckout",
            (PixelVendor::Tiktok, "purchase") => "CompletePayment",
            (PixelVendor::Tiktok, "lead") => "SubmitForm",

            (PixelVendor::Snapchat, "page_view") => "PAGE_VIEW",
            (PixelVendor::Snapchat, "sign_up") => "SIGN_UP",
            (PixelVendor::Snapchat, "begin_checkout") => "START_CHECKOUT",
            (PixelVendor::Snapchat, "purchase") => "PURCHASE",

            // Google uses the canonical names.
            _ => event,
        };
        mapped.to_string()
    }
}

fn default_enabled() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PixelEntry {
    pub vendor: PixelVendor,
    pub pixel_id: String,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
}

/// The set of pixels configured for the site.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PixelConfig {
    pub pixels: Vec<PixelEntry>,
}

/// One vendor call the client should make for a tracked event.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PixelDispatch {
    pub vendor: PixelVendor,
    pub pixel_id: String,
    pub event_name: String,
    pub params: serde_json::Value,
}

impl PixelConfig {
    pub fn enabled(&self) -> impl Iterator<Item = &PixelEntry> {
        self.pixels
            .iter()
            .filter(|p| p.enabled && !p.pixel_id.trim().is_empty())
    }

    /// One dispatch per enabled pixel, in configuration order.
    pub fn fan_out(&self, event: &str, params: &serde_json::Value) -> Vec<PixelDispatch> {
        self.enabled()
            .map(|p| PixelDispatch {
                vendor: p.vendor,
                pixel_id: p.pixel_id.clone(),
                event_name: p.vendor.event_name(event),
                params: params.clone(),
            })
            .collect()
    }
}
