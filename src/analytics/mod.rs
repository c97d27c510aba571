//! Analytics pixel configuration.
//!
//! * [`PixelConfig`] / [`PixelEntry`] — which vendor pixels are active.
//! * [`PixelConfig::fan_out`] — one [`PixelDispatch`] per enabled vendor for
//!   a tracked event, with vendor-specific event names.
//! * [`PixelCache`] — once-only async loading shared by all requests.

pub mod cache;
pub mod pixels;

pub use cache::{PixelCache, PixelConfigSource, PixelLoadError, StaticPixelSource};
pub use pixels::{PixelConfig, PixelDispatch, PixelEntry, PixelVendor};
