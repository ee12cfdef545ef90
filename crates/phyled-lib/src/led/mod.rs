//! LED bit-field model — mapping table, requests, delta composition, decoding.

mod decode;
mod delta;
mod request;
mod table;

pub use decode::{LedState, decode, decode_led, is_active};
pub use delta::{RegisterSnapshot, build_delta, merge_behavior, merge_request};
pub use request::{BehaviorRequest, BehaviorSet, LedRequests};
pub use table::{Behavior, LED_MAP, Led, Masks, RegisterDelta, mapping};
