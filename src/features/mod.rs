#[cfg(feature = "indexmap")]
#[cfg_attr(feature = "doc-cfg", doc(cfg(feature = "indexmap")))]
mod indexmap;

#[cfg(feature = "indexmap")]
#[cfg_attr(feature = "doc-cfg", doc(cfg(feature = "indexmap")))]
pub use self::indexmap::parse_index_map;

#[cfg(feature = "serde")]
#[cfg_attr(feature = "doc-cfg", doc(cfg(feature = "serde")))]
mod serde;

#[cfg(feature = "json")]
#[cfg_attr(feature = "doc-cfg", doc(cfg(feature = "json")))]
pub mod json;

#[cfg(feature = "chrono")]
#[cfg_attr(feature = "doc-cfg", doc(cfg(feature = "chrono")))]
pub mod chrono;
