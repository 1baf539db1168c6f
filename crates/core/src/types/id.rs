//! Newtype keys for type-safe entity references.
//!
//! Catalog models and orders are keyed by strings (model names such as
//! `"XPS 13"` and order ids such as `"ord-2024-001"`). Use the `define_key!`
//! macro to create wrappers that prevent mixing keys from different entities.

/// Macro to define a type-safe string key wrapper.
///
/// Creates a newtype wrapper around `String` with:
/// - `Serialize`/`Deserialize` with `#[serde(transparent)]`
/// - `Debug`, `Clone`, `PartialEq`, `Eq`, `Hash`
/// - Conversion methods: `new()`, `as_str()`, `into_inner()`
/// - `From<&str>`, `From<String>`, `AsRef<str>` and `Display`
///
/// # Example
///
/// ```rust
/// # use kitbay_core::define_key;
/// define_key!(SkuKey);
/// define_key!(VendorKey);
///
/// let sku = SkuKey::new("DELL-XPS-13");
/// let vendor = VendorKey::new("DELL-XPS-13");
///
/// assert_eq!(sku.as_str(), vendor.as_str());
/// // These are different types, so this won't compile:
/// // let _: SkuKey = vendor;
/// ```
#[macro_export]
macro_rules! define_key {
    ($name:ident) => {
        #[derive(
            Debug,
            Clone,
            PartialEq,
            Eq,
            Hash,
            ::serde::Serialize,
            ::serde::Deserialize
        )]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Create a new key from anything string-like.
            #[must_use]
            pub fn new(key: impl Into<String>) -> Self {
                Self(key.into())
            }

            /// Get the key as a string slice.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Consume the key and return the inner string.
            #[must_use]
            pub fn into_inner(self) -> String {
                self.0
            }
        }

        impl ::core::fmt::Display for $name {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(key: &str) -> Self {
                Self(key.to_owned())
            }
        }

        impl From<String> for $name {
            fn from(key: String) -> Self {
                Self(key)
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

define_key!(ModelId);
define_key!(OrderId);

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_model_id_display() {
        let id = ModelId::new("ThinkPad X1 Carbon");
        assert_eq!(format!("{id}"), "ThinkPad X1 Carbon");
    }

    #[test]
    fn test_order_id_serializes_transparently() {
        let id = OrderId::new("ord-1001");
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"ord-1001\"");

        let parsed: OrderId = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, id);
    }

    #[test]
    fn test_conversions() {
        let from_str: ModelId = "U2723QE".into();
        let from_string: ModelId = String::from("U2723QE").into();
        assert_eq!(from_str, from_string);
        assert_eq!(from_str.into_inner(), "U2723QE");
    }
}
