use crate::error::Result;
use crate::uri::UriFactory;
use serde_json::{json, Value};

/// Builds link objects for cross-item references, supporting the HATEOAS
/// principle: each link carries a `_self` URI plus the legacy inline key
/// field that older consumers still read.
#[derive(Debug, Clone)]
pub struct LinkFactory {
    uris: UriFactory,
}

impl LinkFactory {
    pub fn new(uris: UriFactory) -> Self {
        Self { uris }
    }

    /// Creates a new link to the item of `target_type` identified by
    /// `key_value`, where `key_name` is the property the target type uses as
    /// its unique key. Returns `None` when the key value is null: callers
    /// rely on this to omit the reference entirely rather than emit a
    /// partially populated one.
    pub fn link(&self, target_type: &str, key_name: &str, key_value: &Value) -> Result<Option<Value>> {
        if key_value.is_null() {
            return Ok(None);
        }

        let key = key_segment(key_value);
        let uri = self.uris.item_uri(target_type, &[&key])?;

        Ok(Some(json!({
            "_self": uri,

            // Deprecated. To replace with the _self URI above.
            key_name: key_value,
        })))
    }

    /// Creates a link to an IP address role, which is addressed as a
    /// sub-resource of its service instance. Both keys are required.
    pub fn ip_address_role_link(&self, service_instance_key: &Value, role_name: &Value) -> Result<Value> {
        let uri = self.uris.item_uri(
            "ip-address-roles",
            &[&key_segment(service_instance_key), &key_segment(role_name)],
        )?;

        Ok(json!({
            "_self": uri,

            // Deprecated. To replace with the _self URI above.
            "serviceInstance": { "key": service_instance_key },
            "name": role_name,
        }))
    }
}

// Renders a key value as a URI path segment. String keys are used verbatim;
// anything else falls back to its JSON rendering.
fn key_segment(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
