use crate::error::{ImportError, Result};

/// Builds absolute URIs for items and item collections in the Seiso API.
///
/// IP address roles are the odd one out: they have no standalone collection
/// and are only addressable as a sub-resource of their service instance.
#[derive(Debug, Clone)]
pub struct UriFactory {
    base_uri: String,
}

const IP_ADDRESS_ROLES: &str = "ip-address-roles";

impl UriFactory {
    /// Creates a new URI factory for the given base URI (e.g.,
    /// `https://seiso.example.com`). A trailing slash is trimmed.
    pub fn new(base_uri: impl Into<String>) -> Self {
        let base_uri = base_uri.into().trim_end_matches('/').to_string();
        Self { base_uri }
    }

    /// Returns the collection URI for the given item type.
    pub fn type_uri(&self, item_type: &str) -> Result<String> {
        if item_type == IP_ADDRESS_ROLES {
            return Err(ImportError::UnsupportedType(item_type.to_string()));
        }
        Ok(self.v1_uri(item_type))
    }

    /// Returns the URI for a single item. `keys` collectively identify the
    /// item within its type: two keys (service instance key, role name) for
    /// IP address roles, one key for everything else.
    pub fn item_uri(&self, item_type: &str, keys: &[&str]) -> Result<String> {
        if item_type == IP_ADDRESS_ROLES {
            match keys {
                [si_key, role_name] => Ok(self.v1_uri(&format!(
                    "service-instances/{si_key}/ip-address-roles/{role_name}"
                ))),
                _ => Err(self.item_keys_error(item_type, 2, keys.len())),
            }
        } else {
            match keys {
                [key] => Ok(self.v1_uri(&format!("{item_type}/{key}"))),
                _ => Err(self.item_keys_error(item_type, 1, keys.len())),
            }
        }
    }

    fn item_keys_error(&self, item_type: &str, expected: usize, actual: usize) -> ImportError {
        ImportError::ItemKeys {
            item_type: item_type.to_string(),
            expected,
            actual,
        }
    }

    // Resolves a relative path to the full v1 API URI.
    fn v1_uri(&self, path: &str) -> String {
        format!("{}/v1/{}", self.base_uri, path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn factory() -> UriFactory {
        UriFactory::new("https://seiso.example.com")
    }

    #[test]
    fn test_type_uri() {
        let uri = factory().type_uri("services").unwrap();
        assert_eq!(uri, "https://seiso.example.com/v1/services");
    }

    #[test]
    fn test_type_uri_trims_trailing_slash() {
        let uris = UriFactory::new("https://seiso.example.com/");
        let uri = uris.type_uri("machines").unwrap();
        assert_eq!(uri, "https://seiso.example.com/v1/machines");
    }

    #[test]
    fn test_type_uri_rejects_ip_address_roles() {
        let result = factory().type_uri("ip-address-roles");
        assert!(matches!(result, Err(ImportError::UnsupportedType(_))));
    }

    #[test]
    fn test_item_uri() {
        let uri = factory().item_uri("service-instances", &["seiso-dev"]).unwrap();
        assert_eq!(uri, "https://seiso.example.com/v1/service-instances/seiso-dev");
    }

    #[test]
    fn test_item_uri_ip_address_role() {
        let uri = factory()
            .item_uri("ip-address-roles", &["seiso-dev", "internal"])
            .unwrap();
        assert!(uri.ends_with("service-instances/seiso-dev/ip-address-roles/internal"));
    }

    #[test]
    fn test_item_uri_wrong_key_count() {
        let result = factory().item_uri("services", &["a", "b"]);
        assert!(matches!(result, Err(ImportError::ItemKeys { expected: 1, .. })));

        let result = factory().item_uri("ip-address-roles", &["seiso-dev"]);
        assert!(matches!(result, Err(ImportError::ItemKeys { expected: 2, .. })));
    }
}
