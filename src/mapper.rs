use crate::error::{ImportError, Result};
use crate::link::LinkFactory;
use serde_json::{json, Map, Value};
use std::fmt;
use std::str::FromStr;

/// A raw master-file item: an open mapping from source field names to
/// scalar, nested-mapping, or sequence-of-mapping values.
pub type RawItem = Map<String, Value>;

/// An item mapped to the Seiso API shape, ready for persistence.
pub type MappedItem = Map<String, Value>;

/// The fixed set of importable item types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ItemType {
    DataCenters,
    Environments,
    HealthStatuses,
    InfrastructureProviders,
    IpAddressRoles,
    LoadBalancers,
    Machines,
    Nodes,
    NodeIpAddresses,
    Regions,
    RotationStatuses,
    Services,
    ServiceGroups,
    ServiceInstances,
    ServiceInstancePorts,
    ServiceTypes,
    StatusTypes,
}

impl ItemType {
    pub const ALL: [ItemType; 17] = [
        ItemType::DataCenters,
        ItemType::Environments,
        ItemType::HealthStatuses,
        ItemType::InfrastructureProviders,
        ItemType::IpAddressRoles,
        ItemType::LoadBalancers,
        ItemType::Machines,
        ItemType::Nodes,
        ItemType::NodeIpAddresses,
        ItemType::Regions,
        ItemType::RotationStatuses,
        ItemType::Services,
        ItemType::ServiceGroups,
        ItemType::ServiceInstances,
        ItemType::ServiceInstancePorts,
        ItemType::ServiceTypes,
        ItemType::StatusTypes,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ItemType::DataCenters => "data-centers",
            ItemType::Environments => "environments",
            ItemType::HealthStatuses => "health-statuses",
            ItemType::InfrastructureProviders => "infrastructure-providers",
            ItemType::IpAddressRoles => "ip-address-roles",
            ItemType::LoadBalancers => "load-balancers",
            ItemType::Machines => "machines",
            ItemType::Nodes => "nodes",
            ItemType::NodeIpAddresses => "node-ip-addresses",
            ItemType::Regions => "regions",
            ItemType::RotationStatuses => "rotation-statuses",
            ItemType::Services => "services",
            ItemType::ServiceGroups => "service-groups",
            ItemType::ServiceInstances => "service-instances",
            ItemType::ServiceInstancePorts => "service-instance-ports",
            ItemType::ServiceTypes => "service-types",
            ItemType::StatusTypes => "status-types",
        }
    }
}

impl FromStr for ItemType {
    type Err = ImportError;

    fn from_str(s: &str) -> Result<Self> {
        ItemType::ALL
            .iter()
            .find(|t| t.as_str() == s)
            .copied()
            .ok_or_else(|| ImportError::UnknownType(s.to_string()))
    }
}

impl fmt::Display for ItemType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Maps the data master format to the Seiso API format, one mapping rule per
/// item type. Each rule copies exactly the fields it names; absent inputs
/// come through as null, never defaulted (the two documented
/// service-instance quirks aside).
#[derive(Debug, Clone)]
pub struct MasterItemMapper {
    links: LinkFactory,
}

impl MasterItemMapper {
    pub fn new(links: LinkFactory) -> Self {
        Self { links }
    }

    /// Maps a list of items, preserving input order. Unknown types fail
    /// before any item is processed, even for an empty list.
    pub fn map_all(&self, type_name: &str, items: &[RawItem]) -> Result<Vec<MappedItem>> {
        let item_type: ItemType = type_name.parse()?;
        items.iter().map(|i| self.map_item(item_type, i)).collect()
    }

    /// Maps a single item.
    pub fn map_one(&self, type_name: &str, item: &RawItem) -> Result<MappedItem> {
        let item_type: ItemType = type_name.parse()?;
        self.map_item(item_type, item)
    }

    fn map_item(&self, item_type: ItemType, item: &RawItem) -> Result<MappedItem> {
        match item_type {
            ItemType::DataCenters => self.map_data_center(item),
            ItemType::Environments => Ok(self.map_environment(item)),
            ItemType::HealthStatuses => self.map_health_status(item),
            ItemType::InfrastructureProviders => Ok(self.map_infrastructure_provider(item)),
            ItemType::IpAddressRoles => self.map_ip_address_role(item),
            ItemType::LoadBalancers => self.map_load_balancer(item),
            ItemType::Machines => Ok(self.map_machine(item)),
            ItemType::Nodes => self.map_node(item),
            ItemType::NodeIpAddresses => self.map_node_ip_address(item),
            ItemType::Regions => self.map_region(item),
            ItemType::RotationStatuses => self.map_rotation_status(item),
            ItemType::Services => self.map_service(item),
            ItemType::ServiceGroups => Ok(self.map_service_group(item)),
            ItemType::ServiceInstances => self.map_service_instance(item),
            ItemType::ServiceInstancePorts => self.map_service_instance_port(item),
            ItemType::ServiceTypes => Ok(self.map_service_type(item)),
            ItemType::StatusTypes => Ok(self.map_status_type(item)),
        }
    }

    // Builds a reference field value: a link object, or null when the source
    // key is absent.
    fn link_field(&self, target_type: &str, key_name: &str, key_value: &Value) -> Result<Value> {
        Ok(self
            .links
            .link(target_type, key_name, key_value)?
            .unwrap_or(Value::Null))
    }

    fn map_data_center(&self, dc: &RawItem) -> Result<MappedItem> {
        let mut out = scalars(dc, &["key", "name"]);
        out.insert(
            "region".to_string(),
            self.link_field("regions", "key", &field(dc, "region"))?,
        );
        Ok(out)
    }

    fn map_environment(&self, e: &RawItem) -> MappedItem {
        // rank is deprecated, kept only for existing consumers.
        scalars(e, &["key", "name", "aka", "description", "rank"])
    }

    fn map_health_status(&self, hs: &RawItem) -> Result<MappedItem> {
        let mut out = scalars(hs, &["key", "name"]);
        out.insert(
            "statusType".to_string(),
            self.link_field("status-types", "key", &field(hs, "statusType"))?,
        );
        Ok(out)
    }

    fn map_infrastructure_provider(&self, ip: &RawItem) -> MappedItem {
        scalars(ip, &["key", "name"])
    }

    // Suppressing IP addresses since we don't import those from master files.
    fn map_ip_address_role(&self, r: &RawItem) -> Result<MappedItem> {
        let mut out = MappedItem::new();
        out.insert(
            "serviceInstance".to_string(),
            self.link_field("service-instances", "key", &field(r, "serviceInstance"))?,
        );
        out.insert("name".to_string(), field(r, "name"));
        out.insert("description".to_string(), field(r, "description"));
        Ok(out)
    }

    fn map_load_balancer(&self, lb: &RawItem) -> Result<MappedItem> {
        let mut out = scalars(lb, &["name", "type", "ipAddress", "apiUrl"]);
        out.insert(
            "dataCenter".to_string(),
            self.link_field("data-centers", "key", &field(lb, "dataCenter"))?,
        );
        Ok(out)
    }

    fn map_machine(&self, m: &RawItem) -> MappedItem {
        scalars(
            m,
            &[
                "name",
                "ipAddress",
                "fqdn",
                "hostname",
                "domain",
                "os",
                "platform",
                "platformVersion",
            ],
        )
    }

    fn map_node(&self, n: &RawItem) -> Result<MappedItem> {
        let mut out = scalars(n, &["name"]);
        out.insert(
            "serviceInstance".to_string(),
            self.link_field("service-instances", "key", &field(n, "serviceInstance"))?,
        );
        out.insert(
            "machine".to_string(),
            self.link_field("machines", "name", &field(n, "machine"))?,
        );
        Ok(out)
    }

    // Currently suppressing rotation status and endpoints since we don't
    // import those from master files.
    fn map_node_ip_address(&self, nip: &RawItem) -> Result<MappedItem> {
        let mut out = MappedItem::new();
        out.insert(
            "node".to_string(),
            self.link_field("nodes", "name", &field(nip, "node"))?,
        );

        // Roles are only addressable under their service instance, which a
        // node IP address record doesn't carry, so there is no _self URI to
        // build here. Legacy inline form only.
        let role = field(nip, "ipAddressRole");
        let role_ref = if role.is_null() {
            Value::Null
        } else {
            json!({ "name": role })
        };
        out.insert("ipAddressRole".to_string(), role_ref);

        out.insert("ipAddress".to_string(), field(nip, "ipAddress"));
        Ok(out)
    }

    fn map_region(&self, r: &RawItem) -> Result<MappedItem> {
        let mut out = scalars(r, &["key", "name", "regionKey"]);
        out.insert(
            "infrastructureProvider".to_string(),
            self.link_field(
                "infrastructure-providers",
                "key",
                &field(r, "infrastructureProvider"),
            )?,
        );
        Ok(out)
    }

    fn map_rotation_status(&self, rs: &RawItem) -> Result<MappedItem> {
        let mut out = scalars(rs, &["key", "name"]);
        out.insert(
            "statusType".to_string(),
            self.link_field("status-types", "key", &field(rs, "statusType"))?,
        );
        Ok(out)
    }

    fn map_service(&self, s: &RawItem) -> Result<MappedItem> {
        let mut out = scalars(s, &["key", "name", "description", "platform", "scmRepository"]);
        out.insert(
            "group".to_string(),
            self.link_field("service-groups", "key", &field(s, "group"))?,
        );
        out.insert(
            "type".to_string(),
            self.link_field("service-types", "key", &field(s, "type"))?,
        );
        out.insert(
            "owner".to_string(),
            self.link_field("people", "username", &field(s, "owner"))?,
        );
        Ok(out)
    }

    fn map_service_group(&self, sg: &RawItem) -> MappedItem {
        scalars(sg, &["key", "name"])
    }

    fn map_service_instance(&self, si: &RawItem) -> Result<MappedItem> {
        let mut out = scalars(
            si,
            &["key", "loadBalanced", "minCapacityDeploy", "minCapacityOps"],
        );
        out.insert(
            "service".to_string(),
            self.link_field("services", "key", &field(si, "service"))?,
        );
        out.insert(
            "environment".to_string(),
            self.link_field("environments", "key", &field(si, "environment"))?,
        );

        // Deprecated. Hardcoded field for an internal app; absent means false.
        let eos_managed = field(si, "eosManaged");
        out.insert(
            "eosManaged".to_string(),
            if eos_managed.is_null() {
                json!(false)
            } else {
                eos_managed
            },
        );

        // Deprecated. Old name for the minCapacityOps field.
        out.insert("requiredCapacity".to_string(), field(si, "minCapacityOps"));

        out.insert(
            "dataCenter".to_string(),
            self.link_field("data-centers", "key", &field(si, "dataCenter"))?,
        );

        // The singular "loadBalancer" target is what the server historically
        // exposed here; changing it to "load-balancers" would change the
        // generated URI for existing consumers.
        out.insert(
            "loadBalancer".to_string(),
            self.link_field("loadBalancer", "name", &field(si, "loadBalancer"))?,
        );

        Ok(out)
    }

    // Suppressing endpoints since we don't import those from master files.
    fn map_service_instance_port(&self, p: &RawItem) -> Result<MappedItem> {
        let mut out = MappedItem::new();
        out.insert(
            "serviceInstance".to_string(),
            self.link_field("service-instances", "key", &field(p, "serviceInstance"))?,
        );
        out.insert("number".to_string(), field(p, "number"));
        out.insert("protocol".to_string(), field(p, "protocol"));
        out.insert("description".to_string(), field(p, "description"));
        Ok(out)
    }

    fn map_service_type(&self, st: &RawItem) -> MappedItem {
        scalars(st, &["key", "name"])
    }

    fn map_status_type(&self, st: &RawItem) -> MappedItem {
        scalars(st, &["key", "name"])
    }
}

// Looks up a field, with null standing in for absent.
fn field(item: &RawItem, name: &str) -> Value {
    item.get(name).cloned().unwrap_or(Value::Null)
}

// Copies the named scalar fields into a fresh mapped item.
fn scalars(item: &RawItem, names: &[&str]) -> MappedItem {
    let mut out = MappedItem::new();
    for name in names {
        out.insert((*name).to_string(), field(item, name));
    }
    out
}
