use crate::connector::ItemStore;
use crate::error::Result;
use crate::loader::{self, Format, MasterDocument};
use crate::mapper::{MasterItemMapper, RawItem};
use serde_json::Value;
use std::path::Path;
use std::sync::Arc;
use tracing::info;

/// Imports Seiso data master documents: maps each document's items to the
/// Seiso API shape and hands the resulting collections to the item store.
/// Composite documents (nodes, service instances) are decomposed first so
/// that nested child records land in their own flat collections.
pub struct MasterImporter {
    store: Arc<dyn ItemStore>,
    mapper: MasterItemMapper,
}

impl MasterImporter {
    pub fn new(store: Arc<dyn ItemStore>, mapper: MasterItemMapper) -> Self {
        Self { store, mapper }
    }

    /// Imports a list of master files in order, stopping at the first
    /// failure.
    pub async fn import_files(&self, files: &[impl AsRef<Path>], format: Format) -> Result<()> {
        for file in files {
            let file = file.as_ref();
            println!("Processing {}", file.display());
            self.import_file(file, format).await?;
        }
        Ok(())
    }

    /// Imports a single data master file.
    pub async fn import_file(&self, file: &Path, format: Format) -> Result<()> {
        let doc = loader::load(file, format)?;
        self.import_doc(doc).await
    }

    /// Imports a data master document.
    pub async fn import_doc(&self, doc: MasterDocument) -> Result<()> {
        info!(doc_type = %doc.doc_type, items = doc.items.len(), "Importing document");

        // Composite documents carry nested children that get their own
        // collections; everything else maps straight through.
        match doc.doc_type.as_str() {
            "nodes" => self.import_nodes(doc.items).await,
            "service-instances" => self.import_service_instances(doc.items).await,
            other => self.import_items(other, doc.items).await,
        }
    }

    async fn import_items(&self, item_type: &str, items: Vec<RawItem>) -> Result<()> {
        let seiso_items = self.mapper.map_all(item_type, &items)?;
        self.store.put_items(item_type, seiso_items).await
    }

    // Imports the nodes, along with their associated IP addresses. Nodes go
    // first so the IP addresses can reference them.
    async fn import_nodes(&self, nodes: Vec<RawItem>) -> Result<()> {
        let (nodes, nips) = detach_children(nodes, "node", "name", "ipAddresses");
        self.import_items("nodes", nodes).await?;
        self.import_items("node-ip-addresses", nips).await
    }

    // Imports the service instances, along with their associated ports and
    // IP address roles, parents first.
    async fn import_service_instances(&self, service_instances: Vec<RawItem>) -> Result<()> {
        let (service_instances, ports) =
            detach_children(service_instances, "serviceInstance", "key", "ports");
        let (service_instances, roles) =
            detach_children(service_instances, "serviceInstance", "key", "ipAddressRoles");
        self.import_items("service-instances", service_instances).await?;
        self.import_items("service-instance-ports", ports).await?;
        self.import_items("ip-address-roles", roles).await
    }
}

/// Detaches the `child_prop` array from each parent, enriching every child
/// with the parent's key as `parent_prop`. Returns the parents (without the
/// child field) and all detached children, both in input order. A parent
/// without the child field contributes no children; the parent count never
/// changes.
pub fn detach_children(
    parents: Vec<RawItem>,
    parent_prop: &str,
    parent_key: &str,
    child_prop: &str,
) -> (Vec<RawItem>, Vec<RawItem>) {
    let mut all_children = Vec::new();
    let parents = parents
        .into_iter()
        .map(|mut parent| {
            let key_value = parent.get(parent_key).cloned().unwrap_or(Value::Null);
            if let Some(Value::Array(children)) = parent.remove(child_prop) {
                for child in children {
                    // Children are declared as mappings; anything else is
                    // dropped rather than enriched.
                    if let Value::Object(mut child) = child {
                        child.insert(parent_prop.to_string(), key_value.clone());
                        all_children.push(child);
                    }
                }
            }
            parent
        })
        .collect();
    (parents, all_children)
}
