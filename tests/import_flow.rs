use anyhow::Result;
use serde_json::json;
use std::io::Write;
use std::sync::Arc;
use tempfile::TempDir;

use seiso_import::connector::InMemoryStore;
use seiso_import::importer::MasterImporter;
use seiso_import::link::LinkFactory;
use seiso_import::loader::Format;
use seiso_import::mapper::MasterItemMapper;
use seiso_import::uri::UriFactory;

const BASE_URI: &str = "https://seiso.example.com";

fn importer(store: Arc<InMemoryStore>) -> MasterImporter {
    let links = LinkFactory::new(UriFactory::new(BASE_URI));
    MasterImporter::new(store, MasterItemMapper::new(links))
}

fn write_file(dir: &TempDir, name: &str, contents: &str) -> std::path::PathBuf {
    let path = dir.path().join(name);
    let mut file = std::fs::File::create(&path).unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    path
}

#[tokio::test]
async fn test_import_json_master_file() -> Result<()> {
    let dir = TempDir::new()?;
    let doc = json!({
        "type": "data-centers",
        "items": [
            { "key": "amazon-us-east-1a", "name": "Amazon US East 1a", "region": "amazon-us-east-1" }
        ]
    });
    let path = write_file(&dir, "data-centers.json", &doc.to_string());

    let store = Arc::new(InMemoryStore::new());
    importer(store.clone()).import_file(&path, Format::Json).await?;

    let puts = store.puts();
    assert_eq!(puts.len(), 1);
    assert_eq!(puts[0].0, "data-centers");

    let dc = &puts[0].1[0];
    assert_eq!(dc["key"], json!("amazon-us-east-1a"));
    assert_eq!(
        dc["region"]["_self"],
        json!(format!("{BASE_URI}/v1/regions/amazon-us-east-1"))
    );
    Ok(())
}

#[tokio::test]
async fn test_import_yaml_master_file() -> Result<()> {
    let dir = TempDir::new()?;
    let yaml = "\
type: service-groups
items:
  - key: devops
    name: DevOps
";
    let path = write_file(&dir, "service-groups.yaml", yaml);

    let store = Arc::new(InMemoryStore::new());
    importer(store.clone()).import_file(&path, Format::Yaml).await?;

    let puts = store.puts();
    assert_eq!(puts.len(), 1);
    assert_eq!(puts[0].0, "service-groups");
    assert_eq!(puts[0].1[0]["name"], json!("DevOps"));
    Ok(())
}

#[tokio::test]
async fn test_import_service_instances_end_to_end() -> Result<()> {
    let dir = TempDir::new()?;
    let doc = json!({
        "type": "service-instances",
        "items": [
            {
                "key": "seiso-dev",
                "service": "seiso",
                "environment": "dev",
                "loadBalancer": "DEV-1-2-3-4",
                "minCapacityOps": 75,
                "ports": [
                    { "number": 8443, "protocol": "https", "description": "UI port" }
                ],
                "ipAddressRoles": [
                    { "name": "internal", "description": "Internal role" },
                    { "name": "partners", "description": "Partners role" }
                ]
            }
        ]
    });
    let path = write_file(&dir, "service-instances.json", &doc.to_string());

    let store = Arc::new(InMemoryStore::new());
    importer(store.clone()).import_file(&path, Format::Json).await?;

    let puts = store.puts();
    let types: Vec<&str> = puts.iter().map(|(t, _)| t.as_str()).collect();
    assert_eq!(
        types,
        vec!["service-instances", "service-instance-ports", "ip-address-roles"]
    );

    // The instance keeps its scalar fields, picks up the legacy defaults,
    // and loses the nested collections.
    let si = &puts[0].1[0];
    assert_eq!(si["eosManaged"], json!(false));
    assert_eq!(si["requiredCapacity"], json!(75));
    assert_eq!(si["loadBalancer"]["name"], json!("DEV-1-2-3-4"));
    assert!(!si.contains_key("ports"));
    assert!(!si.contains_key("ipAddressRoles"));

    // Detached children carry the injected back-reference.
    assert_eq!(puts[1].1[0]["serviceInstance"]["key"], json!("seiso-dev"));
    assert_eq!(puts[2].1.len(), 2);
    assert_eq!(puts[2].1[1]["serviceInstance"]["key"], json!("seiso-dev"));
    assert_eq!(puts[2].1[1]["name"], json!("partners"));
    Ok(())
}

#[tokio::test]
async fn test_import_nodes_decomposition_counts() -> Result<()> {
    let dir = TempDir::new()?;
    let doc = json!({
        "type": "nodes",
        "items": [
            {
                "name": "seiso01-dev",
                "serviceInstance": "seiso-dev",
                "ipAddresses": [
                    { "ipAddressRole": "internal", "ipAddress": "1.2.10.1" },
                    { "ipAddressRole": "partners", "ipAddress": "1.2.10.2" }
                ]
            },
            {
                "name": "seiso02-dev",
                "serviceInstance": "seiso-dev",
                "ipAddresses": [
                    { "ipAddressRole": "internal", "ipAddress": "1.2.10.3" }
                ]
            }
        ]
    });
    let path = write_file(&dir, "nodes.json", &doc.to_string());

    let store = Arc::new(InMemoryStore::new());
    importer(store.clone()).import_file(&path, Format::Json).await?;

    let puts = store.puts();
    assert_eq!(puts.len(), 2);

    let (_, nodes) = &puts[0];
    assert_eq!(nodes.len(), 2);
    assert!(nodes.iter().all(|n| !n.contains_key("ipAddresses")));

    // One emitted IP address per nested entry, parent name injected.
    let (_, nips) = &puts[1];
    assert_eq!(nips.len(), 3);
    assert_eq!(nips[0]["node"]["name"], json!("seiso01-dev"));
    assert_eq!(nips[2]["node"]["name"], json!("seiso02-dev"));
    Ok(())
}

#[tokio::test]
async fn test_import_files_stops_at_first_failure() -> Result<()> {
    let dir = TempDir::new()?;
    let bad = json!({ "type": "some-bogus-type", "items": [] });
    let good = json!({
        "type": "environments",
        "items": [ { "key": "dev", "name": "Development" } ]
    });
    let bad_path = write_file(&dir, "bad.json", &bad.to_string());
    let good_path = write_file(&dir, "good.json", &good.to_string());

    let store = Arc::new(InMemoryStore::new());
    let result = importer(store.clone())
        .import_files(&[bad_path, good_path], Format::Json)
        .await;

    assert!(result.is_err());
    // The later file was never processed.
    assert!(store.puts().is_empty());
    Ok(())
}
