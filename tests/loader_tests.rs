//! Integration tests for reading design libraries.

use memview::common::InterfaceMode;
use memview::design::loader::{load_library, parse_library, LibraryFormat, LoadError};
use memview::design::Endpoint;
use std::fs;
use std::path::Path;

const TOML_LIBRARY: &str = r#"
[parameters]
BASE = "'h1000"

[[components]]
name = "top"
design = "top_design"

[[components]]
name = "cpu"

[[components.bus_interfaces]]
name = "m"
mode = "master"
base_address = "BASE"

[[components]]
name = "mem"

[[components.bus_interfaces]]
name = "s"
mode = "target"
memory_map = "map"

[[components.memory_maps]]
name = "map"
aub = "8"

[[components.memory_maps.address_blocks]]
name = "blk"
base_address = "0"
range = "'h100"
width = "32"

[[components.memory_maps.address_blocks.registers]]
name = "ctrl"
offset = "4"
size = "32"

[[components.memory_maps.address_blocks.registers.fields]]
name = "enable"
bit_offset = "0"
bit_width = "1"

[[designs]]
name = "top_design"

[[designs.instances]]
name = "cpu0"
component = "cpu"

[[designs.instances]]
name = "mem0"
component = "mem"

[[designs.interconnections]]
endpoints = [
    { instance = "cpu0", bus = "m" },
    { instance = "mem0", bus = "s" },
]
"#;

/// Tests parsing a complete TOML library.
#[test]
fn test_parse_toml() {
    let library = parse_library(TOML_LIBRARY, LibraryFormat::Toml, Path::new("lib.toml")).unwrap();

    assert_eq!(library.parameters["BASE"], "'h1000");
    assert_eq!(library.components.len(), 3);
    assert_eq!(library.component("top").unwrap().design.as_deref(), Some("top_design"));

    let cpu = library.component("cpu").unwrap();
    assert_eq!(cpu.bus_interface("m").unwrap().mode, InterfaceMode::Initiator);
    assert_eq!(cpu.bus_interface("m").unwrap().base_address.as_deref(), Some("BASE"));

    let map = library.component("mem").unwrap().memory_map("map").unwrap();
    let register = &map.address_blocks[0].registers[0];
    assert_eq!(register.offset, "4");
    assert_eq!(register.dimension, None);
    assert_eq!(register.fields[0].bit_width, "1");

    let design = library.design("top_design").unwrap();
    assert_eq!(design.instances.len(), 2);
    assert_eq!(design.interconnections[0].name, "");
    assert_eq!(
        design.interconnections[0].endpoints,
        vec![Endpoint::instance("cpu0", "m"), Endpoint::instance("mem0", "s")]
    );
}

/// Tests parsing the same kind of library from JSON.
#[test]
fn test_parse_json() {
    let json = r#"{
        "components": [
            {
                "name": "ic",
                "bus_interfaces": [
                    { "name": "mm", "mode": "mirroredMaster" },
                    { "name": "ms", "mode": "mirroredSlave", "remap_address": "'h10" }
                ],
                "channels": [ { "name": "ch", "interfaces": ["mm", "ms"] } ]
            }
        ],
        "designs": [
            {
                "name": "d",
                "interconnections": [
                    { "name": "up", "endpoints": [ { "instance": "x", "bus": "m" }, { "bus": "ext" } ] }
                ]
            }
        ]
    }"#;
    let library = parse_library(json, LibraryFormat::Json, Path::new("lib.json")).unwrap();

    let ic = library.component("ic").unwrap();
    assert_eq!(ic.bus_interface("mm").unwrap().mode, InterfaceMode::MirroredInitiator);
    assert_eq!(ic.bus_interface("ms").unwrap().mode, InterfaceMode::MirroredTarget);
    assert_eq!(ic.channels[0].interfaces, vec!["mm", "ms"]);
    assert!(library.parameters.is_empty());

    let endpoints = &library.design("d").unwrap().interconnections[0].endpoints;
    assert!(!endpoints[0].is_hierarchical());
    assert!(endpoints[1].is_hierarchical());
}

/// Tests that both spellings of every interface mode are accepted.
#[test]
fn test_mode_spellings() {
    for (text, mode) in [
        ("initiator", InterfaceMode::Initiator),
        ("master", InterfaceMode::Initiator),
        ("target", InterfaceMode::Target),
        ("slave", InterfaceMode::Target),
        ("mirroredInitiator", InterfaceMode::MirroredInitiator),
        ("mirroredTarget", InterfaceMode::MirroredTarget),
        ("system", InterfaceMode::System),
        ("monitor", InterfaceMode::Monitor),
    ] {
        let parsed: InterfaceMode = serde_json::from_str(&format!("\"{}\"", text)).unwrap();
        assert_eq!(parsed, mode, "mode {}", text);
    }
    assert!(serde_json::from_str::<InterfaceMode>("\"bystander\"").is_err());
}

/// Tests format selection by extension.
#[test]
fn test_format_from_path() {
    assert_eq!(LibraryFormat::from_path(Path::new("a.json")), LibraryFormat::Json);
    assert_eq!(LibraryFormat::from_path(Path::new("a.JSON")), LibraryFormat::Json);
    assert_eq!(LibraryFormat::from_path(Path::new("a.toml")), LibraryFormat::Toml);
    assert_eq!(LibraryFormat::from_path(Path::new("library")), LibraryFormat::Toml);
}

/// Tests that parse errors name their origin.
#[test]
fn test_parse_errors() {
    let err = parse_library("[[components]]\n", LibraryFormat::Toml, Path::new("broken.toml")).unwrap_err();
    assert!(matches!(err, LoadError::Toml { .. }));
    assert!(err.to_string().contains("broken.toml"));

    let err = parse_library("{", LibraryFormat::Json, Path::new("broken.json")).unwrap_err();
    assert!(matches!(err, LoadError::Json { .. }));
}

/// Tests loading from disk and the missing-file error.
#[test]
fn test_load_library() {
    let path = std::env::temp_dir().join(format!("memview-{}-lib.toml", std::process::id()));
    fs::write(&path, TOML_LIBRARY).unwrap();
    let library = load_library(&path);
    fs::remove_file(&path).unwrap();
    assert_eq!(library.unwrap().designs.len(), 1);

    let missing = std::env::temp_dir().join("memview-missing-library.toml");
    assert!(matches!(load_library(&missing), Err(LoadError::Io { .. })));
}
