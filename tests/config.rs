// ABOUTME: Integration tests for configuration parsing and discovery.
// ABOUTME: Tests YAML parsing, node entry forms, defaults and init scaffolding.

use armada::config::*;
use armada::error::Error;
use std::fs;
use std::time::Duration;

mod parsing {
    use super::*;

    #[test]
    fn parse_minimal_config() {
        let yaml = r#"
nodes:
  - unix:///var/run/docker.sock
"#;
        let config = Config::from_yaml(yaml).unwrap();
        assert_eq!(config.nodes.len(), 1);
        assert_eq!(config.nodes.first().id.as_str(), "unix:///var/run/docker.sock");
        assert!(config.placement.tracking);
        assert_eq!(config.timeout, Duration::from_secs(120));
    }

    #[test]
    fn parse_full_config() {
        let yaml = r#"
nodes:
  - local=unix:///var/run/docker.sock
  - id: worker-1
    address: tcp://10.0.0.2:2375
  - address: tcp://10.0.0.3:2375
placement:
  tracking: false
timeout: 30s
"#;
        let config = Config::from_yaml(yaml).unwrap();
        let ids: Vec<_> = config.nodes.iter().map(|n| n.id.as_str()).collect();
        assert_eq!(ids, vec!["local", "worker-1", "tcp://10.0.0.3:2375"]);
        assert_eq!(config.nodes.get(1).unwrap().address, "tcp://10.0.0.2:2375");
        assert!(!config.placement.tracking);
        assert_eq!(config.timeout, Duration::from_secs(30));
    }

    #[test]
    fn empty_node_list_returns_error() {
        let result = Config::from_yaml("nodes: []\n");
        assert!(matches!(result, Err(Error::Yaml(_))));
    }

    #[test]
    fn missing_nodes_returns_error() {
        let result = Config::from_yaml("placement:\n  tracking: true\n");
        assert!(result.is_err());
    }

    #[test]
    fn duplicate_node_ids_return_error() {
        let yaml = r#"
nodes:
  - a=tcp://10.0.0.2:2375
  - a=tcp://10.0.0.3:2375
"#;
        let err = Config::from_yaml(yaml).unwrap_err();
        assert!(matches!(err, Error::InvalidConfig(_)));
        assert!(err.to_string().contains("duplicate node id"));
    }

    #[test]
    fn sub_second_timeout_returns_error() {
        let yaml = "nodes:\n  - tcp://10.0.0.2:2375\ntimeout: 500ms\n";
        let err = Config::from_yaml(yaml).unwrap_err();
        assert!(matches!(err, Error::InvalidConfig(_)));
        assert!(err.to_string().contains("timeout"));
    }

    #[test]
    fn empty_mapping_id_returns_error() {
        let yaml = r#"
nodes:
  - id: ""
    address: tcp://10.0.0.2:2375
"#;
        let err = Config::from_yaml(yaml).unwrap_err();
        assert!(err.to_string().contains("node id cannot be empty"));
    }
}

mod discovery {
    use super::*;

    #[test]
    fn finds_primary_file() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(CONFIG_FILENAME), "nodes:\n  - tcp://a:2375\n").unwrap();

        let config = Config::discover(dir.path()).unwrap();
        assert_eq!(config.nodes.first().address, "tcp://a:2375");
    }

    #[test]
    fn finds_config_in_dot_directory() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join(".armada")).unwrap();
        fs::write(
            dir.path().join(CONFIG_FILENAME_DIR),
            "nodes:\n  - tcp://b:2375\n",
        )
        .unwrap();

        let config = Config::discover(dir.path()).unwrap();
        assert_eq!(config.nodes.first().address, "tcp://b:2375");
    }

    #[test]
    fn missing_config_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let err = Config::discover(dir.path()).unwrap_err();
        assert!(matches!(err, Error::ConfigNotFound(_)));
    }
}

mod init {
    use super::*;

    #[test]
    fn writes_loadable_template() {
        let dir = tempfile::tempdir().unwrap();
        init_config(
            dir.path(),
            &["w1=tcp://10.0.0.2:2375".to_string()],
            false,
            false,
        )
        .unwrap();

        let config = Config::discover(dir.path()).unwrap();
        assert_eq!(config.nodes.first().id.as_str(), "w1");
        assert!(!config.placement.tracking);
    }

    #[test]
    fn defaults_to_local_engine() {
        let dir = tempfile::tempdir().unwrap();
        init_config(dir.path(), &[], true, false).unwrap();

        let config = Config::discover(dir.path()).unwrap();
        assert_eq!(config.nodes.first().address, "unix:///var/run/docker.sock");
        assert!(config.placement.tracking);
    }

    #[test]
    fn refuses_to_overwrite_without_force() {
        let dir = tempfile::tempdir().unwrap();
        init_config(dir.path(), &[], true, false).unwrap();

        let err = init_config(dir.path(), &[], true, false).unwrap_err();
        assert!(matches!(err, Error::AlreadyExists(_)));

        init_config(dir.path(), &[], false, true).unwrap();
    }
}
