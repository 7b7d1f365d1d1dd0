#[cfg(test)]
mod lab_generation_tests {
    use std::collections::BTreeMap;
    use std::fs;
    use std::io::Write;
    use std::path::{Path, PathBuf};
    use tempfile::{tempdir, NamedTempFile};

    use netlab::config::{LabType, RoutingProtocol};
    use netlab::config_loader::load_config;
    use netlab::error::{LabError, TopologyError};
    use netlab::orchestrator::{generate_lab, LabAssembler};
    use netlab::topology::{Topology, TopologyEdge};

    fn topology(nodes: &[&str], edges: Vec<TopologyEdge>) -> Topology {
        let mut topology = Topology::new();
        for node in nodes {
            topology.add_node(*node);
        }
        for edge in edges {
            topology.add_edge(edge);
        }
        topology
    }

    fn read(root: &Path, file: &str) -> String {
        fs::read_to_string(root.join(file))
            .unwrap_or_else(|e| panic!("cannot read {}: {}", file, e))
    }

    /// Relative path -> contents of every file under `root`
    fn snapshot(root: &Path) -> BTreeMap<PathBuf, String> {
        fn walk(root: &Path, dir: &Path, files: &mut BTreeMap<PathBuf, String>) {
            for entry in fs::read_dir(dir).unwrap() {
                let path = entry.unwrap().path();
                if path.is_dir() {
                    walk(root, &path, files);
                } else {
                    let relative = path.strip_prefix(root).unwrap().to_path_buf();
                    files.insert(relative, fs::read_to_string(&path).unwrap());
                }
            }
        }
        let mut files = BTreeMap::new();
        walk(root, root, &mut files);
        files
    }

    /// Two routers, one link of weight 10, compiled as an OSPF lab
    #[test]
    fn test_two_router_ospf_lab() {
        let root = tempdir().unwrap();
        let graph = topology(&["R1", "R2"], vec![TopologyEdge::new("R1", "R2").with_weight(10)]);

        let report = LabAssembler::new(LabType::Routing(RoutingProtocol::Ospf))
            .assemble(&graph, root.path())
            .unwrap();

        let r1 = report.entity("R1").unwrap();
        let r2 = report.entity("R2").unwrap();
        assert_eq!(r1.interfaces.len(), 1);
        assert_eq!(r2.interfaces.len(), 1);
        assert_eq!(r1.interfaces[0].index, 0);
        assert_eq!(r2.interfaces[0].index, 0);
        assert_eq!(r1.interfaces[0].zone, r2.interfaces[0].zone);
        assert_eq!(r1.router_id.map(|id| id.to_string()), Some("0.0.0.1".to_string()));
        assert_eq!(r2.router_id.map(|id| id.to_string()), Some("0.0.0.2".to_string()));

        for (name, router_id) in [("R1", "0.0.0.1"), ("R2", "0.0.0.2")] {
            let ospf = read(root.path(), &format!("{}/etc/quagga/ospf6d.conf", name));
            assert!(ospf.contains("interface eth0\nipv6 ospf6 cost 10\n"));
            assert!(ospf.contains(&format!("router-id {}\n", router_id)));
            assert!(ospf.contains("interface eth0 area 0.0.0.0\n"));

            let daemons = read(root.path(), &format!("{}/etc/quagga/daemons", name));
            assert!(daemons.contains("ospf6d=yes\n"));
            assert_eq!(daemons.matches("=yes").count(), 2, "only zebra and ospf6d run");
        }

        assert_eq!(
            read(root.path(), "R2.startup"),
            "ifconfig eth0 up\n\
             ifconfig eth0 add 2001:db8::2/64\n\
             # Active ipv6 forwarding\n\
             sysctl -w net.ipv6.conf.all.forwarding=1\n"
        );
        assert_eq!(
            read(root.path(), "lab.conf"),
            "LAB_DESCRIPTION=\"Generated Netkit lab\"\n\nR1[0]=A0\nR2[0]=A0\n"
        );
    }

    /// Triangle of switches: three directories, two interfaces each, no daemons
    #[test]
    fn test_switch_triangle() {
        let root = tempdir().unwrap();
        let graph = topology(
            &["S1", "S2", "S3"],
            vec![
                TopologyEdge::new("S1", "S2"),
                TopologyEdge::new("S2", "S3"),
                TopologyEdge::new("S3", "S1"),
            ],
        );

        let report = LabAssembler::new(LabType::Switching)
            .assemble(&graph, root.path())
            .unwrap();

        for name in ["S1", "S2", "S3"] {
            assert!(root.path().join(name).is_dir());
            assert!(!root.path().join(name).join("etc").exists());
            assert_eq!(report.entity(name).unwrap().interfaces.len(), 2);
            assert_eq!(
                read(root.path(), &format!("{}.startup", name)),
                "ifconfig eth0 up\nifconfig eth1 up\n"
            );
        }
        assert_eq!(report.warnings().count(), 0);
    }

    #[test]
    fn test_unknown_node_produces_no_output() {
        let parent = tempdir().unwrap();
        let root = parent.path().join("lab");
        let graph = topology(
            &["R1", "R2"],
            vec![TopologyEdge::new("R1", "R2"), TopologyEdge::new("R1", "ghost")],
        );

        let err = LabAssembler::new(LabType::Routing(RoutingProtocol::Bgp))
            .assemble(&graph, &root)
            .unwrap_err();

        match err {
            LabError::Topology(TopologyError::UnknownNode { from, to, missing }) => {
                assert_eq!((from.as_str(), to.as_str()), ("R1", "ghost"));
                assert_eq!(missing, "ghost");
            }
            other => panic!("unexpected error: {}", other),
        }
        assert!(!root.exists());
    }

    #[test]
    fn test_generation_is_deterministic() {
        let graph = topology(
            &["R1", "R2", "R3", "R4"],
            vec![
                TopologyEdge::new("R1", "R2").with_weight(3),
                TopologyEdge::new("R2", "R3"),
                TopologyEdge::new("R3", "R4").with_weight(7),
                TopologyEdge::new("R4", "R1"),
                TopologyEdge::new("R1", "R3"),
            ],
        );

        for protocol in [RoutingProtocol::Ospf, RoutingProtocol::Ripng, RoutingProtocol::Bgp] {
            let first = tempdir().unwrap();
            let second = tempdir().unwrap();
            let assembler = LabAssembler::new(LabType::Routing(protocol));
            assembler.assemble(&graph, first.path()).unwrap();
            assembler.assemble(&graph, second.path()).unwrap();

            let a = snapshot(first.path());
            assert!(!a.is_empty());
            assert_eq!(a, snapshot(second.path()), "{} output differs between runs", protocol);
        }
    }

    #[test]
    fn test_bgp_peers_with_neighbor_addresses() {
        let root = tempdir().unwrap();
        let graph = topology(
            &["R1", "R2", "R3"],
            vec![TopologyEdge::new("R1", "R2"), TopologyEdge::new("R2", "R3")],
        );

        LabAssembler::new(LabType::Routing(RoutingProtocol::Bgp))
            .assemble(&graph, root.path())
            .unwrap();

        let bgpd = read(root.path(), "R2/etc/quagga/bgpd.conf");
        assert!(bgpd.starts_with("hostname bgpd\npassword zebra\nrouter bgp 2\n!\nbgp router-id 0.0.0.2\n"));
        assert!(bgpd.contains("neighbor 2001:db8::1 remote-as 1\n"));
        assert!(bgpd.contains("neighbor 2001:db8:0:1::2 remote-as 3\n"));
        assert!(bgpd.contains("no neighbor 2001:db8::1 activate\n"));
        assert!(bgpd.contains("address-family ipv6\n"));
        assert!(bgpd.contains("neighbor 2001:db8:0:1::2 activate\nexit-address-family\n"));
        assert!(bgpd.ends_with('\n'));

        // Declarations, then deactivation, then the address family
        let declared = bgpd.find("remote-as").unwrap();
        let deactivated = bgpd.find("no neighbor").unwrap();
        let family = bgpd.find("address-family ipv6").unwrap();
        assert!(declared < deactivated && deactivated < family);

        let daemons = read(root.path(), "R1/etc/quagga/daemons");
        assert_eq!(daemons, "zebra=yes\nbgpd=yes\nospfd=no\nospf6d=no\nripd=no\nripngd=no\n");
    }

    #[test]
    fn test_parallel_links_peer_on_their_own_subnet() {
        let root = tempdir().unwrap();
        let graph = topology(
            &["R1", "R2"],
            vec![TopologyEdge::new("R1", "R2"), TopologyEdge::new("R2", "R1")],
        );

        LabAssembler::new(LabType::Routing(RoutingProtocol::Bgp))
            .assemble(&graph, root.path())
            .unwrap();

        let bgpd = read(root.path(), "R1/etc/quagga/bgpd.conf");
        assert!(bgpd.contains("neighbor 2001:db8::2 remote-as 2\n"));
        assert!(bgpd.contains("neighbor 2001:db8:0:1::1 remote-as 2\n"));
    }

    #[test]
    fn test_ripng_lab() {
        let root = tempdir().unwrap();
        let graph = topology(&["R1", "R2", "lonely"], vec![TopologyEdge::new("R1", "R2")]);

        let report = LabAssembler::new(LabType::Routing(RoutingProtocol::Ripng))
            .assemble(&graph, root.path())
            .unwrap();

        for name in ["R1", "R2", "lonely"] {
            assert_eq!(
                read(root.path(), &format!("{}/etc/quagga/ripngd.conf", name)),
                "router ripng\nnetwork ::/0\n"
            );
            assert_eq!(
                read(root.path(), &format!("{}/etc/quagga/zebra.conf", name)),
                format!("hostname {}\npassword zebra\nlog file /var/log/quagga/zebra.log\n", name)
            );
        }
        // An isolated router still gets an identity and a forwarding line
        let lonely = report.entity("lonely").unwrap();
        assert!(lonely.interfaces.is_empty());
        assert_eq!(lonely.as_number, Some(3));
        assert!(read(root.path(), "lonely.startup").contains("net.ipv6.conf.all.forwarding=1"));
    }

    #[test]
    fn test_blocked_directory_is_reported_not_fatal() {
        let root = tempdir().unwrap();
        fs::write(root.path().join("R1"), "not a directory").unwrap();
        let graph = topology(&["R1", "R2"], vec![TopologyEdge::new("R1", "R2")]);

        let report = LabAssembler::new(LabType::Routing(RoutingProtocol::Ospf))
            .assemble(&graph, root.path())
            .unwrap();

        let warned: Vec<&str> = report.warnings().map(|e| e.name.as_str()).collect();
        assert_eq!(warned, vec!["R1"]);
        assert!(root.path().join("R2/etc/quagga/ospf6d.conf").is_file());

        let json: serde_json::Value =
            serde_json::from_str(&read(root.path(), "lab.json")).unwrap();
        assert_eq!(json["entities"][0]["status"]["state"], "warning");
        assert_eq!(json["entities"][1]["status"]["state"], "ok");
    }

    #[test]
    fn test_yaml_and_gml_end_to_end() {
        let mut gml = NamedTempFile::new().unwrap();
        write!(
            gml,
            r#"graph [
  node [ id 0 label "core" ]
  node [ id 1 label "edge" ]
  node [ id 2 ]
  edge [ source 0 target 1 bandwidth "10Mbit" delay "5ms" ]
  edge [ source 1 target 2 ]
]"#
        )
        .unwrap();

        let mut yaml = NamedTempFile::new().unwrap();
        write!(
            yaml,
            "lab:\n  kind: switching\n  description: \"Access layer\"\n  version: \"2.1\"\n\
             topology:\n  path: {:?}\nlinks:\n  delay: \"1ms\"\n",
            gml.path().to_string_lossy()
        )
        .unwrap();

        let config = load_config(yaml.path()).unwrap();
        let root = tempdir().unwrap();
        let report = generate_lab(&config, root.path()).unwrap();

        assert_eq!(report.entities.len(), 3);
        assert_eq!(report.entities[2].name, "n2");
        assert_eq!(
            read(root.path(), "edge.startup"),
            "ifconfig eth0 up\n\
             ifconfig eth1 up\n\
             # Link bandwidth and delay\n\
             tc qdisc add dev eth0 root netem delay 5ms rate 10000kbit\n\
             tc qdisc add dev eth1 root netem delay 1ms\n"
        );
        assert_eq!(
            read(root.path(), "lab.conf"),
            "LAB_DESCRIPTION=\"Access layer\"\n\
             LAB_VERSION=2.1\n\
             \n\
             core[0]=A0\n\
             edge[0]=A0\n\
             edge[1]=A1\n\
             n2[0]=A1\n"
        );
    }
}
