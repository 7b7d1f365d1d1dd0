//! Router emission.
//!
//! A router gets the same bring-up file as a switch (plus addresses and
//! forwarding) and a Quagga configuration in `<name>/etc/quagga`:
//!
//! - `daemons`: zebra plus exactly one routing daemon enabled
//! - `zebra.conf`
//! - the protocol file (`ospf6d.conf`, `ripngd.conf` or `bgpd.conf`)
//!
//! Rendering never allocates. Routing identities must be assigned first, see
//! [`Lab::emit_protocol`] and [`Lab::assign_identities`].

use crate::config::RoutingProtocol;
use crate::entity::startup::render_startup;
use crate::entity::{EntityId, Lab, NetworkEntity};
use crate::error::LabError;
use crate::ip::{AddressAllocator, RouterIdentity};
use crate::netkit::{prepare_dir, quagga_dir, startup_path, write_file, QUAGGA_DIR};
use crate::report::{EntityReport, EntityStatus};
use crate::topology::shaping::LinkShaper;
use std::path::Path;

/// Routing daemons toggled in the `daemons` file, in file order
const ROUTING_DAEMONS: [&str; 5] = ["bgpd", "ospfd", "ospf6d", "ripd", "ripngd"];

/// OSPFv3 runs a single backbone area
const OSPF_AREA: &str = "0.0.0.0";

pub fn render_daemons(protocol: RoutingProtocol) -> String {
    let mut daemons = String::from("zebra=yes\n");
    for daemon in ROUTING_DAEMONS {
        let enabled = if daemon == protocol.daemon() { "yes" } else { "no" };
        daemons.push_str(&format!("{}={}\n", daemon, enabled));
    }
    daemons
}

pub fn render_zebra(name: &str) -> String {
    format!(
        "hostname {}\npassword zebra\nlog file /var/log/quagga/zebra.log\n",
        name
    )
}

pub fn render_ospf6d(router: &NetworkEntity, identity: &RouterIdentity) -> String {
    let mut conf = String::from("hostname ospf6d\npassword zebra\n");

    for (iface, cost) in router.weighted_interfaces() {
        conf.push_str(&format!("interface {}\n", iface.device()));
        conf.push_str(&format!("ipv6 ospf6 cost {}\n", cost));
    }

    conf.push_str("router ospf6\n");
    conf.push_str(&format!("router-id {}\n", identity.router_id));
    for iface in router.interfaces() {
        conf.push_str(&format!("interface {} area {}\n", iface.device(), OSPF_AREA));
    }

    conf.push_str("log file /var/log/zebra/ospf6d.log\n");
    conf
}

pub fn render_ripngd() -> String {
    "router ripng\nnetwork ::/0\n".to_string()
}

/// One eBGP session per interface, addressed to the neighbor's end of that
/// link and to the neighbor's own AS
pub fn render_bgpd(lab: &Lab, id: EntityId, identity: &RouterIdentity) -> Result<String, LabError> {
    let router = lab.entity(id);

    let mut peers = Vec::with_capacity(router.interfaces().len());
    for iface in router.interfaces() {
        let neighbor = lab.entity(iface.neighbor);
        let remote_as = neighbor
            .router_identity()
            .ok_or_else(|| LabError::IdentityMissing(neighbor.name().to_string()))?
            .as_number;
        let address = lab
            .peer_of(iface)
            .map(|peer| peer.address)
            .ok_or_else(|| LabError::IdentityMissing(neighbor.name().to_string()))?;
        peers.push((address, remote_as));
    }

    let mut conf = String::from("hostname bgpd\npassword zebra\n");
    conf.push_str(&format!("router bgp {}\n", identity.as_number));
    conf.push_str("!\n");
    conf.push_str(&format!("bgp router-id {}\n", identity.router_id));
    for (address, remote_as) in &peers {
        conf.push_str(&format!("neighbor {} remote-as {}\n", address, remote_as));
        conf.push_str("! add route-maps for this neighbor here\n");
    }
    conf.push_str("!\n");
    for (address, _) in &peers {
        conf.push_str(&format!("no neighbor {} activate\n", address));
    }
    conf.push_str("!\n");
    conf.push_str("address-family ipv6\n");
    conf.push_str("! add the networks this router advertises here\n");
    conf.push_str("!\n");
    for (address, _) in &peers {
        conf.push_str(&format!("neighbor {} activate\n", address));
    }
    conf.push_str("exit-address-family\n");
    conf.push_str("!\n");
    conf.push_str("! add community lists and route-maps here\n");

    Ok(conf)
}

/// File name and contents of every Quagga file for one router
pub fn render_quagga(
    lab: &Lab,
    id: EntityId,
    protocol: RoutingProtocol,
) -> Result<Vec<(String, String)>, LabError> {
    let router = lab.entity(id);
    let identity = router
        .router_identity()
        .ok_or_else(|| LabError::IdentityMissing(router.name().to_string()))?;

    let protocol_conf = match protocol {
        RoutingProtocol::Ospf => render_ospf6d(router, &identity),
        RoutingProtocol::Ripng => render_ripngd(),
        RoutingProtocol::Bgp => render_bgpd(lab, id, &identity)?,
    };

    Ok(vec![
        ("daemons".to_string(), render_daemons(protocol)),
        ("zebra.conf".to_string(), render_zebra(router.name())),
        (format!("{}.conf", protocol.daemon()), protocol_conf),
    ])
}

/// Write the Quagga files of a router whose identity is already assigned.
///
/// Returns the written paths relative to the lab root, or a warning when
/// the configuration directory could not be set up.
pub fn write_quagga(
    lab: &Lab,
    id: EntityId,
    protocol: RoutingProtocol,
    root: &Path,
) -> Result<(Vec<String>, EntityStatus), LabError> {
    let name = lab.entity(id).name();
    let files = render_quagga(lab, id, protocol)?;

    let dir = quagga_dir(root, name);
    if let Err(message) = prepare_dir(&dir) {
        log::warn!("{}: {}; lab may not work properly", name, message);
        return Ok((Vec::new(), EntityStatus::Warning(message)));
    }

    let mut written = Vec::with_capacity(files.len());
    for (file, contents) in files {
        write_file(&dir.join(&file), &contents)?;
        written.push(format!("{}/{}/{}", name, QUAGGA_DIR, file));
    }
    log::debug!("Wrote {} configuration for router {}", protocol, name);

    Ok((written, EntityStatus::Ok))
}

/// Write the bring-up file and Quagga files of one router
pub fn emit_router(
    lab: &Lab,
    id: EntityId,
    protocol: RoutingProtocol,
    shaper: &dyn LinkShaper,
    root: &Path,
) -> Result<EntityReport, LabError> {
    let router = lab.entity(id);
    write_file(
        &startup_path(root, router.name()),
        &render_startup(router, shaper),
    )?;

    let (mut files, status) = write_quagga(lab, id, protocol, root)?;
    files.insert(0, format!("{}.startup", router.name()));

    Ok(EntityReport::describe(lab, id, files, status))
}

impl Lab {
    /// Emit one router's protocol configuration, assigning its routing
    /// identity on first use. Calling this again, for the same or another
    /// protocol, reuses the identity.
    ///
    /// BGP sessions need the neighbors' AS numbers, so for BGP every
    /// neighbor without an identity gets one too, in interface order.
    pub fn emit_protocol(
        &mut self,
        id: EntityId,
        protocol: RoutingProtocol,
        allocator: &mut AddressAllocator,
        root: &Path,
    ) -> Result<EntityStatus, LabError> {
        self.entity_mut(id).ensure_identity(allocator)?;
        if protocol == RoutingProtocol::Bgp {
            let neighbors: Vec<EntityId> = self
                .entity(id)
                .interfaces()
                .iter()
                .map(|iface| iface.neighbor)
                .collect();
            for neighbor in neighbors {
                self.entity_mut(neighbor).ensure_identity(allocator)?;
            }
        }
        let (_, status) = write_quagga(self, id, protocol, root)?;
        Ok(status)
    }
}
