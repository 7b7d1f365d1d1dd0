//! Bring-up (`<name>.startup`) file contents.

use crate::entity::NetworkEntity;
use crate::ip::LINK_PREFIX_LEN;
use crate::topology::shaping::LinkShaper;
use crate::utils::duration::format_delay;

/// `ifconfig` lines bringing every interface up, in index order.
/// Routers also get their link address and IPv6 forwarding.
pub fn render_startup(entity: &NetworkEntity, shaper: &dyn LinkShaper) -> String {
    let mut startup = String::new();

    for iface in entity.interfaces() {
        startup.push_str(&format!("ifconfig {} up\n", iface.device()));
        if entity.is_router() {
            startup.push_str(&format!(
                "ifconfig {} add {}/{}\n",
                iface.device(),
                iface.address,
                LINK_PREFIX_LEN
            ));
        }
    }

    if entity.is_router() {
        startup.push_str("# Active ipv6 forwarding\n");
        startup.push_str("sysctl -w net.ipv6.conf.all.forwarding=1\n");
    }

    startup.push_str(&render_shaping(entity, shaper));
    startup
}

/// One `tc ... netem` line per interface whose link is shaped
pub fn render_shaping(entity: &NetworkEntity, shaper: &dyn LinkShaper) -> String {
    let mut lines = String::new();

    for iface in entity.interfaces() {
        let Some(shaping) = shaper.shaping(&iface.zone) else {
            continue;
        };
        if shaping.is_empty() {
            continue;
        }

        let mut line = format!("tc qdisc add dev {} root netem", iface.device());
        if let Some(delay) = shaping.delay {
            line.push_str(&format!(" delay {}", format_delay(delay)));
        }
        if let Some(bandwidth) = shaping.bandwidth {
            line.push_str(&format!(" rate {}", bandwidth));
        }
        lines.push_str(&line);
        lines.push('\n');
    }

    if lines.is_empty() {
        lines
    } else {
        format!("# Link bandwidth and delay\n{}", lines)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::default_link_prefix;
    use crate::entity::Lab;
    use crate::topology::{EdgeShaper, LinkShaping, NoShaping, TopologyBinder, TopologyEdge};
    use crate::utils::bandwidth::Bandwidth;
    use std::time::Duration;

    fn bound_lab(router: bool, edges: &[TopologyEdge]) -> (Lab, EdgeShaper) {
        let mut lab = Lab::new();
        for name in ["X", "Y", "Z"] {
            let entity = if router {
                NetworkEntity::router(name)
            } else {
                NetworkEntity::switch(name)
            };
            lab.add_entity(entity).unwrap();
        }
        let links = TopologyBinder::new(default_link_prefix())
            .unwrap()
            .bind(&mut lab, edges)
            .unwrap();
        let shaper = EdgeShaper::new(&links, edges, &LinkShaping::default());
        (lab, shaper)
    }

    #[test]
    fn test_router_startup() {
        let edges = vec![TopologyEdge::new("X", "Y"), TopologyEdge::new("X", "Z")];
        let (lab, _) = bound_lab(true, &edges);

        let startup = render_startup(lab.by_name("X").unwrap(), &NoShaping);
        assert_eq!(
            startup,
            "ifconfig eth0 up\n\
             ifconfig eth0 add 2001:db8::1/64\n\
             ifconfig eth1 up\n\
             ifconfig eth1 add 2001:db8:0:1::1/64\n\
             # Active ipv6 forwarding\n\
             sysctl -w net.ipv6.conf.all.forwarding=1\n"
        );
    }

    #[test]
    fn test_switch_startup_only_brings_interfaces_up() {
        let edges = vec![TopologyEdge::new("X", "Y"), TopologyEdge::new("Y", "Z")];
        let (lab, _) = bound_lab(false, &edges);

        let startup = render_startup(lab.by_name("Y").unwrap(), &NoShaping);
        assert_eq!(startup, "ifconfig eth0 up\nifconfig eth1 up\n");
    }

    #[test]
    fn test_isolated_router_still_enables_forwarding() {
        let (lab, _) = bound_lab(true, &[]);
        let startup = render_startup(lab.by_name("Z").unwrap(), &NoShaping);
        assert_eq!(
            startup,
            "# Active ipv6 forwarding\nsysctl -w net.ipv6.conf.all.forwarding=1\n"
        );
    }

    #[test]
    fn test_shaping_lines() {
        let edges = vec![
            TopologyEdge::new("X", "Y")
                .with_bandwidth(Bandwidth::from_mbit(10))
                .with_delay(Duration::from_millis(5)),
            TopologyEdge::new("X", "Z").with_delay(Duration::from_millis(1)),
            TopologyEdge::new("Y", "Z"),
        ];
        let (lab, shaper) = bound_lab(false, &edges);

        let startup = render_startup(lab.by_name("X").unwrap(), &shaper);
        assert_eq!(
            startup,
            "ifconfig eth0 up\n\
             ifconfig eth1 up\n\
             # Link bandwidth and delay\n\
             tc qdisc add dev eth0 root netem delay 5ms rate 10000kbit\n\
             tc qdisc add dev eth1 root netem delay 1ms\n"
        );

        // Z's second link (to Y) is unshaped
        let z = render_shaping(lab.by_name("Z").unwrap(), &shaper);
        assert_eq!(
            z,
            "# Link bandwidth and delay\ntc qdisc add dev eth0 root netem delay 1ms\n"
        );
    }
}
