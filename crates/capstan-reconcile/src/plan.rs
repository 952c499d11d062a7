//! Pure convergence planning.
//!
//! A planner looks at a desired spec and an optional live summary and
//! produces the ordered steps that close the gap. Planning never does
//! I/O and never mutates anything, so every transition is testable as
//! a plain function. Replacement is always modelled as remove plus
//! recreate; podman containers cannot be reconfigured in place.

use std::fmt;

use capstan_core::{ContainerSpec, DesiredState, NetworkSpec, PodSpec, Presence};

use crate::live::{LiveContainer, LiveNetwork, LivePod};

/// A single convergence step for one resource kind.
pub trait PlanStep: fmt::Debug + Copy + Eq + Send + Sync + 'static {
    /// Short human-readable name, used in reports and logs.
    fn describe(&self) -> &'static str;
}

/// Ordered steps that converge one resource.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Plan<S: PlanStep> {
    steps: Vec<S>,
}

impl<S: PlanStep> Plan<S> {
    /// Creates a plan from ordered steps.
    pub fn new(steps: Vec<S>) -> Self {
        Self { steps }
    }

    /// Creates an empty plan: the resource already matches its spec.
    pub fn noop() -> Self {
        Self { steps: Vec::new() }
    }

    /// Returns true when there is nothing to do.
    pub fn is_noop(&self) -> bool {
        self.steps.is_empty()
    }

    /// The steps, in execution order.
    pub fn steps(&self) -> &[S] {
        &self.steps
    }

    /// Step names, for reporting.
    pub fn described(&self) -> Vec<&'static str> {
        self.steps.iter().map(PlanStep::describe).collect()
    }
}

/// Steps applicable to containers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContainerStep {
    /// Create and start via `container run`.
    Run,
    /// Start an existing stopped container.
    Start,
    /// Stop a running container.
    Stop,
    /// Remove a stopped container.
    Remove,
}

impl PlanStep for ContainerStep {
    fn describe(&self) -> &'static str {
        match self {
            Self::Run => "run",
            Self::Start => "start",
            Self::Stop => "stop",
            Self::Remove => "remove",
        }
    }
}

/// Steps applicable to pods.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PodStep {
    /// Create the pod without starting it.
    Create,
    /// Start the pod and its infra container.
    Start,
    /// Stop the pod.
    Stop,
    /// Remove the stopped pod.
    Remove,
}

impl PlanStep for PodStep {
    fn describe(&self) -> &'static str {
        match self {
            Self::Create => "create",
            Self::Start => "start",
            Self::Stop => "stop",
            Self::Remove => "remove",
        }
    }
}

/// Steps applicable to networks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NetworkStep {
    /// Create the network.
    Create,
    /// Remove the network.
    Remove,
}

impl PlanStep for NetworkStep {
    fn describe(&self) -> &'static str {
        match self {
            Self::Create => "create",
            Self::Remove => "remove",
        }
    }
}

/// Steps applicable to images.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageStep {
    /// Pull the image from its registry.
    Pull,
    /// Remove the local image.
    Remove,
}

impl PlanStep for ImageStep {
    fn describe(&self) -> &'static str {
        match self {
            Self::Pull => "pull",
            Self::Remove => "remove",
        }
    }
}

/// Plans the convergence of one container.
pub fn plan_container(spec: &ContainerSpec, live: Option<&LiveContainer>) -> Plan<ContainerStep> {
    use ContainerStep::*;

    let live = match live {
        Some(live) => live,
        None => {
            return match spec.state {
                DesiredState::Running => Plan::new(vec![Run]),
                // `run` is the only way to create; stop right after so
                // the container exists in the requested state.
                DesiredState::Stopped => Plan::new(vec![Run, Stop]),
                DesiredState::Absent => Plan::noop(),
            };
        }
    };

    if spec.state == DesiredState::Absent {
        return if live.running {
            Plan::new(vec![Stop, Remove])
        } else {
            Plan::new(vec![Remove])
        };
    }

    if container_drifted(spec, live) {
        let mut steps = Vec::new();
        if live.running {
            steps.push(Stop);
        }
        steps.push(Remove);
        steps.push(Run);
        if spec.state == DesiredState::Stopped {
            steps.push(Stop);
        }
        return Plan::new(steps);
    }

    match (live.running, spec.state) {
        (false, DesiredState::Running) => Plan::new(vec![Start]),
        (true, DesiredState::Stopped) => Plan::new(vec![Stop]),
        _ => Plan::noop(),
    }
}

/// Whether a live container no longer matches its creation-time spec.
///
/// Network names and bind mounts are compared as sets; podman reports
/// them in its own order. Environment and mounts are subset checks in
/// the desired direction, because the runtime injects entries of its
/// own (PATH, HOSTNAME, image volumes) that a spec never lists.
fn container_drifted(spec: &ContainerSpec, live: &LiveContainer) -> bool {
    if spec.image != live.image {
        return true;
    }

    let mut desired_networks: Vec<&str> = spec.networks.iter().map(|n| n.name.as_str()).collect();
    desired_networks.sort_unstable();
    let live_networks: Vec<&str> = live.networks.iter().map(String::as_str).collect();
    if !desired_networks.is_empty() && desired_networks != live_networks {
        return true;
    }

    for volume in &spec.volumes {
        let pair = format!("{}:{}", volume.source, volume.container_dir);
        if !live.mounts.iter().any(|m| *m == pair) {
            return true;
        }
    }

    for (key, value) in &spec.env {
        let entry = format!("{key}={value}");
        if !live.env.iter().any(|e| *e == entry) {
            return true;
        }
    }

    false
}

/// Plans the convergence of one pod.
pub fn plan_pod(spec: &PodSpec, live: Option<&LivePod>) -> Plan<PodStep> {
    use PodStep::*;

    let live = match live {
        Some(live) => live,
        None => {
            return match spec.state {
                DesiredState::Running => Plan::new(vec![Create, Start]),
                DesiredState::Stopped => Plan::new(vec![Create]),
                DesiredState::Absent => Plan::noop(),
            };
        }
    };

    if spec.state == DesiredState::Absent {
        return if live.running {
            Plan::new(vec![Stop, Remove])
        } else {
            Plan::new(vec![Remove])
        };
    }

    if pod_drifted(spec, live) {
        let mut steps = Vec::new();
        if live.running {
            steps.push(Stop);
        }
        steps.push(Remove);
        steps.push(Create);
        if spec.state == DesiredState::Running {
            steps.push(Start);
        }
        return Plan::new(steps);
    }

    match (live.running, spec.state) {
        (false, DesiredState::Running) => Plan::new(vec![Start]),
        (true, DesiredState::Stopped) => Plan::new(vec![Stop]),
        _ => Plan::noop(),
    }
}

fn pod_drifted(spec: &PodSpec, live: &LivePod) -> bool {
    let mut desired: Vec<&str> = spec.networks.iter().map(|n| n.name.as_str()).collect();
    desired.sort_unstable();
    let live_networks: Vec<&str> = live.networks.iter().map(String::as_str).collect();
    !desired.is_empty() && desired != live_networks
}

/// Plans the convergence of one network.
pub fn plan_network(spec: &NetworkSpec, live: Option<&LiveNetwork>) -> Plan<NetworkStep> {
    use NetworkStep::*;

    match (spec.presence, live) {
        (Presence::Present, None) => Plan::new(vec![Create]),
        (Presence::Present, Some(live)) => {
            if network_drifted(spec, live) {
                Plan::new(vec![Remove, Create])
            } else {
                Plan::noop()
            }
        }
        (Presence::Absent, Some(_)) => Plan::new(vec![Remove]),
        (Presence::Absent, None) => Plan::noop(),
    }
}

fn network_drifted(spec: &NetworkSpec, live: &LiveNetwork) -> bool {
    if let Some(driver) = &spec.driver {
        if *driver != live.driver {
            return true;
        }
    }
    if spec.internal != live.internal {
        return true;
    }
    let mut desired: Vec<&str> = spec.subnets.iter().map(|s| s.subnet.as_str()).collect();
    desired.sort_unstable();
    let mut live_cidrs: Vec<&str> = live.subnets.iter().map(|s| s.subnet.as_str()).collect();
    live_cidrs.sort_unstable();
    if desired != live_cidrs {
        return true;
    }
    // Podman assigns a gateway when none is pinned, so only pinned
    // gateways are compared.
    spec.subnets.iter().any(|s| {
        s.gateway.is_some()
            && !live
                .subnets
                .iter()
                .any(|l| l.subnet == s.subnet && l.gateway == s.gateway)
    })
}

/// Plans the convergence of one image reference.
pub fn plan_image(presence: Presence, present: bool) -> Plan<ImageStep> {
    use ImageStep::*;

    match (presence, present) {
        (Presence::Present, false) => Plan::new(vec![Pull]),
        (Presence::Absent, true) => Plan::new(vec![Remove]),
        _ => Plan::noop(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::live::LiveSubnet;
    use capstan_core::{NetworkAttachment, Subnet, VolumeMount};

    fn live_db(running: bool) -> LiveContainer {
        LiveContainer {
            id: "0f5a3b".into(),
            name: "db".into(),
            running,
            image: "docker.io/library/postgres:13".into(),
            networks: vec!["backend".into()],
            mounts: vec!["/srv/pg:/data".into()],
            env: vec!["PATH=/usr/bin".into(), "PGDATA=/data".into()],
        }
    }

    fn spec_db() -> ContainerSpec {
        ContainerSpec::builder("db", "docker.io/library/postgres:13")
            .network(NetworkAttachment::new("backend"))
            .volume(VolumeMount::new("/srv/pg", "/data"))
            .env("PGDATA", "/data")
            .build()
    }

    #[test]
    fn test_absent_to_running() {
        let plan = plan_container(&spec_db(), None);
        assert_eq!(plan.steps(), &[ContainerStep::Run]);
    }

    #[test]
    fn test_absent_to_stopped() {
        let spec = ContainerSpec::builder("db", "postgres:13")
            .state(DesiredState::Stopped)
            .build();
        let plan = plan_container(&spec, None);
        assert_eq!(plan.steps(), &[ContainerStep::Run, ContainerStep::Stop]);
    }

    #[test]
    fn test_matching_container_is_noop() {
        let plan = plan_container(&spec_db(), Some(&live_db(true)));
        assert!(plan.is_noop());
    }

    #[test]
    fn test_runtime_env_does_not_count_as_drift() {
        // PATH comes from the image, not the spec; it must not force a
        // replacement.
        let plan = plan_container(&spec_db(), Some(&live_db(true)));
        assert!(plan.is_noop());
    }

    #[test]
    fn test_image_change_replaces() {
        let spec = ContainerSpec::builder("db", "docker.io/library/postgres:14").build();
        let plan = plan_container(&spec, Some(&live_db(true)));
        assert_eq!(
            plan.steps(),
            &[
                ContainerStep::Stop,
                ContainerStep::Remove,
                ContainerStep::Run
            ]
        );
    }

    #[test]
    fn test_replace_of_stopped_container_skips_stop() {
        let spec = ContainerSpec::builder("db", "docker.io/library/postgres:14").build();
        let plan = plan_container(&spec, Some(&live_db(false)));
        assert_eq!(plan.steps(), &[ContainerStep::Remove, ContainerStep::Run]);
    }

    #[test]
    fn test_replace_into_stopped_state() {
        let spec = ContainerSpec::builder("db", "docker.io/library/postgres:14")
            .state(DesiredState::Stopped)
            .build();
        let plan = plan_container(&spec, Some(&live_db(true)));
        assert_eq!(
            plan.steps(),
            &[
                ContainerStep::Stop,
                ContainerStep::Remove,
                ContainerStep::Run,
                ContainerStep::Stop
            ]
        );
    }

    #[test]
    fn test_lifecycle_only_transitions() {
        let plan = plan_container(&spec_db(), Some(&live_db(false)));
        assert_eq!(plan.steps(), &[ContainerStep::Start]);

        let spec = ContainerSpec::builder("db", "docker.io/library/postgres:13")
            .network(NetworkAttachment::new("backend"))
            .volume(VolumeMount::new("/srv/pg", "/data"))
            .env("PGDATA", "/data")
            .state(DesiredState::Stopped)
            .build();
        let plan = plan_container(&spec, Some(&live_db(true)));
        assert_eq!(plan.steps(), &[ContainerStep::Stop]);
    }

    #[test]
    fn test_removal_plans() {
        let spec = ContainerSpec::builder("db", "postgres:13")
            .state(DesiredState::Absent)
            .build();
        let plan = plan_container(&spec, Some(&live_db(true)));
        assert_eq!(plan.steps(), &[ContainerStep::Stop, ContainerStep::Remove]);

        // Retry after a failed removal: the stop already happened, only
        // the remove is left.
        let plan = plan_container(&spec, Some(&live_db(false)));
        assert_eq!(plan.steps(), &[ContainerStep::Remove]);

        let plan = plan_container(&spec, None);
        assert!(plan.is_noop());
    }

    #[test]
    fn test_pod_transitions() {
        let spec = PodSpec::builder("web")
            .network(NetworkAttachment::new("frontend"))
            .build();
        let plan = plan_pod(&spec, None);
        assert_eq!(plan.steps(), &[PodStep::Create, PodStep::Start]);

        let live = LivePod {
            id: "9a".into(),
            name: "web".into(),
            running: true,
            networks: vec!["frontend".into()],
        };
        assert!(plan_pod(&spec, Some(&live)).is_noop());

        let live_drifted = LivePod {
            networks: vec!["legacy".into()],
            ..live.clone()
        };
        let plan = plan_pod(&spec, Some(&live_drifted));
        assert_eq!(
            plan.steps(),
            &[PodStep::Stop, PodStep::Remove, PodStep::Create, PodStep::Start]
        );
    }

    #[test]
    fn test_network_transitions() {
        let spec = NetworkSpec::builder("backend")
            .subnet(Subnet::new("172.42.0.0/24").with_gateway("172.42.0.1"))
            .build();
        let plan = plan_network(&spec, None);
        assert_eq!(plan.steps(), &[NetworkStep::Create]);

        let live = LiveNetwork {
            name: "backend".into(),
            driver: "bridge".into(),
            internal: false,
            subnets: vec![LiveSubnet {
                subnet: "172.42.0.0/24".into(),
                gateway: Some("172.42.0.1".into()),
            }],
        };
        assert!(plan_network(&spec, Some(&live)).is_noop());

        let spec_internal = NetworkSpec::builder("backend")
            .subnet(Subnet::new("172.42.0.0/24").with_gateway("172.42.0.1"))
            .internal(true)
            .build();
        let plan = plan_network(&spec_internal, Some(&live));
        assert_eq!(plan.steps(), &[NetworkStep::Remove, NetworkStep::Create]);
    }

    #[test]
    fn test_image_transitions() {
        assert_eq!(plan_image(Presence::Present, false).steps(), &[ImageStep::Pull]);
        assert!(plan_image(Presence::Present, true).is_noop());
        assert_eq!(plan_image(Presence::Absent, true).steps(), &[ImageStep::Remove]);
        assert!(plan_image(Presence::Absent, false).is_noop());
    }

    #[test]
    fn test_second_pass_is_noop() {
        // A pass that just ran `run` leaves exactly this live state; the
        // next pass must plan nothing.
        let spec = spec_db();
        let live = live_db(true);
        assert!(plan_container(&spec, Some(&live)).is_noop());
    }
}
