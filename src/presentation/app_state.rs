// Application state for HTTP handlers
use crate::application::monitor_service::MonitorHandle;
use crate::application::node_service::NodeHandle;

#[derive(Clone)]
pub struct NodeState {
    pub node: NodeHandle,
}

#[derive(Clone)]
pub struct MonitorState {
    pub monitor: MonitorHandle,
}
