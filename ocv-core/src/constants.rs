use std::time::Duration;

// Annotations written by the OpenShift deployer onto the replication controllers it manages
pub const DEPLOYMENT_CONFIG_ANNOTATION_KEY: &str = "openshift.io/deployment-config.name";
pub const ENCODED_DEPLOYMENT_CONFIG_ANNOTATION_KEY: &str = "openshift.io/encoded-deployment-config";

// Trigger types understood by the trigger/build linker
pub const IMAGE_CHANGE_TRIGGER_TYPE: &str = "ImageChange";
pub const CONFIG_CHANGE_TRIGGER_TYPE: &str = "ConfigChange";

// Defaults
pub const DEFAULT_NAMESPACE: &str = "default";
pub const DEFAULT_POD_POLL_INTERVAL: Duration = Duration::from_secs(5);

// View messages
pub const LOADING_MESSAGE: &str = "Loading...";
