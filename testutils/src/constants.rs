pub const TEST_NAMESPACE: &str = "test-namespace";
pub const TEST_DEPLOYMENT_CONFIG: &str = "the-deployment-config";
pub const TEST_DEPLOYMENT: &str = "the-deployment-config-1";
pub const TEST_BUILD: &str = "the-build-1";
pub const TEST_POD: &str = "the-pod";
pub const TEST_SERVICE: &str = "the-service";
pub const TEST_IMAGE_STREAM: &str = "the-image-stream";
pub const TEST_IMAGE_TAG: &str = "latest";
pub const TEST_OUTPUT_IMAGE: &str = "the-image-stream:latest";
pub const TEST_IMAGE: &str = "sha256:4b6a8a3c0b1f6a3e";
pub const TEST_DOCKER_REF: &str = "172.30.17.3:5001/test-namespace/the-image-stream@sha256:4b6a8a3c0b1f6a3e";
